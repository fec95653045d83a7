use serde::{Serialize, Deserialize};

/// The two sides of a battle. Team A advances toward row 0, team B toward the
/// last row; canonical timelines are expressed from A's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    /// Row delta of one forward step: -1 for A, +1 for B.
    pub fn forward(self) -> i32 {
        match self {
            Team::A => -1,
            Team::B => 1,
        }
    }

    /// The opponent's home-edge row: reaching it wins the battle.
    pub fn breach_row(self, rows: usize) -> usize {
        match self {
            Team::A => 0,
            Team::B => rows - 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// A single combatant. Identity fields never change after spawn; only `pos`,
/// `hp` and `shield` mutate during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub instance_id: u32,
    pub kind: String,
    pub team: Team,
    pub damage: u32,
    pub defense: u32,
    pub attack_range: u32,
    pub pos: Position,
    pub hp: u32,
    pub shield: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackType {
    Melee,
    Ranged,
}

/// Intended action for one unit within one tick. Idle units simply have no
/// entry in the action list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move { actor: u32, to: Position },
    Attack { actor: u32, target: u32, attack_type: AttackType },
}

/// One attack that landed this tick. Emitted per attack action, not per point
/// of damage: simultaneous attackers on one target each get their own event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEvent {
    pub id: String,
    pub attacker_instance_id: u32,
    pub attacker_team: Team,
    pub attacker_pos: Position,
    pub target_instance_id: u32,
    pub target_pos: Position,
    pub attack_type: AttackType,
    pub did_kill: bool,
}

/// Immutable record of one resolved tick, appended to the timeline.
/// Frame 0 is the pre-battle snapshot and carries no events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleFrame {
    pub turn: u32,
    pub units: Vec<Unit>,
    pub hit_events: Vec<HitEvent>,
    pub move_cell_keys: Vec<String>,
    pub winner: Option<Team>,
    pub next_acting_team: Team,
}

/// Final verdict as delivered on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleWinner {
    A,
    B,
    #[serde(rename = "draw")]
    Draw,
}

/// One unit template of an army configuration, positioned in the author's own
/// frame (the author advances toward row 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmyUnit {
    pub kind: String,
    pub row: usize,
    pub col: usize,
    pub damage: u32,
    pub defense: u32,
    pub attack_range: u32,
    pub hp: u32,
    pub shield: u32,
}

/// A full army as published by a client via `SetArmy` or `DemoBattle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmyConfig {
    pub units: Vec<ArmyUnit>,
}
