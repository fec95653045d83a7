//! Match orchestration.
//!
//! Normalizes two independently-authored army configurations into one shared
//! coordinate frame, runs the battle loop to completion and produces the two
//! per-participant timeline views. Also synthesizes the single-player demo
//! opponent. The starting-team coin flip here is the only randomness that
//! touches a real match.

use rand::prelude::IteratorRandom;
use rand::Rng;

use crate::battle::board::Battlefield;
use crate::battle::engine::run_battle;
use crate::battle::mirror::{mirror_row, mirror_timeline};
use crate::battle::types::{ArmyConfig, ArmyUnit, BattleFrame, Position, Team, Unit};
use crate::config::battle::{GRID_COLS, GRID_ROWS, HOME_BAND_DEPTH};
use crate::config::demo::{
    DEMO_MAX_UNITS, DEMO_MIN_UNITS, DEMO_UNIT_DAMAGE, DEMO_UNIT_DEFENSE, DEMO_UNIT_HP,
    DEMO_UNIT_KIND, DEMO_UNIT_RANGE, DEMO_UNIT_SHIELD,
};

/// A resolved match, ready for delivery: the canonical record for side A and
/// the mirrored one for side B. Dropped once both views are sent.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub winner: Option<Team>,
    pub canonical: Vec<BattleFrame>,
    pub mirrored: Vec<BattleFrame>,
}

/// Rejects an army the resolver could not place on the board. Band placement
/// is the army builder's concern; this only guards the hard geometry.
pub fn validate_army(army: &ArmyConfig) -> Result<(), String> {
    if army.units.is_empty() {
        return Err("army has no units".to_string());
    }
    let mut cells = std::collections::HashSet::new();
    for unit in &army.units {
        if unit.row >= GRID_ROWS || unit.col >= GRID_COLS {
            return Err(format!("unit position {},{} is off the board", unit.row, unit.col));
        }
        if !cells.insert((unit.row, unit.col)) {
            return Err(format!("two units share cell {},{}", unit.row, unit.col));
        }
        if unit.hp == 0 {
            return Err("unit has no hit points".to_string());
        }
    }
    Ok(())
}

fn spawn_unit(template: &ArmyUnit, team: Team, row: usize, instance_id: u32) -> Unit {
    Unit {
        instance_id,
        kind: template.kind.clone(),
        team,
        damage: template.damage,
        defense: template.defense,
        attack_range: template.attack_range.max(1),
        pos: Position { row, col: template.col },
        hp: template.hp,
        shield: template.shield,
    }
}

/// Merge two authored armies into one board. Side A is taken as authored;
/// side B is flipped vertically and team-swapped so both descriptions meet in
/// the middle of the same grid. Instance ids are sequential (A first), which
/// fixes the snapshot order for the whole battle.
pub fn normalize_armies(side_a: &ArmyConfig, side_b: &ArmyConfig) -> Battlefield {
    let mut units = Vec::with_capacity(side_a.units.len() + side_b.units.len());
    let mut next_id = 1u32;

    for template in &side_a.units {
        units.push(spawn_unit(template, Team::A, template.row, next_id));
        next_id += 1;
    }
    for template in &side_b.units {
        let row = mirror_row(template.row, GRID_ROWS);
        units.push(spawn_unit(template, Team::B, row, next_id));
        next_id += 1;
    }

    Battlefield::new(GRID_ROWS, GRID_COLS, units)
}

/// Run a full match with a forced starting team. Deterministic: same armies
/// and same starting team always produce the same report.
pub fn run_match_with_start(side_a: &ArmyConfig, side_b: &ArmyConfig, starting: Team) -> MatchReport {
    let field = normalize_armies(side_a, side_b);
    let outcome = run_battle(field, starting);
    let mirrored = mirror_timeline(&outcome.timeline, GRID_ROWS);
    MatchReport {
        winner: outcome.winner,
        canonical: outcome.timeline,
        mirrored,
    }
}

/// Run a full match, flipping the coin for who acts first.
pub fn run_match(side_a: &ArmyConfig, side_b: &ArmyConfig) -> MatchReport {
    let starting = if rand::rng().random_bool(0.5) { Team::A } else { Team::B };
    run_match_with_start(side_a, side_b, starting)
}

/// Build the synthetic single-player opponent: a bounded random count of the
/// fixed demo template at random free cells of the author-frame home band.
/// Randomness stops here; the army then rides the normal mirror path.
pub fn synthesize_demo_army() -> ArmyConfig {
    let mut rng = rand::rng();
    let count = rng.random_range(DEMO_MIN_UNITS..=DEMO_MAX_UNITS);

    let mut free: Vec<(usize, usize)> = (GRID_ROWS - HOME_BAND_DEPTH..GRID_ROWS)
        .flat_map(|row| (0..GRID_COLS).map(move |col| (row, col)))
        .collect();

    let mut units = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(&(row, col)) = free.iter().choose(&mut rng) else {
            break;
        };
        free.retain(|&cell| cell != (row, col));
        units.push(ArmyUnit {
            kind: DEMO_UNIT_KIND.to_string(),
            row,
            col,
            damage: DEMO_UNIT_DAMAGE,
            defense: DEMO_UNIT_DEFENSE,
            attack_range: DEMO_UNIT_RANGE,
            hp: DEMO_UNIT_HP,
            shield: DEMO_UNIT_SHIELD,
        });
    }

    ArmyConfig { units }
}
