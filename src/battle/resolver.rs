//! Simultaneous action resolution.
//!
//! Applies one tick's action batch to a frozen snapshot in two strictly
//! ordered passes: all damage first, then all movement. The input snapshot is
//! never mutated; resolution produces the next board state.

use std::collections::{HashMap, HashSet};

use crate::battle::board::{cell_key, Battlefield};
use crate::battle::types::{Action, HitEvent, Position};

/// Structured records emitted by one tick's resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub hit_events: Vec<HitEvent>,
    pub move_cell_keys: Vec<String>,
}

/// Damage application against one defender. Shield absorbs at full value;
/// defense only discounts the overflow past a depleted shield, and the
/// minimum-1 rule applies only when there was no shield to begin with.
pub fn resolve_damage(damage: u32, hp: u32, shield: u32, defense: u32) -> (u32, u32) {
    if shield > 0 {
        let new_shield = shield.saturating_sub(damage);
        let overflow = damage.saturating_sub(shield);
        let to_hp = overflow.saturating_sub(defense);
        (hp.saturating_sub(to_hp), new_shield)
    } else {
        let effective = damage.saturating_sub(defense).max(1);
        (hp.saturating_sub(effective), 0)
    }
}

/// Apply `actions` to `field` and return the post-tick board plus its records.
///
/// Damage is computed from the pre-tick snapshot, so a unit that dies this
/// tick still deals its queued damage. Movement resolves afterwards against
/// pre-tick occupancy: a cell freed by a death only opens up next tick, while
/// a cell vacated by a same-tick queued move is immediately available.
pub fn resolve_actions(field: &Battlefield, actions: &[Action], turn: u32) -> (Battlefield, Resolution) {
    let mut next = field.clone();
    let mut resolution = Resolution::default();

    // Pass 1: accumulate damage per target, apply each total exactly once.
    let mut damage_by_target: HashMap<u32, u32> = HashMap::new();
    for action in actions {
        if let Action::Attack { actor, target, .. } = action {
            if let Some(attacker) = field.unit_by_id(*actor) {
                *damage_by_target.entry(*target).or_insert(0) += attacker.damage;
            }
        }
    }
    for unit in &mut next.units {
        if let Some(total) = damage_by_target.get(&unit.instance_id) {
            let (hp, shield) = resolve_damage(*total, unit.hp, unit.shield, unit.defense);
            unit.hp = hp;
            unit.shield = shield;
        }
    }

    // One event per attack action, with the post-damage kill flag of its
    // target. The per-tick sequence number keeps ids unique when the same
    // attacker or target shows up in several simultaneous events.
    let mut seq = 0u32;
    for action in actions {
        if let Action::Attack { actor, target, attack_type } = action {
            let (Some(attacker), Some(victim)) = (field.unit_by_id(*actor), field.unit_by_id(*target)) else {
                continue;
            };
            let did_kill = next.unit_by_id(*target).map_or(false, |u| u.hp == 0);
            resolution.hit_events.push(HitEvent {
                id: format!("{}-{}-{}-{}", turn, actor, target, seq),
                attacker_instance_id: *actor,
                attacker_team: attacker.team,
                attacker_pos: attacker.pos,
                target_instance_id: *target,
                target_pos: victim.pos,
                attack_type: *attack_type,
                did_kill,
            });
            seq += 1;
        }
    }

    // Pass 2: movement. A move executes only if it is the sole move targeting
    // its destination and the destination is empty or being vacated by
    // another queued move. Anything else is silently dropped.
    let movers: HashSet<u32> = actions
        .iter()
        .filter_map(|a| match a {
            Action::Move { actor, .. } => Some(*actor),
            _ => None,
        })
        .collect();
    let mut dest_count: HashMap<Position, u32> = HashMap::new();
    for action in actions {
        if let Action::Move { to, .. } = action {
            *dest_count.entry(*to).or_insert(0) += 1;
        }
    }

    for action in actions {
        let Action::Move { actor, to } = action else { continue };
        if dest_count.get(to).copied().unwrap_or(0) != 1 {
            continue;
        }
        let blocked = field
            .occupant_at(to.row, to.col)
            .is_some_and(|occupant| !movers.contains(&occupant.instance_id));
        if blocked {
            continue;
        }
        if let Some(unit) = next.units.iter_mut().find(|u| u.instance_id == *actor) {
            let from = unit.pos;
            unit.pos = *to;
            resolution.move_cell_keys.push(cell_key(from));
            resolution.move_cell_keys.push(cell_key(*to));
        }
    }

    (next, resolution)
}
