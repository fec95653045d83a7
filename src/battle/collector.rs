//! Action collection system.
//!
//! For one acting side, computes the intended action (move / attack / idle) of
//! every living unit from a frozen snapshot. Evaluation order is snapshot
//! order, so the output is fully deterministic for a given board.

use std::collections::HashSet;

use crate::battle::board::{manhattan, Battlefield};
use crate::battle::types::{Action, AttackType, Team, Unit};
use crate::config::battle::ARCHER_LANE_DEPTH;

/// Kind-specific targeting, consulted before the generic forward-step logic.
/// A strategy that yields a target suppresses movement for that unit this tick.
pub trait TargetingStrategy {
    fn forward_target(&self, field: &Battlefield, actor: &Unit) -> Option<u32>;
}

/// Archer behavior: volley the nearest enemy in the forward lane (own column
/// plus one column to each side, up to ARCHER_LANE_DEPTH rows ahead).
struct LaneVolley;

impl TargetingStrategy for LaneVolley {
    fn forward_target(&self, field: &Battlefield, actor: &Unit) -> Option<u32> {
        let dir = actor.team.forward();
        let mut candidates: Vec<&Unit> = Vec::new();
        for offset in [-1i32, 0, 1] {
            let col = actor.pos.col as i32 + offset;
            if col < 0 || col >= field.cols as i32 {
                continue;
            }
            for depth in 1..=ARCHER_LANE_DEPTH {
                let row = actor.pos.row as i32 + dir * depth as i32;
                if row < 0 || row >= field.rows as i32 {
                    break;
                }
                if let Some(unit) = field.occupant_at(row as usize, col as usize) {
                    if unit.team != actor.team {
                        candidates.push(unit);
                    }
                }
            }
        }
        // min_by_key keeps the first candidate on ties, so equal-distance
        // targets fall back to scan order (column offset, then row).
        candidates
            .into_iter()
            .min_by_key(|u| manhattan(actor.pos, u.pos))
            .map(|u| u.instance_id)
    }
}

fn strategy_for(kind: &str) -> Option<&'static dyn TargetingStrategy> {
    match kind {
        "archer" => Some(&LaneVolley),
        _ => None,
    }
}

/// Collect the intended actions of every living unit of `acting`, one entry
/// per unit that does not idle, in snapshot order.
pub fn collect_actions(field: &Battlefield, acting: Team) -> Vec<Action> {
    field
        .living_of(acting)
        .filter_map(|unit| intend(field, unit))
        .collect()
}

/// Decision for a single unit, in fixed priority: kind strategy, forward
/// step (move / melee / chain move), fallback attack, idle.
fn intend(field: &Battlefield, unit: &Unit) -> Option<Action> {
    if let Some(strategy) = strategy_for(&unit.kind) {
        if let Some(target) = strategy.forward_target(field, unit) {
            return Some(Action::Attack {
                actor: unit.instance_id,
                target,
                attack_type: AttackType::Ranged,
            });
        }
    }

    if let Some(ahead) = field.step_ahead(unit) {
        match field.occupant_at(ahead.row, ahead.col) {
            None => {
                return Some(Action::Move { actor: unit.instance_id, to: ahead });
            }
            Some(other) if other.team != unit.team => {
                return Some(Action::Attack {
                    actor: unit.instance_id,
                    target: other.instance_id,
                    attack_type: AttackType::Melee,
                });
            }
            Some(ally) => {
                // Blocked by a live ally: this unit may still step into the
                // ally's cell if the ally itself vacates it this tick.
                let mut visited = HashSet::from([unit.instance_id]);
                if will_advance(field, ally, &mut visited) {
                    return Some(Action::Move { actor: unit.instance_id, to: ahead });
                }
            }
        }
    }

    fallback_attack(field, unit)
}

/// Depth-first "will this unit move forward this tick" query, threaded through
/// an explicit visited set. A cycle resolves to "will not move" so mutual
/// deferral terminates. Chains are linear (one cell ahead per unit), so the
/// walk is iterative.
fn will_advance(field: &Battlefield, start: &Unit, visited: &mut HashSet<u32>) -> bool {
    let mut current = start;
    loop {
        if !visited.insert(current.instance_id) {
            return false;
        }
        if let Some(strategy) = strategy_for(&current.kind) {
            // An archer with a lane target shoots instead of moving.
            if strategy.forward_target(field, current).is_some() {
                return false;
            }
        }
        let Some(ahead) = field.step_ahead(current) else {
            return false;
        };
        match field.occupant_at(ahead.row, ahead.col) {
            None => return true,
            Some(other) if other.team != current.team => return false,
            Some(ally) => current = ally,
        }
    }
}

/// Last resort: strike the nearest living enemy if it is in range. Ties on
/// distance keep the first unit in snapshot order. Range-1 units only hit
/// targets in their own column.
fn fallback_attack(field: &Battlefield, unit: &Unit) -> Option<Action> {
    let mut nearest: Option<(&Unit, usize)> = None;
    for enemy in field.living_of(unit.team.opponent()) {
        let dist = manhattan(unit.pos, enemy.pos);
        if nearest.map_or(true, |(_, best)| dist < best) {
            nearest = Some((enemy, dist));
        }
    }
    let (target, dist) = nearest?;

    if dist > unit.attack_range.max(1) as usize {
        return None;
    }
    if unit.attack_range <= 1 && target.pos.col != unit.pos.col {
        return None;
    }

    let attack_type = if dist <= 1 { AttackType::Melee } else { AttackType::Ranged };
    Some(Action::Attack {
        actor: unit.instance_id,
        target: target.instance_id,
        attack_type,
    })
}
