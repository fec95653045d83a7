//! Perspective mirroring.
//!
//! The second participant authored their army as if they were the side
//! advancing toward row 0, so their timeline is flipped back before delivery:
//! rows inverted, team tags swapped, winner and cell keys re-mapped. The
//! transform is an involution; mirroring twice restores the canonical record.

use crate::battle::board::{cell_key, parse_cell_key};
use crate::battle::types::{BattleFrame, HitEvent, Position, Unit};

pub fn mirror_row(row: usize, rows: usize) -> usize {
    rows - 1 - row
}

pub fn mirror_position(pos: Position, rows: usize) -> Position {
    Position { row: mirror_row(pos.row, rows), col: pos.col }
}

fn mirror_unit(unit: &Unit, rows: usize) -> Unit {
    Unit {
        team: unit.team.opponent(),
        pos: mirror_position(unit.pos, rows),
        ..unit.clone()
    }
}

fn mirror_hit_event(event: &HitEvent, rows: usize) -> HitEvent {
    HitEvent {
        attacker_team: event.attacker_team.opponent(),
        attacker_pos: mirror_position(event.attacker_pos, rows),
        target_pos: mirror_position(event.target_pos, rows),
        ..event.clone()
    }
}

fn mirror_cell_key(key: &str, rows: usize) -> String {
    parse_cell_key(key)
        .map(|pos| cell_key(mirror_position(pos, rows)))
        .unwrap_or_else(|| key.to_string())
}

pub fn mirror_frame(frame: &BattleFrame, rows: usize) -> BattleFrame {
    BattleFrame {
        turn: frame.turn,
        units: frame.units.iter().map(|u| mirror_unit(u, rows)).collect(),
        hit_events: frame.hit_events.iter().map(|e| mirror_hit_event(e, rows)).collect(),
        move_cell_keys: frame.move_cell_keys.iter().map(|k| mirror_cell_key(k, rows)).collect(),
        winner: frame.winner.map(|t| t.opponent()),
        next_acting_team: frame.next_acting_team.opponent(),
    }
}

pub fn mirror_timeline(timeline: &[BattleFrame], rows: usize) -> Vec<BattleFrame> {
    timeline.iter().map(|f| mirror_frame(f, rows)).collect()
}
