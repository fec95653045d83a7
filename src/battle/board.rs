//! Board model: pure queries over a battle snapshot.
//!
//! Nothing here mutates state; every function answers a question about one
//! frozen `Battlefield`.

use crate::battle::types::{Position, Team, Unit};

/// A frozen board snapshot: grid dimensions plus every unit spawned into the
/// battle, dead ones included. Unit order is insertion order at battle start
/// and is preserved for the whole battle (it is the deterministic tie-breaker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battlefield {
    pub rows: usize,
    pub cols: usize,
    pub units: Vec<Unit>,
}

impl Battlefield {
    pub fn new(rows: usize, cols: usize, units: Vec<Unit>) -> Self {
        Self { rows, cols, units }
    }

    /// The living unit standing on (row, col), if any. Dead units do not
    /// occupy cells.
    pub fn occupant_at(&self, row: usize, col: usize) -> Option<&Unit> {
        self.units
            .iter()
            .find(|u| is_alive(u) && u.pos.row == row && u.pos.col == col)
    }

    pub fn unit_by_id(&self, instance_id: u32) -> Option<&Unit> {
        self.units.iter().find(|u| u.instance_id == instance_id)
    }

    /// Living units of one team, in snapshot order.
    pub fn living_of(&self, team: Team) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| is_alive(u) && u.team == team)
    }

    /// The cell one forward step ahead of `unit`, or None at the board edge.
    pub fn step_ahead(&self, unit: &Unit) -> Option<Position> {
        let row = unit.pos.row as i32 + unit.team.forward();
        if row < 0 || row >= self.rows as i32 {
            return None;
        }
        Some(Position { row: row as usize, col: unit.pos.col })
    }
}

pub fn is_alive(unit: &Unit) -> bool {
    unit.hp > 0
}

pub fn manhattan(a: Position, b: Position) -> usize {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

/// Stable string key for one cell, used in move records.
pub fn cell_key(pos: Position) -> String {
    format!("{},{}", pos.row, pos.col)
}

/// Inverse of `cell_key`. Returns None for anything that is not "row,col".
pub fn parse_cell_key(key: &str) -> Option<Position> {
    let (row, col) = key.split_once(',')?;
    Some(Position {
        row: row.parse().ok()?,
        col: col.parse().ok()?,
    })
}
