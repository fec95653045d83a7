//! Win evaluation.
//!
//! A team wins the instant one of its living units stands on its breach row
//! (the opponent's home edge). Both teams are checked every tick; team A is
//! checked first, which settles the same-tick double-breach case in A's favor.

use crate::battle::board::Battlefield;
use crate::battle::types::Team;

pub fn evaluate_winner(field: &Battlefield) -> Option<Team> {
    for team in [Team::A, Team::B] {
        let breach = team.breach_row(field.rows);
        if field.living_of(team).any(|u| u.pos.row == breach) {
            return Some(team);
        }
    }
    None
}
