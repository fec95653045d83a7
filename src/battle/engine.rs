//! Turn engine and battle loop.
//!
//! One tick composes collection, resolution and win evaluation into an atomic
//! step: snapshot in, next state plus frame out. The loop alternates the
//! acting side until a verdict or the tick limit. Everything here is pure and
//! synchronous; the starting team is the caller's choice and the only input
//! that is ever randomized.

use crate::battle::board::Battlefield;
use crate::battle::collector::collect_actions;
use crate::battle::resolver::resolve_actions;
use crate::battle::types::{BattleFrame, Team};
use crate::battle::victory::evaluate_winner;
use crate::config::battle::MAX_TICKS;

/// A finished battle: verdict (None = draw) and the full turn-by-turn record.
#[derive(Debug, Clone)]
pub struct BattleOutcome {
    pub winner: Option<Team>,
    pub timeline: Vec<BattleFrame>,
}

/// Resolve one tick for `acting` and produce the next board plus its frame.
pub fn tick(field: &Battlefield, acting: Team, turn: u32) -> (Battlefield, BattleFrame) {
    let actions = collect_actions(field, acting);
    let (next, resolution) = resolve_actions(field, &actions, turn);
    let winner = evaluate_winner(&next);
    let frame = BattleFrame {
        turn,
        units: next.units.clone(),
        hit_events: resolution.hit_events,
        move_cell_keys: resolution.move_cell_keys,
        winner,
        next_acting_team: acting.opponent(),
    };
    (next, frame)
}

/// Run a battle to verdict or draw. Frame 0 is a no-op snapshot of the
/// initial positions so clients can render the pre-battle board.
pub fn run_battle(initial: Battlefield, starting_team: Team) -> BattleOutcome {
    let mut timeline = vec![BattleFrame {
        turn: 0,
        units: initial.units.clone(),
        hit_events: Vec::new(),
        move_cell_keys: Vec::new(),
        winner: None,
        next_acting_team: starting_team,
    }];

    let mut field = initial;
    let mut acting = starting_team;
    let mut winner = None;

    for turn in 1..=MAX_TICKS {
        let (next, frame) = tick(&field, acting, turn);
        winner = frame.winner;
        acting = frame.next_acting_team;
        field = next;
        timeline.push(frame);
        if winner.is_some() {
            break;
        }
    }

    BattleOutcome { winner, timeline }
}
