//! Per-plate-appearance game state
//!
//! Each State is derived from its immediate predecessor and is immutable
//! once emitted; downstream consumers read the sequence, never mutate it.

use serde::{Deserialize, Serialize};

use crate::advance::{Advance, Base};
use crate::event_code::Play;
use crate::grammar::Side;
use crate::utils::Span;

pub type PlayerId = String;

/// The full game situation after one plate appearance (or partial
/// situation after a non-batting event replayed as a play, e.g. a steal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub inning: u8,
    pub side: Side,
    /// Outs in the current half-inning, clamped at 3
    pub outs: u8,
    /// Batting team's cumulative run total
    pub score: u32,
    pub pitcher: Option<PlayerId>,
    pub batter: Option<PlayerId>,
    /// Occupancy of first, second and third base
    pub runners: [Option<PlayerId>; 3],
    pub play: Option<Play>,
    /// Merged implied and explicit advances, lead runner first
    pub advances: Vec<Advance>,
    /// Runners who crossed home on this play, in movement order
    pub scored: Vec<PlayerId>,
    pub outs_on_play: u8,
    /// Plate-appearance counter; increments only when a turn completes
    pub pa_number: u32,
    /// The batter's turn ended with a recorded result
    pub complete: bool,
    /// The half-inning ended mid-appearance with the batter still up
    pub incomplete: bool,
    pub comment: Option<String>,
    pub pitches: String,
    pub span: Span,
    /// Index of the predecessor in the same side's sequence
    pub prev: Option<usize>,
}

impl State {
    pub fn initial(side: Side) -> Self {
        Self {
            inning: 1,
            side,
            outs: 0,
            score: 0,
            pitcher: None,
            batter: None,
            runners: [None, None, None],
            play: None,
            advances: Vec::new(),
            scored: Vec::new(),
            outs_on_play: 0,
            pa_number: 0,
            complete: false,
            incomplete: false,
            comment: None,
            pitches: String::new(),
            span: Span::dummy(),
            prev: None,
        }
    }

    pub fn half_over(&self) -> bool {
        self.outs >= 3
    }

    pub fn runner_on(&self, base: Base) -> Option<&PlayerId> {
        base.runner_slot().and_then(|slot| self.runners[slot].as_ref())
    }

    /// Seed the successor state. Carries the situation forward, or opens
    /// the next half-inning when this one is over.
    pub fn seed_next(&self, own_index: usize) -> State {
        let mut next = self.clone();
        next.prev = Some(own_index);
        next.play = None;
        next.advances.clear();
        next.scored.clear();
        next.outs_on_play = 0;
        next.complete = false;
        next.incomplete = false;
        next.comment = None;
        next.pitches.clear();
        next.span = Span::dummy();

        if self.half_over() {
            next.inning = self.inning.saturating_add(1);
            next.outs = 0;
            next.runners = [None, None, None];
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_carries_situation() {
        let mut state = State::initial(Side::Visitor);
        state.outs = 1;
        state.score = 2;
        state.runners[0] = Some("12".to_string());
        state.pa_number = 4;
        state.complete = true;

        let next = state.seed_next(7);
        assert_eq!(next.prev, Some(7));
        assert_eq!(next.outs, 1);
        assert_eq!(next.score, 2);
        assert_eq!(next.runners[0].as_deref(), Some("12"));
        assert_eq!(next.pa_number, 4);
        assert!(!next.complete);
        assert!(next.play.is_none());
    }

    #[test]
    fn test_seed_opens_next_half_after_three_outs() {
        let mut state = State::initial(Side::Home);
        state.inning = 2;
        state.outs = 3;
        state.score = 5;
        state.runners = [Some("1".into()), None, Some("3".into())];

        let next = state.seed_next(0);
        assert_eq!(next.inning, 3);
        assert_eq!(next.outs, 0);
        assert_eq!(next.runners, [None, None, None]);
        assert_eq!(next.score, 5);
    }

    #[test]
    fn test_runner_lookup() {
        let mut state = State::initial(Side::Visitor);
        state.runners[1] = Some("9".to_string());
        assert_eq!(state.runner_on(Base::Second).map(String::as_str), Some("9"));
        assert_eq!(state.runner_on(Base::First), None);
        assert_eq!(state.runner_on(Base::Batter), None);
    }
}
