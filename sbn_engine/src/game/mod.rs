//! Game assembly
//!
//! Runs the replay machine once per team block and merges the two State
//! sequences into the canonical half-inning order: a side bats until a
//! state closes the half with three outs (or the side is exhausted), then
//! the other side bats. Alternates are indexed by canonical position, one
//! slot per canonical State.

use crate::config::runtime::ReplayPreferences;
use crate::grammar::{Document, Side};
use crate::logging::codes;
use crate::log_success;
use crate::machine::{GameMachine, ReplayError, State};

/// An assembled game: per-side sequences, the merged canonical order and
/// the canonical-to-alternate index. Read-only once built.
#[derive(Debug, Default)]
pub struct Game {
    pub visitor: Vec<State>,
    pub home: Vec<State>,
    /// Canonical order as (side, index-into-that-side's-sequence)
    pub canonical: Vec<(Side, usize)>,
    /// Parallel to `canonical`; at most one alternate per canonical State
    pub alternates: Vec<Option<State>>,
    /// Replay errors from both sides, visitor first
    pub errors: Vec<ReplayError>,
}

impl Game {
    pub fn side_states(&self, side: Side) -> &[State] {
        match side {
            Side::Visitor => &self.visitor,
            Side::Home => &self.home,
        }
    }

    /// The canonical State at a canonical position
    pub fn state(&self, index: usize) -> Option<&State> {
        self.canonical
            .get(index)
            .map(|(side, i)| &self.side_states(*side)[*i])
    }

    /// The alternate paired with a canonical position, if one was scored
    pub fn alternate(&self, index: usize) -> Option<&State> {
        self.alternates.get(index).and_then(Option::as_ref)
    }

    pub fn canonical_states(&self) -> impl Iterator<Item = &State> {
        self.canonical
            .iter()
            .map(|(side, i)| &self.side_states(*side)[*i])
    }

    /// (visitor, home) run totals from each side's last state
    pub fn final_score(&self) -> (u32, u32) {
        (
            self.visitor.last().map_or(0, |s| s.score),
            self.home.last().map_or(0, |s| s.score),
        )
    }
}

pub struct GameAssembler {
    preferences: ReplayPreferences,
}

impl GameAssembler {
    pub fn new(preferences: ReplayPreferences) -> Self {
        Self { preferences }
    }

    /// Replay both team blocks and build the canonical sequence. The two
    /// sides share nothing and could replay in parallel; a single game is
    /// small enough that this runs them back to back.
    pub fn assemble(&self, document: &Document) -> Game {
        let machine = GameMachine::new(self.preferences.clone());
        let mut game = Game::default();
        let mut visitor_alternates = Vec::new();
        let mut home_alternates = Vec::new();

        for side in [Side::Visitor, Side::Home] {
            if let Some(block) = document.block(side) {
                let output = machine.replay(block);
                match side {
                    Side::Visitor => {
                        game.visitor = output.states;
                        visitor_alternates = output.alternates;
                    }
                    Side::Home => {
                        game.home = output.states;
                        home_alternates = output.alternates;
                    }
                }
                game.errors.extend(output.errors);
            }
        }

        game.canonical = merge_halves(&game.visitor, &game.home);
        game.alternates = game
            .canonical
            .iter()
            .map(|(side, i)| match side {
                Side::Visitor => visitor_alternates[*i].clone(),
                Side::Home => home_alternates[*i].clone(),
            })
            .collect();

        let (visitor_runs, home_runs) = game.final_score();
        log_success!(codes::success::GAME_ASSEMBLED,
            "Game assembled",
            "states" => game.canonical.len(),
            "visitor" => visitor_runs,
            "home" => home_runs,
            "errors" => game.errors.len()
        );
        game
    }
}

/// Zip two per-side sequences into canonical half-inning order
fn merge_halves(visitor: &[State], home: &[State]) -> Vec<(Side, usize)> {
    let mut canonical = Vec::with_capacity(visitor.len() + home.len());
    let mut cursors = [0usize, 0usize];
    let mut side = Side::Visitor;

    while cursors[0] < visitor.len() || cursors[1] < home.len() {
        let (sequence, cursor) = match side {
            Side::Visitor => (visitor, &mut cursors[0]),
            Side::Home => (home, &mut cursors[1]),
        };
        // One half: states up to and including the one that records the
        // third out, or until this side runs out
        while *cursor < sequence.len() {
            let closed = sequence[*cursor].half_over();
            canonical.push((side, *cursor));
            *cursor += 1;
            if closed {
                break;
            }
        }
        side = match side {
            Side::Visitor => Side::Home,
            Side::Home => Side::Visitor,
        };
    }
    canonical
}
