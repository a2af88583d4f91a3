//! Replay state machine
//!
//! Consumes one team block's events in source order and derives each State
//! from its predecessor: classify the event code, parse and merge advances,
//! move runners lead-first, count outs and runs. Legality violations are
//! recorded and the machine continues with best-effort state, so every
//! independent error in a block is surfaced in one pass.

pub mod error;
pub mod state;

pub use error::ReplayError;
pub use state::{PlayerId, State};

use crate::advance::{merge_advances, parse_advance, Advance, Base, RunnerContext};
use crate::config::constants::compile_time::machine::{BALL_IN_PLAY_PITCH, MAX_INNINGS};
use crate::config::runtime::ReplayPreferences;
use crate::event_code::{classify, implied_advances};
use crate::grammar::{Event, PlayMarker, PlayRecord, TeamEventBlock};
use crate::logging::codes;
use crate::utils::Span;
use crate::{log_debug, log_error, log_success};

/// Result of replaying one team block: the canonical sequence, its
/// parallel alternate slots, and every error the replay collected.
#[derive(Debug, Default)]
pub struct MachineOutput {
    pub states: Vec<State>,
    /// Indexed like `states`; at most one alternate per canonical State
    pub alternates: Vec<Option<State>>,
    pub errors: Vec<ReplayError>,
}

pub struct GameMachine {
    preferences: ReplayPreferences,
}

impl GameMachine {
    pub fn new(preferences: ReplayPreferences) -> Self {
        Self { preferences }
    }

    /// Replay a block's events into an ordered State sequence
    pub fn replay(&self, block: &TeamEventBlock) -> MachineOutput {
        let mut out = MachineOutput::default();
        let mut pitcher: Option<PlayerId> = None;
        let mut finished = false;
        let mut pending_runner: Option<(PlayerId, Base)> = None;
        // Seed the most recent canonical play started from; alternatives
        // replay against it, never against the canonical play's result
        let mut last_seed: Option<State> = None;

        for doc_event in &block.events {
            let span = doc_event.span;
            match &doc_event.event {
                Event::Empty => {}
                Event::PitcherChange(id) => pitcher = Some(id.clone()),
                // A trailing `final` is inert; it only forbids further plays
                Event::Final(_) => finished = true,
                Event::ScoreCheck { inning, runs, outs } => {
                    self.check_score(out.states.last(), *inning, *runs, *outs, span, &mut out.errors);
                }
                Event::RunAdjustment { runner, base } => {
                    let at_half_start = out.states.last().map_or(true, State::half_over);
                    if !at_half_start {
                        record_error(
                            &mut out.errors,
                            ReplayError::RunnerAdjustmentMidInning { span },
                        );
                        continue;
                    }
                    let base = base.chars().next().and_then(Base::from_end_char);
                    if let Some(base) = base {
                        pending_runner = Some((runner.clone(), base));
                    }
                }
                Event::Play(record) => {
                    if finished {
                        record_error(&mut out.errors, ReplayError::PlayAfterFinal { span });
                        continue;
                    }
                    let mut seed = match out.states.last() {
                        Some(prev) => prev.seed_next(out.states.len() - 1),
                        None => State::initial(block.side),
                    };
                    if seed.inning > MAX_INNINGS {
                        record_error(
                            &mut out.errors,
                            ReplayError::InningsCeiling {
                                inning: seed.inning,
                                span,
                            },
                        );
                        break;
                    }
                    if pitcher.is_some() {
                        seed.pitcher = pitcher.clone();
                    }
                    if let Some((runner, base)) = pending_runner.take() {
                        if let Some(slot) = base.runner_slot() {
                            seed.runners[slot] = Some(runner);
                        }
                    }
                    last_seed = Some(seed.clone());
                    let state = self.process_play(seed, record, &mut out.errors);
                    out.states.push(state);
                    out.alternates.push(None);
                }
                Event::Alternative(record) => {
                    if finished {
                        record_error(&mut out.errors, ReplayError::PlayAfterFinal { span });
                        continue;
                    }
                    let Some(mut seed) = last_seed.clone() else {
                        record_error(&mut out.errors, ReplayError::OrphanAlternative { span });
                        continue;
                    };
                    let index = out.states.len() - 1;
                    if out.alternates[index].is_some() {
                        record_error(&mut out.errors, ReplayError::DuplicateAlternative { span });
                        continue;
                    }
                    // The alternative re-scores the same batter's turn
                    seed.batter = out.states[index].batter.clone();
                    let mut alternate = self.process_play(seed, record, &mut out.errors);
                    alternate.prev = Some(index);
                    out.alternates[index] = Some(alternate);
                }
            }
        }

        log_success!(codes::success::REPLAY_COMPLETE,
            "Team block replayed",
            "team" => block.team_id,
            "side" => block.side,
            "states" => out.states.len(),
            "errors" => out.errors.len()
        );
        out
    }

    /// Replay one plate-appearance record against a seeded state
    fn process_play(
        &self,
        mut state: State,
        record: &PlayRecord,
        errors: &mut Vec<ReplayError>,
    ) -> State {
        let span = record.span;
        state.span = span;
        state.comment = record.comment.clone();
        state.pitches = record.pitches.clone();
        if let Some(PlayMarker::Number(number)) = &record.marker {
            state.batter = Some(number.to_string());
        }

        // Occupancy the advances resolve against is the situation walking
        // into the plate appearance
        let context = RunnerContext::new(
            state.batter.clone().unwrap_or_default(),
            state.runners.clone(),
        );

        let play = match classify(&record.code) {
            Ok(play) => play,
            Err(source) => {
                record_error(errors, ReplayError::Classify { source, span });
                return state;
            }
        };

        // Explicit advances, individually: a bad code is reported and
        // dropped, the rest of the line still replays
        let mut explicit: Vec<Advance> = Vec::new();
        for code in &record.advances {
            let mut advance = match parse_advance(code) {
                Ok(advance) => advance,
                Err(source) => {
                    record_error(errors, ReplayError::Advance { source, span });
                    continue;
                }
            };
            if explicit.iter().any(|a| a.from == advance.from) {
                record_error(
                    errors,
                    ReplayError::Advance {
                        source: crate::advance::AdvanceError::DuplicateAdvance {
                            base: advance.from,
                        },
                        span,
                    },
                );
                continue;
            }
            match context.resolve(advance.from, code) {
                Ok(runner) => {
                    advance.runner = Some(runner);
                    explicit.push(advance);
                }
                Err(source) => record_error(errors, ReplayError::Advance { source, span }),
            }
        }

        // Implied advances; an explicit advance from the same base wins,
        // and a missing runner is an error, never a fabricated identity
        let mut implied: Vec<Advance> = Vec::new();
        for mut advance in implied_advances(&play) {
            if explicit.iter().any(|a| a.from == advance.from) {
                continue;
            }
            match context.resolve(advance.from, &advance.code_string()) {
                Ok(runner) => {
                    advance.runner = Some(runner);
                    implied.push(advance);
                }
                Err(source) => record_error(errors, ReplayError::Advance { source, span }),
            }
        }

        let merged = merge_advances(explicit, implied);

        // Movement pass: lead runners first so forced runners behind them
        // are not advanced twice
        for advance in &merged {
            let Some(runner) = advance.runner.clone() else {
                continue;
            };
            if let Some(slot) = advance.from.runner_slot() {
                state.runners[slot] = None;
            }
            if advance.out {
                state.outs += 1;
                state.outs_on_play += 1;
            } else if advance.to == Base::Home {
                state.score += 1;
                state.scored.push(runner);
            } else if let Some(slot) = advance.to.runner_slot() {
                state.runners[slot] = Some(runner);
            }
        }

        // The batter's own out comes from the play type unless an advance
        // already settled the batter (dropped third strike and the like)
        if !merged.iter().any(|a| a.from == Base::Batter) {
            let batter_outs = play.play_type.batter_outs();
            state.outs += batter_outs;
            state.outs_on_play += batter_outs;
        }

        if play.play_type.completes_plate_appearance() {
            state.complete = true;
            state.pa_number += 1;
        }
        if state.outs >= 3 {
            state.outs = 3;
            if !state.complete {
                state.incomplete = true;
            }
        }

        if self.preferences.normalize_pitch_sequences
            && play.play_type.is_ball_in_play()
            && !state.pitches.ends_with(BALL_IN_PLAY_PITCH)
        {
            state.pitches.push(BALL_IN_PLAY_PITCH);
        }

        state.play = Some(play);
        state.advances = merged;

        if self.preferences.log_state_transitions {
            log_debug!("State transition",
                "line" => span.start.line,
                "inning" => state.inning,
                "outs" => state.outs,
                "score" => state.score,
                "pa" => state.pa_number
            );
        }
        state
    }

    /// `score` command sanity check against the replay's own tally
    fn check_score(
        &self,
        last: Option<&State>,
        inning: u8,
        runs: u32,
        outs: Option<u8>,
        span: Span,
        errors: &mut Vec<ReplayError>,
    ) {
        if !self.preferences.validate_score_checks {
            return;
        }
        let (actual_inning, actual_runs, actual_outs) =
            last.map_or((1, 0, 0), |s| (s.inning, s.score, s.outs));
        if inning != actual_inning || runs != actual_runs {
            record_error(
                errors,
                ReplayError::ScoreCheckMismatch {
                    declared_inning: inning,
                    declared_runs: runs,
                    actual_inning,
                    actual_runs,
                    span,
                },
            );
        } else if let Some(declared) = outs {
            if declared != actual_outs {
                record_error(
                    errors,
                    ReplayError::OutsCheckMismatch {
                        declared,
                        actual: actual_outs,
                        span,
                    },
                );
            }
        }
    }
}

fn record_error(errors: &mut Vec<ReplayError>, error: ReplayError) {
    log_error!(error.error_code(), "Replay error",
        span = error.span(),
        "detail" => error
    );
    errors.push(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_code::PlayType;
    use crate::grammar::GrammarParser;
    use crate::lexical::LexicalAnalyzer;
    use assert_matches::assert_matches;

    fn replay(lines: &str) -> MachineOutput {
        let source = format!("---\nplays VIS\n{lines}");
        let stream = LexicalAnalyzer::new().tokenize(&source).unwrap();
        let document = GrammarParser::parse(stream).unwrap();
        GameMachine::new(ReplayPreferences::default()).replay(&document.blocks[0])
    }

    #[test]
    fn test_bunt_single_fixture() {
        let out = replay(
            "1 BBBB W.B-1\n\
             2 BBBB W.B-1;1-2\n\
             3 00 S6/G6/B B-1 1-3(E3/TH) 2X3(635) : bunt single\n",
        );
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
        let state = &out.states[2];

        let play = state.play.as_ref().unwrap();
        assert_eq!(play.play_type, PlayType::Single);
        assert_eq!(play.fielders, vec![6]);

        assert_eq!(state.runners[0].as_deref(), Some("3")); // batter on first
        assert_eq!(state.runners[2].as_deref(), Some("2")); // from first to third on E3/TH
        assert_eq!(state.runners[1], None);

        // runner from second thrown out 6-3-5 trying for third
        let put_out = state
            .advances
            .iter()
            .find(|a| a.from == Base::Second)
            .unwrap();
        assert!(put_out.out);
        assert_eq!(put_out.fielders, vec![6, 3, 5]);
        assert_eq!(put_out.runner.as_deref(), Some("1"));

        assert_eq!(state.outs, 1);
        assert_eq!(state.outs_on_play, 1);
        assert_eq!(state.scored.len(), 0);
        assert_eq!(state.comment.as_deref(), Some("bunt single"));
    }

    #[test]
    fn test_walk_carries_implied_advance() {
        let out = replay("1 BBBB W\n");
        let state = &out.states[0];
        assert_eq!(state.play.as_ref().unwrap().play_type, PlayType::Walk);
        assert_eq!(state.advances.len(), 1);
        assert!(state.advances[0].implied);
        assert_eq!(state.runners[0].as_deref(), Some("1"));
        assert!(state.complete);
        assert_eq!(state.pa_number, 1);
    }

    #[test]
    fn test_three_outs_open_next_inning() {
        let out = replay("1 CX K\n2 CX K\n3 CX K\n4 CX K\n");
        assert_eq!(out.states[2].outs, 3);
        assert_eq!(out.states[2].inning, 1);
        assert_eq!(out.states[3].outs, 1);
        assert_eq!(out.states[3].inning, 2);
    }

    #[test]
    fn test_outs_monotonic_and_clamped() {
        let out = replay("1 CX K\n2 CX K\n3 00 64(1)3/GDP\n");
        // double play with only the batter aboard the advance list still
        // records at most 3 outs
        let mut previous = 0;
        for state in &out.states {
            assert!(state.outs >= previous || state.outs == 0);
            assert!(state.outs <= 3);
            previous = state.outs;
        }
        assert_eq!(out.states.last().unwrap().outs, 3);
    }

    #[test]
    fn test_double_play_counts_runner_and_batter() {
        let out = replay("1 BBBB W\n2 00X 64(1)3/GDP\n");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
        let state = &out.states[1];
        assert_eq!(state.outs, 2);
        assert_eq!(state.outs_on_play, 2);
        assert_eq!(state.runners, [None, None, None]);
    }

    #[test]
    fn test_home_run_scores_batter() {
        let out = replay("1 BBBB W\n2 CX H/F7 B-H 1-H\n");
        let state = &out.states[1];
        assert_eq!(state.score, 2);
        assert_eq!(state.scored, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(state.runners, [None, None, None]);
    }

    #[test]
    fn test_missing_runner_is_reported_not_fabricated() {
        let out = replay("1 C1X CSH(252)\n");
        assert_matches!(
            &out.errors[0],
            ReplayError::Advance { source: crate::advance::AdvanceError::MissingRunner { base: Base::Third, .. }, .. }
        );
        // best-effort state exists, with nobody moved or retired
        let state = &out.states[0];
        assert_eq!(state.outs, 0);
        assert_eq!(state.runners, [None, None, None]);
    }

    #[test]
    fn test_play_after_final_is_error() {
        let out = replay("1 CX K\nfinal 0\n2 CX K\n");
        assert_eq!(out.states.len(), 1);
        assert_matches!(out.errors[0], ReplayError::PlayAfterFinal { .. });
    }

    #[test]
    fn test_alternative_replays_against_same_prior_state() {
        let out = replay("1 BBBB W\n2 CX 8/F8\nalt E8 B-2 1-3\n");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);

        let canonical = &out.states[1];
        assert_eq!(canonical.outs, 1);
        assert_eq!(canonical.runners[0].as_deref(), Some("1")); // fly out leaves runner

        let alternate = out.alternates[1].as_ref().unwrap();
        assert_eq!(alternate.prev, Some(1));
        assert_eq!(alternate.outs, 0);
        assert_eq!(alternate.batter.as_deref(), Some("2"));
        assert_eq!(alternate.runners[1].as_deref(), Some("2")); // batter to second
        assert_eq!(alternate.runners[2].as_deref(), Some("1")); // runner to third
    }

    #[test]
    fn test_second_alternative_rejected() {
        let out = replay("1 CX 8/F8\nalt E8 B-2\nalt E8 B-3\n");
        assert_matches!(out.errors[0], ReplayError::DuplicateAlternative { .. });
        assert!(out.alternates[0].is_some());
    }

    #[test]
    fn test_orphan_alternative_rejected() {
        let out = replay("alt E8 B-2\n");
        assert_matches!(out.errors[0], ReplayError::OrphanAlternative { .. });
    }

    #[test]
    fn test_runner_adjustment_at_half_start() {
        // extras-style placed runner scores on a double
        let out = replay("radj 55 2\n1 CX D8/L8 B-2 2-H\n");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
        let state = &out.states[0];
        assert_eq!(state.score, 1);
        assert_eq!(state.scored, vec!["55".to_string()]);
    }

    #[test]
    fn test_runner_adjustment_mid_inning_rejected() {
        let out = replay("1 BBBB W\nradj 55 2\n");
        assert_matches!(out.errors[0], ReplayError::RunnerAdjustmentMidInning { .. });
    }

    #[test]
    fn test_pitcher_change_carries_forward() {
        let out = replay("pitcher 34\n1 CX K\n2 CX K\n");
        assert_eq!(out.states[0].pitcher.as_deref(), Some("34"));
        assert_eq!(out.states[1].pitcher.as_deref(), Some("34"));
    }

    #[test]
    fn test_score_check_mismatch() {
        let out = replay("1 BBBB W\nscore 1-5\n");
        assert_matches!(
            out.errors[0],
            ReplayError::ScoreCheckMismatch { declared_runs: 5, actual_runs: 0, .. }
        );
        assert!(out.errors[0].is_validation());
    }

    #[test]
    fn test_score_check_match_passes() {
        let out = replay("1 CX H\nscore 1-1-0\n");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    }

    #[test]
    fn test_ball_in_play_pitch_marker_appended() {
        let out = replay("1 BC S6\n2 CX 8/F8\n");
        assert_eq!(out.states[0].pitches, "BCX");
        assert_eq!(out.states[1].pitches, "CX"); // already marked
    }

    #[test]
    fn test_incomplete_when_inning_ends_mid_appearance() {
        let out = replay(
            "1 BBBB W\n2 CX K\n3 CX K\n... B CS2(26)\n",
        );
        let state = out.states.last().unwrap();
        assert_eq!(state.outs, 3);
        assert!(!state.complete);
        assert!(state.incomplete);
        // plate appearance counter did not advance for the cut-off batter
        assert_eq!(state.pa_number, 3);
    }

    #[test]
    fn test_steal_does_not_complete_plate_appearance() {
        let out = replay("1 BBBB W\n2 B SB2\n");
        let state = &out.states[1];
        assert!(!state.complete);
        assert_eq!(state.pa_number, 1);
        assert_eq!(state.runners[1].as_deref(), Some("1"));
        assert_eq!(state.runners[0], None);
    }

    #[test]
    fn test_errors_do_not_stop_the_block() {
        let out = replay("1 CX ZZTOP\n2 CX K\n");
        assert_matches!(out.errors[0], ReplayError::Classify { .. });
        assert_eq!(out.states.len(), 2);
        assert_eq!(out.states[1].outs, 1);
    }
}
