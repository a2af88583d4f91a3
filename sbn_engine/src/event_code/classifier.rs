//! Event-code classification and implied-advance synthesis

use crate::advance::{parser::parse_fielding_error, Advance, Base, FieldingError};
use crate::event_code::patterns::find_match;
use crate::event_code::{Capture, Play, PlayType};
use crate::logging::{codes, Code};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifyError {
    #[error("Unknown event code '{code}'")]
    UnknownEventCode { code: String },

    #[error("Event code '{code}' requires a {expected} modifier")]
    MissingPlayModifier {
        code: String,
        expected: &'static str,
    },
}

impl ClassifyError {
    pub fn error_code(&self) -> Code {
        match self {
            ClassifyError::UnknownEventCode { .. } => codes::semantic::UNKNOWN_EVENT_CODE,
            ClassifyError::MissingPlayModifier { .. } => codes::semantic::MISSING_PLAY_MODIFIER,
        }
    }
}

/// Classify a full event code (shape segment plus `/`-joined modifiers)
pub fn classify(raw_code: &str) -> Result<Play, ClassifyError> {
    let mut segments = raw_code.split('/');
    let code = segments.next().unwrap_or_default();
    let modifiers: Vec<String> = segments
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let (mut play_type, captures) =
        find_match(code).ok_or_else(|| ClassifyError::UnknownEventCode {
            code: raw_code.to_string(),
        })?;

    let mut fielders: Vec<u8> = Vec::new();
    let mut bases: Vec<Base> = Vec::new();
    for capture in &captures {
        match capture {
            Capture::Fielder(f) => fielders.push(*f),
            Capture::Base(b) => bases.push(*b),
        }
    }

    match play_type {
        // A lone fielder is a fly out unless a ground-trajectory modifier
        // says otherwise
        PlayType::FlyOut if modifiers.iter().any(|m| m.starts_with('G')) => {
            play_type = PlayType::GroundOut;
        }
        // `K2$` is the catcher throwing the batter out; the catcher is
        // literal in the shape, so put him back at the head of the chain
        PlayType::StrikeOut if code.starts_with("K2") && code.len() == 3 => {
            fielders.insert(0, 2);
        }
        // Double/triple-play shapes are only accepted with their modifier
        PlayType::DoublePlay => {
            if !modifiers.iter().any(|m| matches!(m.as_str(), "GDP" | "LDP" | "FDP")) {
                return Err(ClassifyError::MissingPlayModifier {
                    code: raw_code.to_string(),
                    expected: "GDP, LDP or FDP",
                });
            }
        }
        PlayType::TriplePlay => {
            if !modifiers.iter().any(|m| matches!(m.as_str(), "GTP" | "LTP")) {
                return Err(ClassifyError::MissingPlayModifier {
                    code: raw_code.to_string(),
                    expected: "GTP or LTP",
                });
            }
        }
        _ => {}
    }

    let fielding_error = match play_type {
        PlayType::ReachedOnError | PlayType::FoulFlyError => {
            fielders.first().map(|f| FieldingError::new(*f))
        }
        _ => modifiers.iter().find_map(|m| parse_fielding_error(m)),
    };

    Ok(Play {
        play_type,
        raw_code: raw_code.to_string(),
        fielders,
        bases,
        captures,
        modifiers,
        fielding_error,
    })
}

/// Advances mandated by the play type but not explicitly coded. Runner
/// identities are resolved later, in one pass with the explicit advances.
pub fn implied_advances(play: &Play) -> Vec<Advance> {
    match play.play_type {
        PlayType::Single
        | PlayType::Walk
        | PlayType::IntentionalWalk
        | PlayType::HitByPitch
        | PlayType::CatcherInterference
        | PlayType::ReachedOnError
        | PlayType::FieldersChoice => vec![Advance::implied(Base::Batter, Base::First)],
        PlayType::Double => vec![Advance::implied(Base::Batter, Base::Second)],
        PlayType::Triple => vec![Advance::implied(Base::Batter, Base::Third)],
        PlayType::HomeRun => vec![Advance::implied(Base::Batter, Base::Home)],
        PlayType::StolenBase => play
            .bases
            .iter()
            .filter_map(|target| {
                target
                    .previous()
                    .map(|from| Advance::implied(from, *target))
            })
            .collect(),
        PlayType::CaughtStealing => play
            .bases
            .iter()
            .filter_map(|target| {
                target.previous().map(|from| {
                    let mut advance = Advance::out(from, *target, play.fielders.clone());
                    advance.implied = true;
                    advance
                })
            })
            .collect(),
        // A pickoff is an out without a base change
        PlayType::PickedOff => play
            .bases
            .iter()
            .map(|base| {
                let mut advance = Advance::out(*base, *base, play.fielders.clone());
                advance.implied = true;
                advance
            })
            .collect(),
        PlayType::DoublePlay | PlayType::TriplePlay => forced_runner_outs(play),
        _ => Vec::new(),
    }
}

/// Runner-out legs of a multi-out play. In `64(1)3` the fielders before
/// the parenthesized base made the putout on that runner; the trailing
/// fielders retired the batter, which the play type itself accounts for.
fn forced_runner_outs(play: &Play) -> Vec<Advance> {
    let mut advances = Vec::new();
    let mut chain: Vec<u8> = Vec::new();
    for capture in &play.captures {
        match capture {
            Capture::Fielder(f) => chain.push(*f),
            Capture::Base(base) => {
                let to = base.next().unwrap_or(Base::Home);
                let mut advance = Advance::out(*base, to, chain.clone());
                advance.implied = true;
                advances.push(advance);
                chain.clear();
            }
        }
    }
    advances
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_single_with_modifiers() {
        let play = classify("S6/G6/B").unwrap();
        assert_eq!(play.play_type, PlayType::Single);
        assert_eq!(play.fielders, vec![6]);
        assert_eq!(play.modifiers, vec!["G6", "B"]);
        assert_eq!(
            implied_advances(&play),
            vec![Advance::implied(Base::Batter, Base::First)]
        );
    }

    #[test]
    fn test_walk_implies_batter_to_first() {
        let play = classify("W").unwrap();
        assert_eq!(play.play_type, PlayType::Walk);
        let implied = implied_advances(&play);
        assert_eq!(implied.len(), 1);
        assert_eq!(implied[0].from, Base::Batter);
        assert_eq!(implied[0].to, Base::First);
        assert!(implied[0].implied);
    }

    #[test]
    fn test_catcher_interference_with_error_modifier() {
        let play = classify("C/E2").unwrap();
        assert_eq!(play.play_type, PlayType::CatcherInterference);
        assert_matches!(play.fielding_error, Some(ref error) => assert_eq!(error.fielder, 2));
        assert_eq!(
            implied_advances(&play),
            vec![Advance::implied(Base::Batter, Base::First)]
        );
    }

    #[test]
    fn test_lone_fielder_trajectory() {
        assert_eq!(classify("8").unwrap().play_type, PlayType::FlyOut);
        assert_eq!(classify("8/F8").unwrap().play_type, PlayType::FlyOut);
        assert_eq!(classify("3/G3").unwrap().play_type, PlayType::GroundOut);
        assert_eq!(classify("53/G5").unwrap().play_type, PlayType::GroundOut);
    }

    #[test]
    fn test_double_play_requires_modifier() {
        let play = classify("64(1)3/GDP").unwrap();
        assert_eq!(play.play_type, PlayType::DoublePlay);
        assert_eq!(play.play_type.batter_outs(), 1);

        let implied = implied_advances(&play);
        assert_eq!(implied.len(), 1);
        assert_eq!(implied[0].from, Base::First);
        assert_eq!(implied[0].to, Base::Second);
        assert!(implied[0].out);
        assert_eq!(implied[0].fielders, vec![6, 4]);

        assert_matches!(
            classify("64(1)3"),
            Err(ClassifyError::MissingPlayModifier { expected: "GDP, LDP or FDP", .. })
        );
    }

    #[test]
    fn test_triple_play_runner_legs() {
        let play = classify("5(2)4(1)3/GTP").unwrap();
        assert_eq!(play.play_type, PlayType::TriplePlay);
        let implied = implied_advances(&play);
        assert_eq!(implied.len(), 2);
        assert_eq!((implied[0].from, implied[0].fielders.clone()), (Base::Second, vec![5]));
        assert_eq!((implied[1].from, implied[1].fielders.clone()), (Base::First, vec![4]));
    }

    #[test]
    fn test_stolen_base_implies_move_from_previous_base() {
        let play = classify("SB2").unwrap();
        let implied = implied_advances(&play);
        assert_eq!(implied.len(), 1);
        assert_eq!(implied[0].from, Base::First);
        assert_eq!(implied[0].to, Base::Second);
        assert!(!implied[0].out);

        let double_steal = classify("SB3;SB2").unwrap();
        assert_eq!(implied_advances(&double_steal).len(), 2);
    }

    #[test]
    fn test_caught_stealing_is_an_out_with_putout_chain() {
        let play = classify("CSH(252)").unwrap();
        let implied = implied_advances(&play);
        assert_eq!(implied.len(), 1);
        assert_eq!(implied[0].from, Base::Third);
        assert_eq!(implied[0].to, Base::Home);
        assert!(implied[0].out);
        assert_eq!(implied[0].fielders, vec![2, 5, 2]);
    }

    #[test]
    fn test_pickoff_keeps_runner_base() {
        let play = classify("PO1(13)").unwrap();
        assert_eq!(play.play_type, PlayType::PickedOff);
        let implied = implied_advances(&play);
        assert_eq!(implied[0].from, Base::First);
        assert_eq!(implied[0].to, Base::First);
        assert!(implied[0].out);
    }

    #[test]
    fn test_strikeout_throw_out_includes_catcher() {
        let play = classify("K23").unwrap();
        assert_eq!(play.play_type, PlayType::StrikeOut);
        assert_eq!(play.fielders, vec![2, 3]);
    }

    #[test]
    fn test_reached_on_error_carries_fielding_error() {
        let play = classify("E4").unwrap();
        assert_eq!(play.play_type, PlayType::ReachedOnError);
        assert_matches!(play.fielding_error, Some(error) => assert_eq!(error.fielder, 4));
    }

    #[test]
    fn test_unknown_code() {
        assert_matches!(
            classify("ZZ9"),
            Err(ClassifyError::UnknownEventCode { code }) => assert_eq!(code, "ZZ9")
        );
    }

    #[test]
    fn test_plate_appearance_completion() {
        assert!(classify("K").unwrap().play_type.completes_plate_appearance());
        assert!(classify("S6").unwrap().play_type.completes_plate_appearance());
        assert!(!classify("SB2").unwrap().play_type.completes_plate_appearance());
        assert!(!classify("WP").unwrap().play_type.completes_plate_appearance());
        assert!(!classify("NP").unwrap().play_type.completes_plate_appearance());
    }
}
