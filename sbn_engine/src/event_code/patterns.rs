//! Shape-pattern table for event codes
//!
//! Pattern syntax: `$` matches one fielder digit (1-9), `%` matches one
//! base token (B/1/2/3/H), everything else matches literally. The table is
//! fixed, built into the binary, and evaluated top to bottom with the
//! first full match winning, so specific shapes sit above generic ones.
//! Being immutable data it is shared freely across threads.

use crate::advance::Base;
use crate::event_code::{Capture, PlayType};

/// (shape, play type) in priority order
pub static PATTERNS: &[(&str, PlayType)] = &[
    // Baserunning plays with base captures
    ("SB%;SB%;SB%", PlayType::StolenBase),
    ("SB%;SB%", PlayType::StolenBase),
    ("SB%", PlayType::StolenBase),
    ("CS%($$$)", PlayType::CaughtStealing),
    ("CS%($$)", PlayType::CaughtStealing),
    ("CS%($)", PlayType::CaughtStealing),
    ("CS%", PlayType::CaughtStealing),
    ("PO%($$$)", PlayType::PickedOff),
    ("PO%($$)", PlayType::PickedOff),
    ("PO%($)", PlayType::PickedOff),
    // Strikeout variants, most specific first
    ("K2$", PlayType::StrikeOut),
    ("K+WP", PlayType::StrikeOutWildPitch),
    ("K+PB", PlayType::StrikeOutPassedBall),
    ("K", PlayType::StrikeOut),
    // Literal no-contact codes
    ("IW", PlayType::IntentionalWalk),
    ("WP", PlayType::WildPitch),
    ("W", PlayType::Walk),
    ("HP", PlayType::HitByPitch),
    ("HR", PlayType::HomeRun),
    ("H", PlayType::HomeRun),
    ("PB", PlayType::PassedBall),
    ("NP", PlayType::NoPlay),
    ("BK", PlayType::Balk),
    ("DI", PlayType::DefensiveIndifference),
    ("OA", PlayType::OtherAdvance),
    // Batted-ball codes with fielder captures
    ("FLE$", PlayType::FoulFlyError),
    ("FC$", PlayType::FieldersChoice),
    ("S$", PlayType::Single),
    ("D$", PlayType::Double),
    ("T$", PlayType::Triple),
    ("E$", PlayType::ReachedOnError),
    ("C", PlayType::CatcherInterference),
    // Multi-out plays: the parenthesized base names the runner put out
    ("$(%)$(%)$", PlayType::TriplePlay),
    ("$$(%)$(%)$", PlayType::TriplePlay),
    ("$(%)$$", PlayType::DoublePlay),
    ("$$(%)$", PlayType::DoublePlay),
    ("$(%)$", PlayType::DoublePlay),
    // Bare putout chains
    ("$$$", PlayType::GroundOut),
    ("$$", PlayType::GroundOut),
    ("$", PlayType::FlyOut),
];

/// Match one code (modifier suffix already stripped) against a shape.
/// Returns the captures in source order on a full match.
pub fn match_shape(shape: &str, code: &str) -> Option<Vec<Capture>> {
    let mut captures = Vec::new();
    let mut code_chars = code.chars();

    for expected in shape.chars() {
        let actual = code_chars.next()?;
        match expected {
            '$' => match actual {
                '1'..='9' => captures.push(Capture::Fielder(actual as u8 - b'0')),
                _ => return None,
            },
            '%' => {
                let base = match actual.to_ascii_uppercase() {
                    'B' => Base::Batter,
                    '1' => Base::First,
                    '2' => Base::Second,
                    '3' => Base::Third,
                    'H' => Base::Home,
                    _ => return None,
                };
                captures.push(Capture::Base(base));
            }
            _ if expected == actual => {}
            _ => return None,
        }
    }

    // Full match only; leftover code characters reject the shape
    if code_chars.next().is_some() {
        return None;
    }
    Some(captures)
}

/// First matching table entry for a code
pub fn find_match(code: &str) -> Option<(PlayType, Vec<Capture>)> {
    PATTERNS
        .iter()
        .find_map(|(shape, play_type)| match_shape(shape, code).map(|c| (*play_type, c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_codes() {
        assert_eq!(find_match("K").map(|m| m.0), Some(PlayType::StrikeOut));
        assert_eq!(find_match("W").map(|m| m.0), Some(PlayType::Walk));
        assert_eq!(find_match("WP").map(|m| m.0), Some(PlayType::WildPitch));
        assert_eq!(find_match("HP").map(|m| m.0), Some(PlayType::HitByPitch));
        assert_eq!(find_match("H").map(|m| m.0), Some(PlayType::HomeRun));
        assert_eq!(find_match("HR").map(|m| m.0), Some(PlayType::HomeRun));
        assert_eq!(
            find_match("C").map(|m| m.0),
            Some(PlayType::CatcherInterference)
        );
    }

    #[test]
    fn test_fielder_captures() {
        let (play_type, captures) = find_match("S6").unwrap();
        assert_eq!(play_type, PlayType::Single);
        assert_eq!(captures, vec![Capture::Fielder(6)]);

        let (play_type, captures) = find_match("643").unwrap();
        assert_eq!(play_type, PlayType::GroundOut);
        assert_eq!(captures.len(), 3);

        let (play_type, _) = find_match("8").unwrap();
        assert_eq!(play_type, PlayType::FlyOut);
    }

    #[test]
    fn test_base_captures() {
        let (play_type, captures) = find_match("SB2").unwrap();
        assert_eq!(play_type, PlayType::StolenBase);
        assert_eq!(captures, vec![Capture::Base(Base::Second)]);

        let (play_type, captures) = find_match("CSH(252)").unwrap();
        assert_eq!(play_type, PlayType::CaughtStealing);
        assert_eq!(
            captures,
            vec![
                Capture::Base(Base::Home),
                Capture::Fielder(2),
                Capture::Fielder(5),
                Capture::Fielder(2),
            ]
        );
    }

    #[test]
    fn test_double_steal_shape() {
        let (play_type, captures) = find_match("SB3;SB2").unwrap();
        assert_eq!(play_type, PlayType::StolenBase);
        assert_eq!(
            captures,
            vec![Capture::Base(Base::Third), Capture::Base(Base::Second)]
        );
    }

    #[test]
    fn test_double_play_shapes() {
        assert_eq!(find_match("64(1)3").map(|m| m.0), Some(PlayType::DoublePlay));
        assert_eq!(find_match("6(1)43").map(|m| m.0), Some(PlayType::DoublePlay));
        assert_eq!(
            find_match("5(2)4(1)3").map(|m| m.0),
            Some(PlayType::TriplePlay)
        );
    }

    #[test]
    fn test_strikeout_throw_out_beats_plain_strikeout() {
        let (play_type, captures) = find_match("K23").unwrap();
        assert_eq!(play_type, PlayType::StrikeOut);
        assert_eq!(captures, vec![Capture::Fielder(3)]);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(find_match("ZZZ"), None);
        assert_eq!(find_match(""), None);
        assert_eq!(find_match("S0"), None);
        assert_eq!(find_match("SB5"), None);
    }
}
