//! Advance-code parser
//!
//! Character-level parser for `<from><X|-><to>[(<detail>)]`. Runner
//! identities are resolved here against the prior base occupancy so that a
//! reference to an empty base fails where the code appears, not later in
//! the replay.

use crate::advance::{Advance, AdvanceCause, Base, FieldingError};
use crate::logging::{codes, Code};

#[derive(Debug, Clone, thiserror::Error)]
pub enum AdvanceError {
    #[error("Malformed advance code '{code}': {reason}")]
    Malformed { code: String, reason: String },

    #[error("No runner on base {base} for advance '{code}'")]
    MissingRunner { base: Base, code: String },

    #[error("Duplicate advance from base {base}")]
    DuplicateAdvance { base: Base },
}

impl AdvanceError {
    pub fn error_code(&self) -> Code {
        match self {
            AdvanceError::Malformed { .. } => codes::semantic::MALFORMED_ADVANCE,
            AdvanceError::MissingRunner { .. } => codes::semantic::MISSING_RUNNER,
            AdvanceError::DuplicateAdvance { .. } => codes::semantic::DUPLICATE_ADVANCE,
        }
    }
}

/// Base occupancy the advances are resolved against: the batter plus the
/// prior state's three runner slots (first, second, third).
#[derive(Debug, Clone, Default)]
pub struct RunnerContext {
    pub batter: String,
    pub runners: [Option<String>; 3],
}

impl RunnerContext {
    pub fn new(batter: impl Into<String>, runners: [Option<String>; 3]) -> Self {
        Self {
            batter: batter.into(),
            runners,
        }
    }

    /// Resolve the identity moving from `base`; empty base is a hard error
    pub fn resolve(&self, base: Base, code: &str) -> Result<String, AdvanceError> {
        match base {
            Base::Batter => Ok(self.batter.clone()),
            _ => {
                let slot = base.runner_slot().ok_or_else(|| AdvanceError::Malformed {
                    code: code.to_string(),
                    reason: format!("cannot advance from {base}"),
                })?;
                self.runners[slot]
                    .clone()
                    .ok_or_else(|| AdvanceError::MissingRunner {
                        base,
                        code: code.to_string(),
                    })
            }
        }
    }
}

/// Parse one advance code without resolving the runner
pub fn parse_advance(code: &str) -> Result<Advance, AdvanceError> {
    let malformed = |reason: &str| AdvanceError::Malformed {
        code: code.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = code.chars();
    let from = chars
        .next()
        .and_then(Base::from_start_char)
        .ok_or_else(|| malformed("expected B, 1, 2 or 3"))?;
    let out = match chars.next() {
        Some('-') => false,
        Some('X') | Some('x') => true,
        _ => return Err(malformed("expected '-' or 'X'")),
    };
    let to = chars
        .next()
        .and_then(Base::from_end_char)
        .ok_or_else(|| malformed("expected 1, 2, 3 or H"))?;

    let mut advance = Advance::new(from, to);
    advance.out = out;

    let rest: String = chars.collect();
    if !rest.is_empty() {
        let detail = rest
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| malformed("detail must be parenthesized"))?;
        if detail.is_empty() {
            return Err(malformed("empty detail group"));
        }
        apply_detail(&mut advance, detail, code)?;
    }

    Ok(advance)
}

fn apply_detail(advance: &mut Advance, detail: &str, code: &str) -> Result<(), AdvanceError> {
    let malformed = |reason: String| AdvanceError::Malformed {
        code: code.to_string(),
        reason,
    };

    if advance.out {
        if detail == "RINT" {
            advance.runner_interference = true;
            return Ok(());
        }
        advance.fielders = detail
            .chars()
            .map(|c| match c {
                '1'..='9' => Ok(c as u8 - b'0'),
                _ => Err(malformed(format!(
                    "putout chain must be fielder digits, got '{detail}'"
                ))),
            })
            .collect::<Result<_, _>>()?;
        return Ok(());
    }

    advance.cause = Some(match detail {
        "WP" => AdvanceCause::WildPitch,
        "PB" => AdvanceCause::PassedBall,
        _ => {
            let error = parse_fielding_error(detail)
                .ok_or_else(|| malformed(format!("unrecognized advance detail '{detail}'")))?;
            AdvanceCause::FieldingError(error)
        }
    });
    Ok(())
}

/// `E<digit>[/modifier...]`, shared with the event-code classifier
pub(crate) fn parse_fielding_error(detail: &str) -> Option<FieldingError> {
    let rest = detail.strip_prefix('E')?;
    let mut parts = rest.split('/');
    let fielder = parts.next()?;
    if fielder.len() != 1 {
        return None;
    }
    let digit = fielder.chars().next()?;
    if !('1'..='9').contains(&digit) {
        return None;
    }
    Some(FieldingError {
        fielder: digit as u8 - b'0',
        modifiers: parts
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Parse a plate appearance's advance codes and resolve each runner.
/// At most one advance per "from" base.
pub fn parse_advances(
    codes: &[String],
    context: &RunnerContext,
) -> Result<Vec<Advance>, AdvanceError> {
    let mut advances: Vec<Advance> = Vec::with_capacity(codes.len());
    for code in codes {
        let mut advance = parse_advance(code)?;
        if advances.iter().any(|a| a.from == advance.from) {
            return Err(AdvanceError::DuplicateAdvance { base: advance.from });
        }
        advance.runner = Some(context.resolve(advance.from, code)?);
        advances.push(advance);
    }
    Ok(advances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn context() -> RunnerContext {
        RunnerContext::new(
            "9",
            [Some("4".to_string()), Some("7".to_string()), None],
        )
    }

    #[test]
    fn test_simple_advance() {
        let advance = parse_advance("B-1").unwrap();
        assert_eq!(advance.from, Base::Batter);
        assert_eq!(advance.to, Base::First);
        assert!(!advance.out);
        assert!(advance.fielders.is_empty());
    }

    #[test]
    fn test_out_with_putout_chain() {
        let advance = parse_advance("2X3(635)").unwrap();
        assert_eq!(advance.from, Base::Second);
        assert_eq!(advance.to, Base::Third);
        assert!(advance.out);
        assert_eq!(advance.fielders, vec![6, 3, 5]);
    }

    #[test]
    fn test_runner_interference() {
        let advance = parse_advance("1X2(RINT)").unwrap();
        assert!(advance.out);
        assert!(advance.runner_interference);
        assert!(advance.fielders.is_empty());
    }

    #[test]
    fn test_fielding_error_with_modifier() {
        let advance = parse_advance("1-3(E3/TH)").unwrap();
        assert!(!advance.out);
        assert_matches!(advance.cause, Some(AdvanceCause::FieldingError(error)) => {
            assert_eq!(error.fielder, 3);
            assert_eq!(error.modifiers, vec!["TH"]);
        });
    }

    #[test]
    fn test_wild_pitch_and_passed_ball() {
        assert_matches!(
            parse_advance("3-H(WP)").unwrap().cause,
            Some(AdvanceCause::WildPitch)
        );
        assert_matches!(
            parse_advance("2-3(PB)").unwrap().cause,
            Some(AdvanceCause::PassedBall)
        );
    }

    #[test]
    fn test_lowercase_accepted() {
        let advance = parse_advance("bx2(64)").unwrap();
        assert_eq!(advance.from, Base::Batter);
        assert!(advance.out);
        assert_eq!(advance.fielders, vec![6, 4]);
    }

    #[test]
    fn test_malformed_shapes() {
        assert_matches!(parse_advance("4-5"), Err(AdvanceError::Malformed { .. }));
        assert_matches!(parse_advance("B-B"), Err(AdvanceError::Malformed { .. }));
        assert_matches!(parse_advance("B-1(63"), Err(AdvanceError::Malformed { .. }));
        assert_matches!(
            parse_advance("1-2(XY)"),
            Err(AdvanceError::Malformed { .. })
        );
        assert_matches!(
            parse_advance("1X2(6a)"),
            Err(AdvanceError::Malformed { .. })
        );
    }

    #[test]
    fn test_round_trip_preserves_from_to_out() {
        for code in ["B-1", "2X3(635)", "3-H(WP)", "1-3(E3/TH)", "1X2(RINT)"] {
            let first = parse_advance(code).unwrap();
            let second = parse_advance(&first.code_string()).unwrap();
            assert_eq!((first.from, first.to, first.out), (second.from, second.to, second.out));
        }
    }

    #[test]
    fn test_runner_resolution() {
        let advances = parse_advances(
            &["B-1".to_string(), "1-2".to_string()],
            &context(),
        )
        .unwrap();
        assert_eq!(advances[0].runner.as_deref(), Some("9"));
        assert_eq!(advances[1].runner.as_deref(), Some("4"));
    }

    #[test]
    fn test_missing_runner_is_hard_error() {
        let result = parse_advances(&["3-H".to_string()], &context());
        assert_matches!(result, Err(AdvanceError::MissingRunner { base: Base::Third, .. }));
    }

    #[test]
    fn test_duplicate_from_base_rejected() {
        let result = parse_advances(&["1-2".to_string(), "1-3".to_string()], &context());
        assert_matches!(result, Err(AdvanceError::DuplicateAdvance { base: Base::First }));
    }
}
