//! Runner-advance model and parser
//!
//! Advance codes describe one runner's (or the batter's) movement for a
//! play: `<from><X|-><to>[(<detail>)]` with `from` in `{B,1,2,3}`, `to` in
//! `{1,2,3,H}`, `X` for an out and `-` for a successful move. The detail
//! group carries the putout chain, `RINT`, `WP`, `PB` or a fielding-error
//! code depending on the outcome.

pub mod parser;

use serde::{Deserialize, Serialize};

pub use parser::{parse_advance, parse_advances, AdvanceError, RunnerContext};

/// A base position, including the batter's box and home plate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base {
    Batter,
    First,
    Second,
    Third,
    Home,
}

impl Base {
    /// Valid "from" bases for an advance code
    pub fn from_start_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'B' => Some(Base::Batter),
            '1' => Some(Base::First),
            '2' => Some(Base::Second),
            '3' => Some(Base::Third),
            _ => None,
        }
    }

    /// Valid "to" bases for an advance code
    pub fn from_end_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            '1' => Some(Base::First),
            '2' => Some(Base::Second),
            '3' => Some(Base::Third),
            'H' => Some(Base::Home),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Base::Batter => 'B',
            Base::First => '1',
            Base::Second => '2',
            Base::Third => '3',
            Base::Home => 'H',
        }
    }

    /// Index into the three-slot runner array, when this is an occupied base
    pub fn runner_slot(&self) -> Option<usize> {
        match self {
            Base::First => Some(0),
            Base::Second => Some(1),
            Base::Third => Some(2),
            Base::Batter | Base::Home => None,
        }
    }

    /// The next base in running order
    pub fn next(&self) -> Option<Self> {
        match self {
            Base::Batter => Some(Base::First),
            Base::First => Some(Base::Second),
            Base::Second => Some(Base::Third),
            Base::Third => Some(Base::Home),
            Base::Home => None,
        }
    }

    /// The base a runner stood on before stealing/being picked off this one
    pub fn previous(&self) -> Option<Self> {
        match self {
            Base::Second => Some(Base::First),
            Base::Third => Some(Base::Second),
            Base::Home => Some(Base::Third),
            Base::Batter | Base::First => None,
        }
    }

    /// Runner-movement pass order: lead runners move first so forced
    /// runners behind them are not advanced twice
    pub fn movement_order(&self) -> u8 {
        match self {
            Base::Third => 0,
            Base::Second => 1,
            Base::First => 2,
            Base::Batter => 3,
            Base::Home => 4,
        }
    }
}

impl std::fmt::Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A fielding error credited to one fielder, with optional modifier tags
/// (`TH` for a throwing error and the like)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldingError {
    pub fielder: u8,
    pub modifiers: Vec<String>,
}

impl FieldingError {
    pub fn new(fielder: u8) -> Self {
        Self {
            fielder,
            modifiers: Vec::new(),
        }
    }
}

impl std::fmt::Display for FieldingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{}", self.fielder)?;
        for modifier in &self.modifiers {
            write!(f, "/{modifier}")?;
        }
        Ok(())
    }
}

/// Why a successful advance happened, when the notation says so
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceCause {
    WildPitch,
    PassedBall,
    FieldingError(FieldingError),
}

/// One runner movement within a plate appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advance {
    pub from: Base,
    pub to: Base,
    pub out: bool,
    /// Putout chain in touch order; empty unless `out` and not interference
    pub fielders: Vec<u8>,
    pub runner_interference: bool,
    /// Synthesized from the play type rather than explicitly coded
    pub implied: bool,
    pub cause: Option<AdvanceCause>,
    /// Identity of the moving runner, resolved against the prior state
    pub runner: Option<String>,
}

impl Advance {
    pub fn new(from: Base, to: Base) -> Self {
        Self {
            from,
            to,
            out: false,
            fielders: Vec::new(),
            runner_interference: false,
            implied: false,
            cause: None,
            runner: None,
        }
    }

    pub fn implied(from: Base, to: Base) -> Self {
        let mut advance = Self::new(from, to);
        advance.implied = true;
        advance
    }

    pub fn out(from: Base, to: Base, fielders: Vec<u8>) -> Self {
        let mut advance = Self::new(from, to);
        advance.out = true;
        advance.fielders = fielders;
        advance
    }

    /// Whether this advance credits a run
    pub fn scores(&self) -> bool {
        self.to == Base::Home && !self.out
    }

    /// Re-derive the notation form of this advance
    pub fn code_string(&self) -> String {
        let mut code = format!(
            "{}{}{}",
            self.from,
            if self.out { 'X' } else { '-' },
            self.to
        );
        if self.out {
            if self.runner_interference {
                code.push_str("(RINT)");
            } else if !self.fielders.is_empty() {
                code.push('(');
                for fielder in &self.fielders {
                    code.push(char::from(b'0' + fielder));
                }
                code.push(')');
            }
        } else if let Some(cause) = &self.cause {
            match cause {
                AdvanceCause::WildPitch => code.push_str("(WP)"),
                AdvanceCause::PassedBall => code.push_str("(PB)"),
                AdvanceCause::FieldingError(error) => {
                    code.push('(');
                    code.push_str(&error.to_string());
                    code.push(')');
                }
            }
        }
        code
    }
}

/// Merge implied advances into the explicitly coded list. An explicit
/// advance from the same base wins; everything ends up in lead-runner-first
/// movement order.
pub fn merge_advances(explicit: Vec<Advance>, implied: Vec<Advance>) -> Vec<Advance> {
    let mut merged = explicit;
    for advance in implied {
        if !merged.iter().any(|a| a.from == advance.from) {
            merged.push(advance);
        }
    }
    merged.sort_by_key(|a| a.from.movement_order());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_chars() {
        assert_eq!(Base::from_start_char('B'), Some(Base::Batter));
        assert_eq!(Base::from_start_char('b'), Some(Base::Batter));
        assert_eq!(Base::from_start_char('H'), None);
        assert_eq!(Base::from_end_char('H'), Some(Base::Home));
        assert_eq!(Base::from_end_char('B'), None);
    }

    #[test]
    fn test_movement_order_lead_runner_first() {
        let mut bases = vec![Base::Batter, Base::First, Base::Third, Base::Second];
        bases.sort_by_key(Base::movement_order);
        assert_eq!(
            bases,
            vec![Base::Third, Base::Second, Base::First, Base::Batter]
        );
    }

    #[test]
    fn test_explicit_advance_wins_over_implied() {
        let explicit = vec![Advance::new(Base::Batter, Base::Second)];
        let implied = vec![
            Advance::implied(Base::Batter, Base::First),
            Advance::implied(Base::First, Base::Second),
        ];
        let merged = merge_advances(explicit, implied);
        assert_eq!(merged.len(), 2);
        let batter = merged.iter().find(|a| a.from == Base::Batter).unwrap();
        assert_eq!(batter.to, Base::Second);
        assert!(!batter.implied);
    }

    #[test]
    fn test_code_string_round_trip_shapes() {
        assert_eq!(
            Advance::out(Base::Second, Base::Third, vec![6, 3]).code_string(),
            "2X3(63)"
        );
        assert_eq!(Advance::new(Base::Batter, Base::First).code_string(), "B-1");
        let mut wp = Advance::new(Base::Third, Base::Home);
        wp.cause = Some(AdvanceCause::WildPitch);
        assert_eq!(wp.code_string(), "3-H(WP)");
    }
}
