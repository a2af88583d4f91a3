//! Event/play-code classification
//!
//! An event code names what happened on the pitch that ended in a fielding
//! result (`S6`, `K`, `64(1)3/GDP`). The classifier matches the code
//! against a fixed table of shape patterns and produces a typed `Play`
//! plus the fielder digits and base tokens the shape captured.

pub mod classifier;
pub mod patterns;

use serde::{Deserialize, Serialize};

use crate::advance::{Base, FieldingError};

pub use classifier::{classify, implied_advances, ClassifyError};

/// What kind of play an event code names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayType {
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
    IntentionalWalk,
    HitByPitch,
    CatcherInterference,
    StrikeOut,
    StrikeOutWildPitch,
    StrikeOutPassedBall,
    GroundOut,
    FlyOut,
    DoublePlay,
    TriplePlay,
    StolenBase,
    CaughtStealing,
    PickedOff,
    ReachedOnError,
    FieldersChoice,
    WildPitch,
    PassedBall,
    FoulFlyError,
    NoPlay,
    Balk,
    DefensiveIndifference,
    OtherAdvance,
}

impl PlayType {
    /// Whether this play ends the batter's turn at the plate
    pub fn completes_plate_appearance(&self) -> bool {
        !matches!(
            self,
            PlayType::StolenBase
                | PlayType::CaughtStealing
                | PlayType::PickedOff
                | PlayType::WildPitch
                | PlayType::PassedBall
                | PlayType::FoulFlyError
                | PlayType::NoPlay
                | PlayType::Balk
                | PlayType::DefensiveIndifference
                | PlayType::OtherAdvance
        )
    }

    /// Outs charged to the batter by the play type itself. Runner outs are
    /// carried by advances, never counted here.
    pub fn batter_outs(&self) -> u8 {
        match self {
            PlayType::StrikeOut
            | PlayType::StrikeOutWildPitch
            | PlayType::StrikeOutPassedBall
            | PlayType::GroundOut
            | PlayType::FlyOut
            | PlayType::DoublePlay
            | PlayType::TriplePlay => 1,
            _ => 0,
        }
    }

    /// Whether the ball was put in play (pitch-sequence normalization)
    pub fn is_ball_in_play(&self) -> bool {
        matches!(
            self,
            PlayType::Single
                | PlayType::Double
                | PlayType::Triple
                | PlayType::HomeRun
                | PlayType::GroundOut
                | PlayType::FlyOut
                | PlayType::DoublePlay
                | PlayType::TriplePlay
                | PlayType::ReachedOnError
                | PlayType::FieldersChoice
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayType::Single => "single",
            PlayType::Double => "double",
            PlayType::Triple => "triple",
            PlayType::HomeRun => "home run",
            PlayType::Walk => "walk",
            PlayType::IntentionalWalk => "intentional walk",
            PlayType::HitByPitch => "hit by pitch",
            PlayType::CatcherInterference => "catcher interference",
            PlayType::StrikeOut => "strikeout",
            PlayType::StrikeOutWildPitch => "strikeout + wild pitch",
            PlayType::StrikeOutPassedBall => "strikeout + passed ball",
            PlayType::GroundOut => "ground out",
            PlayType::FlyOut => "fly out",
            PlayType::DoublePlay => "double play",
            PlayType::TriplePlay => "triple play",
            PlayType::StolenBase => "stolen base",
            PlayType::CaughtStealing => "caught stealing",
            PlayType::PickedOff => "picked off",
            PlayType::ReachedOnError => "reached on error",
            PlayType::FieldersChoice => "fielder's choice",
            PlayType::WildPitch => "wild pitch",
            PlayType::PassedBall => "passed ball",
            PlayType::FoulFlyError => "foul fly error",
            PlayType::NoPlay => "no play",
            PlayType::Balk => "balk",
            PlayType::DefensiveIndifference => "defensive indifference",
            PlayType::OtherAdvance => "other advance",
        }
    }
}

impl std::fmt::Display for PlayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value captured by a shape pattern, in source order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capture {
    Fielder(u8),
    Base(Base),
}

/// A classified play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub play_type: PlayType,
    /// The full code including the modifier suffix
    pub raw_code: String,
    /// Captured fielder digits in source order
    pub fielders: Vec<u8>,
    /// Captured base tokens in source order
    pub bases: Vec<Base>,
    /// All captures interleaved as they appeared in the code
    pub captures: Vec<Capture>,
    /// Modifier tags after the first `/`
    pub modifiers: Vec<String>,
    pub fielding_error: Option<FieldingError>,
}

impl Play {
    pub fn has_modifier(&self, tag: &str) -> bool {
        self.modifiers.iter().any(|m| m == tag)
    }
}
