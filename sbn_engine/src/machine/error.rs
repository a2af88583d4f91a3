//! Replay-stage errors
//!
//! Semantic and validation errors are collected against source positions
//! during replay; none of them stops the machine, which continues with
//! best-effort state so every independent problem in a file surfaces.

use crate::advance::AdvanceError;
use crate::config::constants::compile_time::machine::MAX_INNINGS;
use crate::event_code::ClassifyError;
use crate::logging::{codes, Code};
use crate::utils::Span;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReplayError {
    #[error("{source}")]
    Classify {
        #[source]
        source: ClassifyError,
        span: Span,
    },

    #[error("{source}")]
    Advance {
        #[source]
        source: AdvanceError,
        span: Span,
    },

    #[error("Play recorded after the side's final out")]
    PlayAfterFinal { span: Span },

    #[error("Second alternative for the same plate appearance")]
    DuplicateAlternative { span: Span },

    #[error("Alternative with no preceding plate appearance")]
    OrphanAlternative { span: Span },

    #[error("Runner adjustment is only legal at the start of a half-inning")]
    RunnerAdjustmentMidInning { span: Span },

    #[error("Inning {inning} exceeds the replay ceiling of {MAX_INNINGS}")]
    InningsCeiling { inning: u8, span: Span },

    #[error(
        "Score check mismatch: declared inning {declared_inning} with {declared_runs} runs, \
         replay has inning {actual_inning} with {actual_runs} runs"
    )]
    ScoreCheckMismatch {
        declared_inning: u8,
        declared_runs: u32,
        actual_inning: u8,
        actual_runs: u32,
        span: Span,
    },

    #[error("Out-count check mismatch: declared {declared}, replay has {actual}")]
    OutsCheckMismatch { declared: u8, actual: u8, span: Span },
}

impl ReplayError {
    pub fn error_code(&self) -> Code {
        match self {
            ReplayError::Classify { source, .. } => source.error_code(),
            ReplayError::Advance { source, .. } => source.error_code(),
            ReplayError::PlayAfterFinal { .. } => codes::semantic::PLAY_AFTER_FINAL,
            ReplayError::DuplicateAlternative { .. } => codes::semantic::DUPLICATE_ALTERNATIVE,
            ReplayError::OrphanAlternative { .. } => codes::semantic::ORPHAN_ALTERNATIVE,
            ReplayError::RunnerAdjustmentMidInning { .. } => {
                codes::semantic::RUNNER_ADJUSTMENT_MID_INNING
            }
            ReplayError::InningsCeiling { .. } => codes::semantic::INNINGS_CEILING,
            ReplayError::ScoreCheckMismatch { .. } | ReplayError::OutsCheckMismatch { .. } => {
                codes::validation::SCORE_CHECK_MISMATCH
            }
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ReplayError::Classify { span, .. }
            | ReplayError::Advance { span, .. }
            | ReplayError::PlayAfterFinal { span }
            | ReplayError::DuplicateAlternative { span }
            | ReplayError::OrphanAlternative { span }
            | ReplayError::RunnerAdjustmentMidInning { span }
            | ReplayError::InningsCeiling { span, .. }
            | ReplayError::ScoreCheckMismatch { span, .. }
            | ReplayError::OutsCheckMismatch { span, .. } => *span,
        }
    }

    /// Document-level sanity failure rather than a structural one
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReplayError::ScoreCheckMismatch { .. } | ReplayError::OutsCheckMismatch { .. }
        )
    }
}
