//! Grammar-stage errors

use crate::config::constants::compile_time::grammar::*;
use crate::logging::{codes, Code};
use crate::utils::Span;

#[derive(Debug, Clone, thiserror::Error)]
pub enum GrammarError {
    #[error("Unexpected token '{found}' (expected {expected})")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        span: Span,
    },

    #[error("Malformed play line: {reason}")]
    MalformedPlayLine { reason: String, span: Span },

    #[error("Malformed '{command}' command: {reason}")]
    MalformedCommand {
        command: &'static str,
        reason: String,
        span: Span,
    },

    #[error("Too many team blocks: {count} (max {MAX_TEAM_BLOCKS})")]
    TooManyTeamBlocks { count: usize, span: Span },

    #[error("Too many events in team block '{team_id}': {count} (max {MAX_EVENTS_PER_BLOCK})")]
    TooManyEvents {
        team_id: String,
        count: usize,
        span: Span,
    },

    #[error("Document contains no tokens")]
    EmptyTokenStream,

    #[error("Too many parse errors: {count} (max {MAX_PARSE_ERRORS}), giving up")]
    TooManyErrors { count: usize },
}

impl GrammarError {
    pub fn error_code(&self) -> Code {
        match self {
            GrammarError::UnexpectedToken { .. } => codes::grammar::UNEXPECTED_TOKEN,
            GrammarError::MalformedPlayLine { .. } => codes::grammar::MALFORMED_PLAY_LINE,
            GrammarError::MalformedCommand { .. } => codes::grammar::MALFORMED_COMMAND,
            GrammarError::TooManyTeamBlocks { .. } => codes::grammar::TOO_MANY_TEAM_BLOCKS,
            GrammarError::TooManyEvents { .. } => codes::grammar::TOO_MANY_EVENTS,
            GrammarError::EmptyTokenStream => codes::grammar::EMPTY_TOKEN_STREAM,
            GrammarError::TooManyErrors { .. } => codes::grammar::TOO_MANY_ERRORS,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            GrammarError::UnexpectedToken { span, .. }
            | GrammarError::MalformedPlayLine { span, .. }
            | GrammarError::MalformedCommand { span, .. }
            | GrammarError::TooManyTeamBlocks { span, .. }
            | GrammarError::TooManyEvents { span, .. } => Some(*span),
            GrammarError::EmptyTokenStream | GrammarError::TooManyErrors { .. } => None,
        }
    }
}
