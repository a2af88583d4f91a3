//! Shared primitive types for the lexer, parser, and replay machine.

pub mod span;

pub use span::{Position, Span, Spanned};
