//! Lexical analysis for the native notation

pub mod analyzer;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};
