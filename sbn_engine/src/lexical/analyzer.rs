//! Core lexical analyzer for the scorebook notation
//!
//! The notation is line-oriented and the lexer runs as a small set of named
//! modes: header mode (`key: value` lines until `---`), events mode (line
//! starters: `plays`, special-command keywords, plate-appearance markers),
//! plate-appearance mode (advance-shaped tokens vs generic words, `:`/`--`
//! trailing-comment marker), and comment mode (free text to end of line).
//! Any byte sequence matching no rule in the active mode is a terminal lex
//! error for the file.

use crate::config::constants::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::logging::codes;
use crate::tokens::{Keyword, SpannedToken, Token, TokenStream};
use crate::utils::{Position, Span, Spanned};
use crate::{log_debug, log_error, log_success};

/// Lexical analysis errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid character sequence '{text}' at line {line}, column {column}")]
    InvalidCharacter {
        text: String,
        line: u32,
        column: u32,
    },

    #[error("Malformed header line at line {line} (expected 'key: value' or '---')")]
    HeaderSyntax { line: u32 },

    #[error("Trailing comment too long: {length} characters (max {MAX_COMMENT_LENGTH})")]
    CommentTooLong { length: usize, line: u32 },

    #[error("Token too long: '{text}' ({length} characters, max {MAX_WORD_LENGTH})")]
    WordTooLong {
        text: String,
        length: usize,
        line: u32,
    },

    #[error("Property value too long at line {line}: {length} characters (max {MAX_PROPERTY_LENGTH})")]
    PropertyTooLong { length: usize, line: u32 },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::HeaderSyntax { .. } => codes::lexical::HEADER_SYNTAX,
            LexerError::CommentTooLong { .. } => codes::lexical::COMMENT_TOO_LONG,
            LexerError::WordTooLong { .. } => codes::lexical::WORD_TOO_LONG,
            LexerError::PropertyTooLong { .. } => codes::lexical::PROPERTY_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    /// The line the error points at, when positional
    pub fn line(&self) -> Option<u32> {
        match self {
            LexerError::InvalidCharacter { line, .. }
            | LexerError::HeaderSyntax { line }
            | LexerError::CommentTooLong { line, .. }
            | LexerError::WordTooLong { line, .. }
            | LexerError::PropertyTooLong { line, .. } => Some(*line),
            LexerError::TooManyTokens { .. } => None,
        }
    }
}

/// Lexer modes; header is the entry mode, the rest are per-line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Header,
    Events,
}

/// Essential lexical metrics
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub property_tokens: usize,
    pub keyword_tokens: usize,
    pub advance_tokens: usize,
    pub word_tokens: usize,
    pub comment_count: usize,
}

impl LexicalMetrics {
    fn record(&mut self, token: &Token) {
        self.total_tokens += 1;
        match token {
            Token::PropertyKey(_) | Token::PropertyValue(_) => self.property_tokens += 1,
            Token::Keyword(_) => self.keyword_tokens += 1,
            Token::Advance(_) => self.advance_tokens += 1,
            Token::Word(_) | Token::Number(_) | Token::Continuation => self.word_tokens += 1,
            Token::Comment(_) => self.comment_count += 1,
            _ => {}
        }
    }
}

/// Mode-switching lexical analyzer
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences: LexicalPreferences::default(),
        }
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Get metrics from the last tokenization
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Tokenize a file processing result
    pub fn tokenize_file_result(
        &mut self,
        file_result: &FileProcessingResult,
    ) -> Result<TokenStream, LexerError> {
        let file_path = file_result.metadata.path.display().to_string();
        log_debug!("Starting lexical analysis",
            "file" => file_path.as_str(),
            "lines" => file_result.metadata.line_count
        );

        let stream = self.tokenize(&file_result.source)?;

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed",
            "file" => file_path.as_str(),
            "tokens" => stream.len(),
            "properties" => self.metrics.property_tokens,
            "keywords" => self.metrics.keyword_tokens,
            "advances" => self.metrics.advance_tokens,
            "comments" => self.metrics.comment_count
        );

        Ok(stream)
    }

    /// Tokenize raw notation source
    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, LexerError> {
        self.metrics = LexicalMetrics::default();

        let mut tokens: Vec<SpannedToken> = Vec::new();
        let mut mode = Mode::Header;
        let mut line_start = 0usize;
        let mut line_no = 1u32;

        for raw_line in source.split_inclusive('\n') {
            let line = raw_line.strip_suffix('\n').unwrap_or(raw_line);
            let line = line.strip_suffix('\r').unwrap_or(line);

            match mode {
                Mode::Header => {
                    self.lex_header_line(line, line_start, line_no, &mut tokens, &mut mode)?
                }
                Mode::Events => self.lex_event_line(line, line_start, line_no, &mut tokens)?,
            }

            if tokens.len() >= MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens {
                    count: tokens.len(),
                };
                log_error!(error.error_code(), "Token limit exceeded",
                    "count" => tokens.len(),
                    "limit" => MAX_TOKEN_COUNT
                );
                return Err(error);
            }

            // Every physical line ends in a Newline token
            let nl_pos = Position::new(line_start + line.len(), line_no, line.len() as u32 + 1);
            self.push(&mut tokens, Token::Newline, Span::single(nl_pos));

            line_start += raw_line.len();
            line_no += 1;
        }

        let eof_pos = Position::new(source.len(), line_no, 1);
        self.push(&mut tokens, Token::Eof, Span::new(eof_pos, eof_pos));

        Ok(TokenStream::new(tokens))
    }

    fn push(&mut self, tokens: &mut Vec<SpannedToken>, token: Token, span: Span) {
        if self.preferences.collect_detailed_metrics {
            self.metrics.record(&token);
        } else {
            self.metrics.total_tokens += 1;
        }
        tokens.push(Spanned::new(token, span));
    }

    // ========================================================================
    // Header mode
    // ========================================================================

    fn lex_header_line(
        &mut self,
        line: &str,
        line_start: usize,
        line_no: u32,
        tokens: &mut Vec<SpannedToken>,
        mode: &mut Mode,
    ) -> Result<(), LexerError> {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            return Ok(());
        }

        if trimmed == "---" {
            let start = Position::new(line_start, line_no, 1);
            let end = Position::new(line_start + 3, line_no, 4);
            self.push(tokens, Token::Separator, Span::new(start, end));
            *mode = Mode::Events;
            return Ok(());
        }

        let (key, value) = trimmed
            .split_once(':')
            .ok_or(LexerError::HeaderSyntax { line: line_no })?;

        let key = key.trim_end();
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(LexerError::HeaderSyntax { line: line_no });
        }

        let value = value.trim();
        if value.len() > MAX_PROPERTY_LENGTH {
            return Err(LexerError::PropertyTooLong {
                length: value.len(),
                line: line_no,
            });
        }

        let key_start = Position::new(line_start, line_no, 1);
        let key_end = Position::new(line_start + key.len(), line_no, key.len() as u32 + 1);
        self.push(
            tokens,
            Token::PropertyKey(key.to_string()),
            Span::new(key_start, key_end),
        );

        let value_offset = line_start + trimmed.len() - value.len();
        let value_start = Position::new(
            value_offset,
            line_no,
            (trimmed.len() - value.len()) as u32 + 1,
        );
        let value_end = Position::new(
            value_offset + value.len(),
            line_no,
            trimmed.len() as u32 + 1,
        );
        self.push(
            tokens,
            Token::PropertyValue(value.to_string()),
            Span::new(value_start, value_end),
        );

        Ok(())
    }

    // ========================================================================
    // Events + plate-appearance modes
    // ========================================================================

    fn lex_event_line(
        &mut self,
        line: &str,
        line_start: usize,
        line_no: u32,
        tokens: &mut Vec<SpannedToken>,
    ) -> Result<(), LexerError> {
        let mut words = WordScanner::new(line, line_start, line_no);

        let Some((first, first_span)) = words.next_word() else {
            return Ok(()); // blank line; parser records an Empty event
        };

        // Line-start rules: keyword, plate-appearance marker, or continuation
        let first_token = if let Some(kw) = Keyword::from_word(first) {
            Token::Keyword(kw)
        } else if is_plate_appearance_number(first) {
            Token::Number(first.to_string())
        } else if first == "..." {
            Token::Continuation
        } else {
            let error = LexerError::InvalidCharacter {
                text: first.to_string(),
                line: line_no,
                column: first_span.start.column,
            };
            if self.preferences.include_position_in_errors {
                log_error!(error.error_code(), "Unrecognized event-line start",
                    span = first_span,
                    "text" => first
                );
            } else {
                log_error!(error.error_code(), "Unrecognized event-line start", "text" => first);
            }
            return Err(error);
        };
        self.push(tokens, first_token, first_span);

        // Plate-appearance mode: the rest of the line
        while let Some((word, span)) = words.next_word() {
            if word == ":" || word == "--" {
                let comment = words.rest_of_line();
                if comment.len() > MAX_COMMENT_LENGTH {
                    return Err(LexerError::CommentTooLong {
                        length: comment.len(),
                        line: line_no,
                    });
                }
                let comment_span = words.rest_span(span);
                self.push(tokens, Token::Comment(comment), comment_span);
                break;
            }

            if word.len() > MAX_WORD_LENGTH {
                return Err(LexerError::WordTooLong {
                    text: word.chars().take(16).collect(),
                    length: word.len(),
                    line: line_no,
                });
            }

            if !word.chars().all(|c| c.is_ascii_graphic()) {
                return Err(LexerError::InvalidCharacter {
                    text: word.to_string(),
                    line: line_no,
                    column: span.start.column,
                });
            }

            let token = if is_advance_shaped(word) {
                Token::Advance(word.to_string())
            } else {
                Token::Word(word.to_string())
            };
            self.push(tokens, token, span);
        }

        Ok(())
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Plate-appearance marker: `[1-9][0-9]*`
fn is_plate_appearance_number(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some('1'..='9')) && chars.all(|c| c.is_ascii_digit())
}

/// Advance-shaped token: `[Bb123][-Xx][123Hh]` plus optional `(detail)`
fn is_advance_shaped(word: &str) -> bool {
    let b = word.as_bytes();
    if b.len() < 3 {
        return false;
    }
    let shaped = matches!(b[0], b'B' | b'b' | b'1'..=b'3')
        && matches!(b[1], b'-' | b'X' | b'x')
        && matches!(b[2], b'1'..=b'3' | b'H' | b'h');
    if !shaped {
        return false;
    }
    b.len() == 3 || (b[3] == b'(' && b[b.len() - 1] == b')')
}

/// Whitespace-delimited word scanner with span tracking for one line
struct WordScanner<'a> {
    line: &'a str,
    line_start: usize,
    line_no: u32,
    cursor: usize,
}

impl<'a> WordScanner<'a> {
    fn new(line: &'a str, line_start: usize, line_no: u32) -> Self {
        Self {
            line,
            line_start,
            line_no,
            cursor: 0,
        }
    }

    fn next_word(&mut self) -> Option<(&'a str, Span)> {
        let bytes = self.line.as_bytes();
        while self.cursor < bytes.len() && (bytes[self.cursor] == b' ' || bytes[self.cursor] == b'\t')
        {
            self.cursor += 1;
        }
        if self.cursor >= bytes.len() {
            return None;
        }
        let start = self.cursor;
        while self.cursor < bytes.len()
            && bytes[self.cursor] != b' '
            && bytes[self.cursor] != b'\t'
        {
            self.cursor += 1;
        }
        let word = &self.line[start..self.cursor];
        let span = Span::new(
            Position::new(self.line_start + start, self.line_no, start as u32 + 1),
            Position::new(
                self.line_start + self.cursor,
                self.line_no,
                self.cursor as u32 + 1,
            ),
        );
        Some((word, span))
    }

    /// Everything after the comment marker, trimmed
    fn rest_of_line(&mut self) -> String {
        let rest = self.line[self.cursor.min(self.line.len())..].trim().to_string();
        self.cursor = self.line.len();
        rest
    }

    fn rest_span(&self, marker_span: Span) -> Span {
        let end = Position::new(
            self.line_start + self.line.len(),
            self.line_no,
            self.line.len() as u32 + 1,
        );
        Span::new(marker_span.start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn tokenize(source: &str) -> Vec<Token> {
        LexicalAnalyzer::new()
            .tokenize(source)
            .map(|stream| {
                let mut stream = stream;
                let mut out = Vec::new();
                while let Some(t) = stream.advance() {
                    out.push(t.value.clone());
                }
                out
            })
            .unwrap()
    }

    #[test]
    fn test_header_properties_and_separator() {
        let tokens = tokenize("date: 2024-05-01\ntime: 19:05\n---\n");
        assert_eq!(
            tokens,
            vec![
                Token::PropertyKey("date".into()),
                Token::PropertyValue("2024-05-01".into()),
                Token::Newline,
                Token::PropertyKey("time".into()),
                Token::PropertyValue("19:05".into()),
                Token::Newline,
                Token::Separator,
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_plate_appearance_line() {
        let tokens = tokenize("---\n1 00 S6/G6/B B-1 1-3(E3/TH) 2X3(635) : bunt single\n");
        assert_eq!(
            tokens,
            vec![
                Token::Separator,
                Token::Newline,
                Token::Number("1".into()),
                Token::Word("00".into()),
                Token::Word("S6/G6/B".into()),
                Token::Advance("B-1".into()),
                Token::Advance("1-3(E3/TH)".into()),
                Token::Advance("2X3(635)".into()),
                Token::Comment("bunt single".into()),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_lines_and_continuation() {
        let tokens = tokenize("---\nplays VIS\npitcher 34\n... BX S6\n");
        assert_eq!(tokens[2], Token::Keyword(Keyword::Plays));
        assert_eq!(tokens[3], Token::Word("VIS".into()));
        assert_eq!(tokens[5], Token::Keyword(Keyword::Pitcher));
        assert_eq!(tokens[6], Token::Word("34".into()));
        assert_eq!(tokens[8], Token::Continuation);
    }

    #[test]
    fn test_double_dash_comment_marker() {
        let tokens = tokenize("---\n3 CX 8/F8 -- deep fly\n");
        assert!(tokens.contains(&Token::Comment("deep fly".into())));
    }

    #[test]
    fn test_header_without_colon_is_lex_error() {
        let mut lexer = LexicalAnalyzer::new();
        let result = lexer.tokenize("not a property line\n");
        assert_matches!(result, Err(LexerError::HeaderSyntax { line: 1 }));
    }

    #[test]
    fn test_unrecognized_event_line_start() {
        let mut lexer = LexicalAnalyzer::new();
        let result = lexer.tokenize("---\n0zz X K\n");
        assert_matches!(result, Err(LexerError::InvalidCharacter { line: 2, .. }));
    }

    #[test]
    fn test_advance_shape_detection() {
        assert!(is_advance_shaped("B-1"));
        assert!(is_advance_shaped("2X3(635)"));
        assert!(is_advance_shaped("3-H(E2/TH)"));
        assert!(is_advance_shaped("bx1"));
        assert!(!is_advance_shaped("S6/G6"));
        assert!(!is_advance_shaped("B-1(635"));
        assert!(!is_advance_shaped("4-5"));
    }

    #[test]
    fn test_metrics_counted() {
        let mut lexer = LexicalAnalyzer::new();
        lexer
            .tokenize("---\n1 00 S6 B-1 : single\n")
            .unwrap();
        assert_eq!(lexer.metrics().advance_tokens, 1);
        assert_eq!(lexer.metrics().comment_count, 1);
    }
}
