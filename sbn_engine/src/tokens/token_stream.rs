//! Token stream management for the notation parser
//!
//! Every token keeps its source span so a grammar error on plate appearance
//! forty points at the exact line and column.

use crate::tokens::token::Token;
use crate::utils::{Span, Spanned};

/// A token with span information
pub type SpannedToken = Spanned<Token>;

/// Errors raised while consuming the stream
#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenStreamError {
    #[error("Expected {expected}, found '{found}' at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Expected {expected}, reached end of stream")]
    UnexpectedEndOfStream { expected: String },
}

/// Sequential cursor over the lexer's output
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl TokenStream {
    /// Create a new token stream
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the cursor has consumed every token
    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
            || matches!(self.current_token(), Some(Token::Eof) | None)
    }

    /// Get the current token with its span
    pub fn current(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.position)
    }

    /// Get the current token value (without span)
    pub fn current_token(&self) -> Option<&Token> {
        self.current().map(|spanned| &spanned.value)
    }

    /// Get the span of the current token
    pub fn current_span(&self) -> Option<Span> {
        self.current().map(|spanned| spanned.span)
    }

    /// Peek ahead by n positions without advancing
    pub fn peek_ahead(&self, n: usize) -> Option<&SpannedToken> {
        self.tokens.get(self.position + n)
    }

    /// Advance to the next token, returning the one stepped over
    pub fn advance(&mut self) -> Option<&SpannedToken> {
        let token = self.tokens.get(self.position);
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    /// Consume the current token if it matches the expected discriminant
    pub fn expect_token(&mut self, expected: Token) -> Result<SpannedToken, TokenStreamError> {
        match self.current() {
            Some(spanned)
                if std::mem::discriminant(&spanned.value) == std::mem::discriminant(&expected) =>
            {
                let spanned = spanned.clone();
                self.position += 1;
                Ok(spanned)
            }
            Some(spanned) => Err(TokenStreamError::UnexpectedToken {
                expected: expected.kind().to_string(),
                found: spanned.value.as_notation_string(),
                span: spanned.span,
            }),
            None => Err(TokenStreamError::UnexpectedEndOfStream {
                expected: expected.kind().to_string(),
            }),
        }
    }

    /// Save the cursor for later restoration
    pub fn save_position(&self) -> usize {
        self.position
    }

    /// Restore a previously saved cursor
    pub fn restore_position(&mut self, position: usize) {
        self.position = position.min(self.tokens.len());
    }

    /// Skip tokens up to and including the next Newline (line-level recovery)
    pub fn skip_to_next_line(&mut self) {
        while let Some(token) = self.current_token() {
            let is_newline = matches!(token, Token::Newline);
            let is_eof = matches!(token, Token::Eof);
            if is_eof {
                return;
            }
            self.position += 1;
            if is_newline {
                return;
            }
        }
    }

    /// Span covering the token range [start, end) of cursor positions
    pub fn span_range(&self, start: usize, end: usize) -> Span {
        let first = self.tokens.get(start).map(|t| t.span);
        let last = end
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span);
        match (first, last) {
            (Some(a), Some(b)) => a.merge(b),
            (Some(a), None) => a,
            _ => Span::dummy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn stream_of(tokens: Vec<Token>) -> TokenStream {
        let spanned = tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let pos = Position::new(i, 1, (i + 1) as u32);
                Spanned::new(t, Span::single(pos))
            })
            .collect();
        TokenStream::new(spanned)
    }

    #[test]
    fn test_advance_and_position() {
        let mut stream = stream_of(vec![
            Token::Number("1".into()),
            Token::Word("00".into()),
            Token::Eof,
        ]);
        assert_eq!(stream.position(), 0);
        stream.advance();
        assert_eq!(
            stream.current_token(),
            Some(&Token::Word("00".into()))
        );
        assert!(!stream.is_at_end());
        stream.advance();
        assert!(stream.is_at_end());
    }

    #[test]
    fn test_expect_token_matches_discriminant() {
        let mut stream = stream_of(vec![Token::Word("S6".into()), Token::Eof]);
        let matched = stream.expect_token(Token::Word(String::new())).unwrap();
        assert_eq!(matched.value, Token::Word("S6".into()));

        let err = stream.expect_token(Token::Word(String::new()));
        assert!(err.is_err());
    }

    #[test]
    fn test_skip_to_next_line() {
        let mut stream = stream_of(vec![
            Token::Word("junk".into()),
            Token::Word("more".into()),
            Token::Newline,
            Token::Number("2".into()),
            Token::Eof,
        ]);
        stream.skip_to_next_line();
        assert_eq!(stream.current_token(), Some(&Token::Number("2".into())));
    }

    #[test]
    fn test_save_restore() {
        let mut stream = stream_of(vec![Token::Separator, Token::Newline, Token::Eof]);
        let checkpoint = stream.save_position();
        stream.advance();
        stream.advance();
        stream.restore_position(checkpoint);
        assert_eq!(stream.current_token(), Some(&Token::Separator));
    }
}
