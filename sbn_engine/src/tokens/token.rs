//! Token set for the scorebook notation
//!
//! The notation is line-oriented; the lexer emits a Newline token at every
//! line break and intra-line whitespace only separates tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed keyword set recognized at the start of event lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// `plays <teamid>` opens a team event block
    Plays,
    /// `pitcher <id>` / `pitching <id>` pitcher change
    Pitcher,
    /// `radj <runner> <base>` runner adjustment
    Radj,
    /// `score <code>` inning/score/outs sanity check
    Score,
    /// `final <code>` final score record (inert today)
    Final,
    /// `alt <code> [advances] [comment]` counterfactual plate appearance
    Alt,
}

impl Keyword {
    /// Parse keyword from a word (exact match, case-sensitive)
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "plays" => Some(Self::Plays),
            "pitcher" | "pitching" => Some(Self::Pitcher),
            "radj" => Some(Self::Radj),
            "score" => Some(Self::Score),
            "final" => Some(Self::Final),
            "alt" => Some(Self::Alt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plays => "plays",
            Self::Pitcher => "pitcher",
            Self::Radj => "radj",
            Self::Score => "score",
            Self::Final => "final",
            Self::Alt => "alt",
        }
    }
}

/// Tokens produced by the mode-switching lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// Property key from a header `key: value` line
    PropertyKey(String),
    /// Property value (rest of the header line, trimmed)
    PropertyValue(String),
    /// The `---` header/events separator
    Separator,
    /// Event-line keyword
    Keyword(Keyword),
    /// Plate-appearance marker: the batter's number (`[1-9][0-9]*`)
    Number(String),
    /// `...` continuation of the previous plate appearance
    Continuation,
    /// Advance-shaped token (`[B123][-X][123H]` with optional detail)
    Advance(String),
    /// Generic whitespace-delimited token (pitch sequence, play code, id)
    Word(String),
    /// Trailing free-text comment introduced by `:` or `--`
    Comment(String),
    /// End of line
    Newline,
    /// End of input
    Eof,
}

impl Token {
    /// Render the token as it would appear in notation source
    pub fn as_notation_string(&self) -> String {
        match self {
            Token::PropertyKey(key) => format!("{}:", key),
            Token::PropertyValue(value) => value.clone(),
            Token::Separator => "---".to_string(),
            Token::Keyword(kw) => kw.as_str().to_string(),
            Token::Number(n) => n.clone(),
            Token::Continuation => "...".to_string(),
            Token::Advance(code) => code.clone(),
            Token::Word(word) => word.clone(),
            Token::Comment(text) => format!(": {}", text),
            Token::Newline => "\\n".to_string(),
            Token::Eof => "<eof>".to_string(),
        }
    }

    /// A short type name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Token::PropertyKey(_) => "property key",
            Token::PropertyValue(_) => "property value",
            Token::Separator => "separator",
            Token::Keyword(_) => "keyword",
            Token::Number(_) => "plate-appearance marker",
            Token::Continuation => "continuation",
            Token::Advance(_) => "advance code",
            Token::Word(_) => "word",
            Token::Comment(_) => "comment",
            Token::Newline => "newline",
            Token::Eof => "end of input",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_notation_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_aliases() {
        assert_eq!(Keyword::from_word("pitcher"), Some(Keyword::Pitcher));
        assert_eq!(Keyword::from_word("pitching"), Some(Keyword::Pitcher));
        assert_eq!(Keyword::from_word("Pitcher"), None);
        assert_eq!(Keyword::from_word("steal"), None);
    }

    #[test]
    fn test_notation_rendering() {
        assert_eq!(
            Token::Advance("2X3(635)".into()).as_notation_string(),
            "2X3(635)"
        );
        assert_eq!(
            Token::PropertyKey("date".into()).as_notation_string(),
            "date:"
        );
        assert_eq!(Token::Separator.as_notation_string(), "---");
    }
}
