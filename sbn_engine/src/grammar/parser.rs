//! Native-notation grammar parser
//!
//! Consumes the token stream line by line and builds the `Document`. Parse
//! errors are accumulated rather than thrown: a malformed line is reported,
//! the parser resumes at the next line, and the file fails as a whole only
//! after every line has been looked at.

use crate::config::constants::compile_time::grammar::*;
use crate::grammar::document::{
    Document, DocumentEvent, Event, PlayMarker, PlayRecord, Property, Side, TeamEventBlock,
};
use crate::grammar::error::GrammarError;
use crate::logging::codes;
use crate::tokens::{Keyword, Token, TokenStream};
use crate::utils::Span;
use crate::{log_error, log_success};

pub struct GrammarParser {
    stream: TokenStream,
    errors: Vec<GrammarError>,
}

impl GrammarParser {
    pub fn new(stream: TokenStream) -> Self {
        Self {
            stream,
            errors: Vec::new(),
        }
    }

    /// Parse a token stream into a Document. Returns the document only when
    /// no grammar errors were recorded; otherwise all accumulated errors.
    pub fn parse(stream: TokenStream) -> Result<Document, Vec<GrammarError>> {
        if stream.is_empty() {
            return Err(vec![GrammarError::EmptyTokenStream]);
        }

        let mut parser = Self::new(stream);
        let mut document = parser.parse_document();

        if parser.errors.is_empty() {
            document.assign_sides();
            log_success!(codes::success::DOCUMENT_PARSE_COMPLETE,
                "Document parsed",
                "properties" => document.properties.len(),
                "blocks" => document.blocks.len()
            );
            Ok(document)
        } else {
            Err(parser.errors)
        }
    }

    fn parse_document(&mut self) -> Document {
        let mut document = Document::default();

        self.parse_properties(&mut document);

        loop {
            if self.errors.len() >= MAX_PARSE_ERRORS {
                self.errors.push(GrammarError::TooManyErrors {
                    count: self.errors.len(),
                });
                break;
            }
            match self.stream.current_token() {
                None | Some(Token::Eof) => break,
                Some(Token::Newline) => {
                    self.stream.advance();
                }
                Some(Token::Keyword(Keyword::Plays)) => {
                    if let Some(block) = self.parse_block() {
                        if document.blocks.len() >= MAX_TEAM_BLOCKS {
                            self.record_error(GrammarError::TooManyTeamBlocks {
                                count: document.blocks.len() + 1,
                                span: block.span,
                            });
                        } else {
                            document.blocks.push(block);
                        }
                    }
                }
                Some(other) => {
                    let error = GrammarError::UnexpectedToken {
                        found: other.as_notation_string(),
                        expected: "'plays <teamID>' block",
                        span: self.stream.current_span().unwrap_or_else(Span::dummy),
                    };
                    self.record_error(error);
                    self.stream.skip_to_next_line();
                }
            }
        }

        document
    }

    fn parse_properties(&mut self, document: &mut Document) {
        loop {
            match self.stream.current_token() {
                Some(Token::PropertyKey(key)) => {
                    let key = key.clone();
                    let key_span = self.stream.current_span().unwrap_or_else(Span::dummy);
                    self.stream.advance();

                    match self.stream.current_token() {
                        Some(Token::PropertyValue(value)) => {
                            let value = value.clone();
                            let value_span =
                                self.stream.current_span().unwrap_or_else(Span::dummy);
                            self.stream.advance();
                            document.properties.push(Property {
                                key,
                                value,
                                span: key_span.merge(value_span),
                            });
                            self.consume_newline();
                        }
                        _ => {
                            self.record_error(GrammarError::UnexpectedToken {
                                found: self.current_text(),
                                expected: "property value",
                                span: key_span,
                            });
                            self.stream.skip_to_next_line();
                        }
                    }
                }
                Some(Token::Newline) => {
                    self.stream.advance();
                }
                Some(Token::Separator) => {
                    self.stream.advance();
                    self.consume_newline();
                    return;
                }
                _ => return,
            }
        }
    }

    fn parse_block(&mut self) -> Option<TeamEventBlock> {
        let block_start = self.stream.current_span().unwrap_or_else(Span::dummy);
        self.stream.advance(); // plays

        let (team_id, _) = match self.expect_wordish("team id after 'plays'") {
            Ok(pair) => pair,
            Err(error) => {
                self.record_error(error);
                self.stream.skip_to_next_line();
                return None;
            }
        };
        self.consume_newline();

        let mut events: Vec<DocumentEvent> = Vec::new();
        let mut block_end = block_start;

        loop {
            if self.errors.len() >= MAX_PARSE_ERRORS {
                break;
            }
            if events.len() > MAX_EVENTS_PER_BLOCK {
                self.record_error(GrammarError::TooManyEvents {
                    team_id: team_id.clone(),
                    count: events.len(),
                    span: block_end,
                });
                self.stream.skip_to_next_line();
                break;
            }
            match self.stream.current_token() {
                None | Some(Token::Eof) | Some(Token::Keyword(Keyword::Plays)) => break,
                _ => {}
            }
            if let Some(event) = self.parse_event_line() {
                block_end = event.span;
                events.push(event);
            }
        }

        Some(TeamEventBlock {
            team_id,
            side: Side::Visitor, // resolved later by Document::assign_sides
            events,
            span: block_start.merge(block_end),
        })
    }

    /// Parse exactly one event line, consuming through its Newline. Records
    /// an error and resynchronizes at the next line on failure.
    fn parse_event_line(&mut self) -> Option<DocumentEvent> {
        let span = self.stream.current_span().unwrap_or_else(Span::dummy);

        let result = match self.stream.current_token() {
            Some(Token::Newline) => {
                self.stream.advance();
                return Some(DocumentEvent {
                    event: Event::Empty,
                    span,
                });
            }
            Some(Token::Keyword(Keyword::Pitcher)) => {
                self.stream.advance();
                self.expect_wordish("pitcher id").and_then(|(id, end)| {
                    self.expect_line_end("pitcher")?;
                    Ok((Event::PitcherChange(id), span.merge(end)))
                })
            }
            Some(Token::Keyword(Keyword::Radj)) => {
                self.stream.advance();
                self.parse_radj(span)
            }
            Some(Token::Keyword(Keyword::Score)) => {
                self.stream.advance();
                self.expect_wordish("score code").and_then(|(code, end)| {
                    self.expect_line_end("score")?;
                    let event = parse_score_code(&code, span.merge(end))?;
                    Ok((event, span.merge(end)))
                })
            }
            Some(Token::Keyword(Keyword::Final)) => {
                self.stream.advance();
                self.expect_wordish("final score code")
                    .and_then(|(code, end)| {
                        self.expect_line_end("final")?;
                        Ok((Event::Final(code), span.merge(end)))
                    })
            }
            Some(Token::Keyword(Keyword::Alt)) => {
                self.stream.advance();
                self.parse_play_tail(None, None, span)
                    .map(|record| (Event::Alternative(record.clone()), record.span))
            }
            Some(Token::Number(number)) => {
                let number = number.clone();
                self.stream.advance();
                let marker = number.parse::<u32>().ok().map(PlayMarker::Number);
                self.parse_play_line(marker, span)
            }
            Some(Token::Continuation) => {
                self.stream.advance();
                self.parse_play_line(Some(PlayMarker::Continuation), span)
            }
            Some(other) => Err(GrammarError::UnexpectedToken {
                found: other.as_notation_string(),
                expected: "plate-appearance line or special command",
                span,
            }),
            None => return None,
        };

        match result {
            Ok((event, span)) => Some(DocumentEvent { event, span }),
            Err(error) => {
                self.record_error(error);
                self.stream.skip_to_next_line();
                None
            }
        }
    }

    fn parse_radj(&mut self, span: Span) -> Result<(Event, Span), GrammarError> {
        let (runner, _) = self.expect_wordish("runner id after 'radj'")?;
        let (base, end) = self.expect_wordish("base after runner id")?;
        if !matches!(base.as_str(), "1" | "2" | "3") {
            return Err(GrammarError::MalformedCommand {
                command: "radj",
                reason: format!("base must be 1, 2 or 3, got '{base}'"),
                span: end,
            });
        }
        self.expect_line_end("radj")?;
        Ok((Event::RunAdjustment { runner, base }, span.merge(end)))
    }

    fn parse_play_line(
        &mut self,
        marker: Option<PlayMarker>,
        span: Span,
    ) -> Result<(Event, Span), GrammarError> {
        let (pitches, _) = self.expect_wordish("pitch sequence")?;
        let record = self.parse_play_tail(marker, Some(pitches), span)?;
        Ok((Event::Play(record.clone()), record.span))
    }

    /// Common tail of play and `alt` lines: code with optional dotted
    /// advances, spaced advance tokens, optional trailing comment.
    fn parse_play_tail(
        &mut self,
        marker: Option<PlayMarker>,
        pitches: Option<String>,
        start: Span,
    ) -> Result<PlayRecord, GrammarError> {
        let (raw_code, code_span) = self.expect_wordish("event code")?;
        let mut end = code_span;

        // `W.B-1` joins advances to the code with a dot; both the dotted and
        // the space-separated form are accepted and may be mixed.
        let (code, mut advances) = match raw_code.split_once('.') {
            Some((code, dotted)) => (
                code.to_string(),
                dotted
                    .split(';')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            None => (raw_code, Vec::new()),
        };

        let mut comment = None;
        loop {
            match self.stream.current_token() {
                Some(Token::Advance(text)) => {
                    advances.push(text.clone());
                    end = self.stream.current_span().unwrap_or(end);
                    self.stream.advance();
                }
                Some(Token::Comment(text)) => {
                    comment = Some(text.clone());
                    end = self.stream.current_span().unwrap_or(end);
                    self.stream.advance();
                }
                Some(Token::Newline) => {
                    self.stream.advance();
                    break;
                }
                None | Some(Token::Eof) => break,
                Some(other) => {
                    return Err(GrammarError::MalformedPlayLine {
                        reason: format!(
                            "unexpected token '{}' in advance list",
                            other.as_notation_string()
                        ),
                        span: self.stream.current_span().unwrap_or(end),
                    });
                }
            }
        }

        if advances.len() > MAX_ADVANCES_PER_PLAY {
            return Err(GrammarError::MalformedPlayLine {
                reason: format!(
                    "{} advance codes (max {MAX_ADVANCES_PER_PLAY})",
                    advances.len()
                ),
                span: end,
            });
        }

        Ok(PlayRecord {
            marker,
            pitches: pitches.unwrap_or_default(),
            code,
            advances,
            comment,
            span: start.merge(end),
        })
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    /// Accept a Word, Number or Advance token as raw text. Pitch sequences
    /// and event codes occasionally lex as one of the other kinds.
    fn expect_wordish(&mut self, expected: &'static str) -> Result<(String, Span), GrammarError> {
        match self.stream.current_token() {
            Some(Token::Word(_)) | Some(Token::Number(_)) | Some(Token::Advance(_)) => {
                let text = self
                    .stream
                    .current_token()
                    .map(Token::as_notation_string)
                    .unwrap_or_default();
                let span = self.stream.current_span().unwrap_or_else(Span::dummy);
                self.stream.advance();
                Ok((text, span))
            }
            _ => Err(GrammarError::UnexpectedToken {
                found: self.current_text(),
                expected,
                span: self.stream.current_span().unwrap_or_else(Span::dummy),
            }),
        }
    }

    /// Step over a line break if one is present
    fn consume_newline(&mut self) {
        if matches!(self.stream.current_token(), Some(Token::Newline)) {
            self.stream.advance();
        }
    }

    /// Special commands take nothing after their arguments
    fn expect_line_end(&mut self, command: &'static str) -> Result<(), GrammarError> {
        match self.stream.current_token() {
            Some(Token::Newline) => {
                self.stream.advance();
                Ok(())
            }
            None | Some(Token::Eof) => Ok(()),
            Some(other) => Err(GrammarError::MalformedCommand {
                command,
                reason: format!("trailing token '{}'", other.as_notation_string()),
                span: self.stream.current_span().unwrap_or_else(Span::dummy),
            }),
        }
    }

    fn current_text(&self) -> String {
        self.stream
            .current_token()
            .map(Token::as_notation_string)
            .unwrap_or_else(|| "<end of input>".to_string())
    }

    fn record_error(&mut self, error: GrammarError) {
        if let Some(span) = error.span() {
            log_error!(error.error_code(), "Grammar error",
                span = span,
                "detail" => error
            );
        } else {
            log_error!(error.error_code(), "Grammar error", "detail" => error);
        }
        self.errors.push(error);
    }
}

/// `score` carries a dash-joined `<inning>-<runs>[-<outs>]` code
fn parse_score_code(code: &str, span: Span) -> Result<Event, GrammarError> {
    let malformed = |reason: String| GrammarError::MalformedCommand {
        command: "score",
        reason,
        span,
    };

    let parts: Vec<&str> = code.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(malformed(format!(
            "expected <inning>-<runs>[-<outs>], got '{code}'"
        )));
    }

    let inning: u8 = parts[0]
        .parse()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| malformed(format!("invalid inning '{}'", parts[0])))?;
    let runs: u32 = parts[1]
        .parse()
        .map_err(|_| malformed(format!("invalid run count '{}'", parts[1])))?;
    let outs = match parts.get(2) {
        Some(text) => Some(
            text.parse::<u8>()
                .ok()
                .filter(|n| *n <= 3)
                .ok_or_else(|| malformed(format!("invalid out count '{text}'")))?,
        ),
        None => None,
    };

    Ok(Event::ScoreCheck { inning, runs, outs })
}
