//! YAML front-end
//!
//! Accepts a YAML mapping with scalar properties plus play-list keys
//! (`visitorplays`/`homeplays`, or any other `<teamid>plays` key) whose
//! elements are comma-joined records. Produces the same `Document` the
//! native-notation grammar parser produces, so everything downstream is
//! encoding-agnostic. Batter ids may carry a team-prefix letter here; the
//! prefix is stripped so both encodings yield the same numeric ids.

use serde_yaml::{Mapping, Value};

use crate::grammar::document::{
    Document, DocumentEvent, Event, PlayMarker, PlayRecord, Property, Side, TeamEventBlock,
};
use crate::logging::{codes, Code};
use crate::utils::Span;
use crate::{log_debug, log_success};

#[derive(Debug, thiserror::Error)]
pub enum YamlError {
    #[error("YAML syntax error: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("Unexpected document shape: {reason}")]
    DocumentShape { reason: String },

    #[error("Malformed record {index} in '{key}': {reason}")]
    RecordShape {
        key: String,
        index: usize,
        reason: String,
    },
}

impl YamlError {
    pub fn error_code(&self) -> Code {
        match self {
            YamlError::Syntax(_) | YamlError::DocumentShape { .. } => {
                codes::grammar::YAML_DOCUMENT_SHAPE
            }
            YamlError::RecordShape { .. } => codes::grammar::YAML_RECORD_SHAPE,
        }
    }
}

/// Parse a YAML notation document into the shared Document model
pub fn parse_document(source: &str) -> Result<Document, YamlError> {
    let mapping: Mapping = serde_yaml::from_str(source)?;
    log_debug!("Parsing YAML document", "keys" => mapping.len());

    let mut document = Document::default();
    let mut list_keys: Vec<(String, Vec<Value>)> = Vec::new();

    for (key, value) in &mapping {
        let key = scalar_text(key).ok_or_else(|| YamlError::DocumentShape {
            reason: "non-scalar mapping key".to_string(),
        })?;
        match value {
            Value::Sequence(items) => list_keys.push((key, items.clone())),
            _ => {
                let value = scalar_text(value).ok_or_else(|| YamlError::DocumentShape {
                    reason: format!("property '{key}' is neither scalar nor play list"),
                })?;
                document.properties.push(Property {
                    key,
                    value,
                    span: Span::dummy(),
                });
            }
        }
    }

    if list_keys.len() > 2 {
        return Err(YamlError::DocumentShape {
            reason: format!("{} play-list keys (max 2)", list_keys.len()),
        });
    }

    for (index, (key, items)) in list_keys.iter().enumerate() {
        let side = match key.as_str() {
            "visitorplays" => Side::Visitor,
            "homeplays" => Side::Home,
            _ if index == 0 => Side::Visitor,
            _ => Side::Home,
        };
        let team_id = key.strip_suffix("plays").unwrap_or(key).to_string();
        let mut events = Vec::new();
        for (record_index, item) in items.iter().enumerate() {
            let record = scalar_text(item).ok_or_else(|| YamlError::RecordShape {
                key: key.clone(),
                index: record_index,
                reason: "record is not a scalar string".to_string(),
            })?;
            if let Some(event) = parse_record(&record).map_err(|reason| YamlError::RecordShape {
                key: key.clone(),
                index: record_index,
                reason,
            })? {
                events.push(DocumentEvent {
                    event,
                    span: Span::dummy(),
                });
            }
        }
        document.blocks.push(TeamEventBlock {
            team_id,
            side,
            events,
            span: Span::dummy(),
        });
    }

    log_success!(codes::success::DOCUMENT_PARSE_COMPLETE,
        "YAML document parsed",
        "properties" => document.properties.len(),
        "blocks" => document.blocks.len()
    );

    Ok(document)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// One comma-joined record. `Ok(None)` for the deliberately inert `err`
/// record, which carries no event.
fn parse_record(record: &str) -> Result<Option<Event>, String> {
    let fields: Vec<&str> = record.splitn(4, ',').collect();

    match fields[0] {
        "" => Err("empty record".to_string()),
        "pitcher" | "pitching" => {
            let id = fields
                .get(1)
                .filter(|s| !s.is_empty())
                .ok_or("expected pitcher,ID")?;
            Ok(Some(Event::PitcherChange(id.to_string())))
        }
        "inn" => {
            let inning: u8 = fields
                .get(1)
                .and_then(|s| s.parse().ok())
                .filter(|n| *n >= 1)
                .ok_or("expected inn,<inning>,<runs>[,<outs>]")?;
            let runs: u32 = fields
                .get(2)
                .and_then(|s| s.parse().ok())
                .ok_or("expected inn,<inning>,<runs>[,<outs>]")?;
            let outs = match fields.get(3) {
                Some(text) => Some(
                    text.parse::<u8>()
                        .ok()
                        .filter(|n| *n <= 3)
                        .ok_or(format!("invalid out count '{text}'"))?,
                ),
                None => None,
            };
            Ok(Some(Event::ScoreCheck { inning, runs, outs }))
        }
        "radj" => {
            let runner = fields.get(1).filter(|s| !s.is_empty()).ok_or("expected radj,runner,base")?;
            let base = fields.get(2).ok_or("expected radj,runner,base")?;
            if !matches!(*base, "1" | "2" | "3") {
                return Err(format!("base must be 1, 2 or 3, got '{base}'"));
            }
            Ok(Some(Event::RunAdjustment {
                runner: normalize_player_id(runner)?,
                base: base.to_string(),
            }))
        }
        "final" => {
            let score = fields.get(1).ok_or("expected final,score")?;
            Ok(Some(Event::Final(score.to_string())))
        }
        "err" => Ok(None),
        _ => parse_play_record(&fields).map(Some),
    }
}

/// Default shape: `batter,pitches,code[.adv[;adv]][,comment]`
fn parse_play_record(fields: &[&str]) -> Result<Event, String> {
    if fields.len() < 3 {
        return Err("expected batter,pitches,code".to_string());
    }

    let marker = if fields[0] == "..." {
        PlayMarker::Continuation
    } else {
        let id = normalize_player_id(fields[0])?;
        PlayMarker::Number(
            id.parse::<u32>()
                .map_err(|_| format!("invalid batter id '{}'", fields[0]))?,
        )
    };

    let (code, advances) = match fields[2].split_once('.') {
        Some((code, dotted)) => (
            code.to_string(),
            dotted
                .split(';')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        None => (fields[2].to_string(), Vec::new()),
    };

    Ok(Event::Play(PlayRecord {
        marker: Some(marker),
        pitches: fields[1].to_string(),
        code,
        advances,
        comment: fields.get(3).map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        span: Span::dummy(),
    }))
}

/// Strip the optional team-prefix letter the YAML encoding allows on ids
fn normalize_player_id(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid player id '{raw}'"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarParser;
    use crate::lexical::LexicalAnalyzer;
    use assert_matches::assert_matches;

    #[test]
    fn test_basic_document() {
        let doc = parse_document(
            "date: 2024-05-01\n\
             visitorplays:\n\
             - v12,00,S6/G6/B.B-1;1-3(E3/TH);2X3(635),bunt single\n\
             - pitcher,34\n\
             homeplays:\n\
             - h7,CX,K\n",
        )
        .unwrap();

        assert_eq!(doc.property("date"), Some("2024-05-01"));
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0].side, Side::Visitor);

        assert_matches!(&doc.blocks[0].events[0].event, Event::Play(record) => {
            assert_eq!(record.marker, Some(PlayMarker::Number(12)));
            assert_eq!(record.pitches, "00");
            assert_eq!(record.code, "S6/G6/B");
            assert_eq!(record.advances, vec!["B-1", "1-3(E3/TH)", "2X3(635)"]);
            assert_eq!(record.comment.as_deref(), Some("bunt single"));
        });
        assert_matches!(&doc.blocks[0].events[1].event, Event::PitcherChange(id) => {
            assert_eq!(id, "34");
        });
    }

    #[test]
    fn test_special_records() {
        let doc = parse_document(
            "homeplays:\n- inn,3,4,2\n- radj,h12,2\n- final,7\n- err\n",
        )
        .unwrap();
        let events: Vec<_> = doc.blocks[0].events.iter().map(|e| &e.event).collect();
        assert_eq!(events.len(), 3); // err records carry no event
        assert_matches!(
            events[0],
            Event::ScoreCheck { inning: 3, runs: 4, outs: Some(2) }
        );
        assert_matches!(events[1], Event::RunAdjustment { runner, base } => {
            assert_eq!(runner, "12");
            assert_eq!(base, "2");
        });
        assert_matches!(events[2], Event::Final(score) => assert_eq!(score, "7"));
    }

    #[test]
    fn test_player_id_normalization() {
        assert_eq!(normalize_player_id("v12").unwrap(), "12");
        assert_eq!(normalize_player_id("12").unwrap(), "12");
        assert_matches!(normalize_player_id("v"), Err(_));
        assert_matches!(normalize_player_id("12a"), Err(_));
    }

    #[test]
    fn test_yaml_syntax_error() {
        assert_matches!(parse_document("plays: [unclosed\n"), Err(YamlError::Syntax(_)));
    }

    #[test]
    fn test_malformed_record_names_position() {
        let error = parse_document("homeplays:\n- pitcher\n").unwrap_err();
        assert_matches!(error, YamlError::RecordShape { key, index: 0, .. } => {
            assert_eq!(key, "homeplays");
        });
    }

    #[test]
    fn test_matches_native_notation_document() {
        let native = "date: 2024-05-01\n\
                      ---\n\
                      plays VIS\n\
                      12 00 S6/G6/B B-1 1-3(E3/TH) 2X3(635) : bunt single\n\
                      pitcher 34\n\
                      plays HOM\n\
                      7 BBBB W.B-1\n";
        let yaml = "date: 2024-05-01\n\
                    visitorplays:\n\
                    - v12,00,S6/G6/B.B-1;1-3(E3/TH);2X3(635),bunt single\n\
                    - pitcher,34\n\
                    homeplays:\n\
                    - h7,BBBB,W.B-1\n";

        let stream = LexicalAnalyzer::new().tokenize(native).unwrap();
        let native_doc = GrammarParser::parse(stream).unwrap();
        let yaml_doc = parse_document(yaml).unwrap();

        for side in [Side::Visitor, Side::Home] {
            let native_events: Vec<_> = native_doc
                .block(side)
                .unwrap()
                .events
                .iter()
                .filter(|e| !matches!(e.event, Event::Empty))
                .map(|e| strip_span(e.event.clone()))
                .collect();
            let yaml_events: Vec<_> = yaml_doc
                .block(side)
                .unwrap()
                .events
                .iter()
                .map(|e| strip_span(e.event.clone()))
                .collect();
            assert_eq!(native_events, yaml_events);
        }
    }

    fn strip_span(mut event: Event) -> Event {
        if let Event::Play(record) | Event::Alternative(record) = &mut event {
            record.span = Span::dummy();
        }
        event
    }
}
