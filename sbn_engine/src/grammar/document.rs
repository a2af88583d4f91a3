//! Structural document model shared by the native-notation grammar parser
//! and the YAML front-end. Both entry points converge on `Document`; the
//! replay machinery never sees which encoding a document came from.

use serde::{Deserialize, Serialize};

use crate::utils::Span;

/// One `key: value` header property, in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
    pub span: Span,
}

/// Which side of the game a team-event block describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Visitor,
    Home,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Visitor => "visitor",
            Side::Home => "home",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plate-appearance marker at the start of a play line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMarker {
    /// Explicit plate-appearance number (`[1-9][0-9]*`)
    Number(u32),
    /// `...` continues the previous plate appearance
    Continuation,
}

/// Raw play line contents before classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    /// Absent for `alt` lines, which pair with the preceding canonical play
    pub marker: Option<PlayMarker>,
    pub pitches: String,
    /// Event code with any dotted advance suffix already stripped
    pub code: String,
    /// Raw advance-code strings in source order
    pub advances: Vec<String>,
    pub comment: Option<String>,
    pub span: Span,
}

/// One event line inside a team block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Play(PlayRecord),
    Alternative(PlayRecord),
    PitcherChange(String),
    RunAdjustment { runner: String, base: String },
    ScoreCheck {
        inning: u8,
        runs: u32,
        outs: Option<u8>,
    },
    Final(String),
    Empty,
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Play(_) => "play",
            Event::Alternative(_) => "alternative",
            Event::PitcherChange(_) => "pitcher-change",
            Event::RunAdjustment { .. } => "run-adjustment",
            Event::ScoreCheck { .. } => "score-check",
            Event::Final(_) => "final",
            Event::Empty => "empty",
        }
    }
}

/// Positioned event inside a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEvent {
    pub event: Event,
    pub span: Span,
}

/// One `plays <teamID>` block and its events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEventBlock {
    pub team_id: String,
    pub side: Side,
    pub events: Vec<DocumentEvent>,
    pub span: Span,
}

/// Parsed document: header properties plus up to two team-event blocks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub properties: Vec<Property>,
    pub blocks: Vec<TeamEventBlock>,
}

impl Document {
    /// Look up a header property by key (first occurrence wins)
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn block(&self, side: Side) -> Option<&TeamEventBlock> {
        self.blocks.iter().find(|b| b.side == side)
    }

    /// Assign sides to blocks. Positional order (first = visitor, second =
    /// home) unless explicit `visitorid`/`homeid` properties name a block's
    /// team id and disambiguate.
    pub fn assign_sides(&mut self) {
        let visitor_id = self.property("visitorid").map(str::to_string);
        let home_id = self.property("homeid").map(str::to_string);

        let pinned: Vec<Option<Side>> = self
            .blocks
            .iter()
            .map(|block| {
                if Some(block.team_id.as_str()) == home_id.as_deref() {
                    Some(Side::Home)
                } else if Some(block.team_id.as_str()) == visitor_id.as_deref() {
                    Some(Side::Visitor)
                } else {
                    None
                }
            })
            .collect();
        let home_pinned = pinned.contains(&Some(Side::Home));
        let visitor_pinned = pinned.contains(&Some(Side::Visitor));

        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.side = match pinned[index] {
                Some(side) => side,
                // A single pinned block forces the other onto the open side
                None if home_pinned && !visitor_pinned => Side::Visitor,
                None if visitor_pinned && !home_pinned => Side::Home,
                None if index == 0 => Side::Visitor,
                None => Side::Home,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(team_id: &str) -> TeamEventBlock {
        TeamEventBlock {
            team_id: team_id.to_string(),
            side: Side::Visitor,
            events: vec![],
            span: Span::dummy(),
        }
    }

    #[test]
    fn test_sides_default_to_positional_order() {
        let mut doc = Document {
            properties: vec![],
            blocks: vec![block("ATL"), block("NYM")],
        };
        doc.assign_sides();
        assert_eq!(doc.blocks[0].side, Side::Visitor);
        assert_eq!(doc.blocks[1].side, Side::Home);
    }

    #[test]
    fn test_explicit_side_properties_override_order() {
        let mut doc = Document {
            properties: vec![Property {
                key: "homeid".into(),
                value: "ATL".into(),
                span: Span::dummy(),
            }],
            blocks: vec![block("ATL"), block("NYM")],
        };
        doc.assign_sides();
        assert_eq!(doc.blocks[0].side, Side::Home);
        assert_eq!(doc.blocks[1].side, Side::Visitor);
        assert_eq!(doc.block(Side::Home).map(|b| b.team_id.as_str()), Some("ATL"));
    }

    #[test]
    fn test_single_id_property_pushes_other_block_to_open_side() {
        let mut doc = Document {
            properties: vec![Property {
                key: "homeid".into(),
                value: "ATL".into(),
                span: Span::dummy(),
            }],
            blocks: vec![block("ATL"), block("NYM")],
        };
        doc.assign_sides();
        assert_eq!(doc.blocks[1].side, Side::Visitor);

        let mut doc = Document {
            properties: vec![Property {
                key: "visitorid".into(),
                value: "NYM".into(),
                span: Span::dummy(),
            }],
            blocks: vec![block("ATL"), block("NYM")],
        };
        doc.assign_sides();
        assert_eq!(doc.blocks[0].side, Side::Home);
        assert_eq!(doc.blocks[1].side, Side::Visitor);
    }

    #[test]
    fn test_property_lookup() {
        let doc = Document {
            properties: vec![Property {
                key: "date".into(),
                value: "2024-05-01".into(),
                span: Span::dummy(),
            }],
            blocks: vec![],
        };
        assert_eq!(doc.property("date"), Some("2024-05-01"));
        assert_eq!(doc.property("missing"), None);
    }
}
