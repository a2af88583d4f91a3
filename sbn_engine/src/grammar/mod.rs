//! Grammar layer: the structural Document model and its native-notation
//! parser. The YAML front-end produces the same Document.

pub mod document;
pub mod error;
pub mod parser;

pub use document::{
    Document, DocumentEvent, Event, PlayMarker, PlayRecord, Property, Side, TeamEventBlock,
};
pub use error::GrammarError;
pub use parser::GrammarParser;
