//! Token system for the scorebook notation
//!
//! Converts raw text into a positioned token stream consumed by the grammar
//! parser. The token set mirrors the notation's line shapes: header
//! properties, the `---` separator, event keywords, plate-appearance markers,
//! advance-shaped tokens, and trailing comments.

pub mod token;
pub mod token_stream;

pub use token::{Keyword, Token};
pub use token_stream::{SpannedToken, TokenStream, TokenStreamError};
