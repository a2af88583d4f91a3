//! Error and success codes for the notation pipeline
//!
//! Single source of truth for every code the logging macros accept. Codes are
//! stable identifiers; messages and descriptions may change freely.

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E001");
    pub const HEADER_SYNTAX: Code = Code::new("E002");
    pub const COMMENT_TOO_LONG: Code = Code::new("E003");
    pub const WORD_TOO_LONG: Code = Code::new("E004");
    pub const PROPERTY_TOO_LONG: Code = Code::new("E005");
    pub const TOO_MANY_TOKENS: Code = Code::new("E006");
}

pub mod grammar {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E020");
    pub const MALFORMED_PLAY_LINE: Code = Code::new("E021");
    pub const MALFORMED_COMMAND: Code = Code::new("E022");
    pub const TOO_MANY_TEAM_BLOCKS: Code = Code::new("E023");
    pub const EMPTY_TOKEN_STREAM: Code = Code::new("E024");
    pub const TOO_MANY_ERRORS: Code = Code::new("E025");
    pub const YAML_DOCUMENT_SHAPE: Code = Code::new("E026");
    pub const YAML_RECORD_SHAPE: Code = Code::new("E027");
    pub const TOO_MANY_EVENTS: Code = Code::new("E028");
}

pub mod semantic {
    use super::Code;

    pub const UNKNOWN_EVENT_CODE: Code = Code::new("E040");
    pub const MISSING_RUNNER: Code = Code::new("E041");
    pub const DUPLICATE_ADVANCE: Code = Code::new("E042");
    pub const MALFORMED_ADVANCE: Code = Code::new("E043");
    pub const MISSING_PLAY_MODIFIER: Code = Code::new("E044");
    pub const PLAY_AFTER_FINAL: Code = Code::new("E045");
    pub const DUPLICATE_ALTERNATIVE: Code = Code::new("E046");
    pub const ORPHAN_ALTERNATIVE: Code = Code::new("E047");
    pub const RUNNER_ADJUSTMENT_MID_INNING: Code = Code::new("E048");
    pub const INNINGS_CEILING: Code = Code::new("E049");
}

pub mod validation {
    use super::Code;

    pub const SCORE_CHECK_MISMATCH: Code = Code::new("E060");
}

pub mod file {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E080");
    pub const FILE_TOO_LARGE: Code = Code::new("E081");
    pub const UNSUPPORTED_EXTENSION: Code = Code::new("E082");
    pub const IO_ERROR: Code = Code::new("E083");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("S001");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("S010");
    pub const DOCUMENT_PARSE_COMPLETE: Code = Code::new("S011");
    pub const REPLAY_COMPLETE: Code = Code::new("S012");
    pub const GAME_ASSEMBLED: Code = Code::new("S013");
    pub const PIPELINE_COMPLETE: Code = Code::new("S014");
    pub const BATCH_COMPLETE: Code = Code::new("S015");
}

/// Human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    match code {
        "E001" => "Character sequence matched no rule in the active lexer mode",
        "E002" => "Header line is not `key: value` or the `---` separator",
        "E003" => "Trailing comment exceeds the length limit",
        "E004" => "Token exceeds the length limit",
        "E005" => "Property value exceeds the length limit",
        "E006" => "File exceeds the token count limit",
        "E020" => "Token sequence matches no accepted event shape",
        "E021" => "Plate-appearance line is malformed",
        "E022" => "Special command line is malformed",
        "E023" => "More than two team blocks in one document",
        "E024" => "No tokens to parse",
        "E025" => "Too many grammar errors; parsing abandoned",
        "E026" => "YAML document is not the expected mapping shape",
        "E027" => "YAML play record is malformed",
        "E028" => "Team block exceeds the event count limit",
        "E040" => "Event code matches no known play pattern",
        "E041" => "Advance references a base with no runner",
        "E042" => "Two advances from the same base in one plate appearance",
        "E043" => "Advance code is malformed",
        "E044" => "Play shape requires a modifier that is not present",
        "E045" => "Play recorded after the side's final event",
        "E046" => "Second alternative for the same plate appearance",
        "E047" => "Alternative without a preceding plate appearance",
        "E048" => "Runner adjustment after the half-inning started",
        "E049" => "Replay exceeded the innings ceiling",
        "E060" => "Score check disagrees with the replay tally",
        "E080" => "Input file not found",
        "E081" => "Input file exceeds the size limit",
        "E082" => "Input file has an unsupported extension",
        "E083" => "I/O failure while reading input",
        "S001" => "Logging system initialized",
        "S010" => "Lexical analysis completed",
        "S011" => "Document parsing completed",
        "S012" => "Replay completed",
        "S013" => "Game assembled",
        "S014" => "Pipeline completed",
        "S015" => "Batch processing completed",
        _ => "Unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(semantic::MISSING_RUNNER.to_string(), "E041");
    }

    #[test]
    fn test_every_exported_code_has_a_description() {
        let codes = [
            lexical::INVALID_CHARACTER,
            lexical::HEADER_SYNTAX,
            grammar::UNEXPECTED_TOKEN,
            grammar::TOO_MANY_TEAM_BLOCKS,
            semantic::UNKNOWN_EVENT_CODE,
            semantic::DUPLICATE_ALTERNATIVE,
            validation::SCORE_CHECK_MISMATCH,
            file::FILE_TOO_LARGE,
            success::PIPELINE_COMPLETE,
        ];
        for code in codes {
            assert_ne!(get_description(code.as_str()), "Unknown error", "{}", code);
        }
    }
}
