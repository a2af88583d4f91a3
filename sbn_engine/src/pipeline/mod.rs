//! End-to-end processing pipeline for one scorebook file
//!
//! file -> lexical/grammar (or YAML) -> document -> replay -> assembled
//! game. A file that fails to lex or parse yields no game; a file that
//! parses replays to a best-effort game carrying its error list.

mod error;
pub mod output;
mod result;

pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::PipelineResult;

use std::path::PathBuf;
use std::time::Instant;

use crate::config::RuntimePreferences;
use crate::file_processor::InputFormat;
use crate::game::GameAssembler;
use crate::grammar::GrammarParser;
use crate::lexical::LexicalAnalyzer;
use crate::logging;

/// Process a single file through the complete pipeline with defaults
pub fn process_file(file_path: &str) -> Result<PipelineResult, PipelineError> {
    process_file_with_preferences(file_path, &RuntimePreferences::default())
}

/// Process a single file with explicit runtime preferences
pub fn process_file_with_preferences(
    file_path: &str,
    preferences: &RuntimePreferences,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    logging::with_file_context(PathBuf::from(file_path), 0, || {
        crate::log_info!("Starting scorebook replay pipeline", "file" => file_path);

        // Stage 1: file processing and format detection
        let file_result =
            crate::file_processor::process_file_with_preferences(file_path, &preferences.file_processor)?;

        // Stage 2: either front-end converges on the same Document
        let (document, lexical_metrics, token_count) = match file_result.metadata.format {
            InputFormat::Native => {
                let mut analyzer = LexicalAnalyzer::with_preferences(preferences.lexical.clone());
                let tokens = analyzer.tokenize_file_result(&file_result)?;
                let token_count = tokens.len();
                let document = GrammarParser::parse(tokens)?;
                (document, Some(analyzer.metrics().clone()), token_count)
            }
            InputFormat::Yaml => {
                let document = crate::yaml::parse_document(&file_result.source)?;
                (document, None, 0)
            }
        };

        // Stage 3: replay and assembly; semantic/validation errors ride
        // along in the game rather than failing the pipeline
        let game = GameAssembler::new(preferences.replay.clone()).assemble(&document);

        let result = PipelineResult::new(
            document,
            game,
            file_result.metadata,
            lexical_metrics,
            token_count,
            start_time.elapsed(),
        );
        result.log_outcome(file_path);
        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const GAME: &str = "date: 2024-05-01\n\
                        ---\n\
                        plays VIS\n\
                        1 CX H\n\
                        2 CX K\n\
                        3 CX K\n\
                        4 CX K\n\
                        plays HOM\n\
                        1 CX K\n\
                        2 CX K\n\
                        3 CX K\n";

    #[test]
    fn test_native_file_end_to_end() {
        let file = write_file(".sbn", GAME);
        let result = process_file(file.path().to_str().unwrap()).unwrap();

        assert!(result.is_clean());
        assert_eq!(result.game.final_score(), (1, 0));
        assert_eq!(result.game.canonical.len(), 7);
        assert!(result.lexical_metrics.is_some());
        assert!(result.token_count > 0);
    }

    #[test]
    fn test_yaml_file_end_to_end() {
        let file = write_file(
            ".yaml",
            "date: 2024-05-01\n\
             visitorplays:\n\
             - v1,CX,H\n\
             - v2,CX,K\n\
             homeplays:\n\
             - h1,CX,K\n",
        );
        let result = process_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(result.game.final_score(), (1, 0));
        assert!(result.lexical_metrics.is_none());
    }

    #[test]
    fn test_grammar_failure_aborts_file() {
        let file = write_file(".sbn", "---\nplays VIS\n1 00\n");
        let result = process_file(file.path().to_str().unwrap());
        assert_matches!(result, Err(PipelineError::GrammarAnalysis(errors)) => {
            assert_eq!(errors.len(), 1);
        });
    }

    #[test]
    fn test_semantic_errors_ride_in_the_result() {
        let file = write_file(".sbn", "---\nplays VIS\n1 C1X CSH(252)\n");
        let result = process_file(file.path().to_str().unwrap()).unwrap();
        assert!(!result.is_clean());
        assert_eq!(result.game.errors.len(), 1);
        assert_eq!(result.game.canonical.len(), 1); // best-effort state
    }

    #[test]
    fn test_output_rendering() {
        let file = write_file(".sbn", GAME);
        let result = process_file(file.path().to_str().unwrap()).unwrap();
        let output = PipelineOutput::from_result(&result);
        let json = output.to_json().unwrap();
        assert!(json.contains("\"visitor\": 1"));
        assert!(json.contains("\"home\": 0"));
    }

    #[test]
    fn test_missing_file() {
        let result = process_file("/nonexistent/game.sbn");
        assert_matches!(result, Err(PipelineError::FileProcessing(_)));
    }
}
