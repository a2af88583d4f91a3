use crate::file_processor::FileProcessorError;
use crate::grammar::GrammarError;
use crate::lexical::LexerError;
use crate::yaml::YamlError;

/// Pipeline processing errors. These abort the current file; replay-level
/// semantic and validation errors travel inside the result instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Grammar analysis failed with {} error(s)", .0.len())]
    GrammarAnalysis(Vec<GrammarError>),

    #[error("YAML analysis failed: {0}")]
    YamlAnalysis(#[from] YamlError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }
}

impl From<Vec<GrammarError>> for PipelineError {
    fn from(errors: Vec<GrammarError>) -> Self {
        Self::GrammarAnalysis(errors)
    }
}
