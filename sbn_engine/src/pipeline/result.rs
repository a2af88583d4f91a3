use std::time::Duration;

use crate::file_processor::FileMetadata;
use crate::game::Game;
use crate::grammar::Document;
use crate::lexical::LexicalMetrics;

/// Complete pipeline result: the structural document, the replayed game
/// and stage metadata
#[derive(Debug)]
pub struct PipelineResult {
    pub document: Document,
    pub game: Game,
    pub file_metadata: FileMetadata,
    /// Absent for YAML input, which never goes through the lexer
    pub lexical_metrics: Option<LexicalMetrics>,
    pub token_count: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        document: Document,
        game: Game,
        file_metadata: FileMetadata,
        lexical_metrics: Option<LexicalMetrics>,
        token_count: usize,
        processing_duration: Duration,
    ) -> Self {
        Self {
            document,
            game,
            file_metadata,
            lexical_metrics,
            token_count,
            processing_duration,
        }
    }

    /// The file replayed without a single semantic or validation error
    pub fn is_clean(&self) -> bool {
        self.game.errors.is_empty()
    }

    pub fn log_outcome(&self, file_path: &str) {
        let (visitor, home) = self.game.final_score();
        if self.is_clean() {
            crate::log_success!(
                crate::logging::codes::success::PIPELINE_COMPLETE,
                "Scorebook replay pipeline succeeded",
                "file" => file_path,
                "states" => self.game.canonical.len(),
                "score" => format!("{visitor}-{home}"),
                "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
            );
        } else {
            crate::log_warning!(
                "Scorebook replay pipeline finished with errors",
                "file" => file_path,
                "states" => self.game.canonical.len(),
                "errors" => self.game.errors.len()
            );
        }
    }
}
