//! Serializable rendering of a pipeline result for downstream consumers

use serde::{Deserialize, Serialize};

use crate::machine::State;
use crate::pipeline::PipelineResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct FinalScore {
    pub visitor: u32,
    pub home: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
    pub line: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub file: String,
    pub properties: Vec<(String, String)>,
    pub final_score: FinalScore,
    /// States in canonical half-inning order
    pub states: Vec<State>,
    /// Parallel to `states`: the alternate scoring, when one exists
    pub alternates: Vec<Option<State>>,
    pub errors: Vec<ErrorReport>,
}

impl PipelineOutput {
    pub fn from_result(result: &PipelineResult) -> Self {
        let (visitor, home) = result.game.final_score();
        Self {
            file: result.file_metadata.path.display().to_string(),
            properties: result
                .document
                .properties
                .iter()
                .map(|p| (p.key.clone(), p.value.clone()))
                .collect(),
            final_score: FinalScore { visitor, home },
            states: result.game.canonical_states().cloned().collect(),
            alternates: result.game.alternates.clone(),
            errors: result
                .game
                .errors
                .iter()
                .map(|e| ErrorReport {
                    code: e.error_code().to_string(),
                    message: e.to_string(),
                    line: e.span().start.line,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Side;

    #[test]
    fn test_state_serialization_round_trip() {
        let state = State::initial(Side::Visitor);
        let json = serde_json::to_string(&state).unwrap();
        let back: State = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
