// RUNTIME PREFERENCES (User Experience)
//
// Every preference defaults from an SBN_* environment variable and can be
// overridden by an optional `sbn.toml` file next to the processed input.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to collect detailed token metrics
    pub collect_detailed_metrics: bool,

    /// Whether to show position information in error messages
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env::var("SBN_LEXICAL_DETAILED_METRICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_position_in_errors: env::var("SBN_LEXICAL_INCLUDE_POSITIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayPreferences {
    /// Whether score-check commands are validated against the replay tally
    pub validate_score_checks: bool,

    /// Whether to normalize pitch sequences with a trailing ball-in-play
    /// marker when the play code ends the ball in play
    pub normalize_pitch_sequences: bool,

    /// Whether to log each derived state at debug level
    pub log_state_transitions: bool,
}

impl Default for ReplayPreferences {
    fn default() -> Self {
        Self {
            validate_score_checks: env::var("SBN_REPLAY_VALIDATE_SCORE_CHECKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            normalize_pitch_sequences: env::var("SBN_REPLAY_NORMALIZE_PITCHES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_state_transitions: env::var("SBN_REPLAY_LOG_TRANSITIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Whether to require a recognized extension (.sbn/.yaml/.yml)
    pub require_known_extension: bool,

    /// Whether to log per-file processing timings
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_known_extension: env::var("SBN_REQUIRE_KNOWN_EXTENSION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_performance_logging: env::var("SBN_ENABLE_PERFORMANCE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

/// All runtime preferences, as loaded for one processing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimePreferences {
    #[serde(default)]
    pub lexical: LexicalPreferences,
    #[serde(default)]
    pub replay: ReplayPreferences,
    #[serde(default)]
    pub file_processor: FileProcessorPreferences,
}

impl RuntimePreferences {
    /// Load preferences, overlaying `sbn.toml` (if present in `dir`) on top
    /// of the environment-variable defaults
    pub fn load(dir: &Path) -> Self {
        let config_path = dir.join("sbn.toml");
        if let Ok(contents) = std::fs::read_to_string(&config_path) {
            match toml::from_str::<RuntimePreferences>(&contents) {
                Ok(prefs) => return prefs,
                Err(e) => {
                    crate::log_warning!("Ignoring malformed sbn.toml",
                        "path" => config_path.display(),
                        "error" => e
                    );
                }
            }
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_config_file() {
        let prefs = RuntimePreferences::default();
        assert!(prefs.replay.validate_score_checks);
        assert!(prefs.replay.normalize_pitch_sequences);
    }

    #[test]
    fn test_load_from_toml_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("sbn.toml")).unwrap();
        writeln!(
            file,
            "[replay]\nvalidate_score_checks = false\nnormalize_pitch_sequences = true\nlog_state_transitions = false"
        )
        .unwrap();

        let prefs = RuntimePreferences::load(dir.path());
        assert!(!prefs.replay.validate_score_checks);
    }

    #[test]
    fn test_load_ignores_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = RuntimePreferences::load(dir.path());
        assert!(prefs.replay.validate_score_checks);
    }
}
