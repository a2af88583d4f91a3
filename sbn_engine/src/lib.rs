// Internal modules
pub mod advance;
pub mod batch;
pub mod config;
pub mod event_code;
pub mod file_processor;
pub mod game;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod machine;
pub mod pipeline;
pub mod tokens;
pub mod utils;
pub mod yaml;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use game::Game;
pub use machine::State;
pub use pipeline::{PipelineError, PipelineResult};

// Re-export pipeline output for downstream consumers
pub use pipeline::output::PipelineOutput;
