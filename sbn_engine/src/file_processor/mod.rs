//! File processing stage: one up-front read with metadata and limits
//!
//! Everything downstream of this module works on in-memory source text; no
//! I/O happens mid-replay.

use crate::config::constants::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Which front-end parses the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Native scorebook notation (`.sbn`)
    Native,
    /// YAML document form (`.yaml`/`.yml`)
    Yaml,
}

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Unsupported file extension: {extension:?} (expected .sbn, .yaml, or .yml)")]
    UnsupportedExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },
}

impl FileProcessorError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file::FILE_NOT_FOUND,
            FileProcessorError::UnsupportedExtension { .. } => codes::file::UNSUPPORTED_EXTENSION,
            FileProcessorError::FileTooLarge { .. } => codes::file::FILE_TOO_LARGE,
            FileProcessorError::InvalidEncoding { .. } => codes::file::IO_ERROR,
            FileProcessorError::IoError { .. } => codes::file::IO_ERROR,
        }
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// File path as given
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// File extension (if any)
    pub extension: Option<String>,
    /// Number of lines in file
    pub line_count: usize,
    /// Detected input format
    pub format: InputFormat,
}

/// Result of reading one input file
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }
}

/// Detect the input format from a path's extension
pub fn detect_format(path: &Path) -> Option<InputFormat> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("sbn") => Some(InputFormat::Native),
        Some("yaml") | Some("yml") => Some(InputFormat::Yaml),
        _ => None,
    }
}

/// Read one input file with default preferences
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    process_file_with_preferences(file_path, &FileProcessorPreferences::default())
}

/// Read one input file, enforcing size limits and recording metadata
pub fn process_file_with_preferences(
    file_path: &str,
    prefs: &FileProcessorPreferences,
) -> Result<FileProcessingResult, FileProcessorError> {
    let start = Instant::now();
    let path = Path::new(file_path);

    if !path.exists() {
        let error = FileProcessorError::FileNotFound {
            path: file_path.to_string(),
        };
        log_error!(error.error_code(), "Input file not found", "path" => file_path);
        return Err(error);
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_string());

    let format = match detect_format(path) {
        Some(format) => format,
        None if prefs.require_known_extension => {
            let error = FileProcessorError::UnsupportedExtension {
                extension: extension.clone(),
            };
            log_error!(error.error_code(), "Unsupported input extension", "path" => file_path);
            return Err(error);
        }
        // Unknown extensions default to the native notation
        None => InputFormat::Native,
    };

    let size = fs::metadata(path)
        .map_err(|e| FileProcessorError::IoError {
            message: e.to_string(),
        })?
        .len();

    if size > MAX_FILE_SIZE {
        let error = FileProcessorError::FileTooLarge {
            size,
            max_size: MAX_FILE_SIZE,
        };
        log_error!(error.error_code(), "Input file exceeds size limit",
            "path" => file_path,
            "size" => size,
            "max" => MAX_FILE_SIZE
        );
        return Err(error);
    }

    let bytes = fs::read(path).map_err(|e| FileProcessorError::IoError {
        message: e.to_string(),
    })?;

    let source = String::from_utf8(bytes).map_err(|_| FileProcessorError::InvalidEncoding {
        path: file_path.to_string(),
    })?;

    let line_count = source.lines().count();
    let processing_duration = start.elapsed();

    if prefs.enable_performance_logging {
        log_debug!("Input file read",
            "path" => file_path,
            "bytes" => size,
            "lines" => line_count,
            "large_file" => (size > LARGE_FILE_THRESHOLD),
            "read_ms" => processing_duration.as_millis()
        );
    }

    Ok(FileProcessingResult {
        source,
        metadata: FileMetadata {
            path: path.to_path_buf(),
            size,
            extension,
            line_count,
            format,
        },
        processing_duration,
    })
}
