//! Error handling module for Segcut

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::model::PipelineStage;

/// Main error type for Segcut operations
#[derive(Error, Debug)]
pub enum SegcutError {
    /// Malformed timecode or segment-list syntax
    #[error("Invalid format: {message}")]
    Format { message: String },

    /// Segment whose end does not come after its start
    #[error("Invalid range '{segment}': end ({end}) must be after start ({start})")]
    Range {
        segment: String,
        start: String,
        end: String,
    },

    /// Source file not found
    #[error("Input file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// Media engine executable could not be located or started
    #[error("Media engine '{tool}' not found: {message}")]
    ToolMissing { tool: String, message: String },

    /// Media engine exited unsuccessfully
    #[error("Media engine failed while {stage}: {message}")]
    Process {
        stage: PipelineStage,
        message: String,
    },

    /// Configuration file or value error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SegcutError {
    /// Shorthand for a [`SegcutError::Format`] error
    pub fn format(message: impl Into<String>) -> Self {
        SegcutError::Format {
            message: message.into(),
        }
    }

    /// Shorthand for a [`SegcutError::Config`] error
    pub fn config(message: impl Into<String>) -> Self {
        SegcutError::Config {
            message: message.into(),
        }
    }

    /// Name of the step that produced this error, for user-facing messages
    pub fn stage(&self) -> String {
        match self {
            SegcutError::Format { .. }
            | SegcutError::Range { .. }
            | SegcutError::MissingFile { .. } => PipelineStage::Parsing.to_string(),
            SegcutError::ToolMissing { .. } => "engine check".to_string(),
            SegcutError::Process { stage, .. } => stage.to_string(),
            SegcutError::Config { .. } => "configuration".to_string(),
            SegcutError::Io(_) => "filesystem".to_string(),
        }
    }

    /// Process exit code reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            SegcutError::Format { .. } | SegcutError::Range { .. } => 2,
            SegcutError::MissingFile { .. } => 3,
            SegcutError::ToolMissing { .. } => 4,
            SegcutError::Process { .. } => 5,
            SegcutError::Config { .. } | SegcutError::Io(_) => 1,
        }
    }
}

/// Result type alias for Segcut operations
pub type SegcutResult<T> = std::result::Result<T, SegcutError>;
