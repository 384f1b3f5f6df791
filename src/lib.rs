//! Segcut Video Cutter Library
//!
//! Cuts several time ranges out of a video with ffmpeg and joins them,
//! in the order given, into a single output file.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{CutInteractor, CutReport};
pub use domain::model::{
    CutRequest, EncodeSettings, ExtractionMode, Job, PipelineStage, Segment, SegmentList,
    TimeSpec,
};
pub use error::{SegcutError, SegcutResult};
