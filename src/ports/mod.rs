// Ports - Interface definitions (contracts)

use std::path::Path;

use crate::domain::model::*;
use crate::error::SegcutResult;

/// One segment extraction to perform
#[derive(Debug, Clone, Copy)]
pub struct ExtractRequest<'a> {
    pub input: &'a Path,
    pub segment: &'a Segment,
    /// 1-based position of the segment
    pub index: usize,
    pub total: usize,
    pub output: &'a Path,
    pub settings: &'a EncodeSettings,
}

impl ExtractRequest<'_> {
    pub fn stage(&self) -> PipelineStage {
        PipelineStage::Extracting {
            index: self.index,
            total: self.total,
        }
    }
}

/// Final concatenation of the extracted segments
#[derive(Debug, Clone, Copy)]
pub struct ConcatRequest<'a> {
    /// Concat-demuxer list naming the segment files in order
    pub manifest: &'a Path,
    pub output: &'a Path,
    pub settings: &'a EncodeSettings,
}

/// Port for the external media engine.
///
/// Every call blocks until the engine process has exited.
pub trait MediaEnginePort: Send + Sync {
    /// Engine name used in messages
    fn name(&self) -> &str;

    /// Fail with `ToolMissing` if the engine cannot be run
    fn ensure_available(&self) -> SegcutResult<()>;

    /// Cut one segment of the source into `request.output`
    fn extract_segment(&self, request: &ExtractRequest<'_>) -> SegcutResult<()>;

    /// Join the files named in the manifest into the final output
    fn concat_segments(&self, request: &ConcatRequest<'_>) -> SegcutResult<()>;
}
