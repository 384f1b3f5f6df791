// Cut interactor - Drives one job from parsing to cleanup

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::app::workspace::TempWorkspace;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::error::SegcutResult;
use crate::ports::*;

/// Result of one extracted segment
#[derive(Debug, Clone, Serialize)]
pub struct SegmentRecord {
    /// 1-based position in the output
    pub index: usize,
    pub start: TimeSpec,
    pub end: TimeSpec,
    pub duration: f64,
    pub temp_file: PathBuf,
}

/// Summary of a finished job
#[derive(Debug, Clone, Serialize)]
pub struct CutReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: ExtractionMode,
    pub segments: Vec<SegmentRecord>,
    /// Expected output length, the sum of segment durations
    pub total_duration: f64,
    /// Wall time spent in the pipeline, in seconds
    pub elapsed: f64,
    /// Set when temporary files were kept
    pub temp_dir: Option<PathBuf>,
}

/// Interactor for the cut-and-join use case.
///
/// Runs strictly in sequence: every engine call finishes before the next starts.
pub struct CutInteractor {
    engine: Arc<dyn MediaEnginePort>,
    stage: PipelineStage,
}

impl CutInteractor {
    /// Create new cut interactor with injected engine
    pub fn new(engine: Arc<dyn MediaEnginePort>) -> Self {
        Self {
            engine,
            stage: PipelineStage::Idle,
        }
    }

    /// Current pipeline stage
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Execute one job
    pub fn execute(&mut self, request: CutRequest) -> SegcutResult<CutReport> {
        let started = Instant::now();
        match self.run(request, started) {
            Ok(report) => {
                self.enter(PipelineStage::Done);
                Ok(report)
            }
            Err(e) => {
                let failed_at = self.stage;
                self.enter(PipelineStage::Failed);
                error!(stage = %failed_at, "Job failed: {}", e);
                Err(e)
            }
        }
    }

    fn run(&mut self, request: CutRequest, started: Instant) -> SegcutResult<CutReport> {
        self.enter(PipelineStage::Parsing);
        let job = Job::from_request(request)?;
        PathRules::validate_input(&job.input)?;
        PathRules::validate_output(&job.input, &job.output)?;
        PathRules::validate_workspace(&job.output, &job.temp_dir, &job.workspace_file_names())?;
        self.warn_about_order(&job.segments);
        self.engine.ensure_available()?;

        info!(
            input = %job.input.display(),
            segments = job.segments.len(),
            mode = %job.settings.mode,
            "Cutting video"
        );

        // Dropping the workspace on any early return removes what was created so far.
        let mut workspace = TempWorkspace::create(&job.temp_dir)?;
        let records = self.extract_all(&job, &mut workspace)?;

        self.enter(PipelineStage::Concatenating);
        let total_duration: f64 = records.iter().map(|r| r.duration).sum();
        info!(
            "Extracted {} segments, output length {}",
            records.len(),
            TimeSpec::from_seconds(total_duration)
        );

        let segment_files: Vec<PathBuf> = records.iter().map(|r| r.temp_file.clone()).collect();
        let manifest = workspace.write_manifest(&segment_files)?;
        self.engine.concat_segments(&ConcatRequest {
            manifest: &manifest,
            output: &job.output,
            settings: &job.settings,
        })?;
        info!(output = %job.output.display(), "Segments joined");

        self.enter(PipelineStage::Cleanup);
        let kept_dir = if job.keep_temp {
            workspace.keep();
            Some(workspace.root().to_path_buf())
        } else {
            None
        };
        if let Err(e) = workspace.cleanup() {
            warn!("Failed to remove temporary files: {}", e);
        }

        Ok(CutReport {
            input: job.input,
            output: job.output,
            mode: job.settings.mode,
            segments: records,
            total_duration,
            elapsed: started.elapsed().as_secs_f64(),
            temp_dir: kept_dir,
        })
    }

    /// Extract every segment in user order, one temporary file each
    fn extract_all(
        &mut self,
        job: &Job,
        workspace: &mut TempWorkspace,
    ) -> SegcutResult<Vec<SegmentRecord>> {
        let total = job.segments.len();
        let extension = job.segment_extension();
        let mut records = Vec::with_capacity(total);

        for (offset, segment) in job.segments.iter().enumerate() {
            let index = offset + 1;
            self.enter(PipelineStage::Extracting { index, total });

            let temp_file = workspace.segment_path(index, &extension);
            // Tracked before the engine runs so a partial file is removed too.
            workspace.track(temp_file.clone());

            info!(
                "Segment {}/{}: {} (length {})",
                index,
                total,
                segment,
                TimeSpec::from_seconds(segment.duration())
            );
            self.engine.extract_segment(&ExtractRequest {
                input: &job.input,
                segment,
                index,
                total,
                output: &temp_file,
                settings: &job.settings,
            })?;

            records.push(SegmentRecord {
                index,
                start: segment.start,
                end: segment.end,
                duration: segment.duration(),
                temp_file,
            });
        }

        Ok(records)
    }

    fn warn_about_order(&self, segments: &SegmentList) {
        for (a, b) in SegmentRules::overlapping_pairs(segments) {
            warn!(
                "Segments {} and {} overlap; the shared time will appear twice",
                a + 1,
                b + 1
            );
        }
        if !SegmentRules::is_chronological(segments) {
            info!("Segments are not in source order; output follows the given order");
        }
    }

    fn enter(&mut self, next: PipelineStage) {
        debug!(from = %self.stage, to = %next, "Pipeline stage");
        self.stage = next;
    }
}

#[cfg(test)]
mod tests;
