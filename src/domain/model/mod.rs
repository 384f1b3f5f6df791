// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SegcutError, SegcutResult};
use crate::utils::time::format_timestamp;

/// Separator between segments in a segment list
pub const SEGMENT_SEPARATOR: char = '|';

/// Separator between the start and end of one segment
pub const RANGE_SEPARATOR: char = '-';

/// Temporary directory used when none is configured
pub const DEFAULT_TEMP_DIR: &str = "temp_segments";

/// Target codecs used when concatenating
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

/// Name of the concat-demuxer list written next to the segments
pub const MANIFEST_FILE: &str = "concat_list.txt";

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Seconds from the start of the source
    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse a timecode written as `MM:SS` or `HH:MM:SS`.
    ///
    /// The seconds field may carry a fractional part (`01:30.5`). In the
    /// two-field form the minutes are unbounded so long recordings can be
    /// addressed as `75:00`; in the three-field form minutes must stay below 60.
    /// Seconds must stay below 60 in both forms.
    pub fn parse(time_str: &str) -> SegcutResult<Self> {
        let trimmed = time_str.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();

        let (hours, minutes, seconds) = match parts.as_slice() {
            [minutes, seconds] => (
                0,
                parse_whole_field(minutes, "minutes", trimmed)?,
                parse_seconds_field(seconds, trimmed)?,
            ),
            [hours, minutes, seconds] => {
                let hours = parse_whole_field(hours, "hours", trimmed)?;
                let minutes = parse_whole_field(minutes, "minutes", trimmed)?;
                if minutes >= 60 {
                    return Err(SegcutError::format(format!(
                        "minutes must be less than 60 in '{}'",
                        trimmed
                    )));
                }
                (hours, minutes, parse_seconds_field(seconds, trimmed)?)
            }
            _ => {
                return Err(SegcutError::format(format!(
                    "invalid timecode '{}'. Expected MM:SS or HH:MM:SS (e.g. 03:05 or 1:03:05.5)",
                    trimmed
                )))
            }
        };

        if seconds >= 60.0 {
            return Err(SegcutError::format(format!(
                "seconds must be less than 60 in '{}'",
                trimmed
            )));
        }

        Ok(Self::from_seconds(
            hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
        ))
    }

    /// Format as `MM:SS.mmm`, or `HH:MM:SS.mmm` past the first hour
    pub fn format_hms(&self) -> String {
        format_timestamp(self.seconds)
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Hours or minutes: digits only
fn parse_whole_field(field: &str, name: &str, original: &str) -> SegcutResult<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SegcutError::format(format!(
            "invalid {} '{}' in timecode '{}'",
            name, field, original
        )));
    }
    field.parse::<u64>().map_err(|_| {
        SegcutError::format(format!(
            "{} '{}' out of range in timecode '{}'",
            name, field, original
        ))
    })
}

/// Seconds: digits with an optional fractional part
fn parse_seconds_field(field: &str, original: &str) -> SegcutResult<f64> {
    let invalid = || {
        SegcutError::format(format!(
            "invalid seconds '{}' in timecode '{}'",
            field, original
        ))
    };

    let (whole, fraction) = match field.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (field, None),
    };
    let digits_only = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if !digits_only(whole) || fraction.is_some_and(|f| !digits_only(f)) {
        return Err(invalid());
    }

    field.parse::<f64>().map_err(|_| invalid())
}

/// One `(start, end)` range cut from the source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub start: TimeSpec,
    pub end: TimeSpec,
}

impl Segment {
    /// Create a segment, rejecting ranges where end is not after start
    pub fn new(start: TimeSpec, end: TimeSpec) -> SegcutResult<Self> {
        if end <= start {
            return Err(SegcutError::Range {
                segment: format!("{}-{}", start, end),
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse a single `start-end` pair
    pub fn parse(pair: &str) -> SegcutResult<Self> {
        let pair = pair.trim();
        let parts: Vec<&str> = pair.split(RANGE_SEPARATOR).collect();
        let [start_str, end_str] = parts.as_slice() else {
            return Err(SegcutError::format(format!(
                "segment '{}' must have the form start-end",
                pair
            )));
        };

        let start = TimeSpec::parse(start_str)?;
        let end = TimeSpec::parse(end_str)?;

        Segment::new(start, end).map_err(|e| match e {
            SegcutError::Range { start, end, .. } => SegcutError::Range {
                segment: pair.to_string(),
                start,
                end,
            },
            other => other,
        })
    }

    /// Length of the range in seconds
    pub fn duration(&self) -> f64 {
        self.end.seconds - self.start.seconds
    }

    /// Check whether two ranges share any time
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

/// Ordered list of segments, in the order the user wrote them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SegmentList {
    segments: Vec<Segment>,
}

impl SegmentList {
    /// Parse a `start-end|start-end|...` list.
    ///
    /// Blank entries (such as a trailing `|`) are skipped. A list with no
    /// segments at all is rejected.
    pub fn parse(spec: &str) -> SegcutResult<Self> {
        let segments = spec
            .split(SEGMENT_SEPARATOR)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Segment::parse)
            .collect::<SegcutResult<Vec<_>>>()?;

        if segments.is_empty() {
            return Err(SegcutError::format("no segments given"));
        }

        Ok(Self { segments })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    /// Sum of all segment durations, i.e. the expected output length
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(Segment::duration).sum()
    }
}

impl<'a> IntoIterator for &'a SegmentList {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// How each segment is cut out of the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Stream copy; cut points snap to keyframes
    Fast,
    /// Input seeking with re-encode
    #[default]
    Balanced,
    /// Output seeking with re-encode; slowest, frame exact
    Accurate,
}

impl ExtractionMode {
    /// Whether segments are re-encoded during extraction
    pub fn reencodes(&self) -> bool {
        !matches!(self, ExtractionMode::Fast)
    }

    /// Encoder preset used when none is given
    pub fn default_preset(&self) -> &'static str {
        match self {
            ExtractionMode::Fast | ExtractionMode::Balanced => "veryfast",
            ExtractionMode::Accurate => "medium",
        }
    }

    /// CRF used when none is given
    pub fn default_crf(&self) -> u8 {
        match self {
            ExtractionMode::Fast | ExtractionMode::Balanced => 23,
            ExtractionMode::Accurate => 18,
        }
    }
}

impl FromStr for ExtractionMode {
    type Err = SegcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(ExtractionMode::Fast),
            "balanced" => Ok(ExtractionMode::Balanced),
            "accurate" => Ok(ExtractionMode::Accurate),
            other => Err(SegcutError::format(format!(
                "unknown mode '{}'. Valid modes: fast, balanced, accurate",
                other
            ))),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractionMode::Fast => "fast",
            ExtractionMode::Balanced => "balanced",
            ExtractionMode::Accurate => "accurate",
        };
        f.write_str(name)
    }
}

/// Encoding settings shared by extraction and concatenation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeSettings {
    pub mode: ExtractionMode,
    pub crf: Option<u8>,
    pub preset: Option<String>,
    pub video_codec: String,
    pub audio_codec: String,
    pub no_audio: bool,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::default(),
            crf: None,
            preset: None,
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            no_audio: false,
        }
    }
}

impl EncodeSettings {
    pub fn effective_crf(&self) -> u8 {
        self.crf.unwrap_or_else(|| self.mode.default_crf())
    }

    pub fn effective_preset(&self) -> &str {
        self.preset
            .as_deref()
            .unwrap_or_else(|| self.mode.default_preset())
    }
}

/// Raw, unparsed input for one run
#[derive(Debug, Clone)]
pub struct CutRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub temp_dir: PathBuf,
    pub segments: String,
    pub settings: EncodeSettings,
    pub keep_temp: bool,
}

impl CutRequest {
    /// Create a request with default settings and temp directory
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        segments: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
            segments: segments.into(),
            settings: EncodeSettings::default(),
            keep_temp: false,
        }
    }
}

/// A parsed run: segments plus paths and settings
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub temp_dir: PathBuf,
    pub segments: SegmentList,
    pub settings: EncodeSettings,
    pub keep_temp: bool,
}

impl Job {
    /// Parse the segment list of a request into a job
    pub fn from_request(request: CutRequest) -> SegcutResult<Self> {
        let segments = SegmentList::parse(&request.segments)?;
        Ok(Self {
            input: request.input,
            output: request.output,
            temp_dir: request.temp_dir,
            segments,
            settings: request.settings,
            keep_temp: request.keep_temp,
        })
    }

    /// Extension used for temporary segment files, taken from the output
    pub fn segment_extension(&self) -> String {
        segment_extension_for(&self.output)
    }

    /// Names of every file the job writes into its temporary directory
    pub fn workspace_file_names(&self) -> Vec<String> {
        let extension = self.segment_extension();
        (1..=self.segments.len())
            .map(|index| segment_file_name(index, &extension))
            .chain(std::iter::once(MANIFEST_FILE.to_string()))
            .collect()
    }
}

/// Temporary file name for the segment at 1-based `index`, e.g. `segment_003.mp4`
pub fn segment_file_name(index: usize, extension: &str) -> String {
    format!("segment_{:03}.{}", index, extension)
}

pub(crate) fn segment_extension_for(output: &Path) -> String {
    output
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "mp4".to_string())
}

/// Pipeline progress: `Idle -> Parsing -> Extracting(i/N) -> Concatenating -> Cleanup -> Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "stage")]
pub enum PipelineStage {
    Idle,
    Parsing,
    /// 1-based segment index out of `total`
    Extracting { index: usize, total: usize },
    Concatenating,
    Cleanup,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Idle => f.write_str("idle"),
            PipelineStage::Parsing => f.write_str("parsing"),
            PipelineStage::Extracting { index, total } => {
                write!(f, "extracting segment {}/{}", index, total)
            }
            PipelineStage::Concatenating => f.write_str("concatenating"),
            PipelineStage::Cleanup => f.write_str("cleanup"),
            PipelineStage::Done => f.write_str("done"),
            PipelineStage::Failed => f.write_str("failed"),
        }
    }
}
