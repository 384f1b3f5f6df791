//! Scoped temporary directory for one job's segment files.
//!
//! Files are removed when the workspace is cleaned up or dropped, whichever
//! comes first. Directories are only removed if this workspace created them,
//! so pointing `--temp-dir` at an existing folder never deletes unrelated
//! content.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::model::segment_file_name;
use crate::domain::rules::PathRules;
use crate::error::SegcutResult;

pub use crate::domain::model::MANIFEST_FILE;

pub struct TempWorkspace {
    root: PathBuf,
    /// Topmost directory created for `root`, removed as a whole at cleanup
    created: Option<PathBuf>,
    files: Vec<PathBuf>,
    keep: bool,
    cleaned: bool,
}

impl TempWorkspace {
    /// Create (or reuse) the directory. Relative paths are anchored at the
    /// current directory so the manifest can list absolute paths.
    pub fn create(dir: &Path) -> SegcutResult<Self> {
        let root = PathRules::absolute(dir)?;
        let created = PathRules::first_missing_ancestor(&root);
        fs::create_dir_all(&root)?;
        debug!(
            path = %root.display(),
            created = ?created.as_ref().map(|p| p.display().to_string()),
            "Temporary workspace ready"
        );

        Ok(Self {
            root,
            created,
            files: Vec::new(),
            keep: false,
            cleaned: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for the segment at 1-based `index`, e.g. `segment_003.mp4`
    pub fn segment_path(&self, index: usize, extension: &str) -> PathBuf {
        self.root.join(segment_file_name(index, extension))
    }

    /// Register a file for removal at cleanup
    pub fn track(&mut self, path: PathBuf) {
        if !self.files.contains(&path) {
            self.files.push(path);
        }
    }

    /// Write the concat manifest listing `segments` in order
    pub fn write_manifest(&mut self, segments: &[PathBuf]) -> SegcutResult<PathBuf> {
        let path = self.root.join(MANIFEST_FILE);
        self.track(path.clone());

        let mut file = fs::File::create(&path)?;
        file.write_all(manifest_contents(segments).as_bytes())?;
        file.flush()?;
        Ok(path)
    }

    /// Leave files in place after the job
    pub fn keep(&mut self) {
        self.keep = true;
    }

    /// Remove tracked files, and the directories this workspace created.
    ///
    /// Every removal is attempted even after a failure; the first error is
    /// returned. Missing files are ignored. Calling this more than once is a
    /// no-op.
    pub fn cleanup(&mut self) -> SegcutResult<()> {
        if self.cleaned {
            return Ok(());
        }
        self.cleaned = true;

        if self.keep {
            debug!(path = %self.root.display(), "Keeping temporary files");
            return Ok(());
        }

        let mut first_error: Option<io::Error> = None;
        for file in &self.files {
            if let Err(e) = ignore_missing(fs::remove_file(file)) {
                warn!(path = %file.display(), "Failed to remove temporary file: {}", e);
                first_error.get_or_insert(e);
            }
        }

        if let Some(dir) = &self.created {
            if let Err(e) = ignore_missing(fs::remove_dir_all(dir)) {
                warn!(path = %dir.display(), "Failed to remove temporary directory: {}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => {
                debug!(
                    path = %self.root.display(),
                    files = self.files.len(),
                    "Temporary files removed"
                );
                Ok(())
            }
        }
    }
}

fn ignore_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!(path = %self.root.display(), "Failed to remove temporary files: {}", e);
        }
    }
}

/// One `file '<path>'` line per segment; quotes escaped for the concat demuxer
pub fn manifest_contents(segments: &[PathBuf]) -> String {
    segments
        .iter()
        .map(|path| {
            let escaped = path.to_string_lossy().replace('\'', r"'\''");
            format!("file '{}'\n", escaped)
        })
        .collect()
}
