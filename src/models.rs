// src/models.rs

use std::path::PathBuf;
use url::Url;

use crate::worker::DownloadError;

/// Name used when the URL path has no usable final segment.
pub const FALLBACK_FILE_NAME: &str = "download";

/// Everything one download task needs: the target URL and where the
/// resulting file should land. Owned exclusively by its task.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: Url,
    pub dest_dir: PathBuf,
}

impl DownloadRequest {
    pub fn new(url: Url, dest_dir: PathBuf) -> Self {
        Self { url, dest_dir }
    }

    /// Derives the output file name from the last non-empty path segment,
    /// so `/a/b/file.txt` and `/a/b/` yield `file.txt` and `b`.
    pub fn file_name(&self) -> String {
        self.url
            .path_segments()
            .and_then(|mut segments| segments.rev().find(|s| !s.is_empty()))
            .map_or_else(|| FALLBACK_FILE_NAME.to_string(), str::to_string)
    }

    /// Full destination path for the downloaded file.
    pub fn destination(&self) -> PathBuf {
        self.dest_dir.join(self.file_name())
    }
}

/// The single terminal result of one download task. Success and failure
/// are mutually exclusive by construction; exactly one is sent per task.
#[derive(Debug)]
pub enum Outcome {
    Completed { file_name: String, bytes_written: u64 },
    Failed { url: Url, error: DownloadError },
}

/// Aggregate result of one coordinator run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Tasks that wrote their file and reported a byte count.
    pub completed: usize,
    /// Tasks that reported an error (fetch, write, or timeout).
    pub failed: usize,
    /// Input tokens that never became tasks because they failed to parse.
    pub skipped: usize,
}

impl Summary {
    /// Number of outcome records consumed, i.e. tasks actually launched.
    pub fn reported(&self) -> usize {
        self.completed + self.failed
    }
}
