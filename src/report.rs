use std::io::{self, Write};
use std::path::PathBuf;

use url::Url;

use crate::progress;
use crate::worker::DownloadError;

/// One observable moment in a coordinator run. The coordinator emits
/// these; a `Reporter` decides how (or whether) to render them, which
/// keeps the drain loop testable without capturing stdout.
#[derive(Debug)]
pub enum Event {
    /// The input list had no tokens at all.
    NothingToDo,
    /// A token failed URL parsing and was excluded from the run.
    UrlSkipped { input: String, reason: String },
    /// A task fetched its headers and is about to write this path.
    Started { path: PathBuf },
    /// A task finished writing its file.
    Finished { file_name: String, bytes_written: u64 },
    /// A task failed; the error is final, there are no retries.
    Failed { url: Url, error: DownloadError },
    /// Nothing was ready on the outcome channel for one poll interval.
    Idle { tick: u64 },
    /// Every launched task has reported.
    AllDone,
}

pub trait Reporter: Send + Sync {
    fn event(&self, event: Event);
}

/// Renders events as the human-readable console protocol: one line per
/// skip, start, and outcome, with spinner frames overwritten via `\r`.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn event(&self, event: Event) {
        match event {
            Event::NothingToDo => println!("Nothing to download"),
            Event::UrlSkipped { input, reason } => {
                println!("Skipping {input}: {reason}");
            }
            Event::Started { path } => println!("Downloading {}", path.display()),
            Event::Finished {
                file_name,
                bytes_written,
            } => {
                // Leading \r scrubs any spinner frame left on the line.
                println!("\rFinished {file_name} - {bytes_written} bytes");
            }
            Event::Failed { error, .. } => println!("{error}"),
            Event::Idle { tick } => {
                print!("{}\r", progress::frame(tick));
                let _ = io::stdout().flush();
            }
            Event::AllDone => println!("All done"),
        }
    }
}
