// src/manager.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use url::Url;

use crate::fetcher::Fetcher;
use crate::limiter::TaskLimiter;
use crate::models::{DownloadRequest, Outcome, Summary};
use crate::progress;
use crate::report::{Event, Reporter};
use crate::worker::DownloadTask;

#[derive(Debug, Error)]
pub enum ManagerError {
    /// The output directory does not exist or is not accessible. Checked
    /// once before any task launches; fatal for the whole run.
    #[error("cannot access output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("task limiter closed: {0}")]
    Spawn(#[from] tokio::sync::AcquireError),
}

/// Knobs for one coordinator run.
#[derive(Debug, Clone)]
pub struct Options {
    pub out_dir: PathBuf,
    /// Upper bound on downloads running at once.
    pub max_concurrent: usize,
    /// Deadline for a single task's fetch and write.
    pub task_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            max_concurrent: 4,
            task_timeout: Duration::from_secs(30),
        }
    }
}

/// Fans a list of URLs out into bounded concurrent download tasks and
/// drains their outcomes from one shared channel, ticking the progress
/// spinner whenever nothing is ready.
pub struct Coordinator {
    fetcher: Fetcher,
    options: Options,
    reporter: Arc<dyn Reporter>,
}

impl Coordinator {
    pub fn new(options: Options, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            fetcher: Fetcher::new(),
            options,
            reporter,
        }
    }

    /// Runs one full download batch over a whitespace/newline-delimited
    /// list of URLs. Per-task failures are reported through the sink and
    /// counted in the `Summary`; only precondition failures are errors.
    pub async fn run(&self, links: &str) -> Result<Summary, ManagerError> {
        if links.split_whitespace().next().is_none() {
            self.reporter.event(Event::NothingToDo);
            return Ok(Summary::default());
        }

        tokio::fs::metadata(&self.options.out_dir)
            .await
            .map_err(|source| ManagerError::OutputDir {
                path: self.options.out_dir.clone(),
                source,
            })?;

        let (targets, rejected) = parse_targets(links);
        let mut summary = Summary {
            skipped: rejected.len(),
            ..Summary::default()
        };
        for (input, reason) in rejected {
            tracing::warn!(input = %input, %reason, "skipping unparseable URL");
            self.reporter.event(Event::UrlSkipped {
                input,
                reason: reason.to_string(),
            });
        }

        // Capacity covers every launched task, so a finished task never
        // blocks on send and its pool slot always frees up.
        let (outcome_tx, outcome_rx) = mpsc::channel(targets.len().max(1));
        let limiter = TaskLimiter::new(self.options.max_concurrent);

        let mut pending = 0usize;
        for url in targets {
            let request = DownloadRequest::new(url, self.options.out_dir.clone());
            let task = DownloadTask::new(
                self.fetcher.clone(),
                request,
                self.options.task_timeout,
                Arc::clone(&self.reporter),
                outcome_tx.clone(),
            );
            let _handle = limiter.spawn(task.run()).await?;
            pending += 1;
        }
        drop(outcome_tx);

        self.drain(outcome_rx, pending, &mut summary).await;
        self.reporter.event(Event::AllDone);
        Ok(summary)
    }

    /// Consumes exactly `pending` outcomes, advancing the spinner one
    /// frame for every poll interval in which nothing arrives.
    async fn drain(
        &self,
        mut outcome_rx: mpsc::Receiver<Outcome>,
        mut pending: usize,
        summary: &mut Summary,
    ) {
        let mut ticker = tokio::time::interval(progress::FRAME_INTERVAL);
        let mut tick: u64 = 0;

        while pending > 0 {
            tokio::select! {
                received = outcome_rx.recv() => {
                    // Every task sends exactly once before dropping its
                    // sender, so a closed channel here means the books
                    // are already balanced.
                    let Some(outcome) = received else { break };
                    match outcome {
                        Outcome::Completed { file_name, bytes_written } => {
                            summary.completed += 1;
                            self.reporter.event(Event::Finished { file_name, bytes_written });
                        }
                        Outcome::Failed { url, error } => {
                            summary.failed += 1;
                            tracing::debug!(%url, %error, "download failed");
                            self.reporter.event(Event::Failed { url, error });
                        }
                    }
                    pending -= 1;
                }
                _ = ticker.tick() => {
                    self.reporter.event(Event::Idle { tick });
                    tick = tick.wrapping_add(1);
                }
            }
        }
    }
}

/// Splits the raw link list into parsed targets and rejected tokens.
/// Rejects never launch a task and never owe an outcome.
fn parse_targets(links: &str) -> (Vec<Url>, Vec<(String, url::ParseError)>) {
    let mut targets = Vec::new();
    let mut rejected = Vec::new();
    for token in links.split_whitespace() {
        match Url::parse(token) {
            Ok(url) => targets.push(url),
            Err(err) => rejected.push((token.to_string(), err)),
        }
    }
    (targets, rejected)
}
