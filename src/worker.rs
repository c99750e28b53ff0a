use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::fetcher::{FetchError, Fetcher};
use crate::models::{DownloadRequest, Outcome};
use crate::report::{Event, Reporter};
use crate::sink::{self, SinkError};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("download timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// One unit of fan-out work: fetch one URL, stream it to disk, and send
/// exactly one `Outcome` back to the coordinator.
pub struct DownloadTask {
    fetcher: Fetcher,
    request: DownloadRequest,
    deadline: Duration,
    reporter: Arc<dyn Reporter>,
    outcome_tx: mpsc::Sender<Outcome>,
}

impl DownloadTask {
    pub fn new(
        fetcher: Fetcher,
        request: DownloadRequest,
        deadline: Duration,
        reporter: Arc<dyn Reporter>,
        outcome_tx: mpsc::Sender<Outcome>,
    ) -> Self {
        Self {
            fetcher,
            request,
            deadline,
            reporter,
            outcome_tx,
        }
    }

    /// Runs the task to completion. The fetch and write are bounded by
    /// the deadline; on expiry a timeout outcome is synthesized so the
    /// coordinator's pending count still reaches zero. This method sends
    /// exactly one outcome on every path.
    pub async fn run(self) {
        let url = self.request.url.clone();
        tracing::debug!(%url, "task starting");

        let outcome = match tokio::time::timeout(self.deadline, self.execute()).await {
            Ok(Ok((file_name, bytes_written))) => Outcome::Completed {
                file_name,
                bytes_written,
            },
            Ok(Err(error)) => Outcome::Failed { url, error },
            Err(_) => Outcome::Failed {
                url,
                error: DownloadError::Timeout(self.deadline),
            },
        };

        // A send error only means the coordinator is gone; there is no
        // one left to report to.
        let _ = self.outcome_tx.send(outcome).await;
    }

    async fn execute(&self) -> Result<(String, u64), DownloadError> {
        // No file is touched until the request has succeeded.
        let response = self.fetcher.fetch(&self.request.url).await?;

        let file_name = self.request.file_name();
        let path = self.request.destination();
        self.reporter.event(Event::Started { path: path.clone() });

        let bytes_written = sink::write_stream(response.bytes_stream(), &path).await?;
        tracing::debug!(file = %file_name, bytes_written, "task finished");
        Ok((file_name, bytes_written))
    }
}
