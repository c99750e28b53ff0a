pub mod fetcher;
pub mod limiter;
pub mod manager;
pub mod models;
pub mod progress;
pub mod report;
pub mod sink;
pub mod worker;

/// Convenient re-exports of the common types.
pub mod prelude {
    pub use crate::fetcher::{FetchError, Fetcher};
    pub use crate::manager::{Coordinator, ManagerError, Options};
    pub use crate::models::{DownloadRequest, Outcome, Summary};
    pub use crate::report::{ConsoleReporter, Event, Reporter};
    pub use crate::worker::DownloadError;
}
