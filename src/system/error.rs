use std::path::PathBuf;

use thiserror::Error;

/// Failures while discovering or reading port counters.
///
/// Every variant is fatal for the pipeline: there is no partial-snapshot mode.
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("counter name `{name}` is not unique: found in {} and {}", .first.display(), .second.display())]
    DuplicateCounterName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to read counter `{name}` ({}): {reason}", .path.display())]
    CounterReadError {
        name: String,
        path: PathBuf,
        reason: String,
    },

    #[error("tracked counter `{name}` was not found under any counter directory")]
    MissingTrackedCounter { name: String },

    #[error("cannot list counter directory {}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
