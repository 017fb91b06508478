//! Cache module for persisting backend records to disk
//!
//! This module provides the local store that mirrors restaurants and reviews
//! for offline viewing, and the pending queue holding reviews written while
//! the backend was unreachable.

mod queue;
mod store;

pub use queue::{PendingQueue, SAVED_REVIEWS_KEY};
pub use store::LocalStore;

use thiserror::Error;

/// Errors from reading or writing local files
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed
    #[error("Local storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored JSON could not be read or written
    #[error("Local storage holds invalid data: {0}")]
    Serialization(#[from] serde_json::Error),
}
