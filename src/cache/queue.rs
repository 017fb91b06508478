//! Reviews waiting to be posted once the backend is reachable again

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::store::{read_json, write_json};
use super::StoreError;
use crate::data::Review;

/// Storage key of the pending review queue
pub const SAVED_REVIEWS_KEY: &str = "SAVED_REVIEWS";

/// Ordered, persisted list of reviews written while offline
///
/// The queue lives in `{dir}/SAVED_REVIEWS.json` as a plain JSON array and is
/// re-read on every operation, so separate handles on the same directory
/// observe each other's writes.
#[derive(Debug, Clone)]
pub struct PendingQueue {
    path: PathBuf,
}

impl PendingQueue {
    /// Creates a queue stored in `dir`
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", SAVED_REVIEWS_KEY)),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All queued reviews, oldest first
    pub fn load(&self) -> Result<Vec<Review>, StoreError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    /// Replaces the queue contents; an empty list removes the file
    pub fn save(&self, reviews: &[Review]) -> Result<(), StoreError> {
        if reviews.is_empty() {
            return self.clear();
        }
        write_json(&self.path, &reviews)
    }

    /// Appends a review, returning the new queue length
    pub fn push(&self, review: Review) -> Result<usize, StoreError> {
        let mut reviews = self.load()?;
        reviews.push(review);
        self.save(&reviews)?;
        Ok(reviews.len())
    }

    /// Number of queued reviews
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.load()?.len())
    }

    /// Removes every queued review
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
