use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{Event, Recording};

mod json_store;
pub use json_store::*;

pub trait RecordingStore {
    /// Persists `events` as a new recording and returns where it was written.
    /// An empty buffer is not persisted and yields `Ok(None)`.
    fn save(&self, events: &[Event], filename: Option<&str>) -> Result<Option<PathBuf>>;

    fn load(&self, path: &Path) -> Result<Recording>;

    /// Recordings available in the store, sorted by file name.
    fn list(&self) -> Result<Vec<PathBuf>>;
}
