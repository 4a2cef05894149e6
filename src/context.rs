use interactflow_common::{Clock, JsonRecordingStore, RecordingStore, Result};
use interactflow_recorder::{EventCapture, InputSource};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Config;

/// Everything a command needs, built once at startup and passed down by
/// reference.
pub struct AppContext {
    pub config: Config,
    pub store: JsonRecordingStore,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let store = JsonRecordingStore::new(&config.recordings_dir);
        AppContext { config, store }
    }

    /// Stops `capture` and persists whatever it collected. Run when the
    /// user interrupts a recording.
    pub fn finish_recording<S, C>(
        &self,
        capture: &mut EventCapture<S, C>,
        name: Option<&str>,
    ) -> Result<Option<PathBuf>>
    where
        S: InputSource<C>,
        C: Clock + 'static,
    {
        if capture.is_recording() {
            capture.stop();
        }
        let events = capture.take_events();
        self.store.save(&events, name)
    }

    /// Uses `file` as given when it exists, otherwise looks for it in the
    /// recordings directory.
    pub fn resolve_recording(&self, file: &Path) -> PathBuf {
        if file.exists() {
            return file.to_path_buf();
        }
        let candidate = self.store.directory().join(file);
        if candidate.exists() {
            debug!("Resolved {} to {}", file.display(), candidate.display());
            return candidate;
        }
        file.to_path_buf()
    }
}
