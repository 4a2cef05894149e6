use chrono::Local;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::RecordingStore;
use crate::error::{Error, Result};
use crate::models::{Event, Recording};

pub const RECORDING_EXTENSION: &str = "json";

/// Stores each recording as a pretty-printed JSON document in one directory.
#[derive(Debug, Clone)]
pub struct JsonRecordingStore {
    directory: PathBuf,
}

impl JsonRecordingStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// `recording_YYYYMMDD_HHMMSS.json`, from the current local time.
    pub fn default_filename() -> String {
        format!(
            "recording_{}.{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            RECORDING_EXTENSION
        )
    }

    fn target_path(&self, filename: Option<&str>) -> PathBuf {
        let filename = match filename {
            Some(name) => name.to_string(),
            None => Self::default_filename(),
        };
        let mut path = self.directory.join(filename);
        if path.extension().is_none() {
            path.set_extension(RECORDING_EXTENSION);
        }
        path
    }
}

impl RecordingStore for JsonRecordingStore {
    fn save(&self, events: &[Event], filename: Option<&str>) -> Result<Option<PathBuf>> {
        if events.is_empty() {
            warn!("No events to save");
            return Ok(None);
        }

        if !self.directory.exists() {
            info!("Creating recordings directory: {}", self.directory.display());
            fs::create_dir_all(&self.directory).map_err(|e| Error::io(&self.directory, e))?;
        }

        let path = self.target_path(filename);
        let recording = Recording::new(events.to_vec());

        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &recording)
            .map_err(|e| Error::io(&path, e.into()))?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| Error::io(&path, e))?;

        info!("Recording saved to {} ({} events)", path.display(), events.len());
        Ok(Some(path))
    }

    fn load(&self, path: &Path) -> Result<Recording> {
        if !path.exists() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        // Parse loosely first so a missing field is reported by name.
        let document: Value = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::format(path, e.to_string()))?;

        let Some(fields) = document.as_object() else {
            return Err(Error::format(path, "document is not a JSON object"));
        };
        for required in ["version", "events"] {
            if !fields.contains_key(required) {
                return Err(Error::format(path, format!("missing `{}` field", required)));
            }
        }

        let recording: Recording =
            serde_json::from_value(document).map_err(|e| Error::format(path, e.to_string()))?;

        if !recording.is_time_ordered() {
            warn!("Events in {} are not in timestamp order", path.display());
        }
        info!("Loaded {} events from {}", recording.len(), path.display());
        Ok(recording)
    }

    fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.directory).map_err(|e| Error::io(&self.directory, e))?;
        let mut recordings = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&self.directory, e))?.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == RECORDING_EXTENSION) {
                recordings.push(path);
            }
        }
        recordings.sort();
        Ok(recordings)
    }
}
