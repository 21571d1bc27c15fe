//! Best-time record stored as a small JSON file.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collaborators::BestTimeStore;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("best time file i/o: {0}")]
    Io(#[from] io::Error),
    #[error("best time file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BestTimeRecord {
    best_time_secs: f64,
}

/// Best time persisted to `path`. A missing or unreadable file reads as 0.
#[derive(Debug, Clone)]
pub struct JsonFileBestTime {
    path: PathBuf,
}

impl JsonFileBestTime {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<f64, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let record: BestTimeRecord = serde_json::from_str(&text)?;
                Ok(record.best_time_secs.max(0.0))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0.0),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, secs: f64) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(&BestTimeRecord {
            best_time_secs: secs,
        })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl BestTimeStore for JsonFileBestTime {
    fn best_time(&self) -> f64 {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "ignoring best time record: {e}");
            0.0
        })
    }

    fn set_best_time(&mut self, secs: f64) {
        if let Err(e) = self.save(secs) {
            tracing::warn!(path = %self.path.display(), "could not save best time: {e}");
        }
    }
}
