//! Saving a captured image under a timestamped filename.

use super::{data_uri::DataUriError, CapturedImage};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("captured image is not a valid data URI: {0}")]
    Decode(#[from] DataUriError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination of a download.
pub trait FileSaver {
    /// Saves `bytes` under `filename` and returns where they landed.
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Writes downloads into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ExportError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Keeps downloads in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySaver {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.files
    }
}

impl FileSaver for MemorySaver {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        self.files.insert(filename.to_string(), bytes.to_vec());
        Ok(PathBuf::from(filename))
    }
}

/// Epoch-millisecond stamps that strictly increase within a session,
/// even when two downloads land in the same millisecond or the wall
/// clock steps back.
#[derive(Debug, Clone, Default)]
pub struct FilenameClock {
    last: Option<i64>,
}

impl FilenameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamp(&mut self, now: DateTime<Utc>) -> i64 {
        let millis = now.timestamp_millis();
        let stamp = match self.last {
            Some(last) if millis <= last => last + 1,
            _ => millis,
        };
        self.last = Some(stamp);
        stamp
    }
}

/// Turns captured images into saved files.
#[derive(Debug)]
pub struct Exporter<S: FileSaver> {
    saver: S,
    prefix: String,
    clock: FilenameClock,
}

impl<S: FileSaver> Exporter<S> {
    pub fn new(saver: S) -> Self {
        Self::with_prefix(saver, "photobooth")
    }

    pub fn with_prefix(saver: S, prefix: impl Into<String>) -> Self {
        Self {
            saver,
            prefix: prefix.into(),
            clock: FilenameClock::new(),
        }
    }

    /// Next filename, `<prefix>-<epoch millis>.png`.
    pub fn next_filename(&mut self, now: DateTime<Utc>) -> String {
        format!("{}-{}.png", self.prefix, self.clock.stamp(now))
    }

    /// Decodes the image and hands it to the saver.
    pub fn download(&mut self, image: &CapturedImage) -> Result<PathBuf, ExportError> {
        let bytes = image.decode()?;
        let filename = self.next_filename(Utc::now());
        let path = self.saver.save(&filename, &bytes)?;
        tracing::info!(
            path = %path.display(),
            bytes = bytes.len(),
            sequence = image.sequence(),
            captured_at = %image.captured_at(),
            "Photo downloaded"
        );
        Ok(path)
    }

    pub fn saver(&self) -> &S {
        &self.saver
    }
}
