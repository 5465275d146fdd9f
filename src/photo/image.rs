//! The single captured still.

use super::data_uri::{self, DataUriError};
use chrono::{DateTime, Utc};

/// An encoded still image held in memory as a self-contained data URI.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    data_uri: String,
    width: u32,
    height: u32,
    captured_at: DateTime<Utc>,
    sequence: u64,
}

impl CapturedImage {
    pub fn new(data_uri: String, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            data_uri,
            width,
            height,
            captured_at: Utc::now(),
            sequence,
        }
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Capture number within the session, starting at 1.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Decodes the data URI payload.
    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        data_uri::decode(&self.data_uri).map(|(_, bytes)| bytes)
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("captured_at", &self.captured_at)
            .field("uri_bytes", &self.data_uri.len())
            .finish()
    }
}
