//! Media stream handle and the tracks it owns.

use super::{CameraError, FacingMode, Frame};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a [`MediaStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(u64);

impl StreamId {
    fn next() -> Self {
        Self(NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stream-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Live,
    Ended,
}

/// What the backend actually negotiated for a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSettings {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub facing_mode: Option<FacingMode>,
}

/// A single track of a media stream.
pub trait MediaTrack {
    fn kind(&self) -> TrackKind;

    /// Human-readable device label.
    fn label(&self) -> &str;

    /// Negotiated settings, known as soon as the track exists.
    fn settings(&self) -> TrackSettings;

    fn state(&self) -> TrackState;

    /// Reads the next decoded frame.
    ///
    /// Returns `Ok(None)` while the device has not delivered a frame yet.
    fn read_frame(&mut self) -> Result<Option<Frame>, CameraError>;

    /// Stops the track and releases the device. Calling it on an ended
    /// track has no effect.
    fn stop(&mut self);
}

/// Handle to an active capture session.
///
/// The handle owns its tracks. Releasing stops every track exactly once,
/// either through [`MediaStream::stop`] or when the handle is dropped.
pub struct MediaStream {
    id: StreamId,
    tracks: Vec<Box<dyn MediaTrack>>,
    released: bool,
}

impl MediaStream {
    /// Wraps the tracks produced by a camera backend.
    pub fn new(tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self {
            id: StreamId::next(),
            tracks,
            released: false,
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn tracks(&self) -> impl Iterator<Item = &(dyn MediaTrack + 'static)> + '_ {
        self.tracks.iter().map(|t| &**t)
    }

    /// Returns the first video track.
    pub fn video_track(&self) -> Option<&(dyn MediaTrack + 'static)> {
        self.tracks().find(|t| t.kind() == TrackKind::Video)
    }

    pub fn video_track_mut(&mut self) -> Option<&mut (dyn MediaTrack + 'static)> {
        self.tracks
            .iter_mut()
            .find(|t| t.kind() == TrackKind::Video)
            .map(|t| &mut **t)
    }

    /// Settings of the video track, if there is one.
    pub fn video_settings(&self) -> Option<TrackSettings> {
        self.video_track().map(|t| t.settings())
    }

    /// True while at least one track is live and the handle is not released.
    pub fn is_active(&self) -> bool {
        !self.released && self.tracks.iter().any(|t| t.state() == TrackState::Live)
    }

    /// Stops every track.
    ///
    /// Returns `true` if this call released the stream, `false` if it
    /// had already been released.
    pub fn stop(&mut self) -> bool {
        if self.released {
            return false;
        }
        for track in &mut self.tracks {
            track.stop();
        }
        self.released = true;
        tracing::debug!(stream = %self.id, tracks = self.tracks.len(), "Stream released");
        true
    }
}

impl Drop for MediaStream {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id)
            .field("tracks", &self.tracks.len())
            .field("released", &self.released)
            .finish()
    }
}
