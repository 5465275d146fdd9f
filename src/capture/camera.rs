//! Camera abstraction for stream acquisition.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for testing.

use super::{
    stream::{MediaStream, MediaTrack, TrackKind, TrackSettings, TrackState},
    Frame, StreamConstraints, CHANNELS,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("track has ended")]
    TrackEnded,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait Camera {
    /// Requests a video stream matching the constraints as closely as the
    /// device allows.
    fn request_stream(&mut self, constraints: &StreamConstraints)
        -> Result<MediaStream, CameraError>;
}

/// Counts device releases across every stream a [`MockCamera`] produced.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock camera for testing that generates synthetic frames.
///
/// Frames are a horizontal red ramp over a vertical green ramp, so any
/// mirroring is visible in the output.
#[derive(Debug, Clone)]
pub struct MockCamera {
    grant: bool,
    warmup_frames: u32,
    requests: u32,
    releases: ReleaseCounter,
}

impl Default for MockCamera {
    fn default() -> Self {
        Self {
            grant: true,
            warmup_frames: 0,
            requests: 0,
            releases: ReleaseCounter::default(),
        }
    }
}

impl MockCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// A camera whose permission prompt is always refused.
    pub fn denied() -> Self {
        Self {
            grant: false,
            ..Self::default()
        }
    }

    /// Number of reads that return no frame before the first decoded one.
    pub fn with_warmup(mut self, frames: u32) -> Self {
        self.warmup_frames = frames;
        self
    }

    /// Flips the permission answer for subsequent requests.
    pub fn set_granted(&mut self, grant: bool) {
        self.grant = grant;
    }

    /// Number of stream requests seen so far.
    pub fn requests(&self) -> u32 {
        self.requests
    }

    /// Shared handle observing track releases.
    pub fn release_counter(&self) -> ReleaseCounter {
        self.releases.clone()
    }
}

impl Camera for MockCamera {
    fn request_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> Result<MediaStream, CameraError> {
        self.requests += 1;
        constraints
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        if !self.grant {
            return Err(CameraError::PermissionDenied(
                "user dismissed the permission prompt".to_string(),
            ));
        }

        let track = MockTrack {
            settings: TrackSettings {
                width: constraints.ideal_width,
                height: constraints.ideal_height,
                frame_rate: constraints.frame_rate,
                facing_mode: Some(constraints.facing_mode),
            },
            warmup_remaining: self.warmup_frames,
            sequence: 0,
            state: TrackState::Live,
            releases: self.releases.clone(),
        };
        tracing::info!(?constraints, "MockCamera granted stream");
        Ok(MediaStream::new(vec![Box::new(track)]))
    }
}

struct MockTrack {
    settings: TrackSettings,
    warmup_remaining: u32,
    sequence: u64,
    state: TrackState,
    releases: ReleaseCounter,
}

impl MockTrack {
    fn synthesize(&self) -> Frame {
        let TrackSettings { width, height, .. } = self.settings;
        let x_span = width.saturating_sub(1).max(1);
        let y_span = height.saturating_sub(1).max(1);
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * CHANNELS);
        for y in 0..height {
            let g = ramp(y, y_span);
            for x in 0..width {
                let r = ramp(x, x_span);
                pixels.extend_from_slice(&[r, g, (self.sequence % 256) as u8]);
            }
        }
        Frame::new(pixels, width, height, self.sequence)
    }
}

/// Scales `pos` in `0..=span` to `0..=255`.
fn ramp(pos: u32, span: u32) -> u8 {
    (u64::from(pos) * 255 / u64::from(span)).min(255) as u8
}

impl MediaTrack for MockTrack {
    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    fn label(&self) -> &str {
        "Mock Camera"
    }

    fn settings(&self) -> TrackSettings {
        self.settings
    }

    fn state(&self) -> TrackState {
        self.state
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        if self.state == TrackState::Ended {
            return Err(CameraError::TrackEnded);
        }
        if self.warmup_remaining > 0 {
            self.warmup_remaining -= 1;
            return Ok(None);
        }
        self.sequence += 1;
        Ok(Some(self.synthesize()))
    }

    fn stop(&mut self) {
        if self.state == TrackState::Live {
            self.state = TrackState::Ended;
            self.releases.record();
            tracing::info!("MockCamera track stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_spans_full_range() {
        assert_eq!(ramp(0, 9), 0);
        assert_eq!(ramp(9, 9), 255);
        assert_eq!(ramp(u32::MAX - 1, u32::MAX - 1), 255);
        let edge = crate::capture::MAX_DIMENSION - 1;
        assert_eq!(ramp(edge / 2, edge), 127);
    }

    #[test]
    fn test_mock_camera_lifecycle() {
        let mut camera = MockCamera::new();
        let mut stream = camera
            .request_stream(&StreamConstraints::with_dimensions(16, 9))
            .unwrap();
        let track = stream.video_track_mut().unwrap();

        let frame = track.read_frame().unwrap().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 1);

        let frame2 = track.read_frame().unwrap().unwrap();
        assert_eq!(frame2.sequence(), 2);

        track.stop();
        assert_eq!(track.state(), TrackState::Ended);
        assert!(matches!(track.read_frame(), Err(CameraError::TrackEnded)));
    }

    #[test]
    fn test_denied_camera() {
        let mut camera = MockCamera::denied();
        let result = camera.request_stream(&StreamConstraints::default());
        assert!(matches!(result, Err(CameraError::PermissionDenied(_))));
        assert_eq!(camera.requests(), 1);
    }

    #[test]
    fn test_warmup_frames() {
        let mut camera = MockCamera::new().with_warmup(2);
        let mut stream = camera
            .request_stream(&StreamConstraints::with_dimensions(4, 4))
            .unwrap();
        let track = stream.video_track_mut().unwrap();

        assert!(track.read_frame().unwrap().is_none());
        assert!(track.read_frame().unwrap().is_none());
        assert!(track.read_frame().unwrap().is_some());
    }

    #[test]
    fn test_frames_are_horizontally_asymmetric() {
        let mut camera = MockCamera::new();
        let mut stream = camera
            .request_stream(&StreamConstraints::with_dimensions(10, 2))
            .unwrap();
        let frame = stream.video_track_mut().unwrap().read_frame().unwrap().unwrap();

        assert_eq!(frame.rgb(0, 0).unwrap()[0], 0);
        assert_eq!(frame.rgb(9, 0).unwrap()[0], 255);
    }
}
