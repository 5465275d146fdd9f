//! Booth state and its transition function.
//!
//! ```text
//! Idle --StartRequested--> Requesting --StreamGranted--> Streaming
//!                          Requesting --StreamDenied---> Idle + CameraAccess
//! Streaming --PhotoCaptured--> Streaming + photo --PhotoCleared--> Streaming
//! Streaming --PlaybackFailed--> Streaming + Playback
//! any --Stopped--> Idle (photo kept)        any --Unmounted--> Idle (empty)
//! ```

use crate::photo::CapturedImage;
use thiserror::Error;

/// User-facing error shown in the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoothError {
    #[error("Unable to access camera. Please grant camera permissions.")]
    CameraAccess,
    #[error("Unable to play video stream.")]
    Playback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A stream request is outstanding.
    Requesting,
    Streaming,
}

#[derive(Debug, Clone)]
pub enum Transition {
    StartRequested,
    StreamGranted,
    StreamDenied,
    PlaybackFailed,
    Stopped,
    PhotoCaptured(CapturedImage),
    PhotoCleared,
    Unmounted,
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::StartRequested => "start-requested",
            Transition::StreamGranted => "stream-granted",
            Transition::StreamDenied => "stream-denied",
            Transition::PlaybackFailed => "playback-failed",
            Transition::Stopped => "stopped",
            Transition::PhotoCaptured(_) => "photo-captured",
            Transition::PhotoCleared => "photo-cleared",
            Transition::Unmounted => "unmounted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{transition} is not allowed while {phase:?}")]
pub struct InvalidTransition {
    pub phase: Phase,
    pub transition: &'static str,
}

#[derive(Debug, Clone)]
pub struct BoothState {
    phase: Phase,
    photo: Option<CapturedImage>,
    error: Option<BoothError>,
}

impl Default for BoothState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            photo: None,
            error: None,
        }
    }
}

impl BoothState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn photo(&self) -> Option<&CapturedImage> {
        self.photo.as_ref()
    }

    pub fn error(&self) -> Option<BoothError> {
        self.error
    }

    pub fn is_streaming(&self) -> bool {
        self.phase == Phase::Streaming
    }

    /// Applies `transition`, leaving the state untouched when it is not
    /// allowed from the current phase.
    pub fn apply(&mut self, transition: Transition) -> Result<(), InvalidTransition> {
        let rejected = InvalidTransition {
            phase: self.phase,
            transition: transition.name(),
        };

        match (self.phase, transition) {
            (Phase::Idle, Transition::StartRequested) => {
                self.error = None;
                self.phase = Phase::Requesting;
            }
            (Phase::Requesting, Transition::StreamGranted) => {
                self.error = None;
                self.phase = Phase::Streaming;
            }
            (Phase::Requesting, Transition::StreamDenied) => {
                self.error = Some(BoothError::CameraAccess);
                self.phase = Phase::Idle;
            }
            (Phase::Streaming, Transition::PlaybackFailed) => {
                self.error = Some(BoothError::Playback);
            }
            (_, Transition::Stopped) => {
                self.phase = Phase::Idle;
            }
            (Phase::Streaming, Transition::PhotoCaptured(image)) => {
                self.photo = Some(image);
            }
            (_, Transition::PhotoCleared) => {
                self.photo = None;
            }
            (_, Transition::Unmounted) => {
                *self = Self::default();
            }
            _ => return Err(rejected),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(sequence: u64) -> CapturedImage {
        CapturedImage::new(format!("data:image/png;base64,{sequence}"), 1, 1, sequence)
    }

    fn streaming() -> BoothState {
        let mut state = BoothState::new();
        state.apply(Transition::StartRequested).unwrap();
        state.apply(Transition::StreamGranted).unwrap();
        state
    }

    #[test]
    fn test_start_grant() {
        let state = streaming();
        assert_eq!(state.phase(), Phase::Streaming);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_start_denied() {
        let mut state = BoothState::new();
        state.apply(Transition::StartRequested).unwrap();
        state.apply(Transition::StreamDenied).unwrap();

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.error(), Some(BoothError::CameraAccess));
    }

    #[test]
    fn test_new_attempt_clears_error() {
        let mut state = BoothState::new();
        state.apply(Transition::StartRequested).unwrap();
        state.apply(Transition::StreamDenied).unwrap();

        state.apply(Transition::StartRequested).unwrap();
        assert_eq!(state.error(), None);
        assert_eq!(state.phase(), Phase::Requesting);
    }

    #[test]
    fn test_overlapping_start_rejected() {
        let mut state = BoothState::new();
        state.apply(Transition::StartRequested).unwrap();

        let err = state.apply(Transition::StartRequested).unwrap_err();
        assert_eq!(err.phase, Phase::Requesting);
        assert_eq!(state.phase(), Phase::Requesting);

        let mut state = streaming();
        assert!(state.apply(Transition::StartRequested).is_err());
        assert_eq!(state.phase(), Phase::Streaming);
    }

    #[test]
    fn test_capture_replaces_photo() {
        let mut state = streaming();
        state.apply(Transition::PhotoCaptured(image(1))).unwrap();
        state.apply(Transition::PhotoCaptured(image(2))).unwrap();

        assert_eq!(state.photo().unwrap().sequence(), 2);
    }

    #[test]
    fn test_capture_requires_streaming() {
        let mut state = BoothState::new();
        assert!(state.apply(Transition::PhotoCaptured(image(1))).is_err());
        assert!(state.photo().is_none());
    }

    #[test]
    fn test_playback_failure_keeps_streaming() {
        let mut state = streaming();
        state.apply(Transition::PlaybackFailed).unwrap();

        assert_eq!(state.phase(), Phase::Streaming);
        assert_eq!(state.error(), Some(BoothError::Playback));
    }

    #[test]
    fn test_stop_idempotent_and_keeps_photo() {
        let mut state = streaming();
        state.apply(Transition::PhotoCaptured(image(1))).unwrap();

        state.apply(Transition::Stopped).unwrap();
        state.apply(Transition::Stopped).unwrap();

        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.photo().is_some());
    }

    #[test]
    fn test_unmount_resets() {
        let mut state = streaming();
        state.apply(Transition::PhotoCaptured(image(1))).unwrap();
        state.apply(Transition::PlaybackFailed).unwrap();
        state.apply(Transition::Unmounted).unwrap();

        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.photo().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BoothError::CameraAccess.to_string(),
            "Unable to access camera. Please grant camera permissions."
        );
        assert_eq!(BoothError::Playback.to_string(), "Unable to play video stream.");
    }
}
