//! What the user sees, derived from [`BoothState`].

use super::{BoothState, Phase};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    /// "Start Camera".
    Start,
    /// "Capture Photo" and "Stop Camera".
    CaptureStop,
}

/// The captured photo with its download and clear actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPanel {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub controls: Controls,
    /// Live preview region is shown.
    pub preview: bool,
    pub error_banner: Option<String>,
    pub photo: Option<PhotoPanel>,
}

impl View {
    pub fn from_state(state: &BoothState) -> Self {
        let streaming = state.phase() == Phase::Streaming;
        Self {
            controls: if streaming {
                Controls::CaptureStop
            } else {
                Controls::Start
            },
            preview: streaming,
            error_banner: state.error().map(|e| e.to_string()),
            photo: state.photo().map(|p| PhotoPanel {
                sequence: p.sequence(),
                width: p.width(),
                height: p.height(),
            }),
        }
    }

    /// Idle start screen: only the start button, nothing else.
    pub fn is_start_screen(&self) -> bool {
        self.controls == Controls::Start && !self.preview && self.photo.is_none()
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.controls {
            Controls::Start => writeln!(f, "[ Start Camera ]")?,
            Controls::CaptureStop => writeln!(f, "[ Capture Photo ]  [ Stop Camera ]")?,
        }
        if let Some(error) = &self.error_banner {
            writeln!(f, "! {error}")?;
        }
        if self.preview {
            writeln!(f, "(live preview)")?;
        }
        if let Some(photo) = &self.photo {
            writeln!(
                f,
                "photo #{} {}x{}  [ Download ]  [ Clear ]",
                photo.sequence, photo.width, photo.height
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booth::Transition;
    use crate::photo::CapturedImage;

    #[test]
    fn test_idle_view() {
        let view = View::from_state(&BoothState::new());
        assert!(view.is_start_screen());
        assert_eq!(view.error_banner, None);
        assert_eq!(view.to_string(), "[ Start Camera ]\n");
    }

    #[test]
    fn test_requesting_still_shows_start() {
        let mut state = BoothState::new();
        state.apply(Transition::StartRequested).unwrap();
        assert_eq!(View::from_state(&state).controls, Controls::Start);
    }

    #[test]
    fn test_streaming_with_photo() {
        let mut state = BoothState::new();
        state.apply(Transition::StartRequested).unwrap();
        state.apply(Transition::StreamGranted).unwrap();
        state
            .apply(Transition::PhotoCaptured(CapturedImage::new(
                "data:image/png;base64,".to_string(),
                640,
                480,
                3,
            )))
            .unwrap();

        let view = View::from_state(&state);
        assert_eq!(view.controls, Controls::CaptureStop);
        assert!(view.preview);
        assert_eq!(
            view.photo,
            Some(PhotoPanel {
                sequence: 3,
                width: 640,
                height: 480
            })
        );
        assert!(view.to_string().contains("[ Download ]  [ Clear ]"));
    }

    #[test]
    fn test_error_banner() {
        let mut state = BoothState::new();
        state.apply(Transition::StartRequested).unwrap();
        state.apply(Transition::StreamDenied).unwrap();

        let view = View::from_state(&state);
        assert_eq!(
            view.error_banner.as_deref(),
            Some("Unable to access camera. Please grant camera permissions.")
        );
        assert!(view
            .to_string()
            .contains("! Unable to access camera. Please grant camera permissions."));
    }
}
