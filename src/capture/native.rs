//! Hardware camera backend built on nokhwa.

use super::{
    stream::{MediaStream, MediaTrack, TrackKind, TrackSettings, TrackState},
    Camera, CameraError, Frame, StreamConstraints,
};
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution},
    NokhwaError,
};

/// Opens local capture devices through the platform's native API.
///
/// Facing mode is advisory: desktop devices do not report which way
/// they face, so the device index decides.
#[derive(Debug, Default)]
pub struct NativeCamera;

impl NativeCamera {
    pub fn new() -> Self {
        Self
    }
}

fn classify(context: &str, error: NokhwaError) -> CameraError {
    let message = format!("{context}: {error}");
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized") {
        CameraError::PermissionDenied(message)
    } else if lower.contains("not found") || lower.contains("no device") {
        CameraError::DeviceNotFound(message)
    } else {
        CameraError::OpenFailed(message)
    }
}

impl Camera for NativeCamera {
    fn request_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> Result<MediaStream, CameraError> {
        constraints
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;

        let format = CameraFormat::new(
            Resolution::new(constraints.ideal_width, constraints.ideal_height),
            FrameFormat::MJPEG,
            constraints.frame_rate,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let mut device =
            nokhwa::Camera::new(CameraIndex::Index(constraints.device_index), requested)
                .map_err(|e| classify("create camera", e))?;
        device
            .open_stream()
            .map_err(|e| classify("open stream", e))?;

        let negotiated = device.camera_format();
        let settings = TrackSettings {
            width: negotiated.resolution().width(),
            height: negotiated.resolution().height(),
            frame_rate: negotiated.frame_rate(),
            facing_mode: None,
        };
        let label = device.info().human_name();

        tracing::info!(
            device = %label,
            width = settings.width,
            height = settings.height,
            fps = settings.frame_rate,
            requested_facing = ?constraints.facing_mode,
            "Native camera opened"
        );

        let track = NativeTrack {
            device,
            label,
            settings,
            sequence: 0,
            state: TrackState::Live,
        };
        Ok(MediaStream::new(vec![Box::new(track)]))
    }
}

struct NativeTrack {
    device: nokhwa::Camera,
    label: String,
    settings: TrackSettings,
    sequence: u64,
    state: TrackState,
}

impl MediaTrack for NativeTrack {
    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    fn label(&self) -> &str {
        &self.label
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
        let buffer = self
            .device
            .frame()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let image = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;

        let (width, height) = image.dimensions();
        self.sequence += 1;
        Ok(Some(Frame::new(image.into_raw(), width, height, self.sequence)))
    }

    fn stop(&mut self) {
        if self.state == TrackState::Ended {
            return;
        }
        self.state = TrackState::Ended;
        if let Err(e) = self.device.stop_stream() {
            tracing::warn!(device = %self.label, error = %e, "Failed to stop camera stream");
        } else {
            tracing::info!(device = %self.label, "Native camera stopped");
        }
    }
}
