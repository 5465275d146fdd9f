//! The photobooth component: stream manager, preview, capture and
//! export driven through one [`BoothState`].

use super::{BoothState, Phase, Transition, View};
use crate::capture::{Camera, CameraError, FileConfig, StreamConstraints, StreamId, StreamManager};
use crate::photo::{ExportError, Exporter, FileSaver};
use crate::preview::{PlaybackError, PreviewBinder, VideoSurface};
use crate::render::{CaptureEngine, EncodeError};
use std::path::PathBuf;

/// Result of [`PhotoBooth::start_camera`].
#[derive(Debug)]
pub enum StartOutcome {
    Started(StreamId),
    /// Access failed; the error banner is set.
    Failed(CameraError),
    /// A stream is already active or being requested.
    Ignored,
}

/// Running counters, exported as metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoothStats {
    pub captures: u64,
    pub captures_skipped: u64,
    pub downloads: u64,
    pub camera_errors: u64,
    pub playback_errors: u64,
    pub stream_releases: u64,
}

/// Camera capture component.
///
/// Owns the camera stream for its whole life: whatever path ends it,
/// explicit [`stop_camera`](Self::stop_camera), [`unmount`](Self::unmount)
/// or drop, the device is released exactly once.
pub struct PhotoBooth<C: Camera, S: FileSaver> {
    streams: StreamManager<C>,
    surface: VideoSurface,
    binder: PreviewBinder,
    engine: CaptureEngine,
    exporter: Exporter<S>,
    state: BoothState,
    stats: BoothStats,
    mounted: bool,
}

impl<C: Camera, S: FileSaver> PhotoBooth<C, S> {
    pub fn new(camera: C, saver: S) -> Self {
        Self::with_parts(camera, saver, StreamConstraints::default(), true, "photobooth")
    }

    pub fn with_config(camera: C, saver: S, config: &FileConfig) -> Self {
        Self::with_parts(
            camera,
            saver,
            config.camera.clone(),
            config.preview.autoplay,
            config.export.filename_prefix.clone(),
        )
    }

    fn with_parts(
        camera: C,
        saver: S,
        constraints: StreamConstraints,
        autoplay: bool,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            streams: StreamManager::new(camera, constraints),
            surface: VideoSurface::new(autoplay),
            binder: PreviewBinder::new(),
            engine: CaptureEngine::new(),
            exporter: Exporter::with_prefix(saver, prefix),
            state: BoothState::new(),
            stats: BoothStats::default(),
            mounted: true,
        }
    }

    /// Requests the camera.
    ///
    /// Ignored while a stream is active or a request is outstanding.
    pub fn start_camera(&mut self) -> StartOutcome {
        if let Err(e) = self.state.apply(Transition::StartRequested) {
            tracing::debug!(error = %e, "Ignoring start request");
            return StartOutcome::Ignored;
        }

        match self.streams.start() {
            Ok(id) => {
                self.transition(Transition::StreamGranted);
                self.sync_preview();
                StartOutcome::Started(id)
            }
            Err(e) => {
                self.stats.camera_errors += 1;
                self.transition(Transition::StreamDenied);
                StartOutcome::Failed(e)
            }
        }
    }

    /// Stops the camera and detaches the preview. Safe without a stream.
    ///
    /// Returns whether a stream was released.
    pub fn stop_camera(&mut self) -> bool {
        let released = self.streams.stop();
        if released {
            self.stats.stream_releases += 1;
        }
        self.transition(Transition::Stopped);
        self.sync_preview();
        released
    }

    /// Captures the current frame as the photo, replacing any previous one.
    ///
    /// Returns `Ok(false)` when there is nothing to capture yet.
    pub fn capture_photo(&mut self) -> Result<bool, EncodeError> {
        if self.state.phase() != Phase::Streaming {
            tracing::debug!(phase = ?self.state.phase(), "Capture ignored, camera not streaming");
            self.stats.captures_skipped += 1;
            return Ok(false);
        }

        match self.engine.capture(&self.surface)? {
            Some(image) => {
                self.transition(Transition::PhotoCaptured(image));
                self.stats.captures += 1;
                Ok(true)
            }
            None => {
                self.stats.captures_skipped += 1;
                Ok(false)
            }
        }
    }

    /// Discards the photo.
    pub fn clear_photo(&mut self) {
        self.transition(Transition::PhotoCleared);
    }

    /// Saves the photo; `Ok(None)` when there is none.
    pub fn download_photo(&mut self) -> Result<Option<PathBuf>, ExportError> {
        let Some(photo) = self.state.photo() else {
            tracing::debug!("No photo to download");
            return Ok(None);
        };
        let path = self.exporter.download(photo)?;
        self.stats.downloads += 1;
        Ok(Some(path))
    }

    /// Advances the preview by one frame.
    ///
    /// Loads metadata for a freshly bound stream and delivers the resulting
    /// events, which is where playback starts, then presents the next
    /// decoded frame. Returns whether a new frame was shown.
    pub fn tick(&mut self) -> Result<bool, CameraError> {
        let Some(stream) = self.streams.active() else {
            return Ok(false);
        };
        if self.surface.load(stream) {
            self.dispatch();
        }

        let Some(stream) = self.streams.active_mut() else {
            return Ok(false);
        };
        let presented = self.surface.present(stream)?;
        self.dispatch();
        Ok(presented)
    }

    pub fn view(&self) -> View {
        View::from_state(&self.state)
    }

    pub fn state(&self) -> &BoothState {
        &self.state
    }

    pub fn stats(&self) -> &BoothStats {
        &self.stats
    }

    pub fn surface(&self) -> &VideoSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut VideoSurface {
        &mut self.surface
    }

    pub fn camera(&self) -> &C {
        self.streams.camera()
    }

    pub fn camera_mut(&mut self) -> &mut C {
        self.streams.camera_mut()
    }

    pub fn saver(&self) -> &S {
        self.exporter.saver()
    }

    /// Tears the component down and returns its final counters.
    pub fn unmount(mut self) -> BoothStats {
        self.teardown();
        self.stats.clone()
    }

    fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.binder.teardown(&mut self.surface);
        if self.streams.stop() {
            self.stats.stream_releases += 1;
        }
        self.surface.set_source(None);
        self.transition(Transition::Unmounted);
        tracing::info!(stats = ?self.stats, "Photobooth unmounted");
    }

    fn sync_preview(&mut self) {
        let result = self.binder.sync(&mut self.surface, self.streams.active());
        self.playback_result(result);
        self.dispatch();
    }

    fn dispatch(&mut self) {
        loop {
            let notifications = self.surface.take_notifications();
            if notifications.is_empty() {
                break;
            }
            for notification in notifications {
                let result = self.binder.handle(&mut self.surface, notification);
                self.playback_result(result);
            }
        }
    }

    fn playback_result(&mut self, result: Result<(), PlaybackError>) {
        if result.is_err() {
            self.stats.playback_errors += 1;
            self.transition(Transition::PlaybackFailed);
        }
    }

    fn transition(&mut self, transition: Transition) {
        if let Err(e) = self.state.apply(transition) {
            tracing::warn!(error = %e, "Transition rejected");
        }
    }
}

impl<C: Camera, S: FileSaver> Drop for PhotoBooth<C, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
