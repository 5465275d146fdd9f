//! Ownership of the single active stream.

use super::{Camera, CameraError, MediaStream, StreamConstraints, StreamId};

/// Holds at most one active [`MediaStream`] and guarantees its release.
///
/// The stream is acquired by [`start`](Self::start) and released by
/// [`stop`](Self::stop) or when the manager is dropped, whichever comes
/// first.
pub struct StreamManager<C: Camera> {
    camera: C,
    constraints: StreamConstraints,
    active: Option<MediaStream>,
}

impl<C: Camera> StreamManager<C> {
    pub fn new(camera: C, constraints: StreamConstraints) -> Self {
        Self {
            camera,
            constraints,
            active: None,
        }
    }

    /// Acquires a stream, or returns the one already held.
    ///
    /// Failures are logged and returned; nothing is retried.
    pub fn start(&mut self) -> Result<StreamId, CameraError> {
        if let Some(stream) = &self.active {
            tracing::debug!(stream = %stream.id(), "Stream already active");
            return Ok(stream.id());
        }

        match self.camera.request_stream(&self.constraints) {
            Ok(stream) => {
                let id = stream.id();
                tracing::info!(
                    stream = %id,
                    settings = ?stream.video_settings(),
                    "Camera stream acquired"
                );
                self.active = Some(stream);
                Ok(id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error accessing camera");
                Err(e)
            }
        }
    }

    /// Stops every track of the active stream and drops the handle.
    ///
    /// Returns `true` if a stream was released.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(mut stream) => {
                let released = stream.stop();
                tracing::info!(stream = %stream.id(), "Camera stream stopped");
                released
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<&MediaStream> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut MediaStream> {
        self.active.as_mut()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn constraints(&self) -> &StreamConstraints {
        &self.constraints
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }
}

impl<C: Camera> Drop for StreamManager<C> {
    fn drop(&mut self) {
        self.stop();
    }
}
