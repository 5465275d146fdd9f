//! Keeps the video surface in step with the active stream.

use super::{ListenerId, Notification, PlaybackError, ReadyState, SurfaceEvent, VideoSurface};
use crate::capture::{MediaStream, StreamId};

/// Listeners installed for one bound stream.
#[derive(Debug)]
struct Binding {
    stream: StreamId,
    on_metadata: ListenerId,
    on_play: ListenerId,
}

impl Binding {
    fn owns(&self, listener: ListenerId) -> bool {
        self.on_metadata == listener || self.on_play == listener
    }
}

/// Effect keyed on the presence of an active stream.
///
/// Every change of key tears the previous binding down before the next
/// one is installed, so a surface never carries listeners for a stream
/// it no longer shows.
#[derive(Debug, Default)]
pub struct PreviewBinder {
    binding: Option<Binding>,
}

impl PreviewBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream currently bound, if any.
    pub fn bound_stream(&self) -> Option<StreamId> {
        self.binding.as_ref().map(|b| b.stream)
    }

    /// Reconciles the surface with `stream`.
    ///
    /// Binding a new stream sets it as the source (unless the surface
    /// already shows it) and subscribes to `LoadedMetadata` and `Play`.
    /// Playback normally starts when the metadata notification is
    /// [`handle`](Self::handle)d; if the surface already holds metadata it
    /// starts straight away instead. Returns the playback failure of that
    /// immediate attempt.
    pub fn sync(
        &mut self,
        surface: &mut VideoSurface,
        stream: Option<&MediaStream>,
    ) -> Result<(), PlaybackError> {
        let key = stream.map(MediaStream::id);
        if key == self.bound_stream() {
            return Ok(());
        }

        self.teardown(surface);

        let Some(stream) = stream else {
            surface.set_source(None);
            tracing::debug!("Preview detached");
            return Ok(());
        };

        if surface.source() != Some(stream.id()) {
            surface.set_source(Some(stream));
        }
        let on_metadata = surface.add_listener(SurfaceEvent::LoadedMetadata);
        let on_play = surface.add_listener(SurfaceEvent::Play);
        self.binding = Some(Binding {
            stream: stream.id(),
            on_metadata,
            on_play,
        });
        tracing::debug!(stream = %stream.id(), "Preview bound");

        if surface.ready_state() >= ReadyState::HaveMetadata {
            return Self::start_playback(surface);
        }
        Ok(())
    }

    /// Handles one surface notification.
    ///
    /// Notifications addressed to listeners outside the current binding
    /// are ignored.
    pub fn handle(
        &mut self,
        surface: &mut VideoSurface,
        notification: Notification,
    ) -> Result<(), PlaybackError> {
        let Some(binding) = &self.binding else {
            return Ok(());
        };
        if !binding.owns(notification.listener) {
            return Ok(());
        }

        match notification.event {
            SurfaceEvent::LoadedMetadata => Self::start_playback(surface),
            SurfaceEvent::Play => {
                tracing::debug!(stream = %binding.stream, "Video is playing");
                Ok(())
            }
            SurfaceEvent::LoadedData => Ok(()),
        }
    }

    /// Removes the current binding's listeners without touching the source.
    pub fn teardown(&mut self, surface: &mut VideoSurface) {
        if let Some(binding) = self.binding.take() {
            surface.remove_listener(binding.on_metadata);
            surface.remove_listener(binding.on_play);
        }
    }

    fn start_playback(surface: &mut VideoSurface) -> Result<(), PlaybackError> {
        surface.play().map_err(|e| {
            tracing::error!(error = %e, "Error playing video");
            e
        })
    }
}
