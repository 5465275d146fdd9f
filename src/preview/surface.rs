//! Video surface a stream is rendered onto.
//!
//! The surface mirrors the observable contract of a video element: a
//! source slot, a ready state that only moves forward while a source is
//! bound, a paused flag, and lifecycle events. Events are queued when they
//! fire and handed to the listeners registered when the queue is drained;
//! an event drained with no listener for it is lost.

use crate::capture::{CameraError, Frame, MediaStream, StreamId};
use std::collections::VecDeque;
use thiserror::Error;

/// How much media data the surface holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

/// Lifecycle events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Dimensions are known.
    LoadedMetadata,
    /// The first frame is available.
    LoadedData,
    /// Playback started.
    Play,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// An event delivered to one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub listener: ListenerId,
    pub event: SurfaceEvent,
}

/// Errors returned by [`VideoSurface::play`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no source bound to the video surface")]
    NoSource,
    #[error("playback not allowed without user interaction")]
    NotAllowed,
}

#[derive(Debug)]
struct Listener {
    id: ListenerId,
    event: SurfaceEvent,
}

#[derive(Debug)]
pub struct VideoSurface {
    source: Option<StreamId>,
    ready_state: ReadyState,
    dimensions: Option<(u32, u32)>,
    current_frame: Option<Frame>,
    paused: bool,
    autoplay_allowed: bool,
    listeners: Vec<Listener>,
    next_listener: u64,
    pending: VecDeque<SurfaceEvent>,
}

impl Default for VideoSurface {
    fn default() -> Self {
        Self::new(true)
    }
}

impl VideoSurface {
    pub fn new(autoplay_allowed: bool) -> Self {
        Self {
            source: None,
            ready_state: ReadyState::HaveNothing,
            dimensions: None,
            current_frame: None,
            paused: true,
            autoplay_allowed,
            listeners: Vec::new(),
            next_listener: 0,
            pending: VecDeque::new(),
        }
    }

    /// Binds a stream as the source, or clears the source with `None`.
    ///
    /// Binding resets the surface to `HaveNothing` and drops events still
    /// queued for the previous source. Metadata arrives on the next
    /// [`load`](Self::load).
    pub fn set_source(&mut self, stream: Option<&MediaStream>) {
        self.current_frame = None;
        self.dimensions = None;
        self.ready_state = ReadyState::HaveNothing;
        self.paused = true;
        self.pending.clear();
        self.source = stream.map(MediaStream::id);
    }

    /// Reads track metadata from the bound `stream`.
    ///
    /// The first successful load moves the surface to `HaveMetadata` and
    /// fires `LoadedMetadata`. Returns whether this call loaded it.
    pub fn load(&mut self, stream: &MediaStream) -> bool {
        if self.source != Some(stream.id()) || self.ready_state > ReadyState::HaveNothing {
            return false;
        }
        let Some(settings) = stream.video_settings() else {
            return false;
        };
        self.dimensions = Some((settings.width, settings.height));
        self.ready_state = ReadyState::HaveMetadata;
        self.fire(SurfaceEvent::LoadedMetadata);
        true
    }

    pub fn source(&self) -> Option<StreamId> {
        self.source
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Native pixel dimensions of the bound video, once metadata is known.
    pub fn video_dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Most recently decoded frame.
    pub fn current_frame(&self) -> Option<&Frame> {
        self.current_frame.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        !self.paused
    }

    pub fn set_autoplay_allowed(&mut self, allowed: bool) {
        self.autoplay_allowed = allowed;
    }

    /// Starts playback. Safe to call repeatedly.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if self.source.is_none() {
            return Err(PlaybackError::NoSource);
        }
        if !self.autoplay_allowed {
            return Err(PlaybackError::NotAllowed);
        }
        if self.paused {
            self.paused = false;
            self.fire(SurfaceEvent::Play);
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Pulls the next decoded frame from `stream` while it is the bound
    /// source and playback is running. Loads metadata first if needed.
    ///
    /// Returns whether a new frame was presented.
    pub fn present(&mut self, stream: &mut MediaStream) -> Result<bool, CameraError> {
        self.load(stream);
        if self.source != Some(stream.id()) || self.paused {
            return Ok(false);
        }
        let Some(track) = stream.video_track_mut() else {
            return Ok(false);
        };
        let Some(frame) = track.read_frame()? else {
            return Ok(false);
        };

        self.dimensions = Some((frame.width(), frame.height()));
        self.current_frame = Some(frame);
        if self.ready_state < ReadyState::HaveCurrentData {
            self.ready_state = ReadyState::HaveCurrentData;
            self.fire(SurfaceEvent::LoadedData);
        }
        self.ready_state = ReadyState::HaveEnoughData;
        Ok(true)
    }

    /// Registers a listener for `event`.
    pub fn add_listener(&mut self, event: SurfaceEvent) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener { id, event });
        id
    }

    /// Removes a listener. Events drained afterwards no longer reach it.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drains the events fired since the last call, one notification per
    /// event and currently registered listener.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        let listeners = &self.listeners;
        self.pending
            .drain(..)
            .flat_map(move |event| {
                listeners
                    .iter()
                    .filter(move |l| l.event == event)
                    .map(move |l| Notification {
                        listener: l.id,
                        event,
                    })
            })
            .collect()
    }

    fn fire(&mut self, event: SurfaceEvent) {
        self.pending.push_back(event);
    }
}
