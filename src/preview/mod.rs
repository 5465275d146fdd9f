//! Live preview: the video surface and the binder that attaches the
//! active stream to it.

mod binder;
mod surface;

pub use binder::PreviewBinder;
pub use surface::{
    ListenerId, Notification, PlaybackError, ReadyState, SurfaceEvent, VideoSurface,
};
