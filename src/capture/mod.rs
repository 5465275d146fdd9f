//! Camera access and stream ownership.
//!
//! A [`Camera`] turns [`StreamConstraints`] into a [`MediaStream`]; the
//! [`StreamManager`] holds at most one such stream and releases it on
//! stop or drop.

mod camera;
mod config;
mod frame;
mod manager;
#[cfg(feature = "camera")]
mod native;
mod stream;

pub use camera::{Camera, CameraError, MockCamera, ReleaseCounter};
pub use config::{
    ConfigError, ExportConfig, FacingMode, FileConfig, MetricsConfig, PreviewConfig,
    StreamConstraints, MAX_DIMENSION,
};
pub use frame::{Frame, CHANNELS};
pub use manager::StreamManager;
#[cfg(feature = "camera")]
pub use native::NativeCamera;
pub use stream::{MediaStream, MediaTrack, StreamId, TrackKind, TrackSettings, TrackState};
