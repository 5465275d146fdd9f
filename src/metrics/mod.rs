//! Prometheus metrics exporter for booth monitoring.
//!
//! # Metrics Exposed
//!
//! - `photobooth_streaming` - Camera stream active (1) or idle (0)
//! - `photobooth_photo_present` - Captured photo held (1) or not (0)
//! - `photobooth_captures_total` - Photos captured
//! - `photobooth_captures_skipped_total` - Captures refused, no frame ready
//! - `photobooth_downloads_total` - Photos downloaded
//! - `photobooth_camera_errors_total` - Camera access failures
//! - `photobooth_playback_errors_total` - Preview playback failures
//! - `photobooth_stream_releases_total` - Camera streams released
//!
//! The HTTP endpoint is only built with the `metrics` feature.

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, ServerError};
