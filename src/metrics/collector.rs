//! Metrics collection and registry.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of booth state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Whether a camera stream is active.
    pub streaming: bool,
    /// Whether a captured photo is held.
    pub photo_present: bool,
    pub captures: u64,
    /// Capture requests that produced no photo: not streaming, or no frame yet.
    pub captures_skipped: u64,
    pub downloads: u64,
    pub camera_errors: u64,
    pub playback_errors: u64,
    pub stream_releases: u64,
}

/// Prometheus metrics registry for booth monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    // State gauges
    streaming: IntGauge,
    photo_present: IntGauge,

    // Activity counters
    captures_total: IntCounter,
    captures_skipped_total: IntCounter,
    downloads_total: IntCounter,

    // Error and resource counters
    camera_errors_total: IntCounter,
    playback_errors_total: IntCounter,
    stream_releases_total: IntCounter,
}

/// Advances a counter to `target`; counters never go backwards.
fn advance(counter: &IntCounter, target: u64) {
    let current = counter.get();
    if target > current {
        counter.inc_by(target - current);
    }
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all booth metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let streaming = IntGauge::new(
            "photobooth_streaming",
            "Whether a camera stream is active (1=streaming, 0=idle)",
        )?;
        let photo_present = IntGauge::new(
            "photobooth_photo_present",
            "Whether a captured photo is held (1=yes, 0=no)",
        )?;
        let captures_total =
            IntCounter::new("photobooth_captures_total", "Total photos captured")?;
        let captures_skipped_total = IntCounter::new(
            "photobooth_captures_skipped_total",
            "Capture requests that produced no photo (camera not streaming or no frame ready)",
        )?;
        let downloads_total =
            IntCounter::new("photobooth_downloads_total", "Total photos downloaded")?;
        let camera_errors_total = IntCounter::new(
            "photobooth_camera_errors_total",
            "Camera access failures",
        )?;
        let playback_errors_total = IntCounter::new(
            "photobooth_playback_errors_total",
            "Preview playback failures",
        )?;
        let stream_releases_total = IntCounter::new(
            "photobooth_stream_releases_total",
            "Camera streams released",
        )?;

        registry.register(Box::new(streaming.clone()))?;
        registry.register(Box::new(photo_present.clone()))?;
        registry.register(Box::new(captures_total.clone()))?;
        registry.register(Box::new(captures_skipped_total.clone()))?;
        registry.register(Box::new(downloads_total.clone()))?;
        registry.register(Box::new(camera_errors_total.clone()))?;
        registry.register(Box::new(playback_errors_total.clone()))?;
        registry.register(Box::new(stream_releases_total.clone()))?;

        Ok(Self {
            registry,
            streaming,
            photo_present,
            captures_total,
            captures_skipped_total,
            downloads_total,
            camera_errors_total,
            playback_errors_total,
            stream_releases_total,
        })
    }

    /// Updates all metrics from a snapshot of booth state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.streaming.set(i64::from(snapshot.streaming));
        self.photo_present.set(i64::from(snapshot.photo_present));

        advance(&self.captures_total, snapshot.captures);
        advance(&self.captures_skipped_total, snapshot.captures_skipped);
        advance(&self.downloads_total, snapshot.downloads);
        advance(&self.camera_errors_total, snapshot.camera_errors);
        advance(&self.playback_errors_total, snapshot.playback_errors);
        advance(&self.stream_releases_total, snapshot.stream_releases);
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from the current state of a booth.
    pub fn from_booth<C, S>(booth: &crate::booth::PhotoBooth<C, S>) -> Self
    where
        C: crate::capture::Camera,
        S: crate::photo::FileSaver,
    {
        let stats = booth.stats();
        Self {
            streaming: booth.state().is_streaming(),
            photo_present: booth.state().photo().is_some(),
            captures: stats.captures,
            captures_skipped: stats.captures_skipped,
            downloads: stats.downloads,
            camera_errors: stats.camera_errors,
            playback_errors: stats.playback_errors,
            stream_releases: stats.stream_releases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booth::PhotoBooth;
    use crate::capture::{FileConfig, MockCamera, StreamConstraints};
    use crate::photo::MemorySaver;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            streaming: true,
            photo_present: false,
            captures: 3,
            captures_skipped: 1,
            downloads: 2,
            camera_errors: 0,
            playback_errors: 0,
            stream_releases: 4,
        };
        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("photobooth_streaming 1"));
        assert!(output.contains("photobooth_photo_present 0"));
        assert!(output.contains("photobooth_captures_total 3"));
        assert!(output.contains("photobooth_stream_releases_total 4"));
    }

    #[test]
    fn test_counters_do_not_regress() {
        let registry = MetricsRegistry::new().unwrap();
        registry.update(&MetricsSnapshot {
            downloads: 5,
            ..Default::default()
        });
        registry.update(&MetricsSnapshot {
            downloads: 2,
            ..Default::default()
        });

        assert!(registry.encode().unwrap().contains("photobooth_downloads_total 5"));
    }

    #[test]
    fn test_snapshot_from_booth() {
        let config = FileConfig {
            camera: StreamConstraints::with_dimensions(4, 4),
            ..Default::default()
        };
        let mut booth = PhotoBooth::with_config(MockCamera::new(), MemorySaver::new(), &config);
        booth.start_camera();
        booth.tick().unwrap();
        booth.capture_photo().unwrap();

        let snapshot = MetricsSnapshot::from_booth(&booth);
        assert!(snapshot.streaming);
        assert!(snapshot.photo_present);
        assert_eq!(snapshot.captures, 1);
    }

    #[test]
    fn test_skipped_captures_from_idle_booth() {
        let registry = MetricsRegistry::new().unwrap();
        let mut booth = PhotoBooth::new(MockCamera::new(), MemorySaver::new());
        booth.capture_photo().unwrap();
        registry.update(&MetricsSnapshot::from_booth(&booth));

        let output = registry.encode().unwrap();
        assert!(output.contains("camera not streaming or no frame ready"));
        assert!(output.contains("photobooth_captures_skipped_total 1"));
    }
}
