//! Photobooth Library
//!
//! Turns on a camera, shows a live preview, captures a mirrored still
//! frame as a PNG data URI, and saves or discards it.
//!
//! # Architecture
//!
//! ```text
//! capture (stream) → preview (surface + binder) → render (capture engine)
//!                                    ↓                     ↓
//!                          booth (state machine) ←── photo (image, export)
//! ```
//!
//! # Design Principles
//!
//! - **One stream, released once**: the stream handle is owned by a
//!   single manager and released on stop, unmount, or drop
//! - **Explicit state**: every change to phase, photo or error goes
//!   through [`BoothState::apply`]
//! - **What you see is what you get**: captures are mirrored like the preview
//! - **Not-ready is not an error**: capturing before a frame is decoded
//!   is a logged no-op
//!
//! # Example
//!
//! ```no_run
//! use photobooth::{
//!     booth::{PhotoBooth, StartOutcome},
//!     capture::MockCamera,
//!     photo::DirectorySaver,
//! };
//!
//! let mut booth = PhotoBooth::new(MockCamera::new(), DirectorySaver::new("shots"));
//!
//! if let StartOutcome::Started(_) = booth.start_camera() {
//!     booth.tick().unwrap();
//!     if booth.capture_photo().unwrap() {
//!         let path = booth.download_photo().unwrap();
//!         println!("saved {:?}", path);
//!     }
//! }
//!
//! booth.unmount();
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod booth;
pub mod capture;
pub mod metrics;
pub mod photo;
pub mod preview;
pub mod render;

// Re-export commonly used types at crate root
pub use booth::{BoothError, BoothState, Phase, PhotoBooth, StartOutcome, Transition, View};
pub use capture::{Camera, CameraError, FileConfig, MediaStream, MockCamera, StreamConstraints};
pub use photo::{CapturedImage, DirectorySaver, FileSaver, MemorySaver};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
