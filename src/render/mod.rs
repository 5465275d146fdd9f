//! Capture engine: offscreen canvas, mirror transform, PNG encoding.

mod canvas;
mod encode;
mod engine;
mod transform;

pub use canvas::{Canvas, CANVAS_CHANNELS};
pub use encode::{encode_png, encode_png_data_uri, EncodeError, PNG_MIME};
pub use engine::CaptureEngine;
pub use transform::Transform;
