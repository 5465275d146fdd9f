//! Captured photo handling: the image itself, its data URI encoding,
//! and export to a file.

pub mod data_uri;
mod export;
mod image;

pub use data_uri::DataUriError;
pub use export::{DirectorySaver, Exporter, ExportError, FileSaver, FilenameClock, MemorySaver};
pub use image::CapturedImage;
