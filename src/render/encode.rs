//! Canvas export as a PNG data URI.

use super::Canvas;
use crate::photo::data_uri;
use thiserror::Error;

pub const PNG_MIME: &str = "image/png";

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot encode an empty canvas")]
    EmptyCanvas,
    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// Encodes the canvas raster losslessly as PNG bytes (RGBA8).
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, EncodeError> {
    if canvas.width() == 0 || canvas.height() == 0 {
        return Err(EncodeError::EmptyCanvas);
    }

    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, canvas.width(), canvas.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(canvas.pixels())?;
        writer.finish()?;
    }
    Ok(buffer)
}

/// Encodes the canvas as `data:image/png;base64,...`.
pub fn encode_png_data_uri(canvas: &Canvas) -> Result<String, EncodeError> {
    let bytes = encode_png(canvas)?;
    Ok(data_uri::encode(PNG_MIME, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature() {
        let bytes = encode_png(&Canvas::new(3, 2)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_data_uri_prefix() {
        let uri = encode_png_data_uri(&Canvas::new(1, 1)).unwrap();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_empty_canvas() {
        assert!(matches!(
            encode_png(&Canvas::new(0, 10)),
            Err(EncodeError::EmptyCanvas)
        ));
    }

    #[test]
    fn test_lossless() {
        let mut canvas = Canvas::new(2, 1);
        let frame = crate::capture::Frame::new(vec![1, 2, 3, 250, 251, 252], 2, 1, 0);
        canvas.draw_frame(&frame, 0.0, 0.0, 2.0, 1.0);

        let bytes = encode_png(&canvas).unwrap();
        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut out = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut out).unwrap();

        assert_eq!((info.width, info.height), (2, 1));
        assert_eq!(&out[..info.buffer_size()], canvas.pixels());
    }
}
