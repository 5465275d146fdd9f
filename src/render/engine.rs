//! Still capture from the preview surface.

use super::{encode_png_data_uri, Canvas, EncodeError};
use crate::photo::CapturedImage;
use crate::preview::{ReadyState, VideoSurface};

/// Draws the surface's current frame onto an offscreen canvas, mirrored
/// to match the preview, and encodes it.
#[derive(Debug, Default)]
pub struct CaptureEngine {
    canvas: Canvas,
    captures: u64,
}

impl CaptureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the current frame.
    ///
    /// Returns `Ok(None)` when the surface has no source or no decoded
    /// frame yet; the caller is expected to try again shortly.
    pub fn capture(
        &mut self,
        surface: &VideoSurface,
    ) -> Result<Option<CapturedImage>, EncodeError> {
        if surface.source().is_none() {
            tracing::warn!("No video bound, nothing to capture");
            return Ok(None);
        }
        let ready_state = surface.ready_state();
        let (frame, (width, height)) = match (surface.current_frame(), surface.video_dimensions())
        {
            (Some(frame), Some(dims)) if ready_state >= ReadyState::HaveCurrentData => {
                (frame, dims)
            }
            _ => {
                tracing::warn!(?ready_state, "Video not ready yet, try again shortly");
                return Ok(None);
            }
        };

        self.canvas.resize(width, height);
        let transform = self.canvas.transform_mut();
        transform.translate(width as f64, 0.0);
        transform.scale(-1.0, 1.0);
        self.canvas
            .draw_frame(frame, 0.0, 0.0, width as f64, height as f64);
        self.canvas.transform_mut().set(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

        let uri = encode_png_data_uri(&self.canvas)?;
        self.captures += 1;
        tracing::info!(
            width,
            height,
            frame = frame.sequence(),
            capture = self.captures,
            "Photo captured"
        );
        Ok(Some(CapturedImage::new(uri, width, height, self.captures)))
    }

    /// Canvas used by the last capture.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Camera, MediaStream, MockCamera, StreamConstraints};
    use proptest::prelude::*;

    fn decode_rgba(image: &CapturedImage) -> (u32, u32, Vec<u8>) {
        let bytes = image.decode().unwrap();
        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut out = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut out).unwrap();
        out.truncate(info.buffer_size());
        (info.width, info.height, out)
    }

    fn live(width: u32, height: u32, warmup: u32) -> (MediaStream, VideoSurface) {
        let mut camera = MockCamera::new().with_warmup(warmup);
        let stream = camera
            .request_stream(&StreamConstraints::with_dimensions(width, height))
            .unwrap();
        let mut surface = VideoSurface::default();
        surface.set_source(Some(&stream));
        surface.load(&stream);
        surface.play().unwrap();
        (stream, surface)
    }

    #[test]
    fn test_no_source_is_skipped() {
        let mut engine = CaptureEngine::new();
        assert!(engine.capture(&VideoSurface::default()).unwrap().is_none());
    }

    #[test]
    fn test_not_ready_is_skipped() {
        let (_stream, surface) = live(4, 4, 1);
        let mut engine = CaptureEngine::new();

        assert_eq!(surface.ready_state(), ReadyState::HaveMetadata);
        assert!(engine.capture(&surface).unwrap().is_none());
    }

    #[test]
    fn test_capture_is_mirrored() {
        let (mut stream, mut surface) = live(8, 3, 0);
        surface.present(&mut stream).unwrap();
        let source = surface.current_frame().unwrap().clone();

        let mut engine = CaptureEngine::new();
        let image = engine.capture(&surface).unwrap().unwrap();
        let (width, height, rgba) = decode_rgba(&image);

        assert_eq!((width, height), (8, 3));
        for y in 0..height {
            for x in 0..width {
                let offset = ((y * width + x) * 4) as usize;
                let [r, g, b] = source.rgb(width - 1 - x, y).unwrap();
                assert_eq!(&rgba[offset..offset + 4], &[r, g, b, 255]);
            }
        }
    }

    #[test]
    fn test_transform_reset_after_capture() {
        let (mut stream, mut surface) = live(4, 2, 0);
        surface.present(&mut stream).unwrap();
        let mut engine = CaptureEngine::new();

        engine.capture(&surface).unwrap().unwrap();
        assert!(engine.canvas().transform().is_identity());
    }

    #[test]
    fn test_repeated_captures_do_not_compound() {
        let (mut stream, mut surface) = live(6, 2, 0);
        surface.present(&mut stream).unwrap();
        let mut engine = CaptureEngine::new();

        let first = engine.capture(&surface).unwrap().unwrap();
        let second = engine.capture(&surface).unwrap().unwrap();

        assert_eq!(first.sequence(), 1);
        assert_eq!(second.sequence(), 2);
        assert_eq!(decode_rgba(&first).2, decode_rgba(&second).2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_capture_mirrors_any_size(width in 1u32..24, height in 1u32..12) {
            let (mut stream, mut surface) = live(width, height, 0);
            surface.present(&mut stream).unwrap();
            let source = surface.current_frame().unwrap().clone();

            let mut engine = CaptureEngine::new();
            let image = engine.capture(&surface).unwrap().unwrap();
            let (w, h, rgba) = decode_rgba(&image);

            prop_assert_eq!((w, h), (width, height));
            for y in 0..height {
                let offset = ((y * width) * 4) as usize;
                let [r, g, b] = source.rgb(width - 1, y).unwrap();
                prop_assert_eq!(&rgba[offset..offset + 3], &[r, g, b][..]);
            }
        }
    }
}
