//! Decoded video frame handed from a track to the preview surface.

/// Bytes per pixel of a decoded frame (packed RGB8).
pub const CHANNELS: usize = 3;

/// A single decoded frame from a video track.
///
/// Pixels are packed RGB8, row-major, top-left origin, exactly as the
/// sensor delivered them (no mirroring).
#[derive(Clone)]
pub struct Frame {
    /// Packed RGB8 pixel data.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Monotonic sequence number within the producing track.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            sequence,
        }
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns the RGB triple at `(x, y)`, or `None` outside the frame.
    pub fn rgb(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + x as usize) * CHANNELS;
        self.pixels
            .get(offset..offset + CHANNELS)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Validates that the pixel buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.pixels.len() == self.pixel_count() * CHANNELS
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = Frame::new(vec![0u8; 64 * 48 * CHANNELS], 64, 48, 1);

        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 48);
        assert_eq!(frame.sequence(), 1);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_frame_invalid_size() {
        let frame = Frame::new(vec![0u8; 100], 64, 48, 1);
        assert!(!frame.is_valid());
    }

    #[test]
    fn test_rgb_lookup() {
        let mut pixels = vec![0u8; 2 * 2 * CHANNELS];
        // (1, 1) is the last pixel
        pixels[9..12].copy_from_slice(&[10, 20, 30]);
        let frame = Frame::new(pixels, 2, 2, 0);

        assert_eq!(frame.rgb(1, 1), Some([10, 20, 30]));
        assert_eq!(frame.rgb(0, 0), Some([0, 0, 0]));
        assert_eq!(frame.rgb(2, 0), None);
    }
}
