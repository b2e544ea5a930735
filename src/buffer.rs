//! Rendering buffer

use std::ops::Index;

use crate::pixfmt::PixelFormat;

/// Rendering Buffer
///
/// Data is stored as row-major order (C-format).  Compressed formats store
/// rows of 4x4 blocks.
#[derive(Debug,Default,Clone)]
pub struct RenderingBuffer {
    /// Pixel / Block level data of Image
    pub data: Vec<u8>,
    /// Image Width in pixels
    pub width: usize,
    /// Image Height in pixels
    pub height: usize,
    /// Bytes per row of pixels, or row of blocks
    pub pitch: usize,
    /// Layout of each pixel
    pub format: PixelFormat,
}

impl RenderingBuffer {
    /// Create a new buffer of width, height, and format
    ///
    /// Data for the Image is allocated and zeroed
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        let pitch = format.row_size(width);
        let rows = (height + format.block_height() - 1) / format.block_height();
        RenderingBuffer {
            width, height, pitch, format, data: vec![0u8; pitch * rows]
        }
    }
    /// Size of underlying Rendering Buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }
    /// Return if no memory is allocated
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Byte offset of pixel (x,y), or block (x,y) for compressed formats
    pub fn offset(&self, x: usize, y: usize) -> usize {
        y * self.pitch + x * self.format.pixel_size()
    }
}

impl Index<(usize,usize)> for RenderingBuffer {
    type Output = [u8];
    fn index(&self, index: (usize, usize)) -> &[u8] {
        assert!(index.0 < self.width, "request {} >= {} width :: index", index.0, self.width);
        assert!(index.1 < self.height, "request {} >= {} height :: index", index.1, self.height);
        let i = self.offset(index.0, index.1);
        &self.data[i .. i + self.format.pixel_size()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn layout() {
        let mut buf = RenderingBuffer::new(3, 2, PixelFormat::Rgb888);
        assert_eq!(buf.pitch, 9);
        assert_eq!(buf.len(), 18);
        assert_eq!(buf.offset(2, 1), 15);
        buf.data[15..18].copy_from_slice(&[1,2,3]);
        assert_eq!(&buf[(2,1)], &[1,2,3]);
    }
    #[test]
    fn compressed_blocks() {
        let buf = RenderingBuffer::new(10, 5, PixelFormat::Dxt1);
        assert_eq!(buf.pitch, 24);
        assert_eq!(buf.len(), 48);
    }
    #[test]
    #[should_panic]
    fn index_outside() {
        let buf = RenderingBuffer::new(3, 2, PixelFormat::Rgb888);
        let _ = &buf[(3,0)];
    }
}
