//! Errors

use thiserror::Error;

use crate::pixfmt::PixelFormat;

/// Failures of the resource-management API
///
/// Drawing never returns these; a draw that cannot proceed draws nothing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Bitmap is already locked")]
    AlreadyLocked,
    #[error("Bitmap is not locked")]
    NotLocked,
    #[error("Region {x},{y} {w}x{h} is outside of the bitmap")]
    OutOfBounds { x: i32, y: i32, w: i32, h: i32 },
    #[error("Format {0:?} is not accessible by the cpu")]
    VideoOnly(PixelFormat),
    #[error("Buffer is write-only")]
    WriteOnly,
    #[error("Buffer range {offset}+{length} exceeds size {size}")]
    BufferRange { offset: usize, length: usize, size: usize },
    #[error("Invalid vertex declaration: {0}")]
    InvalidDecl(&'static str),
    #[error("Index size must be 2 or 4, got {0}")]
    IndexSize(usize),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
