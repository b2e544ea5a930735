//! Locked regions
//!
//! A lock exposes part of a bitmap's memory to the cpu.  The view handed
//! out is a [LockedRegion]: a byte slice with pitch and format, addressed
//! in surface coordinates and checked against the locked rectangle on
//! every access.
//!
//! [LockedRegion]: struct.LockedRegion.html

use bitflags::bitflags;
use log::{debug, trace};

use crate::bitmap::Bitmap;
use crate::clip::Rectangle;
use crate::color::Rgba32;
use crate::pixfmt::PixelFormat;

bitflags! {
    /// Access requested when locking
    ///
    /// No flags is read-write
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LockFlags: u32 {
        /// Pixels will not be written; nothing is copied back on unlock
        const READ_ONLY  = 1;
        /// Pixels will not be read; nothing is copied in on lock
        const WRITE_ONLY = 2;
    }
}

/// Pixel format requested when locking
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum LockFormat {
    /// Native format of the bitmap, no conversion
    Any,
    /// Convert to and from this format
    Exact(PixelFormat),
}

impl Default for LockFormat {
    fn default() -> Self {
        LockFormat::Any
    }
}

/// Bounds-checked view into locked memory
///
/// `bounds` is the locked rectangle in surface coordinates and the first
/// byte of `data` is its top left pixel.  `window` is the part of `bounds`
/// that may be touched; it only ever shrinks.
#[derive(Debug)]
pub struct LockedRegion<D> {
    data: D,
    format: PixelFormat,
    pitch: usize,
    bounds: Rectangle<i32>,
    window: Rectangle<i32>,
}

impl<D> LockedRegion<D> {
    /// Create a view of `data` covering `bounds`
    pub fn new(data: D, format: PixelFormat, pitch: usize, bounds: Rectangle<i32>) -> Self {
        Self { data, format, pitch, bounds, window: bounds }
    }
    /// Pixel format of the locked memory
    pub fn format(&self) -> PixelFormat {
        self.format
    }
    /// Bytes per row
    pub fn pitch(&self) -> usize {
        self.pitch
    }
    /// Locked rectangle
    pub fn bounds(&self) -> Rectangle<i32> {
        self.bounds
    }
    /// Accessible rectangle
    pub fn window(&self) -> Rectangle<i32> {
        self.window
    }
    /// Move the coordinate system so that point (x,y) becomes (x+dx,y+dy)
    pub fn rebase(&mut self, dx: i32, dy: i32) {
        self.bounds = self.bounds.translate(dx, dy);
        self.window = self.window.translate(dx, dy);
    }
    /// Limit access to `r`
    pub fn restrict(&mut self, r: &Rectangle<i32>) {
        self.window = self.window.intersect(r);
    }
    /// Return if (x,y) may be accessed
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.window.contains(x, y)
    }
    /// Clip the inclusive span x1..=x2 on row y to the window
    pub fn clip_span(&self, x1: i32, y: i32, x2: i32) -> Option<(i32, i32)> {
        let w = &self.window;
        if y < w.y1 || y >= w.y2 {
            return None;
        }
        let x1 = x1.max(w.x1);
        let x2 = x2.min(w.x2 - 1);
        if x1 > x2 {
            None
        } else {
            Some((x1, x2))
        }
    }
    fn offset(&self, x: i32, y: i32) -> usize {
        assert!(self.window.contains(x, y), "({},{}) outside of {:?}", x, y, self.window);
        let dx = (x - self.bounds.x1) as usize;
        let dy = (y - self.bounds.y1) as usize;
        dy * self.pitch + dx * self.format.pixel_size()
    }
}

impl<D: AsRef<[u8]>> LockedRegion<D> {
    /// Raw memory, starting at the top left of the locked rectangle
    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }
    /// Read pixel (x,y); None outside of the window
    pub fn get(&self, x: i32, y: i32) -> Option<Rgba32> {
        if !self.contains(x, y) {
            return None;
        }
        let i = self.offset(x, y);
        Some(self.format.get(&self.data.as_ref()[i..]))
    }
}

impl<D: AsRef<[u8]> + AsMut<[u8]>> LockedRegion<D> {
    /// Raw memory, starting at the top left of the locked rectangle
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data.as_mut()
    }
    /// Write pixel (x,y); returns false outside of the window
    pub fn put(&mut self, x: i32, y: i32, c: Rgba32) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let i = self.offset(x, y);
        let format = self.format;
        format.put(&mut self.data.as_mut()[i..], c);
        true
    }
    /// Bytes of the inclusive span x1..=x2 on row y
    ///
    /// Panics if the span leaves the window
    pub fn span_mut(&mut self, x1: i32, y: i32, x2: i32) -> &mut [u8] {
        assert!(x1 <= x2);
        let start = self.offset(x1, y);
        let end = self.offset(x2, y) + self.format.pixel_size();
        &mut self.data.as_mut()[start .. end]
    }
}

/// Lock held for the duration of one draw
///
/// Either reuses the lock already on the bitmap or takes a fresh one,
/// which is released when the guard is dropped
pub struct RegionLock<'a> {
    bitmap: &'a mut Bitmap,
    owned: bool,
}

impl<'a> RegionLock<'a> {
    /// Lock `rect` of `bitmap` for reading and writing
    ///
    /// With an existing lock the rectangle only has to overlap it and the
    /// locked format must be cpu accessible.  Returns None when the
    /// region cannot be accessed.
    pub fn acquire(bitmap: &'a mut Bitmap, rect: &Rectangle<i32>) -> Option<Self> {
        if let Some((bounds, format)) = bitmap.lock_info() {
            if !bounds.overlaps(rect) {
                trace!("region {:?} outside of existing lock {:?}", rect, bounds);
                return None;
            }
            if format.is_video_only() {
                trace!("existing lock has video only format {:?}", format);
                return None;
            }
            return Some(Self { bitmap, owned: false });
        }
        let res = bitmap.lock_region(rect.x1, rect.y1, rect.width(), rect.height(),
                                     LockFormat::Any, LockFlags::empty())
            .map(|_| ());
        match res {
            Ok(()) => Some(Self { bitmap, owned: true }),
            Err(e) => {
                debug!("lock of {:?} failed: {}", rect, e);
                None
            }
        }
    }
    /// View of the locked memory
    pub fn region(&mut self) -> Option<LockedRegion<&mut [u8]>> {
        self.bitmap.locked_region_mut()
    }
}

impl<'a> Drop for RegionLock<'a> {
    fn drop(&mut self) {
        if self.owned {
            self.bitmap.unlock();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(data: &mut [u8]) -> LockedRegion<&mut [u8]> {
        LockedRegion::new(data, PixelFormat::SingleChannel8, 4, Rectangle::with_size(10, 20, 4, 3))
    }

    #[test]
    fn addressed_in_surface_coordinates() {
        let mut data = vec![0u8; 12];
        let mut r = region(&mut data);
        assert!(r.put(11, 21, Rgba32::white()));
        assert!(!r.put(0, 0, Rgba32::white()));
        assert_eq!(r.get(11, 21).map(|c| c.r), Some(1.0));
        assert_eq!(r.get(14, 21), None);
        drop(r);
        assert_eq!(data[5], 255);
    }
    #[test]
    fn restrict_and_rebase() {
        let mut data = vec![0u8; 12];
        let mut r = region(&mut data);
        r.restrict(&Rectangle::with_size(11, 0, 100, 100));
        assert_eq!(r.clip_span(0, 20, 100), Some((11, 13)));
        assert_eq!(r.clip_span(0, 23, 100), None);
        r.rebase(-10, -20);
        assert_eq!(r.bounds(), Rectangle::with_size(0, 0, 4, 3));
        assert_eq!(r.clip_span(-5, 2, 2), Some((1, 2)));
        r.span_mut(1, 2, 2).iter_mut().for_each(|v| *v = 7);
        drop(r);
        assert_eq!(&data[8..12], &[0, 7, 7, 0]);
    }
    #[test]
    #[should_panic]
    fn span_outside_window_panics() {
        let mut data = vec![0u8; 12];
        let mut r = region(&mut data);
        r.restrict(&Rectangle::with_size(11, 20, 2, 3));
        r.span_mut(10, 20, 11);
    }
}
