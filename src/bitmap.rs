//! Bitmaps and sub-bitmaps
//!
//! A [Bitmap] owns its pixel memory, clipping rectangle and lock state.
//! A [SubBitmap] is a window into a parent bitmap; drawing to it is
//! translated into the parent's coordinates.  Both implement [Surface]
//! and [SurfaceMut], which is all the drawing code relies on.
//!
//! [Bitmap]: struct.Bitmap.html
//! [SubBitmap]: struct.SubBitmap.html
//! [Surface]: trait.Surface.html
//! [SurfaceMut]: trait.SurfaceMut.html

use std::borrow::{Borrow, BorrowMut};

use bitflags::bitflags;
use log::{trace, warn};

use crate::buffer::RenderingBuffer;
use crate::clip::Rectangle;
use crate::color::Rgba32;
use crate::error::Error;
use crate::lock::{LockFlags, LockFormat, LockedRegion};
use crate::pixfmt::{convert_region, PixelFormat};

bitflags! {
    /// Where a bitmap lives
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BitmapFlags: u32 {
        /// Memory bitmap, always drawn in software
        const MEMORY_BITMAP = 1;
        /// Video bitmap, drawn by a hardware backend when one is bound
        const VIDEO_BITMAP  = 2;
    }
}

/// Texture addressing outside of [0,1)
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum WrapMode {
    /// Same as Repeat
    Default,
    Repeat,
    Clamp,
    Mirror,
}

impl Default for WrapMode {
    fn default() -> Self {
        WrapMode::Default
    }
}

impl WrapMode {
    /// Coordinates wrap around
    pub fn is_repeat(self) -> bool {
        self == WrapMode::Default || self == WrapMode::Repeat
    }
}

#[derive(Debug)]
struct Lock {
    /// Locked rectangle; block units when `blocked`
    rect: Rectangle<i32>,
    format: PixelFormat,
    flags: LockFlags,
    pitch: usize,
    blocked: bool,
    /// Conversion buffer when `format` differs from the bitmap
    buffer: Option<Vec<u8>>,
}

/// Bitmap with cpu resident memory
#[derive(Debug)]
pub struct Bitmap {
    rbuf: RenderingBuffer,
    flags: BitmapFlags,
    clip: Rectangle<i32>,
    wrap: (WrapMode, WrapMode),
    lock: Option<Lock>,
}

impl Bitmap {
    /// Create a memory bitmap in the default pixel format
    ///
    /// Memory is zeroed, i.e. transparent black
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_format(width, height, PixelFormat::default(), BitmapFlags::MEMORY_BITMAP)
    }
    /// Create a bitmap with a specific format and flags
    pub fn with_format(width: usize, height: usize, format: PixelFormat, flags: BitmapFlags) -> Self {
        Self::from_buffer(RenderingBuffer::new(width, height, format), flags)
    }
    /// Wrap existing memory
    pub fn from_buffer(rbuf: RenderingBuffer, flags: BitmapFlags) -> Self {
        let clip = Rectangle::with_size(0, 0, rbuf.width as i32, rbuf.height as i32);
        Self { rbuf, flags, clip, wrap: Default::default(), lock: None }
    }
    /// Underlying memory
    pub fn buffer(&self) -> &RenderingBuffer {
        &self.rbuf
    }
    /// Native pixel format
    pub fn format(&self) -> PixelFormat {
        self.rbuf.format
    }
    /// Creation flags
    pub fn flags(&self) -> BitmapFlags {
        self.flags
    }
    /// Set texture wrap modes for u and v
    pub fn set_wrap(&mut self, u: WrapMode, v: WrapMode) {
        self.wrap = (u, v);
    }
    /// Texture wrap modes for u and v
    pub fn wrap(&self) -> (WrapMode, WrapMode) {
        self.wrap
    }
    fn bounds(&self) -> Rectangle<i32> {
        Rectangle::with_size(0, 0, self.rbuf.width as i32, self.rbuf.height as i32)
    }
    /// Fill the clipping rectangle with `c`
    ///
    /// Nothing happens while the bitmap is locked
    pub fn clear(&mut self, c: Rgba32) {
        let format = self.rbuf.format;
        if self.lock.is_some() || format.is_video_only() {
            warn!("clear of locked or video only bitmap ignored");
            return;
        }
        let clip = self.clip;
        if clip.is_empty() {
            return;
        }
        let n = format.pixel_size();
        let mut px = [0u8; 16];
        format.put(&mut px[..n], c);
        for y in clip.y1 .. clip.y2 {
            let start = self.rbuf.offset(clip.x1 as usize, y as usize);
            let end = start + clip.width() as usize * n;
            for p in self.rbuf.data[start .. end].chunks_exact_mut(n) {
                p.copy_from_slice(&px[..n]);
            }
        }
    }
    /// Read pixel (x,y) directly from memory, ignoring any lock
    ///
    /// Returns zero outside of the bitmap or for video only formats
    pub fn pixel(&self, x: i32, y: i32) -> Rgba32 {
        if !self.bounds().contains(x, y) || self.rbuf.format.is_video_only() {
            return Rgba32::transparent();
        }
        self.rbuf.format.get(&self.rbuf[(x as usize, y as usize)])
    }
    /// Return if a lock is active
    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }
    /// Locked rectangle and format of the active lock
    pub fn lock_info(&self) -> Option<(Rectangle<i32>, PixelFormat)> {
        self.lock.as_ref().map(|l| (l.rect, l.format))
    }
    /// Flags of the active lock
    pub fn lock_flags(&self) -> Option<LockFlags> {
        self.lock.as_ref().map(|l| l.flags)
    }
    /// Lock the whole bitmap
    pub fn lock(&mut self, format: LockFormat, flags: LockFlags) -> Result<LockedRegion<&mut [u8]>, Error> {
        let (w, h) = (self.rbuf.width as i32, self.rbuf.height as i32);
        self.lock_region(0, 0, w, h, format, flags)
    }
    /// Lock a region of pixels
    ///
    /// With `LockFormat::Any` or the native format the view points at the
    /// bitmap's memory.  Other formats get a converted copy, filled unless
    /// `WRITE_ONLY` and written back on unlock unless `READ_ONLY`.
    ///
    ///     use softraster::{Bitmap,LockFormat,LockFlags,PixelFormat,Rgba32};
    ///
    ///     let mut bmp = Bitmap::new(4, 4);
    ///     {
    ///         let fmt = LockFormat::Exact(PixelFormat::Rgb888);
    ///         let mut r = bmp.lock_region(1, 1, 2, 2, fmt, LockFlags::WRITE_ONLY).unwrap();
    ///         assert_eq!(r.pitch(), 6);
    ///         r.put(2, 2, Rgba32::white());
    ///     }
    ///     assert!(bmp.lock_region(0, 0, 1, 1, LockFormat::Any, LockFlags::empty()).is_err());
    ///     bmp.unlock();
    ///     assert_eq!(bmp.pixel(2, 2), Rgba32::white());
    ///
    pub fn lock_region(&mut self, x: i32, y: i32, w: i32, h: i32,
                       format: LockFormat, flags: LockFlags) -> Result<LockedRegion<&mut [u8]>, Error> {
        if self.lock.is_some() {
            return Err(Error::AlreadyLocked);
        }
        let rect = Rectangle::with_size(x, y, w, h);
        if w <= 0 || h <= 0 || !self.bounds().covers(&rect) {
            return Err(Error::OutOfBounds { x, y, w, h });
        }
        let native = self.rbuf.format;
        let want = match format {
            LockFormat::Any => native,
            LockFormat::Exact(f) => f,
        };
        if native.is_video_only() {
            return Err(Error::VideoOnly(native));
        }
        if want.is_video_only() {
            return Err(Error::VideoOnly(want));
        }
        let lock = if want == native {
            Lock { rect, format: native, flags, pitch: self.rbuf.pitch, blocked: false, buffer: None }
        } else {
            let pitch = want.row_size(w as usize);
            let mut buf = vec![0u8; pitch * h as usize];
            if !flags.contains(LockFlags::WRITE_ONLY) {
                let start = self.rbuf.offset(x as usize, y as usize);
                convert_region(&self.rbuf.data[start..], native, self.rbuf.pitch,
                               &mut buf, want, pitch, w as usize, h as usize);
            }
            Lock { rect, format: want, flags, pitch, blocked: false, buffer: Some(buf) }
        };
        trace!("lock {:?} as {:?} {:?}", rect, lock.format, flags);
        self.lock = Some(lock);
        self.locked_region_mut().ok_or(Error::NotLocked)
    }
    /// Lock a region in units of blocks
    ///
    /// The only way to lock a compressed bitmap; the view holds raw blocks.
    /// For uncompressed formats a block is one pixel.
    pub fn lock_region_blocked(&mut self, xb: i32, yb: i32, wb: i32, hb: i32,
                               flags: LockFlags) -> Result<LockedRegion<&mut [u8]>, Error> {
        let format = self.rbuf.format;
        if !format.is_compressed() {
            return self.lock_region(xb, yb, wb, hb, LockFormat::Any, flags);
        }
        if self.lock.is_some() {
            return Err(Error::AlreadyLocked);
        }
        let bw = format.block_width();
        let bh = format.block_height();
        let cols = ((self.rbuf.width + bw - 1) / bw) as i32;
        let rows = ((self.rbuf.height + bh - 1) / bh) as i32;
        let rect = Rectangle::with_size(xb, yb, wb, hb);
        if wb <= 0 || hb <= 0 || !Rectangle::with_size(0, 0, cols, rows).covers(&rect) {
            return Err(Error::OutOfBounds { x: xb, y: yb, w: wb, h: hb });
        }
        trace!("lock blocks {:?} {:?}", rect, flags);
        self.lock = Some(Lock { rect, format, flags, pitch: self.rbuf.pitch, blocked: true, buffer: None });
        self.locked_region_mut().ok_or(Error::NotLocked)
    }
    /// Release the active lock
    ///
    /// A converted copy is written back unless locked `READ_ONLY`
    pub fn unlock(&mut self) {
        let lock = match self.lock.take() {
            Some(lock) => lock,
            None => return,
        };
        trace!("unlock {:?}", lock.rect);
        if let Some(buf) = lock.buffer {
            if !lock.flags.contains(LockFlags::READ_ONLY) {
                let r = lock.rect;
                let start = self.rbuf.offset(r.x1 as usize, r.y1 as usize);
                let (native, pitch) = (self.rbuf.format, self.rbuf.pitch);
                convert_region(&buf, lock.format, lock.pitch,
                               &mut self.rbuf.data[start..], native, pitch,
                               r.width() as usize, r.height() as usize);
            }
        }
    }
    /// View of the active lock
    pub fn locked_region(&self) -> Option<LockedRegion<&[u8]>> {
        let lock = self.lock.as_ref()?;
        let data = match lock.buffer {
            Some(ref buf) => &buf[..],
            None => {
                let start = self.rbuf.offset(lock.rect.x1 as usize, lock.rect.y1 as usize);
                &self.rbuf.data[start..]
            }
        };
        Some(LockedRegion::new(data, lock.format, lock.pitch, lock.rect))
    }
    /// Mutable view of the active lock
    pub fn locked_region_mut(&mut self) -> Option<LockedRegion<&mut [u8]>> {
        let lock = self.lock.as_mut()?;
        let data = match lock.buffer {
            Some(ref mut buf) => &mut buf[..],
            None => {
                let start = self.rbuf.offset(lock.rect.x1 as usize, lock.rect.y1 as usize);
                &mut self.rbuf.data[start..]
            }
        };
        Some(LockedRegion::new(data, lock.format, lock.pitch, lock.rect))
    }
    /// Return if the active lock is in block units
    pub fn is_locked_blocked(&self) -> bool {
        self.lock.as_ref().map(|l| l.blocked).unwrap_or(false)
    }
    /// Mutable window into part of this bitmap
    pub fn sub_bitmap(&mut self, x: i32, y: i32, w: i32, h: i32) -> SubBitmap<&mut Bitmap> {
        SubBitmap::new(self, x, y, w, h)
    }
}

/// Anything that can be drawn from
pub trait Surface {
    /// Width in pixels
    fn width(&self) -> i32;
    /// Height in pixels
    fn height(&self) -> i32;
    /// Clipping rectangle in own coordinates
    fn clip(&self) -> Rectangle<i32>;
    /// Bitmap owning the memory and the offset of this surface within it
    fn root(&self) -> (&Bitmap, i32, i32);
    /// Return if drawing must happen in software
    fn is_memory(&self) -> bool {
        self.root().0.flags().contains(BitmapFlags::MEMORY_BITMAP)
    }
    /// Native pixel format
    fn format(&self) -> PixelFormat {
        self.root().0.format()
    }
}

/// Anything that can be drawn to
pub trait SurfaceMut: Surface {
    /// Bitmap owning the memory and the offset of this surface within it
    fn root_mut(&mut self) -> (&mut Bitmap, i32, i32);
    /// Set the clipping rectangle, limited to the surface
    fn set_clip(&mut self, x: i32, y: i32, w: i32, h: i32);
    /// Clip to the whole surface
    fn reset_clip(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.set_clip(0, 0, w, h);
    }
}

fn limit_clip(x: i32, y: i32, w: i32, h: i32, width: i32, height: i32) -> Rectangle<i32> {
    let r = Rectangle::with_size(x, y, w, h).intersect(&Rectangle::with_size(0, 0, width, height));
    if r.is_empty() {
        Rectangle::with_size(0, 0, 0, 0)
    } else {
        r
    }
}

impl Surface for Bitmap {
    fn width(&self) -> i32 {
        self.rbuf.width as i32
    }
    fn height(&self) -> i32 {
        self.rbuf.height as i32
    }
    fn clip(&self) -> Rectangle<i32> {
        self.clip
    }
    fn root(&self) -> (&Bitmap, i32, i32) {
        (self, 0, 0)
    }
}

impl SurfaceMut for Bitmap {
    fn root_mut(&mut self) -> (&mut Bitmap, i32, i32) {
        (self, 0, 0)
    }
    fn set_clip(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.clip = limit_clip(x, y, w, h, self.width(), self.height());
    }
}

/// Window into a parent bitmap
///
/// The window is limited to the parent when created
///
///     use softraster::{Bitmap,Rgba32,put_pixel};
///
///     let mut bmp = Bitmap::new(8, 8);
///     {
///         let mut sub = bmp.sub_bitmap(2, 3, 4, 4);
///         put_pixel(&mut sub, 1, 1, Rgba32::white());
///         put_pixel(&mut sub, 5, 1, Rgba32::white()); // Outside, ignored
///     }
///     assert_eq!(bmp.pixel(3, 4), Rgba32::white());
///     assert_eq!(bmp.pixel(7, 4), Rgba32::transparent());
///
#[derive(Debug)]
pub struct SubBitmap<B> {
    parent: B,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    clip: Rectangle<i32>,
}

impl<B: Borrow<Bitmap>> SubBitmap<B> {
    /// Create a window at (x,y) of size w x h
    pub fn new(parent: B, x: i32, y: i32, w: i32, h: i32) -> Self {
        let pw = parent.borrow().width();
        let ph = parent.borrow().height();
        let r = limit_clip(x, y, w, h, pw, ph);
        let clip = Rectangle::with_size(0, 0, r.width(), r.height());
        Self { parent, x: r.x1, y: r.y1, w: r.width(), h: r.height(), clip }
    }
    /// Parent bitmap
    pub fn parent(&self) -> &Bitmap {
        self.parent.borrow()
    }
    /// Position within the parent
    pub fn offset(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl<B: BorrowMut<Bitmap>> SubBitmap<B> {
    /// Lock a region given in this window's coordinates
    ///
    /// The returned view is addressed in the same coordinates
    pub fn lock_region(&mut self, x: i32, y: i32, w: i32, h: i32,
                       format: LockFormat, flags: LockFlags) -> Result<LockedRegion<&mut [u8]>, Error> {
        if !Rectangle::with_size(0, 0, self.w, self.h).covers(&Rectangle::with_size(x, y, w, h)) {
            return Err(Error::OutOfBounds { x, y, w, h });
        }
        let (ox, oy) = (self.x, self.y);
        let mut region = self.parent.borrow_mut().lock_region(x + ox, y + oy, w, h, format, flags)?;
        region.rebase(-ox, -oy);
        Ok(region)
    }
    /// Release the parent's lock
    pub fn unlock(&mut self) {
        self.parent.borrow_mut().unlock();
    }
}

impl<B: Borrow<Bitmap>> Surface for SubBitmap<B> {
    fn width(&self) -> i32 {
        self.w
    }
    fn height(&self) -> i32 {
        self.h
    }
    fn clip(&self) -> Rectangle<i32> {
        self.clip
    }
    fn root(&self) -> (&Bitmap, i32, i32) {
        (self.parent.borrow(), self.x, self.y)
    }
}

impl<B: BorrowMut<Bitmap>> SurfaceMut for SubBitmap<B> {
    fn root_mut(&mut self) -> (&mut Bitmap, i32, i32) {
        (self.parent.borrow_mut(), self.x, self.y)
    }
    fn set_clip(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.clip = limit_clip(x, y, w, h, self.w, self.h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_is_limited_to_bitmap() {
        let mut bmp = Bitmap::new(10, 10);
        bmp.set_clip(-5, 2, 8, 100);
        assert_eq!(bmp.clip(), Rectangle::with_size(0, 2, 3, 8));
        bmp.set_clip(20, 20, 5, 5);
        assert!(bmp.clip().is_empty());
        bmp.reset_clip();
        assert_eq!(bmp.clip(), Rectangle::with_size(0, 0, 10, 10));
    }
    #[test]
    fn clear_respects_clip() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.set_clip(1, 1, 2, 2);
        bmp.clear(Rgba32::white());
        assert_eq!(bmp.pixel(0, 0), Rgba32::transparent());
        assert_eq!(bmp.pixel(1, 1), Rgba32::white());
        assert_eq!(bmp.pixel(2, 2), Rgba32::white());
        assert_eq!(bmp.pixel(3, 2), Rgba32::transparent());
    }
    #[test]
    fn double_lock_fails() {
        let mut bmp = Bitmap::new(4, 4);
        assert!(bmp.lock_region(0, 0, 2, 2, LockFormat::Any, LockFlags::empty()).is_ok());
        match bmp.lock_region(2, 2, 2, 2, LockFormat::Any, LockFlags::empty()) {
            Err(Error::AlreadyLocked) => {}
            other => panic!("unexpected {:?}", other.map(|r| r.bounds())),
        }
        bmp.unlock();
        assert!(!bmp.is_locked());
        assert!(bmp.lock(LockFormat::Any, LockFlags::empty()).is_ok());
    }
    #[test]
    fn out_of_bounds_lock_fails() {
        let mut bmp = Bitmap::new(4, 4);
        assert!(bmp.lock_region(3, 3, 2, 2, LockFormat::Any, LockFlags::empty()).is_err());
        assert!(bmp.lock_region(-1, 0, 2, 2, LockFormat::Any, LockFlags::empty()).is_err());
        assert!(bmp.lock_region(0, 0, 0, 2, LockFormat::Any, LockFlags::empty()).is_err());
        assert!(!bmp.is_locked());
    }
    #[test]
    fn native_lock_writes_through() {
        let mut bmp = Bitmap::new(4, 4);
        {
            let mut r = bmp.lock_region(1, 2, 2, 2, LockFormat::Any, LockFlags::empty()).unwrap();
            assert_eq!(r.format(), PixelFormat::Abgr8888);
            assert!(r.put(2, 3, Rgba32::white()));
            assert!(!r.put(0, 0, Rgba32::white()));
        }
        assert_eq!(bmp.pixel(2, 3), Rgba32::white());
        bmp.unlock();
    }
    #[test]
    fn converted_lock_reads_and_writes_back() {
        let mut bmp = Bitmap::new(2, 2);
        bmp.clear(Rgba32::new(1.0, 0.0, 0.0, 1.0));
        {
            let fmt = LockFormat::Exact(PixelFormat::Argb8888);
            let mut r = bmp.lock(fmt, LockFlags::empty()).unwrap();
            assert_eq!(&r.data()[0..4], &[0, 0, 255, 255]);
            r.put(1, 1, Rgba32::new(0.0, 0.0, 1.0, 1.0));
        }
        assert_eq!(bmp.pixel(1, 1), Rgba32::new(1.0, 0.0, 0.0, 1.0));
        bmp.unlock();
        assert_eq!(bmp.pixel(1, 1), Rgba32::new(0.0, 0.0, 1.0, 1.0));
    }
    #[test]
    fn read_only_lock_is_not_written_back() {
        let mut bmp = Bitmap::new(2, 2);
        {
            let fmt = LockFormat::Exact(PixelFormat::Rgb565);
            let mut r = bmp.lock(fmt, LockFlags::READ_ONLY).unwrap();
            r.put(0, 0, Rgba32::white());
        }
        assert_eq!(bmp.lock_flags(), Some(LockFlags::READ_ONLY));
        bmp.unlock();
        assert_eq!(bmp.lock_flags(), None);
        assert_eq!(bmp.pixel(0, 0), Rgba32::transparent());
    }
    #[test]
    fn compressed_needs_block_lock() {
        let mut bmp = Bitmap::with_format(8, 8, PixelFormat::Dxt5, BitmapFlags::VIDEO_BITMAP);
        match bmp.lock(LockFormat::Any, LockFlags::empty()) {
            Err(Error::VideoOnly(PixelFormat::Dxt5)) => {}
            other => panic!("unexpected {:?}", other.map(|r| r.bounds())),
        }
        {
            let mut r = bmp.lock_region_blocked(1, 0, 1, 2, LockFlags::empty()).unwrap();
            assert_eq!(r.bounds(), Rectangle::with_size(1, 0, 1, 2));
            r.data_mut()[0] = 9;
        }
        assert!(bmp.is_locked_blocked());
        bmp.unlock();
        assert_eq!(bmp.buffer().data[16], 9);
        assert!(bmp.lock_region_blocked(1, 1, 2, 2, LockFlags::empty()).is_err());
    }
    #[test]
    fn sub_bitmap_is_limited_and_translated() {
        let mut bmp = Bitmap::new(10, 10);
        {
            let mut sub = bmp.sub_bitmap(6, -2, 10, 5);
            assert_eq!(sub.offset(), (6, 0));
            assert_eq!((sub.width(), sub.height()), (4, 3));
            let mut r = sub.lock_region(1, 1, 2, 2, LockFormat::Any, LockFlags::empty()).unwrap();
            assert_eq!(r.bounds(), Rectangle::with_size(1, 1, 2, 2));
            r.put(2, 2, Rgba32::white());
        }
        assert_eq!(bmp.lock_info().map(|l| l.0), Some(Rectangle::with_size(7, 1, 2, 2)));
        bmp.unlock();
        assert_eq!(bmp.pixel(8, 2), Rgba32::white());
    }
}
