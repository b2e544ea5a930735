//! Single pixel access
//!
//! Coordinates are in the surface's own space; sub-bitmaps are translated
//! into their parent.  Reads and writes that cannot be performed are
//! silently dropped.

use log::debug;

use crate::bitmap::{Surface, SurfaceMut};
use crate::blend::BlendMode;
use crate::clip::Rectangle;
use crate::color::Rgba32;
use crate::lock::{LockFlags, LockFormat};

/// Read pixel (x,y)
///
/// Returns zero (transparent black) outside of the surface or outside of
/// an active lock.  While locked the pixel is read through the lock,
/// converted format included.
///
///     use softraster::{Bitmap,Rgba32,get_pixel,put_pixel};
///
///     let mut bmp = Bitmap::new(2, 2);
///     put_pixel(&mut bmp, 1, 0, Rgba32::white());
///     assert_eq!(get_pixel(&bmp, 1, 0), Rgba32::white());
///     assert_eq!(get_pixel(&bmp, 2, 0), Rgba32::transparent());
///
pub fn get_pixel<S: Surface + ?Sized>(bitmap: &S, x: i32, y: i32) -> Rgba32 {
    if !Rectangle::with_size(0, 0, bitmap.width(), bitmap.height()).contains(x, y) {
        return Rgba32::transparent();
    }
    let (root, xofs, yofs) = bitmap.root();
    let (x, y) = (x + xofs, y + yofs);
    if root.is_locked() {
        if root.is_locked_blocked() {
            return Rgba32::transparent();
        }
        return root.locked_region()
            .and_then(|r| r.get(x, y))
            .unwrap_or_else(Rgba32::transparent);
    }
    root.pixel(x, y)
}

/// Write `color` to pixel (x,y)
///
/// Pixels outside of the clipping rectangle are ignored.  An active lock
/// is written through; otherwise the pixel is locked on its own.
pub fn put_pixel<S: SurfaceMut + ?Sized>(bitmap: &mut S, x: i32, y: i32, color: Rgba32) {
    if !bitmap.clip().contains(x, y) {
        return;
    }
    let (root, xofs, yofs) = bitmap.root_mut();
    let (x, y) = (x + xofs, y + yofs);
    if root.is_locked() {
        if root.is_locked_blocked() {
            return;
        }
        if let Some(mut r) = root.locked_region_mut() {
            r.put(x, y, color);
        }
        return;
    }
    let res = root.lock_region(x, y, 1, 1, LockFormat::Any, LockFlags::WRITE_ONLY)
        .map(|mut r| { r.put(x, y, color); });
    match res {
        Ok(()) => root.unlock(),
        Err(e) => debug!("put_pixel({},{}) skipped: {}", x, y, e),
    }
}

/// Blend `color` onto pixel (x,y) using `blend`
///
/// The destination is read back from the surface
///
///     use softraster::{Bitmap,BlendMode,Rgba32,get_pixel,put_blended_pixel};
///
///     let mut bmp = Bitmap::new(1, 1);
///     bmp.clear(Rgba32::new(0.0, 0.0, 1.0, 1.0));
///     let red = Rgba32::new(1.0, 0.0, 0.0, 0.5);
///     put_blended_pixel(&mut bmp, &BlendMode::alpha(), 0, 0, red);
///     let c = get_pixel(&bmp, 0, 0);
///     assert!((c.r - 0.5).abs() < 0.01 && (c.b - 0.5).abs() < 0.01);
///
pub fn put_blended_pixel<S: SurfaceMut + ?Sized>(bitmap: &mut S, blend: &BlendMode,
                                                 x: i32, y: i32, color: Rgba32) {
    if !bitmap.clip().contains(x, y) {
        return;
    }
    let dst = get_pixel(&*bitmap, x, y);
    put_pixel(bitmap, x, y, blend.blend(color, dst));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{Bitmap, BitmapFlags};
    use crate::pixfmt::PixelFormat;

    #[test]
    fn put_outside_clip_is_ignored() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.set_clip(1, 1, 2, 2);
        put_pixel(&mut bmp, 0, 0, Rgba32::white());
        put_pixel(&mut bmp, 3, 3, Rgba32::white());
        put_pixel(&mut bmp, -1, 2, Rgba32::white());
        put_pixel(&mut bmp, 2, 2, Rgba32::white());
        assert_eq!(bmp.pixel(0, 0), Rgba32::transparent());
        assert_eq!(bmp.pixel(3, 3), Rgba32::transparent());
        assert_eq!(bmp.pixel(2, 2), Rgba32::white());
        assert!(!bmp.is_locked());
    }
    #[test]
    fn reads_outside_return_zero() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.clear(Rgba32::white());
        assert_eq!(get_pixel(&bmp, -1, 0), Rgba32::transparent());
        assert_eq!(get_pixel(&bmp, 0, 4), Rgba32::transparent());
        assert_eq!(get_pixel(&bmp, 3, 3), Rgba32::white());
    }
    #[test]
    fn locked_access_goes_through_lock() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.clear(Rgba32::white());
        let fmt = LockFormat::Exact(PixelFormat::Rgb565);
        bmp.lock_region(0, 0, 2, 2, fmt, LockFlags::empty()).unwrap();
        assert_eq!(get_pixel(&bmp, 1, 1), Rgba32::white());
        assert_eq!(get_pixel(&bmp, 3, 3), Rgba32::transparent());
        put_pixel(&mut bmp, 1, 1, Rgba32::black());
        put_pixel(&mut bmp, 3, 3, Rgba32::black());
        assert_eq!(get_pixel(&bmp, 1, 1), Rgba32::black());
        assert_eq!(bmp.pixel(1, 1), Rgba32::white());
        bmp.unlock();
        assert_eq!(bmp.pixel(1, 1), Rgba32::black());
        assert_eq!(bmp.pixel(3, 3), Rgba32::white());
    }
    #[test]
    fn sub_bitmap_reads_parent() {
        let mut bmp = Bitmap::new(4, 4);
        put_pixel(&mut bmp, 3, 2, Rgba32::white());
        let sub = crate::bitmap::SubBitmap::new(&bmp, 2, 2, 2, 2);
        assert_eq!(get_pixel(&sub, 1, 0), Rgba32::white());
        assert_eq!(get_pixel(&sub, 2, 0), Rgba32::transparent());
    }
    #[test]
    fn video_only_is_not_touched() {
        let mut bmp = Bitmap::with_format(4, 4, PixelFormat::Dxt1, BitmapFlags::VIDEO_BITMAP);
        put_pixel(&mut bmp, 1, 1, Rgba32::white());
        assert_eq!(get_pixel(&bmp, 1, 1), Rgba32::transparent());
        assert!(bmp.buffer().data.iter().all(|&v| v == 0));
    }
    #[test]
    fn blended_reads_destination() {
        let mut bmp = Bitmap::new(1, 1);
        let add = BlendMode::new(crate::blend::BlendOp::Add, crate::blend::BlendFactor::One,
                                 crate::blend::BlendFactor::One);
        let c = Rgba32::new(0.2, 0.0, 0.0, 0.2);
        put_blended_pixel(&mut bmp, &add, 0, 0, c);
        put_blended_pixel(&mut bmp, &add, 0, 0, c);
        let out = get_pixel(&bmp, 0, 0);
        assert_eq!(crate::color::Rgba8::from(out), crate::color::Rgba8::new(102, 0, 0, 102));
    }
}
