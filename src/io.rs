//! Reading and writing of image files
//!
//! Any format known to the `image` crate with the enabled features; pixels
//! pass through 8 bit RGBA

use std::path::Path;

use image::RgbaImage;
use log::debug;

use crate::bitmap::{Bitmap, Surface};
use crate::color::Rgba8;
use crate::error::Error;
use crate::lock::{LockFlags, LockFormat};
use crate::pixfmt::PixelFormat;

/// Load a memory bitmap in the default format
pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<Bitmap, Error> {
    let img = image::open(filename)?.to_rgba8();
    let (w, h) = img.dimensions();
    let mut bmp = Bitmap::new(w as usize, h as usize);
    if w == 0 || h == 0 {
        return Ok(bmp);
    }
    let row = w as usize * 4;
    {
        let mut region = bmp.lock(LockFormat::Exact(PixelFormat::Abgr8888), LockFlags::WRITE_ONLY)?;
        let pitch = region.pitch();
        let data = region.data_mut();
        for (y, src) in img.as_raw().chunks_exact(row).enumerate() {
            data[y * pitch .. y * pitch + row].copy_from_slice(src);
        }
    }
    bmp.unlock();
    Ok(bmp)
}

/// Save the pixels of `bitmap`
///
/// The format follows the extension of `filename`
pub fn write_file<S: Surface + ?Sized, P: AsRef<Path>>(bitmap: &S, filename: P) -> Result<(), Error> {
    let (w, h) = (bitmap.width().max(0) as u32, bitmap.height().max(0) as u32);
    let (root, xofs, yofs) = bitmap.root();
    let img = RgbaImage::from_fn(w, h, |x, y| {
        let c = Rgba8::from(root.pixel(x as i32 + xofs, y as i32 + yofs));
        image::Rgba([c.r, c.g, c.b, c.a])
    });
    img.save(filename)?;
    Ok(())
}

/// Return if two image files hold the same pixels
pub fn img_diff<P: AsRef<Path>>(f1: P, f2: P) -> Result<bool, Error> {
    let d1 = image::open(f1)?.to_rgba8();
    let d2 = image::open(f2)?.to_rgba8();
    if d1.dimensions() != d2.dimensions() {
        debug!("size differs: {:?} {:?}", d1.dimensions(), d2.dimensions());
        return Ok(false);
    }
    let mut flag = true;
    for (x, y, p1) in d1.enumerate_pixels() {
        let p2 = d2.get_pixel(x, y);
        if p1 != p2 {
            debug!("[{},{}]: {:?} {:?}", x, y, p1, p2);
            flag = false;
        }
    }
    Ok(flag)
}
