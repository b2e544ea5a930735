//! Pixel Format
//!
//! Packed formats are named from the most significant bits of the pixel
//! word down, the word being stored little-endian.  `Argb8888` is therefore
//! laid out in memory as B, G, R, A.

use byteorder::{ByteOrder, LittleEndian};

use crate::color::Rgba32;

/// Memory layout of one pixel
#[derive(Debug,Copy,Clone,PartialEq,Eq,Hash)]
pub enum PixelFormat {
    /// 32 bit 0xAARRGGBB
    Argb8888,
    /// 32 bit 0xRRGGBBAA
    Rgba8888,
    /// 32 bit 0xAABBGGRR, bytes R, G, B, A
    Abgr8888,
    /// 32 bit 0x00RRGGBB, always opaque
    Xrgb8888,
    /// 24 bit 0xRRGGBB
    Rgb888,
    /// 24 bit 0xBBGGRR, bytes R, G, B
    Bgr888,
    /// 16 bit, 5 bits red, 6 green, 5 blue
    Rgb565,
    /// 16 bit, 4 bits per channel
    Rgba4444,
    /// Four f32 values, R, G, B, A
    AbgrF32,
    /// 8 bit red channel only
    SingleChannel8,
    /// DXT1 compressed blocks of 4x4 pixels
    Dxt1,
    /// DXT3 compressed blocks of 4x4 pixels
    Dxt3,
    /// DXT5 compressed blocks of 4x4 pixels
    Dxt5,
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat::Abgr8888
    }
}

fn unpack(word: u32, shift: u32, bits: u32) -> f32 {
    let max = (1u32 << bits) - 1;
    ((word >> shift) & max) as f32 / max as f32
}

fn pack(v: f32, shift: u32, bits: u32) -> u32 {
    let max = ((1u32 << bits) - 1) as f32;
    ((v.max(0.0).min(1.0) * max).round() as u32) << shift
}

impl PixelFormat {
    /// Bytes per pixel; bytes per block for compressed formats
    pub fn pixel_size(self) -> usize {
        use PixelFormat::*;
        match self {
            Argb8888 | Rgba8888 | Abgr8888 | Xrgb8888 => 4,
            Rgb888 | Bgr888 => 3,
            Rgb565 | Rgba4444 => 2,
            AbgrF32 => 16,
            SingleChannel8 => 1,
            Dxt1 => 8,
            Dxt3 | Dxt5 => 16,
        }
    }
    /// Width of a block in pixels
    pub fn block_width(self) -> usize {
        if self.is_compressed() { 4 } else { 1 }
    }
    /// Height of a block in pixels
    pub fn block_height(self) -> usize {
        if self.is_compressed() { 4 } else { 1 }
    }
    /// Bytes per block
    pub fn block_size(self) -> usize {
        self.pixel_size()
    }
    /// Stored as compressed blocks
    pub fn is_compressed(self) -> bool {
        use PixelFormat::*;
        match self {
            Dxt1 | Dxt3 | Dxt5 => true,
            _ => false,
        }
    }
    /// Individual pixels cannot be addressed by the cpu
    pub fn is_video_only(self) -> bool {
        self.is_compressed()
    }
    /// Alpha is stored
    pub fn has_alpha(self) -> bool {
        use PixelFormat::*;
        match self {
            Xrgb8888 | Rgb888 | Bgr888 | Rgb565 | SingleChannel8 => false,
            _ => true,
        }
    }
    /// Bytes needed for one row of `width` pixels
    pub fn row_size(self, width: usize) -> usize {
        let bw = self.block_width();
        (width + bw - 1) / bw * self.block_size()
    }
    /// Read the pixel at the start of `p`
    ///
    /// Video-only formats read as zero
    pub fn get(self, p: &[u8]) -> Rgba32 {
        use PixelFormat::*;
        match self {
            Argb8888 => {
                let w = LittleEndian::read_u32(p);
                Rgba32::new(unpack(w, 16, 8), unpack(w, 8, 8), unpack(w, 0, 8), unpack(w, 24, 8))
            }
            Rgba8888 => {
                let w = LittleEndian::read_u32(p);
                Rgba32::new(unpack(w, 24, 8), unpack(w, 16, 8), unpack(w, 8, 8), unpack(w, 0, 8))
            }
            Abgr8888 => {
                let w = LittleEndian::read_u32(p);
                Rgba32::new(unpack(w, 0, 8), unpack(w, 8, 8), unpack(w, 16, 8), unpack(w, 24, 8))
            }
            Xrgb8888 => {
                let w = LittleEndian::read_u32(p);
                Rgba32::new(unpack(w, 16, 8), unpack(w, 8, 8), unpack(w, 0, 8), 1.0)
            }
            Rgb888 => {
                let w = LittleEndian::read_u24(p);
                Rgba32::new(unpack(w, 16, 8), unpack(w, 8, 8), unpack(w, 0, 8), 1.0)
            }
            Bgr888 => {
                let w = LittleEndian::read_u24(p);
                Rgba32::new(unpack(w, 0, 8), unpack(w, 8, 8), unpack(w, 16, 8), 1.0)
            }
            Rgb565 => {
                let w = u32::from(LittleEndian::read_u16(p));
                Rgba32::new(unpack(w, 11, 5), unpack(w, 5, 6), unpack(w, 0, 5), 1.0)
            }
            Rgba4444 => {
                let w = u32::from(LittleEndian::read_u16(p));
                Rgba32::new(unpack(w, 12, 4), unpack(w, 8, 4), unpack(w, 4, 4), unpack(w, 0, 4))
            }
            AbgrF32 => {
                let mut v = [0f32; 4];
                LittleEndian::read_f32_into(&p[..16], &mut v);
                Rgba32::new(v[0], v[1], v[2], v[3])
            }
            SingleChannel8 => Rgba32::new(unpack(u32::from(p[0]), 0, 8), 0.0, 0.0, 1.0),
            Dxt1 | Dxt3 | Dxt5 => Rgba32::transparent(),
        }
    }
    /// Write `c` to the pixel at the start of `p`
    ///
    /// Components are clamped into [0,1].  Video-only formats are not
    /// written.
    pub fn put(self, p: &mut [u8], c: Rgba32) {
        use PixelFormat::*;
        match self {
            Argb8888 => {
                let w = pack(c.a, 24, 8) | pack(c.r, 16, 8) | pack(c.g, 8, 8) | pack(c.b, 0, 8);
                LittleEndian::write_u32(p, w);
            }
            Rgba8888 => {
                let w = pack(c.r, 24, 8) | pack(c.g, 16, 8) | pack(c.b, 8, 8) | pack(c.a, 0, 8);
                LittleEndian::write_u32(p, w);
            }
            Abgr8888 => {
                let w = pack(c.a, 24, 8) | pack(c.b, 16, 8) | pack(c.g, 8, 8) | pack(c.r, 0, 8);
                LittleEndian::write_u32(p, w);
            }
            Xrgb8888 => {
                let w = pack(c.r, 16, 8) | pack(c.g, 8, 8) | pack(c.b, 0, 8);
                LittleEndian::write_u32(p, w);
            }
            Rgb888 => {
                let w = pack(c.r, 16, 8) | pack(c.g, 8, 8) | pack(c.b, 0, 8);
                LittleEndian::write_u24(p, w);
            }
            Bgr888 => {
                let w = pack(c.b, 16, 8) | pack(c.g, 8, 8) | pack(c.r, 0, 8);
                LittleEndian::write_u24(p, w);
            }
            Rgb565 => {
                let w = pack(c.r, 11, 5) | pack(c.g, 5, 6) | pack(c.b, 0, 5);
                LittleEndian::write_u16(p, w as u16);
            }
            Rgba4444 => {
                let w = pack(c.r, 12, 4) | pack(c.g, 8, 4) | pack(c.b, 4, 4) | pack(c.a, 0, 4);
                LittleEndian::write_u16(p, w as u16);
            }
            AbgrF32 => {
                let c = c.clamp();
                LittleEndian::write_f32_into(&[c.r, c.g, c.b, c.a], &mut p[..16]);
            }
            SingleChannel8 => p[0] = pack(c.r, 0, 8) as u8,
            Dxt1 | Dxt3 | Dxt5 => {}
        }
    }
}

/// Copy a `w` x `h` region between buffers, converting the pixel format
///
/// `src` and `dst` start at the first pixel of the region
pub fn convert_region(src: &[u8], src_format: PixelFormat, src_pitch: usize,
                      dst: &mut [u8], dst_format: PixelFormat, dst_pitch: usize,
                      w: usize, h: usize) {
    let ss = src_format.pixel_size();
    let ds = dst_format.pixel_size();
    if src_format == dst_format {
        for j in 0 .. h {
            let s = &src[j * src_pitch .. j * src_pitch + w * ss];
            dst[j * dst_pitch .. j * dst_pitch + w * ds].copy_from_slice(s);
        }
        return;
    }
    for j in 0 .. h {
        for i in 0 .. w {
            let c = src_format.get(&src[j * src_pitch + i * ss ..]);
            dst_format.put(&mut dst[j * dst_pitch + i * ds ..], c);
        }
    }
}
