//! Software triangle, line and point rasterizer
//!
//! How does this work
//!
//! ```text
//! draw_prim(target, state, vertices, texture, ..)
//!   PrimType -> triangles, lines, points
//!   Transform::transform_vertices()
//!   use_software() / PrimitiveBackend
//! draw_triangle(target, state, texture, v1, v2, v3)
//!   TriangleShader::select()   -- Solid, Grad, TextureSolid, TextureGrad
//!   draw_soft_triangle()
//!     bounding box & clip
//!     RegionLock::acquire()    -- existing lock or fresh lock
//!     triangle_stepper()
//!       init()
//!       first() / step()       -- once per scanline
//!       draw()                 -- one span per scanline
//!         LockedRegion::span_mut()
//!         BlendMode::blend()
//!     RegionLock::drop()       -- unlock
//! ```
//!
//! A red triangle in a small memory bitmap
//!
//!     use softraster::{Bitmap,BlendMode,RenderState,Rgba32,Vertex};
//!     use softraster::{draw_triangle,get_pixel};
//!
//!     let mut bmp = Bitmap::new(20, 20);
//!     let state = RenderState::with_blend(BlendMode::copy());
//!     let red = Rgba32::new(1.0, 0.0, 0.0, 1.0);
//!     let v1 = Vertex::new(0.0, 0.0, red);
//!     let v2 = Vertex::new(10.0, 0.0, red);
//!     let v3 = Vertex::new(0.0, 10.0, red);
//!     draw_triangle(&mut bmp, &state, None::<&Bitmap>, &v1, &v2, &v3);
//!
//!     assert_eq!(get_pixel(&bmp, 1, 1), red);
//!     assert_eq!(get_pixel(&bmp, 15, 15), Rgba32::transparent());

pub mod error;
pub mod color;
pub mod math;
pub mod blend;
pub mod pixfmt;
pub mod buffer;
pub mod clip;
pub mod lock;
pub mod bitmap;
pub mod pixel;
pub mod vertex;
pub mod shader;
pub mod raster;
pub mod soft;
pub mod transform;
pub mod primitives;
pub mod render;
pub mod io;

pub use error::*;
pub use color::*;
pub use math::*;
pub use blend::*;
pub use pixfmt::*;
pub use buffer::*;
pub use clip::*;
pub use lock::*;
pub use bitmap::*;
pub use pixel::*;
pub use vertex::*;
pub use shader::*;
pub use raster::*;
pub use soft::*;
pub use transform::*;
pub use primitives::*;
pub use render::*;
pub use io::*;

/// Access Color properties and components
pub trait Color: Copy + std::fmt::Debug {
    /// Get red value [0,1] as f32
    fn red(&self) -> f32;
    /// Get green value [0,1] as f32
    fn green(&self) -> f32;
    /// Get blue value [0,1] as f32
    fn blue(&self) -> f32;
    /// Get alpha value [0,1] as f32
    fn alpha(&self) -> f32;
    /// Get red value [0,255] as u8
    fn red8(&self) -> u8 { color::cu8(self.red()) }
    /// Get green value [0,255] as u8
    fn green8(&self) -> u8 { color::cu8(self.green()) }
    /// Get blue value [0,255] as u8
    fn blue8(&self) -> u8 { color::cu8(self.blue()) }
    /// Get alpha value [0,255] as u8
    fn alpha8(&self) -> u8 { color::cu8(self.alpha()) }
    /// Return if the color is completely transparent, alpha = 0.0
    fn is_transparent(&self) -> bool { self.alpha() == 0.0 }
    /// Return if the color is completely opaque, alpha = 1.0
    fn is_opaque(&self) -> bool { self.alpha() >= 1.0 }
}
