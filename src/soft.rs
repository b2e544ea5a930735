//! Software drawing of single primitives
//!
//! Each entry point bounds the primitive, clips the bounds, locks the
//! target for the duration of the walk and then runs a stepper.  Nothing
//! outside of (lock ∩ bounds ∩ clip) is written.  When the region cannot
//! be locked nothing is drawn at all.

use log::{trace, warn};

use crate::bitmap::{Surface, SurfaceMut};
use crate::clip::Rectangle;
use crate::lock::{LockedRegion, RegionLock};
use crate::pixel::{put_blended_pixel, put_pixel};
use crate::raster::{line_stepper, triangle_stepper};
use crate::render::RenderState;
use crate::shader::{LineShader, Shader, TextureSampler, TriangleShader};
use crate::vertex::Vertex;

/// Pixels that a primitive through `vertices` can touch, one pixel of
/// slop on each side
fn bounding_box(vertices: &[&Vertex]) -> Rectangle<i32> {
    let mut min = (std::f32::INFINITY, std::f32::INFINITY);
    let mut max = (std::f32::NEG_INFINITY, std::f32::NEG_INFINITY);
    for v in vertices {
        min = (min.0.min(v.x), min.1.min(v.y));
        max = (max.0.max(v.x), max.1.max(v.y));
    }
    Rectangle {
        x1: (min.0.floor() as i32).saturating_sub(1),
        y1: (min.1.floor() as i32).saturating_sub(1),
        x2: (max.0.ceil() as i32).saturating_add(1),
        y2: (max.1.ceil() as i32).saturating_add(1),
    }
}

/// Lock the part of `target` within `bounds` and hand it to `walk`
///
/// Returns false when nothing could be drawn
fn with_region<S, F>(target: &mut S, bounds: Rectangle<i32>, walk: F) -> bool
    where S: SurfaceMut + ?Sized,
          F: FnOnce(&mut LockedRegion<&mut [u8]>)
{
    let area = bounds.intersect(&target.clip());
    if area.is_empty() {
        trace!("{:?} outside of clip {:?}", bounds, target.clip());
        return false;
    }
    let (root, xofs, yofs) = target.root_mut();
    let rect = area.translate(xofs, yofs);
    let mut lock = match RegionLock::acquire(root, &rect) {
        Some(lock) => lock,
        None => return false,
    };
    let mut region = match lock.region() {
        Some(region) => region,
        None => return false,
    };
    region.rebase(-xofs, -yofs);
    region.restrict(&area);
    walk(&mut region);
    true
}

/// Sampler for `texture`, or None when it cannot be read
fn texture_sampler<T: Surface + ?Sized>(texture: &T) -> Option<TextureSampler> {
    let format = texture.format();
    if format.is_video_only() {
        warn!("texture with video only format {:?} cannot be sampled", format);
        return None;
    }
    Some(TextureSampler::new(texture))
}

/// Fill triangle v1, v2, v3 on `target` with `shader`
///
/// An existing lock on the target is reused if it overlaps the
/// triangle; otherwise the triangle's region is locked and released
/// again before returning.  Returns false if nothing was drawn because
/// the triangle is clipped away or the region could not be locked.
pub fn draw_soft_triangle<S, Sh>(target: &mut S, v1: &Vertex, v2: &Vertex, v3: &Vertex,
                                 shader: &mut Sh) -> bool
    where S: SurfaceMut + ?Sized, Sh: Shader + ?Sized
{
    let bounds = bounding_box(&[v1, v2, v3]);
    with_region(target, bounds, |region| triangle_stepper(shader, region, v1, v2, v3))
}

/// Fill a triangle using the blend mode of `state`
///
/// The fill style is chosen from the vertex colors, the texture and the
/// blend mode, see [TriangleShader::select].  Texture coordinates are in
/// pixels.  Returns false if nothing was drawn.
///
/// [TriangleShader::select]: enum.TriangleShader.html#method.select
///
///     use softraster::{Bitmap,RenderState,Rgba32,Vertex,draw_triangle,get_pixel};
///
///     let mut tex = Bitmap::new(2, 2);
///     tex.clear(Rgba32::new(0.0, 0.0, 1.0, 1.0));
///
///     let mut bmp = Bitmap::new(16, 16);
///     let w = Rgba32::white();
///     let v1 = Vertex::with_uv(0.0, 0.0, 0.0, 0.0, w);
///     let v2 = Vertex::with_uv(16.0, 0.0, 16.0, 0.0, w);
///     let v3 = Vertex::with_uv(0.0, 16.0, 0.0, 16.0, w);
///     assert!(draw_triangle(&mut bmp, &RenderState::default(), Some(&tex), &v1, &v2, &v3));
///     assert_eq!(get_pixel(&bmp, 3, 3), Rgba32::new(0.0, 0.0, 1.0, 1.0));
///
pub fn draw_triangle<S, T>(target: &mut S, state: &RenderState, texture: Option<&T>,
                           v1: &Vertex, v2: &Vertex, v3: &Vertex) -> bool
    where S: SurfaceMut + ?Sized, T: Surface + ?Sized
{
    let sampler = match texture {
        Some(t) => match texture_sampler(t) {
            Some(s) => Some(s),
            None => return false,
        },
        None => None,
    };
    let mut shader = TriangleShader::select(sampler, &state.blend, v1, v2, v3);
    draw_soft_triangle(target, v1, v2, v3, &mut shader)
}

/// Draw the line v1 to v2 on `target` with `shader`
///
/// Same locking as [draw_soft_triangle](fn.draw_soft_triangle.html)
pub fn draw_soft_line<S, Sh>(target: &mut S, v1: &Vertex, v2: &Vertex, shader: &mut Sh) -> bool
    where S: SurfaceMut + ?Sized, Sh: LineShader + ?Sized
{
    let bounds = bounding_box(&[v1, v2]);
    with_region(target, bounds, |region| line_stepper(shader, region, v1, v2))
}

/// Draw a one pixel wide line using the blend mode of `state`
///
/// Colors and texture coordinates are interpolated along the line
pub fn draw_line<S, T>(target: &mut S, state: &RenderState, texture: Option<&T>,
                       v1: &Vertex, v2: &Vertex) -> bool
    where S: SurfaceMut + ?Sized, T: Surface + ?Sized
{
    let sampler = match texture {
        Some(t) => match texture_sampler(t) {
            Some(s) => Some(s),
            None => return false,
        },
        None => None,
    };
    let mut shader = TriangleShader::select(sampler, &state.blend, v1, v2, v2);
    draw_soft_line(target, v1, v2, &mut shader)
}

/// Draw the pixel containing `v`
///
/// A textured point is the texel at (u,v) tinted by the vertex color
///
///     use softraster::{Bitmap,RenderState,Rgba32,Vertex,draw_point,get_pixel};
///
///     let mut bmp = Bitmap::new(4, 4);
///     let red = Rgba32::new(1.0, 0.0, 0.0, 1.0);
///     draw_point(&mut bmp, &RenderState::default(), None::<&Bitmap>, &Vertex::new(2.7, 1.2, red));
///     assert_eq!(get_pixel(&bmp, 2, 1), red);
///
pub fn draw_point<S, T>(target: &mut S, state: &RenderState, texture: Option<&T>, v: &Vertex) -> bool
    where S: SurfaceMut + ?Sized, T: Surface + ?Sized
{
    let (x, y) = (v.x.floor() as i32, v.y.floor() as i32);
    if !target.clip().contains(x, y) {
        return false;
    }
    let color = match texture {
        Some(t) => match texture_sampler(t) {
            Some(s) if v.color.is_white() => s.sample(v.u, v.v),
            Some(s) => s.sample(v.u, v.v) * v.color,
            None => return false,
        },
        None => v.color,
    };
    if state.blend.is_copy() {
        put_pixel(target, x, y, color);
    } else {
        put_blended_pixel(target, &state.blend, x, y, color);
    }
    true
}
