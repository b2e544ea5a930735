//! Scanline shaders
//!
//! A shader produces the colors of one primitive.  The stepper drives it
//! through four calls:
//!
//!   - `init`  : once, with the three vertices of the triangle
//!   - `first` : at the first row of each edge segment
//!   - `step`  : at every following row, minor or major left edge advance
//!   - `draw`  : once per row, for the inclusive span of pixels
//!
//! All interpolated quantities are planes, `value = dx * x + dy * y + c`,
//! solved once in `init`.  Only the current values change as the walk
//! proceeds.
//!
//! [TriangleShader] is the closed set of fill styles; see
//! [select](enum.TriangleShader.html#method.select) for how one is chosen.
//!
//! [TriangleShader]: enum.TriangleShader.html

use crate::bitmap::{Bitmap, Surface, WrapMode};
use crate::blend::BlendMode;
use crate::color::Rgba32;
use crate::lock::LockedRegion;
use crate::math::{clamp_var, fix_var, mirror_var, Plane, PlaneBasis};
use crate::pixfmt::PixelFormat;
use crate::vertex::Vertex;

/// How a shaded color reaches the destination
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Compose {
    /// Overwrite the destination
    Copy,
    /// Blend with the destination
    Blend(BlendMode),
}

impl Compose {
    /// Copy when the blend mode reduces to writing the source
    pub fn from_blend(blend: &BlendMode) -> Self {
        if blend.is_copy() {
            Compose::Copy
        } else {
            Compose::Blend(*blend)
        }
    }
    fn put(&self, format: PixelFormat, p: &mut [u8], c: Rgba32) {
        match self {
            Compose::Copy => format.put(p, c),
            Compose::Blend(b) => {
                let dst = format.get(p);
                format.put(p, b.blend(c, dst));
            }
        }
    }
}

/// Interpolation state of one fill style
pub trait Shader {
    /// Solve the planes of the triangle v1, v2, v3
    fn init(&mut self, v1: &Vertex, v2: &Vertex, v3: &Vertex);
    /// Set the current values at (x,y) and cache the row to row deltas
    /// for a left edge advance of `left_minor` and `left_major` pixels
    fn first(&mut self, x: i32, y: i32, left_minor: i32, left_major: i32);
    /// Advance one row
    fn step(&mut self, minor: bool);
    /// Write pixels x1..=x2 of row y
    ///
    /// Pixels outside of the window of `dst` are skipped
    fn draw(&mut self, dst: &mut LockedRegion<&mut [u8]>, x1: i32, y: i32, x2: i32);
}

/// Shader that can also walk a line
///
/// Lines never call `init`; `first` is replaced by
/// [first_on_line](#tymethod.first_on_line) and `draw` is called with
/// single pixel spans
pub trait LineShader: Shader {
    /// Set the current values at (x,y) on the line v1 to v2
    fn first_on_line(&mut self, x: i32, y: i32, v1: &Vertex, v2: &Vertex);
}

/// Part of a row that lies in the window of `dst`
///
/// Returns the number of pixels skipped at the left and the bytes of the
/// remaining pixels
fn clipped_span<'r>(dst: &'r mut LockedRegion<&mut [u8]>, x1: i32, y: i32, x2: i32)
                    -> Option<(f32, &'r mut [u8])> {
    let (cx1, cx2) = dst.clip_span(x1, y, x2)?;
    let skip = i64::from(cx1) - i64::from(x1);
    Some((skip as f32, dst.span_mut(cx1, y, cx2)))
}

/// Position along a line and its change per minor and major step
struct LineParams {
    param: f32,
    minor: f32,
    major: f32,
}

impl LineParams {
    fn new(x: i32, y: i32, v1: &Vertex, v2: &Vertex) -> Self {
        let dx = v2.x - v1.x;
        let dy = v2.y - v1.y;
        let mut lensq = dx * dx + dy * dy;
        let param = if lensq == 0.0 {
            lensq = 0.0001;
            0.0
        } else {
            ((x as f32 - v1.x) * dx + (y as f32 - v1.y) * dy) / lensq
        };
        let (dx, dy) = (dx.abs(), dy.abs());
        Self { param, minor: dx.max(dy) / lensq, major: (dx + dy) / lensq }
    }
}

#[derive(Debug,Default,Copy,Clone)]
struct ColorPlanes {
    r: Plane,
    g: Plane,
    b: Plane,
    a: Plane,
}

impl ColorPlanes {
    fn new(basis: &PlaneBasis, c1: Rgba32, c2: Rgba32, c3: Rgba32) -> Self {
        Self {
            r: basis.plane(c1.r, c2.r, c3.r),
            g: basis.plane(c1.g, c2.g, c3.g),
            b: basis.plane(c1.b, c2.b, c3.b),
            a: basis.plane(c1.a, c2.a, c3.a),
        }
    }
    fn eval(&self, x: f32, y: f32) -> Rgba32 {
        Rgba32::new(self.r.eval(x, y), self.g.eval(x, y), self.b.eval(x, y), self.a.eval(x, y))
    }
    fn dx(&self) -> Rgba32 {
        Rgba32::new(self.r.dx, self.g.dx, self.b.dx, self.a.dx)
    }
    fn dy(&self) -> Rgba32 {
        Rgba32::new(self.r.dy, self.g.dy, self.b.dy, self.a.dy)
    }
}

/// Interpolated color
#[derive(Debug,Default,Copy,Clone)]
struct ColorWalk {
    planes: ColorPlanes,
    cur: Rgba32,
    minor: Rgba32,
    major: Rgba32,
}

impl ColorWalk {
    fn first(&mut self, x: f32, y: f32, left_minor: i32, left_major: i32) {
        let (dx, dy) = (self.planes.dx(), self.planes.dy());
        self.cur = self.planes.eval(x, y);
        self.minor = dx * left_minor as f32 + dy;
        self.major = dx * left_major as f32 + dy;
    }
    fn first_on_line(&mut self, p: &LineParams, v1: &Vertex, v2: &Vertex) {
        let diff = v2.color - v1.color;
        self.cur = v1.color + diff * p.param;
        self.minor = diff * p.minor;
        self.major = diff * p.major;
    }
    fn step(&mut self, minor: bool) {
        self.cur += if minor { self.minor } else { self.major };
    }
}

/// Interpolated texture coordinates
///
/// Accumulated in double precision; long triangles drift otherwise
#[derive(Debug,Default,Copy,Clone)]
struct UvWalk {
    u: Plane,
    v: Plane,
    cur: (f64, f64),
    minor: (f64, f64),
    major: (f64, f64),
}

impl UvWalk {
    fn new(basis: &PlaneBasis, v1: &Vertex, v2: &Vertex, v3: &Vertex) -> Self {
        Self {
            u: basis.plane(v1.u, v2.u, v3.u),
            v: basis.plane(v1.v, v2.v, v3.v),
            ..Default::default()
        }
    }
    fn first(&mut self, x: f32, y: f32, left_minor: i32, left_major: i32) {
        self.cur = (f64::from(self.u.eval(x, y)), f64::from(self.v.eval(x, y)));
        let (pu, pv) = (self.u, self.v);
        let delta = |n: i32| {
            (f64::from(n) * f64::from(pu.dx) + f64::from(pu.dy),
             f64::from(n) * f64::from(pv.dx) + f64::from(pv.dy))
        };
        self.minor = delta(left_minor);
        self.major = delta(left_major);
    }
    fn first_on_line(&mut self, p: &LineParams, v1: &Vertex, v2: &Vertex) {
        let du = v2.u - v1.u;
        let dv = v2.v - v1.v;
        self.cur = (f64::from(v1.u + du * p.param), f64::from(v1.v + dv * p.param));
        self.minor = (f64::from(du * p.minor), f64::from(dv * p.minor));
        self.major = (f64::from(du * p.major), f64::from(dv * p.major));
    }
    fn step(&mut self, minor: bool) {
        let d = if minor { self.minor } else { self.major };
        self.cur.0 += d.0;
        self.cur.1 += d.1;
    }
    /// Coordinates after skipping `skip` pixels of the current row
    fn at(&self, skip: f32) -> (f32, f32) {
        (self.cur.0 as f32 + self.u.dx * skip, self.cur.1 as f32 + self.v.dx * skip)
    }
}

/// Planes are measured from the first vertex, shifted to the sampling
/// position of the stepper
#[derive(Debug,Default,Copy,Clone)]
struct Origin {
    x: f32,
    y: f32,
}

impl Origin {
    fn new(v1: &Vertex) -> Self {
        Self { x: v1.x - 0.5, y: v1.y + 0.5 }
    }
    fn rel(&self, x: i32, y: i32) -> (f32, f32) {
        (x as f32 - self.x, y as f32 - self.y)
    }
}

/// Texel lookup under the wrap modes of a texture
///
/// Coordinates are in pixels of the texture.  Sub-bitmaps are addressed
/// within their own window.
#[derive(Debug,Copy,Clone)]
pub struct TextureSampler<'t> {
    bitmap: &'t Bitmap,
    xofs: i32,
    yofs: i32,
    w: i32,
    h: i32,
    wrap: (WrapMode, WrapMode),
    repeat: bool,
}

fn address(mode: WrapMode, var: f32, max_var: i32) -> i32 {
    match mode {
        WrapMode::Default | WrapMode::Repeat => fix_var(var, max_var),
        WrapMode::Clamp => clamp_var(var, max_var),
        WrapMode::Mirror => mirror_var(var, max_var),
    }
}

impl<'t> TextureSampler<'t> {
    /// Sample from `texture`
    pub fn new<T: Surface + ?Sized>(texture: &'t T) -> Self {
        let (bitmap, xofs, yofs) = texture.root();
        let wrap = bitmap.wrap();
        Self {
            bitmap, xofs, yofs,
            w: texture.width(),
            h: texture.height(),
            wrap,
            repeat: wrap.0.is_repeat() && wrap.1.is_repeat(),
        }
    }
    /// Width and height in pixels
    pub fn size(&self) -> (i32, i32) {
        (self.w, self.h)
    }
    /// Both axes wrap around
    pub fn is_repeat(&self) -> bool {
        self.repeat
    }
    /// Texel at (u,v); transparent for an empty texture
    ///
    ///     use softraster::{Bitmap,Rgba32,TextureSampler,WrapMode,put_pixel};
    ///
    ///     let mut tex = Bitmap::new(4, 4);
    ///     put_pixel(&mut tex, 3, 0, Rgba32::white());
    ///     let s = TextureSampler::new(&tex);
    ///     assert_eq!(s.sample(-0.5, 4.5), Rgba32::white());
    ///
    ///     tex.set_wrap(WrapMode::Clamp, WrapMode::Clamp);
    ///     let s = TextureSampler::new(&tex);
    ///     assert_eq!(s.sample(9.0, -3.0), Rgba32::white());
    ///
    pub fn sample(&self, u: f32, v: f32) -> Rgba32 {
        if self.w <= 0 || self.h <= 0 {
            return Rgba32::transparent();
        }
        let (x, y) = if self.repeat {
            (fix_var(u, self.w), fix_var(v, self.h))
        } else {
            (address(self.wrap.0, u, self.w), address(self.wrap.1, v, self.h))
        };
        self.bitmap.pixel(x + self.xofs, y + self.yofs)
    }
}

/// Flat color
#[derive(Debug,Copy,Clone)]
pub struct SolidShader {
    color: Rgba32,
    compose: Compose,
}

impl SolidShader {
    pub fn new(color: Rgba32, compose: Compose) -> Self {
        Self { color, compose }
    }
}

impl Shader for SolidShader {
    fn init(&mut self, v1: &Vertex, _v2: &Vertex, _v3: &Vertex) {
        self.color = v1.color;
    }
    fn first(&mut self, _x: i32, _y: i32, _left_minor: i32, _left_major: i32) {}
    fn step(&mut self, _minor: bool) {}
    fn draw(&mut self, dst: &mut LockedRegion<&mut [u8]>, x1: i32, y: i32, x2: i32) {
        let format = dst.format();
        let n = format.pixel_size();
        let px = match clipped_span(dst, x1, y, x2) {
            Some((_, px)) => px,
            None => return,
        };
        match self.compose {
            Compose::Copy => {
                // Encode once, then copy bytes
                let mut enc = [0u8; 16];
                format.put(&mut enc[..n], self.color);
                for p in px.chunks_exact_mut(n) {
                    p.copy_from_slice(&enc[..n]);
                }
            }
            ref compose => {
                for p in px.chunks_exact_mut(n) {
                    compose.put(format, p, self.color);
                }
            }
        }
    }
}

impl LineShader for SolidShader {
    fn first_on_line(&mut self, _x: i32, _y: i32, v1: &Vertex, _v2: &Vertex) {
        self.color = v1.color;
    }
}

/// Color interpolated between the vertices
#[derive(Debug,Copy,Clone)]
pub struct GradShader {
    origin: Origin,
    color: ColorWalk,
    compose: Compose,
}

impl GradShader {
    pub fn new(compose: Compose) -> Self {
        Self { origin: Origin::default(), color: ColorWalk::default(), compose }
    }
    /// Current color at the left end of the row
    pub fn color(&self) -> Rgba32 {
        self.color.cur
    }
}

impl Shader for GradShader {
    fn init(&mut self, v1: &Vertex, v2: &Vertex, v3: &Vertex) {
        let basis = PlaneBasis::new((v1.x, v1.y), (v2.x, v2.y), (v3.x, v3.y));
        self.origin = Origin::new(v1);
        self.color.planes = ColorPlanes::new(&basis, v1.color, v2.color, v3.color);
    }
    fn first(&mut self, x: i32, y: i32, left_minor: i32, left_major: i32) {
        let (cx, cy) = self.origin.rel(x, y);
        self.color.first(cx, cy, left_minor, left_major);
    }
    fn step(&mut self, minor: bool) {
        self.color.step(minor);
    }
    fn draw(&mut self, dst: &mut LockedRegion<&mut [u8]>, x1: i32, y: i32, x2: i32) {
        let format = dst.format();
        let n = format.pixel_size();
        let dx = self.color.planes.dx();
        let compose = self.compose;
        if let Some((skip, px)) = clipped_span(dst, x1, y, x2) {
            let mut c = self.color.cur + dx * skip;
            for p in px.chunks_exact_mut(n) {
                compose.put(format, p, c);
                c += dx;
            }
        }
    }
}

impl LineShader for GradShader {
    fn first_on_line(&mut self, x: i32, y: i32, v1: &Vertex, v2: &Vertex) {
        self.color.first_on_line(&LineParams::new(x, y, v1, v2), v1, v2);
    }
}

/// Texture, tinted by a flat color
#[derive(Debug,Copy,Clone)]
pub struct TextureSolidShader<'t> {
    sampler: TextureSampler<'t>,
    tint: Rgba32,
    white: bool,
    origin: Origin,
    uv: UvWalk,
    compose: Compose,
}

impl<'t> TextureSolidShader<'t> {
    /// With `white` the tint is skipped
    pub fn new(sampler: TextureSampler<'t>, white: bool, compose: Compose) -> Self {
        Self {
            sampler, white, compose,
            tint: Rgba32::white(),
            origin: Origin::default(),
            uv: UvWalk::default(),
        }
    }
    /// Texture coordinates at the left end of the row
    pub fn uv(&self) -> (f64, f64) {
        self.uv.cur
    }
}

impl<'t> Shader for TextureSolidShader<'t> {
    fn init(&mut self, v1: &Vertex, v2: &Vertex, v3: &Vertex) {
        let basis = PlaneBasis::new((v1.x, v1.y), (v2.x, v2.y), (v3.x, v3.y));
        self.origin = Origin::new(v1);
        self.tint = v1.color;
        self.uv = UvWalk::new(&basis, v1, v2, v3);
    }
    fn first(&mut self, x: i32, y: i32, left_minor: i32, left_major: i32) {
        let (cx, cy) = self.origin.rel(x, y);
        self.uv.first(cx, cy, left_minor, left_major);
    }
    fn step(&mut self, minor: bool) {
        self.uv.step(minor);
    }
    fn draw(&mut self, dst: &mut LockedRegion<&mut [u8]>, x1: i32, y: i32, x2: i32) {
        let format = dst.format();
        let n = format.pixel_size();
        let (du, dv) = (self.uv.u.dx, self.uv.v.dx);
        let (sampler, tint, white, compose) = (self.sampler, self.tint, self.white, self.compose);
        let uv = self.uv;
        if let Some((skip, px)) = clipped_span(dst, x1, y, x2) {
            let (mut u, mut v) = uv.at(skip);
            for p in px.chunks_exact_mut(n) {
                let texel = sampler.sample(u, v);
                let c = if white { texel } else { texel * tint };
                compose.put(format, p, c);
                u += du;
                v += dv;
            }
        }
    }
}

impl<'t> LineShader for TextureSolidShader<'t> {
    fn first_on_line(&mut self, x: i32, y: i32, v1: &Vertex, v2: &Vertex) {
        self.tint = v1.color;
        self.uv.first_on_line(&LineParams::new(x, y, v1, v2), v1, v2);
    }
}

/// Texture, tinted by an interpolated color
#[derive(Debug,Copy,Clone)]
pub struct TextureGradShader<'t> {
    sampler: TextureSampler<'t>,
    origin: Origin,
    uv: UvWalk,
    color: ColorWalk,
    compose: Compose,
}

impl<'t> TextureGradShader<'t> {
    pub fn new(sampler: TextureSampler<'t>, compose: Compose) -> Self {
        Self {
            sampler, compose,
            origin: Origin::default(),
            uv: UvWalk::default(),
            color: ColorWalk::default(),
        }
    }
}

impl<'t> Shader for TextureGradShader<'t> {
    fn init(&mut self, v1: &Vertex, v2: &Vertex, v3: &Vertex) {
        let basis = PlaneBasis::new((v1.x, v1.y), (v2.x, v2.y), (v3.x, v3.y));
        self.origin = Origin::new(v1);
        self.uv = UvWalk::new(&basis, v1, v2, v3);
        self.color.planes = ColorPlanes::new(&basis, v1.color, v2.color, v3.color);
    }
    fn first(&mut self, x: i32, y: i32, left_minor: i32, left_major: i32) {
        let (cx, cy) = self.origin.rel(x, y);
        self.uv.first(cx, cy, left_minor, left_major);
        self.color.first(cx, cy, left_minor, left_major);
    }
    fn step(&mut self, minor: bool) {
        self.uv.step(minor);
        self.color.step(minor);
    }
    fn draw(&mut self, dst: &mut LockedRegion<&mut [u8]>, x1: i32, y: i32, x2: i32) {
        let format = dst.format();
        let n = format.pixel_size();
        let (du, dv) = (self.uv.u.dx, self.uv.v.dx);
        let dc = self.color.planes.dx();
        let (sampler, compose, uv) = (self.sampler, self.compose, self.uv);
        let cur = self.color.cur;
        if let Some((skip, px)) = clipped_span(dst, x1, y, x2) {
            let (mut u, mut v) = uv.at(skip);
            let mut c = cur + dc * skip;
            for p in px.chunks_exact_mut(n) {
                compose.put(format, p, sampler.sample(u, v) * c);
                u += du;
                v += dv;
                c += dc;
            }
        }
    }
}

impl<'t> LineShader for TextureGradShader<'t> {
    fn first_on_line(&mut self, x: i32, y: i32, v1: &Vertex, v2: &Vertex) {
        let p = LineParams::new(x, y, v1, v2);
        self.uv.first_on_line(&p, v1, v2);
        self.color.first_on_line(&p, v1, v2);
    }
}

/// Every fill style of the software rasterizer
///
/// Used for triangles and, through [LineShader], for lines
///
/// [LineShader]: trait.LineShader.html
#[derive(Debug,Copy,Clone)]
pub enum TriangleShader<'t> {
    Solid(SolidShader),
    Grad(GradShader),
    TextureSolid(TextureSolidShader<'t>),
    TextureGrad(TextureGradShader<'t>),
}

impl<'t> TriangleShader<'t> {
    /// Choose the fill style for a primitive
    ///
    /// - Gradient when the vertex colors differ, flat otherwise
    /// - Textured when a texture is given; a flat tint of exactly white
    ///   is skipped
    /// - Direct writes when `blend` reduces to a copy, blending otherwise
    ///
    /// For lines pass the second vertex twice.
    ///
    ///     use softraster::{BlendMode,Rgba32,TriangleShader,Vertex};
    ///
    ///     let red = Rgba32::new(1.0, 0.0, 0.0, 1.0);
    ///     let v1 = Vertex::new(0.0, 0.0, red);
    ///     let v2 = Vertex::new(4.0, 0.0, red);
    ///     let v3 = Vertex::new(0.0, 4.0, Rgba32::white());
    ///     let s = TriangleShader::select(None, &BlendMode::copy(), &v1, &v2, &v2);
    ///     assert!(matches!(s, TriangleShader::Solid(_)));
    ///     let s = TriangleShader::select(None, &BlendMode::copy(), &v1, &v2, &v3);
    ///     assert!(matches!(s, TriangleShader::Grad(_)));
    ///
    pub fn select(texture: Option<TextureSampler<'t>>, blend: &BlendMode,
                  v1: &Vertex, v2: &Vertex, v3: &Vertex) -> Self {
        let compose = Compose::from_blend(blend);
        let grad = !(v1.color == v2.color && v2.color == v3.color);
        match (texture, grad) {
            (None, false) => TriangleShader::Solid(SolidShader::new(v1.color, compose)),
            (None, true) => TriangleShader::Grad(GradShader::new(compose)),
            (Some(s), false) => {
                let white = v1.color.is_white();
                TriangleShader::TextureSolid(TextureSolidShader::new(s, white, compose))
            }
            (Some(s), true) => TriangleShader::TextureGrad(TextureGradShader::new(s, compose)),
        }
    }
    /// How pixels reach the destination
    pub fn compose(&self) -> Compose {
        match self {
            TriangleShader::Solid(s) => s.compose,
            TriangleShader::Grad(s) => s.compose,
            TriangleShader::TextureSolid(s) => s.compose,
            TriangleShader::TextureGrad(s) => s.compose,
        }
    }
}

impl<'t> Shader for TriangleShader<'t> {
    fn init(&mut self, v1: &Vertex, v2: &Vertex, v3: &Vertex) {
        match self {
            TriangleShader::Solid(s) => s.init(v1, v2, v3),
            TriangleShader::Grad(s) => s.init(v1, v2, v3),
            TriangleShader::TextureSolid(s) => s.init(v1, v2, v3),
            TriangleShader::TextureGrad(s) => s.init(v1, v2, v3),
        }
    }
    fn first(&mut self, x: i32, y: i32, left_minor: i32, left_major: i32) {
        match self {
            TriangleShader::Solid(s) => s.first(x, y, left_minor, left_major),
            TriangleShader::Grad(s) => s.first(x, y, left_minor, left_major),
            TriangleShader::TextureSolid(s) => s.first(x, y, left_minor, left_major),
            TriangleShader::TextureGrad(s) => s.first(x, y, left_minor, left_major),
        }
    }
    fn step(&mut self, minor: bool) {
        match self {
            TriangleShader::Solid(s) => s.step(minor),
            TriangleShader::Grad(s) => s.step(minor),
            TriangleShader::TextureSolid(s) => s.step(minor),
            TriangleShader::TextureGrad(s) => s.step(minor),
        }
    }
    fn draw(&mut self, dst: &mut LockedRegion<&mut [u8]>, x1: i32, y: i32, x2: i32) {
        match self {
            TriangleShader::Solid(s) => s.draw(dst, x1, y, x2),
            TriangleShader::Grad(s) => s.draw(dst, x1, y, x2),
            TriangleShader::TextureSolid(s) => s.draw(dst, x1, y, x2),
            TriangleShader::TextureGrad(s) => s.draw(dst, x1, y, x2),
        }
    }
}

impl<'t> LineShader for TriangleShader<'t> {
    fn first_on_line(&mut self, x: i32, y: i32, v1: &Vertex, v2: &Vertex) {
        match self {
            TriangleShader::Solid(s) => s.first_on_line(x, y, v1, v2),
            TriangleShader::Grad(s) => s.first_on_line(x, y, v1, v2),
            TriangleShader::TextureSolid(s) => s.first_on_line(x, y, v1, v2),
            TriangleShader::TextureGrad(s) => s.first_on_line(x, y, v1, v2),
        }
    }
}
