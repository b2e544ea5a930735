//! Triangle and line steppers
//!
//! Both walk integer pixel positions with a Bresenham style error term
//! instead of dividing per row.  Triangles sample pixel centers: vertices
//! are moved by (-0.5, +0.5), a pixel is inside when its row lies in
//! `ceil(y1) .. ceil(y3)` and its column in `ceil(left) ..= floor(right)`
//! of the moved edges.  Row `y` of the walk is pixel row `y - 1`.

use crate::clip::Rectangle;
use crate::lock::LockedRegion;
use crate::shader::{LineShader, Shader};
use crate::vertex::Vertex;

/// Bias that keeps the right edge from claiming a pixel it only touches
const RIGHT_BIAS: f32 = 0.000_001;

/// One edge of the current segment
///
/// Between rows the error of the left edge stays in `(-y_delta, 0]` and
/// that of the right edge in `(0, y_delta]`
#[derive(Debug,Copy,Clone)]
struct Edge {
    x: i32,
    error: f32,
    p: (f32, f32),
    x_delta: f32,
    y_delta: f32,
    step: i32,
    d_er: f32,
}

impl Edge {
    /// Edge through `p` with slope `x_delta / y_delta`, at column `x` of
    /// row `y`
    fn new(x: i32, y: i32, p: (f32, f32), x_delta: f32, y_delta: f32) -> Self {
        let error = (y as f32 - p.1) * x_delta - (x as f32 - p.0) * y_delta;
        let step = (x_delta / y_delta).ceil() as i32;
        Self { x, error, p, x_delta, y_delta, step, d_er: -(step as f32) * y_delta }
    }
    /// Start the edge over at row `y`, near the column it crosses there
    fn move_to(&mut self, y: i32) {
        let x = self.p.0 + (y as f32 - self.p.1) * self.x_delta / self.y_delta;
        *self = Edge::new(x.floor() as i32, y, self.p, self.x_delta, self.y_delta);
    }
    fn jump(&mut self, n: i32) {
        self.x = self.x.saturating_add(n);
        self.error -= n as f32 * self.y_delta;
    }
    /// Move to the next row with the larger step
    fn advance(&mut self) {
        self.error += self.d_er;
        self.x = self.x.saturating_add(self.step);
    }
    fn end_row(&mut self) {
        self.error += self.x_delta;
    }
}

/// Walk rows `cur_y .. end` between `left` and `right`
///
/// Rows above the window of `dst` are jumped over and rows below it are
/// never reached, so the walk is bounded by the window height
fn segment<S: Shader + ?Sized>(shader: &mut S, dst: &mut LockedRegion<&mut [u8]>,
                               left: &mut Edge, right: &mut Edge, cur_y: &mut i32, end: i32) {
    // Only rows of the window are walked
    let window = dst.window();
    let end = end.min(window.y2.saturating_add(1));
    if *cur_y >= end {
        return;
    }
    let top = window.y1.saturating_add(1);
    if *cur_y < top {
        let y = top.min(end);
        left.move_to(y);
        right.move_to(y);
        *cur_y = y;
        if *cur_y >= end {
            return;
        }
    }

    let left_first = (left.error / left.y_delta).ceil() as i32;
    let right_first = (right.error / right.y_delta - RIGHT_BIAS).floor() as i32;
    left.jump(left_first);
    right.jump(right_first);

    shader.first(left.x, *cur_y, left.step, left.step.saturating_sub(1));
    if right.x >= left.x {
        shader.draw(dst, left.x, *cur_y - 1, right.x);
    }
    *cur_y += 1;
    left.end_row();
    right.end_row();

    while *cur_y < end {
        left.advance();
        // Past the edge: back up one pixel, the smaller of the two steps
        if left.error + left.y_delta <= 0.0 {
            left.error += left.y_delta;
            left.x = left.x.saturating_sub(1);
            shader.step(false);
        } else {
            shader.step(true);
        }
        right.advance();
        if right.error <= 0.0 {
            right.error += right.y_delta;
            right.x = right.x.saturating_sub(1);
        }
        if right.x >= left.x {
            shader.draw(dst, left.x, *cur_y - 1, right.x);
        }
        *cur_y += 1;
        left.end_row();
        right.end_row();
    }
}

/// Fill the triangle v1, v2, v3 into `dst`
///
/// Vertices may be in any order.  The shader is initialized with them as
/// given, then drawn one span per row.  A triangle whose vertices all
/// round to the same row draws nothing.
///
///     use softraster::{Bitmap,BlendMode,LockFlags,LockFormat,Rgba32};
///     use softraster::{TriangleShader,Vertex,triangle_stepper};
///
///     let mut bmp = Bitmap::new(8, 8);
///     let v1 = Vertex::new(0.0, 0.0, Rgba32::white());
///     let v2 = Vertex::new(8.0, 0.0, Rgba32::white());
///     let v3 = Vertex::new(8.0, 8.0, Rgba32::white());
///     let mut shader = TriangleShader::select(None, &BlendMode::copy(), &v1, &v2, &v3);
///     {
///         let mut dst = bmp.lock(LockFormat::Any, LockFlags::empty()).unwrap();
///         triangle_stepper(&mut shader, &mut dst, &v1, &v2, &v3);
///     }
///     bmp.unlock();
///     assert_eq!(bmp.pixel(7, 0), Rgba32::white());
///     assert_eq!(bmp.pixel(0, 7), Rgba32::transparent());
///
pub fn triangle_stepper<S: Shader + ?Sized>(shader: &mut S, dst: &mut LockedRegion<&mut [u8]>,
                                            v1: &Vertex, v2: &Vertex, v3: &Vertex) {
    let mut p = [(v1.x - 0.5, v1.y + 0.5), (v2.x - 0.5, v2.y + 0.5), (v3.x - 0.5, v3.y + 0.5)];
    if p[1].1 < p[0].1 {
        p.swap(0, 1);
    }
    if p[2].1 < p[0].1 {
        p.swap(0, 2);
    }
    if p[2].1 < p[1].1 {
        p.swap(1, 2);
    }
    let [top, mid, bot] = p;

    let mut cur_y = top.1.ceil() as i32;
    let mid_y = mid.1.ceil() as i32;
    let end_y = bot.1.ceil() as i32;
    if cur_y == end_y {
        return;
    }

    let major = (bot.0 - top.0, bot.1 - top.1);
    let minor = (mid.0 - top.0, mid.1 - top.1);
    let major_on_left = major.0 * minor.1 - major.1 * minor.0 < 0.0;

    shader.init(v1, v2, v3);

    let mut left_x = top.0.ceil() as i32;

    if cur_y != mid_y {
        let right_x = top.0.floor() as i32;
        let (l, r) = if major_on_left { (major, minor) } else { (minor, major) };
        let mut left = Edge::new(left_x, cur_y, top, l.0, l.1);
        let mut right = Edge::new(right_x, cur_y, top, r.0, r.1);
        segment(shader, dst, &mut left, &mut right, &mut cur_y, mid_y);
        left_x = left.x;
    }

    if cur_y < end_y && cur_y <= dst.window().y2 {
        let lower = (bot.0 - mid.0, bot.1 - mid.1);
        let (mut left, mut right) = if major_on_left {
            let right_x = mid.0.ceil() as i32;
            (Edge::new(left_x, cur_y, top, major.0, major.1),
             Edge::new(right_x, cur_y, mid, lower.0, lower.1))
        } else {
            let right_x = mid.0.floor() as i32;
            (Edge::new(left_x, cur_y, mid, lower.0, lower.1),
             Edge::new(right_x, cur_y, top, major.0, major.1))
        };
        segment(shader, dst, &mut left, &mut right, &mut cur_y, end_y);
    }
}

/// Pixels kept beyond the window when a line is cut short
const LINE_MARGIN: i32 = 2;

/// Cut the line a to b along axis `major` to the window, plus a margin
///
/// Moved end points lie on the line at whole pixel positions of the
/// major axis, so the walk visits the same pixels inside the window.
/// Returns None if the line misses the window.
fn clip_major(a: (f32, f32), b: (f32, f32), major: usize, window: &Rectangle<i32>)
              -> Option<((f32, f32), (f32, f32))> {
    let (lo, hi) = if major == 0 { (window.x1, window.x2) } else { (window.y1, window.y2) };
    let lo = lo.saturating_sub(LINE_MARGIN);
    let hi = hi.saturating_sub(1).saturating_add(LINE_MARGIN);
    let m = |p: (f32, f32)| if major == 0 { p.0 } else { p.1 };
    let n = |p: (f32, f32)| if major == 0 { p.1 } else { p.0 };
    let pa = (m(a) + 0.5).floor() as i32;
    let pb = (m(b) + 0.5).floor() as i32;
    if pa.max(pb) < lo || pa.min(pb) > hi {
        return None;
    }
    let slope = (n(b) - n(a)) / (m(b) - m(a));
    let cut = |p: (f32, f32), pix: i32| {
        if pix >= lo && pix <= hi {
            return p;
        }
        let mv = pix.max(lo).min(hi) as f32;
        let nv = n(a) + (mv - m(a)) * slope;
        if major == 0 { (mv, nv) } else { (nv, mv) }
    };
    Some((cut(a, pa), cut(b, pb)))
}

/// Major and minor axis walk of a line
struct LineWalk {
    /// x, y
    pos: [i32; 2],
    err: f32,
    /// Axis advanced for every pixel
    major: usize,
    d_major: i32,
    d_minor: i32,
    derr_major: f32,
    derr_minor: f32,
    end: i32,
}

impl LineWalk {
    fn remaining(&self) -> i64 {
        (i64::from(self.end) - i64::from(self.pos[self.major])) * i64::from(self.d_major)
    }
    /// Take the minor step when due; returns true when it was not
    fn pre<F: Fn(f32) -> bool>(&mut self, due: &F) -> bool {
        if due(self.err) {
            let n = 1 - self.major;
            self.pos[n] = self.pos[n].saturating_add(self.d_minor);
            self.err += self.derr_minor;
            false
        } else {
            true
        }
    }
    fn post(&mut self) {
        let m = self.major;
        self.pos[m] = self.pos[m].saturating_add(self.d_major);
        self.err += self.derr_major;
    }
}

fn walk_line<S, F>(shader: &mut S, dst: &mut LockedRegion<&mut [u8]>, w: &mut LineWalk, due: F,
                   a: &Vertex, b: &Vertex)
    where S: LineShader + ?Sized, F: Fn(f32) -> bool
{
    let (x1, y1, x2, y2) = (a.x, a.y, b.x, b.y);
    let mut started = false;
    if w.remaining() > 0 {
        w.pre(&due);
        let [x, y] = w.pos;
        shader.first_on_line(x, y, a, b);
        if (x2 - x1) * (x as f32 - x1) + (y2 - y1) * (y as f32 - y1) >= 0.0 {
            shader.draw(dst, x, y, x);
        }
        w.post();
        started = true;
    }
    while w.remaining() > 0 {
        let minor = w.pre(&due);
        shader.step(minor);
        let [x, y] = w.pos;
        shader.draw(dst, x, y, x);
        w.post();
    }
    if w.remaining() >= 0 {
        let minor = w.pre(&due);
        let [x, y] = w.pos;
        if started {
            shader.step(minor);
        } else {
            shader.first_on_line(x, y, a, b);
        }
        if (x1 - x2) * (x as f32 - x2) + (y1 - y2) * (y as f32 - y2) > 0.0 {
            shader.draw(dst, x, y, x);
        }
        w.post();
    }
}

/// Draw the line v1 to v2 into `dst`
///
/// One pixel per step along the longer axis.  The end points are
/// included only when the line actually reaches into their pixels, so
/// joined segments do not overlap.
///
///     use softraster::{Bitmap,BlendMode,LockFlags,LockFormat,Rgba32};
///     use softraster::{TriangleShader,Vertex,line_stepper};
///
///     let mut bmp = Bitmap::new(8, 8);
///     let v1 = Vertex::new(0.5, 2.5, Rgba32::white());
///     let v2 = Vertex::new(6.5, 2.5, Rgba32::white());
///     let mut shader = TriangleShader::select(None, &BlendMode::copy(), &v1, &v2, &v2);
///     {
///         let mut dst = bmp.lock(LockFormat::Any, LockFlags::empty()).unwrap();
///         line_stepper(&mut shader, &mut dst, &v1, &v2);
///     }
///     bmp.unlock();
///     assert_eq!(bmp.pixel(0, 2), Rgba32::white());
///     assert_eq!(bmp.pixel(5, 2), Rgba32::white());
///     assert_eq!(bmp.pixel(6, 2), Rgba32::transparent());
///
pub fn line_stepper<S: LineShader + ?Sized>(shader: &mut S, dst: &mut LockedRegion<&mut [u8]>,
                                            v1: &Vertex, v2: &Vertex) {
    let (mut a, mut b) = if v2.y < v1.y { (*v2, *v1) } else { (*v1, *v2) };
    a.x -= 0.5001;
    a.y -= 0.5001;
    b.x -= 0.5001;
    b.y -= 0.5001;

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let major = if (dx > 0.0 && dx > dy) || -dx > dy { 0 } else { 1 };
    let ((x1, y1), (x2, y2)) = match clip_major((a.x, a.y), (b.x, b.y), major, &dst.window()) {
        Some(ends) => ends,
        None => return,
    };
    let end_x = (x2 + 0.5).floor() as i32;
    let end_y = (y2 + 0.5).floor() as i32;

    if dx > 0.0 {
        if dx > dy {
            let x = (x1 + 0.5).floor() as i32;
            let y = y1.floor() as i32;
            let err = (y1 - y as f32) * dx - (x1 - x as f32) * dy;
            let mut w = LineWalk { pos: [x, y], err, major: 0, d_major: 1, d_minor: 1,
                                   derr_major: dy, derr_minor: -dx, end: end_x };
            walk_line(shader, dst, &mut w, |e| e > 0.5 * dx, &a, &b);
        } else {
            let x = x1.floor() as i32;
            let y = (y1 + 0.5).floor() as i32;
            let err = (x1 - x as f32) * dy - (y1 - y as f32) * dx;
            let mut w = LineWalk { pos: [x, y], err, major: 1, d_major: 1, d_minor: 1,
                                   derr_major: dx, derr_minor: -dy, end: end_y };
            walk_line(shader, dst, &mut w, |e| e > 0.5 * dy, &a, &b);
        }
    } else if -dx > dy {
        let x = (x1 + 0.5).floor() as i32;
        let y = y1.floor() as i32;
        let err = (y1 - y as f32) * dx - (x1 - x as f32) * dy;
        let mut w = LineWalk { pos: [x, y], err, major: 0, d_major: -1, d_minor: 1,
                               derr_major: -dy, derr_minor: -dx, end: end_x };
        walk_line(shader, dst, &mut w, |e| e <= 0.5 * dx, &a, &b);
    } else {
        let mut x = x1.floor() as i32;
        let y = (y1 + 0.5).floor() as i32;
        let mut err = (x1 - x as f32) * dy - (y1 - y as f32) * dx;
        // Only correction against the direction of travel
        if err > 0.5 * dy {
            x = x.saturating_add(1);
            err -= dy;
        }
        let mut w = LineWalk { pos: [x, y], err, major: 1, d_major: 1, d_minor: -1,
                               derr_major: dx, derr_minor: dy, end: end_y };
        walk_line(shader, dst, &mut w, |e| e <= -0.5 * dy, &a, &b);
    }
}
