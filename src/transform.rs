//! Vertex transformations
//!
//! Every operation appends to the transform: `t.translate(..)` followed by
//! `t.rotate(..)` first moves a vertex, then rotates it about the origin.

use crate::vertex::Vertex;

/// 2D affine transformation, stored as the top two rows of a 3x3 matrix
///
/// ```text
/// x' = m[0][0] * x + m[0][1] * y + m[0][2]
/// y' = m[1][0] * x + m[1][1] * y + m[1][2]
/// ```
///
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Transform {
    pub m: [[f32; 3]; 2],
}

const IDENTITY: [[f32; 3]; 2] = [[1.0, 0.0, 0.0],
                                 [0.0, 1.0, 0.0]];

/// Identity
impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Identity transform
    pub fn new() -> Self {
        Self { m: IDENTITY }
    }
    /// Translation by (dx,dy)
    pub fn new_translate(dx: f32, dy: f32) -> Self {
        Self { m: [[1.0, 0.0, dx],
                   [0.0, 1.0, dy]] }
    }
    /// Scaling about the origin
    pub fn new_scale(sx: f32, sy: f32) -> Self {
        Self { m: [[sx, 0.0, 0.0],
                   [0.0, sy, 0.0]] }
    }
    /// Rotation about the origin by `theta` radians, clockwise on screen
    pub fn new_rotate(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self { m: [[c, -s, 0.0],
                   [s, c, 0.0]] }
    }
    /// Scale, then rotate, then move to (x,y)
    ///
    /// Places an object drawn around the origin
    pub fn build(x: f32, y: f32, sx: f32, sy: f32, theta: f32) -> Self {
        let mut t = Self::new_scale(sx, sy);
        t.rotate(theta);
        t.translate(x, y);
        t
    }
    /// Return `self` followed by `next`
    pub fn multiply(&self, next: &Transform) -> Self {
        let (a, b) = (&self.m, &next.m);
        let mut m = [[0.0; 3]; 2];
        for (row, out) in m.iter_mut().enumerate() {
            let r = &b[row];
            out[0] = r[0] * a[0][0] + r[1] * a[1][0];
            out[1] = r[0] * a[0][1] + r[1] * a[1][1];
            out[2] = r[0] * a[0][2] + r[1] * a[1][2] + r[2];
        }
        Self { m }
    }
    /// Follow with a translation
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.m[0][2] += dx;
        self.m[1][2] += dy;
    }
    /// Follow with a scaling
    pub fn scale(&mut self, sx: f32, sy: f32) {
        *self = self.multiply(&Self::new_scale(sx, sy));
    }
    /// Follow with a rotation
    pub fn rotate(&mut self, theta: f32) {
        *self = self.multiply(&Self::new_rotate(theta));
    }
    /// Replace with the inverse
    ///
    /// A singular transform is left unchanged and false is returned
    pub fn invert(&mut self) -> bool {
        let [[a, b, tx], [c, d, ty]] = self.m;
        let det = a * d - b * c;
        if det == 0.0 {
            return false;
        }
        let (a, b, c, d) = (d / det, -b / det, -c / det, a / det);
        self.m = [[a, b, -(a * tx + b * ty)],
                  [c, d, -(c * tx + d * ty)]];
        true
    }
    pub fn is_identity(&self) -> bool {
        self.m == IDENTITY
    }
    /// Map the point (x,y)
    pub fn transform(&self, x: f32, y: f32) -> (f32, f32) {
        let [r0, r1] = &self.m;
        (r0[0] * x + r0[1] * y + r0[2],
         r1[0] * x + r1[1] * y + r1[2])
    }
    /// Map the position of `v`; color and texture coordinates stay
    pub fn transform_vertex(&self, v: &Vertex) -> Vertex {
        let (x, y) = self.transform(v.x, v.y);
        Vertex { x, y, ..*v }
    }
    /// Map the positions of `vertices` in place
    pub fn transform_vertices(&self, vertices: &mut [Vertex]) {
        if self.is_identity() {
            return;
        }
        for v in vertices.iter_mut() {
            *v = self.transform_vertex(v);
        }
    }
}
