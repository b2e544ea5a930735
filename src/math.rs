//! Interpolation helpers shared by the steppers

/// Wrap a texture coordinate into [0, max_var)
///
///     use softraster::fix_var;
///     assert_eq!(fix_var(3.5, 4), 3);
///     assert_eq!(fix_var(4.0, 4), 0);
///     assert_eq!(fix_var(-0.5, 4), 3);
///
pub fn fix_var(var: f32, max_var: i32) -> i32 {
    let ivar = var.floor() as i32;
    let ret = ivar % max_var;
    if ret >= 0 {
        ret
    } else {
        ret + max_var
    }
}

/// Clamp a texture coordinate into [0, max_var)
pub fn clamp_var(var: f32, max_var: i32) -> i32 {
    (var.floor() as i32).max(0).min(max_var - 1)
}

/// Reflect a texture coordinate at each edge of [0, max_var)
pub fn mirror_var(var: f32, max_var: i32) -> i32 {
    let t = fix_var(var, 2 * max_var);
    if t >= max_var {
        2 * max_var - 1 - t
    } else {
        t
    }
}

/// Plane equation of an interpolated quantity
///
/// ```text
/// value = dx * x + dy * y + c
/// ```
///
/// with (x,y) measured from the first vertex of the triangle
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Plane {
    /// Change per pixel in x
    pub dx: f32,
    /// Change per pixel in y
    pub dy: f32,
    /// Value at the first vertex
    pub c: f32,
}

impl Plane {
    /// Value at (x,y), relative to the first vertex
    pub fn eval(&self, x: f32, y: f32) -> f32 {
        self.dx * x + self.dy * y + self.c
    }
}

/// Determinants of a triangle with its first vertex at the origin
///
/// Computed once per triangle; each interpolated quantity is then solved
/// with Cramer's rule by [plane](#method.plane)
#[derive(Debug,Default,Copy,Clone)]
pub struct PlaneBasis {
    minor1: f32,
    minor2: f32,
    minor3: f32,
    y32: f32,
    y31: f32,
    y21: f32,
    x23: f32,
    x13: f32,
    x12: f32,
    det: f32,
}

impl PlaneBasis {
    /// Build from the vertex positions
    pub fn new(p1: (f32, f32), p2: (f32, f32), p3: (f32, f32)) -> Self {
        let (x1, y1) = (0.0, 0.0);
        let (x2, y2) = (p2.0 - p1.0, p2.1 - p1.1);
        let (x3, y3) = (p3.0 - p1.0, p3.1 - p1.1);

        let minor1 = x1 * y2 - x2 * y1;
        let minor2 = x1 * y3 - x3 * y1;
        let minor3 = x2 * y3 - x3 * y2;

        Self {
            minor1, minor2, minor3,
            y32: y3 - y2,
            y31: y3 - y1,
            y21: y2 - y1,
            x23: x2 - x3,
            x13: x1 - x3,
            x12: x1 - x2,
            det: minor3 - minor1 + minor2,
        }
    }
    /// Twice the signed area of the triangle
    pub fn det(&self) -> f32 {
        self.det
    }
    /// Return if the triangle has zero area
    pub fn is_degenerate(&self) -> bool {
        self.det == 0.0
    }
    /// Solve for the plane through values `u1`, `u2`, `u3` at the vertices
    ///
    /// A degenerate triangle yields an all zero plane
    pub fn plane(&self, u1: f32, u2: f32, u3: f32) -> Plane {
        if self.is_degenerate() {
            return Plane::default();
        }
        let det_u = u1 * self.minor3 - u2 * self.minor2 + u3 * self.minor1;
        let det_x = u1 * self.y32 - u2 * self.y31 + u3 * self.y21;
        let det_y = u1 * self.x23 - u2 * self.x13 + u3 * self.x12;
        Plane {
            dx: -det_x / self.det,
            dy: -det_y / self.det,
            c: det_u / self.det,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn fix_var_wraps_negative() {
        assert_eq!(fix_var(-1.0, 4), 3);
        assert_eq!(fix_var(-4.0, 4), 0);
        assert_eq!(fix_var(-4.5, 4), 3);
        assert_eq!(fix_var(9.9, 4), 1);
    }
    #[test]
    fn clamp_and_mirror() {
        assert_eq!(clamp_var(-3.0, 4), 0);
        assert_eq!(clamp_var(7.0, 4), 3);
        assert_eq!(mirror_var(4.0, 4), 3);
        assert_eq!(mirror_var(7.5, 4), 0);
        assert_eq!(mirror_var(8.0, 4), 0);
        assert_eq!(mirror_var(-1.0, 4), 0);
    }
    #[test]
    fn plane_reproduces_vertex_values() {
        let b = PlaneBasis::new((2.0, 1.0), (10.0, 3.0), (4.0, 9.0));
        let p = b.plane(0.25, 1.0, -2.0);
        let close = |a: f32, b: f32| (a - b).abs() < 1e-5;
        assert!(close(p.eval(0.0, 0.0), 0.25));
        assert!(close(p.eval(8.0, 2.0), 1.0));
        assert!(close(p.eval(2.0, 8.0), -2.0));
    }
    #[test]
    fn degenerate_plane_is_zero() {
        let b = PlaneBasis::new((0.0, 0.0), (1.0, 1.0), (2.0, 2.0));
        assert!(b.is_degenerate());
        assert_eq!(b.plane(1.0, 2.0, 3.0), Plane::default());
    }
}
