//! Colors

use std::ops::{Add, AddAssign, Mul, Sub};

use crate::Color;

/// Convert an f32 [0,1] component to a u8 [0,255] component
///
/// Values outside [0,1] are clamped before rounding
pub fn cu8(v: f32) -> u8 {
    (v.max(0.0).min(1.0) * 255.0).round() as u8
}

fn color_u8_to_f32(x: u8) -> f32 {
    f32::from(x) / 255.0
}

/// Color as Red, Green, Blue, and Alpha with f32 components
///
/// Components are nominally in [0,1] but are not clamped until written
/// into a pixel, so colors may be used as interpolants
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Rgba32 {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Rgba32 {
    /// Create new color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    /// White Color (1,1,1,1)
    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
    /// Black Color (0,0,0,1)
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
    /// All components zero, returned for pixels that cannot be read
    pub fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
    /// Create from any type implementing [Color]
    ///
    /// [Color]: ../trait.Color.html
    pub fn from_trait<C: Color>(c: C) -> Self {
        Self::new(c.red(), c.green(), c.blue(), c.alpha())
    }
    /// Return if all components are exactly 1.0
    pub fn is_white(&self) -> bool {
        self.r == 1.0 && self.g == 1.0 && self.b == 1.0 && self.a == 1.0
    }
    /// Clamp all components into [0,1]
    pub fn clamp(&self) -> Self {
        let c = |v: f32| v.max(0.0).min(1.0);
        Self::new(c(self.r), c(self.g), c(self.b), c(self.a))
    }
}

impl Color for Rgba32 {
    fn   red(&self) -> f32 { self.r }
    fn green(&self) -> f32 { self.g }
    fn  blue(&self) -> f32 { self.b }
    fn alpha(&self) -> f32 { self.a }
}

impl Add for Rgba32 {
    type Output = Rgba32;
    fn add(self, o: Rgba32) -> Rgba32 {
        Rgba32::new(self.r + o.r, self.g + o.g, self.b + o.b, self.a + o.a)
    }
}
impl Sub for Rgba32 {
    type Output = Rgba32;
    fn sub(self, o: Rgba32) -> Rgba32 {
        Rgba32::new(self.r - o.r, self.g - o.g, self.b - o.b, self.a - o.a)
    }
}
impl AddAssign for Rgba32 {
    fn add_assign(&mut self, o: Rgba32) {
        self.r += o.r;
        self.g += o.g;
        self.b += o.b;
        self.a += o.a;
    }
}
/// Scale all components
impl Mul<f32> for Rgba32 {
    type Output = Rgba32;
    fn mul(self, s: f32) -> Rgba32 {
        Rgba32::new(self.r * s, self.g * s, self.b * s, self.a * s)
    }
}
/// Component-wise product, used to tint texels by a vertex color
impl Mul for Rgba32 {
    type Output = Rgba32;
    fn mul(self, o: Rgba32) -> Rgba32 {
        Rgba32::new(self.r * o.r, self.g * o.g, self.b * o.b, self.a * o.a)
    }
}

/// Color as Red, Green, Blue, and Alpha
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct Rgba8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba8 {
    /// White Color (255,255,255,255)
    pub fn white() -> Self {
        Self::new(255,255,255,255)
    }
    /// Black Color (0,0,0,255)
    pub fn black() -> Self {
        Self::new(0,0,0,255)
    }
    /// Create new color
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba8 { r, g, b, a }
    }
    /// Create from any type implementing [Color]
    ///
    /// [Color]: ../trait.Color.html
    pub fn from_trait<C: Color>(c: C) -> Self {
        Self::new(c.red8(), c.green8(), c.blue8(), c.alpha8())
    }
}

impl Color for Rgba8 {
    fn   red(&self) -> f32 { color_u8_to_f32(self.r) }
    fn green(&self) -> f32 { color_u8_to_f32(self.g) }
    fn  blue(&self) -> f32 { color_u8_to_f32(self.b) }
    fn alpha(&self) -> f32 { color_u8_to_f32(self.a) }
    fn alpha8(&self) -> u8 { self.a }
    fn red8(&self) -> u8 { self.r }
    fn green8(&self) -> u8 { self.g }
    fn blue8(&self) -> u8 { self.b }
}

impl From<Rgba8> for Rgba32 {
    fn from(c: Rgba8) -> Rgba32 {
        Rgba32::from_trait(c)
    }
}
impl From<Rgba32> for Rgba8 {
    fn from(c: Rgba32) -> Rgba8 {
        Rgba8::from_trait(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn rgba8_to_float_and_back() {
        let c = Rgba8::new(0, 51, 128, 255);
        let f = Rgba32::from(c);
        assert_eq!(f.r, 0.0);
        assert_eq!(f.g, 0.2);
        assert_eq!(f.a, 1.0);
        assert_eq!(Rgba8::from(f), c);
    }
    #[test]
    fn cu8_clamps_out_of_range() {
        assert_eq!(cu8(-0.5), 0);
        assert_eq!(cu8(1.5), 255);
        assert_eq!(cu8(0.5), 128);
    }
    #[test]
    fn arithmetic() {
        let a = Rgba32::new(0.5, 0.5, 0.5, 1.0);
        let b = Rgba32::new(0.25, 0.0, 1.0, 0.5);
        assert_eq!(a + b, Rgba32::new(0.75, 0.5, 1.5, 1.5));
        assert_eq!(a * b, Rgba32::new(0.125, 0.0, 0.5, 0.5));
        assert_eq!(b * 2.0, Rgba32::new(0.5, 0.0, 2.0, 1.0));
        let mut c = a;
        c += b;
        assert_eq!(c, a + b);
        assert!(Rgba32::white().is_white());
        assert!(!a.is_white());
    }
}
