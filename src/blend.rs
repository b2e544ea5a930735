//! Blending of source and destination colors
//!
//! Each color group (rgb and alpha) is combined as
//!
//! ```text
//! result = op(src * src_factor, dst * dst_factor)
//! ```
//!

use log::warn;

use crate::color::Rgba32;

/// Combination rule applied after the factors
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum BlendOp {
    /// `min(1, s + d)`
    Add,
    /// `max(0, s - d)`
    SrcMinusDest,
    /// `max(0, d - s)`
    DestMinusSrc,
}

impl BlendOp {
    /// Decode from the numeric value used by the C api
    pub fn from_raw(v: i32) -> Option<Self> {
        match v {
            0 => Some(BlendOp::Add),
            1 => Some(BlendOp::SrcMinusDest),
            2 => Some(BlendOp::DestMinusSrc),
            _ => None,
        }
    }
    fn apply(self, s: f32, d: f32) -> f32 {
        match self {
            BlendOp::Add          => (s + d).min(1.0),
            BlendOp::SrcMinusDest => (s - d).max(0.0),
            BlendOp::DestMinusSrc => (d - s).max(0.0),
        }
    }
}

/// Multiplier applied to the source or destination
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum BlendFactor {
    Zero,
    One,
    Alpha,
    InverseAlpha,
    SrcColor,
    DestColor,
    InverseSrcColor,
    InverseDestColor,
}

impl BlendFactor {
    /// Decode from the numeric value used by the C api
    pub fn from_raw(v: i32) -> Option<Self> {
        use BlendFactor::*;
        let f = match v {
            0 => Zero,
            1 => One,
            2 => Alpha,
            3 => InverseAlpha,
            4 => SrcColor,
            5 => DestColor,
            6 => InverseSrcColor,
            7 => InverseDestColor,
            _ => return None,
        };
        Some(f)
    }
    /// Factor uses only alpha values, identical on every channel
    pub fn is_alpha_only(self) -> bool {
        use BlendFactor::*;
        match self {
            Zero | One | Alpha | InverseAlpha => true,
            _ => false,
        }
    }
}

/// Factor as a single scalar, from the source alpha and destination alpha
fn alpha_factor(f: BlendFactor, src_a: f32, dst_a: f32) -> f32 {
    use BlendFactor::*;
    match f {
        Zero             => 0.0,
        One              => 1.0,
        Alpha            => src_a,
        InverseAlpha     => 1.0 - src_a,
        SrcColor         => src_a,
        DestColor        => dst_a,
        InverseSrcColor  => 1.0 - src_a,
        InverseDestColor => 1.0 - dst_a,
    }
}

/// Factor per channel; color based factors differ between channels
fn color_factor(f: BlendFactor, src: &Rgba32, dst: &Rgba32) -> Rgba32 {
    use BlendFactor::*;
    let one = Rgba32::white();
    match f {
        SrcColor         => *src,
        DestColor        => *dst,
        InverseSrcColor  => Rgba32::new(1.0 - src.r, 1.0 - src.g, 1.0 - src.b, 1.0 - src.a),
        InverseDestColor => Rgba32::new(1.0 - dst.r, 1.0 - dst.g, 1.0 - dst.b, 1.0 - dst.a),
        _ => one * alpha_factor(f, src.a, dst.a),
    }
}

/// Blend mode: operations and factors for color and alpha
///
///     use softraster::{BlendMode,BlendOp,BlendFactor,Rgba32};
///
///     let mode = BlendMode::alpha();
///     let src = Rgba32::new(1.0, 0.0, 0.0, 0.5);
///     let dst = Rgba32::new(0.0, 0.0, 1.0, 1.0);
///     let out = mode.blend(src, dst);
///     assert_eq!(out, Rgba32::new(0.5, 0.0, 0.5, 0.75));
///
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct BlendMode {
    pub op: BlendOp,
    pub src: BlendFactor,
    pub dst: BlendFactor,
    pub alpha_op: BlendOp,
    pub alpha_src: BlendFactor,
    pub alpha_dst: BlendFactor,
}

/// Premultiplied alpha: Add, One, InverseAlpha
impl Default for BlendMode {
    fn default() -> Self {
        Self::new(BlendOp::Add, BlendFactor::One, BlendFactor::InverseAlpha)
    }
}

impl BlendMode {
    /// Same operation and factors for color and alpha
    pub fn new(op: BlendOp, src: BlendFactor, dst: BlendFactor) -> Self {
        Self::separate(op, src, dst, op, src, dst)
    }
    /// Separate operation and factors for color and alpha
    pub fn separate(op: BlendOp, src: BlendFactor, dst: BlendFactor,
                    alpha_op: BlendOp, alpha_src: BlendFactor, alpha_dst: BlendFactor) -> Self {
        Self { op, src, dst, alpha_op, alpha_src, alpha_dst }
    }
    /// Source replaces destination
    pub fn copy() -> Self {
        Self::new(BlendOp::Add, BlendFactor::One, BlendFactor::Zero)
    }
    /// Non-premultiplied source over destination
    pub fn alpha() -> Self {
        Self::new(BlendOp::Add, BlendFactor::Alpha, BlendFactor::InverseAlpha)
    }
    /// Decode the six values used by the C api
    ///
    /// Order is op, src, dst, alpha_op, alpha_src, alpha_dst.  An unknown
    /// value is a programming error; in release builds the color or alpha
    /// group containing it blends to zero.
    pub fn from_raw(raw: [i32; 6]) -> Self {
        let group = |op: i32, src: i32, dst: i32| {
            match (BlendOp::from_raw(op), BlendFactor::from_raw(src), BlendFactor::from_raw(dst)) {
                (Some(op), Some(src), Some(dst)) => (op, src, dst),
                _ => {
                    debug_assert!(false, "unknown blend value in {} {} {}", op, src, dst);
                    warn!("unknown blend value in {} {} {}", op, src, dst);
                    (BlendOp::Add, BlendFactor::Zero, BlendFactor::Zero)
                }
            }
        };
        let (op, src, dst) = group(raw[0], raw[1], raw[2]);
        let (alpha_op, alpha_src, alpha_dst) = group(raw[3], raw[4], raw[5]);
        Self { op, src, dst, alpha_op, alpha_src, alpha_dst }
    }
    /// Destination does not contribute to the result
    pub fn dest_is_zero(&self) -> bool {
        self.dst == BlendFactor::Zero && self.alpha_dst == BlendFactor::Zero &&
            self.op != BlendOp::DestMinusSrc && self.alpha_op != BlendOp::DestMinusSrc
    }
    /// Source is used unscaled
    pub fn src_not_modified(&self) -> bool {
        self.src == BlendFactor::One && self.alpha_src == BlendFactor::One
    }
    /// Blending reduces to writing the source color
    pub fn is_copy(&self) -> bool {
        self.dest_is_zero() && self.src_not_modified()
    }
    /// All factors depend only on alpha values
    pub fn is_alpha_only(&self) -> bool {
        self.src.is_alpha_only() && self.dst.is_alpha_only() &&
            self.alpha_src.is_alpha_only() && self.alpha_dst.is_alpha_only()
    }
    /// Blend `src` onto `dst`
    pub fn blend(&self, src: Rgba32, dst: Rgba32) -> Rgba32 {
        if self.is_alpha_only() {
            self.blend_alpha_only(src, dst)
        } else {
            self.blend_general(src, dst)
        }
    }
    /// Blend using scalar factors
    ///
    /// Only exact when every factor is Zero, One, Alpha or InverseAlpha
    pub fn blend_alpha_only(&self, src: Rgba32, dst: Rgba32) -> Rgba32 {
        let sf = alpha_factor(self.src, src.a, dst.a);
        let df = alpha_factor(self.dst, src.a, dst.a);
        let asf = alpha_factor(self.alpha_src, src.a, dst.a);
        let adf = alpha_factor(self.alpha_dst, src.a, dst.a);
        Rgba32 {
            r: self.op.apply(src.r * sf, dst.r * df),
            g: self.op.apply(src.g * sf, dst.g * df),
            b: self.op.apply(src.b * sf, dst.b * df),
            a: self.alpha_op.apply(src.a * asf, dst.a * adf),
        }
    }
    /// Blend using per channel factors
    pub fn blend_general(&self, src: Rgba32, dst: Rgba32) -> Rgba32 {
        let sf = color_factor(self.src, &src, &dst);
        let df = color_factor(self.dst, &src, &dst);
        let asf = alpha_factor(self.alpha_src, src.a, dst.a);
        let adf = alpha_factor(self.alpha_dst, src.a, dst.a);
        Rgba32 {
            r: self.op.apply(src.r * sf.r, dst.r * df.r),
            g: self.op.apply(src.g * sf.g, dst.g * df.g),
            b: self.op.apply(src.b * sf.b, dst.b * df.b),
            a: self.alpha_op.apply(src.a * asf, dst.a * adf),
        }
    }
}
