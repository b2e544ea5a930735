//! Vertices and vertex declarations

use byteorder::{ByteOrder, LittleEndian};

use crate::color::Rgba32;
use crate::error::Error;

/// Vertex as consumed by the rasterizer
///
/// Texture coordinates are in pixels of the texture
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub u: f32,
    pub v: f32,
    pub color: Rgba32,
}

impl Vertex {
    /// Untextured vertex at (x,y)
    pub fn new(x: f32, y: f32, color: Rgba32) -> Self {
        Self { x, y, z: 0.0, u: 0.0, v: 0.0, color }
    }
    /// Textured vertex at (x,y) sampling texel (u,v)
    pub fn with_uv(x: f32, y: f32, u: f32, v: f32, color: Rgba32) -> Self {
        Self { x, y, z: 0.0, u, v, color }
    }
    /// Bytes used by [write](#method.write)
    pub const SIZE: usize = 36;
    /// Pack into the layout of `VertexDecl::default()`
    pub fn write(&self, out: &mut [u8]) {
        let c = &self.color;
        let v = [self.x, self.y, self.z, self.u, self.v, c.r, c.g, c.b, c.a];
        LittleEndian::write_f32_into(&v, &mut out[..Self::SIZE]);
    }
}

/// Meaning of a vertex element
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum PrimAttr {
    Position,
    Color,
    /// Texture coordinates in [0,1], scaled by the texture size
    TexCoord,
    /// Texture coordinates in pixels
    TexCoordPixel,
}

/// Storage of a vertex element
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum PrimStorage {
    Float2,
    Float3,
    Float4,
    Short2,
}

impl PrimStorage {
    /// Size in bytes
    pub fn size(self) -> usize {
        match self {
            PrimStorage::Float2 => 8,
            PrimStorage::Float3 => 12,
            PrimStorage::Float4 => 16,
            PrimStorage::Short2 => 4,
        }
    }
    fn read(self, p: &[u8]) -> [f32; 4] {
        let mut v = [0f32; 4];
        match self {
            PrimStorage::Float2 => LittleEndian::read_f32_into(&p[..8], &mut v[..2]),
            PrimStorage::Float3 => LittleEndian::read_f32_into(&p[..12], &mut v[..3]),
            PrimStorage::Float4 => LittleEndian::read_f32_into(&p[..16], &mut v),
            PrimStorage::Short2 => {
                v[0] = f32::from(LittleEndian::read_i16(&p[0..]));
                v[1] = f32::from(LittleEndian::read_i16(&p[2..]));
            }
        }
        v
    }
}

/// One element of a vertex declaration
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct VertexElement {
    pub attribute: PrimAttr,
    pub storage: PrimStorage,
    /// Byte offset within the vertex
    pub offset: usize,
}

impl VertexElement {
    pub fn new(attribute: PrimAttr, storage: PrimStorage, offset: usize) -> Self {
        Self { attribute, storage, offset }
    }
}

/// Layout of custom vertex data
///
///     use softraster::{VertexDecl,VertexElement,PrimAttr,PrimStorage};
///
///     let decl = VertexDecl::new(&[
///         VertexElement::new(PrimAttr::Position, PrimStorage::Short2, 0),
///         VertexElement::new(PrimAttr::TexCoord, PrimStorage::Float2, 4),
///     ], 12).unwrap();
///     assert_eq!(decl.stride(), 12);
///
///     let bad = VertexDecl::new(&[
///         VertexElement::new(PrimAttr::Position, PrimStorage::Float4, 0),
///     ], 16);
///     assert!(bad.is_err());
///
#[derive(Debug,Clone,PartialEq)]
pub struct VertexDecl {
    position: Option<VertexElement>,
    color: Option<VertexElement>,
    texcoord: Option<VertexElement>,
    texcoord_pixel: Option<VertexElement>,
    stride: usize,
}

/// Layout of `Vertex::write`
impl Default for VertexDecl {
    fn default() -> Self {
        Self {
            position: Some(VertexElement::new(PrimAttr::Position, PrimStorage::Float3, 0)),
            color: Some(VertexElement::new(PrimAttr::Color, PrimStorage::Float4, 20)),
            texcoord: None,
            texcoord_pixel: Some(VertexElement::new(PrimAttr::TexCoordPixel, PrimStorage::Float2, 12)),
            stride: Vertex::SIZE,
        }
    }
}

impl VertexDecl {
    /// Create a declaration; a later element replaces an earlier one with
    /// the same attribute
    pub fn new(elements: &[VertexElement], stride: usize) -> Result<Self, Error> {
        let mut decl = Self { position: None, color: None, texcoord: None, texcoord_pixel: None, stride };
        for e in elements {
            if e.offset.checked_add(e.storage.size()).map_or(true, |end| end > stride) {
                return Err(Error::InvalidDecl("element extends past stride"));
            }
            let slot = match e.attribute {
                PrimAttr::Position => &mut decl.position,
                PrimAttr::Color => &mut decl.color,
                PrimAttr::TexCoord => &mut decl.texcoord,
                PrimAttr::TexCoordPixel => &mut decl.texcoord_pixel,
            };
            *slot = Some(*e);
        }
        if let Some(e) = decl.position {
            match e.storage {
                PrimStorage::Float2 | PrimStorage::Float3 | PrimStorage::Short2 => {}
                _ => return Err(Error::InvalidDecl("invalid storage for position")),
            }
        }
        if let Some(e) = decl.texcoord.or(decl.texcoord_pixel) {
            match e.storage {
                PrimStorage::Float2 | PrimStorage::Short2 => {}
                _ => return Err(Error::InvalidDecl("invalid storage for texture coordinates")),
            }
        }
        if let Some(e) = decl.color {
            if e.storage != PrimStorage::Float4 {
                return Err(Error::InvalidDecl("invalid storage for color"));
            }
        }
        Ok(decl)
    }
    /// Bytes per vertex
    pub fn stride(&self) -> usize {
        self.stride
    }
    /// Decode the vertex at the start of `p`
    ///
    /// Normalized texture coordinates are scaled by `texture_size`.  A
    /// missing color is white, other missing elements are zero.
    pub fn decode(&self, p: &[u8], texture_size: Option<(i32, i32)>) -> Vertex {
        let mut v = Vertex::new(0.0, 0.0, Rgba32::white());
        if let Some(e) = self.position {
            let d = e.storage.read(&p[e.offset..]);
            v.x = d[0];
            v.y = d[1];
            v.z = d[2];
        }
        if let Some(e) = self.texcoord {
            let d = e.storage.read(&p[e.offset..]);
            let (w, h) = texture_size.unwrap_or((0, 0));
            v.u = d[0] * w as f32;
            v.v = d[1] * h as f32;
        } else if let Some(e) = self.texcoord_pixel {
            let d = e.storage.read(&p[e.offset..]);
            v.u = d[0];
            v.v = d[1];
        }
        if let Some(e) = self.color {
            let d = e.storage.read(&p[e.offset..]);
            v.color = Rgba32::new(d[0], d[1], d[2], d[3]);
        }
        v
    }
}

/// Indexable list of vertices
pub trait VertexSource {
    /// Number of vertices
    fn len(&self) -> usize;
    /// Return if there are no vertices
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Vertex `i` with texture coordinates in pixels of a texture of
    /// `texture_size`
    fn vertex(&self, i: usize, texture_size: Option<(i32, i32)>) -> Vertex;
}

impl VertexSource for [Vertex] {
    fn len(&self) -> usize {
        <[Vertex]>::len(self)
    }
    fn vertex(&self, i: usize, _texture_size: Option<(i32, i32)>) -> Vertex {
        self[i]
    }
}

/// Raw vertex data described by a declaration
#[derive(Debug,Copy,Clone)]
pub struct DeclaredVertices<'a> {
    data: &'a [u8],
    decl: &'a VertexDecl,
}

impl<'a> DeclaredVertices<'a> {
    pub fn new(data: &'a [u8], decl: &'a VertexDecl) -> Self {
        Self { data, decl }
    }
}

impl<'a> VertexSource for DeclaredVertices<'a> {
    fn len(&self) -> usize {
        if self.decl.stride == 0 {
            return 0;
        }
        self.data.len() / self.decl.stride
    }
    fn vertex(&self, i: usize, texture_size: Option<(i32, i32)>) -> Vertex {
        self.decl.decode(&self.data[i * self.decl.stride ..], texture_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_round_trip() {
        let v = Vertex::with_uv(1.5, -2.0, 3.0, 4.0, Rgba32::new(0.1, 0.2, 0.3, 0.4));
        let mut buf = [0u8; Vertex::SIZE];
        v.write(&mut buf);
        assert_eq!(VertexDecl::default().decode(&buf, None), v);
    }
    #[test]
    fn short_position_and_normalized_uv() {
        let decl = VertexDecl::new(&[
            VertexElement::new(PrimAttr::Position, PrimStorage::Short2, 0),
            VertexElement::new(PrimAttr::TexCoord, PrimStorage::Float2, 4),
        ], 12).unwrap();
        let mut buf = [0u8; 24];
        LittleEndian::write_i16(&mut buf[12..], -7);
        LittleEndian::write_i16(&mut buf[14..], 9);
        LittleEndian::write_f32(&mut buf[16..], 0.5);
        LittleEndian::write_f32(&mut buf[20..], 0.25);
        let src = DeclaredVertices::new(&buf, &decl);
        assert_eq!(src.len(), 2);
        let v = src.vertex(1, Some((64, 32)));
        assert_eq!((v.x, v.y), (-7.0, 9.0));
        assert_eq!((v.u, v.v), (32.0, 8.0));
        assert_eq!(v.color, Rgba32::white());
    }
    #[test]
    fn invalid_declarations() {
        let e = VertexElement::new(PrimAttr::TexCoordPixel, PrimStorage::Float3, 0);
        assert!(VertexDecl::new(&[e], 12).is_err());
        let e = VertexElement::new(PrimAttr::Color, PrimStorage::Float2, 0);
        assert!(VertexDecl::new(&[e], 8).is_err());
        let e = VertexElement::new(PrimAttr::Position, PrimStorage::Float2, 4);
        assert!(VertexDecl::new(&[e], 8).is_err());
        let e = VertexElement::new(PrimAttr::Position, PrimStorage::Float2, usize::MAX - 2);
        match VertexDecl::new(&[e], usize::MAX) {
            Err(Error::InvalidDecl(_)) => {}
            other => panic!("unexpected {:?}", other.map(|d| d.stride())),
        }
    }
}
