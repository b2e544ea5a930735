//! Primitive lists and vertex/index buffers
//!
//! Vertices are fetched from a [VertexSource], passed through the
//! transform of the [RenderState] and assembled into lines, triangles
//! or points according to the [PrimType].
//!
//! [VertexSource]: trait.VertexSource.html
//! [RenderState]: struct.RenderState.html
//! [PrimType]: enum.PrimType.html

use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace, warn};

use crate::bitmap::{Surface, SurfaceMut};
use crate::error::Error;
use crate::lock::LockFlags;
use crate::render::RenderState;
use crate::soft::{draw_line, draw_point, draw_triangle};
use crate::vertex::{DeclaredVertices, Vertex, VertexDecl, VertexSource};

/// How a list of vertices is assembled
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum PrimType {
    /// Lines (0,1), (2,3), ...
    LineList,
    /// Lines (0,1), (1,2), ...
    LineStrip,
    /// A line strip closed by (0,n-1)
    LineLoop,
    /// Triangles (0,1,2), (3,4,5), ...
    TriangleList,
    /// Triangles (i-2,i-1,i)
    TriangleStrip,
    /// Triangles (0,i,i-1)
    TriangleFan,
    /// One pixel per vertex
    PointList,
}

impl PrimType {
    /// Number of primitives made from `n` vertices
    pub fn count(self, n: usize) -> usize {
        match self {
            PrimType::LineList => n / 2,
            PrimType::LineStrip => n.saturating_sub(1),
            PrimType::LineLoop => if n < 2 { 0 } else { n },
            PrimType::TriangleList => n / 3,
            PrimType::TriangleStrip | PrimType::TriangleFan => n.saturating_sub(2),
            PrimType::PointList => n,
        }
    }
}

/// Draws primitives on targets the software path does not handle
///
/// Vertices are handed over untransformed; the backend applies
/// `state.transform` itself.  Returns the number of primitives drawn.
pub trait PrimitiveBackend {
    fn draw(&mut self, state: &RenderState, texture: Option<&dyn Surface>,
            vertices: &[Vertex], prim: PrimType) -> usize;
}

/// Return if drawing to `target` with `texture` must happen in software
///
/// True for memory targets, memory textures and compressed targets
pub fn use_software<S, T>(target: &S, texture: Option<&T>) -> bool
    where S: Surface + ?Sized, T: Surface + ?Sized
{
    target.is_memory()
        || texture.map(|t| t.is_memory()).unwrap_or(false)
        || target.format().is_compressed()
}

fn texture_size<T: Surface + ?Sized>(texture: Option<&T>) -> Option<(i32, i32)> {
    texture.map(|t| (t.width(), t.height()))
}

/// Assemble and rasterize already transformed vertices
fn draw_soft<S, T>(target: &mut S, state: &RenderState, texture: Option<&T>,
                   vtx: &[Vertex], prim: PrimType) -> usize
    where S: SurfaceMut + ?Sized, T: Surface + ?Sized
{
    if let Some(t) = texture {
        if t.format().is_video_only() {
            warn!("texture with video only format {:?} cannot be sampled", t.format());
            return 0;
        }
    }
    let n = vtx.len();
    trace!("draw {:?} with {} vertices", prim, n);
    match prim {
        PrimType::LineList => {
            for pair in vtx.chunks_exact(2) {
                draw_line(target, state, texture, &pair[0], &pair[1]);
            }
        }
        PrimType::LineStrip | PrimType::LineLoop => {
            for pair in vtx.windows(2) {
                draw_line(target, state, texture, &pair[0], &pair[1]);
            }
            if prim == PrimType::LineLoop && n >= 2 {
                draw_line(target, state, texture, &vtx[0], &vtx[n - 1]);
            }
        }
        PrimType::TriangleList => {
            for t in vtx.chunks_exact(3) {
                draw_triangle(target, state, texture, &t[0], &t[1], &t[2]);
            }
        }
        PrimType::TriangleStrip => {
            for t in vtx.windows(3) {
                draw_triangle(target, state, texture, &t[0], &t[1], &t[2]);
            }
        }
        PrimType::TriangleFan => {
            for i in 2..n {
                draw_triangle(target, state, texture, &vtx[0], &vtx[i], &vtx[i - 1]);
            }
        }
        PrimType::PointList => {
            for v in vtx {
                draw_point(target, state, texture, v);
            }
        }
    }
    prim.count(n)
}

/// Send untransformed vertices to the backend or to the software path
pub(crate) fn dispatch<S, T>(target: &mut S, state: &RenderState,
                             backend: Option<&mut dyn PrimitiveBackend>,
                             texture: Option<&T>, mut vtx: Vec<Vertex>, prim: PrimType) -> usize
    where S: SurfaceMut + ?Sized, T: Surface
{
    if !use_software(target, texture) {
        if let Some(backend) = backend {
            return backend.draw(state, texture.map(|t| t as &dyn Surface), &vtx, prim);
        }
        debug!("no backend bound, drawing {:?} in software", prim);
    }
    state.transform.transform_vertices(&mut vtx);
    draw_soft(target, state, texture, &vtx, prim)
}

fn gather_range<V>(vertices: &V, size: Option<(i32, i32)>, start: usize, end: usize)
                   -> Option<Vec<Vertex>>
    where V: VertexSource + ?Sized
{
    if end > vertices.len() || start > end {
        warn!("vertex range {}..{} outside of {} vertices", start, end, vertices.len());
        return None;
    }
    Some((start..end).map(|i| vertices.vertex(i, size)).collect())
}

fn gather_indexed<V>(vertices: &V, size: Option<(i32, i32)>, indices: &[usize])
                     -> Option<Vec<Vertex>>
    where V: VertexSource + ?Sized
{
    let n = vertices.len();
    if let Some(i) = indices.iter().find(|&&i| i >= n) {
        warn!("vertex index {} outside of {} vertices", i, n);
        return None;
    }
    Some(indices.iter().map(|&i| vertices.vertex(i, size)).collect())
}

pub(crate) fn draw_prim_with<S, V, T>(target: &mut S, state: &RenderState,
                                      backend: Option<&mut dyn PrimitiveBackend>,
                                      vertices: &V, texture: Option<&T>,
                                      start: usize, end: usize, prim: PrimType) -> usize
    where S: SurfaceMut + ?Sized, V: VertexSource + ?Sized, T: Surface
{
    match gather_range(vertices, texture_size(texture), start, end) {
        Some(vtx) => dispatch(target, state, backend, texture, vtx, prim),
        None => 0,
    }
}

pub(crate) fn draw_indexed_prim_with<S, V, T>(target: &mut S, state: &RenderState,
                                              backend: Option<&mut dyn PrimitiveBackend>,
                                              vertices: &V, texture: Option<&T>,
                                              indices: &[usize], prim: PrimType) -> usize
    where S: SurfaceMut + ?Sized, V: VertexSource + ?Sized, T: Surface
{
    match gather_indexed(vertices, texture_size(texture), indices) {
        Some(vtx) => dispatch(target, state, backend, texture, vtx, prim),
        None => 0,
    }
}

/// Draw vertices `start..end` as primitives of type `prim`
///
/// Returns the number of primitives; an out of range request draws
/// nothing and returns 0
///
///     use softraster::{Bitmap,PrimType,RenderState,Rgba32,Vertex,draw_prim,get_pixel};
///
///     let red = Rgba32::new(1.0, 0.0, 0.0, 1.0);
///     let quad = [
///         Vertex::new(0.0, 0.0, red), Vertex::new(8.0, 0.0, red),
///         Vertex::new(0.0, 8.0, red), Vertex::new(8.0, 8.0, red),
///     ];
///     let mut bmp = Bitmap::new(8, 8);
///     let n = draw_prim(&mut bmp, &RenderState::default(), &quad[..], None::<&Bitmap>,
///                       0, 4, PrimType::TriangleStrip);
///     assert_eq!(n, 2);
///     assert_eq!(get_pixel(&bmp, 7, 7), red);
///
pub fn draw_prim<S, V, T>(target: &mut S, state: &RenderState, vertices: &V, texture: Option<&T>,
                          start: usize, end: usize, prim: PrimType) -> usize
    where S: SurfaceMut + ?Sized, V: VertexSource + ?Sized, T: Surface
{
    draw_prim_with(target, state, None, vertices, texture, start, end, prim)
}

/// Draw the vertices named by `indices` as primitives of type `prim`
///
/// An index outside of `vertices` draws nothing and returns 0
pub fn draw_indexed_prim<S, V, T>(target: &mut S, state: &RenderState, vertices: &V,
                                  texture: Option<&T>, indices: &[usize], prim: PrimType) -> usize
    where S: SurfaceMut + ?Sized, V: VertexSource + ?Sized, T: Surface
{
    draw_indexed_prim_with(target, state, None, vertices, texture, indices, prim)
}

bitflags! {
    /// Intended use of a buffer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferFlags: u32 {
        /// Written once, drawn a few times
        const STREAM    = 1;
        /// Written once, drawn many times
        const STATIC    = 2;
        /// Written and drawn repeatedly
        const DYNAMIC   = 4;
        /// Contents can be read back; otherwise the buffer is write-only
        const READWRITE = 8;
    }
}

#[derive(Debug,Copy,Clone)]
struct BufferLock {
    offset: usize,
    length: usize,
    flags: LockFlags,
}

/// Storage and lock state shared by vertex and index buffers
///
/// Sizes are in elements; `elem` is the size of one element in bytes
#[derive(Debug)]
struct BufferCommon {
    data: Vec<u8>,
    size: usize,
    elem: usize,
    write_only: bool,
    lock: Option<BufferLock>,
}

impl BufferCommon {
    fn new(initial: Option<&[u8]>, size: usize, elem: usize, flags: BufferFlags) -> Result<Self, Error> {
        let bytes = match size.checked_mul(elem) {
            Some(bytes) => bytes,
            None => return Err(Error::BufferRange { offset: 0, length: size, size: usize::MAX / elem.max(1) }),
        };
        let data = match initial {
            Some(d) if d.len() < bytes => {
                return Err(Error::BufferRange { offset: 0, length: size, size: d.len() / elem.max(1) });
            }
            Some(d) => d[..bytes].to_vec(),
            None => vec![0u8; bytes],
        };
        Ok(Self { data, size, elem, write_only: !flags.contains(BufferFlags::READWRITE), lock: None })
    }
    fn lock(&mut self, offset: usize, length: usize, flags: LockFlags) -> Result<&mut [u8], Error> {
        if offset.checked_add(length).map_or(true, |end| end > self.size) {
            return Err(Error::BufferRange { offset, length, size: self.size });
        }
        if self.lock.is_some() {
            return Err(Error::AlreadyLocked);
        }
        if self.write_only && flags != LockFlags::WRITE_ONLY {
            return Err(Error::WriteOnly);
        }
        trace!("lock buffer {}+{} {:?}", offset, length, flags);
        self.lock = Some(BufferLock { offset, length, flags });
        let start = offset * self.elem;
        Ok(&mut self.data[start .. start + length * self.elem])
    }
    fn unlock(&mut self) {
        if let Some(l) = self.lock.take() {
            trace!("unlock buffer {}+{} {:?}", l.offset, l.length, l.flags);
        }
    }
}

/// Vertices stored in a fixed size buffer
///
///     use softraster::{BufferFlags,LockFlags,Rgba32,Vertex,VertexBuffer};
///
///     let mut vb = VertexBuffer::new(None, None, 3, BufferFlags::STATIC).unwrap();
///     assert!(vb.lock(0, 3, LockFlags::empty()).is_err());
///     let data = vb.lock(1, 1, LockFlags::WRITE_ONLY).unwrap();
///     Vertex::new(2.0, 3.0, Rgba32::white()).write(data);
///     vb.unlock();
///     assert_eq!(vb.size(), 3);
///
#[derive(Debug)]
pub struct VertexBuffer {
    decl: VertexDecl,
    common: BufferCommon,
}

impl VertexBuffer {
    /// Create a buffer of `size` vertices laid out by `decl`
    ///
    /// Without a declaration vertices use the [Vertex] layout.  The
    /// buffer is write-only unless `flags` contains `READWRITE`.
    ///
    /// [Vertex]: struct.Vertex.html
    pub fn new(decl: Option<VertexDecl>, initial: Option<&[u8]>, size: usize,
               flags: BufferFlags) -> Result<Self, Error> {
        let decl = decl.unwrap_or_default();
        let common = BufferCommon::new(initial, size, decl.stride(), flags)?;
        Ok(Self { decl, common })
    }
    /// Create a buffer holding `vertices`
    pub fn from_vertices(vertices: &[Vertex], flags: BufferFlags) -> Self {
        let mut data = vec![0u8; vertices.len() * Vertex::SIZE];
        for (v, out) in vertices.iter().zip(data.chunks_exact_mut(Vertex::SIZE)) {
            v.write(out);
        }
        let common = BufferCommon {
            data,
            size: vertices.len(),
            elem: Vertex::SIZE,
            write_only: !flags.contains(BufferFlags::READWRITE),
            lock: None,
        };
        Self { decl: VertexDecl::default(), common }
    }
    /// Number of vertices
    pub fn size(&self) -> usize {
        self.common.size
    }
    /// Vertex layout
    pub fn decl(&self) -> &VertexDecl {
        &self.decl
    }
    /// Return if the contents cannot be read back
    pub fn is_write_only(&self) -> bool {
        self.common.write_only
    }
    /// Return if the buffer is locked
    pub fn is_locked(&self) -> bool {
        self.common.lock.is_some()
    }
    /// Lock `length` vertices starting at `offset`
    ///
    /// Fails if already locked, if the range exceeds the buffer or if a
    /// write-only buffer is locked with anything but `WRITE_ONLY`
    pub fn lock(&mut self, offset: usize, length: usize, flags: LockFlags) -> Result<&mut [u8], Error> {
        self.common.lock(offset, length, flags)
    }
    pub fn unlock(&mut self) {
        self.common.unlock()
    }
    fn vertices(&self) -> DeclaredVertices {
        DeclaredVertices::new(&self.common.data, &self.decl)
    }
}

/// Indices stored in a fixed size buffer, 2 or 4 bytes each
#[derive(Debug)]
pub struct IndexBuffer {
    common: BufferCommon,
}

impl IndexBuffer {
    /// Create a buffer of `size` indices of `index_size` bytes
    pub fn new(index_size: usize, initial: Option<&[u8]>, size: usize,
               flags: BufferFlags) -> Result<Self, Error> {
        if index_size != 2 && index_size != 4 {
            return Err(Error::IndexSize(index_size));
        }
        Ok(Self { common: BufferCommon::new(initial, size, index_size, flags)? })
    }
    /// Create a 4 byte index buffer holding `indices`
    pub fn from_indices(indices: &[u32], flags: BufferFlags) -> Self {
        let mut data = vec![0u8; indices.len() * 4];
        LittleEndian::write_u32_into(indices, &mut data);
        let common = BufferCommon {
            data,
            size: indices.len(),
            elem: 4,
            write_only: !flags.contains(BufferFlags::READWRITE),
            lock: None,
        };
        Self { common }
    }
    /// Bytes per index
    pub fn index_size(&self) -> usize {
        self.common.elem
    }
    /// Number of indices
    pub fn size(&self) -> usize {
        self.common.size
    }
    /// Return if the contents cannot be read back
    pub fn is_write_only(&self) -> bool {
        self.common.write_only
    }
    /// Return if the buffer is locked
    pub fn is_locked(&self) -> bool {
        self.common.lock.is_some()
    }
    /// Lock `length` indices starting at `offset`, see
    /// [VertexBuffer::lock](struct.VertexBuffer.html#method.lock)
    pub fn lock(&mut self, offset: usize, length: usize, flags: LockFlags) -> Result<&mut [u8], Error> {
        self.common.lock(offset, length, flags)
    }
    pub fn unlock(&mut self) {
        self.common.unlock()
    }
    /// Index `i`, little endian
    pub fn index(&self, i: usize) -> usize {
        let p = &self.common.data[i * self.common.elem ..];
        match self.common.elem {
            2 => LittleEndian::read_u16(p) as usize,
            _ => LittleEndian::read_u32(p) as usize,
        }
    }
}

pub(crate) fn draw_buffer_with<S, T>(target: &mut S, state: &RenderState,
                                     backend: Option<&mut dyn PrimitiveBackend>,
                                     vb: &VertexBuffer, texture: Option<&T>,
                                     ib: Option<&IndexBuffer>,
                                     start: usize, end: usize, prim: PrimType) -> usize
    where S: SurfaceMut + ?Sized, T: Surface
{
    if vb.is_locked() || ib.map(|b| b.is_locked()).unwrap_or(false) {
        warn!("cannot draw from a locked buffer");
        return 0;
    }
    let software = backend.is_none() || use_software(target, texture);
    if software && (vb.is_write_only() || ib.map(|b| b.is_write_only()).unwrap_or(false)) {
        warn!("write-only buffer cannot be drawn in software");
        return 0;
    }
    let vertices = vb.vertices();
    match ib {
        Some(ib) => {
            if end > ib.size() || start > end {
                warn!("index range {}..{} outside of {} indices", start, end, ib.size());
                return 0;
            }
            let indices: Vec<usize> = (start..end).map(|i| ib.index(i)).collect();
            draw_indexed_prim_with(target, state, backend, &vertices, texture, &indices, prim)
        }
        None => draw_prim_with(target, state, backend, &vertices, texture, start, end, prim),
    }
}

/// Draw vertices `start..end` of `vb`
///
/// A write-only buffer cannot be read back and draws nothing in software
pub fn draw_vertex_buffer<S, T>(target: &mut S, state: &RenderState, vb: &VertexBuffer,
                                texture: Option<&T>, start: usize, end: usize, prim: PrimType) -> usize
    where S: SurfaceMut + ?Sized, T: Surface
{
    draw_buffer_with(target, state, None, vb, texture, None, start, end, prim)
}

/// Draw the vertices of `vb` named by indices `start..end` of `ib`
pub fn draw_indexed_buffer<S, T>(target: &mut S, state: &RenderState, vb: &VertexBuffer,
                                 texture: Option<&T>, ib: &IndexBuffer,
                                 start: usize, end: usize, prim: PrimType) -> usize
    where S: SurfaceMut + ?Sized, T: Surface
{
    draw_buffer_with(target, state, None, vb, texture, Some(ib), start, end, prim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{Bitmap, BitmapFlags};
    use crate::blend::BlendMode;
    use crate::color::Rgba32;
    use crate::pixel::get_pixel;
    use crate::pixfmt::PixelFormat;
    use crate::transform::Transform;

    fn red() -> Rgba32 {
        Rgba32::new(1.0, 0.0, 0.0, 1.0)
    }
    fn copy() -> RenderState {
        RenderState::with_blend(BlendMode::copy())
    }
    fn verts(n: usize) -> Vec<Vertex> {
        (0..n).map(|i| Vertex::new(i as f32 * 3.0, (i % 2) as f32 * 5.0, red())).collect()
    }

    #[test]
    fn primitive_counts() {
        use PrimType::*;
        let cases = [(LineList, 5, 2), (LineStrip, 5, 4), (LineLoop, 5, 5), (LineLoop, 1, 0),
                     (TriangleList, 7, 2), (TriangleStrip, 5, 3), (TriangleFan, 5, 3),
                     (TriangleStrip, 1, 0), (PointList, 4, 4)];
        for &(prim, n, want) in cases.iter() {
            let mut bmp = Bitmap::new(16, 16);
            let v = verts(n);
            assert_eq!(draw_prim(&mut bmp, &copy(), &v[..], None::<&Bitmap>, 0, n, prim), want,
                       "{:?} {}", prim, n);
        }
    }
    #[test]
    fn out_of_range_draws_nothing() {
        let mut bmp = Bitmap::new(16, 16);
        let v = verts(3);
        assert_eq!(draw_prim(&mut bmp, &copy(), &v[..], None::<&Bitmap>, 0, 4, PrimType::TriangleList), 0);
        assert_eq!(draw_indexed_prim(&mut bmp, &copy(), &v[..], None::<&Bitmap>, &[0, 1, 3],
                                     PrimType::TriangleList), 0);
        assert!(bmp.buffer().data.iter().all(|&v| v == 0));
    }
    #[test]
    fn transform_is_applied() {
        let mut bmp = Bitmap::new(16, 16);
        let v = [Vertex::new(0.0, 0.0, red())];
        let mut state = copy();
        state.transform = Transform::new_translate(5.0, 6.0);
        assert_eq!(draw_prim(&mut bmp, &state, &v[..], None::<&Bitmap>, 0, 1, PrimType::PointList), 1);
        assert_eq!(get_pixel(&bmp, 5, 6), red());
        assert_eq!(get_pixel(&bmp, 0, 0), Rgba32::transparent());
    }
    #[test]
    fn fan_covers_polygon() {
        let mut bmp = Bitmap::new(12, 12);
        let v = [Vertex::new(6.0, 6.0, red()), Vertex::new(0.0, 0.0, red()), Vertex::new(12.0, 0.0, red()),
                 Vertex::new(12.0, 12.0, red()), Vertex::new(0.0, 12.0, red()), Vertex::new(0.0, 0.0, red())];
        assert_eq!(draw_prim(&mut bmp, &copy(), &v[..], None::<&Bitmap>, 0, 6, PrimType::TriangleFan), 4);
        for &(x, y) in [(3, 1), (10, 3), (8, 10), (1, 8)].iter() {
            assert_eq!(get_pixel(&bmp, x, y), red(), "{} {}", x, y);
        }
    }
    #[test]
    fn indexed_matches_direct() {
        let v = verts(4);
        let mut a = Bitmap::new(16, 16);
        let mut b = Bitmap::new(16, 16);
        draw_prim(&mut a, &copy(), &v[..], None::<&Bitmap>, 0, 4, PrimType::TriangleStrip);
        draw_indexed_prim(&mut b, &copy(), &v[..], None::<&Bitmap>, &[0, 1, 2, 1, 2, 3],
                          PrimType::TriangleList);
        assert_eq!(a.buffer().data, b.buffer().data);
    }

    struct Recorder {
        calls: Vec<(usize, PrimType, bool)>,
    }
    impl PrimitiveBackend for Recorder {
        fn draw(&mut self, _state: &RenderState, texture: Option<&dyn Surface>,
                vertices: &[Vertex], prim: PrimType) -> usize {
            self.calls.push((vertices.len(), prim, texture.is_some()));
            prim.count(vertices.len())
        }
    }

    #[test]
    fn dispatch_to_backend() {
        let v = verts(3);
        let mut rec = Recorder { calls: vec![] };
        let mut video = Bitmap::with_format(8, 8, PixelFormat::default(), BitmapFlags::VIDEO_BITMAP);
        let n = draw_prim_with(&mut video, &copy(), Some(&mut rec as &mut dyn PrimitiveBackend), &v[..], None::<&Bitmap>,
                               0, 3, PrimType::TriangleList);
        assert_eq!(n, 1);
        assert_eq!(rec.calls, vec![(3, PrimType::TriangleList, false)]);
        assert!(video.buffer().data.iter().all(|&v| v == 0));

        // Memory texture forces software
        let tex = Bitmap::new(2, 2);
        draw_prim_with(&mut video, &copy(), Some(&mut rec as &mut dyn PrimitiveBackend), &v[..], Some(&tex), 0, 3, PrimType::TriangleList);
        assert_eq!(rec.calls.len(), 1);

        // Memory target forces software
        let mut mem = Bitmap::new(8, 8);
        draw_prim_with(&mut mem, &copy(), Some(&mut rec as &mut dyn PrimitiveBackend), &v[..], None::<&Bitmap>, 0, 3, PrimType::TriangleList);
        assert_eq!(rec.calls.len(), 1);
    }
    #[test]
    fn use_software_rules() {
        let mem = Bitmap::new(2, 2);
        let video = Bitmap::with_format(4, 4, PixelFormat::default(), BitmapFlags::VIDEO_BITMAP);
        let dxt = Bitmap::with_format(4, 4, PixelFormat::Dxt3, BitmapFlags::VIDEO_BITMAP);
        assert!(use_software(&mem, None::<&Bitmap>));
        assert!(!use_software(&video, None::<&Bitmap>));
        assert!(use_software(&video, Some(&mem)));
        assert!(!use_software(&video, Some(&video)));
        assert!(use_software(&dxt, None::<&Bitmap>));
    }
    #[test]
    fn buffer_lock_rules() {
        let mut vb = VertexBuffer::new(None, None, 4, BufferFlags::READWRITE).unwrap();
        assert!(matches!(vb.lock(2, 3, LockFlags::empty()), Err(Error::BufferRange { .. })));
        assert!(matches!(vb.lock(2, usize::MAX, LockFlags::empty()), Err(Error::BufferRange { .. })));
        assert!(matches!(vb.lock(usize::MAX, 1, LockFlags::empty()), Err(Error::BufferRange { .. })));
        assert!(!vb.is_locked());
        assert_eq!(vb.lock(1, 2, LockFlags::READ_ONLY).unwrap().len(), 2 * Vertex::SIZE);
        assert!(matches!(vb.lock(0, 1, LockFlags::empty()), Err(Error::AlreadyLocked)));
        vb.unlock();
        assert!(!vb.is_locked());

        let mut wo = VertexBuffer::new(None, None, 4, BufferFlags::STATIC).unwrap();
        assert!(matches!(wo.lock(0, 1, LockFlags::READ_ONLY), Err(Error::WriteOnly)));
        assert!(matches!(wo.lock(0, 1, LockFlags::empty()), Err(Error::WriteOnly)));
        assert!(wo.lock(0, 1, LockFlags::WRITE_ONLY).is_ok());
    }
    #[test]
    fn index_buffer_sizes() {
        assert!(matches!(IndexBuffer::new(3, None, 4, BufferFlags::STATIC), Err(Error::IndexSize(3))));
        let data = [1u8, 0, 0, 1];
        let ib = IndexBuffer::new(2, Some(&data), 2, BufferFlags::READWRITE).unwrap();
        assert_eq!((ib.index(0), ib.index(1)), (1, 256));
        assert!(IndexBuffer::new(4, Some(&data), 2, BufferFlags::STATIC).is_err());
        assert!(matches!(IndexBuffer::new(4, None, usize::MAX, BufferFlags::STATIC),
                         Err(Error::BufferRange { .. })));
    }
    #[test]
    fn write_only_buffer_draws_nothing() {
        let v = verts(3);
        let vb = VertexBuffer::from_vertices(&v, BufferFlags::STATIC);
        let mut bmp = Bitmap::new(16, 16);
        assert_eq!(draw_vertex_buffer(&mut bmp, &copy(), &vb, None::<&Bitmap>, 0, 3,
                                      PrimType::TriangleList), 0);
        assert!(bmp.buffer().data.iter().all(|&v| v == 0));
    }
    #[test]
    fn buffers_match_slices() {
        let v = verts(4);
        let vb = VertexBuffer::from_vertices(&v, BufferFlags::READWRITE);
        let ib = IndexBuffer::from_indices(&[3, 2, 1, 0], BufferFlags::READWRITE);
        let mut a = Bitmap::new(16, 16);
        let mut b = Bitmap::new(16, 16);
        assert_eq!(draw_vertex_buffer(&mut a, &copy(), &vb, None::<&Bitmap>, 0, 4,
                                      PrimType::LineStrip), 3);
        assert_eq!(draw_indexed_buffer(&mut b, &copy(), &vb, None::<&Bitmap>, &ib, 1, 4,
                                       PrimType::TriangleList), 1);
        let mut c = Bitmap::new(16, 16);
        let mut d = Bitmap::new(16, 16);
        draw_prim(&mut c, &copy(), &v[..], None::<&Bitmap>, 0, 4, PrimType::LineStrip);
        draw_indexed_prim(&mut d, &copy(), &v[..], None::<&Bitmap>, &[2, 1, 0], PrimType::TriangleList);
        assert_eq!(a.buffer().data, c.buffer().data);
        assert_eq!(b.buffer().data, d.buffer().data);
    }
    #[test]
    fn locked_buffer_draws_nothing() {
        let v = verts(3);
        let mut vb = VertexBuffer::from_vertices(&v, BufferFlags::READWRITE);
        vb.lock(0, 1, LockFlags::READ_ONLY).unwrap();
        let mut bmp = Bitmap::new(16, 16);
        assert_eq!(draw_vertex_buffer(&mut bmp, &copy(), &vb, None::<&Bitmap>, 0, 3,
                                      PrimType::TriangleList), 0);
    }
}
