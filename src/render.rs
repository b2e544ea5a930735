//! Renderer

use crate::bitmap::{Surface, SurfaceMut};
use crate::blend::BlendMode;
use crate::primitives::{draw_buffer_with, draw_indexed_prim_with, draw_prim_with, dispatch};
use crate::primitives::{IndexBuffer, PrimType, PrimitiveBackend, VertexBuffer};
use crate::transform::Transform;
use crate::vertex::{Vertex, VertexSource};

/// Blending and transformation used when drawing
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct RenderState {
    pub blend: BlendMode,
    pub transform: Transform,
}

impl RenderState {
    /// Identity transform with `blend`
    pub fn with_blend(blend: BlendMode) -> Self {
        Self { blend, transform: Transform::new() }
    }
}

/// Draw context: a target, its render state and an optional backend
///
/// Without a backend everything is drawn in software.  With one, only
/// memory targets, memory textures and compressed targets are.
///
///     use softraster::{Bitmap,BlendMode,Renderer,Rgba32,Transform,Vertex,get_pixel};
///
///     let mut bmp = Bitmap::new(16, 16);
///     let red = Rgba32::new(1.0, 0.0, 0.0, 1.0);
///     {
///         let mut ren = Renderer::new(&mut bmp);
///         ren.set_blend(BlendMode::copy());
///         ren.set_transform(Transform::new_translate(8.0, 8.0));
///         ren.draw_triangle(None::<&Bitmap>, &Vertex::new(0.0, 0.0, red),
///                           &Vertex::new(8.0, 0.0, red), &Vertex::new(0.0, 8.0, red));
///     }
///     assert_eq!(get_pixel(&bmp, 9, 9), red);
///     assert_eq!(get_pixel(&bmp, 1, 1), Rgba32::transparent());
///
pub struct Renderer<'a, S: SurfaceMut + ?Sized> {
    target: &'a mut S,
    state: RenderState,
    backend: Option<&'a mut dyn PrimitiveBackend>,
}

impl<'a, S: SurfaceMut + ?Sized> Renderer<'a, S> {
    /// Create a new Renderer drawing to `target` with the default state
    pub fn new(target: &'a mut S) -> Self {
        Self { target, state: RenderState::default(), backend: None }
    }
    /// Create a new Renderer with `state`
    pub fn with_state(target: &'a mut S, state: RenderState) -> Self {
        Self { target, state, backend: None }
    }
    /// Hand non-software draws to `backend`
    pub fn set_backend(&mut self, backend: &'a mut dyn PrimitiveBackend) {
        self.backend = Some(backend);
    }
    pub fn target(&self) -> &S {
        &*self.target
    }
    pub fn target_mut(&mut self) -> &mut S {
        &mut *self.target
    }
    pub fn state(&self) -> &RenderState {
        &self.state
    }
    pub fn set_state(&mut self, state: RenderState) {
        self.state = state;
    }
    pub fn set_blend(&mut self, blend: BlendMode) {
        self.state.blend = blend;
    }
    pub fn set_transform(&mut self, transform: Transform) {
        self.state.transform = transform;
    }
    fn parts(&mut self) -> (&mut S, RenderState, Option<&mut dyn PrimitiveBackend>) {
        let backend: Option<&mut dyn PrimitiveBackend> = match self.backend {
            Some(ref mut b) => Some(&mut **b as &mut dyn PrimitiveBackend),
            None => None,
        };
        (&mut *self.target, self.state, backend)
    }
    /// Draw vertices `start..end`, see [draw_prim](fn.draw_prim.html)
    pub fn draw_prim<V, T>(&mut self, vertices: &V, texture: Option<&T>,
                           start: usize, end: usize, prim: PrimType) -> usize
        where V: VertexSource + ?Sized, T: Surface
    {
        let (target, state, backend) = self.parts();
        draw_prim_with(target, &state, backend, vertices, texture, start, end, prim)
    }
    /// Draw indexed vertices, see [draw_indexed_prim](fn.draw_indexed_prim.html)
    pub fn draw_indexed_prim<V, T>(&mut self, vertices: &V, texture: Option<&T>,
                                   indices: &[usize], prim: PrimType) -> usize
        where V: VertexSource + ?Sized, T: Surface
    {
        let (target, state, backend) = self.parts();
        draw_indexed_prim_with(target, &state, backend, vertices, texture, indices, prim)
    }
    /// Draw from a vertex buffer
    pub fn draw_vertex_buffer<T: Surface>(&mut self, vb: &VertexBuffer, texture: Option<&T>,
                                          start: usize, end: usize, prim: PrimType) -> usize {
        let (target, state, backend) = self.parts();
        draw_buffer_with(target, &state, backend, vb, texture, None, start, end, prim)
    }
    /// Draw from a vertex buffer through an index buffer
    pub fn draw_indexed_buffer<T: Surface>(&mut self, vb: &VertexBuffer, texture: Option<&T>,
                                           ib: &IndexBuffer, start: usize, end: usize,
                                           prim: PrimType) -> usize {
        let (target, state, backend) = self.parts();
        draw_buffer_with(target, &state, backend, vb, texture, Some(ib), start, end, prim)
    }
    fn draw_list<T: Surface>(&mut self, texture: Option<&T>, vtx: Vec<Vertex>, prim: PrimType) -> usize {
        let (target, state, backend) = self.parts();
        dispatch(target, &state, backend, texture, vtx, prim)
    }
    /// Fill a triangle
    ///
    /// Returns false if the triangle was rejected; a triangle that is
    /// clipped away still counts as drawn
    pub fn draw_triangle<T: Surface>(&mut self, texture: Option<&T>,
                                     v1: &Vertex, v2: &Vertex, v3: &Vertex) -> bool {
        self.draw_list(texture, vec![*v1, *v2, *v3], PrimType::TriangleList) > 0
    }
    /// Draw a one pixel wide line
    pub fn draw_line<T: Surface>(&mut self, texture: Option<&T>, v1: &Vertex, v2: &Vertex) -> bool {
        self.draw_list(texture, vec![*v1, *v2], PrimType::LineList) > 0
    }
    /// Draw a single pixel
    pub fn draw_point<T: Surface>(&mut self, texture: Option<&T>, v: &Vertex) -> bool {
        self.draw_list(texture, vec![*v], PrimType::PointList) > 0
    }
}
