use softraster::{Bitmap,BlendMode,BufferFlags,IndexBuffer,PrimType,RenderState,Renderer,Rgba32};
use softraster::{Transform,Vertex,VertexBuffer,draw_prim,get_pixel};

fn red() -> Rgba32 {
    Rgba32::new(1.0, 0.0, 0.0, 1.0)
}
fn copy() -> RenderState {
    RenderState::with_blend(BlendMode::copy())
}
fn square(n: f32) -> Vec<Vertex> {
    vec![Vertex::new(0.0, 0.0, red()), Vertex::new(n, 0.0, red()),
         Vertex::new(0.0, n, red()), Vertex::new(n, n, red())]
}

#[test_log::test]
fn strip_and_list_agree() {
    let v = square(10.0);
    let mut strip = Bitmap::new(12, 12);
    assert_eq!(draw_prim(&mut strip, &copy(), &v[..], None::<&Bitmap>, 0, 4, PrimType::TriangleStrip), 2);

    let list = [v[0], v[1], v[2], v[1], v[2], v[3]];
    let mut tris = Bitmap::new(12, 12);
    assert_eq!(draw_prim(&mut tris, &copy(), &list[..], None::<&Bitmap>, 0, 6, PrimType::TriangleList), 2);

    assert_eq!(strip.buffer().data, tris.buffer().data);
    assert_eq!(get_pixel(&strip, 9, 9), red());
    assert_eq!(get_pixel(&strip, 10, 10), Rgba32::transparent());
}

#[test]
fn sub_range_is_drawn() {
    let v = square(10.0);
    let mut bmp = Bitmap::new(12, 12);
    assert_eq!(draw_prim(&mut bmp, &copy(), &v[..], None::<&Bitmap>, 1, 4, PrimType::TriangleList), 1);
    assert_eq!(get_pixel(&bmp, 9, 9), red());
    assert_eq!(get_pixel(&bmp, 1, 1), Rgba32::transparent());
}

#[test]
fn line_loop_closes() {
    let v = [Vertex::new(1.5, 1.5, red()), Vertex::new(8.5, 1.5, red()), Vertex::new(8.5, 8.5, red()),
             Vertex::new(1.5, 8.5, red())];
    let mut bmp = Bitmap::new(10, 10);
    assert_eq!(draw_prim(&mut bmp, &copy(), &v[..], None::<&Bitmap>, 0, 4, PrimType::LineStrip), 3);
    assert_eq!(get_pixel(&bmp, 1, 4), Rgba32::transparent());
    assert_eq!(draw_prim(&mut bmp, &copy(), &v[..], None::<&Bitmap>, 0, 4, PrimType::LineLoop), 4);
    assert_eq!(get_pixel(&bmp, 1, 4), red());
    assert_eq!(get_pixel(&bmp, 4, 4), Rgba32::transparent());
}

#[test]
fn renderer_applies_transform_to_buffers() {
    let v = square(4.0);
    let vb = VertexBuffer::from_vertices(&v, BufferFlags::STATIC | BufferFlags::READWRITE);
    let ib = IndexBuffer::from_indices(&[0, 1, 2, 1, 2, 3], BufferFlags::READWRITE);
    let mut bmp = Bitmap::new(16, 16);
    {
        let mut ren = Renderer::with_state(&mut bmp, copy());
        let mut t = Transform::new_scale(2.0, 2.0);
        t.translate(4.0, 4.0);
        ren.set_transform(t);
        assert_eq!(ren.draw_indexed_buffer(&vb, None::<&Bitmap>, &ib, 0, 6, PrimType::TriangleList), 2);
    }
    for y in 0..16 {
        for x in 0..16 {
            let inside = x >= 4 && x < 12 && y >= 4 && y < 12;
            let want = if inside { red() } else { Rgba32::transparent() };
            assert_eq!(get_pixel(&bmp, x, y), want, "({},{})", x, y);
        }
    }
}

#[test]
fn point_list() {
    let v = [Vertex::new(0.5, 0.5, red()), Vertex::new(3.9, 2.1, red()), Vertex::new(-1.0, 2.0, red())];
    let mut bmp = Bitmap::new(4, 4);
    assert_eq!(draw_prim(&mut bmp, &copy(), &v[..], None::<&Bitmap>, 0, 3, PrimType::PointList), 3);
    assert_eq!(get_pixel(&bmp, 0, 0), red());
    assert_eq!(get_pixel(&bmp, 3, 2), red());
    let drawn = (0..16).filter(|i| get_pixel(&bmp, i % 4, i / 4) == red()).count();
    assert_eq!(drawn, 2);
}
