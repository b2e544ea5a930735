use softraster::{Bitmap,BlendMode,RenderState,Rgba32,Rgba8,Vertex};
use softraster::{draw_triangle,get_pixel,put_pixel};

fn red() -> Rgba32 {
    Rgba32::new(1.0, 0.0, 0.0, 1.0)
}

#[test_log::test]
fn red_corner_triangle() {
    let mut bmp = Bitmap::new(20, 20);
    let state = RenderState::with_blend(BlendMode::copy());
    let v1 = Vertex::new(0.0, 0.0, red());
    let v2 = Vertex::new(10.0, 0.0, red());
    let v3 = Vertex::new(0.0, 10.0, red());
    assert!(draw_triangle(&mut bmp, &state, None::<&Bitmap>, &v1, &v2, &v3));
    for y in 0..20 {
        for x in 0..20 {
            let c = get_pixel(&bmp, x, y);
            if x + y <= 8 {
                assert_eq!(c, red(), "({},{})", x, y);
            } else if x + y >= 10 {
                assert_eq!(c, Rgba32::transparent(), "({},{})", x, y);
            }
        }
    }
    assert!(!bmp.is_locked());
}

#[test]
fn quad_from_two_triangles_has_no_gaps() {
    let mut bmp = Bitmap::new(12, 12);
    let state = RenderState::with_blend(BlendMode::copy());
    let v = [Vertex::new(0.0, 0.0, red()), Vertex::new(10.0, 0.0, red()),
             Vertex::new(0.0, 10.0, red()), Vertex::new(10.0, 10.0, red())];
    draw_triangle(&mut bmp, &state, None::<&Bitmap>, &v[0], &v[1], &v[2]);
    draw_triangle(&mut bmp, &state, None::<&Bitmap>, &v[1], &v[2], &v[3]);
    for y in 0..12 {
        for x in 0..12 {
            let want = if x < 10 && y < 10 { red() } else { Rgba32::transparent() };
            assert_eq!(get_pixel(&bmp, x, y), want, "({},{})", x, y);
        }
    }
}

#[test]
fn opaque_draw_matches_put_pixel() {
    let c = Rgba32::new(0.3, 0.6, 0.9, 0.7);
    let state = RenderState::with_blend(BlendMode::copy());
    let mut a = Bitmap::new(32, 32);
    a.clear(Rgba32::new(0.0, 0.0, 0.2, 1.0));
    let mut b = Bitmap::new(32, 32);
    b.clear(Rgba32::new(0.0, 0.0, 0.2, 1.0));
    let before: Vec<u8> = a.buffer().data.clone();

    let v1 = Vertex::new(3.3, 1.7, c);
    let v2 = Vertex::new(29.1, 12.4, c);
    let v3 = Vertex::new(8.6, 30.2, c);
    draw_triangle(&mut a, &state, None::<&Bitmap>, &v1, &v2, &v3);

    let mut drawn = 0;
    for y in 0..32 {
        for x in 0..32 {
            let i = a.buffer().offset(x as usize, y as usize);
            if a.buffer().data[i..i + 4] != before[i..i + 4] {
                drawn += 1;
                assert_eq!(Rgba8::from(get_pixel(&a, x, y)), Rgba8::from(c));
                put_pixel(&mut b, x, y, c);
            }
        }
    }
    assert!(drawn > 100);
    assert_eq!(a.buffer().data, b.buffer().data);
}

#[test]
fn rows_follow_vertex_heights() {
    let state = RenderState::with_blend(BlendMode::copy());
    let cases = [((2.0, 1.2), (30.0, 6.7), (9.0, 27.4)),
                 ((5.5, 3.0), (25.0, 3.0), (15.0, 20.5)),
                 ((3.0, 4.0), (28.0, 25.5), (3.0, 25.5))];
    for &(p1, p2, p3) in cases.iter() {
        let mut bmp = Bitmap::new(32, 32);
        let v1 = Vertex::new(p1.0, p1.1, red());
        let v2 = Vertex::new(p2.0, p2.1, red());
        let v3 = Vertex::new(p3.0, p3.1, red());
        draw_triangle(&mut bmp, &state, None::<&Bitmap>, &v1, &v2, &v3);
        let rows = (0..32)
            .filter(|&y| (0..32).any(|x| get_pixel(&bmp, x, y) == red()))
            .count() as i32;
        let ys = [p1.1, p2.1, p3.1];
        let top = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let bottom = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let want = ((bottom + 0.5).ceil() - (top + 0.5).ceil()) as i32;
        assert_eq!(rows, want, "{:?}", (p1, p2, p3));
    }
}
