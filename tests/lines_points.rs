use softraster::{Bitmap,BlendMode,RenderState,Rgba32,SurfaceMut,Vertex};
use softraster::{draw_line,draw_point,get_pixel};

fn copy() -> RenderState {
    RenderState::with_blend(BlendMode::copy())
}

fn drawn(bmp: &Bitmap) -> Vec<(i32, i32)> {
    let mut out = vec![];
    for y in 0..16 {
        for x in 0..16 {
            if get_pixel(bmp, x, y) != Rgba32::transparent() {
                out.push((x, y));
            }
        }
    }
    out
}

#[test_log::test]
fn vertical_line_is_half_open() {
    let mut bmp = Bitmap::new(16, 16);
    let w = Rgba32::white();
    assert!(draw_line(&mut bmp, &copy(), None::<&Bitmap>, &Vertex::new(3.5, 0.5, w), &Vertex::new(3.5, 7.5, w)));
    let want: Vec<_> = (0..7).map(|y| (3, y)).collect();
    assert_eq!(drawn(&bmp), want);
}

#[test]
fn diagonal_is_one_pixel_per_row() {
    let mut bmp = Bitmap::new(16, 16);
    let w = Rgba32::white();
    draw_line(&mut bmp, &copy(), None::<&Bitmap>, &Vertex::new(1.5, 1.5, w), &Vertex::new(12.5, 12.5, w));
    let px = drawn(&bmp);
    assert!(px.len() >= 10 && px.len() <= 12, "{:?}", px);
    for w in px.windows(2) {
        assert_eq!(w[1].1, w[0].1 + 1);
        assert_eq!(w[1].0, w[0].0 + 1);
    }
}

#[test]
fn line_color_interpolates() {
    let mut bmp = Bitmap::new(16, 16);
    let a = Rgba32::new(1.0, 0.0, 0.0, 1.0);
    let b = Rgba32::new(0.0, 0.0, 1.0, 1.0);
    draw_line(&mut bmp, &copy(), None::<&Bitmap>, &Vertex::new(0.5, 4.5, a), &Vertex::new(15.5, 4.5, b));
    let first = get_pixel(&bmp, 0, 4);
    let last = get_pixel(&bmp, 14, 4);
    assert!(first.r > 0.9 && first.b < 0.1, "{:?}", first);
    assert!(last.b > 0.85 && last.r < 0.15, "{:?}", last);
    let mut prev = first.r;
    for x in 1..15 {
        let c = get_pixel(&bmp, x, 4);
        assert!(c.r <= prev, "{} {:?}", x, c);
        prev = c.r;
    }
}

#[test]
fn points_blend_and_clip() {
    let mut bmp = Bitmap::new(4, 4);
    bmp.clear(Rgba32::new(0.0, 0.0, 1.0, 1.0));
    bmp.set_clip(1, 1, 2, 2);
    let alpha = RenderState::with_blend(BlendMode::alpha());
    let red = Rgba32::new(1.0, 0.0, 0.0, 0.5);
    assert!(draw_point(&mut bmp, &alpha, None::<&Bitmap>, &Vertex::new(1.5, 1.5, red)));
    assert!(!draw_point(&mut bmp, &alpha, None::<&Bitmap>, &Vertex::new(0.5, 0.5, red)));
    let c = get_pixel(&bmp, 1, 1);
    assert!((c.r - 0.5).abs() < 0.01 && (c.b - 0.5).abs() < 0.01, "{:?}", c);
    assert_eq!(get_pixel(&bmp, 0, 0), Rgba32::new(0.0, 0.0, 1.0, 1.0));
}
