// Pixel-level drawing into 0x00RRGGBB framebuffers

use bresenham::Bresenham;

/// Pack an RGB color in [0, 1] into 0x00RRGGBB
#[inline]
pub fn pack_rgb(rgb: [f64; 3]) -> u32 {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(rgb[0]) << 16) | (channel(rgb[1]) << 8) | channel(rgb[2])
}

/// Unpack 0x00RRGGBB into RGB bytes
#[inline]
pub fn unpack_rgb(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

#[inline]
fn lerp_rgb(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Clip a segment to `[0, width) x [0, height)` (Liang-Barsky).
/// Returns the clipped endpoints and their parameters along the original segment.
pub fn clip_segment(
    start: (f64, f64),
    end: (f64, f64),
    width: usize,
    height: usize,
) -> Option<((f64, f64), (f64, f64), f64, f64)> {
    if ![start.0, start.1, end.0, end.1].iter().all(|c| c.is_finite()) {
        return None;
    }
    let (x_max, y_max) = (width as f64 - 1.0, height as f64 - 1.0);
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    for (p, q) in [
        (-dx, start.0),
        (dx, x_max - start.0),
        (-dy, start.1),
        (dy, y_max - start.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| (start.0 + t * dx, start.1 + t * dy);
    Some((at(t0), at(t1), t0, t1))
}

/// Draw a square brush centered on a pixel
pub fn draw_point(buffer: &mut [u32], x: isize, y: isize, size: usize,
                  width: usize, height: usize, color: u32) {
    let half = (size / 2) as isize;
    for py in (y - half)..(y - half + size as isize) {
        if py < 0 || py as usize >= height {
            continue;
        }
        for px in (x - half)..(x - half + size as isize) {
            if px < 0 || px as usize >= width {
                continue;
            }
            buffer[py as usize * width + px as usize] = color;
        }
    }
}

/// Draw a clipped line whose color blends from `start_color` to `end_color`
pub fn draw_line(
    buffer: &mut [u32],
    start: (f64, f64),
    end: (f64, f64),
    start_color: [f64; 3],
    end_color: [f64; 3],
    line_width: usize,
    width: usize,
    height: usize,
) {
    let Some((a, b, t0, t1)) = clip_segment(start, end, width, height) else {
        return;
    };

    let from = (a.0.round() as isize, a.1.round() as isize);
    let to = (b.0.round() as isize, b.1.round() as isize);
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).max(1) as f64;
    let uniform = start_color == end_color;
    let solid = pack_rgb(start_color);

    // Bresenham skips the final pixel, so draw it explicitly
    let pixels = Bresenham::new(from, to).chain(std::iter::once(to));
    for (step, (x, y)) in pixels.enumerate() {
        let color = if uniform {
            solid
        } else {
            let t = t0 + (t1 - t0) * (step as f64 / steps).min(1.0);
            pack_rgb(lerp_rgb(start_color, end_color, t))
        };
        draw_point(buffer, x, y, line_width, width, height, color);
    }
}
