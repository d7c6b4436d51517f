use crate::canvas::{BrushMask, BrushSet, Canvas, WHITE};
use crate::dna::{Solution, Stroke};

/// CPU compositor for brush strokes. owns the brush set so strokes only carry an index.
pub struct CpuRenderer {
    brushes: BrushSet,
}

impl CpuRenderer {
    pub fn new(brushes: BrushSet) -> Self {
        Self { brushes }
    }

    #[inline]
    pub fn brushes(&self) -> &BrushSet {
        &self.brushes
    }

    /// clear to white and paint every stroke back to front
    pub fn render(&self, solution: &Solution, canvas: &mut Canvas) {
        profiling::scope!("render");
        canvas.clear(WHITE);
        for stroke in solution.strokes() {
            self.draw(stroke, canvas);
        }
    }

    /// stamp one stroke onto the canvas over whatever is already there.
    /// strokes pointing at a brush that isn't loaded draw nothing.
    pub fn draw(&self, stroke: &Stroke, canvas: &mut Canvas) {
        profiling::scope!("draw_stroke");
        let Some(brush) = self.brushes.get(stroke.brush_index) else {
            return;
        };
        draw_stroke(canvas, brush, stroke);
    }
}

fn draw_stroke(canvas: &mut Canvas, brush: &BrushMask, stroke: &Stroke) {
    let (w, h) = (canvas.width as i32, canvas.height as i32);
    if w == 0 || h == 0 {
        return;
    }
    let (bw, bh) = (brush.width() as i32, brush.height() as i32);

    // brush's long side maps onto `base` pixels, aspect ratio preserved
    let base = ((stroke.size_rel * w.min(h) as f32).round() as i32).max(1);
    let s = base as f32 / bw.max(bh) as f32;
    let inv_s = 1.0 / s;

    let w_pix = ((bw as f32 * s).round() as i32).max(1);
    let h_pix = ((bh as f32 * s).round() as i32).max(1);
    let half_w = w_pix / 2;
    let half_h = h_pix / 2;

    let cx = ((stroke.x_rel * w as f32).round() as i32).clamp(0, w - 1);
    let cy = ((stroke.y_rel * h as f32).round() as i32).clamp(0, h - 1);

    let theta = stroke.rotation_deg.to_radians();
    let (st, ct) = theta.sin_cos();

    // brush half-extents in brush pixels; anything further out is outside the mask
    let ext_x = (bw - 1) as f32 * 0.5;
    let ext_y = (bh - 1) as f32 * 0.5;

    let fg = [stroke.color[0] as f32, stroke.color[1] as f32, stroke.color[2] as f32];

    // footprint clipped to the canvas
    let (dy_lo, dy_hi) = ((-half_h).max(-cy), half_h.min(h - 1 - cy));
    let (dx_lo, dx_hi) = ((-half_w).max(-cx), half_w.min(w - 1 - cx));

    for dy in dy_lo..=dy_hi {
        let y_dst = cy + dy;
        for dx in dx_lo..=dx_hi {
            let x_dst = cx + dx;

            // inverse rotation R(-theta), then inverse scale
            let xr = dx as f32 * ct + dy as f32 * st;
            let yr = -(dx as f32) * st + dy as f32 * ct;
            let xb = xr * inv_s;
            let yb = yr * inv_s;

            if xb.abs() > ext_x || yb.abs() > ext_y {
                continue;
            }

            let fu = to_texel(xb, bw);
            let fv = to_texel(yb, bh);
            let a = brush.sample_bilinear(fu, fv);
            if a <= 0.0 {
                continue;
            }

            let idx = canvas.index(x_dst as u32, y_dst as u32);
            let px = &mut canvas.rgb[idx..idx + 3];
            for c in 0..3 {
                let out = a * fg[c] + (1.0 - a) * px[c] as f32;
                px[c] = (out.round() as i32).clamp(0, 255) as u8;
            }
        }
    }
}

/// brush-local offset (centered on 0) -> normalized [0,1] -> fractional texel coordinate.
/// a single-texel axis always samples texel 0.
#[inline]
fn to_texel(offset: f32, extent: i32) -> f32 {
    if extent <= 1 {
        return 0.0;
    }
    let span = (extent - 1) as f32;
    let t = offset / span + 0.5;
    t * span
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer_with(mask: BrushMask) -> CpuRenderer {
        CpuRenderer::new(BrushSet::new(vec![mask]).unwrap())
    }

    #[test]
    fn test_transparent_mask_leaves_canvas_white() {
        let r = renderer_with(BrushMask::filled(8, 8, 0).unwrap());
        let sol = Solution::new(vec![Stroke::new(0.5, 0.5, 1.0, 30.0, 0, [10, 20, 30])]);
        let mut c = Canvas::new(16, 12);
        r.render(&sol, &mut c);
        assert_eq!(c, Canvas::new(16, 12));
    }

    #[test]
    fn test_opaque_full_coverage_stroke_fills_canvas() {
        // 8x8 opaque mask at size 2.0 on a 4x4 canvas: base = 8, s = 1,
        // so every canvas pixel sits within the mask's 3.5px half-extent
        let r = renderer_with(BrushMask::filled(8, 8, 255).unwrap());
        let sol = Solution::new(vec![Stroke::new(0.5, 0.5, 2.0, 0.0, 0, [12, 200, 77])]);
        let mut c = Canvas::new(4, 4);
        r.render(&sol, &mut c);
        for px in c.rgb.chunks_exact(3) {
            assert_eq!(px, &[12, 200, 77]);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let r = renderer_with(BrushMask::new(3, 2, vec![0, 128, 255, 255, 64, 0]).unwrap());
        let sol = Solution::new(vec![
            Stroke::new(0.3, 0.4, 0.6, 33.0, 0, [200, 10, 10]),
            Stroke::new(0.7, 0.6, 0.4, -120.0, 0, [10, 10, 200]),
        ]);
        let mut a = Canvas::new(20, 15);
        let mut b = Canvas::new(20, 15);
        r.render(&sol, &mut a);
        r.render(&sol, &mut b);
        assert_eq!(a.rgb, b.rgb);
    }

    #[test]
    fn test_render_clears_previous_contents() {
        let r = renderer_with(BrushMask::filled(4, 4, 0).unwrap());
        let mut c = Canvas::new(5, 5);
        c.clear([0, 0, 0]);
        r.render(&Solution::default(), &mut c);
        assert_eq!(c, Canvas::new(5, 5));
    }

    #[test]
    fn test_later_strokes_paint_over_earlier() {
        let r = renderer_with(BrushMask::filled(8, 8, 255).unwrap());
        let red = Stroke::new(0.5, 0.5, 2.0, 0.0, 0, [255, 0, 0]);
        let blue = Stroke::new(0.5, 0.5, 2.0, 0.0, 0, [0, 0, 255]);
        let mut c = Canvas::new(4, 4);

        r.render(&Solution::new(vec![red, blue]), &mut c);
        assert_eq!(c.pixel(1, 1), [0, 0, 255]);

        r.render(&Solution::new(vec![blue, red]), &mut c);
        assert_eq!(c.pixel(1, 1), [255, 0, 0]);
    }

    #[test]
    fn test_half_alpha_blends_toward_white() {
        let r = renderer_with(BrushMask::filled(8, 8, 128).unwrap());
        let sol = Solution::new(vec![Stroke::new(0.5, 0.5, 2.0, 0.0, 0, [0, 0, 0])]);
        let mut c = Canvas::new(4, 4);
        r.render(&sol, &mut c);
        // a = 128/255, out = (1 - a) * 255 = 127
        assert_eq!(c.pixel(2, 2), [127, 127, 127]);
    }

    #[test]
    fn test_unknown_brush_draws_nothing() {
        let r = renderer_with(BrushMask::filled(4, 4, 255).unwrap());
        let sol = Solution::new(vec![Stroke::new(0.5, 0.5, 1.0, 0.0, 3, [0, 0, 0])]);
        let mut c = Canvas::new(6, 6);
        r.render(&sol, &mut c);
        assert_eq!(c, Canvas::new(6, 6));
    }

    #[test]
    fn test_oversized_stroke_is_clipped_to_canvas() {
        // a size far beyond anything mutation produces, as a hand-edited solution could carry
        let r = renderer_with(BrushMask::filled(8, 8, 255).unwrap());
        let sol = Solution::new(vec![Stroke::new(0.5, 0.5, 1e8, 45.0, 0, [5, 6, 7])]);
        let mut c = Canvas::new(6, 4);
        r.render(&sol, &mut c);
        for px in c.rgb.chunks_exact(3) {
            assert_eq!(px, &[5, 6, 7]);
        }
    }

    #[test]
    fn test_small_stroke_stays_near_center() {
        let r = renderer_with(BrushMask::filled(2, 2, 255).unwrap());
        let sol = Solution::new(vec![Stroke::new(0.5, 0.5, 0.25, 0.0, 0, [0, 0, 0])]);
        let mut c = Canvas::new(16, 16);
        r.render(&sol, &mut c);
        // base = 4, s = 2, half extent 2 px around (8, 8); corners stay white
        assert_eq!(c.pixel(0, 0), WHITE);
        assert_eq!(c.pixel(15, 15), WHITE);
        assert_eq!(c.pixel(8, 8), [0, 0, 0]);
    }
}
