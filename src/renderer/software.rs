//! ---------------------------------------------------------------------------
//! Software (CPU) rect rasteriser
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * Draw calls arrive back-to-front, so later calls simply overwrite.
//! ---------------------------------------------------------------------------

use crate::renderer::{Renderer, Rgba, ScreenRect};

/// Background clear colour (dark blue-grey).
pub const CLEAR: Rgba = 0x0018_1C24;

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Software {
    /// Clip `r` to the frame; `None` when nothing is visible.
    fn clip(&self, r: &ScreenRect) -> Option<(usize, usize, usize, usize)> {
        if r.is_empty() {
            return None;
        }
        let x0 = r.x.max(0);
        let y0 = r.y.max(0);
        let x1 = (r.x + r.w).min(self.width as i32);
        let y1 = (r.y + r.h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }

    #[inline]
    fn hline(&mut self, y: i32, x0: i32, x1: i32, color: Rgba) {
        self.fill_rect(&ScreenRect::new(x0, y, x1 - x0, 1), color);
    }

    #[inline]
    fn vline(&mut self, x: i32, y0: i32, y1: i32, color: Rgba) {
        self.fill_rect(&ScreenRect::new(x, y0, 1, y1 - y0), color);
    }

    /// Finished pixels of the current frame.
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(CLEAR);
    }

    fn fill_rect(&mut self, rect: &ScreenRect, color: Rgba) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            let row = y * self.width;
            self.scratch[row + x0..row + x1].fill(color);
        }
    }

    fn outline_rect(&mut self, r: &ScreenRect, color: Rgba) {
        if r.is_empty() {
            return;
        }
        let (x1, y1) = (r.x + r.w, r.y + r.h);
        self.hline(r.y, r.x, x1, color);
        self.hline(y1 - 1, r.x, x1, color);
        self.vline(r.x, r.y, y1, color);
        self.vline(x1 - 1, r.y, y1, color);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}
