//! Rendering abstraction layer.
//!
//! *The simulation never touches a pixel buffer directly.*
//! [`scene`] turns a room and the ECS world into a list of [`DrawCall`]s
//! (back-to-front) and hands them to a type that implements [`Renderer`].
//!
//! * Back-ends can be swapped without touching game logic.
//! * The blanket impl [`RendererExt`] adds `draw_frame` so call-sites stay
//!   short.

pub mod scene;
pub mod software;

pub use scene::Viewport;
pub use software::Software;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Axis-aligned rectangle in screen pixels; `w`/`h` may be zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ScreenRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// One tile cell of the room.
#[derive(Clone, Debug, PartialEq)]
pub struct TileSpan {
    pub rect: ScreenRect,
    pub color: Rgba,
}

/// One body's collision box.
#[derive(Clone, Debug, PartialEq)]
pub struct BodySpan {
    pub rect: ScreenRect,
    pub fill: Rgba,
    /// Edge colour; bright while grounded.
    pub outline: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Tile(TileSpan),
    Body(BodySpan),
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers forward it to their window; GPU back-ends can ignore
/// the slice because they never allocate it.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Solid rectangle, clipped to the frame.
    fn fill_rect(&mut self, rect: &ScreenRect, color: Rgba);

    /// One-pixel rectangle border, clipped to the frame.
    fn outline_rect(&mut self, rect: &ScreenRect, color: Rgba);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, calls: &[DrawCall], submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        for c in calls {
            match c {
                DrawCall::Tile(t) => self.fill_rect(&t.rect, t.color),
                DrawCall::Body(b) => {
                    self.fill_rect(&b.rect, b.fill);
                    self.outline_rect(&b.rect, b.outline);
                }
            }
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
