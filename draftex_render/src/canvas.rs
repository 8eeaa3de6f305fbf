//! The abstract drawing surface the core renders against (§6).
//!
//! A real GUI driver backs this with its own glyph cache and paint calls; the core only ever
//! talks to the small set of primitives here, the same way `draftex_layout::Metrics` is the only
//! font-backend contact point layout needs.

use draftex_tree::{Font, Point};

/// An RGBA color, analogous to the teacher GUI's `iced::Color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    pub fn rgb(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b, a: 1.0 }
    }
}

/// An axis-aligned rectangle in the canvas's current (shifted) coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub width: f32,
    pub height: f32,
}

/// An opaque handle a [`Canvas`] hands back from [`Canvas::font`], to be replayed into
/// [`Canvas::offset`]/[`Canvas::draw_line`] without re-resolving the family/size pair each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontHandle(pub u32);

/// The rendering context consumed by the core (§6): `font`/`offset`/`drawLine`, `ptsize`, and the
/// primitive drawing trio `fill`/`set`/`shift`.
pub trait Canvas {
    /// Resolve a font for later use, analogous to a GUI backend's glyph-cache lookup.
    fn font(&mut self, font: Font, pt: f32) -> FontHandle;

    /// Advance width of `text` set in `handle`.
    fn offset(&self, handle: FontHandle, text: &str) -> f32;

    /// Convert a `FontSize` step to concrete points around the canvas's base size.
    fn ptsize(&self, size: draftex_tree::FontSize) -> f32;

    /// Draw `text` with its baseline at `origin`, in `handle`, using the current color.
    fn draw_line(&mut self, origin: Point, text: &str, handle: FontHandle);

    /// Fill `rect` with the current color (a `frac` bar, a selection highlight, ...).
    fn fill(&mut self, rect: Rect);

    /// Set the current drawing color for subsequent `draw_line`/`fill` calls.
    fn set(&mut self, color: Color);

    /// Translate the canvas's origin by `delta`, composing with any prior shift. Callers restore
    /// the prior origin themselves (the trait has no save/restore stack, mirroring §6's primitive
    /// trio exactly).
    fn shift(&mut self, delta: Point);
}
