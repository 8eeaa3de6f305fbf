//! The rendering context's font-metric callbacks and numbering state (§4.6, §6).

use draftex_tree::{FontFamily, FontSize};

/// Advance-width lookups, the one thing layout needs from a real font backend.
///
/// The core ships a [`HeadlessMetrics`] for headless use (tests, the `layout` CLI subcommand);
/// a GUI driver would supply its own implementation backed by real glyph metrics.
pub trait Metrics {
    /// The advance width of `text` set in `family` at `pt` points.
    fn offset(&self, family: FontFamily, text: &str, pt: f32) -> f32;
}

/// A metrics backend with no real font: each character advances a fixed fraction of the point
/// size. Deterministic, which is exactly what the `layout` subcommand and this crate's tests
/// want.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessMetrics {
    /// Advance width of one character, as a fraction of the point size.
    pub char_width_em: f32,
}

impl Default for HeadlessMetrics {
    fn default() -> Self {
        Self { char_width_em: 0.5 }
    }
}

impl Metrics for HeadlessMetrics {
    fn offset(&self, _family: FontFamily, text: &str, pt: f32) -> f32 {
        text.chars().count() as f32 * pt * self.char_width_em
    }
}

/// Nested section/subsection numbering (§4.6.1): a subsection numbers within its enclosing
/// section (`"1.1 "`, `"1.2 "`, ...), so `subsection` resets whenever `section` advances.
#[derive(Default)]
struct Numbering {
    section: u32,
    subsection: u32,
}

impl Numbering {
    fn prefix(&mut self, kind: &str) -> Option<String> {
        match kind {
            "section" => {
                self.section += 1;
                self.subsection = 0;
                Some(format!("{} ", self.section))
            }
            "subsection" => {
                self.subsection += 1;
                Some(format!("{}.{} ", self.section, self.subsection))
            }
            _ => None,
        }
    }
}

/// Per-layout-pass state threaded down the recursion (§9: a plain struct replacing the source's
/// scoped-guard parameter stack).
pub struct LayoutContext<M: Metrics> {
    pub metrics: M,
    numbering: Numbering,
    /// The base point size from which every [`FontSize`] step is derived.
    pub key_size: f32,
}

impl<M: Metrics> LayoutContext<M> {
    pub fn new(metrics: M, key_size: f32) -> Self {
        Self { metrics, numbering: Numbering::default(), key_size }
    }

    /// Convert a `FontSize` step to concrete points, scaling around `key_size`.
    pub fn ptsize(&self, size: FontSize) -> f32 {
        let scale = match size {
            FontSize::ScriptScript => 0.5,
            FontSize::Script => 0.7,
            FontSize::Footnote => 0.85,
            FontSize::Normal => 1.0,
            FontSize::Large => 1.2,
            FontSize::Huge => 1.5,
        };
        self.key_size * scale
    }

    /// Reset numbering to the start of the document. Called by `layout()` before every size
    /// pass so an edit that adds or removes a heading doesn't leave a previous pass's counts
    /// dangling.
    pub fn reset_numbering(&mut self) {
        self.numbering = Numbering::default();
    }

    /// The formatted numeric prefix for a heading of `kind` (`"section"`/`"subsection"`),
    /// advancing the nested counter. `None` for kinds that aren't numbered (title/author).
    pub fn heading_prefix(&mut self, kind: &str) -> Option<String> {
        self.numbering.prefix(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ptsize_scales_around_key_size() {
        let ctx = LayoutContext::new(HeadlessMetrics::default(), 10.0);
        assert_eq!(ctx.ptsize(FontSize::Normal), 10.0);
        assert_eq!(ctx.ptsize(FontSize::Huge), 15.0);
    }

    #[test]
    fn subsection_numbering_nests_under_the_enclosing_section() {
        let mut ctx = LayoutContext::new(HeadlessMetrics::default(), 10.0);
        assert_eq!(ctx.heading_prefix("section").as_deref(), Some("1 "));
        assert_eq!(ctx.heading_prefix("subsection").as_deref(), Some("1.1 "));
        assert_eq!(ctx.heading_prefix("subsection").as_deref(), Some("1.2 "));
        assert_eq!(ctx.heading_prefix("section").as_deref(), Some("2 "));
        assert_eq!(ctx.heading_prefix("subsection").as_deref(), Some("2.1 "));
        assert!(ctx.heading_prefix("title").is_none());
    }

    #[test]
    fn reset_numbering_restarts_from_one() {
        let mut ctx = LayoutContext::new(HeadlessMetrics::default(), 10.0);
        ctx.heading_prefix("section");
        ctx.reset_numbering();
        assert_eq!(ctx.heading_prefix("section").as_deref(), Some("1 "));
    }
}
