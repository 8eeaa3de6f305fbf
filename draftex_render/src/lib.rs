//! Render pass consuming `draftex_layout`'s computed boxes against the abstract drawing surface
//! of §6. The core never touches pixels directly; a GUI driver supplies its own [`Canvas`].

pub mod canvas;
pub mod pass;

pub use canvas::{Canvas, Color, FontHandle, Rect};
pub use pass::render;

#[cfg(test)]
mod tests {
    use super::*;
    use draftex_layout::{layout, HeadlessMetrics, LayoutContext};
    use draftex_tree::{kinds, list, Font, Mode, NodeRef, Point};

    /// A [`Canvas`] that records every call instead of drawing anything, for assertions.
    #[derive(Default)]
    struct RecordingCanvas {
        lines: Vec<(Point, String)>,
        current_color: Option<Color>,
        shift: Point,
        next_handle: u32,
    }

    impl Canvas for RecordingCanvas {
        fn font(&mut self, _font: Font, _pt: f32) -> FontHandle {
            self.next_handle += 1;
            FontHandle(self.next_handle)
        }

        fn offset(&self, _handle: FontHandle, text: &str) -> f32 {
            text.chars().count() as f32
        }

        fn ptsize(&self, _size: draftex_tree::FontSize) -> f32 {
            10.0
        }

        fn draw_line(&mut self, origin: Point, text: &str, _handle: FontHandle) {
            let absolute = Point { x: origin.x + self.shift.x, y: origin.y + self.shift.y };
            self.lines.push((absolute, text.to_string()));
        }

        fn fill(&mut self, _rect: Rect) {}

        fn set(&mut self, color: Color) {
            self.current_color = Some(color);
        }

        fn shift(&mut self, delta: Point) {
            self.shift.x += delta.x;
            self.shift.y += delta.y;
        }
    }

    #[test]
    fn renders_each_word_in_its_own_paragraph_position() {
        let root = NodeRef::new_group(kinds::ROOT);
        let par1 = NodeRef::new_group(kinds::PAR);
        list::append(&par1, NodeRef::new_text("hello", Font::text(), Mode::Text));
        let par2 = NodeRef::new_group(kinds::PAR);
        list::append(&par2, NodeRef::new_text("world", Font::text(), Mode::Text));
        list::append(&root, par1);
        list::append(&root, par2);

        let mut ctx = LayoutContext::new(HeadlessMetrics::default(), 10.0);
        layout(&root, &mut ctx, 200.0);

        let mut canvas = RecordingCanvas::default();
        render(&root, &ctx, &mut canvas);

        assert_eq!(canvas.lines.len(), 2);
        assert_eq!(canvas.lines[0].1, "hello");
        assert_eq!(canvas.lines[1].1, "world");
        assert!(canvas.lines[1].0.y > canvas.lines[0].0.y);
    }

    #[test]
    fn section_heading_draws_a_numeric_prefix() {
        let root = NodeRef::new_group(kinds::ROOT);
        let section = NodeRef::new_group("section");
        list::append(&section, NodeRef::new_text("Intro", Font::text(), Mode::Text));
        list::append(&root, section);

        let mut ctx = LayoutContext::new(HeadlessMetrics::default(), 10.0);
        layout(&root, &mut ctx, 200.0);

        let mut canvas = RecordingCanvas::default();
        render(&root, &ctx, &mut canvas);

        assert_eq!(canvas.lines[0].1, "1 ");
        assert_eq!(canvas.lines[1].1, "Intro");
    }
}
