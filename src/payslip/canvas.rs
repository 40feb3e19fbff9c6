//! A minimal text-and-rules drawing surface on top of a PDF content stream.

use pdf_writer::{Content, Name, Str};

/// Regular font resource name.
pub(crate) const REGULAR: Name<'static> = Name(b"F1");
/// Bold font resource name.
pub(crate) const BOLD: Name<'static> = Name(b"F2");

/// Which of the two page fonts to draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Weight {
    Regular,
    Bold,
}

impl Weight {
    fn resource(self) -> Name<'static> {
        match self {
            Weight::Regular => REGULAR,
            Weight::Bold => BOLD,
        }
    }
}

/// Replaces anything outside printable ASCII with `?`.
///
/// The built-in Type 1 fonts have no glyphs for other characters.
pub(crate) fn to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect()
}

/// Approximate Helvetica advance width in thousandths of an em.
fn glyph_width(c: char, weight: Weight) -> u32 {
    match (c, weight) {
        ('0'..='9', _) => 556,
        ('.' | ',' | ' ', _) => 278,
        ('-', _) => 333,
        ('A'..='Z', Weight::Regular) => 667,
        ('A'..='Z', Weight::Bold) => 722,
        _ => 556,
    }
}

/// Estimated rendered width of `text` in points.
pub(crate) fn text_width(text: &str, size: f32, weight: Weight) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c, weight)).sum();
    units as f32 * size / 1000.0
}

/// Cursor-based writer for a single page.
///
/// `y` starts at the top margin and moves down as lines are written.
pub(crate) struct Canvas {
    content: Content,
    y: f32,
}

impl Canvas {
    pub(crate) fn new(top: f32) -> Self {
        Self {
            content: Content::new(),
            y: top,
        }
    }

    pub(crate) fn y(&self) -> f32 {
        self.y
    }

    /// Moves the cursor down by `amount` points.
    pub(crate) fn advance(&mut self, amount: f32) {
        self.y -= amount;
    }

    /// Draws text with its left edge at `x` on the current line.
    pub(crate) fn text(&mut self, x: f32, text: &str, size: f32, weight: Weight) {
        let text = to_ascii(text);
        self.content.begin_text();
        self.content.set_font(weight.resource(), size);
        self.content.next_line(x, self.y);
        self.content.show(Str(text.as_bytes()));
        self.content.end_text();
    }

    /// Draws text with its right edge at `right` on the current line.
    pub(crate) fn text_right(&mut self, right: f32, text: &str, size: f32, weight: Weight) {
        let width = text_width(&to_ascii(text), size, weight);
        self.text(right - width, text, size, weight);
    }

    /// Draws a horizontal rule slightly below the current line.
    pub(crate) fn rule(&mut self, from: f32, to: f32) {
        let y = self.y - 4.0;
        self.content.set_line_width(0.5);
        self.content.move_to(from, y);
        self.content.line_to(to, y);
        self.content.stroke();
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.content.finish()
    }
}
