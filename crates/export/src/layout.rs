//! Page layout in PDF points.
//!
//! Pages are US Letter (612 x 792 pt) with 40 pt margins, leaving a 520 pt text column. Lines
//! are word-wrapped by an estimated character budget for Helvetica and flow onto a new page
//! when the bottom margin is reached.

use lmn_core::{Block, RenderedLetter};

pub(crate) const PAGE_WIDTH_PT: f32 = 612.0;
pub(crate) const PAGE_HEIGHT_PT: f32 = 792.0;
pub(crate) const MARGIN_PT: f32 = 40.0;
const TEXT_WIDTH_PT: f32 = 520.0;

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Heading,
    Bold,
    Body,
}

impl TextStyle {
    pub fn size(self) -> f32 {
        match self {
            TextStyle::Title => 18.0,
            TextStyle::Heading => 13.0,
            TextStyle::Bold | TextStyle::Body => 11.0,
        }
    }

    fn leading(self) -> f32 {
        self.size() * 1.4
    }

    pub fn is_bold(self) -> bool {
        !matches!(self, TextStyle::Body)
    }
}

/// One line of text at a fixed position, `x`/`y` in points from the bottom-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub style: TextStyle,
    pub x: f32,
    pub y: f32,
}

struct Cursor {
    pages: Vec<Vec<PlacedLine>>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT_PT - MARGIN_PT,
        }
    }

    fn place(&mut self, text: String, style: TextStyle, indent: f32) {
        let leading = style.leading();
        if self.y - leading < MARGIN_PT {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT_PT - MARGIN_PT;
        }
        self.y -= leading;
        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedLine {
                text,
                style,
                x: MARGIN_PT + indent,
                y: self.y,
            });
        }
    }

    fn gap(&mut self, points: f32) {
        self.y -= points;
    }

    fn wrapped(&mut self, text: &str, style: TextStyle, indent: f32) {
        let width = TEXT_WIDTH_PT - indent;
        let max_chars = (width / (style.size() * AVG_GLYPH_WIDTH)).floor() as usize;
        for source_line in text.lines() {
            for line in wrap_text(source_line, max_chars) {
                self.place(line, style, indent);
            }
        }
    }
}

/// Lays out the letter into pages of positioned lines.
pub fn layout_pages(letter: &RenderedLetter) -> Vec<Vec<PlacedLine>> {
    let mut cursor = Cursor::new();
    cursor.wrapped(&letter.title, TextStyle::Title, 0.0);
    if !letter.date.is_empty() {
        cursor.wrapped(&letter.date, TextStyle::Body, 0.0);
    }

    for section in letter.sections.iter().filter(|s| !s.blocks.is_empty()) {
        cursor.gap(TextStyle::Body.size());
        for block in &section.blocks {
            match block {
                Block::Heading(text) => {
                    cursor.gap(4.0);
                    cursor.wrapped(text, TextStyle::Heading, 0.0);
                }
                Block::Strong(text) => cursor.wrapped(text, TextStyle::Bold, 0.0),
                Block::Line(text) => cursor.wrapped(text, TextStyle::Body, 0.0),
                Block::Paragraph(text) => {
                    cursor.wrapped(text, TextStyle::Body, 0.0);
                    cursor.gap(4.0);
                }
                Block::Bullet(text) => {
                    cursor.wrapped(&format!("- {text}"), TextStyle::Body, 12.0);
                }
            }
        }
    }
    cursor.pages
}

/// Greedy word wrap. Always returns at least one (possibly empty) line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
