//! Line wrapping and pagination.
//!
//! Glyph widths are approximated per weight as a fraction of an em, which is
//! close enough for Helvetica and DejaVu Sans at body sizes.

use super::hyphenate::{strip_soft_hyphens, GermanHyphenator, SOFT_HYPHEN};
use super::model::Block;

/// Points to millimetres.
pub const PT_TO_MM: f32 = 0.3528;

/// Width of the label column in tables.
const TABLE_KEY_WIDTH_MM: f32 = 50.0;

/// Page geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
}

impl Default for Geometry {
    /// A4 with 2 cm margins.
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
        }
    }
}

impl Geometry {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    fn bottom(&self) -> f32 {
        self.page_height - self.margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

impl Weight {
    /// Average glyph advance as a fraction of the font size.
    fn glyph_em(self) -> f32 {
        match self {
            Self::Regular => 0.5,
            Self::Bold => 0.58,
        }
    }
}

/// A line of text at a fixed position.
///
/// `baseline` is measured from the top edge of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub size_pt: f32,
    pub weight: Weight,
}

/// One laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<PlacedText>,
}

#[derive(Debug, Clone, Copy)]
struct Style {
    size_pt: f32,
    weight: Weight,
    leading_pt: f32,
    /// Space above the block in mm, dropped at the top of a page
    space_before: f32,
    centered: bool,
}

impl Style {
    /// Line advance in mm.
    fn leading(&self) -> f32 {
        self.leading_pt * PT_TO_MM
    }

    /// Average glyph advance in mm.
    fn glyph_width(&self) -> f32 {
        self.size_pt * PT_TO_MM * self.weight.glyph_em()
    }

    fn max_chars(&self, width_mm: f32) -> usize {
        ((width_mm / self.glyph_width()).floor() as usize).max(1)
    }
}

const TITLE: Style = Style {
    size_pt: 24.0,
    weight: Weight::Bold,
    leading_pt: 30.0,
    space_before: 0.0,
    centered: true,
};
const HEADING1: Style = Style {
    size_pt: 18.0,
    weight: Weight::Bold,
    leading_pt: 22.0,
    space_before: 6.0,
    centered: false,
};
const HEADING2: Style = Style {
    size_pt: 14.0,
    weight: Weight::Bold,
    leading_pt: 18.0,
    space_before: 5.0,
    centered: false,
};
const HEADING3: Style = Style {
    size_pt: 12.0,
    weight: Weight::Bold,
    leading_pt: 15.0,
    space_before: 3.0,
    centered: false,
};
const BODY: Style = Style {
    size_pt: 10.0,
    weight: Weight::Regular,
    leading_pt: 14.0,
    space_before: 0.0,
    centered: false,
};
const TABLE: Style = Style {
    size_pt: 12.0,
    weight: Weight::Regular,
    leading_pt: 18.0,
    space_before: 0.0,
    centered: false,
};

/// Number of visible characters, ignoring soft hyphens.
fn visible_len(text: &str) -> usize {
    text.chars().filter(|&c| c != SOFT_HYPHEN).count()
}

/// Last soft hyphen in `word` whose prefix plus a `-` fits into `room`.
fn split_at_soft_hyphen(word: &str, room: usize) -> Option<(&str, &str)> {
    word.char_indices()
        .filter(|&(_, c)| c == SOFT_HYPHEN)
        .map(|(i, _)| (i, visible_len(&word[..i])))
        .filter(|&(_, len)| len >= 1 && len + 1 <= room)
        .last()
        .map(|(i, _)| (&word[..i], &word[i + SOFT_HYPHEN.len_utf8()..]))
}

/// Split after `max` visible characters.
fn split_visible(word: &str, max: usize) -> (&str, &str) {
    let mut seen = 0;
    for (i, c) in word.char_indices() {
        if c == SOFT_HYPHEN {
            continue;
        }
        if seen == max {
            return (&word[..i], &word[i..]);
        }
        seen += 1;
    }
    (word, "")
}

/// Greedy word wrap to at most `max_chars` visible characters per line.
///
/// Newlines start a new line. Soft hyphens become `-` where a word is
/// broken and vanish elsewhere. Words longer than a line with no usable
/// break point are split hard.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let mut rest = word;
            loop {
                let rest_len = visible_len(rest);
                let gap = usize::from(line_len > 0);

                if line_len + gap + rest_len <= max {
                    if gap == 1 {
                        line.push(' ');
                    }
                    line.push_str(&strip_soft_hyphens(rest));
                    line_len += gap + rest_len;
                    break;
                }

                let room = max.saturating_sub(line_len + gap);
                if let Some((head, tail)) = split_at_soft_hyphen(rest, room) {
                    if gap == 1 {
                        line.push(' ');
                    }
                    line.push_str(&strip_soft_hyphens(head));
                    line.push('-');
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                    rest = tail;
                    continue;
                }

                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                    continue;
                }

                let (head, tail) = split_visible(rest, max);
                lines.push(strip_soft_hyphens(head));
                rest = tail;
            }
        }

        lines.push(line);
    }

    lines
}

/// Places blocks onto pages.
pub struct Layout<'a> {
    geometry: Geometry,
    hyphenator: Option<&'a GermanHyphenator>,
    pages: Vec<Page>,
    current: Page,
    cursor: f32,
}

impl<'a> Layout<'a> {
    pub fn new(geometry: Geometry, hyphenator: Option<&'a GermanHyphenator>) -> Self {
        Self {
            geometry,
            hyphenator,
            pages: Vec::new(),
            current: Page::default(),
            cursor: geometry.margin,
        }
    }

    /// Lay out a whole story.
    pub fn run(mut self, story: &[Block]) -> Vec<Page> {
        for block in story {
            self.block(block);
        }
        self.pages.push(self.current);
        self.pages
    }

    fn block(&mut self, block: &Block) {
        let width = self.geometry.content_width();
        match block {
            Block::Spacer(mm) => {
                self.cursor += mm;
                if self.cursor > self.geometry.bottom() {
                    self.new_page();
                }
            }
            Block::PageBreak => {
                if !self.current.items.is_empty() {
                    self.new_page();
                }
            }
            Block::Title(text) => self.text(text, TITLE, self.geometry.margin, width),
            Block::Heading1(text) => self.text(text, HEADING1, self.geometry.margin, width),
            Block::Heading2(text) => self.text(text, HEADING2, self.geometry.margin, width),
            Block::Heading3(text) => self.text(text, HEADING3, self.geometry.margin, width),
            Block::Paragraph { text, hyphenate } => {
                let text = match (*hyphenate, self.hyphenator) {
                    (true, Some(h)) => h.hyphenate_text(text),
                    _ => text.clone(),
                };
                self.text(&text, BODY, self.geometry.margin, width);
            }
            Block::KeyValueTable(rows) => {
                let value_x = self.geometry.margin + TABLE_KEY_WIDTH_MM;
                let value_width = width - TABLE_KEY_WIDTH_MM;
                for (key, value) in rows {
                    let value_lines = wrap(value, TABLE.max_chars(value_width));
                    self.ensure_room(TABLE.leading());
                    self.place(key.clone(), self.geometry.margin, TABLE);
                    for line in value_lines {
                        self.ensure_room(TABLE.leading());
                        self.place(line, value_x, TABLE);
                        self.cursor += TABLE.leading();
                    }
                }
            }
        }
    }

    fn text(&mut self, text: &str, style: Style, x: f32, width: f32) {
        if !self.current.items.is_empty() {
            self.cursor += style.space_before;
        }
        for line in wrap(text, style.max_chars(width)) {
            self.ensure_room(style.leading());
            let x = if style.centered {
                let line_width = visible_len(&line) as f32 * style.glyph_width();
                self.geometry.margin + ((width - line_width) / 2.0).max(0.0)
            } else {
                x
            };
            self.place(line, x, style);
            self.cursor += style.leading();
        }
    }

    fn place(&mut self, text: String, x: f32, style: Style) {
        if text.is_empty() {
            return;
        }
        self.current.items.push(PlacedText {
            text,
            x,
            baseline: self.cursor + style.size_pt * PT_TO_MM,
            size_pt: style.size_pt,
            weight: style.weight,
        });
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor + height > self.geometry.bottom() {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = self.geometry.margin;
    }
}
