//! A small flowing page-layout engine.
//!
//! Text is laid out top to bottom through a cursor. Each call places one or
//! more lines of a given height; when the next line would cross the bottom
//! margin a fresh page is started automatically. Pages only hold positioned
//! text spans, and are turned into PDF objects by [`Document::finish`].
//!
//! All vertical positions are measured downwards from the top edge of the
//! page. They are flipped into PDF user space only when the pages are
//! written out.

use crate::sinks::pdf::fonts::{self, FontId, SpanFont};
use pdf_writer::{Content, Pdf, Rect, Ref, Str, TextStr};

/// A length in PDF points (1/72 inch).
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Pt(pub f32);

/// A length in millimetres.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Mm(pub f32);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * 72.0 / 25.4)
    }
}

/// Horizontal placement of a single line within the text area.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Centre,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    /// Also the automatic page break trigger
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    pub fn all(margin: Pt) -> Margins {
        Margins {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }
}

/// A run of text placed at a fixed position.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub text: String,
    pub font: SpanFont,
    pub x: Pt,
    /// Baseline, measured from the top of the page
    pub y: Pt,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub spans: Vec<Span>,
}

impl Page {
    /// The page's text, one span per line, in placement order.
    #[cfg(test)]
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.spans.iter().map(|span| span.text.as_str())
    }
}

/// Document properties written into the PDF info dictionary.
#[derive(Clone, Debug, Default)]
pub struct Info {
    pub title: Option<String>,
    pub creator: Option<String>,
}

impl Info {
    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn creator<S: ToString>(&mut self, creator: S) -> &mut Self {
        self.creator = Some(creator.to_string());
        self
    }
}

#[derive(Debug)]
pub struct Document {
    pub page_size: (Pt, Pt),
    pub margins: Margins,
    /// Horizontal padding inside the text area on both sides of every line
    pub padding: Pt,
    pub font: SpanFont,
    info: Info,
    pages: Vec<Page>,
    cursor: Pt,
}

impl Document {
    pub fn new(page_size: (Pt, Pt), margins: Margins, font: SpanFont) -> Document {
        Document {
            page_size,
            margins,
            padding: Mm(1.0).into(),
            font,
            info: Info::default(),
            pages: Vec::default(),
            cursor: margins.top,
        }
    }

    pub fn set_info(&mut self, info: Info) {
        self.info = info;
    }

    pub fn set_font(&mut self, font: SpanFont) {
        self.font = font;
    }

    /// Start a new page and move the cursor to its top margin.
    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = self.margins.top;
    }

    /// The 1-based number of the page currently being filled (0 before the first page).
    pub fn page_no(&self) -> usize {
        self.pages.len()
    }

    #[cfg(test)]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Width available to text between the margins and padding.
    pub fn text_width(&self) -> Pt {
        Pt(self.page_size.0 .0
            - self.margins.left.0
            - self.margins.right.0
            - 2.0 * self.padding.0)
    }

    /// How many characters of the current font fit on one line.
    pub fn chars_per_line(&self) -> usize {
        let per_char = self.font.char_width().0;
        if per_char <= 0.0 {
            return usize::MAX;
        }
        ((self.text_width().0 / per_char).floor() as usize).max(1)
    }

    /// Move the cursor down without placing anything. Never breaks the page.
    pub fn skip(&mut self, height: Pt) {
        self.cursor = Pt(self.cursor.0 + height.0);
    }

    /// Place a single line of text in a row `height` tall.
    pub fn line(&mut self, height: Pt, text: &str, align: Align) {
        self.break_if_needed(height);

        let text_width = fonts::width_of_text(text, self.font);
        let x = match align {
            Align::Left => self.margins.left.0 + self.padding.0,
            Align::Centre => {
                self.margins.left.0 + self.padding.0 + (self.text_width().0 - text_width.0) / 2.0
            }
        };
        // vertically centred in the row, as a cell would be
        let y = self.cursor.0 + height.0 / 2.0 + 0.3 * self.font.size.0;

        let font = self.font;
        if let Some(page) = self.pages.last_mut() {
            page.spans.push(Span {
                text: text.to_string(),
                font,
                x: Pt(x),
                y: Pt(y),
            });
        }
        self.cursor = Pt(self.cursor.0 + height.0);
    }

    /// Place `text` as a paragraph, wrapping it across as many rows as needed.
    pub fn paragraph(&mut self, height: Pt, text: &str, align: Align) {
        for line in wrap_text(text, self.chars_per_line()) {
            self.line(height, &line, align);
        }
    }

    fn break_if_needed(&mut self, height: Pt) {
        let trigger = self.page_size.1 .0 - self.margins.bottom.0;
        if self.pages.is_empty() || self.cursor.0 + height.0 > trigger {
            self.add_page();
        }
    }

    /// Serialise the laid out pages into a complete PDF file.
    pub fn finish(&self) -> Vec<u8> {
        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let page_tree_id = alloc.bump();
        let font_ids: Vec<(FontId, Ref)> = FontId::all()
            .iter()
            .map(|font| (*font, alloc.bump()))
            .collect();
        let page_ids: Vec<Ref> = self.pages.iter().map(|_| alloc.bump()).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        for (font, id) in font_ids.iter() {
            pdf.type1_font(*id)
                .base_font(font.base_font())
                .encoding_predefined(fonts::ENCODING);
        }

        let (width, height) = self.page_size;
        for (page, page_id) in self.pages.iter().zip(page_ids.iter()) {
            let content_id = alloc.bump();

            let mut writer = pdf.page(*page_id);
            writer.media_box(Rect::new(0.0, 0.0, width.0, height.0));
            writer.parent(page_tree_id);
            writer.contents(content_id);
            {
                let mut resources = writer.resources();
                let mut font_dict = resources.fonts();
                for (font, id) in font_ids.iter() {
                    font_dict.pair(font.resource_name(), *id);
                }
            }
            pdf_writer::Finish::finish(writer);

            let mut content = Content::new();
            for span in page.spans.iter() {
                content.begin_text();
                content.set_font(span.font.id.resource_name(), span.font.size.0);
                content.next_line(span.x.0, height.0 - span.y.0);
                content.show(Str(&fonts::encode_win_ansi(&span.text)));
                content.end_text();
            }
            pdf.stream(content_id, &content.finish());
        }

        if self.info.title.is_some() || self.info.creator.is_some() {
            let info_id = alloc.bump();
            let mut info = pdf.document_info(info_id);
            if let Some(title) = &self.info.title {
                info.title(TextStr(title));
            }
            if let Some(creator) = &self.info.creator {
                info.creator(TextStr(creator));
            }
        }

        pdf.finish()
    }
}

/// Break `text` into lines of at most `max_chars` characters.
///
/// Lines break at the last space that fits, which is dropped. A run with no
/// space in it is cut at the character limit instead. Empty text still yields
/// one (empty) line so blank lines keep their height.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();

    let mut start = 0;
    while chars.len() - start > max_chars {
        let window = &chars[start..=start + max_chars];
        match window.iter().rposition(|c| *c == ' ') {
            Some(space) if space > 0 => {
                lines.push(window[..space].iter().collect());
                start += space + 1;
            }
            _ => {
                lines.push(window[..max_chars].iter().collect());
                start += max_chars;
            }
        }
    }
    lines.push(chars[start..].iter().collect());

    lines
}
