use crate::sinks::pdf::fonts::SpanFont;
use crate::sinks::pdf::layout::{Margins, Mm, Pt};
use serde::{Deserialize, Serialize};

/// PDF output configuration.
///
/// Every page shares one margin on all sides; the bottom margin doubles as the
/// point where a full page breaks onto the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PDF {
    /// Heading printed at the top of the title page
    #[serde(default = "default_title")]
    pub title: String,
    /// Page width in millimetres
    #[serde(default = "default_page_width")]
    pub page_width_mm: f32,
    /// Page height in millimetres
    #[serde(default = "default_page_height")]
    pub page_height_mm: f32,
    /// Margin on every side of the page, in millimetres
    #[serde(default = "default_margin")]
    pub margin_mm: f32,
    /// Size of all text, in points
    #[serde(default = "default_font_size")]
    pub font_size_pt: f32,
}

fn default_title() -> String {
    "Coverage and Run Reports".to_string()
}
fn default_page_width() -> f32 {
    210.0
}
fn default_page_height() -> f32 {
    297.0
}
fn default_margin() -> f32 {
    10.0
}
fn default_font_size() -> f32 {
    10.0
}

impl Default for PDF {
    fn default() -> Self {
        PDF {
            title: default_title(),
            page_width_mm: default_page_width(),
            page_height_mm: default_page_height(),
            margin_mm: default_margin(),
            font_size_pt: default_font_size(),
        }
    }
}

impl PDF {
    pub fn page_size(&self) -> (Pt, Pt) {
        (Mm(self.page_width_mm).into(), Mm(self.page_height_mm).into())
    }

    pub fn margins(&self) -> Margins {
        Margins::all(Mm(self.margin_mm).into())
    }

    pub fn body_font(&self) -> SpanFont {
        SpanFont::regular(Pt(self.font_size_pt))
    }

    pub fn heading_font(&self) -> SpanFont {
        SpanFont::bold(Pt(self.font_size_pt))
    }
}

/// Statistics from rendering a PDF, used for user feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of pages in the output PDF
    pub page_count: usize,
    /// Number of report files that were given a section
    pub file_count: usize,
    /// Reports whose sections only hold a read error
    pub unreadable_files: usize,
    /// Number of outline entries, including the root
    pub bookmark_count: usize,
}
