//! The two fonts every book is set in.
//!
//! Reports are printed in the PDF base-14 Courier family so nothing has to be
//! embedded and every glyph has the same advance width. That fixed width is
//! what keeps right-aligned line numbers lined up and what lets the layout
//! engine wrap by character count.

use crate::sinks::pdf::layout::Pt;
use pdf_writer::Name;

/// Advance width of every Courier glyph, in ems.
pub const COURIER_ADVANCE_EM: f32 = 0.6;

/// Encoding declared on both fonts; [`encode_win_ansi`] produces bytes for it.
pub const ENCODING: Name<'static> = Name(b"WinAnsiEncoding");

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FontId {
    Regular,
    Bold,
}

impl FontId {
    pub fn all() -> &'static [FontId] {
        &[FontId::Regular, FontId::Bold]
    }

    /// Name of the font in each page's resource dictionary.
    pub fn resource_name(&self) -> Name<'static> {
        match self {
            FontId::Regular => Name(b"F1"),
            FontId::Bold => Name(b"F2"),
        }
    }

    pub fn base_font(&self) -> Name<'static> {
        match self {
            FontId::Regular => Name(b"Courier"),
            FontId::Bold => Name(b"Courier-Bold"),
        }
    }
}

/// A font together with the size it is set at.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpanFont {
    pub id: FontId,
    pub size: Pt,
}

impl SpanFont {
    pub fn regular(size: Pt) -> SpanFont {
        SpanFont {
            id: FontId::Regular,
            size,
        }
    }

    pub fn bold(size: Pt) -> SpanFont {
        SpanFont {
            id: FontId::Bold,
            size,
        }
    }

    pub fn char_width(&self) -> Pt {
        Pt(COURIER_ADVANCE_EM * self.size.0)
    }
}

/// Width of `text` when set in `font`.
pub fn width_of_text(text: &str, font: SpanFont) -> Pt {
    Pt(text.chars().count() as f32 * font.char_width().0)
}

/// Convert text to the single-byte WinAnsi encoding used by the base-14 fonts.
///
/// WinAnsi agrees with Latin-1 outside of 0x80..=0x9F; that block holds the
/// typographic punctuation mapped below. Anything else is shown as `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8a,
            '‹' => 0x8b,
            'Œ' => 0x8c,
            'Ž' => 0x8e,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9a,
            '›' => 0x9b,
            'œ' => 0x9c,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            _ => b'?',
        })
        .collect()
}
