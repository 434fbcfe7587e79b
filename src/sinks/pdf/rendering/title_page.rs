//! Title page rendering.
//!
//! The title page is also where the outline's "Table of Contents" root points;
//! there is no rendered listing of the sections.

use crate::sinks::pdf::config::PDF;
use crate::sinks::pdf::layout::{Align, Document, Mm};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Format of the generation timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn render<Tz>(
    config: &PDF,
    doc: &mut Document,
    file_count: usize,
    generated_at: &DateTime<Tz>,
) where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let row = Mm(10.0).into();

    doc.add_page();
    doc.set_font(config.heading_font());
    doc.paragraph(row, &config.title, Align::Centre);

    doc.set_font(config.body_font());
    doc.line(
        row,
        &format!("Generated on: {}", generated_at.format(TIMESTAMP_FORMAT)),
        Align::Centre,
    );
    doc.line(row, &format!("Total Files: {file_count}"), Align::Centre);
    doc.skip(Mm(10.0).into());
}
