//! Report file rendering.
//!
//! A report is printed line by line under a bold `File:` header, each line as
//! its own wrapped paragraph. A report that can't be read still gets its
//! section, holding a single line describing the error.

use crate::sinks::pdf::config::PDF;
use crate::sinks::pdf::layout::{Align, Document, Mm};
use crate::source::SourceFile;

/// Columns between tab stops when expanding tabs.
const TAB_WIDTH: usize = 4;

/// Result of rendering a report file.
pub struct RenderResult {
    /// Number of pages the section spans
    pub page_count: usize,
    /// The file couldn't be read and an error line was printed instead
    pub unreadable: bool,
}

/// Render `file` onto the page currently being filled.
///
/// The caller is responsible for starting the section's page.
pub fn render(
    config: &PDF,
    doc: &mut Document,
    file: &SourceFile,
    line_numbers: bool,
) -> RenderResult {
    let first_page = doc.page_no();
    let body_row = Mm(6.0).into();

    doc.set_font(config.heading_font());
    doc.line(Mm(10.0).into(), &format!("File: {}", file.name), Align::Left);
    doc.skip(Mm(5.0).into());

    doc.set_font(config.body_font());
    let unreadable = match std::fs::read_to_string(file.path()) {
        Ok(contents) => {
            for (i, line) in contents.lines().enumerate() {
                doc.paragraph(
                    body_row,
                    &format_line(i + 1, line, line_numbers),
                    Align::Left,
                );
            }
            false
        }
        Err(e) => {
            log::warn!("Failed to read {}: {e}", file.path().display());
            doc.paragraph(
                body_row,
                &format!("Error reading {}: {e}", file.name),
                Align::Left,
            );
            true
        }
    };

    doc.skip(Mm(10.0).into());

    RenderResult {
        page_count: doc.page_no() - first_page + 1,
        unreadable,
    }
}

/// Prepare one line of a report for printing, prefixing its 1-based number
/// when asked to.
pub fn format_line(number: usize, line: &str, line_numbers: bool) -> String {
    let line = expand_tabs(line);
    if line_numbers {
        format!("{number:>4} | {line}")
    } else {
        line
    }
}

fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }

    let mut expanded = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            expanded.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            expanded.push(c);
            column += 1;
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(config: &PDF) -> Document {
        let mut doc = Document::new(config.page_size(), config.margins(), config.body_font());
        doc.add_page();
        doc
    }

    #[test]
    fn formats_line_numbers_right_aligned() {
        assert_eq!(format_line(1, "hello", true), "   1 | hello");
        assert_eq!(format_line(42, "", true), "  42 | ");
        assert_eq!(format_line(12345, "x", true), "12345 | x");
        assert_eq!(format_line(7, "plain", false), "plain");
    }

    #[test]
    fn expands_tabs_to_stops() {
        assert_eq!(format_line(1, "\tx", false), "    x");
        assert_eq!(format_line(1, "ab\tc", false), "ab  c");
        assert_eq!(format_line(1, "abcd\te", false), "abcd    e");
    }

    #[test]
    fn renders_header_and_lines() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hello\r\nworld\n").expect("can write report");
        let config = PDF::default();
        let mut doc = document(&config);

        let result = render(&config, &mut doc, &SourceFile::new("a.txt", &path), true);

        assert_eq!(result.page_count, 1);
        assert!(!result.unreadable);
        assert_eq!(
            doc.pages()[0].lines().collect::<Vec<_>>(),
            vec!["File: a.txt", "   1 | hello", "   2 | world"]
        );
        assert_eq!(doc.pages()[0].spans[0].font, config.heading_font());
    }

    #[test]
    fn unreadable_file_renders_an_error_line() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).expect("can write report");
        let config = PDF::default();
        let mut doc = document(&config);

        let result = render(&config, &mut doc, &SourceFile::new("bad.txt", &path), false);

        assert!(result.unreadable);
        let lines: Vec<&str> = doc.pages()[0].lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "File: bad.txt");
        assert!(lines[1].starts_with("Error reading bad.txt: "));
    }

    #[test]
    fn missing_file_renders_an_error_line() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = PDF::default();
        let mut doc = document(&config);
        let file = SourceFile::new("gone.txt", dir.path().join("gone.txt"));

        let result = render(&config, &mut doc, &file, false);

        assert!(result.unreadable);
        assert!(doc.pages()[0].spans[1]
            .text
            .starts_with("Error reading gone.txt: "));
    }

    #[test]
    fn long_reports_spill_onto_more_pages() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("long.txt");
        let contents: String = (0..100).map(|i| format!("line {i}\n")).collect();
        std::fs::write(&path, contents).expect("can write report");
        let config = PDF::default();
        let mut doc = document(&config);

        let result = render(&config, &mut doc, &SourceFile::new("long.txt", &path), false);

        // 43 rows fit under the header, then 46 on each following page
        assert_eq!(result.page_count, 3);
        assert_eq!(doc.page_no(), 3);
    }
}
