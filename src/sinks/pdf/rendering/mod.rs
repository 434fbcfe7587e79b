//! PDF rendering orchestration.
//!
//! Rendering happens in two passes over the output:
//!
//! 1. The content pass lays out the title page and one section per report,
//!    each section starting on a fresh page. As sections are started, their
//!    titles and page numbers are recorded in a [`PageMap`]. The finished
//!    pages are written to an intermediate PDF next to the output file.
//! 2. The bookmark pass re-opens the intermediate, attaches an outline built
//!    from the page map (see [`crate::sinks::pdf::bookmarks`]) and writes the
//!    final document.
//!
//! The intermediate is deleted once the final document has been written. If
//! writing fails it is left in place so the content can still be inspected.
//!
//! The render function accepts a progress bar from the caller, updating it with the
//! current file name and incrementing after each file is processed.

mod source_file;
mod title_page;

use crate::sinks::pdf::bookmarks::{self, PageMap};
use crate::sinks::pdf::config::{RenderStats, PDF};
use crate::sinks::pdf::layout::{Document, Info};
use crate::source::Source;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// Output of the content pass.
#[derive(Debug)]
pub struct RenderedContent {
    pub document: Document,
    pub page_map: PageMap,
    pub unreadable_files: usize,
}

impl PDF {
    /// Render every report in `source` into a bookmarked PDF at `outfile`.
    pub fn render(
        &self,
        source: &Source,
        outfile: &Path,
        line_numbers: bool,
        progress: &ProgressBar,
    ) -> Result<RenderStats> {
        let content = self
            .render_content(source, line_numbers, &Local::now(), progress)
            .with_context(|| "Failed to render report contents")?;
        let page_count = content.document.page_no();

        let intermediate = intermediate_path(outfile)?;
        std::fs::write(&intermediate, content.document.finish()).with_context(|| {
            format!(
                "Failed to write intermediate PDF {}",
                intermediate.display()
            )
        })?;
        log::info!(
            "Wrote {page_count} pages of content to {}",
            intermediate.display()
        );

        let bookmark_count = bookmarks::annotate(&intermediate, outfile, content.page_map)?;

        std::fs::remove_file(&intermediate).with_context(|| {
            format!(
                "Failed to remove intermediate PDF {}",
                intermediate.display()
            )
        })?;

        Ok(RenderStats {
            page_count,
            file_count: source.len(),
            unreadable_files: content.unreadable_files,
            bookmark_count,
        })
    }

    /// The content pass: lay out all pages and record where each report starts.
    pub fn render_content(
        &self,
        source: &Source,
        line_numbers: bool,
        generated_at: &DateTime<Local>,
        progress: &ProgressBar,
    ) -> Result<RenderedContent> {
        let mut doc = Document::new(self.page_size(), self.margins(), self.body_font());

        let mut info = Info::default();
        info.title(&self.title);
        info.creator(concat!("report-book v", env!("CARGO_PKG_VERSION")));
        doc.set_info(info);

        title_page::render(self, &mut doc, source.len(), generated_at);
        let mut page_map = PageMap::new();

        let mut unreadable_files = 0;
        for file in source.source_files.iter() {
            progress.set_message(file.name.clone());

            // sections never share a page with whatever came before them
            doc.add_page();
            page_map.record(&file.name, doc.page_no())?;

            let result = source_file::render(self, &mut doc, file, line_numbers);
            if result.unreadable {
                unreadable_files += 1;
            }
            log::debug!("Rendered {} onto {} page(s)", file.name, result.page_count);

            progress.inc(1);
        }

        progress.finish_with_message("Files rendered");

        Ok(RenderedContent {
            document: doc,
            page_map,
            unreadable_files,
        })
    }
}

/// Where the content pass writes its PDF: `temp_<name>` beside `outfile`.
pub fn intermediate_path(outfile: &Path) -> Result<PathBuf> {
    let name = outfile
        .file_name()
        .ok_or_else(|| anyhow!("Output path {} has no file name", outfile.display()))?;
    let mut temp_name = std::ffi::OsString::from("temp_");
    temp_name.push(name);
    Ok(outfile.with_file_name(temp_name))
}
