//! Page map collection and outline attachment.
//!
//! While the content pass runs, every section records the page it starts on in
//! a [`PageMap`]. A section's start page can't be known until everything
//! before it has been laid out, so the outline is built afterwards in a second
//! pass: the content-only PDF is re-opened, a two-level outline is generated
//! from the page map, and the result is saved to its final location.
//!
//! The page map counts pages from 1 like the layout engine does. Outline
//! targets are zero-based page indices into the finished document.

use anyhow::{anyhow, ensure, Context, Result};
use lopdf::{Bookmark, Document, Object, ObjectId, StringFormat};
use std::collections::HashSet;
use std::path::Path;

/// Title of the outline root, which also anchors the title page.
pub const TABLE_OF_CONTENTS: &str = "Table of Contents";

/// Outline entry flag for bold text.
const BOLD: u32 = 2;

/// Where one titled part of the document starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMapEntry {
    pub title: String,
    /// 1-based page number
    pub start_page: usize,
}

/// Ordered (title, start page) records gathered during rendering.
///
/// The first entry is always the table of contents on page 1, and start pages
/// never decrease.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMap {
    entries: Vec<PageMapEntry>,
}

impl Default for PageMap {
    fn default() -> Self {
        PageMap::new()
    }
}

impl PageMap {
    pub fn new() -> PageMap {
        PageMap {
            entries: vec![PageMapEntry {
                title: TABLE_OF_CONTENTS.to_string(),
                start_page: 1,
            }],
        }
    }

    /// Append a section that starts on `start_page`.
    pub fn record<S: ToString>(&mut self, title: S, start_page: usize) -> Result<()> {
        let title = title.to_string();
        let last = self.entries.last().map(|e| e.start_page).unwrap_or(1);
        ensure!(
            start_page >= last,
            "Section `{title}` starts on page {start_page}, before the previous section's page {last}"
        );

        log::debug!("Section `{title}` starts on page {start_page}");
        self.entries.push(PageMapEntry { title, start_page });
        Ok(())
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[PageMapEntry] {
        &self.entries
    }

    /// The sections, without the leading table of contents entry.
    pub fn sections(&self) -> &[PageMapEntry] {
        &self.entries[1..]
    }

    /// Lay the page map out as a two-level outline.
    ///
    /// Node 0 is the root, pointing at the first page; every section becomes a
    /// child of it, in page map order.
    pub fn outline(&self) -> Vec<OutlineNode> {
        let mut nodes = Vec::with_capacity(self.entries.len());
        nodes.push(OutlineNode {
            title: TABLE_OF_CONTENTS.to_string(),
            page_index: 0,
            parent: None,
        });
        nodes.extend(self.sections().iter().map(|entry| OutlineNode {
            title: entry.title.clone(),
            page_index: entry.start_page.saturating_sub(1),
            parent: Some(0),
        }));
        nodes
    }
}

/// One outline entry, parented by index into the same node list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineNode {
    pub title: String,
    /// zero-based index of the target page
    pub page_index: usize,
    pub parent: Option<usize>,
}

/// Attach the page map's outline to `doc` and make viewers open it.
///
/// Returns the number of outline entries written.
pub fn attach_outline(doc: &mut Document, page_map: &PageMap) -> Result<usize> {
    let pages = doc.get_pages();
    let nodes = page_map.outline();

    let mut bookmark_ids: Vec<u32> = Vec::with_capacity(nodes.len());
    for node in nodes.iter() {
        let page_id = pages
            .get(&(node.page_index as u32 + 1))
            .copied()
            .ok_or_else(|| {
                anyhow!(
                    "Bookmark `{}` targets page index {} but the document only has {} pages",
                    node.title,
                    node.page_index,
                    pages.len()
                )
            })?;
        let parent = node.parent.and_then(|p| bookmark_ids.get(p).copied());
        let format = if parent.is_none() { BOLD } else { 0 };

        log::debug!("Bookmark `{}` -> page index {}", node.title, node.page_index);
        let id = doc.add_bookmark(
            Bookmark::new(node.title.clone(), [0.0, 0.0, 0.0], format, page_id),
            parent,
        );
        bookmark_ids.push(id);
    }

    let outline_id = doc
        .build_outline()
        .ok_or_else(|| anyhow!("Failed to build the document outline"))?;
    encode_titles(doc, outline_id)?;

    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .with_context(|| "Document has no catalog")?;
    let catalog = doc
        .get_object_mut(catalog_id)
        .and_then(Object::as_dict_mut)
        .with_context(|| "Document catalog isn't a dictionary")?;
    catalog.set("Outlines", Object::Reference(outline_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

    Ok(bookmark_ids.len())
}

/// Rewrite the outline's titles as PDF text strings.
///
/// lopdf stores bookmark titles as raw UTF-8, which viewers read as
/// PDFDocEncoding. Non-ASCII titles are re-encoded as UTF-16BE with a byte
/// order mark.
fn encode_titles(doc: &mut Document, outline_id: ObjectId) -> Result<()> {
    let mut pending = vec![outline_id];
    let mut seen = HashSet::new();
    while let Some(id) = pending.pop() {
        if !seen.insert(id) {
            continue;
        }

        let item = doc
            .get_object_mut(id)
            .and_then(Object::as_dict_mut)
            .with_context(|| format!("Outline item {id:?} isn't a dictionary"))?;
        let encoded = match item.get(b"Title") {
            Ok(Object::String(bytes, _)) => text_string(bytes),
            _ => None,
        };
        if let Some(encoded) = encoded {
            item.set("Title", Object::String(encoded, StringFormat::Hexadecimal));
        }

        for key in [b"First".as_slice(), b"Next".as_slice()] {
            if let Ok(next) = item.get(key).and_then(Object::as_reference) {
                pending.push(next);
            }
        }
    }
    Ok(())
}

/// UTF-16BE encoding of a UTF-8 title, or `None` when it can stay as it is.
fn text_string(bytes: &[u8]) -> Option<Vec<u8>> {
    if bytes.is_ascii() {
        return None;
    }
    let title = std::str::from_utf8(bytes).ok()?;
    let mut encoded = vec![0xfe, 0xff];
    encoded.extend(title.encode_utf16().flat_map(u16::to_be_bytes));
    Some(encoded)
}

/// The second pass: re-open the content-only PDF at `intermediate`, attach
/// the outline and save the result to `outfile`.
///
/// The intermediate is left alone; removing it is up to the caller once this
/// has succeeded.
pub fn annotate(intermediate: &Path, outfile: &Path, page_map: PageMap) -> Result<usize> {
    let mut doc = Document::load(intermediate).with_context(|| {
        format!(
            "Failed to load intermediate PDF {}",
            intermediate.display()
        )
    })?;

    let count = attach_outline(&mut doc, &page_map)?;

    doc.save(outfile)
        .with_context(|| format!("Failed to write output PDF {}", outfile.display()))?;
    log::info!("Attached {count} bookmarks to {}", outfile.display());

    Ok(count)
}

/// Read an outline back as `(depth, title, page index)` rows, depth first.
#[cfg(test)]
pub(crate) fn read_outline(doc: &Document) -> Vec<(usize, String, usize)> {
    use std::collections::HashMap;

    fn decode(bytes: &[u8]) -> String {
        if let Some(utf16) = bytes.strip_prefix(&[0xfe, 0xff]) {
            let units: Vec<u16> = utf16
                .chunks(2)
                .map(|pair| u16::from_be_bytes([pair[0], *pair.get(1).unwrap_or(&0)]))
                .collect();
            String::from_utf16_lossy(&units)
        } else {
            // PDFDocEncoding agrees with Latin-1 for everything a title uses
            bytes.iter().map(|b| char::from(*b)).collect()
        }
    }

    fn destination(doc: &Document, item: &lopdf::Dictionary) -> ObjectId {
        let dest = match item.get(b"Dest") {
            Ok(dest) => dest,
            Err(_) => {
                let action = item
                    .get(b"A")
                    .and_then(|a| match a {
                        Object::Reference(id) => doc.get_dictionary(*id),
                        other => other.as_dict(),
                    })
                    .expect("outline item has a destination");
                action.get(b"D").expect("action has a destination")
            }
        };
        dest.as_array().expect("destination is an array")[0]
            .as_reference()
            .expect("destination starts with a page")
    }

    fn walk(
        doc: &Document,
        mut next: Option<ObjectId>,
        depth: usize,
        page_indices: &HashMap<ObjectId, usize>,
        out: &mut Vec<(usize, String, usize)>,
    ) {
        while let Some(id) = next {
            let item = doc.get_dictionary(id).expect("outline item is a dictionary");
            let title = decode(
                item.get(b"Title")
                    .and_then(Object::as_str)
                    .expect("outline item has a title"),
            );
            let page = destination(doc, item);
            out.push((depth, title, page_indices[&page]));

            let first = item.get(b"First").and_then(Object::as_reference).ok();
            walk(doc, first, depth + 1, page_indices, out);
            next = item.get(b"Next").and_then(Object::as_reference).ok();
        }
    }

    let page_indices: HashMap<ObjectId, usize> = doc
        .get_pages()
        .into_iter()
        .map(|(number, id)| (id, number as usize - 1))
        .collect();
    let catalog = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .expect("document has a catalog");
    let outlines = catalog
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .expect("document has an outline");

    let mut out = Vec::new();
    walk(
        doc,
        outlines.get(b"First").and_then(Object::as_reference).ok(),
        0,
        &page_indices,
        &mut out,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::pdf::fonts::SpanFont;
    use crate::sinks::pdf::layout::{self, Align, Margins, Pt};

    fn content_pdf(pages: usize) -> Vec<u8> {
        let mut doc = layout::Document::new(
            (Pt(200.0), Pt(200.0)),
            Margins::all(Pt(10.0)),
            SpanFont::regular(Pt(10.0)),
        );
        for i in 0..pages {
            doc.add_page();
            doc.line(Pt(10.0), &format!("page {}", i + 1), Align::Left);
        }
        doc.finish()
    }

    #[test]
    fn page_map_starts_with_the_table_of_contents() {
        let map = PageMap::new();
        assert_eq!(
            map.entries(),
            &[PageMapEntry {
                title: TABLE_OF_CONTENTS.to_string(),
                start_page: 1
            }]
        );
        assert!(map.sections().is_empty());
    }

    #[test]
    fn page_map_rejects_pages_going_backwards() {
        let mut map = PageMap::new();
        map.record("a.txt", 2).expect("can record a.txt");
        map.record("b.txt", 4).expect("can record b.txt");
        assert!(map.record("c.txt", 3).is_err());
        assert_eq!(map.sections().len(), 2);
    }

    #[test]
    fn outline_converts_to_zero_based_pages() {
        let mut map = PageMap::new();
        map.record("a.txt", 2).expect("can record a.txt");
        map.record("b.txt", 5).expect("can record b.txt");

        let outline = map.outline();
        assert_eq!(
            outline,
            vec![
                OutlineNode {
                    title: TABLE_OF_CONTENTS.to_string(),
                    page_index: 0,
                    parent: None,
                },
                OutlineNode {
                    title: "a.txt".to_string(),
                    page_index: 1,
                    parent: Some(0),
                },
                OutlineNode {
                    title: "b.txt".to_string(),
                    page_index: 4,
                    parent: Some(0),
                },
            ]
        );
    }

    #[test]
    fn attaches_a_two_level_outline() {
        let mut doc = Document::load_mem(&content_pdf(3)).expect("can load content PDF");
        let mut map = PageMap::new();
        map.record("a.txt", 2).expect("can record a.txt");
        map.record("b.txt", 3).expect("can record b.txt");

        let count = attach_outline(&mut doc, &map).expect("can attach outline");
        assert_eq!(count, 3);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("can save annotated PDF");
        let doc = Document::load_mem(&bytes).expect("can reload annotated PDF");
        assert_eq!(
            read_outline(&doc),
            vec![
                (0, TABLE_OF_CONTENTS.to_string(), 0),
                (1, "a.txt".to_string(), 1),
                (1, "b.txt".to_string(), 2),
            ]
        );
    }

    #[test]
    fn non_ascii_titles_are_written_as_utf16() {
        let mut doc = Document::load_mem(&content_pdf(3)).expect("can load content PDF");
        let mut map = PageMap::new();
        map.record("résumé.txt", 2).expect("can record résumé.txt");
        map.record("日本.txt", 3).expect("can record 日本.txt");
        attach_outline(&mut doc, &map).expect("can attach outline");

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("can save annotated PDF");
        let doc = Document::load_mem(&bytes).expect("can reload annotated PDF");
        assert_eq!(
            read_outline(&doc),
            vec![
                (0, TABLE_OF_CONTENTS.to_string(), 0),
                (1, "résumé.txt".to_string(), 1),
                (1, "日本.txt".to_string(), 2),
            ]
        );
    }

    #[test]
    fn only_non_ascii_titles_are_reencoded() {
        assert_eq!(text_string(b"a.txt"), None);
        assert_eq!(
            text_string("é".as_bytes()),
            Some(vec![0xfe, 0xff, 0x00, 0xe9])
        );
    }

    #[test]
    fn targets_past_the_last_page_are_an_error() {
        let mut doc = Document::load_mem(&content_pdf(1)).expect("can load content PDF");
        let mut map = PageMap::new();
        map.record("a.txt", 2).expect("can record a.txt");
        assert!(attach_outline(&mut doc, &map).is_err());
    }

    #[test]
    fn annotate_writes_the_final_document() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let intermediate = dir.path().join("temp_out.pdf");
        let outfile = dir.path().join("out.pdf");
        std::fs::write(&intermediate, content_pdf(2)).expect("can write intermediate");

        let mut map = PageMap::new();
        map.record("only.txt", 2).expect("can record only.txt");
        annotate(&intermediate, &outfile, map).expect("can annotate");

        assert!(intermediate.exists());
        let doc = Document::load(&outfile).expect("can load output");
        assert_eq!(read_outline(&doc).len(), 2);
    }
}
