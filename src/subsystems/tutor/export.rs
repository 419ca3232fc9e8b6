//! Session export — summary as plain text or paginated PDF, records as CSV.
//!
//! Pagination is a pure function over the summary lines so the page-break
//! rule can be tested without producing a document: the cursor starts at
//! `layout.top` on every page, moves down by `line_height` per line, and a new
//! page begins as soon as it has dropped below `bottom_margin`.
//!
//! The PDF writer uses the built-in Courier font, so only printable ASCII is
//! emitted; anything else is replaced with `?`. Lines wider than the page
//! are neither wrapped nor truncated.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::PageLayout;
use crate::error::AppError;
use crate::subsystems::memory::SessionRecord;

pub const TEXT_FILE: &str = "learning_summary.txt";
pub const PDF_FILE: &str = "learning_summary.pdf";
pub const CSV_FILE: &str = "learning_session_log.csv";

pub const CSV_HEADER: [&str; 6] = ["Timestamp", "Subject", "Depth", "Style", "Question", "Response"];

/// One line positioned on a page; `y` is the baseline in PDF points.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// Write the summary text unchanged.
pub fn export_text(summary: &str, path: &Path) -> Result<(), AppError> {
    ensure_parent(path)?;
    fs::write(path, summary)
        .map_err(|e| AppError::Export(format!("cannot write {}: {e}", path.display())))?;
    info!(path = %path.display(), bytes = summary.len(), "summary exported (text)");
    Ok(())
}

/// Write one CSV row per record, in order, after [`CSV_HEADER`].
/// An empty session still produces the header row.
pub fn export_records(records: &[SessionRecord], path: &Path) -> Result<(), AppError> {
    let csv_err = |e: csv::Error| AppError::Export(format!("cannot write {}: {e}", path.display()));

    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for r in records {
        let timestamp = r.timestamp.to_rfc3339();
        writer
            .write_record([
                timestamp.as_str(),
                r.subject.label(),
                r.depth.label(),
                r.style.label(),
                r.question.as_str(),
                r.response.as_str(),
            ])
            .map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::Export(format!("cannot write {}: {e}", path.display())))?;
    info!(path = %path.display(), rows = records.len(), "session log exported (csv)");
    Ok(())
}

/// Lay out `summary` one logical line per rendered line. Always yields at
/// least one page.
pub fn paginate(summary: &str, layout: &PageLayout) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut y = layout.top;

    for line in summary.lines() {
        if y < layout.bottom_margin {
            pages.push(std::mem::take(&mut current));
            y = layout.top;
        }
        current.lines.push(PlacedLine { y, text: line.to_string() });
        y -= layout.line_height;
    }
    pages.push(current);
    pages
}

/// Render `summary` into a multi-page PDF at `path`.
#[cfg(feature = "export-pdf")]
pub fn export_document(summary: &str, path: &Path, layout: &PageLayout) -> Result<(), AppError> {
    let pages = paginate(summary, layout);
    let bytes = pdf::render(&pages, layout)?;
    ensure_parent(path)?;
    fs::write(path, &bytes)
        .map_err(|e| AppError::Export(format!("cannot write {}: {e}", path.display())))?;
    info!(path = %path.display(), pages = pages.len(), "summary exported (pdf)");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| AppError::Export(format!("cannot create {}: {e}", parent.display()))),
        _ => Ok(()),
    }
}

#[cfg(feature = "export-pdf")]
mod pdf {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    use super::Page;
    use crate::config::PageLayout;
    use crate::error::AppError;

    const FONT_NAME: &str = "F1";

    pub(super) fn render(pages: &[Page], layout: &PageLayout) -> Result<Vec<u8>, AppError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { FONT_NAME => font_id },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page in pages {
            let content = page_content(page, layout);
            let encoded = content
                .encode()
                .map_err(|e| AppError::Export(format!("encode page content: {e}")))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    layout.page_width.into(),
                    layout.page_height.into(),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| AppError::Export(format!("serialise pdf: {e}")))?;
        Ok(out)
    }

    /// Text runs straight from `left_margin`; overlong lines spill past the
    /// right edge (about 95 characters of 10 pt Courier on the default page).
    fn page_content(page: &Page, layout: &PageLayout) -> Content {
        let mut operations = Vec::with_capacity(page.lines.len() * 4 + 2);
        for line in &page.lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![FONT_NAME.into(), layout.font_size.into()]));
            operations.push(Operation::new("Td", vec![layout.left_margin.into(), line.y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(ascii_only(&line.text))]));
            operations.push(Operation::new("ET", vec![]));
        }
        Content { operations }
    }

    /// Courier with WinAnsi covers printable ASCII; everything else becomes `?`.
    pub(super) fn ascii_only(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\t' => ' ',
                ' '..='~' => c,
                _ => '?',
            })
            .collect()
    }

}
