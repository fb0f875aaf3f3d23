use lopdf::{Document, Object, Stream, dictionary};

use super::view::InvoiceView;
use crate::core::BijakError;

/// A4 portrait in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 36;
const FONT_SIZE: i64 = 7;
const LEADING: i64 = 9;

/// Printed lines that fit on one page.
pub const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// Render the invoice as a PDF document.
///
/// The text layout of [`InvoiceView::lines`] is set in Courier and split
/// over as many A4 pages as needed.
pub fn render_pdf(view: &InvoiceView) -> Result<Vec<u8>, BijakError> {
    let lines = view.lines();
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(font_id),
        },
    });

    let mut kids = Vec::new();
    for chunk in lines.chunks(LINES_PER_PAGE.max(1)) {
        let content = Stream::new(dictionary! {}, page_content(chunk));
        let content_id = doc.add_object(content);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(pdf_text(&format!("{} {}", view.title, invoice_number(view)))),
        "Producer" => Object::string_literal("bijak"),
    });
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| BijakError::Render(format!("failed to save PDF: {e}")))?;

    tracing::debug!(file = %view.file_name, bytes = output.len(), "rendered invoice PDF");
    Ok(output)
}

fn invoice_number(view: &InvoiceView) -> &str {
    view.meta
        .first()
        .map(|f| f.value.as_str())
        .unwrap_or_default()
}

fn page_content(lines: &[String]) -> Vec<u8> {
    let mut ops = format!(
        "BT /F1 {FONT_SIZE} Tf {LEADING} TL {MARGIN} {} Td\n",
        PAGE_HEIGHT - MARGIN - FONT_SIZE
    );
    for line in lines {
        ops.push('(');
        ops.push_str(&escape(&pdf_text(line)));
        ops.push_str(") Tj T*\n");
    }
    ops.push_str("ET");
    ops.into_bytes()
}

/// Courier with WinAnsi covers printable ASCII; anything else prints as '?'.
fn pdf_text(s: &str) -> String {
    s.chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect()
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_ascii_replaced() {
        assert_eq!(pdf_text("₹ 100"), "? 100");
        assert_eq!(pdf_text("tab\there"), "tab?here");
    }

    #[test]
    fn parentheses_escaped() {
        assert_eq!(escape(r"Delhi (07) \ x"), r"Delhi \(07\) \\ x");
    }

    #[test]
    fn content_stream_shape() {
        let content = String::from_utf8(page_content(&["Hello (world)".to_string()])).unwrap();
        assert!(content.starts_with("BT /F1 7 Tf 9 TL 36 799 Td"));
        assert!(content.contains(r"(Hello \(world\)) Tj T*"));
        assert!(content.ends_with("ET"));
    }
}
