//! Office document extraction: Word (.docx) and PowerPoint (.pptx).

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::ExtractError;

use super::markup::decode_entities;

static SLIDE_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<a:t[^>]*>([^<]*)</a:t>").expect("valid regex"));

/// Walk the document object model and join paragraph runs with newlines.
pub(crate) fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = docx_rs::read_docx(bytes).map_err(|e| ExtractError::ParseFailed {
        format: "docx",
        message: e.to_string(),
    })?;

    let mut text = String::new();
    for child in &doc.document.children {
        collect_document_child(child, &mut text);
    }

    Ok(text.trim_end().to_string())
}

fn collect_document_child(element: &docx_rs::DocumentChild, output: &mut String) {
    match element {
        docx_rs::DocumentChild::Paragraph(para) => {
            for child in &para.children {
                collect_paragraph_child(child, output);
            }
            output.push('\n');
        }
        docx_rs::DocumentChild::Table(table) => {
            for row in &table.rows {
                let docx_rs::TableChild::TableRow(tr) = row;
                for cell in &tr.cells {
                    let docx_rs::TableRowChild::TableCell(tc) = cell;
                    for child in &tc.children {
                        if let docx_rs::TableCellContent::Paragraph(para) = child {
                            for p_child in &para.children {
                                collect_paragraph_child(p_child, output);
                            }
                            output.push_str(" | ");
                        }
                    }
                }
                output.push('\n');
            }
        }
        _ => {}
    }
}

fn collect_paragraph_child(child: &docx_rs::ParagraphChild, output: &mut String) {
    match child {
        docx_rs::ParagraphChild::Run(run) => {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(text) = run_child {
                    output.push_str(&text.text);
                }
            }
        }
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for nested in &link.children {
                if let docx_rs::ParagraphChild::Run(run) = nested {
                    for run_child in &run.children {
                        if let docx_rs::RunChild::Text(text) = run_child {
                            output.push_str(&text.text);
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

/// Concatenate every slide's text runs, slides taken in slide-number order.
pub(crate) fn extract_pptx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes.to_vec())).map_err(|e| ExtractError::ParseFailed {
            format: "pptx",
            message: e.to_string(),
        })?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    let mut runs: Vec<String> = Vec::new();
    for (_, entry_name) in &slides {
        let mut xml = String::new();
        archive
            .by_name(entry_name)
            .map_err(|e| ExtractError::ParseFailed {
                format: "pptx",
                message: e.to_string(),
            })?
            .read_to_string(&mut xml)?;

        for capture in SLIDE_TEXT_RE.captures_iter(&xml) {
            let run = decode_entities(&capture[1]);
            if !run.is_empty() {
                runs.push(run);
            }
        }
    }

    tracing::debug!(slides = slides.len(), runs = runs.len(), "extracted presentation");
    Ok(runs.join("\n"))
}

fn slide_number(entry_name: &str) -> Option<u32> {
    entry_name
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pptx_fixture(slides: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::FileOptions::default();
            for (entry_name, xml) in slides {
                writer.start_file(*entry_name, options).unwrap();
                writer.write_all(xml.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_docx_round_trip() {
        use docx_rs::{Docx, Paragraph, Run};

        let mut buf = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Quarterly report")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Revenue grew 12%")))
            .build()
            .pack(&mut buf)
            .unwrap();

        let text = extract_docx(buf.get_ref()).unwrap();
        assert_eq!(text, "Quarterly report\nRevenue grew 12%");
    }

    #[test]
    fn test_docx_rejects_garbage() {
        assert!(matches!(
            extract_docx(b"not a document"),
            Err(ExtractError::ParseFailed { format: "docx", .. })
        ));
    }

    #[test]
    fn test_pptx_slide_order_and_entities() {
        // slide10 must sort after slide2, so lexical entry order is not enough.
        let bytes = pptx_fixture(&[
            ("ppt/slides/slide10.xml", "<p:sld><a:t>Last</a:t></p:sld>"),
            ("ppt/slides/slide2.xml", "<p:sld><a:t>Middle &amp; more</a:t></p:sld>"),
            ("ppt/slides/slide1.xml", "<p:sld><a:t>First</a:t></p:sld>"),
            ("ppt/notesSlides/notesSlide1.xml", "<p:notes><a:t>skip</a:t></p:notes>"),
        ]);

        let text = extract_pptx(&bytes).unwrap();
        assert_eq!(text, "First\nMiddle & more\nLast");
    }

    #[test]
    fn test_pptx_skips_empty_runs() {
        // Placeholder shapes carry empty <a:t></a:t> runs; those must not
        // become blank lines between the real text.
        let bytes = pptx_fixture(&[(
            "ppt/slides/slide1.xml",
            "<p:sld><a:t>Heading</a:t><a:t></a:t><a:t>Body</a:t></p:sld>",
        )]);

        let text = extract_pptx(&bytes).unwrap();
        assert_eq!(text, "Heading\nBody");
    }

    #[test]
    fn test_pptx_rejects_garbage() {
        assert!(matches!(
            extract_pptx(b"not an archive"),
            Err(ExtractError::ParseFailed { format: "pptx", .. })
        ));
    }

    #[test]
    fn test_slide_number() {
        assert_eq!(slide_number("ppt/slides/slide7.xml"), Some(7));
        assert_eq!(slide_number("ppt/slides/slide7.xml.rels"), None);
        assert_eq!(slide_number("ppt/media/image1.png"), None);
    }
}
