//! Transcript export.
//!
//! Renders the conversation as a paginated A4 PDF: for each turn a bold
//! `Q{n}:` paragraph, a small spacer, an `A{n}:` paragraph with embedded line
//! breaks preserved, and a larger spacer before the next turn. The export is
//! written to a fixed file name and overwrites any previous export.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::session::ConversationTurn;

/// Fixed export target, overwritten on every export.
pub const EXPORT_FILE_NAME: &str = "Conversation.pdf";

// ISO A4 in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const FONT_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 14.0;
const QUESTION_SPACER: f32 = 8.0;
const TURN_SPACER: f32 = 16.0;
/// Approximate Helvetica advance per character at `FONT_SIZE`.
const CHAR_WIDTH: f32 = 5.8;

struct Line {
    text: String,
    bold: bool,
}

enum Block {
    Line(Line),
    Gap(f32),
}

/// Export the conversation to `Conversation.pdf` inside `dir`, returning the
/// written path.
pub fn export_transcript(
    conversation: &[ConversationTurn],
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(EXPORT_FILE_NAME);
    write_transcript_pdf(conversation, &path)?;
    tracing::info!(turns = conversation.len(), path = %path.display(), "transcript exported");
    Ok(path)
}

fn write_transcript_pdf(conversation: &[ConversationTurn], path: &Path) -> Result<(), ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_font_id,
            "F2" => bold_font_id,
        },
    });

    let blocks = layout(conversation);
    let mut kids: Vec<Object> = Vec::new();

    for page in paginate(&blocks) {
        let mut operations = Vec::new();
        for (y, line) in page {
            let font = if line.bold { "F2" } else { "F1" };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), FONT_SIZE.into()]));
            operations.push(Operation::new("Td", vec![MARGIN.into(), y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_pdf_text(&line.text))],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(path)?;
    Ok(())
}

/// Flatten the conversation into wrapped lines and spacers.
fn layout(conversation: &[ConversationTurn]) -> Vec<Block> {
    let wrap_chars = ((PAGE_WIDTH - 2.0 * MARGIN) / CHAR_WIDTH) as usize;
    let mut blocks = Vec::new();

    for (index, turn) in conversation.iter().enumerate() {
        let n = index + 1;

        for text in wrap_text(&format!("Q{n}: {}", turn.question), wrap_chars) {
            blocks.push(Block::Line(Line { text, bold: true }));
        }
        blocks.push(Block::Gap(QUESTION_SPACER));

        let answer = format!("A{n}: {}", turn.answer);
        for raw_line in answer.lines() {
            for text in wrap_text(raw_line, wrap_chars) {
                blocks.push(Block::Line(Line { text, bold: false }));
            }
        }
        blocks.push(Block::Gap(TURN_SPACER));
    }

    blocks
}

/// Assign lines to pages top-down, starting a new page when a line would
/// cross the bottom margin. Always yields at least one page.
fn paginate(blocks: &[Block]) -> Vec<Vec<(f32, &Line)>> {
    let mut pages = Vec::new();
    let mut current = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    for block in blocks {
        match block {
            Block::Gap(gap) => y -= gap,
            Block::Line(line) => {
                if y - LINE_HEIGHT < MARGIN {
                    pages.push(std::mem::take(&mut current));
                    y = PAGE_HEIGHT - MARGIN;
                }
                y -= LINE_HEIGHT;
                current.push((y, line));
            }
        }
    }

    pages.push(current);
    pages
}

/// Greedy word wrap; oversized single tokens are hard-broken.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if !current.is_empty() && current.chars().count() + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
        }

        if word_len > max_chars {
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                lines.push(chunk.iter().collect());
            }
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Helvetica carries a Latin-1 encoding; anything outside is replaced.
fn encode_pdf_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u32 as u8 } else { b'?' })
        .collect()
}
