//! Per-format text extraction.
//!
//! Pure Rust extraction, one function per supported format, each mapping a
//! file's raw bytes to plain text (or, for images, an inline base64 payload).
//! Extractors are stateless; a failure is reported per file and never aborts
//! the rest of an upload batch.
//!
//! ## Supported Formats
//! - Text: .txt (direct UTF-8 decode)
//! - Word: .docx via docx-rs
//! - Tables: .csv, .xlsx rendered as whitespace-aligned text
//! - Slides: .pptx slide text runs in slide order
//! - PDF: text extraction via pdf-extract
//! - Markup: .html/.htm tag stripping, .tex macro stripping
//! - Images: .jpg/.jpeg/.png carried as base64 inline data

mod image;
mod markup;
mod office;
mod pdf;
mod table;

use crate::error::ExtractError;

pub use image::ImagePayload;

/// Closed set of supported upload formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Txt,
    Docx,
    Csv,
    Xlsx,
    Pptx,
    Pdf,
    Html,
    Tex,
    Jpeg,
    Png,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "docx" => Some(Self::Docx),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "pptx" => Some(Self::Pptx),
            "pdf" => Some(Self::Pdf),
            "html" | "htm" => Some(Self::Html),
            "tex" => Some(Self::Tex),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Declared format from a file name's extension suffix.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = std::path::Path::new(name).extension()?.to_str()?;
        Self::from_extension(ext)
    }

}

/// A file as received from the upload surface. Immutable once constructed;
/// consumed by exactly one extractor.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn format(&self) -> Option<FileFormat> {
        FileFormat::from_name(&self.name)
    }
}

/// What an extractor produced for one file.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedContent {
    Text(String),
    Image(ImagePayload),
}

/// Extract a single file's content according to its declared format.
pub fn extract(file: &UploadedFile) -> Result<ExtractedContent, ExtractError> {
    let format = file.format().ok_or_else(|| ExtractError::UnsupportedFormat {
        name: file.name.clone(),
    })?;

    let content = match format {
        FileFormat::Txt => ExtractedContent::Text(String::from_utf8(file.bytes.clone())?),
        FileFormat::Docx => ExtractedContent::Text(office::extract_docx(&file.bytes)?),
        FileFormat::Csv => ExtractedContent::Text(table::extract_csv(&file.bytes)?),
        FileFormat::Xlsx => ExtractedContent::Text(table::extract_xlsx(&file.bytes)?),
        FileFormat::Pptx => ExtractedContent::Text(office::extract_pptx(&file.bytes)?),
        FileFormat::Pdf => ExtractedContent::Text(pdf::extract_pdf(&file.bytes)?),
        FileFormat::Html => ExtractedContent::Text(markup::extract_html(&file.bytes)?),
        FileFormat::Tex => ExtractedContent::Text(markup::extract_tex(&file.bytes)?),
        FileFormat::Jpeg | FileFormat::Png => {
            ExtractedContent::Image(image::encode_image(&file.bytes, format))
        }
    };

    if let ExtractedContent::Text(text) = &content {
        tracing::debug!(file = %file.name, chars = text.len(), "extracted text");
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_extension("pdf"), Some(FileFormat::Pdf));
        assert_eq!(FileFormat::from_extension("PDF"), Some(FileFormat::Pdf));
        assert_eq!(FileFormat::from_extension("htm"), Some(FileFormat::Html));
        assert_eq!(FileFormat::from_extension("html"), Some(FileFormat::Html));
        assert_eq!(FileFormat::from_extension("jpeg"), Some(FileFormat::Jpeg));
        assert_eq!(FileFormat::from_extension("exe"), None);
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(FileFormat::from_name("Report.DOCX"), Some(FileFormat::Docx));
        assert_eq!(FileFormat::from_name("archive.tar.gz"), None);
        assert_eq!(FileFormat::from_name("no_extension"), None);
    }

    #[test]
    fn test_extract_plain_text() {
        let file = UploadedFile::new("notes.txt", b"Revenue: 100".to_vec());
        let content = extract(&file).unwrap();
        assert_eq!(content, ExtractedContent::Text("Revenue: 100".to_string()));
    }

    #[test]
    fn test_extract_invalid_utf8_fails() {
        let file = UploadedFile::new("broken.txt", vec![0xff, 0xfe, 0x00]);
        assert!(matches!(
            extract(&file),
            Err(ExtractError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_extract_unsupported_names_file() {
        let file = UploadedFile::new("virus.exe", vec![0x4d, 0x5a]);
        let err = extract(&file).unwrap_err();
        assert!(err.to_string().contains("virus.exe"));
    }

    #[test]
    fn test_extract_image_payload() {
        let bytes = vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
        let file = UploadedFile::new("chart.png", bytes);
        match extract(&file).unwrap() {
            ExtractedContent::Image(payload) => {
                assert_eq!(payload.mime_type, "image/png");
                assert!(!payload.data.is_empty());
            }
            other => panic!("expected image payload, got {other:?}"),
        }
    }
}
