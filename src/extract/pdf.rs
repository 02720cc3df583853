//! PDF text extraction via pdf-extract, page text concatenated in page order.

use crate::error::ExtractError;

use super::markup::clean_text;

/// Extract text from a PDF byte stream.
///
/// Wrapped in catch_unwind: the pdf_extract crate (and its cff-parser
/// dependency) can panic on certain fonts/glyphs.
pub(crate) fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match outcome {
        Ok(Ok(text)) => {
            let text = clean_text(&text);
            tracing::debug!(chars = text.len(), "extracted pdf text");
            Ok(text)
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "pdf extraction failed");
            Err(ExtractError::ParseFailed {
                format: "pdf",
                message: e.to_string(),
            })
        }
        Err(_panic) => {
            tracing::error!("pdf extraction panicked, likely a malformed font or glyph");
            Err(ExtractError::ParseFailed {
                format: "pdf",
                message: "extraction panicked, likely a malformed font".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_rejects_garbage() {
        assert!(matches!(
            extract_pdf(b"not a pdf"),
            Err(ExtractError::ParseFailed { format: "pdf", .. })
        ));
    }

    // Well-formed PDF extraction is covered in export.rs, which feeds a
    // generated transcript back through this extractor.
}
