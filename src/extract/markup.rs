//! Markup formats: HTML tag stripping and TeX macro stripping.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExtractError;

static SCRIPT_STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").expect("valid regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

// Braced invocations go first so a bare-command pass cannot leave a stray
// brace payload behind. Applied globally and unconditionally; deeply nested
// braces are an accepted approximation, not a parser.
static TEX_BRACED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-zA-Z]+\{[^}]*\}").expect("valid regex"));
static TEX_BARE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[a-zA-Z]+").expect("valid regex"));

/// Concatenation of all text nodes with tags stripped and entities decoded.
pub(crate) fn extract_html(bytes: &[u8]) -> Result<String, ExtractError> {
    let raw = String::from_utf8(bytes.to_vec())?;
    let without_blocks = SCRIPT_STYLE_RE.replace_all(&raw, "");
    let without_tags = TAG_RE.replace_all(&without_blocks, "");
    Ok(clean_text(&decode_entities(&without_tags)))
}

/// Strip `\cmd{...}` invocations, then bare `\cmd`, in that order.
pub(crate) fn extract_tex(bytes: &[u8]) -> Result<String, ExtractError> {
    let raw = String::from_utf8(bytes.to_vec())?;
    let pass1 = TEX_BRACED_RE.replace_all(&raw, "");
    let pass2 = TEX_BARE_RE.replace_all(&pass1, "");
    Ok(pass2.into_owned())
}

/// Decode the XML entities plus the common HTML non-breaking space.
pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
}

/// Trim every line and drop the empty ones.
pub(crate) fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_html_strips_tags() {
        let html = b"<html>\n<body>\n<h1>Title</h1>\n<p>Hello &amp; welcome</p>\n</body>\n</html>";
        let text = extract_html(html).unwrap();
        assert_eq!(text, "Title\nHello & welcome");
    }

    #[test]
    fn test_extract_html_drops_script_and_style() {
        let html = b"<p>Visible</p>\n<script>var hidden = 1;</script>\n<style>p { color: red; }</style>";
        let text = extract_html(html).unwrap();
        assert_eq!(text, "Visible");
    }

    #[test]
    fn test_extract_tex_strips_macros() {
        let tex = br"\section{Intro} Body text \alpha here";
        let text = extract_tex(tex).unwrap();
        assert!(text.contains("Body text"));
        assert!(!text.contains("Intro"));
        assert!(!text.contains('\\'));
    }

    #[test]
    fn test_extract_tex_braced_pass_runs_first() {
        // A single pass of bare-command stripping would leave "{Title}" behind.
        let tex = br"\title{Title}\newline plain";
        let text = extract_tex(tex).unwrap();
        assert_eq!(text.trim(), "plain");
    }

    #[test]
    fn test_clean_text() {
        let messy = "  Line 1  \n\n  Line 2  \n  \n  Line 3  ";
        assert_eq!(clean_text(messy), "Line 1\nLine 2\nLine 3");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt;b&gt; &amp; &quot;c&quot;"), "a <b> & \"c\"");
    }
}
