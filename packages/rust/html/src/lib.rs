//! Lexical cleanup of Help Center article body HTML.
//!
//! Article bodies come out of a rich-text editor carrying empty paragraphs,
//! inline styling, and wrapper tags that add bytes without adding meaning for
//! a text consumer. [`normalize`] strips them with an ordered sequence of
//! regex passes:
//!
//! 1. remove tag pairs whose only content is whitespace (same name on both sides)
//! 2. strip `style`, `id`, `class`, `target` and `border` attributes
//! 3. unwrap `<span>` and `<font>`, keeping their content
//! 4. collapse runs of blank lines into a single line break
//! 5. rewrite `<td><p>X</p></td>` as `<td>X</td>`
//!
//! This is best-effort text rewriting, not an HTML parser. It builds no DOM
//! and does not cope reliably with malformed markup or nested tags sharing a
//! name. Once applied, a second run leaves the output unchanged.

mod cleanup;

use tracing::debug;

/// Normalize an optional article body. `None` stays `None`.
pub fn normalize(html: Option<&str>) -> Option<String> {
    html.map(normalize_html)
}

/// Normalize article body HTML. Empty input is returned as-is.
pub fn normalize_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let cleaned = cleanup::run_pipeline(html);
    debug!(
        original_len = html.len(),
        cleaned_len = cleaned.len(),
        "article body normalized"
    );
    cleaned
}
