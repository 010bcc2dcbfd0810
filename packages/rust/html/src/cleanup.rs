//! Ordered rewrite passes applied to article body HTML.
//!
//! Each pass is a function `&str -> String` applied in sequence. Later passes
//! assume earlier ones already ran, so the order in [`run_pipeline`] is fixed.
//! Matching is lexical (regex over the markup text); no DOM is built.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Run the full cleanup pipeline on article body HTML.
pub(crate) fn run_pipeline(html: &str) -> String {
    let mut result = html.to_string();

    result = remove_empty_tags(&result);
    result = strip_presentation_attributes(&result);
    result = unwrap_wrapper_tags(&result);
    result = collapse_blank_lines(&result);
    result = unwrap_cell_paragraphs(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Remove whitespace-only tag pairs
// ---------------------------------------------------------------------------

/// Remove `<tag ...>` + whitespace + `</tag>` where both names agree.
///
/// Repeats until nothing matches, so `<div><p> </p></div>` disappears entirely.
/// Mismatched pairs such as `<br>\n</p>` are left alone.
fn remove_empty_tags(html: &str) -> String {
    static EMPTY_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
        // The regex crate has no backreferences; names are compared in the closure.
        Regex::new(r"(?i)<([a-z][a-z0-9]*)(?:\s[^>]*)?>\s*</([a-z][a-z0-9]*)\s*>")
            .expect("valid regex")
    });

    let mut current = html.to_string();
    loop {
        let next = EMPTY_PAIR_RE
            .replace_all(&current, |caps: &Captures| {
                if caps[1].eq_ignore_ascii_case(&caps[2]) {
                    String::new()
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned();

        if next == current {
            return current;
        }
        current = next;
    }
}

// ---------------------------------------------------------------------------
// Pass 2: Strip presentation attributes
// ---------------------------------------------------------------------------

/// Drop quoted `style`, `id`, `class`, `target` and `border` attributes from every tag.
fn strip_presentation_attributes(html: &str) -> String {
    static OPEN_TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[a-zA-Z][^>]*>").expect("valid regex"));
    static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"(?i)\s+(?:style|id|class|target|border)\s*=\s*(?:"[^"]*"|'[^']*')"#)
            .expect("valid regex")
    });

    OPEN_TAG_RE
        .replace_all(html, |caps: &Captures| ATTR_RE.replace_all(&caps[0], "").into_owned())
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 3: Unwrap span/font
// ---------------------------------------------------------------------------

/// Delete `<span>`/`<font>` open and close tags, keeping their content verbatim.
fn unwrap_wrapper_tags(html: &str) -> String {
    static WRAPPER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)</?(?:span|font)(?:\s[^>]*)?>").expect("valid regex")
    });

    WRAPPER_RE.replace_all(html, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 4: Collapse blank lines
// ---------------------------------------------------------------------------

/// Collapse a line break, any whitespace-only lines, and the next line break into one.
fn collapse_blank_lines(html: &str) -> String {
    static BLANK_RUN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

    BLANK_RUN_RE.replace_all(html, "\n").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 5: Unwrap paragraphs inside table cells
// ---------------------------------------------------------------------------

/// Rewrite `<td><p>X</p></td>` as `<td>X</td>`.
///
/// Only a cell holding exactly one paragraph is rewritten. The inner pattern
/// cannot run past a `</td>` or `</th>`, and cells with several paragraphs
/// are left untouched.
fn unwrap_cell_paragraphs(html: &str) -> String {
    static CELL_PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"(?i)<td(\s[^>]*)?>\s*<p(?:\s[^>]*)?>((?:[^<]|<[^/]|</[^tT]|</[tT][^dDhH])*?)</p\s*>\s*</td\s*>",
        )
        .expect("valid regex")
    });
    static PARAGRAPH_TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)</?p[\s>]").expect("valid regex"));

    CELL_PARAGRAPH_RE
        .replace_all(html, |caps: &Captures| {
            let inner = &caps[2];
            if PARAGRAPH_TAG_RE.is_match(inner) {
                return caps[0].to_string();
            }
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            format!("<td{attrs}>{inner}</td>")
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
