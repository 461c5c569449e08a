//! Utilities for working with the HTML fragments stored in post bodies and
//! notes. Post HTML is trusted (it is sanitized upstream, before it lands in
//! the collection file), so these helpers never try to fully parse it; they
//! only need to strip markup for plain-text output, escape interpolated
//! values, and rewrite text runs without touching the markup around them.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#?[a-zA-Z0-9]+;").unwrap());

/// Escapes the five XML-unsafe characters (`&`, `<`, `>`, `"`, `'`) to their
/// named-entity equivalents. Used for every plain value interpolated into
/// markup and for all text content in the exported feed.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Removes every `<...>` span from an HTML fragment, leaving the text runs
/// concatenated.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Decodes the small fixed set of named character entities the post bodies
/// use. Soft hyphens are dropped entirely; unknown entities pass through
/// unchanged.
pub fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &regex::Captures| {
            match caps.get(0).unwrap().as_str() {
                "&shy;" => "",
                "&amp;" => "&",
                "&lt;" => "<",
                "&gt;" => ">",
                "&quot;" => "\"",
                "&#39;" => "'",
                "&apos;" => "'",
                "&ndash;" => "\u{2013}",
                "&mdash;" => "\u{2014}",
                "&hellip;" => "\u{2026}",
                other => other,
            }
            .to_owned()
        })
        .into_owned()
}

/// Converts an HTML fragment to plain text: markup stripped, then entities
/// decoded.
pub fn plain_text(html: &str) -> String {
    decode_entities(&strip_tags(html))
}

/// Wraps every case-insensitive occurrence of `term` in a highlight span. The
/// pattern is built from the literal term with all regex metacharacters
/// escaped. Only text runs are rewritten; occurrences inside `<...>` spans
/// (tag names, attributes) are left alone so the markup stays well-formed.
pub fn highlight(html: &str, term: &str) -> String {
    if term.is_empty() {
        return html.to_owned();
    }
    let pattern = Regex::new(&format!("(?i){}", regex::escape(term))).unwrap();

    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    for tag in TAG.find_iter(html) {
        out.push_str(&highlight_text(&html[pos..tag.start()], &pattern));
        out.push_str(tag.as_str());
        pos = tag.end();
    }
    out.push_str(&highlight_text(&html[pos..], &pattern));
    out
}

fn highlight_text(text: &str, pattern: &Regex) -> String {
    pattern
        .replace_all(text, |caps: &regex::Captures| {
            format!("<span class=\"highlight-tag\">{}</span>", &caps[0])
        })
        .into_owned()
}
