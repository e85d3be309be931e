//! Recognized HTML block-level element names, used by the block parser to
//! decide whether a `<tag` opener should be scanned as a raw HTML block.
//!
//! Out of scope per this crate's purpose (an external collaborator with a
//! thin, documented interface): a plain name lookup, not a port of any
//! particular reference table.
//!
//! `hr` is deliberately absent: it's self-closing and never has a matching
//! `</hr>`, so it's recognized through its own special case in the parser's
//! HTML-block scan rather than through this table (same for bare `<!--...-->`
//! comments).

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "blockquote", "body", "canvas",
    "caption", "col", "colgroup", "dd", "details", "dialog", "dir", "div",
    "del", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup",
    "html", "iframe", "ins", "legend", "li", "link", "main", "menu", "menuitem",
    "meta", "nav", "noscript", "ol", "optgroup", "option", "p", "param",
    "pre", "section", "source", "style", "summary", "table", "tbody",
    "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

/// Tags that are treated as inline-only even though they are block-level
/// elements: commonly used as inline wrappers around a single paragraph, so
/// the lenient second-pass closing-tag scan is skipped for them (grounded on
/// `original_source/src/markdown.c`'s `htmlblock_end`).
const INLINE_ONLY_BLOCK_TAGS: &[&str] = &["ins", "del"];

pub fn is_block_tag(name: &[u8]) -> bool {
    BLOCK_TAGS
        .iter()
        .any(|tag| name.eq_ignore_ascii_case(tag.as_bytes()))
}

pub fn is_inline_only_block_tag(name: &[u8]) -> bool {
    INLINE_ONLY_BLOCK_TAGS
        .iter()
        .any(|tag| name.eq_ignore_ascii_case(tag.as_bytes()))
}
