//! Integration tests for each `Html` renderer flag.

use waymark::renderer::html::{self, Html};
use waymark::Markdown;

macro_rules! html_test {
    ($flag:expr, $left:expr, $right:expr) => {{
        let doc = Markdown::new($left);
        let mut renderer = Html::new($flag, 0);
        assert_eq!(doc.to_html(&mut renderer).unwrap(), $right);
    }};
}

#[test]
fn skip_html_drops_raw_tags() {
    html_test!(
        html::Flags::SKIP_HTML,
        "It <blink>must be</blink> allergies.",
        "<p>It must be allergies.</p>\n"
    );
}

#[test]
fn escape_html_escapes_raw_tags() {
    html_test!(
        html::Flags::ESCAPE,
        "JavaScript is pure <strong style=\"color: red;\">evil</strong>.",
        "<p>JavaScript is pure &lt;strong style=&quot;color: red;&quot;&gt;evil&lt;/strong&gt;.</p>\n"
    );
}

#[test]
fn hard_wrap_turns_every_newline_into_a_break() {
    html_test!(
        html::Flags::HARD_WRAP,
        "One.\nAt.\nA.\nTime.",
        "<p>One.<br>\nAt.<br>\nA.<br>\nTime.</p>\n"
    );
}

#[test]
fn xhtml_self_closes_void_elements() {
    html_test!(
        html::Flags::XHTML,
        "![spacer](spacer.gif)",
        "<p><img src=\"spacer.gif\" alt=\"spacer\"/></p>\n"
    );
}

#[test]
fn skip_style_drops_style_spans_only() {
    let doc = Markdown::new("<style>body{}</style> but <b>keep</b> this.");
    let mut renderer = Html::new(html::Flags::SKIP_STYLE, 0);
    let out = doc.to_html(&mut renderer).unwrap();

    assert!(!out.contains("<style>"));
    assert!(out.contains("<b>keep</b>"));
}

#[test]
fn skip_links_drops_anchor_tags_only() {
    let doc = Markdown::new("<a href=\"x\">raw</a> and <b>bold</b>.");
    let mut renderer = Html::new(html::Flags::SKIP_LINKS, 0);
    let out = doc.to_html(&mut renderer).unwrap();

    assert!(!out.contains("<a href"));
    assert!(out.contains("<b>bold</b>"));
}

#[test]
fn skip_images_drops_img_tags_only() {
    let doc = Markdown::new("<img src=\"x\"> and <b>bold</b>.");
    let mut renderer = Html::new(html::Flags::SKIP_IMAGES, 0);
    let out = doc.to_html(&mut renderer).unwrap();

    assert!(!out.contains("<img"));
    assert!(out.contains("<b>bold</b>"));
}

#[test]
fn safelink_suppresses_unsafe_schemes() {
    let doc = Markdown::new("[click me](javascript:alert(1))");
    let mut renderer = Html::new(html::Flags::SAFELINK, 0);
    let out = doc.to_html(&mut renderer).unwrap();

    assert!(!out.contains("<a href"));
    assert!(out.contains("click me"));
}

#[test]
fn safelink_allows_http() {
    let doc = Markdown::new("[click me](http://example.com)");
    let mut renderer = Html::new(html::Flags::SAFELINK, 0);
    let out = doc.to_html(&mut renderer).unwrap();

    assert!(out.contains("<a href=\"http://example.com\">click me</a>"));
}
