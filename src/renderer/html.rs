//! The default HTML renderer.
//!
//! Grounded on `original_source/html/html.c`'s `rndr_*`/`toc_*` callback
//! functions and `sdhtml_renderer`/`sdhtml_toc_renderer` wiring. The teacher's
//! binding only ever constructed the C renderer through FFI and exposed a
//! narrower flag set (`SKIP_HTML`, `ESCAPE`, `HARD_WRAP`, `USE_XHTML`); this
//! reimplements the C callbacks directly as a `Render` impl, and restores the
//! rest of the original's flags (`SKIP_STYLE`, `SKIP_LINKS`, `SKIP_IMAGES`,
//! `SAFELINK`, `TOC`, `OUTLINE`).

use crate::autolink::is_safe_link;
use crate::buffer::Buffer;
use crate::escape;
use crate::renderer::{AutoLink, List, Render, Table};

bitflags::bitflags! {
    /// Behavior flags for the default HTML renderer.
    #[derive(Default)]
    pub struct Flags: u32 {
        /// Self-close void elements (`<br/>`, `<hr/>`, `<img .../>`) instead
        /// of the HTML5 form.
        const XHTML = 1 << 0;
        /// HTML-escape every raw HTML block/span instead of passing it
        /// through or skipping it.
        const ESCAPE = 1 << 1;
        /// Drop raw HTML blocks and spans entirely.
        const SKIP_HTML = 1 << 2;
        /// Drop `<style>` spans.
        const SKIP_STYLE = 1 << 3;
        /// Drop `<a>` links (both raw HTML spans and rendered links).
        const SKIP_LINKS = 1 << 4;
        /// Drop `<img>` images (both raw HTML spans and rendered images).
        const SKIP_IMAGES = 1 << 5;
        /// Render a hard line break for every internal newline in a
        /// paragraph, instead of requiring a trailing two-space/backslash.
        const HARD_WRAP = 1 << 6;
        /// Suppress links/autolinks whose scheme isn't on the safe allowlist.
        const SAFELINK = 1 << 7;
        /// Add `id="toc_N"` anchors to headers, for linking from a
        /// separately rendered [`Html::toc`] document.
        const TOC = 1 << 8;
        /// Wrap each header and its following content in a `<section>`,
        /// closing/opening sections as the header level rises and falls.
        const OUTLINE = 1 << 9;
    }
}

/// Bookkeeping for `TOC` mode, threaded through both the body renderer (which
/// only needs to number headers) and [`Html::toc`] (which additionally
/// tracks nesting to open/close `<ul>`/`<li>`).
#[derive(Default)]
struct TocData {
    header_count: u32,
    current_level: i32,
    level_offset: i32,
}

/// Bookkeeping for `OUTLINE` mode.
#[derive(Default)]
struct OutlineData {
    open_section_count: i32,
    current_level: i32,
}

/// The default `Render` implementation: turns parsed Markdown into HTML.
///
/// Construct the document body renderer with [`Html::new`], or a standalone
/// table-of-contents renderer with [`Html::toc`] to run over the same
/// `Markdown` a second time.
pub struct Html {
    flags: Flags,
    toc: bool,
    #[allow(dead_code)]
    nesting_level: i32,
    toc_data: TocData,
    outline_data: OutlineData,
}

impl Html {
    /// The default document renderer.
    pub fn new(flags: Flags, nesting_level: i32) -> Html {
        Html {
            flags,
            toc: false,
            nesting_level,
            toc_data: TocData::default(),
            outline_data: OutlineData::default(),
        }
    }

    /// A renderer that, run over the same document, produces a standalone
    /// table of contents instead of the document body. `header` builds the
    /// nested `<ul>/<li>` skeleton instead of emitting `<hN>` tags, and the
    /// inline callbacks that can appear inside header text (`code_span`, the
    /// emphasis family, `link`, `normal_text`) keep working so header
    /// content renders correctly; every other block or span callback
    /// (paragraphs, lists, tables, footnotes, images, autolinks, raw HTML,
    /// line breaks) is a no-op, matching `sdhtml_toc_renderer`'s sparse
    /// callback table.
    pub fn toc(nesting_level: i32) -> Html {
        Html {
            flags: Flags::TOC,
            toc: true,
            nesting_level,
            toc_data: TocData::default(),
            outline_data: OutlineData::default(),
        }
    }

    fn xhtml(&self) -> bool {
        self.flags.contains(Flags::XHTML)
    }

    fn newline_if_nonempty(&self, output: &mut Buffer) {
        if !output.is_empty() {
            let _ = output.putc(b'\n');
        }
    }

    /// `header` for the standalone TOC renderer: tracks nested `<ul>/<li>`
    /// instead of emitting `<hN>` tags. Grounded on `html.c`'s `toc_header`.
    fn toc_header(&mut self, output: &mut Buffer, content: &Buffer, level: i32) {
        if self.toc_data.current_level == 0 {
            self.toc_data.level_offset = level - 1;
        }

        let level = level - self.toc_data.level_offset;

        if level > self.toc_data.current_level {
            while level > self.toc_data.current_level {
                let _ = output.put(b"<ul>\n<li>\n");
                self.toc_data.current_level += 1;
            }
        } else if level < self.toc_data.current_level {
            let _ = output.put(b"</li>\n");
            while level < self.toc_data.current_level {
                let _ = output.put(b"</ul>\n</li>\n");
                self.toc_data.current_level -= 1;
            }
            let _ = output.put(b"<li>\n");
        } else {
            let _ = output.put(b"</li>\n<li>\n");
        }

        let _ = output.printf(format_args!("<a href=\"#toc_{}\">", self.toc_data.header_count));
        self.toc_data.header_count += 1;
        let mut escaped = Vec::new();
        escape::html(&mut escaped, content.as_bytes(), true);
        let _ = output.put(&escaped);
        let _ = output.put(b"</a>\n");
    }
}

impl Render for Html {
    fn code_block(&mut self, output: &mut Buffer, text: &Buffer, lang: &Buffer) {
        if self.toc {
            return;
        }

        self.newline_if_nonempty(output);

        if !lang.is_empty() {
            let mut classes = String::new();
            for token in lang.as_bytes().split(|&b| b.is_ascii_whitespace()) {
                if token.is_empty() {
                    continue;
                }
                let token = if token.starts_with(b".") { &token[1..] } else { token };
                if !classes.is_empty() {
                    classes.push(' ');
                }
                classes.push_str(&String::from_utf8_lossy(token));
            }
            let _ = output.printf(format_args!("<pre><code class=\"{}\">", classes));
        } else {
            let _ = output.put(b"<pre><code>");
        }

        let mut escaped = Vec::new();
        escape::html(&mut escaped, text.as_bytes(), true);
        let _ = output.put(&escaped);
        let _ = output.put(b"</code></pre>\n");
    }

    fn quote_block(&mut self, output: &mut Buffer, content: &Buffer) {
        if self.toc {
            return;
        }

        self.newline_if_nonempty(output);
        let _ = output.put(b"<blockquote>\n");
        let _ = output.pipe(content);
        let _ = output.put(b"</blockquote>\n");
    }

    fn wants_html_blocks(&self) -> bool {
        !self.toc
    }

    fn html_block(&mut self, output: &mut Buffer, text: &Buffer) {
        if self.toc {
            return;
        }

        let mut sz = text.len();
        while sz > 0 && text[sz - 1] == b'\n' {
            sz -= 1;
        }

        let mut start = 0;
        while start < sz && text[start] == b'\n' {
            start += 1;
        }

        if start >= sz {
            return;
        }

        self.newline_if_nonempty(output);
        let _ = output.put(&text[start..sz]);
        let _ = output.putc(b'\n');
    }

    fn header(&mut self, output: &mut Buffer, content: &Buffer, level: i32) {
        if self.toc {
            self.toc_header(output, content, level);
            return;
        }

        self.newline_if_nonempty(output);

        if self.flags.contains(Flags::OUTLINE) {
            if self.outline_data.current_level >= level {
                let _ = output.put(b"</section>");
                self.outline_data.open_section_count -= 1;
            }

            let _ = output.printf(format_args!("<section class=\"section{}\">\n", level));
            self.outline_data.open_section_count += 1;
            self.outline_data.current_level = level;
        }

        if self.flags.contains(Flags::TOC) {
            let _ = output.printf(format_args!(
                "<h{} id=\"toc_{}\">",
                level, self.toc_data.header_count
            ));
            self.toc_data.header_count += 1;
        } else {
            let _ = output.printf(format_args!("<h{}>", level));
        }

        let _ = output.pipe(content);
        let _ = output.printf(format_args!("</h{}>\n", level));
    }

    fn horizontal_rule(&mut self, output: &mut Buffer) {
        if self.toc {
            return;
        }

        self.newline_if_nonempty(output);
        let _ = output.put(if self.xhtml() { b"<hr/>\n".as_ref() } else { b"<hr>\n".as_ref() });
    }

    fn list(&mut self, output: &mut Buffer, content: &Buffer, flags: List) {
        if self.toc {
            return;
        }

        self.newline_if_nonempty(output);

        if flags.contains(List::ORDERED) {
            let _ = output.put(b"<ol>\n");
        } else {
            let _ = output.put(b"<ul>\n");
        }

        let _ = output.pipe(content);

        if flags.contains(List::ORDERED) {
            let _ = output.put(b"</ol>\n");
        } else {
            let _ = output.put(b"</ul>\n");
        }
    }

    fn list_item(&mut self, output: &mut Buffer, content: &Buffer, _flags: List) {
        if self.toc {
            return;
        }

        let _ = output.put(b"<li>");

        let mut size = content.len();
        while size != 0 && content[size - 1] == b'\n' {
            size -= 1;
        }
        let _ = output.put(&content[..size]);

        let _ = output.put(b"</li>\n");
    }

    fn paragraph(&mut self, output: &mut Buffer, content: &Buffer) {
        if self.toc {
            return;
        }

        self.newline_if_nonempty(output);

        let text = content.as_bytes();
        let mut i = 0;
        while i < text.len() && text[i].is_ascii_whitespace() {
            i += 1;
        }
        if i == text.len() {
            return;
        }

        let _ = output.put(b"<p>");

        if self.flags.contains(Flags::HARD_WRAP) {
            while i < text.len() {
                let start = i;
                while i < text.len() && text[i] != b'\n' {
                    i += 1;
                }
                if i > start {
                    let _ = output.put(&text[start..i]);
                }

                if i >= text.len().saturating_sub(1) {
                    break;
                }

                self.line_break(output);
                i += 1;
            }
        } else {
            let _ = output.put(&text[i..]);
        }

        let _ = output.put(b"</p>\n");
    }

    fn table(&mut self, output: &mut Buffer, header: &Buffer, body: &Buffer) {
        if self.toc {
            return;
        }

        self.newline_if_nonempty(output);
        let _ = output.put(b"<table><thead>\n");
        let _ = output.pipe(header);
        let _ = output.put(b"</thead><tbody>\n");
        let _ = output.pipe(body);
        let _ = output.put(b"</tbody></table>\n");
    }

    fn table_row(&mut self, output: &mut Buffer, content: &Buffer) {
        if self.toc {
            return;
        }

        let _ = output.put(b"<tr>\n");
        let _ = output.pipe(content);
        let _ = output.put(b"</tr>\n");
    }

    fn table_cell(&mut self, output: &mut Buffer, content: &Buffer, flags: Table) {
        if self.toc {
            return;
        }

        let is_header = flags.contains(Table::HEADER);
        let _ = output.put(if is_header { b"<th".as_ref() } else { b"<td".as_ref() });

        if flags.contains(Table::CENTER) {
            let _ = output.put(b" style=\"text-align: center\">");
        } else if flags.contains(Table::LEFT) {
            let _ = output.put(b" style=\"text-align: left\">");
        } else if flags.contains(Table::RIGHT) {
            let _ = output.put(b" style=\"text-align: right\">");
        } else {
            let _ = output.put(b">");
        }

        let _ = output.pipe(content);

        let _ = output.put(if is_header { b"</th>\n".as_ref() } else { b"</td>\n".as_ref() });
    }

    fn footnotes(&mut self, output: &mut Buffer, content: &Buffer) {
        if self.toc {
            return;
        }

        let _ = output.put(b"<div class=\"footnotes\">\n<hr />\n<ol>\n");
        let _ = output.pipe(content);
        let _ = output.put(b"\n</ol>\n</div>\n");
    }

    fn footnote_definition(&mut self, output: &mut Buffer, content: &Buffer, num: u32) {
        if self.toc {
            return;
        }

        let text = content.as_bytes();
        let mut split_at = None;
        let mut i = 0;
        while i + 3 < text.len() {
            if text[i] == b'<'
                && text[i + 1] == b'/'
                && (text[i + 2] == b'p' || text[i + 2] == b'P')
                && text[i + 3] == b'>'
            {
                split_at = Some(i);
                break;
            }
            i += 1;
        }

        let _ = output.printf(format_args!("\n<li id=\"fn{}\">\n", num));

        if let Some(at) = split_at {
            let _ = output.put(&text[..at]);
            let _ = output.printf(format_args!(
                "&nbsp;<a href=\"#fnref{}\" rev=\"footnote\">&#8617;</a>",
                num
            ));
            let _ = output.put(&text[at..]);
        } else {
            let _ = output.put(text);
        }

        let _ = output.put(b"</li>\n");
    }

    fn autolink(&mut self, output: &mut Buffer, link: &Buffer, link_type: AutoLink) -> bool {
        if self.toc {
            return false;
        }

        if link.is_empty() {
            return false;
        }

        if self.flags.contains(Flags::SAFELINK) && link_type != AutoLink::Email && !is_safe_link(link.as_bytes()) {
            return false;
        }

        let _ = output.put(b"<a href=\"");

        let mut href = Vec::new();
        if link_type == AutoLink::Email {
            href.extend_from_slice(b"mailto:");
        }
        escape::href(&mut href, link.as_bytes());
        let _ = output.put(&href);

        let _ = output.put(b"\">");

        let visible: &[u8] = if link_type == AutoLink::Email {
            let bytes = link.as_bytes();
            if bytes.len() > 7 && bytes[..7].eq_ignore_ascii_case(b"mailto:") {
                &bytes[7..]
            } else {
                bytes
            }
        } else {
            link.as_bytes()
        };
        let mut escaped = Vec::new();
        escape::html(&mut escaped, visible, true);
        let _ = output.put(&escaped);

        let _ = output.put(b"</a>");
        true
    }

    fn code_span(&mut self, output: &mut Buffer, text: &Buffer) -> bool {
        let _ = output.put(b"<code>");
        let mut escaped = Vec::new();
        escape::html(&mut escaped, text.as_bytes(), true);
        let _ = output.put(&escaped);
        let _ = output.put(b"</code>");
        true
    }

    fn double_emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        if content.is_empty() {
            return false;
        }
        let _ = output.put(b"<strong>");
        let _ = output.pipe(content);
        let _ = output.put(b"</strong>");
        true
    }

    fn emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        if content.is_empty() {
            return false;
        }
        let _ = output.put(b"<em>");
        let _ = output.pipe(content);
        let _ = output.put(b"</em>");
        true
    }

    fn image(&mut self, output: &mut Buffer, link: &Buffer, title: &Buffer, alt: &Buffer) -> bool {
        if self.toc || link.is_empty() {
            return false;
        }

        let _ = output.put(b"<img src=\"");
        let mut href = Vec::new();
        escape::href(&mut href, link.as_bytes());
        let _ = output.put(&href);
        let _ = output.put(b"\" alt=\"");

        if !alt.is_empty() {
            let mut escaped = Vec::new();
            escape::html(&mut escaped, alt.as_bytes(), true);
            let _ = output.put(&escaped);
        }

        if !title.is_empty() {
            let _ = output.put(b"\" title=\"");
            let mut escaped = Vec::new();
            escape::html(&mut escaped, title.as_bytes(), true);
            let _ = output.put(&escaped);
        }

        let _ = output.put(if self.xhtml() { b"\"/>".as_ref() } else { b"\">".as_ref() });
        true
    }

    fn line_break(&mut self, output: &mut Buffer) -> bool {
        if self.toc {
            return false;
        }

        let _ = output.put(if self.xhtml() { b"<br/>\n".as_ref() } else { b"<br>\n".as_ref() });
        true
    }

    fn link(&mut self, output: &mut Buffer, content: &Buffer, link: &Buffer, title: &Buffer) -> bool {
        if self.toc {
            if !content.is_empty() {
                let _ = output.pipe(content);
            }
            return true;
        }

        if self.flags.contains(Flags::SAFELINK) && !link.is_empty() && !is_safe_link(link.as_bytes()) {
            return false;
        }

        let _ = output.put(b"<a href=\"");
        if !link.is_empty() {
            let mut href = Vec::new();
            escape::href(&mut href, link.as_bytes());
            let _ = output.put(&href);
        }

        if !title.is_empty() {
            let _ = output.put(b"\" title=\"");
            let mut escaped = Vec::new();
            escape::html(&mut escaped, title.as_bytes(), true);
            let _ = output.put(&escaped);
        }

        let _ = output.put(b"\">");

        if !content.is_empty() {
            let _ = output.pipe(content);
        }

        let _ = output.put(b"</a>");
        true
    }

    fn triple_emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        if content.is_empty() {
            return false;
        }
        let _ = output.put(b"<strong><em>");
        let _ = output.pipe(content);
        let _ = output.put(b"</em></strong>");
        true
    }

    fn ins(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        if content.is_empty() {
            return false;
        }
        let _ = output.put(b"<ins>");
        let _ = output.pipe(content);
        let _ = output.put(b"</ins>");
        true
    }

    fn strikethrough(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        if content.is_empty() {
            return false;
        }
        let _ = output.put(b"<del>");
        let _ = output.pipe(content);
        let _ = output.put(b"</del>");
        true
    }

    fn superscript(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        if content.is_empty() {
            return false;
        }
        let _ = output.put(b"<sup>");
        let _ = output.pipe(content);
        let _ = output.put(b"</sup>");
        true
    }

    fn html_span(&mut self, output: &mut Buffer, text: &Buffer) -> bool {
        if self.toc {
            return false;
        }

        if self.flags.contains(Flags::ESCAPE) {
            let mut escaped = Vec::new();
            escape::html(&mut escaped, text.as_bytes(), true);
            let _ = output.put(&escaped);
            return true;
        }

        if self.flags.contains(Flags::SKIP_HTML) {
            return true;
        }

        if self.flags.contains(Flags::SKIP_STYLE) && is_tag(text.as_bytes(), "style") {
            return true;
        }

        if self.flags.contains(Flags::SKIP_LINKS) && is_tag(text.as_bytes(), "a") {
            return true;
        }

        if self.flags.contains(Flags::SKIP_IMAGES) && is_tag(text.as_bytes(), "img") {
            return true;
        }

        let _ = output.put(text.as_bytes());
        true
    }

    fn footnote_reference(&mut self, output: &mut Buffer, num: u32) -> bool {
        if self.toc {
            return false;
        }

        let _ = output.printf(format_args!(
            "<sup id=\"fnref{}\"><a href=\"#fn{}\" rel=\"footnote\">{}</a></sup>",
            num, num, num
        ));
        true
    }

    fn normal_text(&mut self, output: &mut Buffer, text: &Buffer) {
        let mut escaped = Vec::new();
        escape::html(&mut escaped, text.as_bytes(), true);
        let _ = output.put(&escaped);
    }

    fn finalize(&mut self, output: &mut Buffer) {
        if self.toc {
            while self.toc_data.current_level > 0 {
                let _ = output.put(b"</li>\n</ul>\n");
                self.toc_data.current_level -= 1;
            }
            return;
        }

        if self.flags.contains(Flags::OUTLINE) {
            for _ in 0..self.outline_data.open_section_count {
                let _ = output.put(b"\n</section>\n");
            }
        }
    }
}

fn is_tag(bytes: &[u8], name: &str) -> bool {
    if bytes.len() < 3 || bytes[0] != b'<' {
        return false;
    }

    let mut i = 1;
    if bytes.get(i) == Some(&b'/') {
        i += 1;
    }

    let name = name.as_bytes();
    let mut n = 0;
    while i < bytes.len() && n < name.len() {
        if !bytes[i].eq_ignore_ascii_case(&name[n]) {
            return false;
        }
        i += 1;
        n += 1;
    }

    if n != name.len() || i >= bytes.len() {
        return false;
    }

    bytes[i].is_ascii_whitespace() || bytes[i] == b'>' || bytes[i] == b'/'
}
