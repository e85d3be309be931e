//! A diagnostic renderer wrapper, grounded on the teacher's `Trace` renderer
//! (`src/renderer/trace.rs`), which implemented every block handler to write
//! `MISSING <NAME> HANDLER` markers directly into the rendered document so a
//! developer could see at a glance which callbacks a renderer-under-test
//! left unimplemented.
//!
//! Writing diagnostics into the document being rendered doesn't hold up
//! outside that FFI demo, so this wraps an inner [`Render`] instead: span
//! methods that decline (return `false`) are logged via [`log::debug!`]
//! before the wrapper lets the caller fall back to literal text, and nothing
//! is written to `output` beyond what the inner renderer itself writes.

use crate::buffer::Buffer;
use crate::renderer::{AutoLink, List, Render, Table};

/// Wraps a renderer `R`, logging at `debug` level whenever a span-level
/// method declines to handle its construct.
pub struct LoggingRenderer<R> {
    inner: R,
}

impl<R: Render> LoggingRenderer<R> {
    pub fn new(inner: R) -> LoggingRenderer<R> {
        LoggingRenderer { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

macro_rules! log_if_declined {
    ($name:expr, $handled:expr) => {{
        let handled = $handled;
        if !handled {
            log::debug!("{} declined; emitting literally", $name);
        }
        handled
    }};
}

impl<R: Render> Render for LoggingRenderer<R> {
    fn code_block(&mut self, output: &mut Buffer, text: &Buffer, lang: &Buffer) {
        self.inner.code_block(output, text, lang)
    }
    fn quote_block(&mut self, output: &mut Buffer, content: &Buffer) {
        self.inner.quote_block(output, content)
    }
    fn html_block(&mut self, output: &mut Buffer, text: &Buffer) {
        self.inner.html_block(output, text)
    }
    fn wants_html_blocks(&self) -> bool {
        self.inner.wants_html_blocks()
    }
    fn header(&mut self, output: &mut Buffer, content: &Buffer, level: i32) {
        self.inner.header(output, content, level)
    }
    fn horizontal_rule(&mut self, output: &mut Buffer) {
        self.inner.horizontal_rule(output)
    }
    fn list(&mut self, output: &mut Buffer, content: &Buffer, flags: List) {
        self.inner.list(output, content, flags)
    }
    fn list_item(&mut self, output: &mut Buffer, content: &Buffer, flags: List) {
        self.inner.list_item(output, content, flags)
    }
    fn paragraph(&mut self, output: &mut Buffer, content: &Buffer) {
        self.inner.paragraph(output, content)
    }
    fn table(&mut self, output: &mut Buffer, header: &Buffer, body: &Buffer) {
        self.inner.table(output, header, body)
    }
    fn table_row(&mut self, output: &mut Buffer, content: &Buffer) {
        self.inner.table_row(output, content)
    }
    fn table_cell(&mut self, output: &mut Buffer, content: &Buffer, flags: Table) {
        self.inner.table_cell(output, content, flags)
    }
    fn footnotes(&mut self, output: &mut Buffer, content: &Buffer) {
        self.inner.footnotes(output, content)
    }
    fn footnote_definition(&mut self, output: &mut Buffer, content: &Buffer, num: u32) {
        self.inner.footnote_definition(output, content, num)
    }

    fn autolink(&mut self, output: &mut Buffer, link: &Buffer, link_type: AutoLink) -> bool {
        log_if_declined!("autolink", self.inner.autolink(output, link, link_type))
    }
    fn code_span(&mut self, output: &mut Buffer, text: &Buffer) -> bool {
        log_if_declined!("code_span", self.inner.code_span(output, text))
    }
    fn double_emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        log_if_declined!("double_emphasis", self.inner.double_emphasis(output, content))
    }
    fn emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        log_if_declined!("emphasis", self.inner.emphasis(output, content))
    }
    fn image(&mut self, output: &mut Buffer, link: &Buffer, title: &Buffer, alt: &Buffer) -> bool {
        log_if_declined!("image", self.inner.image(output, link, title, alt))
    }
    fn line_break(&mut self, output: &mut Buffer) -> bool {
        log_if_declined!("line_break", self.inner.line_break(output))
    }
    fn link(&mut self, output: &mut Buffer, content: &Buffer, link: &Buffer, title: &Buffer) -> bool {
        log_if_declined!("link", self.inner.link(output, content, link, title))
    }
    fn triple_emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        log_if_declined!("triple_emphasis", self.inner.triple_emphasis(output, content))
    }
    fn ins(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        log_if_declined!("ins", self.inner.ins(output, content))
    }
    fn strikethrough(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        log_if_declined!("strikethrough", self.inner.strikethrough(output, content))
    }
    fn superscript(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        log_if_declined!("superscript", self.inner.superscript(output, content))
    }
    fn html_span(&mut self, output: &mut Buffer, text: &Buffer) -> bool {
        log_if_declined!("html_span", self.inner.html_span(output, text))
    }
    fn footnote_reference(&mut self, output: &mut Buffer, num: u32) -> bool {
        log_if_declined!("footnote_reference", self.inner.footnote_reference(output, num))
    }

    fn entity(&mut self, output: &mut Buffer, text: &Buffer) {
        self.inner.entity(output, text)
    }
    fn normal_text(&mut self, output: &mut Buffer, text: &Buffer) {
        self.inner.normal_text(output, text)
    }

    fn before_render(&mut self, output: &mut Buffer, inline_render: bool) {
        self.inner.before_render(output, inline_render)
    }
    fn after_render(&mut self, output: &mut Buffer, inline_render: bool) {
        self.inner.after_render(output, inline_render)
    }
    fn finalize(&mut self, output: &mut Buffer) {
        self.inner.finalize(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysDecline;
    impl Render for AlwaysDecline {}

    #[test]
    fn delegates_and_reports_inner_result() {
        let mut renderer = LoggingRenderer::new(AlwaysDecline);
        let mut out = Buffer::new(16);
        let handled = renderer.emphasis(&mut out, &Buffer::from_slice(b"hi"));
        assert!(!handled);
    }
}
