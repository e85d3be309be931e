//! The renderer callback contract.
//!
//! Grounded on the teacher's own `Render` trait (`src/renderer/mod.rs` in
//! `blaenk-hoedown`): a struct of nullable C function pointers is replaced by
//! a plain trait with default-implemented methods, each carrying the same
//! "absent" semantics the original's null-pointer check did. There is no FFI
//! boundary to satisfy here, so methods take and return plain Rust types
//! instead of `hoedown_buffer`/`hoedown_renderer`.

use crate::buffer::Buffer;

/// Behavior that turns parsed Markdown constructs into output bytes.
///
/// Every method has a default implementation, so an implementor only
/// overrides the constructs it cares about. Block-level methods default to a
/// no-op (nothing sensible to fall back to for a whole block); span-level
/// methods default to returning `false` ("I decline; re-emit the source
/// literally"); the two low-level methods default to passing their text
/// through unchanged.
#[allow(unused_variables)]
pub trait Render {
    // ---- block-level: default is a no-op ----

    /// A fenced or indented code block. `lang` is empty for an indented block
    /// or an un-languaged fence.
    fn code_block(&mut self, output: &mut Buffer, text: &Buffer, lang: &Buffer) {}

    /// A blockquote (`>`-prefixed lines).
    fn quote_block(&mut self, output: &mut Buffer, content: &Buffer) {}

    /// A recognized raw HTML block.
    fn html_block(&mut self, output: &mut Buffer, text: &Buffer) {}

    /// Whether the block parser should scan for raw HTML blocks at all.
    /// Mirrors the original's `if (cb.blockhtml) ...` gate on a null
    /// callback pointer: a renderer indifferent to raw HTML can opt out so
    /// `<...>` text falls through to paragraph/inline parsing instead of
    /// being recognized and consumed as an HTML block. Defaults to `true`,
    /// matching every renderer in this crate except the TOC renderer.
    fn wants_html_blocks(&self) -> bool {
        true
    }

    /// An ATX (`#`) or setext (underlined) header at the given level (1-6).
    fn header(&mut self, output: &mut Buffer, content: &Buffer, level: i32) {}

    /// A horizontal rule (`---`, `***`, `___`).
    fn horizontal_rule(&mut self, output: &mut Buffer) {}

    /// An ordered or unordered list. `content` is the already-rendered list
    /// items.
    fn list(&mut self, output: &mut Buffer, content: &Buffer, flags: List) {}

    /// A single list item.
    fn list_item(&mut self, output: &mut Buffer, content: &Buffer, flags: List) {}

    /// A paragraph.
    fn paragraph(&mut self, output: &mut Buffer, content: &Buffer) {}

    /// A table. `header` and `body` are the already-rendered header and body
    /// row groups (only runs with the `TABLES` extension enabled).
    fn table(&mut self, output: &mut Buffer, header: &Buffer, body: &Buffer) {}

    /// A single table row, spanning either the header or the body.
    fn table_row(&mut self, output: &mut Buffer, content: &Buffer) {}

    /// A single table cell.
    fn table_cell(&mut self, output: &mut Buffer, content: &Buffer, flags: Table) {}

    /// The collected footnote definitions, rendered once at the end of the
    /// document (only runs with the `FOOTNOTES` extension enabled).
    fn footnotes(&mut self, output: &mut Buffer, content: &Buffer) {}

    /// A single footnote definition, in first-reference order.
    fn footnote_definition(&mut self, output: &mut Buffer, content: &Buffer, num: u32) {}

    // ---- span-level: default is "decline" ----

    /// A bare autolink candidate (`AUTOLINK` extension) or an angle-bracketed
    /// `<scheme:...>`/`<user@host>`.
    fn autolink(&mut self, output: &mut Buffer, link: &Buffer, link_type: AutoLink) -> bool {
        false
    }

    /// A backtick-delimited code span.
    fn code_span(&mut self, output: &mut Buffer, text: &Buffer) -> bool {
        false
    }

    /// `**double emphasis**` (or `__double__`).
    fn double_emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        false
    }

    /// `*emphasis*` (or `_emphasis_`).
    fn emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        false
    }

    /// `![alt](link "title")`.
    fn image(&mut self, output: &mut Buffer, link: &Buffer, title: &Buffer, alt: &Buffer) -> bool {
        false
    }

    /// A hard line break (two trailing spaces before `\n`).
    fn line_break(&mut self, output: &mut Buffer) -> bool {
        false
    }

    /// `[content](link "title")` or a reference-style link.
    fn link(
        &mut self,
        output: &mut Buffer,
        content: &Buffer,
        link: &Buffer,
        title: &Buffer,
    ) -> bool {
        false
    }

    /// `***triple emphasis***`.
    fn triple_emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        false
    }

    /// `++inserted++` (`INS` extension).
    fn ins(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        false
    }

    /// `~~strikethrough~~` (`STRIKETHROUGH` extension).
    fn strikethrough(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        false
    }

    /// `^superscript` or `^(superscript)` (`SUPERSCRIPT` extension).
    fn superscript(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        false
    }

    /// A raw inline HTML tag.
    fn html_span(&mut self, output: &mut Buffer, text: &Buffer) -> bool {
        false
    }

    /// A `[^id]` footnote reference (`FOOTNOTES` extension).
    fn footnote_reference(&mut self, output: &mut Buffer, num: u32) -> bool {
        false
    }

    // ---- low-level: default is pass-through ----

    /// An HTML entity (`&amp;`, `&#123;`, ...).
    fn entity(&mut self, output: &mut Buffer, text: &Buffer) {
        let _ = output.pipe(text);
    }

    /// A run of plain text between active characters.
    fn normal_text(&mut self, output: &mut Buffer, text: &Buffer) {
        let _ = output.pipe(text);
    }

    // ---- lifecycle: default is a no-op ----

    /// Runs once before any block is parsed.
    fn before_render(&mut self, output: &mut Buffer, inline_render: bool) {}

    /// Runs once after the last block (and footnotes, if any) is rendered.
    fn after_render(&mut self, output: &mut Buffer, inline_render: bool) {}

    /// Runs once at the very end, after `after_render`, for renderers (TOC,
    /// outline mode) that need to close state accumulated across the whole
    /// render.
    fn finalize(&mut self, output: &mut Buffer) {}
}

/// Delegates every method to `**self`, so a `&mut dyn Render` or `&mut
/// SomeRenderer` can be passed anywhere a `Render` is expected.
impl<'a, R: Render + ?Sized> Render for &'a mut R {
    fn code_block(&mut self, output: &mut Buffer, text: &Buffer, lang: &Buffer) {
        (**self).code_block(output, text, lang)
    }
    fn quote_block(&mut self, output: &mut Buffer, content: &Buffer) {
        (**self).quote_block(output, content)
    }
    fn html_block(&mut self, output: &mut Buffer, text: &Buffer) {
        (**self).html_block(output, text)
    }
    fn wants_html_blocks(&self) -> bool {
        (**self).wants_html_blocks()
    }
    fn header(&mut self, output: &mut Buffer, content: &Buffer, level: i32) {
        (**self).header(output, content, level)
    }
    fn horizontal_rule(&mut self, output: &mut Buffer) {
        (**self).horizontal_rule(output)
    }
    fn list(&mut self, output: &mut Buffer, content: &Buffer, flags: List) {
        (**self).list(output, content, flags)
    }
    fn list_item(&mut self, output: &mut Buffer, content: &Buffer, flags: List) {
        (**self).list_item(output, content, flags)
    }
    fn paragraph(&mut self, output: &mut Buffer, content: &Buffer) {
        (**self).paragraph(output, content)
    }
    fn table(&mut self, output: &mut Buffer, header: &Buffer, body: &Buffer) {
        (**self).table(output, header, body)
    }
    fn table_row(&mut self, output: &mut Buffer, content: &Buffer) {
        (**self).table_row(output, content)
    }
    fn table_cell(&mut self, output: &mut Buffer, content: &Buffer, flags: Table) {
        (**self).table_cell(output, content, flags)
    }
    fn footnotes(&mut self, output: &mut Buffer, content: &Buffer) {
        (**self).footnotes(output, content)
    }
    fn footnote_definition(&mut self, output: &mut Buffer, content: &Buffer, num: u32) {
        (**self).footnote_definition(output, content, num)
    }

    fn autolink(&mut self, output: &mut Buffer, link: &Buffer, link_type: AutoLink) -> bool {
        (**self).autolink(output, link, link_type)
    }
    fn code_span(&mut self, output: &mut Buffer, text: &Buffer) -> bool {
        (**self).code_span(output, text)
    }
    fn double_emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        (**self).double_emphasis(output, content)
    }
    fn emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        (**self).emphasis(output, content)
    }
    fn image(&mut self, output: &mut Buffer, link: &Buffer, title: &Buffer, alt: &Buffer) -> bool {
        (**self).image(output, link, title, alt)
    }
    fn line_break(&mut self, output: &mut Buffer) -> bool {
        (**self).line_break(output)
    }
    fn link(&mut self, output: &mut Buffer, content: &Buffer, link: &Buffer, title: &Buffer) -> bool {
        (**self).link(output, content, link, title)
    }
    fn triple_emphasis(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        (**self).triple_emphasis(output, content)
    }
    fn ins(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        (**self).ins(output, content)
    }
    fn strikethrough(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        (**self).strikethrough(output, content)
    }
    fn superscript(&mut self, output: &mut Buffer, content: &Buffer) -> bool {
        (**self).superscript(output, content)
    }
    fn html_span(&mut self, output: &mut Buffer, text: &Buffer) -> bool {
        (**self).html_span(output, text)
    }
    fn footnote_reference(&mut self, output: &mut Buffer, num: u32) -> bool {
        (**self).footnote_reference(output, num)
    }

    fn entity(&mut self, output: &mut Buffer, text: &Buffer) {
        (**self).entity(output, text)
    }
    fn normal_text(&mut self, output: &mut Buffer, text: &Buffer) {
        (**self).normal_text(output, text)
    }

    fn before_render(&mut self, output: &mut Buffer, inline_render: bool) {
        (**self).before_render(output, inline_render)
    }
    fn after_render(&mut self, output: &mut Buffer, inline_render: bool) {
        (**self).after_render(output, inline_render)
    }
    fn finalize(&mut self, output: &mut Buffer) {
        (**self).finalize(output)
    }
}

bitflags::bitflags! {
    /// Flags describing a list or list item.
    #[derive(Default)]
    pub struct List: u32 {
        /// An ordered (`1.`) list or list item, as opposed to unordered
        /// (`-`/`*`/`+`).
        const ORDERED = 1 << 0;
        /// A list item whose content was rendered at block level (it
        /// contained a blank line), rather than inline.
        const BLOCK = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Flags describing a table cell: alignment plus whether it belongs to
    /// the header row.
    #[derive(Default)]
    pub struct Table: u32 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const CENTER = 1 << 2;
        const HEADER = 1 << 3;
    }
}

/// The kind of autolink candidate passed to `Render::autolink`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AutoLink {
    Normal,
    Email,
}

pub mod html;
pub mod logging;
