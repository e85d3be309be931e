//! The two-pass driver, block parser, and inline scanner.
//!
//! Pass 1 walks the raw input line by line, pulling out link reference and
//! footnote definitions (so they can be declared anywhere, including after
//! their first use) and expanding tabs into staging storage with normalized
//! `\n` line endings. Pass 2 runs the recursive-descent block parser over
//! that staging buffer, which in turn calls the inline scanner on each
//! block's text. Grounded throughout on `original_source/src/markdown.c`'s
//! `hoedown_document_render` / `parse_block` / `parse_inline`, reshaped from
//! a single `Parser` instance with nullable-callback dispatch into owned
//! Rust data structures and a `Render` trait object.

use std::cell::{Cell, RefCell};

use crate::autolink;
use crate::buffer::Buffer;
use crate::error::Result;
use crate::extensions::Extension;
use crate::html_blocks::{is_block_tag, is_inline_only_block_tag};
use crate::pool::{BufferPool, Scope};
use crate::refs::{FootnoteTable, RefTable};
use crate::renderer::{AutoLink, List, Render, Table};

const TRIGGER_NONE: u8 = 0;
const TRIGGER_EMPHASIS: u8 = 1;
const TRIGGER_CODESPAN: u8 = 2;
const TRIGGER_LINEBREAK: u8 = 3;
const TRIGGER_LINK: u8 = 4;
const TRIGGER_ANGLE: u8 = 5;
const TRIGGER_ESCAPE: u8 = 6;
const TRIGGER_ENTITY: u8 = 7;
const TRIGGER_AUTOLINK_URL: u8 = 8;
const TRIGGER_AUTOLINK_EMAIL: u8 = 9;
const TRIGGER_AUTOLINK_WWW: u8 = 10;
const TRIGGER_SUPERSCRIPT: u8 = 11;

const ESCAPABLE: &[u8] = b"\\`*_{}[]()#+-.!:|&<>^~$";

fn build_active_char(extensions: Extension) -> [u8; 256] {
    let mut table = [TRIGGER_NONE; 256];
    table[b'*' as usize] = TRIGGER_EMPHASIS;
    table[b'_' as usize] = TRIGGER_EMPHASIS;
    if extensions.contains(Extension::STRIKETHROUGH) {
        table[b'~' as usize] = TRIGGER_EMPHASIS;
    }
    if extensions.contains(Extension::INS) {
        table[b'+' as usize] = TRIGGER_EMPHASIS;
    }
    table[b'`' as usize] = TRIGGER_CODESPAN;
    table[b'\n' as usize] = TRIGGER_LINEBREAK;
    table[b'[' as usize] = TRIGGER_LINK;
    table[b'<' as usize] = TRIGGER_ANGLE;
    table[b'\\' as usize] = TRIGGER_ESCAPE;
    table[b'&' as usize] = TRIGGER_ENTITY;
    if extensions.contains(Extension::AUTOLINK) {
        table[b':' as usize] = TRIGGER_AUTOLINK_URL;
        table[b'@' as usize] = TRIGGER_AUTOLINK_EMAIL;
        table[b'w' as usize] = TRIGGER_AUTOLINK_WWW;
    }
    if extensions.contains(Extension::SUPERSCRIPT) {
        table[b'^' as usize] = TRIGGER_SUPERSCRIPT;
    }
    table
}

/// Increments a shared depth counter on construction, decrements it on drop.
/// `parse_block` and `parse_inline` each hold one of these for the duration
/// of their call so that `block_depth + span_depth` always reflects the live
/// recursion depth, even when a rule returns early.
struct DepthGuard<'a> {
    counter: &'a Cell<usize>,
}

impl<'a> DepthGuard<'a> {
    fn enter(counter: &'a Cell<usize>) -> DepthGuard<'a> {
        counter.set(counter.get() + 1);
        DepthGuard { counter }
    }
}

impl<'a> Drop for DepthGuard<'a> {
    fn drop(&mut self) {
        self.counter.set(self.counter.get() - 1);
    }
}

/// Parses Markdown text against a fixed set of [`Extension`]s and renders it
/// through a caller-supplied [`Render`] implementation.
///
/// A `Parser` is single-use: `render`/`render_into` reset the reference and
/// footnote tables at the start of every call, so reusing one instance
/// across unrelated documents is safe but buys nothing over constructing a
/// fresh one (construction is cheap -- no allocation beyond the empty
/// tables).
pub struct Parser {
    extensions: Extension,
    max_nesting: usize,
    pool: BufferPool,
    refs: RefCell<RefTable>,
    footnotes: RefCell<FootnoteTable>,
    in_link_body: Cell<bool>,
    active_char: [u8; 256],
    block_depth: Cell<usize>,
    span_depth: Cell<usize>,
}

impl Parser {
    pub fn new(extensions: Extension, max_nesting: usize) -> Parser {
        Parser {
            extensions,
            max_nesting,
            pool: BufferPool::new(),
            refs: RefCell::new(RefTable::new()),
            footnotes: RefCell::new(FootnoteTable::new()),
            in_link_body: Cell::new(false),
            active_char: build_active_char(extensions),
            block_depth: Cell::new(0),
            span_depth: Cell::new(0),
        }
    }

    /// Renders `input` into a freshly allocated buffer.
    pub fn render<R: Render>(&self, input: &[u8], renderer: &mut R) -> Result<Buffer> {
        let mut out = Buffer::new(256);
        self.render_into(input, &mut out, renderer)?;
        Ok(out)
    }

    /// Renders `input`, appending to `out`.
    pub fn render_into<R: Render>(&self, input: &[u8], out: &mut Buffer, renderer: &mut R) -> Result<()> {
        *self.refs.borrow_mut() = RefTable::new();
        *self.footnotes.borrow_mut() = FootnoteTable::new();
        self.render_dyn(input, out, renderer)
    }

    fn render_dyn(&self, input: &[u8], out: &mut Buffer, renderer: &mut dyn Render) -> Result<()> {
        log::debug!("pass 1: scanning {} bytes for references", input.len());
        let staging = self.pass1(input)?;
        log::debug!("pass 2: parsing {} staged bytes", staging.len());

        renderer.before_render(out, false);

        if !staging.is_empty() {
            let mut body = staging.as_bytes().to_vec();
            if body.last() != Some(&b'\n') {
                body.push(b'\n');
            }
            self.parse_block(out, &body, renderer);
        }

        if self.extensions.contains(Extension::FOOTNOTES) {
            self.render_footnotes(out, renderer);
        }

        renderer.after_render(out, false);
        renderer.finalize(out);

        debug_assert!(self.pool.is_balanced(), "buffer pool checkouts leaked during render");
        Ok(())
    }

    // ---- pass 1: reference extraction + tab expansion ----

    fn pass1(&self, input: &[u8]) -> Result<Buffer> {
        let input = input.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(input);

        let mut staging = Buffer::new(1024);
        let mut pos = 0;

        while pos < input.len() {
            let rest = &input[pos..];

            if self.extensions.contains(Extension::FOOTNOTES) {
                if let Some((id, body, consumed)) = recognize_footnote_def(rest) {
                    log::trace!("pass 1: footnote definition `{}`", String::from_utf8_lossy(&id));
                    self.footnotes.borrow_mut().define(&id, Buffer::from(body));
                    pos += consumed;
                    continue;
                }
            }

            if let Some((id, url, title, consumed)) = recognize_link_ref(rest) {
                log::trace!("pass 1: link reference `{}`", String::from_utf8_lossy(&id));
                self.refs.borrow_mut().insert(&id, Buffer::from(url), Buffer::from(title));
                pos += consumed;
                continue;
            }

            let (line, next) = split_first_line(rest);
            let mut column = 0;
            for &byte in line {
                if byte == b'\t' {
                    let spaces = 4 - (column % 4);
                    for _ in 0..spaces {
                        staging.putc(b' ')?;
                    }
                    column += spaces;
                } else {
                    staging.putc(byte)?;
                    column += 1;
                }
            }
            staging.putc(b'\n')?;
            pos += next;
        }

        Ok(staging)
    }

    fn render_footnotes(&self, out: &mut Buffer, renderer: &mut dyn Render) {
        let indices: Vec<usize> = self.footnotes.borrow().used.clone();
        if indices.is_empty() {
            return;
        }

        let mut content = self.pool.checkout(Scope::Block);
        for index in indices {
            let (contents, num) = {
                let footnotes = self.footnotes.borrow();
                let footnote = &footnotes.found[index];
                (footnote.contents.clone(), footnote.num)
            };
            let mut body_out = self.pool.checkout(Scope::Block);
            self.parse_block(&mut body_out, contents.as_bytes(), renderer);
            renderer.footnote_definition(&mut content, &body_out, num);
        }
        renderer.footnotes(out, &content);
    }

    // ---- pass 2: block parser ----

    fn parse_block(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render) {
        if self.block_depth.get() + self.span_depth.get() > self.max_nesting {
            log::debug!("nesting limit reached; emitting {} bytes literally", data.len());
            renderer.normal_text(output, &Buffer::from_slice(data));
            return;
        }
        let _depth = DepthGuard::enter(&self.block_depth);

        let mut pos = 0;
        while pos < data.len() {
            let rest = &data[pos..];
            log::trace!("parse_block: dispatching at offset {} (byte {:?})", pos, rest.first().map(|&b| b as char));

            let consumed = self
                .atx_header(output, rest, renderer)
                .or_else(|| {
                    if renderer.wants_html_blocks() {
                        self.html_block(output, rest, renderer)
                    } else {
                        None
                    }
                })
                .or_else(|| empty_line(rest))
                .or_else(|| self.horizontal_rule(output, rest, renderer))
                .or_else(|| {
                    if self.extensions.contains(Extension::FENCED_CODE) {
                        self.fenced_code(output, rest, renderer)
                    } else {
                        None
                    }
                })
                .or_else(|| {
                    if self.extensions.contains(Extension::TABLES) {
                        self.table(output, rest, renderer)
                    } else {
                        None
                    }
                })
                .or_else(|| self.blockquote(output, rest, renderer))
                .or_else(|| self.indented_code(output, rest, renderer))
                .or_else(|| self.list(output, rest, renderer, false))
                .or_else(|| self.list(output, rest, renderer, true))
                .unwrap_or_else(|| self.paragraph(output, rest, renderer));

            pos += consumed.max(1);
        }
    }

    fn atx_header(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render) -> Option<usize> {
        let mut i = 0;
        while i < 6 && data.get(i) == Some(&b'#') {
            i += 1;
        }
        if i == 0 || data.get(i) == Some(&b'#') {
            return None;
        }
        let level = i as i32;

        if self.extensions.contains(Extension::SPACE_HEADERS) && data.get(i) != Some(&b' ') && data.get(i).is_some() {
            return None;
        }
        while data.get(i) == Some(&b' ') {
            i += 1;
        }

        let line_end = find_line_end(data);
        let mut content_end = line_end;
        while content_end > i && matches!(data[content_end - 1], b'#' | b' ') {
            content_end -= 1;
        }

        let content = &data[i..content_end.max(i)];
        let mut span = self.pool.checkout(Scope::Span);
        self.parse_inline(&mut span, content, renderer);
        renderer.header(output, &span, level);

        Some(advance_past_newline(data, line_end))
    }

    fn html_block(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render) -> Option<usize> {
        if data.first() != Some(&b'<') {
            return None;
        }
        let name_start = if data.get(1) == Some(&b'/') { 2 } else { 1 };
        let mut j = name_start;
        while data.get(j).map_or(false, |b| b.is_ascii_alphanumeric()) {
            j += 1;
        }
        let name = &data[name_start..j];

        let end = if name.is_empty() || !is_block_tag(name) {
            html_comment_block(data).or_else(|| html_hr_block(data))?
        } else {
            find_closing_tag(data, name, true).or_else(|| {
                if is_inline_only_block_tag(name) {
                    None
                } else {
                    find_closing_tag(data, name, false)
                }
            })?
        };

        let mut body = &data[..end];
        while body.last() == Some(&b'\n') {
            body = &body[..body.len() - 1];
        }
        renderer.html_block(output, &Buffer::from_slice(body));

        Some(end)
    }

    fn horizontal_rule(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render) -> Option<usize> {
        let line_end = find_line_end(data);
        let line = &data[..line_end];

        let mut marker = 0u8;
        let mut count = 0;
        for &b in line {
            match b {
                b' ' => continue,
                b'*' | b'-' | b'_' => {
                    if marker == 0 {
                        marker = b;
                    }
                    if b != marker {
                        return None;
                    }
                    count += 1;
                }
                _ => return None,
            }
        }
        if count < 3 {
            return None;
        }

        renderer.horizontal_rule(output);
        Some(advance_past_newline(data, line_end))
    }

    fn fenced_code(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render) -> Option<usize> {
        let mut i = 0;
        while i < 4 && data.get(i) == Some(&b' ') {
            i += 1;
        }
        let fence_char = match data.get(i) {
            Some(&b'`') => b'`',
            Some(&b'~') => b'~',
            _ => return None,
        };
        let fence_start = i;
        while data.get(i) == Some(&fence_char) {
            i += 1;
        }
        let fence_len = i - fence_start;
        if fence_len < 3 {
            return None;
        }

        let line_end = find_line_end(data);
        let info = trim_ascii(&data[i..line_end]);
        let lang = if info.first() == Some(&b'{') {
            let end = info.iter().position(|&b| b == b'}').unwrap_or(info.len());
            &info[1..end]
        } else {
            let end = info.iter().position(|&b| b.is_ascii_whitespace()).unwrap_or(info.len());
            &info[..end]
        };

        let mut pos = advance_past_newline(data, line_end);
        let mut body = Vec::new();
        loop {
            if pos >= data.len() {
                break;
            }
            let rest = &data[pos..];
            let this_line_end = find_line_end(rest);
            let line = &rest[..this_line_end];
            let trimmed = trim_ascii_start(line);

            if trimmed.len() >= fence_len && trimmed.iter().all(|&b| b == fence_char) {
                pos += advance_past_newline(rest, this_line_end);
                break;
            }

            body.extend_from_slice(line);
            body.push(b'\n');
            pos += advance_past_newline(rest, this_line_end);
        }

        renderer.code_block(output, &Buffer::from(body), &Buffer::from_slice(lang));
        Some(pos)
    }

    fn indented_code(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render) -> Option<usize> {
        if !data.starts_with(b"    ") {
            return None;
        }

        let mut pos = 0;
        let mut body = Vec::new();
        loop {
            if pos >= data.len() {
                break;
            }
            let rest = &data[pos..];
            let line_end = find_line_end(rest);
            let line = &rest[..line_end];

            if line.starts_with(b"    ") {
                body.extend_from_slice(&line[4..]);
                body.push(b'\n');
                pos += advance_past_newline(rest, line_end);
                continue;
            }

            if line.iter().all(|&b| b.is_ascii_whitespace()) {
                let after = pos + advance_past_newline(rest, line_end);
                if after < data.len() && data[after..].starts_with(b"    ") {
                    body.push(b'\n');
                    pos = after;
                    continue;
                }
            }
            break;
        }

        while body.last() == Some(&b'\n') && body.len() > 1 && body[body.len() - 2] == b'\n' {
            body.pop();
        }

        renderer.code_block(output, &Buffer::from(body), &Buffer::new(0));
        Some(pos)
    }

    fn blockquote(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render) -> Option<usize> {
        blockquote_marker_len(data)?;

        let mut pos = 0;
        let mut body = Vec::new();
        let mut last_was_quoted = true;

        loop {
            if pos >= data.len() {
                break;
            }
            let rest = &data[pos..];
            let line_end = find_line_end(rest);
            let line = &rest[..line_end];

            if let Some(marker_len) = blockquote_marker_len(line) {
                body.extend_from_slice(&line[marker_len..]);
                body.push(b'\n');
                last_was_quoted = true;
                pos += advance_past_newline(rest, line_end);
                continue;
            }

            let is_empty = line.iter().all(|&b| b.is_ascii_whitespace());
            if is_empty {
                let after = pos + advance_past_newline(rest, line_end);
                let continues = after < data.len() && blockquote_marker_len(&data[after..]).is_some();
                if continues {
                    body.push(b'\n');
                    pos = after;
                    continue;
                }
                break;
            }

            if last_was_quoted {
                body.extend_from_slice(line);
                body.push(b'\n');
                pos += advance_past_newline(rest, line_end);
                continue;
            }

            break;
        }

        let mut inner = self.pool.checkout(Scope::Block);
        self.parse_block(&mut inner, &body, renderer);
        renderer.quote_block(output, &inner);
        Some(pos.max(1))
    }

    fn list(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render, ordered: bool) -> Option<usize> {
        list_marker_len(data, ordered)?;

        let mut pos = 0;
        let mut items: Vec<(Vec<u8>, bool)> = Vec::new();

        while pos < data.len() {
            let rest = &data[pos..];
            if list_marker_len(rest, ordered).is_none() {
                break;
            }
            let (item_data, consumed, is_block) = collect_list_item(rest);
            if consumed == 0 {
                break;
            }
            items.push((item_data, is_block));
            pos += consumed;
        }

        if items.is_empty() {
            return None;
        }

        let mut content = self.pool.checkout(Scope::Block);
        for (item_bytes, is_block) in &items {
            let mut item_out = self.pool.checkout(Scope::Block);
            if *is_block {
                self.parse_block(&mut item_out, item_bytes, renderer);
            } else {
                self.parse_inline(&mut item_out, trim_trailing_newlines(item_bytes), renderer);
            }

            let mut flags = List::empty();
            if ordered {
                flags |= List::ORDERED;
            }
            if *is_block {
                flags |= List::BLOCK;
            }
            renderer.list_item(&mut content, &item_out, flags);
        }

        let flags = if ordered { List::ORDERED } else { List::empty() };
        renderer.list(output, &content, flags);
        Some(pos)
    }

    fn table(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render) -> Option<usize> {
        let header_end = find_line_end(data);
        let header_line = &data[..header_end];
        if !header_line.contains(&b'|') {
            return None;
        }
        let mut pos = advance_past_newline(data, header_end);

        let underline_end = find_line_end(&data[pos..]) + pos;
        let underline_line = &data[pos..underline_end];
        if !is_table_underline(underline_line) {
            return None;
        }
        let aligns = parse_table_aligns(underline_line);
        let columns = aligns.len();
        pos = advance_past_newline(data, underline_end);

        let header_cells = split_table_row(header_line);
        let mut header_out = self.pool.checkout(Scope::Block);
        self.render_table_row(&mut header_out, &header_cells, &aligns, columns, true, renderer);

        let mut body_out = self.pool.checkout(Scope::Block);
        loop {
            if pos >= data.len() {
                break;
            }
            let rest = &data[pos..];
            let line_end = find_line_end(rest);
            let line = &rest[..line_end];
            if !line.contains(&b'|') {
                break;
            }
            let cells = split_table_row(line);
            self.render_table_row(&mut body_out, &cells, &aligns, columns, false, renderer);
            pos += advance_past_newline(rest, line_end);
        }

        renderer.table(output, &header_out, &body_out);
        Some(pos)
    }

    fn render_table_row(
        &self,
        out: &mut Buffer,
        cells: &[Vec<u8>],
        aligns: &[Table],
        columns: usize,
        is_header: bool,
        renderer: &mut dyn Render,
    ) {
        let mut row = self.pool.checkout(Scope::Block);
        for col in 0..columns {
            let cell_bytes: &[u8] = cells.get(col).map(|v| v.as_slice()).unwrap_or(&[]);
            let mut cell_out = self.pool.checkout(Scope::Span);
            self.parse_inline(&mut cell_out, cell_bytes, renderer);

            let mut flags = aligns.get(col).copied().unwrap_or_else(Table::empty);
            if is_header {
                flags |= Table::HEADER;
            }
            renderer.table_cell(&mut row, &cell_out, flags);
        }
        renderer.table_row(out, &row);
    }

    fn paragraph(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render) -> usize {
        let mut pos = 0;
        let mut setext_level = None;

        loop {
            if pos >= data.len() {
                break;
            }
            let rest = &data[pos..];
            let line_end = find_line_end(rest);
            let line = &rest[..line_end];

            if line.iter().all(|&b| b.is_ascii_whitespace()) {
                break;
            }

            if pos > 0 {
                if let Some(level) = setext_level_of(line) {
                    // Leave `pos` at the start of the underline line itself
                    // so `text` below ends with the heading's source line,
                    // not the underline.
                    setext_level = Some(level);
                    break;
                }

                if self.extensions.contains(Extension::LAX_SPACING) {
                    if let Some(&first) = line.first() {
                        if !first.is_ascii_alphanumeric() {
                            break;
                        }
                    }
                }
            }

            pos += advance_past_newline(rest, line_end);
        }

        let mut text = &data[..pos];
        while text.last() == Some(&b'\n') {
            text = &text[..text.len() - 1];
        }

        if let Some(level) = setext_level {
            let underline_rest = &data[pos..];
            let underline_line_end = find_line_end(underline_rest);
            let consumed = pos + advance_past_newline(underline_rest, underline_line_end);

            let split_at = text.iter().rposition(|&b| b == b'\n').map(|i| i + 1).unwrap_or(0);
            let (preceding, heading_line) = text.split_at(split_at);

            if !trim_ascii(preceding).is_empty() {
                let mut span = self.pool.checkout(Scope::Span);
                self.parse_inline(&mut span, trim_trailing(preceding), renderer);
                renderer.paragraph(output, &span);
            }

            let mut span = self.pool.checkout(Scope::Span);
            self.parse_inline(&mut span, heading_line, renderer);
            renderer.header(output, &span, level);

            return consumed.max(1);
        }

        if !trim_ascii(text).is_empty() {
            let mut span = self.pool.checkout(Scope::Span);
            self.parse_inline(&mut span, text, renderer);
            renderer.paragraph(output, &span);
        }

        pos.max(1)
    }

    // ---- pass 2: inline scanner ----

    fn parse_inline(&self, output: &mut Buffer, data: &[u8], renderer: &mut dyn Render) {
        if self.block_depth.get() + self.span_depth.get() > self.max_nesting {
            log::debug!("nesting limit reached; emitting {} bytes literally", data.len());
            renderer.normal_text(output, &Buffer::from_slice(data));
            return;
        }
        let _depth = DepthGuard::enter(&self.span_depth);

        let mut i = 0;
        let mut run_start = 0;
        while i < data.len() {
            let trigger = self.active_char[data[i] as usize];
            if trigger == TRIGGER_NONE {
                i += 1;
                continue;
            }

            if i > run_start {
                renderer.normal_text(output, &Buffer::from_slice(&data[run_start..i]));
            }

            log::trace!("parse_inline: dispatching trigger {} at offset {}", trigger, i);
            let consumed = self.dispatch_trigger(trigger, output, data, i, renderer);
            if consumed == 0 {
                let _ = output.putc(data[i]);
                i += 1;
            } else {
                i += consumed;
            }
            run_start = i;
        }

        if run_start < data.len() {
            renderer.normal_text(output, &Buffer::from_slice(&data[run_start..]));
        }
    }

    fn render_inline_span(&self, content: &[u8], renderer: &mut dyn Render) -> Buffer {
        let mut guard = self.pool.checkout(Scope::Span);
        self.parse_inline(&mut guard, content, renderer);
        (*guard).clone()
    }

    fn dispatch_trigger(&self, trigger: u8, output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
        match trigger {
            TRIGGER_EMPHASIS => self.emphasis(output, data, offset, renderer),
            TRIGGER_CODESPAN => codespan(output, data, offset, renderer),
            TRIGGER_LINEBREAK => linebreak(output, data, offset, renderer),
            TRIGGER_LINK => self.link_or_image(output, data, offset, renderer),
            TRIGGER_ANGLE => angle(output, data, offset, renderer),
            TRIGGER_ESCAPE => escape(output, data, offset, renderer),
            TRIGGER_ENTITY => entity(output, data, offset, renderer),
            TRIGGER_AUTOLINK_URL => self.autolink_url(output, data, offset, renderer),
            TRIGGER_AUTOLINK_EMAIL => self.autolink_email(output, data, offset, renderer),
            TRIGGER_AUTOLINK_WWW => self.autolink_www(output, data, offset, renderer),
            TRIGGER_SUPERSCRIPT => self.superscript(output, data, offset, renderer),
            _ => 0,
        }
    }

    fn emphasis(&self, output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
        let c = data[offset];

        if self.extensions.contains(Extension::NO_INTRA_EMPHASIS)
            && offset > 0
            && data[offset - 1].is_ascii_alphanumeric()
        {
            return 0;
        }
        if data.get(offset + 1).map_or(true, |&b| b.is_ascii_whitespace()) {
            return 0;
        }

        let mut run_len = 1;
        while run_len < 3 && data.get(offset + run_len) == Some(&c) {
            run_len += 1;
        }

        let allow_single = c != b'~' && c != b'+';
        let allow_triple = c == b'*' || c == b'_';

        if run_len >= 3 && allow_triple {
            if let Some(n) = self.try_emphasis_n(output, data, offset, c, 3, renderer) {
                return n;
            }
        }
        if run_len >= 2 {
            if let Some(n) = self.try_emphasis_n(output, data, offset, c, 2, renderer) {
                return n;
            }
        }
        if allow_single {
            if let Some(n) = self.try_emphasis_n(output, data, offset, c, 1, renderer) {
                return n;
            }
        }
        0
    }

    fn try_emphasis_n(
        &self,
        output: &mut Buffer,
        data: &[u8],
        offset: usize,
        c: u8,
        n: usize,
        renderer: &mut dyn Render,
    ) -> Option<usize> {
        let content_start = offset + n;
        let closer = find_emph_closer(data, content_start, c, n)?;
        if closer == content_start {
            return None;
        }
        if data[closer - 1].is_ascii_whitespace() {
            return None;
        }
        if self.extensions.contains(Extension::NO_INTRA_EMPHASIS)
            && n == 1
            && data.get(closer + n).map_or(false, |b| b.is_ascii_alphanumeric())
        {
            return None;
        }

        let content = data[content_start..closer].to_vec();
        let rendered = self.render_inline_span(&content, renderer);

        let handled = match (c, n) {
            (_, 3) => renderer.triple_emphasis(output, &rendered),
            (b'~', 2) => renderer.strikethrough(output, &rendered),
            (b'+', 2) => renderer.ins(output, &rendered),
            (_, 2) => renderer.double_emphasis(output, &rendered),
            (_, 1) => renderer.emphasis(output, &rendered),
            _ => false,
        };

        if handled {
            Some((closer + n) - offset)
        } else {
            None
        }
    }

    fn link_or_image(&self, output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
        let is_image = offset > 0 && data[offset - 1] == b'!';
        let text_start = offset + 1;
        let close = match find_matching_bracket(data, text_start) {
            Some(c) => c,
            None => return 0,
        };
        let link_text = &data[text_start..close];
        let i = close + 1;

        if !is_image && self.extensions.contains(Extension::FOOTNOTES) && link_text.first() == Some(&b'^') {
            let id = &link_text[1..];
            let num_opt = self.footnotes.borrow_mut().reference(id);
            return match num_opt {
                Some(num) => {
                    if renderer.footnote_reference(output, num) {
                        i - offset
                    } else {
                        0
                    }
                }
                None => {
                    log::debug!("footnote reference to undefined id");
                    0
                }
            };
        }

        if data.get(i) == Some(&b'(') {
            if let Some((url, title, end)) = parse_inline_link_tail(data, i) {
                if self.emit_link_or_image(output, renderer, is_image, link_text, &url, &title) {
                    return end - offset;
                }
                return 0;
            }
        }

        if data.get(i) == Some(&b'[') {
            if let Some(id_close) = find_matching_bracket(data, i + 1) {
                let id_raw = &data[i + 1..id_close];
                let key: &[u8] = if id_raw.is_empty() { link_text } else { id_raw };
                let end = id_close + 1;

                let found = {
                    let refs = self.refs.borrow();
                    refs.lookup(key).map(|r| (r.link.as_bytes().to_vec(), r.title.as_bytes().to_vec()))
                };
                return match found {
                    Some((url, title)) => {
                        if self.emit_link_or_image(output, renderer, is_image, link_text, &url, &title) {
                            end - offset
                        } else {
                            0
                        }
                    }
                    None => {
                        log::debug!("reference link id not found");
                        0
                    }
                };
            }
        }

        let found = {
            let refs = self.refs.borrow();
            refs.lookup(link_text).map(|r| (r.link.as_bytes().to_vec(), r.title.as_bytes().to_vec()))
        };
        if let Some((url, title)) = found {
            if self.emit_link_or_image(output, renderer, is_image, link_text, &url, &title) {
                return i - offset;
            }
        }

        0
    }

    fn emit_link_or_image(
        &self,
        output: &mut Buffer,
        renderer: &mut dyn Render,
        is_image: bool,
        link_text: &[u8],
        url: &[u8],
        title: &[u8],
    ) -> bool {
        let url = unescape_backslashes(url);

        if is_image {
            output.truncate_by(1);
            let handled = renderer.image(output, &Buffer::from(url), &Buffer::from_slice(title), &Buffer::from_slice(link_text));
            if !handled {
                let _ = output.putc(b'!');
            }
            handled
        } else {
            self.in_link_body.set(true);
            let content = self.render_inline_span(link_text, renderer);
            self.in_link_body.set(false);
            renderer.link(output, &content, &Buffer::from(url), &Buffer::from_slice(title))
        }
    }

    fn autolink_url(&self, output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
        let (len, rewind) = match autolink::url(data, offset) {
            Some(v) => v,
            None => return 0,
        };
        let start = offset - rewind;
        output.truncate_by(rewind);
        let url_bytes = data[start..start + len].to_vec();
        let handled = renderer.link(output, &Buffer::from_slice(&url_bytes), &Buffer::from_slice(&url_bytes), &Buffer::new(0));
        if handled {
            len - rewind
        } else {
            let _ = output.put(&data[start..offset]);
            0
        }
    }

    fn autolink_www(&self, output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
        let (len, rewind) = match autolink::www(data, offset) {
            Some(v) => v,
            None => return 0,
        };
        let start = offset - rewind;
        output.truncate_by(rewind);
        let url_bytes = data[start..start + len].to_vec();
        let mut href = Vec::with_capacity(url_bytes.len() + 7);
        href.extend_from_slice(b"http://");
        href.extend_from_slice(&url_bytes);
        let handled = renderer.link(output, &Buffer::from_slice(&url_bytes), &Buffer::from(href), &Buffer::new(0));
        if handled {
            len - rewind
        } else {
            let _ = output.put(&data[start..offset]);
            0
        }
    }

    fn autolink_email(&self, output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
        let (len, rewind) = match autolink::email(data, offset) {
            Some(v) => v,
            None => return 0,
        };
        let start = offset - rewind;
        output.truncate_by(rewind);
        let addr = data[start..start + len].to_vec();
        let handled = renderer.autolink(output, &Buffer::from(addr), AutoLink::Email);
        if handled {
            len - rewind
        } else {
            let _ = output.put(&data[start..offset]);
            0
        }
    }

    fn superscript(&self, output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
        if offset + 1 >= data.len() {
            return 0;
        }

        let (start, end, total_end) = if data[offset + 1] == b'(' {
            let mut i = offset + 2;
            let mut depth = 1;
            while i < data.len() && depth > 0 {
                match data[i] {
                    b'\\' if i + 1 < data.len() => i += 2,
                    b'(' => {
                        depth += 1;
                        i += 1;
                    }
                    b')' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                        i += 1;
                    }
                    _ => i += 1,
                }
            }
            if depth != 0 || i >= data.len() {
                return 0;
            }
            (offset + 2, i, i + 1)
        } else {
            let mut i = offset + 1;
            while i < data.len() && !data[i].is_ascii_whitespace() {
                i += 1;
            }
            if i == offset + 1 {
                return 0;
            }
            (offset + 1, i, i)
        };

        let content = data[start..end].to_vec();
        let rendered = self.render_inline_span(&content, renderer);
        if renderer.superscript(output, &rendered) {
            total_end - offset
        } else {
            0
        }
    }
}

fn codespan(output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
    let mut nb = 0;
    while data.get(offset + nb) == Some(&b'`') {
        nb += 1;
    }
    let content_start = offset + nb;

    let mut i = content_start;
    while i < data.len() {
        if data[i] != b'`' {
            i += 1;
            continue;
        }
        let run_start = i;
        let mut n = 0;
        while i < data.len() && data[i] == b'`' {
            i += 1;
            n += 1;
        }
        if n == nb {
            let mut content = &data[content_start..run_start];
            if content.len() >= 2 && content.first() == Some(&b' ') && content.last() == Some(&b' ') {
                content = &content[1..content.len() - 1];
            }
            return if renderer.code_span(output, &Buffer::from_slice(content)) {
                i - offset
            } else {
                0
            };
        }
    }
    0
}

fn linebreak(output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
    let mut spaces = 0;
    while spaces < offset && data[offset - spaces - 1] == b' ' {
        spaces += 1;
    }
    if spaces < 2 {
        return 0;
    }

    output.truncate_by(spaces);
    if renderer.line_break(output) {
        1
    } else {
        let _ = output.put(&vec![b' '; spaces]);
        0
    }
}

fn escape(output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
    let next = match data.get(offset + 1) {
        Some(&b) if ESCAPABLE.contains(&b) => b,
        _ => return 0,
    };
    renderer.normal_text(output, &Buffer::from_slice(&[next]));
    2
}

fn entity(output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
    let mut i = offset + 1;
    if data.get(i) == Some(&b'#') {
        i += 1;
    }
    let start = i;
    while data.get(i).map_or(false, |b| b.is_ascii_alphanumeric()) {
        i += 1;
    }
    if i == start || data.get(i) != Some(&b';') {
        return 0;
    }
    i += 1;
    renderer.entity(output, &Buffer::from_slice(&data[offset..i]));
    i - offset
}

fn angle(output: &mut Buffer, data: &[u8], offset: usize, renderer: &mut dyn Render) -> usize {
    let rest = &data[offset..];

    if let Some(len) = scan_autolink_angle(rest) {
        let inner = &rest[1..len - 1];
        let link_type = if inner.contains(&b'@') && !inner.contains(&b':') {
            AutoLink::Email
        } else {
            AutoLink::Normal
        };
        return if renderer.autolink(output, &Buffer::from_slice(inner), link_type) {
            len
        } else {
            0
        };
    }

    if let Some(len) = scan_html_tag(rest) {
        return if renderer.html_span(output, &Buffer::from_slice(&rest[..len])) {
            len
        } else {
            0
        };
    }

    0
}

fn scan_autolink_angle(rest: &[u8]) -> Option<usize> {
    let close = rest.iter().position(|&b| b == b'>')?;
    if close < 2 {
        return None;
    }
    let inner = &rest[1..close];
    if inner.iter().any(|&b| b.is_ascii_whitespace() || b == b'<') {
        return None;
    }

    if let Some(colon) = inner.iter().position(|&b| b == b':') {
        if colon == 0 || !inner[..colon].iter().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        return Some(close + 1);
    }

    let at_count = inner.iter().filter(|&&b| b == b'@').count();
    if at_count == 1 && inner.iter().all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'@' | b'.' | b'_')) {
        return Some(close + 1);
    }

    None
}

fn scan_html_tag(rest: &[u8]) -> Option<usize> {
    if rest.len() < 3 || rest[0] != b'<' {
        return None;
    }
    if rest[1..].starts_with(b"!--") {
        let mut i = 4;
        while i + 2 < rest.len() {
            if &rest[i..i + 3] == b"-->" {
                return Some(i + 3);
            }
            i += 1;
        }
        return None;
    }

    let mut i = 1;
    if rest.get(i) == Some(&b'/') {
        i += 1;
    }
    if !rest.get(i).map_or(false, |b| b.is_ascii_alphabetic()) {
        return None;
    }
    while i < rest.len() && rest[i] != b'>' {
        i += 1;
    }
    if i >= rest.len() {
        return None;
    }
    Some(i + 1)
}

fn find_matching_bracket(data: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1;
    let mut i = start;
    while i < data.len() {
        match data[i] {
            b'\\' if i + 1 < data.len() => i += 1,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn skip_codespan(data: &[u8], start: usize) -> usize {
    let mut i = start;
    let mut n = 0;
    while i < data.len() && data[i] == b'`' {
        i += 1;
        n += 1;
    }
    let content_start = i;

    let mut j = content_start;
    while j < data.len() {
        if data[j] != b'`' {
            j += 1;
            continue;
        }
        let mut m = 0;
        while j < data.len() && data[j] == b'`' {
            j += 1;
            m += 1;
        }
        if m == n {
            return j;
        }
    }
    content_start
}

fn find_emph_closer(data: &[u8], start: usize, c: u8, count: usize) -> Option<usize> {
    let mut i = start;
    while i < data.len() {
        match data[i] {
            b'`' => i = skip_codespan(data, i),
            b'[' => {
                i = match find_matching_bracket(data, i + 1) {
                    Some(close) => close + 1,
                    None => i + 1,
                };
            }
            b if b == c => {
                let run_start = i;
                let mut n = 0;
                while i < data.len() && data[i] == c {
                    i += 1;
                    n += 1;
                }
                if n >= count {
                    return Some(run_start);
                }
            }
            _ => i += 1,
        }
    }
    None
}

fn parse_inline_link_tail(data: &[u8], open: usize) -> Option<(Vec<u8>, Vec<u8>, usize)> {
    let mut i = open + 1;
    while data.get(i) == Some(&b' ') {
        i += 1;
    }

    let (url_start, url_end);
    if data.get(i) == Some(&b'<') {
        let start = i + 1;
        let rel = data[start..].iter().position(|&b| b == b'>')?;
        url_start = start;
        url_end = start + rel;
        i = url_end + 1;
    } else {
        let start = i;
        while data.get(i).map_or(false, |&b| !b.is_ascii_whitespace() && b != b')') {
            i += 1;
        }
        url_start = start;
        url_end = i;
    }

    while data.get(i) == Some(&b' ') {
        i += 1;
    }

    let line_end = {
        let rel = data[i..].iter().position(|&b| b == b')').unwrap_or(data.len() - i);
        i + rel
    };

    let mut title: &[u8] = &[];
    if let Some(&delim) = data.get(i) {
        if matches!(delim, b'"' | b'\'' | b'(') {
            let closing = if delim == b'(' { b')' } else { delim };
            let start = i + 1;
            if let Some(rel) = data[start..].iter().position(|&b| b == closing) {
                title = &data[start..start + rel];
                i = start + rel + 1;
                while data.get(i) == Some(&b' ') {
                    i += 1;
                }
            }
        }
    }
    let _ = line_end;

    if data.get(i) != Some(&b')') {
        return None;
    }
    i += 1;

    Some((data[url_start..url_end].to_vec(), title.to_vec(), i))
}

fn unescape_backslashes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            out.push(bytes[i + 1]);
            i += 2;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    out
}

// ---- shared line/byte helpers ----

fn find_line_end(data: &[u8]) -> usize {
    data.iter().position(|&b| b == b'\n').unwrap_or(data.len())
}

fn advance_past_newline(data: &[u8], line_end: usize) -> usize {
    if line_end < data.len() {
        line_end + 1
    } else {
        data.len()
    }
}

fn split_first_line(data: &[u8]) -> (&[u8], usize) {
    let mut i = 0;
    while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
        i += 1;
    }
    let content_end = i;
    let next = if i >= data.len() {
        i
    } else if data[i] == b'\r' {
        if data.get(i + 1) == Some(&b'\n') {
            i + 2
        } else {
            i + 1
        }
    } else {
        i + 1
    };
    (&data[..content_end], next)
}

fn empty_line(data: &[u8]) -> Option<usize> {
    let line_end = find_line_end(data);
    if data[..line_end].iter().all(|&b| b == b' ' || b == b'\t') {
        Some(advance_past_newline(data, line_end))
    } else {
        None
    }
}

/// Bare `<!--...-->` HTML comment recognized as a block even when not in the
/// block-tag table, provided a blank line follows the closing `-->`.
fn html_comment_block(data: &[u8]) -> Option<usize> {
    if data.len() > 5 && &data[1..4] == b"!--" {
        let mut i = 5;
        while i < data.len() && !(data[i - 2] == b'-' && data[i - 1] == b'-' && data[i] == b'>') {
            i += 1;
        }
        i += 1;
        if i < data.len() {
            if let Some(j) = empty_line(&data[i..]) {
                return Some(i + j);
            }
        }
    }
    None
}

/// Self-closing `<hr .../>` recognized as a block even when not in the
/// block-tag table, provided a blank line follows its `>`.
fn html_hr_block(data: &[u8]) -> Option<usize> {
    if data.len() > 4 && (data[1] | 0x20) == b'h' && (data[2] | 0x20) == b'r' {
        let mut i = 3;
        while i < data.len() && data[i] != b'>' {
            i += 1;
        }
        if i + 1 < data.len() {
            i += 1;
            if let Some(j) = empty_line(&data[i..]) {
                return Some(i + j);
            }
        }
    }
    None
}

/// Scans for a closing `</name>` tag. When `start_of_line` is set, a match is
/// only accepted if it sits at the start of a line (or is still on the
/// opening line); a later lenient pass allows an indented match anywhere.
fn find_closing_tag(data: &[u8], name: &[u8], start_of_line: bool) -> Option<usize> {
    let mut i = 1;
    let mut block_lines = 0usize;

    while i < data.len() {
        i += 1;
        while i < data.len() && !(data[i - 1] == b'<' && data[i] == b'/') {
            if data[i] == b'\n' {
                block_lines += 1;
            }
            i += 1;
        }

        if i >= data.len() {
            break;
        }

        if start_of_line && block_lines > 0 && data[i - 2] != b'\n' {
            continue;
        }

        if i + 2 + name.len() >= data.len() {
            break;
        }

        if let Some(end) = match_closing_tag(&data[i - 1..], name) {
            return Some(i + end - 1);
        }
    }

    None
}

/// Checks whether `data` (starting at the `<` of a candidate `</name>`)
/// matches `name` and is followed by a blank line.
fn match_closing_tag(data: &[u8], name: &[u8]) -> Option<usize> {
    let tag_len = name.len();
    if tag_len + 3 >= data.len() {
        return None;
    }
    if !data[2..2 + tag_len].eq_ignore_ascii_case(name) || data[tag_len + 2] != b'>' {
        return None;
    }

    let mut i = tag_len + 3;
    if i < data.len() {
        match empty_line(&data[i..]) {
            Some(w) => i += w,
            None => return None,
        }
    }

    if i < data.len() {
        if let Some(w) = empty_line(&data[i..]) {
            i += w;
        }
    }

    Some(i)
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map(|i| i + 1).unwrap_or(start);
    &bytes[start..end]
}

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    &bytes[start..]
}

fn trim_trailing(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map(|i| i + 1).unwrap_or(0);
    &bytes[..end]
}

fn trim_trailing_newlines(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == b'\n' {
        end -= 1;
    }
    &bytes[..end]
}

fn setext_level_of(line: &[u8]) -> Option<i32> {
    let trimmed = trim_ascii(line);
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.iter().all(|&b| b == b'=') {
        Some(1)
    } else if trimmed.iter().all(|&b| b == b'-') {
        Some(2)
    } else {
        None
    }
}

fn blockquote_marker_len(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < 3 && line.get(i) == Some(&b' ') {
        i += 1;
    }
    if line.get(i) != Some(&b'>') {
        return None;
    }
    i += 1;
    if line.get(i) == Some(&b' ') {
        i += 1;
    }
    Some(i)
}

fn list_marker_len(data: &[u8], ordered: bool) -> Option<usize> {
    let mut i = 0;
    while i < 3 && data.get(i) == Some(&b' ') {
        i += 1;
    }
    if ordered {
        let start = i;
        while data.get(i).map_or(false, |b| b.is_ascii_digit()) {
            i += 1;
        }
        if i == start {
            return None;
        }
        if data.get(i) != Some(&b'.') {
            return None;
        }
        i += 1;
    } else {
        match data.get(i) {
            Some(&b'*') | Some(&b'-') | Some(&b'+') => i += 1,
            _ => return None,
        }
    }
    if data.get(i) != Some(&b' ') {
        return None;
    }
    Some(i + 1)
}

/// Peels one list item (of either kind -- the marker at the start decides)
/// off the front of `data`. Returns the item's text with its marker and
/// continuation indent stripped, how many bytes of `data` it consumed, and
/// whether it contained a blank line (and so should be block-rendered).
fn collect_list_item(data: &[u8]) -> (Vec<u8>, usize, bool) {
    let marker_len = list_marker_len(data, false)
        .or_else(|| list_marker_len(data, true))
        .unwrap_or(0);
    if marker_len == 0 {
        return (Vec::new(), 0, false);
    }

    let first_end = find_line_end(data);
    let mut item = Vec::new();
    item.extend_from_slice(&data[marker_len..first_end]);
    item.push(b'\n');
    let mut pos = advance_past_newline(data, first_end);

    let mut is_block = false;
    let mut saw_empty = false;

    loop {
        if pos >= data.len() {
            break;
        }
        let rest = &data[pos..];
        let line_end = find_line_end(rest);
        let line = &rest[..line_end];

        if line.iter().all(|&b| b.is_ascii_whitespace()) {
            saw_empty = true;
            item.push(b'\n');
            pos += advance_past_newline(rest, line_end);
            continue;
        }

        let indent = line.iter().take_while(|&&b| b == b' ').count();
        if indent == 0 {
            break;
        }

        if saw_empty {
            is_block = true;
        }

        let strip = indent.min(marker_len.max(2));
        item.extend_from_slice(&line[strip..]);
        item.push(b'\n');
        saw_empty = false;
        pos += advance_past_newline(rest, line_end);
    }

    (item, pos, is_block)
}

fn is_table_underline(line: &[u8]) -> bool {
    let trimmed = trim_ascii(line);
    if trimmed.is_empty() {
        return false;
    }
    trimmed.iter().all(|&b| matches!(b, b'|' | b'-' | b':' | b' ')) && trimmed.contains(&b'-')
}

fn parse_table_aligns(line: &[u8]) -> Vec<Table> {
    split_table_row(line)
        .into_iter()
        .map(|cell| {
            let left = cell.first() == Some(&b':');
            let right = cell.last() == Some(&b':');
            match (left, right) {
                (true, true) => Table::CENTER,
                (true, false) => Table::LEFT,
                (false, true) => Table::RIGHT,
                (false, false) => Table::empty(),
            }
        })
        .collect()
}

fn split_table_row(line: &[u8]) -> Vec<Vec<u8>> {
    let mut cells = Vec::new();
    let mut current = Vec::new();
    let mut i = 0;
    while i < line.len() {
        match line[i] {
            b'\\' if i + 1 < line.len() => {
                current.push(line[i]);
                current.push(line[i + 1]);
                i += 2;
                continue;
            }
            b'|' => cells.push(std::mem::take(&mut current)),
            b => current.push(b),
        }
        i += 1;
    }
    cells.push(current);

    let mut trimmed: Vec<Vec<u8>> = cells.into_iter().map(|c| trim_ascii(&c).to_vec()).collect();
    if trimmed.first().map_or(false, |c| c.is_empty()) {
        trimmed.remove(0);
    }
    if trimmed.last().map_or(false, |c| c.is_empty()) {
        trimmed.pop();
    }
    trimmed
}

fn recognize_link_ref(data: &[u8]) -> Option<(Vec<u8>, Vec<u8>, Vec<u8>, usize)> {
    let mut i = 0;
    while i < 3 && data.get(i) == Some(&b' ') {
        i += 1;
    }
    if data.get(i) != Some(&b'[') {
        return None;
    }
    i += 1;
    let id_start = i;
    while data.get(i).map_or(false, |&b| b != b']') {
        i += 1;
    }
    if data.get(i) != Some(&b']') {
        return None;
    }
    let id_end = i;
    i += 1;
    if data.get(i) != Some(&b':') {
        return None;
    }
    i += 1;
    while data.get(i) == Some(&b' ') {
        i += 1;
    }

    let (url_start, url_end);
    if data.get(i) == Some(&b'<') {
        let start = i + 1;
        let line_end = find_line_end(data);
        let rel = data[start..line_end].iter().position(|&b| b == b'>')?;
        url_start = start;
        url_end = start + rel;
        i = url_end + 1;
    } else {
        let start = i;
        while data.get(i).map_or(false, |&b| !b.is_ascii_whitespace()) {
            i += 1;
        }
        url_start = start;
        url_end = i;
    }
    if url_start == url_end {
        return None;
    }

    let line_end = find_line_end(data);
    let mut title: &[u8] = &[];
    let mut trailing_i = i;
    while data.get(trailing_i) == Some(&b' ') {
        trailing_i += 1;
    }
    if trailing_i < line_end {
        if let Some(&delim) = data.get(trailing_i) {
            if matches!(delim, b'"' | b'\'' | b'(') {
                let closing = if delim == b'(' { b')' } else { delim };
                let start = trailing_i + 1;
                if let Some(rel) = data[start..line_end].iter().position(|&b| b == closing) {
                    title = &data[start..start + rel];
                    trailing_i = start + rel + 1;
                }
            }
        }
    }

    while data.get(trailing_i) == Some(&b' ') {
        trailing_i += 1;
    }
    if trailing_i != line_end {
        return None;
    }

    let consumed = advance_past_newline(data, line_end);
    Some((data[id_start..id_end].to_vec(), data[url_start..url_end].to_vec(), title.to_vec(), consumed))
}

fn recognize_footnote_def(data: &[u8]) -> Option<(Vec<u8>, Vec<u8>, usize)> {
    let mut i = 0;
    while i < 3 && data.get(i) == Some(&b' ') {
        i += 1;
    }
    if data.get(i) != Some(&b'[') {
        return None;
    }
    i += 1;
    if data.get(i) != Some(&b'^') {
        return None;
    }
    i += 1;
    let id_start = i;
    while data.get(i).map_or(false, |&b| b != b']') {
        i += 1;
    }
    if data.get(i) != Some(&b']') {
        return None;
    }
    let id_end = i;
    i += 1;
    if data.get(i) != Some(&b':') {
        return None;
    }
    i += 1;
    while data.get(i) == Some(&b' ') {
        i += 1;
    }

    let line_end = find_line_end(data);
    let mut body = data[i..line_end].to_vec();
    body.push(b'\n');
    let mut pos = advance_past_newline(data, line_end);

    let mut prev_was_empty = false;
    loop {
        if pos >= data.len() {
            break;
        }
        let rest = &data[pos..];
        let this_line_end = find_line_end(rest);
        let line = &rest[..this_line_end];
        let is_empty = line.iter().all(|&b| b.is_ascii_whitespace());

        if is_empty {
            prev_was_empty = true;
            body.push(b'\n');
            pos += advance_past_newline(rest, this_line_end);
            continue;
        }

        let indent = line.iter().take_while(|&&b| b == b' ').count();
        if indent >= 1 {
            body.extend_from_slice(&line[indent.min(4)..]);
            body.push(b'\n');
            prev_was_empty = false;
            pos += advance_past_newline(rest, this_line_end);
            continue;
        }

        if prev_was_empty {
            break;
        }

        body.extend_from_slice(line);
        body.push(b'\n');
        pos += advance_past_newline(rest, this_line_end);
    }

    Some((data[id_start..id_end].to_vec(), body, pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::html::Html;

    fn render(extensions: Extension, input: &str) -> String {
        let parser = Parser::new(extensions, 16);
        let mut html = Html::new(Default::default(), 0);
        let out = parser.render(input.as_bytes(), &mut html).unwrap();
        out.to_str().unwrap().to_string()
    }

    #[test]
    fn atx_header() {
        assert_eq!(render(Extension::empty(), "# Hello\n"), "<h1>Hello</h1>\n");
    }

    #[test]
    fn reference_link_with_title() {
        let input = "A [ex][1] B.\n\n[1]: http://e.com \"T\"\n";
        assert_eq!(
            render(Extension::empty(), input),
            "<p>A <a href=\"http://e.com\" title=\"T\">ex</a> B.</p>\n"
        );
    }

    #[test]
    fn unordered_list() {
        assert_eq!(
            render(Extension::empty(), "- a\n- b\n- c\n"),
            "<ul>\n<li>a</li>\n<li>b</li>\n<li>c</li>\n</ul>\n"
        );
    }

    #[test]
    fn fenced_code_with_language() {
        let input = "```rust\nfn main() {}\n```\n";
        assert_eq!(
            render(Extension::FENCED_CODE, input),
            "<pre><code class=\"rust\">fn main() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn footnote_with_back_reference() {
        let input = "Text[^1].\n\n[^1]: Note.\n";
        let out = render(Extension::FOOTNOTES, input);
        assert!(out.contains("<sup id=\"fnref1\"><a href=\"#fn1\" rel=\"footnote\">1</a></sup>"));
        assert!(out.contains("id=\"fn1\""));
        assert!(out.contains("Note."));
    }

    #[test]
    fn table_with_default_alignment() {
        let input = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let out = render(Extension::TABLES, input);
        assert!(out.starts_with("<table>"));
        assert!(out.contains("<th>a</th>"));
        assert!(out.contains("<td>1</td>"));
    }

    #[test]
    fn table_with_center_alignment() {
        let input = "| a |\n|:-:|\n| x |\n";
        let out = render(Extension::TABLES, input);
        assert!(out.contains("<th style=\"text-align: center\">a</th>"));
        assert!(out.contains("<td style=\"text-align: center\">x</td>"));
    }

    #[test]
    fn setext_h1_header() {
        assert_eq!(render(Extension::empty(), "Title\n=====\n"), "<h1>Title</h1>\n");
    }

    #[test]
    fn setext_h2_with_preceding_paragraph() {
        assert_eq!(
            render(Extension::empty(), "A\nB\n---\n"),
            "<p>A</p>\n\n<h2>B</h2>\n"
        );
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(render(Extension::empty(), ""), "");
    }

    #[test]
    fn emphasis_and_strong() {
        assert_eq!(render(Extension::empty(), "*em* and **strong**\n"), "<p><em>em</em> and <strong>strong</strong></p>\n");
    }

    #[test]
    fn pool_is_balanced_after_render() {
        let parser = Parser::new(Extension::TABLES | Extension::FOOTNOTES, 16);
        let mut html = Html::new(Default::default(), 0);
        parser.render(b"# h\n\n- a\n- b\n\n| a |\n|---|\n| 1 |\n", &mut html).unwrap();
        assert!(parser.pool.is_balanced());
    }

    #[test]
    fn nesting_limit_falls_back_to_literal_text() {
        // Exercises the `log::debug!` emitted when the nesting guard trips;
        // `is_test(true)` routes it through the test harness's captured
        // output instead of stdout.
        let _ = env_logger::builder().is_test(true).try_init();

        let parser = Parser::new(Extension::empty(), 2);
        let mut html = Html::new(Default::default(), 0);
        let deeply_nested = "> ".repeat(10) + "text\n";
        let out = parser.render(deeply_nested.as_bytes(), &mut html).unwrap();
        assert!(out.to_str().unwrap().contains("text"));
    }

    #[test]
    fn html_block_passes_through_to_closing_tag() {
        let input = "<div>\n*not emphasis*\n</div>\n\nPara.\n";
        let out = render(Extension::empty(), input);
        assert!(out.contains("<div>\n*not emphasis*\n</div>"));
        assert!(out.contains("<p>Para.</p>"));
    }

    #[test]
    fn html_block_without_closing_tag_falls_back_to_paragraph() {
        let input = "<div>\nno closing tag here\n\nPara.\n";
        let out = render(Extension::empty(), input);
        assert!(out.starts_with("<p>"));
    }

    #[test]
    fn html_block_recognizes_bare_comment() {
        let input = "<!-- a comment -->\n\nPara.\n";
        let out = render(Extension::empty(), input);
        assert!(out.starts_with("<!-- a comment -->"));
        assert!(out.contains("<p>Para.</p>"));
    }

    #[test]
    fn html_block_recognizes_bare_hr() {
        let input = "<hr class=\"x\">\n\nPara.\n";
        let out = render(Extension::empty(), input);
        assert!(out.starts_with("<hr class=\"x\">"));
    }

    #[test]
    fn indented_closing_tag_matches_on_lenient_second_pass() {
        let input = "<div>\nfoo </div>\n\nPara.\n";
        let out = render(Extension::empty(), input);
        assert!(out.contains("<div>\nfoo </div>"));
    }

    #[test]
    fn ins_skips_lenient_second_pass() {
        let input = "<ins>\nfoo </ins>\n\nPara.\n";
        let out = render(Extension::empty(), input);
        assert!(!out.contains("<ins>\nfoo </ins>"));
    }
}
