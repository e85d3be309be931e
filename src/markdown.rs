//! Top-level convenience wrapper around [`Parser`](crate::parser::Parser).
//!
//! Grounded on the teacher's `Markdown` type (`src/markdown.rs`), which held
//! the source `Buffer` plus `extensions`/`max_nesting` and rendered by
//! handing those three fields to the FFI document. There's no FFI document
//! to hand them to here, so `render`/`render_into` construct a `Parser` with
//! the same fields and drive it directly.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::extensions::Extension;
use crate::parser::Parser;
use crate::renderer::Render;

/// A Markdown document: source bytes plus the extension set and nesting
/// limit to parse it with.
#[derive(Clone)]
pub struct Markdown {
    pub contents: Buffer,
    pub extensions: Extension,
    pub max_nesting: usize,
}

impl Markdown {
    pub fn new(body: &str) -> Markdown {
        Markdown::from(body.as_bytes())
    }

    /// Builder method to specify which extensions are active.
    pub fn extensions(mut self, extensions: Extension) -> Markdown {
        self.extensions = extensions;
        self
    }

    /// Builder method to specify the maximum combined block/span nesting
    /// depth before the parser falls back to emitting the remainder
    /// literally.
    pub fn max_nesting(mut self, max_nesting: usize) -> Markdown {
        self.max_nesting = max_nesting;
        self
    }

    /// Renders the document into a freshly allocated buffer.
    pub fn render<R: Render>(&self, renderer: &mut R) -> Result<Buffer> {
        self.parser().render(self.contents.as_bytes(), renderer)
    }

    /// Renders the document, appending to `out`.
    pub fn render_into<R: Render>(&self, out: &mut Buffer, renderer: &mut R) -> Result<()> {
        self.parser().render_into(self.contents.as_bytes(), out, renderer)
    }

    /// Renders the document through an HTML renderer and returns the result
    /// as a `String`. Fails only if the rendered output isn't valid UTF-8,
    /// which can't happen for the built-in `Html` renderer.
    pub fn to_html(&self, html: &mut crate::renderer::html::Html) -> Result<String> {
        let out = self.render(html)?;
        Ok(out.to_str().expect("HTML renderer output is always UTF-8").to_owned())
    }

    fn parser(&self) -> Parser {
        Parser::new(self.extensions, self.max_nesting)
    }
}

impl From<Buffer> for Markdown {
    fn from(buffer: Buffer) -> Markdown {
        Markdown {
            contents: buffer,
            extensions: Extension::empty(),
            max_nesting: 16,
        }
    }
}

impl<'a> From<&'a [u8]> for Markdown {
    fn from(bytes: &[u8]) -> Markdown {
        Markdown {
            contents: Buffer::from(bytes),
            extensions: Extension::empty(),
            max_nesting: 16,
        }
    }
}

impl<'a> From<&'a str> for Markdown {
    fn from(body: &str) -> Markdown {
        Markdown::from(body.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::html::{self, Html};

    #[test]
    fn renders_to_html() {
        let doc = Markdown::new("some _emphasis_ required");
        let mut html = Html::new(html::Flags::empty(), 0);
        assert_eq!(doc.to_html(&mut html).unwrap(), "<p>some <em>emphasis</em> required</p>\n");
    }

    #[test]
    fn builder_methods_set_fields() {
        let doc = Markdown::new("# hi").extensions(Extension::TABLES).max_nesting(4);
        assert_eq!(doc.extensions, Extension::TABLES);
        assert_eq!(doc.max_nesting, 4);
    }
}
