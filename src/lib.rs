//! A two-pass, extensible Markdown-to-HTML parser.
//!
//! Source text is scanned once to collect link and footnote reference
//! definitions and expand tabs, then parsed recursively by a block parser
//! that hands span-level text to an inline scanner. Both stages call out to
//! a [`Render`] implementation, so the same parse can drive the bundled
//! [`renderer::html::Html`] renderer, a table-of-contents renderer, or a
//! custom one.
//!
//! ```rust
//! use waymark::Markdown;
//! use waymark::renderer::html::{self, Html};
//!
//! let doc = Markdown::new("some _emphasis_ required");
//! let mut html = Html::new(html::Flags::empty(), 0);
//!
//! assert_eq!(
//!     doc.to_html(&mut html).unwrap(),
//!     "<p>some <em>emphasis</em> required</p>\n");
//! ```

mod autolink;
mod buffer;
mod error;
mod escape;
mod extensions;
mod hash;
mod html_blocks;
mod markdown;
mod parser;
mod pool;
pub mod renderer;
mod refs;

pub use buffer::Buffer;
pub use error::{Error, Result};
pub use extensions::Extension;
pub use markdown::Markdown;
pub use parser::Parser;
pub use renderer::Render;

/// The `(major, minor, revision)` version of this implementation, not tied
/// to the crate's own `Cargo.toml` version.
pub fn version() -> (u32, u32, u32) {
    (1, 0, 0)
}
