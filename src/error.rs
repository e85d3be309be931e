//! Error types surfaced by the parser.
//!
//! The only user-visible failure mode is running out of room in a growable
//! buffer; everything else (unterminated emphasis, a declined link, hitting
//! `max_nesting`) is handled locally by falling back to literal text and
//! never reaches the caller.

/// Buffers are capped at 16 MiB; past that a grow request fails rather than
/// allocating without bound.
pub const BUFFER_MAX_ALLOC_SIZE: usize = 1024 * 1024 * 16;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("buffer allocation exceeded the {0}-byte cap")]
    AllocationFailed(usize),
}

pub type Result<T> = ::std::result::Result<T, Error>;
