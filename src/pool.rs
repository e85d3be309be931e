//! Two-tier buffer pool: reusable scratch buffers for block-scope and
//! span-scope work, avoiding a fresh heap allocation at every recursion
//! level of the block parser and inline scanner.
//!
//! The original enforces LIFO discipline by convention (`new_buf`/`pop_buf`
//! index bookkeeping that callers must pair up correctly). The block parser
//! and inline scanner here check out buffers at every recursion level while
//! an outer level's buffer is still held, so checkouts from the same stack
//! must be able to coexist -- a `&mut BufferPool` held across a recursive
//! call would fight the borrow checker for no benefit. Each stack is kept
//! behind a `RefCell`, borrowed only for the instant of pop/push; the
//! checked-out `Buffer` itself is owned by the guard, so `Parser` hands out
//! `&Parser` (shared) everywhere and still gets LIFO-safe, alias-free scratch
//! space.

use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};

use crate::buffer::Buffer;

/// Growth granularity for block-scope scratch buffers.
pub const BLOCK_UNIT: usize = 256;
/// Growth granularity for span-scope scratch buffers.
pub const SPAN_UNIT: usize = 64;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Scope {
    Block,
    Span,
}

struct ScopeStack {
    stack: RefCell<Vec<Buffer>>,
    checked_out: Cell<usize>,
    unit: usize,
}

impl ScopeStack {
    fn new(unit: usize) -> ScopeStack {
        ScopeStack {
            stack: RefCell::new(Vec::new()),
            checked_out: Cell::new(0),
            unit,
        }
    }

    fn checkout(&self) -> PoolGuard<'_> {
        let mut buffer = self.stack.borrow_mut().pop().unwrap_or_else(|| Buffer::new(self.unit));
        buffer.reset();
        self.checked_out.set(self.checked_out.get() + 1);

        PoolGuard {
            stack: self,
            buffer: Some(buffer),
        }
    }

    fn is_balanced(&self) -> bool {
        self.checked_out.get() == 0
    }
}

/// Owns the two scratch-buffer stacks for a single parse.
pub struct BufferPool {
    block: ScopeStack,
    span: ScopeStack,
}

impl Default for BufferPool {
    fn default() -> BufferPool {
        BufferPool::new()
    }
}

impl BufferPool {
    pub fn new() -> BufferPool {
        BufferPool {
            block: ScopeStack::new(BLOCK_UNIT),
            span: ScopeStack::new(SPAN_UNIT),
        }
    }

    /// Checks out a cleared buffer of the requested scope. Call sites should
    /// hold onto the returned guard for exactly as long as they need the
    /// scratch space; it returns to the pool automatically when dropped.
    /// Takes `&self` (not `&mut self`) precisely so that a checkout held by
    /// an outer recursion level doesn't block an inner level from checking
    /// out its own buffer of the same or the other scope.
    pub fn checkout(&self, scope: Scope) -> PoolGuard<'_> {
        match scope {
            Scope::Block => self.block.checkout(),
            Scope::Span => self.span.checkout(),
        }
    }

    /// True once every checkout from this pool has been returned. Asserted by
    /// tests after a render completes, and in debug builds at the end of
    /// `Parser::render`.
    pub fn is_balanced(&self) -> bool {
        self.block.is_balanced() && self.span.is_balanced()
    }
}

/// RAII handle to a pooled buffer. Dereferences to the underlying [`Buffer`].
pub struct PoolGuard<'a> {
    stack: &'a ScopeStack,
    buffer: Option<Buffer>,
}

impl<'a> Deref for PoolGuard<'a> {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        self.buffer.as_ref().expect("buffer taken before drop")
    }
}

impl<'a> DerefMut for PoolGuard<'a> {
    fn deref_mut(&mut self) -> &mut Buffer {
        self.buffer.as_mut().expect("buffer taken before drop")
    }
}

impl<'a> Drop for PoolGuard<'a> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.stack.stack.borrow_mut().push(buffer);
            self.stack.checked_out.set(self.stack.checked_out.get() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_balanced_after_all_guards_drop() {
        let pool = BufferPool::new();
        {
            let mut a = pool.checkout(Scope::Block);
            a.put(b"hello").unwrap();
            let _b = pool.checkout(Scope::Span);
            assert!(!pool.is_balanced());
        }
        assert!(pool.is_balanced());
    }

    #[test]
    fn checked_out_buffer_starts_cleared() {
        let pool = BufferPool::new();
        {
            let mut buf = pool.checkout(Scope::Block);
            buf.put(b"stale").unwrap();
        }
        let buf = pool.checkout(Scope::Block);
        assert!(buf.is_empty());
    }

    #[test]
    fn nested_checkouts_of_the_same_scope_coexist() {
        let pool = BufferPool::new();
        let mut outer = pool.checkout(Scope::Block);
        outer.put(b"outer").unwrap();
        {
            let mut inner = pool.checkout(Scope::Block);
            inner.put(b"inner").unwrap();
            assert_eq!(&*inner, b"inner");
        }
        assert_eq!(&*outer, b"outer");
    }
}
