//! Reference tables populated during pass 1 and consulted during pass 2:
//! link reference definitions (`[id]: url "title"`) and footnote
//! definitions (`[^id]: body`).

use crate::buffer::Buffer;
use crate::hash::{bucket_of, hash_ref, REF_TABLE_SIZE};

/// A single link reference definition.
///
/// Keyed only by a 32-bit hash of its (lowercased) id -- no key bytes are
/// stored. Collisions within a bucket are resolved by hash equality alone
/// and silently alias to whichever definition was inserted first. This is a
/// deliberate fidelity choice carried over from the reference implementation,
/// not a defect: with an 8-bucket table and realistic documents, collisions
/// between distinct reference names are vanishingly rare, and the original
/// never stored key bytes either.
#[derive(Debug)]
pub struct LinkRef {
    pub id: u32,
    pub link: Buffer,
    pub title: Buffer,
}

/// Link references bucketed by `hash % REF_TABLE_SIZE`.
#[derive(Default)]
pub struct RefTable {
    buckets: [Vec<LinkRef>; REF_TABLE_SIZE],
}

impl RefTable {
    pub fn new() -> RefTable {
        RefTable::default()
    }

    /// Inserts a reference unless one with the same id already exists in its
    /// bucket (first definition wins -- Invariant 4: order-independent
    /// lookup).
    pub fn insert(&mut self, key: &[u8], link: Buffer, title: Buffer) {
        let id = hash_ref(key);
        let bucket = &mut self.buckets[bucket_of(id)];
        if bucket.iter().any(|r| r.id == id) {
            return;
        }
        bucket.push(LinkRef { id, link, title });
    }

    pub fn lookup(&self, key: &[u8]) -> Option<&LinkRef> {
        let id = hash_ref(key);
        self.buckets[bucket_of(id)].iter().find(|r| r.id == id)
    }
}

/// A footnote definition collected in pass 1.
#[derive(Debug)]
pub struct Footnote {
    pub id: u32,
    pub is_used: bool,
    pub num: u32,
    pub contents: Buffer,
}

/// Footnote bookkeeping for a single parse: every definition found in pass 1,
/// plus the subset actually referenced from the document body, in
/// first-reference order with assigned ordinals.
#[derive(Default)]
pub struct FootnoteTable {
    pub found: Vec<Footnote>,
    pub used: Vec<usize>,
}

impl FootnoteTable {
    pub fn new() -> FootnoteTable {
        FootnoteTable::default()
    }

    pub fn define(&mut self, key: &[u8], contents: Buffer) {
        let id = hash_ref(key);
        if self.found.iter().any(|f| f.id == id) {
            return;
        }
        self.found.push(Footnote {
            id,
            is_used: false,
            num: 0,
            contents,
        });
    }

    /// Marks the footnote `key` as referenced, assigning it the next ordinal
    /// on first use. Returns the assigned ordinal, or `None` if no matching
    /// definition was found.
    pub fn reference(&mut self, key: &[u8]) -> Option<u32> {
        let id = hash_ref(key);
        let index = self.found.iter().position(|f| f.id == id)?;

        if !self.found[index].is_used {
            let num = self.used.len() as u32 + 1;
            self.found[index].is_used = true;
            self.found[index].num = num;
            self.used.push(index);
        }

        Some(self.found[index].num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_definition_wins_on_redefinition() {
        let mut table = RefTable::new();
        table.insert(b"id", Buffer::from("first"), Buffer::from(""));
        table.insert(b"id", Buffer::from("second"), Buffer::from(""));
        assert_eq!(&*table.lookup(b"id").unwrap().link, b"first");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut table = RefTable::new();
        table.insert(b"Id", Buffer::from("url"), Buffer::from(""));
        assert!(table.lookup(b"ID").is_some());
    }

    #[test]
    fn footnote_reference_assigns_ordinals_in_first_use_order() {
        let mut footnotes = FootnoteTable::new();
        footnotes.define(b"a", Buffer::from("body a"));
        footnotes.define(b"b", Buffer::from("body b"));

        assert_eq!(footnotes.reference(b"b"), Some(1));
        assert_eq!(footnotes.reference(b"a"), Some(2));
        assert_eq!(footnotes.reference(b"b"), Some(1));
        assert_eq!(footnotes.used, vec![1, 0]);
    }

    #[test]
    fn footnote_reference_to_unknown_id_is_none() {
        let mut footnotes = FootnoteTable::new();
        assert_eq!(footnotes.reference(b"missing"), None);
    }
}
