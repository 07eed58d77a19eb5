//! Sorted-insert and merge primitives over ordered sequences.
//!
//! Postings lists are kept in doc-id order at insertion time, not sorted at
//! the end, so everything downstream can rely on ordered input. The merge
//! primitives are plain two-pointer walks; `intersect` backs the
//! `--all-phrases` candidate pool and `union_postings` backs the shard merge
//! of the parallel build.
//!
//! # Invariants
//!
//! 1. Inputs are already sorted (scalars by value, postings by `doc_id`).
//! 2. `insert_posting` does not dedupe by head; callers filter duplicates
//!    upstream via a containment check.

use crate::types::Posting;

/// Insert `value` into a sorted list unless it is already present.
///
/// Binary search for the slot, shift-insert at the first position whose
/// element is greater. Returns `false` if `value` was already in the list.
pub fn insert_unique(value: u32, list: &mut Vec<u32>) -> bool {
    match list.binary_search(&value) {
        Ok(_) => false,
        Err(slot) => {
            list.insert(slot, value);
            true
        }
    }
}

/// Insert a posting into a list ordered by `doc_id`.
///
/// The slot is found by binary search on the head field; an equal head
/// inserts after the existing run. The caller guarantees head uniqueness.
pub fn insert_posting(posting: Posting, list: &mut Vec<Posting>) {
    let slot = list.partition_point(|p| p.doc_id <= posting.doc_id);
    list.insert(slot, posting);
}

/// Intersection of two sorted scalar lists.
pub fn intersect(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }

    out
}

/// Union of two sorted scalar lists.
pub fn union(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else {
            out.push(b[j]);
            j += 1;
        }
    }

    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);

    out
}

/// Intersection of two postings lists, compared by head. Keeps the posting
/// from `a` when heads collide.
pub fn intersect_postings(a: &[Posting], b: &[Posting]) -> Vec<Posting> {
    let mut out = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        if a[i].doc_id == b[j].doc_id {
            out.push(a[i].clone());
            i += 1;
            j += 1;
        } else if a[i].doc_id < b[j].doc_id {
            i += 1;
        } else {
            j += 1;
        }
    }

    out
}

/// Union of two postings lists, compared by head. Keeps the posting from
/// `a` when heads collide.
pub fn union_postings(a: &[Posting], b: &[Posting]) -> Vec<Posting> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        if a[i].doc_id == b[j].doc_id {
            out.push(a[i].clone());
            i += 1;
            j += 1;
        } else if a[i].doc_id < b[j].doc_id {
            out.push(a[i].clone());
            i += 1;
        } else {
            out.push(b[j].clone());
            j += 1;
        }
    }

    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);

    out
}
