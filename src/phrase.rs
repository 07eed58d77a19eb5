//! Phrase matching: a two-level k-way positional intersection.
//!
//! Level 1 sweeps the postings lists of the phrase's terms until every
//! pointer sits on the same doc id. Level 2 runs the same sweep over that
//! document's position lists, shifted by each term's offset in the phrase,
//! looking for a base position where the terms line up contiguously. One
//! witness is enough; the sweep then moves on to the next candidate doc.
//!
//! A sweep terminates as soon as any pointer exhausts its list, so a term
//! with no postings means the phrase matches nothing.

use crate::inverted::InvertedIndex;
use crate::sorted;
use crate::types::Posting;

/// Candidate pool for a set of phrases. `require_all` switches the pool
/// from the union of per-phrase matches (any phrase admits a document) to
/// their intersection (every phrase must match).
pub fn docs_matching_phrases(
    index: &InvertedIndex,
    phrases: &[Vec<String>],
    require_all: bool,
) -> Vec<u32> {
    let mut pool: Option<Vec<u32>> = None;

    for phrase in phrases {
        let matched = docs_with_phrase(index, phrase);
        pool = Some(match pool {
            None => matched,
            Some(prev) if require_all => sorted::intersect(&prev, &matched),
            Some(prev) => sorted::union(&prev, &matched),
        });
    }

    pool.unwrap_or_default()
}

/// Documents containing `phrase` contiguously and in order, ascending.
pub fn docs_with_phrase(index: &InvertedIndex, phrase: &[String]) -> Vec<u32> {
    let lists: Vec<&[Posting]> = phrase.iter().map(|term| index.get_postings(term)).collect();

    if lists.is_empty() || lists.iter().any(|list| list.is_empty()) {
        return Vec::new();
    }

    let m = lists.len();
    let mut ptr = vec![0usize; m];
    let mut out = Vec::new();

    // Sweep state: the doc id every pointer is trying to reach, and how
    // many pointers currently sit on it.
    let mut target: Option<u32> = None;
    let mut matched = 0usize;

    let mut i = 0;
    'sweep: loop {
        i = (i + 1) % m;

        if let Some(t) = target {
            while lists[i][ptr[i]].doc_id < t {
                ptr[i] += 1;
                if ptr[i] == lists[i].len() {
                    break 'sweep;
                }
            }
        }

        let head = lists[i][ptr[i]].doc_id;
        match target {
            Some(t) if head == t => matched += 1,
            _ => {
                target = Some(head);
                matched = 1;
            }
        }

        if matched == m {
            let positions: Vec<&[u32]> = (0..m)
                .map(|j| lists[j][ptr[j]].positions.as_slice())
                .collect();
            if phrase_occurs(&positions) {
                out.push(head);
            }

            // Move on to the next candidate; the stale pointers catch up
            // at the top of the sweep.
            target = Some(head + 1);
            matched = 0;
        }
    }

    out
}

/// Level 2: is there a base position such that term `j` of the phrase
/// occurs at `base + j` for every `j`?
fn phrase_occurs(positions: &[&[u32]]) -> bool {
    let m = positions.len();
    let mut ptr = vec![0usize; m];

    // Offset-shifted variant of the doc-id sweep. `base` is the candidate
    // start position; -1 means no candidate yet.
    let mut base: i64 = -1;
    let mut matched = 0usize;

    let mut j = 0;
    loop {
        j = (j + 1) % m;

        while i64::from(positions[j][ptr[j]]) < base + j as i64 {
            ptr[j] += 1;
            if ptr[j] == positions[j].len() {
                return false;
            }
        }

        let shifted = i64::from(positions[j][ptr[j]]) - j as i64;
        if i64::from(positions[j][ptr[j]]) == base + j as i64 {
            matched += 1;
        } else {
            base = shifted;
            matched = 1;
        }

        if matched == m {
            return true;
        }
    }
}
