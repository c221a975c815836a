//! # Comparators
//!
//! The total orders used by every sorted structure of the engine.
//!
//! - [`Comparator`] — the trait injected into memtables, block builders and
//!   merge iterators.
//! - [`BytewiseComparator`] — lexicographic order over raw bytes; the
//!   default user-key order.
//! - [`InternalKeyComparator`] — orders encoded internal keys by user key
//!   ascending, then by tag descending (newest first).
//!
//! ## Stability contract
//!
//! The comparator given to a persistent structure must stay the same for
//! the whole lifetime of its data. Swapping it, or the user comparator it
//! wraps, invalidates every previously written ordering. Nothing in this
//! module can detect that; callers enforce it, usually by persisting
//! [`Comparator::name`] and checking it on open.

pub mod internal;

#[cfg(test)]
mod tests;

// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::cmp::Ordering;

pub use internal::InternalKeyComparator;

// ------------------------------------------------------------------------------------------------
// Comparator trait
// ------------------------------------------------------------------------------------------------

/// A total order over byte strings.
///
/// Implementations must be immutable after construction; they are shared
/// across threads by every reader of a sorted structure.
pub trait Comparator: Send + Sync {
    /// Stable identifier persisted alongside data ordered by this comparator.
    fn name(&self) -> &'static str;

    /// Three-way comparison of `a` and `b`.
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;

    /// If `*start < limit`, may shorten `start` to a key in `[start, limit)`.
    ///
    /// Used to keep index blocks small. Leaving `start` untouched is
    /// always correct.
    fn find_shortest_separator(&self, start: &mut Vec<u8>, limit: &[u8]);

    /// May change `key` to a short key `>= key`. Leaving it untouched is
    /// always correct.
    fn find_short_successor(&self, key: &mut Vec<u8>);
}

// ------------------------------------------------------------------------------------------------
// BytewiseComparator
// ------------------------------------------------------------------------------------------------

/// Lexicographic, unsigned byte-by-byte order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytewiseComparator;

impl Comparator for BytewiseComparator {
    fn name(&self) -> &'static str {
        "mvkeyformat.BytewiseComparator"
    }

    #[inline]
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }

    fn find_shortest_separator(&self, start: &mut Vec<u8>, limit: &[u8]) {
        let min_len = start.len().min(limit.len());
        let diff_index = start
            .iter()
            .zip(limit)
            .position(|(s, l)| s != l)
            .unwrap_or(min_len);

        if diff_index >= min_len {
            // One is a prefix of the other.
            return;
        }

        let diff_byte = start[diff_index];
        if diff_byte < u8::MAX && diff_byte + 1 < limit[diff_index] {
            start[diff_index] += 1;
            start.truncate(diff_index + 1);
            debug_assert_eq!(self.compare(start, limit), Ordering::Less);
        }
    }

    fn find_short_successor(&self, key: &mut Vec<u8>) {
        // Bump the first byte that can be incremented and drop the rest.
        if let Some(i) = key.iter().position(|&b| b != u8::MAX) {
            key[i] += 1;
            key.truncate(i + 1);
        }
        // All 0xff: leave as is.
    }
}
