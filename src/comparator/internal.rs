//! Ordering of encoded internal keys.
//!
//! ```text
//! 1. user key      ascending   (wrapped user comparator)
//! 2. tag           descending  ((sequence << 8) | type)
//! 3. valid time    descending  (MultiVersion format only)
//! ```
//!
//! Descending tags put the newest write of a user key first. Because
//! [`VALUE_TYPE_FOR_SEEK`] is the largest type, a seek key built with it
//! sorts before every real entry carrying the same sequence number.

use std::cmp::Ordering;

use tracing::trace;

use super::Comparator;
use crate::encoding;
use crate::key::{
    HexKey, InternalKey, KeyFormat, MAX_SEQUENCE_NUMBER, MAX_VALID_TIME, MvInternalKey,
    VALUE_TYPE_FOR_SEEK, extract_valid_time, pack_sequence_and_type,
};

/// Comparator over internal keys that delegates the user-key portion to a
/// caller-supplied [`Comparator`].
///
/// Holds the user comparator by reference: it must outlive every structure
/// ordered by this comparator and is never swapped.
#[derive(Clone, Copy)]
pub struct InternalKeyComparator<'a> {
    user_comparator: &'a dyn Comparator,
    format: KeyFormat,
}

impl<'a> InternalKeyComparator<'a> {
    /// Comparator for `user_key | tag` keys.
    pub fn new(user_comparator: &'a dyn Comparator) -> Self {
        Self::with_format(user_comparator, KeyFormat::Standard)
    }

    /// Comparator for keys of the given layout.
    pub fn with_format(user_comparator: &'a dyn Comparator, format: KeyFormat) -> Self {
        Self {
            user_comparator,
            format,
        }
    }

    /// The wrapped user-key comparator.
    pub fn user_comparator(&self) -> &'a dyn Comparator {
        self.user_comparator
    }

    /// The key layout this comparator reads.
    pub fn key_format(&self) -> KeyFormat {
        self.format
    }

    /// Compares two owned standard keys. Both must be set.
    pub fn compare_keys(&self, a: &InternalKey, b: &InternalKey) -> Ordering {
        debug_assert_eq!(self.format, KeyFormat::Standard);
        self.compare(a.encode(), b.encode())
    }

    /// Compares two owned multi-version keys. Both must be set.
    pub fn compare_mv_keys(&self, a: &MvInternalKey, b: &MvInternalKey) -> Ordering {
        debug_assert_eq!(self.format, KeyFormat::MultiVersion);
        self.compare(a.encode(), b.encode())
    }

    /// Appends the suffix that makes a user key sort first among all
    /// internal keys sharing it.
    fn append_max_suffix(&self, user_key: &mut Vec<u8>) {
        encoding::encode_fixed64(
            pack_sequence_and_type(MAX_SEQUENCE_NUMBER, VALUE_TYPE_FOR_SEEK),
            user_key,
        );
        if self.format == KeyFormat::MultiVersion {
            encoding::encode_fixed64(MAX_VALID_TIME, user_key);
        }
    }
}

impl std::fmt::Debug for InternalKeyComparator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InternalKeyComparator")
            .field("user_comparator", &self.user_comparator.name())
            .field("format", &self.format)
            .finish()
    }
}

impl Comparator for InternalKeyComparator<'_> {
    fn name(&self) -> &'static str {
        "mvkeyformat.InternalKeyComparator"
    }

    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        let ord = self
            .user_comparator
            .compare(self.format.user_key(a), self.format.user_key(b));
        if ord != Ordering::Equal {
            return ord;
        }

        let a_tag = self.format.tag(a);
        let b_tag = self.format.tag(b);
        match (b_tag.cmp(&a_tag), self.format) {
            (Ordering::Equal, KeyFormat::MultiVersion) => {
                extract_valid_time(b).cmp(&extract_valid_time(a))
            }
            (ord, _) => ord,
        }
    }

    fn find_shortest_separator(&self, start: &mut Vec<u8>, limit: &[u8]) {
        let user_start = self.format.user_key(start);
        let user_limit = self.format.user_key(limit);

        let mut shortened = user_start.to_vec();
        self.user_comparator
            .find_shortest_separator(&mut shortened, user_limit);

        if shortened.len() < user_start.len()
            && self.user_comparator.compare(user_start, &shortened) == Ordering::Less
        {
            // Physically shorter but logically larger: pin it to the
            // earliest position for that user key.
            self.append_max_suffix(&mut shortened);
            debug_assert_eq!(self.compare(start, &shortened), Ordering::Less);
            debug_assert_eq!(self.compare(&shortened, limit), Ordering::Less);
            trace!(
                "separator shortened from {} to {}",
                HexKey(start),
                HexKey(&shortened)
            );
            *start = shortened;
        }
    }

    fn find_short_successor(&self, key: &mut Vec<u8>) {
        let user_key = self.format.user_key(key);

        let mut successor = user_key.to_vec();
        self.user_comparator.find_short_successor(&mut successor);

        if successor.len() < user_key.len()
            && self.user_comparator.compare(user_key, &successor) == Ordering::Less
        {
            self.append_max_suffix(&mut successor);
            debug_assert_eq!(self.compare(key, &successor), Ordering::Less);
            trace!(
                "successor shortened from {} to {}",
                HexKey(key),
                HexKey(&successor)
            );
            *key = successor;
        }
    }
}
