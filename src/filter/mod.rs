//! # Filter Policies
//!
//! Probabilistic membership filters consulted before reading a table.
//!
//! - [`FilterPolicy`] — the trait table builders and readers are handed.
//! - [`BloomFilterPolicy`] — a user-key bloom filter backed by the
//!   `bloomfilter` crate.
//! - [`InternalFilterPolicy`] — adapter that strips the internal suffix
//!   so the wrapped policy only ever sees user keys.
//!
//! A filter answers "might this user key exist anywhere in the table",
//! independent of version: two internal keys that share a user key always
//! get the same answer.


// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use bloomfilter::Bloom;
use thiserror::Error;
use tracing::{trace, warn};

use crate::key::KeyFormat;

// ------------------------------------------------------------------------------------------------
// Constants
// ------------------------------------------------------------------------------------------------

/// Default false-positive rate of [`BloomFilterPolicy`].
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;

// ------------------------------------------------------------------------------------------------
// Error type
// ------------------------------------------------------------------------------------------------

/// Errors raised while building a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The bloom filter could not be sized for the given keys.
    #[error("bloom filter error: {0}")]
    Bloom(String),
}

// ------------------------------------------------------------------------------------------------
// FilterPolicy trait
// ------------------------------------------------------------------------------------------------

/// A filter summarising a set of keys.
///
/// Implementations are immutable and shared between threads.
pub trait FilterPolicy: Send + Sync {
    /// Stable identifier persisted alongside the filters it produced.
    fn name(&self) -> &'static str;

    /// Appends a filter summarising `keys` to `dst`.
    fn create_filter(&self, keys: &[&[u8]], dst: &mut Vec<u8>) -> Result<(), FilterError>;

    /// `false` only if `key` was definitely not among the keys passed to
    /// [`create_filter`](Self::create_filter) for `filter`.
    fn key_may_match(&self, key: &[u8], filter: &[u8]) -> bool;
}

// ------------------------------------------------------------------------------------------------
// BloomFilterPolicy
// ------------------------------------------------------------------------------------------------

/// Bloom filter over raw keys.
#[derive(Debug, Clone, Copy)]
pub struct BloomFilterPolicy {
    false_positive_rate: f64,
}

impl BloomFilterPolicy {
    /// Creates a policy targeting `false_positive_rate`, which must lie in
    /// `(0.0, 1.0)`.
    pub fn new(false_positive_rate: f64) -> Result<Self, FilterError> {
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(FilterError::Bloom(format!(
                "false positive rate {false_positive_rate} must be in (0.0, 1.0)"
            )));
        }
        Ok(Self {
            false_positive_rate,
        })
    }

    /// The false-positive rate filters are sized for.
    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }
}

impl Default for BloomFilterPolicy {
    fn default() -> Self {
        Self {
            false_positive_rate: DEFAULT_FALSE_POSITIVE_RATE,
        }
    }
}

impl FilterPolicy for BloomFilterPolicy {
    fn name(&self) -> &'static str {
        "mvkeyformat.BuiltinBloomFilter"
    }

    fn create_filter(&self, keys: &[&[u8]], dst: &mut Vec<u8>) -> Result<(), FilterError> {
        // The bloom crate refuses zero-sized filters.
        let mut bloom: Bloom<[u8]> =
            Bloom::new_for_fp_rate(keys.len().max(1), self.false_positive_rate)
                .map_err(|e| FilterError::Bloom(e.to_string()))?;
        for key in keys {
            bloom.set(key);
        }
        let bytes = bloom.as_slice();
        trace!(
            "created bloom filter: {} keys, {} bytes",
            keys.len(),
            bytes.len()
        );
        dst.extend_from_slice(&bytes);
        Ok(())
    }

    fn key_may_match(&self, key: &[u8], filter: &[u8]) -> bool {
        if filter.is_empty() {
            return true; // no filter → cannot exclude
        }
        match Bloom::<[u8]>::from_slice(filter) {
            Ok(bloom) => bloom.check(key),
            Err(e) => {
                warn!("undecodable bloom filter ({} bytes): {}", filter.len(), e);
                true
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// InternalFilterPolicy
// ------------------------------------------------------------------------------------------------

/// Presents internal keys to a user-key [`FilterPolicy`].
///
/// Both operations hand the wrapped policy only the user-key portion of
/// each key, so sequence number, type and valid time never influence the
/// filter.
#[derive(Clone, Copy)]
pub struct InternalFilterPolicy<'a> {
    user_policy: &'a dyn FilterPolicy,
    format: KeyFormat,
}

impl<'a> InternalFilterPolicy<'a> {
    /// Adapter for `user_key | tag` keys.
    pub fn new(user_policy: &'a dyn FilterPolicy) -> Self {
        Self::with_format(user_policy, KeyFormat::Standard)
    }

    /// Adapter for keys of the given layout.
    pub fn with_format(user_policy: &'a dyn FilterPolicy, format: KeyFormat) -> Self {
        Self {
            user_policy,
            format,
        }
    }

    /// The wrapped user-key policy.
    pub fn user_policy(&self) -> &'a dyn FilterPolicy {
        self.user_policy
    }

    /// The key layout this adapter strips.
    pub fn key_format(&self) -> KeyFormat {
        self.format
    }
}

impl std::fmt::Debug for InternalFilterPolicy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InternalFilterPolicy")
            .field("user_policy", &self.user_policy.name())
            .field("format", &self.format)
            .finish()
    }
}

impl FilterPolicy for InternalFilterPolicy<'_> {
    /// Same name as the wrapped policy: the filters it produces are
    /// user-key filters.
    fn name(&self) -> &'static str {
        self.user_policy.name()
    }

    fn create_filter(&self, keys: &[&[u8]], dst: &mut Vec<u8>) -> Result<(), FilterError> {
        let user_keys: Vec<&[u8]> = keys.iter().map(|k| self.format.user_key(k)).collect();
        self.user_policy.create_filter(&user_keys, dst)
    }

    fn key_may_match(&self, key: &[u8], filter: &[u8]) -> bool {
        self.user_policy
            .key_may_match(self.format.user_key(key), filter)
    }
}
