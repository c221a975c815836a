//! # mvkeyformat
//!
//! The internal key format of a **Log-Structured Merge Tree (LSM-tree)**
//! storage engine with optional **multi-version (valid-time)** keys.
//!
//! Every other layer of the engine (memtable ordering, block layout,
//! compaction merging, point and range lookups) relies on the byte layout
//! and the total order defined here. Both are permanent: changing either
//! after data exists corrupts the store.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cmp::Ordering;
//! use mvkeyformat::{
//!     BytewiseComparator, Comparator, InternalKey, InternalKeyComparator, LookupKey,
//!     ValueType, parse_internal_key,
//! };
//!
//! // Encode / decode
//! let key = InternalKey::new_with(b"abc", 5, ValueType::Value);
//! let parsed = parse_internal_key(key.encode()).unwrap();
//! assert_eq!(parsed.user_key, b"abc");
//! assert_eq!(parsed.sequence, 5);
//!
//! // Order: user key ascending, newest first
//! let cmp = InternalKeyComparator::new(&BytewiseComparator);
//! let older = InternalKey::new_with(b"abc", 4, ValueType::Value);
//! assert_eq!(cmp.compare(key.encode(), older.encode()), Ordering::Less);
//!
//! // Probe a memtable at snapshot 5
//! let probe = LookupKey::new(b"abc", 5);
//! assert_eq!(probe.user_key(), b"abc");
//! assert_eq!(cmp.compare(probe.internal_key(), key.encode()), Ordering::Equal);
//! ```
//!
//! ## Components
//!
//! - [`encoding`] — `fixed64` and `varint32` primitives.
//! - [`key`] — parsed and owning internal keys, the key codec.
//! - [`comparator`] — [`Comparator`] trait, bytewise and internal-key orders.
//! - [`filter`] — [`FilterPolicy`] trait, bloom filter, internal-key adapter.
//! - [`lookup`] — [`LookupKey`] / [`MvLookupKey`] memtable probes.
//! - [`config`] — level-structure constants consumed by other subsystems.
//!
//! ## Concurrency
//!
//! Nothing here performs I/O, locks, or blocks. Codec functions are pure.
//! Comparators and filter adapters are immutable after construction and
//! `Send + Sync`. Owning keys and lookup keys are single-owner values.

pub mod comparator;
pub mod config;
pub mod encoding;
pub mod filter;
pub mod key;
pub mod lookup;

// ------------------------------------------------------------------------------------------------
// Re-exports — public API surface
// ------------------------------------------------------------------------------------------------

pub use comparator::{BytewiseComparator, Comparator, InternalKeyComparator};
pub use config::{ConfigError, LevelConfig};
pub use encoding::EncodingError;
pub use filter::{BloomFilterPolicy, FilterError, FilterPolicy, InternalFilterPolicy};
pub use key::{
    InternalKey, KeyError, KeyFormat, MAX_SEQUENCE_NUMBER, MAX_VALID_TIME, MIN_VALID_TIME,
    MvInternalKey, ParsedInternalKey, ParsedMvInternalKey, SequenceNumber, VALUE_TYPE_FOR_SEEK,
    ValidTime, ValueType, append_internal_key, append_mv_internal_key, extract_mv_user_key,
    extract_user_key, extract_valid_time, parse_internal_key, parse_mv_internal_key,
};
pub use lookup::{LookupKey, MvLookupKey};
