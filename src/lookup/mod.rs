//! # Lookup Keys
//!
//! Probe keys for point lookups against a memtable.
//!
//! A lookup key is built once per `get` and exposes three views of the
//! same buffer:
//!
//! ```text
//!   klength   varint32              <-- memtable_key() starts here
//!   user_key  [u8; N]               <-- internal_key() / user_key() start here
//!   tag       fixed64               <-- user_key() ends here
//!   (valid_time fixed64)            MvLookupKey only
//!                                   <-- end
//! ```
//!
//! `klength` is the length of the internal key (`N + 8`, or `N + 16` for
//! [`MvLookupKey`]). The tag carries [`VALUE_TYPE_FOR_SEEK`] so the probe
//! lands on the newest entry visible at the requested sequence.
//!
//! Short keys are assembled in a fixed inline buffer; only keys whose
//! encoding exceeds [`INLINE_CAPACITY`] bytes allocate.
//!
//! Lookup keys are neither `Clone` nor `Copy`: the views borrow the
//! builder and live only as long as the lookup that created it.


// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::fmt;

use tracing::trace;

use crate::encoding::{FIXED64_SIZE, put_fixed64, put_varint32, varint32_len};
use crate::key::{
    HexKey, MV_SUFFIX_SIZE, SequenceNumber, TAG_SIZE, VALUE_TYPE_FOR_SEEK, ValidTime,
    extract_valid_time, pack_sequence_and_type,
};

// ------------------------------------------------------------------------------------------------
// Constants
// ------------------------------------------------------------------------------------------------

/// Encodings up to this many bytes are stored without heap allocation.
pub const INLINE_CAPACITY: usize = 200;

// ------------------------------------------------------------------------------------------------
// Storage
// ------------------------------------------------------------------------------------------------

/// Backing bytes of a lookup key, chosen once at construction.
enum KeyBuf {
    Inline {
        buf: [u8; INLINE_CAPACITY],
        len: usize,
    },
    Heap(Vec<u8>),
}

impl KeyBuf {
    /// Zeroed storage of exactly `len` bytes.
    fn with_len(len: usize) -> Self {
        if len <= INLINE_CAPACITY {
            KeyBuf::Inline {
                buf: [0u8; INLINE_CAPACITY],
                len,
            }
        } else {
            KeyBuf::Heap(vec![0u8; len])
        }
    }

    #[inline]
    fn as_slice(&self) -> &[u8] {
        match self {
            KeyBuf::Inline { buf, len } => &buf[..*len],
            KeyBuf::Heap(v) => v.as_slice(),
        }
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            KeyBuf::Inline { buf, len } => &mut buf[..*len],
            KeyBuf::Heap(v) => v.as_mut_slice(),
        }
    }

    #[inline]
    fn is_inline(&self) -> bool {
        matches!(self, KeyBuf::Inline { .. })
    }
}

/// Internal key length as stored in the `varint32` prefix.
///
/// Panics if `klen` does not fit in 32 bits.
fn klength(klen: usize) -> u32 {
    match u32::try_from(klen) {
        Ok(len) => len,
        Err(_) => panic!("lookup key too long: {klen} bytes exceeds u32::MAX"),
    }
}

/// Writes `varint32(klen) | user_key | suffix...` and returns the storage
/// together with the offset of the internal key.
fn build(user_key: &[u8], suffix: &[u64]) -> (KeyBuf, usize) {
    let klen = user_key.len() + suffix.len() * FIXED64_SIZE;
    let klen32 = klength(klen);

    let mut storage = KeyBuf::with_len(varint32_len(klen32) + klen);
    let dst = storage.as_mut_slice();

    let kstart = put_varint32(dst, klen32);
    let mut offset = kstart + user_key.len();
    dst[kstart..offset].copy_from_slice(user_key);
    for &field in suffix {
        put_fixed64(&mut dst[offset..], field);
        offset += FIXED64_SIZE;
    }
    debug_assert_eq!(offset, dst.len());

    trace!(
        "built lookup key for {} ({} bytes, inline: {})",
        HexKey(user_key),
        offset,
        storage.is_inline()
    );
    (storage, kstart)
}

// ------------------------------------------------------------------------------------------------
// LookupKey
// ------------------------------------------------------------------------------------------------

/// Probe key for `user_key` as of `sequence`.
pub struct LookupKey {
    storage: KeyBuf,
    /// Offset of the internal key within `storage`.
    kstart: usize,
}

impl LookupKey {
    /// Builds the probe key for `user_key` at snapshot `sequence`.
    ///
    /// # Panics
    ///
    /// If the internal key (`user_key` plus the 8-byte tag) is longer than
    /// `u32::MAX` bytes, which the `varint32` prefix cannot describe.
    pub fn new(user_key: &[u8], sequence: SequenceNumber) -> Self {
        let tag = pack_sequence_and_type(sequence, VALUE_TYPE_FOR_SEEK);
        let (storage, kstart) = build(user_key, &[tag]);
        Self { storage, kstart }
    }

    /// Length-prefixed internal key, as stored in a memtable.
    #[inline]
    pub fn memtable_key(&self) -> &[u8] {
        self.storage.as_slice()
    }

    /// The internal key alone.
    #[inline]
    pub fn internal_key(&self) -> &[u8] {
        &self.storage.as_slice()[self.kstart..]
    }

    /// The original user key.
    #[inline]
    pub fn user_key(&self) -> &[u8] {
        let end = self.storage.as_slice().len() - TAG_SIZE;
        &self.storage.as_slice()[self.kstart..end]
    }

    /// Whether the key fit into inline storage.
    pub fn is_inline(&self) -> bool {
        self.storage.is_inline()
    }
}

impl fmt::Debug for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupKey")
            .field("user_key", &HexKey(self.user_key()).to_string())
            .field("inline", &self.is_inline())
            .finish()
    }
}

// ------------------------------------------------------------------------------------------------
// MvLookupKey
// ------------------------------------------------------------------------------------------------

/// Probe key for `user_key` as of `sequence` and `valid_time`.
pub struct MvLookupKey {
    storage: KeyBuf,
    kstart: usize,
}

impl MvLookupKey {
    /// Builds the probe key for `user_key` at snapshot `sequence` and
    /// `valid_time`.
    ///
    /// # Panics
    ///
    /// If the internal key (`user_key` plus the 16-byte suffix) is longer
    /// than `u32::MAX` bytes.
    pub fn new(user_key: &[u8], sequence: SequenceNumber, valid_time: ValidTime) -> Self {
        let tag = pack_sequence_and_type(sequence, VALUE_TYPE_FOR_SEEK);
        let (storage, kstart) = build(user_key, &[tag, valid_time]);
        Self { storage, kstart }
    }

    /// Length-prefixed multi-version internal key.
    #[inline]
    pub fn memtable_key(&self) -> &[u8] {
        self.storage.as_slice()
    }

    /// The multi-version internal key alone.
    #[inline]
    pub fn internal_key(&self) -> &[u8] {
        &self.storage.as_slice()[self.kstart..]
    }

    /// The original user key.
    #[inline]
    pub fn user_key(&self) -> &[u8] {
        let end = self.storage.as_slice().len() - MV_SUFFIX_SIZE;
        &self.storage.as_slice()[self.kstart..end]
    }

    /// The trailing valid-time field.
    #[inline]
    pub fn valid_time(&self) -> ValidTime {
        extract_valid_time(self.internal_key())
    }

    /// Whether the key fit into inline storage.
    pub fn is_inline(&self) -> bool {
        self.storage.is_inline()
    }
}

impl fmt::Debug for MvLookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MvLookupKey")
            .field("user_key", &HexKey(self.user_key()).to_string())
            .field("valid_time", &self.valid_time())
            .field("inline", &self.is_inline())
            .finish()
    }
}
