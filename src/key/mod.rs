//! # Key Codec
//!
//! Encoding and decoding of **internal keys**, the unit every sorted
//! structure of the engine actually stores and compares.
//!
//! ## Layouts
//!
//! ```text
//! InternalKey     := user_key[N] | tag[8]
//! MV InternalKey  := user_key[N] | tag[8] | valid_time[8]
//! tag             := fixed64((sequence << 8) | value_type)
//! ```
//!
//! All fixed-width fields use the little-endian `fixed64` encoding from
//! [`crate::encoding`]. The sequence number occupies the top 56 bits of
//! the tag and the [`ValueType`] the low 8 bits.
//!
//! ## On-disk contract
//!
//! The byte layout and the numeric values of [`ValueType`] are baked into
//! persisted data. Changing either after data exists corrupts the store.
//!
//! ## Borrowing
//!
//! [`ParsedInternalKey`] and [`ParsedMvInternalKey`] never own memory:
//! decoding returns views into the caller's buffer. The owning forms
//! live in [`internal_key`].

pub mod internal_key;

#[cfg(test)]
mod tests;

// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::fmt;

use crate::encoding::{self, FIXED64_SIZE};
use thiserror::Error;

pub use internal_key::{InternalKey, MvInternalKey};

// ------------------------------------------------------------------------------------------------
// Constants
// ------------------------------------------------------------------------------------------------

/// Monotonically increasing write-order identifier; higher is newer.
pub type SequenceNumber = u64;

/// Start of a version's validity interval in the multi-version format.
pub type ValidTime = u64;

/// Largest representable sequence number. The low 8 bits of the tag are
/// reserved for the value type.
pub const MAX_SEQUENCE_NUMBER: SequenceNumber = (1u64 << 56) - 1;

/// Sentinel meaning "valid since the beginning".
pub const MIN_VALID_TIME: ValidTime = 0;

/// Sentinel meaning "unbounded".
pub const MAX_VALID_TIME: ValidTime = u64::MAX;

/// Size of the packed `(sequence, type)` tag.
pub const TAG_SIZE: usize = FIXED64_SIZE;

/// Size of the multi-version suffix: tag plus valid time.
pub const MV_SUFFIX_SIZE: usize = TAG_SIZE + FIXED64_SIZE;

// ------------------------------------------------------------------------------------------------
// Value type
// ------------------------------------------------------------------------------------------------

/// Marks whether an internal key carries a live value or a deletion.
///
/// DO NOT renumber: the discriminants are stored on disk.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// Tombstone.
    Deletion = 0x0,
    /// Live value.
    Value = 0x1,
}

/// The value type to use when building a key for seeking to a given
/// sequence number.
///
/// Sequence numbers sort in decreasing order and the type is the low
/// byte of the tag, so the highest-numbered type produces the smallest
/// key for a `(user_key, sequence)` pair.
pub const VALUE_TYPE_FOR_SEEK: ValueType = ValueType::Value;

impl ValueType {
    /// Converts a raw type byte, rejecting anything outside the defined range.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x0 => Some(ValueType::Deletion),
            0x1 => Some(ValueType::Value),
            _ => None,
        }
    }

    /// The on-disk byte for this type.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

// ------------------------------------------------------------------------------------------------
// Error type
// ------------------------------------------------------------------------------------------------

/// Errors produced when decoding internal keys.
///
/// A decode failure on bytes read from a backing store means the store is
/// corrupt; callers should escalate rather than retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Input shorter than the fixed suffix (8 bytes, or 16 for MV keys).
    #[error("internal key too short (need {needed} bytes, have {available})")]
    TooShort {
        /// Minimum length for this key flavour.
        needed: usize,
        /// Actual input length.
        available: usize,
    },

    /// The tag's type byte is not a known [`ValueType`].
    #[error("invalid value type: 0x{0:02X}")]
    InvalidType(u8),

    /// An owning key was given an empty buffer.
    #[error("empty key buffer")]
    Empty,
}

// ------------------------------------------------------------------------------------------------
// Parsed keys
// ------------------------------------------------------------------------------------------------

/// Decoded view of an internal key. Borrows the user key bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedInternalKey<'a> {
    /// The caller-visible key.
    pub user_key: &'a [u8],
    /// Write-order identifier.
    pub sequence: SequenceNumber,
    /// Live value or tombstone.
    pub value_type: ValueType,
}

impl<'a> ParsedInternalKey<'a> {
    /// Groups the three fields of a standard internal key.
    pub fn new(user_key: &'a [u8], sequence: SequenceNumber, value_type: ValueType) -> Self {
        Self {
            user_key,
            sequence,
            value_type,
        }
    }
}

/// Decoded view of a multi-version internal key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedMvInternalKey<'a> {
    /// The caller-visible key.
    pub user_key: &'a [u8],
    /// Write-order identifier.
    pub sequence: SequenceNumber,
    /// Live value or tombstone.
    pub value_type: ValueType,
    /// Start of the validity interval.
    pub valid_time: ValidTime,
}

impl<'a> ParsedMvInternalKey<'a> {
    /// Groups the fields of a multi-version internal key.
    pub fn new(
        user_key: &'a [u8],
        sequence: SequenceNumber,
        value_type: ValueType,
        valid_time: ValidTime,
    ) -> Self {
        Self {
            user_key,
            sequence,
            value_type,
            valid_time,
        }
    }
}

impl fmt::Display for ParsedInternalKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' @ {} : {}",
            HexKey(self.user_key),
            self.sequence,
            self.value_type.as_u8()
        )
    }
}

impl fmt::Display for ParsedMvInternalKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' @ {} : {} valid_from {}",
            HexKey(self.user_key),
            self.sequence,
            self.value_type.as_u8(),
            self.valid_time
        )
    }
}

// ------------------------------------------------------------------------------------------------
// Encoding
// ------------------------------------------------------------------------------------------------

/// Packs a sequence number and type into a tag.
#[inline]
pub fn pack_sequence_and_type(sequence: SequenceNumber, value_type: ValueType) -> u64 {
    debug_assert!(sequence <= MAX_SEQUENCE_NUMBER);
    (sequence << 8) | u64::from(value_type.as_u8())
}

/// Splits a tag into `(sequence, raw type byte)`.
#[inline]
fn unpack_tag(tag: u64) -> (SequenceNumber, u8) {
    (tag >> 8, (tag & 0xff) as u8)
}

/// Length of the encoding of `key`.
#[inline]
pub fn internal_key_encoding_length(key: &ParsedInternalKey<'_>) -> usize {
    key.user_key.len() + TAG_SIZE
}

/// Length of the multi-version encoding of `key`.
#[inline]
pub fn mv_internal_key_encoding_length(key: &ParsedMvInternalKey<'_>) -> usize {
    key.user_key.len() + MV_SUFFIX_SIZE
}

/// Appends the serialization of `key` to `result`.
pub fn append_internal_key(result: &mut Vec<u8>, key: &ParsedInternalKey<'_>) {
    result.reserve(internal_key_encoding_length(key));
    result.extend_from_slice(key.user_key);
    encoding::encode_fixed64(pack_sequence_and_type(key.sequence, key.value_type), result);
}

/// Appends the multi-version serialization of `key` to `result`.
pub fn append_mv_internal_key(result: &mut Vec<u8>, key: &ParsedMvInternalKey<'_>) {
    result.reserve(mv_internal_key_encoding_length(key));
    result.extend_from_slice(key.user_key);
    encoding::encode_fixed64(pack_sequence_and_type(key.sequence, key.value_type), result);
    encoding::encode_fixed64(key.valid_time, result);
}

// ------------------------------------------------------------------------------------------------
// Decoding
// ------------------------------------------------------------------------------------------------

/// Parses an internal key. The returned user key borrows `internal_key`.
pub fn parse_internal_key(internal_key: &[u8]) -> Result<ParsedInternalKey<'_>, KeyError> {
    let n = internal_key.len();
    let too_short = || KeyError::TooShort {
        needed: TAG_SIZE,
        available: n,
    };
    if n < TAG_SIZE {
        return Err(too_short());
    }
    let tag = encoding::decode_fixed64(&internal_key[n - TAG_SIZE..])
        .map_err(|_| too_short())?;
    let (sequence, raw_type) = unpack_tag(tag);
    let value_type = ValueType::from_u8(raw_type).ok_or(KeyError::InvalidType(raw_type))?;
    Ok(ParsedInternalKey {
        user_key: &internal_key[..n - TAG_SIZE],
        sequence,
        value_type,
    })
}

/// Parses a multi-version internal key.
pub fn parse_mv_internal_key(mv_internal_key: &[u8]) -> Result<ParsedMvInternalKey<'_>, KeyError> {
    let n = mv_internal_key.len();
    let too_short = || KeyError::TooShort {
        needed: MV_SUFFIX_SIZE,
        available: n,
    };
    if n < MV_SUFFIX_SIZE {
        return Err(too_short());
    }
    let suffix = &mv_internal_key[n - MV_SUFFIX_SIZE..];
    let tag = encoding::decode_fixed64(suffix).map_err(|_| too_short())?;
    let valid_time = encoding::decode_fixed64(&suffix[TAG_SIZE..])
        .map_err(|_| too_short())?;
    let (sequence, raw_type) = unpack_tag(tag);
    let value_type = ValueType::from_u8(raw_type).ok_or(KeyError::InvalidType(raw_type))?;
    Ok(ParsedMvInternalKey {
        user_key: &mv_internal_key[..n - MV_SUFFIX_SIZE],
        sequence,
        value_type,
        valid_time,
    })
}

/// Returns the user key portion of an internal key.
///
/// No validation: the caller must already know `internal_key` is well formed.
#[inline]
pub fn extract_user_key(internal_key: &[u8]) -> &[u8] {
    debug_assert!(internal_key.len() >= TAG_SIZE);
    &internal_key[..internal_key.len() - TAG_SIZE]
}

/// Returns the user key portion of a multi-version internal key.
#[inline]
pub fn extract_mv_user_key(mv_internal_key: &[u8]) -> &[u8] {
    debug_assert!(mv_internal_key.len() >= MV_SUFFIX_SIZE);
    &mv_internal_key[..mv_internal_key.len() - MV_SUFFIX_SIZE]
}

/// Returns the valid time of a multi-version internal key.
#[inline]
pub fn extract_valid_time(mv_internal_key: &[u8]) -> ValidTime {
    debug_assert!(mv_internal_key.len() >= MV_SUFFIX_SIZE);
    let n = mv_internal_key.len();
    encoding::decode_fixed64(&mv_internal_key[n - FIXED64_SIZE..]).unwrap_or(MIN_VALID_TIME)
}

// ------------------------------------------------------------------------------------------------
// Key formats
// ------------------------------------------------------------------------------------------------

/// Which internal key layout a sorted structure holds.
///
/// Selected once when a comparator or filter adapter is built and never
/// changed for the lifetime of the data ordered by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFormat {
    /// `user_key | tag`
    #[default]
    Standard,
    /// `user_key | tag | valid_time`
    MultiVersion,
}

impl KeyFormat {
    /// Number of trailing bytes following the user key.
    #[inline]
    pub fn suffix_len(self) -> usize {
        match self {
            KeyFormat::Standard => TAG_SIZE,
            KeyFormat::MultiVersion => MV_SUFFIX_SIZE,
        }
    }

    /// Strips the suffix of this format. Same preconditions as
    /// [`extract_user_key`].
    #[inline]
    pub fn user_key(self, key: &[u8]) -> &[u8] {
        match self {
            KeyFormat::Standard => extract_user_key(key),
            KeyFormat::MultiVersion => extract_mv_user_key(key),
        }
    }

    /// Reads the packed tag of a well-formed key of this format.
    #[inline]
    pub(crate) fn tag(self, key: &[u8]) -> u64 {
        debug_assert!(key.len() >= self.suffix_len());
        let start = key.len() - self.suffix_len();
        encoding::decode_fixed64(&key[start..]).unwrap_or(0)
    }
}

// ------------------------------------------------------------------------------------------------
// Display helpers
// ------------------------------------------------------------------------------------------------

/// Hex rendering of a key for log output; long keys are truncated.
pub(crate) struct HexKey<'a>(pub(crate) &'a [u8]);

impl<'a> fmt::Display for HexKey<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() <= 32 {
            for byte in self.0 {
                write!(f, "{:02x}", byte)?;
            }
        } else {
            for byte in &self.0[..16] {
                write!(f, "{:02x}", byte)?;
            }
            write!(f, "...[{} bytes]", self.0.len())?;
        }
        Ok(())
    }
}
