//! Owning internal key values.
//!
//! Code that keeps internal keys around should hold them in these types
//! rather than in plain `Vec<u8>`, so that they are never accidentally
//! compared bytewise instead of through an
//! [`InternalKeyComparator`](crate::comparator::InternalKeyComparator).
//!
//! Each type is either **unset** (empty buffer) or holds a buffer at least
//! as long as its fixed suffix. Every well-formed encoding is at least
//! 8 bytes long, so emptiness is never a legitimate encoding; use
//! [`InternalKey::is_valid`] to check before calling `encode()`.

use std::fmt;

use super::{
    KeyError, MV_SUFFIX_SIZE, ParsedInternalKey, ParsedMvInternalKey, SequenceNumber, TAG_SIZE,
    ValidTime, ValueType, append_internal_key, append_mv_internal_key, extract_mv_user_key,
    extract_user_key, parse_internal_key, parse_mv_internal_key,
};

/// Copies `src` into `rep` if it is at least `min_len` bytes long,
/// otherwise leaves `rep` empty.
fn assign_checked(rep: &mut Vec<u8>, src: &[u8], min_len: usize) -> Result<(), KeyError> {
    rep.clear();
    if src.is_empty() {
        return Err(KeyError::Empty);
    }
    if src.len() < min_len {
        return Err(KeyError::TooShort {
            needed: min_len,
            available: src.len(),
        });
    }
    rep.extend_from_slice(src);
    Ok(())
}

// ------------------------------------------------------------------------------------------------
// InternalKey
// ------------------------------------------------------------------------------------------------

/// An owned `user_key | tag` encoding.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct InternalKey {
    rep: Vec<u8>,
}

impl InternalKey {
    /// Creates an unset key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `(user_key, sequence, value_type)`.
    pub fn new_with(user_key: &[u8], sequence: SequenceNumber, value_type: ValueType) -> Self {
        Self::from_parsed(&ParsedInternalKey::new(user_key, sequence, value_type))
    }

    /// Encodes an already-parsed key.
    pub fn from_parsed(parsed: &ParsedInternalKey<'_>) -> Self {
        let mut rep = Vec::new();
        append_internal_key(&mut rep, parsed);
        Self { rep }
    }

    /// Replaces the buffer with a copy of `encoded`.
    ///
    /// On error the key is left unset.
    pub fn decode_from(&mut self, encoded: &[u8]) -> Result<(), KeyError> {
        assign_checked(&mut self.rep, encoded, TAG_SIZE)
    }

    /// Replaces the buffer with a multi-version encoding stripped of its
    /// trailing valid time, i.e. copies all but the last 8 bytes.
    ///
    /// On error the key is left unset.
    pub fn decode_from_mv(&mut self, mv_encoded: &[u8]) -> Result<(), KeyError> {
        if mv_encoded.len() < MV_SUFFIX_SIZE {
            self.rep.clear();
            return Err(KeyError::TooShort {
                needed: MV_SUFFIX_SIZE,
                available: mv_encoded.len(),
            });
        }
        let legacy = &mv_encoded[..mv_encoded.len() - TAG_SIZE];
        assign_checked(&mut self.rep, legacy, TAG_SIZE)
    }

    /// Whether the key holds an encoding.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.rep.is_empty()
    }

    /// The encoded bytes. The key must be set.
    #[inline]
    pub fn encode(&self) -> &[u8] {
        debug_assert!(self.is_valid(), "encode() on an unset InternalKey");
        &self.rep
    }

    /// The user key portion.
    #[inline]
    pub fn user_key(&self) -> &[u8] {
        extract_user_key(&self.rep)
    }

    /// Decodes the held buffer.
    pub fn parsed(&self) -> Result<ParsedInternalKey<'_>, KeyError> {
        parse_internal_key(&self.rep)
    }

    /// Clears and re-encodes from `parsed`.
    pub fn set_from(&mut self, parsed: &ParsedInternalKey<'_>) {
        self.rep.clear();
        append_internal_key(&mut self.rep, parsed);
    }

    /// Resets to the unset state.
    pub fn clear(&mut self) {
        self.rep.clear();
    }
}

impl fmt::Debug for InternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "(unset)");
        }
        match parse_internal_key(&self.rep) {
            Ok(parsed) => write!(f, "{parsed}"),
            Err(_) => write!(f, "(bad){}", super::HexKey(&self.rep)),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// MvInternalKey
// ------------------------------------------------------------------------------------------------

/// An owned `user_key | tag | valid_time` encoding.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MvInternalKey {
    rep: Vec<u8>,
}

impl MvInternalKey {
    /// Creates an unset key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `(user_key, sequence, value_type, valid_time)`.
    pub fn new_with(
        user_key: &[u8],
        sequence: SequenceNumber,
        value_type: ValueType,
        valid_time: ValidTime,
    ) -> Self {
        Self::from_parsed(&ParsedMvInternalKey::new(
            user_key, sequence, value_type, valid_time,
        ))
    }

    /// Encodes an already-parsed multi-version key.
    pub fn from_parsed(parsed: &ParsedMvInternalKey<'_>) -> Self {
        let mut rep = Vec::new();
        append_mv_internal_key(&mut rep, parsed);
        Self { rep }
    }

    /// Replaces the buffer with a copy of `encoded`.
    ///
    /// On error the key is left unset.
    pub fn decode_from(&mut self, encoded: &[u8]) -> Result<(), KeyError> {
        assign_checked(&mut self.rep, encoded, MV_SUFFIX_SIZE)
    }

    /// Whether the key holds an encoding.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.rep.is_empty()
    }

    /// The encoded bytes. The key must be set.
    #[inline]
    pub fn encode(&self) -> &[u8] {
        debug_assert!(self.is_valid(), "encode() on an unset MvInternalKey");
        &self.rep
    }

    /// The user key portion, without tag or valid time.
    #[inline]
    pub fn user_key(&self) -> &[u8] {
        extract_mv_user_key(&self.rep)
    }

    /// Decodes the held buffer.
    pub fn parsed(&self) -> Result<ParsedMvInternalKey<'_>, KeyError> {
        parse_mv_internal_key(&self.rep)
    }

    /// Clears and re-encodes from `parsed`.
    pub fn set_from(&mut self, parsed: &ParsedMvInternalKey<'_>) {
        self.rep.clear();
        append_mv_internal_key(&mut self.rep, parsed);
    }

    /// Resets to the unset state.
    pub fn clear(&mut self) {
        self.rep.clear();
    }
}

impl fmt::Debug for MvInternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "(unset)");
        }
        match parse_mv_internal_key(&self.rep) {
            Ok(parsed) => write!(f, "{parsed}"),
            Err(_) => write!(f, "(bad){}", super::HexKey(&self.rep)),
        }
    }
}
