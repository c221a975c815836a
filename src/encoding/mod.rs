//! Byte-stable integer primitives shared by every key layout in this crate.
//!
//! Only two encodings exist, and both are permanent parts of the on-disk
//! format: once data has been written with them they can never change.
//!
//! # Wire format
//!
//! | Encoding     | Layout                                                   |
//! |--------------|----------------------------------------------------------|
//! | `fixed64`    | 8 bytes, little-endian                                   |
//! | `varint32`   | 1–5 bytes, 7 payload bits per byte, high bit = "more"    |
//! | length-prefixed slice | `[varint32 len][bytes]`                         |
//!
//! Fixed-width integers are **little-endian**. Varints follow the usual
//! LEB128 scheme and are only used for the length prefix of memtable keys.
//!
//! # Zero-panic guarantee
//!
//! Decoders never index past the end of their input. Short or malformed
//! input is reported through [`EncodingError`].
//!
//! The `put_*` writers take a pre-sized `&mut [u8]` so that callers can
//! fill stack buffers without allocating; the `encode_*` writers append
//! to a `Vec<u8>`.


use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// Constants
// ------------------------------------------------------------------------------------------------

/// Size in bytes of a `fixed64` value.
pub const FIXED64_SIZE: usize = std::mem::size_of::<u64>();

/// Maximum number of bytes a `varint32` can occupy.
pub const MAX_VARINT32_LEN: usize = 5;

const VARINT_CONTINUATION: u8 = 0x80;
const VARINT_PAYLOAD_MASK: u8 = 0x7F;

// ------------------------------------------------------------------------------------------------
// Error type
// ------------------------------------------------------------------------------------------------

/// Errors produced while decoding fixed or variable-length integers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// The buffer ran out of bytes before decoding completed.
    #[error("unexpected end of buffer (need {needed} bytes, have {available})")]
    UnexpectedEof {
        /// Bytes required to continue decoding.
        needed: usize,
        /// Bytes actually remaining.
        available: usize,
    },

    /// A varint did not terminate within [`MAX_VARINT32_LEN`] bytes or
    /// does not fit into 32 bits.
    #[error("varint32 overflow")]
    VarintOverflow,
}

// ------------------------------------------------------------------------------------------------
// Internal helpers
// ------------------------------------------------------------------------------------------------

/// Verify that `buf` has at least `needed` bytes.
#[inline]
fn require(buf: &[u8], needed: usize) -> Result<(), EncodingError> {
    if buf.len() < needed {
        Err(EncodingError::UnexpectedEof {
            needed,
            available: buf.len(),
        })
    } else {
        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// fixed64
// ------------------------------------------------------------------------------------------------

/// Write `value` into the first 8 bytes of `dst`.
///
/// `dst` must be at least [`FIXED64_SIZE`] bytes long.
#[inline]
pub fn put_fixed64(dst: &mut [u8], value: u64) {
    debug_assert!(dst.len() >= FIXED64_SIZE);
    dst[..FIXED64_SIZE].copy_from_slice(&value.to_le_bytes());
}

/// Append `value` as 8 little-endian bytes.
#[inline]
pub fn encode_fixed64(value: u64, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Decode a `fixed64` from the first 8 bytes of `buf`.
#[inline]
pub fn decode_fixed64(buf: &[u8]) -> Result<u64, EncodingError> {
    require(buf, FIXED64_SIZE)?;
    let mut bytes = [0u8; FIXED64_SIZE];
    bytes.copy_from_slice(&buf[..FIXED64_SIZE]);
    Ok(u64::from_le_bytes(bytes))
}

// ------------------------------------------------------------------------------------------------
// varint32
// ------------------------------------------------------------------------------------------------

/// Number of bytes [`put_varint32`] writes for `value`.
#[inline]
pub fn varint32_len(value: u32) -> usize {
    let mut v = value;
    let mut len = 1;
    while v >= u32::from(VARINT_CONTINUATION) {
        v >>= 7;
        len += 1;
    }
    len
}

/// Write `value` as a varint into the start of `dst`, returning the
/// number of bytes written.
///
/// `dst` must have room for [`varint32_len`]`(value)` bytes.
#[inline]
pub fn put_varint32(dst: &mut [u8], value: u32) -> usize {
    debug_assert!(dst.len() >= varint32_len(value));
    let mut v = value;
    let mut i = 0;
    while v >= u32::from(VARINT_CONTINUATION) {
        dst[i] = (v as u8 & VARINT_PAYLOAD_MASK) | VARINT_CONTINUATION;
        v >>= 7;
        i += 1;
    }
    dst[i] = v as u8;
    i + 1
}

/// Append `value` as a varint.
#[inline]
pub fn encode_varint32(value: u32, buf: &mut Vec<u8>) {
    let mut scratch = [0u8; MAX_VARINT32_LEN];
    let n = put_varint32(&mut scratch, value);
    buf.extend_from_slice(&scratch[..n]);
}

/// Decode a varint from the start of `buf`.
///
/// Returns `(value, bytes_consumed)`.
pub fn decode_varint32(buf: &[u8]) -> Result<(u32, usize), EncodingError> {
    let mut result: u32 = 0;
    for (i, &byte) in buf.iter().enumerate() {
        if i >= MAX_VARINT32_LEN {
            return Err(EncodingError::VarintOverflow);
        }
        let payload = u32::from(byte & VARINT_PAYLOAD_MASK);
        let shift = 7 * i as u32;
        // Fifth byte may only carry the top 4 bits.
        if i == MAX_VARINT32_LEN - 1 && payload > 0x0F {
            return Err(EncodingError::VarintOverflow);
        }
        result |= payload << shift;
        if byte & VARINT_CONTINUATION == 0 {
            return Ok((result, i + 1));
        }
    }
    Err(EncodingError::UnexpectedEof {
        needed: buf.len() + 1,
        available: buf.len(),
    })
}

// ------------------------------------------------------------------------------------------------
// Length-prefixed slices: [varint32 len][bytes]
// ------------------------------------------------------------------------------------------------

/// Append `data` prefixed with its varint32 length.
pub fn encode_length_prefixed_slice(data: &[u8], buf: &mut Vec<u8>) {
    debug_assert!(u32::try_from(data.len()).is_ok());
    encode_varint32(data.len() as u32, buf);
    buf.extend_from_slice(data);
}

/// Read a `[varint32 len][bytes]` slice from the start of `buf`.
///
/// Returns the borrowed payload and the total number of bytes consumed
/// (prefix included).
pub fn get_length_prefixed_slice(buf: &[u8]) -> Result<(&[u8], usize), EncodingError> {
    let (len, offset) = decode_varint32(buf)?;
    let len = len as usize;
    require(&buf[offset..], len)?;
    Ok((&buf[offset..offset + len], offset + len))
}
