//! CIDs make use of variable-length integers (varints) for every self-describing
//! field they carry: the version tag, the multicodec id and both multihash fields.
//!
//! This module provides utilities for decoding (and, for round trips, encoding)
//! unsigned varints following the [LEB128 encoding scheme](https://en.wikipedia.org/wiki/LEB128),
//! as specified by [multiformats/unsigned-varint](https://github.com/multiformats/unsigned-varint).

/// Practical maximum number of bytes a varint may span.
///
/// 9 bytes of 7-bit groups cover 63 bits, the widest integer any CID field
/// needs. The multiformats spec leaves the theoretical length unbounded but
/// recommends this cap so that a hostile length field cannot make a decoder
/// scan forever.
pub const MAX_VARINT_BYTES: usize = 9;

/// Unsigned variable-length integer (varint) as used in CID fields.
///
/// This struct represents an unsigned varint, which can be encoded and decoded
/// using LEB128 encoding. To do so,
/// - Use `UnsignedVarint::encode()` to encode the varint into a vector of bytes.
/// - Use `UnsignedVarint::decode(bytes)` to decode a varint from a slice of bytes,
///   which returns the decoded varint and the number of bytes read.
///
/// ## Examples
/// ```
/// use skerry_cid::varint::UnsignedVarint;
///
/// let varint = UnsignedVarint(624485);
/// let encoded = varint.encode();
/// assert_eq!(encoded, vec![0xE5, 0x8E, 0x26]);
///
/// let (decoded, bytes_read) = UnsignedVarint::decode(&encoded).unwrap();
/// assert_eq!(decoded, UnsignedVarint(624485));
/// assert_eq!(bytes_read, encoded.len());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsignedVarint(
    /// The underlying unsigned integer value of the varint.
    pub u64,
);

impl UnsignedVarint {
    /// Encodes the UnsignedVarint into a vector of bytes using LEB128 encoding.
    pub fn encode(self) -> Vec<u8> {
        let mut value = self.0;
        let mut bytes = Vec::new();
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80; // Set continuation bit
            }
            bytes.push(byte);
            if value == 0 {
                break;
            }
        }
        bytes
    }

    /// Decodes an UnsignedVarint from a slice of bytes.
    ///
    /// At most [MAX_VARINT_BYTES] bytes are examined. Each byte contributes its
    /// low 7 bits, least-significant group first; the first byte with a clear
    /// high bit terminates the varint.
    ///
    /// ## Returns
    /// - `Ok((UnsignedVarint, bytes_read))` if decoding is successful, where
    ///   `bytes_read` is the number of bytes consumed (always ≥ 1).
    /// - `Err(VarintDecodeError::Truncated)` if the input ends before a
    ///   terminating byte was seen (this includes empty input).
    /// - `Err(VarintDecodeError::Overflow)` if the continuation bit is still
    ///   set after [MAX_VARINT_BYTES] bytes.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), VarintDecodeError> {
        let mut result = 0u64;
        for (i, &byte) in bytes.iter().take(MAX_VARINT_BYTES).enumerate() {
            let group = (byte & 0x7F) as u64;
            result |= group << (7 * i);
            if (byte & 0x80) == 0 {
                return Ok((UnsignedVarint(result), i + 1));
            }
        }
        if bytes.len() >= MAX_VARINT_BYTES {
            Err(VarintDecodeError::Overflow)
        } else {
            Err(VarintDecodeError::Truncated)
        }
    }
}

impl From<u64> for UnsignedVarint {
    fn from(value: u64) -> Self {
        UnsignedVarint(value)
    }
}

impl From<UnsignedVarint> for u64 {
    fn from(varint: UnsignedVarint) -> Self {
        varint.0
    }
}

/// Errors related to varint decoding
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintDecodeError {
    /// The input ended before a byte with a clear continuation bit was seen
    #[error("Input ended before the varint terminated")]
    Truncated,

    /// The continuation bit was still set after the 9-byte cap
    #[error("Varint does not terminate within the 9-byte cap")]
    Overflow,
}
