//! CID (Content Identifier) decoding.
//!
//! A binary CID is a varint version tag, a varint multicodec id and a
//! multihash (varint hash-function id, varint digest length, digest bytes).
//! Version 0 CIDs predate the self-describing layout: they are a bare 34-byte
//! sha2-256 multihash with an implicit `dag-pb` codec, and must be recognised
//! by shape before any varint parsing is attempted.

use std::str::FromStr;

use crate::base::{BaseDecodeError, MultibaseEncoding};
use crate::varint::{UnsignedVarint, VarintDecodeError};

/// Multicodec id for `dag-pb`, the implicit codec of every version 0 CID.
pub const DAG_PB: u64 = 0x70;

/// Multihash id for `sha2-256`, the implicit hash function of every version 0 CID.
pub const SHA2_256: u64 = 0x12;

/// Version 0 CIDs are a fixed shape: sha2-256 id, 32-byte digest length, digest.
const CID_V0_PREFIX: [u8; 2] = [0x12, 0x20];
const CID_V0_LEN: usize = 34;

/// Textual version 0 CIDs are bare base58btc, always 46 characters starting `Qm`.
const CID_V0_TEXT_LEN: usize = 46;
const CID_V0_TEXT_PREFIX: &str = "Qm";

/// CID version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    /// Legacy fixed-shape CIDs: bare sha2-256 multihash, implicit `dag-pb` codec
    V0,
    /// Self-describing CIDs: explicit version, codec and multihash fields
    V1,
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        match version {
            Version::V0 => 0,
            Version::V1 => 1,
        }
    }
}

/// The CID field being read when a decode error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CidField {
    Version,
    Codec,
    HashFunction,
    DigestLength,
    Digest,
}

/// A decoded CID (Content Identifier).
///
/// All fields are owned values; in particular the digest is copied out of the
/// input buffer during decode, so the buffer can be discarded or reused
/// afterwards. A `Cid` is never mutated after construction.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cid {
    version: Version,
    codec: u64,
    hash_code: u64,
    digest: Vec<u8>,
}

impl Cid {
    /// Creates a new version 1 CID from its structured fields.
    pub fn new_v1(codec: u64, hash_code: u64, digest: Vec<u8>) -> Self {
        Cid {
            version: Version::V1,
            codec,
            hash_code,
            digest,
        }
    }

    /// Returns the CID version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the multicodec id of the addressed content
    pub fn codec(&self) -> u64 {
        self.codec
    }

    /// Returns the multihash function id
    pub fn hash_function(&self) -> u64 {
        self.hash_code
    }

    /// Returns the digest length in bytes
    pub fn digest_len(&self) -> usize {
        self.digest.len()
    }

    /// Returns the digest bytes
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Creates a Cid from a hexadecimal rendering of its binary form
    pub fn from_hex(hex_str: &str) -> Result<Self, CidFormatError> {
        let bytes = hex::decode(hex_str)?;
        Cid::from_bytes(&bytes)
    }

    /// Returns the hexadecimal rendering of the binary form
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Converts the Cid into its binary form.
    ///
    /// Version 0 CIDs serialize as the bare multihash they came from; version
    /// 1 CIDs as version, codec and multihash varint fields.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        if self.version == Version::V1 {
            bytes.extend_from_slice(&UnsignedVarint(1).encode());
            bytes.extend_from_slice(&UnsignedVarint(self.codec).encode());
        }
        bytes.extend_from_slice(&UnsignedVarint(self.hash_code).encode());
        bytes.extend_from_slice(&UnsignedVarint(self.digest.len() as u64).encode());
        bytes.extend_from_slice(&self.digest);
        bytes
    }

    /// Tries to read a Cid from the start of the given bytes.
    ///
    /// This is the permissive form for callers embedding CIDs in a larger
    /// record: trailing bytes are left alone and the consumed length is
    /// returned so the caller can keep reading. Use [Cid::from_bytes] when
    /// the buffer must contain exactly one CID.
    ///
    /// ## Returns
    /// - `Ok((Cid, bytes_read))` on success.
    /// - `Err(CidFormatError)` identifying the offending field and offset.
    pub fn try_read_bytes(bytes: &[u8]) -> Result<(Self, usize), CidFormatError> {
        if bytes.is_empty() {
            return Err(CidFormatError::EmptyInput);
        }
        // Version 0: bare sha2-256 multihash, recognised by shape before any
        // varint parsing (it carries no version tag of its own).
        if bytes.starts_with(&CID_V0_PREFIX) {
            if bytes.len() < CID_V0_LEN {
                return Err(CidFormatError::Truncated {
                    field: CidField::Digest,
                    offset: CID_V0_PREFIX.len(),
                });
            }
            let cid = Cid {
                version: Version::V0,
                codec: DAG_PB,
                hash_code: SHA2_256,
                digest: bytes[CID_V0_PREFIX.len()..CID_V0_LEN].to_vec(),
            };
            return Ok((cid, CID_V0_LEN));
        }
        // Version 1: explicit varint fields
        let mut offset = 0;
        let version = read_varint_field(bytes, &mut offset, CidField::Version)?;
        if version != 1 {
            return Err(CidFormatError::UnsupportedVersion(version));
        }
        let codec = read_varint_field(bytes, &mut offset, CidField::Codec)?;
        let hash_code = read_varint_field(bytes, &mut offset, CidField::HashFunction)?;
        let digest_len = read_varint_field(bytes, &mut offset, CidField::DigestLength)?;
        if ((bytes.len() - offset) as u64) < digest_len {
            return Err(CidFormatError::Truncated {
                field: CidField::Digest,
                offset,
            });
        }
        let digest_len = digest_len as usize;
        let digest = bytes[offset..offset + digest_len].to_vec();
        offset += digest_len;
        let cid = Cid {
            version: Version::V1,
            codec,
            hash_code,
            digest,
        };
        Ok((cid, offset))
    }

    /// Decodes a Cid from bytes that must contain exactly one CID.
    ///
    /// ## Returns
    /// - `Ok(Cid)` on success.
    /// - `Err(CidFormatError::TrailingData)` if bytes remain after the digest.
    /// - Any error [Cid::try_read_bytes] reports.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CidFormatError> {
        let (cid, bytes_read) = Cid::try_read_bytes(bytes)?;
        if bytes_read != bytes.len() {
            return Err(CidFormatError::TrailingData(bytes.len() - bytes_read));
        }
        Ok(cid)
    }
}

/// Reads one varint field at `*offset`, advancing the offset and attaching
/// field context to any failure.
fn read_varint_field(
    bytes: &[u8],
    offset: &mut usize,
    field: CidField,
) -> Result<u64, CidFormatError> {
    match UnsignedVarint::decode(&bytes[*offset..]) {
        Ok((varint, bytes_read)) => {
            *offset += bytes_read;
            Ok(varint.0)
        }
        Err(VarintDecodeError::Truncated) => Err(CidFormatError::Truncated {
            field,
            offset: *offset,
        }),
        Err(VarintDecodeError::Overflow) => Err(CidFormatError::VarintOverflow {
            field,
            offset: *offset,
        }),
    }
}

impl FromStr for Cid {
    type Err = CidFormatError;

    /// Decodes a Cid from its textual form.
    ///
    /// The first character selects the multibase; the remainder is run
    /// through that base's byte decoder and the resulting bytes through
    /// [Cid::from_bytes]. Unprefixed text is accepted only in the legacy
    /// bare-base58 version 0 shape (`Qm...`, 46 characters).
    fn from_str(text: &str) -> Result<Self, CidFormatError> {
        let Some(first) = text.chars().next() else {
            return Err(CidFormatError::EmptyInput);
        };
        let (encoding, remainder) = MultibaseEncoding::classify(text);
        let bytes = match encoding {
            MultibaseEncoding::None => {
                if text.len() == CID_V0_TEXT_LEN && text.starts_with(CID_V0_TEXT_PREFIX) {
                    MultibaseEncoding::Base58Btc.decode(text)?
                } else {
                    return Err(CidFormatError::UnsupportedPrefix(first));
                }
            }
            MultibaseEncoding::Unsupported => {
                return Err(CidFormatError::UnsupportedPrefix(first));
            }
            encoding => encoding.decode(remainder)?,
        };
        Cid::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for Cid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cid({})", self.to_hex())
    }
}

impl std::fmt::Display for Cid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cid({})", self.to_hex())
    }
}

/// Errors related to CID decoding
#[derive(thiserror::Error, Debug)]
pub enum CidFormatError {
    /// Nothing to decode
    #[error("Empty input")]
    EmptyInput,

    /// The first character is not a multibase prefix with a decoder here
    #[error("Unsupported multibase prefix {0:?}")]
    UnsupportedPrefix(char),

    /// The per-base byte decoder rejected the text
    #[error("Invalid base encoding: {0}")]
    InvalidBaseEncoding(#[from] BaseDecodeError),

    /// Raw hexadecimal input could not be decoded
    #[error("Invalid hexadecimal input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A varint field did not terminate within the 9-byte cap
    #[error("Varint for {field:?} at offset {offset} does not terminate within the 9-byte cap")]
    VarintOverflow { field: CidField, offset: usize },

    /// Fewer bytes remain than the field declares needing
    #[error("Input truncated while reading {field:?} at offset {offset}")]
    Truncated { field: CidField, offset: usize },

    /// The decoded version is not a known CID version
    #[error("Unsupported CID version {0}")]
    UnsupportedVersion(u64),

    /// Bytes remain after a fully parsed CID
    #[error("{0} trailing byte(s) after a fully parsed CID")]
    TrailingData(usize),
}

#[cfg(test)]
mod tests {
    use super::{Cid, CidField, CidFormatError, DAG_PB, SHA2_256, Version};
    use quickcheck_macros::quickcheck;

    const CID_V1_BYTES: [u8; 36] = [
        1, 112, 18, 32, 44, 95, 104, 130, 98, 224, 236, 232, 86, 154, 166, 249, 77, 96, 170, 213,
        92, 168, 217, 216, 55, 52, 228, 167, 67, 13, 12, 255, 101, 136, 236, 43,
    ];

    #[test]
    fn test_cid_v0_parsing() {
        let cid_v0_bytes =
            hex::decode("12200E7071C59DF3B9454D1D18A15270AA36D54F89606A576DC621757AFD44AD1D2E")
                .unwrap();
        let (cid, bytes_read) = Cid::try_read_bytes(&cid_v0_bytes).unwrap();
        assert_eq!(bytes_read, 34);
        assert_eq!(cid.version(), Version::V0);
        assert_eq!(cid.codec(), DAG_PB);
        assert_eq!(cid.hash_function(), SHA2_256);
        assert_eq!(cid.digest_len(), 32);
        assert_eq!(cid.digest(), &cid_v0_bytes[2..34]);
        // The binary form of a v0 CID is the bare multihash it came from
        assert_eq!(cid.to_bytes(), cid_v0_bytes);
    }

    #[test]
    fn test_cid_v1_parsing() {
        let (cid, bytes_read) = Cid::try_read_bytes(&CID_V1_BYTES).unwrap();
        assert_eq!(bytes_read, CID_V1_BYTES.len());
        assert_eq!(cid.version(), Version::V1);
        assert_eq!(cid.codec(), DAG_PB);
        assert_eq!(cid.hash_function(), SHA2_256);
        assert_eq!(cid.digest_len(), 32);
        assert_eq!(cid.digest(), &CID_V1_BYTES[4..]);
    }

    #[test]
    fn test_cid_v1_round_trip() {
        let cid = Cid::new_v1(0x0129, 0xB220, vec![0xAB; 17]);
        let bytes = cid.to_bytes();
        let decoded = Cid::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, cid);
        assert_eq!(decoded.codec(), 0x0129);
        assert_eq!(decoded.hash_function(), 0xB220);
        assert_eq!(decoded.digest_len(), 17);
    }

    #[test]
    fn test_cid_empty_input() {
        assert!(matches!(
            Cid::from_bytes(&[]),
            Err(CidFormatError::EmptyInput)
        ));
    }

    #[test]
    fn test_cid_v0_truncated() {
        let result = Cid::try_read_bytes(&CID_V1_BYTES[2..12]);
        assert!(matches!(
            result,
            Err(CidFormatError::Truncated {
                field: CidField::Digest,
                offset: 2,
            })
        ));
    }

    #[test]
    fn test_cid_v1_truncated_digest() {
        // Digest declared as 32 bytes, one byte short: never a short digest
        let result = Cid::from_bytes(&CID_V1_BYTES[..35]);
        assert!(matches!(
            result,
            Err(CidFormatError::Truncated {
                field: CidField::Digest,
                offset: 4,
            })
        ));
    }

    #[test]
    fn test_cid_v1_truncated_varint_field() {
        // Codec varint with its continuation bit set and nothing after it
        let result = Cid::from_bytes(&[0x01, 0x80]);
        assert!(matches!(
            result,
            Err(CidFormatError::Truncated {
                field: CidField::Codec,
                offset: 1,
            })
        ));
    }

    #[test]
    fn test_cid_v1_varint_overflow() {
        // Codec varint still continuing after the 9-byte cap
        let mut bytes = vec![0x01];
        bytes.extend_from_slice(&[0xFF; 9]);
        let result = Cid::from_bytes(&bytes);
        assert!(matches!(
            result,
            Err(CidFormatError::VarintOverflow {
                field: CidField::Codec,
                offset: 1,
            })
        ));
    }

    #[test]
    fn test_cid_unsupported_version() {
        let result = Cid::from_bytes(&[0x02, 0x70, 0x12, 0x00]);
        assert!(matches!(result, Err(CidFormatError::UnsupportedVersion(2))));
        // An explicit version 0 tag is malformed as well: real v0 CIDs are
        // the fixed 0x12 0x20 shape and never carry a tag.
        let result = Cid::from_bytes(&[0x00, 0x70, 0x12, 0x00]);
        assert!(matches!(result, Err(CidFormatError::UnsupportedVersion(0))));
    }

    #[test]
    fn test_cid_trailing_data() {
        let mut bytes = CID_V1_BYTES.to_vec();
        bytes.push(0x42);
        assert!(matches!(
            Cid::from_bytes(&bytes),
            Err(CidFormatError::TrailingData(1))
        ));
        // The permissive form leaves the trailing byte to the caller
        let (cid, bytes_read) = Cid::try_read_bytes(&bytes).unwrap();
        assert_eq!(bytes_read, CID_V1_BYTES.len());
        assert_eq!(cid.digest_len(), 32);
    }

    #[test]
    fn test_cid_v0_trailing_data() {
        let mut bytes =
            hex::decode("12200E7071C59DF3B9454D1D18A15270AA36D54F89606A576DC621757AFD44AD1D2E")
                .unwrap();
        bytes.push(0x00);
        assert!(matches!(
            Cid::from_bytes(&bytes),
            Err(CidFormatError::TrailingData(1))
        ));
    }

    #[test]
    fn test_cid_zero_length_digest() {
        // An identity-style CID with an empty digest is structurally valid
        let cid = Cid::from_bytes(&[0x01, 0x55, 0x00, 0x00]).unwrap();
        assert_eq!(cid.codec(), 0x55);
        assert_eq!(cid.hash_function(), 0x00);
        assert_eq!(cid.digest_len(), 0);
    }

    #[test]
    fn test_cid_from_hex() {
        let cid =
            Cid::from_hex("017012202c5f688262e0ece8569aa6f94d60aad55ca8d9d83734e4a7430d0cff6588ec2b")
                .unwrap();
        assert_eq!(cid.to_bytes(), CID_V1_BYTES);
        assert_eq!(
            cid.to_hex(),
            "017012202c5f688262e0ece8569aa6f94d60aad55ca8d9d83734e4a7430d0cff6588ec2b"
        );
        assert!(matches!(
            Cid::from_hex("01701220zz"),
            Err(CidFormatError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_cid_from_text_base16() {
        let cid: Cid = "f017012202c5f688262e0ece8569aa6f94d60aad55ca8d9d83734e4a7430d0cff6588ec2b"
            .parse()
            .unwrap();
        assert_eq!(cid, Cid::from_bytes(&CID_V1_BYTES).unwrap());
    }

    #[test]
    fn test_cid_from_text_base32() {
        let cid: Cid = "bafybeibml5uieyxa5tufngvg7fgwbkwvlsuntwbxgtskoqynbt7wlchmfm"
            .parse()
            .unwrap();
        assert_eq!(cid, Cid::from_bytes(&CID_V1_BYTES).unwrap());
    }

    #[test]
    fn test_cid_from_text_base58() {
        let cid: Cid = "zdj7WYR7PzjmRQNRsMKuFipiE73MhMGgRbc5hTUaQVPJiMdKx"
            .parse()
            .unwrap();
        assert_eq!(cid, Cid::from_bytes(&CID_V1_BYTES).unwrap());
    }

    #[test]
    fn test_cid_from_text_legacy_v0() {
        let cid: Cid = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"
            .parse()
            .unwrap();
        assert_eq!(cid.version(), Version::V0);
        assert_eq!(cid.codec(), DAG_PB);
        assert_eq!(cid.hash_function(), SHA2_256);
        assert_eq!(
            hex::encode(cid.digest()),
            "9d6c2be50f706953479ab9df2ce3edca90b68053c00b3004b7f0accbe1e8eedf"
        );
    }

    #[test]
    fn test_cid_from_text_round_trips_encoder_output() {
        for base in [
            multibase::Base::Base16Upper,
            multibase::Base::Base32Upper,
            multibase::Base::Base58Btc,
            multibase::Base::Base64,
            multibase::Base::Base64Url,
            multibase::Base::Base64UrlPad,
        ] {
            let text = multibase::encode(base, CID_V1_BYTES);
            let cid: Cid = text.parse().unwrap();
            assert_eq!(cid.to_bytes(), CID_V1_BYTES);
        }
    }

    #[test]
    fn test_cid_from_text_unsupported_prefix() {
        // base36 is a registered multibase code without a decoder here
        let result = "kab1276j4mzv".parse::<Cid>();
        assert!(matches!(
            result,
            Err(CidFormatError::UnsupportedPrefix('k'))
        ));
        // Not a multibase code at all, and not the legacy Qm shape either
        let result = "Gm-not-a-cid".parse::<Cid>();
        assert!(matches!(
            result,
            Err(CidFormatError::UnsupportedPrefix('G'))
        ));
    }

    #[test]
    fn test_cid_from_text_empty() {
        assert!(matches!(
            "".parse::<Cid>(),
            Err(CidFormatError::EmptyInput)
        ));
    }

    #[test]
    fn test_cid_from_text_invalid_base_encoding() {
        // 'l' is outside the base58btc alphabet
        let result = "zl111".parse::<Cid>();
        assert!(matches!(
            result,
            Err(CidFormatError::InvalidBaseEncoding(_))
        ));
        // Odd number of hex digits
        let result = "f0170122".parse::<Cid>();
        assert!(matches!(
            result,
            Err(CidFormatError::InvalidBaseEncoding(_))
        ));
    }

    #[test]
    fn test_cid_base58_noise_fails_without_panic() {
        // base58 of [0xDE, 0xAD, 0xBE, 0xEF]: decodes to bytes whose version
        // varint never terminates, which must surface as a typed error
        let text = multibase::encode(multibase::Base::Base58Btc, [0xDE, 0xAD, 0xBE, 0xEF]);
        let result = text.parse::<Cid>();
        assert!(matches!(
            result,
            Err(CidFormatError::Truncated {
                field: CidField::Version,
                offset: 0,
            })
        ));
    }

    #[quickcheck]
    fn prop_decode_arbitrary_bytes_never_panics(bytes: Vec<u8>) -> bool {
        // Byte noise must decode or fail with a typed error, never panic.
        // (No round-trip claim on success: a non-canonical varint decodes to
        // the same value as its minimal form but re-encodes shorter.)
        let _ = Cid::from_bytes(&bytes);
        let _ = Cid::try_read_bytes(&bytes);
        true
    }

    #[quickcheck]
    fn prop_v1_round_trip(codec: u64, hash_code: u64, digest: Vec<u8>) -> bool {
        let codec = codec >> 1;
        let hash_code = hash_code >> 1;
        let cid = Cid::new_v1(codec, hash_code, digest);
        match Cid::from_bytes(&cid.to_bytes()) {
            Ok(decoded) => decoded == cid,
            Err(_) => false,
        }
    }
}
