//! skerry-cid is a Rust library for decoding CIDs (Content Identifiers), the
//! self-describing identifiers used by content-addressed storage systems to
//! name immutable data.
//!
//! A CID bundles a version tag, a multicodec content-type id and a multihash
//! (hash-function id, digest length, digest bytes) into one binary value,
//! optionally wrapped in a one-character multibase prefix when rendered as
//! text. Every field is a variable-length self-describing integer, so this
//! library treats all input as untrusted: each field is bounds-checked,
//! varints are capped at 9 bytes, and any inconsistency surfaces as a typed
//! error rather than a truncated or padded value.
//!
//! The library is sans-io and stateless: every entry point is a pure function
//! over a byte slice or string slice, safe to call concurrently on
//! independent inputs. Turning base-encoded text into bytes is delegated to
//! the `multibase` crate; everything structural is implemented here.
//!
//! ## Usages
//!
//! ### Decode a binary CID and inspect its fields
//! ```rust
//! let bytes =
//!     hex::decode("017012202c5f688262e0ece8569aa6f94d60aad55ca8d9d83734e4a7430d0cff6588ec2b")
//!         .unwrap();
//!
//! let cid = skerry_cid::Cid::from_bytes(&bytes).unwrap();
//! assert_eq!(cid.version(), skerry_cid::Version::V1);
//! assert_eq!(cid.codec(), 0x70); // dag-pb
//! assert_eq!(cid.hash_function(), 0x12); // sha2-256
//! assert_eq!(cid.digest_len(), 32);
//! ```
//!
//! ### Decode a textual CID, multibase prefix and all
//! ```rust
//! use skerry_cid::{Cid, MultibaseEncoding};
//!
//! // 'f' announces lowercase hexadecimal
//! let text = "f017012202c5f688262e0ece8569aa6f94d60aad55ca8d9d83734e4a7430d0cff6588ec2b";
//! let (encoding, _remainder) = MultibaseEncoding::classify(text);
//! assert_eq!(encoding, MultibaseEncoding::Base16);
//!
//! let cid: Cid = text.parse().unwrap();
//! assert_eq!(cid.to_hex(), &text[1..]);
//! ```

pub mod base;
pub mod cid;
pub mod varint;

pub use base::{BaseDecodeError, MultibaseEncoding};
pub use cid::{Cid, CidField, CidFormatError, Version};
pub use varint::{UnsignedVarint, VarintDecodeError};
