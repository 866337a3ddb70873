//! Multibase prefix detection for textual CIDs.
//!
//! A textual CID announces the base it was rendered in with a single leading
//! character (the [multibase](https://github.com/multiformats/multibase)
//! code). This module classifies that character into a closed set of
//! supported encodings and hands the remaining text to the per-base byte
//! decoder. The byte decoders themselves live in the [multibase crate](https://crates.io/crates/multibase);
//! this module only owns the classification and the dispatch.

use multibase::Base;

/// Multibase registry codes that are recognised prefix slots but have no
/// byte decoder here (base2, base8, base36, padded base32 variants, ...).
/// A CID starting with one of these is refused rather than guessed at.
const UNSUPPORTED_PREFIXES: [char; 16] = [
    '0', '1', '7', '9', 'v', 'V', 't', 'T', 'c', 'C', 'h', 'k', 'K', 'Z', 'M', 'p',
];

/// The type of multibase encoding announced by a textual CID.
///
/// Every supported variant maps 1:1 to a single-character prefix code and to
/// a byte decoder owned by the `multibase` crate. The two remaining variants
/// carry the classification outcome for text that has no usable prefix:
/// [MultibaseEncoding::None] for input with no multibase code at all, and
/// [MultibaseEncoding::Unsupported] for a recognised code with no decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultibaseEncoding {
    /// No base encoding; the bytes were supplied directly
    None,
    /// Unsupported base encoding
    Unsupported,
    /// Hexadecimal (lowercase), prefix `f`
    Base16,
    /// Hexadecimal (uppercase), prefix `F`
    Base16Upper,
    /// RFC4648 case-insensitive, no padding (lowercase), prefix `b`
    Base32,
    /// RFC4648 case-insensitive, no padding (uppercase), prefix `B`
    Base32Upper,
    /// Base58 Bitcoin alphabet, prefix `z`
    Base58Btc,
    /// RFC4648 no padding, prefix `m`
    Base64,
    /// RFC4648 URL-safe alphabet, no padding, prefix `u`
    Base64Url,
    /// RFC4648 URL-safe alphabet, with padding, prefix `U`
    Base64UrlPad,
}

impl MultibaseEncoding {
    /// Classifies a textual identifier by its first character.
    ///
    /// The matched prefix character is stripped from the returned remainder.
    /// For [MultibaseEncoding::None] (empty input, or a first character that
    /// is no multibase code at all) and [MultibaseEncoding::Unsupported]
    /// (a registry code with no decoder here) nothing is stripped and the
    /// remainder is the input unchanged.
    ///
    /// ## Examples
    /// ```
    /// use skerry_cid::MultibaseEncoding;
    ///
    /// assert_eq!(
    ///     MultibaseEncoding::classify("zQmT5NvUtoM"),
    ///     (MultibaseEncoding::Base58Btc, "QmT5NvUtoM"),
    /// );
    /// assert_eq!(MultibaseEncoding::classify(""), (MultibaseEncoding::None, ""));
    /// ```
    pub fn classify(text: &str) -> (MultibaseEncoding, &str) {
        let mut chars = text.chars();
        let Some(code) = chars.next() else {
            return (MultibaseEncoding::None, text);
        };
        let encoding = match code {
            'f' => MultibaseEncoding::Base16,
            'F' => MultibaseEncoding::Base16Upper,
            'b' => MultibaseEncoding::Base32,
            'B' => MultibaseEncoding::Base32Upper,
            'z' => MultibaseEncoding::Base58Btc,
            'm' => MultibaseEncoding::Base64,
            'u' => MultibaseEncoding::Base64Url,
            'U' => MultibaseEncoding::Base64UrlPad,
            c if UNSUPPORTED_PREFIXES.contains(&c) => {
                return (MultibaseEncoding::Unsupported, text);
            }
            _ => return (MultibaseEncoding::None, text),
        };
        (encoding, chars.as_str())
    }

    /// Returns the prefix character announcing this encoding, if it has one.
    pub fn prefix(self) -> Option<char> {
        self.base().map(|base| base.code())
    }

    /// Decodes prefix-free text through the byte decoder for this encoding.
    ///
    /// ## Returns
    /// - `Ok(bytes)` on success.
    /// - `Err(BaseDecodeError::InvalidEncoding)` if the text contains
    ///   characters outside the base's alphabet or invalid padding.
    /// - `Err(BaseDecodeError::NoDecoder)` for [MultibaseEncoding::None] and
    ///   [MultibaseEncoding::Unsupported], which have no byte decoder.
    pub fn decode(self, text: &str) -> Result<Vec<u8>, BaseDecodeError> {
        match self.base() {
            Some(base) => base
                .decode(text)
                .map_err(|err| BaseDecodeError::InvalidEncoding(self, err)),
            None => Err(BaseDecodeError::NoDecoder(self)),
        }
    }

    /// The byte decoder backing this encoding, if any.
    fn base(self) -> Option<Base> {
        match self {
            MultibaseEncoding::None | MultibaseEncoding::Unsupported => None,
            MultibaseEncoding::Base16 => Some(Base::Base16Lower),
            MultibaseEncoding::Base16Upper => Some(Base::Base16Upper),
            MultibaseEncoding::Base32 => Some(Base::Base32Lower),
            MultibaseEncoding::Base32Upper => Some(Base::Base32Upper),
            MultibaseEncoding::Base58Btc => Some(Base::Base58Btc),
            MultibaseEncoding::Base64 => Some(Base::Base64),
            MultibaseEncoding::Base64Url => Some(Base::Base64Url),
            MultibaseEncoding::Base64UrlPad => Some(Base::Base64UrlPad),
        }
    }
}

/// Errors related to per-base byte decoding
#[derive(thiserror::Error, Debug)]
pub enum BaseDecodeError {
    /// No byte decoder exists for this classification outcome
    #[error("No byte decoder for {0:?}")]
    NoDecoder(MultibaseEncoding),

    /// The base's decoder rejected the text
    #[error("Invalid {0:?} text: {1}")]
    InvalidEncoding(MultibaseEncoding, #[source] multibase::Error),
}
