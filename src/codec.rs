//! Conversion between UTF-8 text and field elements.
//!
//! Text is read as a big-endian unsigned integer over its UTF-8 bytes, so `"c"` becomes `99`
//! and `"ciaociao"` becomes `7163363813346599279`. The empty string maps to `0`.
//!
//! ```
//! use evoshare::{codec, M127};
//!
//! let secret = codec::encode("ciaociao", M127).unwrap();
//! assert_eq!(secret.to_string(), "7163363813346599279");
//! assert_eq!(codec::decode(&secret).unwrap(), "ciaociao");
//! ```
//!
//! [`decode`] failing is often the first sign that a recovery was fed too few shares, or
//! shares from another split. It is only a heuristic: an under-threshold recovery can just as
//! well land on bytes that happen to be valid UTF-8.

use alloc::string::String;

use num_bigint::BigUint;
use num_traits::Zero;

use super::error::Error;
use super::field;

/// Longest text, in bytes, guaranteed to fit below `2^exponent - 1`.
/// Longer texts may still fit, depending on their leading byte.
pub fn max_text_len(exponent: u32) -> usize {
    (exponent.saturating_sub(1) / 8) as usize
}

/// Encodes `text` as an element of the field `2^exponent - 1`.
///
/// Fails with [`Error::Unencodable`] when the text starts with a NUL byte, which the integer
/// form cannot preserve, and with [`Error::SecretOutOfRange`] when it does not fit the field.
pub fn encode(text: &str, exponent: u32) -> Result<BigUint, Error> {
    let bytes = text.as_bytes();
    if bytes.first() == Some(&0) {
        return Err(Error::Unencodable);
    }

    let value = BigUint::from_bytes_be(bytes);
    if value >= field::mersenne(exponent) {
        return Err(Error::SecretOutOfRange { exponent });
    }

    Ok(value)
}

/// Decodes a recovered field element back to text.
pub fn decode(value: &BigUint) -> Result<String, Error> {
    if value.is_zero() {
        return Ok(String::new());
    }

    let bytes = secret_bytes(value);
    core::str::from_utf8(&bytes)
        .map(String::from)
        .map_err(|_| Error::Decoding)
}

#[cfg(feature = "zeroize_memory")]
fn secret_bytes(value: &BigUint) -> zeroize::Zeroizing<alloc::vec::Vec<u8>> {
    zeroize::Zeroizing::new(value.to_bytes_be())
}

#[cfg(not(feature = "zeroize_memory"))]
fn secret_bytes(value: &BigUint) -> alloc::vec::Vec<u8> {
    value.to_bytes_be()
}
