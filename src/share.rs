use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use num_bigint::BigUint;

use super::error::Error;

#[cfg(feature = "fuzzing")]
use arbitrary::Arbitrary;

#[cfg(feature = "zeroize_memory")]
use zeroize::Zeroize;

/// Byte length of the serialized `x` coordinate.
const X_LEN: usize = 8;

/// A share used to reconstruct the secret: the point `(x, y)` on the secret-bearing polynomial.
/// Can be serialized to and from a byte array, or to and from text.
///
/// Usage example:
/// ```
/// use evoshare::{SecretSharing, Share};
/// use core::convert::TryFrom;
/// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
/// # use num_bigint::BigUint;
/// # fn send_to_printer(_: Vec<u8>) {}
///
/// let sss = SecretSharing::<127>::new(3).unwrap();
/// let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
/// let shares = sss.split_rng(&BigUint::from(42u32), 5, &mut rng).unwrap();
///
/// // Print paper keys
/// for s in &shares {
///     send_to_printer(Vec::from(s));
/// };
///
/// // Get share bytes back from the paper keys and recover the secret
/// let shares_bytes: Vec<Vec<u8>> = shares.iter().take(3).map(Vec::from).collect();
/// let shares: Vec<Share> = shares_bytes
///     .iter()
///     .map(|s| Share::try_from(s.as_slice()).unwrap())
///     .collect();
/// let secret = sss.recover(&shares).unwrap();
/// assert_eq!(secret, BigUint::from(42u32));
/// ```
///
/// # Serialization format:
/// - Bytes: `x` as 8 big-endian bytes followed by the big-endian bytes of `y`.
/// - Text: `(x, y)` with both coordinates in decimal. Parsing also accepts `x, y` and `x,y`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzzing", derive(Arbitrary))]
pub struct Share {
    /// The participant identifier, `x` coordinate of the point.
    pub x: u64,
    /// The polynomial evaluated at `x`.
    pub y: BigUint,
}

#[cfg(feature = "zeroize_memory")]
impl Zeroize for Share {
    fn zeroize(&mut self) {
        self.x.zeroize();
        super::field::wipe(&mut self.y);
    }
}

#[cfg(feature = "zeroize_memory")]
impl Drop for Share {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[cfg(feature = "zeroize_memory")]
impl zeroize::ZeroizeOnDrop for Share {}

/// Converts a Share to a vector of bytes: 8 bytes of `x` followed by the bytes of `y`.
impl From<&Share> for Vec<u8> {
    fn from(s: &Share) -> Vec<u8> {
        let y = s.y.to_bytes_be();
        let mut bytes = Vec::with_capacity(X_LEN + y.len());
        bytes.extend_from_slice(&s.x.to_be_bytes());
        bytes.extend_from_slice(&y);
        bytes
    }
}

impl core::convert::TryFrom<&[u8]> for Share {
    type Error = Error;

    fn try_from(s: &[u8]) -> Result<Share, Self::Error> {
        if s.len() <= X_LEN {
            return Err(Error::MalformedShare(
                "a share must be at least 9 bytes long",
            ));
        }

        let (x, y) = s.split_at(X_LEN);
        let mut x_bytes = [0u8; X_LEN];
        x_bytes.copy_from_slice(x);

        Ok(Share {
            x: u64::from_be_bytes(x_bytes),
            y: BigUint::from_bytes_be(y),
        })
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Share {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let inner = match s.strip_prefix('(') {
            Some(rest) => rest
                .strip_suffix(')')
                .ok_or(Error::MalformedShare("unbalanced parenthesis"))?,
            None => s,
        };

        let (x, y) = inner
            .split_once(',')
            .ok_or(Error::MalformedShare("expected `x, y`"))?;
        let x = x
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::MalformedShare("x is not an unsigned 64-bit integer"))?;
        let y = y
            .trim()
            .parse::<BigUint>()
            .map_err(|_| Error::MalformedShare("y is not an unsigned integer"))?;

        Ok(Share { x, y })
    }
}
