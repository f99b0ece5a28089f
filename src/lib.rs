//! [Shamir's Secret Sharing](https://en.wikipedia.org/wiki/Shamir%27s_Secret_Sharing) over
//! Mersenne prime fields, with batch and evolving share issuance.
//!
//! A secret is an integer below the field modulus `p = 2^EXP - 1`. It is placed as the constant
//! term of a random polynomial of degree `threshold - 1`; each share is that polynomial evaluated
//! at a participant identifier `x`. Any `threshold` shares recover the secret by Lagrange
//! interpolation at `x = 0`, while fewer reveal nothing about it.
//!
//! # Usage
//! ## Batch (std)
//!
//! ```
//! use evoshare::{ SecretSharing, Share };
//! use num_bigint::BigUint;
//!
//! // Set a minimum threshold of 3 shares over the field 2^127 - 1
//! let sss = SecretSharing::<127>::new(3).unwrap();
//! # #[cfg(feature = "std")]
//! # {
//! // Split the secret 99 into 8 shares
//! let shares = sss.split(&BigUint::from(99u32), 8).unwrap();
//! // Any 3 of them recover the original secret!
//! let secret = sss.recover(&shares[5..]).unwrap();
//! assert_eq!(secret, BigUint::from(99u32));
//! # }
//! ```
//!
//! ## Evolving (no std)
//!
//! The total number of participants does not have to be known upfront: a [`Dealer`] keeps the
//! polynomial and hands out one share per call.
//!
//! ```
//! use evoshare::{ SecretSharing, Share };
//! use num_bigint::BigUint;
//! use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//!
//! let sss = SecretSharing::<521>::new(3).unwrap();
//! let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
//! let mut dealer = sss.dealer_rng(&BigUint::from(99u32), &mut rng).unwrap();
//! // Welcome participants 1 to 4
//! let shares: Vec<Share> = dealer.by_ref().take(4).collect();
//! // Stop issuing: fails if fewer than 3 shares were handed out
//! assert_eq!(dealer.finish(), Ok(4));
//! let secret = sss.recover(&shares[1..]).unwrap();
//! assert_eq!(secret, BigUint::from(99u32));
//! ```
//!
//! # Fields
//!
//! The field is chosen at the type level by its Mersenne exponent. Every exponent in
//! [`MERSENNE_EXPONENTS`] is supported; [`M127`] (about 128-bit security) and [`M521`] are the
//! usual choices. Text secrets can be mapped to field elements with the [`codec`] module.
//!
//! # Feature flags
//!
//! - `std`: enables `split` and `dealer` conveniences (use `rand::thread_rng`). Without `std`,
//!   use `split_rng` and `dealer_rng`.
//! - `zeroize_memory`: wipes shares and dealer polynomials from memory on drop.
//! - `fuzzing`: derives `arbitrary::Arbitrary` for [`Share`].
//! - `cli`: builds the `evoshare` command-line tool.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod codec;
mod dealer;
mod error;
mod field;
mod math;
mod share;

extern crate alloc;

use alloc::vec::Vec;
use hashbrown::HashSet;
use num_bigint::{BigInt, BigUint};
use rand::{CryptoRng, Rng};

pub use dealer::Dealer;
pub use error::Error;
pub use field::{MERSENNE_EXPONENTS, M127, M521};
pub use share::Share;

/// Implements methods to generate shares and recover secrets over the prime field `2^EXP - 1`.
/// Its only parameter is the minimum shares threshold.
///
/// Usage example:
/// ```
/// # use evoshare::{ SecretSharing, Share };
/// # use num_bigint::BigUint;
/// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
/// // Set a minimum threshold of 10 shares
/// let sss = SecretSharing::<127>::new(10).unwrap();
/// // Split the secret 1234 into 12 shares
/// let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
/// let shares = sss.split_rng(&BigUint::from(1234u32), 12, &mut rng).unwrap();
/// // Recover the original secret!
/// let secret = sss.recover(&shares[..10]).unwrap();
/// assert_eq!(secret, BigUint::from(1234u32));
/// ```
#[derive(Clone, Debug)]
pub struct SecretSharing<const EXP: u32> {
    threshold: usize,
    prime: BigUint,
}

impl<const EXP: u32> SecretSharing<EXP> {
    /// Creates a scheme with the given threshold.
    ///
    /// Fails with [`Error::UnsupportedField`] when `2^EXP - 1` is not listed in
    /// [`MERSENNE_EXPONENTS`], and with [`Error::ThresholdTooSmall`] when `threshold < 2`.
    pub fn new(threshold: usize) -> Result<Self, Error> {
        if !field::is_mersenne_exponent(EXP) {
            return Err(Error::UnsupportedField(EXP));
        }
        if threshold < 2 {
            return Err(Error::ThresholdTooSmall { threshold });
        }

        Ok(SecretSharing {
            threshold,
            prime: field::mersenne(EXP),
        })
    }

    /// Minimum number of shares needed to recover a secret.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// The field modulus `2^EXP - 1`.
    pub fn modulus(&self) -> &BigUint {
        &self.prime
    }

    /// This method is useful when `std` is not available. For typical usage
    /// see the `split` method.
    ///
    /// Splits `secret` into `n` shares at `x = 1..=n`, any `threshold` of which recover it.
    /// All parameters are checked before any randomness is drawn from `rng`: `n` must be at
    /// least the threshold and below the modulus, and `secret` must be a field element.
    ///
    /// Example:
    /// ```
    /// # use evoshare::{ SecretSharing, Share, Error };
    /// # use num_bigint::BigUint;
    /// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    /// # let sss = SecretSharing::<127>::new(3).unwrap();
    /// let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
    /// let shares = sss.split_rng(&BigUint::from(7u32), 5, &mut rng).unwrap();
    /// assert_eq!(shares.iter().map(|s| s.x).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    /// // Fewer shares than the threshold would lose the secret forever
    /// let err = sss.split_rng(&BigUint::from(7u32), 2, &mut rng).unwrap_err();
    /// assert!(err.is_configuration());
    /// ```
    pub fn split_rng<R: Rng + CryptoRng>(
        &self,
        secret: &BigUint,
        n: u64,
        rng: &mut R,
    ) -> Result<Vec<Share>, Error> {
        if (self.threshold as u64) > n {
            return Err(Error::ThresholdExceedsShares {
                threshold: self.threshold,
                shares: n,
            });
        }
        if BigUint::from(n) >= self.prime {
            return Err(Error::TooManyShares {
                shares: n,
                exponent: EXP,
            });
        }

        let dealer = self.dealer_rng(secret, rng)?;
        Ok(dealer.take(n as usize).collect())
    }

    /// Splits `secret` into `n` shares using the thread-local CSPRNG. See [`split_rng`](Self::split_rng).
    #[cfg(feature = "std")]
    pub fn split(&self, secret: &BigUint, n: u64) -> Result<Vec<Share>, Error> {
        let mut rng = rand::thread_rng();
        self.split_rng(secret, n, &mut rng)
    }

    /// This method is useful when `std` is not available. For typical usage
    /// see the `dealer` method.
    ///
    /// Opens an evolving issuance session for `secret`. The polynomial is drawn from `rng`
    /// here, once; the returned [`Dealer`] issues shares at `x = 1, 2, ...` on demand.
    pub fn dealer_rng<R: Rng + CryptoRng>(
        &self,
        secret: &BigUint,
        rng: &mut R,
    ) -> Result<Dealer, Error> {
        if secret >= &self.prime {
            return Err(Error::SecretOutOfRange { exponent: EXP });
        }

        let poly = math::random_polynomial(secret, self.threshold, &self.prime, rng);
        Ok(Dealer::new(poly, self.prime.clone()))
    }

    /// Opens an evolving issuance session using the thread-local CSPRNG. See [`dealer_rng`](Self::dealer_rng).
    #[cfg(feature = "std")]
    pub fn dealer(&self, secret: &BigUint) -> Result<Dealer, Error> {
        let mut rng = rand::thread_rng();
        self.dealer_rng(secret, &mut rng)
    }

    /// Given an iterable collection of shares, recovers the original secret.
    ///
    /// At least 2 shares with distinct, non-zero identifiers below the modulus are required,
    /// otherwise an `Err` is returned. The result equals the secret only when at least
    /// `threshold` shares of the same split are supplied; with fewer, an unrelated field
    /// element comes back and no error is raised, since nothing in the shares tells the two
    /// cases apart.
    ///
    /// Example:
    /// ```
    /// # use evoshare::{ SecretSharing, Share, Error };
    /// # use num_bigint::BigUint;
    /// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    /// # let sss = SecretSharing::<127>::new(3).unwrap();
    /// # let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
    /// let mut shares = sss.split_rng(&BigUint::from(1u32), 3, &mut rng).unwrap();
    /// // Recover original secret from shares
    /// let mut secret = sss.recover(&shares);
    /// // Secret correctly recovered
    /// assert_eq!(secret, Ok(BigUint::from(1u32)));
    /// // Remove shares for demonstration purposes
    /// shares.truncate(1);
    /// secret = sss.recover(&shares);
    /// // Not enough shares to recover secret
    /// assert_eq!(secret, Err(Error::InsufficientShares { required: 2, got: 1 }));
    /// ```
    pub fn recover<'a, T>(&self, shares: T) -> Result<BigUint, Error>
    where
        T: IntoIterator<Item = &'a Share>,
    {
        let points = self.points(shares, 2)?;
        Ok(math::interpolate(
            &BigInt::from(0),
            &points,
            &BigInt::from(self.prime.clone()),
        ))
    }

    /// Given at least `threshold` shares, recomputes the share of the participant at `x`.
    ///
    /// Useful to replace a lost share, or to extend a batch split with new participants,
    /// without ever reconstructing the secret in the clear.
    ///
    /// Example:
    /// ```
    /// # use evoshare::{ SecretSharing, Share };
    /// # use num_bigint::BigUint;
    /// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    /// # let sss = SecretSharing::<127>::new(2).unwrap();
    /// # let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
    /// let shares = sss.split_rng(&BigUint::from(5u32), 3, &mut rng).unwrap();
    /// // Participant 2 lost their share
    /// let restored = sss.reshare([&shares[0], &shares[2]], 2).unwrap();
    /// assert_eq!(restored, shares[1]);
    /// ```
    pub fn reshare<'a, T>(&self, shares: T, x: u64) -> Result<Share, Error>
    where
        T: IntoIterator<Item = &'a Share>,
    {
        if !self.is_identifier(x) {
            return Err(Error::InvalidShare(x));
        }

        let points = self.points(shares, self.threshold)?;
        let y = math::interpolate(
            &BigInt::from(x),
            &points,
            &BigInt::from(self.prime.clone()),
        );

        Ok(Share { x, y })
    }

    fn is_identifier(&self, x: u64) -> bool {
        x != 0 && BigUint::from(x) < self.prime
    }

    // Validates a share set and lifts it to signed coordinates for interpolation.
    fn points<'a, T>(&self, shares: T, required: usize) -> Result<Vec<(BigInt, BigInt)>, Error>
    where
        T: IntoIterator<Item = &'a Share>,
    {
        let mut keys: HashSet<u64> = HashSet::new();
        let mut points = Vec::new();

        for share in shares {
            if !self.is_identifier(share.x) {
                return Err(Error::InvalidShare(share.x));
            }
            if !keys.insert(share.x) {
                return Err(Error::DuplicateShare(share.x));
            }
            points.push((BigInt::from(share.x), BigInt::from(share.y.clone())));
        }

        if points.len() < required {
            Err(Error::InsufficientShares {
                required,
                got: points.len(),
            })
        } else {
            Ok(points)
        }
    }
}
