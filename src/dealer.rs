use alloc::vec::Vec;
use core::fmt;

use num_bigint::BigUint;

use super::error::Error;
use super::math;
use super::share::Share;

/// An evolving share issuance session.
///
/// Holds one secret-bearing polynomial, drawn when the session is opened, and a counter of
/// the shares handed out so far. Each call to [`issue_next`](Dealer::issue_next) evaluates the
/// same polynomial at the next identifier `x = issued + 1`; no further randomness is consumed,
/// and the total number of participants never has to be known in advance.
///
/// The polynomial never leaves the session. Dropping the `Dealer` discards it (and wipes it
/// with the `zeroize_memory` feature).
///
/// Usage example:
/// ```
/// # use evoshare::{SecretSharing, Share};
/// # use num_bigint::BigUint;
/// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
/// let sss = SecretSharing::<521>::new(3).unwrap();
/// let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
/// let mut dealer = sss.dealer_rng(&BigUint::from(99u32), &mut rng).unwrap();
///
/// // Participants show up one at a time
/// let first = dealer.issue_next().unwrap();
/// let second = dealer.issue_next().unwrap();
/// assert_eq!((first.x, second.x), (1, 2));
/// assert!(!dealer.is_recoverable());
///
/// // A `Dealer` is also an iterator over the remaining shares
/// let more: Vec<Share> = dealer.by_ref().take(3).collect();
/// assert_eq!(dealer.issued(), 5);
/// assert_eq!(dealer.finish(), Ok(5));
///
/// let secret = sss.recover([&first, &more[0], &more[2]]).unwrap();
/// assert_eq!(secret, BigUint::from(99u32));
/// ```
pub struct Dealer {
    coefficients: Vec<BigUint>,
    prime: BigUint,
    issued: u64,
}

impl Dealer {
    pub(crate) fn new(coefficients: Vec<BigUint>, prime: BigUint) -> Self {
        Dealer {
            coefficients,
            prime,
            issued: 0,
        }
    }

    /// Issues the share for the next participant, `x = issued + 1`.
    ///
    /// Returns `None` only once every non-zero element of the field has been used as an
    /// identifier; the counter is left untouched in that case.
    pub fn issue_next(&mut self) -> Option<Share> {
        let x = self.issued.checked_add(1)?;
        let point = BigUint::from(x);
        if point >= self.prime {
            return None;
        }

        self.issued = x;
        Some(Share {
            x,
            y: math::evaluate(&self.coefficients, &point, &self.prime),
        })
    }

    /// Number of shares issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Number of shares needed to recover the secret.
    pub fn threshold(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether enough shares have been issued for the secret to be recoverable.
    pub fn is_recoverable(&self) -> bool {
        self.issued >= self.threshold() as u64
    }

    /// Closes the session.
    ///
    /// Returns the number of shares issued, or [`Error::Unrecoverable`] when fewer than
    /// `threshold` were handed out: the polynomial is gone after this call, so no share issued
    /// later could make up for it. Reporting this to whoever stopped the issuance is left to
    /// the caller.
    pub fn finish(self) -> Result<u64, Error> {
        if self.is_recoverable() {
            Ok(self.issued)
        } else {
            Err(Error::Unrecoverable {
                issued: self.issued,
                threshold: self.threshold(),
            })
        }
    }
}

impl Iterator for Dealer {
    type Item = Share;

    fn next(&mut self) -> Option<Share> {
        self.issue_next()
    }
}

impl fmt::Debug for Dealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dealer")
            .field("threshold", &self.threshold())
            .field("issued", &self.issued)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize_memory")]
impl Drop for Dealer {
    fn drop(&mut self) {
        for c in &mut self.coefficients {
            super::field::wipe(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Dealer;
    use crate::error::Error;
    use crate::field::mersenne;
    use crate::math;
    use crate::SecretSharing;
    use alloc::{format, vec, vec::Vec};
    use num_bigint::BigUint;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    fn open(threshold: usize) -> (Dealer, ChaCha8Rng) {
        let sss = SecretSharing::<127>::new(threshold).unwrap();
        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        let dealer = sss.dealer_rng(&BigUint::from(99u32), &mut rng).unwrap();
        (dealer, rng)
    }

    #[test]
    fn issue_next_counts_up_from_one() {
        let (mut dealer, _) = open(3);
        assert_eq!(dealer.issued(), 0);
        let xs: Vec<u64> = (0..5).map(|_| dealer.issue_next().unwrap().x).collect();
        assert_eq!(xs, vec![1, 2, 3, 4, 5]);
        assert_eq!(dealer.issued(), 5);
    }

    #[test]
    fn issuing_draws_no_randomness() {
        let (mut dealer, rng) = open(4);
        let drawn = rng.get_word_pos();
        for _ in 0..10 {
            dealer.issue_next().unwrap();
        }
        assert_eq!(rng.get_word_pos(), drawn);
    }

    #[test]
    fn shares_lie_on_one_polynomial() {
        let poly = vec![
            BigUint::from(99u32),
            BigUint::from(5u32),
            BigUint::from(11u32),
        ];
        let p = mersenne(127);
        let mut dealer = Dealer::new(poly.clone(), p.clone());
        for share in dealer.by_ref().take(6) {
            assert_eq!(share.y, math::evaluate(&poly, &BigUint::from(share.x), &p));
        }
        assert_eq!(dealer.issued(), 6);
    }

    #[test]
    fn dealer_stops_at_end_of_field() {
        // 2^5 - 1 = 31 leaves identifiers 1..=30
        let sss = SecretSharing::<5>::new(2).unwrap();
        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        let mut dealer = sss.dealer_rng(&BigUint::from(3u32), &mut rng).unwrap();
        assert_eq!(dealer.by_ref().count(), 30);
        assert!(dealer.issue_next().is_none());
        assert_eq!(dealer.issued(), 30);
    }

    #[test]
    fn finish_before_threshold_err() {
        let (mut dealer, _) = open(3);
        dealer.issue_next();
        dealer.issue_next();
        assert!(!dealer.is_recoverable());
        assert_eq!(
            dealer.finish(),
            Err(Error::Unrecoverable {
                issued: 2,
                threshold: 3
            })
        );
    }

    #[test]
    fn finish_at_threshold_works() {
        let (mut dealer, _) = open(3);
        dealer.by_ref().take(3).for_each(drop);
        assert!(dealer.is_recoverable());
        assert_eq!(dealer.finish(), Ok(3));
    }

    #[test]
    fn debug_hides_polynomial() {
        let (dealer, _) = open(2);
        let shown = format!("{:?}", dealer);
        assert_eq!(shown, "Dealer { threshold: 2, issued: 0, .. }");
    }
}
