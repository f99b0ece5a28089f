// Arithmetic in the prime field Z/pZ where p is a Mersenne prime 2^e - 1.
//
// Values travel as `BigInt` while a computation may go negative (extended
// Euclid, Lagrange differences) and are only brought back into `[0, p)` by
// `normalize` at the end of a chain.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Exponents `e` for which `2^e - 1` is prime, up to 4423.
/// These are the fields a [`SecretSharing`](crate::SecretSharing) can be instantiated over.
pub const MERSENNE_EXPONENTS: [u32; 20] = [
    2, 3, 5, 7, 13, 17, 19, 31, 61, 89, 107, 127, 521, 607, 1279, 2203, 2281, 3217, 4253, 4423,
];

/// `2^127 - 1`: roughly 128-bit security, secrets up to 15 bytes of text.
pub const M127: u32 = 127;

/// `2^521 - 1`: secrets up to 65 bytes of text.
pub const M521: u32 = 521;

pub fn is_mersenne_exponent(exp: u32) -> bool {
    MERSENNE_EXPONENTS.contains(&exp)
}

/// Returns `2^exp - 1`.
pub fn mersenne(exp: u32) -> BigUint {
    (BigUint::one() << exp) - BigUint::one()
}

/// Modular inverse of `a` modulo `p` by the extended Euclidean algorithm.
///
/// Requires `gcd(a, p) = 1`. The returned coefficient satisfies
/// `a * b ≡ 1 (mod p)` but is not reduced: it may be negative or exceed `p`.
pub fn mod_inverse(a: &BigInt, p: &BigInt) -> BigInt {
    let (mut a, mut b) = (a.clone(), p.clone());
    let (mut x, mut last_x) = (BigInt::zero(), BigInt::one());

    // Floored division keeps every remainder non-negative once b = p > 0,
    // so the loop ends on gcd = +1 even when `a` starts negative.
    while !b.is_zero() {
        let (quot, rem) = a.div_mod_floor(&b);
        a = core::mem::replace(&mut b, rem);
        let next = &last_x - &quot * &x;
        last_x = core::mem::replace(&mut x, next);
    }

    last_x
}

/// Exact division in the field: `num * den^-1`.
///
/// `den * field_divide(num, den, p) ≡ num (mod p)`. Unreduced, like [`mod_inverse`].
pub fn field_divide(num: &BigInt, den: &BigInt, p: &BigInt) -> BigInt {
    num * mod_inverse(den, p)
}

/// Brings any integer into `[0, p)` as `((x % p) + p) % p`.
pub fn normalize(x: &BigInt, p: &BigInt) -> BigUint {
    let reduced: BigInt = ((x % p) + p) % p;
    let (_, magnitude) = reduced.into_parts();
    magnitude
}

/// Overwrites the limbs of `n` with zeros in place before releasing them.
#[cfg(feature = "zeroize_memory")]
pub fn wipe(n: &mut BigUint) {
    let zeros = alloc::vec![0u32; n.bits().div_ceil(32) as usize];
    n.assign_from_slice(&zeros);
}
