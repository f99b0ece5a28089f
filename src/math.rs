// A module which contains necessary algorithms to compute Shamir's shares and recover secrets

use alloc::vec::Vec;

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::Zero;
use rand::{CryptoRng, Rng};

use super::field::{field_divide, normalize};

// Evaluates the polynomial at `x` with Horner's method.
// Coefficients are stored from lowest to highest degree, so they are folded in reverse.
// Every intermediate stays below p^2 before its reduction.
pub fn evaluate(coefficients: &[BigUint], x: &BigUint, p: &BigUint) -> BigUint {
    coefficients
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, c| (acc * x + c) % p)
}

// Generates `k` polynomial coefficients, the first one being `secret` and the others drawn
// uniformly from `[0, p)`. Coefficient degrees go from lower to higher in the returned vector.
pub fn random_polynomial<R: Rng + CryptoRng>(
    secret: &BigUint,
    k: usize,
    p: &BigUint,
    rng: &mut R,
) -> Vec<BigUint> {
    let mut poly = Vec::with_capacity(k);
    poly.push(secret.clone());

    for _ in 1..k {
        poly.push(rng.gen_biguint_below(p));
    }

    poly
}

// Lagrange interpolation of the polynomial through `points`, evaluated at `x`.
//
// Every basis term is brought over the common denominator D = Π Dᵢ so that
// the sum is divided by a single value at the end:
//   Nᵢ = Π_{j≠i} (x − x_j),  Dᵢ = Π_{j≠i} (x_i − x_j)
//   result = (Σ (Nᵢ·D·yᵢ mod p) / Dᵢ) / D
// The x coordinates must be pairwise distinct modulo p.
pub fn interpolate(x: &BigInt, points: &[(BigInt, BigInt)], p: &BigInt) -> BigUint {
    let k = points.len();
    let mut nums = Vec::with_capacity(k);
    let mut dens = Vec::with_capacity(k);

    for (i, (cur, _)) in points.iter().enumerate() {
        let mut num = BigInt::from(1);
        let mut den = BigInt::from(1);
        for (j, (other, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            num *= x - other;
            den *= cur - other;
        }
        nums.push(num);
        dens.push(den);
    }

    let den: BigInt = dens.iter().product();
    let num: BigInt = points
        .iter()
        .zip(nums.iter().zip(dens.iter()))
        .map(|((_, y), (num_i, den_i))| {
            let scaled = (num_i * &den * y).mod_floor(p);
            field_divide(&scaled, den_i, p)
        })
        .sum();

    normalize(&field_divide(&num, &den, p), p)
}

#[cfg(test)]
mod tests {
    use super::{evaluate, interpolate, random_polynomial};
    use crate::field::{mersenne, M127};
    use alloc::{vec, vec::Vec};
    use num_bigint::{BigInt, BigUint};
    use num_traits::Pow;
    use rand_chacha::rand_core::SeedableRng;

    fn to_points(xs: &[u64], ys: &[BigUint]) -> Vec<(BigInt, BigInt)> {
        xs.iter()
            .zip(ys)
            .map(|(x, y)| (BigInt::from(*x), BigInt::from(y.clone())))
            .collect()
    }

    #[test]
    fn evaluate_works() {
        // 3 + 2x + 5x^2
        let poly = vec![BigUint::from(3u32), BigUint::from(2u32), BigUint::from(5u32)];
        let p = BigUint::from(8191u32);
        assert_eq!(evaluate(&poly, &BigUint::from(1u32), &p), BigUint::from(10u32));
        assert_eq!(evaluate(&poly, &BigUint::from(2u32), &p), BigUint::from(27u32));
        assert_eq!(evaluate(&poly, &BigUint::from(0u32), &p), BigUint::from(3u32));
        // 3 + 2*100 + 5*10000 = 50203 ≡ 1057 (mod 8191)
        assert_eq!(evaluate(&poly, &BigUint::from(100u32), &p), BigUint::from(1057u32));
    }

    #[test]
    fn evaluate_matches_power_sum() {
        let p = mersenne(M127);
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x90; 32]);
        let poly = random_polynomial(&BigUint::from(99u32), 6, &p, &mut rng);
        for x in 1u32..20 {
            let x = BigUint::from(x);
            let expected = poly
                .iter()
                .enumerate()
                .map(|(i, c)| c * Pow::pow(&x, i))
                .sum::<BigUint>()
                % &p;
            assert_eq!(evaluate(&poly, &x, &p), expected);
        }
    }

    #[test]
    fn random_polynomial_works() {
        let p = mersenne(M127);
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x90; 32]);
        let poly = random_polynomial(&BigUint::from(1u32), 3, &p, &mut rng);
        assert_eq!(poly.len(), 3);
        assert_eq!(poly[0], BigUint::from(1u32));
        assert!(poly.iter().all(|c| c < &p));
        assert_ne!(poly[1], poly[2]);
    }

    #[test]
    fn interpolate_works() {
        let p = mersenne(M127);
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x90; 32]);
        let poly = random_polynomial(&BigUint::from(185u32), 10, &p, &mut rng);
        let xs: Vec<u64> = (1..=10).collect();
        let ys: Vec<BigUint> = xs
            .iter()
            .map(|x| evaluate(&poly, &BigUint::from(*x), &p))
            .collect();
        let root = interpolate(&BigInt::from(0), &to_points(&xs, &ys), &BigInt::from(p));
        assert_eq!(root, BigUint::from(185u32));
    }

    #[test]
    fn interpolate_away_from_zero() {
        let p = BigUint::from(8191u32);
        let poly = vec![BigUint::from(3u32), BigUint::from(2u32), BigUint::from(5u32)];
        let xs = [2u64, 5, 9];
        let ys: Vec<BigUint> = xs
            .iter()
            .map(|x| evaluate(&poly, &BigUint::from(*x), &p))
            .collect();
        let at_100 = interpolate(&BigInt::from(100), &to_points(&xs, &ys), &BigInt::from(p));
        assert_eq!(at_100, BigUint::from(1057u32));
    }
}
