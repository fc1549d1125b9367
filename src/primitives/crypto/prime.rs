//! Probabilistic primality testing and random prime generation.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand_core::CryptoRngCore;

use super::rng::{random_below, random_odd_with_bits};
use crate::{Error, Result};

/// Odd primes below 256, used to discard most candidates before Miller-Rabin.
const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Returns `Some(verdict)` when trial division alone settles primality.
fn trial_division(n: &BigUint) -> Option<bool> {
    if let Some(small) = n.to_u32() {
        if small < 2 {
            return Some(false);
        }
        if small == 2 {
            return Some(true);
        }
        if small % 2 == 0 {
            return Some(false);
        }
        for &p in SMALL_PRIMES.iter() {
            if small == p {
                return Some(true);
            }
            if small % p == 0 {
                return Some(false);
            }
        }
        // Every composite below 256^2 has a factor below 256.
        if small < 256 * 256 {
            return Some(true);
        }
        return None;
    }

    if n.is_even() {
        return Some(false);
    }

    for &p in SMALL_PRIMES.iter() {
        if (n % p).is_zero() {
            return Some(false);
        }
    }

    None
}

/// Miller-Rabin probabilistic primality test with `rounds` random bases.
///
/// A composite survives with probability at most `4^-rounds`.
pub fn is_probable_prime<R: CryptoRngCore + ?Sized>(
    n: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> Result<bool> {
    if let Some(verdict) = trial_division(n) {
        return Ok(verdict);
    }

    let one = BigUint::one();
    let n_minus_one = n - &one;

    let s = n_minus_one
        .trailing_zeros()
        .unwrap_or_else(|| unreachable!("n - 1 is non-zero for n above the trial bound"));
    let d = &n_minus_one >> s;

    // Bases are drawn from [2, n - 2].
    let base_span = n - 3u32;

    'witness: for _ in 0..rounds {
        let a = random_below(rng, &base_span)? + 2u32;
        let mut x = a.modpow(&d, n);

        if x == one || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = x.modpow(&BigUint::from(2u32), n);
            if x == n_minus_one {
                continue 'witness;
            }
            if x == one {
                return Ok(false);
            }
        }

        return Ok(false);
    }

    Ok(true)
}

/// Draws a random prime with exactly `bits` bits.
///
/// Gives up with [`Error::ParameterGeneration`] after `max_candidates` odd candidates.
pub fn random_prime<R: CryptoRngCore + ?Sized>(
    bits: usize,
    rounds: usize,
    max_candidates: usize,
    rng: &mut R,
) -> Result<BigUint> {
    if bits < 2 {
        return Err(Error::InvalidParams(format!("no prime has {bits} bits")));
    }

    for attempt in 1..=max_candidates {
        let candidate = random_odd_with_bits(rng, bits)?;
        if is_probable_prime(&candidate, rounds, rng)? {
            tracing::debug!(bits, attempt, "found prime");
            return Ok(candidate);
        }
    }

    Err(Error::ParameterGeneration(format!(
        "no {bits}-bit prime found in {max_candidates} candidates"
    )))
}
