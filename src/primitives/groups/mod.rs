//! Prime-order subgroups of `Z_p^*`.
//!
//! A [`GroupParameters`] value is immutable once built and every constructor
//! checks the full set of invariants, so the prover and verifier never see a
//! malformed group.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use super::crypto::field::{byte_len, in_open_range, is_one, mod_pow};
use super::crypto::prime::{is_probable_prime, random_prime};
use super::crypto::rng::{random_odd_with_bits, random_with_bits};
use crate::config::MAX_MODULUS_BITS;
use crate::{Error, Result, SecureRng, SetupConfig};

/// RFC 5114 MODP group (2048-bit modulus, 256-bit order).
pub mod rfc5114;

/// Miller-Rabin rounds used when checking caller-supplied parameters.
const VALIDATION_ROUNDS: usize = 24;

/// Public description of a discrete-log group.
///
/// `p` is a prime modulus, `q` a prime dividing `p - 1`, and `g` an element of
/// order `q` in `Z_p^*`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGroupParameters", into = "RawGroupParameters")]
pub struct GroupParameters {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

#[derive(Serialize, Deserialize)]
struct RawGroupParameters {
    #[serde(with = "crate::serialize::big_uint")]
    modulus: BigUint,
    #[serde(with = "crate::serialize::big_uint")]
    order: BigUint,
    #[serde(with = "crate::serialize::big_uint")]
    generator: BigUint,
}

impl TryFrom<RawGroupParameters> for GroupParameters {
    type Error = Error;

    fn try_from(raw: RawGroupParameters) -> Result<Self> {
        Self::new(raw.modulus, raw.order, raw.generator)
    }
}

impl From<GroupParameters> for RawGroupParameters {
    fn from(params: GroupParameters) -> Self {
        Self {
            modulus: params.p,
            order: params.q,
            generator: params.g,
        }
    }
}

impl GroupParameters {
    /// Builds parameters from explicit values, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if:
    /// - `p` or `q` is not prime
    /// - `q` does not divide `p - 1`
    /// - `g` is outside `(1, p)` or `g^q mod p != 1`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use devirgo::GroupParameters;
    /// use num_bigint::BigUint;
    ///
    /// // 2 has order 3 modulo 7.
    /// let params = GroupParameters::new(7u32.into(), 3u32.into(), 2u32.into()).unwrap();
    /// assert_eq!(params.order(), &BigUint::from(3u32));
    /// ```
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Result<Self> {
        let params = Self { p, q, g };
        params.validate()?;
        Ok(params)
    }

    /// Builds parameters by projecting `base` into the order-`q` subgroup.
    ///
    /// The generator becomes `base^((p-1)/q) mod p`, which has order `q`
    /// whenever it is not 1.
    pub fn from_base(p: BigUint, q: BigUint, base: &BigUint) -> Result<Self> {
        check_structure(&p, &q)?;

        let g = project_to_subgroup(&p, &q, base)?;
        if is_one(&g) {
            return Err(Error::InvalidParams(
                "base projects to the identity; choose another base".to_string(),
            ));
        }

        Self::new(p, q, g)
    }

    /// Generates fresh parameters with a `bit_length`-bit modulus.
    pub fn generate(bit_length: usize) -> Result<Self> {
        Self::generate_with_config(&SetupConfig::with_modulus_bits(bit_length))
    }

    /// Generates fresh parameters according to `config`.
    pub fn generate_with_config(config: &SetupConfig) -> Result<Self> {
        let mut rng = SecureRng::new();
        Self::generate_with_rng(config, &mut rng)
    }

    /// Generates fresh parameters with a caller-provided random source.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParams`] if `config` is invalid
    /// - [`Error::ParameterGeneration`] if the bounded search finds no group
    /// - [`Error::EntropyUnavailable`] if `rng` fails
    pub fn generate_with_rng<R: CryptoRngCore + ?Sized>(
        config: &SetupConfig,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;

        let modulus_bits = config.modulus_bits;
        let order_bits = config.order_bits();
        let rounds = config.primality_rounds;

        if config.is_safe_prime() {
            return Self::generate_safe_prime(config, rng);
        }

        let q = random_prime(order_bits, rounds, config.max_candidates, rng)?;
        let two_q: BigUint = &q << 1u32;

        for attempt in 1..=config.max_candidates {
            // p = X - (X mod 2q) + 1, so 2q divides p - 1.
            let x = random_with_bits(rng, modulus_bits)?;
            let p = &x - (&x % &two_q) + 1u32;

            if p.bits() as usize != modulus_bits {
                continue;
            }

            if !is_probable_prime(&p, rounds, rng)? {
                continue;
            }

            tracing::debug!(modulus_bits, order_bits, attempt, "found modulus");

            let g = find_generator(&p, &q, config.max_generator_trials)?;
            let params = Self { p, q, g };

            tracing::info!(modulus_bits, order_bits, "generated group parameters");
            return Ok(params);
        }

        Err(Error::ParameterGeneration(format!(
            "no {modulus_bits}-bit modulus with a {order_bits}-bit subgroup found in {} candidates",
            config.max_candidates
        )))
    }

    /// Searches for `q` such that `p = 2q + 1` is also prime.
    fn generate_safe_prime<R: CryptoRngCore + ?Sized>(
        config: &SetupConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let modulus_bits = config.modulus_bits;
        let rounds = config.primality_rounds;

        for attempt in 1..=config.max_candidates {
            let q = random_odd_with_bits(rng, modulus_bits - 1)?;
            let p: BigUint = (&q << 1u32) + 1u32;

            if !is_probable_prime(&p, rounds, rng)? || !is_probable_prime(&q, rounds, rng)? {
                continue;
            }

            tracing::debug!(modulus_bits, attempt, "found safe prime");

            let g = find_generator(&p, &q, config.max_generator_trials)?;
            tracing::info!(modulus_bits, "generated safe-prime group parameters");
            return Ok(Self { p, q, g });
        }

        Err(Error::ParameterGeneration(format!(
            "no {modulus_bits}-bit safe prime found in {} candidates",
            config.max_candidates
        )))
    }

    /// Returns the prime modulus `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Returns the subgroup order `q`.
    pub fn order(&self) -> &BigUint {
        &self.q
    }

    /// Returns the subgroup generator `g`.
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// Byte length of a group element (the byte length of `p`).
    pub fn element_len(&self) -> usize {
        byte_len(&self.p)
    }

    /// Byte length of a scalar (the byte length of `q`).
    pub fn scalar_len(&self) -> usize {
        byte_len(&self.q)
    }

    /// Returns `true` if `value` is an element of the order-`q` subgroup.
    pub fn is_element(&self, value: &BigUint) -> bool {
        if !in_open_range(value, &self.p) {
            return false;
        }

        is_one(&value.modpow(&self.q, &self.p))
    }

    /// Computes `g^exp mod p`.
    pub(crate) fn pow_g(&self, exp: &BigUint) -> BigUint {
        self.g.modpow(exp, &self.p)
    }

    /// Checks every group invariant.
    pub fn validate(&self) -> Result<()> {
        check_structure(&self.p, &self.q)?;

        if self.g <= BigUint::one() || self.g >= self.p {
            return Err(Error::InvalidParams("generator must lie in (1, p)".to_string()));
        }

        if !is_one(&mod_pow(&self.g, &self.q, &self.p)?) {
            return Err(Error::InvalidParams(
                "generator does not have order q (g^q mod p != 1)".to_string(),
            ));
        }

        let mut rng = SecureRng::new();
        if !is_probable_prime(&self.q, VALIDATION_ROUNDS, &mut rng)? {
            return Err(Error::InvalidParams("order q is not prime".to_string()));
        }

        if !is_probable_prime(&self.p, VALIDATION_ROUNDS, &mut rng)? {
            return Err(Error::InvalidParams("modulus p is not prime".to_string()));
        }

        Ok(())
    }
}

/// Cheap structural checks: sizes and `q | p - 1`.
fn check_structure(p: &BigUint, q: &BigUint) -> Result<()> {
    if p.bits() > MAX_MODULUS_BITS as u64 {
        return Err(Error::InvalidParams(format!("modulus exceeds {MAX_MODULUS_BITS} bits")));
    }

    if q < &BigUint::from(2u32) {
        return Err(Error::InvalidParams("order q must be at least 2".to_string()));
    }

    if p <= q {
        return Err(Error::InvalidParams("modulus p must exceed order q".to_string()));
    }

    let p_minus_one = p - 1u32;
    if !p_minus_one.is_multiple_of(q) {
        return Err(Error::InvalidParams("order q does not divide p - 1".to_string()));
    }

    Ok(())
}

fn project_to_subgroup(p: &BigUint, q: &BigUint, base: &BigUint) -> Result<BigUint> {
    let base = base % p;
    if base.is_zero() {
        return Err(Error::InvalidParams("base must not be a multiple of p".to_string()));
    }

    let cofactor = (p - 1u32) / q;
    mod_pow(&base, &cofactor, p)
}

/// Tries bases `2, 3, ...` until one projects to a non-identity element.
fn find_generator(p: &BigUint, q: &BigUint, max_trials: usize) -> Result<BigUint> {
    let mut base = BigUint::from(2u32);

    for _ in 0..max_trials {
        if &base >= p {
            break;
        }

        let g = project_to_subgroup(p, q, &base)?;
        if !is_one(&g) {
            return Ok(g);
        }

        base += 1u32;
    }

    Err(Error::ParameterGeneration(format!(
        "no generator of the order-q subgroup found in {max_trials} trials"
    )))
}
