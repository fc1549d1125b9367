//! Cryptographically secure random number generation.
//!
//! Every draw goes through `try_fill_bytes`, so a failing source surfaces as
//! [`Error::EntropyUnavailable`](crate::Error::EntropyUnavailable) instead of a panic.

use num_bigint::BigUint;
use num_traits::One;
use rand_core::{CryptoRng, CryptoRngCore, OsRng, RngCore};
use zeroize::Zeroizing;

use super::field::wipe;
use crate::{Error, Result};

/// Handle to the operating-system random source.
///
/// Keys and nonces are drawn only from here (or from a caller-supplied
/// `CryptoRngCore`). Library code calls `try_fill_bytes` exclusively, so a
/// source failure becomes an error; the infallible `RngCore` methods panic.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Returns a handle to the OS random source.
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

/// Draws a uniform integer in `[0, bound - 1]` by rejection sampling.
pub fn random_below<R: CryptoRngCore + ?Sized>(rng: &mut R, bound: &BigUint) -> Result<BigUint> {
    if bound.bits() == 0 {
        return Err(Error::InvalidParams("sampling bound must be positive".to_string()));
    }

    let bits = bound.bits() as usize;
    let mut buf = Zeroizing::new(vec![0u8; bits.div_ceil(8)]);
    let excess = buf.len() * 8 - bits;

    loop {
        rng.try_fill_bytes(&mut buf)?;
        buf[0] &= 0xFF >> excess;

        let mut candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return Ok(candidate);
        }
        wipe(&mut candidate);
    }
}

/// Draws a uniform scalar in `[1, order - 1]`.
pub fn random_scalar<R: CryptoRngCore + ?Sized>(rng: &mut R, order: &BigUint) -> Result<BigUint> {
    if order <= &BigUint::one() {
        return Err(Error::InvalidParams("group order must be at least 2".to_string()));
    }

    let span = order - 1u32;
    Ok(random_below(rng, &span)? + 1u32)
}

/// Draws an odd integer with exactly `bits` bits (top bit forced).
pub fn random_odd_with_bits<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bits: usize,
) -> Result<BigUint> {
    if bits < 2 {
        return Err(Error::InvalidParams(format!("cannot draw an odd {bits}-bit integer")));
    }

    let mut buf = vec![0u8; bits.div_ceil(8)];
    let excess = buf.len() * 8 - bits;
    rng.try_fill_bytes(&mut buf)?;

    buf[0] &= 0xFF >> excess;
    buf[0] |= 0x80 >> excess;
    let last = buf.len() - 1;
    buf[last] |= 1;

    Ok(BigUint::from_bytes_be(&buf))
}

/// Draws an integer with exactly `bits` bits (top bit forced).
pub fn random_with_bits<R: CryptoRngCore + ?Sized>(rng: &mut R, bits: usize) -> Result<BigUint> {
    if bits == 0 {
        return Err(Error::InvalidParams("bit length must be positive".to_string()));
    }

    let mut buf = vec![0u8; bits.div_ceil(8)];
    let excess = buf.len() * 8 - bits;
    rng.try_fill_bytes(&mut buf)?;

    buf[0] &= 0xFF >> excess;
    buf[0] |= 0x80 >> excess;

    Ok(BigUint::from_bytes_be(&buf))
}
