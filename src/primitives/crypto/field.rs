use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::{Error, Result};

/// Computes `base^exp mod modulus` by square-and-multiply.
///
/// Fails on a zero modulus instead of panicking inside `num-bigint`.
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidParams("modulus cannot be zero".to_string()));
    }

    Ok(base.modpow(exp, modulus))
}

/// Computes `a * b mod modulus`.
pub fn mod_mul(a: &BigUint, b: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidParams("modulus cannot be zero".to_string()));
    }

    Ok((a * b) % modulus)
}

/// Computes `(a + b * c) mod modulus`.
pub fn mod_mul_add(a: &BigUint, b: &BigUint, c: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidParams("modulus cannot be zero".to_string()));
    }

    Ok((a + b * c) % modulus)
}

/// Number of bytes needed to hold any value below `modulus`.
pub fn byte_len(modulus: &BigUint) -> usize {
    let bits = modulus.bits() as usize;
    bits.div_ceil(8).max(1)
}

/// Encodes `value` as a big-endian byte string of exactly `width` bytes.
///
/// Fails if the value does not fit; values reduced modulo a number of
/// `width` bytes always fit.
pub fn to_fixed_be(value: &BigUint, width: usize) -> Result<Vec<u8>> {
    let raw = if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    };

    if raw.len() > width {
        return Err(Error::InvalidScalar(format!(
            "value needs {} bytes, encoding width is {}",
            raw.len(),
            width
        )));
    }

    let mut out = vec![0u8; width - raw.len()];
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Overwrites the limbs of `value` in place, then clears it.
///
/// The fill pattern is non-zero so normalization keeps the same buffer, and
/// `black_box` keeps the stores from being elided before the clear.
pub(crate) fn wipe(value: &mut BigUint) {
    let digits = value.iter_u32_digits().len();
    if digits == 0 {
        return;
    }

    value.assign_from_slice(&vec![u32::MAX; digits]);
    core::hint::black_box(&*value);
    value.set_zero();
}

/// Returns `true` if `value` lies in `[1, bound - 1]`.
pub(crate) fn in_open_range(value: &BigUint, bound: &BigUint) -> bool {
    !value.is_zero() && value < bound
}

/// Returns `true` if `value` is the multiplicative identity.
pub(crate) fn is_one(value: &BigUint) -> bool {
    value.is_one()
}
