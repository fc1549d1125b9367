//! Hash-to-integer mapping shared by prover and verifier.

use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Hashes `bytes` with SHA-256, reads the digest as a big-endian integer and
/// reduces it modulo `modulus`.
///
/// This is a pure function: the same bytes and modulus always give the same
/// value in `[0, modulus - 1]`.
///
/// # Examples
///
/// ```rust
/// use devirgo::hash_to_int;
/// use num_bigint::BigUint;
///
/// let q = BigUint::from(7u32);
/// let m = hash_to_int(b"hello", &q).unwrap();
/// assert_eq!(m, BigUint::from(2u32));
/// ```
pub fn hash_to_int(bytes: &[u8], modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidParams("hash modulus cannot be zero".to_string()));
    }

    let digest = Sha256::digest(bytes);
    Ok(BigUint::from_bytes_be(&digest) % modulus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let q = BigUint::from(1_000_003u32);
        let a = hash_to_int(b"message", &q).unwrap();
        let b = hash_to_int(b"message", &q).unwrap();
        assert_eq!(a, b);
        assert!(a < q);
    }

    #[test]
    fn reduces_full_digest() {
        // With a modulus above 2^256 the value is the raw digest.
        let big = BigUint::from(1u32) << 300u32;
        let raw = hash_to_int(b"hello", &big).unwrap();
        let digest = Sha256::digest(b"hello");
        assert_eq!(raw, BigUint::from_bytes_be(&digest));
    }

    #[test]
    fn toy_order_values() {
        let q = BigUint::from(7u32);
        assert_eq!(hash_to_int(b"hello", &q).unwrap(), BigUint::from(2u32));
        assert_eq!(hash_to_int(b"hellp", &q).unwrap(), BigUint::from(5u32));
    }

    #[test]
    fn zero_modulus_is_rejected() {
        assert!(hash_to_int(b"x", &BigUint::zero()).is_err());
    }
}
