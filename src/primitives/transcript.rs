//! Fiat-Shamir transcript for non-interactive proofs.
//!
//! The challenge is `hash_to_int(fixed(r) || fixed(t), q)` where `fixed`
//! encodes a group element big-endian at [`GroupParameters::element_len`]
//! bytes, so prover and verifier hash byte-identical input.

use num_bigint::BigUint;

use super::crypto::field::to_fixed_be;
use super::crypto::hash_to_int;
use super::GroupParameters;
use crate::Result;

/// Accumulates the encoded commitments and derives the challenge.
pub struct Transcript<'a> {
    params: &'a GroupParameters,
    buf: Vec<u8>,
}

impl<'a> Transcript<'a> {
    /// Creates an empty transcript over `params`.
    pub fn new(params: &'a GroupParameters) -> Self {
        Self {
            params,
            buf: Vec::with_capacity(2 * params.element_len()),
        }
    }

    /// Appends the nonce commitment `r = g^k`.
    pub fn append_commitment(&mut self, r: &BigUint) {
        self.append_element(r);
    }

    /// Appends the message binding `t = g^m`.
    pub fn append_message_binding(&mut self, t: &BigUint) {
        self.append_element(t);
    }

    /// Derives the challenge `c` in `[0, q - 1]`.
    pub fn challenge_scalar(&self) -> Result<BigUint> {
        hash_to_int(&self.buf, self.params.order())
    }

    fn append_element(&mut self, element: &BigUint) {
        // Elements are always reduced mod p, so they fit element_len bytes.
        let reduced = element % self.params.modulus();
        let bytes = to_fixed_be(&reduced, self.params.element_len())
            .unwrap_or_else(|_| unreachable!("reduced element fits the modulus width"));
        self.buf.extend_from_slice(&bytes);
    }
}
