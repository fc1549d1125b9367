//! Protocol gadgets for deVirgo proofs.
//!
//! This module contains the values exchanged around the protocol: the key
//! pair held by the prover, the public key handed to verifiers, and the
//! `(challenge, response)` proof.

use core::fmt;

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::crypto::field::{in_open_range, is_one, to_fixed_be, wipe};
use super::crypto::rng::random_scalar;
use super::GroupParameters;
use crate::{Error, Result, SecureRng};

/// Secret scalar `x` in `[1, q - 1]`.
///
/// Zeroized on drop and redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivateKey(#[serde(with = "crate::serialize::big_uint")] BigUint);

impl PrivateKey {
    pub(crate) fn secret(&self) -> &BigUint {
        &self.0
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        wipe(&mut self.0);
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Public key `y = g^x mod p`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(#[serde(with = "crate::serialize::big_uint")] BigUint);

impl PublicKey {
    /// Wraps `y`, checking that it is a non-identity element of the subgroup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGroupElement`] if `y` is outside the subgroup or is 1.
    pub fn new(params: &GroupParameters, y: BigUint) -> Result<Self> {
        let key = Self(y);
        key.validate(params)?;
        Ok(key)
    }

    /// Returns the element `y`.
    pub fn element(&self) -> &BigUint {
        &self.0
    }

    /// Checks subgroup membership against `params`.
    pub fn validate(&self, params: &GroupParameters) -> Result<()> {
        if !params.is_element(&self.0) {
            return Err(Error::InvalidGroupElement(
                "public key is not in the order-q subgroup".to_string(),
            ));
        }

        if is_one(&self.0) {
            return Err(Error::InvalidGroupElement("public key cannot be the identity".to_string()));
        }

        Ok(())
    }
}

/// Private scalar and its public image, owned by the prover.
///
/// # Security
///
/// - The private key is zeroized when dropped
/// - Only the [`PublicKey`] should ever leave the prover
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generates a key pair: `x` uniform in `[1, q - 1]`, `y = g^x mod p`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use devirgo::{GroupParameters, KeyPair};
    ///
    /// let params = GroupParameters::rfc5114_2048_256();
    /// let keypair = KeyPair::generate(&params).unwrap();
    /// assert!(params.is_element(keypair.public_key().element()));
    /// ```
    pub fn generate(params: &GroupParameters) -> Result<Self> {
        let mut rng = SecureRng::new();
        Self::generate_with_rng(params, &mut rng)
    }

    /// Generates a key pair with a caller-provided random source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if `rng` fails.
    pub fn generate_with_rng<R: CryptoRngCore + ?Sized>(
        params: &GroupParameters,
        rng: &mut R,
    ) -> Result<Self> {
        let x = random_scalar(rng, params.order())?;
        Self::from_private(params, x)
    }

    /// Rebuilds a key pair from a known private scalar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScalar`] if `x` is outside `[1, q - 1]`.
    pub fn from_private(params: &GroupParameters, x: BigUint) -> Result<Self> {
        let private_key = PrivateKey(x);
        if !in_open_range(private_key.secret(), params.order()) {
            return Err(Error::InvalidScalar("private key must lie in [1, q - 1]".to_string()));
        }

        let y = params.pow_g(private_key.secret());
        Ok(Self {
            private_key,
            public_key: PublicKey(y),
        })
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub(crate) fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Checks that the pair is consistent with `params` (`y == g^x`, `x` in range).
    ///
    /// Use this after loading a persisted key pair.
    pub fn validate(&self, params: &GroupParameters) -> Result<()> {
        if !in_open_range(self.private_key.secret(), params.order()) {
            return Err(Error::InvalidScalar("private key must lie in [1, q - 1]".to_string()));
        }

        if params.pow_g(self.private_key.secret()) != self.public_key.0 {
            return Err(Error::InvalidGroupElement(
                "public key does not match private key".to_string(),
            ));
        }

        Ok(())
    }
}

/// Non-interactive proof `(c, z)`.
///
/// # Serialization
///
/// - Binary: `c || z`, each big-endian and exactly [`GroupParameters::scalar_len`] bytes
///   ([`Proof::to_bytes`] / [`Proof::from_bytes`])
/// - JSON: `{"challenge": "<decimal>", "response": "<decimal>"}`
///
/// Decoding never range-checks the values; out-of-range proofs are rejected by the verifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(with = "crate::serialize::big_uint")]
    challenge: BigUint,
    #[serde(with = "crate::serialize::big_uint")]
    response: BigUint,
}

impl Proof {
    /// Creates a proof from its two components.
    ///
    /// This is typically called by [`Prover`](crate::Prover) and not directly by users.
    pub fn new(challenge: BigUint, response: BigUint) -> Self {
        Self {
            challenge,
            response,
        }
    }

    /// Returns the challenge `c`.
    pub fn challenge(&self) -> &BigUint {
        &self.challenge
    }

    /// Returns the response `z`.
    pub fn response(&self) -> &BigUint {
        &self.response
    }

    /// Serializes the proof to `2 * scalar_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProof`] if a component does not fit the scalar width.
    pub fn to_bytes(&self, params: &GroupParameters) -> Result<Vec<u8>> {
        let width = params.scalar_len();
        let mut out = to_fixed_be(&self.challenge, width)
            .map_err(|_| Error::InvalidProof("challenge exceeds scalar width".to_string()))?;
        let z = to_fixed_be(&self.response, width)
            .map_err(|_| Error::InvalidProof("response exceeds scalar width".to_string()))?;
        out.extend_from_slice(&z);
        Ok(out)
    }

    /// Deserializes a proof from `2 * scalar_len` bytes.
    pub fn from_bytes(params: &GroupParameters, bytes: &[u8]) -> Result<Self> {
        let width = params.scalar_len();
        if bytes.len() != 2 * width {
            return Err(Error::InvalidProof(format!(
                "expected {} bytes, got {}",
                2 * width,
                bytes.len()
            )));
        }

        let (c, z) = bytes.split_at(width);
        Ok(Self::new(BigUint::from_bytes_be(c), BigUint::from_bytes_be(z)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> GroupParameters {
        GroupParameters::from_base(953u32.into(), 7u32.into(), &5u32.into()).unwrap()
    }

    #[test]
    fn keypair_from_private() {
        let params = toy();
        let keypair = KeyPair::from_private(&params, 3u32.into()).unwrap();
        assert_eq!(keypair.public_key().element(), &BigUint::from(879u32));
        keypair.validate(&params).unwrap();
    }

    #[test]
    fn keypair_rejects_out_of_range_private() {
        let params = toy();
        assert!(KeyPair::from_private(&params, 0u32.into()).is_err());
        assert!(KeyPair::from_private(&params, 7u32.into()).is_err());
    }

    #[test]
    fn generated_keys_are_in_range() {
        let params = toy();
        for _ in 0..50 {
            let keypair = KeyPair::generate(&params).unwrap();
            keypair.validate(&params).unwrap();
            keypair.public_key().validate(&params).unwrap();
        }
    }

    #[test]
    fn keypair_generation_reports_entropy_failure() {
        let params = toy();
        let mut rng = crate::primitives::crypto::rng::testing::FailingRng;
        let result = KeyPair::generate_with_rng(&params, &mut rng);
        assert!(matches!(result, Err(Error::EntropyUnavailable(_))));
    }

    #[test]
    fn public_key_rejects_non_members() {
        let params = toy();
        assert!(PublicKey::new(&params, 5u32.into()).is_err());
        assert!(PublicKey::new(&params, 1u32.into()).is_err());
        assert!(PublicKey::new(&params, 0u32.into()).is_err());
        assert!(PublicKey::new(&params, 879u32.into()).is_ok());
    }

    #[test]
    fn private_key_debug_is_redacted() {
        let params = toy();
        let keypair = KeyPair::from_private(&params, 3u32.into()).unwrap();
        let rendered = format!("{keypair:?}");
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn tampered_keypair_fails_validation() {
        let params = toy();
        let json = r#"{"private_key":"3","public_key":"508"}"#;
        let keypair: KeyPair = serde_json::from_str(json).unwrap();
        assert!(keypair.validate(&params).is_err());
    }

    #[test]
    fn proof_bytes_are_fixed_width() {
        let params = GroupParameters::rfc5114_2048_256();
        let proof = Proof::new(1u32.into(), 2u32.into());
        let bytes = proof.to_bytes(&params).unwrap();

        assert_eq!(bytes.len(), 64);
        assert_eq!(bytes[31], 1);
        assert_eq!(bytes[63], 2);
        assert_eq!(Proof::from_bytes(&params, &bytes).unwrap(), proof);
    }

    #[test]
    fn proof_from_bytes_rejects_wrong_length() {
        let params = toy();
        assert!(Proof::from_bytes(&params, &[]).is_err());
        assert!(Proof::from_bytes(&params, &[1, 2, 3]).is_err());
        assert!(Proof::from_bytes(&params, &[1, 2]).is_ok());
    }

    #[test]
    fn proof_to_bytes_rejects_oversized_component() {
        let params = toy();
        let proof = Proof::new(300u32.into(), 1u32.into());
        assert!(proof.to_bytes(&params).is_err());
    }

    #[test]
    fn proof_json_uses_decimal_strings() {
        let proof = Proof::new(4u32.into(), 6u32.into());
        let json = serde_json::to_string(&proof).unwrap();
        assert_eq!(json, r#"{"challenge":"4","response":"6"}"#);
    }
}
