use num_bigint::BigUint;
use subtle::ConstantTimeEq;

use crate::primitives::crypto::field::{mod_mul, mod_pow, to_fixed_be};
use crate::{hash_to_int, GroupParameters, Proof, PublicKey, Transcript};

/// Verifier for the deVirgo zero-knowledge protocol.
///
/// Checks that a proof was produced by the holder of the private key behind
/// `public_key`, for exactly the given message.
pub struct Verifier<'a> {
    params: &'a GroupParameters,
    public_key: &'a PublicKey,
}

/// Why a proof was rejected.
#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error("challenge is not below q")]
    ChallengeOutOfRange,
    #[error("response is not below q")]
    ResponseOutOfRange,
    #[error("public key rejected: {0}")]
    PublicKey(crate::Error),
    #[error("arithmetic failed: {0}")]
    Arithmetic(crate::Error),
    #[error("recomputed challenge does not match")]
    ChallengeMismatch,
}

impl From<crate::Error> for Rejection {
    fn from(err: crate::Error) -> Self {
        Self::Arithmetic(err)
    }
}

impl<'a> Verifier<'a> {
    /// Creates a verifier for proofs made with the private key behind `public_key`.
    pub fn new(params: &'a GroupParameters, public_key: &'a PublicKey) -> Self {
        Self { params, public_key }
    }

    /// Returns `true` if `proof` is valid for `message`.
    ///
    /// Never panics and never errors: malformed or out-of-range inputs are
    /// rejected. The reason is logged at `debug` level.
    pub fn verify(&self, message: &[u8], proof: &Proof) -> bool {
        match self.check(message, proof) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(%reason, "proof rejected");
                false
            }
        }
    }

    fn check(&self, message: &[u8], proof: &Proof) -> Result<(), Rejection> {
        let p = self.params.modulus();
        let q = self.params.order();
        let c = proof.challenge();
        let z = proof.response();

        if c >= q {
            return Err(Rejection::ChallengeOutOfRange);
        }

        if z >= q {
            return Err(Rejection::ResponseOutOfRange);
        }

        self.public_key
            .validate(self.params)
            .map_err(Rejection::PublicKey)?;

        let m = hash_to_int(message, q)?;

        // u1 = g^z * y^(q - c) = g^z * (y^c)^-1, which equals r = g^k.
        let y = self.public_key.element();
        let y_inv_c = mod_pow(y, &(q - c), p)?;
        let u1 = mod_mul(&self.params.pow_g(z), &y_inv_c, p)?;
        let u2 = self.params.pow_g(&m);

        let mut transcript = Transcript::new(self.params);
        transcript.append_commitment(&u1);
        transcript.append_message_binding(&u2);
        let expected = transcript.challenge_scalar()?;

        if !scalars_match(self.params, &expected, c)? {
            return Err(Rejection::ChallengeMismatch);
        }

        Ok(())
    }
}

fn scalars_match(params: &GroupParameters, a: &BigUint, b: &BigUint) -> Result<bool, Rejection> {
    let width = params.scalar_len();
    let a = to_fixed_be(a, width)?;
    let b = to_fixed_be(b, width)?;
    Ok(bool::from(a.ct_eq(&b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyPair, Prover};

    fn toy() -> GroupParameters {
        GroupParameters::from_base(953u32.into(), 7u32.into(), &5u32.into()).unwrap()
    }

    #[test]
    fn verifier_accepts_valid_proof() {
        let params = GroupParameters::rfc5114_2048_256();
        let keypair = KeyPair::generate(&params).unwrap();
        let proof = Prover::new(&params, &keypair).prove(b"payload").unwrap();

        let verifier = Verifier::new(&params, keypair.public_key());
        assert!(verifier.verify(b"payload", &proof));
    }

    #[test]
    fn verifier_rejects_wrong_key() {
        let params = GroupParameters::rfc5114_2048_256();
        let keypair = KeyPair::generate(&params).unwrap();
        let other = KeyPair::generate(&params).unwrap();
        let proof = Prover::new(&params, &keypair).prove(b"payload").unwrap();

        let verifier = Verifier::new(&params, other.public_key());
        assert!(!verifier.verify(b"payload", &proof));
    }

    #[test]
    fn rejects_out_of_range_components() {
        let params = toy();
        let keypair = KeyPair::from_private(&params, 3u32.into()).unwrap();
        let verifier = Verifier::new(&params, keypair.public_key());

        let proof = Prover::new(&params, &keypair).prove(b"hello").unwrap();
        let q = params.order();

        let shifted_c = Proof::new(proof.challenge() + q, proof.response().clone());
        let shifted_z = Proof::new(proof.challenge().clone(), proof.response() + q);

        assert!(matches!(
            verifier.check(b"hello", &shifted_c),
            Err(Rejection::ChallengeOutOfRange)
        ));
        assert!(matches!(
            verifier.check(b"hello", &shifted_z),
            Err(Rejection::ResponseOutOfRange)
        ));
    }

    #[test]
    fn rejects_identity_public_key() {
        let params = toy();
        let json = r#""1""#;
        let identity: PublicKey = serde_json::from_str(json).unwrap();
        let verifier = Verifier::new(&params, &identity);

        for c in 0u32..7 {
            for z in 0u32..7 {
                let proof = Proof::new(c.into(), z.into());
                assert!(!verifier.verify(b"hello", &proof));
            }
        }
    }

    #[test]
    fn rejects_non_member_public_key() {
        let params = toy();
        let outsider: PublicKey = serde_json::from_str(r#""5""#).unwrap();
        let verifier = Verifier::new(&params, &outsider);

        let proof = Proof::new(1u32.into(), 1u32.into());
        assert!(matches!(
            verifier.check(b"hello", &proof),
            Err(Rejection::PublicKey(_))
        ));
    }
}
