use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::primitives::crypto::field::{mod_mul_add, wipe};
use crate::primitives::crypto::rng::random_scalar;
use crate::{
    hash_to_int, GroupParameters, KeyPair, Proof, PublicKey, Result, SecureRng, Transcript,
};

/// Prover for the deVirgo zero-knowledge protocol.
///
/// Generates non-interactive proofs that the holder of `keypair` knows `x`
/// with `y = g^x mod p`, bound to a message, without revealing `x`.
///
/// # Security
///
/// - Every proof draws a fresh nonce from [`SecureRng`]; the nonce never leaves this module
/// - Reusing a nonce across two proofs reveals the private key, so no API accepts one
pub struct Prover<'a> {
    params: &'a GroupParameters,
    keypair: &'a KeyPair,
}

impl<'a> Prover<'a> {
    /// Creates a prover over `params` for `keypair`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use devirgo::{GroupParameters, KeyPair, Prover, Verifier};
    ///
    /// let params = GroupParameters::rfc5114_2048_256();
    /// let keypair = KeyPair::generate(&params).unwrap();
    ///
    /// let proof = Prover::new(&params, &keypair).prove(b"hello").unwrap();
    /// assert!(Verifier::new(&params, keypair.public_key()).verify(b"hello", &proof));
    /// ```
    pub fn new(params: &'a GroupParameters, keypair: &'a KeyPair) -> Self {
        Self { params, keypair }
    }

    /// Returns the public key the proofs are checked against.
    pub fn public_key(&self) -> &PublicKey {
        self.keypair.public_key()
    }

    /// Generates a proof bound to `message`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`](crate::Error::EntropyUnavailable) if the
    /// system random source fails.
    pub fn prove(&self, message: &[u8]) -> Result<Proof> {
        let mut rng = SecureRng::new();
        self.prove_with_rng(message, &mut rng)
    }

    pub(crate) fn prove_with_rng<R: CryptoRngCore + ?Sized>(
        &self,
        message: &[u8],
        rng: &mut R,
    ) -> Result<Proof> {
        let proof = Session::start(self, message)?
            .commit(rng)?
            .challenge()?
            .respond()?
            .finish();
        Ok(proof)
    }
}

/// Secret nonce `k` used in the commitment phase.
///
/// Not `Clone`; moved through the session and zeroized when dropped.
struct Nonce(BigUint);

impl Zeroize for Nonce {
    fn zeroize(&mut self) {
        wipe(&mut self.0);
    }
}

impl Drop for Nonce {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for Nonce {}

/// Message hashed into the exponent `m`.
struct Init {
    m: BigUint,
}

/// `r = g^k` and `t = g^m` computed; the nonce is still live.
struct CommitmentsComputed {
    nonce: Nonce,
    r: BigUint,
    t: BigUint,
}

/// Challenge derived from the transcript.
struct ChallengeComputed {
    nonce: Nonce,
    challenge: BigUint,
}

/// Response computed; the nonce has been dropped.
struct ResponseComputed {
    challenge: BigUint,
    response: BigUint,
}

/// One proof run. Each step consumes the previous state.
struct Session<'p, 'a, S> {
    prover: &'p Prover<'a>,
    state: S,
}

impl<'p, 'a> Session<'p, 'a, Init> {
    fn start(prover: &'p Prover<'a>, message: &[u8]) -> Result<Self> {
        let m = hash_to_int(message, prover.params.order())?;
        Ok(Self {
            prover,
            state: Init { m },
        })
    }

    fn commit<R: CryptoRngCore + ?Sized>(
        self,
        rng: &mut R,
    ) -> Result<Session<'p, 'a, CommitmentsComputed>> {
        let nonce = Nonce(random_scalar(rng, self.prover.params.order())?);
        Ok(self.commit_with_nonce(nonce))
    }

    fn commit_with_nonce(self, nonce: Nonce) -> Session<'p, 'a, CommitmentsComputed> {
        let params = self.prover.params;
        let r = params.pow_g(&nonce.0);
        let t = params.pow_g(&self.state.m);

        Session {
            prover: self.prover,
            state: CommitmentsComputed { nonce, r, t },
        }
    }
}

impl<'p, 'a> Session<'p, 'a, CommitmentsComputed> {
    fn challenge(self) -> Result<Session<'p, 'a, ChallengeComputed>> {
        let CommitmentsComputed { nonce, r, t } = self.state;

        let mut transcript = Transcript::new(self.prover.params);
        transcript.append_commitment(&r);
        transcript.append_message_binding(&t);
        let challenge = transcript.challenge_scalar()?;

        Ok(Session {
            prover: self.prover,
            state: ChallengeComputed { nonce, challenge },
        })
    }
}

impl<'p, 'a> Session<'p, 'a, ChallengeComputed> {
    fn respond(self) -> Result<Session<'p, 'a, ResponseComputed>> {
        let ChallengeComputed { nonce, challenge } = self.state;
        let x = self.prover.keypair.private_key().secret();

        // z = (k + x * c) mod q
        let response = mod_mul_add(&nonce.0, x, &challenge, self.prover.params.order())?;
        drop(nonce);

        Ok(Session {
            prover: self.prover,
            state: ResponseComputed {
                challenge,
                response,
            },
        })
    }
}

impl Session<'_, '_, ResponseComputed> {
    fn finish(self) -> Proof {
        Proof::new(self.state.challenge, self.state.response)
    }
}
