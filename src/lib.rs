//! Non-interactive discrete-log proofs of knowledge.
//!
//! A prover holding `x` with `y = g^x mod p` produces a proof `(c, z)` bound
//! to a message. Anyone with the group parameters and `y` can check it.
//!
//! ```rust
//! let params = devirgo::setup(64).unwrap();
//! let keypair = devirgo::keygen(&params).unwrap();
//!
//! let proof = devirgo::prove(&params, &keypair, b"hello").unwrap();
//! assert!(devirgo::verify(&params, keypair.public_key(), b"hello", &proof));
//! assert!(!devirgo::verify(&params, keypair.public_key(), b"hellp", &proof));
//! ```
//!
//! Small bit lengths are for experiments only. Use at least 2048 bits, or
//! [`GroupParameters::rfc5114_2048_256`], for anything else.

#![forbid(unsafe_code)]

use rand_core::CryptoRngCore;

/// Group setup configuration.
pub mod config;
/// Error types.
pub mod error;
/// Core cryptographic primitives.
pub mod primitives;
/// Proof generation and verification.
pub mod protocol;
/// Serde helpers.
pub mod serialize;

pub use config::SetupConfig;
pub use error::Error;
pub use primitives::{
    hash_to_int, GroupParameters, KeyPair, PrivateKey, Proof, PublicKey, SecureRng, Transcript,
};
pub use protocol::{Prover, Verifier};

/// Result type for this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Generates group parameters with a `bit_length`-bit modulus.
///
/// # Errors
///
/// - [`Error::InvalidParams`] if `bit_length` is outside the supported range
/// - [`Error::ParameterGeneration`] if no group is found within the search bounds
/// - [`Error::EntropyUnavailable`] if the system random source fails
pub fn setup(bit_length: usize) -> Result<GroupParameters> {
    GroupParameters::generate(bit_length)
}

/// Generates group parameters according to `config`.
pub fn setup_with_config(config: &SetupConfig) -> Result<GroupParameters> {
    GroupParameters::generate_with_config(config)
}

/// Generates group parameters with a caller-provided random source.
pub fn setup_with_rng<R: CryptoRngCore + ?Sized>(
    config: &SetupConfig,
    rng: &mut R,
) -> Result<GroupParameters> {
    GroupParameters::generate_with_rng(config, rng)
}

/// Generates a key pair for `params`.
pub fn keygen(params: &GroupParameters) -> Result<KeyPair> {
    KeyPair::generate(params)
}

/// Generates a key pair with a caller-provided random source.
pub fn keygen_with_rng<R: CryptoRngCore + ?Sized>(
    params: &GroupParameters,
    rng: &mut R,
) -> Result<KeyPair> {
    KeyPair::generate_with_rng(params, rng)
}

/// Proves knowledge of the private key in `keypair`, bound to `message`.
pub fn prove(params: &GroupParameters, keypair: &KeyPair, message: &[u8]) -> Result<Proof> {
    Prover::new(params, keypair).prove(message)
}

/// Checks `proof` for `message` against `public_key`.
pub fn verify(
    params: &GroupParameters,
    public_key: &PublicKey,
    message: &[u8],
    proof: &Proof,
) -> bool {
    Verifier::new(params, public_key).verify(message, proof)
}
