//! Core cryptographic primitives for deVirgo proofs.
//!
//! - **crypto**: Modular arithmetic, hashing, primality, and secure randomness
//! - **groups**: Prime-order subgroups of `Z_p^*` and their generation
//! - **gadgets**: Keys and proofs
//! - **transcript**: Fiat-Shamir challenge derivation

/// Arithmetic, hashing, primality, and randomness.
pub mod crypto;
/// Key pairs and proofs.
pub mod gadgets;
/// Discrete-log group parameters.
pub mod groups;
/// Transcript for Fiat-Shamir transform.
pub mod transcript;

pub use crypto::{hash_to_int, SecureRng};
pub use gadgets::{KeyPair, PrivateKey, Proof, PublicKey};
pub use groups::GroupParameters;
pub use transcript::Transcript;
