/// Proof generation.
pub mod prover;
/// Proof verification.
pub mod verifier;

pub use prover::Prover;
pub use verifier::Verifier;
