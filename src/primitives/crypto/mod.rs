/// Modular arithmetic helpers over `BigUint`.
pub mod field;
/// Hash-to-integer mapping.
pub mod hash;
/// Probabilistic primality testing.
pub mod prime;
/// Cryptographically secure random number generation.
pub mod rng;

pub use hash::hash_to_int;
pub use rng::SecureRng;
