//! Common test utilities shared across integration tests.

use devirgo::{GroupParameters, KeyPair};

/// Initialize test tracing (call once at the beginning of tests).
///
/// Shows debug output from the library, including verifier rejection reasons.
/// Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("devirgo=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// The `p = 953, q = 7` group with its generator projected from base 5.
pub fn toy_params() -> GroupParameters {
    GroupParameters::from_base(953u32.into(), 7u32.into(), &5u32.into())
        .expect("toy group should be valid")
}

/// The toy group with private key `x = 3`.
pub fn toy_keypair(params: &GroupParameters) -> KeyPair {
    KeyPair::from_private(params, 3u32.into()).expect("3 is in [1, q - 1]")
}
