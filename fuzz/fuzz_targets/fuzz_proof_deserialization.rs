#![no_main]

use devirgo::{GroupParameters, Proof, PublicKey};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let params = GroupParameters::rfc5114_2048_256();

    if let Ok(proof) = Proof::from_bytes(&params, data) {
        let public_key = PublicKey::new(&params, params.generator().clone())
            .unwrap_or_else(|e| panic!("generator is a valid public key: {e}"));
        let _ = devirgo::verify(&params, &public_key, b"fuzz", &proof);
    }
});
