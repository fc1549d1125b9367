//! Basic usage example of deVirgo proofs.
//!
//! This example demonstrates:
//! - Building the small `p = 953, q = 7` group from base 5
//! - Proving knowledge of `x = 3` bound to the message "hello"
//! - Rejecting the same proof for "hellp"
//! - The same flow over the RFC 5114 2048-bit group with byte encoding

use devirgo::{GroupParameters, KeyPair, Proof, Prover, Verifier};

fn main() {
    println!("deVirgo Proof of Knowledge: Basic Example\n");

    println!("Step 1: Build the toy group");
    let toy = GroupParameters::from_base(953u32.into(), 7u32.into(), &5u32.into())
        .expect("toy group should be valid");
    println!(
        "  p = {}, q = {}, g = 5^((p-1)/q) = {}\n",
        toy.modulus(),
        toy.order(),
        toy.generator()
    );

    println!("Step 2: Derive the key pair for x = 3");
    let keypair = KeyPair::from_private(&toy, 3u32.into()).expect("3 is in [1, q - 1]");
    println!("  y = g^x = {}\n", keypair.public_key().element());

    println!("Step 3: Prove and verify");
    let proof = Prover::new(&toy, &keypair)
        .prove(b"hello")
        .expect("Proof generation should succeed");
    println!("  c = {}, z = {}", proof.challenge(), proof.response());

    let verifier = Verifier::new(&toy, keypair.public_key());
    println!("  verify(\"hello\") = {}", verifier.verify(b"hello", &proof));
    println!("  verify(\"hellp\") = {}\n", verifier.verify(b"hellp", &proof));

    println!("Step 4: Repeat over the RFC 5114 group");
    let params = GroupParameters::rfc5114_2048_256();
    let keypair = KeyPair::generate(&params).expect("Keygen should succeed");
    let proof =
        devirgo::prove(&params, &keypair, b"hello").expect("Proof generation should succeed");

    let bytes = proof.to_bytes(&params).expect("Serialization should succeed");
    println!("  Proof size: {} bytes", bytes.len());

    let received = Proof::from_bytes(&params, &bytes).expect("Deserialization should succeed");
    if devirgo::verify(&params, keypair.public_key(), b"hello", &received) {
        println!("  Proof is VALID");
    } else {
        println!("  Proof is INVALID");
    }

    println!("\nThe verifier is convinced that the prover knows x");
    println!("without learning anything about the value of x.");
}
