#![no_main]
#![no_std]

extern crate alloc;

use risc0_zkvm::guest::env;
use ror_core::{generate_rorschach, GenerationParameters, Journal, PrivateKey};

risc0_zkvm::guest::entry!(main);

fn main() {
    // Private input; only the derived address is committed.
    let key = PrivateKey::from_bytes(env::read::<[u8; 32]>());
    let address = key.address().expect("invalid private key");

    let params = GenerationParameters::derive(&key);
    let image = generate_rorschach(&key, params);

    let journal = Journal {
        address,
        walks: params.walks,
        steps: params.steps,
        image,
    };
    env::commit_slice(&journal.encode());
}
