use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Address;
use anyhow::{bail, Context};
use clap::Parser;
use risc0_zkvm::is_dev_mode;
use ror_core::{
    generate_rorschach, verify_local, Attestor, BinaryImage, GenerationParameters, Journal,
    LocalReceipt, PrivateKey,
};
use ror_verifier::{
    verify_image_calldata, verify_ownership_calldata, MockSealVerifier, RorschachVerifier,
    VerifierRouter,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    artifacts::{read_receipt, Artifacts},
    attestation::{encode_seal, local_receipt, Groth16SealVerifier, Risc0Attestation},
    keys::{generate_private_key, parse_private_key},
    prover::{ensure_dev_mode_allowed, guest_program_id, Risc0Prover},
    render::{render, RenderOptions, RgbX},
};

mod artifacts;
mod attestation;
#[cfg(feature = "bonsai")]
mod bonsai;
mod error;
mod keys;
mod prover;
mod render;

const UPSCALE: u32 = 8;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output image path; proof artifacts are written next to it
    #[arg(short, long, value_name = "FILE", env = "ROR_OUTPUT", default_value = "./output.png")]
    output: PathBuf,

    /// Turn debugging information on (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[arg(short, long, default_value = "255,0,129")]
    background: RgbX,

    #[arg(short, long, default_value = "255,217,102")]
    color: RgbX,

    /// Steps per walk (derived from the private key if not specified)
    #[arg(short, long, conflicts_with = "prove")]
    steps: Option<u64>,

    /// Number of walks (derived from the private key if not specified)
    #[arg(short, long, conflicts_with = "prove")]
    walks: Option<u64>,

    /// Ethereum private key (hex, with or without 0x prefix)
    #[arg(long, env = "ROR_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Generate a new random private key
    #[arg(long, conflicts_with = "private_key")]
    generate_key: bool,

    /// Disable the private key stamp in the corners
    #[arg(long)]
    no_stamp: bool,

    /// Offset of the corner stamps from the edges
    #[arg(long, default_value_t = 0)]
    stamp_offset: u32,

    /// Generate a ZK proof of the image
    #[arg(long)]
    prove: bool,

    /// Prove with a Groth16 receipt and write an on-chain seal
    #[arg(long, requires = "prove")]
    groth16: bool,

    /// Verify an existing `.proof` file
    #[arg(long, value_name = "PROOF")]
    verify: Option<PathBuf>,

    /// Run the on-chain verifier locally against a `.groth16` seal
    #[arg(long, value_name = "SEAL", requires = "journal")]
    verify_seal: Option<PathBuf>,

    /// Journal matching `--verify-seal`
    #[arg(long, value_name = "JOURNAL")]
    journal: Option<PathBuf>,

    /// Address to check ownership for with `--verify-seal`
    #[arg(long, requires = "verify_seal")]
    claim: Option<Address>,

    /// Accept fake receipts when RISC0_DEV_MODE is set
    #[arg(long)]
    dev_mode: bool,

    /// Convert a succinct `.proof` into a Groth16 receipt on Bonsai
    #[cfg(feature = "bonsai")]
    #[arg(long, value_name = "PROOF")]
    convert: Option<PathBuf>,
}

fn init_tracing(debug: u8) {
    let default = match debug {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    ensure_dev_mode_allowed(cli.dev_mode)?;

    if let Some(proof) = &cli.verify {
        return verify_proof(proof);
    }
    if let Some(seal) = &cli.verify_seal {
        let journal = cli.journal.as_ref().context("--verify-seal needs --journal")?;
        return verify_seal(seal, journal, cli.claim);
    }
    #[cfg(feature = "bonsai")]
    if let Some(proof) = &cli.convert {
        return convert(proof, &Artifacts::new(&cli.output));
    }

    let key = resolve_key(&cli)?;
    let image = if cli.prove {
        prove(&cli, &key)?
    } else {
        let mut params = GenerationParameters::derive(&key);
        if cli.walks.is_none() && cli.steps.is_none() {
            debug!("parameters derived from private key");
        }
        params.walks = cli.walks.unwrap_or(params.walks);
        params.steps = cli.steps.unwrap_or(params.steps);
        info!(walks = params.walks, steps = params.steps, "generating");
        generate_rorschach(&key, params)
    };

    let opts = RenderOptions {
        foreground: cli.color.0,
        background: cli.background.0,
        stamp_offset: (!cli.no_stamp).then_some(cli.stamp_offset),
        scale: UPSCALE,
    };
    render(&image, &key, &opts).save(&cli.output)?;
    println!("Image saved to: {}", cli.output.display());
    Ok(())
}

fn resolve_key(cli: &Cli) -> anyhow::Result<PrivateKey> {
    if let Some(key_hex) = &cli.private_key {
        return Ok(parse_private_key(key_hex)?);
    }
    if cli.generate_key {
        let key = generate_private_key();
        println!("Generated private key: 0x{}", hex::encode(key.as_bytes()));
        println!("Address: {}", key.address()?);
        return Ok(key);
    }
    bail!("must provide --private-key or --generate-key")
}

/// Proves, self-checks and saves the artifacts; returns the committed image.
fn prove(cli: &Cli, key: &PrivateKey) -> anyhow::Result<BinaryImage> {
    let (local, seal) = if cli.groth16 {
        let receipt = Risc0Prover::groth16().prove(key)?;
        (local_receipt(&receipt)?, Some(encode_seal(&receipt)?))
    } else {
        let (journal, proof) = Risc0Prover::succinct().produce(key)?;
        (LocalReceipt { journal, proof }, None)
    };
    let journal = verify_local(&local, &guest_program_id(), &Risc0Attestation)?;

    println!("✓ Proof generated successfully!");
    print_journal(&journal);

    let artifacts = Artifacts::new(&cli.output);
    artifacts.write_receipt(&local)?;
    if let Some(seal) = seal {
        artifacts.write_seal(&seal)?;
        println!(
            "  verifyImage calldata: 0x{}",
            hex::encode(verify_image_calldata(&seal, &local.journal))
        );
    }
    Ok(journal.image)
}

fn verify_proof(path: &Path) -> anyhow::Result<()> {
    info!("Verifying proof...");
    let receipt = read_receipt(path)?;
    let journal = verify_local(&receipt, &guest_program_id(), &Risc0Attestation)?;

    println!("✓ Proof verified successfully!");
    print_journal(&journal);
    Ok(())
}

/// Runs a fresh registry against the seal, as the chain would.
fn verify_seal(seal_path: &Path, journal_path: &Path, claim: Option<Address>) -> anyhow::Result<()> {
    let seal = fs::read(seal_path)?;
    let journal = fs::read(journal_path)?;

    let groth16 = Groth16SealVerifier::default();
    let mut router = VerifierRouter::new().with_route(groth16.selector(), groth16);
    if is_dev_mode() {
        let mock = MockSealVerifier::default();
        router = router.with_route(mock.selector(), mock);
    }
    let mut registry = RorschachVerifier::new(guest_program_id(), router);

    registry.verify_image(&seal, &journal)?;
    let decoded = Journal::decode(&journal)?;
    println!("✓ Seal accepted by verifier {}", registry.image_id());
    print_journal(&decoded);
    println!(
        "  verifyImage calldata: 0x{}",
        hex::encode(verify_image_calldata(&seal, &journal))
    );

    if let Some(claimed) = claim {
        let owns = registry.verify_ownership(&seal, &journal, claimed)?;
        println!("  {claimed} owns image: {owns}");
        println!(
            "  verifyOwnership calldata: 0x{}",
            hex::encode(verify_ownership_calldata(&seal, &journal, claimed))
        );
    }
    Ok(())
}

#[cfg(feature = "bonsai")]
fn convert(path: &Path, artifacts: &Artifacts) -> anyhow::Result<()> {
    let stark: risc0_zkvm::Receipt = bincode::deserialize(&fs::read(path)?)?;
    let snark = bonsai::stark_to_snark(&stark, 3)?;

    let local = local_receipt(&snark)?;
    let journal = verify_local(&local, &guest_program_id(), &Risc0Attestation)?;
    artifacts.write_receipt(&local)?;
    artifacts.write_seal(&encode_seal(&snark)?)?;

    println!("✓ Converted to Groth16");
    print_journal(&journal);
    Ok(())
}

fn print_journal(journal: &Journal) {
    println!("  Address: {}", journal.address);
    println!("  Parameters: walks={}, steps={}", journal.walks, journal.steps);
    println!("  Image hash: {}", journal.image_hash());
    println!("  Foreground pixels: {}", journal.image.count_foreground());
}
