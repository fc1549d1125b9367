use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use devirgo::{Error, GroupParameters, KeyPair, Proof, PublicKey, SetupConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "devirgo")]
#[command(about = "deVirgo discrete-log proofs of knowledge", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate group parameters
    Setup {
        /// Modulus size in bits (overrides DEVIRGO_MODULUS_BITS and the config file)
        #[arg(short, long)]
        bits: Option<usize>,

        /// Build a safe-prime group (p = 2q + 1)
        #[arg(long)]
        safe_prime: bool,

        #[arg(short, long, default_value = "params.json")]
        out: PathBuf,
    },

    /// Generate a key pair
    Keygen {
        #[arg(short, long, default_value = "params.json")]
        params: PathBuf,

        #[arg(short, long, default_value = "key.json")]
        out: PathBuf,

        /// Also write the public key alone to this file
        #[arg(long)]
        public_out: Option<PathBuf>,
    },

    /// Prove knowledge of the private key, bound to a message
    Prove {
        #[arg(short, long, default_value = "params.json")]
        params: PathBuf,

        #[arg(short, long, default_value = "key.json")]
        key: PathBuf,

        #[arg(short, long)]
        message: String,

        #[arg(short, long, default_value = "proof.json")]
        out: PathBuf,

        /// Print the binary proof encoding as hex
        #[arg(long)]
        hex: bool,
    },

    /// Verify a proof; exits with status 1 if it is rejected
    Verify {
        #[arg(short, long, default_value = "params.json")]
        params: PathBuf,

        /// Public key file, or a key pair file
        #[arg(long)]
        public_key: PathBuf,

        #[arg(short, long)]
        message: String,

        /// Proof as JSON or as hex of the binary encoding
        #[arg(long, default_value = "proof.json")]
        proof: PathBuf,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let data = fs::read_to_string(path)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;
    Ok(serde_json::from_str(&data)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
    let data = serde_json::to_string_pretty(value)?;
    fs::write(path, data).map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))
}

fn read_public_key(path: &Path) -> Result<PublicKey, Error> {
    let data = fs::read_to_string(path)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;

    match serde_json::from_str::<PublicKey>(&data) {
        Ok(key) => Ok(key),
        Err(_) => {
            let keypair: KeyPair = serde_json::from_str(&data)?;
            Ok(keypair.public_key().clone())
        }
    }
}

fn read_proof(path: &Path, params: &GroupParameters) -> Result<Proof, Error> {
    let data = fs::read_to_string(path)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;
    let data = data.trim();

    if data.starts_with('{') {
        return Ok(serde_json::from_str(data)?);
    }

    let bytes = hex::decode(data).map_err(|e| Error::InvalidProof(e.to_string()))?;
    Proof::from_bytes(params, &bytes)
}

fn run(command: Commands) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Commands::Setup {
            bits,
            safe_prime,
            out,
        } => {
            let mut config = SetupConfig::from_env()?;
            if let Some(bits) = bits {
                config.modulus_bits = bits;
            }
            if safe_prime {
                config.safe_prime = true;
                config.order_bits = None;
            }

            if config.modulus_bits < 2048 {
                warn!(
                    modulus_bits = config.modulus_bits,
                    "modulus below 2048 bits is not secure"
                );
            }

            let params = devirgo::setup_with_config(&config)?;
            write_json(&out, &params)?;
            info!(path = %out.display(), "wrote group parameters");
        }

        Commands::Keygen {
            params,
            out,
            public_out,
        } => {
            let params: GroupParameters = read_json(&params)?;
            let keypair = devirgo::keygen(&params)?;

            write_json(&out, &keypair)?;
            info!(path = %out.display(), "wrote key pair; keep this file private");

            if let Some(public_out) = public_out {
                write_json(&public_out, keypair.public_key())?;
                info!(path = %public_out.display(), "wrote public key");
            }
        }

        Commands::Prove {
            params,
            key,
            message,
            out,
            hex,
        } => {
            let params: GroupParameters = read_json(&params)?;
            let keypair: KeyPair = read_json(&key)?;
            keypair.validate(&params)?;

            let proof = devirgo::prove(&params, &keypair, message.as_bytes())?;
            write_json(&out, &proof)?;
            info!(path = %out.display(), "wrote proof");

            if hex {
                println!("{}", hex::encode(proof.to_bytes(&params)?));
            }
        }

        Commands::Verify {
            params,
            public_key,
            message,
            proof,
        } => {
            let params: GroupParameters = read_json(&params)?;
            let public_key = read_public_key(&public_key)?;
            let proof = read_proof(&proof, &params)?;

            let accepted = devirgo::verify(&params, &public_key, message.as_bytes(), &proof);
            println!("{}", if accepted { "accepted" } else { "rejected" });
            return Ok(accepted);
        }
    }

    Ok(true)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(2)
        }
    }
}
