//! Cryptavit - Encrypted messages hidden in ordinary media
//!
//! A CLI tool for hybrid RSA/ChaCha20-Poly1305 encryption combined with image,
//! audio, text and video steganography.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CapacityCommand, CommandExecutor, HideCommand, KeygenCommand, RevealCommand};

/// Cryptavit - Encrypted messages hidden in ordinary media
///
/// Encrypts a message for one recipient and hides it inside an image, a WAV
/// file, a piece of text or a video file.
#[derive(Parser)]
#[command(name = "cryptavit")]
#[command(version)]
#[command(about = "Hide encrypted messages in images, audio, text and video")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new RSA key pair
    Keygen(KeygenCommand),

    /// Encrypt a message and hide it in a carrier
    Hide(HideCommand),

    /// Extract and decrypt a hidden message
    Reveal(RevealCommand),

    /// Show how much data a carrier can hold
    Capacity(CapacityCommand),
}

impl Commands {
    fn executor(&self) -> &dyn CommandExecutor {
        match self {
            Commands::Keygen(cmd) => cmd,
            Commands::Hide(cmd) => cmd,
            Commands::Reveal(cmd) => cmd,
            Commands::Capacity(cmd) => cmd,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    cli.command.executor().execute()
}
