//! Reveal command - extract and decrypt a hidden message.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cryptavit::crypto::{load_private_key, CryptoContext};
use cryptavit::{reveal, CarrierKind, Error, RevealConfig};

use super::{resolve_kind, user_error, CommandExecutor};

/// Extract and decrypt a message hidden in a carrier file.
///
/// Use -o/--output to write raw bytes to a file (required for binary data).
/// Without -o, the message is written to stdout as is.
#[derive(Args, Debug)]
pub struct RevealCommand {
    /// Path to the stego carrier
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Carrier type (detected from the extension when omitted)
    #[arg(short = 't', long = "type")]
    pub kind: Option<CarrierKind>,

    /// Path to your private key
    #[arg(short, long)]
    pub key: PathBuf,

    /// Passphrase of the private key, if it is encrypted
    #[arg(short, long)]
    pub passphrase: Option<String>,

    /// Bits per channel or sample used when hiding (image and audio only)
    #[arg(short, long, default_value_t = 1)]
    pub bits: u8,

    /// Output file for the revealed data
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for RevealCommand {
    fn execute(&self) -> Result<()> {
        let kind = resolve_kind(&self.carrier, self.kind)?;
        let carrier = fs::read(&self.carrier)
            .with_context(|| format!("Failed to read carrier {}", self.carrier.display()))?;
        let private_key = load_private_key(&self.key, self.passphrase.as_deref())
            .map_err(|e| user_error(Error::from(e)))
            .with_context(|| format!("Failed to load private key {}", self.key.display()))?;

        let config = RevealConfig::default().with_bits_per_channel(self.bits);
        let mut ctx = CryptoContext::new();
        let plaintext =
            reveal(&mut ctx, &carrier, kind, &private_key, &config).map_err(user_error)?;

        match &self.output {
            Some(path) => {
                fs::write(path, &plaintext)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Revealed {} bytes to {}", plaintext.len(), path.display());
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(&plaintext)?;
                if !plaintext.ends_with(b"\n") {
                    writeln!(stdout)?;
                }
            }
        }

        Ok(())
    }
}
