//! Hide command - encrypt a message and embed it in a carrier.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use cryptavit::crypto::{load_public_key, CryptoContext};
use cryptavit::{hide, CarrierKind, HideConfig};

use super::{resolve_kind, user_error, CommandExecutor};

/// Encrypt a message for a recipient and hide it in a carrier file.
///
/// Images are written as PNG and audio as WAV. Text carriers keep their
/// visible content; video carriers get the message appended after the
/// container, which is easy to spot for anyone inspecting the file.
#[derive(Args, Debug)]
pub struct HideCommand {
    /// Path to the carrier file
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Carrier type (detected from the extension when omitted)
    #[arg(short = 't', long = "type")]
    pub kind: Option<CarrierKind>,

    /// Text message to hide (reads stdin when neither --message nor --file is given)
    #[arg(short, long, conflicts_with = "file")]
    pub message: Option<String>,

    /// File whose contents should be hidden
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Path to the recipient's public key
    #[arg(short, long)]
    pub key: PathBuf,

    /// Output path for the stego carrier
    #[arg(short, long)]
    pub output: PathBuf,

    /// Low-order bits per channel or sample (1-8, image and audio only)
    #[arg(short, long, default_value_t = 1)]
    pub bits: u8,

    /// Compress the message before encryption
    #[arg(long)]
    pub compress: bool,
}

impl CommandExecutor for HideCommand {
    fn execute(&self) -> Result<()> {
        let kind = resolve_kind(&self.carrier, self.kind)?;
        if let (Some(expected), Some(ext)) = (
            kind.output_extension(),
            self.output.extension().and_then(|e| e.to_str()),
        ) {
            if !ext.eq_ignore_ascii_case(expected) {
                eprintln!(
                    "Warning: {kind} output is always {expected}, but the output path ends in .{ext}"
                );
            }
        }

        let plaintext = self.read_message()?;
        let carrier = fs::read(&self.carrier)
            .with_context(|| format!("Failed to read carrier {}", self.carrier.display()))?;
        let recipient = load_public_key(&self.key)
            .with_context(|| format!("Failed to load public key {}", self.key.display()))?;

        let config = HideConfig::default()
            .with_bits_per_channel(self.bits)
            .with_compression(self.compress);

        let mut ctx = CryptoContext::new();
        let stego = hide(&mut ctx, &carrier, kind, &plaintext, &recipient, &config)
            .map_err(user_error)?;

        fs::write(&self.output, &stego)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        eprintln!(
            "Hid {} bytes in {} carrier: {}",
            plaintext.len(),
            kind,
            self.output.display()
        );

        Ok(())
    }
}

impl HideCommand {
    fn read_message(&self) -> Result<Vec<u8>> {
        let data = if let Some(message) = &self.message {
            message.as_bytes().to_vec()
        } else if let Some(path) = &self.file {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        } else {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read message from stdin")?;
            buffer
        };

        if data.is_empty() {
            bail!("Message is empty");
        }
        Ok(data)
    }
}
