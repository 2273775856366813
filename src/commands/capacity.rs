//! Capacity command - report how much a carrier can hold.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cryptavit::crypto::load_public_key;
use cryptavit::encoder::package_len;
use cryptavit::{CarrierCodec, CarrierKind, Codec, Error};

use super::{resolve_kind, user_error, CommandExecutor};

/// Show the payload capacity of a carrier file.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Path to the carrier file
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Carrier type (detected from the extension when omitted)
    #[arg(short = 't', long = "type")]
    pub kind: Option<CarrierKind>,

    /// Bits per channel or sample (image and audio only)
    #[arg(short, long, default_value_t = 1)]
    pub bits: u8,

    /// Recipient public key; when given, also prints the longest message that fits
    #[arg(short, long)]
    pub key: Option<PathBuf>,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self) -> Result<()> {
        let kind = resolve_kind(&self.carrier, self.kind)?;
        let carrier = fs::read(&self.carrier)
            .with_context(|| format!("Failed to read carrier {}", self.carrier.display()))?;

        let codec = Codec::new(kind, self.bits)
            .map_err(|e| user_error(Error::from(e)))?;
        let capacity = codec
            .capacity(&carrier)
            .map_err(|e| user_error(Error::from(e)))?;

        println!("Carrier: {} ({})", self.carrier.display(), kind);
        if kind.uses_bit_depth() {
            println!("Bits per unit: {}", self.bits);
        }

        let Some(capacity) = capacity else {
            println!("Capacity: unbounded (data is appended after the container)");
            return Ok(());
        };
        println!("Capacity: {capacity} bytes of package data");

        if let Some(key_path) = &self.key {
            let recipient = load_public_key(key_path)
                .with_context(|| format!("Failed to load public key {}", key_path.display()))?;
            let overhead = package_len(&recipient, 0);
            let max_message = capacity.saturating_sub(overhead);
            println!("Package overhead: {overhead} bytes");
            println!("Longest uncompressed message: {max_message} bytes");
        }

        Ok(())
    }
}
