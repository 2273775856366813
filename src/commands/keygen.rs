//! Key generation command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cryptavit::crypto::{CryptoContext, KeyPair, KeySize};

use super::CommandExecutor;

/// Generate a new RSA key pair.
#[derive(Args, Debug)]
pub struct KeygenCommand {
    /// Output path for keys (creates .pub and .key files)
    #[arg(short, long, default_value = "cryptavit")]
    pub output: PathBuf,

    /// Modulus size in bits (2048 or 4096)
    #[arg(short, long, default_value_t = 2048)]
    pub bits: usize,

    /// Encrypt the private key with this passphrase
    #[arg(short, long)]
    pub passphrase: Option<String>,
}

impl CommandExecutor for KeygenCommand {
    fn execute(&self) -> Result<()> {
        let size = KeySize::try_from(self.bits).context("Invalid key size")?;
        let mut ctx = CryptoContext::new();

        let keypair = KeyPair::generate(&mut ctx, size).context("Failed to generate key pair")?;
        keypair
            .save_to_files(&mut ctx, &self.output, self.passphrase.as_deref())
            .context("Failed to save key pair")?;

        let pub_path = self.output.with_extension("pub");
        let key_path = self.output.with_extension("key");

        println!("RSA-{} key pair generated successfully:", size.bits());
        println!();
        println!("  Public key:  {}", pub_path.display());
        println!("  Private key: {}", key_path.display());
        println!();
        println!("Share the public key (.pub) with people who want to send you messages.");
        if self.passphrase.is_some() {
            println!("The private key (.key) is passphrase protected.");
        } else {
            println!("Keep your private key (.key) secret and secure.");
        }

        Ok(())
    }
}
