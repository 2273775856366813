//! Reveal pipeline: extract, deserialize, decrypt.
//!
//! Every failure is terminal. A carrier that yields a package which does not
//! parse, or parses but fails authentication, never produces plaintext.

use rand::{CryptoRng, RngCore};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::{decrypt, parse_private_key_pem, CryptoContext};
use crate::error::Error;
use crate::package::Package;
use crate::stego::{CarrierCodec, CarrierKind, Codec};

/// Configuration for revealing a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Must match the rate the message was hidden with.
    pub bits_per_channel: u8,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            bits_per_channel: 1,
        }
    }
}

impl RevealConfig {
    pub fn with_bits_per_channel(mut self, bits: u8) -> Self {
        self.bits_per_channel = bits;
        self
    }
}

/// Extracts the package hidden in `carrier` and decrypts it.
pub fn reveal<R: RngCore + CryptoRng>(
    ctx: &mut CryptoContext<R>,
    carrier: &[u8],
    kind: CarrierKind,
    private_key: &RsaPrivateKey,
    config: &RevealConfig,
) -> Result<Vec<u8>, Error> {
    let package = extract_package(carrier, kind, config)?;
    Ok(decrypt(ctx, &package, private_key)?)
}

/// Same as [`reveal`], with the private key given as PEM text.
pub fn reveal_with_pem<R: RngCore + CryptoRng>(
    ctx: &mut CryptoContext<R>,
    carrier: &[u8],
    kind: CarrierKind,
    private_pem: &str,
    passphrase: Option<&str>,
    config: &RevealConfig,
) -> Result<Vec<u8>, Error> {
    let private_key = parse_private_key_pem(private_pem, passphrase)?;
    reveal(ctx, carrier, kind, &private_key, config)
}

/// Extracts and parses the package without decrypting it.
pub fn extract_package(
    carrier: &[u8],
    kind: CarrierKind,
    config: &RevealConfig,
) -> Result<Package, Error> {
    let codec = Codec::new(kind, config.bits_per_channel)?;
    let payload = codec.extract(carrier)?;

    debug!(
        %kind,
        payload_len = payload.len(),
        bits = config.bits_per_channel,
        "extracted payload"
    );

    Ok(Package::from_bytes(&payload)?)
}
