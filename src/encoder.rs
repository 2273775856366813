//! Hide pipeline: encrypt, serialize, embed.
//!
//! 1. Encrypt the plaintext for the recipient (optionally compressed first)
//! 2. Serialize the resulting [`Package`]
//! 3. Embed the package bytes in the carrier with the codec for its kind

use rand::{CryptoRng, RngCore};
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::{encrypt, parse_public_key_pem, CryptoContext};
use crate::error::Error;
use crate::package::Package;
use crate::stego::{CarrierCodec, CarrierKind, Codec};

/// Configuration for hiding a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HideConfig {
    /// Low-order bits used per image channel or audio sample (1-8).
    /// Ignored by the text and video codecs.
    pub bits_per_channel: u8,
    /// Compress the plaintext before encryption.
    pub compress: bool,
}

impl Default for HideConfig {
    fn default() -> Self {
        Self {
            bits_per_channel: 1,
            compress: false,
        }
    }
}

impl HideConfig {
    pub fn with_bits_per_channel(mut self, bits: u8) -> Self {
        self.bits_per_channel = bits;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Encrypts `plaintext` for `recipient` and hides it in `carrier`.
///
/// Returns the stego carrier bytes: PNG for images, WAV for audio, UTF-8 text
/// for text and the original container plus trailer for video.
pub fn hide<R: RngCore + CryptoRng>(
    ctx: &mut CryptoContext<R>,
    carrier: &[u8],
    kind: CarrierKind,
    plaintext: &[u8],
    recipient: &RsaPublicKey,
    config: &HideConfig,
) -> Result<Vec<u8>, Error> {
    // Validate the rate before paying for the RSA operation
    let codec = Codec::new(kind, config.bits_per_channel)?;

    let package = encrypt(ctx, plaintext, recipient, config.compress)?;
    let payload = package.to_bytes();

    debug!(
        %kind,
        plaintext_len = plaintext.len(),
        package_len = payload.len(),
        bits = config.bits_per_channel,
        "hiding package"
    );

    Ok(codec.embed(carrier, &payload)?)
}

/// Same as [`hide`], with the recipient given as PEM text.
pub fn hide_with_pem<R: RngCore + CryptoRng>(
    ctx: &mut CryptoContext<R>,
    carrier: &[u8],
    kind: CarrierKind,
    plaintext: &[u8],
    recipient_pem: &str,
    config: &HideConfig,
) -> Result<Vec<u8>, Error> {
    let recipient = parse_public_key_pem(recipient_pem)?;
    hide(ctx, carrier, kind, plaintext, &recipient, config)
}

/// Size in bytes of the package that [`hide`] would embed for an
/// uncompressed message of `plaintext_len` bytes.
pub fn package_len(recipient: &RsaPublicKey, plaintext_len: usize) -> usize {
    Package::serialized_len(recipient.size(), plaintext_len)
}
