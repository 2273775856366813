//! Hybrid encryption: ChaCha20-Poly1305 payload, RSA-OAEP wrapped key.
//!
//! 1. Optionally compress the plaintext (DEFLATE)
//! 2. Draw a fresh 256-bit key and 96-bit nonce
//! 3. Seal with ChaCha20-Poly1305 (AAD = package header)
//! 4. Wrap the key for the recipient with RSA-OAEP (SHA-256)
//!
//! Decryption never tells the caller whether the key unwrap or the tag check
//! failed; both surface as [`CipherError::DecryptionFailure`].

use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce, Tag};
use rand::{CryptoRng, RngCore};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use super::compression::{compress, decompress, CompressionError};
use super::keys::{parse_private_key_pem, parse_public_key_pem};
use super::CryptoContext;
use crate::error::Error;
use crate::package::{Package, FLAG_COMPRESSED, NONCE_SIZE, TAG_SIZE};

/// Symmetric key size (ChaCha20-Poly1305).
pub const SYMMETRIC_KEY_SIZE: usize = 32;

/// Errors returned by [`encrypt`] and [`decrypt`].
#[derive(Error, Debug)]
pub enum CipherError {
    /// Wrong key, tampered or truncated package.
    #[error("Decryption failed")]
    DecryptionFailure,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Compression error: {0}")]
    Compression(#[from] CompressionError),
}

/// Where unsealing went wrong. Only ever logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnsealError {
    KeyUnwrap,
    AuthenticationFailure,
}

impl std::fmt::Display for UnsealError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsealError::KeyUnwrap => write!(f, "key unwrap"),
            UnsealError::AuthenticationFailure => write!(f, "tag verification"),
        }
    }
}

/// Encrypts `plaintext` for the holder of `recipient`'s private key.
pub fn encrypt<R: RngCore + CryptoRng>(
    ctx: &mut CryptoContext<R>,
    plaintext: &[u8],
    recipient: &RsaPublicKey,
    compress_plaintext: bool,
) -> Result<Package, CipherError> {
    let (flags, mut buffer) = if compress_plaintext {
        (FLAG_COMPRESSED, compress(plaintext)?)
    } else {
        (0, plaintext.to_vec())
    };

    let mut key = Zeroizing::new([0u8; SYMMETRIC_KEY_SIZE]);
    ctx.fill_bytes(key.as_mut());
    let mut nonce = [0u8; NONCE_SIZE];
    ctx.fill_bytes(&mut nonce);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_ref()));
    let tag = cipher
        .encrypt_in_place_detached(
            Nonce::from_slice(&nonce),
            &Package::associated_data(flags),
            &mut buffer,
        )
        .map_err(|e| CipherError::Encryption(e.to_string()))?;
    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(&tag);

    let wrapped_key = recipient
        .encrypt(ctx.rng(), Oaep::new::<Sha256>(), key.as_ref())
        .map_err(|e| CipherError::Encryption(e.to_string()))?;

    debug!(
        plaintext_len = plaintext.len(),
        ciphertext_len = buffer.len(),
        compressed = compress_plaintext,
        "sealed package"
    );

    Ok(Package::new(flags, wrapped_key, nonce, tag_bytes, buffer))
}

/// Encrypts for a recipient given as PEM text.
pub fn encrypt_with_pem<R: RngCore + CryptoRng>(
    ctx: &mut CryptoContext<R>,
    plaintext: &[u8],
    recipient_pem: &str,
    compress_plaintext: bool,
) -> Result<Package, Error> {
    let recipient = parse_public_key_pem(recipient_pem)?;
    Ok(encrypt(ctx, plaintext, &recipient, compress_plaintext)?)
}

/// Decrypts a package with the recipient's private key.
pub fn decrypt<R: RngCore + CryptoRng>(
    ctx: &mut CryptoContext<R>,
    package: &Package,
    private_key: &RsaPrivateKey,
) -> Result<Vec<u8>, CipherError> {
    let mut body = unseal(ctx, package, private_key).map_err(|stage| {
        debug!(%stage, "package rejected");
        CipherError::DecryptionFailure
    })?;

    if package.is_compressed() {
        Ok(decompress(&body)?)
    } else {
        Ok(std::mem::take(&mut *body))
    }
}

/// Decrypts with a PEM private key, optionally passphrase protected.
pub fn decrypt_with_pem<R: RngCore + CryptoRng>(
    ctx: &mut CryptoContext<R>,
    package: &Package,
    private_pem: &str,
    passphrase: Option<&str>,
) -> Result<Vec<u8>, Error> {
    let private_key = parse_private_key_pem(private_pem, passphrase)?;
    Ok(decrypt(ctx, package, &private_key)?)
}

fn unseal<R: RngCore + CryptoRng>(
    ctx: &mut CryptoContext<R>,
    package: &Package,
    private_key: &RsaPrivateKey,
) -> Result<Zeroizing<Vec<u8>>, UnsealError> {
    // On unwrap failure the tag is still checked, under a random key, so both
    // failure paths cost the same.
    let mut key = Zeroizing::new([0u8; SYMMETRIC_KEY_SIZE]);
    ctx.fill_bytes(key.as_mut());

    let unwrapped = private_key
        .decrypt_blinded(ctx.rng(), Oaep::new::<Sha256>(), package.wrapped_key())
        .map(Zeroizing::new);
    let unwrap_ok = match &unwrapped {
        Ok(bytes) if bytes.len() == SYMMETRIC_KEY_SIZE => {
            key.copy_from_slice(bytes);
            true
        }
        _ => false,
    };

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_ref()));
    let mut buffer = Zeroizing::new(package.ciphertext().to_vec());
    let verified = cipher.decrypt_in_place_detached(
        Nonce::from_slice(package.nonce()),
        &Package::associated_data(package.flags()),
        &mut buffer,
        Tag::from_slice(package.tag()),
    );

    match (unwrap_ok, verified) {
        (false, _) => Err(UnsealError::KeyUnwrap),
        (true, Err(_)) => Err(UnsealError::AuthenticationFailure),
        (true, Ok(())) => Ok(buffer),
    }
}
