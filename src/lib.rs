//! # Cryptavit - Encrypted messages hidden in ordinary media
//!
//! Cryptavit encrypts a secret for one recipient and hides the result inside an
//! image, a WAV file, a piece of text, or a video container. The carrier looks
//! untouched to a casual observer; the recipient extracts and decrypts it with
//! their private key.
//!
//! ## Pipeline
//!
//! ```text
//! plaintext ─► crypto::encrypt ─► Package::to_bytes ─► Codec::embed ─► stego carrier
//! stego carrier ─► Codec::extract ─► Package::from_bytes ─► crypto::decrypt ─► plaintext
//! ```
//!
//! - **Keys**: RSA 2048/4096, PEM encoded, private key optionally protected
//!   with a passphrase (PKCS#8 PBES2).
//! - **Encryption**: a fresh 256-bit ChaCha20-Poly1305 key per message, wrapped
//!   with RSA-OAEP (SHA-256). Optional DEFLATE compression before encryption.
//! - **Package**: a self-describing binary blob shared by every carrier.
//! - **Carriers**: image LSB, audio LSB, zero-width text, video trailer.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cryptavit::crypto::{CryptoContext, KeyPair, KeySize};
//! use cryptavit::{hide, reveal, CarrierKind, HideConfig, RevealConfig};
//!
//! let mut ctx = CryptoContext::new();
//! let keys = KeyPair::generate(&mut ctx, KeySize::Rsa2048).unwrap();
//!
//! let cover = std::fs::read("cover.png").unwrap();
//! let stego = hide(
//!     &mut ctx,
//!     &cover,
//!     CarrierKind::Image,
//!     b"meet at dawn",
//!     keys.public_key(),
//!     &HideConfig::default(),
//! )
//! .unwrap();
//!
//! let secret = reveal(
//!     &mut ctx,
//!     &stego,
//!     CarrierKind::Image,
//!     keys.private_key(),
//!     &RevealConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(secret, b"meet at dawn");
//! ```
//!
//! ## Modules
//!
//! - [`crypto`]: key management, hybrid encryption, compression
//! - [`package`]: binary package format
//! - [`stego`]: carrier codecs
//! - [`encoder`] / [`decoder`]: full hide/reveal pipelines

/// Package format version.
pub const VERSION: u8 = 1;

pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod package;
pub mod stego;

// Re-export commonly used types at the crate root
pub use crypto::{CipherError, CryptoContext, KeyError, KeyPair, KeySize};
pub use decoder::{reveal, reveal_with_pem, RevealConfig};
pub use encoder::{hide, hide_with_pem, HideConfig};
pub use error::{Error, ErrorKind};
pub use package::{Package, PackageError};
pub use stego::{CarrierCodec, CarrierKind, Codec, StegoError};
