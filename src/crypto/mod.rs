//! Cryptographic operations for Cryptavit.
//!
//! This module provides:
//! - RSA key generation and PEM (de)serialization, optionally passphrase protected
//! - Hybrid encryption (ChaCha20-Poly1305 + RSA-OAEP key wrapping)
//! - Message compression (DEFLATE)
//! - An explicit randomness capability ([`CryptoContext`])

pub mod compression;
pub mod hybrid;
pub mod keys;

pub use compression::{compress, decompress, CompressionError};
pub use hybrid::{decrypt, decrypt_with_pem, encrypt, encrypt_with_pem, CipherError};
pub use keys::{
    generate_key_pair, load_private_key, load_public_key, parse_private_key_pem,
    parse_public_key_pem, KeyError, KeyPair, KeySize,
};

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Source of randomness for key generation and encryption.
///
/// Every operation that consumes randomness takes the context explicitly, so
/// tests can swap the OS generator for a seeded one. A context is not shared
/// between threads; create one per worker (they are cheap for [`OsRng`]).
pub struct CryptoContext<R = OsRng> {
    rng: R,
}

impl CryptoContext<OsRng> {
    /// Creates a context backed by the operating system CSPRNG.
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl Default for CryptoContext<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoContext<ChaCha20Rng> {
    /// Creates a deterministic context. Only meant for tests and reproducible fixtures.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl<R: RngCore + CryptoRng> CryptoContext<R> {
    /// Wraps an arbitrary cryptographically secure generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the underlying generator.
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Fills `buf` with random bytes.
    pub fn fill_bytes(&mut self, buf: &mut [u8]) {
        self.rng.fill_bytes(buf);
    }
}

impl<R> std::fmt::Debug for CryptoContext<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoContext")
            .field("rng", &std::any::type_name::<R>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::tests::test_keypair;

    /// Seeded generator that counts how many bytes were drawn from it.
    struct CountingRng {
        inner: ChaCha20Rng,
        drawn: usize,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.drawn += 4;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.drawn += 8;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.drawn += dest.len();
            self.inner.fill_bytes(dest);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.drawn += dest.len();
            self.inner.try_fill_bytes(dest)
        }
    }

    impl CryptoRng for CountingRng {}

    #[test]
    fn test_seeded_context_is_deterministic() {
        let mut a = CryptoContext::seeded(7);
        let mut b = CryptoContext::seeded(7);

        let mut buf_a = [0u8; 32];
        let mut buf_b = [0u8; 32];
        a.fill_bytes(&mut buf_a);
        b.fill_bytes(&mut buf_b);

        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = CryptoContext::seeded(1);
        let mut b = CryptoContext::seeded(2);

        let mut buf_a = [0u8; 32];
        let mut buf_b = [0u8; 32];
        a.fill_bytes(&mut buf_a);
        b.fill_bytes(&mut buf_b);

        assert_ne!(buf_a, buf_b);
    }

    #[test]
    fn test_os_context_produces_fresh_bytes() {
        let mut ctx = CryptoContext::new();
        let mut first = [0u8; 32];
        let mut second = [0u8; 32];
        ctx.fill_bytes(&mut first);
        ctx.fill_bytes(&mut second);

        assert_ne!(first, second);
    }

    #[test]
    fn test_injected_rng_drives_encryption() {
        let kp = test_keypair();
        let mut ctx = CryptoContext::with_rng(CountingRng {
            inner: ChaCha20Rng::seed_from_u64(5),
            drawn: 0,
        });

        let package = encrypt(&mut ctx, b"injected", kp.public_key(), false).unwrap();

        // Message key and nonce come first, then the OAEP seed
        assert!(ctx.rng().drawn > 32 + 12);

        let mut expected = [0u8; 44];
        ChaCha20Rng::seed_from_u64(5).fill_bytes(&mut expected);
        assert_eq!(package.nonce(), &expected[32..]);

        let plaintext = decrypt(&mut ctx, &package, kp.private_key()).unwrap();
        assert_eq!(plaintext, b"injected");
    }
}
