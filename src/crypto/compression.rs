//! Message compression for Cryptavit.
//!
//! Uses DEFLATE to shrink the plaintext before encryption so longer messages
//! fit in the same carrier. Whether a package is compressed is recorded in the
//! package flags, so the compressed stream carries no marker of its own.

use flate2::read::{DeflateDecoder, DeflateEncoder};
use flate2::Compression;
use std::io::Read;
use thiserror::Error;

/// Upper bound on inflated output. Guards against decompression bombs.
pub const MAX_DECOMPRESSED_SIZE: u64 = 256 * 1024 * 1024;

/// Errors from [`compress`] and [`decompress`].
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("Decompressed data exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Raw DEFLATE at the best compression level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = DeflateEncoder::new(data, Compression::best());
    let mut compressed = Vec::new();

    encoder
        .read_to_end(&mut compressed)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?;

    Ok(compressed)
}

/// Decompresses data that was compressed with [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    // Read one byte past the limit so an oversized stream is detectable
    let mut decoder = DeflateDecoder::new(data).take(MAX_DECOMPRESSED_SIZE + 1);
    let mut decompressed = Vec::new();

    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| CompressionError::DecompressionFailed(e.to_string()))?;

    if decompressed.len() as u64 > MAX_DECOMPRESSED_SIZE {
        return Err(CompressionError::TooLarge {
            limit: MAX_DECOMPRESSED_SIZE,
        });
    }

    Ok(decompressed)
}
