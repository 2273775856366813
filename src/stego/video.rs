//! Video fallback: append the payload after the container.
//!
//! Video streams are not decoded, so no redundancy inside the stream is used.
//! The payload is written after the last byte of the file, behind a fixed
//! 32-byte delimiter and a big-endian length:
//!
//! ```text
//! [original container bytes][DELIMITER][u32 payload len][payload]
//! ```
//!
//! A trailer is only accepted where its length field reaches exactly to the
//! end of the file, so a payload that itself contains the delimiter is still
//! recovered whole, and hiding again in a stego file yields the newest payload.
//!
//! This is a weaker guarantee than the LSB codecs: the file grows by the
//! payload size and the trailer is plainly visible to anyone who inspects the
//! file structure. Most players ignore bytes past the end of the container.

use tracing::warn;

use super::StegoError;

/// Marks the start of the trailer. Random-looking so real container data is
/// unlikely to contain it.
pub const DELIMITER: [u8; 32] = [
    0x00, 0x43, 0x41, 0x56, 0x2D, 0x54, 0x52, 0x4C, 0xE3, 0x9A, 0x1F, 0x77, 0xC4, 0x08, 0x5B,
    0xD2, 0x6E, 0xA1, 0x33, 0xF9, 0x90, 0x2C, 0x4D, 0xB7, 0x15, 0x8E, 0x62, 0xCA, 0x07, 0xFD,
    0x58, 0x00,
];

/// Delimiter plus the 4-byte length field.
pub const TRAILER_OVERHEAD: usize = DELIMITER.len() + 4;

/// Appends `payload` to `carrier`.
pub fn embed(carrier: &[u8], payload: &[u8]) -> Result<Vec<u8>, StegoError> {
    let len = u32::try_from(payload.len()).map_err(|_| StegoError::CapacityExceeded {
        needed: payload.len(),
        available: u32::MAX as usize,
    })?;

    warn!(
        carrier_len = carrier.len(),
        payload_len = payload.len(),
        "video fallback appends a detectable trailer"
    );

    let mut output = Vec::with_capacity(carrier.len() + TRAILER_OVERHEAD + payload.len());
    output.extend_from_slice(carrier);
    output.extend_from_slice(&DELIMITER);
    output.extend_from_slice(&len.to_be_bytes());
    output.extend_from_slice(payload);
    Ok(output)
}

/// Returns the payload of the trailer in `carrier`.
pub fn extract(carrier: &[u8]) -> Result<Vec<u8>, StegoError> {
    let start = locate_trailer(carrier).ok_or(StegoError::NoHiddenData)?;
    Ok(carrier[start + TRAILER_OVERHEAD..].to_vec())
}

/// Returns the original carrier bytes with any trailer removed.
pub fn strip(carrier: &[u8]) -> &[u8] {
    match locate_trailer(carrier) {
        Some(start) => &carrier[..start],
        None => carrier,
    }
}

/// Offset of the first delimiter whose length field ends exactly at EOF.
fn locate_trailer(carrier: &[u8]) -> Option<usize> {
    carrier
        .windows(DELIMITER.len())
        .enumerate()
        .filter(|(_, window)| *window == DELIMITER)
        .map(|(start, _)| start)
        .find(|&start| {
            let body = start + TRAILER_OVERHEAD;
            let Some(len_bytes) = carrier.get(start + DELIMITER.len()..body) else {
                return false;
            };
            let mut len = [0u8; 4];
            len.copy_from_slice(len_bytes);
            carrier.len() - body == u32::from_be_bytes(len) as usize
        })
}
