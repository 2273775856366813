//! Zero-width character steganography for text.
//!
//! Every bit becomes one invisible code point:
//! - `U+200B` ZERO WIDTH SPACE = 0
//! - `U+200C` ZERO WIDTH NON-JOINER = 1
//!
//! A 32-bit big-endian byte count precedes the payload bits, written with the
//! same two characters. Marks are spread evenly after the visible characters;
//! extraction only looks at the marks, in order, and ignores everything else.

use tracing::debug;

use super::StegoError;

/// Encodes a 0 bit.
pub const ZERO: char = '\u{200B}';

/// Encodes a 1 bit.
pub const ONE: char = '\u{200C}';

const HEADER_BITS: usize = 32;

/// Hides `payload` in `text` and returns the marked text.
///
/// Fails with [`StegoError::UnsupportedCarrier`] if the text already contains
/// one of the marker characters, since those would corrupt extraction.
pub fn embed(text: &str, payload: &[u8]) -> Result<String, StegoError> {
    if text.chars().any(is_marker) {
        return Err(StegoError::UnsupportedCarrier(
            "text already contains zero-width marker characters".to_string(),
        ));
    }
    if payload.len() > u32::MAX as usize {
        return Err(StegoError::CapacityExceeded {
            needed: HEADER_BITS + payload.len() * 8,
            available: HEADER_BITS + u32::MAX as usize * 8,
        });
    }

    let mut marks = Vec::with_capacity(HEADER_BITS + payload.len() * 8);
    let len = payload.len() as u32;
    for i in (0..HEADER_BITS).rev() {
        marks.push(mark((len >> i) & 1 == 1));
    }
    for byte in payload {
        for i in (0..8).rev() {
            marks.push(mark((byte >> i) & 1 == 1));
        }
    }

    let slots = text.chars().count();
    let mut output = String::with_capacity(text.len() + marks.len() * ONE.len_utf8());

    if slots == 0 {
        output.extend(marks);
    } else {
        let per_slot = marks.len().div_ceil(slots);
        let mut pending = marks.chunks(per_slot);
        for ch in text.chars() {
            output.push(ch);
            if let Some(chunk) = pending.next() {
                output.extend(chunk);
            }
        }
    }

    debug!(
        payload_len = payload.len(),
        visible_chars = slots,
        "embedded payload in text"
    );
    Ok(output)
}

/// Recovers the payload hidden by [`embed`].
pub fn extract(text: &str) -> Result<Vec<u8>, StegoError> {
    let bits: Vec<u8> = text
        .chars()
        .filter_map(|c| match c {
            ZERO => Some(0),
            ONE => Some(1),
            _ => None,
        })
        .collect();

    if bits.len() < HEADER_BITS {
        return Err(StegoError::NoHiddenData);
    }

    let len = bits[..HEADER_BITS]
        .iter()
        .fold(0u32, |acc, &bit| (acc << 1) | bit as u32) as usize;

    let body = &bits[HEADER_BITS..];
    if body.len() / 8 < len {
        return Err(StegoError::TruncatedData {
            declared: len,
            available: body.len() / 8,
        });
    }

    Ok(body[..len * 8]
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit))
        .collect())
}

/// Returns `text` with every marker character removed.
pub fn visible_text(text: &str) -> String {
    text.chars().filter(|c| !is_marker(*c)).collect()
}

/// Number of marker characters needed to hide `payload_len` bytes.
pub fn required_marks(payload_len: usize) -> usize {
    HEADER_BITS + payload_len * 8
}

fn is_marker(c: char) -> bool {
    c == ZERO || c == ONE
}

fn mark(bit: bool) -> char {
    if bit {
        ONE
    } else {
        ZERO
    }
}
