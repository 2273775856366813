//! Bit-plane engine shared by the image and audio codecs.
//!
//! A carrier is a flat slice of sample units (pixel channels or PCM samples)
//! in traversal order. Layout:
//!
//! ```text
//! units[0..32]   payload byte count, u32 big-endian, 1 bit per unit
//! units[32..]    payload bits, most significant first, `bits` per unit
//! ```
//!
//! The header always uses one bit per unit so a reader can decode it without
//! knowing the body rate.

use super::StegoError;

/// Units (and bits) taken by the length header.
pub const HEADER_BITS: usize = 32;

/// Highest supported bits per unit.
pub const MAX_BITS: u8 = 8;

/// A carrier sample whose low bits can be overwritten.
pub trait Sample: Copy {
    /// Returns the low `n` bits (`n <= 8`).
    fn low_bits(self, n: u8) -> u8;

    /// Replaces the low `n` bits with `value`.
    fn with_low_bits(self, n: u8, value: u8) -> Self;
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                fn low_bits(self, n: u8) -> u8 {
                    (self & mask(n) as $t) as u8
                }

                fn with_low_bits(self, n: u8, value: u8) -> Self {
                    let m = mask(n) as $t;
                    (self & !m) | (value as $t & m)
                }
            }
        )*
    };
}

impl_sample!(u8, u16, u32);

fn mask(n: u8) -> u8 {
    ((1u16 << n) - 1) as u8
}

/// Validates a bits-per-unit parameter.
pub fn validate_bits(bits: u8) -> Result<(), StegoError> {
    if (1..=MAX_BITS).contains(&bits) {
        Ok(())
    } else {
        Err(StegoError::InvalidBitDepth(bits))
    }
}

/// Units needed to hold the header plus `payload_len` bytes at `bits` per unit.
pub fn required_units(payload_len: usize, bits: u8) -> usize {
    HEADER_BITS + (payload_len * 8).div_ceil(bits as usize)
}

/// Bits needed for the header plus payload (what the capacity check compares).
pub fn required_bits(payload_len: usize) -> usize {
    HEADER_BITS + payload_len * 8
}

/// Largest payload in bytes that fits in `units` at `bits` per unit.
pub fn capacity_bytes(units: usize, bits: u8) -> usize {
    let body_bits = units.saturating_sub(HEADER_BITS) * bits as usize;
    (body_bits / 8).min(u32::MAX as usize)
}

/// Writes `payload` into `units`.
///
/// Nothing is modified when the payload does not fit.
pub fn embed<S: Sample>(units: &mut [S], payload: &[u8], bits: u8) -> Result<(), StegoError> {
    validate_bits(bits)?;

    let needed = required_units(payload.len(), bits);
    if needed > units.len() || payload.len() > u32::MAX as usize {
        return Err(StegoError::CapacityExceeded {
            needed: required_bits(payload.len()),
            available: units.len() * bits as usize,
        });
    }

    let len = payload.len() as u32;
    for (i, unit) in units[..HEADER_BITS].iter_mut().enumerate() {
        let bit = ((len >> (HEADER_BITS - 1 - i)) & 1) as u8;
        *unit = unit.with_low_bits(1, bit);
    }

    let total_bits = payload.len() * 8;
    let per_unit = bits as usize;
    for (u, unit) in units[HEADER_BITS..needed].iter_mut().enumerate() {
        let mut value = 0u8;
        for j in 0..per_unit {
            let k = u * per_unit + j;
            // Zero-pad the final unit past the last payload bit
            let bit = if k < total_bits { payload_bit(payload, k) } else { 0 };
            value = (value << 1) | bit;
        }
        *unit = unit.with_low_bits(bits, value);
    }

    Ok(())
}

/// Reads the header, then exactly the declared number of payload bytes.
pub fn extract<S: Sample>(units: &[S], bits: u8) -> Result<Vec<u8>, StegoError> {
    validate_bits(bits)?;

    if units.len() < HEADER_BITS {
        return Err(StegoError::TruncatedData {
            declared: HEADER_BITS / 8,
            available: units.len() / 8,
        });
    }

    let len = units[..HEADER_BITS]
        .iter()
        .fold(0u32, |acc, unit| (acc << 1) | unit.low_bits(1) as u32) as usize;

    if required_units(len, bits) > units.len() {
        return Err(StegoError::TruncatedData {
            declared: len,
            available: capacity_bytes(units.len(), bits),
        });
    }

    let per_unit = bits as usize;
    let mut payload = vec![0u8; len];
    for k in 0..len * 8 {
        let unit = units[HEADER_BITS + k / per_unit];
        let shift = per_unit - 1 - k % per_unit;
        let bit = (unit.low_bits(bits) >> shift) & 1;
        payload[k / 8] |= bit << (7 - k % 8);
    }

    Ok(payload)
}

fn payload_bit(payload: &[u8], k: usize) -> u8 {
    (payload[k / 8] >> (7 - k % 8)) & 1
}
