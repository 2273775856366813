//! LSB steganography for audio files.
//!
//! Hides data in the low bits of PCM samples, in file order (interleaved
//! channels). Supports integer PCM WAV at 8, 16, 24 or 32 bits per sample.
//! The output WAV keeps the sample rate, channel count, bit depth and sample
//! format of the input.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read, Seek};
use tracing::debug;

use super::lsb;
use super::StegoError;

/// Audio steganography handler.
#[derive(Debug, Clone)]
pub struct AudioStego {
    /// Audio specification (sample rate, channels, etc.)
    spec: WavSpec,
    /// Interleaved samples, sign-extended to i32
    samples: Vec<i32>,
}

impl AudioStego {
    /// Creates a new AudioStego from WAV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| StegoError::UnsupportedCarrier(e.to_string()))?;

        Self::from_reader(reader)
    }

    /// Creates AudioStego from a WavReader.
    fn from_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self, StegoError> {
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int {
            return Err(StegoError::UnsupportedCarrier(format!(
                "only integer PCM WAV is supported, got {:?}",
                spec.sample_format
            )));
        }
        if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(StegoError::UnsupportedCarrier(format!(
                "unsupported sample width of {} bits",
                spec.bits_per_sample
            )));
        }

        let samples: Vec<i32> = reader
            .into_samples::<i32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StegoError::UnsupportedCarrier(e.to_string()))?;

        Ok(Self { spec, samples })
    }

    /// Total embeddable bits at `bits` per sample, header included.
    pub fn capacity_bits(&self, bits: u8) -> usize {
        self.samples.len() * bits as usize
    }

    /// Returns the payload capacity in bytes at `bits` per sample.
    pub fn capacity(&self, bits: u8) -> usize {
        lsb::capacity_bytes(self.samples.len(), bits)
    }

    /// Hides data in the audio.
    ///
    /// # Returns
    /// A new AudioStego with the data hidden inside.
    pub fn hide(&self, data: &[u8], bits: u8) -> Result<Self, StegoError> {
        let width = self.spec.bits_per_sample;
        let mut units: Vec<u32> = self.samples.iter().map(|&s| to_unsigned(s, width)).collect();

        lsb::embed(&mut units, data, bits)?;

        debug!(
            payload_len = data.len(),
            bits,
            samples = self.samples.len(),
            "embedded payload in audio"
        );
        Ok(Self {
            spec: self.spec,
            samples: units.into_iter().map(|u| to_signed(u, width)).collect(),
        })
    }

    /// Extracts hidden data from the audio.
    pub fn extract(&self, bits: u8) -> Result<Vec<u8>, StegoError> {
        let width = self.spec.bits_per_sample;
        let units: Vec<u32> = self.samples.iter().map(|&s| to_unsigned(s, width)).collect();
        lsb::extract(&units, bits)
    }

    /// Returns the audio as WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let writer = WavWriter::new(&mut cursor, self.spec)
                .map_err(|e| StegoError::Encode(e.to_string()))?;
            self.write_samples(writer)?;
        }
        Ok(cursor.into_inner())
    }

    fn write_samples<W: std::io::Write + Seek>(
        &self,
        mut writer: WavWriter<W>,
    ) -> Result<(), StegoError> {
        for sample in &self.samples {
            writer
                .write_sample(*sample)
                .map_err(|e| StegoError::Encode(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| StegoError::Encode(e.to_string()))
    }

    /// Returns the audio specification.
    pub fn spec(&self) -> &WavSpec {
        &self.spec
    }

    /// Returns the interleaved samples.
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// Returns the number of samples.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// Embeds `payload` into WAV bytes and returns new WAV bytes.
pub fn embed(carrier: &[u8], payload: &[u8], bits: u8) -> Result<Vec<u8>, StegoError> {
    AudioStego::from_bytes(carrier)?
        .hide(payload, bits)?
        .to_wav_bytes()
}

/// Extracts a payload from WAV bytes.
pub fn extract(carrier: &[u8], bits: u8) -> Result<Vec<u8>, StegoError> {
    AudioStego::from_bytes(carrier)?.extract(bits)
}

/// Two's complement bit pattern of a `width`-bit sample.
fn to_unsigned(sample: i32, width: u16) -> u32 {
    let shift = 32 - width as u32;
    ((sample as u32) << shift) >> shift
}

/// Sign-extends a `width`-bit pattern back to i32.
fn to_signed(unit: u32, width: u16) -> i32 {
    let shift = 32 - width as u32;
    ((unit << shift) as i32) >> shift
}

/// Creates a simple test WAV audio.
#[cfg(test)]
pub(crate) fn create_test_audio(sample_count: usize, channels: u16, bits_per_sample: u16) -> AudioStego {
    let spec = WavSpec {
        channels,
        sample_rate: 44100,
        bits_per_sample,
        sample_format: SampleFormat::Int,
    };
    let amplitude = ((1i64 << (bits_per_sample - 1)) - 1) as f64 * 0.5;

    // Generate a simple sine wave
    let samples: Vec<i32> = (0..sample_count)
        .map(|i| {
            let t = i as f64 / 44100.0;
            let freq = 440.0; // A4 note
            (f64::sin(2.0 * std::f64::consts::PI * freq * t) * amplitude) as i32
        })
        .collect();

    AudioStego { spec, samples }
}
