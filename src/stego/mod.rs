//! Steganography module for hiding packages in carriers.
//!
//! Supports:
//! - Image LSB steganography (anything `image` decodes, PNG output)
//! - Audio LSB steganography (integer PCM WAV)
//! - Zero-width character text steganography (UTF-8)
//! - Video trailer fallback (any container, appended data)
//!
//! [`Codec`] is the single dispatch point: one variant per carrier, each
//! implementing [`CarrierCodec`].

pub mod audio;
pub mod image;
pub mod lsb;
pub mod text;
pub mod video;

pub use self::audio::AudioStego;
pub use self::image::ImageStego;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during embedding or extraction.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Carrier too small: need {needed} bits, have capacity for {available}")]
    CapacityExceeded { needed: usize, available: usize },

    #[error("Hidden data truncated: header declares {declared} bytes, carrier holds {available}")]
    TruncatedData { declared: usize, available: usize },

    #[error("No hidden data found in carrier")]
    NoHiddenData,

    #[error("Unsupported carrier: {0}")]
    UnsupportedCarrier(String),

    #[error("Bits per channel must be between 1 and 8, got {0}")]
    InvalidBitDepth(u8),

    #[error("Carrier encode error: {0}")]
    Encode(String),
}

/// The kinds of carrier Cryptavit can hide data in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierKind {
    Image,
    Audio,
    Text,
    Video,
}

impl CarrierKind {
    /// Guesses the carrier kind from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" | "bmp" | "jpg" | "jpeg" | "gif" | "tif" | "tiff" | "webp" => Some(Self::Image),
            "wav" | "wave" => Some(Self::Audio),
            "txt" | "text" | "md" => Some(Self::Text),
            "avi" | "mp4" | "mkv" | "mov" | "webm" => Some(Self::Video),
            _ => None,
        }
    }

    /// File extension used for stego output of this kind, if it is fixed.
    pub fn output_extension(self) -> Option<&'static str> {
        match self {
            Self::Image => Some("png"),
            Self::Audio => Some("wav"),
            Self::Text | Self::Video => None,
        }
    }

    /// Whether the codec takes a bits-per-unit parameter.
    pub fn uses_bit_depth(self) -> bool {
        matches!(self, Self::Image | Self::Audio)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarrierKind {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            "text" => Ok(Self::Text),
            "video" => Ok(Self::Video),
            other => Err(StegoError::UnsupportedCarrier(format!(
                "unknown carrier type '{other}' (use image, audio, text or video)"
            ))),
        }
    }
}

/// Uniform embed/extract capability shared by every carrier codec.
pub trait CarrierCodec {
    /// Hides `payload` in `carrier` and returns the stego carrier bytes.
    fn embed(&self, carrier: &[u8], payload: &[u8]) -> Result<Vec<u8>, StegoError>;

    /// Recovers the payload hidden in `carrier`.
    fn extract(&self, carrier: &[u8]) -> Result<Vec<u8>, StegoError>;

    /// Largest payload in bytes `carrier` can hold, `None` when unbounded.
    fn capacity(&self, carrier: &[u8]) -> Result<Option<usize>, StegoError>;
}

/// A configured carrier codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Image { bits: u8 },
    Audio { bits: u8 },
    Text,
    Video,
}

impl Codec {
    /// Builds the codec for `kind`. `bits` is validated for image and audio
    /// and ignored otherwise.
    pub fn new(kind: CarrierKind, bits: u8) -> Result<Self, StegoError> {
        Ok(match kind {
            CarrierKind::Image => {
                lsb::validate_bits(bits)?;
                Codec::Image { bits }
            }
            CarrierKind::Audio => {
                lsb::validate_bits(bits)?;
                Codec::Audio { bits }
            }
            CarrierKind::Text => Codec::Text,
            CarrierKind::Video => Codec::Video,
        })
    }

    pub fn kind(&self) -> CarrierKind {
        match self {
            Codec::Image { .. } => CarrierKind::Image,
            Codec::Audio { .. } => CarrierKind::Audio,
            Codec::Text => CarrierKind::Text,
            Codec::Video => CarrierKind::Video,
        }
    }
}

impl CarrierCodec for Codec {
    fn embed(&self, carrier: &[u8], payload: &[u8]) -> Result<Vec<u8>, StegoError> {
        match *self {
            Codec::Image { bits } => image::embed(carrier, payload, bits),
            Codec::Audio { bits } => audio::embed(carrier, payload, bits),
            Codec::Text => text::embed(utf8(carrier)?, payload).map(String::into_bytes),
            Codec::Video => video::embed(carrier, payload),
        }
    }

    fn extract(&self, carrier: &[u8]) -> Result<Vec<u8>, StegoError> {
        match *self {
            Codec::Image { bits } => image::extract(carrier, bits),
            Codec::Audio { bits } => audio::extract(carrier, bits),
            Codec::Text => text::extract(utf8(carrier)?),
            Codec::Video => video::extract(carrier),
        }
    }

    fn capacity(&self, carrier: &[u8]) -> Result<Option<usize>, StegoError> {
        match *self {
            Codec::Image { bits } => Ok(Some(ImageStego::from_bytes(carrier)?.capacity(bits))),
            Codec::Audio { bits } => Ok(Some(AudioStego::from_bytes(carrier)?.capacity(bits))),
            Codec::Text => {
                utf8(carrier)?;
                Ok(Some(u32::MAX as usize))
            }
            Codec::Video => Ok(None),
        }
    }
}

fn utf8(carrier: &[u8]) -> Result<&str, StegoError> {
    std::str::from_utf8(carrier)
        .map_err(|e| StegoError::UnsupportedCarrier(format!("text carrier is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(CarrierKind::from_extension("PNG"), Some(CarrierKind::Image));
        assert_eq!(CarrierKind::from_extension("jpeg"), Some(CarrierKind::Image));
        assert_eq!(CarrierKind::from_extension("wav"), Some(CarrierKind::Audio));
        assert_eq!(CarrierKind::from_extension("txt"), Some(CarrierKind::Text));
        assert_eq!(CarrierKind::from_extension("avi"), Some(CarrierKind::Video));
        assert_eq!(CarrierKind::from_extension("exe"), None);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Audio".parse::<CarrierKind>().unwrap(), CarrierKind::Audio);
        assert!(matches!(
            "pdf".parse::<CarrierKind>(),
            Err(StegoError::UnsupportedCarrier(_))
        ));
    }

    #[test]
    fn test_codec_validates_bits() {
        assert!(matches!(
            Codec::new(CarrierKind::Image, 0),
            Err(StegoError::InvalidBitDepth(0))
        ));
        assert!(matches!(
            Codec::new(CarrierKind::Audio, 9),
            Err(StegoError::InvalidBitDepth(9))
        ));
        // Text and video ignore the rate
        assert_eq!(Codec::new(CarrierKind::Text, 0).unwrap(), Codec::Text);
        assert_eq!(Codec::new(CarrierKind::Video, 42).unwrap().kind(), CarrierKind::Video);
    }

    #[test]
    fn test_dispatch_text() {
        let codec = Codec::new(CarrierKind::Text, 1).unwrap();
        let stego = codec.embed("cover text".as_bytes(), b"payload").unwrap();

        assert_eq!(codec.extract(&stego).unwrap(), b"payload");
    }

    #[test]
    fn test_dispatch_video() {
        let codec = Codec::Video;
        let stego = codec.embed(b"\x00\x00\x01\xBAmpeg-ish", b"payload").unwrap();

        assert_eq!(codec.extract(&stego).unwrap(), b"payload");
        assert_eq!(codec.capacity(&stego).unwrap(), None);
    }

    #[test]
    fn test_dispatch_image_capacity() {
        let png = super::image::tests::create_test_rgba_png(16, 16);
        let codec = Codec::new(CarrierKind::Image, 2).unwrap();

        assert_eq!(codec.capacity(&png).unwrap(), Some((1024 - 32) * 2 / 8));
    }

    #[test]
    fn test_text_carrier_must_be_utf8() {
        let result = Codec::Text.embed(&[0xFF, 0xFE, 0x00], b"x");
        assert!(matches!(result, Err(StegoError::UnsupportedCarrier(_))));
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&CarrierKind::Video).unwrap();
        assert_eq!(json, "\"video\"");
        let parsed: CarrierKind = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(parsed, CarrierKind::Image);
    }
}
