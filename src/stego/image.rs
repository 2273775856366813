//! LSB (Least Significant Bit) steganography for images.
//!
//! Hides data in the low bits of every channel sample, traversing pixels in
//! row-major order and channels in storage order (R, G, B, A / Luma, Alpha).
//! Any format the `image` crate can decode is accepted; output is always PNG
//! so the hidden bits survive.
//!
//! 8-bit and 16-bit Luma/LumaA/RGB/RGBA buffers are used as-is. Other pixel
//! types (floating point) are converted to RGBA8 first.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use tracing::debug;

use super::lsb;
use super::StegoError;

/// Flat view over the channel samples of a supported image buffer.
enum Channels<'a> {
    Eight(&'a mut [u8]),
    Sixteen(&'a mut [u16]),
}

impl Channels<'_> {
    fn len(&self) -> usize {
        match self {
            Channels::Eight(samples) => samples.len(),
            Channels::Sixteen(samples) => samples.len(),
        }
    }
}

/// Image steganography handler.
#[derive(Debug, Clone)]
pub struct ImageStego {
    image: DynamicImage,
}

impl ImageStego {
    /// Creates a new ImageStego from encoded image bytes (PNG, BMP, JPEG, ...).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| StegoError::UnsupportedCarrier(e.to_string()))?;
        Ok(Self::from_image(image))
    }

    /// Creates a new ImageStego from a DynamicImage.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image: normalize(image),
        }
    }

    /// Number of channel samples (pixels × channels).
    pub fn channel_count(&self) -> usize {
        let (width, height) = self.image.dimensions();
        (width as usize) * (height as usize) * self.image.color().channel_count() as usize
    }

    /// Total embeddable bits at `bits` per channel, header included.
    pub fn capacity_bits(&self, bits: u8) -> usize {
        self.channel_count() * bits as usize
    }

    /// Returns the payload capacity in bytes at `bits` per channel.
    pub fn capacity(&self, bits: u8) -> usize {
        lsb::capacity_bytes(self.channel_count(), bits)
    }

    /// Hides data in the image.
    ///
    /// # Returns
    /// A new image with the data hidden inside. `self` is left untouched.
    pub fn hide(&self, data: &[u8], bits: u8) -> Result<DynamicImage, StegoError> {
        let mut output = self.image.clone();
        match channels_mut(&mut output)? {
            Channels::Eight(samples) => lsb::embed(samples, data, bits)?,
            Channels::Sixteen(samples) => lsb::embed(samples, data, bits)?,
        }

        debug!(
            payload_len = data.len(),
            bits,
            capacity = self.capacity(bits),
            "embedded payload in image"
        );
        Ok(output)
    }

    /// Extracts hidden data from the image.
    pub fn extract(&self, bits: u8) -> Result<Vec<u8>, StegoError> {
        match &self.image {
            DynamicImage::ImageLuma8(buf) => lsb::extract(&**buf, bits),
            DynamicImage::ImageLumaA8(buf) => lsb::extract(&**buf, bits),
            DynamicImage::ImageRgb8(buf) => lsb::extract(&**buf, bits),
            DynamicImage::ImageRgba8(buf) => lsb::extract(&**buf, bits),
            DynamicImage::ImageLuma16(buf) => lsb::extract(&**buf, bits),
            DynamicImage::ImageLumaA16(buf) => lsb::extract(&**buf, bits),
            DynamicImage::ImageRgb16(buf) => lsb::extract(&**buf, bits),
            DynamicImage::ImageRgba16(buf) => lsb::extract(&**buf, bits),
            other => Err(StegoError::UnsupportedCarrier(format!(
                "pixel format {:?}",
                other.color()
            ))),
        }
    }

    /// Returns the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, StegoError> {
        encode_png(&self.image)
    }

    /// Returns a reference to the underlying image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Embeds `payload` into an encoded image and returns PNG bytes.
pub fn embed(carrier: &[u8], payload: &[u8], bits: u8) -> Result<Vec<u8>, StegoError> {
    let stego = ImageStego::from_bytes(carrier)?;
    let hidden = stego.hide(payload, bits)?;
    encode_png(&hidden)
}

/// Extracts a payload from an encoded image.
pub fn extract(carrier: &[u8], bits: u8) -> Result<Vec<u8>, StegoError> {
    ImageStego::from_bytes(carrier)?.extract(bits)
}

fn normalize(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => image,
        other => DynamicImage::ImageRgba8(other.to_rgba8()),
    }
}

fn channels_mut(image: &mut DynamicImage) -> Result<Channels<'_>, StegoError> {
    let channels = match image {
        DynamicImage::ImageLuma8(buf) => Channels::Eight(&mut **buf),
        DynamicImage::ImageLumaA8(buf) => Channels::Eight(&mut **buf),
        DynamicImage::ImageRgb8(buf) => Channels::Eight(&mut **buf),
        DynamicImage::ImageRgba8(buf) => Channels::Eight(&mut **buf),
        DynamicImage::ImageLuma16(buf) => Channels::Sixteen(&mut **buf),
        DynamicImage::ImageLumaA16(buf) => Channels::Sixteen(&mut **buf),
        DynamicImage::ImageRgb16(buf) => Channels::Sixteen(&mut **buf),
        DynamicImage::ImageRgba16(buf) => Channels::Sixteen(&mut **buf),
        other => {
            return Err(StegoError::UnsupportedCarrier(format!(
                "pixel format {:?}",
                other.color()
            )))
        }
    };
    debug!(samples = channels.len(), "image channel buffer");
    Ok(channels)
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, StegoError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| StegoError::Encode(e.to_string()))?;
    Ok(bytes)
}
