//! Integration tests for Cryptavit
//!
//! Full hide/reveal pipelines over every carrier kind, capacity limits,
//! wrong keys, tampering and passphrase-protected keys.

use std::io::Cursor;
use std::sync::OnceLock;

use cryptavit::crypto::{generate_key_pair, CryptoContext, KeyPair, KeySize};
use cryptavit::decoder::extract_package;
use cryptavit::encoder::package_len;
use cryptavit::stego::video;
use cryptavit::{
    hide, hide_with_pem, reveal, reveal_with_pem, CarrierKind, Error, ErrorKind, HideConfig,
    RevealConfig, StegoError,
};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};

fn recipient() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| KeyPair::generate(&mut CryptoContext::seeded(7), KeySize::Rsa2048).unwrap())
}

fn stranger() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| KeyPair::generate(&mut CryptoContext::seeded(77), KeySize::Rsa2048).unwrap())
}

fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x * 13) as u8, (y * 7) as u8, ((x + y) * 5) as u8, 255])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn wav(sample_count: usize, channels: u16, bits_per_sample: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 22050,
        bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };
    let amplitude = ((1i64 << (bits_per_sample - 1)) - 1) as f64 * 0.8;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..sample_count {
            let t = i as f64 / 22050.0;
            let sample = (f64::sin(2.0 * std::f64::consts::PI * 330.0 * t) * amplitude) as i32;
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

const COVER_TEXT: &str = "Dear team,\n\nThe quarterly numbers look fine. See you on Monday.\n\nBest regards";

fn fake_mp4() -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isom".to_vec();
    data.extend((0..8192u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8));
    data
}

fn roundtrip(carrier: &[u8], kind: CarrierKind, message: &[u8], config: HideConfig) -> Vec<u8> {
    let keys = recipient();
    let mut ctx = CryptoContext::new();

    let stego = hide(&mut ctx, carrier, kind, message, keys.public_key(), &config).unwrap();
    let reveal_config = RevealConfig::default().with_bits_per_channel(config.bits_per_channel);
    reveal(&mut ctx, &stego, kind, keys.private_key(), &reveal_config).unwrap()
}

/// A 2048-bit package with "hello world" is 308 bytes; 16x16 RGBA at one bit
/// per channel only holds 1024 bits.
#[test]
fn test_small_image_capacity_exceeded() {
    let keys = recipient();
    let png = rgba_png(16, 16);
    let mut ctx = CryptoContext::new();

    let err = hide(
        &mut ctx,
        &png,
        CarrierKind::Image,
        b"hello world",
        keys.public_key(),
        &HideConfig::default(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    match err {
        Error::Stego(StegoError::CapacityExceeded { needed, available }) => {
            assert_eq!(needed, 32 + package_len(keys.public_key(), 11) * 8);
            assert_eq!(available, 16 * 16 * 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_small_image_fits_at_eight_bits() {
    let png = rgba_png(16, 16);
    let config = HideConfig::default().with_bits_per_channel(8);

    assert_eq!(roundtrip(&png, CarrierKind::Image, b"hello world", config), b"hello world");
}

#[test]
fn test_larger_image_fits_at_one_bit() {
    let png = rgba_png(48, 48);

    assert_eq!(
        roundtrip(&png, CarrierKind::Image, b"hello world", HideConfig::default()),
        b"hello world"
    );
}

#[test]
fn test_image_output_is_png() {
    let keys = recipient();
    let mut ctx = CryptoContext::new();
    let stego = hide(
        &mut ctx,
        &rgba_png(48, 48),
        CarrierKind::Image,
        b"png please",
        keys.public_key(),
        &HideConfig::default(),
    )
    .unwrap();

    assert_eq!(image::guess_format(&stego).unwrap(), ImageFormat::Png);
    let decoded = image::load_from_memory(&stego).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (48, 48));
}

#[test]
fn test_audio_roundtrip() {
    let carrier = wav(8000, 2, 16);
    let message = b"audio carries this one";

    for bits in [1, 2, 4] {
        let config = HideConfig::default().with_bits_per_channel(bits);
        assert_eq!(roundtrip(&carrier, CarrierKind::Audio, message, config), message);
    }
}

#[test]
fn test_audio_metadata_preserved() {
    let keys = recipient();
    let carrier = wav(6000, 1, 24);
    let mut ctx = CryptoContext::new();

    let stego = hide(
        &mut ctx,
        &carrier,
        CarrierKind::Audio,
        b"24-bit mono",
        keys.public_key(),
        &HideConfig::default(),
    )
    .unwrap();

    let before = hound::WavReader::new(Cursor::new(&carrier)).unwrap();
    let after = hound::WavReader::new(Cursor::new(&stego)).unwrap();
    assert_eq!(before.spec(), after.spec());
    assert_eq!(before.len(), after.len());
}

#[test]
fn test_text_roundtrip_preserves_visible_text() {
    let keys = recipient();
    let mut ctx = CryptoContext::new();

    let stego = hide(
        &mut ctx,
        COVER_TEXT.as_bytes(),
        CarrierKind::Text,
        b"invisible ink",
        keys.public_key(),
        &HideConfig::default(),
    )
    .unwrap();

    let stego_text = String::from_utf8(stego.clone()).unwrap();
    let visible: String = stego_text
        .chars()
        .filter(|c| *c != '\u{200B}' && *c != '\u{200C}')
        .collect();
    assert_eq!(visible, COVER_TEXT);

    let revealed = reveal(
        &mut ctx,
        &stego,
        CarrierKind::Text,
        keys.private_key(),
        &RevealConfig::default(),
    )
    .unwrap();
    assert_eq!(revealed, b"invisible ink");
}

#[test]
fn test_video_roundtrip_keeps_container_prefix() {
    let keys = recipient();
    let carrier = fake_mp4();
    let mut ctx = CryptoContext::new();

    let stego = hide(
        &mut ctx,
        &carrier,
        CarrierKind::Video,
        b"after the moov atom",
        keys.public_key(),
        &HideConfig::default(),
    )
    .unwrap();

    assert_eq!(&stego[..carrier.len()], carrier.as_slice());
    assert_eq!(video::strip(&stego), carrier.as_slice());

    let revealed = reveal(
        &mut ctx,
        &stego,
        CarrierKind::Video,
        keys.private_key(),
        &RevealConfig::default(),
    )
    .unwrap();
    assert_eq!(revealed, b"after the moov atom");
}

#[test]
fn test_compression_on_and_off() {
    let message = "all work and no play makes jack a dull boy. ".repeat(40);
    let carrier = fake_mp4();

    for compress in [false, true] {
        let config = HideConfig::default().with_compression(compress);
        let revealed = roundtrip(&carrier, CarrierKind::Video, message.as_bytes(), config);
        assert_eq!(revealed, message.as_bytes(), "compress = {compress}");
    }
}

#[test]
fn test_compression_shrinks_package() {
    let keys = recipient();
    let message = "repetitive ".repeat(200);
    let mut ctx = CryptoContext::new();
    let config = RevealConfig::default();

    let plain = hide(
        &mut ctx,
        b"",
        CarrierKind::Video,
        message.as_bytes(),
        keys.public_key(),
        &HideConfig::default(),
    )
    .unwrap();
    let packed = hide(
        &mut ctx,
        b"",
        CarrierKind::Video,
        message.as_bytes(),
        keys.public_key(),
        &HideConfig::default().with_compression(true),
    )
    .unwrap();

    let plain_package = extract_package(&plain, CarrierKind::Video, &config).unwrap();
    let packed_package = extract_package(&packed, CarrierKind::Video, &config).unwrap();
    assert!(!plain_package.is_compressed());
    assert!(packed_package.is_compressed());
    assert!(packed.len() < plain.len());
}

#[test]
fn test_wrong_key_fails_for_every_carrier() {
    let carriers: Vec<(CarrierKind, Vec<u8>)> = vec![
        (CarrierKind::Image, rgba_png(48, 48)),
        (CarrierKind::Audio, wav(4000, 1, 16)),
        (CarrierKind::Text, COVER_TEXT.as_bytes().to_vec()),
        (CarrierKind::Video, fake_mp4()),
    ];
    let mut ctx = CryptoContext::new();

    for (kind, carrier) in carriers {
        let stego = hide(
            &mut ctx,
            &carrier,
            kind,
            b"not for strangers",
            recipient().public_key(),
            &HideConfig::default(),
        )
        .unwrap();

        let err = reveal(
            &mut ctx,
            &stego,
            kind,
            stranger().private_key(),
            &RevealConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecryptionFailure, "{kind}");
    }
}

#[test]
fn test_wrong_key_and_tampering_look_the_same() {
    let keys = recipient();
    let mut ctx = CryptoContext::new();
    let stego = hide(
        &mut ctx,
        &fake_mp4(),
        CarrierKind::Video,
        b"same failure either way",
        keys.public_key(),
        &HideConfig::default(),
    )
    .unwrap();

    let wrong_key = reveal(
        &mut ctx,
        &stego,
        CarrierKind::Video,
        stranger().private_key(),
        &RevealConfig::default(),
    )
    .unwrap_err();

    let mut tampered = stego.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;
    let tampered_err = reveal(
        &mut ctx,
        &tampered,
        CarrierKind::Video,
        keys.private_key(),
        &RevealConfig::default(),
    )
    .unwrap_err();

    assert_eq!(wrong_key.kind(), ErrorKind::DecryptionFailure);
    assert_eq!(tampered_err.kind(), ErrorKind::DecryptionFailure);
    assert_eq!(wrong_key.to_string(), tampered_err.to_string());
    assert_eq!(wrong_key.user_message(), tampered_err.user_message());
}

#[test]
fn test_tampered_image_never_yields_plaintext() {
    let keys = recipient();
    let mut ctx = CryptoContext::new();
    let stego = hide(
        &mut ctx,
        &rgba_png(48, 48),
        CarrierKind::Image,
        b"integrity matters",
        keys.public_key(),
        &HideConfig::default(),
    )
    .unwrap();

    // Flip the LSB of a channel inside the ciphertext region (past header and wrapped key)
    let mut img = image::load_from_memory(&stego).unwrap().to_rgba8();
    let unit = 32 + (4 + 1 + 4 + 256 + 12 + 16 + 4 + 3) * 8;
    let pixel = img.get_pixel_mut((unit / 4 % 48) as u32, (unit / 4 / 48) as u32);
    pixel.0[unit % 4] ^= 1;

    let mut tampered = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut tampered), ImageFormat::Png)
        .unwrap();

    let err = reveal(
        &mut ctx,
        &tampered,
        CarrierKind::Image,
        keys.private_key(),
        &RevealConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecryptionFailure);
}

#[test]
fn test_clean_carriers_report_no_hidden_data() {
    let mut ctx = CryptoContext::new();
    let keys = recipient();

    for (kind, carrier) in [
        (CarrierKind::Text, COVER_TEXT.as_bytes().to_vec()),
        (CarrierKind::Video, fake_mp4()),
    ] {
        let err = reveal(
            &mut ctx,
            &carrier,
            kind,
            keys.private_key(),
            &RevealConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoHiddenData, "{kind}");
    }
}

#[test]
fn test_passphrase_protected_key_pipeline() {
    let mut ctx = CryptoContext::seeded(99);
    let (private_pem, public_pem) = generate_key_pair(&mut ctx, 2048, Some("hunter2")).unwrap();
    assert!(private_pem.contains("ENCRYPTED PRIVATE KEY"));

    let stego = hide_with_pem(
        &mut ctx,
        COVER_TEXT.as_bytes(),
        CarrierKind::Text,
        b"locked away",
        &public_pem,
        &HideConfig::default(),
    )
    .unwrap();

    let revealed = reveal_with_pem(
        &mut ctx,
        &stego,
        CarrierKind::Text,
        &private_pem,
        Some("hunter2"),
        &RevealConfig::default(),
    )
    .unwrap();
    assert_eq!(revealed, b"locked away");

    let err = reveal_with_pem(
        &mut ctx,
        &stego,
        CarrierKind::Text,
        &private_pem,
        Some("hunter3"),
        &RevealConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPassphrase);
}

#[test]
fn test_key_files_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("alice");
    let keys = recipient();
    let mut ctx = CryptoContext::new();

    keys.save_to_files(&mut ctx, &base, None).unwrap();
    let loaded = KeyPair::load_from_files(&base, None).unwrap();

    let stego = hide(
        &mut ctx,
        &fake_mp4(),
        CarrierKind::Video,
        b"from disk",
        loaded.public_key(),
        &HideConfig::default(),
    )
    .unwrap();
    let revealed = reveal(
        &mut ctx,
        &stego,
        CarrierKind::Video,
        keys.private_key(),
        &RevealConfig::default(),
    )
    .unwrap();
    assert_eq!(revealed, b"from disk");
}
