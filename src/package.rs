//! Binary package format shared by every carrier codec.
//!
//! Layout (all lengths big-endian):
//!
//! ```text
//! [4 bytes] magic + version   "CAV" 0x01
//! [1 byte ] flags             bit 0 = plaintext was DEFLATE compressed
//! [4 bytes] wrapped key length
//! [N bytes] RSA-OAEP wrapped symmetric key
//! [12 bytes] nonce
//! [16 bytes] Poly1305 tag
//! [4 bytes] ciphertext length
//! [M bytes] ciphertext
//! ```
//!
//! The first five bytes double as AEAD associated data, so the flags are
//! authenticated along with the ciphertext.

use thiserror::Error;

use crate::VERSION;

/// Magic bytes followed by the format version.
pub const MAGIC: [u8; 4] = [b'C', b'A', b'V', VERSION];

/// Flag bit: the plaintext was compressed before encryption.
pub const FLAG_COMPRESSED: u8 = 0b0000_0001;

/// Nonce size for ChaCha20Poly1305.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size.
pub const TAG_SIZE: usize = 16;

/// Bytes taken by everything except the wrapped key and ciphertext bodies.
pub const FIXED_OVERHEAD: usize = MAGIC.len() + 1 + 4 + NONCE_SIZE + TAG_SIZE + 4;

const KNOWN_FLAGS: u8 = FLAG_COMPRESSED;

/// Errors that can occur while parsing a package.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PackageError {
    #[error("Malformed package: {0}")]
    Malformed(String),
}

/// An encrypted bundle: wrapped key, nonce, tag and ciphertext.
///
/// Built once per encryption and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    flags: u8,
    wrapped_key: Vec<u8>,
    nonce: [u8; NONCE_SIZE],
    tag: [u8; TAG_SIZE],
    ciphertext: Vec<u8>,
}

impl Package {
    /// Assembles a package from its parts.
    pub fn new(
        flags: u8,
        wrapped_key: Vec<u8>,
        nonce: [u8; NONCE_SIZE],
        tag: [u8; TAG_SIZE],
        ciphertext: Vec<u8>,
    ) -> Self {
        Self {
            flags,
            wrapped_key,
            nonce,
            tag,
            ciphertext,
        }
    }

    /// The header bytes authenticated by the AEAD.
    pub fn associated_data(flags: u8) -> [u8; 5] {
        let mut aad = [0u8; 5];
        aad[..4].copy_from_slice(&MAGIC);
        aad[4] = flags;
        aad
    }

    /// Serialized size of a package with the given body lengths.
    pub fn serialized_len(wrapped_key_len: usize, ciphertext_len: usize) -> usize {
        FIXED_OVERHEAD + wrapped_key_len + ciphertext_len
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    pub fn wrapped_key(&self) -> &[u8] {
        &self.wrapped_key
    }

    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    pub fn tag(&self) -> &[u8; TAG_SIZE] {
        &self.tag
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serializes the package to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(Self::serialized_len(self.wrapped_key.len(), self.ciphertext.len()));
        out.extend_from_slice(&MAGIC);
        out.push(self.flags);
        out.extend_from_slice(&(self.wrapped_key.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.wrapped_key);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&(self.ciphertext.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parses a package, requiring the buffer to hold exactly one package.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PackageError> {
        let mut reader = Reader::new(data);

        let magic = reader.take(MAGIC.len(), "magic")?;
        if magic[..3] != MAGIC[..3] {
            return Err(PackageError::Malformed("missing magic bytes".to_string()));
        }
        if magic[3] != VERSION {
            return Err(PackageError::Malformed(format!(
                "unsupported version {}",
                magic[3]
            )));
        }

        let flags = reader.take(1, "flags")?[0];
        if flags & !KNOWN_FLAGS != 0 {
            return Err(PackageError::Malformed(format!(
                "unknown flags 0x{flags:02x}"
            )));
        }

        let wrapped_key_len = reader.read_len("wrapped key length")?;
        let wrapped_key = reader.take(wrapped_key_len, "wrapped key")?.to_vec();

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(reader.take(NONCE_SIZE, "nonce")?);

        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(reader.take(TAG_SIZE, "tag")?);

        let ciphertext_len = reader.read_len("ciphertext length")?;
        let ciphertext = reader.take(ciphertext_len, "ciphertext")?.to_vec();

        if reader.remaining() != 0 {
            return Err(PackageError::Malformed(format!(
                "{} trailing bytes after ciphertext",
                reader.remaining()
            )));
        }

        Ok(Self {
            flags,
            wrapped_key,
            nonce,
            tag,
            ciphertext,
        })
    }
}

/// Serializes a package.
pub fn serialize(package: &Package) -> Vec<u8> {
    package.to_bytes()
}

/// Deserializes a package.
pub fn deserialize(data: &[u8]) -> Result<Package, PackageError> {
    Package::from_bytes(data)
}

/// Bounds-checked cursor over the input buffer.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8], PackageError> {
        if len > self.remaining() {
            return Err(PackageError::Malformed(format!(
                "{field} needs {len} bytes, only {} left",
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_len(&mut self, field: &str) -> Result<usize, PackageError> {
        let bytes = self.take(4, field)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
    }
}
