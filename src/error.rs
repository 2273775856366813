//! Pipeline error type and the messages safe to show untrusted callers.

use thiserror::Error;

use crate::crypto::{CipherError, KeyError};
use crate::package::PackageError;
use crate::stego::StegoError;

/// Any failure from a hide/reveal pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    #[error("Steganography error: {0}")]
    Stego(#[from] StegoError),
}

/// Closed set of failure kinds a caller has to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    KeyGeneration,
    KeyParse,
    InvalidPassphrase,
    DecryptionFailure,
    MalformedPackage,
    CapacityExceeded,
    TruncatedData,
    NoHiddenData,
    UnsupportedCarrier,
    InvalidParameter,
    Internal,
}

impl Error {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Key(KeyError::Generation(_)) => ErrorKind::KeyGeneration,
            Error::Key(KeyError::Parse(_)) => ErrorKind::KeyParse,
            Error::Key(KeyError::InvalidPassphrase) => ErrorKind::InvalidPassphrase,
            Error::Key(KeyError::Io(_)) => ErrorKind::Internal,
            Error::Cipher(CipherError::DecryptionFailure) => ErrorKind::DecryptionFailure,
            Error::Cipher(CipherError::Encryption(_)) => ErrorKind::Internal,
            // Only reachable after the tag verified, i.e. a sender bug
            Error::Cipher(CipherError::Compression(_)) => ErrorKind::Internal,
            Error::Package(PackageError::Malformed(_)) => ErrorKind::MalformedPackage,
            Error::Stego(StegoError::CapacityExceeded { .. }) => ErrorKind::CapacityExceeded,
            Error::Stego(StegoError::TruncatedData { .. }) => ErrorKind::TruncatedData,
            Error::Stego(StegoError::NoHiddenData) => ErrorKind::NoHiddenData,
            Error::Stego(StegoError::UnsupportedCarrier(_)) => ErrorKind::UnsupportedCarrier,
            Error::Stego(StegoError::InvalidBitDepth(_)) => ErrorKind::InvalidParameter,
            Error::Stego(StegoError::Encode(_)) => ErrorKind::Internal,
        }
    }

    /// A message suitable for end users.
    ///
    /// Never names the cryptographic step that failed and never includes
    /// parser details.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::KeyGeneration => "Key generation failed: use a 2048 or 4096 bit key",
            ErrorKind::KeyParse => "The key is not a valid PEM encoded RSA key",
            ErrorKind::InvalidPassphrase => "The passphrase does not unlock the private key",
            ErrorKind::DecryptionFailure => {
                "Could not decrypt the hidden message with this key"
            }
            ErrorKind::MalformedPackage => "The carrier does not contain a valid hidden message",
            ErrorKind::CapacityExceeded => "The carrier is too small for this message",
            ErrorKind::TruncatedData => "The hidden message in the carrier is incomplete",
            ErrorKind::NoHiddenData => "No hidden message was found in the carrier",
            ErrorKind::UnsupportedCarrier => "Unsupported or unreadable carrier file",
            ErrorKind::InvalidParameter => "Bits per channel must be between 1 and 8",
            ErrorKind::Internal => "Internal error while processing the message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let err: Error = CipherError::DecryptionFailure.into();
        assert_eq!(err.kind(), ErrorKind::DecryptionFailure);

        let err: Error = StegoError::NoHiddenData.into();
        assert_eq!(err.kind(), ErrorKind::NoHiddenData);

        let err: Error = PackageError::Malformed("x".into()).into();
        assert_eq!(err.kind(), ErrorKind::MalformedPackage);

        let err: Error = StegoError::CapacityExceeded { needed: 2, available: 1 }.into();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    }

    #[test]
    fn test_user_message_hides_details() {
        let err: Error = PackageError::Malformed("wrapped key needs 300 bytes".into()).into();
        assert!(!err.user_message().contains("wrapped key"));

        let err: Error = CipherError::DecryptionFailure.into();
        let message = err.user_message().to_lowercase();
        assert!(!message.contains("tag"));
        assert!(!message.contains("unwrap"));
        assert!(!message.contains("oaep"));
    }
}
