//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod capacity;
mod hide;
mod keygen;
mod reveal;

pub use capacity::CapacityCommand;
pub use hide::HideCommand;
pub use keygen::KeygenCommand;
pub use reveal::RevealCommand;

use std::path::Path;

use anyhow::{anyhow, Result};

use cryptavit::CarrierKind;

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}

/// Picks the carrier kind: the explicit `--type` wins, otherwise the file extension.
pub(crate) fn resolve_kind(path: &Path, explicit: Option<CarrierKind>) -> Result<CarrierKind> {
    if let Some(kind) = explicit {
        return Ok(kind);
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(CarrierKind::from_extension)
        .ok_or_else(|| {
            anyhow!(
                "Cannot detect carrier type of {}; pass --type image|audio|text|video",
                path.display()
            )
        })
}

/// Turns a library error into an anyhow error carrying only the user-safe message.
pub(crate) fn user_error(err: cryptavit::Error) -> anyhow::Error {
    tracing::debug!(error = %err, "operation failed");
    anyhow!(err.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_resolve_kind() {
        let path = PathBuf::from("holiday.JPG");
        assert_eq!(resolve_kind(&path, None).unwrap(), CarrierKind::Image);
        assert_eq!(
            resolve_kind(&path, Some(CarrierKind::Video)).unwrap(),
            CarrierKind::Video
        );
        assert!(resolve_kind(&PathBuf::from("blob"), None).is_err());
    }
}
