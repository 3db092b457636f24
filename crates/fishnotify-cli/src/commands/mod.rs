//! CLI command implementations.

pub mod locate;
pub mod opcodes;
pub mod run;
pub mod status;
pub mod toggle_chat;

use std::path::Path;

use anyhow::{Context, Result};
use fishnotify_core::{ProcessHandle, SignatureSet, builtin_signatures, load_signatures};
use tracing::info;

/// Signatures from `path`, or the built-in set when no file is given.
pub fn load_signature_set(path: Option<&Path>) -> Result<SignatureSet> {
    match path {
        Some(path) => {
            let signatures = load_signatures(path)
                .with_context(|| format!("Failed to load signatures from {}", path.display()))?;
            info!(
                "Loaded signatures version {} from {}",
                signatures.version,
                path.display()
            );
            Ok(signatures)
        }
        None => Ok(builtin_signatures()),
    }
}

/// Open the game by PID, or find it by name.
pub fn open_process(pid: Option<u32>) -> Result<ProcessHandle> {
    let process = match pid {
        Some(pid) => ProcessHandle::open(pid)?,
        None => ProcessHandle::find_and_open()?,
    };
    Ok(process)
}
