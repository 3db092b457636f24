//! Code signatures and the startup locator.
//!
//! A signature is a wildcard byte pattern over machine code plus the recipe
//! for turning a match into an absolute address: where the instruction
//! starts, where its 32-bit RIP-relative displacement sits, and how long the
//! instruction is. Signatures are bound to a game build; the built-in set can
//! be replaced by a JSON file without rebuilding.

mod locator;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fishing::HandlerLayout;

pub use locator::{CODE_SCAN_CHUNK_SIZE, LocateError, TargetAddress, locate, resolve_unique};

/// Entry name of the bite intensity byte.
pub const BITE_TYPE: &str = "biteType";

/// Entry name of the static pointer to the host's event framework.
pub const FISHING_HANDLER: &str = "fishingHandler";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSignature {
    pub pattern: String,
    pub instr_offset: usize,
    pub disp_offset: usize,
    pub instr_len: usize,
    #[serde(default)]
    pub deref: bool,
    #[serde(default)]
    pub addend: i64,
}

impl CodeSignature {
    pub fn pattern_bytes(&self) -> Result<Vec<Option<u8>>> {
        let bytes = parse_pattern(&self.pattern)?;
        if self.instr_offset + self.disp_offset + 4 > bytes.len()
            || self.disp_offset + 4 > self.instr_len
        {
            return Err(Error::invalid_signature(format!(
                "Displacement at {}+{} does not fit pattern '{}' (instruction length {})",
                self.instr_offset, self.disp_offset, self.pattern, self.instr_len
            )));
        }
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub name: String,
    pub signature: CodeSignature,
}

/// Everything about the host that changes between game builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureSet {
    pub version: String,
    pub entries: Vec<SignatureEntry>,
    #[serde(default)]
    pub handler_layout: HandlerLayout,
}

impl SignatureSet {
    pub fn entry(&self, name: &str) -> Option<&CodeSignature> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| &entry.signature)
    }
}

pub fn load_signatures<P: AsRef<Path>>(path: P) -> Result<SignatureSet> {
    let content = fs::read_to_string(&path)?;
    let set: SignatureSet = serde_json::from_str(&content)?;
    for entry in &set.entries {
        entry.signature.pattern_bytes()?;
    }
    Ok(set)
}

pub fn save_signatures<P: AsRef<Path>>(path: P, signatures: &SignatureSet) -> Result<()> {
    let content = serde_json::to_string_pretty(signatures)?;
    fs::write(path, content)?;
    Ok(())
}

/// Parse `"48 8D 0D ?? ?? ?? ??"` into bytes and wildcards.
pub fn parse_pattern(pattern: &str) -> Result<Vec<Option<u8>>> {
    let mut bytes = Vec::new();
    for token in pattern.split_whitespace() {
        if token == "??" || token == "?" {
            bytes.push(None);
            continue;
        }

        let value = u8::from_str_radix(token, 16).map_err(|e| {
            Error::invalid_signature(format!("Invalid signature token '{}': {}", token, e))
        })?;
        bytes.push(Some(value));
    }

    if bytes.is_empty() {
        return Err(Error::invalid_signature("Signature pattern is empty"));
    }

    if bytes.iter().all(Option::is_none) {
        return Err(Error::invalid_signature(
            "Signature pattern has no literal bytes",
        ));
    }

    Ok(bytes)
}

pub fn format_pattern(bytes: &[Option<u8>]) -> String {
    bytes
        .iter()
        .map(|b| match b {
            Some(value) => format!("{:02X}", value),
            None => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Signatures for the current global client build.
pub fn builtin_signatures() -> SignatureSet {
    SignatureSet {
        version: "global".to_string(),
        entries: vec![
            SignatureEntry {
                name: BITE_TYPE.to_string(),
                // mov byte ptr [rip+disp32], dl at the end of the bite packet handler
                signature: CodeSignature {
                    pattern: "4C 8D 0D ?? ?? ?? ?? 4D 8B 13 49 8B CB 45 0F B7 43 ?? 49 8B 93 ?? ?? ?? ?? 88 15 ?? ?? ?? ??"
                        .to_string(),
                    instr_offset: 25,
                    disp_offset: 2,
                    instr_len: 6,
                    deref: false,
                    addend: 0,
                },
            },
            SignatureEntry {
                name: FISHING_HANDLER.to_string(),
                signature: CodeSignature {
                    pattern: "48 8B 0D ?? ?? ?? ?? 48 8B 01 FF 90 ?? ?? ?? ?? 48 8B F8 48 85 C0"
                        .to_string(),
                    instr_offset: 0,
                    disp_offset: 3,
                    instr_len: 7,
                    deref: false,
                    addend: 0,
                },
            },
        ],
        handler_layout: HandlerLayout::default(),
    }
}
