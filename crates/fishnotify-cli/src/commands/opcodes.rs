//! Opcodes command: find the EventPlay opcode in a local opcode list.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fishnotify_core::find_event_play_opcode;

pub fn run(file: &Path, region: &str) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read opcode list {}", file.display()))?;
    let opcode = find_event_play_opcode(&json, region)?;

    println!("EventPlay ({}): 0x{:04X}", region, opcode);
    Ok(())
}
