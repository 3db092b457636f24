//! Locate command: run the locator once and print what it found.

use std::path::Path;

use anyhow::{Result, anyhow};
use fishnotify_core::signature::{BITE_TYPE, FISHING_HANDLER};
use fishnotify_core::{
    FishingHandler, MemoryReader, PointerChainHandler, ReadMemory, SignatureSet, TargetAddress,
    locate,
};

/// Run the locate command
pub fn run(signatures_file: Option<&Path>, pid: Option<u32>) -> Result<()> {
    let signatures = super::load_signature_set(signatures_file)?;

    println!("Searching for FFXIV...");
    let process = super::open_process(pid)?;
    println!(
        "Found process (PID: {}, Base: 0x{:X}, Size: 0x{:X})",
        process.pid, process.base_address, process.module_size
    );

    let reader = MemoryReader::new(&process);
    let (bite_type, handler_slot) = locate_all(&reader, &signatures)?;

    println!();
    println!("biteType:       {}", bite_type);
    println!("fishingHandler: {}", handler_slot);

    if let Some(address) = bite_type.address() {
        match reader.read_u8(address) {
            Ok(raw) => println!("Bite type byte: 0x{:02X}", raw),
            Err(e) => println!("Bite type byte: unreadable ({})", e),
        }
    }

    let mut handler =
        PointerChainHandler::new(reader, handler_slot, signatures.handler_layout.clone());
    match handler.current_state() {
        Some(state) => println!("Fishing state:  {}", state),
        None => println!("Fishing state:  handler not available"),
    }

    if !bite_type.is_resolved() {
        println!();
        println!("Bite detection would be disabled with these signatures.");
    }

    Ok(())
}

/// Locate the bite type byte and the fishing handler slot.
pub fn locate_all(
    reader: &MemoryReader,
    signatures: &SignatureSet,
) -> Result<(TargetAddress, TargetAddress)> {
    let region = reader.code_region();
    let bite_sig = signatures
        .entry(BITE_TYPE)
        .ok_or_else(|| anyhow!("Signature set has no {} entry", BITE_TYPE))?;
    let handler_sig = signatures
        .entry(FISHING_HANDLER)
        .ok_or_else(|| anyhow!("Signature set has no {} entry", FISHING_HANDLER))?;

    Ok((
        locate(reader, region, bite_sig),
        locate(reader, region, handler_sig),
    ))
}
