//! Status command implementation.

use std::path::Path;

use anyhow::Result;
use fishnotify_core::alert::{ConsoleChat, NullAudio};
use fishnotify_core::{
    AlertDispatcher, Configuration, Engine, EngineStatus, MemoryReader, MemorySignalSource,
    PointerChainHandler, TargetAddress,
};
use serde_json::json;
use tracing::debug;

use super::locate::locate_all;

/// What the status command found in the running game.
struct Detection {
    pid: u32,
    bite_type: TargetAddress,
    handler_slot: TargetAddress,
    status: EngineStatus,
}

/// Run the status command
pub fn run(
    config_path: &Path,
    signatures_file: Option<&Path>,
    pid: Option<u32>,
    json: bool,
) -> Result<()> {
    let config = Configuration::load(config_path)?;
    let signatures = super::load_signature_set(signatures_file)?;

    let detection = match super::open_process(pid) {
        Ok(process) => {
            let reader = MemoryReader::new(&process);
            let (bite_type, handler_slot) = locate_all(&reader, &signatures)?;
            let handler =
                PointerChainHandler::new(reader, handler_slot, signatures.handler_layout.clone());
            let source = MemorySignalSource::new(reader, bite_type, handler);
            let engine = Engine::new(
                source,
                AlertDispatcher::new(NullAudio, ConsoleChat::stdout(false), config.chat_alerts),
            );

            Some(Detection {
                pid: process.pid,
                bite_type,
                handler_slot,
                status: engine.status(),
            })
        }
        Err(e) => {
            debug!("Process not available: {}", e);
            None
        }
    };

    if json {
        let value = json!({
            "config": config_path.display().to_string(),
            "chatAlerts": config.chat_alerts,
            "signatures": signatures.version,
            "process": detection.as_ref().map(|d| json!({
                "pid": d.pid,
                "biteType": d.bite_type.address(),
                "fishingHandler": d.handler_slot.address(),
                "status": d.status.to_string(),
                "ok": d.status.is_ok(),
            })),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("FishNotify {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("=== Settings ===");
    println!("Config:      {}", config_path.display());
    println!(
        "Chat alerts: {}",
        if config.chat_alerts { "on" } else { "off" }
    );
    println!("Signatures:  {}", signatures.version);

    println!();
    println!("=== Detection ===");
    match detection {
        Some(d) => {
            println!("PID:            {}", d.pid);
            println!("biteType:       {}", d.bite_type);
            println!("fishingHandler: {}", d.handler_slot);
            println!("Status:         {}", d.status);
        }
        None => println!("FFXIV is not running"),
    }

    Ok(())
}
