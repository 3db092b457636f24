//! Main detection loop.

use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::Result;
use fishnotify_core::alert::{ConsoleChat, TerminalBell};
use fishnotify_core::config::polling::{LIVENESS_CHECK_TICKS, RECONNECT_DELAY, TICK_INTERVAL};
use fishnotify_core::{
    AlertDispatcher, AudioSink, ChatSink, Configuration, Engine, MemoryReader, MemorySignalSource,
    PointerChainHandler, ProcessHandle, SignalSource, SignatureSet,
};
use tracing::{debug, error, info, warn};

use super::locate::locate_all;
use crate::input::{self, KeyAction};
use crate::shutdown::ShutdownSignal;

/// Run the detection loop until the user quits.
pub fn run(
    config_path: &Path,
    signatures_file: Option<&Path>,
    interval: Option<Duration>,
) -> Result<()> {
    let signatures = super::load_signature_set(signatures_file)?;
    let mut config = load_config(config_path);
    let interval = interval.unwrap_or(TICK_INTERVAL);
    let (shutdown, keys) = setup_shutdown_handler()?;

    println!("FishNotify v{}", env!("CARGO_PKG_VERSION"));
    println!("Waiting for FFXIV... (Esc or q to quit, c to toggle chat alerts)");

    while !shutdown.is_shutdown() {
        if let Some(process) = wait_for_process(&shutdown) {
            let mut session = Session {
                process: &process,
                config: &mut config,
                config_path,
                shutdown: &shutdown,
                keys: &keys,
                interval,
            };
            if let Err(e) = session.run(&signatures) {
                error!("Detection session error: {}", e);
            }
            if !shutdown.is_shutdown() {
                println!("Waiting for FFXIV...");
            }
        }

        if shutdown.wait(RECONNECT_DELAY) {
            break;
        }
    }

    println!("Shutdown complete.");
    Ok(())
}

/// Install Ctrl+C and key handlers.
fn setup_shutdown_handler() -> Result<(Arc<ShutdownSignal>, Receiver<KeyAction>)> {
    let shutdown = Arc::new(ShutdownSignal::new());

    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        println!("\nShutting down...");
        shutdown_ctrlc.trigger();
    })?;

    let (sender, receiver) = mpsc::channel();
    let _keyboard_handle = input::spawn_keyboard_monitor(Arc::clone(&shutdown), sender);

    Ok((shutdown, receiver))
}

fn load_config(path: &Path) -> Configuration {
    match Configuration::load(path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            Configuration::default()
        }
    }
}

fn wait_for_process(shutdown: &ShutdownSignal) -> Option<ProcessHandle> {
    if shutdown.is_shutdown() {
        return None;
    }

    match ProcessHandle::find_and_open() {
        Ok(process) => {
            println!("Connected to FFXIV (PID: {})", process.pid);
            debug!("Process base: {:#x}", process.base_address);
            Some(process)
        }
        Err(e) => {
            debug!("Process not found: {}", e);
            None
        }
    }
}

/// One connection to a running game process.
struct Session<'a> {
    process: &'a ProcessHandle,
    config: &'a mut Configuration,
    config_path: &'a Path,
    shutdown: &'a ShutdownSignal,
    keys: &'a Receiver<KeyAction>,
    interval: Duration,
}

impl Session<'_> {
    fn run(&mut self, signatures: &SignatureSet) -> Result<()> {
        let reader = MemoryReader::new(self.process);
        let (bite_type, handler_slot) = locate_all(&reader, signatures)?;

        let handler =
            PointerChainHandler::new(reader, handler_slot, signatures.handler_layout.clone());
        let source = MemorySignalSource::new(reader, bite_type, handler);
        let dispatcher = AlertDispatcher::new(
            TerminalBell::stdout(),
            ConsoleChat::stdout(true),
            self.config.chat_alerts,
        );
        let mut engine = Engine::new(source, dispatcher);

        let mut status = engine.status();
        println!("Status: {}", status);

        let mut ticks: u32 = 0;
        let mut next_tick = Instant::now() + self.interval;
        while !self.shutdown.pace(&mut next_tick, self.interval) {
            for action in self.keys.try_iter() {
                if action == KeyAction::ToggleChat {
                    self.toggle_chat(&mut engine);
                }
            }

            engine.tick();

            let current = engine.status();
            if current != status {
                println!("Status: {}", current);
                status = current;
            }

            ticks = ticks.wrapping_add(1);
            if ticks % LIVENESS_CHECK_TICKS == 0 && !self.process.is_alive() {
                info!("FFXIV process exited");
                break;
            }
        }

        engine.shutdown();
        Ok(())
    }

    fn toggle_chat<S, A, C>(&mut self, engine: &mut Engine<S, A, C>)
    where
        S: SignalSource,
        A: AudioSink,
        C: ChatSink,
    {
        match self.config.toggle_chat_alerts(self.config_path) {
            Ok(enabled) => {
                engine.set_chat_alerts(enabled);
                println!(
                    "Chat alerts {}",
                    if enabled { "enabled" } else { "disabled" }
                );
            }
            Err(e) => warn!("Failed to save chat alert setting: {}", e),
        }
    }
}
