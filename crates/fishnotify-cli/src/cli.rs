//! CLI argument definitions for fishnotify.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fishnotify_core::config::DEFAULT_CONFIG_FILE;
use fishnotify_core::packet::GLOBAL_REGION;

#[derive(Parser)]
#[command(name = "fishnotify")]
#[command(about = "Audible fish bite alerts for FFXIV", version)]
pub struct Args {
    /// Path to the settings file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, env = "FISHNOTIFY_CONFIG")]
    pub config: PathBuf,

    /// Load code signatures from file instead of the built-in set
    #[arg(long, value_name = "FILE")]
    pub signatures: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Watch for bites until quit (default)
    Run {
        /// Polling interval in milliseconds
        #[arg(long, value_name = "MS")]
        interval: Option<u64>,
    },
    /// Locate the bite type byte and the fishing handler slot
    Locate {
        /// Process ID (skip automatic detection)
        #[arg(long)]
        pid: Option<u32>,
    },
    /// Show settings and detection status
    Status {
        /// Process ID (skip automatic detection)
        #[arg(long)]
        pid: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Turn chat alerts on or off
    ToggleChat,
    /// Look up the EventPlay opcode in an opcode list file
    Opcodes {
        /// Opcode list JSON file
        file: PathBuf,
        /// Region to look up
        #[arg(long, default_value = GLOBAL_REGION)]
        region: String,
    },
}
