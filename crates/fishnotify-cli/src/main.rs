mod cli;
mod commands;
mod input;
mod shutdown;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins unless --verbose asks for debug output
    let env_filter = if args.verbose {
        EnvFilter::new("fishnotify=debug,fishnotify_core=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("fishnotify=info,fishnotify_core=info"))
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let signatures = args.signatures.as_deref();

    match args.command {
        Some(Command::Run { interval }) => {
            commands::run::run(&args.config, signatures, interval.map(Duration::from_millis))
        }
        Some(Command::Locate { pid }) => commands::locate::run(signatures, pid),
        Some(Command::Status { pid, json }) => {
            commands::status::run(&args.config, signatures, pid, json)
        }
        Some(Command::ToggleChat) => commands::toggle_chat::run(&args.config),
        Some(Command::Opcodes { file, region }) => commands::opcodes::run(&file, &region),
        None => commands::run::run(&args.config, signatures, None),
    }
}
