//! Toggle-chat command.

use std::path::Path;

use anyhow::Result;
use fishnotify_core::Configuration;

pub fn run(config_path: &Path) -> Result<()> {
    let mut config = Configuration::load(config_path)?;
    let enabled = config.toggle_chat_alerts(config_path)?;

    println!(
        "Chat alerts {} ({})",
        if enabled { "enabled" } else { "disabled" },
        config_path.display()
    );
    Ok(())
}
