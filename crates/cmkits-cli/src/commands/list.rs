//! List known kits.

use super::Session;
use crate::ui;
use anyhow::Result;
use colored::Colorize;

pub async fn execute(session: &Session, json: bool) -> Result<()> {
    let manager = session.initialized_manager().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(manager.kits())?);
        return Ok(());
    }

    if manager.kits().is_empty() {
        println!("  {} No kits found. Run `cmkits scan` after installing a toolchain.", "!".yellow());
        return Ok(());
    }

    println!("{} kits", "Available".green().bold());
    let active = manager.active_kit().map(|kit| kit.name.clone());
    for kit in manager.kits() {
        ui::print_kit(kit, active.as_deref() == Some(kit.name.as_str()));
    }

    Ok(())
}
