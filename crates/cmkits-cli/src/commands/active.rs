//! Show the active kit.

use super::Session;
use crate::ui;
use anyhow::Result;
use colored::Colorize;

pub async fn execute(session: &Session) -> Result<()> {
    let manager = session.initialized_manager().await?;

    match manager.active_kit() {
        Some(kit) => ui::print_kit(kit, true),
        None => println!("  {} No active kit", "!".yellow()),
    }

    Ok(())
}
