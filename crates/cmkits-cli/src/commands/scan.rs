//! Rescan the toolchain directory.

use super::Session;
use crate::ui::{self, progress};
use anyhow::{Context, Result};
use colored::Colorize;

pub async fn execute(session: &Session) -> Result<()> {
    let mut manager = session.manager();

    let pb = progress::spinner("Scanning for kits...");
    let result = async {
        manager.initialize().await?;
        manager.rescan_for_kits().await
    }
    .await;
    pb.finish_and_clear();
    result.context("Failed to scan for kits")?;

    println!(
        "{} {} kit(s), saved to {}",
        "Found".green().bold(),
        manager.kits().len(),
        manager.store().path().display()
    );

    let active = manager.active_kit().map(|kit| kit.name.clone());
    for kit in manager.kits() {
        ui::print_kit(kit, active.as_deref() == Some(kit.name.as_str()));
    }

    Ok(())
}
