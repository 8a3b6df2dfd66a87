//! Visual Studio toolset kits.

use super::Session;
use crate::ui::{self, progress};
use anyhow::{bail, Context, Result};
use cmkits_kit::VsToolset;
use colored::Colorize;
use indexmap::IndexMap;

pub async fn kits(session: &Session) -> Result<()> {
    let pb = progress::spinner("Querying Visual Studio installations...");
    let kits = session.toolset().scan_kits().await;
    pb.finish_and_clear();
    let kits = kits.context("Failed to scan Visual Studio installations")?;

    if kits.is_empty() {
        println!("  {} No Visual Studio kits found", "!".yellow());
        return Ok(());
    }

    println!("{} Visual Studio kits", "Available".green().bold());
    for kit in &kits {
        ui::print_kit(kit, false);
    }

    Ok(())
}

pub async fn env(session: &Session, name: &str) -> Result<()> {
    let toolset = session.toolset();

    let pb = progress::spinner("Resolving build environment...");
    let resolved = resolve_environment(session, &toolset, name).await;
    pb.finish_and_clear();

    let Some(environment) = resolved.context("Failed to resolve build environment")? else {
        bail!("No kit named '{}'", name);
    };
    let Some(environment) = environment else {
        bail!("'{}' is not an available Visual Studio kit", name);
    };

    for (key, value) in &environment {
        println!("{}={}", key, value);
    }

    Ok(())
}

/// `None` when no kit has that name; `Some(None)` when it has no Visual
/// Studio environment.
async fn resolve_environment(
    session: &Session,
    toolset: &VsToolset,
    name: &str,
) -> cmkits_types::Result<Option<Option<IndexMap<String, String>>>> {
    let stored = session.store().load().await;
    let kit = match stored.into_iter().find(|kit| kit.name == name) {
        Some(kit) => kit,
        None => match toolset.scan_kits().await?.into_iter().find(|kit| kit.name == name) {
            Some(kit) => kit,
            None => return Ok(None),
        },
    };

    toolset.environment_for(&kit).await.map(Some)
}
