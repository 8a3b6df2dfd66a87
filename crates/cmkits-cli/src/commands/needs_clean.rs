//! Decide whether a kit switch requires a clean build.

use super::Session;
use anyhow::{anyhow, Result};
use cmkits_kit::kit_change_needs_clean;
use cmkits_types::{Kit, StateStore};
use colored::Colorize;

pub async fn execute(session: &Session, new: &str, old: Option<&str>) -> Result<()> {
    // Every stored kit, including ones a reload would skip
    let kits = session.store().load().await;
    let find = |name: &str| -> Result<Kit> {
        kits.iter()
            .find(|kit| kit.name == name)
            .cloned()
            .ok_or_else(|| anyhow!("No kit named '{}'", name))
    };

    let new_kit = find(new)?;
    let old_kit = match old {
        Some(old) => Some(find(old)?),
        // A stale active name counts as no prior kit
        None => session
            .state()
            .active_kit_name()
            .and_then(|name| find(name.as_str()).ok()),
    };

    if kit_change_needs_clean(&new_kit, old_kit.as_ref()) {
        println!("{} switching to {} requires a clean build", "Yes:".yellow().bold(), new_kit.name);
    } else {
        println!("{} switching to {} keeps the build tree", "No:".green().bold(), new_kit.name);
    }

    Ok(())
}
