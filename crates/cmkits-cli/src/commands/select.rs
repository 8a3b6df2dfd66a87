//! Choose the active kit.

use super::Session;
use crate::ui::{self, picker::TerminalPicker};
use anyhow::{bail, Result};
use cmkits_kit::KitSelection;
use colored::Colorize;

pub async fn execute(session: &Session, name: Option<&str>) -> Result<()> {
    let mut manager = session.initialized_manager().await?;

    if let Some(name) = name {
        let Some(kit) = manager.select_kit_by_name(name).await? else {
            bail!("No kit named '{}'", name);
        };
        println!("{} {}", "Selected".green().bold(), kit.name.cyan());
        return Ok(());
    }

    match manager.select_kit(&TerminalPicker).await? {
        KitSelection::Selected(kit) => {
            println!("{} {}", "Selected".green().bold(), kit.name.cyan());
            ui::print_kit(&kit, true);
        }
        KitSelection::Cancelled => println!("{}", "Cancelled".yellow()),
        KitSelection::NoKitsAvailable => {
            println!("  {} No kits available to choose from", "!".yellow());
        }
    }

    Ok(())
}
