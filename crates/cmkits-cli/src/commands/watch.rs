//! Follow changes to the kits file.

use super::Session;
use anyhow::Result;
use colored::Colorize;
use tokio::sync::broadcast::error::TryRecvError;

pub async fn execute(session: &Session) -> Result<()> {
    let mut manager = session.initialized_manager().await?;
    let mut events = manager.subscribe();
    manager.watch_store()?;

    println!(
        "{} {} (Ctrl-C to stop)",
        "Watching".green().bold(),
        manager.store().path().display()
    );

    let cancel = session.cancellation_token();
    loop {
        let changed = tokio::select! {
            _ = cancel.cancelled() => break,
            changed = manager.wait_for_store_change() => changed?,
        };
        if !changed {
            break;
        }
        println!("{} {} kit(s)", "Reloaded".cyan().bold(), manager.kits().len());

        loop {
            match events.try_recv() {
                Ok(Some(kit)) => println!("  Active kit: {}", kit.name.cyan()),
                Ok(None) => println!("  {} No active kit", "!".yellow()),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    }

    manager.dispose();
    Ok(())
}
