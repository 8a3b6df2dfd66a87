//! Interactive kit selection.

use async_trait::async_trait;
use cmkits_types::{KitChoice, KitError, KitPicker, Result};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

/// Offers kits in a terminal menu. Escape cancels.
pub struct TerminalPicker;

#[async_trait]
impl KitPicker for TerminalPicker {
    async fn pick(&self, choices: &[KitChoice]) -> Result<Option<usize>> {
        let items: Vec<String> = choices
            .iter()
            .map(|choice| format!("{}  {}", choice.label, choice.description.dimmed()))
            .collect();

        tokio::task::spawn_blocking(move || {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Select a Kit")
                .items(&items)
                .default(0)
                .interact_opt()
                .map_err(|e| KitError::Other(format!("Kit selection failed: {}", e)))
        })
        .await
        .map_err(|e| KitError::Other(format!("Kit selection failed: {}", e)))?
    }
}
