//! Terminal output helpers.

pub mod picker;
pub mod progress;

use cmkits_types::Kit;
use colored::Colorize;

/// Print one kit as a name line followed by its description.
pub fn print_kit(kit: &Kit, active: bool) {
    let marker = if active { "*".green().bold() } else { " ".normal() };
    println!("{} {}", marker, kit.label().cyan().bold());
    println!("    {}", kit.description().dimmed());

    if let Some(generator) = &kit.preferred_generator {
        match &generator.platform {
            Some(platform) => println!("    Generator: {} ({})", generator.name, platform),
            None => println!("    Generator: {}", generator.name),
        }
    }
}
