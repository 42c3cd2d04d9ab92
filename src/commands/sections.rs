//! `fieldkit sections` — list the probe catalog without running anything.

use anyhow::Result;
use colored::Colorize;

use crate::domain::catalog;

pub fn run() -> Result<()> {
    println!("{}", "═══ Diagnostic Sections ═══".cyan().bold());
    for (i, spec) in catalog::sections().iter().enumerate() {
        println!(
            "  {:>2}. {:<22} {}",
            i + 1,
            spec.title,
            spec.command_line().dimmed()
        );
    }
    println!();
    println!(
        "{} {}",
        catalog::sections().len().to_string().bold(),
        "sections, collected in this order"
    );
    Ok(())
}
