//! `fieldkit keygen` — create the report key used to seal reports.

use anyhow::Result;
use colored::Colorize;

use crate::config;
use crate::domain::seal::{self, ReportKey};

pub fn run(out: Option<&str>, force: bool) -> Result<()> {
    let cfg = config::load()?;
    let path = cfg.resolve_key_file(out)?;

    let key = ReportKey::generate();
    seal::write_key_file(&path, &key, force)?;

    // Remember where the key lives so collect --encrypt finds it.
    config::save_key_file(&path.to_string_lossy())?;

    println!("{} {}", "Report key written:".green(), path.display());
    println!(
        "{}",
        "Back this file up somewhere safe. Sealed reports cannot be opened without it.".yellow()
    );
    Ok(())
}
