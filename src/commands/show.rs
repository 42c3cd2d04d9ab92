//! `fieldkit show` — display the last collected report without re-probing.

use anyhow::Result;
use colored::Colorize;

use crate::config;
use crate::domain::render;
use crate::domain::store::ReportStore;

pub fn run(out_dir: Option<&str>, format: &str) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async { run_async(out_dir, format).await })
}

async fn run_async(out_dir: Option<&str>, format: &str) -> Result<()> {
    let cfg = config::load()?;
    let dir = cfg.resolve_output_dir(out_dir)?;
    let store = ReportStore::new(dir);

    if !store.exists() {
        anyhow::bail!(
            "no report found at {} (run `fieldkit collect` first)",
            store.json_path().display()
        );
    }

    let stored = store.read_stored().await?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&stored)?;
            println!("{}", json);
        }
        _ => {
            print!("{}", render::render_text(&stored.report));
            println!(
                "  {} {}  {} {}",
                "Checksum:".dimmed(),
                &stored.checksum[..std::cmp::min(stored.checksum.len(), 24)],
                "Age:".dimmed(),
                format!("{}s", stored.age_secs())
            );
        }
    }

    Ok(())
}
