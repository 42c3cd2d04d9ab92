//! `fieldkit collect` — run the probe catalog and persist the report.

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::config;
use crate::domain::collector::ReportCollector;
use crate::domain::report::StoredReport;
use crate::domain::seal;
use crate::domain::store::ReportStore;

pub fn run(
    encrypt: bool,
    out_dir: Option<&str>,
    format: &str,
    timeout_secs: Option<u64>,
    key_file: Option<&str>,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async { run_async(encrypt, out_dir, format, timeout_secs, key_file).await })
}

async fn run_async(
    encrypt: bool,
    out_dir: Option<&str>,
    format: &str,
    timeout_secs: Option<u64>,
    key_file: Option<&str>,
) -> Result<()> {
    let cfg = config::load()?;
    let dir = cfg.resolve_output_dir(out_dir)?;
    let timeout = Duration::from_secs(cfg.resolve_timeout_secs(timeout_secs));

    // Load the key before collecting so a missing key fails fast, not after
    // thirty seconds of probing.
    let key = if encrypt {
        let key_path = cfg.resolve_key_file(key_file)?;
        Some(seal::load_key(&key_path)?)
    } else {
        None
    };

    println!("{}", "Collecting host diagnostics...".cyan());

    let report = ReportCollector::collect(timeout).await;
    let degraded = report.degraded_count();
    let total = report.sections.len();
    let stored = StoredReport::new(report);

    let store = ReportStore::new(dir.clone());

    match &key {
        Some(key) => {
            store.write_sealed(&stored, key).await?;
            println!(
                "{} {}",
                "Sealed report written:".green(),
                store.sealed_path().display()
            );
        }
        None => {
            store.write_plain(&stored).await?;
            println!(
                "{} {}",
                "Report written:".green(),
                store.text_path().display()
            );
        }
    }

    if degraded > 0 {
        println!(
            "{}",
            format!("warn: {} of {} sections degraded to fallback", degraded, total).yellow()
        );
    }

    match format {
        // Sealed runs never print the structured report: the whole point is
        // that plaintext exists only inside the ciphertext.
        "json" if key.is_none() => {
            let json = serde_json::to_string_pretty(&stored)?;
            println!("{}", json);
        }
        _ => {
            println!(
                "  {} {}  {} {}  {} {}",
                "Host:".dimmed(),
                stored.report.host.hostname.bold(),
                "Sections:".dimmed(),
                total,
                "Checksum:".dimmed(),
                &stored.checksum[..std::cmp::min(stored.checksum.len(), 24)]
            );
        }
    }

    Ok(())
}
