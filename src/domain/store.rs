//! ReportStore — atomic file I/O for report artifacts with write locking.
//!
//! Plain runs write `report.txt` plus `report.json` (the structured report
//! with its checksum). Sealed runs write only `report.txt.sealed` and remove
//! any plaintext artifacts left by earlier runs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::sync::Mutex;
use tracing::warn;

use super::render;
use super::report::StoredReport;
use super::seal::{self, ReportKey};

pub const TEXT_FILE: &str = "report.txt";
pub const JSON_FILE: &str = "report.json";
pub const SEALED_FILE: &str = "report.txt.sealed";

pub struct ReportStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl ReportStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            write_lock: Mutex::new(()),
        }
    }

    pub fn text_path(&self) -> PathBuf {
        self.dir.join(TEXT_FILE)
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join(JSON_FILE)
    }

    pub fn sealed_path(&self) -> PathBuf {
        self.dir.join(SEALED_FILE)
    }

    /// Write the plain artifacts: rendered text and structured JSON.
    pub async fn write_plain(&self, stored: &StoredReport) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        self.ensure_dir().await?;

        let text = render::render_text(&stored.report);
        write_atomic(&self.text_path(), text.as_bytes()).await?;

        let json = serde_json::to_string_pretty(stored)
            .context("failed to serialize StoredReport")?;
        write_atomic(&self.json_path(), json.as_bytes()).await?;

        Ok(())
    }

    /// Write the sealed artifact only, removing plaintext left on disk.
    ///
    /// The rendered text never touches the filesystem unencrypted: it is
    /// sealed in memory and only the ciphertext is written.
    pub async fn write_sealed(&self, stored: &StoredReport, key: &ReportKey) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        self.ensure_dir().await?;

        let text = render::render_text(&stored.report);
        let sealed = seal::seal(key, text.as_bytes()).context("sealing report")?;
        write_atomic(&self.sealed_path(), &sealed).await?;

        // Stale plaintext from an earlier plain run must not outlive the seal.
        remove_if_exists(&self.text_path()).await?;
        remove_if_exists(&self.json_path()).await?;

        Ok(())
    }

    /// Read the structured report back and verify its checksum.
    pub async fn read_stored(&self) -> Result<StoredReport> {
        let path = self.json_path();
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;

        let stored: StoredReport = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;

        if !stored.verify() {
            warn!(path = %path.display(), "report file checksum mismatch");
            bail!("checksum verification failed for {}", path.display());
        }

        Ok(stored)
    }

    pub fn exists(&self) -> bool {
        self.json_path().exists()
    }

    async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating directory {}", self.dir.display()))
    }
}

/// Write to a `.tmp` sibling, then atomically rename to the final path.
async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "artifact".into());
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name));

    tokio::fs::write(&tmp_path, content)
        .await
        .with_context(|| format!("writing temp file {}", tmp_path.display()))?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("renaming {} to {}", tmp_path.display(), path.display()))?;

    Ok(())
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{DiagnosticReport, HostSummary, ReportSection};
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_stored() -> StoredReport {
        StoredReport::new(DiagnosticReport {
            collected_at: Utc::now(),
            collector_version: env!("CARGO_PKG_VERSION").to_string(),
            host: HostSummary {
                hostname: "store-test".into(),
                distribution: "TestOS".into(),
                os_version: "1".into(),
                kernel_version: "6.0".into(),
                architecture: "x86_64".into(),
                platform_triple: "x86_64-linux".into(),
                uptime_secs: 10,
                is_wsl: false,
            },
            sections: vec![ReportSection {
                title: "Disk Usage".into(),
                command: "df -h".into(),
                output: "ok".into(),
                available: true,
            }],
        })
    }

    #[tokio::test]
    async fn plain_write_produces_text_and_json() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().to_path_buf());
        store.write_plain(&sample_stored()).await.unwrap();

        assert!(store.text_path().exists());
        assert!(store.json_path().exists());
        assert!(!store.sealed_path().exists());

        let text = tokio::fs::read_to_string(store.text_path()).await.unwrap();
        assert!(text.contains("── Disk Usage ──"));
    }

    #[tokio::test]
    async fn read_stored_round_trips_and_verifies() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().to_path_buf());
        let stored = sample_stored();
        store.write_plain(&stored).await.unwrap();

        let back = store.read_stored().await.unwrap();
        assert_eq!(back.checksum, stored.checksum);
        assert!(back.verify());
    }

    #[tokio::test]
    async fn read_stored_rejects_tampered_file() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().to_path_buf());
        store.write_plain(&sample_stored()).await.unwrap();

        let content = tokio::fs::read_to_string(store.json_path()).await.unwrap();
        let tampered = content.replace("store-test", "evil-host");
        tokio::fs::write(store.json_path(), tampered).await.unwrap();

        assert!(store.read_stored().await.is_err());
    }

    #[tokio::test]
    async fn sealed_write_removes_plaintext() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().to_path_buf());
        let stored = sample_stored();

        // A prior plain run leaves plaintext behind
        store.write_plain(&stored).await.unwrap();
        assert!(store.text_path().exists());

        let key = ReportKey::generate();
        store.write_sealed(&stored, &key).await.unwrap();

        assert!(!store.text_path().exists());
        assert!(!store.json_path().exists());
        assert!(store.sealed_path().exists());

        let sealed = tokio::fs::read(store.sealed_path()).await.unwrap();
        assert!(!sealed.is_empty());

        // The ciphertext opens back to exactly the rendered text
        let opened = seal::open(&key, &sealed).unwrap();
        assert_eq!(opened, render::render_text(&stored.report).as_bytes());
    }

    #[tokio::test]
    async fn no_tmp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().to_path_buf());
        store.write_plain(&sample_stored()).await.unwrap();

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().to_string();
            assert!(!name.ends_with(".tmp"), "leftover temp file: {}", name);
        }
    }
}
