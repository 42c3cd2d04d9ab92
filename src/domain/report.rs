//! Diagnostic report — the structured result of a collection run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A report wrapped with integrity metadata for storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReport {
    /// SHA-256 checksum of the serialized report: "sha256:<hex>"
    pub checksum: String,
    /// When the report was collected.
    pub collected_at: DateTime<Utc>,
    /// Version of the collector that produced this report.
    pub collector_version: String,
    /// The actual report data.
    pub report: DiagnosticReport,
}

impl StoredReport {
    /// Create a new StoredReport from a DiagnosticReport, computing the SHA-256 checksum.
    pub fn new(report: DiagnosticReport) -> Self {
        let serialized = serde_json::to_string(&report).unwrap_or_default();
        let hash = Sha256::digest(serialized.as_bytes());
        let checksum = format!("sha256:{:x}", hash);

        Self {
            checksum,
            collected_at: report.collected_at,
            collector_version: env!("CARGO_PKG_VERSION").to_string(),
            report,
        }
    }

    /// Seconds since the report was collected.
    pub fn age_secs(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.collected_at)
            .num_seconds()
    }

    /// Verify the checksum matches the report data. Returns true if valid.
    pub fn verify(&self) -> bool {
        let serialized = serde_json::to_string(&self.report).unwrap_or_default();
        let hash = Sha256::digest(serialized.as_bytes());
        let expected = format!("sha256:{:x}", hash);
        self.checksum == expected
    }
}

/// Complete diagnostic report from the local host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub collected_at: DateTime<Utc>,
    pub collector_version: String,
    pub host: HostSummary,
    pub sections: Vec<ReportSection>,
}

impl DiagnosticReport {
    /// Number of sections that fell back because their utility was missing,
    /// failed, or produced nothing.
    pub fn degraded_count(&self) -> usize {
        self.sections.iter().filter(|s| !s.available).count()
    }
}

/// Identity of the host the report describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSummary {
    pub hostname: String,
    pub distribution: String,
    pub os_version: String,
    pub kernel_version: String,
    pub architecture: String,
    pub platform_triple: String,
    pub uptime_secs: u64,
    pub is_wsl: bool,
}

/// One captured section: the probe that ran and what it printed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub command: String,
    pub output: String,
    /// False when the section body is the fallback text instead of real output.
    pub available: bool,
}
