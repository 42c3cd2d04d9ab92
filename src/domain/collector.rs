//! Report collector — runs the catalog of diagnostic probes on the local host.
//!
//! Sections run sequentially in catalog order so the rendered report reads the
//! same way on every host. Each probe degrades independently: a missing or
//! failing utility yields the fallback body, never an error for the whole run.

use chrono::Utc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use super::catalog::{self, SectionSpec, FALLBACK_BODY};
use super::report::{DiagnosticReport, HostSummary, ReportSection};
use crate::platform;
use crate::tools;

pub struct ReportCollector;

impl ReportCollector {
    /// Collect a complete diagnostic report from this machine.
    ///
    /// `timeout` bounds each individual probe, not the whole run.
    pub async fn collect(timeout: Duration) -> DiagnosticReport {
        let host = Self::collect_host_summary().await;

        let mut sections = Vec::with_capacity(catalog::sections().len());
        for spec in catalog::sections() {
            sections.push(Self::collect_section(spec, timeout).await);
        }

        DiagnosticReport {
            collected_at: Utc::now(),
            collector_version: env!("CARGO_PKG_VERSION").to_string(),
            host,
            sections,
        }
    }

    async fn collect_section(spec: &SectionSpec, timeout: Duration) -> ReportSection {
        if tools::find(spec.program).is_none() {
            warn!(program = spec.program, title = spec.title, "utility not found");
            return Self::fallback_section(spec);
        }

        debug!(command = %spec.command_line(), title = spec.title, "running probe");

        let result = tokio::time::timeout(timeout, run_combined(spec.program, spec.args)).await;

        match result {
            Ok(Some(output)) if !output.trim().is_empty() => ReportSection {
                title: spec.title.to_string(),
                command: spec.command_line(),
                output,
                available: true,
            },
            Ok(_) => {
                warn!(program = spec.program, title = spec.title, "no output");
                Self::fallback_section(spec)
            }
            Err(_) => {
                warn!(
                    program = spec.program,
                    title = spec.title,
                    timeout_secs = timeout.as_secs(),
                    "probe timed out"
                );
                Self::fallback_section(spec)
            }
        }
    }

    fn fallback_section(spec: &SectionSpec) -> ReportSection {
        ReportSection {
            title: spec.title.to_string(),
            command: spec.command_line(),
            output: FALLBACK_BODY.to_string(),
            available: false,
        }
    }

    // ── Host summary ───────────────────────────────────────

    #[cfg(target_os = "macos")]
    async fn collect_host_summary() -> HostSummary {
        let (product, version, kernel, arch, boottime) = tokio::join!(
            run_cmd("sw_vers", &["-productName"]),
            run_cmd("sw_vers", &["-productVersion"]),
            run_cmd("uname", &["-r"]),
            run_cmd("uname", &["-m"]),
            run_cmd("sysctl", &["-n", "kern.boottime"]),
        );

        let uptime_secs = boottime
            .as_deref()
            .and_then(parse_kern_boottime)
            .map(|boot| (Utc::now().timestamp() - boot).max(0) as u64)
            .unwrap_or(0);

        HostSummary {
            hostname: gethostname(),
            distribution: trimmed_or_unknown(product),
            os_version: trimmed_or_unknown(version),
            kernel_version: trimmed_or_unknown(kernel),
            architecture: trimmed_or_unknown(arch),
            platform_triple: platform_triple(),
            uptime_secs,
            is_wsl: false,
        }
    }

    #[cfg(not(target_os = "macos"))]
    async fn collect_host_summary() -> HostSummary {
        let (os_release, kernel, arch, proc_uptime) = tokio::join!(
            tokio::fs::read_to_string("/etc/os-release"),
            run_cmd("uname", &["-r"]),
            run_cmd("uname", &["-m"]),
            tokio::fs::read_to_string("/proc/uptime"),
        );

        let os_release = os_release.unwrap_or_default();
        let distribution = parse_os_release_field(&os_release, "NAME")
            .unwrap_or_else(|| "unknown".into());
        let os_version = parse_os_release_field(&os_release, "VERSION_ID")
            .unwrap_or_else(|| "unknown".into());

        let uptime_secs = proc_uptime
            .ok()
            .and_then(|s| {
                s.split_whitespace()
                    .next()
                    .and_then(|v| v.parse::<f64>().ok())
            })
            .map(|f| f as u64)
            .unwrap_or(0);

        let is_wsl = detect_wsl().await;

        HostSummary {
            hostname: gethostname(),
            distribution,
            os_version,
            kernel_version: trimmed_or_unknown(kernel),
            architecture: trimmed_or_unknown(arch),
            platform_triple: platform_triple(),
            uptime_secs,
            is_wsl,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// Helper functions
// ═══════════════════════════════════════════════════════════════

/// Run a probe and capture stdout with stderr appended, the way `2>&1` would.
///
/// A non-zero exit with output still counts: utilities like `last` exit
/// non-zero on some hosts while printing perfectly useful data.
async fn run_combined(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().await.ok()?;

    let mut text = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }

    Some(text)
}

async fn run_cmd(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().await.ok()?;

    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        None
    }
}

fn gethostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".into())
}

fn trimmed_or_unknown(value: Option<String>) -> String {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".into())
}

fn platform_triple() -> String {
    platform::detect()
        .map(|p| p.target_triple().to_string())
        .unwrap_or_else(|_| "unknown".into())
}

/// Parse `{ sec = 1700000000, usec = 0 } ...` from kern.boottime.
#[cfg(target_os = "macos")]
fn parse_kern_boottime(output: &str) -> Option<i64> {
    output
        .split("sec =")
        .nth(1)?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

#[cfg(not(target_os = "macos"))]
fn parse_os_release_field(content: &str, field: &str) -> Option<String> {
    content
        .lines()
        .find(|l| l.starts_with(&format!("{}=", field)))
        .map(|l| {
            l.split('=')
                .nth(1)
                .unwrap_or("")
                .trim_matches('"')
                .to_string()
        })
}

#[cfg(not(target_os = "macos"))]
async fn detect_wsl() -> bool {
    tokio::fs::read_to_string("/proc/version")
        .await
        .map(|v| {
            let lower = v.to_lowercase();
            lower.contains("microsoft") || lower.contains("wsl")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_all_catalog_sections_in_order() {
        let report = ReportCollector::collect(Duration::from_secs(10)).await;
        let expected: Vec<&str> = catalog::sections().iter().map(|s| s.title).collect();
        let actual: Vec<&str> = report.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn missing_utility_degrades_to_fallback() {
        let spec = SectionSpec {
            title: "Nonexistent",
            program: "fieldkit-no-such-utility-zzz",
            args: &[],
        };
        let section = ReportCollector::collect_section(&spec, Duration::from_secs(5)).await;
        assert!(!section.available);
        assert_eq!(section.output, FALLBACK_BODY);
    }

    #[tokio::test]
    async fn real_utility_produces_output() {
        let spec = SectionSpec {
            title: "Echo",
            program: "echo",
            args: &["hello"],
        };
        let section = ReportCollector::collect_section(&spec, Duration::from_secs(5)).await;
        assert!(section.available);
        assert_eq!(section.output.trim(), "hello");
    }

    #[tokio::test]
    async fn host_summary_has_hostname() {
        let report = ReportCollector::collect_host_summary().await;
        assert!(!report.hostname.is_empty());
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn parses_kern_boottime_output() {
        let out = "{ sec = 1700000000, usec = 123456 } Tue Nov 14 22:13:20 2023";
        assert_eq!(parse_kern_boottime(out), Some(1_700_000_000));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn parses_os_release_fields() {
        let content = "NAME=\"Debian GNU/Linux\"\nVERSION_ID=\"12\"\nID=debian\n";
        assert_eq!(
            parse_os_release_field(content, "NAME").as_deref(),
            Some("Debian GNU/Linux")
        );
        assert_eq!(
            parse_os_release_field(content, "VERSION_ID").as_deref(),
            Some("12")
        );
        assert!(parse_os_release_field(content, "PRETTY").is_none());
    }
}
