//! Plain-text rendering of a diagnostic report.
//!
//! The rendered text is what gets written to disk (and sealed), so it is
//! deliberately free of ANSI color codes.

use super::report::DiagnosticReport;

/// Render the full report as the labeled-section text document.
pub fn render_text(report: &DiagnosticReport) -> String {
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str("        Fieldkit Diagnostic Report\n");
    out.push_str("═══════════════════════════════════════════════\n\n");

    out.push_str(&format!(
        "Collected:    {}\n",
        report.collected_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Collector:    v{}\n", report.collector_version));
    out.push_str(&format!("Hostname:     {}\n", report.host.hostname));
    out.push_str(&format!(
        "OS:           {} {}\n",
        report.host.distribution, report.host.os_version
    ));
    out.push_str(&format!("Kernel:       {}\n", report.host.kernel_version));
    out.push_str(&format!(
        "Platform:     {} ({})\n",
        report.host.platform_triple, report.host.architecture
    ));
    out.push_str(&format!(
        "Uptime:       {}\n",
        fmt_uptime(report.host.uptime_secs)
    ));
    if report.host.is_wsl {
        out.push_str("Environment:  WSL\n");
    }
    out.push('\n');

    for section in &report.sections {
        out.push_str(&format!("── {} ──\n", section.title));
        out.push_str(&format!("$ {}\n", section.command));
        out.push_str(section.output.trim_end());
        out.push_str("\n\n");
    }

    out
}

/// Format an uptime in seconds as "3d 4h 12m".
pub fn fmt_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let mins = (secs % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, mins)
    } else if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}
