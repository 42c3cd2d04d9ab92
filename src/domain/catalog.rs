//! Section catalog — the fixed, ordered list of diagnostic probes.
//!
//! Each entry names one external utility invocation and the section title it
//! renders under. The order here is the order sections appear in the report.

/// One labeled diagnostic probe.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub title: &'static str,
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl SectionSpec {
    /// The invocation line rendered under the section header.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.to_string()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Body used for a section whose utility is absent, failed to spawn, timed
/// out, or produced no output.
pub const FALLBACK_BODY: &str = "not available on this host";

#[cfg(target_os = "macos")]
pub fn sections() -> &'static [SectionSpec] {
    &[
        SectionSpec { title: "System Version", program: "sw_vers", args: &[] },
        SectionSpec { title: "Hardware Overview", program: "system_profiler", args: &["SPHardwareDataType"] },
        SectionSpec {
            title: "CPU & Kernel",
            program: "sysctl",
            args: &[
                "machdep.cpu.brand_string",
                "hw.physicalcpu",
                "hw.logicalcpu",
                "hw.memsize",
                "kern.osrelease",
            ],
        },
        SectionSpec { title: "Memory Pressure", program: "vm_stat", args: &[] },
        SectionSpec { title: "Disk Usage", program: "df", args: &["-h"] },
        SectionSpec { title: "Mounted Volumes", program: "mount", args: &[] },
        SectionSpec { title: "Network Interfaces", program: "ifconfig", args: &["-a"] },
        SectionSpec { title: "Routing Table", program: "netstat", args: &["-rn"] },
        SectionSpec { title: "DNS Configuration", program: "scutil", args: &["--dns"] },
        SectionSpec { title: "Power & Battery", program: "pmset", args: &["-g", "batt"] },
        SectionSpec { title: "Uptime & Load", program: "uptime", args: &[] },
        SectionSpec { title: "Running Processes", program: "ps", args: &["aux"] },
        SectionSpec { title: "Logged-in Users", program: "who", args: &[] },
        SectionSpec { title: "Login History", program: "last", args: &["-20"] },
    ]
}

#[cfg(not(target_os = "macos"))]
pub fn sections() -> &'static [SectionSpec] {
    &[
        SectionSpec { title: "System Identity", program: "uname", args: &["-a"] },
        SectionSpec { title: "OS Release", program: "hostnamectl", args: &[] },
        SectionSpec { title: "CPU", program: "lscpu", args: &[] },
        SectionSpec { title: "Memory", program: "free", args: &["-h"] },
        SectionSpec { title: "Disk Usage", program: "df", args: &["-h"] },
        SectionSpec { title: "Mounted Volumes", program: "mount", args: &[] },
        SectionSpec { title: "Network Interfaces", program: "ip", args: &["addr"] },
        SectionSpec { title: "Routing Table", program: "ip", args: &["route"] },
        SectionSpec { title: "DNS Configuration", program: "resolvectl", args: &["status"] },
        SectionSpec { title: "Listening Sockets", program: "ss", args: &["-tuln"] },
        SectionSpec { title: "Uptime & Load", program: "uptime", args: &[] },
        SectionSpec { title: "Running Processes", program: "ps", args: &["aux"] },
        SectionSpec { title: "Logged-in Users", program: "who", args: &[] },
        SectionSpec { title: "Login History", program: "last", args: &["-20"] },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_is_not_empty() {
        assert!(!sections().is_empty());
    }

    #[test]
    fn section_titles_are_unique() {
        let titles: HashSet<&str> = sections().iter().map(|s| s.title).collect();
        assert_eq!(titles.len(), sections().len());
    }

    #[test]
    fn command_line_joins_program_and_args() {
        let spec = SectionSpec {
            title: "Disk Usage",
            program: "df",
            args: &["-h"],
        };
        assert_eq!(spec.command_line(), "df -h");

        let bare = SectionSpec {
            title: "Uptime & Load",
            program: "uptime",
            args: &[],
        };
        assert_eq!(bare.command_line(), "uptime");
    }
}
