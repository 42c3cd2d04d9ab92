use anyhow::{bail, Result};

#[derive(Debug, Clone, Copy)]
pub enum Os {
    MacOS,
    Linux,
}

#[derive(Debug, Clone, Copy)]
pub enum Arch {
    X86_64,
    Aarch64,
}

#[derive(Debug)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
    pub is_wsl: bool,
}

impl Platform {
    pub fn target_triple(&self) -> &'static str {
        match (&self.os, &self.arch) {
            (Os::MacOS, Arch::X86_64) => "x86_64-darwin",
            (Os::MacOS, Arch::Aarch64) => "aarch64-darwin",
            (Os::Linux, Arch::X86_64) => "x86_64-linux",
            (Os::Linux, Arch::Aarch64) => "aarch64-linux",
        }
    }
}

pub fn detect() -> Result<Platform> {
    let os = match std::env::consts::OS {
        "macos" => Os::MacOS,
        "linux" => Os::Linux,
        other => bail!("unsupported OS: {}", other),
    };

    let arch = match std::env::consts::ARCH {
        "x86_64" => Arch::X86_64,
        "aarch64" => Arch::Aarch64,
        other => bail!("unsupported architecture: {}", other),
    };

    let is_wsl = matches!(os, Os::Linux) && detect_wsl();

    Ok(Platform { os, arch, is_wsl })
}

fn detect_wsl() -> bool {
    std::fs::read_to_string("/proc/version")
        .map(|v| {
            let lower = v.to_lowercase();
            lower.contains("microsoft") || lower.contains("wsl")
        })
        .unwrap_or(false)
}
