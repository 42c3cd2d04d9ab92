use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub output_dir: Option<String>,
    pub key_file: Option<String>,
    pub command_timeout_secs: Option<u64>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("fieldkit").join("config.toml"))
    }

    /// Resolve the report output directory: CLI flag, then config, then the
    /// platform data directory.
    pub fn resolve_output_dir(&self, flag: Option<&str>) -> Result<PathBuf> {
        if let Some(dir) = flag {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = &self.output_dir {
            return Ok(PathBuf::from(dir));
        }
        let data_dir = dirs::data_local_dir().context("could not determine data directory")?;
        Ok(data_dir.join("fieldkit"))
    }

    /// Resolve the report key file path: CLI flag, then config, then
    /// `<config dir>/fieldkit/report.key`.
    pub fn resolve_key_file(&self, flag: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = &self.key_file {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("fieldkit").join("report.key"))
    }

    pub fn resolve_timeout_secs(&self, flag: Option<u64>) -> u64 {
        flag.or(self.command_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

pub fn load() -> Result<Config> {
    let path = Config::path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let content =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

pub fn save_key_file(value: &str) -> Result<()> {
    let path = Config::path()?;
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).unwrap_or_default()
    } else {
        Config::default()
    };

    config.key_file = Some(value.to_string());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(&config).context("serializing config")?;
    std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: Config = toml::from_str(
            r#"
            output_dir = "/var/tmp/reports"
            key_file = "/etc/fieldkit/report.key"
            command_timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.output_dir.as_deref(), Some("/var/tmp/reports"));
        assert_eq!(cfg.key_file.as_deref(), Some("/etc/fieldkit/report.key"));
        assert_eq!(cfg.command_timeout_secs, Some(5));
    }

    #[test]
    fn empty_config_yields_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert!(cfg.output_dir.is_none());
        assert!(cfg.key_file.is_none());
        assert_eq!(cfg.resolve_timeout_secs(None), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn flag_overrides_config() {
        let cfg = Config {
            output_dir: Some("/from/config".into()),
            command_timeout_secs: Some(10),
            ..Config::default()
        };
        let dir = cfg.resolve_output_dir(Some("/from/flag")).unwrap();
        assert_eq!(dir, PathBuf::from("/from/flag"));
        assert_eq!(cfg.resolve_timeout_secs(Some(3)), 3);
        assert_eq!(cfg.resolve_timeout_secs(None), 10);
    }
}
