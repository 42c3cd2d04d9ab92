//! `fieldkit decrypt` — open a sealed report file.

use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config;
use crate::domain::seal;

pub fn run(input: &str, out: Option<&str>, key_file: Option<&str>) -> Result<()> {
    let cfg = config::load()?;
    let key_path = cfg.resolve_key_file(key_file)?;
    let key = seal::load_key(&key_path)?;

    let sealed = std::fs::read(input).with_context(|| format!("reading {}", input))?;
    let plaintext = seal::open(&key, &sealed).with_context(|| format!("opening {}", input))?;

    match out {
        Some(path) => {
            let path = Path::new(path);
            std::fs::write(path, &plaintext)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{} {}", "Decrypted report written:".green(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&plaintext)
                .context("writing to stdout")?;
        }
    }

    Ok(())
}
