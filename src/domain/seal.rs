//! Sealing — authenticated encryption of rendered reports.
//!
//! Sealed file layout: 8-byte magic, 12-byte random nonce, AES-256-GCM
//! ciphertext. The magic doubles as associated data, so a sealed file cannot
//! be passed off as a different format even with the right key.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::RngCore;
use std::fmt;
use std::path::Path;
use thiserror::Error;

pub const MAGIC: &[u8; 8] = b"FKSEAL01";
pub const NONCE_LEN: usize = 12;

/// Environment variable that overrides the key file.
pub const KEY_ENV: &str = "FIELDKIT_REPORT_KEY";

#[derive(Debug, Error)]
pub enum SealError {
    #[error("sealed data truncated: {0} bytes is too short")]
    Truncated(usize),
    #[error("not a sealed report file (bad magic)")]
    BadMagic,
    #[error("key is not valid base64: {0}")]
    KeyEncoding(#[from] base64::DecodeError),
    #[error("key must be 32 bytes, got {0}")]
    KeyLength(usize),
    #[error("encryption failed")]
    Encrypt,
    #[error("decryption failed: wrong key or corrupted data")]
    Decrypt,
}

/// A 256-bit report key.
#[derive(Clone)]
pub struct ReportKey([u8; 32]);

impl ReportKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_base64(encoded: &str) -> Result<Self, SealError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        let len = bytes.len();
        let array: [u8; 32] = bytes.try_into().map_err(|_| SealError::KeyLength(len))?;
        Ok(Self(array))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }
}

// Key material stays out of debug output.
impl fmt::Debug for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReportKey(..)")
    }
}

/// Seal plaintext into the on-disk format.
pub fn seal(key: &ReportKey, plaintext: &[u8]) -> Result<Vec<u8>, SealError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: MAGIC,
            },
        )
        .map_err(|_| SealError::Encrypt)?;

    let mut out = Vec::with_capacity(MAGIC.len() + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Open a sealed file, returning the original plaintext.
pub fn open(key: &ReportKey, sealed: &[u8]) -> Result<Vec<u8>, SealError> {
    if sealed.len() < MAGIC.len() + NONCE_LEN {
        return Err(SealError::Truncated(sealed.len()));
    }
    if &sealed[..MAGIC.len()] != MAGIC {
        return Err(SealError::BadMagic);
    }

    let nonce = Nonce::from_slice(&sealed[MAGIC.len()..MAGIC.len() + NONCE_LEN]);
    let ciphertext = &sealed[MAGIC.len() + NONCE_LEN..];

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: MAGIC,
            },
        )
        .map_err(|_| SealError::Decrypt)
}

/// Load the report key: the environment variable wins, then the key file.
pub fn load_key(key_file: &Path) -> Result<ReportKey> {
    if let Ok(encoded) = std::env::var(KEY_ENV) {
        return ReportKey::from_base64(&encoded)
            .with_context(|| format!("invalid key in {}", KEY_ENV));
    }

    let encoded = std::fs::read_to_string(key_file).with_context(|| {
        format!(
            "reading key file {} (run `fieldkit keygen` to create one)",
            key_file.display()
        )
    })?;
    ReportKey::from_base64(&encoded)
        .with_context(|| format!("invalid key in {}", key_file.display()))
}

/// Write a key file with owner-only permissions.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_key_file(path: &Path, key: &ReportKey, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "key file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let encoded = key.to_base64();

    #[cfg(unix)]
    {
        use std::io::Write as _;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
        file.write_all(encoded.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        file.write_all(b"\n")
            .with_context(|| format!("writing {}", path.display()))?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, format!("{}\n", encoded))
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_then_open_is_byte_identical() {
        let key = ReportKey::generate();
        let plaintext = b"== Diagnostic Report ==\ndf -h output here\n";
        let sealed = seal(&key, plaintext).unwrap();
        assert!(sealed.starts_with(MAGIC));
        let opened = open(&key, &sealed).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn wrong_key_fails_to_open() {
        let key = ReportKey::generate();
        let other = ReportKey::generate();
        let sealed = seal(&key, b"secret").unwrap();
        assert!(matches!(open(&other, &sealed), Err(SealError::Decrypt)));
    }

    #[test]
    fn tampered_ciphertext_fails_to_open() {
        let key = ReportKey::generate();
        let mut sealed = seal(&key, b"secret").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xff;
        assert!(matches!(open(&key, &sealed), Err(SealError::Decrypt)));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let key = ReportKey::generate();
        let mut sealed = seal(&key, b"secret").unwrap();
        sealed[0] = b'X';
        assert!(matches!(open(&key, &sealed), Err(SealError::BadMagic)));
    }

    #[test]
    fn truncated_data_is_rejected() {
        let key = ReportKey::generate();
        assert!(matches!(
            open(&key, b"FKSEAL01"),
            Err(SealError::Truncated(8))
        ));
    }

    #[test]
    fn key_round_trips_through_base64() {
        let key = ReportKey::generate();
        let back = ReportKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key.0, back.0);
    }

    #[test]
    fn short_key_is_rejected() {
        let short = STANDARD.encode([0u8; 16]);
        assert!(matches!(
            ReportKey::from_base64(&short),
            Err(SealError::KeyLength(16))
        ));
    }

    #[test]
    fn debug_hides_key_material() {
        let key = ReportKey::generate();
        assert_eq!(format!("{:?}", key), "ReportKey(..)");
    }
}
