//! Signing secret resolution.
//!
//! Order: environment variable, then a persisted file under the platform
//! data dir, then a freshly generated secret which is written back so
//! restarts keep issued tokens valid.

use std::io::Write;
use std::path::{Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};

/// Generated secret length (alphanumeric chars).
const GENERATED_SECRET_LEN: usize = 64;

/// Resolve the secret named `file_name`, preferring env var `env_key`.
pub fn resolve_secret(env_key: &str, file_name: &str) -> String {
    if let Ok(secret) = std::env::var(env_key)
        && !secret.is_empty()
    {
        return secret;
    }
    resolve_secret_file(&secrets_dir().join(file_name))
}

/// Read a persisted secret at `path`, generating and persisting one if the
/// file is missing or blank.
pub fn resolve_secret_file(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let secret = generate_secret();
    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!(path = %parent.display(), error = %e, "could not create secrets directory");
    }
    match write_private(path, &secret) {
        Ok(()) => info!(path = %path.display(), "generated new signing secret"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not persist signing secret"),
    }
    secret
}

/// Write `contents` readable by the owner only.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // A pre-existing file keeps its old mode; tighten it.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}

fn generate_secret() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LEN)
        .map(char::from)
        .collect()
}

/// Directory holding persisted secrets.
fn secrets_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("coursekit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secret_is_persisted_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("access-secret");

        let first = resolve_secret_file(&path);
        assert_eq!(first.len(), GENERATED_SECRET_LEN);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));

        let second = resolve_secret_file(&path);
        assert_eq!(first, second);
    }

    #[test]
    fn blank_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refresh-secret");
        std::fs::write(&path, "   \n").unwrap();

        let secret = resolve_secret_file(&path);
        assert_eq!(secret.len(), GENERATED_SECRET_LEN);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), secret);
    }

    #[cfg(unix)]
    #[test]
    fn generated_secret_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access-secret");
        resolve_secret_file(&path);
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn replaced_blank_file_is_tightened() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refresh-secret");
        std::fs::write(&path, "").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        resolve_secret_file(&path);
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn unwritable_directory_still_returns_a_secret() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a dir").unwrap();
        let secret = resolve_secret_file(&blocker.join("access-secret"));
        assert_eq!(secret.len(), GENERATED_SECRET_LEN);
    }

    #[test]
    fn existing_file_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access-secret");
        std::fs::write(&path, "from-file\n").unwrap();
        assert_eq!(resolve_secret_file(&path), "from-file");
    }
}
