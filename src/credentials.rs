//! Service-account credential bootstrapping
//!
//! Decodes the base64 key held in `GOOGLE_CREDENTIALS_BASE64`, writes it to a
//! fixed path and points `GOOGLE_APPLICATION_CREDENTIALS` at it. The outcome is
//! captured once as a [`CredentialsState`] and never recomputed.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

use crate::config::{APPLICATION_CREDENTIALS_VAR, CREDENTIALS_BASE64_VAR};
use crate::error::CredentialsError;

/// Result of the startup credential setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialsState {
    pub success: bool,
    pub message: String,
}

impl CredentialsState {
    fn ok() -> Self {
        Self {
            success: true,
            message: "Credentials successfully set up".to_string(),
        }
    }

    fn failed(err: &CredentialsError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
        }
    }
}

/// Decode `encoded`, write it to `path` and validate that it parses as JSON.
///
/// Never fails: errors are folded into the returned state. Running it again
/// with the same input overwrites the file with identical bytes.
pub fn bootstrap(encoded: Option<&str>, path: &Path) -> CredentialsState {
    info!(
        "credentials input length: {}",
        encoded.map(str::len).unwrap_or(0)
    );

    match materialize(encoded, path) {
        Ok(client_email) => {
            info!(
                "Credentials file created and validated for {}",
                client_email.as_deref().unwrap_or("unknown")
            );
            CredentialsState::ok()
        }
        Err(e) => {
            error!("credential setup failed: {}", e);
            CredentialsState::failed(&e)
        }
    }
}

/// Read the key from the environment, bootstrap it, and on success export
/// `GOOGLE_APPLICATION_CREDENTIALS` for the Google client.
pub fn bootstrap_from_env(path: &Path) -> CredentialsState {
    let encoded = std::env::var(CREDENTIALS_BASE64_VAR)
        .ok()
        .filter(|v| !v.is_empty());
    let state = bootstrap(encoded.as_deref(), path);
    if state.success {
        std::env::set_var(APPLICATION_CREDENTIALS_VAR, path);
    }
    state
}

fn materialize(encoded: Option<&str>, path: &Path) -> Result<Option<String>, CredentialsError> {
    let encoded = encoded
        .filter(|v| !v.trim().is_empty())
        .ok_or(CredentialsError::NotConfigured)?;
    let decoded = STANDARD.decode(encoded.trim())?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    write_private(path, &decoded)?;

    let written = fs::read(path)?;
    let key: serde_json::Value = serde_json::from_slice(&written)?;
    Ok(key
        .get("client_email")
        .and_then(|v| v.as_str())
        .map(str::to_string))
}

/// Write `bytes` to `path`, readable by the owner only.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;

    // mode() only applies on creation
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_JSON: &str = r#"{"type":"service_account","client_email":"reporter@demo.iam.gserviceaccount.com"}"#;

    fn encoded_key() -> String {
        STANDARD.encode(KEY_JSON)
    }

    #[test]
    fn missing_input_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let state = bootstrap(None, &dir.path().join("credentials.json"));
        assert_eq!(
            state,
            CredentialsState {
                success: false,
                message: "GOOGLE_CREDENTIALS_BASE64 not set".to_string(),
            }
        );
    }

    #[test]
    fn empty_input_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let state = bootstrap(Some("  "), &dir.path().join("credentials.json"));
        assert!(!state.success);
        assert_eq!(state.message, "GOOGLE_CREDENTIALS_BASE64 not set");
    }

    #[test]
    fn writes_decoded_key_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app").join("credentials.json");

        let state = bootstrap(Some(&encoded_key()), &path);

        assert!(state.success, "{}", state.message);
        assert_eq!(state.message, "Credentials successfully set up");
        assert_eq!(fs::read_to_string(&path).unwrap(), KEY_JSON);
    }

    #[test]
    fn rerun_produces_identical_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        assert!(bootstrap(Some(&encoded_key()), &path).success);
        let first = fs::read(&path).unwrap();
        assert!(bootstrap(Some(&encoded_key()), &path).success);
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn invalid_base64_fails() {
        let dir = tempfile::tempdir().unwrap();
        let state = bootstrap(Some("not*base64!"), &dir.path().join("credentials.json"));
        assert!(!state.success);
        assert!(state.message.starts_with("Error setting up credentials"));
    }

    #[test]
    fn non_json_payload_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let state = bootstrap(
            Some(&STANDARD.encode("definitely not json")),
            &dir.path().join("credentials.json"),
        );
        assert!(!state.success);
        assert!(state.message.contains("invalid JSON"));
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        assert!(bootstrap(Some(&encoded_key()), &path).success);

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
