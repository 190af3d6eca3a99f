use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Google "installed app" client secret file (credentials.json), as
/// downloaded from the cloud console. Only consumed when a token must be
/// acquired or refreshed.
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: InstalledApp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledApp {
    pub client_id: String,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

pub fn load_client_secret(path: &Path) -> Result<InstalledApp> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("reading client secret file {}", path.display()))?;
    let parsed: ClientSecretFile = serde_json::from_str(&s)
        .with_context(|| format!("parsing client secret file {}", path.display()))?;
    Ok(parsed.installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_installed_app_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(
            &path,
            r#"{
                "installed": {
                    "client_id": "abc.apps.googleusercontent.com",
                    "client_secret": "shh",
                    "redirect_uris": ["http://localhost"]
                }
            }"#,
        )
        .unwrap();

        let secret = load_client_secret(&path).unwrap();
        assert_eq!(secret.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(secret.client_secret.as_deref(), Some("shh"));
        assert_eq!(secret.redirect_uris, vec!["http://localhost"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_client_secret(&dir.path().join("nope.json")).is_err());
    }
}
