use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Persisted OAuth token state (token.json).
///
/// Written after interactive login and after every refresh; deleted when a
/// refresh is rejected so the next run re-enters the login flow.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenFile {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at_epoch: Option<i64>, // epoch seconds
}

pub fn load_tokens(path: &Path) -> Result<Option<TokenFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(path)?;
    let tf: TokenFile = serde_json::from_str(&s)?;
    Ok(Some(tf))
}

pub fn save_tokens(path: &Path, tokens: &TokenFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let s = serde_json::to_string_pretty(tokens)?;
    fs::write(path, s)?;
    Ok(())
}

pub fn delete_tokens(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
