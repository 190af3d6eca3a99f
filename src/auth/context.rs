use anyhow::{Result, anyhow};
use log::info;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::{oauth, secret, token};
use crate::auth::token::TokenFile;
use crate::config::{self, Config};

/// Explicit authentication state for one run: load -> validate ->
/// refresh-or-reauth -> use. Owns the token file; nothing else touches it.
pub struct AuthContext {
    client_secret_path: PathBuf,
    token_path: PathBuf,
    redirect_uri: String,
}

impl AuthContext {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client_secret_path: config::resolve_client_secret_path(cfg)?,
            token_path: config::resolve_token_path(cfg)?,
            redirect_uri: cfg
                .redirect_uri
                .clone()
                .unwrap_or_else(|| "http://127.0.0.1:8080/callback".to_string()),
        })
    }

    #[cfg(test)]
    fn with_paths(client_secret_path: PathBuf, token_path: PathBuf) -> Self {
        Self {
            client_secret_path,
            token_path,
            redirect_uri: "http://127.0.0.1:8080/callback".to_string(),
        }
    }

    /// Returns a valid access token; refreshes or runs the interactive
    /// login if needed.
    ///
    /// A rejected refresh deletes the token file and fails the run, so the
    /// operator re-enters the login flow on the next invocation.
    pub fn access_token(&self) -> Result<String> {
        let now = epoch_now()?;
        let stored = token::load_tokens(&self.token_path)?;

        // 1) cached & not expired
        if let Some(at) = stored.as_ref().and_then(|tf| cached_access_token(tf, now)) {
            return Ok(at);
        }

        // 2) refresh if possible
        if let Some(rt) = stored.and_then(|tf| tf.refresh_token) {
            return self.refresh(&rt);
        }

        // 3) otherwise interactive login
        self.interactive_login()
    }

    /// Runs the browser login flow unconditionally and persists the result.
    pub fn interactive_login(&self) -> Result<String> {
        let app = secret::load_client_secret(&self.client_secret_path)?;
        let tokens =
            oauth::perform_pkce_flow(&app.client_id, app.client_secret.as_deref(), &self.redirect_uri)?;
        self.persist(&tokens, None)?;
        Ok(tokens.access_token)
    }

    fn refresh(&self, refresh_token: &str) -> Result<String> {
        info!("access token expired; refreshing");
        let app = secret::load_client_secret(&self.client_secret_path)?;

        match oauth::refresh_access_token(&app.client_id, app.client_secret.as_deref(), refresh_token)
        {
            Ok(tokens) => {
                self.persist(&tokens, Some(refresh_token))?;
                Ok(tokens.access_token)
            }
            Err(e) => {
                token::delete_tokens(&self.token_path)?;
                Err(anyhow!(
                    "token refresh failed: {e}. Removed {}; please run again and complete the login",
                    self.token_path.display()
                ))
            }
        }
    }

    fn persist(&self, tokens: &oauth::Tokens, previous_refresh: Option<&str>) -> Result<()> {
        let now = epoch_now()?;
        let expires_at = tokens.expires_in.map(|s| now + s as i64).unwrap_or(now + 3500);

        // A refresh response may not echo the refresh token back; keep the
        // one we already have.
        let refresh_token = tokens
            .refresh_token
            .clone()
            .or_else(|| previous_refresh.map(|s| s.to_string()));

        token::save_tokens(
            &self.token_path,
            &TokenFile {
                access_token: Some(tokens.access_token.clone()),
                refresh_token,
                expires_at_epoch: Some(expires_at),
            },
        )
    }
}

fn epoch_now() -> Result<i64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64)
}

/// The stored access token, when present and unexpired at `now`.
fn cached_access_token(stored: &TokenFile, now: i64) -> Option<String> {
    match (&stored.access_token, stored.expires_at_epoch) {
        (Some(at), Some(exp)) if now < exp => Some(at.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(access: Option<&str>, refresh: Option<&str>, exp: Option<i64>) -> TokenFile {
        TokenFile {
            access_token: access.map(|s| s.to_string()),
            refresh_token: refresh.map(|s| s.to_string()),
            expires_at_epoch: exp,
        }
    }

    #[test]
    fn unexpired_cached_token_is_used() {
        let tf = stored(Some("at"), Some("rt"), Some(1000));
        assert_eq!(cached_access_token(&tf, 999).as_deref(), Some("at"));
    }

    #[test]
    fn expired_or_incomplete_cache_is_ignored() {
        assert!(cached_access_token(&stored(Some("at"), None, Some(1000)), 1000).is_none());
        assert!(cached_access_token(&stored(Some("at"), None, Some(1000)), 2000).is_none());
        assert!(cached_access_token(&stored(None, Some("rt"), Some(1000)), 10).is_none());
        assert!(cached_access_token(&stored(Some("at"), None, None), 10).is_none());
    }

    #[test]
    fn access_token_reads_valid_cache_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token.json");
        token::save_tokens(
            &token_path,
            &stored(Some("cached-token"), Some("rt"), Some(i64::MAX)),
        )
        .unwrap();

        // No client secret file on disk: the cached path must not need it.
        let ctx = AuthContext::with_paths(dir.path().join("credentials.json"), token_path);
        assert_eq!(ctx.access_token().unwrap(), "cached-token");
    }

    #[test]
    fn refresh_path_needs_the_client_secret_file() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token.json");
        token::save_tokens(&token_path, &stored(Some("old"), Some("rt"), Some(0))).unwrap();

        let ctx = AuthContext::with_paths(dir.path().join("missing.json"), token_path);
        // Expired token + refresh token, but the secret file is gone: the
        // refresh path errors before any network call.
        assert!(ctx.access_token().is_err());
    }
}
