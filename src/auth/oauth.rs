use anyhow::{Result, anyhow};
use oauth2::TokenResponse;
use oauth2::basic::BasicClient;
use oauth2::reqwest::http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, PkceCodeChallenge, RedirectUrl,
    RefreshToken, Scope, TokenUrl,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use tiny_http::{Response, Server};
use url::Url;

/// Modify scope: read messages and change their labels.
const SCOPE: &str = "https://www.googleapis.com/auth/gmail.modify";

const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Tokens returned by the oauth flow (in-memory)
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

impl Tokens {
    fn from_response(token: impl TokenResponse<oauth2::basic::BasicTokenType>) -> Self {
        Tokens {
            access_token: token.access_token().secret().to_string(),
            refresh_token: token.refresh_token().map(|r| r.secret().to_string()),
            expires_in: token.expires_in().map(|d| d.as_secs()),
        }
    }
}

fn google_client(client_id: &str, client_secret: Option<&str>) -> Result<BasicClient> {
    let client_id = ClientId::new(client_id.to_string());
    let client_secret = client_secret.map(|s| ClientSecret::new(s.to_string()));

    let auth_url = AuthUrl::new("https://accounts.google.com/o/oauth2/v2/auth".to_string())?;
    let token_url = TokenUrl::new("https://oauth2.googleapis.com/token".to_string())?;

    Ok(BasicClient::new(
        client_id,
        client_secret,
        auth_url,
        Some(token_url),
    ))
}

/// Exchange a refresh token for a new access token using the oauth2 crate
pub fn refresh_access_token(
    client_id: &str,
    client_secret: Option<&str>,
    refresh_token: &str,
) -> Result<Tokens> {
    let rt = RefreshToken::new(refresh_token.to_string());
    let token = google_client(client_id, client_secret)?
        .exchange_refresh_token(&rt)
        .request(http_client)?;

    Ok(Tokens::from_response(token))
}

/// Perform Authorization Code + PKCE flow. Opens system browser and captures code via tiny server.
pub fn perform_pkce_flow(
    client_id: &str,
    client_secret: Option<&str>,
    redirect_uri: &str,
) -> Result<Tokens> {
    // Bind the callback server before opening the browser so the redirect
    // cannot race the listener.
    let (host, port) = loopback_host_port(redirect_uri)?;
    let server = Server::http(SocketAddr::new(host, port))
        .map_err(|e| anyhow!("Failed to bind OAuth callback server on port {port}: {e:?}"))?;

    let oauth_client = google_client(client_id, client_secret)?
        .set_redirect_uri(RedirectUrl::new(redirect_uri.to_string())?);

    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    let (auth_url, _csrf_token) = oauth_client
        .authorize_url(oauth2::CsrfToken::new_random)
        .add_scope(Scope::new(SCOPE.to_string()))
        .set_pkce_challenge(pkce_challenge)
        .url();

    println!("Open this URL in your browser:\n{auth_url}");
    // best-effort: don't fail if browser can't be opened
    if let Err(e) = open::that(auth_url.as_str()) {
        eprintln!("Warning: could not open browser automatically: {e}");
    }

    let code = wait_for_code(&server)?;

    let token = match oauth_client
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(pkce_verifier)
        .request(http_client)
    {
        Ok(tok) => tok,
        Err(err) => {
            eprintln!("Token exchange failed: {:#?}", err);
            return Err(anyhow!("Token exchange failed: see stderr for details"));
        }
    };

    Ok(Tokens::from_response(token))
}

fn loopback_host_port(redirect_uri: &str) -> Result<(IpAddr, u16)> {
    let redirect = Url::parse(redirect_uri)
        .map_err(|e| anyhow!("Invalid redirect_uri '{redirect_uri}': {e}"))?;

    let host = redirect
        .host_str()
        .ok_or_else(|| anyhow!("redirect_uri missing host: {redirect_uri}"))?;
    let port = redirect
        .port_or_known_default()
        .ok_or_else(|| anyhow!("redirect_uri missing/unknown port: {redirect_uri}"))?;

    let ip: IpAddr = match host {
        "localhost" | "127.0.0.1" => IpAddr::V4(Ipv4Addr::LOCALHOST),
        other => other.parse().map_err(|_| {
            anyhow!("redirect_uri host must be localhost/127.0.0.1 or an IP: {other}")
        })?,
    };

    Ok((ip, port))
}

/// Blocks until the browser redirect delivers an authorization code, or the
/// login window elapses.
fn wait_for_code(server: &Server) -> Result<String> {
    let deadline = Instant::now() + LOGIN_TIMEOUT;

    while Instant::now() < deadline {
        let request = match server.recv_timeout(Duration::from_millis(500)) {
            Ok(Some(r)) => r,
            _ => continue,
        };

        // request.url() is a path+query like "/callback?code=...&state=...";
        // a dummy base makes it parseable.
        let code = Url::parse(&format!("http://localhost{}", request.url()))
            .ok()
            .and_then(|u| {
                u.query_pairs()
                    .find(|(k, _)| k == "code")
                    .map(|(_, v)| v.into_owned())
            });

        match code {
            Some(code) => {
                let _ = request.respond(Response::from_string(
                    "Authorization received. You can close this tab.",
                ));
                return Ok(code);
            }
            None => {
                let _ = request.respond(Response::from_string(
                    "No code found in redirect. You can close this tab.",
                ));
            }
        }
    }

    Err(anyhow!("No authorization code received within timeout"))
}
