//! OAuth2 Authorization Code flow for the desktop app.
//!
//! 1. Opens browser to the authorization URL
//! 2. Listens on localhost for the callback
//! 3. Exchanges the code for tokens
//! 4. Looks up the signed-in user's profile

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::net::TcpListener;
use tracing::{debug, info};

use super::keyring_store;
use super::session::AuthUser;
use crate::error::AuthError;
use crate::storage::AuthConfig;

const CLIENT_ID_KEY: &str = "client_id";
const CLIENT_SECRET_KEY: &str = "client_secret";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>, // Unix timestamp
    pub token_type: String,
    pub scope: Option<String>,
}

impl OAuthTokens {
    /// Expired, with a 60s buffer.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => chrono::Utc::now().timestamp() > exp - 60,
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: Vec<String>,
    pub redirect_port: u16,
}

impl OAuthConfig {
    /// Endpoints from `auth`, client credentials from the keyring.
    pub fn from_config(auth: &AuthConfig) -> Result<Self, AuthError> {
        let client_id = keyring_store::get(CLIENT_ID_KEY)?;
        let client_secret = keyring_store::get(CLIENT_SECRET_KEY)?;
        let (Some(client_id), Some(client_secret)) = (client_id, client_secret) else {
            return Err(AuthError::CredentialsNotConfigured);
        };
        Ok(Self {
            client_id,
            client_secret,
            auth_url: auth.auth_url.clone(),
            token_url: auth.token_url.clone(),
            userinfo_url: auth.userinfo_url.clone(),
            scopes: vec!["openid".into(), "email".into(), "profile".into()],
            redirect_port: auth.redirect_port,
        })
    }

    pub fn store_client_credentials(client_id: &str, client_secret: &str) -> Result<(), AuthError> {
        keyring_store::set(CLIENT_ID_KEY, client_id)?;
        keyring_store::set(CLIENT_SECRET_KEY, client_secret)
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.redirect_port)
    }

    pub fn auth_url_full(&self, state: &str) -> String {
        let scopes = self.scopes.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&prompt=select_account",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri()),
            urlencoding::encode(&scopes),
            urlencoding::encode(state),
        )
    }
}

/// Run the browser flow and return the tokens.
pub async fn authorize(config: &OAuthConfig) -> Result<OAuthTokens, AuthError> {
    let state = uuid::Uuid::new_v4().to_string();

    // Bind before opening the browser so the callback can't race us.
    let listener = TcpListener::bind(format!("127.0.0.1:{}", config.redirect_port))?;
    open::that(config.auth_url_full(&state))?;
    info!(port = config.redirect_port, "waiting for sign-in callback");

    let (mut stream, _) = listener.accept()?;
    let mut buf = [0u8; 4096];
    let n = stream.read(&mut buf)?;
    let request = String::from_utf8_lossy(&buf[..n]);

    let outcome = check_callback(&request, &state);
    let page = match &outcome {
        Ok(_) => "<h2>Signed in.</h2><p>You can close this tab.</p>",
        Err(_) => "<h2>Sign-in failed.</h2><p>Return to the planner and try again.</p>",
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html><body>{page}<script>window.close()</script></body></html>"
    );
    stream.write_all(response.as_bytes())?;
    drop(stream);
    drop(listener);

    exchange_code(config, &outcome?).await
}

/// The `code` from a callback request, after checking `state`.
fn check_callback(request: &str, expected_state: &str) -> Result<String, AuthError> {
    if let Some(error) = query_param(request, "error") {
        return Err(AuthError::AuthorizationFailed(error));
    }
    match query_param(request, "state") {
        Some(state) if state == expected_state => {}
        _ => return Err(AuthError::InvalidCallback("state mismatch".into())),
    }
    query_param(request, "code").ok_or_else(|| AuthError::InvalidCallback("no code in callback".into()))
}

pub(crate) async fn exchange_code(config: &OAuthConfig, code: &str) -> Result<OAuthTokens, AuthError> {
    let redirect_uri = config.redirect_uri();
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("code", code),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_uri.as_str()),
    ];

    let body: serde_json::Value = Client::new()
        .post(&config.token_url)
        .form(&params)
        .send()
        .await?
        .json()
        .await?;

    if let Some(error) = body.get("error") {
        return Err(AuthError::TokenExchangeFailed(error.to_string()));
    }
    let access_token = body
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AuthError::TokenExchangeFailed("no access_token in response".into()))?;

    let expires_at = body
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .map(|ei| chrono::Utc::now().timestamp() + ei);

    debug!("token exchange succeeded");
    Ok(OAuthTokens {
        access_token: access_token.to_string(),
        refresh_token: body
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .map(String::from),
        expires_at,
        token_type: body
            .get("token_type")
            .and_then(|v| v.as_str())
            .unwrap_or("Bearer")
            .to_string(),
        scope: body.get("scope").and_then(|v| v.as_str()).map(String::from),
    })
}

/// OpenID Connect userinfo lookup.
pub(crate) async fn fetch_profile(config: &OAuthConfig, tokens: &OAuthTokens) -> Result<AuthUser, AuthError> {
    let resp = Client::new()
        .get(&config.userinfo_url)
        .bearer_auth(&tokens.access_token)
        .send()
        .await
        .map_err(|e| AuthError::ProfileFailed(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(AuthError::ProfileFailed(format!("HTTP {}", resp.status())));
    }
    let body: serde_json::Value = resp
        .json()
        .await
        .map_err(|e| AuthError::ProfileFailed(e.to_string()))?;

    let text = |key: &str| body.get(key).and_then(|v| v.as_str()).map(String::from);
    let uid = text("sub").ok_or_else(|| AuthError::ProfileFailed("no subject in profile".into()))?;
    Ok(AuthUser {
        uid,
        display_name: text("name"),
        email: text("email"),
        photo_url: text("picture"),
    })
}

fn query_param(request: &str, key: &str) -> Option<String> {
    let first_line = request.lines().next()?;
    let path = first_line.split_whitespace().nth(1)?;
    let url = url::Url::parse(&format!("http://localhost{path}")).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> OAuthConfig {
        OAuthConfig {
            client_id: "cid".into(),
            client_secret: "secret".into(),
            auth_url: format!("{base}/auth"),
            token_url: format!("{base}/token"),
            userinfo_url: format!("{base}/userinfo"),
            scopes: vec!["openid".into(), "email".into()],
            redirect_port: 19841,
        }
    }

    #[test]
    fn auth_url_carries_state_and_redirect() {
        let url = config("https://accounts.example.com").auth_url_full("abc");
        assert!(url.starts_with("https://accounts.example.com/auth?client_id=cid"));
        assert!(url.contains("state=abc"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A19841%2Fcallback"));
        assert!(url.contains("scope=openid%20email"));
    }

    #[test]
    fn callback_requires_matching_state() {
        let ok = "GET /callback?code=xyz&state=s1 HTTP/1.1\r\nHost: localhost\r\n\r\n";
        assert_eq!(check_callback(ok, "s1").unwrap(), "xyz");
        assert!(matches!(check_callback(ok, "other"), Err(AuthError::InvalidCallback(_))));

        let denied = "GET /callback?error=access_denied&state=s1 HTTP/1.1\r\n\r\n";
        assert!(matches!(
            check_callback(denied, "s1"),
            Err(AuthError::AuthorizationFailed(e)) if e == "access_denied"
        ));
    }

    #[tokio::test]
    async fn exchange_code_parses_token_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"at","refresh_token":"rt","expires_in":3600,"token_type":"Bearer"}"#)
            .create_async()
            .await;

        let tokens = exchange_code(&config(&server.url()), "code").await.unwrap();
        mock.assert_async().await;
        assert_eq!(tokens.access_token, "at");
        assert_eq!(tokens.refresh_token.as_deref(), Some("rt"));
        assert!(!tokens.is_expired());
    }

    #[tokio::test]
    async fn exchange_code_surfaces_provider_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let err = exchange_code(&config(&server.url()), "code").await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExchangeFailed(_)));
    }

    #[tokio::test]
    async fn profile_maps_openid_claims() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/userinfo")
            .match_header("authorization", "Bearer at")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sub":"123","email":"ada@example.com","picture":"https://img/1"}"#)
            .create_async()
            .await;

        let tokens = OAuthTokens {
            access_token: "at".into(),
            refresh_token: None,
            expires_at: None,
            token_type: "Bearer".into(),
            scope: None,
        };
        let user = fetch_profile(&config(&server.url()), &tokens).await.unwrap();
        assert_eq!(user.uid, "123");
        assert_eq!(user.display_name, None);
        assert_eq!(user.label(), "ada@example.com");
    }
}
