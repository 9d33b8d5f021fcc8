// Exchanges an OAuth refresh token for a short-lived access token.
use crate::client::core::{ClientError, build_https_client, decode, form_encode, parse_url};
use crate::client::middleware::ApiHeadersLayer;
use http::header::CONTENT_TYPE;
use http::{Method, Request};
use http_body_util::BodyExt;
use serde::Deserialize;
use tower::{ServiceBuilder, ServiceExt};

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Read/write access to the user's task lists.
pub const TASKS_SCOPE: &str = "https://www.googleapis.com/auth/tasks";

#[derive(Clone, Debug, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

struct RefreshRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
}

impl RefreshRequest<'_> {
    /// `application/x-www-form-urlencoded` body of the refresh grant.
    fn to_form(&self) -> String {
        form_encode(&[
            ("client_id", self.client_id),
            ("client_secret", self.client_secret),
            ("refresh_token", self.refresh_token),
            ("grant_type", "refresh_token"),
        ])
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

pub async fn fetch_access_token(
    token_url: &str,
    credentials: &Credentials,
) -> Result<TokenResponse, ClientError> {
    if credentials.refresh_token.is_empty() {
        return Err(ClientError::Auth("no refresh token configured".to_string()));
    }
    let (url, uri) = parse_url(token_url)?;
    let payload = RefreshRequest {
        client_id: &credentials.client_id,
        client_secret: &credentials.client_secret,
        refresh_token: &credentials.refresh_token,
    };
    let req = Request::builder()
        .method(Method::POST)
        .uri(&url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(payload.to_form())
        .map_err(|e| ClientError::Http(e.to_string()))?;

    let http = ServiceBuilder::new()
        .layer(ApiHeadersLayer::default())
        .service(build_https_client(&uri)?);
    let response = http
        .oneshot(req)
        .await
        .map_err(|e| ClientError::Http(e.to_string()))?;
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map_err(|e| ClientError::Http(e.to_string()))?
        .to_bytes();

    let token: TokenResponse = decode(status, &bytes).map_err(|e| match e {
        ClientError::Status { status, body } => {
            ClientError::Auth(format!("{}: {}", status, body.trim()))
        }
        other => other,
    })?;

    if let Some(scope) = &token.scope
        && !scope.split_whitespace().any(|s| s == TASKS_SCOPE)
    {
        log::warn!("Access token lacks the {} scope (got '{}')", TASKS_SCOPE, scope);
    }
    log::debug!("Obtained access token (expires in {:?}s)", token.expires_in);
    Ok(token)
}
