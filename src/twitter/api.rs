//! Signed request client for the Twitter API.
//!
//! Handlers talk to Twitter only through the [`SignedRequestClient`] trait, so
//! the rendering pipeline and the routes can be exercised without network
//! access. [`OAuthClient`] is the production implementation.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::{mask_secret, TwitterConfig};
use crate::error::{ApiError, ApiResult};
use crate::oauth::{OAuthSigner, TokenPair};

use super::tweet::{project_timeline, RenderedTweet};
use super::types::{RawTweet, RawUser};

pub const REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
pub const ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";
pub const AUTHENTICATE_URL: &str = "https://api.twitter.com/oauth/authenticate";
pub const HOME_TIMELINE_URL: &str = "https://api.twitter.com/1.1/statuses/home_timeline.json";
pub const VERIFY_CREDENTIALS_URL: &str =
    "https://api.twitter.com/1.1/account/verify_credentials.json";

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum number of characters before truncation
///
/// # Returns
///
/// A sanitized string safe for logging
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let truncated: String = sanitized.chars().take(max_len).collect();
        format!(
            "{}... [truncated, {} total bytes]",
            truncated,
            text.len()
        )
    } else {
        sanitized
    }
}

/// A fresh request token and the URL the user must visit to authorize it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestToken {
    pub token: String,
    pub token_secret: String,
    pub url: String,
}

/// Body of the OAuth token endpoints, sent form-encoded.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    oauth_token: String,
    oauth_token_secret: String,
}

/// The capability of making OAuth-signed calls to the Twitter API.
#[async_trait]
pub trait SignedRequestClient: Send + Sync {
    /// Obtains a request token for the PIN-based flow.
    async fn request_token(&self) -> ApiResult<RequestToken>;

    /// Exchanges an authorized request token and its PIN for an access token.
    async fn access_token(&self, request_token: &TokenPair, pin: &str) -> ApiResult<TokenPair>;

    /// Performs a signed GET on behalf of the user and returns the JSON body.
    async fn get(&self, url: &str, credentials: &TokenPair) -> ApiResult<Value>;
}

/// Production [`SignedRequestClient`] backed by `reqwest`.
pub struct OAuthClient {
    http: Client,
    signer: OAuthSigner,
}

impl OAuthClient {
    /// Creates the client once at startup from the application credentials.
    pub fn new(config: &TwitterConfig) -> Self {
        info!(
            "Creating OAuth client for consumer key {}",
            mask_secret(&config.consumer_key)
        );
        Self {
            http: Client::new(),
            signer: OAuthSigner::new(config),
        }
    }

    /// Sends a signed POST to one of the token endpoints and decodes the form body.
    async fn token_request(
        &self,
        url: &str,
        credentials: Option<&TokenPair>,
        extra_oauth: &[(&str, &str)],
        operation_name: &str,
    ) -> ApiResult<TokenPair> {
        let header = self
            .signer
            .authorization_header("POST", url, &[], credentials, extra_oauth)?;

        info!("Sending POST request for operation: {}", operation_name);
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, header)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!(
                "Operation '{}' failed with status {}: {}",
                operation_name,
                status,
                sanitize_for_logging(&body, 200)
            );
            return Err(upstream_error(status.as_u16(), &body));
        }

        let parsed: TokenResponse = serde_urlencoded::from_str(&body)
            .map_err(|e| ApiError::OAuth(format!("unexpected token response: {e}")))?;
        info!("Operation '{}' completed successfully", operation_name);
        debug!("Received token (masked): {}", mask_secret(&parsed.oauth_token));

        Ok(TokenPair {
            token: parsed.oauth_token,
            token_secret: parsed.oauth_token_secret,
        })
    }
}

/// Keeps the upstream error body as JSON when it is JSON, as text otherwise.
fn upstream_error(status: u16, body: &str) -> ApiError {
    let body = serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));
    ApiError::Upstream { status, body }
}

#[async_trait]
impl SignedRequestClient for OAuthClient {
    async fn request_token(&self) -> ApiResult<RequestToken> {
        let pair = self
            .token_request(
                REQUEST_TOKEN_URL,
                None,
                &[("oauth_callback", "oob")],
                "request_token",
            )
            .await?;

        Ok(RequestToken {
            url: format!(
                "{}?oauth_token={}",
                AUTHENTICATE_URL,
                urlencoding::encode(&pair.token)
            ),
            token: pair.token,
            token_secret: pair.token_secret,
        })
    }

    async fn access_token(&self, request_token: &TokenPair, pin: &str) -> ApiResult<TokenPair> {
        self.token_request(
            ACCESS_TOKEN_URL,
            Some(request_token),
            &[("oauth_verifier", pin)],
            "access_token",
        )
        .await
    }

    async fn get(&self, url: &str, credentials: &TokenPair) -> ApiResult<Value> {
        let parsed = Url::parse(url).map_err(|e| ApiError::OAuth(format!("invalid URL: {e}")))?;
        let params: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let mut base = parsed.clone();
        base.set_query(None);
        base.set_fragment(None);

        let header =
            self.signer
                .authorization_header("GET", base.as_str(), &params, Some(credentials), &[])?;

        info!("Sending signed GET request to {}", base);
        let response = self
            .http
            .get(parsed)
            .header(AUTHORIZATION, header)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        info!("Received response with status: {} from {}", status, base);

        if status.is_success() {
            debug!("Response summary: {} bytes received", body.len());
            Ok(serde_json::from_str(&body)?)
        } else {
            warn!(
                "Twitter API error {} for {}: {}",
                status,
                base,
                sanitize_for_logging(&body, 500)
            );
            Err(upstream_error(status.as_u16(), &body))
        }
    }
}

/// Builds the home timeline URL from the frontend's query string, making sure
/// extended tweet mode is requested so `full_text` is populated.
pub fn home_timeline_url(query: Option<&str>) -> String {
    let mut query = query.unwrap_or("").trim_start_matches('?').to_string();
    let has_mode = url::form_urlencoded::parse(query.as_bytes()).any(|(k, _)| k == "tweet_mode");
    if !has_mode {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str("tweet_mode=extended");
    }
    format!("{}?{}", HOME_TIMELINE_URL, query)
}

/// Fetches the authenticated user's profile.
pub async fn fetch_current_user(
    client: &dyn SignedRequestClient,
    credentials: &TokenPair,
) -> ApiResult<RawUser> {
    let value = client.get(VERIFY_CREDENTIALS_URL, credentials).await?;
    Ok(serde_json::from_value(value)?)
}

/// Fetches one page of the home timeline and renders it.
pub async fn fetch_timeline(
    client: &dyn SignedRequestClient,
    credentials: &TokenPair,
    query: Option<&str>,
) -> ApiResult<Vec<RenderedTweet>> {
    let url = home_timeline_url(query);
    let value = client.get(&url, credentials).await?;
    let raw: Vec<RawTweet> = serde_json::from_value(value)?;
    info!("Rendering {} timeline entries", raw.len());

    Ok(project_timeline(&raw)?)
}
