//! OAuth 1.0a support for Twitter/X API integration.
//!
//! This module signs requests with HMAC-SHA1 user context signatures and
//! parses the `x-authorization` header the frontend sends with each request.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::config::TwitterConfig;
use crate::error::{ApiError, ApiResult};

/// Everything except the RFC 3986 unreserved characters `-`, `.`, `_` and `~`.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A user's OAuth token and token secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub token_secret: String,
}

/// Parses the `x-authorization` header sent by the frontend.
///
/// The header has the form `<scheme> oauth_token=<t>, oauth_token_secret=<s>`.
/// Returns `None` when either key is missing or empty.
///
/// # Example
///
/// ```rust
/// use timeline_bff::parse_authorization_header;
///
/// let pair = parse_authorization_header("OAuth oauth_token=abc, oauth_token_secret=xyz").unwrap();
/// assert_eq!(pair.token, "abc");
/// assert_eq!(pair.token_secret, "xyz");
/// ```
pub fn parse_authorization_header(header: &str) -> Option<TokenPair> {
    let mut token = None;
    let mut token_secret = None;

    for part in header.split_whitespace().skip(1) {
        let Some((key, value)) = part.trim_end_matches(',').split_once('=') else {
            continue;
        };
        match key {
            "oauth_token" => token = Some(value.to_string()),
            "oauth_token_secret" => token_secret = Some(value.to_string()),
            _ => {}
        }
    }

    match (token, token_secret) {
        (Some(token), Some(token_secret)) if !token.is_empty() && !token_secret.is_empty() => {
            Some(TokenPair {
                token,
                token_secret,
            })
        }
        _ => None,
    }
}

/// OAuth 1.0a signer holding the application's consumer credentials.
#[derive(Debug, Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
}

impl OAuthSigner {
    /// Creates a signer from the application configuration.
    pub fn new(config: &TwitterConfig) -> Self {
        Self {
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
        }
    }

    /// Builds the `Authorization` header value for a request.
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP method
    /// - `url`: URL without query string
    /// - `params`: decoded query parameters, included in the signature
    /// - `credentials`: the user's token pair, absent when requesting a request token
    /// - `extra_oauth`: additional `oauth_*` parameters such as `oauth_callback`
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        credentials: Option<&TokenPair>,
        extra_oauth: &[(&str, &str)],
    ) -> ApiResult<String> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| ApiError::OAuth(format!("Failed to get timestamp: {e}")))?
            .as_secs()
            .to_string();

        self.header_with(
            method,
            url,
            params,
            credentials,
            extra_oauth,
            &generate_nonce(),
            &timestamp,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        credentials: Option<&TokenPair>,
        extra_oauth: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> ApiResult<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
        ];
        if let Some(credentials) = credentials {
            oauth_params.push(("oauth_token".to_string(), credentials.token.clone()));
        }
        oauth_params.push(("oauth_version".to_string(), "1.0".to_string()));
        oauth_params.extend(
            extra_oauth
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        let mut all_params = oauth_params.clone();
        all_params.extend(params.iter().cloned());

        let token_secret = credentials.map(|c| c.token_secret.as_str()).unwrap_or("");
        let signature = sign(
            method,
            url,
            all_params,
            &self.consumer_secret,
            token_secret,
        )?;
        oauth_params.push(("oauth_signature".to_string(), signature));

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {header}"))
    }
}

/// Computes the base64 HMAC-SHA1 signature of a request.
fn sign(
    method: &str,
    url: &str,
    params: Vec<(String, String)>,
    consumer_secret: &str,
    token_secret: &str,
) -> ApiResult<String> {
    let mut encoded: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    );
    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    hmac_sha1(&signing_key, &base_string)
}

/// Percent-encode a string according to RFC 3986.
fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Generate a random nonce for OAuth.
fn generate_nonce() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Compute HMAC-SHA1 and return the base64-encoded result.
fn hmac_sha1(key: &str, data: &str) -> ApiResult<String> {
    type HmacSha1 = Hmac<sha1::Sha1>;

    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| ApiError::OAuth(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
