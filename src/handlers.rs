//! HTTP route handlers for the timeline service.
//!
//! This module contains the handler functions for the `/twitter/*` routes and
//! the health check, plus the router that wires them together.

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::oauth::{parse_authorization_header, TokenPair};
use crate::twitter::{
    fetch_current_user, fetch_timeline, RenderedTweet, RequestToken, SignedRequestClient,
};

/// Name of the header carrying the user's OAuth token pair.
pub const AUTHORIZATION_HEADER: &str = "x-authorization";

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn SignedRequestClient>,
}

type HandlerError = (StatusCode, Json<Value>);

/// Body of `POST /twitter/access_token`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenRequest {
    pub token: String,
    pub token_secret: String,
    pub pin_code: String,
}

/// Response of `GET /twitter/user`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub name: String,
    pub homepage: String,
    pub handle: String,
    pub profile_image: String,
    pub profile_color: String,
}

/// Builds the application router with all routes, without middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/twitter/request_token", get(handle_request_token))
        .route("/twitter/access_token", post(handle_access_token))
        .route("/twitter/user", get(handle_user))
        .route("/twitter/timeline", get(handle_timeline))
        .with_state(state)
}

/// Maps an [`ApiError`] to a status code and JSON error body.
fn error_response(e: ApiError, message: &str) -> HandlerError {
    error!("{}: {}", message, e);
    let (status, detail) = match &e {
        ApiError::MissingAuthorization => (StatusCode::UNAUTHORIZED, json!(e.to_string())),
        ApiError::Upstream { status, body } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            body.clone(),
        ),
        _ => (StatusCode::BAD_GATEWAY, json!(e.to_string())),
    };
    (
        status,
        Json(json!({"status": "error", "message": message, "error": detail})),
    )
}

/// Reads the user's token pair from the `x-authorization` header.
fn credentials_from(headers: &HeaderMap) -> Result<TokenPair, ApiError> {
    let header = headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::MissingAuthorization)?;
    parse_authorization_header(header).ok_or_else(|| {
        warn!("Rejecting malformed {} header", AUTHORIZATION_HEADER);
        ApiError::MissingAuthorization
    })
}

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "timeline-bff"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "timeline-bff"}))
}

/// Handles GET requests to `/twitter/request_token`.
///
/// Starts the PIN-based OAuth flow and returns the request token together with
/// the URL the user opens to authorize the app.
pub async fn handle_request_token(
    State(state): State<AppState>,
) -> Result<Json<RequestToken>, HandlerError> {
    match state.client.request_token().await {
        Ok(token) => {
            info!("Issued request token");
            Ok(Json(token))
        }
        Err(e) => Err(error_response(e, "Failed to obtain request token")),
    }
}

/// Handles POST requests to `/twitter/access_token`.
///
/// Exchanges the request token and the PIN shown to the user for an access token.
pub async fn handle_access_token(
    State(state): State<AppState>,
    Json(request): Json<AccessTokenRequest>,
) -> Result<Json<TokenPair>, HandlerError> {
    let request_token = TokenPair {
        token: request.token,
        token_secret: request.token_secret,
    };
    match state
        .client
        .access_token(&request_token, &request.pin_code)
        .await
    {
        Ok(pair) => {
            info!("Exchanged PIN for access token");
            Ok(Json(pair))
        }
        Err(e) => Err(error_response(e, "Failed to obtain access token")),
    }
}

/// Handles GET requests to `/twitter/user`.
///
/// Requires the `x-authorization` header. Returns a short summary of the
/// authenticated user's profile.
pub async fn handle_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserSummary>, HandlerError> {
    let credentials =
        credentials_from(&headers).map_err(|e| error_response(e, "Failed to fetch user"))?;

    match fetch_current_user(state.client.as_ref(), &credentials).await {
        Ok(user) => Ok(Json(UserSummary {
            homepage: format!("https://twitter.com/{}", user.screen_name),
            handle: format!("@{}", user.screen_name),
            profile_image: user.profile_image_url_https,
            profile_color: format!("#{}", user.profile_link_color),
            name: user.name,
        })),
        Err(e) => Err(error_response(e, "Failed to fetch user")),
    }
}

/// Handles GET requests to `/twitter/timeline`.
///
/// Requires the `x-authorization` header. The query string is forwarded to the
/// home timeline endpoint as-is and the page is returned rendered.
///
/// # Success Response
///
/// ```json
/// {
///   "tweets": [ { "id": "...", "text": "...", "user": { ... }, ... } ]
/// }
/// ```
pub async fn handle_timeline(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, HandlerError> {
    let credentials =
        credentials_from(&headers).map_err(|e| error_response(e, "Failed to fetch timeline"))?;

    let tweets: Vec<RenderedTweet> =
        fetch_timeline(state.client.as_ref(), &credentials, query.as_deref())
            .await
            .map_err(|e| error_response(e, "Failed to fetch timeline"))?;

    info!("Serving {} rendered tweets", tweets.len());
    Ok(Json(json!({ "tweets": tweets })))
}
