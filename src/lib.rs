//! # Timeline BFF Library
//!
//! A backend-for-frontend that fetches the Twitter/X home timeline on behalf of a
//! user and renders it into stable, display-ready JSON: entity-aware markup,
//! resolved media, recursively embedded quotes and formatted counters and dates.
//!
//! ## Features
//!
//! - OAuth 1.0a PIN-based sign-in (`/twitter/request_token`, `/twitter/access_token`)
//! - Rendered home timeline (`/twitter/timeline`) and profile summary (`/twitter/user`)
//! - Structured logging
//! - Health check endpoint
//!
//! ## Configuration
//!
//! - `TWITTER_KEY`, `TWITTER_KEY_SECRET`: OAuth consumer credentials
//! - `PORT`: Server port (defaults to 3000)
//! - `URL`: Frontend origin allowed by CORS
//!
//! ## API Endpoints
//!
//! - `GET /health`: Returns service health status
//! - `GET /twitter/request_token`: Starts the sign-in flow
//! - `POST /twitter/access_token`: Exchanges the PIN for an access token
//! - `GET /twitter/user`: Summary of the signed-in user
//! - `GET /twitter/timeline`: Rendered home timeline page

pub mod config;
pub mod error;
pub mod handlers;
pub mod oauth;
pub mod twitter;

// Re-export commonly used types and functions
pub use config::{get_allowed_origin, get_server_port, TwitterConfig};
pub use error::{ApiError, RenderError};
pub use handlers::{build_router, AppState};
pub use oauth::{parse_authorization_header, OAuthSigner, TokenPair};
pub use twitter::{project_timeline, project_tweet, OAuthClient, SignedRequestClient};

#[cfg(test)]
mod tests;
