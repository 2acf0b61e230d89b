//! # Timeline BFF
//!
//! A Rust web service that signs users in to Twitter/X with OAuth 1.0a and
//! serves their home timeline rendered into display-ready JSON.
//!
//! ## Environment Variables
//!
//! - `TWITTER_KEY`, `TWITTER_KEY_SECRET`: OAuth consumer credentials (required)
//! - `PORT`: Server port (defaults to 3000)
//! - `URL`: Frontend origin allowed by CORS (any origin when unset)
//!
//! ## API Endpoints
//!
//! - `GET /health`: Returns service health status
//! - `GET /twitter/request_token`: Starts the PIN-based sign-in flow
//! - `POST /twitter/access_token`: Exchanges the PIN for an access token
//! - `GET /twitter/user`: Summary of the signed-in user
//! - `GET /twitter/timeline`: Rendered home timeline page

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method};
use log::{error, info, warn};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use timeline_bff::handlers::AUTHORIZATION_HEADER;
use timeline_bff::{
    build_router, get_allowed_origin, get_server_port, AppState, OAuthClient, TwitterConfig,
};

/// Builds the CORS policy for the frontend origin configured in `URL`.
fn cors_layer() -> CorsLayer {
    let origin = match get_allowed_origin() {
        Some(origin) => match HeaderValue::from_str(&origin) {
            Ok(value) => {
                info!("Allowing CORS requests from {}", origin);
                AllowOrigin::exact(value)
            }
            Err(e) => {
                warn!("Ignoring invalid URL origin '{}': {}", origin, e);
                AllowOrigin::any()
            }
        },
        None => {
            warn!("URL not set, allowing CORS requests from any origin");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(AUTHORIZATION_HEADER)])
}

/// Main entry point for the timeline web service.
///
/// Initializes logging, loads the consumer credentials, creates the signed
/// request client once and serves the routes until terminated.
///
/// # Logging
///
/// The application uses the `env_logger` crate. Log levels can be controlled
/// via the `RUST_LOG` environment variable.
///
/// # Example Usage
///
/// ```bash
/// TWITTER_KEY=... TWITTER_KEY_SECRET=... RUST_LOG=info cargo run
/// ```
///
/// # Panics
///
/// This function will panic if `PORT` is not a valid port number.
#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let config = match TwitterConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        client: Arc::new(OAuthClient::new(&config)),
    };

    // Build the HTTP application with all routes and middleware
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer()),
    );

    let port = get_server_port();
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    info!("Starting timeline-bff server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }
}
