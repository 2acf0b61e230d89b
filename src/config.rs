//! Configuration module for the timeline service.
//!
//! This module contains configuration structures and environment variable handling
//! for the Twitter/X API integration and the HTTP server.

use log::{debug, error, info, warn};
use std::env;

/// Configuration struct for the Twitter/X application credentials.
///
/// These are the consumer credentials of the registered app. Per-user access
/// tokens never live here; the frontend sends them with each request.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// The OAuth 1.0a consumer key (`TWITTER_KEY`)
    pub consumer_key: String,
    /// The OAuth 1.0a consumer secret (`TWITTER_KEY_SECRET`)
    pub consumer_secret: String,
}

/// Masks a secret for logging, keeping only a short prefix and suffix.
pub(crate) fn mask_secret(secret: &str) -> String {
    let length = secret.chars().count();
    let prefix: String = secret.chars().take(8.min(length)).collect();
    if length > 16 {
        let suffix: String = secret.chars().skip(length - 8).collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}

/// Reads a required, non-empty credential from the environment.
fn read_credential(name: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    match env::var(name) {
        Ok(value) => {
            info!(
                "Found {} environment variable with length: {}",
                name,
                value.len()
            );
            debug!("{} (masked): {}", name, mask_secret(&value));

            if value.is_empty() {
                error!("{} is empty", name);
                return Err(format!("{} cannot be empty", name).into());
            }
            if value.len() < 10 {
                warn!(
                    "{} seems unusually short ({} characters)",
                    name,
                    value.len()
                );
            }
            Ok(value)
        }
        Err(e) => {
            error!("Failed to load {} from environment: {}", name, e);
            Err(format!("Missing {} environment variable: {}", name, e).into())
        }
    }
}

impl TwitterConfig {
    /// Creates a new `TwitterConfig` by loading the consumer credentials from
    /// environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `TWITTER_KEY`: OAuth consumer key
    /// - `TWITTER_KEY_SECRET`: OAuth consumer secret
    ///
    /// # Returns
    ///
    /// - `Ok(TwitterConfig)`: If both variables are present and non-empty
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If either is missing or empty
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        info!("Loading Twitter configuration from environment variables");

        let config = TwitterConfig {
            consumer_key: read_credential("TWITTER_KEY")?,
            consumer_secret: read_credential("TWITTER_KEY_SECRET")?,
        };

        info!("Twitter configuration loaded successfully");
        Ok(config)
    }
}

/// Gets the server port from environment variables or returns the default.
///
/// This function reads the `PORT` environment variable and parses it as a u16.
/// If the environment variable is not set, it defaults to 3000.
///
/// # Panics
///
/// This function will panic if the `PORT` environment variable is set to a value
/// that cannot be parsed as a valid port number.
pub fn get_server_port() -> u16 {
    env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .expect("PORT must be a valid number")
}

/// Gets the frontend origin allowed by CORS from the `URL` environment variable.
///
/// Returns `None` when unset or empty, in which case any origin is allowed.
pub fn get_allowed_origin() -> Option<String> {
    env::var("URL").ok().filter(|origin| !origin.is_empty())
}
