//! Twitter Sign-In Helper
//!
//! This script walks through the PIN-based OAuth 1.0a flow from the terminal
//! and prints an `x-authorization` header value for calling the service by hand.
//! Requires TWITTER_KEY and TWITTER_KEY_SECRET to be set.

use std::io::{self, Write};

use timeline_bff::{OAuthClient, SignedRequestClient, TokenPair, TwitterConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    println!("🐦 Twitter Sign-In Helper");
    println!("=========================");

    let config = match TwitterConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            eprintln!();
            eprintln!("Set the app's consumer credentials first:");
            eprintln!("  export TWITTER_KEY=\"your_consumer_key\"");
            eprintln!("  export TWITTER_KEY_SECRET=\"your_consumer_secret\"");
            std::process::exit(1);
        }
    };
    let client = OAuthClient::new(&config);

    println!("\n🔄 Requesting a request token...");
    let request_token = client.request_token().await?;

    println!("\n🔗 Authorization Steps:");
    println!("1. Open this URL in your browser:");
    println!("   {}", request_token.url);
    println!("2. Authorize the application");
    println!("3. Paste the PIN shown by Twitter below");

    print!("\nEnter the PIN: ");
    io::stdout().flush()?;
    let mut pin = String::new();
    io::stdin().read_line(&mut pin)?;
    let pin = pin.trim();

    if pin.is_empty() {
        eprintln!("❌ Error: PIN cannot be empty");
        std::process::exit(1);
    }

    println!("\n🔄 Exchanging PIN for access token...");
    let pair = TokenPair {
        token: request_token.token,
        token_secret: request_token.token_secret,
    };
    let access = client.access_token(&pair, pin).await?;

    println!("\n✅ Success! Send this header with timeline requests:");
    println!(
        "x-authorization: OAuth oauth_token={}, oauth_token_secret={}",
        access.token, access.token_secret
    );

    Ok(())
}
