//! Check that the relay is running.
//!
//! This is the simplest example: no stream is opened.
//!
//! ```bash
//! cargo run --example ping
//! ```

use sse_relay_client::{RelayClient, RelayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = RelayConfig::discover(None).unwrap_or_else(|_| {
        println!("No usable config found, using the default relay URL");
        RelayConfig::default()
    });

    println!("Pinging relay at {}...", config.base_url);

    let client = RelayClient::new(&config)?;
    let pong = client.ping().await?;
    println!("status: {}", pong.status);
    if let Some(message) = pong.message {
        println!("message: {message}");
    }

    Ok(())
}
