//! Submit a message and print the burst the relay streams back.
//!
//! ```bash
//! cargo run --example stream_burst -- "hello relay"
//! ```

use std::time::Duration;

use sse_relay_client::{RelayConfig, StreamFormController};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let message = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hello from Rust".to_string());

    let config = RelayConfig::discover(None)?;
    let mut controller = StreamFormController::from_config(&config)?;

    let accepted = controller.submit(&message).await?;
    println!("Relay accepted {:?}", accepted.message());

    // The relay sends a keepalive after 15 s of silence; allow for a few.
    let wait = tokio::time::timeout(Duration::from_secs(60), async {
        while let Some(event) = controller.pump().await {
            if event.is_terminal() {
                break;
            }
        }
    });
    if wait.await.is_err() {
        println!("Timed out waiting for the stream to close");
    }

    println!("\nEvent log (oldest first):");
    for entry in controller.log().iter().rev() {
        println!("  [{:<7}] {}", entry.category.label(), entry.render());
    }
    println!("Final status: {}", controller.status().text);

    Ok(())
}
