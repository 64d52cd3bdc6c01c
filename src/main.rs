//! Entry point for the quote engine binary.
//!
//! Running this binary starts an HTTP server that prices export
//! shipment quotes.  The directory containing rate card JSON files
//! may be specified via the `QUOTE_RATES_DIR` environment variable;
//! if unset the server looks for a `rates` folder relative to the
//! current working directory and falls back to the built-in rates
//! when it is absent.

use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rates_dir = std::env::var("QUOTE_RATES_DIR").unwrap_or_else(|_| "rates".to_string());
    let addr = std::env::var("QUOTE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    quote_engine::api::serve(&addr, PathBuf::from(rates_dir)).await
}
