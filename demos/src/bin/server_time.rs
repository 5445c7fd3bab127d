//! Demo 1: Server Clock Offset
//!
//! Showcases: clock synchronization, the guard against unsynced requests
//!
//! Run: cargo run --bin server_time

use chrono::{TimeZone, Utc};
use colored::*;
use nicehash_rest::{NiceHashClient, RequestSpec, RestError};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  NICEHASH SERVER TIME".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = NiceHashClient::public()?;

    match client.send(RequestSpec::get("/main/api/v2/public/buy/info")).await {
        Err(RestError::ClockNotSynchronized) => {
            println!("{} Request refused before sync, nothing sent", "✓".green());
        }
        other => println!("{} Unexpected result: {:?}", "✗".red(), other.map(|_| ())),
    }
    println!();

    println!(
        "  {:>8}  {:>26}  {:>12}",
        "SAMPLE".white().bold(),
        "SERVER TIME (UTC)".white().bold(),
        "OFFSET".white().bold()
    );
    println!("  {}", "─".repeat(50));

    for sample in 1..=3 {
        let offset = client.sync().await?;
        let server_millis = Utc::now().timestamp_millis() + offset;
        let server_time = Utc
            .timestamp_millis_opt(server_millis)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
            .unwrap_or_default();

        let offset_text = format!("{:+} ms", offset);
        let offset_colored = if offset.abs() < 1_000 {
            offset_text.green()
        } else {
            offset_text.yellow()
        };

        println!("  {:>8}  {:>26}  {:>12}", sample, server_time, offset_colored);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    println!();
    println!("{}", "═".repeat(60).cyan());
    Ok(())
}
