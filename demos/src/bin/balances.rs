//! Demo 3: Wallet Balances
//!
//! Showcases: signed requests, loading credentials from `secret.json` or
//! `NICEHASH_*` environment variables
//!
//! Run: cargo run --bin balances [path/to/secret.json]

use colored::*;
use nicehash_rest::{ClientConfig, NiceHashClient, RestError};
use serde_json::Value;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  NICEHASH BALANCES".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let secret = std::env::args().nth(1).unwrap_or_else(|| "secret.json".to_string());
    let config = if Path::new(&secret).exists() {
        println!("{} Using credentials from {}", "✓".green(), secret);
        ClientConfig::from_json_file(&secret)?
    } else {
        println!("{} Using credentials from environment", "✓".green());
        ClientConfig::from_env()?
    };

    let client = NiceHashClient::new(config)?;
    if !client.has_credentials() {
        println!("{} No API key configured", "✗".red());
        return Ok(());
    }

    let balances = match client.accounting().get_balances(false, None).await {
        Ok(balances) => balances,
        Err(RestError::Api { status, body, .. }) => {
            println!("{} NiceHash returned {}: {}", "✗".red(), status, body);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    println!(
        "  {:<8}  {:>18}  {:>18}",
        "CURRENCY".white().bold(),
        "AVAILABLE".white().bold(),
        "PENDING".white().bold()
    );
    println!("  {}", "─".repeat(48));

    let text = |v: &Value, key: &str| v.get(key).and_then(Value::as_str).unwrap_or("0").to_string();
    let currencies = balances
        .get("currencies")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for currency in &currencies {
        println!(
            "  {:<8}  {:>18}  {:>18}",
            text(currency, "currency"),
            text(currency, "available").green(),
            text(currency, "pending").yellow()
        );
    }

    if let Some(total) = balances.get("total") {
        println!("  {}", "─".repeat(48));
        println!(
            "  {:<8}  {:>18}  {:>18}",
            "TOTAL".white().bold(),
            text(total, "totalBalance").green().bold(),
            text(total, "pending").yellow()
        );
    }

    println!();
    println!("{}", "═".repeat(60).cyan());
    Ok(())
}
