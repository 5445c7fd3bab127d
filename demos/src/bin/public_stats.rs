//! Demo 2: Public Market Overview
//!
//! Showcases: unauthenticated endpoint groups, automatic first-call sync
//!
//! Run: cargo run --bin public_stats

use colored::*;
use nicehash_rest::NiceHashClient;
use serde_json::Value;

const MARKETS: [&str; 3] = ["BTCUSDT", "ETHBTC", "LTCBTC"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  NICEHASH PUBLIC STATS".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = NiceHashClient::public()?;

    let prices = client.exchange_public().get_prices().await?;
    println!("  {}", "EXCHANGE PRICES".white().bold());
    println!("  {}", "─".repeat(40));
    for market in MARKETS {
        match prices.get(market) {
            Some(price) => println!("  {:<12} {:>20}", market, price.to_string().green()),
            None => println!("  {:<12} {:>20}", market, "n/a".dimmed()),
        }
    }
    println!();

    let stats = client.hashpower().get_stats_current().await?;
    println!("  {}", "HASHPOWER (CURRENT)".white().bold());
    println!("  {}", "─".repeat(40));

    let algos = stats
        .get("algos")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for algo in algos.iter().take(10) {
        let id = algo.get("a").map(Value::to_string).unwrap_or_default();
        let price = algo.get("p").map(Value::to_string).unwrap_or_default();
        let speed = algo.get("s").map(Value::to_string).unwrap_or_default();
        println!("  algo {:>4}  price {:>16}  speed {:>16}", id, price.yellow(), speed);
    }
    if algos.is_empty() {
        println!("  {}", "no algorithm data".dimmed());
    }

    println!();
    println!("{}", "═".repeat(60).cyan());
    Ok(())
}
