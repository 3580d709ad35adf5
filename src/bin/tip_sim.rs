//! Tip Simulator
//!
//! Exercises a running EcoGrid Sentinel: lists regions, deploys the first
//! one, submits a handful of community tips and prints the resulting status.
//! Useful for demoing the dashboard without a real SMS gateway.
//!
//! Usage: cargo run --bin tip-sim [server_url]

use serde_json::{json, Value};
use std::env;
use tokio::time::{sleep, Duration};

const TIPS: &[(&str, &str)] = &[
    ("+254711000001", "Chainsaw noise near the river crossing"),
    ("+254722000002", "Truck loading logs at the north gate"),
    ("Anonymous", "Smoke rising from the eastern ridge"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base = env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
    let base = base.trim_end_matches('/');
    let http = reqwest::Client::new();

    println!("🌲 EcoGrid Tip Simulator");
    println!("  Target: {}", base);
    println!();

    let regions: Vec<String> = http
        .get(format!("{}/regions", base))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("🗺️  Regions: {}", regions.join(", "));

    let Some(region) = regions.first() else {
        println!("   ⚠️  Server has no regions, nothing to deploy");
        return Ok(());
    };

    let deployment: Value = http
        .post(format!("{}/deploy", base))
        .json(&json!({ "region_name": region, "live_analysis": true }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let stats = &deployment["stats"];
    println!(
        "📡 Deployed {}: {} sensors, {} relays, cost {} ({})",
        region, stats["sensors"], stats["relays"], stats["cost"], stats["source"]
    );
    println!();

    for (sender, message) in TIPS {
        println!("📨 Tip from {}: {}", sender, message);
        let resp = http
            .post(format!("{}/tip_webhook", base))
            .json(&json!({ "sender": sender, "message": message }))
            .send()
            .await?;

        if resp.status().is_success() {
            let body: Value = resp.json().await?;
            println!("   ✅ {} ({})", body["status"], body["tx_hash"]);
        } else {
            println!("   ❌ Server answered {}", resp.status());
        }

        sleep(Duration::from_millis(500)).await;
    }

    let status: Value = http
        .get(format!("{}/status", base))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    println!();
    println!(
        "📊 Status: {} | nodes={} alerts={} ledger height={}",
        status["system_status"],
        status["nodes"].as_array().map_or(0, Vec::len),
        status["alerts"].as_array().map_or(0, Vec::len),
        status["blockchain"]["height"]
    );
    println!("✨ Simulation complete!");
    Ok(())
}
