//! Probe: live fixtures and statistics endpoints
//!
//! Hits GET {base}/fixtures?live=all and GET {base}/fixtures/statistics and documents:
//! - Response shape and fields
//! - Statistic labels per team, and how each maps to a canonical metric
//! - Rate-limit headers
//! - Latency

use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::Value;

use corner_signals::DEFAULT_FEED_BASE;
use corner_signals::normalize::classify_label;

fn print_rate_headers(headers: &reqwest::header::HeaderMap) {
    for (name, value) in headers {
        if name.as_str().starts_with("x-ratelimit") {
            println!("  {}: {}", name, value.to_str().unwrap_or("?"));
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let key = std::env::var("API_FOOTBALL_KEY").context("API_FOOTBALL_KEY not set")?;
    let base = std::env::var("API_FOOTBALL_BASE").unwrap_or_else(|_| DEFAULT_FEED_BASE.to_string());
    let client = reqwest::Client::new();

    println!("=== Probe: live fixtures ===");
    println!("Base: {base}");
    println!();

    println!("--- 1. Live fixtures ---");
    let start = Instant::now();
    let resp = client
        .get(format!("{base}/fixtures"))
        .header("x-apisports-key", &key)
        .query(&[("live", "all")])
        .send()
        .await?;
    let latency = start.elapsed();
    println!("Status: {}", resp.status());
    println!("Latency: {:?}", latency);
    print_rate_headers(resp.headers());
    let body: Value = resp.json().await?;

    let fixtures = body["response"].as_array().cloned().unwrap_or_default();
    println!("Live count: {}", fixtures.len());
    let Some(first) = fixtures.first() else {
        println!("No live fixtures right now; errors: {}", body["errors"]);
        return Ok(());
    };
    println!("\nSample fixture (first):");
    println!("{}", serde_json::to_string_pretty(first)?);
    println!();

    let Some(id) = first["fixture"]["id"].as_u64() else {
        println!("First fixture has no numeric id");
        return Ok(());
    };

    println!("--- 2. Statistics for fixture {id} ---");
    let start = Instant::now();
    let resp = client
        .get(format!("{base}/fixtures/statistics"))
        .header("x-apisports-key", &key)
        .query(&[("fixture", id.to_string())])
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Latency: {:?}", start.elapsed());
    print_rate_headers(resp.headers());
    let body: Value = resp.json().await?;

    let teams = body["response"].as_array().cloned().unwrap_or_default();
    if teams.is_empty() {
        println!("No statistics yet (scanner would back off this match)");
        return Ok(());
    }
    for team in &teams {
        println!(
            "\nTeam {} ({}):",
            team["team"]["id"],
            team["team"]["name"].as_str().unwrap_or("?")
        );
        for stat in team["statistics"].as_array().into_iter().flatten() {
            let label = stat["type"].as_str().unwrap_or("");
            let mapped = classify_label(label)
                .map(|s| format!("{s:?}"))
                .unwrap_or_else(|| "-".to_string());
            println!("  {:<24} {:<10} -> {}", label, stat["value"], mapped);
        }
    }

    Ok(())
}
