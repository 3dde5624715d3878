use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 10;
const BASE_URL: &str = "http://localhost:3000";
const EVENT_CAPACITY: i64 = 500;

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    body: Option<serde_json::Value>,
    // A fresh user id per request keeps the per-user limit out of the
    // picture, so only capacity decides purchase outcomes.
    unique_user: bool,
}

#[tokio::main]
async fn main() {
    println!("{}", "🚀 Starting Admission Load Test".bold().green());
    println!("Target URL: {}", BASE_URL);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    if client.get(format!("{}/health", BASE_URL)).send().await.is_err() {
        eprintln!("{}", "❌ Server is NOT reachable at localhost:3000. Please start it first.".red().bold());
        return;
    }

    println!("\n{}", "⚙️  Setting up load test data...".yellow());
    let organizer = format!("loadtest-org-{}", Uuid::new_v4());
    let event_id = setup_event(&client, &organizer).await;

    println!("{}", "✅ Event created successfully.".green());
    println!("   Event ID: {}", event_id);
    println!("   Capacity: {}", EVENT_CAPACITY);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", BASE_URL),
            body: None,
            unique_user: false,
        },
        Target {
            name: "Get Event Details (Public Read)",
            method: "GET",
            url: format!("{}/api/v1/events/{}", BASE_URL, event_id),
            body: None,
            unique_user: false,
        },
        Target {
            name: "Price Quote (Pure Compute)",
            method: "POST",
            url: format!("{}/api/v1/events/{}/quote", BASE_URL, event_id),
            body: Some(json!({ "quantity": 2, "promo_code": "LOAD50" })),
            unique_user: false,
        },
        Target {
            name: "Purchase Ticket (Contended Write)",
            method: "POST",
            url: format!("{}/api/v1/events/{}/tickets", BASE_URL, event_id),
            body: Some(json!({ "quantity": 1 })),
            unique_user: true,
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }

    verify_no_oversell(&client, &event_id).await;
}

async fn setup_event(client: &Client, organizer: &str) -> String {
    let event_payload = json!({
        "title": "Load Test Concert",
        "description": "Synthetic event for admission load testing",
        "location": "Server Room",
        "starts_at": (Utc::now() + ChronoDuration::days(30)).to_rfc3339(),
        "sales_open_at": (Utc::now() - ChronoDuration::hours(1)).to_rfc3339(),
        "sales_close_at": (Utc::now() + ChronoDuration::days(29)).to_rfc3339(),
        "ticket_price": 10.0,
        "max_tickets": EVENT_CAPACITY,
        "per_user_limit": 1,
        "promo_codes": [{ "code": "LOAD50", "discount_percent": 50.0 }]
    });

    let res = client.post(format!("{}/api/v1/events", BASE_URL))
        .header("X-User-Id", organizer)
        .json(&event_payload)
        .send()
        .await
        .expect("Failed to send event create request");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to create event. Status: {}. Body: {}", status, txt);
    }

    let body: Value = res.json().await.expect("Failed to parse event response");
    body["id"].as_str().expect("No event id").to_string()
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap())
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let body = target.body.clone();
            let method = target.method;
            let user_id = if target.unique_user {
                format!("load-user-{}", Uuid::new_v4())
            } else {
                "load-user-fixed".to_string()
            };
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = match method {
                    "POST" => {
                        let mut req = client.post(&url).header("X-User-Id", &user_id);
                        if let Some(b) = body {
                            req = req.json(&b);
                        }
                        req.send().await
                    },
                    _ => client.get(&url).header("X-User-Id", &user_id).send().await,
                };
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}

async fn verify_no_oversell(client: &Client, event_id: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", "🔎 Verifying admission integrity".bold());

    let res = client.get(format!("{}/api/v1/events/{}", BASE_URL, event_id))
        .send()
        .await
        .expect("Failed to re-read event");

    let body: Value = res.json().await.expect("Failed to parse event");
    let booked = body["tickets_booked"].as_i64().unwrap_or(-1);
    let remaining = body["tickets_remaining"].as_i64().unwrap_or(-1);

    println!("   tickets_booked:    {}", booked);
    println!("   tickets_remaining: {}", remaining);

    if booked > EVENT_CAPACITY {
        println!("{}", format!("❌ OVERSOLD: {} booked > {} capacity", booked, EVENT_CAPACITY).red().bold());
    } else if booked == EVENT_CAPACITY {
        println!("{}", "✅ Sold out exactly at capacity. No oversell.".green().bold());
    } else {
        println!("{}", format!("✅ No oversell ({} of {} sold).", booked, EVENT_CAPACITY).green());
    }
}
