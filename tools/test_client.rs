//! API Test Client
//!
//! Exercises every endpoint against a running server. Start the server
//! first, then run this with an optional base URL argument.

use anyhow::Result;
use serde_json::{json, Value};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_client=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let base_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("http://localhost:5000");

    info!(base_url = %base_url, "Starting API test client");

    let client = reqwest::Client::new();

    // 1. Health check
    let response = client.get(format!("{base_url}/api/health")).send().await?;
    show("1. Health check", response).await?;

    // 2. Model info
    let response = client
        .get(format!("{base_url}/api/model/info"))
        .send()
        .await?;
    show("2. Model info", response).await?;

    // 3. ExtraTrees hyperparameters
    let response = client
        .get(format!("{base_url}/api/model/params/extratrees"))
        .send()
        .await?;
    show("3. ExtraTrees hyperparameters", response).await?;

    // 4. Feature importances (top 5 by rank)
    let response = client
        .get(format!("{base_url}/api/model/feature-importances"))
        .send()
        .await?;
    let status = response.status();
    let body: Value = response.json().await?;
    if status.is_success() {
        info!("4. Feature importances");
        info!("Raw array: {}", body["raw_array"]);
        if let Some(sorted) = body["sorted_by_importance"].as_array() {
            for item in sorted.iter().take(5) {
                info!(
                    "  Rank {}: Feature {} = {:.6} ({:.2}%)",
                    item["rank"],
                    item["feature_index"],
                    item["importance"].as_f64().unwrap_or(0.0),
                    item["percentage"].as_f64().unwrap_or(0.0)
                );
            }
        }
    } else {
        warn!(status = %status, body = %body, "4. Feature importances failed");
    }

    // 5. Predict, single sample
    let single = json!({ "features": [1.2, 3.4, 0.7, 2.1, 5.0, 1.8, 2.3, 4.5, 3.2] });
    info!("5. Predict (single sample): {}", single);
    let response = client
        .post(format!("{base_url}/api/predict"))
        .json(&single)
        .send()
        .await?;
    show("5. Predict result", response).await?;

    // 6. Predict, multiple samples
    let multi = json!({ "features": [
        [1.2, 3.4, 0.7, 2.1, 5.0, 1.8, 2.3, 4.5, 3.2],
        [2.1, 4.5, 1.3, 3.2, 6.1, 2.4, 3.1, 5.2, 4.1],
        [0.5, 2.1, 0.3, 1.5, 3.2, 1.1, 1.8, 3.5, 2.4]
    ]});
    info!("6. Predict (3 samples)");
    let response = client
        .post(format!("{base_url}/api/predict"))
        .json(&multi)
        .send()
        .await?;
    show("6. Predict result", response).await?;

    // 7. Error handling: too few features (3 sent, 9 expected)
    let short = json!({ "features": [1.2, 3.4, 0.7] });
    info!("7. Error handling (3 features sent, 9 expected)");
    let response = client
        .post(format!("{base_url}/api/predict"))
        .json(&short)
        .send()
        .await?;
    let status = response.status();
    let body: Value = response.json().await?;
    if status.is_success() {
        warn!("7. Expected an error response, got success: {}", body);
    } else {
        info!(status = %status, "7. Rejected as expected: {}", body);
    }

    info!("Test run complete");

    Ok(())
}

async fn show(title: &str, response: reqwest::Response) -> Result<()> {
    let status = response.status();
    let body: Value = response.json().await?;

    if status.is_success() {
        info!("{}: {}", title, serde_json::to_string_pretty(&body)?);
    } else {
        warn!(status = %status, "{}: {}", title, body);
    }

    Ok(())
}
