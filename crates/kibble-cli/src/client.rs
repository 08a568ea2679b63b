//! Async HTTP client wrapping the kibble JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use kibble_core::{
  feeding::FeedingEvent,
  food::{EnergyEntries, FoodClass},
  subject::Subject,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Connection settings for the kibble API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Body of `POST /api/feedings`. Calories are never sent; the server
/// computes them.
#[derive(Debug, Clone, Serialize)]
pub struct FeedingSubmission {
  pub subject:        Subject,
  pub date:           NaiveDate,
  pub food_class:     FoodClass,
  pub food_id:        String,
  pub quantity_grams: f64,
}

/// Server reply to a submission.
#[derive(Debug, Clone, Deserialize)]
pub struct Receipt {
  #[serde(flatten)]
  pub feeding:    FeedingEvent,
  pub food_known: bool,
}

/// Async HTTP client for the kibble JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  // ── Feedings ──────────────────────────────────────────────────────────────

  /// `GET /api/feedings[?subject=<s>]`
  pub async fn list_feedings(&self, subject: Option<&Subject>) -> Result<Vec<FeedingEvent>> {
    let mut req = self.client.get(self.url("/feedings"));
    if let Some(s) = subject {
      req = req.query(&[("subject", s.as_str())]);
    }
    let resp = req.send().await.context("GET /feedings failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /feedings → {}", resp.status()));
    }
    resp.json().await.context("deserialising feedings")
  }

  /// `POST /api/feedings`
  pub async fn record_feeding(&self, submission: &FeedingSubmission) -> Result<Receipt> {
    let resp = self
      .client
      .post(self.url("/feedings"))
      .json(submission)
      .send()
      .await
      .context("POST /feedings failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST /feedings → {}", resp.status()));
    }
    resp.json().await.context("deserialising feeding receipt")
  }

  // ── Foods ─────────────────────────────────────────────────────────────────

  /// `GET /api/foods`
  pub async fn foods(&self) -> Result<EnergyEntries> {
    let resp = self
      .client
      .get(self.url("/foods"))
      .send()
      .await
      .context("GET /foods failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /foods → {}", resp.status()));
    }
    resp.json().await.context("deserialising energy table")
  }
}
