//! Async HTTP client wrapping the FindIt JSON API.

use anyhow::{Context, Result, anyhow};
use findit_core::{
  item::Item,
  lookup::Captioner,
  profile::ProfileView,
  report::{ReportSubmission, ValidationError},
  user::User,
};
use reqwest::{Client, Response, StatusCode, header};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Connection settings for the FindIt API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the FindIt JSON REST API.
///
/// Clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// What the server made of a submitted report.
#[derive(Debug)]
pub enum ReportOutcome {
  Created(Item),
  Rejected(ValidationError),
}

/// A caption request that did not produce a label.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CaptionError(String);

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Deserialize)]
struct CaptionBody {
  label: String,
}

/// The server's `{"error": ...}` message, or the bare status.
async fn failure(resp: Response) -> String {
  let status = resp.status();
  match resp.json::<ErrorBody>().await {
    Ok(body) => format!("{status}: {}", body.error),
    Err(_) => status.to_string(),
  }
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
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
    let resp = self
      .client
      .get(self.url(path))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET {path} → {}", failure(resp).await));
    }
    resp.json().await.with_context(|| format!("deserialising {path}"))
  }

  // ── Items ─────────────────────────────────────────────────────────────────

  /// `GET /api/items`, the whole collection newest first.
  pub async fn list_items(&self) -> Result<Vec<Item>> { self.get_json("/items").await }

  /// `POST /api/reports`
  pub async fn submit_report(&self, report: &ReportSubmission) -> Result<ReportOutcome> {
    let resp = self
      .client
      .post(self.url("/reports"))
      .json(report)
      .send()
      .await
      .context("POST /reports failed")?;

    match resp.status() {
      StatusCode::CREATED => {
        let item = resp.json().await.context("deserialising created item")?;
        Ok(ReportOutcome::Created(item))
      }
      StatusCode::UNPROCESSABLE_ENTITY => {
        let rejected = resp.json().await.context("deserialising validation error")?;
        Ok(ReportOutcome::Rejected(rejected))
      }
      _ => Err(anyhow!("POST /reports → {}", failure(resp).await)),
    }
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `GET /api/me`
  pub async fn me(&self) -> Result<User> { self.get_json("/me").await }

  /// `GET /api/users/<id>/profile`
  pub async fn profile(&self, user_id: &str) -> Result<ProfileView> {
    self.get_json(&format!("/users/{user_id}/profile")).await
  }

  // ── Captions ──────────────────────────────────────────────────────────────

  /// `POST /api/captions`
  pub async fn caption(&self, image: &[u8], media_type: &str) -> Result<String, CaptionError> {
    let resp = self
      .client
      .post(self.url("/captions"))
      .header(header::CONTENT_TYPE, media_type)
      .body(image.to_vec())
      .send()
      .await
      .map_err(|e| CaptionError(e.to_string()))?;

    if !resp.status().is_success() {
      return Err(CaptionError(failure(resp).await));
    }
    let body: CaptionBody = resp.json().await.map_err(|e| CaptionError(e.to_string()))?;
    Ok(body.label)
  }
}

impl Captioner for ApiClient {
  type Error = CaptionError;

  async fn analyze_image(&self, image: &[u8], media_type: &str) -> Result<String, CaptionError> {
    self.caption(image, media_type).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_joins_api_prefix() {
    let client = ApiClient::new(ApiConfig { base_url: "http://localhost:8080/".into() }).unwrap();
    assert_eq!(client.url("/items"), "http://localhost:8080/api/items");
  }

  #[test]
  fn validation_body_parses_missing_fields() {
    let body = r#"{"error":"Please fill name, upload an image, and set a location.","missing_fields":["image","location"]}"#;
    let parsed: ValidationError = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.missing_fields.len(), 2);
  }
}
