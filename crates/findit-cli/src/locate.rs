//! Approximate device position from the public IP address.

use std::time::Duration;

use anyhow::{Context, Result};
use findit_core::lookup::{Coordinates, LocateError, Locator};
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_ENDPOINT: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";

/// [`Locator`] backed by an ip-api.com style JSON endpoint.
#[derive(Clone)]
pub struct IpLocator {
  client:   Client,
  endpoint: String,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
  status:  String,
  #[serde(default)]
  message: Option<String>,
  lat:     Option<f64>,
  lon:     Option<f64>,
}

impl IpApiResponse {
  fn into_coordinates(self) -> Result<Coordinates, LocateError> {
    match (self.status.as_str(), self.lat, self.lon) {
      ("success", Some(latitude), Some(longitude)) => Ok(Coordinates { latitude, longitude }),
      _ => Err(LocateError::Unavailable(
        self.message.unwrap_or_else(|| format!("lookup status {}", self.status)),
      )),
    }
  }
}

impl IpLocator {
  pub fn new() -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(10))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, endpoint: DEFAULT_ENDPOINT.to_owned() })
  }
}

impl Locator for IpLocator {
  async fn current_position(&self) -> Result<Coordinates, LocateError> {
    let resp = self
      .client
      .get(&self.endpoint)
      .send()
      .await
      .map_err(|e| LocateError::Unavailable(e.to_string()))?;
    let body: IpApiResponse =
      resp.json().await.map_err(|e| LocateError::Unavailable(e.to_string()))?;
    body.into_coordinates()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn success_yields_coordinates() {
    let body: IpApiResponse =
      serde_json::from_str(r#"{"status":"success","lat":51.5072,"lon":-0.1276}"#).unwrap();
    assert_eq!(
      body.into_coordinates().unwrap(),
      Coordinates { latitude: 51.5072, longitude: -0.1276 }
    );
  }

  #[test]
  fn failure_carries_reason() {
    let body: IpApiResponse =
      serde_json::from_str(r#"{"status":"fail","message":"private range"}"#).unwrap();
    assert_eq!(
      body.into_coordinates().unwrap_err(),
      LocateError::Unavailable("private range".into())
    );
  }
}
