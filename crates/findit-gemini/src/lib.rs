//! Image captioning through the Gemini `generateContent` REST endpoint.
//!
//! [`GeminiCaptioner`] implements [`findit_core::lookup::Captioner`]: it sends
//! the image inline (base64) together with a fixed prompt and returns the
//! model's text answer, trimmed. Label clean-up and timeouts are the report
//! workflow's concern.

pub mod error;

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use findit_core::lookup::Captioner;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub use error::{Error, Result};

/// Instruction sent alongside every image.
pub const PROMPT: &str = "You are an expert at identifying items for a lost and found service. \
Describe the item in this image concisely in 5 words or less. For example: 'Silver keys on a \
blue lanyard' or 'Black leather men's wallet'. Focus on key identifying features.";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Connection settings, usually the `[gemini]` table of the server config.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
  #[serde(default)]
  pub api_key:      Option<String>,
  #[serde(default = "default_model")]
  pub model:        String,
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_model() -> String { DEFAULT_MODEL.to_owned() }

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }

fn default_timeout_secs() -> u64 { 30 }

impl Default for GeminiConfig {
  fn default() -> Self {
    Self {
      api_key:      None,
      model:        default_model(),
      base_url:     default_base_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
  contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
  parts: [RequestPart<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
  Inline { inline_data: InlineData<'a> },
  Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
  mime_type: &'a str,
  data:      String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
  error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
  message: String,
}

fn request_body<'a>(image: &[u8], media_type: &'a str) -> GenerateRequest<'a> {
  GenerateRequest {
    contents: [Content {
      parts: [
        RequestPart::Inline {
          inline_data: InlineData { mime_type: media_type, data: B64.encode(image) },
        },
        RequestPart::Text { text: PROMPT },
      ],
    }],
  }
}

/// Concatenate the text parts of the first candidate.
fn response_text(response: GenerateResponse) -> Result<String> {
  let text: String = response
    .candidates
    .into_iter()
    .next()
    .and_then(|candidate| candidate.content)
    .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
    .unwrap_or_default();

  let text = text.trim();
  if text.is_empty() {
    return Err(Error::EmptyResponse);
  }
  Ok(text.to_owned())
}

// ─── Captioner ────────────────────────────────────────────────────────────────

/// Gemini-backed caption service.
#[derive(Clone)]
pub struct GeminiCaptioner {
  client: Client,
  config: GeminiConfig,
}

impl GeminiCaptioner {
  /// Build the captioner. A missing API key is not an error here; every call
  /// will fail with [`Error::MissingApiKey`] instead.
  pub fn new(config: GeminiConfig) -> Result<Self> {
    if config.api_key.as_deref().is_none_or(str::is_empty) {
      tracing::warn!("Gemini API key not set; image captioning will fail");
    }
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  fn endpoint(&self) -> String {
    format!(
      "{}/models/{}:generateContent",
      self.config.base_url.trim_end_matches('/'),
      self.config.model
    )
  }

  /// Send one image and return the model's trimmed answer.
  pub async fn caption(&self, image: &[u8], media_type: &str) -> Result<String> {
    let api_key = self
      .config
      .api_key
      .as_deref()
      .filter(|key| !key.is_empty())
      .ok_or(Error::MissingApiKey)?;

    let resp = self
      .client
      .post(self.endpoint())
      .header("x-goog-api-key", api_key)
      .json(&request_body(image, media_type))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let message = match resp.json::<ApiErrorBody>().await {
        Ok(body) => body.error.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_owned(),
      };
      return Err(Error::Api { status: status.as_u16(), message });
    }

    let label = response_text(resp.json().await?)?;
    tracing::debug!(model = %self.config.model, %label, "image captioned");
    Ok(label)
  }
}

impl Captioner for GeminiCaptioner {
  type Error = Error;

  async fn analyze_image(&self, image: &[u8], media_type: &str) -> Result<String> {
    self.caption(image, media_type).await
  }
}
