use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no Gemini API key configured")]
  MissingApiKey,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Gemini API error ({status}): {message}")]
  Api { status: u16, message: String },

  #[error("Gemini returned no text")]
  EmptyResponse,
}
