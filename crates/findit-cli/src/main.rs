//! `findit` — command-line client for the FindIt lost-and-found server.
//!
//! # Usage
//!
//! ```
//! findit feed --search keys --region america
//! findit report --name "Black wallet" --image-url https://… --locate
//! findit report --image-url https://… --image-file wallet.jpg --suggest-name \
//!   --lat 40.71 --lon -74.00 --place "Central Park, NYC"
//! findit profile --user u2
//! ```

mod client;
mod locate;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use chrono::Utc;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, ReportOutcome};
use findit_core::{
  feed::{RegionFilter, query},
  item::{Location, Region, Status},
  report::{DEFAULT_LOOKUP_TIMEOUT, ImageContent, ReportForm, ReportSubmission, ValidationError},
};
use locate::IpLocator;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "findit", about = "Browse and report lost and found items")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the FindIt server (default: http://localhost:8080).
  #[arg(long, env = "FINDIT_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List reports, newest first.
  Feed {
    /// Case-insensitive text matched against name and description.
    #[arg(short, long, default_value = "")]
    search: String,

    /// `all` or a region name.
    #[arg(short, long, default_value = "all")]
    region: RegionFilter,
  },

  /// Show a user's profile and reports (default: yourself).
  Profile {
    #[arg(short, long)]
    user: Option<String>,
  },

  /// Report a lost or found item.
  Report(ReportArgs),
}

#[derive(clap::Args, Debug)]
struct ReportArgs {
  #[arg(long)]
  name: Option<String>,

  #[arg(long, default_value = "")]
  description: String,

  /// `lost` or `found`.
  #[arg(long, default_value = "lost")]
  status: Status,

  #[arg(long, default_value = "local")]
  region: Region,

  /// Where the photo is hosted.
  #[arg(long)]
  image_url: Option<String>,

  /// Local copy of the photo, used for name suggestions.
  #[arg(long)]
  image_file: Option<PathBuf>,

  /// Ask the server to suggest a name from the photo.
  #[arg(long, requires = "image_file")]
  suggest_name: bool,

  #[arg(long, requires = "lon", allow_hyphen_values = true)]
  lat: Option<f64>,

  #[arg(long, requires = "lat", allow_hyphen_values = true)]
  lon: Option<f64>,

  /// Label for `--lat`/`--lon`.
  #[arg(long, requires = "lat")]
  place: Option<String>,

  /// Use the current position instead of `--lat`/`--lon`.
  #[arg(long, conflicts_with = "lat")]
  locate: bool,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
  };
  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Feed { search, region } => feed(&client, &search, region).await,
    Command::Profile { user } => profile(&client, user).await,
    Command::Report(report_args) => report(&client, report_args).await,
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn feed(client: &ApiClient, search: &str, region: RegionFilter) -> Result<()> {
  let items = client.list_items().await?;
  let hits = query(&items, search, region);
  print!("{}", render::feed(&hits, Utc::now()));
  Ok(())
}

async fn profile(client: &ApiClient, user: Option<String>) -> Result<()> {
  let me = client.me().await?;
  let user_id = user.unwrap_or_else(|| me.id.clone());
  let view = client.profile(&user_id).await?;
  print!("{}", render::profile(&view, view.user.id == me.id, Utc::now()));
  Ok(())
}

async fn report(client: &ApiClient, args: ReportArgs) -> Result<()> {
  let mut form = ReportForm::new();
  form.status = args.status;
  form.region = args.region;
  form.description = args.description;
  form.name = args.name.unwrap_or_default();

  let content = match &args.image_file {
    Some(path) => Some(read_image(path).await?),
    None => None,
  };
  let url = args.image_url.or_else(|| {
    args
      .image_file
      .as_ref()
      .map(|path| format!("file://{}", path.display()))
  });
  if let Some(url) = url {
    form.select_image(url, content);
  }

  if args.suggest_name {
    let state = form.suggest_caption(client, DEFAULT_LOOKUP_TIMEOUT).await?;
    if let Some(label) = state.resolved() {
      eprintln!("Suggested name: {label}");
    }
  }

  if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
    let location = match args.place {
      Some(place) => Location::new(lat, lon, place)?,
      None => Location::near(lat, lon)?,
    };
    form.set_location(location);
  } else if args.locate {
    let locator = IpLocator::new()?;
    form.locate(&locator, DEFAULT_LOOKUP_TIMEOUT).await?;
  }

  for notice in form.take_notices() {
    eprintln!("{notice}");
  }

  if let Err(e) = form.validate() {
    reject(&e)?;
  }

  match client.submit_report(&ReportSubmission::from(&form)).await? {
    ReportOutcome::Created(item) => {
      let items = client.list_items().await?;
      let all = query(&items, "", RegionFilter::All);
      print!("{}", render::submitted(&item, &all, Utc::now()));
      Ok(())
    }
    ReportOutcome::Rejected(e) => reject(&e),
  }
}

fn reject(e: &ValidationError) -> Result<()> {
  eprintln!("{}", ValidationError::MESSAGE);
  bail!("{e}")
}

async fn read_image(path: &Path) -> Result<ImageContent> {
  let data = tokio::fs::read(path)
    .await
    .with_context(|| format!("reading image {}", path.display()))?;
  Ok(ImageContent { data: Bytes::from(data), media_type: media_type(path).to_owned() })
}

/// Guess the image MIME type from the file extension.
fn media_type(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_ascii_lowercase)
    .unwrap_or_default();
  match ext.as_str() {
    "png" => "image/png",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "heic" => "image/heic",
    _ => "image/jpeg",
  }
}
