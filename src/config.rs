use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

// ---------------------------------------------------------------------------
// Command line / environment
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "precip-harmonics",
    about = "Periodic regression of monthly precipitation via a remote analysis service"
)]
pub struct Cli {
    /// Base URL of the analysis service
    #[arg(long, env = "HARMONICS_API_URL")]
    pub api_url: String,

    /// Bearer credential sent with every request
    #[arg(long, env = "HARMONICS_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Ignore responses from submissions superseded by a newer one
    #[arg(long)]
    pub latest_only: bool,

    /// File to preselect on startup
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl Cli {
    pub fn api_config(&self) -> Result<ApiConfig> {
        ApiConfig::new(&self.api_url, &self.api_key)
    }

    pub fn stale_policy(&self) -> StalePolicy {
        if self.latest_only {
            StalePolicy::LatestOnly
        } else {
            StalePolicy::LastWins
        }
    }
}

// ---------------------------------------------------------------------------
// Injected configuration
// ---------------------------------------------------------------------------

/// Where and how to reach the analysis service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: reqwest::Url,
    pub api_key: String,
}

impl ApiConfig {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            bail!("API URL is empty");
        }
        let base_url =
            reqwest::Url::parse(trimmed).with_context(|| format!("invalid API URL '{trimmed}'"))?;
        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// The analysis route: the base URL with a single trailing slash.
    pub fn endpoint(&self) -> String {
        format!("{}/", self.base_url.as_str().trim_end_matches('/'))
    }
}

/// What to do with a response when a newer submission is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Whichever response resolves last overwrites the state.
    #[default]
    LastWins,
    /// Only the newest submission may update the state.
    LatestOnly,
}
