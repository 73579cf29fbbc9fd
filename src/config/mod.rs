//! Run settings for telcotag.
//!
//! Everything comes from CLI flags or their environment variable fallbacks;
//! there are no config files and no persisted state.
//!
//! ## Precedence
//!
//! CLI flag > environment variable > built-in default (production endpoints)

use crate::cli::Cli;
use crate::{Error, Result};
use std::fmt;

/// Red Hat SSO token endpoint used to exchange the offline token.
pub const DEFAULT_SSO_TOKEN_URL: &str =
    "https://sso.redhat.com/auth/realms/redhat-external/protocol/openid-connect/token";

/// Customer portal base URL (case search and per-case endpoints).
pub const DEFAULT_PORTAL_BASE_URL: &str = "https://access.redhat.com";

/// Bugzilla base URL.
pub const DEFAULT_BUGZILLA_BASE_URL: &str = "https://bugzilla.redhat.com";

/// Output format for reports written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote endpoints the run talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Full URL of the OAuth2 token endpoint
    pub sso_token_url: String,
    /// Base URL of the customer portal, without trailing slash
    pub portal_base_url: String,
    /// Base URL of Bugzilla, without trailing slash
    pub bugzilla_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            sso_token_url: DEFAULT_SSO_TOKEN_URL.to_string(),
            portal_base_url: DEFAULT_PORTAL_BASE_URL.to_string(),
            bugzilla_base_url: DEFAULT_BUGZILLA_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Build endpoints from optional overrides, validating each URL.
    pub fn resolve(
        sso_token_url: Option<String>,
        portal_base_url: Option<String>,
        bugzilla_base_url: Option<String>,
    ) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            sso_token_url: normalize_url(
                "sso-url",
                sso_token_url.unwrap_or(defaults.sso_token_url),
            )?,
            portal_base_url: normalize_url(
                "portal-url",
                portal_base_url.unwrap_or(defaults.portal_base_url),
            )?,
            bugzilla_base_url: normalize_url(
                "bugzilla-url",
                bugzilla_base_url.unwrap_or(defaults.bugzilla_base_url),
            )?,
        })
    }
}

/// Fully resolved settings for one run.
#[derive(Clone)]
pub struct Settings {
    /// Portal offline token
    pub offline_token: String,
    /// Bugzilla API key
    pub bz_key: String,
    /// Apply the tag instead of only reporting
    pub modify: bool,
    pub output_format: OutputFormat,
    pub endpoints: Endpoints,
}

impl Settings {
    /// Resolve settings from parsed CLI arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let offline_token = require_secret("offline-token", cli.offline_token)?;
        let bz_key = require_secret("bz-key", cli.bz_key)?;
        let endpoints = Endpoints::resolve(cli.sso_url, cli.portal_url, cli.bugzilla_url)?;

        Ok(Self {
            offline_token,
            bz_key,
            modify: cli.modify,
            output_format: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
            endpoints,
        })
    }
}

// Secrets stay out of debug output.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("offline_token", &"<redacted>")
            .field("bz_key", &"<redacted>")
            .field("modify", &self.modify)
            .field("output_format", &self.output_format)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

fn require_secret(name: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("--{} must not be empty", name)));
    }
    Ok(trimmed.to_string())
}

fn normalize_url(name: &str, value: String) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("--{} must not be empty", name)));
    }
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(Error::InvalidInput(format!(
            "--{} must be an http(s) URL, got '{}'",
            name, trimmed
        )));
    }
    Ok(trimmed.to_string())
}
