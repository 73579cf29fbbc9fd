//! CLI argument definitions for telcotag.

use clap::Parser;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TELCOTAG_GIT_COMMIT"),
    " built ",
    env!("TELCOTAG_BUILD_TIMESTAMP"),
    ")"
);

/// telcotag - find Telco case bugzillas missing the `Telco` whiteboard tag.
///
/// Searches the customer portal for Telco-related cases, resolves the
/// bugzillas of every case that is not closed, and prints the ones whose
/// internal whiteboard lacks `Telco`. Pass `--modify` to prepend the tag.
#[derive(Parser, Debug)]
#[command(name = "telcotag")]
#[command(author, version, long_version = LONG_VERSION, about = "Get untagged Bugzillas", long_about = None)]
pub struct Cli {
    /// API token for the case portal: https://access.redhat.com/articles/3626371
    #[arg(short = 'o', long = "offline-token", env = "TELCOTAG_OFFLINE_TOKEN", hide_env_values = true)]
    pub offline_token: String,

    /// API key for bugzilla.redhat.com: https://bugzilla.redhat.com/userprefs.cgi?tab=apikey
    #[arg(short = 'b', long = "bz-key", env = "TELCOTAG_BZ_KEY", hide_env_values = true)]
    pub bz_key: String,

    /// Add 'Telco ' to the internal whiteboard of untagged bugzillas
    #[arg(short = 'y', long = "modify")]
    pub modify: bool,

    /// Print reports as JSON lines instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Override the SSO token endpoint
    #[arg(long = "sso-url", env = "TELCOTAG_SSO_URL", hide = true)]
    pub sso_url: Option<String>,

    /// Override the customer portal base URL
    #[arg(long = "portal-url", env = "TELCOTAG_PORTAL_URL", hide = true)]
    pub portal_url: Option<String>,

    /// Override the Bugzilla base URL
    #[arg(long = "bugzilla-url", env = "TELCOTAG_BUGZILLA_URL", hide = true)]
    pub bugzilla_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_requires_offline_token_and_bz_key() {
        assert!(Cli::try_parse_from(["telcotag", "-b", "key"]).is_err());
        assert!(Cli::try_parse_from(["telcotag", "-o", "token"]).is_err());
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "telcotag",
            "--offline-token",
            "token",
            "--bz-key",
            "key",
            "--modify",
        ])
        .unwrap();
        assert_eq!(cli.offline_token, "token");
        assert_eq!(cli.bz_key, "key");
        assert!(cli.modify);
        assert!(!cli.json);
    }

    #[test]
    fn test_endpoint_overrides() {
        let cli = Cli::try_parse_from([
            "telcotag",
            "-o",
            "token",
            "-b",
            "key",
            "--portal-url",
            "http://localhost:1",
            "--bugzilla-url",
            "http://localhost:2",
        ])
        .unwrap();
        assert_eq!(cli.portal_url.as_deref(), Some("http://localhost:1"));
        assert_eq!(cli.bugzilla_url.as_deref(), Some("http://localhost:2"));
        assert!(cli.sso_url.is_none());
    }
}
