//! Connection settings for the upstream Memos server.
//!
//! A [`Config`] is built once at process start, either from the command line via [`CliArgs`]
//! or directly by library callers, and then shared read-only with every tool invocation.

use std::fmt;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

/// Host used when none is supplied.
pub const DEFAULT_HOST: &str = "localhost";
/// Port used when none is supplied.
pub const DEFAULT_PORT: u16 = 8080;

/// Errors raised when the connection settings cannot describe a reachable server.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Host was blank.
    #[error("Memos host must not be empty")]
    EmptyHost,
    /// Port outside of the usable TCP range.
    #[error("Invalid Memos port: {0}")]
    InvalidPort(u16),
    /// Host and port did not combine into a valid URL.
    #[error("Invalid Memos host: {0}")]
    InvalidHost(String),
}

/// Immutable connection settings for the Memos server.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Host name (optionally prefixed with `http://` or `https://`).
    pub host: String,
    /// TCP port of the Memos server.
    pub port: u16,
    /// Access token sent as a bearer credential; empty disables the header.
    pub token: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            token: String::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token", &if self.has_token() { "<redacted>" } else { "" })
            .finish()
    }
}

impl Config {
    /// Build a configuration from explicit values.
    pub fn new(host: impl Into<String>, port: u16, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            token: token.into(),
        }
    }

    /// Base URL of the Memos server, `http://{host}:{port}` unless the host names a scheme.
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}:{}", self.port)
        } else {
            format!("http://{host}:{}", self.port)
        }
    }

    /// Value of the `Authorization` header, or `None` when no token is configured.
    pub fn authorization(&self) -> Option<String> {
        self.has_token()
            .then(|| format!("Bearer {}", self.token.trim()))
    }

    /// Whether a non-blank token is configured.
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Check that host and port describe a usable endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        let url = Url::parse(&self.base_url())
            .map_err(|err| ConfigError::InvalidHost(format!("{}: {err}", self.host)))?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::InvalidHost(self.host.clone()));
        }
        // Host must be a bare authority; anything else would swallow the port.
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::InvalidHost(format!(
                "{}: host must not carry a path or query",
                self.host
            )));
        }
        if url.port_or_known_default() != Some(self.port) {
            return Err(ConfigError::InvalidHost(format!(
                "{}: port {} is not applied",
                self.host, self.port
            )));
        }
        Ok(())
    }
}

/// Command-line flags accepted by the `memos-mcp` binary.
#[derive(Debug, Parser)]
#[command(
    name = "memos-mcp",
    version,
    about = "Give a model the ability to access a Memos server"
)]
pub struct CliArgs {
    /// The host name to connect to.
    #[arg(long, env = "MEMOS_HOST", default_value = DEFAULT_HOST)]
    pub host: String,
    /// The port number of the Memos server.
    #[arg(long, env = "MEMOS_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// The token to use for authentication.
    #[arg(long, env = "MEMOS_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,
}

impl CliArgs {
    /// Convert parsed flags into the runtime configuration.
    pub fn into_config(self) -> Config {
        Config::new(self.host, self.port, self.token)
    }
}

/// Load `.env` (if present), parse the command line, and validate the result.
pub fn load_from_cli() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = CliArgs::parse().into_config();
    config.validate()?;
    tracing::debug!(
        host = %config.host,
        port = config.port,
        has_token = config.has_token(),
        "Loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let config = Config::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert_eq!(config.token, "");
        assert!(config.authorization().is_none());
    }

    #[test]
    fn explicit_values_are_preserved() {
        let config = Config::new("memos.internal", 5230, "secret-token");
        assert_eq!(config.host, "memos.internal");
        assert_eq!(config.port, 5230);
        assert_eq!(config.token, "secret-token");
    }

    #[test]
    fn base_url_and_authorization_are_derived() {
        let config = Config::new("memos.internal", 5230, "abc");
        assert_eq!(config.base_url(), "http://memos.internal:5230");
        assert_eq!(config.authorization().as_deref(), Some("Bearer abc"));

        let tls = Config::new("https://memos.example.com/", 443, "");
        assert_eq!(tls.base_url(), "https://memos.example.com:443");
    }

    #[test]
    fn validate_rejects_bad_endpoints() {
        assert!(matches!(
            Config::new("  ", 8080, "").validate(),
            Err(ConfigError::EmptyHost)
        ));
        assert!(matches!(
            Config::new("localhost", 0, "").validate(),
            Err(ConfigError::InvalidPort(0))
        ));
        assert!(matches!(
            Config::new("bad host", 8080, "").validate(),
            Err(ConfigError::InvalidHost(_))
        ));
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_host_with_path_or_port() {
        assert!(matches!(
            Config::new("http://memos.lan/memos", 5230, "").validate(),
            Err(ConfigError::InvalidHost(_))
        ));
        assert!(matches!(
            Config::new("https://memos.example.com/memos", 443, "").validate(),
            Err(ConfigError::InvalidHost(_))
        ));
        assert!(matches!(
            Config::new("memos.lan?x=1", 5230, "").validate(),
            Err(ConfigError::InvalidHost(_))
        ));
        assert!(Config::new("memos.lan:9000", 5230, "").validate().is_err());
        assert!(Config::new("https://memos.example.com", 443, "").validate().is_ok());
        assert!(Config::new("https://memos.example.com/", 8443, "").validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_token() {
        let rendered = format!("{:?}", Config::new("localhost", 8080, "super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn cli_flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "memos-mcp",
            "--host",
            "10.0.0.5",
            "--port",
            "5230",
            "--token",
            "tok",
        ])
        .expect("flags parse");
        assert_eq!(args.into_config(), Config::new("10.0.0.5", 5230, "tok"));
    }

    #[test]
    fn cli_rejects_out_of_range_port() {
        let result = CliArgs::try_parse_from(["memos-mcp", "--port", "70000"]);
        assert!(result.is_err());
    }
}
