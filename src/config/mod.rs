use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::error;

const DEFAULT_CMS_URL: &str = "http://localhost:1337";
const DEFAULT_TTL_SECS: u64 = 5 * 60;

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `folio.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// CMS base URL (default: http://localhost:1337).
    cms_url: Option<String>,
    /// Bearer token sent with every CMS request. Omit for public-read APIs.
    api_token: Option<String>,
    /// Cache entry lifetime in seconds (default: 300).
    cache_ttl_secs: Option<u64>,
    /// Per-request timeout in seconds. Absent = unbounded, the historical
    /// behavior: a hung request blocks its resource key until it resolves.
    request_timeout_secs: Option<u64>,
    /// Log level filter string, e.g. "debug", "info,folio=trace" (default: "info").
    log: Option<String>,
}

fn load_toml(path: &Path) -> Option<TomlConfig> {
    let contents = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse folio.toml — using defaults");
            None
        }
    }
}

// ─── Config ───────────────────────────────────────────────────────────────────

/// Client configuration, read once at startup. There is no dynamic
/// reconfiguration: rebuild the service to pick up changes.
#[derive(Debug, Clone)]
pub struct Config {
    /// CMS base URL; the `/api` prefix is appended per request.
    pub cms_url: String,
    /// Bearer token for the CMS API (FOLIO_CMS_TOKEN env var). None for
    /// public-read content.
    pub api_token: Option<String>,
    /// How long a cached resource stays valid.
    pub cache_ttl: Duration,
    /// Optional per-request timeout. None (the default) leaves requests
    /// unbounded — opt in to cap them.
    pub request_timeout: Option<Duration>,
    /// Log level filter (FOLIO_LOG env var, default: "info").
    pub log: String,
}

impl Config {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `config_path` (default: ./folio.toml)
    ///   3. Built-in defaults
    pub fn new(
        cms_url: Option<String>,
        api_token: Option<String>,
        log: Option<String>,
        config_path: Option<PathBuf>,
    ) -> Self {
        let path = config_path.unwrap_or_else(|| PathBuf::from("folio.toml"));
        let toml = load_toml(&path).unwrap_or_default();

        let cms_url = cms_url
            .filter(|s| !s.is_empty())
            .or(toml.cms_url)
            .unwrap_or_else(|| DEFAULT_CMS_URL.to_string());

        let api_token = api_token.filter(|t| !t.is_empty()).or(toml.api_token);

        let cache_ttl = Duration::from_secs(toml.cache_ttl_secs.unwrap_or(DEFAULT_TTL_SECS));
        let request_timeout = toml.request_timeout_secs.map(Duration::from_secs);

        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        Self {
            cms_url,
            api_token,
            cache_ttl,
            request_timeout,
            log,
        }
    }

    /// Minimal config pointing at the given CMS base URL, defaults for
    /// everything else. Convenient for tests and embedding.
    pub fn for_url(cms_url: impl Into<String>) -> Self {
        Self {
            cms_url: cms_url.into(),
            api_token: None,
            cache_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            request_timeout: None,
            log: "info".to_string(),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_args() {
        let config = Config::new(None, None, None, Some(PathBuf::from("/nonexistent/folio.toml")));
        assert_eq!(config.cms_url, DEFAULT_CMS_URL);
        assert!(config.api_token.is_none());
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!(config.request_timeout.is_none());
        assert_eq!(config.log, "info");
    }

    #[test]
    fn toml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(
            &path,
            r#"
cms_url = "https://cms.example.com"
api_token = "secret"
cache_ttl_secs = 60
request_timeout_secs = 10
log = "debug"
"#,
        )
        .unwrap();

        let config = Config::new(None, None, None, Some(path));
        assert_eq!(config.cms_url, "https://cms.example.com");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.log, "debug");
    }

    #[test]
    fn cli_wins_over_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "cms_url = \"https://toml.example.com\"\n").unwrap();

        let config = Config::new(
            Some("https://cli.example.com".to_string()),
            None,
            None,
            Some(path),
        );
        assert_eq!(config.cms_url, "https://cli.example.com");
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let config = Config::new(
            None,
            Some(String::new()),
            None,
            Some(PathBuf::from("/nonexistent/folio.toml")),
        );
        assert!(config.api_token.is_none());
    }
}
