use crate::modules::error::ConsoleError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9000/api";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const MIN_HTTP_TIMEOUT_SECS: u64 = 5;
const MAX_HTTP_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub base_url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    pub http_timeout: Duration,
}

impl ConsoleConfig {
    pub fn new(base_url: &str) -> Result<Self, ConsoleError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            username: None,
            password: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }

    /// Reads `GRAYLOG_URL`, `GRAYLOG_USERNAME`, `GRAYLOG_PASSWORD` and
    /// `GRAYLOG_HTTP_TIMEOUT_SECS`. Unset values fall back to defaults.
    pub fn from_env() -> Result<Self, ConsoleError> {
        Self::from_lookup(None, non_empty_env)
    }

    /// Like [`ConsoleConfig::from_env`], but `base_url` wins over
    /// `GRAYLOG_URL`, which is then not read at all.
    pub fn from_env_with_base_url(base_url: &str) -> Result<Self, ConsoleError> {
        Self::from_lookup(Some(base_url), non_empty_env)
    }

    fn from_lookup(
        base_url: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConsoleError> {
        let mut config = match base_url {
            Some(url) => Self::new(url)?,
            None => Self::new(
                lookup("GRAYLOG_URL")
                    .as_deref()
                    .unwrap_or(DEFAULT_BASE_URL),
            )?,
        };
        config.username = lookup("GRAYLOG_USERNAME");
        config.password = lookup("GRAYLOG_PASSWORD");
        config.http_timeout = timeout_from_env(lookup("GRAYLOG_HTTP_TIMEOUT_SECS").as_deref());
        Ok(config)
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout = clamp_timeout(secs);
        self
    }

    /// Basic-auth pair, present only when a username is configured.
    pub fn credentials(&self) -> Option<(String, String)> {
        let user = self.username.clone()?;
        Some((user, self.password.clone().unwrap_or_default()))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn parse_base_url(raw: &str) -> Result<Url, ConsoleError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConsoleError::Config(format!("base url {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConsoleError::Config(format!(
            "base url {raw:?}: unsupported scheme {:?}",
            url.scheme()
        )));
    }
    Ok(url)
}

fn timeout_from_env(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    clamp_timeout(secs)
}

fn clamp_timeout(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(MIN_HTTP_TIMEOUT_SECS, MAX_HTTP_TIMEOUT_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_and_non_http_urls() {
        assert!(matches!(parse_base_url("graylog/api"), Err(ConsoleError::Config(_))));
        assert!(matches!(parse_base_url("ftp://graylog/api"), Err(ConsoleError::Config(_))));
        assert!(parse_base_url(" https://graylog.example.org/api ").is_ok());
    }

    #[test]
    fn timeout_is_clamped() {
        assert_eq!(timeout_from_env(None), Duration::from_secs(30));
        assert_eq!(timeout_from_env(Some("abc")), Duration::from_secs(30));
        assert_eq!(timeout_from_env(Some("1")), Duration::from_secs(5));
        assert_eq!(timeout_from_env(Some("9000")), Duration::from_secs(300));
        assert_eq!(timeout_from_env(Some(" 45 ")), Duration::from_secs(45));
    }

    fn fake_env(key: &str) -> Option<String> {
        match key {
            "GRAYLOG_URL" => Some("not a url".to_string()),
            "GRAYLOG_USERNAME" => Some("admin".to_string()),
            "GRAYLOG_PASSWORD" => Some("secret".to_string()),
            "GRAYLOG_HTTP_TIMEOUT_SECS" => Some("60".to_string()),
            _ => None,
        }
    }

    #[test]
    fn explicit_base_url_skips_env_url() {
        let config =
            ConsoleConfig::from_lookup(Some("https://graylog.example.org/api"), fake_env).unwrap();
        assert_eq!(config.base_url.as_str(), "https://graylog.example.org/api");
        assert_eq!(
            config.credentials(),
            Some(("admin".to_string(), "secret".to_string()))
        );
        assert_eq!(config.http_timeout, Duration::from_secs(60));

        assert!(matches!(
            ConsoleConfig::from_lookup(None, fake_env),
            Err(ConsoleError::Config(_))
        ));
    }

    #[test]
    fn credentials_need_a_username() {
        let config = ConsoleConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.credentials(), None);

        let config = config.with_credentials("token-abc", "token");
        assert_eq!(
            config.credentials(),
            Some(("token-abc".to_string(), "token".to_string()))
        );
    }
}
