//! Client configuration.
//!
//! `Config` is an explicit value handed to `Payant::new`; nothing reads the
//! environment behind the caller's back. `Config::from_env` is a convenience
//! for binaries that keep their keys in `PAYANT_*` variables.

use std::str::FromStr;

use crate::error::ApiError;

pub const LIVE_BASE_URL: &str = "https://api.payant.ng";
pub const DEMO_BASE_URL: &str = "https://api.demo.payant.ng";

/// Which Payant environment requests go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Live,
    #[default]
    Demo,
}

impl Mode {
    pub fn base_url(self) -> &'static str {
        match self {
            Mode::Live => LIVE_BASE_URL,
            Mode::Demo => DEMO_BASE_URL,
        }
    }
}

/// Only the exact string `LIVE` selects production; anything else is demo.
impl FromStr for Mode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "LIVE" { Mode::Live } else { Mode::Demo })
    }
}

#[derive(Clone)]
pub struct Config {
    /// Carried for completeness; no request uses it.
    pub public_key: Option<String>,
    pub private_key: String,
    pub mode: Mode,
    /// Replaces the mode's base URL, e.g. to target a local mock server.
    pub base_url_override: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("mode", &self.mode)
            .field("base_url_override", &self.base_url_override)
            .finish()
    }
}

impl Config {
    pub fn new(private_key: impl Into<String>, mode: Mode) -> Self {
        Self {
            public_key: None,
            private_key: private_key.into(),
            mode,
            base_url_override: None,
        }
    }

    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Effective API root, without a trailing slash.
    pub fn base_url(&self) -> String {
        self.base_url_override
            .as_deref()
            .unwrap_or_else(|| self.mode.base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Load from `PAYANT_PUBLIC_KEY`, `PAYANT_PRIVATE_KEY`, `PAYANT_MODE`
    /// and `PAYANT_BASE_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let private_key = non_empty("PAYANT_PRIVATE_KEY").ok_or_else(|| {
            ApiError::Config("PAYANT_PRIVATE_KEY environment variable required".to_string())
        })?;

        let mode = non_empty("PAYANT_MODE")
            .map(|m| m.parse::<Mode>().unwrap_or_default())
            .unwrap_or_default();

        let base_url_override = match non_empty("PAYANT_BASE_URL") {
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                return Err(ApiError::Config(
                    "PAYANT_BASE_URL must start with http:// or https://".to_string(),
                ));
            }
            other => other,
        };

        Ok(Self {
            public_key: non_empty("PAYANT_PUBLIC_KEY"),
            private_key,
            mode,
            base_url_override,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn live_mode_selects_production() {
        assert_eq!("LIVE".parse::<Mode>().unwrap(), Mode::Live);
        assert_eq!(Mode::Live.base_url(), "https://api.payant.ng");
    }

    #[test]
    fn anything_else_selects_demo() {
        for raw in ["live", "TEST", "", "demo"] {
            assert_eq!(raw.parse::<Mode>().unwrap(), Mode::Demo, "{raw}");
        }
        assert_eq!(Mode::default().base_url(), "https://api.demo.payant.ng");
    }

    #[test]
    fn from_lookup_reads_all_keys() {
        let config = Config::from_lookup(lookup(&[
            ("PAYANT_PUBLIC_KEY", "pub"),
            ("PAYANT_PRIVATE_KEY", "priv"),
            ("PAYANT_MODE", "LIVE"),
        ]))
        .unwrap();
        assert_eq!(config.public_key.as_deref(), Some("pub"));
        assert_eq!(config.private_key, "priv");
        assert_eq!(config.base_url(), LIVE_BASE_URL);
    }

    #[test]
    fn absent_mode_defaults_to_demo() {
        let config = Config::from_lookup(lookup(&[("PAYANT_PRIVATE_KEY", "priv")])).unwrap();
        assert_eq!(config.mode, Mode::Demo);
        assert!(config.public_key.is_none());
    }

    #[test]
    fn private_key_is_required() {
        let err = Config::from_lookup(lookup(&[("PAYANT_PRIVATE_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn base_url_override_must_be_http() {
        let err = Config::from_lookup(lookup(&[
            ("PAYANT_PRIVATE_KEY", "priv"),
            ("PAYANT_BASE_URL", "localhost:3000"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn override_wins_and_trailing_slash_is_stripped() {
        let config = Config::new("priv", Mode::Live).with_base_url("http://127.0.0.1:3000/");
        assert_eq!(config.base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn debug_output_hides_private_key() {
        let config = Config::new("sk_secret", Mode::Demo);
        assert!(!format!("{config:?}").contains("sk_secret"));
    }
}
