use std::env;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CRUMB_TTL_SECS: u64 = 3_600;
const DEFAULT_USER_AGENT: &str = concat!("stockbrief/", env!("CARGO_PKG_VERSION"));

/// Transport and authentication settings for the market data provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Pre-obtained session cookie; skips the cookie handshake when set.
    pub cookie: Option<String>,
    pub crumb_ttl_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: String::from(DEFAULT_USER_AGENT),
            cookie: None,
            crumb_ttl_secs: DEFAULT_CRUMB_TTL_SECS,
        }
    }
}

impl ProviderConfig {
    /// Reads `STOCKBRIEF_TIMEOUT_MS`, `STOCKBRIEF_USER_AGENT`,
    /// `STOCKBRIEF_CRUMB_TTL_SECS` and `YAHOO_COOKIE`, falling back to
    /// defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            timeout_ms: non_empty("STOCKBRIEF_TIMEOUT_MS")
                .and_then(|value| value.trim().parse().ok())
                .filter(|value| *value > 0)
                .unwrap_or(defaults.timeout_ms),
            user_agent: non_empty("STOCKBRIEF_USER_AGENT").unwrap_or(defaults.user_agent),
            cookie: non_empty("YAHOO_COOKIE"),
            crumb_ttl_secs: non_empty("STOCKBRIEF_CRUMB_TTL_SECS")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(defaults.crumb_ttl_secs),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = ProviderConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ProviderConfig::default());
        assert!(config.user_agent.starts_with("stockbrief/"));
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let config = ProviderConfig::from_lookup(lookup_from(&[
            ("STOCKBRIEF_TIMEOUT_MS", "2500"),
            ("STOCKBRIEF_CRUMB_TTL_SECS", "soon"),
            ("YAHOO_COOKIE", "A3=session"),
            ("STOCKBRIEF_USER_AGENT", "  "),
        ]));

        assert_eq!(config.timeout_ms, 2_500);
        assert_eq!(config.crumb_ttl_secs, DEFAULT_CRUMB_TTL_SECS);
        assert_eq!(config.cookie.as_deref(), Some("A3=session"));
        assert!(config.user_agent.starts_with("stockbrief/"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ProviderConfig::from_lookup(lookup_from(&[("STOCKBRIEF_TIMEOUT_MS", "0")]));
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
