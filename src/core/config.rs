use std::time::Duration;

use super::pagination::PagingMode;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "repo-finder";

const API_BASE_KEY: &str = "REPO_FINDER_API_BASE";
const USER_AGENT_KEY: &str = "REPO_FINDER_USER_AGENT";
const TIMEOUT_SECS_KEY: &str = "REPO_FINDER_TIMEOUT_SECS";
const FLASH_MS_KEY: &str = "REPO_FINDER_FLASH_MS";
const PAGING_KEY: &str = "REPO_FINDER_PAGING";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;
const DEFAULT_FLASH_MS: u64 = 1000;
const MAX_FLASH_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq)]
pub struct FinderConfig {
    pub api_base: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub flash: Duration,
    pub paging: PagingMode,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            flash: Duration::from_millis(DEFAULT_FLASH_MS),
            paging: PagingMode::Server,
        }
    }
}

impl FinderConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset, blank or unparsable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base = non_blank(lookup(API_BASE_KEY))
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);
        let user_agent = non_blank(lookup(USER_AGENT_KEY)).unwrap_or(defaults.user_agent);

        let timeout_secs = parse_u64(lookup(TIMEOUT_SECS_KEY))
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, MAX_TIMEOUT_SECS);
        let flash_ms = parse_u64(lookup(FLASH_MS_KEY))
            .unwrap_or(DEFAULT_FLASH_MS)
            .clamp(1, MAX_FLASH_MS);

        let paging = match lookup(PAGING_KEY) {
            Some(raw) => PagingMode::parse(&raw).unwrap_or_else(|| {
                log::warn!("[config] unknown {}={:?}; using server paging", PAGING_KEY, raw);
                defaults.paging
            }),
            None => defaults.paging,
        };

        Self {
            api_base,
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
            flash: Duration::from_millis(flash_ms),
            paging,
        }
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    let v = raw?.trim().to_string();
    if v.is_empty() {
        None
    } else {
        Some(v)
    }
}

fn parse_u64(raw: Option<String>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_env_gives_defaults() {
        let cfg = FinderConfig::from_lookup(|_| None);
        assert_eq!(cfg, FinderConfig::default());
        assert_eq!(cfg.flash, Duration::from_millis(1000));
    }

    #[test]
    fn reads_and_normalizes_values() {
        let cfg = FinderConfig::from_lookup(lookup_from(&[
            ("REPO_FINDER_API_BASE", " http://localhost:9000/ "),
            ("REPO_FINDER_USER_AGENT", "tester"),
            ("REPO_FINDER_TIMEOUT_SECS", "5"),
            ("REPO_FINDER_FLASH_MS", "250"),
            ("REPO_FINDER_PAGING", "client"),
        ]));
        assert_eq!(cfg.api_base, "http://localhost:9000");
        assert_eq!(cfg.user_agent, "tester");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.flash, Duration::from_millis(250));
        assert_eq!(cfg.paging, PagingMode::Client);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = FinderConfig::from_lookup(lookup_from(&[
            ("REPO_FINDER_TIMEOUT_SECS", "0"),
            ("REPO_FINDER_FLASH_MS", "999999"),
        ]));
        assert_eq!(cfg.timeout, Duration::from_secs(1));
        assert_eq!(cfg.flash, Duration::from_millis(60_000));
    }

    #[test]
    fn garbage_falls_back() {
        let cfg = FinderConfig::from_lookup(lookup_from(&[
            ("REPO_FINDER_API_BASE", "   "),
            ("REPO_FINDER_TIMEOUT_SECS", "soon"),
            ("REPO_FINDER_PAGING", "sideways"),
        ]));
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.paging, PagingMode::Server);
    }
}
