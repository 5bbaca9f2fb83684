use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DbConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

fn default_api_host() -> String {
    "0.0.0.0".into()
}

fn default_api_port() -> u16 {
    8080
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

/// Limits applied to every ranged query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Widest inclusive date range a single request may ask for.
    #[serde(default = "default_max_span_days")]
    pub max_span_days: u32,
    /// Budget for loading, attributing and rolling up one request.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_max_span_days() -> u32 {
    366
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_span_days: default_max_span_days(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl QueryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, anyhow::Error> {
        let expanded = expand_env_placeholders(raw)?;
        let mut cfg: Self = serde_yaml::from_str(&expanded)?;

        // DATABASE_URL wins over whatever the YAML had
        if let Ok(url) = std::env::var("DATABASE_URL") {
            cfg.database.url = url;
        }

        if cfg.query.max_span_days == 0 {
            anyhow::bail!("query.max_span_days must be at least 1");
        }

        Ok(cfg)
    }
}

/// Expand $(VAR) and ${VAR} placeholders using environment variables.
fn expand_env_placeholders(input: &str) -> Result<String, anyhow::Error> {
    use anyhow::Context;

    let mut out = String::with_capacity(input.len());
    let mut it = input.chars().peekable();

    while let Some(c) = it.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let close = match it.peek().copied() {
            Some('$') => {
                it.next();
                out.push('$');
                continue;
            }
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                continue;
            }
        };

        it.next();
        let var = read_until(&mut it, close)
            .with_context(|| format!("unterminated env placeholder: missing '{}'", close))?;
        let val = std::env::var(&var)
            .with_context(|| format!("missing environment variable: {}", var))?;
        out.push_str(&val);
    }

    Ok(out)
}

fn read_until<I>(it: &mut std::iter::Peekable<I>, end: char) -> Option<String>
where
    I: Iterator<Item = char>,
{
    let mut buf = String::new();
    for ch in it.by_ref() {
        if ch == end {
            return Some(buf);
        }
        buf.push(ch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_braces_and_parens() {
        std::env::set_var("WATTWISE_TEST_HOST", "db.local");
        let out = expand_env_placeholders("a=${WATTWISE_TEST_HOST} b=$(WATTWISE_TEST_HOST)").unwrap();
        assert_eq!(out, "a=db.local b=db.local");
    }

    #[test]
    fn test_expand_escaped_dollar() {
        let out = expand_env_placeholders("price: $$5 and $x").unwrap();
        assert_eq!(out, "price: $5 and $x");
    }

    #[test]
    fn test_expand_unterminated_fails() {
        assert!(expand_env_placeholders("url: ${NEVER_CLOSED").is_err());
    }

    #[test]
    fn test_expand_missing_var_fails() {
        assert!(expand_env_placeholders("url: ${WATTWISE_SURELY_UNSET_VAR}").is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let cfg: Config = serde_yaml::from_str("database:\n  url: postgres://x\n").unwrap();
        assert_eq!(cfg.api.port, 8080);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.query.max_span_days, 366);
        assert_eq!(cfg.query.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_span_rejected() {
        let yaml = "database:\n  url: postgres://x\nquery:\n  max_span_days: 0\n";
        assert!(Config::from_yaml(yaml).is_err());
    }
}
