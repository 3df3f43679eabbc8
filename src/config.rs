use crate::engine::tags::DEFAULT_TAGS;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const ENV_FILE: &str = ".env";
pub const DEFAULT_CONFIG_FILE: &str = "autopost.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Simulated stage latencies and the optional RNG seed.
#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    #[serde(default = "default_fetch_delay")]
    pub fetch_delay_ms: u64,
    #[serde(default = "default_post_delay")]
    pub post_delay_ms: u64,
    #[serde(default = "default_record_delay")]
    pub record_delay_ms: u64,
    #[serde(default = "default_notify_delay")]
    pub notify_delay_ms: u64,
    #[serde(default = "default_validate_delay")]
    pub validate_delay_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_fetch_delay() -> u64 { 1000 }
fn default_post_delay() -> u64 { 2000 }
fn default_record_delay() -> u64 { 1000 }
fn default_notify_delay() -> u64 { 1000 }
fn default_validate_delay() -> u64 { 1000 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: default_fetch_delay(),
            post_delay_ms: default_post_delay(),
            record_delay_ms: default_record_delay(),
            notify_delay_ms: default_notify_delay(),
            validate_delay_ms: default_validate_delay(),
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Every stage completes without waiting.
    pub fn instant() -> Self {
        Self {
            fetch_delay_ms: 0,
            post_delay_ms: 0,
            record_delay_ms: 0,
            notify_delay_ms: 0,
            validate_delay_ms: 0,
            seed: None,
        }
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn post_delay(&self) -> Duration {
        Duration::from_millis(self.post_delay_ms)
    }

    pub fn record_delay(&self) -> Duration {
        Duration::from_millis(self.record_delay_ms)
    }

    pub fn notify_delay(&self) -> Duration {
        Duration::from_millis(self.notify_delay_ms)
    }

    pub fn validate_delay(&self) -> Duration {
        Duration::from_millis(self.validate_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Replaces the built-in tag list when set.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl CatalogConfig {
    pub fn tags(&self) -> Vec<String> {
        match &self.tags {
            Some(tags) => tags.clone(),
            None => DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Posting times shown on the dashboard. Nothing is scheduled from these.
#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    #[serde(default = "default_schedule_times")]
    pub times: Vec<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_schedule_times() -> Vec<String> {
    vec!["09:00".to_string(), "19:00".to_string()]
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            times: default_schedule_times(),
            timezone: default_timezone(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing `autopost.toml` yields the
    /// defaults. Any other path must exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        Self::load_optional(path, path == Path::new(DEFAULT_CONFIG_FILE))
    }

    fn load_optional(path: &Path, optional: bool) -> Result<Self> {
        if optional && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(tags) = &self.catalog.tags {
            if tags.is_empty() {
                anyhow::bail!("catalog.tags must not be empty");
            }
            if let Some(blank) = tags.iter().position(|t| t.trim().is_empty()) {
                anyhow::bail!("catalog.tags[{}] is blank", blank);
            }
        }
        for time in &self.schedule.times {
            chrono::NaiveTime::parse_from_str(time, "%H:%M")
                .with_context(|| format!("schedule time {:?} is not HH:MM", time))?;
        }
        Ok(())
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        Self::load_env_file_from(Path::new(ENV_FILE));
    }

    pub fn load_env_file_from(path: &Path) {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for line in content.lines() {
            if let Some((key, value)) = parse_env_line(line) {
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }
}

/// Parse one `KEY=VALUE` line; comments and blank lines yield `None`.
fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim().trim_matches('\r');
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"').trim_matches('\'');
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("autopost.toml")).unwrap();
        assert_eq!(config.pipeline.post_delay_ms, 2000);
        assert_eq!(config.schedule.times, vec!["09:00", "19:00"]);
        assert_eq!(config.schedule.timezone, "UTC");
        assert_eq!(config.catalog.tags().len(), DEFAULT_TAGS.len());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.pipeline.fetch_delay(), Duration::from_secs(1));
        assert_eq!(config.pipeline.validate_delay(), Duration::from_secs(1));
        assert!(config.pipeline.seed.is_none());
        assert_eq!(config.schedule.times.len(), 2);
    }

    #[test]
    fn test_partial_overrides() {
        let config = Config::parse(
            r#"
            [pipeline]
            post_delay_ms = 10
            seed = 99

            [catalog]
            tags = ["rust", "tokio"]
            "#,
        )
        .unwrap();
        assert_eq!(config.pipeline.post_delay_ms, 10);
        assert_eq!(config.pipeline.fetch_delay_ms, 1000);
        assert_eq!(config.pipeline.seed, Some(99));
        assert_eq!(config.catalog.tags(), vec!["rust", "tokio"]);
    }

    #[test]
    fn test_empty_tag_override_rejected() {
        let err = Config::parse("[catalog]\ntags = []\n").unwrap_err();
        assert!(format!("{:#}", err).contains("must not be empty"));
    }

    #[test]
    fn test_bad_schedule_time_rejected() {
        assert!(Config::parse("[schedule]\ntimes = [\"9am\"]\n").is_err());
    }

    #[test]
    fn test_missing_default_file_falls_back_to_defaults() {
        let config = Config::load_optional(Path::new("does-not-exist.toml"), true).unwrap();
        assert_eq!(config.pipeline.notify_delay_ms, 1000);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load_or_default(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("does-not-exist.toml"));
    }

    #[test]
    fn test_parse_env_line() {
        assert_eq!(parse_env_line("KEY=value"), Some(("KEY", "value")));
        assert_eq!(parse_env_line("  KEY = \"quoted\" \r"), Some(("KEY", "quoted")));
        assert_eq!(parse_env_line("export TOKEN='abc'"), Some(("TOKEN", "abc")));
        assert_eq!(parse_env_line("# comment"), None);
        assert_eq!(parse_env_line(""), None);
        assert_eq!(parse_env_line("=orphan"), None);
        assert_eq!(parse_env_line("no-separator"), None);
    }
}
