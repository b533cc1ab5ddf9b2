use crate::range::RangeId;
use crate::view::ElementLayout;
use std::{env, str::FromStr, time::Duration};

#[derive(Debug, thiserror::Error)]
#[error("invalid {key}={value}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// What the controller does when a refresh fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Leave the page untouched.
    Silent,
    /// Leave the figures untouched and show the reason in the status node.
    Status,
}

impl FromStr for FailureMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(FailureMode::Silent),
            "status" => Ok(FailureMode::Status),
            other => Err(format!("unknown failure mode '{other}'")),
        }
    }
}

/// Presentation switches the controller applies to every refresh.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub layout: ElementLayout,
    pub fill_chart: bool,
    pub show_percent: bool,
    pub failure_mode: FailureMode,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            layout: ElementLayout::PerTab,
            fill_chart: true,
            show_percent: true,
            failure_mode: FailureMode::Status,
            chart_width: 600,
            chart_height: 260,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub timescale_path: String,
    pub upstream_cookie: Option<String>,
    pub upstream_timeout: Duration,
    pub default_range: RangeId,
    pub display: DisplayConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = DisplayConfig::default();
        let display = DisplayConfig {
            layout: parse_or(&lookup, "ELEMENT_LAYOUT", defaults.layout)?,
            fill_chart: parse_or(&lookup, "CHART_FILL", defaults.fill_chart)?,
            show_percent: parse_or(&lookup, "SHOW_PERCENT", defaults.show_percent)?,
            failure_mode: parse_or(&lookup, "FAILURE_MODE", defaults.failure_mode)?,
            chart_width: parse_or(&lookup, "CHART_WIDTH", defaults.chart_width)?,
            chart_height: parse_or(&lookup, "CHART_HEIGHT", defaults.chart_height)?,
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", 8080)?,
            upstream_url: lookup("UPSTREAM_URL")
                .unwrap_or_else(|| "http://127.0.0.1:5000".to_string()),
            timescale_path: lookup("TIMESCALE_PATH").unwrap_or_else(|| "/timescale".to_string()),
            upstream_cookie: lookup("UPSTREAM_COOKIE").filter(|cookie| !cookie.is_empty()),
            upstream_timeout: Duration::from_secs(parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 10)?),
            default_range: parse_or(&lookup, "DEFAULT_RANGE", RangeId::OneDay)?,
            display,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError {
            key,
            value,
            reason: err.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.upstream_url, "http://127.0.0.1:5000");
        assert_eq!(config.timescale_path, "/timescale");
        assert_eq!(config.upstream_cookie, None);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.default_range, RangeId::OneDay);
        assert_eq!(config.display.layout, ElementLayout::PerTab);
        assert!(config.display.fill_chart);
        assert!(config.display.show_percent);
        assert_eq!(config.display.failure_mode, FailureMode::Status);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("TIMESCALE_PATH", "/get_data"),
            ("DEFAULT_RANGE", "ytd"),
            ("ELEMENT_LAYOUT", "shared"),
            ("CHART_FILL", "false"),
            ("SHOW_PERCENT", "false"),
            ("FAILURE_MODE", "silent"),
            ("UPSTREAM_COOKIE", "session=abc"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.timescale_path, "/get_data");
        assert_eq!(config.default_range, RangeId::YearToDate);
        assert_eq!(config.display.layout, ElementLayout::Shared);
        assert!(!config.display.fill_chart);
        assert!(!config.display.show_percent);
        assert_eq!(config.display.failure_mode, FailureMode::Silent);
        assert_eq!(config.upstream_cookie.as_deref(), Some("session=abc"));
    }

    #[test]
    fn rejects_invalid_values() {
        let err = config(&[("DEFAULT_RANGE", "2W")]).unwrap_err();
        assert_eq!(err.key, "DEFAULT_RANGE");
        assert_eq!(err.value, "2W");

        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.key, "PORT");
    }
}
