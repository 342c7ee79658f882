use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

const CONFIG_FILE: &str = "config.toml";
const STATE_FILE: &str = "state.json";
const APP_DIR: &str = "weatherbuddy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// The process must not start with this setting.
    Fatal,
    /// Logged at startup, otherwise ignored.
    Advisory,
}

#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub level: IssueLevel,
    pub key: &'static str,
    pub detail: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.key, self.detail)
    }
}

/// Everything `Config::check` found wrong, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ConfigReport {
    pub issues: Vec<ConfigIssue>,
}

impl ConfigReport {
    fn push(&mut self, level: IssueLevel, key: &'static str, detail: impl Into<String>) {
        self.issues.push(ConfigIssue {
            level,
            key,
            detail: detail.into(),
        });
    }

    fn fatal(&mut self, key: &'static str, detail: impl Into<String>) {
        self.push(IssueLevel::Fatal, key, detail);
    }

    fn advise(&mut self, key: &'static str, detail: impl Into<String>) {
        self.push(IssueLevel::Advisory, key, detail);
    }

    pub fn fatal_issues(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.level == IssueLevel::Fatal)
    }

    pub fn advisories(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.level == IssueLevel::Advisory)
    }

    pub fn is_usable(&self) -> bool {
        self.fatal_issues().next().is_none()
    }

    /// Fatal issues joined for a single error line.
    pub fn fatal_summary(&self) -> String {
        self.fatal_issues()
            .map(ConfigIssue::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `config.toml` and the persisted client state
    pub config_dir: PathBuf,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// weatherapi.com key. `WEATHER_API_KEY` takes precedence when set.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Where the client reaches the location gateway
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// Cities shown in the daily temperature table, in display order
    #[serde(default = "default_table_cities")]
    pub table_cities: Vec<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_weather_base_url() -> String {
    "https://api.weatherapi.com".to_string()
}

fn default_gateway_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_forecast_days() -> u8 {
    3
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_table_cities() -> Vec<String> {
    [
        "Mumbai", "New Delhi", "Bengaluru", "Kolkata", "Chennai",
        "Hyderabad", "Pune", "Ahmedabad", "Jaipur", "Lucknow",
        "Surat", "Kanpur", "Nagpur", "Indore", "Thane",
        "Bhopal", "Visakhapatnam", "Patna", "Vadodara", "Ghaziabad",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_base_url(),
            gateway_url: default_gateway_url(),
            forecast_days: default_forecast_days(),
            table_cities: default_table_cities(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// City returned for loopback callers and whenever geolocation fails
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Base URL of an ipinfo.io-compatible lookup service
    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Use the first `X-Forwarded-For` entry as the client address.
    /// Enable only behind a reverse proxy that sets the header.
    #[serde(default = "default_trust_forwarded_for")]
    pub trust_forwarded_for: bool,

    /// Built web client, served at `/` when set
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_city() -> String {
    "New York".to_string()
}

fn default_geolocation_url() -> String {
    "https://ipinfo.io".to_string()
}

fn default_trust_forwarded_for() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            default_city: default_city(),
            geolocation_url: default_geolocation_url(),
            request_timeout_secs: default_request_timeout_secs(),
            trust_forwarded_for: default_trust_forwarded_for(),
            static_dir: None,
        }
    }
}

impl GatewayConfig {
    /// `bind_address:port`, ready for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: app_dir().unwrap_or_else(|| PathBuf::from(".").join(APP_DIR)),
            weather: WeatherConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

fn app_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

impl Config {
    /// Load `<config dir>/weatherbuddy/config.toml`, creating it if missing.
    pub fn load() -> Result<Self> {
        let dir = app_dir().context("No platform config directory")?;
        Self::load_from(&dir.join(CONFIG_FILE))
    }

    /// Load from `path`, writing defaults there first if it doesn't exist.
    /// A non-empty `WEATHER_API_KEY` replaces the stored key in memory only.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            config
        };

        if let Some(key) = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()) {
            config.weather.api_key = key;
        }

        Ok(config)
    }

    /// `load` followed by `check`. Fatal issues abort; advisories are logged.
    pub fn load_checked() -> Result<(Self, ConfigReport)> {
        let config = Self::load()?;
        let report = config.check();

        if !report.is_usable() {
            anyhow::bail!("Unusable configuration: {}", report.fatal_summary());
        }
        for issue in report.advisories() {
            tracing::warn!("Config: {}", issue);
        }

        Ok((config, report))
    }

    pub fn check(&self) -> ConfigReport {
        let mut report = ConfigReport::default();

        check_http_url(&mut report, "weather.base_url", &self.weather.base_url);
        check_http_url(&mut report, "weather.gateway_url", &self.weather.gateway_url);
        check_http_url(
            &mut report,
            "gateway.geolocation_url",
            &self.gateway.geolocation_url,
        );

        let weather = &self.weather;
        if weather.api_key.trim().is_empty() {
            report.advise(
                "weather.api_key",
                format!("empty; weather calls will be rejected (set {})", API_KEY_ENV),
            );
        }
        if !(1..=14).contains(&weather.forecast_days) {
            report.fatal("weather.forecast_days", "must be within 1..=14");
        }
        if weather.table_cities.is_empty() {
            report.advise("weather.table_cities", "empty; the city table will be blank");
        }
        if weather.request_timeout_secs == 0 {
            report.fatal("weather.request_timeout_secs", "must be at least 1");
        }

        let gateway = &self.gateway;
        if gateway.port == 0 {
            report.fatal("gateway.port", "must not be 0");
        }
        if gateway.default_city.trim().is_empty() {
            report.fatal("gateway.default_city", "must not be blank");
        }
        if gateway.request_timeout_secs == 0 {
            report.fatal("gateway.request_timeout_secs", "must be at least 1");
        }
        if let Some(dir) = gateway.static_dir.as_deref().filter(|d| !d.is_dir()) {
            report.advise(
                "gateway.static_dir",
                format!("{} is not a directory; static files disabled", dir.display()),
            );
        }

        report
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Where the client persists last city and the daily table
    pub fn state_path(&self) -> PathBuf {
        self.config_dir.join(STATE_FILE)
    }
}

fn check_http_url(report: &mut ConfigReport, key: &'static str, raw: &str) {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            report.fatal(key, format!("not a URL ({})", e));
            return;
        }
    };

    if !matches!(url.scheme(), "http" | "https") {
        report.fatal(key, format!("scheme must be http or https, got {}", url.scheme()));
    }
    if url.host().is_none() {
        report.fatal(key, "missing host");
    }
    if url.port() == Some(0) {
        report.fatal(key, "port must not be 0");
    }
}
