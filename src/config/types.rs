use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Page-Audit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Page analysis behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Bound on fetching the analyzed page itself (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Bound on each individual link probe (seconds)
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,

    /// Maximum number of link probes in flight for one page
    #[serde(rename = "max-concurrent-probes")]
    pub max_concurrent_probes: u32,
}

impl AnalyzerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
            probe_timeout_secs: 5,
            max_concurrent_probes: 16,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Product name sent in the User-Agent header
    pub name: String,

    /// Product version sent in the User-Agent header
    pub version: String,

    /// URL with information about the analyzer
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!("{}/{} (+{})", self.name, self.version, self.contact_url)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "page-audit".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/page-audit/page-audit".to_string(),
        }
    }
}

/// Result store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "page-audit.db".to_string(),
        }
    }
}
