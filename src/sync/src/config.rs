//! Configuration for a sync run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Default workbook file name, resolved next to the executable
pub const DEFAULT_FILE_NAME: &str = "ssq_history.xlsx";

/// Remote source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Lottery type passed as `name`
    #[serde(default = "default_lottery")]
    pub lottery: String,
    #[serde(default = "default_system_type")]
    pub system_type: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_min_delay_secs")]
    pub min_delay_secs: f64,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: f64,
    /// Page visited once before paginating so the session carries cookies
    #[serde(default = "default_warmup_url")]
    pub warmup_url: Option<String>,
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
}

fn default_endpoint() -> String {
    "https://www.cwl.gov.cn/cwl_admin/front/cwlkj/search/kjxx/findDrawNotice".to_string()
}

fn default_lottery() -> String {
    "ssq".to_string()
}

fn default_system_type() -> String {
    "PC".to_string()
}

fn default_page_size() -> u32 {
    30
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_min_delay_secs() -> f64 {
    1.0
}

fn default_max_delay_secs() -> f64 {
    2.0
}

fn default_warmup_url() -> Option<String> {
    Some(HISTORY_PAGE.to_string())
}

const HISTORY_PAGE: &str = "https://www.cwl.gov.cn/ygkj/wqkjgg/ssq/";

fn default_headers() -> BTreeMap<String, String> {
    [
        (
            "user-agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ),
        ("accept", "application/json, text/javascript, */*; q=0.01"),
        ("accept-language", "zh-CN,zh;q=0.9,en;q=0.8"),
        ("referer", HISTORY_PAGE),
        ("x-requested-with", "XMLHttpRequest"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            lottery: default_lottery(),
            system_type: default_system_type(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            min_delay_secs: default_min_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
            warmup_url: default_warmup_url(),
            headers: default_headers(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Workbook output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Workbook path; `None` means next to the executable
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

fn default_sheet_name() -> String {
    "双色球历史数据".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            sheet_name: default_sheet_name(),
        }
    }
}

impl OutputConfig {
    /// Resolve the workbook path
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.path {
            return Ok(PathBuf::from(path));
        }

        let exe = std::env::current_exe()?;
        let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(dir.join(DEFAULT_FILE_NAME))
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional `ssq` config file and
    /// the environment (SSQ_SOURCE__PAGE_SIZE, SSQ_OUTPUT__PATH, etc.)
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("ssq").required(false))
            .add_source(
                config::Environment::with_prefix("SSQ")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
