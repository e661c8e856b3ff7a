use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_ROSTER_PATH: &str = "/teacher/attendance/json";
pub const DEFAULT_SAVE_PATH: &str = "/teacher/attendance/save_batch";
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRF-TOKEN";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RollcallConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub attendance: AttendanceSection,
    #[serde(default)]
    pub csrf: CsrfSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_roster_path")]
    pub roster_path: String,
    #[serde(default = "default_save_path")]
    pub save_path: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Forwarded verbatim as the `Cookie` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct AttendanceSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CsrfSection {
    #[serde(default = "default_csrf_header")]
    pub header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            roster_path: default_roster_path(),
            save_path: default_save_path(),
            timeout_seconds: default_timeout_seconds(),
            session_cookie: None,
        }
    }
}

impl Default for CsrfSection {
    fn default() -> Self {
        Self {
            header: default_csrf_header(),
            token: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_roster_path() -> String {
    DEFAULT_ROSTER_PATH.to_string()
}

fn default_save_path() -> String {
    DEFAULT_SAVE_PATH.to_string()
}

fn default_csrf_header() -> String {
    DEFAULT_CSRF_HEADER.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl RollcallConfig {
    pub fn new(
        base_url: String,
        min_date: Option<NaiveDate>,
        timezone: Option<String>,
        csrf_header: Option<String>,
    ) -> Self {
        Self {
            server: ServerSection {
                base_url,
                ..ServerSection::default()
            },
            attendance: AttendanceSection { min_date },
            csrf: CsrfSection {
                header: csrf_header.unwrap_or_else(default_csrf_header),
                token: None,
            },
            ui: UiSection { timezone },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<RollcallConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &RollcallConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("rollcall"));
        }
    }
    Ok(home_dir()?.join(".config").join("rollcall"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
