//! Application context for the Rollcall CLI.
//!
//! Combines CLI arguments with the lazily-loaded config file.

use std::time::Duration;

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use once_cell::unsync::OnceCell;
use secrecy::SecretString;

use rollcall_core::{default_min_date, DashboardSettings};

use crate::cli::Cli;
use crate::config::RollcallConfig;
use crate::constants::CSRF_TOKEN_ENV;
use crate::errors::CliError;
use crate::helpers::parse_date;
use crate::http::{HttpAttendanceApi, HttpSettings};
use crate::ui::UiContext;

use super::resolver::load_config;

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<RollcallConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&RollcallConfig> {
        self.config.get_or_try_init(|| load_config(self.cli))
    }

    /// Create a UI context for rendering output.
    pub fn ui_context(&self, json: bool, format: Option<&str>) -> UiContext {
        UiContext::from_env(json, format, self.cli.no_color, self.cli.ascii)
    }

    /// Server base URL, `--server` over config.
    pub fn base_url(&self) -> anyhow::Result<String> {
        if let Some(server) = self.cli.server.as_deref() {
            if !server.trim().is_empty() {
                return Ok(server.trim().to_string());
            }
        }
        Ok(self.config()?.server.base_url.clone())
    }

    pub fn settings(&self) -> anyhow::Result<DashboardSettings> {
        let min_date = self
            .config()?
            .attendance
            .min_date
            .unwrap_or_else(default_min_date);
        Ok(DashboardSettings { min_date })
    }

    /// Build the HTTP attendance client from config and environment.
    pub fn api(&self) -> anyhow::Result<HttpAttendanceApi> {
        let config = self.config()?;
        let csrf_token = std::env::var(CSRF_TOKEN_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| config.csrf.token.clone())
            .map(SecretString::from);
        let session_cookie = config.server.session_cookie.clone().map(SecretString::from);

        let settings = HttpSettings {
            base_url: self.base_url()?,
            roster_path: config.server.roster_path.clone(),
            save_path: config.server.save_path.clone(),
            timeout: Duration::from_secs(config.server.timeout_seconds),
            csrf_header: config.csrf.header.clone(),
            csrf_token,
            session_cookie,
            fallback_min_date: self.settings()?.min_date,
        };
        Ok(HttpAttendanceApi::new(settings))
    }

    /// Today's date in the configured timezone, else the local one.
    pub fn today(&self) -> anyhow::Result<NaiveDate> {
        match self.config()?.ui.timezone.as_deref() {
            Some(name) => {
                let tz: Tz = name.parse().map_err(|_| {
                    CliError::invalid_input(format!("Unknown timezone in config: {}", name))
                })?;
                Ok(Utc::now().with_timezone(&tz).date_naive())
            }
            None => Ok(Local::now().date_naive()),
        }
    }

    /// Resolve the date a command should open with.
    ///
    /// An explicit date is returned as given so the dashboard can clamp it
    /// and report the clamp. The default (today) is clamped silently.
    pub fn resolve_date(&self, explicit: Option<&str>) -> anyhow::Result<NaiveDate> {
        match explicit {
            Some(value) => parse_date(value),
            None => {
                let today = self.today()?;
                Ok(today.max(self.settings()?.min_date))
            }
        }
    }
}
