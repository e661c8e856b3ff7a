//! HTTP transport for the attendance server.

use std::time::Duration;

use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use rollcall_core::api::classify_error_response;
use rollcall_core::{
    AttendanceApi, Result, RollcallError, SaveRequest, SaveResponse, StudentRecord,
};

/// Connection settings resolved from config, flags and environment.
pub struct HttpSettings {
    pub base_url: String,
    pub roster_path: String,
    pub save_path: String,
    pub timeout: Duration,
    pub csrf_header: String,
    pub csrf_token: Option<SecretString>,
    /// Sent verbatim as the `Cookie` header.
    pub session_cookie: Option<SecretString>,
    /// Used when a `date_too_early` answer carries no usable `minDate`.
    pub fallback_min_date: NaiveDate,
}

/// Blocking [`AttendanceApi`] over ureq.
pub struct HttpAttendanceApi {
    agent: ureq::Agent,
    settings: HttpSettings,
}

impl HttpAttendanceApi {
    pub fn new(settings: HttpSettings) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(settings.timeout).build();
        Self { agent, settings }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    fn roster_url(&self) -> String {
        endpoint(&self.settings.base_url, &self.settings.roster_path)
    }

    fn save_url(&self) -> String {
        endpoint(&self.settings.base_url, &self.settings.save_path)
    }

    fn with_session(&self, request: ureq::Request) -> ureq::Request {
        let request = request.set("Accept", "application/json");
        match &self.settings.session_cookie {
            Some(cookie) => request.set("Cookie", cookie.expose_secret()),
            None => request,
        }
    }

    fn map_error(&self, err: ureq::Error) -> RollcallError {
        match err {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                let err = classify_error_response(status, &body, self.settings.fallback_min_date);
                warn!(status, error = %err, "attendance server returned an error");
                err
            }
            ureq::Error::Transport(transport) => RollcallError::Transport(transport.to_string()),
        }
    }
}

impl AttendanceApi for HttpAttendanceApi {
    fn fetch_roster(&self, date: NaiveDate) -> Result<Vec<StudentRecord>> {
        let url = self.roster_url();
        debug!(%url, %date, "GET roster");
        let response = self
            .with_session(self.agent.get(&url))
            .query("date", &date.format("%Y-%m-%d").to_string())
            .call()
            .map_err(|e| self.map_error(e))?;
        decode_body(response)
    }

    fn save_batch(&mut self, request: &SaveRequest) -> Result<SaveResponse> {
        let url = self.save_url();
        debug!(%url, date = %request.date, items = request.items.len(), "POST attendance batch");
        let mut http_request = self
            .with_session(self.agent.post(&url))
            .set("Content-Type", "application/json");
        if let Some(token) = &self.settings.csrf_token {
            http_request = http_request.set(&self.settings.csrf_header, token.expose_secret());
        }
        let body = serde_json::to_string(request)?;
        let response = http_request
            .send_string(&body)
            .map_err(|e| self.map_error(e))?;
        decode_body(response)
    }
}

fn decode_body<T: DeserializeOwned>(response: ureq::Response) -> Result<T> {
    let body = response
        .into_string()
        .map_err(|e| RollcallError::Transport(e.to_string()))?;
    Ok(serde_json::from_str(&body)?)
}

/// Join a base URL and an endpoint path with exactly one slash.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
