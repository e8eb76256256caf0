//! Authenticated HTTP client for the node's control API.
//!
//! The node uses cookie sessions: `POST /sessions` with email/password sets a
//! `clsession` cookie that every other request must carry. The session is
//! cached with its expiry and refreshed lazily.

use chrono::{DateTime, Duration, Utc};
use reqwest::header::{COOKIE, SET_COOKIE};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::{Config, Credentials};
use crate::error::CliError;

/// Name of the node's session cookie.
const SESSION_COOKIE: &str = "clsession";

/// Job specification envelope submitted to the node.
#[derive(Debug, Clone, Serialize)]
pub struct JobSpec {
    pub initiators: Vec<Initiator>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Initiator {
    #[serde(rename = "type")]
    pub kind: String,
    pub params: InitiatorParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitiatorParams {
    pub name: String,
    pub body: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    #[serde(rename = "type")]
    pub kind: String,
}

impl JobSpec {
    /// Wrap raw test params in the generic "external initiator + no-op task"
    /// envelope.
    pub fn external(initiator_name: &str, body: Value) -> Self {
        Self {
            initiators: vec![Initiator {
                kind: "external".to_string(),
                params: InitiatorParams {
                    name: initiator_name.to_string(),
                    body,
                },
            }],
            tasks: vec![Task {
                kind: "noop".to_string(),
            }],
        }
    }
}

/// External initiator registration request.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalInitiatorSpec {
    pub name: String,
    pub url: String,
}

/// JSON:API-style response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl<T> ApiResponse<T> {
    /// Resource count from the response meta; absence counts as 0.
    pub fn count(&self) -> u64 {
        self.meta.as_ref().and_then(|m| m.count).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub count: Option<u64>,
}

/// A single resource record (job spec, job run, initiator).
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub attributes: Value,
}

impl ResourceData {
    /// String attribute by key; empty when absent or not a string.
    pub fn attribute(&self, key: &str) -> &str {
        self.attributes.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Status of a run record; empty when absent.
    pub fn status(&self) -> &str {
        self.attribute("status")
    }
}

/// A cached authentication session.
#[derive(Debug, Clone)]
struct Session {
    cookie: String,
    expires_at: DateTime<Utc>,
}

impl Session {
    fn header_value(&self) -> String {
        format!("{SESSION_COOKIE}={}", self.cookie)
    }

    fn expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Client for the node's control API.
#[derive(Debug)]
pub struct ChainlinkNode {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    session: Mutex<Option<Session>>,
}

impl ChainlinkNode {
    /// Create a client from config. No request is made until the first call.
    pub fn new(config: &Config) -> Result<Self, CliError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(CliError::Network)?;

        Ok(Self {
            http,
            base_url: config.chainlink_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
            session: Mutex::new(None),
        })
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submit a job specification. Returns the server-assigned record.
    pub async fn create_job(&self, spec: &JobSpec) -> Result<ApiResponse<ResourceData>, CliError> {
        self.post_authenticated("/v2/specs", spec).await
    }

    /// Register an external initiator on the node.
    pub async fn create_external_initiator(
        &self,
        spec: &ExternalInitiatorSpec,
    ) -> Result<ApiResponse<ResourceData>, CliError> {
        self.post_authenticated("/v2/external_initiators", spec).await
    }

    /// List job specs; `meta.count` carries the total job count.
    pub async fn get_jobs(&self) -> Result<ApiResponse<Vec<ResourceData>>, CliError> {
        self.get_authenticated("/v2/specs", &[]).await
    }

    /// List runs for a job, oldest first; `meta.count` carries the run count.
    pub async fn get_job_runs(
        &self,
        job_id: &str,
    ) -> Result<ApiResponse<Vec<ResourceData>>, CliError> {
        self.get_authenticated("/v2/runs", &[("jobSpecId", job_id)])
            .await
    }

    /// Open a session and extract the `clsession` cookie.
    async fn authenticate(&self) -> Result<Session, CliError> {
        debug!(url = %self.url("/sessions"), "authenticating session");

        let response = self
            .http
            .post(self.url("/sessions"))
            .json(&serde_json::json!({
                "email": self.credentials.email,
                "password": self.credentials.password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CliError::AuthFailed);
        }

        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(parse_session_cookie)
            .ok_or(CliError::AuthFailed)
    }

    /// Cookie header for the current session, re-authenticating when the
    /// cached session is missing or expired.
    async fn session_header(&self) -> Result<String, CliError> {
        let mut guard = self.session.lock().await;

        if let Some(session) = guard.as_ref() {
            if !session.expired() {
                return Ok(session.header_value());
            }
        }

        let session = self.authenticate().await?;
        let header = session.header_value();
        *guard = Some(session);
        Ok(header)
    }

    /// Make an authenticated GET request.
    async fn get_authenticated<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CliError> {
        let cookie = self.session_header().await?;
        debug!(path, "GET");

        let response = self
            .http
            .get(self.url(path))
            .header(COOKIE, cookie)
            .query(query)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST request.
    async fn post_authenticated<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CliError> {
        let cookie = self.session_header().await?;
        debug!(path, "POST");

        let response = self
            .http
            .post(self.url(path))
            .header(COOKIE, cookie)
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle a successful or error response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CliError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| CliError::Other(anyhow::anyhow!("failed to parse response: {}", e)))
        } else {
            let message = response
                .json::<ApiErrors>()
                .await
                .map(|e| e.message())
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(CliError::api(status.as_u16(), message))
        }
    }
}

/// Error body shape reported by the node.
#[derive(Debug, Deserialize)]
struct ApiErrors {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    detail: String,
}

impl ApiErrors {
    fn message(&self) -> String {
        if self.errors.is_empty() {
            "unknown error".to_string()
        } else {
            self.errors
                .iter()
                .map(|e| e.detail.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        }
    }
}

/// Parse one `Set-Cookie` header into a session, if it is the session cookie.
///
/// `Max-Age` wins over `Expires`; with neither, assume the session lasts a
/// day.
fn parse_session_cookie(header: &str) -> Option<Session> {
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.trim().split_once('=')?;
    if name != SESSION_COOKIE {
        return None;
    }

    let mut max_age: Option<i64> = None;
    let mut expires: Option<DateTime<Utc>> = None;
    for attr in parts {
        let Some((key, val)) = attr.trim().split_once('=') else {
            continue;
        };
        match key.to_ascii_lowercase().as_str() {
            "max-age" => max_age = val.trim().parse().ok(),
            "expires" => {
                expires = DateTime::parse_from_rfc2822(val.trim())
                    .ok()
                    .map(|at| at.with_timezone(&Utc));
            }
            _ => {}
        }
    }

    let expires_at = match (max_age, expires) {
        (Some(secs), _) => Utc::now() + Duration::seconds(secs),
        (None, Some(at)) => at,
        (None, None) => Utc::now() + Duration::days(1),
    };

    Some(Session {
        cookie: value.to_string(),
        expires_at,
    })
}
