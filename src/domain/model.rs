use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_org_domain};

/// Bearer token for the SCIM API. Never rendered in logs or output.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl FromStr for ApiToken {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Per-run credentials. Only constructible from non-empty values.
#[derive(Debug, Clone)]
pub struct Credentials {
    api_token: ApiToken,
    org_domain: String,
}

impl Credentials {
    pub fn new(api_token: ApiToken, org_domain: impl Into<String>) -> Result<Self> {
        let org_domain = org_domain.into();
        validate_non_empty_string("api_token", api_token.expose())?;
        validate_org_domain("org_domain", &org_domain)?;

        Ok(Self {
            api_token,
            org_domain,
        })
    }

    pub fn api_token(&self) -> &ApiToken {
        &self.api_token
    }

    pub fn org_domain(&self) -> &str {
        &self.org_domain
    }

    pub fn base_url(&self) -> String {
        format!("https://{}", self.org_domain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
}

impl UserRecord {
    pub fn new(user_id: impl AsRef<str>) -> Self {
        Self {
            user_id: user_id.as_ref().trim().to_string(),
        }
    }

    /// Why `user_id` cannot be the last segment of a user URL, if it can't.
    /// A blank, `.` or `..` segment would address the users collection.
    pub fn unusable_id_reason(user_id: &str) -> Option<&'static str> {
        match user_id.trim() {
            "" => Some("user_id is empty"),
            "." | ".." => Some("user_id is not a valid path segment"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub user_id: String,
    pub succeeded: bool,
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

impl DeletionOutcome {
    pub fn deleted(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            succeeded: true,
            status_code: None,
            error: None,
        }
    }

    /// The remote answered with a status other than 204.
    pub fn rejected(user_id: impl Into<String>, status_code: u16, body: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            succeeded: false,
            status_code: Some(status_code),
            error: Some(body.into()),
        }
    }

    /// No HTTP status was received.
    pub fn unreachable(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            succeeded: false,
            status_code: None,
            error: Some(message.into()),
        }
    }
}

/// One row of `failed_deletions.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRow {
    pub user_id: String,
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

impl From<&DeletionOutcome> for FailureRow {
    fn from(outcome: &DeletionOutcome) -> Self {
        Self {
            user_id: outcome.user_id.clone(),
            status_code: outcome.status_code,
            error: outcome.error.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<DeletionOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn from_outcomes(
        outcomes: Vec<DeletionOutcome>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let total = outcomes.len();
        let failures: Vec<DeletionOutcome> = outcomes.into_iter().filter(|o| !o.succeeded).collect();

        Self {
            total,
            succeeded: total - failures.len(),
            failures,
            started_at,
            finished_at,
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn success_message(&self) -> String {
        format!(
            "Successfully deleted {} out of {} users",
            self.succeeded, self.total
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Emitted before the request for `user_id` is sent.
    Processing {
        user_id: String,
        position: usize,
        total: usize,
    },
    /// Emitted after a record has an outcome.
    Completed { processed: usize, total: usize },
}

impl ProgressEvent {
    pub fn fraction(&self) -> f64 {
        match self {
            Self::Processing { .. } => 0.0,
            Self::Completed { processed, total } if *total > 0 => *processed as f64 / *total as f64,
            Self::Completed { .. } => 1.0,
        }
    }

    pub fn status_line(&self) -> String {
        match self {
            Self::Processing { user_id, .. } => format!("Processing user ID: {}", user_id),
            Self::Completed { processed, total } => format!("Processed {}/{}", processed, total),
        }
    }
}
