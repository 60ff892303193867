//! GitHub REST wire types for the issue and label endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issues and labels are requested 100 at a time, the API maximum.
pub const PER_PAGE: u32 = 100;

/// Default REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// API version header value.
pub const API_VERSION: &str = "2022-11-28";

/// An issue from `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubIssue {
    pub number: i64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// `open` or `closed`.
    pub state: String,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    #[serde(default)]
    pub assignees: Vec<GitHubUser>,
    pub updated_at: DateTime<Utc>,
    /// Present only when the "issue" is a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

/// A label, either standalone or embedded in an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubLabel {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// Response of issue creation; only the number is used.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    pub number: i64,
}

/// Body of `POST /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a str>,
    pub labels: &'a [String],
}

/// Body of `PATCH /repos/{owner}/{repo}/issues/{number}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateIssueRequest<'a> {
    pub title: &'a str,
    pub body: Option<&'a str>,
    pub labels: &'a [String],
    pub state: &'a str,
}

/// Body of `POST /repos/{owner}/{repo}/labels`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateLabelRequest<'a> {
    pub name: &'a str,
    pub color: &'a str,
}

/// Error document returned with 4xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<GitHubErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
}

impl GitHubErrorBody {
    /// Validation failure because the resource already exists.
    pub fn is_already_exists(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.code.as_deref() == Some("already_exists"))
    }
}
