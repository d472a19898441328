//! The capability interface every git hosting provider driver implements.
//!
//! The patch pipeline talks to the remote repository exclusively through
//! [`GitProviderApi`]; after driver selection it never branches on provider
//! identity again. Wire types follow the GitLab multi-file commit convention;
//! the GitHub driver translates on its side of the trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for provider API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("commit request has no file actions")]
    EmptyCommit,
}

/// Version information reported by the provider's liveness endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub revision: Option<String>,
}

/// The subset of project metadata the pipeline consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    pub default_branch: String,
}

/// Identifier of the commit created by [`GitProviderApi::post_commit`].
#[derive(Debug, Clone, Deserialize)]
pub struct CommitResult {
    pub id: String,
}

/// File-level operation within a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Create,
    Update,
    Delete,
}

/// Content transfer encoding for a commit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Text,
    Base64,
}

/// One file change submitted as part of a commit.
#[derive(Debug, Clone, Serialize)]
pub struct CommitAction {
    pub action: FileAction,
    pub file_path: String,
    pub content: String,
    pub encoding: Encoding,
}

/// An atomic commit request: target branch, message, and file actions.
#[derive(Debug, Clone, Serialize)]
pub struct CommitRequest {
    pub branch: String,
    pub commit_message: String,
    pub actions: Vec<CommitAction>,
}

/// Uniform capability set over a git hosting provider's REST API.
///
/// `branch: None` omits the ref parameter and lets the provider resolve its
/// default branch. Implementations are stateless beyond connection reuse and
/// safe to share across calls.
#[async_trait]
pub trait GitProviderApi: Send + Sync {
    /// Probe the API and report its version. An error means the API is not
    /// reachable with the configured base URL and token.
    async fn get_version(&self) -> ApiResult<VersionInfo>;

    /// Whether `path` exists in `project` on the given branch.
    async fn file_exists(&self, project: &str, path: &str, branch: Option<&str>)
        -> ApiResult<bool>;

    /// Fetch the raw text content of `path`.
    async fn get_raw_file(
        &self,
        project: &str,
        path: &str,
        branch: Option<&str>,
    ) -> ApiResult<String>;

    /// Fetch project metadata (notably the default branch).
    async fn get_project(&self, project: &str) -> ApiResult<ProjectInfo>;

    /// Submit a commit and return its identifier.
    async fn post_commit(&self, project: &str, request: &CommitRequest) -> ApiResult<CommitResult>;
}
