//! GitHub-flavored driver.
//!
//! GitHub has no multi-file commit endpoint, so a commit request is
//! translated into one contents-API call per file action: updates and
//! deletes first look up the current blob `sha`, text content is
//! base64-encoded for transfer. Auth is a bearer token; the API base is
//! `api.github.com` for github.com and `<base>/api/v3` for GitHub
//! Enterprise installations.

use crate::provider::api::{
    ApiError, ApiResult, CommitAction, CommitRequest, CommitResult, Encoding, FileAction,
    GitProviderApi, ProjectInfo, VersionInfo,
};
use crate::provider::USER_AGENT;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_RAW: &str = "application/vnd.github.raw";

pub struct GitHubApi {
    api_base: String,
    token: String,
    client: reqwest::Client,
}

/// Derive the REST API base from the configured web base URL.
fn api_base_for(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let host = host.split('/').next().unwrap_or(host);
    if host == "github.com" || host == "www.github.com" || host == "api.github.com" {
        "https://api.github.com".to_string()
    } else {
        format!("{trimmed}/api/v3")
    }
}

/// Percent-encode a repository path, keeping `/` as the segment separator.
fn encode_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Deserialize)]
struct MetaResponse {
    installed_version: Option<String>,
}

#[derive(Deserialize)]
struct BlobInfo {
    sha: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    commit: BlobInfo,
}

impl GitHubApi {
    pub fn new(base_url: &str, token: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        GitHubApi {
            api_base: api_base_for(base_url),
            token: token.to_string(),
            client,
        }
    }

    fn repo_url(&self, project: &str) -> String {
        format!("{}/repos/{}", self.api_base, project)
    }

    fn contents_url(&self, project: &str, path: &str, branch: Option<&str>) -> String {
        let mut url = format!("{}/contents/{}", self.repo_url(project), encode_path(path));
        if let Some(branch) = branch {
            url.push_str("?ref=");
            url.push_str(&urlencoding::encode(branch));
        }
        url
    }

    fn authed(&self, builder: reqwest::RequestBuilder, accept: &str) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, accept)
    }

    async fn send_checked(
        &self,
        builder: reqwest::RequestBuilder,
        url: &str,
    ) -> ApiResult<reqwest::Response> {
        let response = builder.send().await.map_err(|source| ApiError::Request {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }

    /// Current blob sha of a file, required by the contents API for updates
    /// and deletes.
    async fn blob_sha(&self, project: &str, path: &str, branch: Option<&str>) -> ApiResult<String> {
        let url = self.contents_url(project, path, branch);
        let response = self
            .send_checked(self.authed(self.client.get(&url), ACCEPT_JSON), &url)
            .await?;
        let info: BlobInfo = response
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })?;
        Ok(info.sha)
    }

    async fn apply_action(
        &self,
        project: &str,
        request: &CommitRequest,
        action: &CommitAction,
    ) -> ApiResult<CommitResult> {
        let url = self.contents_url(project, &action.file_path, None);
        debug!(url = %url, branch = %request.branch, "applying commit action");

        let body = match action.action {
            FileAction::Create => json!({
                "message": request.commit_message,
                "branch": request.branch,
                "content": encode_content(action),
            }),
            FileAction::Update => {
                let sha = self
                    .blob_sha(project, &action.file_path, Some(&request.branch))
                    .await?;
                json!({
                    "message": request.commit_message,
                    "branch": request.branch,
                    "content": encode_content(action),
                    "sha": sha,
                })
            }
            FileAction::Delete => {
                let sha = self
                    .blob_sha(project, &action.file_path, Some(&request.branch))
                    .await?;
                json!({
                    "message": request.commit_message,
                    "branch": request.branch,
                    "sha": sha,
                })
            }
        };

        let builder = match action.action {
            FileAction::Delete => self.client.delete(&url),
            _ => self.client.put(&url),
        };
        let response = self
            .send_checked(self.authed(builder.json(&body), ACCEPT_JSON), &url)
            .await?;
        let contents: ContentsResponse = response
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })?;
        Ok(CommitResult {
            id: contents.commit.sha,
        })
    }
}

#[async_trait]
impl GitProviderApi for GitHubApi {
    async fn get_version(&self) -> ApiResult<VersionInfo> {
        let url = format!("{}/meta", self.api_base);
        let response = self
            .send_checked(self.authed(self.client.get(&url), ACCEPT_JSON), &url)
            .await?;
        let meta: MetaResponse = response
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })?;
        Ok(VersionInfo {
            version: meta
                .installed_version
                .unwrap_or_else(|| "github.com".to_string()),
            revision: None,
        })
    }

    async fn file_exists(
        &self,
        project: &str,
        path: &str,
        branch: Option<&str>,
    ) -> ApiResult<bool> {
        let url = self.contents_url(project, path, branch);
        let response = self
            .authed(self.client.get(&url), ACCEPT_JSON)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(ApiError::Status { url, status })
        }
    }

    async fn get_raw_file(
        &self,
        project: &str,
        path: &str,
        branch: Option<&str>,
    ) -> ApiResult<String> {
        let url = self.contents_url(project, path, branch);
        let response = self
            .send_checked(self.authed(self.client.get(&url), ACCEPT_RAW), &url)
            .await?;
        response
            .text()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }

    async fn get_project(&self, project: &str) -> ApiResult<ProjectInfo> {
        let url = self.repo_url(project);
        let response = self
            .send_checked(self.authed(self.client.get(&url), ACCEPT_JSON), &url)
            .await?;
        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }

    async fn post_commit(&self, project: &str, request: &CommitRequest) -> ApiResult<CommitResult> {
        let mut result = None;
        for action in &request.actions {
            result = Some(self.apply_action(project, request, action).await?);
        }
        result.ok_or(ApiError::EmptyCommit)
    }
}

/// Base64-encode text content for transfer; already-encoded content passes
/// through.
fn encode_content(action: &CommitAction) -> String {
    match action.encoding {
        Encoding::Text => STANDARD.encode(action.content.as_bytes()),
        Encoding::Base64 => action.content.clone(),
    }
}
