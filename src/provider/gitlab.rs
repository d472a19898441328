//! GitLab-flavored driver: the v4 REST API, `PRIVATE-TOKEN` auth, and the
//! native multi-file commit endpoint (the commit request is submitted
//! verbatim).

use crate::provider::api::{
    ApiError, ApiResult, CommitRequest, CommitResult, GitProviderApi, ProjectInfo, VersionInfo,
};
use crate::provider::USER_AGENT;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

pub struct GitLabApi {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl GitLabApi {
    pub fn new(base_url: &str, token: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        GitLabApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        }
    }

    fn project_url(&self, project: &str) -> String {
        format!(
            "{}/api/v4/projects/{}",
            self.base_url,
            urlencoding::encode(project)
        )
    }

    /// Repository files endpoint. The file path is a single URL-encoded path
    /// parameter; `ref` is omitted entirely when no branch is given so the
    /// server resolves its default.
    fn file_url(&self, project: &str, path: &str, branch: Option<&str>, raw: bool) -> String {
        let mut url = format!(
            "{}/repository/files/{}",
            self.project_url(project),
            urlencoding::encode(path.trim_start_matches('/'))
        );
        if raw {
            url.push_str("/raw");
        }
        if let Some(branch) = branch {
            url.push_str("?ref=");
            url.push_str(&urlencoding::encode(branch));
        }
        url
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header("PRIVATE-TOKEN", &self.token)
    }

    async fn send_checked(
        &self,
        builder: reqwest::RequestBuilder,
        url: &str,
    ) -> ApiResult<reqwest::Response> {
        let response = self
            .authed(builder)
            .send()
            .await
            .map_err(|source| ApiError::Request {
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
}

#[async_trait]
impl GitProviderApi for GitLabApi {
    async fn get_version(&self) -> ApiResult<VersionInfo> {
        let url = format!("{}/api/v4/version", self.base_url);
        let response = self.send_checked(self.client.get(&url), &url).await?;
        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }

    async fn file_exists(
        &self,
        project: &str,
        path: &str,
        branch: Option<&str>,
    ) -> ApiResult<bool> {
        let url = self.file_url(project, path, branch, false);
        let response = self
            .authed(self.client.head(&url))
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
        let url = self.file_url(project, path, branch, true);
        let response = self.send_checked(self.client.get(&url), &url).await?;
        response
            .text()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }

    async fn get_project(&self, project: &str) -> ApiResult<ProjectInfo> {
        let url = self.project_url(project);
        let response = self.send_checked(self.client.get(&url), &url).await?;
        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }

    async fn post_commit(&self, project: &str, request: &CommitRequest) -> ApiResult<CommitResult> {
        let url = format!("{}/repository/commits", self.project_url(project));
        debug!(url = %url, branch = %request.branch, "posting commit");
        let response = self
            .send_checked(self.client.post(&url).json(request), &url)
            .await?;
        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }
}
