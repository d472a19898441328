//! Provider detection: which API flavor is live at the configured base URL.

use crate::provider::api::GitProviderApi;
use crate::provider::github::GitHubApi;
use crate::provider::gitlab::GitLabApi;
use std::fmt;
use tracing::debug;

/// The git hosting platform behind a base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitProvider {
    GitLab,
    GitHub,
    Unknown,
}

impl fmt::Display for GitProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GitProvider::GitLab => "gitlab",
            GitProvider::GitHub => "github",
            GitProvider::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Probe `base_url` for a supported provider, GitLab first.
pub async fn detect(base_url: &str, access_token: &str) -> GitProvider {
    let gitlab = GitLabApi::new(base_url, access_token);
    let github = GitHubApi::new(base_url, access_token);
    detect_with(&gitlab, &github).await
}

/// Sequential, short-circuiting probe over two pre-built drivers.
///
/// The GitLab probe fully resolves before the GitHub probe begins, since a
/// success suppresses the second probe entirely. Probe failures (network,
/// auth, 404) mean "provider absent" and are never propagated.
pub async fn detect_with(
    gitlab: &dyn GitProviderApi,
    github: &dyn GitProviderApi,
) -> GitProvider {
    debug!("checking for a GitLab API");
    match gitlab.get_version().await {
        Ok(info) => {
            debug!(version = %info.version, "found a GitLab API");
            return GitProvider::GitLab;
        }
        Err(error) => debug!(%error, "no GitLab API"),
    }

    debug!("checking for a GitHub API");
    match github.get_version().await {
        Ok(info) => {
            debug!(version = %info.version, "found a GitHub API");
            return GitProvider::GitHub;
        }
        Err(error) => debug!(%error, "no GitHub API"),
    }

    GitProvider::Unknown
}
