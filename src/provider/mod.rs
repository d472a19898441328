pub mod api;
pub mod detect;
pub mod github;
pub mod gitlab;

pub use api::{
    ApiError, ApiResult, CommitAction, CommitRequest, CommitResult, Encoding, FileAction,
    GitProviderApi, ProjectInfo, VersionInfo,
};
pub use detect::{detect, detect_with, GitProvider};
pub use github::GitHubApi;
pub use gitlab::GitLabApi;

/// User agent sent by both drivers.
pub(crate) const USER_AGENT: &str = concat!("gitops-patcher/", env!("CARGO_PKG_VERSION"));
