//! GitOps Patcher: patch fields in remote values files through the GitHub or
//! GitLab REST API.
//!
//! # Architecture
//!
//! The whole operation is one sequential pipeline behind a single entry
//! point, [`patch`]: detect which provider answers at the configured base
//! URL, resolve the values file under the conventional
//! `/<applications_dir>/<application>/` layout (falling back between the
//! `.yml` and `.yaml` extensions), fetch and parse the document, resolve the
//! requested field (a `.`-prefixed dot-path is used verbatim, a bare name
//! expands to every occurrence), write the new value, and submit the result
//! as a single-file commit. When every matched field already holds the
//! requested value, no commit is made.
//!
//! All repository access goes through the [`GitProviderApi`] capability
//! trait; the two driver flavors are selected once, at detection, and never
//! branched on again. No local state is written: everything lives in the
//! remote repository and one in-memory YAML document per invocation.
//!
//! # Example
//!
//! ```no_run
//! use gitops_patcher::{patch, PatchOptions};
//!
//! # async fn run() -> Result<(), gitops_patcher::PatchError> {
//! let options = PatchOptions {
//!     url: "https://gitlab.com".to_string(),
//!     access_token: "glpat-...".to_string(),
//!     repo: "org/deployments".to_string(),
//!     branch: None,
//!     applications_dir: "applications".to_string(),
//!     values_file: "values.yaml".to_string(),
//!     application: "frontend".to_string(),
//!     patch_field: ".image.tag".to_string(),
//!     patch_value: "v2".to_string(),
//!     message: None,
//!     behalf: None,
//!     dry_run: false,
//! };
//!
//! let outcome = patch(&options).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod patch;
pub mod provider;
pub mod resolver;
pub mod telemetry;
pub mod yaml;

// Re-exports
pub use patch::{patch, patch_with_driver, PatchError, PatchOptions, PatchOutcome};
pub use provider::{
    ApiError, CommitAction, CommitRequest, CommitResult, Encoding, FileAction, GitHubApi,
    GitLabApi, GitProvider, GitProviderApi, ProjectInfo, VersionInfo,
};
pub use yaml::{FieldPath, YamlError};
