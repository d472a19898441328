//! End-to-end patch pipeline tests against an in-memory fake driver.
//!
//! The fake satisfies the `GitProviderApi` contract without any network
//! traffic: files live in a `HashMap`, submitted commits are recorded for
//! inspection.

use async_trait::async_trait;
use gitops_patcher::provider::{detect_with, ApiResult};
use gitops_patcher::{
    patch_with_driver, ApiError, CommitRequest, CommitResult, GitProvider, GitProviderApi,
    PatchError, PatchOptions, PatchOutcome, ProjectInfo, VersionInfo,
};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

struct FakeApi {
    files: Mutex<HashMap<String, String>>,
    commits: Mutex<Vec<(String, CommitRequest)>>,
    project_calls: AtomicUsize,
    default_branch: String,
    live: bool,
}

impl FakeApi {
    fn new() -> Self {
        FakeApi {
            files: Mutex::new(HashMap::new()),
            commits: Mutex::new(Vec::new()),
            project_calls: AtomicUsize::new(0),
            default_branch: "main".to_string(),
            live: true,
        }
    }

    fn unreachable() -> Self {
        let mut fake = Self::new();
        fake.live = false;
        fake
    }

    fn with_default_branch(mut self, branch: &str) -> Self {
        self.default_branch = branch.to_string();
        self
    }

    fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        self
    }

    fn commits(&self) -> Vec<(String, CommitRequest)> {
        self.commits.lock().unwrap().clone()
    }

    fn project_calls(&self) -> usize {
        self.project_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitProviderApi for FakeApi {
    async fn get_version(&self) -> ApiResult<VersionInfo> {
        if self.live {
            Ok(VersionInfo {
                version: "17.0.0-fake".to_string(),
                revision: None,
            })
        } else {
            Err(ApiError::Status {
                url: "https://fake.test/api/v4/version".to_string(),
                status: StatusCode::NOT_FOUND,
            })
        }
    }

    async fn file_exists(
        &self,
        _project: &str,
        path: &str,
        _branch: Option<&str>,
    ) -> ApiResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    async fn get_raw_file(
        &self,
        _project: &str,
        path: &str,
        _branch: Option<&str>,
    ) -> ApiResult<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                url: format!("https://fake.test{path}"),
                status: StatusCode::NOT_FOUND,
            })
    }

    async fn get_project(&self, _project: &str) -> ApiResult<ProjectInfo> {
        self.project_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProjectInfo {
            default_branch: self.default_branch.clone(),
        })
    }

    async fn post_commit(&self, project: &str, request: &CommitRequest) -> ApiResult<CommitResult> {
        self.commits
            .lock()
            .unwrap()
            .push((project.to_string(), request.clone()));
        Ok(CommitResult {
            id: "fake-commit-sha".to_string(),
        })
    }
}

fn options() -> PatchOptions {
    PatchOptions {
        url: "https://git.example.com".to_string(),
        access_token: "token".to_string(),
        repo: "/org/deployments/".to_string(),
        branch: Some("main".to_string()),
        applications_dir: "applications".to_string(),
        values_file: "values.yaml".to_string(),
        application: "foo".to_string(),
        patch_field: ".image.tag".to_string(),
        patch_value: "v2".to_string(),
        message: None,
        behalf: None,
        dry_run: false,
    }
}

fn field(content: &str, path: &[&str]) -> serde_yaml::Value {
    let mut value: serde_yaml::Value = serde_yaml::from_str(content).unwrap();
    for segment in path {
        value = value[*segment].clone();
    }
    value
}

#[tokio::test]
async fn patches_a_dot_path_field_and_commits() {
    let fake = FakeApi::new().with_file(
        "/applications/foo/values.yaml",
        "image:\n  tag: v1\n  repo: x\n",
    );

    let outcome = patch_with_driver(&options(), &fake).await.unwrap();

    let commits = fake.commits();
    assert_eq!(commits.len(), 1);
    let (project, request) = &commits[0];
    assert_eq!(project, "org/deployments");
    assert_eq!(request.branch, "main");
    assert_eq!(
        request.commit_message,
        "Patched '/applications/foo/values.yaml'"
    );
    assert_eq!(request.actions.len(), 1);
    assert_eq!(request.actions[0].file_path, "/applications/foo/values.yaml");
    assert_eq!(request.actions[0].content, "image:\n  tag: v2\n  repo: x\n");

    match outcome {
        PatchOutcome::Committed {
            file_path, branch, ..
        } => {
            assert_eq!(file_path, "/applications/foo/values.yaml");
            assert_eq!(branch, "main");
        }
        other => panic!("expected a commit, got {other:?}"),
    }
}

#[tokio::test]
async fn bare_field_name_patches_every_occurrence() {
    let fake = FakeApi::new().with_file(
        "/applications/foo/values.yaml",
        "a:\n  tag: '1'\nb:\n  tag: '1'\n",
    );
    let mut opts = options();
    opts.patch_field = "tag".to_string();
    opts.patch_value = "2".to_string();

    patch_with_driver(&opts, &fake).await.unwrap();

    let commits = fake.commits();
    assert_eq!(commits.len(), 1);
    let content = &commits[0].1.actions[0].content;
    assert_eq!(field(content, &["a", "tag"]), field(content, &["b", "tag"]));
    assert_eq!(field(content, &["a", "tag"]), serde_yaml::Value::from(2));
}

#[tokio::test]
async fn dot_path_specifier_is_used_verbatim() {
    let fake = FakeApi::new().with_file(
        "/applications/foo/values.yaml",
        "image:\n  tag: v1\na:\n  tag: v1\n",
    );

    patch_with_driver(&options(), &fake).await.unwrap();

    let content = &fake.commits()[0].1.actions[0].content;
    assert_eq!(field(content, &["image", "tag"]), "v2");
    assert_eq!(field(content, &["a", "tag"]), "v1");
}

#[tokio::test]
async fn no_commit_when_values_already_match() {
    let fake = FakeApi::new().with_file("/applications/foo/values.yaml", "image:\n  tag: v2\n");

    let outcome = patch_with_driver(&options(), &fake).await.unwrap();

    assert!(matches!(outcome, PatchOutcome::Unchanged { .. }));
    assert!(fake.commits().is_empty());
}

#[tokio::test]
async fn falls_back_to_the_opposite_extension() {
    let fake = FakeApi::new().with_file("/applications/foo/values.yml", "image:\n  tag: v1\n");

    let outcome = patch_with_driver(&options(), &fake).await.unwrap();

    match outcome {
        PatchOutcome::Committed { file_path, .. } => {
            assert_eq!(file_path, "/applications/foo/values.yml");
        }
        other => panic!("expected a commit, got {other:?}"),
    }
    assert_eq!(
        fake.commits()[0].1.actions[0].file_path,
        "/applications/foo/values.yml"
    );
}

#[tokio::test]
async fn missing_file_after_both_extensions_fails() {
    let fake = FakeApi::new();

    let err = patch_with_driver(&options(), &fake).await.unwrap_err();

    match err {
        PatchError::FileNotFound { path } => {
            assert_eq!(path, "/applications/foo/values.yml");
        }
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_field_fails_naming_path_and_file() {
    let fake = FakeApi::new().with_file("/applications/foo/values.yaml", "image:\n  tag: v1\n");
    let mut opts = options();
    opts.patch_field = ".image.digest".to_string();

    let err = patch_with_driver(&opts, &fake).await.unwrap_err();

    match err {
        PatchError::FieldNotFound { path, file } => {
            assert_eq!(path, ".image.digest");
            assert_eq!(file, "/applications/foo/values.yaml");
        }
        other => panic!("expected FieldNotFound, got {other:?}"),
    }
    assert!(fake.commits().is_empty());
}

#[tokio::test]
async fn bare_name_with_no_occurrences_reports_no_changes() {
    let fake = FakeApi::new().with_file("/applications/foo/values.yaml", "image:\n  tag: v1\n");
    let mut opts = options();
    opts.patch_field = "replicas".to_string();

    let outcome = patch_with_driver(&opts, &fake).await.unwrap();

    assert!(matches!(outcome, PatchOutcome::Unchanged { .. }));
    assert!(fake.commits().is_empty());
}

#[tokio::test]
async fn present_but_null_field_is_patchable() {
    let fake = FakeApi::new().with_file("/applications/foo/values.yaml", "image:\n  tag: null\n");

    patch_with_driver(&options(), &fake).await.unwrap();

    let content = &fake.commits()[0].1.actions[0].content;
    assert_eq!(field(content, &["image", "tag"]), "v2");
}

#[tokio::test]
async fn wrong_values_file_suffix_fails_fast() {
    let fake = FakeApi::new();
    let mut opts = options();
    opts.values_file = "values.json".to_string();

    let err = patch_with_driver(&opts, &fake).await.unwrap_err();

    assert!(matches!(err, PatchError::InvalidValuesFile { .. }));
}

#[tokio::test]
async fn api_check_failure_is_fatal() {
    let fake = FakeApi::unreachable();

    let err = patch_with_driver(&options(), &fake).await.unwrap_err();

    assert!(matches!(err, PatchError::ApiCheckFailed { .. }));
}

#[tokio::test]
async fn explicit_branch_skips_default_resolution() {
    let fake = FakeApi::new()
        .with_default_branch("trunk")
        .with_file("/applications/foo/values.yaml", "image:\n  tag: v1\n");
    let mut opts = options();
    opts.branch = Some("release".to_string());

    patch_with_driver(&opts, &fake).await.unwrap();

    assert_eq!(fake.project_calls(), 0);
    assert_eq!(fake.commits()[0].1.branch, "release");
}

#[tokio::test]
async fn unset_branch_uses_the_provider_default() {
    let fake = FakeApi::new()
        .with_default_branch("trunk")
        .with_file("/applications/foo/values.yaml", "image:\n  tag: v1\n");
    let mut opts = options();
    opts.branch = None;

    patch_with_driver(&opts, &fake).await.unwrap();

    assert_eq!(fake.project_calls(), 1);
    assert_eq!(fake.commits()[0].1.branch, "trunk");
}

#[tokio::test]
async fn behalf_prefixes_the_commit_message() {
    let fake = FakeApi::new().with_file("/applications/foo/values.yaml", "image:\n  tag: v1\n");
    let mut opts = options();
    opts.behalf = Some("deploy-bot".to_string());

    patch_with_driver(&opts, &fake).await.unwrap();

    assert_eq!(
        fake.commits()[0].1.commit_message,
        "[deploy-bot] Patched '/applications/foo/values.yaml'"
    );
}

#[tokio::test]
async fn dry_run_computes_the_patch_but_does_not_commit() {
    let fake = FakeApi::new().with_file("/applications/foo/values.yaml", "image:\n  tag: v1\n");
    let mut opts = options();
    opts.dry_run = true;

    let outcome = patch_with_driver(&opts, &fake).await.unwrap();

    match outcome {
        PatchOutcome::DryRun {
            original, patched, ..
        } => {
            assert!(original.contains("v1"));
            assert!(patched.contains("v2"));
        }
        other => panic!("expected a dry run, got {other:?}"),
    }
    assert!(fake.commits().is_empty());
}

#[tokio::test]
async fn detection_falls_through_to_github() {
    let gitlab = FakeApi::unreachable();
    let github = FakeApi::new();

    assert_eq!(detect_with(&gitlab, &github).await, GitProvider::GitHub);
}

#[tokio::test]
async fn detection_prefers_gitlab() {
    let gitlab = FakeApi::new();
    let github = FakeApi::new();

    assert_eq!(detect_with(&gitlab, &github).await, GitProvider::GitLab);
}

#[tokio::test]
async fn detection_reports_unknown_when_both_probes_fail() {
    let gitlab = FakeApi::unreachable();
    let github = FakeApi::unreachable();

    assert_eq!(detect_with(&gitlab, &github).await, GitProvider::Unknown);
}
