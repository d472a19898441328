//! The patch pipeline: one sequential pass from provider detection to commit
//! submission. Every step either succeeds or aborts the invocation; there
//! are no retries and no partial application.

use crate::patch::errors::PatchError;
use crate::patch::options::PatchOptions;
use crate::provider::{
    detect, CommitAction, CommitRequest, Encoding, FileAction, GitHubApi, GitLabApi, GitProvider,
    GitProviderApi,
};
use crate::resolver;
use crate::yaml::{self, FieldPath};
use tracing::{debug, info};

/// How a successful invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// A commit carrying the patched document was submitted.
    Committed {
        file_path: String,
        branch: String,
        commit_id: String,
        original: String,
        patched: String,
    },
    /// Every candidate field already held the requested value; nothing was
    /// committed.
    Unchanged { file_path: String },
    /// Dry run: the patch was computed and is reported, but not committed.
    DryRun {
        file_path: String,
        original: String,
        patched: String,
    },
}

/// Patch one field (or every occurrence of a field name) in an application's
/// values file and commit the change through the hosting provider's API.
///
/// Detects the provider behind `options.url`, then runs the pipeline against
/// the matching driver. See [`patch_with_driver`] for the pipeline itself.
pub async fn patch(options: &PatchOptions) -> Result<PatchOutcome, PatchError> {
    options.validate()?;

    let provider = detect(&options.url, &options.access_token).await;
    info!(provider = %provider, url = %options.url, "detected git provider");

    let driver: Box<dyn GitProviderApi> = match provider {
        GitProvider::GitLab => Box::new(GitLabApi::new(&options.url, &options.access_token)),
        GitProvider::GitHub => Box::new(GitHubApi::new(&options.url, &options.access_token)),
        GitProvider::Unknown => {
            return Err(PatchError::UnsupportedProvider {
                url: options.url.clone(),
            })
        }
    };

    patch_with_driver(options, driver.as_ref()).await
}

/// The patch pipeline against an already-selected driver.
///
/// Sequencing: validate, liveness check, file resolution with extension
/// fallback, fetch and parse, field resolution, conditional mutation,
/// serialization, branch resolution, commit.
pub async fn patch_with_driver(
    options: &PatchOptions,
    driver: &dyn GitProviderApi,
) -> Result<PatchOutcome, PatchError> {
    options.validate()?;

    let version = driver
        .get_version()
        .await
        .map_err(|source| PatchError::ApiCheckFailed {
            url: options.url.clone(),
            source,
        })?;
    debug!(version = %version.version, "API check passed");

    let project = resolver::project_identifier(&options.repo);
    let branch = options.explicit_branch();

    // Probe the configured file name, then the opposite yaml extension.
    let mut file_path = resolver::values_file_path(
        &options.applications_dir,
        &options.application,
        &options.values_file,
    );
    if !driver.file_exists(&project, &file_path, branch).await? {
        debug!(path = %file_path, "values file not found, trying the opposite extension");
        let toggled = resolver::toggle_extension(&options.values_file);
        file_path = resolver::values_file_path(
            &options.applications_dir,
            &options.application,
            &toggled,
        );
        if !driver.file_exists(&project, &file_path, branch).await? {
            return Err(PatchError::FileNotFound { path: file_path });
        }
    }
    debug!(path = %file_path, "resolved values file");

    let original = driver.get_raw_file(&project, &file_path, branch).await?;
    let mut document = yaml::parse_document(&original)?;

    // A leading dot means a literal dot-path; a bare name expands to every
    // occurrence in the document.
    let candidates: Vec<FieldPath> = if options.patch_field.starts_with('.') {
        vec![FieldPath::parse(&options.patch_field)?]
    } else {
        yaml::find_by_name(&document, &options.patch_field)
    };
    debug!(
        field = %options.patch_field,
        count = candidates.len(),
        "resolved candidate fields"
    );

    let new_value = yaml::parse_scalar(&options.patch_value);
    let mut changed = false;
    for path in &candidates {
        if !yaml::exists(&document, path) {
            return Err(PatchError::FieldNotFound {
                path: path.to_string(),
                file: file_path,
            });
        }
        let current = yaml::get(&document, path).and_then(yaml::scalar_to_string);
        if current.as_deref() != Some(options.patch_value.as_str()) {
            debug!(field = %path, "patching field");
            yaml::set(&mut document, path, new_value.clone())?;
            changed = true;
        }
    }

    if !changed {
        info!(path = %file_path, "no changes to commit");
        return Ok(PatchOutcome::Unchanged { file_path });
    }

    let patched = yaml::serialize_document(&document)?;

    if options.dry_run {
        info!(path = %file_path, "dry run, skipping commit");
        return Ok(PatchOutcome::DryRun {
            file_path,
            original,
            patched,
        });
    }

    let target_branch = match branch {
        Some(branch) => branch.to_string(),
        None => {
            let project_info = driver.get_project(&project).await?;
            debug!(
                branch = %project_info.default_branch,
                "no branch given, using the project default"
            );
            project_info.default_branch
        }
    };

    let request = CommitRequest {
        branch: target_branch.clone(),
        commit_message: commit_message(options, &file_path),
        actions: vec![CommitAction {
            action: FileAction::Update,
            file_path: file_path.clone(),
            content: patched.clone(),
            encoding: Encoding::Text,
        }],
    };
    let result = driver
        .post_commit(&project, &request)
        .await
        .map_err(|source| PatchError::CommitFailed {
            path: file_path.clone(),
            source,
        })?;
    info!(commit = %result.id, branch = %target_branch, "commit created");

    Ok(PatchOutcome::Committed {
        file_path,
        branch: target_branch,
        commit_id: result.id,
        original,
        patched,
    })
}

/// Default message `Patched '<filePath>'`, `[<behalf>] `-prefixed when acting
/// on behalf of a user; an explicit message overrides both.
fn commit_message(options: &PatchOptions, file_path: &str) -> String {
    if let Some(message) = &options.message {
        return message.clone();
    }
    let mut message = format!("Patched '{file_path}'");
    if let Some(behalf) = &options.behalf {
        message = format!("[{behalf}] {message}");
    }
    message
}
