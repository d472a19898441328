use crate::patch::errors::PatchError;
use crate::resolver;

/// Everything one patch invocation needs, assembled by the caller (the CLI
/// binary, typically) and passed immutably into [`crate::patch::patch`].
#[derive(Debug, Clone)]
pub struct PatchOptions {
    /// Base URL of the git system (e.g. `https://gitlab.com`).
    pub url: String,
    /// Access token with API permissions.
    pub access_token: String,
    /// Repository identifier (e.g. `org/deployments`).
    pub repo: String,
    /// Branch to commit to. `None` resolves the repository's default branch.
    pub branch: Option<String>,
    /// Directory where the applications are stored.
    pub applications_dir: String,
    /// Values file to patch, `*.yml` or `*.yaml`.
    pub values_file: String,
    /// Name of the application to patch.
    pub application: String,
    /// Field to patch: a `.`-prefixed dot-path or a bare field name.
    pub patch_field: String,
    /// Value to write into every matched field.
    pub patch_value: String,
    /// Commit message override.
    pub message: Option<String>,
    /// User to act on behalf of, prefixed to the default commit message.
    pub behalf: Option<String>,
    /// Compute the patch but do not commit.
    pub dry_run: bool,
}

impl PatchOptions {
    /// Check the invariants the pipeline relies on. Called before any
    /// network traffic.
    pub fn validate(&self) -> Result<(), PatchError> {
        if !resolver::has_values_extension(&self.values_file) {
            return Err(PatchError::InvalidValuesFile {
                file: self.values_file.clone(),
            });
        }
        Ok(())
    }

    /// The branch explicitly requested by the caller, if any. An empty
    /// string counts as unset.
    pub fn explicit_branch(&self) -> Option<&str> {
        self.branch.as_deref().filter(|branch| !branch.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values_file: &str) -> PatchOptions {
        PatchOptions {
            url: "https://gitlab.example.com".to_string(),
            access_token: "token".to_string(),
            repo: "org/deployments".to_string(),
            branch: None,
            applications_dir: "applications".to_string(),
            values_file: values_file.to_string(),
            application: "foo".to_string(),
            patch_field: ".image.tag".to_string(),
            patch_value: "v2".to_string(),
            message: None,
            behalf: None,
            dry_run: false,
        }
    }

    #[test]
    fn accepts_both_yaml_extensions() {
        assert!(options("values.yaml").validate().is_ok());
        assert!(options("values.yml").validate().is_ok());
    }

    #[test]
    fn rejects_other_extensions() {
        let err = options("values.json").validate().unwrap_err();
        assert!(matches!(err, PatchError::InvalidValuesFile { .. }));
    }

    #[test]
    fn empty_branch_counts_as_unset() {
        let mut opts = options("values.yaml");
        opts.branch = Some(String::new());
        assert_eq!(opts.explicit_branch(), None);
        opts.branch = Some("release".to_string());
        assert_eq!(opts.explicit_branch(), Some("release"));
    }
}
