//! Conventional repository layout resolution for values files.
//!
//! Values files live at `/<applications_dir>/<application>/<values_file>`.
//! Each configured segment may arrive wrapped in stray path separators; they
//! are stripped before joining so the result always carries exactly one
//! leading separator and single separators between segments.

/// Strip leading and trailing `/` from a path segment.
pub fn strip_separators(segment: &str) -> &str {
    segment.trim_matches('/')
}

/// Build the values-file path for an application.
pub fn values_file_path(applications_dir: &str, application: &str, values_file: &str) -> String {
    format!(
        "/{}/{}/{}",
        strip_separators(applications_dir),
        strip_separators(application),
        strip_separators(values_file)
    )
}

/// Normalize a repository identifier for the provider API (`owner/repo`).
pub fn project_identifier(repo: &str) -> String {
    strip_separators(repo).to_string()
}

/// Toggle between the two YAML file extensions: `.yml ⇄ .yaml`. Any other
/// suffix is returned unchanged.
pub fn toggle_extension(file_name: &str) -> String {
    if let Some(stem) = file_name.strip_suffix(".yml") {
        format!("{stem}.yaml")
    } else if let Some(stem) = file_name.strip_suffix(".yaml") {
        format!("{stem}.yml")
    } else {
        file_name.to_string()
    }
}

/// Whether a file name carries one of the accepted YAML extensions.
pub fn has_values_extension(file_name: &str) -> bool {
    file_name.ends_with(".yml") || file_name.ends_with(".yaml")
}
