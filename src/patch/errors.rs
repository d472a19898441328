use crate::provider::ApiError;
use crate::yaml::YamlError;
use thiserror::Error;

/// The single fatal-error taxonomy of the patch pipeline. Every variant
/// aborts the invocation immediately; nothing is caught and retried
/// internally.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("values file '{file}' must be a *.yml or *.yaml file")]
    InvalidValuesFile { file: String },

    #[error("no supported git provider found at '{url}'")]
    UnsupportedProvider { url: String },

    #[error("API check failed for '{url}': {source}")]
    ApiCheckFailed {
        url: String,
        #[source]
        source: ApiError,
    },

    #[error("file '{path}' does not exist")]
    FileNotFound { path: String },

    #[error("field '{path}' does not exist in file '{file}'")]
    FieldNotFound { path: String, file: String },

    #[error("failed to commit '{path}': {source}")]
    CommitFailed {
        path: String,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Yaml(#[from] YamlError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
