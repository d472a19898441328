use thiserror::Error;

#[derive(Error, Debug)]
pub enum YamlError {
    #[error("invalid YAML syntax: {message}")]
    InvalidSyntax { message: String },

    #[error("invalid field path '{input}': {message}")]
    InvalidFieldPath { input: String, message: String },

    #[error("'{path}' is not a mapping and cannot be descended into")]
    NotAMapping { path: String },

    #[error("failed to serialize YAML document: {message}")]
    Serialize { message: String },
}
