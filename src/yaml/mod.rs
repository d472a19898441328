pub mod engine;
pub mod errors;
pub mod path;

pub use engine::{
    exists, find_by_name, get, parse_document, parse_scalar, scalar_to_string,
    serialize_document, set,
};
pub use errors::YamlError;
pub use path::FieldPath;
