use crate::yaml::errors::YamlError;
use std::fmt;

/// A dot-path into a nested YAML mapping.
///
/// Segments are mapping keys, separated by `.` in the textual form. Paths
/// always carry at least one segment; the canonical rendering has a leading
/// dot (`.image.tag`), matching the specifier syntax accepted on the command
/// line and the paths synthesized by name search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(segments: Vec<String>) -> Result<Self, YamlError> {
        if segments.is_empty() {
            return Err(YamlError::InvalidFieldPath {
                input: String::new(),
                message: "empty field path".to_string(),
            });
        }
        Ok(Self { segments })
    }

    /// Parse a dot-path string. Empty segments (a leading dot, doubled dots)
    /// are skipped rather than rejected.
    pub fn parse(input: &str) -> Result<Self, YamlError> {
        let segments: Vec<String> = input
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            return Err(YamlError::InvalidFieldPath {
                input: input.to_string(),
                message: "empty field path".to_string(),
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path truncated to its first `depth` segments, for error messages
    /// that name the point of failure. Depth zero names the document root.
    pub fn prefix(&self, depth: usize) -> String {
        if depth == 0 {
            return ".".to_string();
        }
        let mut out = String::new();
        for segment in self.segments.iter().take(depth) {
            out.push('.');
            out.push_str(segment);
        }
        out
    }

    pub fn as_string(&self) -> String {
        self.prefix(self.segments.len())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
