//! Error types raised by lens operations.
//!
//! Safe lenses never produce these errors for a missing focus; they degrade
//! to `null` on `get` and leave the source unchanged on `map`/`set`. Unsafe
//! lenses and the restricted views report them synchronously to the caller.
//!
//! # Examples
//!
//! ```rust
//! use focal::LensError;
//!
//! let error = LensError::IndexOutOfRange { index: 5, length: 3 };
//! assert_eq!(format!("{error}"), "index 5 out of range for array of length 3");
//! ```

use serde_json::Value;

/// Errors that can occur while focusing on, reading or updating a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LensError {
    /// The source was not the container kind the lens operates on.
    #[error("{lens} lens expects {expected}, found {found}")]
    TypeMismatch {
        /// The kind of lens that rejected the source.
        lens: &'static str,
        /// The container kind the lens expected.
        expected: &'static str,
        /// The JSON type actually found.
        found: &'static str,
    },

    /// An index (after normalisation of negative indices) fell outside the
    /// permitted range.
    #[error("index {index} out of range for array of length {length}")]
    IndexOutOfRange {
        /// The requested index, as normalised against the array length.
        index: i64,
        /// The length of the array being accessed.
        length: usize,
    },

    /// An unsafe path lens tried to read through a value that is missing,
    /// `null` or not a container.
    #[error("cannot read property `{segment}` of path `{path}`: parent is missing")]
    PathTraversal {
        /// The full dot-separated path.
        path: String,
        /// The segment whose parent could not be dereferenced.
        segment: String,
    },

    /// `map` or `set` was called on a read-only lens.
    #[error("map not permitted in a Getter")]
    MapNotPermitted,

    /// `get` was called on a write-only lens.
    #[error("get not permitted in a Setter")]
    GetNotPermitted,

    /// A lens could not be built from the arguments it was given.
    #[error("invalid lens argument: {0}")]
    InvalidLensArgument(String),

    /// A failure reported by a user-supplied lens function.
    #[error("{0}")]
    Custom(String),
}

impl LensError {
    /// Builds a [`LensError::TypeMismatch`] describing `found`.
    pub(crate) fn type_mismatch(lens: &'static str, expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            lens,
            expected,
            found: json_type_name(found),
        }
    }

    /// Builds a [`LensError::InvalidLensArgument`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidLensArgument(message.into())
    }
}

/// A `Result` alias for lens operations.
pub type Result<T> = std::result::Result<T, LensError>;

/// Names the JSON type of a value, for error messages.
pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_mismatch_display() {
        let error = LensError::type_mismatch("index", "array", &json!({"a": 1}));
        assert_eq!(format!("{error}"), "index lens expects array, found object");
    }

    #[test]
    fn test_path_traversal_display() {
        let error = LensError::PathTraversal {
            path: "a.b.c".to_string(),
            segment: "c".to_string(),
        };
        assert_eq!(
            format!("{error}"),
            "cannot read property `c` of path `a.b.c`: parent is missing"
        );
    }

    #[test]
    fn test_restriction_errors_display() {
        assert_eq!(
            LensError::MapNotPermitted.to_string(),
            "map not permitted in a Getter"
        );
        assert_eq!(
            LensError::GetNotPermitted.to_string(),
            "get not permitted in a Setter"
        );
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!([1])), "array");
        assert_eq!(json_type_name(&json!("x")), "string");
    }
}
