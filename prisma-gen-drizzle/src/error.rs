//! Error types for code generation
//!
//! Every error is fatal for the run: generation either returns all modules
//! or one of these errors, never a partial set of modules.

/// Error type for code generation
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Missing or invalid generator configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The selected dialect cannot represent a field's type
    #[error("unsupported field type {field_type} for {model}.{field} in dialect {dialect}")]
    UnsupportedFieldType {
        /// Dialect identifier (e.g. "sqlite")
        dialect: String,
        /// Model owning the field
        model: String,
        /// Offending field
        field: String,
        /// Type as written in the datamodel
        field_type: String,
    },

    /// A documentation directive could not be parsed
    #[error("invalid directive on {model}.{field}: {reason}\n  documentation: {documentation:?}")]
    InvalidDirective {
        /// Model owning the field
        model: String,
        /// Field carrying the directive
        field: String,
        /// The raw documentation string, verbatim
        documentation: String,
        /// What was wrong with it
        reason: String,
    },

    /// Relation metadata points at something that does not exist
    #[error("unresolved relation {model}.{field}: {reason}")]
    UnresolvedRelation {
        /// Model owning the relation field
        model: String,
        /// Relation field
        field: String,
        /// What could not be resolved
        reason: String,
    },

    /// Failed to decode the input datamodel
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for GeneratorError {
    fn from(e: serde_json::Error) -> Self {
        GeneratorError::Decode(e.to_string())
    }
}

/// Result alias used throughout the generator
pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directive_echoes_documentation() {
        let err = GeneratorError::InvalidDirective {
            model: "User".to_string(),
            field: "id".to_string(),
            documentation: "drizzle.custom {oops".to_string(),
            reason: "malformed payload".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("User.id"));
        assert!(message.contains("drizzle.custom {oops"));
    }

    #[test]
    fn test_unsupported_field_type_names_context() {
        let err = GeneratorError::UnsupportedFieldType {
            dialect: "sqlite".to_string(),
            model: "User".to_string(),
            field: "role".to_string(),
            field_type: "Role".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported field type Role for User.role in dialect sqlite"
        );
    }
}
