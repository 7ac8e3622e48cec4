/// Errors raised while converting an OpenAPI model into documentation.
///
/// Absent optional data (descriptions, examples, defaults) is never an error, and a name the
/// document resolvers cannot link is rendered as plain text. Everything listed here aborts the run.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ConvertError {
    /// A `$ref` points to a definition that is not part of the model.
    #[display("Unresolved reference '{reference}': no definition named '{name}'")]
    #[from(skip)]
    UnresolvedReference {
        /// The raw reference location.
        reference: String,
        /// The definition name extracted from the reference.
        name: String,
    },

    /// A chain of pure `$ref` aliases loops back on itself.
    #[display("Circular reference detected through definition '{name}'")]
    #[from(skip)]
    CircularReference {
        /// The definition reached twice.
        name: String,
    },

    /// A field the model requires is missing.
    #[display("Missing field '{field}' in {context}")]
    #[from(skip)]
    MissingField {
        /// Where the field was expected.
        context: String,
        /// The missing field.
        field: &'static str,
    },

    /// The configuration does not allow the requested operation.
    #[display("Invalid configuration '{key}': {message}")]
    #[from(skip)]
    Configuration {
        /// The offending configuration key.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// A configured regular expression does not compile.
    InvalidPattern(regex::Error),
}

impl ConvertError {
    pub(crate) fn configuration(key: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            key,
            message: message.into(),
        }
    }

    /// The configuration key behind a [`ConvertError::Configuration`] error.
    pub fn configuration_key(&self) -> Option<&'static str> {
        match self {
            Self::Configuration { key, .. } => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_configuration_error_with_key() {
        let error = ConvertError::configuration("headerPattern", "a pattern is required");

        assert_eq!(
            error.to_string(),
            "Invalid configuration 'headerPattern': a pattern is required"
        );
        assert_eq!(error.configuration_key(), Some("headerPattern"));
    }

    #[test]
    fn should_convert_regex_error() {
        let Err(regex_error) = regex::Regex::new("(") else {
            panic!("pattern should not compile");
        };
        let error = ConvertError::from(regex_error);

        assert!(matches!(error, ConvertError::InvalidPattern(_)));
        assert_eq!(error.configuration_key(), None);
    }
}
