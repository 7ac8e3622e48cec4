//! YAML serialization support using serde-saphyr.
//!
//! Available with the `yaml` feature. Both the conversion settings and the markup documents
//! go through it.
//!
//! # Example
//!
//! ```rust
//! use oasdoc_core::{MarkupDocBuilder, ToYaml};
//!
//! let mut builder = MarkupDocBuilder::new(None);
//! builder.document_title("Pet store");
//!
//! let yaml = builder.build().to_yaml()?;
//! assert!(yaml.contains("Pet store"));
//! # Ok::<(), oasdoc_core::YamlError>(())
//! ```

use serde::Serialize;

/// Error type for YAML serialization operations.
pub type YamlError = serde_saphyr::ser_error::Error;

/// Extension trait for serializing types to YAML.
///
/// Implemented for every [`Serialize`] type.
pub trait ToYaml: Serialize + Sized {
    /// Serializes this value to a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`YamlError`] if serialization fails.
    fn to_yaml(&self) -> Result<String, YamlError> {
        serde_saphyr::to_string(self)
    }
}

impl<T: Serialize + Sized> ToYaml for T {}
