//! Cross-document reference resolution.
//!
//! A [`DocumentResolver`] maps a definition, operation or security scheme name to the relative
//! path of the document holding it, as seen from the document being rendered. `None` means the
//! target lives in the same document (or links are disabled): the anchor alone is enough, or the
//! name is rendered as plain text.
//!
//! Every resolver is a pure function of the configuration it was built from: resolving the same
//! name twice yields the same answer.

use crate::config::ConvertConfig;
use crate::markup::normalize_name;

/// Resolves a name to the relative path of the document that holds it.
pub trait DocumentResolver {
    /// The relative document path, or `None` for the current document.
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<F> DocumentResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Resolver for content that never links outside of its own document.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameDocumentResolver;

impl DocumentResolver for SameDocumentResolver {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Path of a definition, relative to the output directory.
fn definition_location(config: &ConvertConfig, name: &str) -> String {
    if config.separated_definitions() {
        format!(
            "{}/{}{}",
            config.separated_definitions_folder(),
            normalize_name(name),
            config.extension()
        )
    } else {
        format!("{}{}", config.definitions_document(), config.extension())
    }
}

/// Resolves definitions referenced from operation content.
///
/// Operation content lives in the paths document, or in `<operations folder>/` when operations
/// are separated, hence the `../` segment.
#[derive(Debug, Clone)]
pub struct DefinitionResolverFromOperation<'a> {
    config: &'a ConvertConfig,
}

impl<'a> DefinitionResolverFromOperation<'a> {
    /// Creates the resolver.
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self { config }
    }
}

impl DocumentResolver for DefinitionResolverFromOperation<'_> {
    fn resolve(&self, name: &str) -> Option<String> {
        if !self.config.file_links_enabled() {
            return None;
        }
        let parent = if self.config.separated_operations() {
            "../"
        } else {
            ""
        };
        Some(format!(
            "{}{parent}{}",
            self.config.inter_document_cross_references_prefix(),
            definition_location(self.config, name)
        ))
    }
}

/// Resolves definitions referenced from definition content.
///
/// Separated definitions live next to each other; otherwise they share a single document.
#[derive(Debug, Clone)]
pub struct DefinitionResolverFromDefinition<'a> {
    config: &'a ConvertConfig,
}

impl<'a> DefinitionResolverFromDefinition<'a> {
    /// Creates the resolver.
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self { config }
    }
}

impl DocumentResolver for DefinitionResolverFromDefinition<'_> {
    fn resolve(&self, name: &str) -> Option<String> {
        if !self.config.file_links_enabled() || !self.config.separated_definitions() {
            return None;
        }
        Some(format!(
            "{}{}{}",
            self.config.inter_document_cross_references_prefix(),
            normalize_name(name),
            self.config.extension()
        ))
    }
}

/// Resolves separated definition files from the definitions document.
#[derive(Debug, Clone)]
pub struct DefinitionFileResolver<'a> {
    config: &'a ConvertConfig,
}

impl<'a> DefinitionFileResolver<'a> {
    /// Creates the resolver.
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self { config }
    }
}

impl DocumentResolver for DefinitionFileResolver<'_> {
    fn resolve(&self, name: &str) -> Option<String> {
        if !self.config.file_links_enabled() || !self.config.separated_definitions() {
            return None;
        }
        Some(format!(
            "{}{}",
            self.config.inter_document_cross_references_prefix(),
            definition_location(self.config, name)
        ))
    }
}

/// Resolves separated operation files from the paths document.
#[derive(Debug, Clone)]
pub struct OperationFileResolver<'a> {
    config: &'a ConvertConfig,
}

impl<'a> OperationFileResolver<'a> {
    /// Creates the resolver.
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self { config }
    }
}

impl DocumentResolver for OperationFileResolver<'_> {
    fn resolve(&self, operation_id: &str) -> Option<String> {
        if !self.config.file_links_enabled() || !self.config.separated_operations() {
            return None;
        }
        Some(format!(
            "{}{}/{}{}",
            self.config.inter_document_cross_references_prefix(),
            self.config.separated_operations_folder(),
            normalize_name(operation_id),
            self.config.extension()
        ))
    }
}

/// Resolves security schemes referenced from operation content.
///
/// Security schemes are never split: every name resolves to the security document.
#[derive(Debug, Clone)]
pub struct SecurityResolver<'a> {
    config: &'a ConvertConfig,
}

impl<'a> SecurityResolver<'a> {
    /// Creates the resolver.
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self { config }
    }
}

impl DocumentResolver for SecurityResolver<'_> {
    fn resolve(&self, _name: &str) -> Option<String> {
        if !self.config.security_links_enabled() {
            return None;
        }
        let parent = if self.config.separated_operations() {
            "../"
        } else {
            ""
        };
        Some(format!(
            "{}{parent}{}{}",
            self.config.inter_document_cross_references_prefix(),
            self.config.security_document(),
            self.config.extension()
        ))
    }
}
