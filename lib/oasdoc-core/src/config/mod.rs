//! Conversion configuration.
//!
//! [`ConvertConfig`] is immutable once built. It is created either from code through
//! [`ConvertConfigBuilder`] or from a settings file through [`ConvertSettings`].

mod ordering;
mod settings;

use std::path::{Path, PathBuf};

use regex::Regex;

pub use self::ordering::{Comparator, OrderBy, Ordering};
pub use self::settings::ConvertSettings;
use crate::error::ConvertError;
use crate::model::{ParameterEntry, PathOperation};

/// The markup dialect the documents are meant for.
///
/// The conversion itself never emits dialect syntax; the language only drives file extensions
/// and therefore cross-document link targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkupLanguage {
    /// AsciiDoc, `.adoc` files.
    #[default]
    #[serde(alias = "ASCII_DOC")]
    Asciidoc,
    /// Markdown, `.md` files.
    Markdown,
    /// Confluence wiki markup, `.txt` files.
    ConfluenceMarkup,
}

impl MarkupLanguage {
    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Asciidoc => ".adoc",
            Self::Markdown => ".md",
            Self::ConfluenceMarkup => ".txt",
        }
    }
}

/// How operations are grouped in the paths document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupBy {
    /// No grouping, operations follow the operation ordering.
    #[default]
    AsIs,
    /// One group per tag; untagged operations are a configuration error.
    Tags,
    /// One group per header captured by the header pattern.
    Regex,
}

/// Shape of the generated example requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestExamplesFormat {
    /// The request path with its query string.
    #[default]
    #[serde(alias = "BASIC")]
    Basic,
    /// A `curl` command line.
    #[serde(alias = "CURL")]
    Curl,
    /// A PowerShell `Invoke-WebRequest` command.
    #[serde(rename = "invoke-webrequest", alias = "INVOKE_WEBREQUEST")]
    InvokeWebRequest,
}

impl RequestExamplesFormat {
    /// Language of the listing holding the example request.
    pub fn language(self) -> Option<&'static str> {
        match self {
            Self::Basic => None,
            Self::Curl => Some("bash"),
            Self::InvokeWebRequest => Some("powershell"),
        }
    }
}

/// Configuration of a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    markup_language: MarkupLanguage,
    group_by: GroupBy,
    header_pattern: Option<Regex>,

    operation_ordering: Ordering<PathOperation>,
    parameter_ordering: Ordering<ParameterEntry>,
    definition_ordering: Ordering<str>,
    property_ordering: Ordering<str>,
    response_ordering: Ordering<str>,
    tag_ordering: Ordering<str>,

    separated_definitions: bool,
    separated_operations: bool,
    inline_schema: bool,
    flat_body: bool,
    path_security_section: bool,
    base_path_prefix: bool,
    generated_examples_enabled: bool,
    request_examples_format: RequestExamplesFormat,

    inter_document_cross_references: bool,
    inter_document_cross_references_prefix: String,
    anchor_prefix: Option<String>,
    output_directory: Option<PathBuf>,

    overview_document: String,
    paths_document: String,
    definitions_document: String,
    security_document: String,
    separated_operations_folder: String,
    separated_definitions_folder: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            markup_language: MarkupLanguage::default(),
            group_by: GroupBy::default(),
            header_pattern: None,
            operation_ordering: Ordering::AsIs,
            parameter_ordering: Ordering::Natural,
            definition_ordering: Ordering::Natural,
            property_ordering: Ordering::Natural,
            response_ordering: Ordering::Natural,
            tag_ordering: Ordering::Natural,
            separated_definitions: false,
            separated_operations: false,
            inline_schema: true,
            flat_body: false,
            path_security_section: true,
            base_path_prefix: false,
            generated_examples_enabled: false,
            request_examples_format: RequestExamplesFormat::default(),
            inter_document_cross_references: false,
            inter_document_cross_references_prefix: String::new(),
            anchor_prefix: None,
            output_directory: None,
            overview_document: "overview".to_string(),
            paths_document: "paths".to_string(),
            definitions_document: "definitions".to_string(),
            security_document: "security".to_string(),
            separated_operations_folder: "operations".to_string(),
            separated_definitions_folder: "definitions".to_string(),
        }
    }
}

impl ConvertConfig {
    /// Starts a builder with the default settings.
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder::default()
    }

    /// The target markup language.
    pub fn markup_language(&self) -> MarkupLanguage {
        self.markup_language
    }

    /// File extension of every emitted document.
    pub fn extension(&self) -> &'static str {
        self.markup_language.extension()
    }

    /// Grouping of the paths document.
    pub fn group_by(&self) -> GroupBy {
        self.group_by
    }

    /// The header pattern used by [`GroupBy::Regex`], with exactly one capture group.
    pub fn header_pattern(&self) -> Option<&Regex> {
        self.header_pattern.as_ref()
    }

    /// Ordering of operations.
    pub fn operation_ordering(&self) -> &Ordering<PathOperation> {
        &self.operation_ordering
    }

    /// Ordering of parameters inside an operation.
    pub fn parameter_ordering(&self) -> &Ordering<ParameterEntry> {
        &self.parameter_ordering
    }

    /// Ordering of definitions by name.
    pub fn definition_ordering(&self) -> &Ordering<str> {
        &self.definition_ordering
    }

    /// Ordering of object properties by name.
    pub fn property_ordering(&self) -> &Ordering<str> {
        &self.property_ordering
    }

    /// Ordering of responses by status code.
    pub fn response_ordering(&self) -> &Ordering<str> {
        &self.response_ordering
    }

    /// Ordering of tags by name.
    pub fn tag_ordering(&self) -> &Ordering<str> {
        &self.tag_ordering
    }

    /// Whether each definition also gets its own file.
    pub fn separated_definitions(&self) -> bool {
        self.separated_definitions
    }

    /// Whether each operation also gets its own file.
    pub fn separated_operations(&self) -> bool {
        self.separated_operations
    }

    /// Whether anonymous nested objects become inline definitions.
    pub fn inline_schema(&self) -> bool {
        self.inline_schema
    }

    /// Whether object request bodies are rendered as a flat properties table.
    pub fn flat_body(&self) -> bool {
        self.flat_body
    }

    /// Whether operations list their security requirements.
    pub fn path_security_section(&self) -> bool {
        self.path_security_section
    }

    /// Whether operation paths are prefixed with the server base path.
    pub fn base_path_prefix(&self) -> bool {
        self.base_path_prefix
    }

    /// Whether missing example values are generated from the schemas.
    pub fn generated_examples_enabled(&self) -> bool {
        self.generated_examples_enabled
    }

    /// Shape of the example requests.
    pub fn request_examples_format(&self) -> RequestExamplesFormat {
        self.request_examples_format
    }

    /// Whether references may point into other documents.
    pub fn inter_document_cross_references(&self) -> bool {
        self.inter_document_cross_references
    }

    /// Prefix prepended to every cross-document link target.
    pub fn inter_document_cross_references_prefix(&self) -> &str {
        &self.inter_document_cross_references_prefix
    }

    /// Prefix prepended to every anchor.
    pub fn anchor_prefix(&self) -> Option<&str> {
        self.anchor_prefix.as_deref()
    }

    /// Where documents are going to be written, if known.
    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    /// Whether definition and operation links may target another file.
    ///
    /// Links need an output location, and either explicit cross references or separated files.
    pub fn file_links_enabled(&self) -> bool {
        self.output_directory.is_some()
            && (self.inter_document_cross_references
                || self.separated_definitions
                || self.separated_operations)
    }

    /// Whether links to the security document are emitted.
    pub fn security_links_enabled(&self) -> bool {
        self.output_directory.is_some() && self.inter_document_cross_references
    }

    /// Base name of the overview document.
    pub fn overview_document(&self) -> &str {
        &self.overview_document
    }

    /// Base name of the paths document.
    pub fn paths_document(&self) -> &str {
        &self.paths_document
    }

    /// Base name of the definitions document.
    pub fn definitions_document(&self) -> &str {
        &self.definitions_document
    }

    /// Base name of the security document.
    pub fn security_document(&self) -> &str {
        &self.security_document
    }

    /// Folder receiving separated operation files.
    pub fn separated_operations_folder(&self) -> &str {
        &self.separated_operations_folder
    }

    /// Folder receiving separated definition files.
    pub fn separated_definitions_folder(&self) -> &str {
        &self.separated_definitions_folder
    }
}

/// Builder for [`ConvertConfig`].
///
/// # Example
///
/// ```rust
/// use oasdoc_core::{ConvertConfig, GroupBy, Ordering};
///
/// let config = ConvertConfig::builder()
///     .with_group_by(GroupBy::Regex)
///     .with_header_pattern(r"^/(\w+)/")
///     .with_tag_ordering(Ordering::AsIs)
///     .build()?;
///
/// assert_eq!(config.group_by(), GroupBy::Regex);
/// # Ok::<(), oasdoc_core::ConvertError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConvertConfigBuilder {
    config: ConvertConfig,
    header_pattern: Option<String>,
}

impl ConvertConfigBuilder {
    /// Sets the markup language.
    pub fn with_markup_language(mut self, markup_language: MarkupLanguage) -> Self {
        self.config.markup_language = markup_language;
        self
    }

    /// Sets the grouping of the paths document.
    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.config.group_by = group_by;
        self
    }

    /// Sets the header pattern used by [`GroupBy::Regex`].
    ///
    /// The pattern is compiled and checked by [`build`](Self::build).
    pub fn with_header_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.header_pattern = Some(pattern.into());
        self
    }

    /// Sets the operation ordering.
    pub fn with_operation_ordering(mut self, ordering: Ordering<PathOperation>) -> Self {
        self.config.operation_ordering = ordering;
        self
    }

    /// Sets the parameter ordering.
    pub fn with_parameter_ordering(mut self, ordering: Ordering<ParameterEntry>) -> Self {
        self.config.parameter_ordering = ordering;
        self
    }

    /// Sets the definition ordering.
    pub fn with_definition_ordering(mut self, ordering: Ordering<str>) -> Self {
        self.config.definition_ordering = ordering;
        self
    }

    /// Sets the property ordering.
    pub fn with_property_ordering(mut self, ordering: Ordering<str>) -> Self {
        self.config.property_ordering = ordering;
        self
    }

    /// Sets the response ordering.
    pub fn with_response_ordering(mut self, ordering: Ordering<str>) -> Self {
        self.config.response_ordering = ordering;
        self
    }

    /// Sets the tag ordering.
    pub fn with_tag_ordering(mut self, ordering: Ordering<str>) -> Self {
        self.config.tag_ordering = ordering;
        self
    }

    /// Emits one file per definition.
    pub fn with_separated_definitions(mut self, enabled: bool) -> Self {
        self.config.separated_definitions = enabled;
        self
    }

    /// Emits one file per operation.
    pub fn with_separated_operations(mut self, enabled: bool) -> Self {
        self.config.separated_operations = enabled;
        self
    }

    /// Enables or disables inline definitions for anonymous objects.
    pub fn with_inline_schema(mut self, enabled: bool) -> Self {
        self.config.inline_schema = enabled;
        self
    }

    /// Renders object request bodies as a flat properties table.
    pub fn with_flat_body(mut self, enabled: bool) -> Self {
        self.config.flat_body = enabled;
        self
    }

    /// Enables or disables the security section of operations.
    pub fn with_path_security_section(mut self, enabled: bool) -> Self {
        self.config.path_security_section = enabled;
        self
    }

    /// Prefixes operation paths with the server base path.
    pub fn with_base_path_prefix(mut self, enabled: bool) -> Self {
        self.config.base_path_prefix = enabled;
        self
    }

    /// Generates missing example values, and an example request for every operation.
    pub fn with_generated_examples_enabled(mut self, enabled: bool) -> Self {
        self.config.generated_examples_enabled = enabled;
        self
    }

    /// Sets the shape of the example requests.
    pub fn with_request_examples_format(mut self, format: RequestExamplesFormat) -> Self {
        self.config.request_examples_format = format;
        self
    }

    /// Enables cross-document references.
    pub fn with_inter_document_cross_references(mut self, enabled: bool) -> Self {
        self.config.inter_document_cross_references = enabled;
        self
    }

    /// Sets the prefix of cross-document link targets.
    pub fn with_inter_document_cross_references_prefix(
        mut self,
        prefix: impl Into<String>,
    ) -> Self {
        self.config.inter_document_cross_references_prefix = prefix.into();
        self
    }

    /// Sets the prefix of every anchor.
    pub fn with_anchor_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.anchor_prefix = Some(prefix.into());
        self
    }

    /// Sets the output directory.
    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.output_directory = Some(directory.into());
        self
    }

    /// Sets the base name of the overview document.
    pub fn with_overview_document(mut self, name: impl Into<String>) -> Self {
        self.config.overview_document = name.into();
        self
    }

    /// Sets the base name of the paths document.
    pub fn with_paths_document(mut self, name: impl Into<String>) -> Self {
        self.config.paths_document = name.into();
        self
    }

    /// Sets the base name of the definitions document.
    pub fn with_definitions_document(mut self, name: impl Into<String>) -> Self {
        self.config.definitions_document = name.into();
        self
    }

    /// Sets the base name of the security document.
    pub fn with_security_document(mut self, name: impl Into<String>) -> Self {
        self.config.security_document = name.into();
        self
    }

    /// Sets the folder of separated operation files.
    pub fn with_separated_operations_folder(mut self, folder: impl Into<String>) -> Self {
        self.config.separated_operations_folder = folder.into();
        self
    }

    /// Sets the folder of separated definition files.
    pub fn with_separated_definitions_folder(mut self, folder: impl Into<String>) -> Self {
        self.config.separated_definitions_folder = folder.into();
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::InvalidPattern`] when the header pattern does not compile
    /// - [`ConvertError::Configuration`] (key `headerPattern`) when it does not have exactly one
    ///   capture group
    /// - [`ConvertError::Configuration`] when a document or folder name is blank
    pub fn build(self) -> Result<ConvertConfig, ConvertError> {
        let Self {
            mut config,
            header_pattern,
        } = self;

        if let Some(pattern) = header_pattern {
            let regex = Regex::new(&pattern)?;
            // captures_len counts the implicit whole-match group
            if regex.captures_len() != 2 {
                return Err(ConvertError::configuration(
                    "headerPattern",
                    format!(
                        "'{pattern}' must have exactly one capture group, found {}",
                        regex.captures_len() - 1
                    ),
                ));
            }
            config.header_pattern = Some(regex);
        }

        let names = [
            ("overviewDocument", &config.overview_document),
            ("pathsDocument", &config.paths_document),
            ("definitionsDocument", &config.definitions_document),
            ("securityDocument", &config.security_document),
            ("separatedOperationsFolder", &config.separated_operations_folder),
            ("separatedDefinitionsFolder", &config.separated_definitions_folder),
        ];
        if let Some((key, _)) = names.iter().find(|(_, name)| name.trim().is_empty()) {
            return Err(ConvertError::configuration(*key, "must not be blank"));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_documented_defaults() {
        let config = ConvertConfig::default();

        assert_eq!(config.markup_language(), MarkupLanguage::Asciidoc);
        assert_eq!(config.group_by(), GroupBy::AsIs);
        assert!(matches!(config.operation_ordering(), Ordering::AsIs));
        assert!(matches!(config.parameter_ordering(), Ordering::Natural));
        assert!(matches!(config.tag_ordering(), Ordering::Natural));
        assert!(config.inline_schema());
        assert!(!config.flat_body());
        assert!(!config.file_links_enabled());
        assert!(!config.generated_examples_enabled());
        assert_eq!(config.request_examples_format(), RequestExamplesFormat::Basic);
        assert_eq!(config.paths_document(), "paths");
        assert_eq!(config.separated_definitions_folder(), "definitions");
    }

    #[test]
    fn should_accept_pattern_with_one_group() {
        let config = ConvertConfig::builder()
            .with_header_pattern("(v[0-9]+)")
            .build()
            .expect("valid pattern");

        let pattern = config.header_pattern().expect("pattern is set");
        assert_eq!(pattern.as_str(), "(v[0-9]+)");
    }

    #[test]
    fn should_reject_pattern_without_group() {
        let error = ConvertConfig::builder()
            .with_header_pattern("v[0-9]+")
            .build()
            .expect_err("no capture group");

        assert_eq!(error.configuration_key(), Some("headerPattern"));
    }

    #[test]
    fn should_reject_pattern_with_two_groups() {
        let error = ConvertConfig::builder()
            .with_header_pattern("(v)([0-9]+)")
            .build()
            .expect_err("two capture groups");

        assert_eq!(error.configuration_key(), Some("headerPattern"));
    }

    #[test]
    fn should_reject_invalid_pattern() {
        let error = ConvertConfig::builder()
            .with_header_pattern("(")
            .build()
            .expect_err("invalid regex");

        assert!(matches!(error, ConvertError::InvalidPattern(_)));
    }

    #[test]
    fn should_reject_blank_document_name() {
        let error = ConvertConfig::builder()
            .with_security_document("  ")
            .build()
            .expect_err("blank name");

        assert_eq!(error.configuration_key(), Some("securityDocument"));
    }

    #[test]
    fn should_enable_file_links_only_with_output_directory() {
        let without_output = ConvertConfig::builder()
            .with_separated_definitions(true)
            .build()
            .expect("valid config");
        assert!(!without_output.file_links_enabled());

        let with_output = ConvertConfig::builder()
            .with_separated_definitions(true)
            .with_output_directory("docs")
            .build()
            .expect("valid config");
        assert!(with_output.file_links_enabled());
        assert!(!with_output.security_links_enabled());
    }

    #[test]
    fn should_map_extensions() {
        assert_eq!(MarkupLanguage::Asciidoc.extension(), ".adoc");
        assert_eq!(MarkupLanguage::Markdown.extension(), ".md");
        assert_eq!(MarkupLanguage::ConfluenceMarkup.extension(), ".txt");
    }
}
