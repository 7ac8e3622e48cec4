use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{
    ConvertConfig, ConvertConfigBuilder, GroupBy, MarkupLanguage, OrderBy, RequestExamplesFormat,
};
use crate::error::ConvertError;

/// File representation of a [`ConvertConfig`].
///
/// Every key is optional; missing keys keep the builder defaults. Custom comparators cannot be
/// expressed in a file, they are only available through [`ConvertConfigBuilder`].
///
/// ```rust
/// use oasdoc_core::{ConvertConfig, ConvertSettings, GroupBy};
///
/// let settings: ConvertSettings = serde_json::from_str(
///     r#"{ "pathsGroupedBy": "TAGS", "separatedDefinitions": true }"#,
/// )?;
/// let config = ConvertConfig::try_from(settings)?;
///
/// assert_eq!(config.group_by(), GroupBy::Tags);
/// assert!(config.separated_definitions());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertSettings {
    /// See [`ConvertConfigBuilder::with_markup_language`].
    pub markup_language: Option<MarkupLanguage>,
    /// See [`ConvertConfigBuilder::with_group_by`].
    pub paths_grouped_by: Option<GroupBy>,
    /// See [`ConvertConfigBuilder::with_header_pattern`].
    pub header_pattern: Option<String>,

    /// See [`ConvertConfigBuilder::with_operation_ordering`].
    pub operation_order_by: Option<OrderBy>,
    /// See [`ConvertConfigBuilder::with_parameter_ordering`].
    pub parameter_order_by: Option<OrderBy>,
    /// See [`ConvertConfigBuilder::with_definition_ordering`].
    pub definition_order_by: Option<OrderBy>,
    /// See [`ConvertConfigBuilder::with_property_ordering`].
    pub property_order_by: Option<OrderBy>,
    /// See [`ConvertConfigBuilder::with_response_ordering`].
    pub response_order_by: Option<OrderBy>,
    /// See [`ConvertConfigBuilder::with_tag_ordering`].
    pub tag_order_by: Option<OrderBy>,

    /// See [`ConvertConfigBuilder::with_separated_definitions`].
    pub separated_definitions: Option<bool>,
    /// See [`ConvertConfigBuilder::with_separated_operations`].
    pub separated_operations: Option<bool>,
    /// See [`ConvertConfigBuilder::with_inline_schema`].
    pub inline_schema: Option<bool>,
    /// See [`ConvertConfigBuilder::with_flat_body`].
    pub flat_body: Option<bool>,
    /// See [`ConvertConfigBuilder::with_path_security_section`].
    pub path_security_section: Option<bool>,
    /// See [`ConvertConfigBuilder::with_base_path_prefix`].
    pub base_path_prefix: Option<bool>,
    /// See [`ConvertConfigBuilder::with_generated_examples_enabled`].
    pub generated_examples_enabled: Option<bool>,
    /// See [`ConvertConfigBuilder::with_request_examples_format`].
    pub request_examples_format: Option<RequestExamplesFormat>,

    /// See [`ConvertConfigBuilder::with_inter_document_cross_references`].
    pub inter_document_cross_references: Option<bool>,
    /// See [`ConvertConfigBuilder::with_inter_document_cross_references_prefix`].
    pub inter_document_cross_references_prefix: Option<String>,
    /// See [`ConvertConfigBuilder::with_anchor_prefix`].
    pub anchor_prefix: Option<String>,
    /// See [`ConvertConfigBuilder::with_output_directory`].
    pub output_directory: Option<PathBuf>,

    /// See [`ConvertConfigBuilder::with_overview_document`].
    pub overview_document: Option<String>,
    /// See [`ConvertConfigBuilder::with_paths_document`].
    pub paths_document: Option<String>,
    /// See [`ConvertConfigBuilder::with_definitions_document`].
    pub definitions_document: Option<String>,
    /// See [`ConvertConfigBuilder::with_security_document`].
    pub security_document: Option<String>,
    /// See [`ConvertConfigBuilder::with_separated_operations_folder`].
    pub separated_operations_folder: Option<String>,
    /// See [`ConvertConfigBuilder::with_separated_definitions_folder`].
    pub separated_definitions_folder: Option<String>,
}

impl ConvertSettings {
    /// Overrides the keys set in `other`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            markup_language: other.markup_language.or(self.markup_language),
            paths_grouped_by: other.paths_grouped_by.or(self.paths_grouped_by),
            header_pattern: other.header_pattern.or(self.header_pattern),
            operation_order_by: other.operation_order_by.or(self.operation_order_by),
            parameter_order_by: other.parameter_order_by.or(self.parameter_order_by),
            definition_order_by: other.definition_order_by.or(self.definition_order_by),
            property_order_by: other.property_order_by.or(self.property_order_by),
            response_order_by: other.response_order_by.or(self.response_order_by),
            tag_order_by: other.tag_order_by.or(self.tag_order_by),
            separated_definitions: other.separated_definitions.or(self.separated_definitions),
            separated_operations: other.separated_operations.or(self.separated_operations),
            inline_schema: other.inline_schema.or(self.inline_schema),
            flat_body: other.flat_body.or(self.flat_body),
            path_security_section: other.path_security_section.or(self.path_security_section),
            base_path_prefix: other.base_path_prefix.or(self.base_path_prefix),
            generated_examples_enabled: other
                .generated_examples_enabled
                .or(self.generated_examples_enabled),
            request_examples_format: other
                .request_examples_format
                .or(self.request_examples_format),
            inter_document_cross_references: other
                .inter_document_cross_references
                .or(self.inter_document_cross_references),
            inter_document_cross_references_prefix: other
                .inter_document_cross_references_prefix
                .or(self.inter_document_cross_references_prefix),
            anchor_prefix: other.anchor_prefix.or(self.anchor_prefix),
            output_directory: other.output_directory.or(self.output_directory),
            overview_document: other.overview_document.or(self.overview_document),
            paths_document: other.paths_document.or(self.paths_document),
            definitions_document: other.definitions_document.or(self.definitions_document),
            security_document: other.security_document.or(self.security_document),
            separated_operations_folder: other
                .separated_operations_folder
                .or(self.separated_operations_folder),
            separated_definitions_folder: other
                .separated_definitions_folder
                .or(self.separated_definitions_folder),
        }
    }

    /// Applies these settings on top of a builder.
    pub fn apply(self, builder: ConvertConfigBuilder) -> ConvertConfigBuilder {
        let mut builder = builder;

        macro_rules! apply {
            ($value:expr => $method:ident) => {
                if let Some(value) = $value {
                    builder = builder.$method(value);
                }
            };
            ($value:expr => $method:ident as ordering) => {
                if let Some(value) = $value {
                    builder = builder.$method(value.into());
                }
            };
        }

        apply!(self.markup_language => with_markup_language);
        apply!(self.paths_grouped_by => with_group_by);
        apply!(self.header_pattern => with_header_pattern);
        apply!(self.operation_order_by => with_operation_ordering as ordering);
        apply!(self.parameter_order_by => with_parameter_ordering as ordering);
        apply!(self.definition_order_by => with_definition_ordering as ordering);
        apply!(self.property_order_by => with_property_ordering as ordering);
        apply!(self.response_order_by => with_response_ordering as ordering);
        apply!(self.tag_order_by => with_tag_ordering as ordering);
        apply!(self.separated_definitions => with_separated_definitions);
        apply!(self.separated_operations => with_separated_operations);
        apply!(self.inline_schema => with_inline_schema);
        apply!(self.flat_body => with_flat_body);
        apply!(self.path_security_section => with_path_security_section);
        apply!(self.base_path_prefix => with_base_path_prefix);
        apply!(self.generated_examples_enabled => with_generated_examples_enabled);
        apply!(self.request_examples_format => with_request_examples_format);
        apply!(self.inter_document_cross_references => with_inter_document_cross_references);
        apply!(self.inter_document_cross_references_prefix => with_inter_document_cross_references_prefix);
        apply!(self.anchor_prefix => with_anchor_prefix);
        apply!(self.output_directory => with_output_directory);
        apply!(self.overview_document => with_overview_document);
        apply!(self.paths_document => with_paths_document);
        apply!(self.definitions_document => with_definitions_document);
        apply!(self.security_document => with_security_document);
        apply!(self.separated_operations_folder => with_separated_operations_folder);
        apply!(self.separated_definitions_folder => with_separated_definitions_folder);

        builder
    }
}

impl TryFrom<ConvertSettings> for ConvertConfig {
    type Error = ConvertError;

    fn try_from(settings: ConvertSettings) -> Result<Self, Self::Error> {
        settings.apply(ConvertConfig::builder()).build()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::config::Ordering;

    #[test]
    fn should_deserialize_camel_case_keys() {
        let settings: ConvertSettings = serde_json::from_value(serde_json::json!({
            "markupLanguage": "MARKDOWN",
            "pathsGroupedBy": "REGEX",
            "headerPattern": "^/(\\w+)",
            "operationOrderBy": "NATURAL",
            "flatBody": true,
            "interDocumentCrossReferencesPrefix": "api-"
        }))
        .expect("valid settings");

        let config = ConvertConfig::try_from(settings).expect("valid config");

        assert_eq!(config.markup_language(), MarkupLanguage::Markdown);
        assert_eq!(config.group_by(), GroupBy::Regex);
        assert!(matches!(config.operation_ordering(), Ordering::Natural));
        assert!(config.flat_body());
        assert_eq!(config.inter_document_cross_references_prefix(), "api-");
        assert!(config.inline_schema());
    }

    #[rstest]
    #[case::basic("basic", RequestExamplesFormat::Basic)]
    #[case::curl("curl", RequestExamplesFormat::Curl)]
    #[case::invoke_web_request("invoke-webrequest", RequestExamplesFormat::InvokeWebRequest)]
    #[case::upper_case("CURL", RequestExamplesFormat::Curl)]
    fn should_deserialize_example_keys(
        #[case] format: &str,
        #[case] expected: RequestExamplesFormat,
    ) {
        let settings: ConvertSettings = serde_json::from_value(serde_json::json!({
            "requestExamplesFormat": format,
            "generatedExamplesEnabled": true
        }))
        .expect("valid settings");

        let config = ConvertConfig::try_from(settings).expect("valid config");

        assert_eq!(config.request_examples_format(), expected);
        assert!(config.generated_examples_enabled());
    }

    #[test]
    fn should_reject_unknown_request_examples_format() {
        let parsed = serde_json::from_value::<ConvertSettings>(serde_json::json!({
            "requestExamplesFormat": "wget"
        }));

        assert!(parsed.is_err());
    }

    #[test]
    fn should_report_invalid_header_pattern() {
        let settings = ConvertSettings {
            header_pattern: Some("no-group".to_string()),
            ..ConvertSettings::default()
        };

        let error = ConvertConfig::try_from(settings).expect_err("invalid pattern");

        assert_eq!(error.configuration_key(), Some("headerPattern"));
    }

    #[test]
    fn should_merge_settings_with_later_keys_winning() {
        let file = ConvertSettings {
            flat_body: Some(true),
            paths_document: Some("api".to_string()),
            ..ConvertSettings::default()
        };
        let cli = ConvertSettings {
            paths_document: Some("endpoints".to_string()),
            ..ConvertSettings::default()
        };

        let merged = file.merge(cli);

        assert_eq!(merged.flat_body, Some(true));
        assert_eq!(merged.paths_document.as_deref(), Some("endpoints"));
    }
}
