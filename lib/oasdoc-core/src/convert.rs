use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use utoipa::openapi::OpenApi;

use crate::config::ConvertConfig;
use crate::document::{self, SplitDocument};
use crate::error::ConvertError;
use crate::extension::ExtensionRegistry;
use crate::inline::NameRegistry;
use crate::markup::{MarkupDocument, normalize_name};
use crate::model::{DefinitionIndex, Method, PathOperation};

/// Anchors of the document titles.
const DOCUMENT_ANCHORS: [&str; 5] = [
    "overview",
    "paths",
    "resources",
    "definitions",
    "securityscheme",
];

/// State of one conversion run.
///
/// The context owns the [`NameRegistry`]: every unique name handed out during the run comes
/// from it, so two runs never share names and one run never hands out the same name twice.
/// Document anchors, definition names and operation ids are taken up front, in that order.
#[derive(Debug)]
pub struct ConversionContext<'a> {
    api: &'a OpenApi,
    config: &'a ConvertConfig,
    definitions: DefinitionIndex<'a>,
    operation_ids: HashMap<(Method, String), String>,
    registry: NameRegistry,
}

impl<'a> ConversionContext<'a> {
    /// Creates the context of a run.
    pub fn new(api: &'a OpenApi, config: &'a ConvertConfig) -> Self {
        let mut registry = NameRegistry::new();
        for anchor in DOCUMENT_ANCHORS {
            registry.reserve(anchor);
        }
        let definitions = DefinitionIndex::registered(api, &mut registry);

        let mut operation_ids = HashMap::new();
        for operation in PathOperation::collect(api) {
            let id = registry.register(&operation.id());
            // anchor of the link to a separated operation file
            registry.reserve(&format!("ref-{id}"));
            operation_ids.insert((operation.method(), operation.path().to_string()), id);
        }

        Self {
            api,
            config,
            definitions,
            operation_ids,
            registry,
        }
    }

    /// The converted model.
    pub fn api(&self) -> &'a OpenApi {
        self.api
    }

    /// The configuration of the run.
    pub fn config(&self) -> &'a ConvertConfig {
        self.config
    }

    /// The named definitions of the model.
    pub fn definitions(&self) -> DefinitionIndex<'a> {
        self.definitions.clone()
    }

    /// The unique id of an operation: its anchor, its file name and the prefix of its inline
    /// definitions.
    pub fn operation_id(&self, operation: &PathOperation) -> String {
        self.operation_ids
            .get(&(operation.method(), operation.path().to_string()))
            .cloned()
            .unwrap_or_else(|| normalize_name(&operation.id()))
    }

    /// The unique names taken so far.
    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    /// The registry, to take new names.
    pub fn registry_mut(&mut self) -> &mut NameRegistry {
        &mut self.registry
    }
}

/// A document and where it goes, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Relative path, with the markup language extension.
    pub path: PathBuf,
    /// The content.
    pub document: MarkupDocument,
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The overview document.
    pub overview: MarkupDocument,
    /// The paths document; empty when the model has no operation.
    pub paths: MarkupDocument,
    /// The definitions document; empty when the model has no definition.
    pub definitions: MarkupDocument,
    /// The security document; empty when the model has no security scheme.
    pub security: MarkupDocument,
    /// One file per operation, when operations are separated.
    pub operation_files: Vec<OutputFile>,
    /// One file per definition, when definitions are separated.
    pub definition_files: Vec<OutputFile>,
    document_paths: [PathBuf; 4],
}

impl ConversionOutput {
    /// Every non-empty document with its relative path: the four documents, then the separated
    /// operations and definitions.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &MarkupDocument)> {
        let documents = [
            &self.overview,
            &self.paths,
            &self.definitions,
            &self.security,
        ];
        self.document_paths
            .iter()
            .map(PathBuf::as_path)
            .zip(documents)
            .chain(
                self.operation_files
                    .iter()
                    .chain(&self.definition_files)
                    .map(|file| (file.path.as_path(), &file.document)),
            )
            .filter(|(_, document)| !document.is_empty())
    }

    /// Same as [`files`](Self::files), by value.
    pub fn into_files(self) -> Vec<OutputFile> {
        let Self {
            overview,
            paths,
            definitions,
            security,
            operation_files,
            definition_files,
            document_paths,
        } = self;

        document_paths
            .into_iter()
            .zip([overview, paths, definitions, security])
            .map(|(path, document)| OutputFile { path, document })
            .chain(operation_files)
            .chain(definition_files)
            .filter(|file| !file.document.is_empty())
            .collect()
    }
}

/// Converts OpenAPI models with a configuration and a set of extensions.
///
/// ```rust
/// use oasdoc_core::{ConvertConfig, Converter, ExtensionRegistry};
/// use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};
///
/// let extensions = ExtensionRegistry::default().with_model_extension(|api: &mut OpenApi| {
///     api.info.title = format!("{} (internal)", api.info.title);
/// });
/// let config = ConvertConfig::default();
/// let api = OpenApiBuilder::new()
///     .info(InfoBuilder::new().title("Pet store").version("1.0.0"))
///     .build();
///
/// let output = Converter::new(&config).with_extensions(extensions).convert(&api)?;
///
/// let files = output
///     .files()
///     .map(|(path, _)| path.display().to_string())
///     .collect::<Vec<_>>();
/// assert_eq!(files, ["overview.adoc"]);
/// # Ok::<(), oasdoc_core::ConvertError>(())
/// ```
#[derive(Debug)]
pub struct Converter<'c> {
    config: &'c ConvertConfig,
    extensions: ExtensionRegistry,
}

impl<'c> Converter<'c> {
    /// Creates a converter without extensions.
    pub fn new(config: &'c ConvertConfig) -> Self {
        Self {
            config,
            extensions: ExtensionRegistry::default(),
        }
    }

    /// Sets the extensions.
    #[must_use]
    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    /// Converts a model into the four documents and the separated files.
    ///
    /// # Errors
    ///
    /// Fails on malformed input (unresolvable or circular references) and on configuration
    /// that does not fit the model, e.g. grouping untagged operations by tag.
    pub fn convert(&self, api: &OpenApi) -> Result<ConversionOutput, ConvertError> {
        if self.extensions.has_model_extensions() {
            let mut api = api.clone();
            self.extensions.apply_model(&mut api);
            debug!("model rewritten by extensions");
            return self.convert_model(&api);
        }
        self.convert_model(api)
    }

    fn convert_model(&self, api: &OpenApi) -> Result<ConversionOutput, ConvertError> {
        let config = self.config;
        let mut context = ConversionContext::new(api, config);

        let overview = document::overview::build(&context, &self.extensions);
        let SplitDocument {
            document: paths,
            files: operation_files,
        } = document::paths::build(&mut context, &self.extensions)?;
        let SplitDocument {
            document: definitions,
            files: definition_files,
        } = document::definitions::build(&mut context, &self.extensions)?;
        let security = document::security::build(&context, &self.extensions);

        info!(
            title = %api.info.title,
            operation_files = operation_files.len(),
            definition_files = definition_files.len(),
            unique_names = context.registry().len(),
            "conversion done"
        );

        let document_path =
            |name: &str| PathBuf::from(format!("{name}{}", config.extension()));
        Ok(ConversionOutput {
            overview,
            paths,
            definitions,
            security,
            operation_files,
            definition_files,
            document_paths: [
                document_path(config.overview_document()),
                document_path(config.paths_document()),
                document_path(config.definitions_document()),
                document_path(config.security_document()),
            ],
        })
    }
}

/// Converts a model without extensions.
///
/// # Errors
///
/// See [`Converter::convert`].
pub fn convert(api: &OpenApi, config: &ConvertConfig) -> Result<ConversionOutput, ConvertError> {
    Converter::new(config).convert(api)
}

#[cfg(test)]
mod tests {
    use utoipa::openapi::path::{OperationBuilder, PathItemBuilder};
    use utoipa::openapi::{
        ComponentsBuilder, HttpMethod, InfoBuilder, ObjectBuilder, OpenApiBuilder, PathsBuilder,
    };

    use super::*;

    #[test]
    fn should_reserve_definition_names() {
        let api = OpenApiBuilder::new()
            .components(Some(
                ComponentsBuilder::new()
                    .schema("Pet", ObjectBuilder::new())
                    .schema("Order Item", ObjectBuilder::new())
                    .build(),
            ))
            .build();
        let config = ConvertConfig::default();

        let mut context = ConversionContext::new(&api, &config);

        assert_eq!(context.registry().len(), DOCUMENT_ANCHORS.len() + 2);
        assert_eq!(context.registry_mut().register("Order item"), "order-item-2");
    }

    #[test]
    fn should_register_operation_ids_after_definitions() {
        let operation = |id: &str| OperationBuilder::new().operation_id(Some(id)).build();
        let api = OpenApiBuilder::new()
            .paths(
                PathsBuilder::new()
                    .path(
                        "/pets",
                        PathItemBuilder::new()
                            .operation(HttpMethod::Get, operation("pet"))
                            .operation(HttpMethod::Post, operation("Pet"))
                            .build(),
                    )
                    .path(
                        "/paths",
                        PathItemBuilder::new()
                            .operation(HttpMethod::Get, operation("Paths"))
                            .build(),
                    ),
            )
            .components(Some(
                ComponentsBuilder::new()
                    .schema("Pet", ObjectBuilder::new())
                    .schema("Definitions", ObjectBuilder::new())
                    .build(),
            ))
            .build();
        let config = ConvertConfig::default();

        let context = ConversionContext::new(&api, &config);

        let definitions = context.definitions();
        assert_eq!(definitions.unique_name("Definitions"), Some("definitions-2"));
        assert_eq!(definitions.unique_name("Pet"), Some("pet"));
        let id = |method, path: &str| {
            context.operation_id(&PathOperation::new(
                method,
                path,
                OperationBuilder::new().build(),
            ))
        };
        assert_eq!(id(Method::Get, "/paths"), "paths-2");
        assert_eq!(id(Method::Get, "/pets"), "pet-2");
        assert_eq!(id(Method::Post, "/pets"), "pet-3");
        assert!(context.registry().contains("ref-pet-2"));
    }

    #[test]
    fn should_list_non_empty_documents() {
        let api = OpenApiBuilder::new()
            .info(InfoBuilder::new().title("Pet store").version("1.0.0"))
            .components(Some(
                ComponentsBuilder::new()
                    .schema("Pet", ObjectBuilder::new())
                    .build(),
            ))
            .build();
        let config = ConvertConfig::builder()
            .with_markup_language(crate::MarkupLanguage::Markdown)
            .build()
            .expect("valid config");

        let output = convert(&api, &config).expect("converted");

        let paths = output
            .files()
            .map(|(path, _)| path.to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(paths, ["overview.md", "definitions.md"]);
        assert_eq!(output.into_files().len(), 2);
    }
}
