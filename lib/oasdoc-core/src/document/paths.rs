//! The paths document.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;
use utoipa::openapi::RefOr;
use utoipa::openapi::response::Response;

use super::components::{
    OPTIONAL, REQUIRED, SchemaFacts, inline_definitions, labelled_lines, name_cell, object_content,
    push_line, resolve_type, type_cell,
};
use super::examples::{OperationExamples, write_examples};
use super::{ServerUri, SplitDocument, separated_file};
use crate::config::GroupBy;
use crate::convert::{ConversionContext, OutputFile};
use crate::error::ConvertError;
use crate::extension::{DocumentKind, ExtensionRegistry, Position, Scope};
use crate::inline::InlineExtractor;
use crate::mapper::SchemaMapper;
use crate::markup::{AdmonitionKind, Column, Inline, MarkupDocBuilder};
use crate::model::{ParameterEntry, ParameterLocation, PathOperation, json_text};
use crate::ordering::{group_by_regex, group_by_tags, sort_by_ordering};
use crate::resolver::{
    DefinitionResolverFromOperation, DocumentResolver, OperationFileResolver, SecurityResolver,
};
use crate::types::{ObjectType, Type};

const DEPRECATED: &str = "This operation is deprecated.";
const NO_CONTENT: &str = "No Content";
const UNKNOWN: &str = "UNKNOWN";

/// How the request body of an operation is documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyLayout {
    /// A `body` row in the parameters table.
    Table,
    /// A dedicated section; an object body shows its properties table directly.
    Flat,
}

/// Builds the paths document, and the separated operation files when enabled.
pub(crate) fn build(
    context: &mut ConversionContext<'_>,
    extensions: &ExtensionRegistry,
) -> Result<SplitDocument, ConvertError> {
    let config = context.config();
    let mut builder = MarkupDocBuilder::new(config.anchor_prefix());
    let mut files = Vec::new();

    let mut operations = PathOperation::collect(context.api());
    if operations.is_empty() {
        return Ok(SplitDocument::default());
    }

    let scope = Scope::Document(DocumentKind::Paths);
    extensions.apply(scope, Position::Before, None, &mut builder);
    match config.group_by() {
        GroupBy::AsIs => builder.section_title(1, "Paths", Some("paths")),
        GroupBy::Tags | GroupBy::Regex => {
            builder.section_title(1, "Resources", Some("resources"))
        }
    };
    extensions.apply(scope, Position::Begin, None, &mut builder);

    let mut writer = OperationWriter {
        context,
        extensions,
        files: &mut files,
        written: HashSet::new(),
    };
    match config.group_by() {
        GroupBy::AsIs => {
            sort_by_ordering(&mut operations, config.operation_ordering(), |operation| {
                operation
            });
            for operation in &operations {
                writer.write(&mut builder, operation)?;
            }
        }
        GroupBy::Tags => {
            let groups =
                group_by_tags(operations, config.tag_ordering(), config.operation_ordering())?;
            for (tag, operations) in groups {
                let anchor = writer
                    .context
                    .registry_mut()
                    .register(&format!("{tag}_resource"));
                builder.section_title(2, title_case(&tag), Some(&anchor));
                let description = writer
                    .context
                    .api()
                    .tags
                    .iter()
                    .flatten()
                    .find(|declared| declared.name == tag)
                    .and_then(|declared| declared.description.as_deref());
                builder.text_paragraph(description);
                for operation in &operations {
                    writer.write(&mut builder, operation)?;
                }
            }
        }
        GroupBy::Regex => {
            let groups = group_by_regex(
                operations,
                config.header_pattern(),
                config.operation_ordering(),
            )?;
            for (header, operations) in groups {
                let anchor = writer
                    .context
                    .registry_mut()
                    .register(&format!("{header}_resource"));
                builder.section_title(2, title_case(&header), Some(&anchor));
                for operation in &operations {
                    writer.write(&mut builder, operation)?;
                }
            }
        }
    }

    extensions.apply(scope, Position::End, None, &mut builder);
    extensions.apply(scope, Position::After, None, &mut builder);
    Ok(SplitDocument {
        document: builder.build(),
        files,
    })
}

fn title_case(name: &str) -> String {
    use cruet::*;

    match name.to_title_case() {
        title if title.is_empty() => name.to_string(),
        title => title,
    }
}

struct OperationWriter<'w, 'a> {
    context: &'w mut ConversionContext<'a>,
    extensions: &'w ExtensionRegistry,
    files: &'w mut Vec<OutputFile>,
    /// Unique ids of the operations already written.
    written: HashSet<String>,
}

impl<'a> OperationWriter<'_, 'a> {
    /// Title level of an operation; sections of the operation sit one level below.
    fn level(&self) -> u8 {
        match self.context.config().group_by() {
            GroupBy::AsIs => 2,
            GroupBy::Tags | GroupBy::Regex => 3,
        }
    }

    fn write(
        &mut self,
        builder: &mut MarkupDocBuilder,
        operation: &PathOperation,
    ) -> Result<(), ConvertError> {
        let config = self.context.config();
        let id = self.context.operation_id(operation);

        if !self.written.insert(id.clone()) {
            // an operation with several tags is written in its first group only
            let title = operation.title();
            builder.section_title(self.level(), title.clone(), None);
            let link = builder.cross_reference(
                OperationFileResolver::new(config).resolve(&id),
                &id,
                title,
            );
            builder.paragraph(vec![link]);
            debug!(%operation, %id, "operation already written, linked");
            return Ok(());
        }

        if config.separated_operations() {
            let mut file_builder = builder.fork();
            self.operation(&mut file_builder, operation, &id)?;
            let path = separated_file(config, config.separated_operations_folder(), &id);
            debug!(%operation, path = %path.display(), "separated operation file");
            self.files.push(OutputFile {
                path,
                document: file_builder.build(),
            });

            let title = operation.title();
            builder.section_title(self.level(), title.clone(), Some(&format!("ref-{id}")));
            let link = builder.cross_reference(
                OperationFileResolver::new(config).resolve(&id),
                &id,
                title,
            );
            builder.paragraph(vec![link]);
        } else {
            self.operation(builder, operation, &id)?;
        }

        debug!(%operation, %id, "operation processed");
        Ok(())
    }

    fn operation(
        &mut self,
        builder: &mut MarkupDocBuilder,
        operation: &PathOperation,
        id: &str,
    ) -> Result<(), ConvertError> {
        let config = self.context.config();
        let resolver = DefinitionResolverFromOperation::new(config);
        let level = self.level();
        let subject = operation.id();
        let subject = Some(subject.as_str());
        let mut inline = Vec::new();

        self.extensions
            .apply(Scope::Operation, Position::Before, subject, builder);
        builder.section_title(level, operation.title(), Some(id));
        self.extensions
            .apply(Scope::Operation, Position::Begin, subject, builder);

        builder.listing(
            None,
            format!(
                "{} {}{}",
                operation.method(),
                self.base_path(),
                operation.path()
            ),
        );
        if operation.is_deprecated() {
            builder.admonition(AdmonitionKind::Caution, vec![Inline::text(DEPRECATED)]);
        }
        if let Some(description) = operation
            .operation()
            .description
            .as_deref()
            .filter(|description| !description.trim().is_empty())
        {
            builder.section_title(level + 1, "Description", None);
            builder.text_paragraph(Some(description));
        }

        let layout = if config.flat_body() {
            BodyLayout::Flat
        } else {
            BodyLayout::Table
        };
        let mut parameters = operation.parameters();
        sort_by_ordering(&mut parameters, config.parameter_ordering(), |parameter| {
            parameter
        });
        let (bodies, parameters): (Vec<_>, Vec<_>) =
            parameters.into_iter().partition(|parameter| {
                layout == BodyLayout::Flat && parameter.location() == ParameterLocation::Body
            });

        self.parameters(builder, &resolver, &parameters, id, &mut inline)?;
        for body in &bodies {
            self.flat_body(builder, &resolver, body, id, &mut inline)?;
        }
        self.responses(builder, &resolver, operation, id, &mut inline)?;
        self.examples(builder, operation)?;
        self.media_types(builder, "Consumes", operation.consumes());
        self.media_types(builder, "Produces", operation.produces());
        self.tags(builder, operation);
        if config.path_security_section() {
            self.security(builder, operation);
        }

        self.extensions
            .apply(Scope::Operation, Position::End, subject, builder);
        inline_definitions(self.context, &resolver, builder, inline, level + 1)?;
        self.extensions
            .apply(Scope::Operation, Position::After, subject, builder);
        Ok(())
    }

    fn base_path(&self) -> String {
        if !self.context.config().base_path_prefix() {
            return String::new();
        }
        self.context
            .api()
            .servers
            .iter()
            .flatten()
            .next()
            .and_then(|server| ServerUri::parse(&server.url).base_path)
            .unwrap_or_default()
    }

    fn parameters(
        &mut self,
        builder: &mut MarkupDocBuilder,
        resolver: &dyn DocumentResolver,
        parameters: &[ParameterEntry],
        id: &str,
        inline: &mut Vec<ObjectType>,
    ) -> Result<(), ConvertError> {
        let mut rows = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let ty = match parameter.schema() {
                Some(schema) => resolve_type(
                    self.context,
                    resolver,
                    schema,
                    parameter.name(),
                    id,
                    inline,
                )?
                .with_collection_format(parameter.collection_format()),
                None => Type::basic("string", None),
            };
            let facts = parameter.schema().map(SchemaFacts::of).unwrap_or_default();

            let mut name = name_cell(parameter.name(), parameter.is_required(), false);
            if parameter.is_deprecated() {
                push_line(&mut name, [Inline::italic("deprecated")]);
            }
            let description = parameter
                .description()
                .or(facts.description.as_deref())
                .map(|description| vec![Inline::text(description.trim())])
                .unwrap_or_default();
            let default = facts
                .default
                .map(|default| vec![Inline::literal(default)])
                .unwrap_or_default();

            rows.push(vec![
                vec![Inline::bold(location_label(parameter.location()))],
                name,
                description,
                type_cell(&ty, builder),
                default,
            ]);
        }

        if !rows.is_empty() {
            builder.section_title(self.level() + 1, "Parameters", None);
            builder.table(
                vec![
                    Column::new("Type", 2),
                    Column::new("Name", 3),
                    Column::new("Description", 9).as_header(),
                    Column::new("Schema", 4).as_header(),
                    Column::new("Default", 2).as_header(),
                ],
                rows,
            );
        }
        Ok(())
    }

    fn flat_body(
        &mut self,
        builder: &mut MarkupDocBuilder,
        resolver: &dyn DocumentResolver,
        body: &ParameterEntry,
        id: &str,
        inline: &mut Vec<ObjectType>,
    ) -> Result<(), ConvertError> {
        builder.section_title(self.level() + 1, "Body parameter", None);
        builder.text_paragraph(body.description());

        let flags = if body.is_required() {
            REQUIRED
        } else {
            OPTIONAL
        };
        let mut infos = labelled_lines([
            ("Name", body.name().to_string()),
            ("Flags", flags.to_string()),
        ]);

        let mapped = match body.schema() {
            Some(schema) => SchemaMapper::new(self.context.definitions(), resolver).map(schema)?,
            None => Type::basic("string", None),
        };
        match mapped {
            Type::Object(object) => {
                builder.paragraph(infos);
                object_content(self.context, resolver, builder, &object, id, inline)?;
            }
            other => {
                let ty = if self.context.config().inline_schema() {
                    InlineExtractor::new(self.context.registry_mut()).extract(
                        other,
                        body.name(),
                        id,
                        inline,
                    )
                } else {
                    other
                };
                push_line(&mut infos, [Inline::italic("Type"), Inline::text(" : ")]);
                infos.extend(type_cell(&ty, builder));
                builder.paragraph(infos);
            }
        }
        Ok(())
    }

    fn responses(
        &mut self,
        builder: &mut MarkupDocBuilder,
        resolver: &dyn DocumentResolver,
        operation: &PathOperation,
        id: &str,
        inline: &mut Vec<ObjectType>,
    ) -> Result<(), ConvertError> {
        let responses = self.ordered_responses(operation)?;

        let mut rows = Vec::with_capacity(responses.len());
        for (code, response) in responses {
            let schema = response
                .content
                .iter()
                .find(|(media_type, _)| media_type.contains("json"))
                .or_else(|| response.content.iter().next())
                .and_then(|(_, content)| content.schema.as_ref());
            let schema_cell = match schema {
                Some(schema) => {
                    let display = format!("Response {code}");
                    let ty = resolve_type(self.context, resolver, schema, &display, id, inline)?;
                    type_cell(&ty, builder)
                }
                None => vec![Inline::text(NO_CONTENT)],
            };

            let mut description = Vec::new();
            if !response.description.trim().is_empty() {
                description.push(Inline::text(response.description.trim()));
            }
            if !response.headers.is_empty() {
                push_line(&mut description, [Inline::bold("Headers"), Inline::text(" :")]);
                for (name, header) in &response.headers {
                    let ty = SchemaMapper::new(self.context.definitions(), resolver)
                        .map(&header.schema)?;
                    let mut line = vec![Inline::literal(name), Inline::text(format!(" ({ty})"))];
                    let text = header.description.as_deref().map(str::trim);
                    if let Some(text) = text.filter(|text| !text.is_empty()) {
                        let period = if text.ends_with('.') { "" } else { "." };
                        line.push(Inline::text(format!(" : {text}{period}")));
                    }
                    push_line(&mut description, line);
                }
            }
            let links = json_value(response)
                .and_then(|response| response.get("links").and_then(Value::as_object).cloned())
                .unwrap_or_default();
            if !links.is_empty() {
                push_line(&mut description, [Inline::bold("Links"), Inline::text(" :")]);
                for (name, link) in &links {
                    push_line(&mut description, link_line(name, link));
                }
            }

            rows.push(vec![vec![Inline::bold(code)], description, schema_cell]);
        }

        if !rows.is_empty() {
            builder.section_title(self.level() + 1, "Responses", None);
            builder.table(
                vec![
                    Column::new("HTTP Code", 2),
                    Column::new("Description", 14).as_header(),
                    Column::new("Schema", 4).as_header(),
                ],
                rows,
            );
        }
        Ok(())
    }

    /// Responses of an operation in the response ordering, shared ones resolved.
    fn ordered_responses<'o>(
        &self,
        operation: &'o PathOperation,
    ) -> Result<Vec<(&'o str, &'o Response)>, ConvertError>
    where
        'a: 'o,
    {
        let mut responses = operation
            .operation()
            .responses
            .responses
            .iter()
            .collect::<Vec<_>>();
        sort_by_ordering(
            &mut responses,
            self.context.config().response_ordering(),
            |(code, _)| code.as_str(),
        );
        responses
            .into_iter()
            .map(|(code, response)| Ok((code.as_str(), self.response(response)?)))
            .collect()
    }

    /// Example request and responses, declared or generated.
    fn examples(
        &self,
        builder: &mut MarkupDocBuilder,
        operation: &PathOperation,
    ) -> Result<(), ConvertError> {
        let config = self.context.config();
        let examples = OperationExamples::new(
            self.context.definitions(),
            config.generated_examples_enabled(),
        );
        let path = format!("{}{}", self.base_path(), operation.path());
        let request = examples.request(
            operation.method(),
            &path,
            &operation.parameters(),
            operation.operation().request_body.as_ref(),
        );
        let responses = examples.responses(&self.ordered_responses(operation)?);

        write_examples(
            builder,
            self.level() + 1,
            config.request_examples_format(),
            request.as_ref(),
            &responses,
        );
        Ok(())
    }

    /// A response, following a `$ref` to the shared responses.
    fn response<'r>(&self, response: &'r RefOr<Response>) -> Result<&'r Response, ConvertError>
    where
        'a: 'r,
    {
        match response {
            RefOr::T(response) => Ok(response),
            RefOr::Ref(reference) => {
                let location = reference.ref_location.as_str();
                let name = location.rsplit('/').next().unwrap_or(location);
                self.context
                    .api()
                    .components
                    .as_ref()
                    .and_then(|components| components.responses.get(name))
                    .and_then(|shared| match shared {
                        RefOr::T(shared) => Some(shared),
                        RefOr::Ref(_) => None,
                    })
                    .ok_or_else(|| ConvertError::UnresolvedReference {
                        reference: location.to_string(),
                        name: name.to_string(),
                    })
            }
        }
    }

    fn media_types(&self, builder: &mut MarkupDocBuilder, title: &str, media_types: Vec<String>) {
        if media_types.is_empty() {
            return;
        }
        builder.section_title(self.level() + 1, title, None);
        builder.list(
            media_types
                .into_iter()
                .map(|media_type| vec![Inline::literal(media_type)])
                .collect(),
        );
    }

    fn tags(&self, builder: &mut MarkupDocBuilder, operation: &PathOperation) {
        let config = self.context.config();
        if config.group_by() == GroupBy::Tags || operation.tags().is_empty() {
            return;
        }
        let mut tags = operation
            .tags()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        sort_by_ordering(&mut tags, config.tag_ordering(), |tag| *tag);

        builder.section_title(self.level() + 1, "Tags", None);
        builder.list(tags.into_iter().map(|tag| vec![Inline::text(tag)]).collect());
    }

    fn security(&self, builder: &mut MarkupDocBuilder, operation: &PathOperation) {
        let api = self.context.api();
        let resolver = SecurityResolver::new(self.context.config());
        let requirements = operation
            .operation()
            .security
            .as_ref()
            .or(api.security.as_ref())
            .and_then(json_value);

        let mut rows = Vec::new();
        for requirement in requirements.iter().flat_map(|requirements| {
            requirements
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_object)
        }) {
            for (name, scopes) in requirement {
                let kind = api
                    .components
                    .as_ref()
                    .and_then(|components| components.security_schemes.get(name))
                    .and_then(json_value)
                    .and_then(|scheme| scheme.get("type").and_then(json_text))
                    .unwrap_or_else(|| UNKNOWN.to_string());
                let scopes = scopes
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(json_text)
                    .collect::<Vec<_>>()
                    .join(",");

                rows.push(vec![
                    vec![Inline::bold(kind)],
                    vec![builder.cross_reference(resolver.resolve(name), name, name.as_str())],
                    vec![Inline::text(scopes)],
                ]);
            }
        }

        if !rows.is_empty() {
            builder.section_title(self.level() + 1, "Security", None);
            builder.table(
                vec![
                    Column::new("Type", 3),
                    Column::new("Name", 4),
                    Column::new("Scopes", 13).as_header(),
                ],
                rows,
            );
        }
    }
}

/// One response link: its name, target operation, parameters and description.
fn link_line(name: &str, link: &Value) -> Vec<Inline> {
    let text = |key: &str| {
        link.get(key)
            .and_then(json_text)
            .filter(|text| !text.trim().is_empty())
    };

    let mut line = vec![Inline::literal(name)];
    if let Some(target) = text("operationId")
        .or_else(|| text("operationRef"))
        .or_else(|| text("$ref"))
    {
        line.extend([
            Inline::text(" : "),
            Inline::italic("Operation"),
            Inline::text(format!(" {target}")),
        ]);
    }
    if let Some(parameters) = link
        .get("parameters")
        .filter(|parameters| parameters.as_object().is_some_and(|map| !map.is_empty()))
    {
        line.extend([
            Inline::text(", "),
            Inline::italic("Parameters"),
            Inline::text(format!(" {parameters}")),
        ]);
    }
    if let Some(description) = text("description") {
        line.push(Inline::text(format!(" : {description}")));
    }
    line
}

/// `formData` becomes `FormData`.
fn location_label(location: ParameterLocation) -> String {
    use cruet::*;

    location.as_str().to_pascal_case()
}

fn json_value<T: serde::Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

#[cfg(test)]
mod tests {
    use utoipa::openapi::path::{
        OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder,
    };
    use utoipa::openapi::request_body::RequestBodyBuilder;
    use utoipa::openapi::response::ResponseBuilder;
    use utoipa::openapi::schema::{ObjectBuilder, Ref, Type as SchemaType};
    use utoipa::openapi::{
        ComponentsBuilder, ContentBuilder, HttpMethod, OpenApi, OpenApiBuilder, PathsBuilder,
        Required,
    };

    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::config::{ConvertConfig, RequestExamplesFormat};
    use crate::markup::{Block, MarkupDocument};

    fn pet_store() -> OpenApi {
        let list = OperationBuilder::new()
            .operation_id(Some("listPets"))
            .summary(Some("List pets"))
            .tags(Some(vec!["pet".to_string()]))
            .parameter(
                ParameterBuilder::new()
                    .name("limit")
                    .parameter_in(ParameterIn::Query)
                    .description(Some("Maximum number of pets"))
                    .schema(Some(ObjectBuilder::new().schema_type(SchemaType::Integer))),
            )
            .response(
                "200",
                ResponseBuilder::new().description("The pets").content(
                    "application/json",
                    ContentBuilder::new()
                        .schema(Some(Ref::from_schema_name("Pet")))
                        .build(),
                ),
            );
        let create = OperationBuilder::new()
            .operation_id(Some("addPet"))
            .tags(Some(vec!["pet".to_string(), "store".to_string()]))
            .request_body(Some(
                RequestBodyBuilder::new()
                    .content(
                        "application/json",
                        ContentBuilder::new()
                            .schema(Some(
                                ObjectBuilder::new()
                                    .property("name", ObjectBuilder::new().schema_type(SchemaType::String))
                                    .property(
                                        "owner",
                                        ObjectBuilder::new().property(
                                            "email",
                                            ObjectBuilder::new().schema_type(SchemaType::String),
                                        ),
                                    )
                                    .required("name"),
                            ))
                            .build(),
                    )
                    .required(Some(Required::True))
                    .build(),
            ))
            .response("201", ResponseBuilder::new().description("Created"));

        OpenApiBuilder::new()
            .paths(
                PathsBuilder::new().path(
                    "/pets",
                    PathItemBuilder::new()
                        .operation(HttpMethod::Get, list.build())
                        .operation(HttpMethod::Post, create.build())
                        .build(),
                ),
            )
            .components(Some(
                ComponentsBuilder::new()
                    .schema(
                        "Pet",
                        ObjectBuilder::new()
                            .property("name", ObjectBuilder::new().schema_type(SchemaType::String)),
                    )
                    .build(),
            ))
            .build()
    }

    fn paths(api: &OpenApi, config: &ConvertConfig) -> SplitDocument {
        let mut context = ConversionContext::new(api, config);
        build(&mut context, &ExtensionRegistry::default()).expect("paths document")
    }

    fn titles(document: &MarkupDocument) -> Vec<String> {
        document
            .section_titles()
            .map(|(level, title)| format!("{level} {title}"))
            .collect()
    }

    #[test]
    fn should_build_operations_in_natural_order() {
        let api = pet_store();
        let config = ConvertConfig::builder()
            .with_operation_ordering(crate::Ordering::Natural)
            .build()
            .expect("valid config");

        let SplitDocument { document, files } = paths(&api, &config);

        assert!(files.is_empty());
        insta::assert_snapshot!(titles(&document).join("\n"), @r"
        1 Paths
        2 POST /pets
        3 Parameters
        3 Responses
        3 Consumes
        3 Tags
        3 body
        3 owner
        2 List pets
        3 Parameters
        3 Responses
        3 Produces
        3 Tags
        ");
    }

    #[test]
    fn should_anchor_inline_definitions_with_operation_id() {
        let api = pet_store();
        let config = ConvertConfig::default();

        let SplitDocument { document, .. } = paths(&api, &config);

        let anchors = document.anchors().collect::<Vec<_>>();
        assert!(anchors.contains(&"addpet-body"));
        assert!(anchors.contains(&"addpet-body-owner"));
        assert!(anchors.contains(&"listpets"));
    }

    #[test]
    fn should_group_operations_by_tag() {
        let api = pet_store();
        let config = ConvertConfig::builder()
            .with_group_by(GroupBy::Tags)
            .build()
            .expect("valid config");

        let SplitDocument { document, .. } = paths(&api, &config);

        let groups = document
            .section_titles()
            .filter(|(level, _)| *level <= 2)
            .map(|(_, title)| title)
            .collect::<Vec<_>>();
        assert_eq!(groups, ["Resources", "Pet", "Store"]);
        assert!(document.anchors().any(|anchor| anchor == "pet-resource"));
    }

    #[test]
    fn should_flatten_object_body() {
        let api = pet_store();
        let config = ConvertConfig::builder()
            .with_flat_body(true)
            .build()
            .expect("valid config");

        let SplitDocument { document, .. } = paths(&api, &config);

        let titles = titles(&document);
        assert!(titles.contains(&"3 Body parameter".to_string()));
        assert!(!titles.contains(&"3 body".to_string()));
        assert!(titles.contains(&"3 owner".to_string()));
    }

    #[test]
    fn should_split_operations_into_files() {
        let api = pet_store();
        let config = ConvertConfig::builder()
            .with_output_directory("docs")
            .with_separated_operations(true)
            .with_separated_definitions(true)
            .build()
            .expect("valid config");

        let SplitDocument { document, files } = paths(&api, &config);

        let paths = files
            .iter()
            .map(|file| file.path.to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(paths, ["operations/listpets.adoc", "operations/addpet.adoc"]);
        assert!(document.anchors().any(|anchor| anchor == "ref-listpets"));
        assert!(document.cross_references().iter().any(|link| matches!(
            link,
            Inline::CrossReference { document: Some(path), .. } if path == "operations/listpets.adoc"
        )));

        let list_pets = &files[0].document;
        assert!(list_pets.cross_references().iter().any(|link| matches!(
            link,
            Inline::CrossReference { document: Some(path), anchor, .. }
                if path == "../definitions/pet.adoc" && anchor == "pet"
        )));
    }

    #[test]
    fn should_mark_deprecated_operations() {
        let operation = OperationBuilder::new()
            .operation_id(Some("legacy"))
            .deprecated(Some(utoipa::openapi::Deprecated::True));
        let api = OpenApiBuilder::new()
            .paths(PathsBuilder::new().path(
                "/legacy",
                PathItemBuilder::new()
                    .operation(HttpMethod::Get, operation.build())
                    .build(),
            ))
            .build();

        let SplitDocument { document, .. } = paths(&api, &ConvertConfig::default());

        assert!(document.blocks().iter().any(|block| matches!(
            block,
            Block::Admonition { kind: AdmonitionKind::Caution, .. }
        )));
        assert!(document.blocks().contains(&Block::Listing {
            language: None,
            content: "GET /legacy".to_string(),
        }));
    }

    fn colliding_operations() -> OpenApi {
        let get_pet = OperationBuilder::new()
            .operation_id(Some("getPet"))
            .summary(Some("Get a pet"))
            .tags(Some(vec!["x".to_string(), "y".to_string()]))
            .parameter(
                ParameterBuilder::new()
                    .name("filter")
                    .parameter_in(ParameterIn::Query)
                    .schema(Some(ObjectBuilder::new().property(
                        "name",
                        ObjectBuilder::new().schema_type(SchemaType::String),
                    ))),
            )
            .response("200", ResponseBuilder::new().description("The pet"));
        let filter = OperationBuilder::new()
            .operation_id(Some("getPet filter"))
            .tags(Some(vec!["x".to_string()]))
            .response("200", ResponseBuilder::new().description("The filter"));

        OpenApiBuilder::new()
            .paths(
                PathsBuilder::new()
                    .path(
                        "/pets/{id}",
                        PathItemBuilder::new()
                            .operation(HttpMethod::Get, get_pet.build())
                            .build(),
                    )
                    .path(
                        "/pets/filter",
                        PathItemBuilder::new()
                            .operation(HttpMethod::Get, filter.build())
                            .build(),
                    ),
            )
            .build()
    }

    #[rstest]
    #[case::as_is(GroupBy::AsIs)]
    #[case::tags(GroupBy::Tags)]
    fn should_keep_operation_anchors_distinct(#[case] group_by: GroupBy) {
        let api = colliding_operations();
        let config = ConvertConfig::builder()
            .with_group_by(group_by)
            .build()
            .expect("valid config");

        let SplitDocument { document, .. } = paths(&api, &config);

        let anchors = document.anchors().collect::<Vec<_>>();
        let distinct = anchors.iter().collect::<HashSet<_>>();
        assert_eq!(distinct.len(), anchors.len(), "duplicated anchors in {anchors:?}");
        assert!(anchors.contains(&"getpet"));
        assert!(anchors.contains(&"getpet-filter"));
        assert!(anchors.contains(&"getpet-filter-2"));
    }

    #[test]
    fn should_link_repeated_operation_to_its_first_group() {
        let api = colliding_operations();
        let config = ConvertConfig::builder()
            .with_group_by(GroupBy::Tags)
            .build()
            .expect("valid config");

        let SplitDocument { document, .. } = paths(&api, &config);

        let get_pet_titles = document
            .section_titles()
            .filter(|(_, title)| *title == "Get a pet")
            .count();
        assert_eq!(get_pet_titles, 2);
        assert_eq!(
            document.anchors().filter(|anchor| *anchor == "getpet").count(),
            1
        );
        assert!(document.cross_references().contains(&&Inline::CrossReference {
            document: None,
            anchor: "getpet".to_string(),
            label: "Get a pet".to_string(),
        }));
    }

    fn documented_pet() -> OpenApi {
        let get = OperationBuilder::new()
            .operation_id(Some("getPet"))
            .parameter(
                ParameterBuilder::new()
                    .name("petId")
                    .parameter_in(ParameterIn::Path)
                    .required(Required::True)
                    .schema(Some(ObjectBuilder::new().schema_type(SchemaType::Integer)))
                    .example(Some(json!(7))),
            )
            .parameter(
                ParameterBuilder::new()
                    .name("X-Request-Id")
                    .parameter_in(ParameterIn::Header)
                    .schema(Some(ObjectBuilder::new().schema_type(SchemaType::String))),
            )
            .response(
                "200",
                ResponseBuilder::new().description("The pet").content(
                    "application/json",
                    ContentBuilder::new()
                        .schema(Some(Ref::from_schema_name("Pet")))
                        .example(Some(json!({ "name": "doggie" })))
                        .build(),
                ),
            );

        OpenApiBuilder::new()
            .paths(PathsBuilder::new().path(
                "/pets/{petId}",
                PathItemBuilder::new()
                    .operation(HttpMethod::Get, get.build())
                    .build(),
            ))
            .components(Some(
                ComponentsBuilder::new()
                    .schema(
                        "Pet",
                        ObjectBuilder::new()
                            .property("name", ObjectBuilder::new().schema_type(SchemaType::String)),
                    )
                    .build(),
            ))
            .build()
    }

    #[test]
    fn should_show_declared_examples() {
        let api = documented_pet();
        let config = ConvertConfig::builder()
            .with_request_examples_format(RequestExamplesFormat::Curl)
            .build()
            .expect("valid config");

        let SplitDocument { document, .. } = paths(&api, &config);

        let titles = titles(&document);
        insta::assert_snapshot!(titles.join("\n"), @r"
        1 Paths
        2 GET /pets/{petId}
        3 Parameters
        3 Responses
        3 Example HTTP request
        4 Request path
        3 Example HTTP response
        4 Response 200
        3 Produces
        ");
        assert!(document.blocks().contains(&Block::Listing {
            language: Some("bash".to_string()),
            content: r#"curl -s -S -H "X-Request-Id: {X-Request-Id}" -X GET "/pets/7""#.to_string(),
        }));
        assert!(document.blocks().contains(&Block::Listing {
            language: Some("json".to_string()),
            content: "{\n  \"name\": \"doggie\"\n}".to_string(),
        }));
    }

    #[test]
    fn should_skip_examples_when_none_declared() {
        let api = pet_store();

        let SplitDocument { document, .. } = paths(&api, &ConvertConfig::default());

        assert!(
            !titles(&document)
                .iter()
                .any(|title| title.contains("Example HTTP"))
        );
    }

    #[test]
    fn should_generate_examples_when_enabled() {
        let api = pet_store();
        let config = ConvertConfig::builder()
            .with_generated_examples_enabled(true)
            .build()
            .expect("valid config");

        let SplitDocument { document, .. } = paths(&api, &config);

        let listings = document
            .blocks()
            .iter()
            .filter_map(|block| match block {
                Block::Listing { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert!(listings.contains(&"/pets?limit=0"));
        assert!(listings.contains(&"/pets"));
        let body = serde_json::from_str::<Value>(
            listings
                .iter()
                .find(|listing| listing.contains("owner"))
                .expect("generated body"),
        )
        .expect("json body");
        assert_eq!(body, json!({ "name": "string", "owner": { "email": "string" } }));
        assert!(listings.contains(&"{\n  \"name\": \"string\"\n}"));
    }

    #[test]
    fn should_describe_response_links() {
        let link = json!({
            "operationId": "getOwner",
            "parameters": { "ownerId": "$response.body#/ownerId" },
            "description": "The owner of the pet"
        });

        let line = link_line("owner", &link);

        assert_eq!(
            line,
            [
                Inline::literal("owner"),
                Inline::text(" : "),
                Inline::italic("Operation"),
                Inline::text(" getOwner"),
                Inline::text(", "),
                Inline::italic("Parameters"),
                Inline::text(r#" {"ownerId":"$response.body#/ownerId"}"#),
                Inline::text(" : The owner of the pet"),
            ]
        );
    }
}
