//! The definitions document.

use tracing::debug;

use super::components::{SchemaFacts, inline_definitions, labelled_lines, object_content, type_cell};
use super::{SplitDocument, separated_file};
use crate::convert::{ConversionContext, OutputFile};
use crate::error::ConvertError;
use crate::extension::{DocumentKind, ExtensionRegistry, Position, Scope};
use crate::inline::InlineExtractor;
use crate::mapper::SchemaMapper;
use crate::markup::{Inline, MarkupDocBuilder};
use crate::ordering::sort_by_ordering;
use crate::resolver::{DefinitionFileResolver, DefinitionResolverFromDefinition, DocumentResolver};
use crate::types::{PolymorphismNature, Type};

const LEVEL: u8 = 2;

/// Builds the definitions document, and the separated definition files when enabled.
pub(crate) fn build(
    context: &mut ConversionContext<'_>,
    extensions: &ExtensionRegistry,
) -> Result<SplitDocument, ConvertError> {
    let config = context.config();
    let mut names = context.definitions().names().collect::<Vec<_>>();
    if names.is_empty() {
        return Ok(SplitDocument::default());
    }
    sort_by_ordering(&mut names, config.definition_ordering(), |name| *name);

    let mut builder = MarkupDocBuilder::new(config.anchor_prefix());
    let mut files = Vec::new();
    let scope = Scope::Document(DocumentKind::Definitions);

    extensions.apply(scope, Position::Before, None, &mut builder);
    builder.section_title(1, "Definitions", Some("definitions"));
    extensions.apply(scope, Position::Begin, None, &mut builder);

    let index = context.definitions();
    for name in names {
        let unique_name = index.unique_name(name).unwrap_or(name);
        if config.separated_definitions() {
            let mut file_builder = builder.fork();
            let title = definition(context, extensions, &mut file_builder, name, unique_name)?;
            let path = separated_file(config, config.separated_definitions_folder(), unique_name);
            debug!(definition = name, path = %path.display(), "separated definition file");
            files.push(OutputFile {
                path,
                document: file_builder.build(),
            });

            builder.section_title(LEVEL, title.clone(), Some(&format!("ref-{unique_name}")));
            let link = builder.cross_reference(
                DefinitionFileResolver::new(config).resolve(unique_name),
                unique_name,
                title,
            );
            builder.paragraph(vec![link]);
        } else {
            definition(context, extensions, &mut builder, name, unique_name)?;
        }
    }

    extensions.apply(scope, Position::End, None, &mut builder);
    extensions.apply(scope, Position::After, None, &mut builder);
    Ok(SplitDocument {
        document: builder.build(),
        files,
    })
}

/// Writes one definition, anchored by its unique name; returns its title.
fn definition(
    context: &mut ConversionContext<'_>,
    extensions: &ExtensionRegistry,
    builder: &mut MarkupDocBuilder,
    name: &str,
    unique_name: &str,
) -> Result<String, ConvertError> {
    let resolver = DefinitionResolverFromDefinition::new(context.config());
    let facts = context
        .definitions()
        .get(name)
        .map(SchemaFacts::of)
        .unwrap_or_default();
    let title = facts.title.clone().unwrap_or_else(|| name.to_string());
    let mut inline = Vec::new();

    extensions.apply(Scope::Definition, Position::Before, Some(name), builder);
    builder.section_title(LEVEL, title.clone(), Some(unique_name));
    extensions.apply(Scope::Definition, Position::Begin, Some(name), builder);
    builder.text_paragraph(facts.description.as_deref());

    match SchemaMapper::new(context.definitions(), &resolver).map_definition(name)? {
        Type::Object(object) if object.identity.is_some() => {
            if object.polymorphism.nature != PolymorphismNature::None {
                let nature = object.polymorphism.nature.as_str().to_string();
                let mut lines = vec![("Polymorphism", nature)];
                if let Some(discriminator) = &object.polymorphism.discriminator {
                    lines.push(("Discriminator", discriminator.clone()));
                }
                builder.paragraph(labelled_lines(lines));
            }
            object_content(context, &resolver, builder, &object, unique_name, &mut inline)?;
        }
        other => {
            let ty = if context.config().inline_schema() {
                InlineExtractor::new(context.registry_mut()).extract(
                    other,
                    name,
                    &format!("{unique_name} inline"),
                    &mut inline,
                )
            } else {
                other
            };
            let mut content = vec![Inline::italic("Type"), Inline::text(" : ")];
            content.extend(type_cell(&ty, builder));
            builder.paragraph(content);
        }
    }

    extensions.apply(Scope::Definition, Position::End, Some(name), builder);
    inline_definitions(context, &resolver, builder, inline, LEVEL + 1)?;
    extensions.apply(Scope::Definition, Position::After, Some(name), builder);

    debug!(definition = name, "definition processed");
    Ok(title)
}
