//! Markup shared by the documents: schema cells, properties tables and inline definitions.

use serde::Serialize;
use serde_json::Value;
use utoipa::openapi::{RefOr, Schema};

use crate::convert::ConversionContext;
use crate::error::ConvertError;
use crate::inline::InlineExtractor;
use crate::mapper::SchemaMapper;
use crate::markup::{Column, Inline, MarkupDocBuilder};
use crate::model::json_text;
use crate::ordering::sort_by_ordering;
use crate::resolver::DocumentResolver;
use crate::types::{ArrayType, ObjectType, PolymorphismNature, PropertySchema, Type};

pub(super) const REQUIRED: &str = "required";
pub(super) const OPTIONAL: &str = "optional";
const READ_ONLY: &str = "read-only";

/// Maps a schema and, when inline schemas are enabled, extracts its anonymous objects.
pub(super) fn resolve_type(
    context: &mut ConversionContext<'_>,
    resolver: &dyn DocumentResolver,
    schema: &RefOr<Schema>,
    display_name: &str,
    unique_prefix: &str,
    inline_definitions: &mut Vec<ObjectType>,
) -> Result<Type, ConvertError> {
    let mapped = SchemaMapper::new(context.definitions(), resolver).map(schema)?;
    if !context.config().inline_schema() {
        return Ok(mapped);
    }
    Ok(InlineExtractor::new(context.registry_mut()).extract(
        mapped,
        display_name,
        unique_prefix,
        inline_definitions,
    ))
}

/// The schema column of a type, with cross references to named types.
pub(super) fn type_cell(ty: &Type, builder: &MarkupDocBuilder) -> Vec<Inline> {
    match ty {
        Type::Basic(_) | Type::Enum(_) => vec![Inline::text(ty.to_string())],
        Type::Ref(reference) => vec![builder.cross_reference(
            reference.document_reference.clone(),
            reference.name.unique_name(),
            reference.name.name(),
        )],
        Type::Array(ArrayType {
            item,
            collection_format,
        }) => {
            let mut cell = vec![Inline::text("< ")];
            cell.extend(type_cell(item, builder));
            cell.push(Inline::text(" > array"));
            if let Some(collection_format) = collection_format {
                cell.push(Inline::text(format!("({})", collection_format.as_str())));
            }
            cell
        }
        Type::Object(object) => match (&object.identity, &object.additional_properties) {
            (Some(identity), _) => vec![builder.cross_reference(
                None,
                identity.unique_name(),
                identity.name(),
            )],
            (None, Some(value)) if !object.has_content() => {
                let mut cell = vec![Inline::text("< string, ")];
                cell.extend(type_cell(value, builder));
                cell.push(Inline::text(" > map"));
                cell
            }
            (None, _) => vec![Inline::text(object.name())],
        },
    }
}

/// `label : value` lines, e.g. `_Type_ : apiKey`.
pub(super) fn labelled_lines<'l>(
    lines: impl IntoIterator<Item = (&'l str, String)>,
) -> Vec<Inline> {
    let mut content = Vec::new();
    for (label, value) in lines {
        push_line(
            &mut content,
            [Inline::italic(label), Inline::text(format!(" : {value}"))],
        );
    }
    content
}

/// Appends a line to a cell, separated from the previous one by a line break.
pub(super) fn push_line(cell: &mut Vec<Inline>, line: impl IntoIterator<Item = Inline>) {
    if !cell.is_empty() {
        cell.push(Inline::LineBreak);
    }
    cell.extend(line);
}

/// The name column of a parameter or property.
pub(super) fn name_cell(name: &str, required: bool, read_only: bool) -> Vec<Inline> {
    let mut cell = vec![
        Inline::bold(name),
        Inline::LineBreak,
        Inline::italic(if required { REQUIRED } else { OPTIONAL }),
    ];
    if read_only {
        push_line(&mut cell, [Inline::italic(READ_ONLY)]);
    }
    cell
}

/// Documentation facts of a raw schema, read from its serialized form.
#[derive(Debug, Default)]
pub(super) struct SchemaFacts {
    pub(super) title: Option<String>,
    pub(super) description: Option<String>,
    pub(super) default: Option<String>,
    pub(super) min_length: Option<u64>,
    pub(super) max_length: Option<u64>,
    pub(super) pattern: Option<String>,
    pub(super) minimum: Option<(String, bool)>,
    pub(super) maximum: Option<(String, bool)>,
    pub(super) example: Option<String>,
    pub(super) read_only: bool,
}

impl SchemaFacts {
    pub(super) fn of<T: Serialize + ?Sized>(schema: &T) -> Self {
        let Ok(Value::Object(fields)) = serde_json::to_value(schema) else {
            return Self::default();
        };
        let text = |key: &str| fields.get(key).and_then(json_text);
        let bound = |inclusive: &str, exclusive: &str| {
            match (fields.get(inclusive), fields.get(exclusive)) {
                (_, Some(value @ Value::Number(_))) => json_text(value).map(|value| (value, true)),
                (Some(value), Some(Value::Bool(exclusive))) => {
                    json_text(value).map(|value| (value, *exclusive))
                }
                (Some(value), _) => json_text(value).map(|value| (value, false)),
                (None, _) => None,
            }
        };

        Self {
            title: text("title"),
            description: text("description").filter(|text| !text.trim().is_empty()),
            default: text("default"),
            min_length: fields.get("minLength").and_then(Value::as_u64),
            max_length: fields.get("maxLength").and_then(Value::as_u64),
            pattern: text("pattern"),
            minimum: bound("minimum", "exclusiveMinimum"),
            maximum: bound("maximum", "exclusiveMaximum"),
            example: text("example").or_else(|| {
                fields
                    .get("examples")
                    .and_then(Value::as_array)
                    .and_then(|examples| examples.first())
                    .and_then(json_text)
            }),
            read_only: fields.get("readOnly").and_then(Value::as_bool) == Some(true),
        }
    }

    /// The description column: description, then default, length, pattern, bounds and example.
    pub(super) fn description_cell(&self) -> Vec<Inline> {
        let mut cell = Vec::new();
        if let Some(description) = &self.description {
            cell.push(Inline::text(description.trim()));
        }
        let mut facts = Vec::new();
        if let Some(default) = &self.default {
            facts.push(("Default", default.clone()));
        }
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) if min == max => facts.push(("Length", min.to_string())),
            (Some(min), Some(max)) => facts.push(("Length", format!("{min} - {max}"))),
            (Some(min), None) => facts.push(("Minimum length", min.to_string())),
            (None, Some(max)) => facts.push(("Maximum length", max.to_string())),
            (None, None) => {}
        }
        if let Some(pattern) = &self.pattern {
            facts.push(("Pattern", format!("\"{pattern}\"")));
        }
        if let Some((minimum, exclusive)) = &self.minimum {
            let label = if *exclusive { "Minimum value (exclusive)" } else { "Minimum value" };
            facts.push((label, minimum.clone()));
        }
        if let Some((maximum, exclusive)) = &self.maximum {
            let label = if *exclusive { "Maximum value (exclusive)" } else { "Maximum value" };
            facts.push((label, maximum.clone()));
        }
        if let Some(example) = &self.example {
            facts.push(("Example", example.clone()));
        }
        for (label, value) in facts {
            push_line(
                &mut cell,
                [Inline::bold(label), Inline::text(" : "), Inline::literal(value)],
            );
        }
        cell
    }
}

/// The properties table of an object, plus the list of its alternatives.
///
/// Property types are extracted with `unique_prefix`; the anonymous objects found are pushed to
/// `inline_definitions`.
pub(super) fn object_content(
    context: &mut ConversionContext<'_>,
    resolver: &dyn DocumentResolver,
    builder: &mut MarkupDocBuilder,
    object: &ObjectType,
    unique_prefix: &str,
    inline_definitions: &mut Vec<ObjectType>,
) -> Result<(), ConvertError> {
    if !object.alternatives.is_empty() {
        let label = match object.polymorphism.nature {
            PolymorphismNature::Inheritance => "Subtypes",
            PolymorphismNature::Composition | PolymorphismNature::None => "Alternatives",
        };
        let mut alternatives = Vec::with_capacity(object.alternatives.len());
        for (index, alternative) in object.alternatives.iter().enumerate() {
            let alternative = if context.config().inline_schema() {
                // already named alternatives come back unchanged
                InlineExtractor::new(context.registry_mut()).extract(
                    alternative.clone(),
                    &format!("{} {}", object.name(), index + 1),
                    unique_prefix,
                    inline_definitions,
                )
            } else {
                alternative.clone()
            };
            alternatives.push(type_cell(&alternative, builder));
        }
        builder
            .paragraph(vec![Inline::italic(label), Inline::text(" :")])
            .list(alternatives);
    }

    let mut properties = object.properties.iter().collect::<Vec<_>>();
    sort_by_ordering(
        &mut properties,
        context.config().property_ordering(),
        |(name, _)| name.as_str(),
    );

    let mut rows = Vec::with_capacity(properties.len());
    for (name, PropertySchema { schema, required }) in properties {
        let ty = resolve_type(
            context,
            resolver,
            schema,
            name,
            unique_prefix,
            inline_definitions,
        )?;
        let facts = SchemaFacts::of(schema);
        rows.push(vec![
            name_cell(name, *required, facts.read_only),
            facts.description_cell(),
            type_cell(&ty, builder),
        ]);
    }
    builder.table(
        vec![
            Column::new("Name", 3),
            Column::new("Description", 11).as_header(),
            Column::new("Schema", 4).as_header(),
        ],
        rows,
    );
    Ok(())
}

/// Renders inline definitions, and the inline definitions found in them, as sections of
/// `level`.
pub(super) fn inline_definitions(
    context: &mut ConversionContext<'_>,
    resolver: &dyn DocumentResolver,
    builder: &mut MarkupDocBuilder,
    definitions: Vec<ObjectType>,
    level: u8,
) -> Result<(), ConvertError> {
    for definition in definitions {
        let Some(identity) = definition.identity.clone() else {
            continue;
        };
        builder.section_title(level, identity.name(), Some(identity.unique_name()));
        builder.text_paragraph(definition.description.as_deref());

        let mut nested = Vec::new();
        object_content(
            context,
            resolver,
            builder,
            &definition,
            identity.unique_name(),
            &mut nested,
        )?;
        inline_definitions(context, resolver, builder, nested, level)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use utoipa::openapi::schema::{ObjectBuilder, Ref, Type as SchemaType};

    use super::*;
    use crate::types::{CollectionFormat, RefType, TypeName};

    #[test]
    fn should_link_named_types_in_schema_cell() {
        let builder = MarkupDocBuilder::default();
        let pets = Type::array(Type::Ref(RefType {
            name: TypeName::new("Pet", "Pet"),
            target: None,
            document_reference: Some("definitions.adoc".to_string()),
        }))
        .with_collection_format(Some(CollectionFormat::Csv));

        let cell = type_cell(&pets, &builder);

        assert_eq!(
            cell,
            [
                Inline::text("< "),
                Inline::CrossReference {
                    document: Some("definitions.adoc".to_string()),
                    anchor: "pet".to_string(),
                    label: "Pet".to_string(),
                },
                Inline::text(" > array"),
                Inline::text("(csv)"),
            ]
        );
    }

    #[test]
    fn should_read_schema_facts() {
        let schema: RefOr<Schema> = ObjectBuilder::new()
            .schema_type(SchemaType::String)
            .description(Some("The name"))
            .min_length(Some(3))
            .max_length(Some(3))
            .pattern(Some("[A-Z]+"))
            .default(Some(serde_json::json!("ABC")))
            .read_only(Some(true))
            .into();

        let facts = SchemaFacts::of(&schema);

        assert!(facts.read_only);
        assert_eq!(
            facts.description_cell(),
            [
                Inline::text("The name"),
                Inline::LineBreak,
                Inline::bold("Default"),
                Inline::text(" : "),
                Inline::literal("ABC"),
                Inline::LineBreak,
                Inline::bold("Length"),
                Inline::text(" : "),
                Inline::literal("3"),
                Inline::LineBreak,
                Inline::bold("Pattern"),
                Inline::text(" : "),
                Inline::literal("\"[A-Z]+\""),
            ]
        );
    }

    #[test]
    fn should_ignore_reference_facts() {
        let schema: RefOr<Schema> = Ref::from_schema_name("Pet").into();

        let facts = SchemaFacts::of(&schema);

        assert!(facts.description.is_none());
        assert!(facts.description_cell().is_empty());
    }

    #[test]
    fn should_mark_optional_read_only_names() {
        assert_eq!(
            name_cell("id", false, true),
            [
                Inline::bold("id"),
                Inline::LineBreak,
                Inline::italic("optional"),
                Inline::LineBreak,
                Inline::italic("read-only"),
            ]
        );
    }
}
