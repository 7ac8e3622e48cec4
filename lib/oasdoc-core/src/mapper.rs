//! Schema to [`Type`] mapping.

use indexmap::IndexMap;
use tracing::debug;
use utoipa::openapi::schema::{AdditionalProperties, AllOf, ArrayItems, Discriminator, Object};
use utoipa::openapi::{RefOr, Schema};

use crate::error::ConvertError;
use crate::model::json_text;
use crate::model::{DefinitionIndex, reference_name};
use crate::resolver::DocumentResolver;
use crate::types::{
    BasicType, EnumType, ObjectType, Polymorphism, PolymorphismNature, PropertySchema, RefType,
    Type, TypeName,
};

const OBJECT: &str = "object";

/// A definition being mapped, innermost last.
struct Frame<'n> {
    name: &'n str,
    /// An array, map or composition was entered since this definition was reached.
    structural: bool,
}

/// Maps raw schemas to display types.
///
/// References are looked up in the [`DefinitionIndex`] and wrapped into [`RefType`]s whose
/// document reference comes from the [`DocumentResolver`]. Object properties are kept as raw
/// schemas: they are mapped when the object itself is rendered, which keeps the mapping of
/// self-referencing definitions finite.
///
/// ```rust
/// use oasdoc_core::resolver::SameDocumentResolver;
/// use oasdoc_core::{DefinitionIndex, SchemaMapper};
/// use utoipa::openapi::schema::{ObjectBuilder, Type as SchemaType};
/// use utoipa::openapi::RefOr;
///
/// let schemas = Default::default();
/// let mapper = SchemaMapper::new(DefinitionIndex::from_schemas(&schemas), &SameDocumentResolver);
///
/// let schema = RefOr::T(ObjectBuilder::new().schema_type(SchemaType::String).into());
/// let mapped = mapper.map(&schema)?;
/// assert_eq!(mapped.to_string(), "string");
/// # Ok::<(), oasdoc_core::ConvertError>(())
/// ```
pub struct SchemaMapper<'a> {
    definitions: DefinitionIndex<'a>,
    resolver: &'a dyn DocumentResolver,
}

impl<'a> SchemaMapper<'a> {
    /// Creates a mapper resolving references with `resolver`.
    pub fn new(definitions: DefinitionIndex<'a>, resolver: &'a dyn DocumentResolver) -> Self {
        Self {
            definitions,
            resolver,
        }
    }

    /// Maps a schema node.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::UnresolvedReference`] when a `$ref` does not name a known definition
    /// - [`ConvertError::CircularReference`] when `$ref` aliases loop without any structure
    /// - [`ConvertError::MissingField`] when a reference has an empty `$ref`
    pub fn map(&self, schema: &RefOr<Schema>) -> Result<Type, ConvertError> {
        let mut stack = Vec::new();
        self.map_node(schema, &mut stack)
    }

    /// Maps a named definition as the definitions document shows it.
    ///
    /// An object definition with content is given its own identity, the definition name.
    ///
    /// # Errors
    ///
    /// Same as [`map`](Self::map), plus [`ConvertError::UnresolvedReference`] when `name` is not
    /// a definition.
    pub fn map_definition(&self, name: &str) -> Result<Type, ConvertError> {
        let schema = self
            .definitions
            .get(name)
            .ok_or_else(|| ConvertError::UnresolvedReference {
                reference: name.to_string(),
                name: name.to_string(),
            })?;

        let mut stack = vec![Frame {
            name,
            structural: false,
        }];
        let mapped = self.map_node(schema, &mut stack)?;

        Ok(match mapped {
            Type::Object(mut object) if object.identity.is_none() && object.has_content() => {
                let unique_name = self.definitions.unique_name(name).unwrap_or(name);
                object.identity = Some(TypeName::new(name, unique_name));
                Type::Object(object)
            }
            other => other,
        })
    }

    fn map_node<'s>(
        &self,
        schema: &'s RefOr<Schema>,
        stack: &mut Vec<Frame<'s>>,
    ) -> Result<Type, ConvertError>
    where
        'a: 's,
    {
        match schema {
            RefOr::Ref(reference) => self.map_reference(&reference.ref_location, stack),
            RefOr::T(schema) => self.map_schema(schema, stack),
        }
    }

    fn map_reference<'s>(
        &self,
        location: &'s str,
        stack: &mut Vec<Frame<'s>>,
    ) -> Result<Type, ConvertError>
    where
        'a: 's,
    {
        if location.trim().is_empty() {
            return Err(ConvertError::MissingField {
                context: "schema reference".to_string(),
                field: "$ref",
            });
        }
        let unresolved = || ConvertError::UnresolvedReference {
            reference: location.to_string(),
            name: reference_name(location).unwrap_or(location).to_string(),
        };
        let name = reference_name(location).ok_or_else(unresolved)?;
        let target_schema = self.definitions.get(name).ok_or_else(unresolved)?;
        let unique_name = self.definitions.unique_name(name).unwrap_or(name);

        let reference = |target: Option<Type>| {
            Type::Ref(RefType {
                name: TypeName::new(name, unique_name),
                target: target.map(Box::new),
                document_reference: self.resolver.resolve(unique_name),
            })
        };

        if let Some(position) = stack.iter().position(|frame| frame.name == name) {
            if stack.iter().skip(position).any(|frame| frame.structural) {
                debug!(definition = name, "recursive reference, target not expanded");
                return Ok(reference(None));
            }
            return Err(ConvertError::CircularReference {
                name: name.to_string(),
            });
        }

        stack.push(Frame {
            name,
            structural: false,
        });
        let target = self.map_node(target_schema, stack);
        stack.pop();

        Ok(reference(Some(target?)))
    }

    fn map_schema<'s>(
        &self,
        schema: &'s Schema,
        stack: &mut Vec<Frame<'s>>,
    ) -> Result<Type, ConvertError>
    where
        'a: 's,
    {
        match schema {
            Schema::Array(array) => {
                enter_structure(stack);
                let item = match &array.items {
                    ArrayItems::RefOrSchema(item) => self.map_node(item, stack)?,
                    ArrayItems::False => Type::basic(OBJECT, None),
                };
                Ok(Type::array(item))
            }
            Schema::Object(object) => self.map_object(object, stack),
            Schema::AllOf(all_of) => self.map_all_of(all_of, stack),
            Schema::OneOf(one_of) => self.map_union(
                &one_of.items,
                one_of.discriminator.as_ref(),
                one_of.description.as_ref(),
                stack,
            ),
            Schema::AnyOf(any_of) => self.map_union(
                &any_of.items,
                any_of.discriminator.as_ref(),
                any_of.description.as_ref(),
                stack,
            ),
            _ => Ok(Type::basic(OBJECT, None)),
        }
    }

    fn map_object<'s>(
        &self,
        object: &'s Object,
        stack: &mut Vec<Frame<'s>>,
    ) -> Result<Type, ConvertError>
    where
        'a: 's,
    {
        if let Some(values) = object.enum_values.as_ref().filter(|values| !values.is_empty()) {
            return Ok(Type::Enum(EnumType {
                values: values
                    .iter()
                    .map(|value| json_text(value).unwrap_or_else(|| "null".to_string()))
                    .collect(),
            }));
        }

        let additional_properties = match object.additional_properties.as_deref() {
            Some(AdditionalProperties::RefOr(value)) => {
                enter_structure(stack);
                Some(Box::new(self.map_node(value, stack)?))
            }
            Some(AdditionalProperties::FreeForm(true)) => Some(Box::new(Type::basic(OBJECT, None))),
            Some(AdditionalProperties::FreeForm(false)) | None => None,
        };

        if object.properties.is_empty() && additional_properties.is_none() {
            return Ok(Type::Basic(BasicType {
                kind: schema_kind(object),
                format: object.format.as_ref().and_then(|format| json_text(format)),
            }));
        }

        let properties = object
            .properties
            .iter()
            .map(|(name, schema)| {
                let property = PropertySchema {
                    schema: schema.clone(),
                    required: object.required.contains(name),
                };
                (name.clone(), property)
            })
            .collect();

        Ok(Type::Object(ObjectType {
            identity: None,
            description: object.description.clone(),
            properties,
            polymorphism: Polymorphism::default(),
            additional_properties,
            alternatives: Vec::new(),
        }))
    }

    /// Merges the members of an `allOf` into one object.
    ///
    /// A discriminator declared on the composition, or on a referenced parent, makes it an
    /// inheritance.
    fn map_all_of<'s>(
        &self,
        all_of: &'s AllOf,
        stack: &mut Vec<Frame<'s>>,
    ) -> Result<Type, ConvertError>
    where
        'a: 's,
    {
        enter_structure(stack);

        let mut members = Vec::with_capacity(all_of.items.len());
        for item in &all_of.items {
            members.push((matches!(item, RefOr::Ref(_)), self.map_node(item, stack)?));
        }

        let mut properties: IndexMap<String, PropertySchema> = IndexMap::new();
        let mut discriminator = all_of
            .discriminator
            .as_ref()
            .map(|discriminator| discriminator.property_name.clone());
        let mut description = all_of.description.clone();

        for (is_reference, member) in &members {
            let Some(object) = member.as_object() else {
                continue;
            };
            properties.extend(
                object
                    .properties
                    .iter()
                    .map(|(name, property)| (name.clone(), property.clone())),
            );
            if *is_reference {
                discriminator = discriminator.or_else(|| object.polymorphism.discriminator.clone());
            } else {
                description = description.or_else(|| object.description.clone());
            }
        }

        if properties.is_empty() && members.len() == 1 {
            if let Some((_, member)) = members.pop() {
                return Ok(member);
            }
        }

        let nature = if discriminator.is_some() {
            PolymorphismNature::Inheritance
        } else {
            PolymorphismNature::Composition
        };

        Ok(Type::Object(ObjectType {
            identity: None,
            description,
            properties,
            polymorphism: Polymorphism {
                nature,
                discriminator,
            },
            additional_properties: None,
            alternatives: Vec::new(),
        }))
    }

    /// Maps a `oneOf`/`anyOf`. A nullable wrapper around a single schema maps to that schema.
    fn map_union<'s>(
        &self,
        items: &'s [RefOr<Schema>],
        discriminator: Option<&Discriminator>,
        description: Option<&String>,
        stack: &mut Vec<Frame<'s>>,
    ) -> Result<Type, ConvertError>
    where
        'a: 's,
    {
        enter_structure(stack);

        let mut alternatives = Vec::with_capacity(items.len());
        for item in items {
            let alternative = self.map_node(item, stack)?;
            if !matches!(&alternative, Type::Basic(basic) if basic.kind == "null") {
                alternatives.push(alternative);
            }
        }

        if alternatives.len() == 1 && discriminator.is_none() {
            if let Some(alternative) = alternatives.pop() {
                return Ok(alternative);
            }
        }

        let discriminator = discriminator.map(|discriminator| discriminator.property_name.clone());
        let nature = if discriminator.is_some() {
            PolymorphismNature::Inheritance
        } else {
            PolymorphismNature::Composition
        };

        Ok(Type::Object(ObjectType {
            identity: None,
            description: description.cloned(),
            properties: IndexMap::new(),
            polymorphism: Polymorphism {
                nature,
                discriminator,
            },
            additional_properties: None,
            alternatives,
        }))
    }
}

fn enter_structure(stack: &mut [Frame<'_>]) {
    if let Some(frame) = stack.last_mut() {
        frame.structural = true;
    }
}

/// Primitive kind of an object schema; `type: [string, null]` reads `string`.
fn schema_kind(object: &Object) -> String {
    match serde_json::to_value(&object.schema_type) {
        Ok(serde_json::Value::String(kind)) => kind,
        Ok(serde_json::Value::Array(kinds)) => {
            let kinds = kinds
                .iter()
                .filter_map(serde_json::Value::as_str)
                .filter(|kind| *kind != "null")
                .collect::<Vec<_>>();
            match kinds.as_slice() {
                [] => "null".to_string(),
                kinds => kinds.join(" | "),
            }
        }
        _ => OBJECT.to_string(),
    }
}
