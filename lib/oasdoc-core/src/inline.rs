//! Inline definitions.
//!
//! Anonymous nested objects have no definition of their own. The [`InlineExtractor`] names them
//! after the entity they are found in, so they can be rendered as inline definitions right after
//! that entity and referenced by anchor.

use std::collections::HashSet;

use tracing::debug;

use crate::markup::normalize_name;
use crate::types::{ArrayType, ObjectType, Type, TypeName};

const INLINE: &str = "inline";

/// Run-scoped registry of unique names.
///
/// Every name handed out is normalized and distinct from every other name of the run, reserved
/// names included.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: HashSet<String>,
}

impl NameRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a name as taken, e.g. the name of a definition.
    pub fn reserve(&mut self, name: &str) {
        self.names.insert(normalize_name(name));
    }

    /// Whether a name is taken.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&normalize_name(name))
    }

    /// Number of names taken.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no name was taken yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registers a new unique name derived from `candidate`.
    ///
    /// ```rust
    /// use oasdoc_core::NameRegistry;
    ///
    /// let mut registry = NameRegistry::new();
    /// assert_eq!(registry.register("Pet address"), "pet-address");
    /// assert_eq!(registry.register("Pet address"), "pet-address-2");
    /// ```
    pub fn register(&mut self, candidate: &str) -> String {
        let base = match normalize_name(candidate) {
            name if name.is_empty() => INLINE.to_string(),
            name => name,
        };
        if self.names.insert(base.clone()) {
            return base;
        }

        let mut counter = 2_usize;
        loop {
            let name = format!("{base}-{counter}");
            if self.names.insert(name.clone()) {
                debug!(
                    candidate,
                    unique_name = %name,
                    "inline name already taken, renamed"
                );
                return name;
            }
            counter += 1;
        }
    }
}

/// Turns anonymous objects into named inline definitions.
///
/// ```rust
/// use oasdoc_core::{InlineExtractor, NameRegistry, ObjectType, PropertySchema, Type};
/// use utoipa::openapi::schema::{ObjectBuilder, Type as SchemaType};
///
/// let mut object = ObjectType::default();
/// object.properties.insert(
///     "street".to_string(),
///     PropertySchema {
///         schema: ObjectBuilder::new().schema_type(SchemaType::String).into(),
///         required: true,
///     },
/// );
///
/// let mut registry = NameRegistry::new();
/// let mut inline_definitions = Vec::new();
/// let extracted = InlineExtractor::new(&mut registry).extract(
///     Type::Object(object),
///     "address",
///     "Person",
///     &mut inline_definitions,
/// );
///
/// assert_eq!(extracted.unique_name(), Some("person-address"));
/// assert_eq!(inline_definitions.len(), 1);
/// ```
#[derive(Debug)]
pub struct InlineExtractor<'r> {
    registry: &'r mut NameRegistry,
}

impl<'r> InlineExtractor<'r> {
    /// Creates an extractor drawing names from `registry`.
    pub fn new(registry: &'r mut NameRegistry) -> Self {
        Self { registry }
    }

    /// Extracts the anonymous objects of `ty`.
    ///
    /// Every anonymous object with content is named `display_name`, given a unique name derived
    /// from `unique_prefix` and `display_name`, and pushed to `inline_definitions`. Named
    /// objects and references are returned unchanged, so extraction is idempotent.
    pub fn extract(
        &mut self,
        ty: Type,
        display_name: &str,
        unique_prefix: &str,
        inline_definitions: &mut Vec<ObjectType>,
    ) -> Type {
        match ty {
            Type::Basic(_) | Type::Enum(_) | Type::Ref(_) => ty,
            Type::Object(ObjectType {
                identity: Some(_), ..
            }) => ty,
            Type::Array(ArrayType {
                item,
                collection_format,
            }) => {
                let item = self.extract(*item, display_name, unique_prefix, inline_definitions);
                Type::Array(ArrayType {
                    item: Box::new(item),
                    collection_format,
                })
            }
            Type::Object(mut object) if object.is_map() => {
                object.additional_properties = object.additional_properties.map(|value| {
                    Box::new(self.extract(*value, display_name, unique_prefix, inline_definitions))
                });
                Type::Object(object)
            }
            Type::Object(object) if !object.has_content() => Type::Object(object),
            Type::Object(mut object) => {
                let unique_name = self
                    .registry
                    .register(&format!("{unique_prefix} {display_name}"));

                let alternatives = std::mem::take(&mut object.alternatives);
                object.alternatives = alternatives
                    .into_iter()
                    .enumerate()
                    .map(|(index, alternative)| {
                        let name = format!("{display_name} {}", index + 1);
                        self.extract(alternative, &name, &unique_name, inline_definitions)
                    })
                    .collect();
                object.identity = Some(TypeName::new(display_name, unique_name));

                inline_definitions.push(object.clone());
                Type::Object(object)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use utoipa::openapi::schema::{ObjectBuilder, Type as SchemaType};

    use super::*;
    use crate::types::{PropertySchema, RefType};

    fn anonymous() -> ObjectType {
        let mut object = ObjectType::default();
        object.properties.insert(
            "street".to_string(),
            PropertySchema {
                schema: ObjectBuilder::new().schema_type(SchemaType::String).into(),
                required: false,
            },
        );
        object
    }

    #[test]
    fn should_register_unique_names() {
        let mut registry = NameRegistry::new();
        registry.reserve("Pet Address");

        let first = registry.register("Pet address");
        let second = registry.register("pet-address");
        let empty = registry.register("");

        assert_eq!(first, "pet-address-2");
        assert_eq!(second, "pet-address-3");
        assert_eq!(empty, "inline");
        assert_eq!(registry.len(), 4);
        assert!(registry.contains("PET ADDRESS"));
    }

    #[test]
    fn should_extract_anonymous_object_inside_array() {
        let mut registry = NameRegistry::new();
        let mut inline_definitions = Vec::new();

        let extracted = InlineExtractor::new(&mut registry).extract(
            Type::array(Type::Object(anonymous())),
            "addresses",
            "Person",
            &mut inline_definitions,
        );

        assert_eq!(extracted.to_string(), "< addresses > array");
        assert_eq!(inline_definitions.len(), 1);
        assert_eq!(
            inline_definitions[0].identity.as_ref().map(TypeName::unique_name),
            Some("person-addresses")
        );
    }

    #[test]
    fn should_be_idempotent() {
        let mut registry = NameRegistry::new();
        let mut inline_definitions = Vec::new();
        let mut extractor = InlineExtractor::new(&mut registry);

        let once = extractor.extract(
            Type::Object(anonymous()),
            "address",
            "Person",
            &mut inline_definitions,
        );
        let twice = extractor.extract(once.clone(), "address", "Person", &mut inline_definitions);

        assert_eq!(once.unique_name(), twice.unique_name());
        assert_eq!(inline_definitions.len(), 1);
    }

    #[test]
    fn should_keep_leaves_and_references() {
        let mut registry = NameRegistry::new();
        let mut inline_definitions = Vec::new();
        let mut extractor = InlineExtractor::new(&mut registry);
        let reference = Type::Ref(RefType {
            name: TypeName::new("Pet", "Pet"),
            target: Some(Box::new(Type::Object(anonymous()))),
            document_reference: None,
        });

        let basic = extractor.extract(
            Type::basic("string", None),
            "name",
            "Person",
            &mut inline_definitions,
        );
        let reference = extractor.extract(reference, "pet", "Person", &mut inline_definitions);
        let empty = extractor.extract(
            Type::Object(ObjectType::default()),
            "any",
            "Person",
            &mut inline_definitions,
        );

        assert_eq!(basic.to_string(), "string");
        assert_eq!(reference.unique_name(), Some("Pet"));
        assert_eq!(empty.to_string(), "object");
        assert!(inline_definitions.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn should_keep_unique_names_distinct_across_parents() {
        let mut registry = NameRegistry::new();
        let mut inline_definitions = Vec::new();
        let mut extractor = InlineExtractor::new(&mut registry);

        for prefix in ["Person", "Person", "person"] {
            extractor.extract(
                Type::Object(anonymous()),
                "address",
                prefix,
                &mut inline_definitions,
            );
        }

        let mut names = inline_definitions
            .iter()
            .filter_map(|object| object.identity.as_ref().map(TypeName::unique_name))
            .collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 3);
    }
}
