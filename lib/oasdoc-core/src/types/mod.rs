//! Display-oriented type model.
//!
//! A [`Type`] describes a schema node the way the documentation shows it. It is a closed set of
//! variants: consumers match on it exhaustively instead of dispatching through a trait.

use std::fmt;

use indexmap::IndexMap;
use utoipa::openapi::{RefOr, Schema};

/// Serialization of array values in parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionFormat {
    /// Comma separated values.
    Csv,
    /// Space separated values.
    Ssv,
    /// Tab separated values.
    Tsv,
    /// Pipe separated values.
    Pipes,
    /// One parameter instance per value.
    Multi,
}

impl CollectionFormat {
    /// Lower case name of the format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Ssv => "ssv",
            Self::Tsv => "tsv",
            Self::Pipes => "pipes",
            Self::Multi => "multi",
        }
    }
}

/// Identity of an addressable type.
///
/// The display name can be changed after creation, the unique name cannot: it is the anchor of
/// the type and is never shared with another type of the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    name: String,
    unique_name: String,
}

impl TypeName {
    /// Creates an identity.
    pub fn new(name: impl Into<String>, unique_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique_name: unique_name.into(),
        }
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the type for display purposes.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The run-wide unique name.
    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }
}

/// A primitive type, e.g. `integer (int64)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicType {
    /// Primitive kind: `string`, `integer`, `number`, `boolean`, `object`...
    pub kind: String,
    /// Format qualifier, e.g. `date-time`.
    pub format: Option<String>,
}

/// A closed set of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// The allowed values, as declared.
    pub values: Vec<String>,
}

/// An array of items.
#[derive(Debug, Clone)]
pub struct ArrayType {
    /// Type of the items.
    pub item: Box<Type>,
    /// How values are serialized when the array is a parameter.
    pub collection_format: Option<CollectionFormat>,
}

/// The nature of a polymorphic object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolymorphismNature {
    /// A plain object.
    #[default]
    None,
    /// The object combines sub-schemas without a discriminator.
    Composition,
    /// The object declares, or inherits, a discriminator.
    Inheritance,
}

impl PolymorphismNature {
    /// Display label of the nature.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Composition => "COMPOSITION",
            Self::Inheritance => "INHERITANCE",
        }
    }
}

/// Polymorphism of an object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polymorphism {
    /// The nature.
    pub nature: PolymorphismNature,
    /// The discriminator property, for inheritance.
    pub discriminator: Option<String>,
}

/// A property of an object, kept as a raw schema until it is rendered.
#[derive(Debug, Clone)]
pub struct PropertySchema {
    /// The raw schema.
    pub schema: RefOr<Schema>,
    /// Whether the property is required.
    pub required: bool,
}

/// An object type, named or anonymous.
#[derive(Debug, Clone, Default)]
pub struct ObjectType {
    /// Identity of the object; `None` for anonymous structures.
    pub identity: Option<TypeName>,
    /// Description of the object.
    pub description: Option<String>,
    /// Properties, in declaration order.
    pub properties: IndexMap<String, PropertySchema>,
    /// Polymorphism information.
    pub polymorphism: Polymorphism,
    /// Value type of a map (`additionalProperties`).
    pub additional_properties: Option<Box<Type>>,
    /// Alternatives of a `oneOf`/`anyOf` union.
    pub alternatives: Vec<Type>,
}

impl ObjectType {
    /// Whether the object carries anything worth documenting as a definition.
    pub fn has_content(&self) -> bool {
        !self.properties.is_empty() || !self.alternatives.is_empty()
    }

    /// Whether the object is a pure map (`additionalProperties` without properties).
    pub fn is_map(&self) -> bool {
        self.additional_properties.is_some() && !self.has_content()
    }

    /// The display name: identity name, or `object` when anonymous.
    pub fn name(&self) -> &str {
        self.identity.as_ref().map_or("object", TypeName::name)
    }
}

/// A reference to a named definition.
#[derive(Debug, Clone)]
pub struct RefType {
    /// Identity of the referenced definition.
    pub name: TypeName,
    /// The mapped target; `None` for a recursive reference to a definition being mapped.
    pub target: Option<Box<Type>>,
    /// Relative path of the document holding the definition, `None` for the same document.
    pub document_reference: Option<String>,
}

/// A schema node, as documented.
#[derive(Debug, Clone)]
pub enum Type {
    /// Primitive leaf.
    Basic(BasicType),
    /// Enumeration leaf.
    Enum(EnumType),
    /// Array.
    Array(ArrayType),
    /// Object, named or anonymous.
    Object(ObjectType),
    /// Reference to a named definition.
    Ref(RefType),
}

impl Type {
    /// A primitive type.
    pub fn basic(kind: impl Into<String>, format: Option<String>) -> Self {
        Self::Basic(BasicType {
            kind: kind.into(),
            format,
        })
    }

    /// An array of `item`.
    pub fn array(item: Self) -> Self {
        Self::Array(ArrayType {
            item: Box::new(item),
            collection_format: None,
        })
    }

    /// The display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Basic(basic) => &basic.kind,
            Self::Enum(_) => "enum",
            Self::Array(_) => "array",
            Self::Object(object) => object.name(),
            Self::Ref(reference) => reference.name.name(),
        }
    }

    /// The unique name, for addressable types only.
    pub fn unique_name(&self) -> Option<&str> {
        match self {
            Self::Object(ObjectType {
                identity: Some(identity),
                ..
            }) => Some(identity.unique_name()),
            Self::Ref(reference) => Some(reference.name.unique_name()),
            Self::Basic(_) | Self::Enum(_) | Self::Array(_) | Self::Object(_) => None,
        }
    }

    /// The object behind this type, following references.
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(object) => Some(object),
            Self::Ref(RefType {
                target: Some(target),
                ..
            }) => target.as_object(),
            Self::Basic(_) | Self::Enum(_) | Self::Array(_) | Self::Ref(_) => None,
        }
    }

    /// Sets the collection format of an array; other types are returned unchanged.
    #[must_use]
    pub fn with_collection_format(self, collection_format: Option<CollectionFormat>) -> Self {
        match self {
            Self::Array(array) => Self::Array(ArrayType {
                collection_format,
                ..array
            }),
            other => other,
        }
    }
}

/// Plain text rendering, without cross references.
impl fmt::Display for Type {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(BasicType { kind, format }) => match format {
                Some(format) => write!(formatter, "{kind} ({format})"),
                None => formatter.write_str(kind),
            },
            Self::Enum(EnumType { values }) => write!(formatter, "enum ({})", values.join(", ")),
            Self::Array(ArrayType {
                item,
                collection_format,
            }) => {
                write!(formatter, "< {item} > array")?;
                match collection_format {
                    Some(collection_format) => {
                        write!(formatter, "({})", collection_format.as_str())
                    }
                    None => Ok(()),
                }
            }
            Self::Object(object) => match (&object.identity, &object.additional_properties) {
                (None, Some(value)) if !object.has_content() => {
                    write!(formatter, "< string, {value} > map")
                }
                _ => formatter.write_str(object.name()),
            },
            Self::Ref(reference) => formatter.write_str(reference.name.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn reference(name: &str) -> Type {
        Type::Ref(RefType {
            name: TypeName::new(name, name),
            target: None,
            document_reference: None,
        })
    }

    #[test]
    fn should_display_nested_types() {
        let map = Type::Object(ObjectType {
            additional_properties: Some(Box::new(Type::basic("integer", Some("int32".into())))),
            ..ObjectType::default()
        });
        let tags = Type::array(Type::Enum(EnumType {
            values: vec!["red".into(), "blue".into()],
        }))
        .with_collection_format(Some(CollectionFormat::Multi));

        assert_snapshot!(map.to_string(), @"< string, integer (int32) > map");
        assert_snapshot!(tags.to_string(), @"< enum (red, blue) > array(multi)");
        assert_snapshot!(Type::array(reference("Pet")).to_string(), @"< Pet > array");
    }

    #[test]
    fn should_expose_unique_name_of_addressable_types_only() {
        let named = Type::Object(ObjectType {
            identity: Some(TypeName::new("address", "person-address")),
            ..ObjectType::default()
        });

        assert_eq!(named.unique_name(), Some("person-address"));
        assert_eq!(named.name(), "address");
        assert_eq!(reference("Pet").unique_name(), Some("Pet"));
        assert_eq!(Type::basic("string", None).unique_name(), None);
        assert_eq!(Type::Object(ObjectType::default()).unique_name(), None);
    }

    #[test]
    fn should_rename_without_changing_unique_name() {
        let mut identity = TypeName::new("address", "person-address");
        identity.set_name("Address");

        assert_eq!(identity.name(), "Address");
        assert_eq!(identity.unique_name(), "person-address");
    }

    #[test]
    fn should_follow_references_to_objects() {
        let object = ObjectType {
            identity: Some(TypeName::new("Pet", "Pet")),
            ..ObjectType::default()
        };
        let resolved = Type::Ref(RefType {
            name: TypeName::new("Pet", "Pet"),
            target: Some(Box::new(Type::Object(object.clone()))),
            document_reference: None,
        });

        let target = resolved.as_object().expect("reference to an object");
        assert_eq!(target.identity, object.identity);
        assert!(reference("Pet").as_object().is_none());
        assert!(!object.has_content());
    }
}
