use std::fmt;

use serde_json::Value;
use utoipa::openapi::path::{Parameter, ParameterIn, ParameterStyle};
use utoipa::openapi::request_body::RequestBody;
use utoipa::openapi::{Deprecated, RefOr, Required, Schema};

use crate::types::CollectionFormat;

const FORM_MEDIA_TYPES: [&str; 2] = ["application/x-www-form-urlencoded", "multipart/form-data"];

/// Where a parameter is carried, declared in natural documentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterLocation {
    /// HTTP header.
    Header,
    /// Path template segment.
    Path,
    /// Query string.
    Query,
    /// Cookie.
    Cookie,
    /// Form field of a form-encoded request body.
    FormData,
    /// Request body.
    Body,
}

impl ParameterLocation {
    /// Lower camel case name of the location.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Path => "path",
            Self::Query => "query",
            Self::Cookie => "cookie",
            Self::FormData => "formData",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<&ParameterIn> for ParameterLocation {
    fn from(parameter_in: &ParameterIn) -> Self {
        match parameter_in {
            ParameterIn::Header => Self::Header,
            ParameterIn::Path => Self::Path,
            ParameterIn::Query => Self::Query,
            ParameterIn::Cookie => Self::Cookie,
        }
    }
}

/// A documented parameter: a regular parameter, a form field or the request body.
#[derive(Debug, Clone)]
pub struct ParameterEntry {
    location: ParameterLocation,
    name: String,
    description: Option<String>,
    required: bool,
    deprecated: bool,
    schema: Option<RefOr<Schema>>,
    collection_format: Option<CollectionFormat>,
    example: Option<Value>,
}

impl ParameterEntry {
    /// Creates an entry.
    pub fn new(location: ParameterLocation, name: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
            description: None,
            required: false,
            deprecated: false,
            schema: None,
            collection_format: None,
            example: None,
        }
    }

    /// Sets the example value.
    #[must_use]
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Sets the schema.
    #[must_use]
    pub fn with_schema(mut self, schema: RefOr<Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the entry as required.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub(crate) fn from_parameter(parameter: &Parameter) -> Self {
        let location = ParameterLocation::from(&parameter.parameter_in);
        Self {
            location,
            name: parameter.name.clone(),
            description: parameter.description.clone(),
            // path parameters are always required
            required: location == ParameterLocation::Path
                || matches!(parameter.required, Required::True),
            deprecated: matches!(parameter.deprecated, Some(Deprecated::True)),
            schema: parameter.schema.clone(),
            collection_format: collection_format(
                location,
                parameter.style.as_ref(),
                parameter.explode,
            ),
            example: serde_json::to_value(parameter)
                .ok()
                .as_ref()
                .and_then(declared_example),
        }
    }

    /// Form media types expand into one `formData` entry per property of an inline object
    /// schema; anything else is a single `body` entry.
    pub(crate) fn from_request_body(body: &RequestBody) -> Vec<Self> {
        let required = matches!(body.required, Some(Required::True));

        let form_object = body
            .content
            .iter()
            .filter(|(media_type, _)| {
                FORM_MEDIA_TYPES
                    .iter()
                    .any(|form| media_type.starts_with(form))
            })
            .find_map(|(_, content)| match &content.schema {
                Some(RefOr::T(Schema::Object(object))) if !object.properties.is_empty() => {
                    Some(object)
                }
                _ => None,
            });

        if let Some(object) = form_object {
            return object
                .properties
                .iter()
                .map(|(name, schema)| Self {
                    location: ParameterLocation::FormData,
                    name: name.clone(),
                    description: None,
                    required: object.required.contains(name),
                    deprecated: false,
                    schema: Some(schema.clone()),
                    collection_format: Some(CollectionFormat::Multi),
                    example: None,
                })
                .collect();
        }

        let content = body
            .content
            .iter()
            .find(|(media_type, _)| media_type.contains("json"))
            .or_else(|| body.content.iter().next())
            .map(|(_, content)| content);

        vec![Self {
            location: ParameterLocation::Body,
            name: "body".to_string(),
            description: body.description.clone(),
            required,
            deprecated: false,
            schema: content.and_then(|content| content.schema.clone()),
            collection_format: None,
            example: None,
        }]
    }

    /// The location.
    pub fn location(&self) -> ParameterLocation {
        self.location
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the parameter is required.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the parameter is deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// The schema, if any.
    pub fn schema(&self) -> Option<&RefOr<Schema>> {
        self.schema.as_ref()
    }

    /// How array values are serialized.
    pub fn collection_format(&self) -> Option<CollectionFormat> {
        self.collection_format
    }

    /// The declared example value, if any.
    pub fn example(&self) -> Option<&Value> {
        self.example.as_ref()
    }
}

/// The `example` of a serialized parameter, or the value of its first named `examples` entry.
fn declared_example(serialized: &Value) -> Option<Value> {
    serialized
        .get("example")
        .filter(|example| !example.is_null())
        .cloned()
        .or_else(|| {
            serialized
                .get("examples")?
                .as_object()?
                .values()
                .find_map(|example| example.get("value"))
                .cloned()
        })
}

/// Serialization of array values, from the parameter style and the OpenAPI defaults.
fn collection_format(
    location: ParameterLocation,
    style: Option<&ParameterStyle>,
    explode: Option<bool>,
) -> Option<CollectionFormat> {
    let form_default = matches!(
        location,
        ParameterLocation::Query | ParameterLocation::Cookie
    );
    match style {
        Some(ParameterStyle::Form) => Some(if explode.unwrap_or(true) {
            CollectionFormat::Multi
        } else {
            CollectionFormat::Csv
        }),
        Some(ParameterStyle::SpaceDelimited) => Some(CollectionFormat::Ssv),
        Some(ParameterStyle::PipeDelimited) => Some(CollectionFormat::Pipes),
        Some(ParameterStyle::Simple) => Some(CollectionFormat::Csv),
        None if form_default => Some(if explode.unwrap_or(true) {
            CollectionFormat::Multi
        } else {
            CollectionFormat::Csv
        }),
        None => Some(CollectionFormat::Csv),
        Some(_) => None,
    }
}
