//! Example requests and responses of an operation.
//!
//! Declared examples (parameter `example`, media type `example` and `examples`) are always shown.
//! With generated examples enabled, missing values are built from the schemas and every
//! operation gets an example request.

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::openapi::request_body::RequestBody;
use utoipa::openapi::response::Response;
use utoipa::openapi::{Content, RefOr, Schema};

use super::components::labelled_lines;
use crate::config::RequestExamplesFormat;
use crate::markup::MarkupDocBuilder;
use crate::model::{
    DefinitionIndex, Method, ParameterEntry, ParameterLocation, json_text, reference_name,
};

const REQUEST_SECTION: &str = "Example HTTP request";
const RESPONSE_SECTION: &str = "Example HTTP response";

/// One example of a media type.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct MediaExample {
    name: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    value: Option<Value>,
    external_value: Option<String>,
}

impl MediaExample {
    fn of(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }
}

/// Declared examples of a media type: the single `example`, then the named `examples`.
pub(super) fn declared_examples<T: Serialize + ?Sized>(content: &T) -> Vec<MediaExample> {
    let Ok(Value::Object(fields)) = serde_json::to_value(content) else {
        return Vec::new();
    };

    let mut examples = Vec::new();
    if let Some(example) = fields.get("example").filter(|example| !example.is_null()) {
        examples.push(MediaExample::of(example.clone()));
    }
    for (name, example) in fields
        .get("examples")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
    {
        let text = |key: &str| {
            example
                .get(key)
                .and_then(json_text)
                .filter(|text| !text.trim().is_empty())
        };
        examples.push(MediaExample {
            name: Some(name.clone()),
            summary: text("summary"),
            description: text("description"),
            value: example.get("value").filter(|value| !value.is_null()).cloned(),
            external_value: text("externalValue").or_else(|| text("$ref")),
        });
    }
    examples
}

/// Builds example values out of schemas.
///
/// Declared `example`, `default` and enum values win; otherwise each type gets a placeholder
/// value. References are followed once per branch, so recursive definitions stay finite.
#[derive(Debug, Clone)]
pub(crate) struct ExampleGenerator<'a> {
    definitions: DefinitionIndex<'a>,
}

impl<'a> ExampleGenerator<'a> {
    pub(crate) fn new(definitions: DefinitionIndex<'a>) -> Self {
        Self { definitions }
    }

    /// An example value of `schema`, `Value::Null` when none can be built.
    pub(crate) fn generate(&self, schema: &RefOr<Schema>) -> Value {
        serde_json::to_value(schema)
            .map(|schema| self.value(&schema, &mut Vec::new()))
            .unwrap_or(Value::Null)
    }

    fn value(&self, schema: &Value, visiting: &mut Vec<String>) -> Value {
        if let Some(location) = schema.get("$ref").and_then(Value::as_str) {
            let Some(name) = reference_name(location) else {
                return Value::Null;
            };
            if visiting.iter().any(|visited| visited == name) {
                return Value::Null;
            }
            let Some(target) = self
                .definitions
                .get(name)
                .and_then(|target| serde_json::to_value(target).ok())
            else {
                return Value::Null;
            };
            visiting.push(name.to_string());
            let value = self.value(&target, visiting);
            visiting.pop();
            return value;
        }

        for key in ["example", "default"] {
            if let Some(value) = schema.get(key).filter(|value| !value.is_null()) {
                return value.clone();
            }
        }
        for key in ["examples", "enum"] {
            if let Some(first) = schema
                .get(key)
                .and_then(Value::as_array)
                .and_then(|values| values.first())
            {
                return first.clone();
            }
        }

        if let Some(members) = schema.get("allOf").and_then(Value::as_array) {
            let mut merged = Map::new();
            for member in members {
                if let Value::Object(fields) = self.value(member, visiting) {
                    merged.extend(fields);
                }
            }
            return Value::Object(merged);
        }
        for key in ["oneOf", "anyOf"] {
            if let Some(first) = schema
                .get(key)
                .and_then(Value::as_array)
                .and_then(|members| members.first())
            {
                return self.value(first, visiting);
            }
        }

        match schema_type(schema) {
            Some("array") => {
                let item = schema
                    .get("items")
                    .map_or(Value::Null, |items| self.value(items, visiting));
                match item {
                    Value::Null => Value::Array(Vec::new()),
                    item => Value::Array(vec![item]),
                }
            }
            Some("string") => {
                Value::from(string_example(schema.get("format").and_then(Value::as_str)))
            }
            Some("integer") => Value::from(0),
            Some("number") => Value::from(0.0),
            Some("boolean") => Value::Bool(true),
            Some("object") | None => self.object(schema, visiting),
            Some(_) => Value::Null,
        }
    }

    fn object(&self, schema: &Value, visiting: &mut Vec<String>) -> Value {
        let mut object = Map::new();
        for (name, property) in schema
            .get("properties")
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
        {
            object.insert(name.clone(), self.value(property, visiting));
        }
        if let Some(additional) = schema
            .get("additionalProperties")
            .filter(|additional| additional.is_object())
            .filter(|_| object.is_empty())
        {
            object.insert("key".to_string(), self.value(additional, visiting));
        }

        if object.is_empty() && schema_type(schema).is_none() {
            return Value::Null;
        }
        Value::Object(object)
    }
}

/// The declared type, the first non-null one of a type list.
fn schema_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(ty) => Some(ty.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null"),
        _ => None,
    }
}

fn string_example(format: Option<&str>) -> &'static str {
    match format {
        Some("date") => "1970-01-01",
        Some("date-time") => "1970-01-01T00:00:00Z",
        Some("uuid") => "00000000-0000-0000-0000-000000000000",
        Some("email") => "user@example.com",
        _ => "string",
    }
}

/// An example request of an operation.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RequestExample {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    /// Compact JSON, or the `{body}` placeholder.
    body: Option<String>,
    /// Media type and value of the body examples.
    body_examples: Vec<(String, MediaExample)>,
}

impl RequestExample {
    /// The request in `format`.
    ///
    /// ```text
    /// basic  /pets/7?limit=10
    /// curl   curl -s -S -H "X-Request-Id: {X-Request-Id}" -X GET "/pets/7?limit=10"
    /// ```
    pub(super) fn render(&self, format: RequestExamplesFormat) -> String {
        let target = format!("{}{}", self.path, self.query_string());
        match format {
            RequestExamplesFormat::Basic => target,
            RequestExamplesFormat::Curl => {
                let mut command = String::from("curl -s -S");
                for (name, value) in &self.headers {
                    command.push_str(&format!(" -H \"{name}: {}\"", shell_escape(value)));
                }
                command.push_str(&format!(" -X {} \"{target}\"", self.method));
                if let Some(body) = &self.body {
                    command.push_str(&format!(" -d \"{}\"", shell_escape(body)));
                }
                command
            }
            RequestExamplesFormat::InvokeWebRequest => {
                let mut command =
                    format!("Invoke-WebRequest -Uri \"{target}\" -Method {}", self.method);
                if !self.headers.is_empty() {
                    let headers = self
                        .headers
                        .iter()
                        .map(|(name, value)| format!("\"{name}\"=\"{}\"", powershell_escape(value)))
                        .collect::<Vec<_>>()
                        .join("; ");
                    command.push_str(&format!(" -Headers @{{{headers}}}"));
                }
                if let Some(body) = &self.body {
                    command.push_str(&format!(" -Body \"{}\"", powershell_escape(body)));
                }
                command
            }
        }
    }

    fn query_string(&self) -> String {
        if self.query.is_empty() {
            return String::new();
        }
        let pairs = self
            .query
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>();
        format!("?{}", pairs.join("&"))
    }
}

fn shell_escape(value: &str) -> String {
    value.replace('"', "\\\"")
}

fn powershell_escape(value: &str) -> String {
    value.replace('"', "`\"")
}

/// Examples of one response.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ResponseExamples {
    code: String,
    examples: Vec<(String, MediaExample)>,
}

/// Collects the examples of an operation.
#[derive(Debug, Clone)]
pub(super) struct OperationExamples<'a> {
    generator: ExampleGenerator<'a>,
    generate: bool,
}

impl<'a> OperationExamples<'a> {
    pub(super) fn new(definitions: DefinitionIndex<'a>, generate: bool) -> Self {
        Self {
            generator: ExampleGenerator::new(definitions),
            generate,
        }
    }

    fn generated(&self, schema: Option<&RefOr<Schema>>) -> Option<Value> {
        if !self.generate {
            return None;
        }
        schema
            .map(|schema| self.generator.generate(schema))
            .filter(|value| !value.is_null())
    }

    /// The example request, `None` when nothing is declared and generation is disabled.
    ///
    /// `path` already carries the base path. Missing values become `{name}` placeholders.
    pub(super) fn request(
        &self,
        method: Method,
        path: &str,
        parameters: &[ParameterEntry],
        request_body: Option<&RequestBody>,
    ) -> Option<RequestExample> {
        let mut declared = false;
        let mut request = RequestExample {
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            body_examples: Vec::new(),
        };

        for parameter in parameters {
            declared |= parameter.example().is_some();
            let value = parameter
                .example()
                .cloned()
                .or_else(|| self.generated(parameter.schema()))
                .and_then(|value| json_text(&value))
                .unwrap_or_else(|| format!("{{{}}}", parameter.name()));
            match parameter.location() {
                ParameterLocation::Path => {
                    request.path = request
                        .path
                        .replace(&format!("{{{}}}", parameter.name()), &value);
                }
                ParameterLocation::Query => {
                    request.query.push((parameter.name().to_string(), value));
                }
                ParameterLocation::Header => {
                    request.headers.push((parameter.name().to_string(), value));
                }
                ParameterLocation::Cookie
                | ParameterLocation::FormData
                | ParameterLocation::Body => {}
            }
        }

        if let Some((media_type, content)) = request_body.and_then(preferred_content) {
            let mut examples = declared_examples(content);
            declared |= !examples.is_empty();
            if examples.is_empty() {
                examples.extend(
                    self.generated(content.schema.as_ref())
                        .map(MediaExample::of),
                );
            }
            let body = examples
                .iter()
                .find_map(|example| example.value.as_ref())
                .map_or_else(|| "{body}".to_string(), Value::to_string);
            request
                .headers
                .push(("Content-Type".to_string(), media_type.to_string()));
            request.body = Some(body);
            request.body_examples = examples
                .into_iter()
                .map(|example| (media_type.to_string(), example))
                .collect();
        }

        (declared || self.generate).then_some(request)
    }

    /// Examples of each response, skipping responses without any.
    pub(super) fn responses(&self, responses: &[(&str, &Response)]) -> Vec<ResponseExamples> {
        responses
            .iter()
            .filter_map(|(code, response)| {
                let examples = response
                    .content
                    .iter()
                    .flat_map(|(media_type, content)| {
                        let mut examples = declared_examples(content);
                        if examples.is_empty() {
                            examples.extend(
                                self.generated(content.schema.as_ref())
                                    .map(MediaExample::of),
                            );
                        }
                        examples
                            .into_iter()
                            .map(|example| (media_type.clone(), example))
                    })
                    .collect::<Vec<_>>();
                (!examples.is_empty()).then(|| ResponseExamples {
                    code: (*code).to_string(),
                    examples,
                })
            })
            .collect()
    }
}

/// The JSON media type of a body, or its first one.
fn preferred_content(body: &RequestBody) -> Option<(&str, &Content)> {
    body.content
        .iter()
        .find(|(media_type, _)| media_type.contains("json"))
        .or_else(|| body.content.iter().next())
        .map(|(media_type, content)| (media_type.as_str(), content))
}

/// Writes the example request and response sections at `level`.
pub(super) fn write_examples(
    builder: &mut MarkupDocBuilder,
    level: u8,
    format: RequestExamplesFormat,
    request: Option<&RequestExample>,
    responses: &[ResponseExamples],
) {
    if let Some(request) = request {
        builder.section_title(level, REQUEST_SECTION, None);
        builder.section_title(level + 1, "Request path", None);
        builder.listing(format.language(), request.render(format));
        if !request.body_examples.is_empty() {
            builder.section_title(level + 1, "Request body", None);
            media_examples(builder, &request.body_examples);
        }
    }

    if !responses.is_empty() {
        builder.section_title(level, RESPONSE_SECTION, None);
        for response in responses {
            builder.section_title(level + 1, format!("Response {}", response.code), None);
            media_examples(builder, &response.examples);
        }
    }
}

fn media_examples(builder: &mut MarkupDocBuilder, examples: &[(String, MediaExample)]) {
    for (media_type, example) in examples {
        let infos = [
            ("Example", &example.name),
            ("Summary", &example.summary),
            ("Description", &example.description),
            ("External value", &example.external_value),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.clone().map(|value| (label, value)))
        .collect::<Vec<_>>();
        if !infos.is_empty() {
            builder.paragraph(labelled_lines(infos));
        }
        if let Some(value) = &example.value {
            builder.listing(language(media_type), value_text(value, media_type));
        }
    }
}

fn language(media_type: &str) -> Option<&'static str> {
    if media_type.contains("json") {
        Some("json")
    } else if media_type.contains("xml") {
        Some("xml")
    } else {
        None
    }
}

/// Pretty JSON, except raw strings of non-JSON media types, e.g. an XML document.
fn value_text(value: &Value, media_type: &str) -> String {
    match value {
        Value::String(text) if !media_type.contains("json") => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
