//! Flattened views over the OpenAPI model.
//!
//! The conversion works on [`PathOperation`]s (one per path and method), on
//! [`ParameterEntry`]s (path-item and operation parameters plus the request body) and on a
//! [`DefinitionIndex`] of the named schemas.

mod definitions;
mod parameter;

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use utoipa::openapi::path::{Operation, Parameter, PathItem};
use utoipa::openapi::{Deprecated, OpenApi};

pub use self::definitions::DefinitionIndex;
pub(crate) use self::definitions::reference_name;
pub use self::parameter::{ParameterEntry, ParameterLocation};

/// HTTP methods, declared in their natural documentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    /// `POST`
    Post,
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
}

impl Method {
    /// Upper case name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Plain text of a serializable model value: strings unquoted, `null` absent.
pub(crate) fn json_text<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    match serde_json::to_value(value).ok()? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Lists the operations of a path item in declaration order.
fn iter_operations(path_item: &PathItem) -> impl Iterator<Item = (Method, &Operation)> {
    [
        (Method::Get, path_item.get.as_ref()),
        (Method::Put, path_item.put.as_ref()),
        (Method::Post, path_item.post.as_ref()),
        (Method::Delete, path_item.delete.as_ref()),
        (Method::Options, path_item.options.as_ref()),
        (Method::Head, path_item.head.as_ref()),
        (Method::Patch, path_item.patch.as_ref()),
        (Method::Trace, path_item.trace.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, operation)| operation.map(|operation| (method, operation)))
}

/// One operation of the API, addressed by its path and method.
#[derive(Debug, Clone)]
pub struct PathOperation {
    method: Method,
    path: String,
    operation: Operation,
    path_parameters: Vec<Parameter>,
}

impl PathOperation {
    /// Creates an operation outside of any path item.
    pub fn new(method: Method, path: impl Into<String>, operation: Operation) -> Self {
        Self {
            method,
            path: path.into(),
            operation,
            path_parameters: Vec::new(),
        }
    }

    /// Collects every operation of the API, in declaration order.
    pub fn collect(api: &OpenApi) -> Vec<Self> {
        api.paths
            .paths
            .iter()
            .flat_map(|(path, path_item)| {
                let path_parameters = path_item.parameters.clone().unwrap_or_default();
                iter_operations(path_item).map(move |(method, operation)| Self {
                    method,
                    path: path.clone(),
                    operation: operation.clone(),
                    path_parameters: path_parameters.clone(),
                })
            })
            .collect()
    }

    /// The HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The path template, e.g. `/pets/{id}`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The underlying OpenAPI operation.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// The operation id, or `"<path> <method>"` when the model does not declare one.
    pub fn id(&self) -> String {
        match &self.operation.operation_id {
            Some(id) if !id.trim().is_empty() => id.clone(),
            _ => format!("{} {}", self.path, self.method.as_str().to_lowercase()),
        }
    }

    /// The operation summary, or `"METHOD path"`.
    pub fn title(&self) -> String {
        match &self.operation.summary {
            Some(summary) if !summary.trim().is_empty() => summary.clone(),
            _ => format!("{} {}", self.method, self.path),
        }
    }

    /// Declared tags, possibly empty.
    pub fn tags(&self) -> &[String] {
        self.operation.tags.as_deref().unwrap_or_default()
    }

    /// Whether the operation is marked as deprecated.
    pub fn is_deprecated(&self) -> bool {
        matches!(self.operation.deprecated, Some(Deprecated::True))
    }

    /// Media types accepted by the request body.
    pub fn consumes(&self) -> Vec<String> {
        self.operation
            .request_body
            .as_ref()
            .map(|body| body.content.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Media types produced by any response.
    pub fn produces(&self) -> Vec<String> {
        let produced: BTreeSet<&String> = self
            .operation
            .responses
            .responses
            .values()
            .filter_map(|response| match response {
                utoipa::openapi::RefOr::T(response) => Some(response.content.keys()),
                utoipa::openapi::RefOr::Ref(_) => None,
            })
            .flatten()
            .collect();
        produced.into_iter().cloned().collect()
    }

    /// Parameters of the operation, body included.
    ///
    /// Operation parameters override path-item parameters with the same name and location.
    pub fn parameters(&self) -> Vec<ParameterEntry> {
        let operation_parameters = self.operation.parameters.as_deref().unwrap_or_default();

        let mut entries: Vec<ParameterEntry> = self
            .path_parameters
            .iter()
            .filter(|inherited| {
                !operation_parameters.iter().any(|parameter| {
                    parameter.name == inherited.name
                        && parameter.parameter_in == inherited.parameter_in
                })
            })
            .chain(operation_parameters)
            .map(ParameterEntry::from_parameter)
            .collect();

        if let Some(body) = &self.operation.request_body {
            entries.extend(ParameterEntry::from_request_body(body));
        }

        entries
    }
}

impl fmt::Display for PathOperation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use utoipa::openapi::path::{OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder};
    use utoipa::openapi::{HttpMethod, OpenApiBuilder, PathsBuilder};

    use super::*;

    fn query(name: &str, description: &str) -> Parameter {
        ParameterBuilder::new()
            .name(name)
            .parameter_in(ParameterIn::Query)
            .description(Some(description))
            .build()
    }

    #[test]
    fn should_collect_operations_in_declaration_order() {
        let api = OpenApiBuilder::new()
            .paths(
                PathsBuilder::new()
                    .path(
                        "/b",
                        PathItemBuilder::new()
                            .operation(HttpMethod::Get, OperationBuilder::new().build())
                            .build(),
                    )
                    .path(
                        "/a",
                        PathItemBuilder::new()
                            .operation(HttpMethod::Post, OperationBuilder::new().build())
                            .operation(HttpMethod::Get, OperationBuilder::new().build())
                            .build(),
                    ),
            )
            .build();

        let operations = PathOperation::collect(&api)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        assert_eq!(operations, ["GET /a", "POST /a", "GET /b"]);
    }

    #[test]
    fn should_default_id_and_title() {
        let operation = PathOperation::new(Method::Get, "/pets/{id}", OperationBuilder::new().build());

        assert_eq!(operation.id(), "/pets/{id} get");
        assert_eq!(operation.title(), "GET /pets/{id}");
    }

    #[test]
    fn should_prefer_declared_id_and_summary() {
        let operation = PathOperation::new(
            Method::Delete,
            "/pets/{id}",
            OperationBuilder::new()
                .operation_id(Some("deletePet"))
                .summary(Some("Deletes a pet"))
                .build(),
        );

        assert_eq!(operation.id(), "deletePet");
        assert_eq!(operation.title(), "Deletes a pet");
    }

    #[test]
    fn should_override_path_item_parameters() {
        let mut operation = PathOperation::new(
            Method::Get,
            "/pets",
            OperationBuilder::new()
                .parameter(query("limit", "operation limit"))
                .build(),
        );
        operation.path_parameters = vec![query("limit", "path limit"), query("offset", "offset")];

        let parameters = operation.parameters();
        let described = parameters
            .iter()
            .map(|parameter| {
                format!(
                    "{}={}",
                    parameter.name(),
                    parameter.description().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>();

        assert_eq!(described, ["offset=offset", "limit=operation limit"]);
    }

    #[test]
    fn should_order_methods_naturally() {
        let mut methods = vec![Method::Options, Method::Get, Method::Post, Method::Delete];
        methods.sort();

        assert_eq!(
            methods,
            [Method::Post, Method::Get, Method::Delete, Method::Options]
        );
    }
}
