//! The security document.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::components::labelled_lines;
use crate::convert::ConversionContext;
use crate::extension::{DocumentKind, ExtensionRegistry, Position, Scope};
use crate::markup::{Column, Inline, MarkupDocBuilder, MarkupDocument};
use crate::model::json_text;

const FLOWS: [(&str, &str); 4] = [
    ("implicit", "implicit"),
    ("password", "password"),
    ("clientCredentials", "client credentials"),
    ("authorizationCode", "authorization code"),
];

/// Builds the security document; empty when the model declares no security scheme.
pub(crate) fn build(
    context: &ConversionContext<'_>,
    extensions: &ExtensionRegistry,
) -> MarkupDocument {
    let Some(schemes) = context
        .api()
        .components
        .as_ref()
        .map(|components| &components.security_schemes)
        .filter(|schemes| !schemes.is_empty())
    else {
        return MarkupDocument::default();
    };

    let mut builder = MarkupDocBuilder::new(context.config().anchor_prefix());
    let scope = Scope::Document(DocumentKind::Security);

    extensions.apply(scope, Position::Before, None, &mut builder);
    builder.section_title(1, "Security", Some("securityscheme"));
    extensions.apply(scope, Position::Begin, None, &mut builder);

    for (name, scheme) in schemes {
        let fields = match serde_json::to_value(scheme) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) | Err(_) => {
                warn!(scheme = %name, "security scheme cannot be read, skipped");
                continue;
            }
        };
        builder.section_title(2, name.as_str(), Some(name.as_str()));
        scheme_content(&mut builder, &fields);
        debug!(scheme = %name, "security scheme processed");
    }

    extensions.apply(scope, Position::End, None, &mut builder);
    extensions.apply(scope, Position::After, None, &mut builder);
    builder.build()
}

fn scheme_content(builder: &mut MarkupDocBuilder, fields: &Map<String, Value>) {
    let text = |key: &str| fields.get(key).and_then(json_text);
    builder.text_paragraph(text("description").as_deref());

    let kind = text("type").unwrap_or_default();
    let mut lines = vec![("Type", kind.clone())];
    match kind.as_str() {
        "apiKey" => {
            lines.extend(text("name").map(|name| ("Name", name)));
            lines.extend(text("in").map(|location| ("In", location.to_uppercase())));
        }
        "http" => {
            lines.extend(text("scheme").map(|scheme| ("Scheme", scheme)));
            lines.extend(text("bearerFormat").map(|format| ("Bearer format", format)));
        }
        "openIdConnect" => {
            lines.extend(text("openIdConnectUrl").map(|url| ("OpenId Connect URL", url)));
        }
        _ => {}
    }
    builder.paragraph(labelled_lines(lines));

    let flows = fields.get("flows").and_then(Value::as_object);
    for (key, label) in FLOWS {
        let Some(flow) = flows.and_then(|flows| flows.get(key)) else {
            continue;
        };
        let url = |key: &str| flow.get(key).and_then(json_text);
        let mut lines = vec![("Flow", label.to_string())];
        lines.extend(url("authorizationUrl").map(|url| ("Authorization URL", url)));
        lines.extend(url("tokenUrl").map(|url| ("Token URL", url)));
        builder.paragraph(labelled_lines(lines));

        let rows = flow
            .get("scopes")
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
            .map(|(scope, description)| {
                vec![
                    vec![Inline::bold(scope)],
                    json_text(description)
                        .map(|description| vec![Inline::text(description)])
                        .unwrap_or_default(),
                ]
            })
            .collect();
        builder.table(
            vec![Column::new("Name", 3), Column::new("Description", 17)],
            rows,
        );
    }
}
