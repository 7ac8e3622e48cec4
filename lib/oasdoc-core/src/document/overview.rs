//! The overview document.

use super::ServerUri;
use super::components::labelled_lines;
use crate::convert::ConversionContext;
use crate::extension::{DocumentKind, ExtensionRegistry, Position, Scope};
use crate::markup::{Inline, MarkupDocBuilder, MarkupDocument};
use crate::ordering::sort_by_ordering;

/// Builds the overview document. It always has at least the API title.
pub(crate) fn build(
    context: &ConversionContext<'_>,
    extensions: &ExtensionRegistry,
) -> MarkupDocument {
    let api = context.api();
    let info = &api.info;
    let mut builder = MarkupDocBuilder::new(context.config().anchor_prefix());
    let scope = Scope::Document(DocumentKind::Overview);

    extensions.apply(scope, Position::Before, None, &mut builder);
    builder.document_title(info.title.as_str());
    builder.section_title(1, "Overview", Some("overview"));
    extensions.apply(scope, Position::Begin, None, &mut builder);
    builder.text_paragraph(info.description.as_deref());

    if !info.version.trim().is_empty() {
        section(
            &mut builder,
            "Version information",
            vec![("Version", info.version.clone())],
        );
    }

    if let Some(contact) = &info.contact {
        let lines = [
            ("Contact", contact.name.clone()),
            ("Contact Email", contact.email.clone()),
            ("Contact URL", contact.url.clone()),
        ];
        section(&mut builder, "Contact information", present(lines));
    }

    let license = info.license.as_ref();
    let lines = [
        ("License", license.map(|license| license.name.clone())),
        ("License URL", license.and_then(|license| license.url.clone())),
        ("Terms of service", info.terms_of_service.clone()),
    ];
    section(&mut builder, "License information", present(lines));

    let servers = api
        .servers
        .iter()
        .flatten()
        .map(|server| ServerUri::parse(&server.url))
        .collect::<Vec<_>>();
    let mut schemes = Vec::new();
    for scheme in servers.iter().filter_map(|server| server.scheme.as_deref()) {
        let scheme = scheme.to_uppercase();
        if !schemes.contains(&scheme) {
            schemes.push(scheme);
        }
    }
    let lines = [
        ("Host", servers.iter().find_map(|server| server.host.clone())),
        (
            "BasePath",
            servers.iter().find_map(|server| server.base_path.clone()),
        ),
        (
            "Schemes",
            Some(schemes.join(", ")).filter(|schemes| !schemes.is_empty()),
        ),
    ];
    section(&mut builder, "URI scheme", present(lines));

    let mut tags = api.tags.iter().flatten().collect::<Vec<_>>();
    sort_by_ordering(&mut tags, context.config().tag_ordering(), |tag| {
        tag.name.as_str()
    });
    let items = tags
        .into_iter()
        .map(|tag| match tag.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => {
                vec![Inline::text(format!("{} : {description}", tag.name))]
            }
            _ => vec![Inline::text(tag.name.as_str())],
        })
        .collect::<Vec<_>>();
    if !items.is_empty() {
        builder.section_title(2, "Tags", None);
        builder.list(items);
    }

    if let Some(docs) = &api.external_docs {
        let label = docs
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty());
        let content = match label {
            Some(label) => vec![Inline::text(format!("{label} : ")), Inline::literal(&docs.url)],
            None => vec![Inline::literal(&docs.url)],
        };
        builder.section_title(2, "External Docs", None);
        builder.paragraph(content);
    }

    extensions.apply(scope, Position::End, None, &mut builder);
    extensions.apply(scope, Position::After, None, &mut builder);
    builder.build()
}

/// The lines with a non-blank value.
fn present<'l, const N: usize>(
    lines: [(&'l str, Option<String>); N],
) -> Vec<(&'l str, String)> {
    lines
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| (label, value)))
        .filter(|(_, value)| !value.trim().is_empty())
        .collect()
}

fn section(builder: &mut MarkupDocBuilder, title: &str, lines: Vec<(&str, String)>) {
    if lines.is_empty() {
        return;
    }
    builder.section_title(2, title, None);
    builder.paragraph(labelled_lines(lines));
}

#[cfg(test)]
mod tests {
    use utoipa::openapi::external_docs::ExternalDocs;
    use utoipa::openapi::info::{ContactBuilder, LicenseBuilder};
    use utoipa::openapi::server::Server;
    use utoipa::openapi::tag::TagBuilder;
    use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

    use super::*;
    use crate::config::{ConvertConfig, Ordering};
    use crate::markup::Block;

    fn pet_store() -> OpenApi {
        let mut api = OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title("Pet store")
                    .version("1.0.0")
                    .description(Some("Everything about your pets"))
                    .contact(Some(
                        ContactBuilder::new()
                            .name(Some("API team"))
                            .email(Some("api@petstore.io"))
                            .build(),
                    ))
                    .license(Some(
                        LicenseBuilder::new()
                            .name("Apache 2.0")
                            .url(Some("https://www.apache.org/licenses/LICENSE-2.0"))
                            .build(),
                    )),
            )
            .servers(Some([
                Server::new("https://petstore.io/v2"),
                Server::new("http://petstore.io/v2"),
            ]))
            .tags(Some([
                TagBuilder::new()
                    .name("store")
                    .description(Some("Access to orders"))
                    .build(),
                TagBuilder::new().name("pet").build(),
            ]))
            .build();
        api.external_docs = Some(ExternalDocs::new("https://petstore.io/docs"));
        api
    }

    fn line<'i>(inlines: impl IntoIterator<Item = &'i Inline>) -> String {
        inlines
            .into_iter()
            .map(|inline| match inline {
                Inline::Text(text)
                | Inline::Bold(text)
                | Inline::Italic(text)
                | Inline::Literal(text) => text.as_str(),
                Inline::LineBreak => " / ",
                Inline::CrossReference { label, .. } => label.as_str(),
            })
            .collect()
    }

    fn text(document: &MarkupDocument) -> String {
        document
            .blocks()
            .iter()
            .map(|block| match block {
                Block::DocumentTitle { title } => format!("= {title}"),
                Block::Section { level, title, .. } => {
                    format!("{} {title}", "=".repeat(usize::from(*level) + 1))
                }
                Block::List { items } => items.iter().map(line).collect::<Vec<_>>().join("\n"),
                other => line(other.inlines()),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn should_build_overview() {
        let api = pet_store();
        let config = ConvertConfig::default();
        let context = ConversionContext::new(&api, &config);

        let document = build(&context, &ExtensionRegistry::default());

        insta::assert_snapshot!(text(&document), @r"
        = Pet store
        == Overview
        Everything about your pets
        === Version information
        Version : 1.0.0
        === Contact information
        Contact : API team / Contact Email : api@petstore.io
        === License information
        License : Apache 2.0 / License URL : https://www.apache.org/licenses/LICENSE-2.0
        === URI scheme
        Host : petstore.io / BasePath : /v2 / Schemes : HTTPS, HTTP
        === Tags
        pet
        store : Access to orders
        === External Docs
        https://petstore.io/docs
        ");
    }

    #[test]
    fn should_keep_tags_as_declared() {
        let api = pet_store();
        let config = ConvertConfig::builder()
            .with_tag_ordering(Ordering::AsIs)
            .build()
            .expect("valid config");
        let context = ConversionContext::new(&api, &config);

        let document = build(&context, &ExtensionRegistry::default());

        let tags = document.blocks().iter().find_map(|block| match block {
            Block::List { items } => Some(items.clone()),
            _ => None,
        });
        assert_eq!(
            tags,
            Some(vec![
                vec![Inline::text("store : Access to orders")],
                vec![Inline::text("pet")],
            ])
        );
    }

    #[test]
    fn should_always_have_a_title() {
        let api = OpenApiBuilder::new().build();
        let config = ConvertConfig::default();
        let context = ConversionContext::new(&api, &config);

        let document = build(&context, &ExtensionRegistry::default());

        assert!(!document.is_empty());
        assert_eq!(document.anchors().collect::<Vec<_>>(), ["overview"]);
    }
}
