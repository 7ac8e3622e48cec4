//! Extension points of the conversion.
//!
//! An [`Extension`] is called at fixed positions of every document, operation and definition
//! and may append content there. A [`ModelExtension`] may rewrite the OpenAPI model before the
//! conversion starts.
//!
//! # Example
//!
//! ```rust
//! use oasdoc_core::{
//!     ConvertConfig, Converter, DocumentKind, ExtensionContext, ExtensionRegistry, Inline, Position,
//!     Scope,
//! };
//! use utoipa::openapi::OpenApiBuilder;
//!
//! let extensions = ExtensionRegistry::default().with_extension(|context: &mut ExtensionContext<'_>| {
//!     if context.scope() == Scope::Document(DocumentKind::Overview)
//!         && context.position() == Position::End
//!     {
//!         context.builder().paragraph(vec![Inline::italic("Generated documentation")]);
//!     }
//! });
//!
//! let config = ConvertConfig::default();
//! let output = Converter::new(&config)
//!     .with_extensions(extensions)
//!     .convert(&OpenApiBuilder::new().build())?;
//! assert!(output.overview.blocks().last().is_some());
//! # Ok::<(), oasdoc_core::ConvertError>(())
//! ```

use std::fmt;

use utoipa::openapi::OpenApi;

use crate::markup::MarkupDocBuilder;

/// The four logical documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// API information, servers and tags.
    Overview,
    /// Operations.
    Paths,
    /// Named schemas.
    Definitions,
    /// Security schemes.
    Security,
}

/// What an extension is called for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A whole document.
    Document(DocumentKind),
    /// One operation of the paths document.
    Operation,
    /// One definition of the definitions document.
    Definition,
}

/// Where in the current scope an extension is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Before the title.
    Before,
    /// Right after the title.
    Begin,
    /// After the content, before nested inline definitions.
    End,
    /// After everything else.
    After,
}

/// What an extension sees when it is called.
pub struct ExtensionContext<'a> {
    scope: Scope,
    position: Position,
    subject: Option<&'a str>,
    builder: &'a mut MarkupDocBuilder,
}

impl<'a> ExtensionContext<'a> {
    pub(crate) fn new(
        scope: Scope,
        position: Position,
        subject: Option<&'a str>,
        builder: &'a mut MarkupDocBuilder,
    ) -> Self {
        Self {
            scope,
            position,
            subject,
            builder,
        }
    }

    /// The current scope.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// The current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Operation id or definition name, for operation and definition scopes.
    pub fn subject(&self) -> Option<&str> {
        self.subject
    }

    /// The builder of the document being written.
    pub fn builder(&mut self) -> &mut MarkupDocBuilder {
        self.builder
    }
}

/// Content contributed at an extension point.
pub trait Extension {
    /// Called at every extension point; filter on [`ExtensionContext::scope`] and
    /// [`ExtensionContext::position`].
    fn apply(&self, context: &mut ExtensionContext<'_>);
}

impl<F> Extension for F
where
    F: Fn(&mut ExtensionContext<'_>),
{
    fn apply(&self, context: &mut ExtensionContext<'_>) {
        self(context);
    }
}

/// Rewrites the model before the conversion.
pub trait ModelExtension {
    /// Modifies the model in place.
    fn apply(&self, api: &mut OpenApi);
}

impl<F> ModelExtension for F
where
    F: Fn(&mut OpenApi),
{
    fn apply(&self, api: &mut OpenApi) {
        self(api);
    }
}

/// The extensions of a conversion, called in registration order.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn Extension>>,
    model_extensions: Vec<Box<dyn ModelExtension>>,
}

impl ExtensionRegistry {
    /// Registers a content extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Registers a model extension.
    #[must_use]
    pub fn with_model_extension(mut self, extension: impl ModelExtension + 'static) -> Self {
        self.model_extensions.push(Box::new(extension));
        self
    }

    /// Whether any model extension is registered.
    pub fn has_model_extensions(&self) -> bool {
        !self.model_extensions.is_empty()
    }

    pub(crate) fn apply_model(&self, api: &mut OpenApi) {
        for extension in &self.model_extensions {
            extension.apply(api);
        }
    }

    pub(crate) fn apply(
        &self,
        scope: Scope,
        position: Position,
        subject: Option<&str>,
        builder: &mut MarkupDocBuilder,
    ) {
        if self.extensions.is_empty() {
            return;
        }
        let mut context = ExtensionContext::new(scope, position, subject, builder);
        for extension in &self.extensions {
            extension.apply(&mut context);
        }
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ExtensionRegistry")
            .field("extensions", &self.extensions.len())
            .field("model_extensions", &self.model_extensions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use utoipa::openapi::{InfoBuilder, OpenApiBuilder};

    use super::*;
    use crate::markup::{Block, Inline};

    #[test]
    fn should_call_extensions_in_registration_order() {
        let registry = ExtensionRegistry::default()
            .with_extension(|context: &mut ExtensionContext<'_>| {
                context.builder().paragraph(vec![Inline::text("first")]);
            })
            .with_extension(|context: &mut ExtensionContext<'_>| {
                let subject = context.subject().unwrap_or("none").to_string();
                context.builder().paragraph(vec![Inline::text(subject)]);
            });
        let mut builder = MarkupDocBuilder::default();

        registry.apply(Scope::Operation, Position::End, Some("addPet"), &mut builder);

        assert_eq!(
            builder.build().blocks(),
            [
                Block::Paragraph {
                    content: vec![Inline::text("first")]
                },
                Block::Paragraph {
                    content: vec![Inline::text("addPet")]
                },
            ]
        );
    }

    #[test]
    fn should_rewrite_model() {
        let registry = ExtensionRegistry::default().with_model_extension(|api: &mut OpenApi| {
            api.info.title = "Rewritten".to_string();
        });
        let mut api = OpenApiBuilder::new()
            .info(InfoBuilder::new().title("Original").version("1"))
            .build();

        registry.apply_model(&mut api);

        assert!(registry.has_model_extensions());
        assert_eq!(api.info.title, "Rewritten");
    }
}
