use super::MarkupDocument;

/// Turns a [`MarkupDocument`] into text.
///
/// Dialect renderers (AsciiDoc, Markdown...) live outside of this crate; the renderers shipped
/// here serialize the instruction tree itself.
pub trait Renderer {
    /// Rendering error.
    type Error;

    /// File extension of the rendered text, appended to the document path.
    fn extension(&self) -> &'static str;

    /// Renders a document.
    ///
    /// # Errors
    ///
    /// Implementation-specific.
    fn render(&self, document: &MarkupDocument) -> Result<String, Self::Error>;
}

/// Serializes documents as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    /// Pretty-printed output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Renderer for JsonRenderer {
    type Error = serde_json::Error;

    fn extension(&self) -> &'static str {
        ".json"
    }

    fn render(&self, document: &MarkupDocument) -> Result<String, Self::Error> {
        if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        }
    }
}

/// Serializes documents as YAML.
#[cfg(feature = "yaml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlRenderer;

#[cfg(feature = "yaml")]
impl Renderer for YamlRenderer {
    type Error = crate::yaml::YamlError;

    fn extension(&self) -> &'static str {
        ".yaml"
    }

    fn render(&self, document: &MarkupDocument) -> Result<String, Self::Error> {
        use crate::yaml::ToYaml;

        document.to_yaml()
    }
}
