use super::{AdmonitionKind, Block, Column, Inline, MarkupDocument, normalize_name};

/// Builds a [`MarkupDocument`] block by block.
///
/// Anchors passed to the builder are normalized and prefixed with the configured anchor
/// prefix, so a section anchor and a cross reference built from the same name always match.
///
/// ```rust
/// use oasdoc_core::{Inline, MarkupDocBuilder};
///
/// let mut builder = MarkupDocBuilder::new(None);
/// builder.section_title(1, "Definitions", Some("definitions"));
/// let link = builder.cross_reference(None, "Order Item", "Order Item");
/// builder.paragraph(vec![Inline::text("See "), link]);
///
/// let document = builder.build();
/// assert_eq!(document.anchors().collect::<Vec<_>>(), ["definitions"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkupDocBuilder {
    anchor_prefix: Option<String>,
    blocks: Vec<Block>,
}

impl MarkupDocBuilder {
    /// Creates an empty builder.
    pub fn new(anchor_prefix: Option<&str>) -> Self {
        Self {
            anchor_prefix: anchor_prefix.map(str::to_string),
            blocks: Vec::new(),
        }
    }

    /// A builder with the same settings and no content.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self::new(self.anchor_prefix.as_deref())
    }

    /// The normalized anchor of `name`.
    pub fn anchor(&self, name: &str) -> String {
        match &self.anchor_prefix {
            Some(prefix) => format!("{}{}", prefix, normalize_name(name)),
            None => normalize_name(name),
        }
    }

    /// A cross reference to the anchor of `name`.
    pub fn cross_reference(
        &self,
        document: Option<String>,
        name: &str,
        label: impl Into<String>,
    ) -> Inline {
        Inline::CrossReference {
            document,
            anchor: self.anchor(name),
            label: label.into(),
        }
    }

    /// Sets the document title.
    pub fn document_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::DocumentTitle {
            title: title.into(),
        });
        self
    }

    /// Adds a section title, anchored on the normalized `anchor`.
    pub fn section_title(
        &mut self,
        level: u8,
        title: impl Into<String>,
        anchor: Option<&str>,
    ) -> &mut Self {
        let anchor = anchor.map(|anchor| self.anchor(anchor));
        self.blocks.push(Block::Section {
            level,
            title: title.into(),
            anchor,
        });
        self
    }

    /// Adds a paragraph; empty content is skipped.
    pub fn paragraph(&mut self, content: Vec<Inline>) -> &mut Self {
        if !content.is_empty() {
            self.blocks.push(Block::Paragraph { content });
        }
        self
    }

    /// Adds a paragraph made of a single text run, if any.
    pub fn text_paragraph(&mut self, text: Option<&str>) -> &mut Self {
        match text.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => self.paragraph(vec![Inline::text(text)]),
            None => self,
        }
    }

    /// Adds a table; a table without rows is skipped.
    pub fn table(&mut self, columns: Vec<Column>, rows: Vec<Vec<Vec<Inline>>>) -> &mut Self {
        if !rows.is_empty() {
            self.blocks.push(Block::Table { columns, rows });
        }
        self
    }

    /// Adds a list; an empty list is skipped.
    pub fn list(&mut self, items: Vec<Vec<Inline>>) -> &mut Self {
        if !items.is_empty() {
            self.blocks.push(Block::List { items });
        }
        self
    }

    /// Adds a verbatim block.
    pub fn listing(&mut self, language: Option<&str>, content: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Listing {
            language: language.map(str::to_string),
            content: content.into(),
        });
        self
    }

    /// Adds an admonition.
    pub fn admonition(&mut self, kind: AdmonitionKind, content: Vec<Inline>) -> &mut Self {
        self.blocks.push(Block::Admonition { kind, content });
        self
    }

    /// Adds a page break.
    pub fn page_break(&mut self) -> &mut Self {
        self.blocks.push(Block::PageBreak);
        self
    }

    /// Appends the content of another builder.
    pub fn append(&mut self, other: Self) -> &mut Self {
        self.blocks.extend(other.blocks);
        self
    }

    /// Whether nothing was added yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Finishes the document.
    pub fn build(self) -> MarkupDocument {
        MarkupDocument::new(self.blocks)
    }
}
