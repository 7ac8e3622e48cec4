//! Structured markup instructions.
//!
//! The conversion decides *what* to show and *which* reference to embed; it never writes dialect
//! syntax. A [`MarkupDocument`] is the ordered list of instructions a dialect renderer consumes.

mod builder;
mod render;

use serde::Serialize;

pub use self::builder::MarkupDocBuilder;
#[cfg(feature = "yaml")]
pub use self::render::YamlRenderer;
pub use self::render::{JsonRenderer, Renderer};

/// Normalizes a name into an identifier usable as anchor and file name.
///
/// ```rust
/// use oasdoc_core::normalize_name;
///
/// assert_eq!(normalize_name("Pet"), "pet");
/// assert_eq!(normalize_name("/pets/{petId} get"), "pets-petid-get");
/// assert_eq!(normalize_name("addPet Response 200"), "addpet-response-200");
/// ```
pub fn normalize_name(name: &str) -> String {
    slug::slugify(name)
}

/// A run of inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Inline {
    /// Plain text.
    Text(String),
    /// Strong text.
    Bold(String),
    /// Emphasized text.
    Italic(String),
    /// Literal (monospace) text.
    Literal(String),
    /// Link to an anchor, possibly in another document.
    #[serde(rename_all = "camelCase")]
    CrossReference {
        /// Relative path of the target document, `None` for the current one.
        document: Option<String>,
        /// The normalized target anchor.
        anchor: String,
        /// The link label.
        label: String,
    },
    /// Hard line break.
    LineBreak,
}

impl Inline {
    /// Plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Strong text.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::Bold(text.into())
    }

    /// Emphasized text.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::Italic(text.into())
    }

    /// Literal text.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }
}

/// Kind of an admonition block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdmonitionKind {
    /// Neutral note.
    Note,
    /// Hint.
    Tip,
    /// Something to keep in mind.
    Important,
    /// Something that may go wrong.
    Caution,
    /// Something that will go wrong.
    Warning,
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Header label.
    pub header: String,
    /// Relative width.
    pub width_ratio: u8,
    /// Whether the cells are header cells.
    pub header_column: bool,
}

impl Column {
    /// A regular column.
    pub fn new(header: impl Into<String>, width_ratio: u8) -> Self {
        Self {
            header: header.into(),
            width_ratio,
            header_column: false,
        }
    }

    /// Marks the cells of the column as header cells.
    #[must_use]
    pub fn as_header(mut self) -> Self {
        self.header_column = true;
        self
    }
}

/// A block of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "block", rename_all = "camelCase")]
pub enum Block {
    /// Title of the whole document.
    DocumentTitle {
        /// The title.
        title: String,
    },
    /// Section title.
    Section {
        /// Nesting level, the document title being level 0.
        level: u8,
        /// The title.
        title: String,
        /// Normalized anchor, if the section is a link target.
        #[serde(skip_serializing_if = "Option::is_none")]
        anchor: Option<String>,
    },
    /// Paragraph.
    Paragraph {
        /// Inline content.
        content: Vec<Inline>,
    },
    /// Table; every row has one cell per column.
    Table {
        /// The columns.
        columns: Vec<Column>,
        /// The rows.
        rows: Vec<Vec<Vec<Inline>>>,
    },
    /// Bulleted list.
    List {
        /// One entry per item.
        items: Vec<Vec<Inline>>,
    },
    /// Verbatim block.
    Listing {
        /// Source language, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        /// The content.
        content: String,
    },
    /// Admonition.
    Admonition {
        /// Kind of the admonition.
        kind: AdmonitionKind,
        /// Inline content.
        content: Vec<Inline>,
    },
    /// Page break.
    PageBreak,
}

/// A document, as an ordered list of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkupDocument {
    blocks: Vec<Block>,
}

impl MarkupDocument {
    pub(crate) fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// The blocks.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Whether the document has no content.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Titles of the sections, with their level, in document order.
    pub fn section_titles(&self) -> impl Iterator<Item = (u8, &str)> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Section { level, title, .. } => Some((*level, title.as_str())),
            _ => None,
        })
    }

    /// Anchors of the sections, in document order.
    pub fn anchors(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Section {
                anchor: Some(anchor),
                ..
            } => Some(anchor.as_str()),
            _ => None,
        })
    }

    /// Every cross reference of the document, tables and lists included.
    pub fn cross_references(&self) -> Vec<&Inline> {
        self.blocks
            .iter()
            .flat_map(Block::inlines)
            .filter(|inline| matches!(inline, Inline::CrossReference { .. }))
            .collect()
    }
}

impl Block {
    /// Inline content of the block, in reading order.
    pub fn inlines(&self) -> Box<dyn Iterator<Item = &Inline> + '_> {
        match self {
            Self::Paragraph { content } | Self::Admonition { content, .. } => {
                Box::new(content.iter())
            }
            Self::Table { rows, .. } => Box::new(rows.iter().flatten().flatten()),
            Self::List { items } => Box::new(items.iter().flatten()),
            Self::DocumentTitle { .. }
            | Self::Section { .. }
            | Self::Listing { .. }
            | Self::PageBreak => Box::new(std::iter::empty()),
        }
    }
}
