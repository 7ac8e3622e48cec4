//! # oasdoc core
//!
//! Turn an OpenAPI model into structured, cross-referenced documentation.
//!
//! The conversion produces four logical documents:
//! - **overview**: API information, contact, license, servers and tags
//! - **paths**: every operation, optionally grouped by tag or by a regex-extracted header
//! - **definitions**: every named schema with its properties table
//! - **security**: every security scheme
//!
//! Operations and definitions can additionally be split into one file each. Every document is a
//! [`MarkupDocument`], a tree of structured instructions (sections, paragraphs, tables,
//! cross references) that a dialect renderer turns into AsciiDoc, Markdown or anything else.
//!
//! ## Quick Start
//!
//! ```rust
//! use oasdoc_core::{ConvertConfig, GroupBy, convert};
//! use utoipa::openapi::{InfoBuilder, OpenApiBuilder};
//!
//! # fn main() -> Result<(), oasdoc_core::ConvertError> {
//! let api = OpenApiBuilder::new()
//!     .info(InfoBuilder::new().title("Pet store").version("1.0.0"))
//!     .build();
//!
//! let config = ConvertConfig::builder()
//!     .with_group_by(GroupBy::AsIs)
//!     .with_separated_definitions(true)
//!     .build()?;
//!
//! let output = convert(&api, &config)?;
//! assert!(!output.overview.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Type resolution
//!
//! Schemas are mapped into a closed [`Type`] model by the [`SchemaMapper`]. Anonymous nested
//! objects are turned into named inline definitions by the [`InlineExtractor`], which draws
//! collision-free identifiers from the run-scoped [`NameRegistry`] held by a
//! [`ConversionContext`]. Cross references between documents and files are computed by the
//! [`DocumentResolver`] implementations in [`resolver`].

mod config;
mod convert;
mod document;
mod error;
mod extension;
mod inline;
mod mapper;
mod markup;
mod model;
mod ordering;
pub mod resolver;
mod types;

#[cfg(feature = "yaml")]
mod yaml;

pub use self::config::{
    Comparator, ConvertConfig, ConvertConfigBuilder, ConvertSettings, GroupBy, MarkupLanguage,
    OrderBy, Ordering, RequestExamplesFormat,
};
pub use self::convert::{ConversionContext, ConversionOutput, Converter, OutputFile, convert};
pub use self::error::ConvertError;
pub use self::extension::{
    DocumentKind, Extension, ExtensionContext, ExtensionRegistry, ModelExtension, Position, Scope,
};
pub use self::inline::{InlineExtractor, NameRegistry};
pub use self::mapper::SchemaMapper;
pub use self::markup::{
    AdmonitionKind, Block, Column, Inline, JsonRenderer, MarkupDocBuilder, MarkupDocument,
    Renderer, normalize_name,
};
pub use self::model::{
    DefinitionIndex, Method, ParameterEntry, ParameterLocation, PathOperation,
};
pub use self::ordering::{NaturalOrder, group_by_regex, group_by_tags, sort_by_ordering};
pub use self::resolver::DocumentResolver;
pub use self::types::{
    ArrayType, BasicType, CollectionFormat, EnumType, ObjectType, Polymorphism, PolymorphismNature,
    PropertySchema, RefType, Type, TypeName,
};

#[cfg(feature = "yaml")]
pub use self::markup::YamlRenderer;
#[cfg(feature = "yaml")]
pub use self::yaml::{ToYaml, YamlError};
