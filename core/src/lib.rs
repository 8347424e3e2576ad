//! Core library for building and querying a Wikipedia article link graph.
//!
//! Two independent concerns live here: turning a bzip2 multistream XML dump
//! into a compact `.wpindex` artifact ([`loadwiki`], [`wpindex`]), and
//! loading that artifact into memory to answer shortest-path queries
//! ([`index`]). [`article`], [`extract`] and [`offsets`] are the parsing
//! primitives both sides share; [`errorcontext`] is the cooperative
//! cancellation mechanism the parallel build uses.

pub mod article;
pub mod error;
pub mod errorcontext;
pub mod extract;
pub mod index;
pub mod loadwiki;
pub mod offsets;
pub mod wpindex;

pub use error::{LoadError, OffsetLineError, QueryError, WpindexError, XmlError};
pub use index::Index;
pub use loadwiki::build_wpindex;
pub use wpindex::{StrippedArticle, WpindexReader, WpindexWriter};
