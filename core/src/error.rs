//! Error types for every stage of the ingest/query pipeline.

use std::io;

use thiserror::Error;

/// Failures while tokenizing a MediaWiki XML stream.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml parse error: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Failures while parsing a `<offset>:<id>:<title>` stream-index line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OffsetLineError {
    #[error("expected 3 colon-separated fields, found {0}")]
    WrongFieldCount(usize),
    #[error("invalid offset {0:?}")]
    InvalidOffset(String),
    #[error("invalid page id {0:?}")]
    InvalidId(String),
    #[error("empty title")]
    EmptyTitle,
}

/// Failures while building a `.wpindex` from a dump + stream index.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error("stream index: {0}")]
    Offset(#[from] OffsetLineError),
    #[error(transparent)]
    Wpindex(#[from] WpindexError),
    #[error("aborted: {0}")]
    Cancelled(String),
}

/// Failures while reading or writing a `.wpindex` artifact.
#[derive(Debug, Error)]
pub enum WpindexError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("encoding error: {0}")]
    Encode(#[from] bincode::Error),
}

/// Failures from the path-finding query surface.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QueryError {
    #[error("article not found: {0:?}")]
    ArticleNotFound(String),
    #[error("index is empty")]
    EmptyIndex,
    #[error("could not find valid path")]
    NoPath,
}
