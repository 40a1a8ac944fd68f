//! Error types for vellum-core.

use thiserror::Error;

/// Error type for graph-building operations.
///
/// Setup failures (unreadable inputs, bad configuration) abort a run.
/// [`Error::MissingField`] is the only per-record variant: the catalog
/// pipeline logs it and moves on to the next row.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// XML syntax error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML attribute.
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Turtle syntax error while reading a graph back in.
    #[error("Turtle error: {0}")]
    Turtle(#[from] rio_turtle::TurtleError),

    /// A string from the input is not an absolute IRI.
    #[error("Invalid IRI {0}")]
    InvalidIri(String),

    /// Configuration could not be parsed or failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A required catalog column is absent from the header.
    #[error("Catalog is missing required column `{0}`")]
    MissingColumn(String),

    /// A catalog row lacks a required value.
    #[error("Row {row}: missing required field `{field}`")]
    MissingField {
        /// 1-based data row number (header excluded).
        row: usize,
        /// Column name.
        field: &'static str,
    },

    /// The markup document is structurally unusable.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type for graph-building operations.
pub type Result<T> = std::result::Result<T, Error>;
