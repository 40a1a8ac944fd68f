//! Catalog rows: reading and per-row validation.
//!
//! Expects a headered CSV with columns
//! `id, title, type, creator, creator_uri, date, description` and an
//! optional `coverage_place`. Header names and cells are trimmed.

use crate::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns every catalog must have.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "type",
    "creator",
    "creator_uri",
    "date",
    "description",
];

/// A row as it comes off the reader; every cell may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    id: Option<String>,
    title: Option<String>,
    #[serde(rename = "type")]
    type_code: Option<String>,
    creator: Option<String>,
    creator_uri: Option<String>,
    date: Option<String>,
    description: Option<String>,
    coverage_place: Option<String>,
}

/// A validated catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    /// 1-based data row number, for diagnostics.
    pub row: usize,
    /// Local id; minted under the project namespace.
    pub id: String,
    /// Title.
    pub title: String,
    /// Free-text type code carrying a class marker.
    pub type_code: String,
    /// Creator name as written in the catalog.
    pub creator: String,
    /// Inline creator URI, if any.
    pub creator_uri: Option<String>,
    /// Date as written.
    pub date: String,
    /// Description.
    pub description: String,
    /// Coverage place, if any.
    pub coverage_place: Option<String>,
}

impl CatalogRecord {
    /// A record with the three required fields; everything else empty.
    pub fn new(id: impl Into<String>, title: impl Into<String>, type_code: impl Into<String>) -> Self {
        Self {
            row: 0,
            id: id.into(),
            title: title.into(),
            type_code: type_code.into(),
            creator: String::new(),
            creator_uri: None,
            date: String::new(),
            description: String::new(),
            coverage_place: None,
        }
    }

    /// Set creator name and optional URI.
    pub fn with_creator(mut self, name: impl Into<String>, uri: Option<&str>) -> Self {
        self.creator = name.into();
        self.creator_uri = uri.map(str::to_string);
        self
    }

    /// Set date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set coverage place.
    pub fn with_coverage_place(mut self, place: impl Into<String>) -> Self {
        self.coverage_place = Some(place.into());
        self
    }

    fn from_raw(row: usize, raw: RawRow) -> Result<Self> {
        let required = |value: Option<String>, field: &'static str| {
            non_empty(value).ok_or(Error::MissingField { row, field })
        };

        Ok(Self {
            row,
            id: required(raw.id, "id")?,
            title: required(raw.title, "title")?,
            type_code: required(raw.type_code, "type")?,
            creator: non_empty(raw.creator).unwrap_or_default(),
            creator_uri: non_empty(raw.creator_uri),
            date: non_empty(raw.date).unwrap_or_default(),
            description: non_empty(raw.description).unwrap_or_default(),
            coverage_place: non_empty(raw.coverage_place),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Catalog reader.
pub struct Catalog;

impl Catalog {
    /// Open and read a catalog file. Failing to open is fatal.
    pub fn read_path(path: impl AsRef<Path>) -> Result<Vec<Result<CatalogRecord>>> {
        let file = File::open(path.as_ref())?;
        Self::read(file)
    }

    /// Read every row into memory.
    ///
    /// The outer `Result` fails only for setup problems (unreadable header,
    /// missing required column). Each inner `Result` is one row: a
    /// malformed row or a row missing `id`, `title`, or `type` is an `Err`
    /// that the caller may skip.
    pub fn read<R: Read>(reader: R) -> Result<Vec<Result<CatalogRecord>>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::MissingColumn(column.to_string()));
            }
        }

        let rows = reader
            .deserialize::<RawRow>()
            .enumerate()
            .map(|(i, result)| {
                let row = i + 1;
                result
                    .map_err(Error::from)
                    .and_then(|raw| CatalogRecord::from_raw(row, raw))
            })
            .collect();

        Ok(rows)
    }
}
