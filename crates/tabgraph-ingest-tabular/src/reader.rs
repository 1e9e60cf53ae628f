//! Stream resources and delimited-text reading.
//!
//! A [`StreamResourceRegistry`] maps source locators to byte content. A
//! [`TabularReader`] opens a resource with a [`Dialect`] and hands back a
//! [`RowSource`] that yields the first record (for schema resolution) and then
//! every data record in order.

use std::collections::BTreeMap;
use std::io::{self, Cursor};
use std::path::Path;
use std::sync::Arc;

use csv::StringRecord;

use crate::error::{Result, TabularError};

/// Delimiter, quote and header handling for one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    /// Whether the first record is a header line rather than data.
    pub has_header: bool,
}

/// Named byte content, shared cheaply between pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamResource {
    uri: String,
    content: Arc<[u8]>,
}

impl StreamResource {
    pub fn new(uri: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        Self {
            uri: uri.into(),
            content: content.into(),
        }
    }

    pub fn from_text(uri: impl Into<String>, text: &str) -> Self {
        Self::new(uri, text.as_bytes())
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StreamResourceRegistry {
    resources: BTreeMap<String, StreamResource>,
}

impl StreamResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under its own URI, replacing any previous one.
    pub fn register(&mut self, resource: StreamResource) {
        self.resources.insert(resource.uri.clone(), resource);
    }

    /// Read `path` and register its bytes under `uri`.
    pub fn register_file(&mut self, uri: impl Into<String>, path: &Path) -> io::Result<()> {
        let content = std::fs::read(path)?;
        self.register(StreamResource::new(uri, content));
        Ok(())
    }

    pub fn get(&self, uri: &str) -> Result<&StreamResource> {
        self.resources
            .get(uri)
            .ok_or_else(|| TabularError::ResourceNotFound {
                locator: uri.to_string(),
            })
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.resources.contains_key(uri)
    }

    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}

/// One data record; empty cells are `None`.
pub type Record = Vec<Option<String>>;

pub trait RowSource {
    /// The first record of the input, or `None` when the input is empty.
    ///
    /// With a header this is the header line; without one it is the first
    /// data record, which [`RowSource::next_row`] still yields afterwards.
    fn first_record(&mut self) -> Result<Option<Vec<String>>>;

    /// The next data record. Errors are [`TabularError::ReadFailure`].
    fn next_row(&mut self) -> Option<Result<Record>>;
}

pub trait TabularReader {
    fn open(&self, resource: &StreamResource, dialect: &Dialect) -> Result<Box<dyn RowSource>>;
}

/// Reader backed by the `csv` crate. Rows may be ragged; width is checked by
/// the row mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTabularReader;

impl TabularReader for CsvTabularReader {
    fn open(&self, resource: &StreamResource, dialect: &Dialect) -> Result<Box<dyn RowSource>> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(dialect.delimiter)
            .quote(dialect.quote)
            .has_headers(dialect.has_header)
            .flexible(true)
            .from_reader(Cursor::new(Arc::clone(&resource.content)));

        Ok(Box::new(CsvRowSource {
            reader,
            locator: resource.uri.clone(),
            rows_read: 0,
            record: StringRecord::new(),
        }))
    }
}

struct CsvRowSource {
    reader: csv::Reader<Cursor<Arc<[u8]>>>,
    locator: String,
    rows_read: usize,
    record: StringRecord,
}

impl CsvRowSource {
    fn failure(&self, err: csv::Error) -> TabularError {
        TabularError::ReadFailure {
            locator: self.locator.clone(),
            rows_read: self.rows_read,
            message: err.to_string(),
        }
    }
}

impl RowSource for CsvRowSource {
    fn first_record(&mut self) -> Result<Option<Vec<String>>> {
        let headers = match self.reader.headers() {
            Ok(headers) => headers.clone(),
            Err(err) => return Err(self.failure(err)),
        };
        if headers.is_empty() {
            return Ok(None);
        }
        Ok(Some(headers.iter().map(str::to_string).collect()))
    }

    fn next_row(&mut self) -> Option<Result<Record>> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                self.rows_read += 1;
                let cells = self
                    .record
                    .iter()
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect();
                Some(Ok(cells))
            }
            Ok(false) => None,
            Err(err) => Some(Err(self.failure(err))),
        }
    }
}
