use crate::error::{DocumentError, StoreError, ValidationError};
use itertools::Itertools;
use log::{debug, trace};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use uuid::Uuid;

pub type Document = Value;

/// Slash separated `collection/id[/collection/id...]` address of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    segments: Vec<String>,
}

impl DocPath {
    /// Parses a document path.
    /// Zero segments, empty segments or an odd segment count are invalid.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt::store::DocPath;
    ///
    /// assert!(DocPath::parse("times/abc").is_ok());
    /// assert!(DocPath::parse("times/abc/votes/1").is_ok());
    /// assert!(DocPath::parse("times").is_err());
    /// assert!(DocPath::parse("times/").is_err());
    /// assert!(DocPath::parse("").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<DocPath, ValidationError> {
        let segments = path.split('/').map(str::to_string).collect_vec();

        if segments.iter().any(String::is_empty) || segments.len() % 2 != 0 {
            return Err(ValidationError::InvalidPath {
                path: path.to_string(),
            });
        }

        Ok(DocPath { segments })
    }

    /// Path of document `id` in a top-level `collection`
    pub fn document(collection: &str, id: &str) -> Result<DocPath, ValidationError> {
        DocPath::parse(&format!("{}/{}", collection, id))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment: the document id
    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.iter().join("/"))
    }
}

/// Nested field address inside a document.
/// Segments are kept apart, so a segment may itself contain dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new<I, S>(segments: I) -> FieldPath
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldPath(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

/// Generic document store the core is handed by reference
pub trait DocumentStore {
    /// `Ok(None)` when no document lives at `path`
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    /// Adds a document to `collection`, returning its new id
    fn create(&self, collection: &str, fields: Document) -> Result<String, StoreError>;

    /// Sets each field path, creating intermediate maps and leaving other fields untouched
    fn update(&self, path: &DocPath, fields: Vec<(FieldPath, Value)>) -> Result<(), StoreError>;
}

impl<S> DocumentStore for &S
where
    S: DocumentStore + ?Sized,
{
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        (**self).get(path)
    }

    fn create(&self, collection: &str, fields: Document) -> Result<String, StoreError> {
        (**self).create(collection, fields)
    }

    fn update(&self, path: &DocPath, fields: Vec<(FieldPath, Value)>) -> Result<(), StoreError> {
        (**self).update(path, fields)
    }
}

/// In-process store keyed by document path
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Document>>, StoreError> {
        self.documents
            .lock()
            .map_err(|_| StoreError::Transport("memory store lock poisoned".to_string()))
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        trace!("get {}", path);
        Ok(self.lock()?.get(&path.to_string()).cloned())
    }

    fn create(&self, collection: &str, fields: Document) -> Result<String, StoreError> {
        let segments = collection.split('/').collect_vec();
        if segments.iter().any(|s| s.is_empty()) || segments.len() % 2 != 1 {
            return Err(ValidationError::InvalidPath {
                path: collection.to_string(),
            }
            .into());
        }
        if !fields.is_object() {
            return Err(DocumentError::Malformed {
                reason: "document fields must be a map".to_string(),
            }
            .into());
        }

        let id = Uuid::new_v4().simple().to_string();
        debug!("create {}/{}", collection, id);
        self.lock()?.insert(format!("{}/{}", collection, id), fields);

        Ok(id)
    }

    fn update(&self, path: &DocPath, fields: Vec<(FieldPath, Value)>) -> Result<(), StoreError> {
        let mut documents = self.lock()?;
        let document = documents
            .get_mut(&path.to_string())
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })?;

        for (field, value) in fields {
            debug!("update {} field {:?}", path, field.segments());
            set_field(document, field.segments(), value)?;
        }

        Ok(())
    }
}

fn set_field(document: &mut Value, field: &[String], value: Value) -> Result<(), StoreError> {
    let (last, parents) = field.split_last().ok_or_else(|| DocumentError::Malformed {
        reason: "empty field path".to_string(),
    })?;

    let mut current = document;
    for segment in parents {
        current = as_map(current)?
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    as_map(current)?.insert(last.clone(), value);

    Ok(())
}

// Scalars on the way down are replaced by maps, as a nested field write would
fn as_map(value: &mut Value) -> Result<&mut Map<String, Value>, StoreError> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }

    value.as_object_mut().ok_or_else(|| {
        DocumentError::Malformed {
            reason: "expected a map".to_string(),
        }
        .into()
    })
}
