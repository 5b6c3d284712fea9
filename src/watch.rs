use crate::error::{DocumentError, StoreError};
use crate::store::{DocPath, DocumentStore};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set once the consumer of a read has been torn down
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of one document read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch<T> {
    /// The path was invalid; nothing was read
    Skipped,
    /// No document at the path
    Missing,
    Loaded(T),
    /// The read completed after its consumer went away
    Stale,
}

/// Reads and decodes the document at `path`.
/// `token` is checked after the read returns, before anything is decoded.
///
/// # Examples
/// ```
/// use serde_json::{json, Value};
/// use treffpunkt::store::{DocumentStore, MemoryStore};
/// use treffpunkt::watch::{fetch, CancelToken, Fetch};
///
/// let store = MemoryStore::new();
/// let id = store.create("times", json!({ "times": [] })).unwrap();
/// let token = CancelToken::new();
///
/// let read: Fetch<Value> = fetch(&store, &format!("times/{}", id), &token).unwrap();
/// assert_eq!(read, Fetch::Loaded(json!({ "times": [] })));
///
/// let odd: Fetch<Value> = fetch(&store, "times", &token).unwrap();
/// assert_eq!(odd, Fetch::Skipped);
///
/// token.cancel();
/// let late: Fetch<Value> = fetch(&store, &format!("times/{}", id), &token).unwrap();
/// assert_eq!(late, Fetch::Stale);
/// ```
pub fn fetch<S, T>(store: &S, path: &str, token: &CancelToken) -> Result<Fetch<T>, StoreError>
where
    S: DocumentStore + ?Sized,
    T: DeserializeOwned,
{
    let path = match DocPath::parse(path) {
        Ok(path) => path,
        Err(e) => {
            trace!("skipping read: {}", e);
            return Ok(Fetch::Skipped);
        }
    };

    let document = store.get(&path)?;

    if token.is_cancelled() {
        debug!("discarding stale read of {}", path);
        return Ok(Fetch::Stale);
    }

    match document {
        None => Ok(Fetch::Missing),
        Some(document) => serde_json::from_value(document)
            .map(Fetch::Loaded)
            .map_err(|e| DocumentError::from(e).into()),
    }
}

/// A consumer's view of one document: the last loaded value and an error flag.
/// Dropping the watch cancels any read still in flight.
#[derive(Debug)]
pub struct DocWatch<T> {
    path: String,
    token: CancelToken,
    data: Option<T>,
    error: bool,
    torn_down: bool,
}

impl<T> DocWatch<T>
where
    T: DeserializeOwned,
{
    pub fn new(path: impl Into<String>) -> DocWatch<T> {
        DocWatch {
            path: path.into(),
            token: CancelToken::new(),
            data: None,
            error: false,
            torn_down: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> bool {
        self.error
    }

    /// Token for a read issued on behalf of this watch
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Points the watch at another document.
    /// Reads issued for the previous path become stale; loaded data is kept
    /// until the next read lands. A cancelled watch stays cancelled.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.token.cancel();
        if !self.torn_down {
            self.token = CancelToken::new();
        }
        self.path = path.into();
    }

    /// Applies a completed read
    pub fn apply(&mut self, fetch: Fetch<T>) {
        match fetch {
            Fetch::Loaded(data) => {
                self.data = Some(data);
                self.error = false;
            }
            Fetch::Missing => self.error = true,
            Fetch::Skipped | Fetch::Stale => {}
        }
    }

    /// Reads the current path and applies the result
    pub fn load<S>(&mut self, store: &S) -> Result<(), StoreError>
    where
        S: DocumentStore + ?Sized,
    {
        let token = self.token();
        let read = fetch(store, &self.path, &token)?;
        self.apply(read);
        Ok(())
    }

    /// Tears the watch down; no later read is applied
    pub fn cancel(&mut self) {
        self.torn_down = true;
        self.token.cancel();
    }
}

impl<T> Drop for DocWatch<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
