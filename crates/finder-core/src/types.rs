//! Values exchanged between finders, connectors and their callers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object: outgoing requests, configured parameters and raw `_source`
/// attribute mappings all share this shape.
pub type Params = Map<String, Value>;

/// Opaque token naming a server-side scroll.
pub type ScrollId = String;

/// Outcome of a point lookup at the connection boundary.
///
/// An absent document is an expected answer, not a failure, so it is
/// reported here instead of through `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    Missing,
}

/// The uniform answer of every finder operation.
///
/// - `items`: entities in backend order
/// - `total_count`: matches known to the backend, may exceed `items.len()`
/// - `offset`: position of the first item within the full match set
/// - `scroll_cursor`: set only by scroll operations
///
/// Equality compares all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet<T> {
    items: Vec<T>,
    total_count: u64,
    offset: u64,
    scroll_cursor: Option<ScrollId>,
}

impl<T> ResultSet<T> {
    /// Result whose total equals the number of items.
    pub fn new(items: Vec<T>) -> Self {
        let total_count = items.len() as u64;
        Self::with_total(items, total_count)
    }

    pub fn with_total(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count, offset: 0, scroll_cursor: None }
    }

    pub fn empty() -> Self {
        Self::with_total(Vec::new(), 0)
    }

    pub fn at_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_scroll_cursor(mut self, cursor: impl Into<ScrollId>) -> Self {
        self.scroll_cursor = Some(cursor.into());
        self
    }

    pub fn items(&self) -> &[T] { &self.items }

    pub fn total_count(&self) -> u64 { self.total_count }

    pub fn offset(&self) -> u64 { self.offset }

    pub fn scroll_cursor(&self) -> Option<&str> { self.scroll_cursor.as_deref() }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn into_items(self) -> Vec<T> { self.items }
}

impl<T> Default for ResultSet<T> {
    fn default() -> Self { Self::empty() }
}

impl<T> IntoIterator for ResultSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter { self.items.into_iter() }
}
