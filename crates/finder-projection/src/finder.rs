use std::sync::Arc;

use tracing::{debug, warn};

use finder_core::error::{Error, Result};
use finder_core::traits::{Connector, EntityFactory, Finder};
use finder_core::types::{Lookup, Params, ResultSet};

use crate::request;
use crate::response::{decode, slot_reason, GetResponse, Hits, MgetResponse, MgetSlot, SearchResponse, SLOT_FAILURE_STATUS};

pub const DEFAULT_KEEP_ALIVE: &str = "1m";
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// How long a server-side cursor stays alive between calls, and the page
/// size used when a scroll query does not carry its own `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollSettings {
    pub keep_alive: String,
    pub page_size: u64,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self { keep_alive: DEFAULT_KEEP_ALIVE.to_string(), page_size: DEFAULT_PAGE_SIZE }
    }
}

/// Loads projections through a connector and an entity factory.
///
/// The finder keeps no per-call state. Scroll cursors travel with the
/// returned `ResultSet`, so independent scrolls can share one finder.
pub struct ProjectionFinder<C: ?Sized, F> {
    connector: Arc<C>,
    factory: F,
    scroll: ScrollSettings,
}

impl<C, F> ProjectionFinder<C, F>
where
    C: Connector + ?Sized,
    F: EntityFactory,
{
    pub fn new(connector: Arc<C>, factory: F) -> Self {
        Self { connector, factory, scroll: ScrollSettings::default() }
    }

    pub fn with_keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.scroll.keep_alive = keep_alive.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.scroll.page_size = page_size;
        self
    }

    pub fn connector(&self) -> &C { &self.connector }

    pub fn scroll_settings(&self) -> &ScrollSettings { &self.scroll }

    /// One document by id. An absent document yields `ResultSet::empty()`.
    pub fn get_by_identifier(&self, identifier: &str) -> Result<ResultSet<F::Entity>> {
        let request = request::get_request(self.connector.config(), identifier)?;
        let connection = self.connector.connection()?;
        match connection.get(&request)? {
            Lookup::Found(document) => {
                let document: GetResponse = decode(document, "get")?;
                let entity = self.factory.create_entity(&document.source)?;
                Ok(ResultSet::with_total(vec![entity], 1))
            }
            Lookup::Missing => {
                debug!(identifier, "projection not found");
                Ok(ResultSet::empty())
            }
        }
    }

    /// Several documents by id. Ids the backend does not know are skipped;
    /// the total counts only what was found. A slot reporting its own
    /// failure fails the whole call.
    pub fn get_by_identifiers<S: AsRef<str>>(&self, identifiers: &[S]) -> Result<ResultSet<F::Entity>> {
        if identifiers.is_empty() {
            return Ok(ResultSet::empty());
        }
        let request = request::mget_request(self.connector.config(), identifiers)?;
        let connection = self.connector.connection()?;
        let response: MgetResponse = decode(connection.mget(&request)?, "mget")?;
        if response.docs.len() != identifiers.len() {
            return Err(Error::MalformedResponse(format!(
                "mget returned {} slots for {} identifiers",
                response.docs.len(),
                identifiers.len()
            )));
        }

        let mut items = Vec::with_capacity(response.docs.len());
        for slot in response.docs {
            match slot {
                MgetSlot::Failed { id, status, error } => {
                    let reason = slot_reason(&error);
                    warn!(id = ?id, %reason, "mget slot failed");
                    return Err(Error::Backend { status: status.unwrap_or(SLOT_FAILURE_STATUS), reason });
                }
                MgetSlot::Resolved { found: false, .. } => {}
                MgetSlot::Resolved { id, found: true, source } => {
                    let source = source
                        .ok_or_else(|| Error::MalformedResponse(format!("mget slot {:?} is found but has no _source", id)))?;
                    items.push(self.factory.create_entity(&source)?);
                }
            }
        }
        debug!(requested = identifiers.len(), found = items.len(), "mget complete");
        Ok(ResultSet::new(items))
    }

    /// Runs `query` against the configured index and type. The total is the
    /// backend's match count, not the number of hits returned.
    pub fn find(&self, query: &Params) -> Result<ResultSet<F::Entity>> {
        let request = request::search_request(self.connector.config(), query)?;
        let connection = self.connector.connection()?;
        let page: SearchResponse = decode(connection.search(&request)?, "search")?;
        self.map_hits(page.hits)
    }

    pub fn scroll_start(&self, query: &Params) -> Result<ResultSet<F::Entity>> {
        let request = request::scroll_start_request(
            self.connector.config(),
            query,
            &self.scroll.keep_alive,
            self.scroll.page_size,
        )?;
        let connection = self.connector.connection()?;
        let page: SearchResponse = decode(connection.search(&request)?, "scroll start")?;
        self.map_scroll_page(page)
    }

    /// Next page of a scroll. Always continue with the cursor of the
    /// returned result; the backend may rotate it on every call.
    pub fn scroll_next(&self, cursor: &str) -> Result<ResultSet<F::Entity>> {
        let connection = self.connector.connection()?;
        let request = request::scroll_continue_request(cursor, &self.scroll.keep_alive);
        let page: SearchResponse = decode(connection.scroll(&request)?, "scroll")?;
        self.map_scroll_page(page)
    }

    pub fn scroll_end(&self, cursor: &str) -> Result<()> {
        let connection = self.connector.connection()?;
        connection.clear_scroll(&request::scroll_release_request(cursor))?;
        debug!("scroll released");
        Ok(())
    }

    fn map_hits(&self, hits: Hits) -> Result<ResultSet<F::Entity>> {
        let items = hits
            .hits
            .iter()
            .map(|hit| self.factory.create_entity(&hit.source))
            .collect::<Result<Vec<_>>>()?;
        let total = match hits.total {
            Some(total) => total.value(),
            None => items.len() as u64,
        };
        debug!(hits = items.len(), total, "search page mapped");
        Ok(ResultSet::with_total(items, total))
    }

    fn map_scroll_page(&self, page: SearchResponse) -> Result<ResultSet<F::Entity>> {
        let cursor = page
            .scroll_id
            .ok_or_else(|| Error::MalformedResponse("scroll response has no _scroll_id".into()))?;
        Ok(self.map_hits(page.hits)?.at_offset(0).with_scroll_cursor(cursor))
    }
}

impl<C, F> Finder for ProjectionFinder<C, F>
where
    C: Connector + ?Sized,
    F: EntityFactory,
{
    type Entity = F::Entity;

    fn get_by_identifier(&self, identifier: &str) -> Result<ResultSet<F::Entity>> {
        ProjectionFinder::get_by_identifier(self, identifier)
    }

    fn get_by_identifiers(&self, identifiers: &[String]) -> Result<ResultSet<F::Entity>> {
        ProjectionFinder::get_by_identifiers(self, identifiers)
    }

    fn find(&self, query: &Params) -> Result<ResultSet<F::Entity>> {
        ProjectionFinder::find(self, query)
    }

    fn scroll_start(&self, query: &Params) -> Result<ResultSet<F::Entity>> {
        ProjectionFinder::scroll_start(self, query)
    }

    fn scroll_next(&self, cursor: &str) -> Result<ResultSet<F::Entity>> {
        ProjectionFinder::scroll_next(self, cursor)
    }

    fn scroll_end(&self, cursor: &str) -> Result<()> {
        ProjectionFinder::scroll_end(self, cursor)
    }
}
