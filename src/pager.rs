//! Asynchronous traversal of server-side paginated collections.
//!
//! A [`Pager`] is constructed from an already-fetched first page and pulls
//! items one at a time, transparently following the server-supplied `next`
//! URL whenever the current page window is exhausted. It yields raw
//! [`Value`] payloads; [`TypedPager`] layers entity deserialization on top.

use crate::page::{Envelope, PageState};
use crate::transport::Transport;
use crate::{Result, TuneError};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Async iterator trait for paginated Web API data.
///
/// This trait provides a common interface for iterating over paginated
/// collections: search results, playlist tracks, followed artists, and so
/// on. Iteration is lazy, forward-only, and non-restartable; page fetches
/// happen on demand inside [`next`](Self::next).
///
/// A single logical consumer drives each iterator through `&mut self`, so
/// concurrent consumption requires external serialization.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait AsyncPaginatedIterator<T> {
    /// Fetch the next item from the iterator.
    ///
    /// This method automatically handles pagination, fetching new pages as
    /// needed. Returns `None` when there are no more items available.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(item))` - Next item in the sequence
    /// - `Ok(None)` - End of sequence (not an error)
    /// - `Err(...)` - Transport or decoding error; the iterator's state is
    ///   left as of the last successful page, so the call may be retried
    async fn next(&mut self) -> Result<Option<T>>;

    /// Collect all remaining items into a Vec.
    ///
    /// **Warning**: This method will fetch ALL remaining pages, which could
    /// be many thousands of items for large collections. Use
    /// [`take`](Self::take) for safer bounded collection.
    async fn collect_all(&mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Take up to n items from the iterator.
    ///
    /// This is the recommended way to collect a bounded number of items
    /// from potentially large collections.
    ///
    /// # Arguments
    ///
    /// * `n` - Maximum number of items to collect
    async fn take(&mut self, n: usize) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for _ in 0..n {
            match self.next().await? {
                Some(item) => items.push(item),
                None => break,
            }
        }
        Ok(items)
    }
}

/// Pager over a server-side paginated collection, yielding raw item payloads.
///
/// The pager owns exactly one [`PageState`] at a time; crossing a page
/// boundary fetches the `next` URL through the transport and replaces the
/// page wholesale. Items are yielded in strict page order and, within a
/// page, in the server-provided array order.
///
/// Termination checks run before any boundary fetch, so a capped or
/// exhausted pager never issues a request for a page it will not consume
/// from.
#[derive(Debug)]
pub struct Pager<C: Transport> {
    transport: C,
    envelope: Envelope,
    page: PageState,
    cursors: Option<Map<String, Value>>,
    index: u64,
    max_items: Option<u64>,
}

impl<C: Transport> Pager<C> {
    /// Create a pager over a flat page response.
    ///
    /// `initial` is the first page, already fetched by the caller. Fails
    /// with [`TuneError::MalformedPage`] if it is missing required fields
    /// or carries a zero limit.
    ///
    /// # Arguments
    ///
    /// * `transport` - Collaborator used for follow-up page fetches
    /// * `initial` - The first page object, e.g. a `/playlists/{id}/tracks`
    ///   response body
    /// * `max_items` - Optional cap on items to yield, independent of the
    ///   server-reported total
    pub fn new(transport: C, initial: &Value, max_items: Option<u64>) -> Result<Self> {
        Self::with_envelope(transport, initial, Envelope::Flat, max_items)
    }

    /// Create a pager over a keyed (search-style) envelope.
    ///
    /// The page object is expected one level down under `result_key`,
    /// alongside sibling keys for other result types.
    pub fn keyed(
        transport: C,
        initial: &Value,
        result_key: impl Into<String>,
        max_items: Option<u64>,
    ) -> Result<Self> {
        Self::with_envelope(transport, initial, Envelope::Keyed(result_key.into()), max_items)
    }

    /// Create a pager over a cursor-based feed.
    ///
    /// Like [`keyed`](Self::keyed), but the nested object's `offset` is
    /// ignored (cursor feeds are not offset-addressable) and its `cursors`
    /// mapping is captured for introspection via [`cursors`](Self::cursors).
    /// Page advancement still follows the generic `next` URL; the server
    /// encodes the cursor into that URL itself.
    pub fn cursor_based(
        transport: C,
        initial: &Value,
        result_key: impl Into<String>,
        max_items: Option<u64>,
    ) -> Result<Self> {
        Self::with_envelope(transport, initial, Envelope::Cursor(result_key.into()), max_items)
    }

    fn with_envelope(
        transport: C,
        initial: &Value,
        envelope: Envelope,
        max_items: Option<u64>,
    ) -> Result<Self> {
        let projected = envelope.project(initial)?;
        Ok(Self {
            transport,
            envelope,
            page: projected.page,
            cursors: projected.cursors,
            index: 0,
            max_items,
        })
    }

    /// Total collection size as reported by the most recent page fetch.
    ///
    /// May change between pages if the server-side collection mutates; only
    /// the termination bound is affected, never already-yielded items.
    pub fn total(&self) -> u64 {
        self.page.total
    }

    /// Page size the server used for the current page.
    pub fn limit(&self) -> u64 {
        self.page.limit
    }

    /// Number of items yielded so far across all pages.
    pub fn items_yielded(&self) -> u64 {
        self.index
    }

    /// Offset of the current page within the logical collection.
    ///
    /// Always `None` for cursor-based feeds, regardless of what the server
    /// supplied.
    pub fn offset(&self) -> Option<u64> {
        self.page.offset
    }

    /// The `next` URL of the current page, if the server supplied one.
    pub fn next_url(&self) -> Option<&str> {
        self.page.next.as_deref()
    }

    /// Opaque cursor tokens echoed by the server, for cursor-based feeds.
    ///
    /// `None` for flat and keyed pagers. The mapping is exposed unchanged;
    /// the pager never interprets it.
    pub fn cursors(&self) -> Option<&Map<String, Value>> {
        self.cursors.as_ref()
    }
}

#[async_trait(?Send)]
impl<C: Transport> AsyncPaginatedIterator<Value> for Pager<C> {
    async fn next(&mut self) -> Result<Option<Value>> {
        let idx = self.index;
        // limit is validated non-zero at page decode time.
        let within_page = (idx % self.page.limit) as usize;

        // Exhaustion and the caller's cap both terminate before any
        // boundary fetch, so the pager never requests a page it will not
        // consume from.
        if idx >= self.page.total {
            return Ok(None);
        }
        if let Some(max) = self.max_items {
            if idx >= max {
                return Ok(None);
            }
        }

        if within_page == 0 && idx > 0 {
            let Some(url) = self.page.next.clone() else {
                return Ok(None);
            };
            log::debug!("Fetching next page at item {idx}: {url}");
            let raw = self.transport.fetch(&url).await?;
            let projected = self.envelope.project(&raw)?;
            self.page = projected.page;
            self.cursors = projected.cursors;
        }

        let item = self.page.items.get(within_page).cloned().ok_or_else(|| {
            TuneError::MalformedPage(format!(
                "page served {} items but item {within_page} of the window was requested",
                self.page.items.len()
            ))
        })?;

        // The index only advances on success, so a failed fetch leaves the
        // same logical step retryable.
        self.index += 1;
        Ok(Some(item))
    }
}

/// Pager that deserializes each raw item into an entity type.
///
/// Thin wrapper over [`Pager`]; all traversal and termination behavior is
/// the inner pager's. Item payloads that fail to deserialize surface as
/// [`TuneError::Json`] from the step where they were pulled.
pub struct TypedPager<C: Transport, T> {
    pager: Pager<C>,
    _marker: PhantomData<T>,
}

impl<C: Transport, T: DeserializeOwned> TypedPager<C, T> {
    /// Wrap a raw pager.
    ///
    /// This is typically called via the client's pager-returning methods,
    /// e.g. [`TuneClient::search_tracks`](crate::TuneClient::search_tracks).
    pub fn new(pager: Pager<C>) -> Self {
        Self {
            pager,
            _marker: PhantomData,
        }
    }

    /// Total collection size as reported by the most recent page fetch.
    pub fn total(&self) -> u64 {
        self.pager.total()
    }

    /// Offset of the current page within the logical collection.
    pub fn offset(&self) -> Option<u64> {
        self.pager.offset()
    }

    /// Opaque cursor tokens echoed by the server, for cursor-based feeds.
    pub fn cursors(&self) -> Option<&Map<String, Value>> {
        self.pager.cursors()
    }
}

#[async_trait(?Send)]
impl<C: Transport, T: DeserializeOwned> AsyncPaginatedIterator<T> for TypedPager<C, T> {
    async fn next(&mut self) -> Result<Option<T>> {
        match AsyncPaginatedIterator::next(&mut self.pager).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}
