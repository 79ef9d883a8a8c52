//! Shared test fixtures: a canned-response transport and page builders.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tunewire::{Result, Transport, TuneError};

/// Transport serving canned JSON bodies by URL, with fetch instrumentation.
///
/// Clones share state, so a test can keep a handle for assertions after
/// moving a clone into a pager.
#[derive(Clone, Debug, Default)]
pub struct FakeTransport {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    routes: HashMap<String, Value>,
    fail_once: HashSet<String>,
    log: Vec<String>,
}

#[allow(dead_code)]
impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for GETs of `url`.
    pub fn route(&self, url: &str, body: Value) {
        self.inner.borrow_mut().routes.insert(url.to_string(), body);
    }

    /// Make the next fetch of `url` fail with a transport error; later
    /// fetches fall through to the routed body.
    pub fn fail_once(&self, url: &str) {
        self.inner.borrow_mut().fail_once.insert(url.to_string());
    }

    /// Number of fetches performed so far.
    pub fn fetch_count(&self) -> usize {
        self.inner.borrow().log.len()
    }

    /// Every fetched URL, in order.
    pub fn fetched_urls(&self) -> Vec<String> {
        self.inner.borrow().log.clone()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn fetch(&self, url: &str) -> Result<Value> {
        let mut inner = self.inner.borrow_mut();
        inner.log.push(url.to_string());
        if inner.fail_once.remove(url) {
            return Err(TuneError::Http(format!("injected failure for {url}")));
        }
        inner
            .routes
            .get(url)
            .cloned()
            .ok_or_else(|| TuneError::Http(format!("no canned response for {url}")))
    }
}

/// Build a flat page object in the service's wire shape.
#[allow(dead_code)]
pub fn page(items: Vec<Value>, total: u64, limit: u64, offset: u64, next: Option<&str>) -> Value {
    json!({
        "items": items,
        "total": total,
        "limit": limit,
        "offset": offset,
        "next": next,
    })
}

/// String items `"i<start>"` .. `"i<end - 1>"`, handy for yield-order checks.
#[allow(dead_code)]
pub fn items(start: u64, end: u64) -> Vec<Value> {
    (start..end).map(|i| json!(format!("i{i}"))).collect()
}
