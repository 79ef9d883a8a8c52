//! Page decoding for paginated collection responses.
//!
//! The service exposes paginated collections as page objects of the shape
//! `{items, total, limit, offset, next}`. Search-style endpoints nest the
//! page object one level down under a result key, and cursor-based feeds
//! additionally carry an opaque `cursors` mapping instead of a usable
//! offset. This module decodes any of those shapes into a [`PageState`]
//! in one validated step.

use crate::{Result, TuneError};
use serde_json::{Map, Value};

/// How a raw response body maps onto a page object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// The response body is the page object itself.
    Flat,
    /// The page object sits under a named key, e.g. the `"tracks"` sub-object
    /// of a search response.
    Keyed(String),
    /// Like [`Envelope::Keyed`], but for cursor-based feeds: the nested
    /// object's `offset` is ignored and its `cursors` mapping is captured.
    Cursor(String),
}

/// One fetched page of a collection.
///
/// Holds the raw item payloads for the current page window plus the metadata
/// needed to advance: the server-reported collection size, the page limit,
/// and the absolute URL of the following page. A pager owns exactly one
/// `PageState` at a time and replaces it wholesale when it crosses a page
/// boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    /// Total number of items in the logical collection, as reported by the
    /// server at fetch time. The client does not reconcile changes between
    /// page fetches.
    pub total: u64,
    /// Absolute URL of the next page, or `None` on the last page.
    pub next: Option<String>,
    /// Raw item payloads for this page, at most `limit` of them.
    pub items: Vec<Value>,
    /// Page size used by the server for this page. Always at least 1.
    pub limit: u64,
    /// Index of the first item of this page within the logical collection.
    /// `None` for cursor-based feeds, which are not offset-addressable.
    pub offset: Option<u64>,
}

/// A decoded page plus the cursor tokens that rode along with it, if any.
///
/// This is what [`Envelope::project`] produces; the cursors are `Some` only
/// for [`Envelope::Cursor`] projections.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPage {
    pub page: PageState,
    pub cursors: Option<Map<String, Value>>,
}

fn require<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    obj.get(key)
        .ok_or_else(|| TuneError::MalformedPage(format!("missing required field '{key}'")))
}

fn require_u64(obj: &Map<String, Value>, key: &str) -> Result<u64> {
    require(obj, key)?
        .as_u64()
        .ok_or_else(|| TuneError::MalformedPage(format!("field '{key}' is not a non-negative integer")))
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| TuneError::MalformedPage(format!("{what} is not a JSON object")))
}

impl PageState {
    /// Decode a flat page object.
    ///
    /// All five wire fields are required keys; `next` and (when
    /// `require_offset` holds) `offset` may be null. A `limit` of zero is
    /// rejected here so the pager's offset-within-page arithmetic can never
    /// divide by zero.
    fn decode(value: &Value, require_offset: bool) -> Result<Self> {
        let obj = as_object(value, "page object")?;

        let total = require_u64(obj, "total")?;

        let next = match require(obj, "next")? {
            Value::Null => None,
            Value::String(url) => Some(url.clone()),
            _ => {
                return Err(TuneError::MalformedPage(
                    "field 'next' is neither a URL string nor null".to_string(),
                ))
            }
        };

        let items = require(obj, "items")?
            .as_array()
            .ok_or_else(|| TuneError::MalformedPage("field 'items' is not an array".to_string()))?
            .clone();

        let limit = require_u64(obj, "limit")?;
        if limit == 0 {
            return Err(TuneError::MalformedPage("field 'limit' is zero".to_string()));
        }

        let offset = if require_offset {
            match require(obj, "offset")? {
                Value::Null => None,
                v => Some(v.as_u64().ok_or_else(|| {
                    TuneError::MalformedPage(
                        "field 'offset' is neither a non-negative integer nor null".to_string(),
                    )
                })?),
            }
        } else {
            None
        };

        Ok(Self {
            total,
            next,
            items,
            limit,
            offset,
        })
    }
}

impl Envelope {
    /// Project a raw response body into a page, per this envelope shape.
    ///
    /// Replaces whatever page the caller previously held; decoding validates
    /// every required field once, here, so the step algorithm never has to.
    pub fn project(&self, raw: &Value) -> Result<ProjectedPage> {
        match self {
            Envelope::Flat => Ok(ProjectedPage {
                page: PageState::decode(raw, true)?,
                cursors: None,
            }),
            Envelope::Keyed(key) => {
                let nested = require(as_object(raw, "response body")?, key)?;
                Ok(ProjectedPage {
                    page: PageState::decode(nested, true)?,
                    cursors: None,
                })
            }
            Envelope::Cursor(key) => {
                let nested = require(as_object(raw, "response body")?, key)?;
                let cursors = require(as_object(nested, "cursor feed object")?, "cursors")?
                    .as_object()
                    .ok_or_else(|| {
                        TuneError::MalformedPage("field 'cursors' is not an object".to_string())
                    })?
                    .clone();
                // Cursor feeds are not offset-addressable; whatever the
                // server put there is discarded.
                Ok(ProjectedPage {
                    page: PageState::decode(nested, false)?,
                    cursors: Some(cursors),
                })
            }
        }
    }
}
