mod common;

use common::{items, page, FakeTransport};
use serde_json::json;
use tunewire::{AsyncPaginatedIterator, Pager, TuneError};

const U2: &str = "https://api.example.com/v1/things?offset=2";
const U3: &str = "https://api.example.com/v1/things?offset=4";

#[tokio::test]
async fn traverses_three_pages_in_order() {
    let transport = FakeTransport::new();
    transport.route(U2, page(items(2, 4), 5, 2, 2, Some(U3)));
    transport.route(U3, page(items(4, 5), 5, 2, 4, None));

    let initial = page(items(0, 2), 5, 2, 0, Some(U2));
    let mut pager = Pager::new(transport.clone(), &initial, None).unwrap();

    let yielded = pager.collect_all().await.unwrap();
    assert_eq!(
        yielded,
        vec![json!("i0"), json!("i1"), json!("i2"), json!("i3"), json!("i4")]
    );

    // Exactly two follow-up fetches, in page order.
    assert_eq!(transport.fetched_urls(), vec![U2.to_string(), U3.to_string()]);

    // The sequence stays terminated.
    assert!(pager.next().await.unwrap().is_none());
    assert_eq!(transport.fetch_count(), 2);
}

#[tokio::test]
async fn yields_min_of_total_and_cap() {
    let transport = FakeTransport::new();
    let initial = page(items(0, 2), 2, 2, 0, None);
    let mut pager = Pager::new(transport, &initial, Some(7)).unwrap();

    assert_eq!(pager.collect_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn cap_terminates_before_boundary_fetch() {
    let transport = FakeTransport::new();
    let initial = page(items(0, 5), 10, 5, 0, Some(U2));
    let mut pager = Pager::new(transport.clone(), &initial, Some(3)).unwrap();

    let yielded = pager.collect_all().await.unwrap();
    assert_eq!(yielded.len(), 3);
    // The cap is hit before the page boundary, so no request goes out.
    assert_eq!(transport.fetch_count(), 0);
}

#[tokio::test]
async fn cap_at_exact_boundary_suppresses_fetch() {
    let transport = FakeTransport::new();
    let initial = page(items(0, 2), 10, 2, 0, Some(U2));
    let mut pager = Pager::new(transport.clone(), &initial, Some(2)).unwrap();

    assert_eq!(pager.collect_all().await.unwrap().len(), 2);
    // Item 2 would be the first of page 2; the cap check runs first.
    assert_eq!(transport.fetch_count(), 0);
}

#[tokio::test]
async fn empty_collection_yields_nothing() {
    let transport = FakeTransport::new();
    let initial = page(vec![], 0, 20, 0, None);
    let mut pager = Pager::new(transport.clone(), &initial, None).unwrap();

    assert!(pager.next().await.unwrap().is_none());
    assert_eq!(transport.fetch_count(), 0);
}

#[tokio::test]
async fn zero_cap_yields_nothing() {
    let transport = FakeTransport::new();
    let initial = page(items(0, 2), 5, 2, 0, Some(U2));
    let mut pager = Pager::new(transport.clone(), &initial, Some(0)).unwrap();

    assert!(pager.next().await.unwrap().is_none());
    assert_eq!(transport.fetch_count(), 0);
}

#[tokio::test]
async fn unset_next_at_boundary_terminates_cleanly() {
    let transport = FakeTransport::new();
    // Server claims 5 items but offers no next page.
    let initial = page(items(0, 2), 5, 2, 0, None);
    let mut pager = Pager::new(transport.clone(), &initial, None).unwrap();

    let yielded = pager.collect_all().await.unwrap();
    assert_eq!(yielded.len(), 2);
    assert_eq!(transport.fetch_count(), 0);
}

#[tokio::test]
async fn index_advances_once_per_item() {
    let transport = FakeTransport::new();
    transport.route(U2, page(items(2, 4), 4, 2, 2, None));
    let initial = page(items(0, 2), 4, 2, 0, Some(U2));
    let mut pager = Pager::new(transport, &initial, None).unwrap();

    for expected in 0..4u64 {
        assert_eq!(pager.items_yielded(), expected);
        assert!(pager.next().await.unwrap().is_some());
        assert_eq!(pager.items_yielded(), expected + 1);
    }
    assert!(pager.next().await.unwrap().is_none());
    assert_eq!(pager.items_yielded(), 4);
}

#[tokio::test]
async fn failed_boundary_fetch_is_retryable() {
    let transport = FakeTransport::new();
    transport.route(U2, page(items(2, 4), 4, 2, 2, None));
    transport.fail_once(U2);

    let initial = page(items(0, 2), 4, 2, 0, Some(U2));
    let mut pager = Pager::new(transport.clone(), &initial, None).unwrap();

    assert_eq!(pager.take(2).await.unwrap().len(), 2);

    // The boundary fetch fails; pager state is untouched.
    let err = pager.next().await.unwrap_err();
    assert!(matches!(err, TuneError::Http(_)));
    assert_eq!(pager.items_yielded(), 2);

    // Retrying the same step re-issues the same fetch and then succeeds.
    assert_eq!(pager.next().await.unwrap(), Some(json!("i2")));
    assert_eq!(pager.next().await.unwrap(), Some(json!("i3")));
    assert!(pager.next().await.unwrap().is_none());
    assert_eq!(transport.fetched_urls(), vec![U2.to_string(), U2.to_string()]);
}

#[tokio::test]
async fn malformed_initial_page_fails_at_construction() {
    let transport = FakeTransport::new();
    let initial = json!({
        "items": [],
        "total": 1,
        "next": null,
        "offset": 0
    });

    let err = Pager::new(transport, &initial, None).unwrap_err();
    assert!(matches!(err, TuneError::MalformedPage(ref msg) if msg.contains("limit")));
}

#[tokio::test]
async fn malformed_refresh_page_fails_at_the_boundary_step() {
    let transport = FakeTransport::new();
    transport.route(U2, json!({"total": 4, "limit": 2, "offset": 2, "next": null}));

    let initial = page(items(0, 2), 4, 2, 0, Some(U2));
    let mut pager = Pager::new(transport, &initial, None).unwrap();

    assert_eq!(pager.take(2).await.unwrap().len(), 2);
    let err = pager.next().await.unwrap_err();
    assert!(matches!(err, TuneError::MalformedPage(ref msg) if msg.contains("items")));
}

#[tokio::test]
async fn short_page_is_reported_not_panicked() {
    let transport = FakeTransport::new();
    // Claims 4 items at limit 2 but only serves one on page 1.
    let initial = page(items(0, 1), 4, 2, 0, Some(U2));
    let mut pager = Pager::new(transport, &initial, None).unwrap();

    assert_eq!(pager.next().await.unwrap(), Some(json!("i0")));
    let err = pager.next().await.unwrap_err();
    assert!(matches!(err, TuneError::MalformedPage(_)));
}

#[tokio::test]
async fn keyed_pager_unwraps_the_envelope() {
    let transport = FakeTransport::new();
    let initial = json!({
        "tracks": {
            "items": ["a", "b", "c"],
            "total": 3,
            "limit": 3,
            "offset": 0,
            "next": null
        }
    });

    let mut pager = Pager::keyed(transport.clone(), &initial, "tracks", None).unwrap();
    let yielded = pager.collect_all().await.unwrap();
    assert_eq!(yielded, vec![json!("a"), json!("b"), json!("c")]);
    assert_eq!(transport.fetch_count(), 0);
    assert!(pager.cursors().is_none());
}

#[tokio::test]
async fn keyed_pager_follows_next_through_the_same_key() {
    let transport = FakeTransport::new();
    transport.route(
        U2,
        json!({
            "tracks": {
                "items": ["c"],
                "total": 3,
                "limit": 2,
                "offset": 2,
                "next": null
            }
        }),
    );

    let initial = json!({
        "tracks": {
            "items": ["a", "b"],
            "total": 3,
            "limit": 2,
            "offset": 0,
            "next": U2
        }
    });

    let mut pager = Pager::keyed(transport.clone(), &initial, "tracks", None).unwrap();
    let yielded = pager.collect_all().await.unwrap();
    assert_eq!(yielded, vec![json!("a"), json!("b"), json!("c")]);
    assert_eq!(transport.fetch_count(), 1);
}

#[tokio::test]
async fn cursor_pager_reports_no_offset_and_exposes_cursors() {
    let transport = FakeTransport::new();
    let initial = json!({
        "artists": {
            "items": [{"id": "a1", "name": "Boards of Canada"}],
            "total": 1,
            "limit": 20,
            "offset": 64,
            "next": null,
            "cursors": {"after": "a1", "before": null}
        }
    });

    let pager = Pager::cursor_based(transport, &initial, "artists", None).unwrap();
    assert_eq!(pager.offset(), None);
    let cursors = pager.cursors().expect("cursor feed exposes cursors");
    assert_eq!(cursors.get("after"), Some(&json!("a1")));
    assert_eq!(cursors.get("before"), Some(&json!(null)));
}

#[tokio::test]
async fn cursor_pager_replaces_cursors_on_refresh() {
    let transport = FakeTransport::new();
    transport.route(
        U2,
        json!({
            "artists": {
                "items": [{"id": "a2"}],
                "total": 2,
                "limit": 1,
                "next": null,
                "cursors": {"after": null}
            }
        }),
    );

    let initial = json!({
        "artists": {
            "items": [{"id": "a1"}],
            "total": 2,
            "limit": 1,
            "next": U2,
            "cursors": {"after": "a1"}
        }
    });

    let mut pager = Pager::cursor_based(transport, &initial, "artists", None).unwrap();
    assert_eq!(pager.cursors().unwrap().get("after"), Some(&json!("a1")));

    assert!(pager.next().await.unwrap().is_some());
    assert!(pager.next().await.unwrap().is_some());
    assert_eq!(pager.cursors().unwrap().get("after"), Some(&json!(null)));
    assert!(pager.next().await.unwrap().is_none());
}

#[tokio::test]
async fn take_stops_at_the_requested_count() {
    let transport = FakeTransport::new();
    transport.route(U2, page(items(2, 4), 5, 2, 2, Some(U3)));

    let initial = page(items(0, 2), 5, 2, 0, Some(U2));
    let mut pager = Pager::new(transport.clone(), &initial, None).unwrap();

    let first_three = pager.take(3).await.unwrap();
    assert_eq!(first_three, vec![json!("i0"), json!("i1"), json!("i2")]);
    assert_eq!(transport.fetch_count(), 1);
}

#[tokio::test]
async fn total_tracks_the_latest_page() {
    let transport = FakeTransport::new();
    // The server-side collection grew between fetches; only the bound moves.
    transport.route(U2, page(items(2, 4), 6, 2, 2, None));

    let initial = page(items(0, 2), 4, 2, 0, Some(U2));
    let mut pager = Pager::new(transport, &initial, None).unwrap();
    assert_eq!(pager.total(), 4);

    assert_eq!(pager.take(3).await.unwrap().len(), 3);
    assert_eq!(pager.total(), 6);
}
