use std::time::Duration;

use gh_my::engine::{Engine, Event, Request, StubEngine};
use gh_my::types::{FetchError, FetchTicket, PanelKind, PullRequest, Query, QueryFilters};

fn load_fixture_prs() -> Vec<PullRequest> {
    let json = include_str!("fixtures/stub_prs.json");
    serde_json::from_str(json).expect("valid stub_prs.json fixture")
}

fn query(kind: PanelKind, seq: u64) -> Query {
    Query {
        ticket: FetchTicket { kind, seq },
        filters: QueryFilters::default(),
    }
}

#[test]
fn stub_engine_fetch_prs_returns_fixture_data() {
    let prs = load_fixture_prs();
    assert_eq!(prs.len(), 2, "fixture should have two PRs");

    let stub = StubEngine {
        prs: prs.clone(),
        error: None,
    };

    let handle = stub.start();
    let (tx, rx) = std::sync::mpsc::channel::<Event>();

    handle.send(Request::FetchPrs {
        query: query(PanelKind::Requested, 7),
        reply_tx: tx,
    });

    let event = rx
        .recv_timeout(Duration::from_secs(2))
        .expect("engine should reply within 2 seconds");

    let Event::PrsFetched { ticket, result } = event;
    assert_eq!(ticket.kind, PanelKind::Requested);
    assert_eq!(ticket.seq, 7);
    let fetched = result.expect("stub fetch succeeds");
    assert_eq!(fetched.len(), prs.len());
    assert_eq!(fetched[0].title, "Fix: resolve widget layout overflow");
    assert_eq!(fetched[1].author, None);
}

#[test]
fn stub_engine_error_is_reported() {
    let stub = StubEngine {
        prs: vec![],
        error: Some("rate limited".into()),
    };

    let handle = stub.start();
    let (tx, rx) = std::sync::mpsc::channel::<Event>();

    handle.send(Request::FetchPrs {
        query: query(PanelKind::MyPrs, 1),
        reply_tx: tx,
    });

    let event = rx
        .recv_timeout(Duration::from_secs(2))
        .expect("engine should reply within 2 seconds");

    let Event::PrsFetched { result, .. } = event;
    let err = result.expect_err("stub configured to fail");
    assert!(matches!(err, FetchError::GraphQl(_)));
    assert_eq!(err.to_string(), "GraphQL error: rate limited");
}

#[test]
fn stub_engine_stops_on_shutdown() {
    let handle = StubEngine::default().start();
    let (tx, rx) = std::sync::mpsc::channel::<Event>();

    handle.send(Request::Shutdown);
    handle.send(Request::FetchPrs {
        query: query(PanelKind::All, 1),
        reply_tx: tx,
    });

    assert!(
        rx.recv_timeout(Duration::from_millis(500)).is_err(),
        "no reply after shutdown"
    );
}
