//! User-query lifecycle integration tests.
//!
//! Drives QuerySession end to end over the mock gateway: policy rejection,
//! success, empty, failure, stale responses, and the deadline.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::mpsc;

use ista_explorer::gateway::{mock_record, MockGateway};
use ista_explorer::session::{Notice, QueryOutcome, QuerySession, Severity};
use ista_explorer::table::{Record, SchemaInference};

/// Helper to build a ten-row tourist result set with a fixed key order.
fn tourist_records() -> Vec<Record> {
    (0..10)
        .map(|i| {
            mock_record(&[
                ("tourist_id", json!(i + 1)),
                ("name", json!(format!("Tourist {}", i + 1))),
                ("dob", json!("1980-01-01")),
            ])
        })
        .collect()
}

/// Helper to create a session over a shared mock gateway handle.
fn session_over(
    gateway: Arc<MockGateway>,
) -> (QuerySession, mpsc::UnboundedReceiver<Notice>) {
    QuerySession::new(gateway)
}

#[tokio::test]
async fn test_scenario_a_lowercase_select_succeeds() {
    let gateway = Arc::new(MockGateway::new().with_records(tourist_records()));
    let (session, _notices) = session_over(gateway.clone());

    let outcome = session.submit("select * from ista.tourist limit 10;").await;

    let table = match outcome {
        QueryOutcome::Success(table) => table,
        other => panic!("Expected Success, got {other:?}"),
    };

    assert_eq!(table.column_names(), vec!["tourist_id", "name", "dob"]);
    assert_eq!(table.row_count(), 10);
    let ids: Vec<usize> = table.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, (0..10).collect::<Vec<_>>());
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn test_scenario_b_drop_is_rejected_without_dispatch() {
    let gateway = Arc::new(MockGateway::new());
    let (session, mut notices) = session_over(gateway.clone());

    let outcome = session.submit("DROP TABLE ista.tourist;").await;

    assert!(matches!(outcome, QueryOutcome::Rejected(_)));
    assert_eq!(gateway.call_count(), 0);

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.severity, Severity::Warning);
}

#[tokio::test]
async fn test_scenario_c_remote_failure_keeps_prior_table() {
    let gateway = Arc::new(
        MockGateway::new()
            .with_records(tourist_records())
            .with_error("relation does not exist"),
    );
    let (session, mut notices) = session_over(gateway);

    session.submit("SELECT * FROM ista.tourist").await;
    let before = session.view().table.expect("first query populates the table");

    let outcome = session.submit("SELECT * FROM ista.ghost").await;

    assert_eq!(
        outcome,
        QueryOutcome::Failed("relation does not exist".to_string())
    );
    assert_eq!(session.view().table, Some(before));

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.severity, Severity::Error);
    assert_eq!(notice.message, "relation does not exist");
}

#[tokio::test]
async fn test_scenario_d_empty_result_clears_table() {
    let gateway = Arc::new(
        MockGateway::new()
            .with_records(tourist_records())
            .with_empty(),
    );
    let (session, mut notices) = session_over(gateway);

    session.submit("SELECT * FROM ista.tourist").await;
    assert!(session.view().table.is_some());

    let outcome = session.submit("SELECT * FROM ista.tourist WHERE 1=0").await;

    assert_eq!(outcome, QueryOutcome::Empty);
    assert_eq!(session.view().table, None);

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.severity, Severity::Info);
}

#[tokio::test]
async fn test_rejection_keeps_prior_table_displayed() {
    let gateway = Arc::new(MockGateway::new().with_records(tourist_records()));
    let (session, _notices) = session_over(gateway.clone());

    session.submit("SELECT * FROM ista.tourist").await;
    let before = session.view().table;

    session.submit("TRUNCATE ista.tourist").await;

    assert_eq!(session.view().table, before);
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    // The first submission resolves after the second; its response must not
    // overwrite the newer result.
    let gateway = Arc::new(
        MockGateway::new()
            .with_delayed_records(
                vec![mock_record(&[("n", json!("old"))])],
                Duration::from_millis(80),
            )
            .with_records(vec![mock_record(&[("n", json!("new"))])]),
    );
    let (session, _notices) = QuerySession::with_options(
        gateway,
        SchemaInference::FirstRow,
        Duration::from_secs(5),
    );
    let session = Arc::new(session);

    let slow = {
        let session = session.clone();
        tokio::spawn(async move { session.submit("SELECT 'old'").await })
    };
    // Let the slow submission reach the gateway before superseding it.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let fast = session.submit("SELECT 'new'").await;

    match &fast {
        QueryOutcome::Success(table) => {
            assert_eq!(table.rows[0].cell("n"), Some(&json!("new")));
        }
        other => panic!("Expected Success, got {other:?}"),
    }

    // The slow response arrives afterwards and is discarded.
    slow.await.unwrap();
    match session.outcome() {
        QueryOutcome::Success(table) => {
            assert_eq!(table.rows[0].cell("n"), Some(&json!("new")));
        }
        other => panic!("Expected the newer result to survive, got {other:?}"),
    }
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_hanging_gateway_hits_the_deadline() {
    let gateway = Arc::new(MockGateway::hanging());
    let (session, mut notices) = QuerySession::with_options(
        gateway,
        SchemaInference::FirstRow,
        Duration::from_millis(20),
    );

    let outcome = session.submit("SELECT pg_sleep(3600)").await;

    match outcome {
        QueryOutcome::Failed(message) => assert!(message.contains("timed out")),
        other => panic!("Expected Failed, got {other:?}"),
    }

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.severity, Severity::Error);
}

#[tokio::test]
async fn test_union_of_keys_session_widens_columns() {
    let gateway = Arc::new(MockGateway::new().with_records(vec![
        mock_record(&[("a", json!(1))]),
        mock_record(&[("a", json!(2)), ("b", json!(3))]),
    ]));
    let (session, _notices) = QuerySession::with_options(
        gateway,
        SchemaInference::UnionOfKeys,
        Duration::from_secs(5),
    );

    let outcome = session.submit("SELECT a, b FROM t").await;

    match outcome {
        QueryOutcome::Success(table) => {
            assert_eq!(table.column_names(), vec!["a", "b"]);
        }
        other => panic!("Expected Success, got {other:?}"),
    }
}
