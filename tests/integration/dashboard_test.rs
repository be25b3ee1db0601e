//! Aggregate feed integration tests.
//!
//! Verifies slot independence: one failing aggregate query leaves only its
//! own slot unloaded and never disturbs the other panels.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use ista_explorer::dashboard::{CategoryCount, Dashboard, Slot, SlotState};
use ista_explorer::gateway::{mock_record, MockGateway};

/// Queues one response per slot, in the order load_all dispatches them:
/// bookings, months, roles, decades.
fn gateway_with_all_slots() -> MockGateway {
    MockGateway::new()
        .with_records(vec![mock_record(&[
            ("planet", json!("Mars-jn18")),
            ("total_bookings", json!(10)),
        ])])
        .with_records(vec![mock_record(&[
            ("month", json!("2025-07")),
            ("missions", json!(120)),
        ])])
        .with_records(vec![mock_record(&[
            ("role", json!("Guide")),
            ("assignments", json!(819)),
        ])])
        .with_records(vec![mock_record(&[
            ("decade", json!(40)),
            ("count", json!(875)),
        ])])
}

#[tokio::test]
async fn test_load_all_populates_every_slot() {
    let dashboard = Dashboard::new(Arc::new(gateway_with_all_slots()));

    for slot in Slot::ALL {
        assert_eq!(dashboard.snapshot(slot), SlotState::NotLoaded);
    }

    dashboard.load_all().await;

    for slot in Slot::ALL {
        assert!(
            dashboard.snapshot(slot).is_loaded(),
            "{} should be loaded",
            slot.title()
        );
    }

    assert_eq!(
        dashboard.snapshot(Slot::TouristAgeDecades),
        SlotState::Loaded(vec![CategoryCount {
            category: "40s".to_string(),
            value: 875
        }])
    );
}

#[tokio::test]
async fn test_scenario_e_failing_slot_does_not_disturb_siblings() {
    // Missions per Month (dispatched second) errors; the rest succeed.
    let gateway = MockGateway::new()
        .with_records(vec![mock_record(&[
            ("planet", json!("Proxima b-ag46")),
            ("total_bookings", json!(10)),
        ])])
        .with_error("permission denied for relation mission")
        .with_records(vec![mock_record(&[
            ("role", json!("Medic")),
            ("assignments", json!(796)),
        ])])
        .with_records(vec![mock_record(&[
            ("decade", json!(20)),
            ("count", json!(430)),
        ])]);

    let dashboard = Dashboard::new(Arc::new(gateway));
    dashboard.load_all().await;

    assert_eq!(dashboard.snapshot(Slot::MissionsByMonth), SlotState::NotLoaded);
    assert!(dashboard.snapshot(Slot::BookingsByPlanet).is_loaded());
    assert!(dashboard.snapshot(Slot::CrewByRole).is_loaded());
    assert!(dashboard.snapshot(Slot::TouristAgeDecades).is_loaded());
}

#[tokio::test]
async fn test_subscribers_see_slot_publication() {
    let dashboard = Dashboard::new(Arc::new(gateway_with_all_slots()));
    let mut receiver = dashboard.subscribe(Slot::CrewByRole);

    assert_eq!(*receiver.borrow(), SlotState::NotLoaded);

    dashboard.load_all().await;

    receiver.changed().await.unwrap();
    match &*receiver.borrow() {
        SlotState::Loaded(points) => {
            assert_eq!(points[0].category, "Guide");
            assert_eq!(points[0].value, 819);
        }
        SlotState::NotLoaded => panic!("Expected the slot to be loaded"),
    };
}

#[tokio::test]
async fn test_slots_are_loaded_once_per_session() {
    let gateway = Arc::new(gateway_with_all_slots());
    let dashboard = Dashboard::new(gateway.clone());

    dashboard.load_all().await;
    assert_eq!(gateway.call_count(), 4);
}
