//! Startup aggregate feed.
//!
//! Issues the fixed set of read-only aggregate queries once per session and
//! publishes each result set to its own slot as it arrives. Slots fail
//! independently: a failing query leaves only its own slot unloaded and
//! never cancels or fails the others.

use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::gateway::QueryGateway;
use crate::table::Record;

/// The fixed dashboard panels, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    BookingsByPlanet,
    MissionsByMonth,
    CrewByRole,
    TouristAgeDecades,
}

impl Slot {
    /// All panels, in display order.
    pub const ALL: [Slot; 4] = [
        Slot::BookingsByPlanet,
        Slot::MissionsByMonth,
        Slot::CrewByRole,
        Slot::TouristAgeDecades,
    ];

    /// Human-readable panel title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::BookingsByPlanet => "Bookings by Planet",
            Self::MissionsByMonth => "Missions per Month",
            Self::CrewByRole => "Crew Assignments by Role",
            Self::TouristAgeDecades => "Tourist Ages by Decade",
        }
    }

    /// The aggregate SQL for this panel.
    ///
    /// Fixed internal text, read-only by construction; the submission guard
    /// is not re-applied here.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::BookingsByPlanet => {
                "SELECT p.name AS planet, COUNT(*) AS total_bookings \
                 FROM ista.booking b \
                 JOIN ista.mission m ON b.mission_id=m.mission_id \
                 JOIN ista.planet p ON m.planet_id=p.planet_id \
                 GROUP BY p.name \
                 ORDER BY total_bookings DESC;"
            }
            Self::MissionsByMonth => {
                "SELECT to_char(DATE_TRUNC('month', departure_date),'YYYY-MM') AS month, \
                 COUNT(*) AS missions \
                 FROM ista.mission \
                 GROUP BY 1 \
                 ORDER BY 1;"
            }
            Self::CrewByRole => {
                "SELECT cm.role, COUNT(ca.assignment_id) AS assignments \
                 FROM ista.crewassignment ca \
                 JOIN ista.crewmember cm ON ca.crew_id=cm.crew_id \
                 GROUP BY cm.role \
                 ORDER BY assignments DESC;"
            }
            Self::TouristAgeDecades => {
                "SELECT floor(date_part('year', age(dob))/10)*10 AS decade, \
                 COUNT(*) AS count \
                 FROM ista.tourist \
                 GROUP BY 1 \
                 ORDER BY 1;"
            }
        }
    }

    fn index(self) -> usize {
        match self {
            Self::BookingsByPlanet => 0,
            Self::MissionsByMonth => 1,
            Self::CrewByRole => 2,
            Self::TouristAgeDecades => 3,
        }
    }

    fn label_field(self) -> &'static str {
        match self {
            Self::BookingsByPlanet => "planet",
            Self::MissionsByMonth => "month",
            Self::CrewByRole => "role",
            Self::TouristAgeDecades => "decade",
        }
    }

    fn value_field(self) -> &'static str {
        match self {
            Self::BookingsByPlanet => "total_bookings",
            Self::MissionsByMonth => "missions",
            Self::CrewByRole => "assignments",
            Self::TouristAgeDecades => "count",
        }
    }
}

/// One point of a dashboard panel: a domain label and its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub value: i64,
}

/// Contents of one dashboard slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SlotState {
    /// The slot's query has not resolved, or failed.
    #[default]
    NotLoaded,
    /// The slot's query resolved; points are in result order.
    Loaded(Vec<CategoryCount>),
}

impl SlotState {
    /// Returns true once the slot's query has resolved.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Loads and publishes the dashboard panels.
///
/// Created once at session start; slots are never re-fetched.
pub struct Dashboard {
    gateway: Arc<dyn QueryGateway>,
    slots: [watch::Sender<SlotState>; 4],
}

impl Dashboard {
    /// Creates a dashboard with all slots not yet loaded.
    pub fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            slots: std::array::from_fn(|_| watch::channel(SlotState::default()).0),
        }
    }

    /// Subscribes to a slot's publications.
    ///
    /// A slot whose query never resolves stays `NotLoaded` indefinitely;
    /// consumers must tolerate that.
    pub fn subscribe(&self, slot: Slot) -> watch::Receiver<SlotState> {
        self.slots[slot.index()].subscribe()
    }

    /// Returns the slot's current contents.
    pub fn snapshot(&self, slot: Slot) -> SlotState {
        self.slots[slot.index()].borrow().clone()
    }

    /// Loads every panel once, concurrently.
    ///
    /// Each completion publishes to its slot as it arrives; there is no
    /// ordering guarantee between slots. A failing query is logged, leaves
    /// its slot `NotLoaded`, and does not propagate.
    pub async fn load_all(&self) {
        join_all(Slot::ALL.iter().map(|slot| self.load_slot(*slot))).await;
    }

    async fn load_slot(&self, slot: Slot) {
        match self.gateway.execute(slot.sql()).await {
            Ok(records) => {
                let points = project(slot, &records);
                debug!("{} loaded with {} points", slot.title(), points.len());
                self.slots[slot.index()].send_replace(SlotState::Loaded(points));
            }
            Err(e) => {
                warn!("{} aggregate failed: {e}", slot.title());
            }
        }
    }
}

/// Projects raw aggregate records into the slot's fixed category/count shape.
///
/// Records missing either field are skipped.
fn project(slot: Slot, records: &[Record]) -> Vec<CategoryCount> {
    records
        .iter()
        .filter_map(|record| {
            let category = match slot {
                // Decades arrive numeric; shown as "40s", "50s", ...
                Slot::TouristAgeDecades => {
                    format!("{}s", numeric(record.get(slot.label_field())?)?)
                }
                _ => record.get(slot.label_field())?.as_str()?.to_string(),
            };
            let value = numeric(record.get(slot.value_field())?)?;
            Some(CategoryCount { category, value })
        })
        .collect()
}

/// Counts may arrive as JSON numbers (integral or floating) or as numeric
/// strings, depending on how the remote serializes bigints.
fn numeric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
