//! Sample query catalog.
//!
//! Labelled starter queries a presentation layer can offer. These are
//! ordinary user-path queries: submitting one goes through the read-only
//! guard like any hand-typed text.

/// A labelled sample query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleQuery {
    pub label: &'static str,
    pub sql: &'static str,
}

/// Returns the sample queries, in display order.
pub fn samples() -> &'static [SampleQuery] {
    &SAMPLES
}

const SAMPLES: [SampleQuery; 5] = [
    SampleQuery {
        label: "List 10 Tourists",
        sql: "SELECT * FROM ista.tourist LIMIT 10;",
    },
    SampleQuery {
        label: "Upcoming Missions",
        sql: "SELECT m.mission_id, p.name AS planet, m.departure_date \
              FROM ista.mission m \
              JOIN ista.planet p ON m.planet_id=p.planet_id \
              WHERE m.departure_date BETWEEN CURRENT_DATE AND CURRENT_DATE + INTERVAL '1 year' \
              ORDER BY m.departure_date;",
    },
    SampleQuery {
        label: "Bookings by Planet",
        sql: "SELECT p.name AS planet, COUNT(*) AS total_bookings \
              FROM ista.booking b \
              JOIN ista.mission m ON b.mission_id=m.mission_id \
              JOIN ista.planet p ON m.planet_id=p.planet_id \
              GROUP BY p.name \
              ORDER BY total_bookings DESC;",
    },
    SampleQuery {
        label: "Crew >3 Missions",
        sql: "SELECT c.name, COUNT(*) AS missions \
              FROM ista.crewassignment ca \
              JOIN ista.crewmember c ON ca.crew_id=c.crew_id \
              GROUP BY c.name \
              HAVING COUNT(*)>3 \
              ORDER BY missions DESC;",
    },
    SampleQuery {
        label: "Maintenance Logs",
        sql: "SELECT ml.log_id, s.model, ml.log_date \
              FROM ista.maintenancelog ml \
              JOIN ista.spacecraft s ON ml.spacecraft_id=s.spacecraft_id \
              ORDER BY ml.log_date DESC \
              LIMIT 5;",
    },
];
