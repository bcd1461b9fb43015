use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::structs::Snapshot;

/// Headline counters shown above the calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub leads: usize,
    pub for_sale: usize,
    pub for_rent: usize,
    pub sold: usize,
    pub events_in_month: usize,
}

/// Compute the dashboard counters for the month containing `reference`.
///
/// Sold properties are excluded from the sale/rent split; events with
/// unparseable timestamps are excluded from the month count, same policy as
/// the day buckets.
pub fn kpis(snapshot: &Snapshot, reference: NaiveDate) -> Kpis {
    let mut counters = Kpis {
        leads: snapshot.contacts.len(),
        ..Kpis::default()
    };

    for property in &snapshot.properties {
        if property.is_sold() {
            counters.sold += 1;
            continue;
        }
        match property
            .availability
            .as_deref()
            .map(|availability| availability.trim().to_lowercase())
            .as_deref()
        {
            Some("venta") => counters.for_sale += 1,
            Some("alquiler") => counters.for_rent += 1,
            _ => {}
        }
    }

    counters.events_in_month = snapshot
        .events
        .iter()
        .filter_map(|event| event.occurs_at())
        .filter(|at| at.year() == reference.year() && at.month() == reference.month())
        .count();

    counters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{Contact, Event, EventKind, Property};

    fn property(id: i64, status: Option<&str>, sold: Option<bool>, availability: Option<&str>) -> Property {
        Property {
            id,
            title: None,
            address: None,
            status: status.map(str::to_string),
            sold,
            availability: availability.map(str::to_string),
        }
    }

    fn event(id: i64, starts_at: &str) -> Event {
        Event {
            id,
            kind: EventKind::Meeting,
            starts_at: starts_at.to_string(),
            property: Some(1),
            contact: None,
            name: None,
            last_name: None,
            email: None,
            notes: None,
        }
    }

    #[test]
    fn counts_leads_properties_and_month_events() {
        let snapshot = Snapshot {
            events: vec![
                event(1, "2024-05-03T10:00:00Z"),
                event(2, "2024-05-28T10:00:00Z"),
                event(3, "2024-06-01T10:00:00Z"),
                event(4, "sin fecha"),
            ],
            contacts: vec![Contact {
                id: 1,
                name: Some("Ana".to_string()),
                last_name: None,
                email: None,
            }],
            properties: vec![
                property(1, Some("disponible"), None, Some("venta")),
                property(2, None, None, Some("Alquiler ")),
                property(3, Some("VENDIDA"), None, Some("venta")),
                property(4, None, Some(true), Some("alquiler")),
                property(5, None, None, None),
            ],
        };

        let counters = kpis(&snapshot, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(
            counters,
            Kpis {
                leads: 1,
                for_sale: 1,
                for_rent: 1,
                sold: 2,
                events_in_month: 2,
            }
        );
    }
}
