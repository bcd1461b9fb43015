use chrono::Duration;
use ics::{
    properties::{Description, DtEnd, DtStart, Summary, TzName},
    ICalendar, Standard, TimeZone,
};

use crate::structs::Event;
use crate::MonthView;

/// CRM events carry a single instant; the feed renders them as one-hour
/// blocks.
const FEED_EVENT_DURATION_HOURS: i64 = 1;

impl MonthView {
    /// Subscribable feed of the month's events.
    #[must_use]
    pub fn to_ics(&self) -> ICalendar<'_> {
        // Argentina observes no DST: a single standard component at -03:00.
        let mut art = Standard::new("19700101T000000", "-0300", "-0300");
        art.push(TzName::new("-03"));

        let mut icalendar = ICalendar::new("2.0", &self.label);
        icalendar.add_timezone(TimeZone::standard("America/Argentina/Cordoba", art));

        for cell in &self.days {
            for event in &cell.events {
                if let Some(ics_event) = event.to_ics() {
                    icalendar.add_event(ics_event);
                }
            }
        }

        icalendar
    }
}

impl Event {
    /// `None` when the timestamp is unparseable; such events are skipped by
    /// the feed, consistent with the bucketing drop policy.
    #[must_use]
    pub fn to_ics(&self) -> Option<ics::Event<'_>> {
        let at = self.occurs_at()?;

        let start = at.format("%Y%m%dT%H%M%S").to_string();
        let end = (at + Duration::hours(FEED_EVENT_DURATION_HOURS))
            .format("%Y%m%dT%H%M%S")
            .to_string();

        let id = format!("evento-{}_{}", self.id, start);

        let summary = match self.visitor() {
            Some(visitor) => format!("{} · {}", self.kind.label(), visitor),
            None => self.kind.label().to_string(),
        };

        let mut ics_event = ics::Event::new(id, start.clone());

        ics_event.push(DtStart::new(start));
        ics_event.push(DtEnd::new(end));
        ics_event.push(Summary::new(summary));

        if let Some(notes) = &self.notes {
            ics_event.push(Description::new(notes));
        }

        Some(ics_event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{EventKind, Snapshot};
    use crate::month_view;
    use chrono::NaiveDate;

    fn event(id: i64, starts_at: &str) -> Event {
        Event {
            id,
            kind: EventKind::Visit,
            starts_at: starts_at.to_string(),
            property: Some(3),
            contact: None,
            name: Some("Ana".to_string()),
            last_name: Some("Suárez".to_string()),
            email: None,
            notes: Some("traer documentación".to_string()),
        }
    }

    #[test]
    fn event_maps_to_a_one_hour_block() {
        let mut icalendar = ICalendar::new("2.0", "test");
        let ev = event(7, "2024-05-03T14:30:00Z");
        icalendar.add_event(ev.to_ics().unwrap());
        let rendered = icalendar.to_string();

        assert!(rendered.contains("UID:evento-7_20240503T143000"));
        assert!(rendered.contains("DTSTART:20240503T143000"));
        assert!(rendered.contains("DTEND:20240503T153000"));
        assert!(rendered.contains("SUMMARY:Visita · Ana Suárez"));
        assert!(rendered.contains("DESCRIPTION:traer documentación"));
    }

    #[test]
    fn unparseable_event_is_skipped() {
        assert!(event(8, "???").to_ics().is_none());
    }

    #[test]
    fn feed_contains_each_month_event_once() {
        let snapshot = Snapshot {
            events: vec![
                event(1, "2024-05-03T10:00:00Z"),
                event(2, "2024-05-03T12:00:00Z"),
                event(3, "roto"),
            ],
            contacts: Vec::new(),
            properties: Vec::new(),
        };
        let view = month_view(&snapshot, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let feed = view.to_ics().to_string();

        assert_eq!(feed.matches("BEGIN:VEVENT").count(), 2);
        assert!(feed.contains("TZID:America/Argentina/Cordoba"));
    }
}
