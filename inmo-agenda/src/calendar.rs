use std::collections::HashMap;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

use crate::stats::{kpis, Kpis};
use crate::structs::{Event, EventKind, Snapshot};

/// Month names as rendered in the dashboard heading.
const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
}

/// Monday-aligned grid of whole weeks covering `reference`'s month.
///
/// `is_today` is tagged against the machine's local date; everything else is
/// a pure function of `reference`.
pub fn month_grid(reference: NaiveDate) -> Vec<CalendarDay> {
    month_grid_on(reference, Local::now().date_naive())
}

/// Deterministic core of [`month_grid`]: `today` is passed in.
pub fn month_grid_on(reference: NaiveDate, today: NaiveDate) -> Vec<CalendarDay> {
    let first = reference.with_day(1).unwrap_or(reference);
    let last = last_of_month(reference);

    // Monday on or before the 1st, with Monday = 0 .. Sunday = 6.
    let start = first - Duration::days(i64::from(first.weekday().num_days_from_monday()));

    let mut days = Vec::new();
    let mut cursor = start;
    while cursor <= last || days.len() % 7 != 0 {
        days.push(CalendarDay {
            date: cursor,
            in_month: cursor.year() == reference.year() && cursor.month() == reference.month(),
            is_today: cursor == today,
        });
        cursor = cursor + Duration::days(1);
    }

    days
}

fn last_of_month(reference: NaiveDate) -> NaiveDate {
    let (year, month) = match reference.month() {
        12 => (reference.year() + 1, 1),
        month => (reference.year(), month + 1),
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first_of_next| first_of_next - Duration::days(1))
        .unwrap_or(reference)
}

/// Group events by the calendar day of their timestamp, preserving input
/// order within each day.
///
/// Events whose `fecha_hora` fails [`crate::parse_timestamp`] are dropped
/// here on purpose: one malformed record must not blank the whole calendar.
pub fn bucket_events_by_day(events: &[Event]) -> HashMap<NaiveDate, Vec<Event>> {
    let mut buckets: HashMap<NaiveDate, Vec<Event>> = HashMap::new();

    for event in events {
        let Some(at) = event.occurs_at() else {
            continue;
        };
        buckets.entry(at.date()).or_default().push(event.clone());
    }

    buckets
}

/// Per-day category counters shown in the grid cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub meetings: usize,
    pub calls: usize,
    pub visits: usize,
    pub total: usize,
}

impl DaySummary {
    fn tally(events: &[Event]) -> Self {
        let mut summary = DaySummary::default();
        for event in events {
            match event.kind {
                EventKind::Meeting => summary.meetings += 1,
                EventKind::Call => summary.calls += 1,
                EventKind::Visit => summary.visits += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

pub fn summarize(buckets: &HashMap<NaiveDate, Vec<Event>>) -> HashMap<NaiveDate, DaySummary> {
    buckets
        .iter()
        .map(|(day, events)| (*day, DaySummary::tally(events)))
        .collect()
}

/// `"mayo de 2024"` style heading for the month cursor.
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTHS
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("?");
    format!("{name} de {year}")
}

/// One grid cell with its day's events attached.
///
/// Leading/trailing cells from adjacent months keep their events empty, the
/// way the dashboard renders them.
#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub events: Vec<Event>,
    pub summary: DaySummary,
}

/// The whole dashboard payload for one month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub days: Vec<DayCell>,
    pub kpis: Kpis,
}

pub fn month_view(snapshot: &Snapshot, reference: NaiveDate) -> MonthView {
    let mut buckets = bucket_events_by_day(&snapshot.events);

    let days = month_grid(reference)
        .into_iter()
        .map(|day| {
            let events = if day.in_month {
                buckets.remove(&day.date).unwrap_or_default()
            } else {
                Vec::new()
            };
            let summary = DaySummary::tally(&events);
            DayCell {
                date: day.date,
                in_month: day.in_month,
                is_today: day.is_today,
                events,
                summary,
            }
        })
        .collect();

    MonthView {
        year: reference.year(),
        month: reference.month(),
        label: month_label(reference.year(), reference.month()),
        days,
        kpis: kpis(snapshot, reference),
    }
}
