mod calendar;
mod geo;
mod stats;
mod structs;

#[cfg(feature = "ics")]
mod ics;

pub use calendar::{
    bucket_events_by_day, month_grid, month_grid_on, month_label, month_view, summarize,
    CalendarDay, DayCell, DaySummary, MonthView,
};
pub use geo::{
    normalize, GeoDataset, GeoDepartment, GeoIndex, GeoOption, GeoProvince, SearchOptions,
    ARGENTINA,
};
pub use stats::{kpis, Kpis};
pub use structs::{parse_timestamp, Contact, Event, EventKind, Property, Snapshot};
