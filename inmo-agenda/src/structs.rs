use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Event category, serialized with the backend's Spanish names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "Reunion")]
    Meeting,
    #[serde(rename = "Llamada")]
    Call,
    #[serde(rename = "Visita")]
    Visit,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Meeting => "Reunión",
            EventKind::Call => "Llamada",
            EventKind::Visit => "Visita",
        }
    }
}

/// An agenda event as served by `/api/eventos/`.
///
/// `starts_at` is kept as the raw wire string; see [`parse_timestamp`] for
/// the accepted shapes and the drop policy applied during bucketing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(rename = "tipo")]
    pub kind: EventKind,
    #[serde(rename = "fecha_hora")]
    pub starts_at: String,
    #[serde(rename = "propiedad", default)]
    pub property: Option<i64>,
    #[serde(rename = "contacto", default)]
    pub contact: Option<i64>,
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "apellido", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Event {
    /// Wall-clock moment of the event, `None` when the wire string is
    /// unparseable.
    pub fn occurs_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.starts_at)
    }

    /// Visitor name attached to the event, if any.
    pub fn visitor(&self) -> Option<String> {
        match (self.name.as_deref(), self.last_name.as_deref()) {
            (Some(name), Some(last_name)) => Some(format!("{name} {last_name}")),
            (Some(name), None) => Some(name.to_string()),
            (None, Some(last_name)) => Some(last_name.to_string()),
            (None, None) => None,
        }
    }
}

/// A lead record as served by `/api/contactos/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "apellido", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A property record as served by `/api/propiedades/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
    // Legacy flag kept by the backend next to the free-form status.
    #[serde(rename = "vendida", default)]
    pub sold: Option<bool>,
    #[serde(rename = "disponibilidad", default)]
    pub availability: Option<String>,
}

impl Property {
    pub fn is_sold(&self) -> bool {
        self.sold == Some(true)
            || self
                .status
                .as_deref()
                .map(|status| status.trim().to_lowercase().contains("vendid"))
                .unwrap_or(false)
    }
}

/// The three backend lists fetched together per page load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub contacts: Vec<Contact>,
    pub properties: Vec<Property>,
}

/// Parse a wire timestamp into the wall-clock moment it carries.
///
/// Accepts RFC 3339 (the offset is used to recover the wall-clock reading,
/// then discarded) and the `datetime-local` input shapes
/// `YYYY-MM-DDTHH:MM[:SS]`. Anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn parses_rfc3339_as_carried_wall_clock() {
        let parsed = parse_timestamp("2024-05-03T14:30:00-03:00").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
        assert_eq!((parsed.hour(), parsed.minute()), (14, 30));

        let zulu = parse_timestamp("2024-05-03T14:30:00Z").unwrap();
        assert_eq!((zulu.hour(), zulu.minute()), (14, 30));
    }

    #[test]
    fn parses_datetime_local_inputs() {
        assert!(parse_timestamp("2024-05-03T14:30").is_some());
        assert!(parse_timestamp("2024-05-03T14:30:15").is_some());
        assert!(parse_timestamp("2024-05-03T14:30:15.123456").is_some());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("mañana a la tarde").is_none());
        assert!(parse_timestamp("2024-13-03T14:30").is_none());
    }

    #[test]
    fn decodes_backend_event_json() {
        let event: Event = serde_json::from_str(
            r#"{
                "id": 7,
                "tipo": "Visita",
                "fecha_hora": "2024-05-03T14:30:00Z",
                "propiedad": 12,
                "contacto": null,
                "nombre": "Ana",
                "apellido": "Suárez",
                "notas": "llega 10' tarde"
            }"#,
        )
        .unwrap();

        assert_eq!(event.kind, EventKind::Visit);
        assert_eq!(event.property, Some(12));
        assert_eq!(event.contact, None);
        assert_eq!(event.visitor().as_deref(), Some("Ana Suárez"));
    }

    #[test]
    fn sold_heuristic_matches_flag_and_status() {
        let by_flag = Property {
            id: 1,
            title: None,
            address: None,
            status: None,
            sold: Some(true),
            availability: None,
        };
        let by_status = Property {
            sold: None,
            status: Some("  Vendida ".to_string()),
            ..by_flag.clone()
        };
        let available = Property {
            sold: Some(false),
            status: Some("disponible".to_string()),
            ..by_flag.clone()
        };

        assert!(by_flag.is_sold());
        assert!(by_status.is_sold());
        assert!(!available.is_sold());
    }
}
