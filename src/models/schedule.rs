//! Modelo de Schedule
//!
//! Horario de un autobús sobre una ruta. Los listados del backend incluyen
//! el autobús y la ruta referenciados como objetos anidados.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::Resource;
use crate::utils::validation::{
    deserialize_datetime, deserialize_optional_datetime, validate_chronological,
};

/// Autobús embebido en un horario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub bus_number: String,
}

/// Ruta embebida en un horario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub route_name: String,
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub bus_id: i64,
    pub route_id: i64,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub departure_time: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub arrival_time: DateTime<Utc>,
    /// Presente en listados y consultas por id, no en la respuesta de creación
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<BusRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteRef>,
}

/// Request para crear o actualizar un horario
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDraft {
    #[validate(required(message = "Debe seleccionar un autobús"))]
    pub bus_id: Option<i64>,

    #[validate(required(message = "Debe seleccionar una ruta"))]
    pub route_id: Option<i64>,

    #[serde(deserialize_with = "deserialize_datetime")]
    pub departure_time: DateTime<Utc>,

    #[serde(deserialize_with = "deserialize_datetime")]
    pub arrival_time: DateTime<Utc>,
}

impl Default for ScheduleDraft {
    /// Salida ahora y llegada una hora más tarde
    fn default() -> Self {
        let now = Utc::now();
        Self {
            bus_id: None,
            route_id: None,
            departure_time: now,
            arrival_time: now + Duration::hours(1),
        }
    }
}

impl ScheduleDraft {
    /// Límite inferior (exclusivo) de la hora de llegada seleccionable
    pub fn earliest_arrival(&self) -> DateTime<Utc> {
        self.departure_time
    }

    /// Llegada a proponer en el selector: la actual si sigue siendo válida,
    /// si no una hora después de la salida
    pub fn suggested_arrival(&self) -> DateTime<Utc> {
        if self.arrival_time > self.departure_time {
            self.arrival_time
        } else {
            self.departure_time + Duration::hours(1)
        }
    }

    pub fn set_departure_time(&mut self, departure: DateTime<Utc>) {
        self.departure_time = departure;
    }

    /// Cambiar la llegada rechazando valores que no sean posteriores a la salida
    pub fn set_arrival_time(&mut self, arrival: DateTime<Utc>) -> Result<(), ValidationError> {
        validate_chronological(self.departure_time, arrival)?;
        self.arrival_time = arrival;
        Ok(())
    }
}

/// Request para actualizar parcialmente un horario
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePatch {
    pub bus_id: Option<i64>,
    pub route_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub arrival_time: Option<DateTime<Utc>>,
}

impl SchedulePatch {
    pub fn apply(self, current: ScheduleDraft) -> ScheduleDraft {
        ScheduleDraft {
            bus_id: self.bus_id.or(current.bus_id),
            route_id: self.route_id.or(current.route_id),
            departure_time: self.departure_time.unwrap_or(current.departure_time),
            arrival_time: self.arrival_time.unwrap_or(current.arrival_time),
        }
    }
}

impl Schedule {
    /// Solo se llama con un borrador ya validado (bus y ruta presentes)
    pub fn from_draft(id: i64, bus_id: i64, route_id: i64, draft: &ScheduleDraft) -> Self {
        Self {
            id,
            bus_id,
            route_id,
            departure_time: draft.departure_time,
            arrival_time: draft.arrival_time,
            bus: None,
            route: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.arrival_time - self.departure_time
    }
}

impl Resource for Schedule {
    const COLLECTION: &'static str = "schedules";
    const SINGULAR: &'static str = "el horario";
    const DEMONSTRATIVE: &'static str = "este horario";
    const PLURAL: &'static str = "los horarios";

    type Draft = ScheduleDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_draft(&self) -> ScheduleDraft {
        ScheduleDraft {
            bus_id: Some(self.bus_id),
            route_id: Some(self.route_id),
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_reads_naive_timestamps_and_nested_refs() {
        let schedule: Schedule = serde_json::from_value(json!({
            "id": 3,
            "busId": 1,
            "routeId": 2,
            "departureTime": "2024-01-01T10:00:00",
            "arrivalTime": "2024-01-01T12:30:00",
            "bus": { "id": 1, "busNumber": "B-100" },
            "route": { "id": 2, "routeName": "Costa", "origin": "Lima", "destination": "Ica" }
        }))
        .unwrap();

        assert_eq!(
            schedule.departure_time,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(schedule.duration(), Duration::minutes(150));
        assert_eq!(schedule.bus.unwrap().bus_number, "B-100");
        assert_eq!(schedule.route.unwrap().destination, "Ica");
    }

    #[test]
    fn test_create_response_without_refs() {
        let schedule: Schedule = serde_json::from_value(json!({
            "id": 3,
            "busId": 1,
            "routeId": 2,
            "departureTime": "2024-01-01T10:00:00Z",
            "arrivalTime": "2024-01-01T12:30:00Z"
        }))
        .unwrap();

        assert!(schedule.bus.is_none());
        assert!(schedule.route.is_none());
    }

    #[test]
    fn test_arrival_picker_refuses_earlier_time() {
        let mut draft = ScheduleDraft {
            bus_id: Some(1),
            route_id: Some(1),
            departure_time: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(),
        };

        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        assert!(draft.set_arrival_time(earlier).is_err());
        assert_eq!(draft.arrival_time, Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap());
        assert_eq!(draft.earliest_arrival(), draft.departure_time);

        let later = Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap();
        assert!(draft.set_arrival_time(later).is_ok());
        assert_eq!(draft.arrival_time, later);
    }

    #[test]
    fn test_suggested_arrival_is_always_accepted() {
        let mut draft = ScheduleDraft {
            bus_id: Some(1),
            route_id: Some(1),
            departure_time: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        };
        assert_eq!(draft.suggested_arrival(), draft.arrival_time);

        // la salida se movió después de la llegada
        draft.set_departure_time(Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap());
        let suggested = draft.suggested_arrival();
        assert_eq!(suggested, Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap());
        assert!(draft.set_arrival_time(suggested).is_ok());
    }
}
