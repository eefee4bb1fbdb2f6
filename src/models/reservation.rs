//! Modelo de Reservation
//!
//! Reserva de un asiento en un horario. Los listados incluyen el horario
//! con su autobús y su ruta.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{BusRef, Resource, RouteRef};
use crate::utils::validation::{
    deserialize_date, deserialize_datetime, deserialize_optional_date, validate_not_empty,
};

/// Horario embebido en una reserva
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSchedule {
    #[serde(deserialize_with = "deserialize_datetime")]
    pub departure_time: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub arrival_time: DateTime<Utc>,
    pub bus: BusRef,
    pub route: RouteRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    pub schedule_id: i64,
    pub passenger_name: String,
    pub seat_number: i32,
    #[serde(deserialize_with = "deserialize_date")]
    pub reservation_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ReservationSchedule>,
}

/// Request para crear o actualizar una reserva
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDraft {
    #[validate(required(message = "Debe seleccionar un horario"))]
    pub schedule_id: Option<i64>,

    #[validate(
        custom = "validate_not_empty",
        length(max = 100, message = "El nombre del pasajero admite como máximo 100 caracteres")
    )]
    pub passenger_name: String,

    /// El máximo depende de la configuración, ver `EntityValidator`
    #[validate(required(message = "Debe indicar un número de asiento"))]
    pub seat_number: Option<i32>,

    #[serde(deserialize_with = "deserialize_date")]
    pub reservation_date: NaiveDate,
}

impl Default for ReservationDraft {
    fn default() -> Self {
        Self {
            schedule_id: None,
            passenger_name: String::new(),
            seat_number: None,
            reservation_date: Utc::now().date_naive(),
        }
    }
}

/// Request para actualizar parcialmente una reserva
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPatch {
    pub schedule_id: Option<i64>,
    pub passenger_name: Option<String>,
    pub seat_number: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub reservation_date: Option<NaiveDate>,
}

impl ReservationPatch {
    pub fn apply(self, current: ReservationDraft) -> ReservationDraft {
        ReservationDraft {
            schedule_id: self.schedule_id.or(current.schedule_id),
            passenger_name: self.passenger_name.unwrap_or(current.passenger_name),
            seat_number: self.seat_number.or(current.seat_number),
            reservation_date: self.reservation_date.unwrap_or(current.reservation_date),
        }
    }
}

impl Reservation {
    pub fn from_draft(id: i64, schedule_id: i64, seat_number: i32, draft: &ReservationDraft) -> Self {
        Self {
            id,
            schedule_id,
            passenger_name: draft.passenger_name.clone(),
            seat_number,
            reservation_date: draft.reservation_date,
            schedule: None,
        }
    }
}

impl Resource for Reservation {
    const COLLECTION: &'static str = "reservations";
    const SINGULAR: &'static str = "la reserva";
    const DEMONSTRATIVE: &'static str = "esta reserva";
    const PLURAL: &'static str = "las reservas";

    type Draft = ReservationDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_draft(&self) -> ReservationDraft {
        ReservationDraft {
            schedule_id: Some(self.schedule_id),
            passenger_name: self.passenger_name.clone(),
            seat_number: Some(self.seat_number),
            reservation_date: self.reservation_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reservation_date_accepts_timestamp() {
        let draft: ReservationDraft = serde_json::from_value(json!({
            "scheduleId": 4,
            "passengerName": "Ana Torres",
            "seatNumber": 12,
            "reservationDate": "2024-03-05T14:22:10.000Z"
        }))
        .unwrap();

        assert_eq!(draft.reservation_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(
            serde_json::to_value(&draft).unwrap()["reservationDate"],
            json!("2024-03-05")
        );
    }

    #[test]
    fn test_reads_embedded_schedule() {
        let reservation: Reservation = serde_json::from_value(json!({
            "id": 9,
            "scheduleId": 4,
            "passengerName": "Ana Torres",
            "seatNumber": 12,
            "reservationDate": "2024-03-05",
            "schedule": {
                "departureTime": "2024-03-06T08:00:00",
                "arrivalTime": "2024-03-06T10:00:00",
                "bus": { "busNumber": "B-100" },
                "route": { "routeName": "Costa", "origin": "Lima", "destination": "Ica" }
            }
        }))
        .unwrap();

        let schedule = reservation.schedule.unwrap();
        assert_eq!(schedule.bus.bus_number, "B-100");
        assert!(schedule.bus.id.is_none());
        assert_eq!(schedule.route.origin, "Lima");
    }
}
