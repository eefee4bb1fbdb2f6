//! Validación de entidades
//!
//! Funciones puras que rechazan envíos inválidos antes de llegar al API.
//! No hacen I/O: el año de referencia se captura al construir el validador.

use chrono::{Datelike, Utc};
use validator::{Validate, ValidationErrors};

use crate::config::ValidationConfig;
use crate::models::{
    Bus, BusDraft, Reservation, ReservationDraft, Route, RouteDraft, Schedule, ScheduleDraft,
};
use crate::utils::validation::{
    field_error, merge_errors, validate_chronological, validate_non_negative, validate_range,
};

#[derive(Debug, Clone)]
pub struct EntityValidator {
    config: ValidationConfig,
    reference_year: i32,
}

impl Default for EntityValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl EntityValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            reference_year: Utc::now().year(),
        }
    }

    /// Fijar el año "actual" usado en el rango de años del autobús
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// Rango de años aceptado para un autobús (inclusivo)
    pub fn bus_year_bounds(&self) -> (i32, i32) {
        (
            self.config.bus_year_min,
            self.reference_year.saturating_add(self.config.bus_year_max_ahead),
        )
    }

    pub fn validate_bus(&self, draft: &BusDraft) -> Result<(), ValidationErrors> {
        let (min_year, max_year) = self.bus_year_bounds();
        let mut extra = Vec::new();
        if let Err(mut error) = validate_range(draft.year, min_year, max_year) {
            error.message = Some(
                format!("El año debe estar entre {} y {}", min_year, max_year).into(),
            );
            extra.push(("year", error));
        }
        merge_errors(draft.validate(), extra)
    }

    pub fn validate_route(&self, draft: &RouteDraft) -> Result<(), ValidationErrors> {
        let mut extra = Vec::new();
        if !draft.distance.is_finite() {
            extra.push(("distance", field_error("finite", "La distancia no es un número válido")));
        } else if let Err(mut error) = validate_non_negative(draft.distance) {
            error.message = Some("La distancia no puede ser negativa".into());
            extra.push(("distance", error));
        }
        merge_errors(draft.validate(), extra)
    }

    pub fn validate_schedule(&self, draft: &ScheduleDraft) -> Result<(), ValidationErrors> {
        let mut extra = Vec::new();
        if let Err(error) = validate_chronological(draft.departure_time, draft.arrival_time) {
            extra.push(("arrival_time", error));
        }
        merge_errors(draft.validate(), extra)
    }

    pub fn validate_reservation(&self, draft: &ReservationDraft) -> Result<(), ValidationErrors> {
        let mut extra = Vec::new();
        if let Some(seat) = draft.seat_number {
            let max_seat = self.config.max_seat_number;
            if let Err(mut error) = validate_range(seat, 1, max_seat) {
                error.message = Some(
                    format!("El número de asiento debe estar entre 1 y {}", max_seat).into(),
                );
                extra.push(("seat_number", error));
            }
        }
        merge_errors(draft.validate(), extra)
    }

    /// Comprobar que el autobús y la ruta del horario existen
    pub fn check_schedule_references<'a>(
        &self,
        draft: &ScheduleDraft,
        buses: impl IntoIterator<Item = &'a Bus>,
        routes: impl IntoIterator<Item = &'a Route>,
    ) -> Result<(), ValidationErrors> {
        let mut extra = Vec::new();
        if let Some(bus_id) = draft.bus_id {
            if !buses.into_iter().any(|bus| bus.id == bus_id) {
                extra.push(("bus_id", field_error("unknown_bus", "El autobús seleccionado no existe")));
            }
        }
        if let Some(route_id) = draft.route_id {
            if !routes.into_iter().any(|route| route.id == route_id) {
                extra.push(("route_id", field_error("unknown_route", "La ruta seleccionada no existe")));
            }
        }
        merge_errors(Ok(()), extra)
    }

    /// Comprobar que el horario existe y que el asiento está libre
    pub fn check_reservation_references<'a>(
        &self,
        draft: &ReservationDraft,
        schedules: impl IntoIterator<Item = &'a Schedule>,
        reservations: impl IntoIterator<Item = &'a Reservation>,
        editing: Option<i64>,
    ) -> Result<(), ValidationErrors> {
        let mut extra = Vec::new();
        if let Some(schedule_id) = draft.schedule_id {
            if !schedules.into_iter().any(|schedule| schedule.id == schedule_id) {
                extra.push((
                    "schedule_id",
                    field_error("unknown_schedule", "El horario seleccionado no existe"),
                ));
            }
        }
        if let Some(taken) = self.find_seat_conflict(draft, reservations, editing) {
            extra.push((
                "seat_number",
                field_error(
                    "seat_taken",
                    format!(
                        "El asiento {} ya está reservado para este horario",
                        taken.seat_number
                    ),
                ),
            ));
        }
        merge_errors(Ok(()), extra)
    }

    /// Reserva existente que ya ocupa el mismo asiento del mismo horario
    pub fn find_seat_conflict<'a>(
        &self,
        draft: &ReservationDraft,
        reservations: impl IntoIterator<Item = &'a Reservation>,
        editing: Option<i64>,
    ) -> Option<&'a Reservation> {
        let (schedule_id, seat) = (draft.schedule_id?, draft.seat_number?);
        reservations.into_iter().find(|existing| {
            existing.schedule_id == schedule_id
                && existing.seat_number == seat
                && Some(existing.id) != editing
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BusStatus;
    use chrono::{NaiveDate, TimeZone};

    fn validator() -> EntityValidator {
        EntityValidator::default().with_reference_year(2024)
    }

    fn bus_draft() -> BusDraft {
        BusDraft {
            bus_number: "B-100".to_string(),
            model: "Volvo 9700".to_string(),
            capacity: 45,
            year: 2022,
            status: BusStatus::Active,
        }
    }

    fn schedule_draft(departure_hour: u32, arrival_hour: u32) -> ScheduleDraft {
        ScheduleDraft {
            bus_id: Some(1),
            route_id: Some(1),
            departure_time: Utc.with_ymd_and_hms(2024, 1, 1, departure_hour, 0, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2024, 1, 1, arrival_hour, 0, 0).unwrap(),
        }
    }

    fn reservation_draft(seat: i32) -> ReservationDraft {
        ReservationDraft {
            schedule_id: Some(4),
            passenger_name: "Ana Torres".to_string(),
            seat_number: Some(seat),
            reservation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn reservation(id: i64, schedule_id: i64, seat: i32) -> Reservation {
        Reservation::from_draft(id, schedule_id, seat, &reservation_draft(seat))
    }

    #[test]
    fn test_valid_bus_passes() {
        assert!(validator().validate_bus(&bus_draft()).is_ok());
    }

    #[test]
    fn test_bus_capacity_must_be_positive() {
        for capacity in [0, -3] {
            let draft = BusDraft { capacity, ..bus_draft() };
            let errors = validator().validate_bus(&draft).unwrap_err();
            assert!(errors.errors().contains_key("capacity"));
        }
    }

    #[test]
    fn test_bus_requires_number_and_model() {
        let draft = BusDraft {
            bus_number: "  ".to_string(),
            model: String::new(),
            ..bus_draft()
        };
        let errors = validator().validate_bus(&draft).unwrap_err();
        assert!(errors.errors().contains_key("bus_number"));
        assert!(errors.errors().contains_key("model"));
    }

    #[test]
    fn test_bus_year_bounds_are_configurable() {
        let strict = validator();
        assert_eq!(strict.bus_year_bounds(), (1990, 2025));
        assert!(strict.validate_bus(&BusDraft { year: 2025, ..bus_draft() }).is_ok());
        assert!(strict.validate_bus(&BusDraft { year: 2026, ..bus_draft() }).is_err());
        assert!(strict.validate_bus(&BusDraft { year: 1950, ..bus_draft() }).is_err());

        let lenient = EntityValidator::new(ValidationConfig {
            bus_year_min: 1900,
            bus_year_max_ahead: 0,
            ..ValidationConfig::default()
        })
        .with_reference_year(2024);
        assert!(lenient.validate_bus(&BusDraft { year: 1950, ..bus_draft() }).is_ok());
        assert!(lenient.validate_bus(&BusDraft { year: 2025, ..bus_draft() }).is_err());
    }

    #[test]
    fn test_huge_years_ahead_saturates() {
        let open_ended = EntityValidator::new(ValidationConfig {
            bus_year_max_ahead: i32::MAX,
            ..ValidationConfig::default()
        })
        .with_reference_year(2024);

        assert_eq!(open_ended.bus_year_bounds(), (1990, i32::MAX));
        assert!(open_ended.validate_bus(&BusDraft { year: 3000, ..bus_draft() }).is_ok());
    }

    #[test]
    fn test_route_distance_non_negative() {
        let draft = RouteDraft {
            route_name: "Costa".to_string(),
            origin: "Lima".to_string(),
            destination: "Ica".to_string(),
            distance: 0.0,
        };
        assert!(validator().validate_route(&draft).is_ok());

        let negative = RouteDraft { distance: -1.0, ..draft.clone() };
        assert!(validator().validate_route(&negative).unwrap_err().errors().contains_key("distance"));

        let blank = RouteDraft { destination: " ".to_string(), ..draft };
        assert!(validator().validate_route(&blank).is_err());
    }

    #[test]
    fn test_schedule_arrival_must_follow_departure() {
        assert!(validator().validate_schedule(&schedule_draft(10, 12)).is_ok());

        for draft in [schedule_draft(10, 9), schedule_draft(10, 10)] {
            let errors = validator().validate_schedule(&draft).unwrap_err();
            let arrival = errors.field_errors()["arrival_time"];
            assert_eq!(arrival[0].code, "chronological_order");
        }
    }

    #[test]
    fn test_schedule_requires_selection() {
        let draft = ScheduleDraft {
            bus_id: None,
            route_id: None,
            ..schedule_draft(10, 12)
        };
        let errors = validator().validate_schedule(&draft).unwrap_err();
        assert!(errors.errors().contains_key("bus_id"));
        assert!(errors.errors().contains_key("route_id"));
    }

    #[test]
    fn test_reservation_seat_bounds() {
        assert!(validator().validate_reservation(&reservation_draft(1)).is_ok());
        assert!(validator().validate_reservation(&reservation_draft(50)).is_ok());
        assert!(validator().validate_reservation(&reservation_draft(0)).is_err());
        assert!(validator().validate_reservation(&reservation_draft(51)).is_err());

        let missing = ReservationDraft {
            seat_number: None,
            schedule_id: None,
            ..reservation_draft(1)
        };
        let errors = validator().validate_reservation(&missing).unwrap_err();
        assert!(errors.errors().contains_key("seat_number"));
        assert!(errors.errors().contains_key("schedule_id"));
    }

    #[test]
    fn test_seat_conflict_detection() {
        let existing = vec![reservation(1, 4, 12), reservation(2, 5, 7)];
        let validator = validator();

        let conflict = validator.find_seat_conflict(&reservation_draft(12), &existing, None);
        assert_eq!(conflict.map(|r| r.id), Some(1));

        // misma reserva en edición no choca consigo misma
        assert!(validator
            .find_seat_conflict(&reservation_draft(12), &existing, Some(1))
            .is_none());
        assert!(validator
            .find_seat_conflict(&reservation_draft(7), &existing, None)
            .is_none());
    }

    #[test]
    fn test_schedule_references_must_exist() {
        let buses = vec![Bus::from_draft(1, bus_draft())];
        let routes: Vec<Route> = Vec::new();

        let errors = validator()
            .check_schedule_references(&schedule_draft(10, 12), &buses, &routes)
            .unwrap_err();
        assert!(errors.errors().contains_key("route_id"));
        assert!(!errors.errors().contains_key("bus_id"));
    }
}
