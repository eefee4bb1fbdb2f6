//! Formato de presentación
//!
//! Etiquetas y fechas tal como las muestran las vistas, independientes de
//! la capa de presentación concreta.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{BusStatus, Reservation, Schedule};

/// Tono visual asociado al estado de un autobús
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Warning,
    Error,
}

pub fn status_tone(status: BusStatus) -> StatusTone {
    match status {
        BusStatus::Active => StatusTone::Success,
        BusStatus::Maintenance => StatusTone::Warning,
        BusStatus::OutOfService => StatusTone::Error,
    }
}

pub fn format_date_time(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format("%d/%m/%Y").to_string()
}

/// "Ruta (origen - destino)", o el id si el backend no embebió la ruta
pub fn route_label(schedule: &Schedule) -> String {
    match &schedule.route {
        Some(route) => format!("{} ({} - {})", route.route_name, route.origin, route.destination),
        None => format!("Ruta #{}", schedule.route_id),
    }
}

pub fn bus_label(schedule: &Schedule) -> String {
    match &schedule.bus {
        Some(bus) => bus.bus_number.clone(),
        None => format!("#{}", schedule.bus_id),
    }
}

/// Etiqueta de un horario en el selector de reservas
pub fn schedule_option_label(schedule: &Schedule) -> String {
    format!(
        "{} - Autobús: {} - Salida: {}",
        route_label(schedule),
        bus_label(schedule),
        format_date_time(&schedule.departure_time)
    )
}

/// Ruta del horario de una reserva
pub fn reservation_route_label(reservation: &Reservation) -> String {
    match &reservation.schedule {
        Some(schedule) => format!(
            "{} ({} - {})",
            schedule.route.route_name, schedule.route.origin, schedule.route.destination
        ),
        None => format!("Horario #{}", reservation.schedule_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusRef, RouteRef};
    use chrono::TimeZone;

    fn schedule() -> Schedule {
        Schedule {
            id: 1,
            bus_id: 2,
            route_id: 3,
            departure_time: Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            bus: Some(BusRef {
                id: Some(2),
                bus_number: "B-100".to_string(),
            }),
            route: Some(RouteRef {
                id: Some(3),
                route_name: "Costa".to_string(),
                origin: "Lima".to_string(),
                destination: "Ica".to_string(),
            }),
        }
    }

    #[test]
    fn test_schedule_option_label() {
        assert_eq!(
            schedule_option_label(&schedule()),
            "Costa (Lima - Ica) - Autobús: B-100 - Salida: 01/01/2024 10:05"
        );
    }

    #[test]
    fn test_labels_without_embedded_refs() {
        let bare = Schedule {
            bus: None,
            route: None,
            ..schedule()
        };
        assert_eq!(route_label(&bare), "Ruta #3");
        assert_eq!(bus_label(&bare), "#2");
    }

    #[test]
    fn test_status_tone() {
        assert_eq!(status_tone(BusStatus::Active), StatusTone::Success);
        assert_eq!(status_tone(BusStatus::OutOfService), StatusTone::Error);
    }
}
