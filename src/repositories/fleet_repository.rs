//! Almacenamiento en memoria de la flota
//!
//! Cuatro tablas ordenadas por id detrás de un único `RwLock`. Cada
//! mutación toma el guard de escritura una sola vez, de modo que las
//! comprobaciones de integridad y la escritura son atómicas.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{Bus, BusRef, Reservation, ReservationSchedule, Route, RouteRef, Schedule};

/// Último id asignado por tabla; los ids nunca se reutilizan
#[derive(Debug, Default)]
struct IdSequences {
    buses: i64,
    routes: i64,
    schedules: i64,
    reservations: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default)]
pub struct FleetTables {
    pub buses: BTreeMap<i64, Bus>,
    pub routes: BTreeMap<i64, Route>,
    pub schedules: BTreeMap<i64, Schedule>,
    pub reservations: BTreeMap<i64, Reservation>,
    sequences: IdSequences,
}

/// Filas eliminadas en cascada por un borrado
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CascadeReport {
    pub schedules: usize,
    pub reservations: usize,
}

impl FleetTables {
    pub fn next_bus_id(&mut self) -> i64 {
        next_id(&mut self.sequences.buses)
    }

    pub fn next_route_id(&mut self) -> i64 {
        next_id(&mut self.sequences.routes)
    }

    pub fn next_schedule_id(&mut self) -> i64 {
        next_id(&mut self.sequences.schedules)
    }

    pub fn next_reservation_id(&mut self) -> i64 {
        next_id(&mut self.sequences.reservations)
    }

    /// Número de autobús ya usado por otro autobús
    pub fn bus_number_taken(&self, bus_number: &str, except: Option<i64>) -> bool {
        self.buses
            .values()
            .any(|bus| bus.bus_number == bus_number && Some(bus.id) != except)
    }

    /// Horario con el autobús y la ruta embebidos
    pub fn expand_schedule(&self, schedule: &Schedule) -> Schedule {
        let mut expanded = schedule.clone();
        expanded.bus = self.buses.get(&schedule.bus_id).map(|bus| BusRef {
            id: Some(bus.id),
            bus_number: bus.bus_number.clone(),
        });
        expanded.route = self.routes.get(&schedule.route_id).map(|route| RouteRef {
            id: Some(route.id),
            route_name: route.route_name.clone(),
            origin: route.origin.clone(),
            destination: route.destination.clone(),
        });
        expanded
    }

    /// Reserva con su horario embebido (sin ids anidados)
    pub fn expand_reservation(&self, reservation: &Reservation) -> Reservation {
        let mut expanded = reservation.clone();
        expanded.schedule = self.schedules.get(&reservation.schedule_id).and_then(|schedule| {
            let bus = self.buses.get(&schedule.bus_id)?;
            let route = self.routes.get(&schedule.route_id)?;
            Some(ReservationSchedule {
                departure_time: schedule.departure_time,
                arrival_time: schedule.arrival_time,
                bus: BusRef {
                    id: None,
                    bus_number: bus.bus_number.clone(),
                },
                route: RouteRef {
                    id: None,
                    route_name: route.route_name.clone(),
                    origin: route.origin.clone(),
                    destination: route.destination.clone(),
                },
            })
        });
        expanded
    }

    /// Borrar un horario y sus reservas
    pub fn remove_schedule(&mut self, id: i64) -> Option<CascadeReport> {
        self.schedules.remove(&id)?;
        let before = self.reservations.len();
        self.reservations.retain(|_, reservation| reservation.schedule_id != id);
        Some(CascadeReport {
            schedules: 0,
            reservations: before - self.reservations.len(),
        })
    }

    /// Borrar un autobús junto con sus horarios y las reservas de estos
    pub fn remove_bus(&mut self, id: i64) -> Option<CascadeReport> {
        self.buses.remove(&id)?;
        let orphaned: Vec<i64> = self
            .schedules
            .values()
            .filter(|schedule| schedule.bus_id == id)
            .map(|schedule| schedule.id)
            .collect();
        Some(self.remove_schedules(&orphaned))
    }

    /// Borrar una ruta junto con sus horarios y las reservas de estos
    pub fn remove_route(&mut self, id: i64) -> Option<CascadeReport> {
        self.routes.remove(&id)?;
        let orphaned: Vec<i64> = self
            .schedules
            .values()
            .filter(|schedule| schedule.route_id == id)
            .map(|schedule| schedule.id)
            .collect();
        Some(self.remove_schedules(&orphaned))
    }

    fn remove_schedules(&mut self, ids: &[i64]) -> CascadeReport {
        let mut report = CascadeReport::default();
        for id in ids {
            if let Some(removed) = self.remove_schedule(*id) {
                report.schedules += 1;
                report.reservations += removed.reservations;
            }
        }
        report
    }
}

/// Repositorio compartido entre los handlers
#[derive(Debug, Clone, Default)]
pub struct FleetRepository {
    tables: Arc<RwLock<FleetTables>>,
}

impl FleetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, FleetTables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, FleetTables> {
        self.tables.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusDraft, BusStatus, ReservationDraft, RouteDraft, ScheduleDraft};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn seeded() -> FleetTables {
        let mut tables = FleetTables::default();
        for number in ["B-100", "B-200"] {
            let id = tables.next_bus_id();
            tables.buses.insert(
                id,
                Bus::from_draft(
                    id,
                    BusDraft {
                        bus_number: number.to_string(),
                        model: "Volvo 9700".to_string(),
                        capacity: 45,
                        year: 2022,
                        status: BusStatus::Active,
                    },
                ),
            );
        }
        let route_id = tables.next_route_id();
        tables.routes.insert(
            route_id,
            Route::from_draft(
                route_id,
                RouteDraft {
                    route_name: "Costa".to_string(),
                    origin: "Lima".to_string(),
                    destination: "Ica".to_string(),
                    distance: 300.0,
                },
            ),
        );
        let schedule_draft = ScheduleDraft {
            bus_id: Some(1),
            route_id: Some(route_id),
            departure_time: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        };
        for bus_id in [1, 2] {
            let id = tables.next_schedule_id();
            tables
                .schedules
                .insert(id, Schedule::from_draft(id, bus_id, route_id, &schedule_draft));
        }
        let reservation_draft = ReservationDraft {
            schedule_id: Some(1),
            passenger_name: "Ana Torres".to_string(),
            seat_number: Some(12),
            reservation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        let id = tables.next_reservation_id();
        tables
            .reservations
            .insert(id, Reservation::from_draft(id, 1, 12, &reservation_draft));
        tables
    }

    #[test]
    fn test_removing_bus_cascades_to_schedules_and_reservations() {
        let mut tables = seeded();
        let report = tables.remove_bus(1).unwrap();

        assert_eq!(report, CascadeReport { schedules: 1, reservations: 1 });
        assert!(tables.schedules.values().all(|schedule| schedule.bus_id != 1));
        assert!(tables.reservations.is_empty());
        assert_eq!(tables.schedules.len(), 1);
    }

    #[test]
    fn test_removing_route_clears_all_its_schedules() {
        let mut tables = seeded();
        let report = tables.remove_route(1).unwrap();

        assert_eq!(report.schedules, 2);
        assert!(tables.schedules.is_empty());
        assert!(tables.remove_route(1).is_none());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut tables = seeded();
        tables.remove_bus(2).unwrap();
        assert_eq!(tables.next_bus_id(), 3);
    }

    #[test]
    fn test_expansions_embed_references() {
        let tables = seeded();
        let schedule = tables.expand_schedule(&tables.schedules[&1]);
        assert_eq!(schedule.bus.unwrap().bus_number, "B-100");
        assert_eq!(schedule.route.unwrap().id, Some(1));

        let reservation = tables.expand_reservation(&tables.reservations[&1]);
        let embedded = reservation.schedule.unwrap();
        assert_eq!(embedded.bus.bus_number, "B-100");
        assert!(embedded.route.id.is_none());
    }

    #[test]
    fn test_bus_number_uniqueness_ignores_self() {
        let tables = seeded();
        assert!(tables.bus_number_taken("B-100", None));
        assert!(!tables.bus_number_taken("B-100", Some(1)));
        assert!(!tables.bus_number_taken("B-999", None));
    }
}
