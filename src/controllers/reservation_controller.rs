use crate::models::{Reservation, ReservationDraft, ReservationPatch, Resource};
use crate::repositories::{FleetRepository, FleetTables};
use crate::services::EntityValidator;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};

pub struct ReservationController {
    repository: FleetRepository,
    validator: EntityValidator,
}

impl ReservationController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            validator: state.validator.clone(),
        }
    }

    /// Reservas con su horario embebido
    pub async fn list(&self) -> Vec<Reservation> {
        let tables = self.repository.read().await;
        tables
            .reservations
            .values()
            .map(|reservation| tables.expand_reservation(reservation))
            .collect()
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Reservation> {
        let tables = self.repository.read().await;
        tables
            .reservations
            .get(&id)
            .map(|reservation| tables.expand_reservation(reservation))
            .ok_or_else(|| not_found_error(Reservation::SINGULAR, id))
    }

    pub async fn create(&self, draft: ReservationDraft) -> AppResult<Reservation> {
        let mut tables = self.repository.write().await;
        let (schedule_id, seat) = self.check(&tables, &draft, None)?;

        let id = tables.next_reservation_id();
        let reservation = Reservation::from_draft(id, schedule_id, seat, &draft);
        tables.reservations.insert(id, reservation.clone());
        tracing::info!(
            "🎫 Reserva {} creada: horario {}, asiento {}",
            id,
            schedule_id,
            seat
        );
        Ok(reservation)
    }

    pub async fn update(&self, id: i64, patch: ReservationPatch) -> AppResult<Reservation> {
        let mut tables = self.repository.write().await;
        let current = tables
            .reservations
            .get(&id)
            .ok_or_else(|| not_found_error(Reservation::SINGULAR, id))?
            .to_draft();

        let merged = patch.apply(current);
        let (schedule_id, seat) = self.check(&tables, &merged, Some(id))?;

        let reservation = Reservation::from_draft(id, schedule_id, seat, &merged);
        tables.reservations.insert(id, reservation.clone());
        tracing::info!("🎫 Reserva {} actualizada", id);
        Ok(reservation)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository
            .write()
            .await
            .reservations
            .remove(&id)
            .ok_or_else(|| not_found_error(Reservation::SINGULAR, id))?;
        tracing::info!("🗑️ Reserva {} eliminada", id);
        Ok(())
    }

    /// El horario debe existir (400) y el asiento estar libre (409)
    fn check(
        &self,
        tables: &FleetTables,
        draft: &ReservationDraft,
        editing: Option<i64>,
    ) -> AppResult<(i64, i32)> {
        self.validator.validate_reservation(draft)?;
        let (Some(schedule_id), Some(seat)) = (draft.schedule_id, draft.seat_number) else {
            return Err(bad_request_error("Debe indicar el horario y el asiento"));
        };

        if !tables.schedules.contains_key(&schedule_id) {
            return Err(bad_request_error(&format!(
                "El horario {} no existe",
                schedule_id
            )));
        }
        if self
            .validator
            .find_seat_conflict(draft, tables.reservations.values(), editing)
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "El asiento {} ya está reservado para este horario",
                seat
            )));
        }
        Ok((schedule_id, seat))
    }
}
