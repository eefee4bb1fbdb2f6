use crate::models::{Resource, Schedule, ScheduleDraft, SchedulePatch};
use crate::repositories::{CascadeReport, FleetRepository, FleetTables};
use crate::services::EntityValidator;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub struct ScheduleController {
    repository: FleetRepository,
    validator: EntityValidator,
}

impl ScheduleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            validator: state.validator.clone(),
        }
    }

    /// Horarios con su autobús y su ruta embebidos
    pub async fn list(&self) -> Vec<Schedule> {
        let tables = self.repository.read().await;
        tables
            .schedules
            .values()
            .map(|schedule| tables.expand_schedule(schedule))
            .collect()
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Schedule> {
        let tables = self.repository.read().await;
        tables
            .schedules
            .get(&id)
            .map(|schedule| tables.expand_schedule(schedule))
            .ok_or_else(|| not_found_error(Schedule::SINGULAR, id))
    }

    pub async fn create(&self, draft: ScheduleDraft) -> AppResult<Schedule> {
        let mut tables = self.repository.write().await;
        let (bus_id, route_id) = self.check(&tables, &draft)?;

        let id = tables.next_schedule_id();
        let schedule = Schedule::from_draft(id, bus_id, route_id, &draft);
        tables.schedules.insert(id, schedule.clone());
        tracing::info!("🕒 Horario {} creado (autobús {}, ruta {})", id, bus_id, route_id);
        Ok(schedule)
    }

    pub async fn update(&self, id: i64, patch: SchedulePatch) -> AppResult<Schedule> {
        let mut tables = self.repository.write().await;
        let current = tables
            .schedules
            .get(&id)
            .ok_or_else(|| not_found_error(Schedule::SINGULAR, id))?
            .to_draft();

        let merged = patch.apply(current);
        let (bus_id, route_id) = self.check(&tables, &merged)?;

        let schedule = Schedule::from_draft(id, bus_id, route_id, &merged);
        tables.schedules.insert(id, schedule.clone());
        tracing::info!("🕒 Horario {} actualizado", id);
        Ok(schedule)
    }

    pub async fn delete(&self, id: i64) -> AppResult<CascadeReport> {
        let report = self
            .repository
            .write()
            .await
            .remove_schedule(id)
            .ok_or_else(|| not_found_error(Schedule::SINGULAR, id))?;
        tracing::info!(
            "🗑️ Horario {} eliminado ({} reservas en cascada)",
            id,
            report.reservations
        );
        Ok(report)
    }

    /// Validar el horario y que el autobús y la ruta existan
    fn check(&self, tables: &FleetTables, draft: &ScheduleDraft) -> AppResult<(i64, i64)> {
        self.validator.validate_schedule(draft)?;
        self.validator
            .check_schedule_references(draft, tables.buses.values(), tables.routes.values())?;
        match (draft.bus_id, draft.route_id) {
            (Some(bus_id), Some(route_id)) => Ok((bus_id, route_id)),
            _ => Err(bad_request_error("Debe indicar el autobús y la ruta")),
        }
    }
}
