use crate::models::{Bus, BusDraft, BusPatch, Resource};
use crate::repositories::{CascadeReport, FleetRepository};
use crate::services::EntityValidator;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

pub struct BusController {
    repository: FleetRepository,
    validator: EntityValidator,
}

impl BusController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            validator: state.validator.clone(),
        }
    }

    pub async fn list(&self) -> Vec<Bus> {
        self.repository.read().await.buses.values().cloned().collect()
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Bus> {
        self.repository
            .read()
            .await
            .buses
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error(Bus::SINGULAR, id))
    }

    pub async fn create(&self, draft: BusDraft) -> AppResult<Bus> {
        self.validator.validate_bus(&draft)?;

        let mut tables = self.repository.write().await;
        // El número de autobús es único en toda la flota
        if tables.bus_number_taken(&draft.bus_number, None) {
            return Err(conflict_error("un autobús", "número", &draft.bus_number));
        }

        let id = tables.next_bus_id();
        let bus = Bus::from_draft(id, draft);
        tables.buses.insert(id, bus.clone());
        tracing::info!("🚌 Autobús {} creado con id {}", bus.bus_number, id);
        Ok(bus)
    }

    /// Actualización parcial: los campos ausentes conservan su valor
    pub async fn update(&self, id: i64, patch: BusPatch) -> AppResult<Bus> {
        let mut tables = self.repository.write().await;
        let current = tables
            .buses
            .get(&id)
            .ok_or_else(|| not_found_error(Bus::SINGULAR, id))?
            .to_draft();

        let merged = patch.apply(current);
        self.validator.validate_bus(&merged)?;
        if tables.bus_number_taken(&merged.bus_number, Some(id)) {
            return Err(conflict_error("un autobús", "número", &merged.bus_number));
        }

        let bus = Bus::from_draft(id, merged);
        tables.buses.insert(id, bus.clone());
        tracing::info!("🚌 Autobús {} actualizado", id);
        Ok(bus)
    }

    pub async fn delete(&self, id: i64) -> AppResult<CascadeReport> {
        let report = self
            .repository
            .write()
            .await
            .remove_bus(id)
            .ok_or_else(|| not_found_error(Bus::SINGULAR, id))?;
        tracing::info!(
            "🗑️ Autobús {} eliminado ({} horarios, {} reservas en cascada)",
            id,
            report.schedules,
            report.reservations
        );
        Ok(report)
    }
}
