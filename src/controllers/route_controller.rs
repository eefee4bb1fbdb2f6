use crate::models::{Resource, Route, RouteDraft, RoutePatch};
use crate::repositories::{CascadeReport, FleetRepository};
use crate::services::EntityValidator;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct RouteController {
    repository: FleetRepository,
    validator: EntityValidator,
}

impl RouteController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            validator: state.validator.clone(),
        }
    }

    pub async fn list(&self) -> Vec<Route> {
        self.repository.read().await.routes.values().cloned().collect()
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Route> {
        self.repository
            .read()
            .await
            .routes
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error(Route::SINGULAR, id))
    }

    pub async fn create(&self, draft: RouteDraft) -> AppResult<Route> {
        self.validator.validate_route(&draft)?;

        let mut tables = self.repository.write().await;
        let id = tables.next_route_id();
        let route = Route::from_draft(id, draft);
        tables.routes.insert(id, route.clone());
        tracing::info!("🛣️ Ruta '{}' creada con id {}", route.route_name, id);
        Ok(route)
    }

    pub async fn update(&self, id: i64, patch: RoutePatch) -> AppResult<Route> {
        let mut tables = self.repository.write().await;
        let current = tables
            .routes
            .get(&id)
            .ok_or_else(|| not_found_error(Route::SINGULAR, id))?
            .to_draft();

        let merged = patch.apply(current);
        self.validator.validate_route(&merged)?;

        let route = Route::from_draft(id, merged);
        tables.routes.insert(id, route.clone());
        tracing::info!("🛣️ Ruta {} actualizada", id);
        Ok(route)
    }

    pub async fn delete(&self, id: i64) -> AppResult<CascadeReport> {
        let report = self
            .repository
            .write()
            .await
            .remove_route(id)
            .ok_or_else(|| not_found_error(Route::SINGULAR, id))?;
        tracing::info!(
            "🗑️ Ruta {} eliminada ({} horarios, {} reservas en cascada)",
            id,
            report.schedules,
            report.reservations
        );
        Ok(report)
    }
}
