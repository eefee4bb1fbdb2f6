//! Panel principal con el total de cada colección

use serde::Serialize;
use tokio::sync::RwLock;

use super::scope::{Outcome, ViewScope};
use crate::clients::{CrudApi, FleetApi};
use crate::models::{Bus, Reservation, Route, Schedule};
use crate::utils::errors::FleetError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetCounts {
    pub buses: usize,
    pub routes: usize,
    pub schedules: usize,
    pub reservations: usize,
}

/// Pedir las cuatro colecciones en paralelo; un fallo invalida el total
pub async fn fetch_counts<A>(api: &A) -> Result<FleetCounts, FleetError>
where
    A: FleetApi + ?Sized,
{
    let (buses, routes, schedules, reservations) = futures::try_join!(
        CrudApi::<Bus>::list(api),
        CrudApi::<Route>::list(api),
        CrudApi::<Schedule>::list(api),
        CrudApi::<Reservation>::list(api)
    )?;

    Ok(FleetCounts {
        buses: buses.len(),
        routes: routes.len(),
        schedules: schedules.len(),
        reservations: reservations.len(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub counts: Option<FleetCounts>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct DashboardView {
    state: RwLock<DashboardState>,
    scope: ViewScope,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub fn close(&self) {
        self.scope.close();
    }

    pub async fn load<A>(&self, api: &A) -> Result<Outcome, FleetError>
    where
        A: FleetApi + ?Sized,
    {
        let ticket = self.scope.renew();
        self.state.write().await.loading = true;

        let fetched = fetch_counts(api).await;

        let mut state = self.state.write().await;
        if !ticket.is_current() {
            return Ok(Outcome::Stale);
        }
        state.loading = false;
        match fetched {
            Ok(counts) => {
                state.counts = Some(counts);
                state.error = None;
                Ok(Outcome::Applied)
            }
            Err(e) => {
                log::warn!("❌ Error al cargar el panel: {}", e);
                state.counts = None;
                state.error = Some(format!("Error al cargar el panel: {}", e.user_message()));
                Err(e)
            }
        }
    }
}
