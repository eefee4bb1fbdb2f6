//! Listados de recursos
//!
//! Tabla con la colección completa. Nunca se muestra una tabla obsoleta:
//! si la carga falla la colección queda vacía junto al aviso de error.

use tokio::sync::RwLock;

use super::confirm::{delete_prompt, ConfirmPrompt};
use super::scope::{Outcome, ViewScope};
use crate::clients::CrudApi;
use crate::models::Resource;
use crate::utils::errors::FleetError;

#[derive(Debug, Clone)]
pub struct ListState<E> {
    pub items: Vec<E>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<E> Default for ListState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// Resultado de una petición de borrado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// El usuario no confirmó; no se envió ninguna petición
    Declined,
    Stale,
}

pub struct ResourceList<E: Resource> {
    state: RwLock<ListState<E>>,
    scope: ViewScope,
}

impl<E: Resource> Default for ResourceList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Resource> ResourceList<E> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ListState::default()),
            scope: ViewScope::new(),
        }
    }

    pub async fn snapshot(&self) -> ListState<E> {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<E> {
        self.state.read().await.items.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub fn close(&self) {
        self.scope.close();
    }

    /// Reemplazar la colección con la del backend
    pub async fn load<A>(&self, api: &A) -> Result<Outcome, FleetError>
    where
        A: CrudApi<E> + ?Sized,
    {
        let ticket = self.scope.renew();
        self.state.write().await.loading = true;

        let fetched = api.list().await;

        let mut state = self.state.write().await;
        if !ticket.is_current() {
            log::debug!("⏭️ Listado de {} descartado: la vista ya no está activa", E::PLURAL);
            return Ok(Outcome::Stale);
        }
        state.loading = false;
        match fetched {
            Ok(items) => {
                log::debug!("📋 {} {} cargados", items.len(), E::COLLECTION);
                state.items = items;
                state.error = None;
                Ok(Outcome::Applied)
            }
            Err(e) => {
                log::warn!("❌ Error al cargar {}: {}", E::PLURAL, e);
                state.items.clear();
                state.error = Some(format!("Error al cargar {}: {}", E::PLURAL, e.user_message()));
                Err(e)
            }
        }
    }

    /// Borrar tras confirmar y recargar la colección.
    ///
    /// Si el borrado falla las filas se mantienen y se muestra el error.
    pub async fn remove<A, C>(&self, api: &A, confirm: &C, id: i64) -> Result<RemoveOutcome, FleetError>
    where
        A: CrudApi<E> + ?Sized,
        C: ConfirmPrompt + ?Sized,
    {
        if !confirm.confirm(&delete_prompt(E::DEMONSTRATIVE)).await {
            return Ok(RemoveOutcome::Declined);
        }

        let ticket = self.scope.current();
        if let Err(e) = api.delete(id).await {
            if ticket.is_current() {
                log::warn!("❌ Error al eliminar {} {}: {}", E::SINGULAR, id, e);
                self.state.write().await.error =
                    Some(format!("Error al eliminar {}: {}", E::SINGULAR, e.user_message()));
            }
            return Err(e);
        }
        log::info!("🗑️ {} {} eliminado", E::SINGULAR, id);

        match self.load(api).await? {
            Outcome::Applied => Ok(RemoveOutcome::Removed),
            Outcome::Stale => Ok(RemoveOutcome::Stale),
        }
    }
}
