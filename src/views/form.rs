//! Formularios de recursos
//!
//! Máquina de estados común a los cuatro formularios:
//!
//! `Idle → LoadingReferenceData → Ready → Submitting → Success`
//!
//! Un envío fallido vuelve a `Ready` con el mensaje de error; un fallo de
//! carga deja el formulario en `Failed`, que es terminal. Los datos de
//! referencia (autobuses, rutas, horarios) se piden en paralelo.

use async_trait::async_trait;
use tokio::sync::RwLock;
use validator::ValidationErrors;

use super::scope::{Outcome, Ticket, ViewScope};
use crate::clients::{CrudApi, FleetApi};
use crate::models::{
    Bus, Reservation, ReservationDraft, Resource, Route, Schedule, ScheduleDraft,
};
use crate::services::EntityValidator;
use crate::utils::errors::FleetError;
use crate::utils::validation::describe_validation_errors;

/// Recurso editable mediante un [`ResourceForm`]
#[async_trait]
pub trait FormResource: Resource {
    /// Datos de referencia necesarios para poblar los selectores
    type References: Default + Clone + std::fmt::Debug + Send + Sync + 'static;

    async fn load_references<A>(api: &A) -> Result<Self::References, FleetError>
    where
        A: FleetApi + ?Sized;

    /// Validación completa del borrador, incluidas las referencias cargadas
    fn validate_draft(
        validator: &EntityValidator,
        draft: &Self::Draft,
        references: &Self::References,
        editing: Option<i64>,
    ) -> Result<(), ValidationErrors>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

impl FormMode {
    pub fn editing_id(&self) -> Option<i64> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(*id),
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            FormMode::Create => "crear",
            FormMode::Edit(_) => "actualizar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    LoadingReferenceData,
    Ready,
    Submitting,
    Success,
    Failed,
}

/// Resultado de un envío que no terminó en error
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<E> {
    Saved(E),
    /// El formulario no estaba en `Ready` (p. ej. doble clic durante el envío)
    Ignored,
    /// La vista se cerró antes de recibir la respuesta
    Stale,
}

#[derive(Debug, Clone)]
pub struct FormState<E: FormResource> {
    pub mode: FormMode,
    pub phase: FormPhase,
    pub draft: E::Draft,
    pub references: E::References,
    pub error: Option<String>,
}

impl<E: FormResource> FormState<E> {
    /// El botón de guardar solo está habilitado en `Ready`
    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::Ready
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            FormPhase::LoadingReferenceData | FormPhase::Submitting
        )
    }
}

pub struct ResourceForm<E: FormResource> {
    state: RwLock<FormState<E>>,
    scope: ViewScope,
}

impl<E: FormResource> ResourceForm<E> {
    pub fn new(mode: FormMode) -> Self {
        Self {
            state: RwLock::new(FormState {
                mode,
                phase: FormPhase::Idle,
                draft: E::Draft::default(),
                references: E::References::default(),
                error: None,
            }),
            scope: ViewScope::new(),
        }
    }

    pub fn create() -> Self {
        Self::new(FormMode::Create)
    }

    pub fn edit(id: i64) -> Self {
        Self::new(FormMode::Edit(id))
    }

    pub async fn snapshot(&self) -> FormState<E> {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> FormPhase {
        self.state.read().await.phase
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// Cerrar el aviso de error
    pub async fn dismiss_error(&self) {
        self.state.write().await.error = None;
    }

    /// Modificar el borrador; devuelve `false` si el formulario está ocupado
    pub async fn update_draft<F>(&self, change: F) -> bool
    where
        F: FnOnce(&mut E::Draft),
    {
        let mut state = self.state.write().await;
        if state.is_busy() || state.phase == FormPhase::Failed {
            return false;
        }
        change(&mut state.draft);
        true
    }

    /// La vista se desmonta: se descartan las respuestas pendientes
    pub fn close(&self) {
        self.scope.close();
    }

    /// Cargar datos de referencia y, en modo edición, la entidad.
    ///
    /// Solo arranca desde `Idle`; en cualquier otra fase no se pide nada y
    /// devuelve `Outcome::Stale`, así una recarga no puede interrumpir un
    /// envío ni reabrir un formulario en `Failed`.
    pub async fn load<A>(&self, api: &A) -> Result<Outcome, FleetError>
    where
        A: FleetApi + CrudApi<E> + ?Sized,
    {
        let (mode, ticket) = {
            let mut state = self.state.write().await;
            if state.phase != FormPhase::Idle {
                log::debug!("⏭️ Carga de formulario ignorada en fase {:?}", state.phase);
                return Ok(Outcome::Stale);
            }
            state.phase = FormPhase::LoadingReferenceData;
            state.error = None;
            (state.mode, self.scope.renew())
        };

        let loaded = async {
            let references = E::load_references(api).await?;
            let entity = match mode {
                FormMode::Create => None,
                FormMode::Edit(id) => Some(CrudApi::<E>::get(api, id).await?),
            };
            Ok::<_, FleetError>((references, entity))
        }
        .await;

        let mut state = self.state.write().await;
        if !ticket.is_current() {
            log::debug!("⏭️ Carga de formulario descartada: la vista ya no está activa");
            return Ok(Outcome::Stale);
        }
        match loaded {
            Ok((references, entity)) => {
                state.references = references;
                if let Some(entity) = entity {
                    state.draft = entity.to_draft();
                }
                state.phase = FormPhase::Ready;
                Ok(Outcome::Applied)
            }
            Err(e) => {
                log::warn!("❌ Error al cargar el formulario de {}: {}", E::SINGULAR, e);
                state.phase = FormPhase::Failed;
                state.error = Some(format!("Error al cargar los datos: {}", e.user_message()));
                Err(e)
            }
        }
    }

    /// Validar y enviar el borrador.
    ///
    /// Si la validación falla no se contacta al backend y el formulario
    /// sigue en `Ready` con el mensaje de error.
    pub async fn submit<A>(
        &self,
        api: &A,
        validator: &EntityValidator,
    ) -> Result<SubmitOutcome<E>, FleetError>
    where
        A: CrudApi<E> + ?Sized,
    {
        let (mode, draft, ticket) = {
            let mut state = self.state.write().await;
            if state.phase != FormPhase::Ready {
                return Ok(SubmitOutcome::Ignored);
            }
            let mode = state.mode;
            if let Err(errors) =
                E::validate_draft(validator, &state.draft, &state.references, mode.editing_id())
            {
                state.error = Some(describe_validation_errors(&errors));
                return Err(FleetError::Validation(errors));
            }
            state.phase = FormPhase::Submitting;
            state.error = None;
            (mode, state.draft.clone(), self.scope.current())
        };

        let result = match mode {
            FormMode::Create => api.create(&draft).await,
            FormMode::Edit(id) => api.update(id, &draft).await,
        };

        self.finish_submit(mode, ticket, result).await
    }

    async fn finish_submit(
        &self,
        mode: FormMode,
        ticket: Ticket,
        result: Result<E, FleetError>,
    ) -> Result<SubmitOutcome<E>, FleetError> {
        let mut state = self.state.write().await;
        if !ticket.is_current() {
            log::debug!("⏭️ Respuesta de envío descartada: la vista ya no está activa");
            return Ok(SubmitOutcome::Stale);
        }
        match result {
            Ok(entity) => {
                log::info!("✅ {} guardado con id {}", E::SINGULAR, entity.id());
                state.phase = FormPhase::Success;
                Ok(SubmitOutcome::Saved(entity))
            }
            Err(e) => {
                state.phase = FormPhase::Ready;
                state.error = Some(if e.is_conflict() {
                    e.user_message()
                } else {
                    format!("Error al {} {}: {}", mode.verb(), E::SINGULAR, e.user_message())
                });
                Err(e)
            }
        }
    }
}

/// Autobuses y rutas para los selectores del formulario de horarios
#[derive(Debug, Clone, Default)]
pub struct ScheduleReferences {
    pub buses: Vec<Bus>,
    pub routes: Vec<Route>,
}

/// Horarios seleccionables y asientos ya ocupados
#[derive(Debug, Clone, Default)]
pub struct ReservationReferences {
    pub schedules: Vec<Schedule>,
    pub reservations: Vec<Reservation>,
}

#[async_trait]
impl FormResource for Bus {
    type References = ();

    async fn load_references<A>(_api: &A) -> Result<(), FleetError>
    where
        A: FleetApi + ?Sized,
    {
        Ok(())
    }

    fn validate_draft(
        validator: &EntityValidator,
        draft: &Self::Draft,
        _references: &(),
        _editing: Option<i64>,
    ) -> Result<(), ValidationErrors> {
        validator.validate_bus(draft)
    }
}

#[async_trait]
impl FormResource for Route {
    type References = ();

    async fn load_references<A>(_api: &A) -> Result<(), FleetError>
    where
        A: FleetApi + ?Sized,
    {
        Ok(())
    }

    fn validate_draft(
        validator: &EntityValidator,
        draft: &Self::Draft,
        _references: &(),
        _editing: Option<i64>,
    ) -> Result<(), ValidationErrors> {
        validator.validate_route(draft)
    }
}

#[async_trait]
impl FormResource for Schedule {
    type References = ScheduleReferences;

    async fn load_references<A>(api: &A) -> Result<ScheduleReferences, FleetError>
    where
        A: FleetApi + ?Sized,
    {
        let (buses, routes) = futures::try_join!(
            CrudApi::<Bus>::list(api),
            CrudApi::<Route>::list(api)
        )?;
        Ok(ScheduleReferences { buses, routes })
    }

    fn validate_draft(
        validator: &EntityValidator,
        draft: &ScheduleDraft,
        references: &ScheduleReferences,
        _editing: Option<i64>,
    ) -> Result<(), ValidationErrors> {
        validator.validate_schedule(draft)?;
        validator.check_schedule_references(draft, &references.buses, &references.routes)
    }
}

#[async_trait]
impl FormResource for Reservation {
    type References = ReservationReferences;

    async fn load_references<A>(api: &A) -> Result<ReservationReferences, FleetError>
    where
        A: FleetApi + ?Sized,
    {
        let (schedules, reservations) = futures::try_join!(
            CrudApi::<Schedule>::list(api),
            CrudApi::<Reservation>::list(api)
        )?;
        Ok(ReservationReferences {
            schedules,
            reservations,
        })
    }

    fn validate_draft(
        validator: &EntityValidator,
        draft: &ReservationDraft,
        references: &ReservationReferences,
        editing: Option<i64>,
    ) -> Result<(), ValidationErrors> {
        validator.validate_reservation(draft)?;
        validator.check_reservation_references(
            draft,
            &references.schedules,
            &references.reservations,
            editing,
        )
    }
}
