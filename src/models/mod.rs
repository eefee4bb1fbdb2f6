//! Modelos del sistema
//!
//! Este módulo contiene las cuatro entidades de la flota (autobuses, rutas,
//! horarios y reservas) con sus borradores de creación/edición y patches
//! de actualización parcial. Los nombres en JSON siguen camelCase.

pub mod bus;
pub mod reservation;
pub mod route;
pub mod schedule;

pub use bus::{Bus, BusDraft, BusPatch, BusStatus};
pub use reservation::{Reservation, ReservationDraft, ReservationPatch, ReservationSchedule};
pub use route::{Route, RouteDraft, RoutePatch};
pub use schedule::{BusRef, RouteRef, Schedule, ScheduleDraft, SchedulePatch};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

/// Una colección REST con verbos CRUD uniformes
pub trait Resource:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static
{
    /// Segmento de la URL (`/buses`, `/routes`, ...)
    const COLLECTION: &'static str;
    /// "el autobús", usado en mensajes de error
    const SINGULAR: &'static str;
    /// "este autobús", usado en la confirmación de borrado
    const DEMONSTRATIVE: &'static str;
    /// "los autobuses", usado al cargar listados
    const PLURAL: &'static str;

    /// Cuerpo de creación/actualización (entidad sin id)
    type Draft: Serialize
        + DeserializeOwned
        + Validate
        + Clone
        + Default
        + std::fmt::Debug
        + Send
        + Sync
        + 'static;

    fn id(&self) -> i64;

    /// Borrador pre-cargado con los campos de la entidad (modo edición)
    fn to_draft(&self) -> Self::Draft;
}

/// Confirmación de borrado devuelta por el backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: Option<String>,
}
