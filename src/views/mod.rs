//! Núcleo de las vistas
//!
//! Estado y transiciones de los formularios, listados y panel, sin
//! depender de una capa de presentación concreta.

pub mod confirm;
pub mod dashboard;
pub mod display;
pub mod form;
pub mod list;
pub mod scope;

pub use confirm::{delete_prompt, ConfirmPrompt};
pub use dashboard::{fetch_counts, DashboardState, DashboardView, FleetCounts};
pub use form::{
    FormMode, FormPhase, FormResource, FormState, ReservationReferences, ResourceForm,
    ScheduleReferences, SubmitOutcome,
};
pub use list::{ListState, RemoveOutcome, ResourceList};
pub use scope::{Outcome, Ticket, ViewScope};
