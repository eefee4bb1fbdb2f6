//! Controladores del backend
//!
//! Lógica de cada recurso: validación, integridad referencial y
//! escritura en el repositorio bajo un único guard.

pub mod bus_controller;
pub mod reservation_controller;
pub mod route_controller;
pub mod schedule_controller;

pub use bus_controller::BusController;
pub use reservation_controller::ReservationController;
pub use route_controller::RouteController;
pub use schedule_controller::ScheduleController;
