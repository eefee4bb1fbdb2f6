//! Gestión de una flota de autobuses
//!
//! Cliente tipado del API REST de la flota (autobuses, rutas, horarios y
//! reservas), validadores de entidades, estado de las vistas y un backend
//! de referencia en memoria construido con axum.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod views;

pub use clients::{CrudApi, FleetApi, FleetApiClient};
pub use config::EnvironmentConfig;
pub use routes::create_app;
pub use state::AppState;
pub use utils::errors::{AppError, FleetError, RequestError};
