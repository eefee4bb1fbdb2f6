//! Middleware del sistema
//!
//! Este módulo contiene la configuración de CORS del backend.

pub mod cors;

pub use cors::*;
