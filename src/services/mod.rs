//! Services module
//!
//! Este módulo contiene la lógica de negocio compartida entre el cliente
//! y el backend de referencia.

pub mod entity_validation;

pub use entity_validation::EntityValidator;
