//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno y los límites de
//! validación configurables del sistema.

pub mod environment;

pub use environment::*;
