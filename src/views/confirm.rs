//! Confirmación de borrado inyectable
//!
//! Sustituye al diálogo global del navegador: quien usa la lista decide
//! cómo preguntar (consola, prueba automática, etc.).

use async_trait::async_trait;

#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Devolver `true` si el usuario acepta la acción
    async fn confirm(&self, message: &str) -> bool;
}

#[async_trait]
impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    async fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Texto de confirmación de borrado para un recurso
pub fn delete_prompt(demonstrative: &str) -> String {
    format!("¿Estás seguro de que deseas eliminar {}?", demonstrative)
}
