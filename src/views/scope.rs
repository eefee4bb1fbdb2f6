//! Tokens de generación por vista
//!
//! Cada operación asíncrona de una vista toma un [`Ticket`] al empezar. Si
//! mientras tanto la vista empezó otra carga o se cerró, el ticket deja de
//! ser vigente y el resultado se descarta en lugar de aplicarse al estado.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    inner: Arc<ScopeInner>,
}

#[derive(Debug, Default)]
struct ScopeInner {
    generation: AtomicU64,
    closed: AtomicBool,
}

/// Prueba de que un resultado pertenece a la última operación de la vista
#[derive(Debug, Clone)]
pub struct Ticket {
    inner: Arc<ScopeInner>,
    issued: u64,
}

/// Resultado de una operación que puede quedar obsoleta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Stale,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emitir un ticket nuevo, invalidando los anteriores
    pub fn renew(&self) -> Ticket {
        let issued = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            inner: Arc::clone(&self.inner),
            issued,
        }
    }

    /// Ticket para la generación actual, sin invalidar operaciones en curso
    pub fn current(&self) -> Ticket {
        Ticket {
            inner: Arc::clone(&self.inner),
            issued: self.inner.generation.load(Ordering::SeqCst),
        }
    }

    /// Cerrar la vista: ningún resultado pendiente o futuro se aplicará
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        !self.inner.closed.load(Ordering::SeqCst)
            && self.inner.generation.load(Ordering::SeqCst) == self.issued
    }
}
