//! Clients - HTTP Clients for External APIs
//!
//! This module contains the HTTP client for the fleet REST backend.

pub mod fleet_client;

// Re-export main types for convenience
pub use fleet_client::{handle_response, CrudApi, FleetApi, FleetApiClient};
