//! Modelo de Route
//!
//! Ruta entre un origen y un destino, con su distancia en kilómetros.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Resource;
use crate::utils::validation::validate_not_empty;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: i64,
    pub route_name: String,
    pub origin: String,
    pub destination: String,
    pub distance: f64,
}

/// Request para crear o actualizar una ruta
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteDraft {
    #[validate(
        custom = "validate_not_empty",
        length(max = 100, message = "El nombre de la ruta admite como máximo 100 caracteres")
    )]
    pub route_name: String,

    #[validate(
        custom = "validate_not_empty",
        length(max = 100, message = "El origen admite como máximo 100 caracteres")
    )]
    pub origin: String,

    #[validate(
        custom = "validate_not_empty",
        length(max = 100, message = "El destino admite como máximo 100 caracteres")
    )]
    pub destination: String,

    /// Kilómetros, no negativa (ver `EntityValidator`)
    pub distance: f64,
}

/// Request para actualizar parcialmente una ruta
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePatch {
    pub route_name: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub distance: Option<f64>,
}

impl RoutePatch {
    pub fn apply(self, current: RouteDraft) -> RouteDraft {
        RouteDraft {
            route_name: self.route_name.unwrap_or(current.route_name),
            origin: self.origin.unwrap_or(current.origin),
            destination: self.destination.unwrap_or(current.destination),
            distance: self.distance.unwrap_or(current.distance),
        }
    }
}

impl Route {
    pub fn from_draft(id: i64, draft: RouteDraft) -> Self {
        Self {
            id,
            route_name: draft.route_name,
            origin: draft.origin,
            destination: draft.destination,
            distance: draft.distance,
        }
    }
}

impl Resource for Route {
    const COLLECTION: &'static str = "routes";
    const SINGULAR: &'static str = "la ruta";
    const DEMONSTRATIVE: &'static str = "esta ruta";
    const PLURAL: &'static str = "las rutas";

    type Draft = RouteDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_draft(&self) -> RouteDraft {
        RouteDraft {
            route_name: self.route_name.clone(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            distance: self.distance,
        }
    }
}
