//! Modelo de Bus
//!
//! Autobús de la flota y sus variantes para operaciones CRUD.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Resource;
use crate::utils::validation::validate_not_empty;

/// Estado del autobús
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BusStatus {
    #[default]
    #[serde(alias = "active", alias = "Activo", alias = "activo")]
    Active,
    #[serde(alias = "maintenance", alias = "Mantenimiento", alias = "mantenimiento")]
    Maintenance,
    #[serde(
        rename = "Out of Service",
        alias = "OutOfService",
        alias = "out of service",
        alias = "Fuera de Servicio",
        alias = "fuera de servicio"
    )]
    OutOfService,
}

impl BusStatus {
    pub const ALL: [BusStatus; 3] = [
        BusStatus::Active,
        BusStatus::Maintenance,
        BusStatus::OutOfService,
    ];

    /// Etiqueta para mostrar al usuario
    pub fn label(&self) -> &'static str {
        match self {
            BusStatus::Active => "Activo",
            BusStatus::Maintenance => "Mantenimiento",
            BusStatus::OutOfService => "Fuera de Servicio",
        }
    }
}

/// Autobús tal como lo devuelve el backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: i64,
    pub bus_number: String,
    pub model: String,
    pub capacity: i32,
    pub year: i32,
    pub status: BusStatus,
}

/// Request para crear o actualizar un autobús
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusDraft {
    #[validate(
        custom = "validate_not_empty",
        length(max = 20, message = "El número de autobús admite como máximo 20 caracteres")
    )]
    pub bus_number: String,

    #[validate(
        custom = "validate_not_empty",
        length(max = 50, message = "El modelo admite como máximo 50 caracteres")
    )]
    pub model: String,

    #[validate(range(min = 1, message = "La capacidad debe ser al menos 1"))]
    pub capacity: i32,

    /// El rango depende de la configuración, ver `EntityValidator`
    pub year: i32,

    #[serde(default)]
    pub status: BusStatus,
}

impl Default for BusDraft {
    fn default() -> Self {
        Self {
            bus_number: String::new(),
            model: String::new(),
            capacity: 0,
            year: Utc::now().year(),
            status: BusStatus::Active,
        }
    }
}

/// Request para actualizar parcialmente un autobús
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusPatch {
    pub bus_number: Option<String>,
    pub model: Option<String>,
    pub capacity: Option<i32>,
    pub year: Option<i32>,
    pub status: Option<BusStatus>,
}

impl BusPatch {
    /// Aplicar los campos presentes sobre el estado actual
    pub fn apply(self, current: BusDraft) -> BusDraft {
        BusDraft {
            bus_number: self.bus_number.unwrap_or(current.bus_number),
            model: self.model.unwrap_or(current.model),
            capacity: self.capacity.unwrap_or(current.capacity),
            year: self.year.unwrap_or(current.year),
            status: self.status.unwrap_or(current.status),
        }
    }
}

impl Bus {
    pub fn from_draft(id: i64, draft: BusDraft) -> Self {
        Self {
            id,
            bus_number: draft.bus_number,
            model: draft.model,
            capacity: draft.capacity,
            year: draft.year,
            status: draft.status,
        }
    }
}

impl Resource for Bus {
    const COLLECTION: &'static str = "buses";
    const SINGULAR: &'static str = "el autobús";
    const DEMONSTRATIVE: &'static str = "este autobús";
    const PLURAL: &'static str = "los autobuses";

    type Draft = BusDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_draft(&self) -> BusDraft {
        BusDraft {
            bus_number: self.bus_number.clone(),
            model: self.model.clone(),
            capacity: self.capacity,
            year: self.year,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(BusStatus::OutOfService).unwrap(),
            json!("Out of Service")
        );
        assert_eq!(
            serde_json::from_value::<BusStatus>(json!("OutOfService")).unwrap(),
            BusStatus::OutOfService
        );
        assert_eq!(
            serde_json::from_value::<BusStatus>(json!("Mantenimiento")).unwrap(),
            BusStatus::Maintenance
        );
    }

    #[test]
    fn test_bus_uses_camel_case() {
        let bus: Bus = serde_json::from_value(json!({
            "id": 1,
            "busNumber": "B-100",
            "model": "Volvo 9700",
            "capacity": 45,
            "year": 2022,
            "status": "Active"
        }))
        .unwrap();

        assert_eq!(bus.bus_number, "B-100");
        assert_eq!(bus.to_draft().capacity, 45);
    }

    #[test]
    fn test_patch_keeps_missing_fields() {
        let current = BusDraft {
            bus_number: "B-100".to_string(),
            model: "Volvo 9700".to_string(),
            capacity: 45,
            year: 2022,
            status: BusStatus::Active,
        };
        let patch: BusPatch = serde_json::from_value(json!({ "status": "Maintenance" })).unwrap();

        let merged = patch.apply(current.clone());
        assert_eq!(merged.status, BusStatus::Maintenance);
        assert_eq!(merged.bus_number, current.bus_number);
        assert_eq!(merged.capacity, 45);
    }
}
