//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos,
//! conversión de fechas y el renderizado legible de errores de validación.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Crear un `ValidationError` con código y mensaje legible
pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Validar y convertir string a fecha (acepta también un timestamp completo)
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    validate_datetime(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| {
            let mut error = field_error("date", "La fecha no es válida");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"YYYY-MM-DD".to_string());
            error
        })
}

/// Validar y convertir string a datetime.
///
/// Acepta RFC3339 y también timestamps ISO sin zona horaria, que se
/// interpretan en UTC.
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            let mut error = field_error("datetime", "La fecha y hora no es válida");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339".to_string());
            error
        })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("not_empty", "Este campo es obligatorio"));
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = field_error("range", format!("Debe estar entre {} y {}", min, max));
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = field_error("non_negative", "No puede ser negativo");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que la llegada sea estrictamente posterior a la salida
pub fn validate_chronological(
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if arrival <= departure {
        let mut error = field_error(
            "chronological_order",
            "La hora de llegada debe ser posterior a la hora de salida",
        );
        error.add_param("departure".into(), &departure.to_rfc3339());
        error.add_param("arrival".into(), &arrival.to_rfc3339());
        return Err(error);
    }
    Ok(())
}

/// Combinar el resultado de `Validate::validate` con errores adicionales
pub fn merge_errors(
    base: Result<(), ValidationErrors>,
    extra: Vec<(&'static str, ValidationError)>,
) -> Result<(), ValidationErrors> {
    let mut errors = base.err().unwrap_or_else(ValidationErrors::new);
    for (field, error) in extra {
        errors.add(field, error);
    }
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Convertir `ValidationErrors` en un mensaje legible para el usuario.
///
/// Los campos se ordenan alfabéticamente para que el mensaje sea estable.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(field, _)| **field);

    let mut messages = Vec::new();
    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    messages.push(match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("{}: {}", field, error.code),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => messages.push(describe_validation_errors(nested)),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    messages.push(describe_validation_errors(nested));
                }
            }
        }
    }
    messages.join("; ")
}

/// Deserializador serde para timestamps que acepta RFC3339 o ISO sin zona
pub fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    validate_datetime(&raw).map_err(|_| serde::de::Error::custom(format!("invalid datetime '{}'", raw)))
}

/// Deserializador serde para fechas que acepta `YYYY-MM-DD` o un timestamp
pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    validate_date(&raw).map_err(|_| serde::de::Error::custom(format!("invalid date '{}'", raw)))
}

/// Variante opcional de [`deserialize_datetime`] para patches
pub fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => validate_datetime(&raw)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid datetime '{}'", raw))),
        None => Ok(None),
    }
}

/// Variante opcional de [`deserialize_date`] para patches
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => validate_date(&raw)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid date '{}'", raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_validate_date() {
        assert_eq!(
            validate_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(validate_date("2024-01-15T22:30:00.000Z").unwrap().day(), 15);
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_validate_datetime_accepts_naive_iso() {
        let naive = validate_datetime("2024-01-01T10:00:00").unwrap();
        let zoned = validate_datetime("2024-01-01T10:00:00Z").unwrap();
        assert_eq!(naive, zoned);
        assert_eq!(validate_datetime("2024-01-01T10:00:00.123456").unwrap().hour(), 10);
        assert!(validate_datetime("mañana").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("B-100").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(5, 1, 10).is_ok());
        assert!(validate_range(0, 1, 10).is_err());
        assert!(validate_range(15, 1, 10).is_err());
        assert_eq!(
            validate_range(51, 1, 50).unwrap_err().message.unwrap(),
            "Debe estar entre 1 y 50"
        );
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0.0).is_ok());
        assert!(validate_non_negative(12.5).is_ok());
        assert!(validate_non_negative(-0.1).is_err());
    }

    #[test]
    fn test_validate_chronological() {
        let departure = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();

        assert!(validate_chronological(departure, later).is_ok());
        assert_eq!(
            validate_chronological(departure, departure).unwrap_err().code,
            "chronological_order"
        );
        assert!(validate_chronological(departure, earlier).is_err());
    }

    #[test]
    fn test_merge_and_describe_errors() {
        assert!(merge_errors(Ok(()), Vec::new()).is_ok());

        let errors = merge_errors(
            Ok(()),
            vec![
                ("year", field_error("range", "Año fuera de rango")),
                ("capacity", field_error("range", "Capacidad inválida")),
            ],
        )
        .unwrap_err();

        assert_eq!(
            describe_validation_errors(&errors),
            "Capacidad inválida; Año fuera de rango"
        );
    }
}
