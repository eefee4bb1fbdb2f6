//! Cliente HTTP para el backend de la flota
//!
//! Traduce las operaciones CRUD tipadas en peticiones REST contra las
//! cuatro colecciones (`buses`, `routes`, `schedules`, `reservations`) y
//! decodifica las respuestas JSON. No hay reintentos ni caché: cada vista
//! vuelve a pedir los datos.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::config::EnvironmentConfig;
use crate::models::{Bus, DeleteAck, Reservation, Resource, Route, Schedule};
use crate::utils::errors::{
    FleetError, RequestError, REQUEST_ERROR_FALLBACK, SERVER_ERROR_FALLBACK,
};

/// Operaciones CRUD sobre una colección
#[async_trait]
pub trait CrudApi<E: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<E>, FleetError>;

    async fn get(&self, id: i64) -> Result<E, FleetError>;

    async fn create(&self, draft: &E::Draft) -> Result<E, FleetError>;

    async fn update(&self, id: i64, draft: &E::Draft) -> Result<E, FleetError>;

    async fn delete(&self, id: i64) -> Result<DeleteAck, FleetError>;
}

/// Acceso completo a las cuatro colecciones de la flota
pub trait FleetApi:
    CrudApi<Bus> + CrudApi<Route> + CrudApi<Schedule> + CrudApi<Reservation>
{
}

impl<T> FleetApi for T where
    T: CrudApi<Bus> + CrudApi<Route> + CrudApi<Schedule> + CrudApi<Reservation> + ?Sized
{
}

/// Cliente HTTP para el API REST de la flota
#[derive(Clone)]
pub struct FleetApiClient {
    client: Client,
    base_url: String,
}

impl FleetApiClient {
    /// Crear nuevo cliente HTTP con URL base configurable
    pub fn new(base_url: impl Into<String>) -> Result<Self, FleetError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reutilizar un `reqwest::Client` existente
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Result<Self, FleetError> {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn item_url(&self, collection: &str, id: i64) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }
}

/// Decodificar una respuesta o convertirla en `RequestError`.
///
/// Si el estado indica error se usa el campo `message` del cuerpo JSON;
/// si el cuerpo no es JSON se usa un mensaje genérico.
pub async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("message")
                .and_then(|message| message.as_str())
                .filter(|message| !message.is_empty())
                .unwrap_or(REQUEST_ERROR_FALLBACK)
                .to_string(),
            Err(_) => SERVER_ERROR_FALLBACK.to_string(),
        };
        log::warn!("❌ Error HTTP {}: {}", status, message);
        return Err(RequestError::new(Some(status), message));
    }

    response.json::<T>().await.map_err(|e| {
        log::warn!("❌ Error parsing JSON: {}", e);
        RequestError::new(Some(status), format!("Respuesta inválida del servidor: {}", e))
    })
}

#[async_trait]
impl<E: Resource> CrudApi<E> for FleetApiClient {
    async fn list(&self) -> Result<Vec<E>, FleetError> {
        let url = self.collection_url(E::COLLECTION);
        log::debug!("🔍 GET {}", url);
        let response = self.client.get(&url).send().await?;
        Ok(handle_response(response).await?)
    }

    async fn get(&self, id: i64) -> Result<E, FleetError> {
        let url = self.item_url(E::COLLECTION, id);
        log::debug!("🔍 GET {}", url);
        let response = self.client.get(&url).send().await?;
        Ok(handle_response(response).await?)
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, FleetError> {
        let url = self.collection_url(E::COLLECTION);
        log::debug!("📝 POST {}", url);
        let response = self.client.post(&url).json(draft).send().await?;
        Ok(handle_response(response).await?)
    }

    async fn update(&self, id: i64, draft: &E::Draft) -> Result<E, FleetError> {
        let url = self.item_url(E::COLLECTION, id);
        log::debug!("📝 PUT {}", url);
        let response = self.client.put(&url).json(draft).send().await?;
        Ok(handle_response(response).await?)
    }

    async fn delete(&self, id: i64) -> Result<DeleteAck, FleetError> {
        let url = self.item_url(E::COLLECTION, id);
        log::debug!("🗑️ DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        Ok(handle_response(response).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = FleetApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.collection_url("buses"), "http://localhost:5000/buses");
        assert_eq!(client.item_url("schedules", 7), "http://localhost:5000/schedules/7");
    }
}
