#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use bus_fleet::models::{
    BusDraft, BusStatus, DeleteAck, ReservationDraft, Resource, RouteDraft, ScheduleDraft,
};
use bus_fleet::{create_app, AppState, CrudApi, FleetError, RequestError};

/// Levantar el backend en un puerto efímero y devolver su URL base
pub async fn spawn_backend() -> String {
    spawn_router(create_app(AppState::default())).await
}

pub async fn spawn_router(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn bus_draft(number: &str) -> BusDraft {
    BusDraft {
        bus_number: number.to_string(),
        model: "Volvo 9700".to_string(),
        capacity: 45,
        year: 2022,
        status: BusStatus::Active,
    }
}

pub fn route_draft() -> RouteDraft {
    RouteDraft {
        route_name: "Costa".to_string(),
        origin: "Lima".to_string(),
        destination: "Ica".to_string(),
        distance: 300.0,
    }
}

pub fn schedule_draft(bus_id: i64, route_id: i64, departure_hour: u32, arrival_hour: u32) -> ScheduleDraft {
    ScheduleDraft {
        bus_id: Some(bus_id),
        route_id: Some(route_id),
        departure_time: Utc.with_ymd_and_hms(2024, 1, 1, departure_hour, 0, 0).unwrap(),
        arrival_time: Utc.with_ymd_and_hms(2024, 1, 1, arrival_hour, 0, 0).unwrap(),
    }
}

pub fn reservation_draft(schedule_id: i64, seat: i32) -> ReservationDraft {
    ReservationDraft {
        schedule_id: Some(schedule_id),
        passenger_name: "Ana Torres".to_string(),
        seat_number: Some(seat),
        reservation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    }
}

/// API guionizada para probar las vistas sin red.
///
/// Guarda cada colección como JSON, registra las llamadas (`"POST buses"`)
/// y permite forzar fallos y retrasos por colección y verbo.
#[derive(Default)]
pub struct FakeFleet {
    tables: Mutex<HashMap<&'static str, BTreeMap<i64, Value>>>,
    next_id: AtomicI64,
    failures: Mutex<HashMap<(&'static str, &'static str), (StatusCode, String)>>,
    calls: Mutex<Vec<String>>,
    delay: Mutex<Option<Duration>>,
}

impl FakeFleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed<E: Resource>(&self, mut row: Value) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        row["id"] = json!(id);
        self.tables
            .lock()
            .unwrap()
            .entry(E::COLLECTION)
            .or_default()
            .insert(id, row);
        id
    }

    pub fn fail<E: Resource>(&self, verb: &'static str, status: StatusCode, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert((E::COLLECTION, verb), (status, message.to_string()));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn rows<E: Resource>(&self) -> usize {
        self.tables
            .lock()
            .unwrap()
            .get(E::COLLECTION)
            .map(|table| table.len())
            .unwrap_or(0)
    }

    async fn enter(&self, collection: &'static str, verb: &'static str) -> Result<(), FleetError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", verb, collection));
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self
            .failures
            .lock()
            .unwrap()
            .get(&(collection, verb))
            .cloned();
        match failure {
            Some((status, message)) => Err(RequestError::new(Some(status), message).into()),
            None => Ok(()),
        }
    }

    fn decode<E: Resource>(row: Value) -> Result<E, FleetError> {
        serde_json::from_value(row).map_err(|e| RequestError::new(None, e.to_string()).into())
    }

    fn not_found(id: i64) -> FleetError {
        RequestError::new(Some(StatusCode::NOT_FOUND), format!("No existe el registro {}", id)).into()
    }
}

#[async_trait]
impl<E: Resource> CrudApi<E> for FakeFleet {
    async fn list(&self) -> Result<Vec<E>, FleetError> {
        self.enter(E::COLLECTION, "GET").await?;
        let rows: Vec<Value> = self
            .tables
            .lock()
            .unwrap()
            .get(E::COLLECTION)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default();
        rows.into_iter().map(Self::decode::<E>).collect()
    }

    async fn get(&self, id: i64) -> Result<E, FleetError> {
        self.enter(E::COLLECTION, "GET_ONE").await?;
        let row = self
            .tables
            .lock()
            .unwrap()
            .get(E::COLLECTION)
            .and_then(|table| table.get(&id).cloned());
        match row {
            Some(row) => Self::decode(row),
            None => Err(Self::not_found(id)),
        }
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, FleetError> {
        self.enter(E::COLLECTION, "POST").await?;
        let row = serde_json::to_value(draft).unwrap();
        let id = self.seed::<E>(row);
        let stored = self.tables.lock().unwrap()[E::COLLECTION][&id].clone();
        Self::decode(stored)
    }

    async fn update(&self, id: i64, draft: &E::Draft) -> Result<E, FleetError> {
        self.enter(E::COLLECTION, "PUT").await?;
        let mut row = serde_json::to_value(draft).unwrap();
        row["id"] = json!(id);
        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(E::COLLECTION).or_default();
        if !table.contains_key(&id) {
            return Err(Self::not_found(id));
        }
        table.insert(id, row.clone());
        drop(tables);
        Self::decode(row)
    }

    async fn delete(&self, id: i64) -> Result<DeleteAck, FleetError> {
        self.enter(E::COLLECTION, "DELETE").await?;
        let removed = self
            .tables
            .lock()
            .unwrap()
            .get_mut(E::COLLECTION)
            .and_then(|table| table.remove(&id));
        match removed {
            Some(_) => Ok(DeleteAck {
                message: Some("eliminado".to_string()),
            }),
            None => Err(Self::not_found(id)),
        }
    }
}
