use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::PricingConfig;
use crate::ordering::catalog::MenuCatalog;
use crate::ordering::domain::{
    ContactDetails, DeliveryDetails, Order, OrderId, OrderRequest, TeamId, TemplateId,
};
use crate::ordering::repository::{OrderRepository, RepositoryError};
use crate::ordering::service::OrderService;

pub(super) const MED_BOWL: &str = "660e8400-e29b-41d4-a716-446655440001";

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 6, 14, 0, 0)
        .single()
        .expect("valid reference instant")
}

pub(super) fn request_delivering_in(hours: i64) -> OrderRequest {
    let delivery_at = now() + Duration::hours(hours);
    OrderRequest {
        template_id: TemplateId(MED_BOWL.to_string()),
        contact: ContactDetails {
            name: "Jordan Ellis".to_string(),
            phone: "555-0142".to_string(),
            email: "nutrition@hawks.example".to_string(),
        },
        delivery: DeliveryDetails {
            date: delivery_at.date_naive(),
            time: Some(delivery_at.time()),
            location: "Practice facility, dock B".to_string(),
            instructions: Some("Call on arrival".to_string()),
        },
        estimated_people_count: Some(60),
        special_instructions: Some("Extra tzatziki".to_string()),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<OrderId, Order>>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryRepository {
    /// Store whose next issued sequence number is `next`.
    pub(super) fn starting_at(next: u64) -> Self {
        Self {
            records: Arc::default(),
            sequence: Arc::new(AtomicU64::new(next.saturating_sub(1))),
        }
    }
}

impl OrderRepository for MemoryRepository {
    fn insert(&self, order: Order) -> Result<Order, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&order.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    fn update(&self, order: Order) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&order.id) {
            guard.insert(order.id.clone(), order);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, team: Option<&TeamId>) -> Result<Vec<Order>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|order| team.map_or(true, |team| &order.team_id == team))
            .cloned()
            .collect())
    }

    fn next_sequence(&self) -> Result<u64, RepositoryError> {
        Ok(self.sequence.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

pub(super) struct UnavailableRepository;

impl OrderRepository for UnavailableRepository {
    fn insert(&self, _order: Order) -> Result<Order, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _order: Order) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _team: Option<&TeamId>) -> Result<Vec<Order>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn next_sequence(&self) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<OrderService<MemoryRepository>>, Arc<MemoryRepository>) {
    service_with(MemoryRepository::default())
}

pub(super) fn service_with(
    repository: MemoryRepository,
) -> (Arc<OrderService<MemoryRepository>>, Arc<MemoryRepository>) {
    let repository = Arc::new(repository);
    let service = Arc::new(OrderService::new(
        repository.clone(),
        MenuCatalog::standard(),
        PricingConfig::default(),
    ));
    (service, repository)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
