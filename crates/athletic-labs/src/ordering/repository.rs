use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{Order, OrderId, OrderStatus, TeamId};

/// Storage abstraction so the service can run against any backend.
pub trait OrderRepository: Send + Sync {
    fn insert(&self, order: Order) -> Result<Order, RepositoryError>;
    fn update(&self, order: Order) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;
    /// All orders, optionally narrowed to one team. Ordering is unspecified.
    fn list(&self, team: Option<&TeamId>) -> Result<Vec<Order>, RepositoryError>;
    /// Next order sequence number for this store, starting at 1. Never reused.
    fn next_sequence(&self) -> Result<u64, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Compact order listing row for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummaryView {
    pub id: OrderId,
    pub order_number: String,
    pub team_id: TeamId,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub delivery_at: DateTime<Utc>,
    pub total_amount: Decimal,
    pub is_rush_order: bool,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn summary_view(&self) -> OrderSummaryView {
        OrderSummaryView {
            id: self.id.clone(),
            order_number: self.order_number.clone(),
            team_id: self.team_id.clone(),
            status: self.status,
            status_label: self.status.label(),
            delivery_at: self.delivery.scheduled_at(),
            total_amount: self.total_amount,
            is_rush_order: self.is_rush_order,
            created_at: self.created_at,
        }
    }
}
