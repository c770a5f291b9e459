use athletic_labs::error::AppError;
use athletic_labs::ordering::{
    MenuCatalog, Order, OrderId, OrderRepository, RepositoryError, TeamId,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryOrderRepository {
    records: Arc<Mutex<HashMap<OrderId, Order>>>,
    sequence: Arc<AtomicU64>,
}

impl OrderRepository for InMemoryOrderRepository {
    fn insert(&self, order: Order) -> Result<Order, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("order store poisoned".to_string()))?;
        if guard.contains_key(&order.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    fn update(&self, order: Order) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("order store poisoned".to_string()))?;
        if guard.contains_key(&order.id) {
            guard.insert(order.id.clone(), order);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("order store poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, team: Option<&TeamId>) -> Result<Vec<Order>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("order store poisoned".to_string()))?;
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

/// Templates from the CSV export when one is configured, the seeded bundles otherwise.
/// The a la carte menu is always the seeded one.
pub(crate) fn load_catalog(csv_path: Option<&Path>) -> Result<MenuCatalog, AppError> {
    match csv_path {
        Some(path) => {
            let catalog = MenuCatalog::from_path(path)?.with_standard_menu_items();
            info!(
                path = %path.display(),
                templates = catalog.len(),
                menu_items = catalog.menu_item_count(),
                "menu catalog loaded from csv"
            );
            Ok(catalog)
        }
        None => Ok(MenuCatalog::standard()),
    }
}

pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    Decimal::from_str(&cleaned).map_err(|err| format!("failed to parse '{raw}' as a decimal ({err})"))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM` (UTC), or a bare date at midnight UTC.
pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|err| format!("failed to parse '{raw}' as a delivery instant ({err})"))
}
