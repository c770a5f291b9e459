use std::sync::{Arc, RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::analytics::{AnalyticsReport, TeamOverview};
use super::cart::{Cart, CartItem, CartSelection, CartSource};
use super::catalog::{MenuCatalog, MenuItemFilter};
use super::domain::{
    MenuItem, MenuItemId, MenuTemplate, Order, OrderId, OrderItem, OrderRequest, OrderStatus,
    Principal, TemplateId,
};
use super::pricing::{compute_pricing, PricingError, PricingResult};
use super::repository::{OrderRepository, RepositoryError};
use crate::config::PricingConfig;

/// Service composing the menu catalog, the pricing calculator, and order storage.
pub struct OrderService<R> {
    repository: Arc<R>,
    catalog: RwLock<MenuCatalog>,
    pricing: PricingConfig,
}

/// Template-based quote shown before an order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderQuote {
    pub template_id: TemplateId,
    pub template_name: String,
    pub unit_price: Decimal,
    pub people_count: i64,
    pub tax_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub pricing: PricingResult,
}

/// Cart preview with every line priced from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartQuote {
    pub items: Vec<CartItem>,
    pub total_servings: u64,
    pub tax_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub pricing: PricingResult,
}

impl<R> OrderService<R>
where
    R: OrderRepository + 'static,
{
    pub fn new(repository: Arc<R>, catalog: MenuCatalog, pricing: PricingConfig) -> Self {
        Self {
            repository,
            catalog: RwLock::new(catalog),
            pricing,
        }
    }

    pub fn pricing_config(&self) -> &PricingConfig {
        &self.pricing
    }

    fn catalog(&self) -> Result<RwLockReadGuard<'_, MenuCatalog>, OrderServiceError> {
        self.catalog
            .read()
            .map_err(|_| OrderServiceError::CatalogUnavailable)
    }

    fn orderable_template(&self, id: &TemplateId) -> Result<MenuTemplate, OrderServiceError> {
        let catalog = self.catalog()?;
        let template = catalog
            .get(id)
            .ok_or_else(|| OrderServiceError::UnknownTemplate(id.clone()))?;
        if !template.is_active {
            return Err(OrderServiceError::InactiveTemplate(id.clone()));
        }
        Ok(template.clone())
    }

    fn orderable_menu_item(&self, id: &MenuItemId) -> Result<MenuItem, OrderServiceError> {
        let catalog = self.catalog()?;
        let item = catalog
            .menu_item(id)
            .ok_or_else(|| OrderServiceError::UnknownMenuItem(id.clone()))?;
        if !item.is_active {
            return Err(OrderServiceError::InactiveMenuItem(id.clone()));
        }
        Ok(item.clone())
    }

    /// Templates teams can order, by name.
    pub fn active_templates(&self) -> Result<Vec<MenuTemplate>, OrderServiceError> {
        Ok(self.catalog()?.active().into_iter().cloned().collect())
    }

    /// Every template including deactivated ones.
    pub fn all_templates(
        &self,
        principal: &Principal,
    ) -> Result<Vec<MenuTemplate>, OrderServiceError> {
        if !principal.is_admin() {
            return Err(OrderServiceError::Forbidden(
                "template management is limited to admins",
            ));
        }
        Ok(self.catalog()?.templates().into_iter().cloned().collect())
    }

    pub fn set_template_active(
        &self,
        principal: &Principal,
        id: &TemplateId,
        active: bool,
    ) -> Result<MenuTemplate, OrderServiceError> {
        if !principal.is_admin() {
            return Err(OrderServiceError::Forbidden(
                "template management is limited to admins",
            ));
        }

        let mut catalog = self
            .catalog
            .write()
            .map_err(|_| OrderServiceError::CatalogUnavailable)?;
        let template = catalog
            .set_template_active(id, active)
            .cloned()
            .ok_or_else(|| OrderServiceError::UnknownTemplate(id.clone()))?;
        info!(template_id = %template.id, active, "template availability changed");
        Ok(template)
    }

    pub fn menu_items(&self, filter: &MenuItemFilter) -> Result<Vec<MenuItem>, OrderServiceError> {
        Ok(self.catalog()?.menu_items(filter).into_iter().cloned().collect())
    }

    /// Price a cart from catalog selections. Client-side prices are never trusted.
    pub fn cart_quote(
        &self,
        selections: &[CartSelection],
        delivery_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<CartQuote, OrderServiceError> {
        let mut cart = Cart::new();
        for selection in selections.iter().filter(|selection| selection.quantity > 0) {
            let line = match &selection.source {
                CartSource::Bundle { template_id } => {
                    CartItem::bundle(&self.orderable_template(template_id)?, selection.quantity)?
                }
                CartSource::MenuItem {
                    menu_item_id,
                    portion,
                } => CartItem::menu_item(
                    &self.orderable_menu_item(menu_item_id)?,
                    *portion,
                    selection.quantity,
                ),
            };
            cart.add(line);
        }

        let pricing = cart.quote(
            self.pricing.tax_rate,
            delivery_at,
            now,
            &self.pricing.rush_policy(),
        )?;

        Ok(CartQuote {
            total_servings: cart.total_servings(),
            items: cart.items().to_vec(),
            tax_rate: self.pricing.tax_rate,
            delivery_at,
            pricing,
        })
    }

    /// Price an active template without persisting anything.
    pub fn quote(
        &self,
        template_id: &TemplateId,
        people_count: Option<i64>,
        delivery_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<OrderQuote, OrderServiceError> {
        let template = self.orderable_template(template_id)?;
        let people_count = people_count.unwrap_or_else(|| template.default_people_count());
        let pricing = compute_pricing(
            template.bundle_price,
            people_count,
            self.pricing.tax_rate,
            delivery_at,
            now,
            &self.pricing.rush_policy(),
        )?;

        Ok(OrderQuote {
            template_id: template.id,
            template_name: template.name,
            unit_price: template.bundle_price,
            people_count,
            tax_rate: self.pricing.tax_rate,
            delivery_at,
            pricing,
        })
    }

    /// Place an order for the principal's team. Pricing is captured here and
    /// never recomputed for the stored order.
    pub fn place_order(
        &self,
        principal: &Principal,
        request: OrderRequest,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderServiceError> {
        let team_id = principal
            .team_id()
            .cloned()
            .ok_or(OrderServiceError::Forbidden("only team staff can place orders"))?;

        validate_request(&request, now)?;

        let delivery_at = request.delivery.scheduled_at();
        let quote = self.quote(
            &request.template_id,
            request.estimated_people_count,
            Some(delivery_at),
            now,
        )?;

        let sequence = self.repository.next_sequence()?;
        let order = Order {
            id: OrderId(format!("ord-{sequence:06}")),
            order_number: format!("AL-{}-{sequence:04}", now.format("%Y%m%d")),
            team_id,
            status: OrderStatus::Pending,
            contact: request.contact,
            delivery: request.delivery,
            estimated_people_count: quote.people_count,
            subtotal_amount: quote.pricing.subtotal,
            tax_rate: quote.tax_rate,
            tax_amount: quote.pricing.tax_amount,
            rush_surcharge: quote.pricing.rush_surcharge,
            total_amount: quote.pricing.total,
            is_rush_order: quote.pricing.is_rush_order,
            created_at: now,
            items: vec![OrderItem {
                template_id: quote.template_id,
                template_name: quote.template_name,
                quantity: 1,
                unit_price: quote.unit_price,
                total_price: quote.pricing.subtotal,
                special_instructions: request
                    .special_instructions
                    .filter(|value| !value.trim().is_empty()),
            }],
        };

        let stored = self.repository.insert(order)?;
        info!(
            order_id = %stored.id,
            team_id = %stored.team_id,
            total = %stored.total_amount,
            rush = stored.is_rush_order,
            "order placed"
        );
        Ok(stored)
    }

    pub fn get(&self, principal: &Principal, id: &OrderId) -> Result<Order, OrderServiceError> {
        let order = self
            .repository
            .fetch(id)?
            .filter(|order| principal.can_view(&order.team_id))
            .ok_or_else(|| OrderServiceError::NotFound(id.clone()))?;
        Ok(order)
    }

    /// Orders visible to the principal, newest first.
    pub fn list(
        &self,
        principal: &Principal,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrderServiceError> {
        let mut orders: Vec<Order> = self
            .repository
            .list(principal.team_id())?
            .into_iter()
            .filter(|order| principal.can_view(&order.team_id))
            .filter(|order| status.map_or(true, |wanted| order.status == wanted))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(orders)
    }

    /// Pending orders may always be cancelled; confirmed orders only while
    /// the delivery is still outside the rush window.
    pub fn cancel(
        &self,
        principal: &Principal,
        id: &OrderId,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderServiceError> {
        let mut order = self.get(principal, id)?;

        let lead_time = order.delivery.scheduled_at().signed_duration_since(now);
        let allowed = match order.status {
            OrderStatus::Pending => true,
            OrderStatus::Confirmed => !self.pricing.rush_policy().is_rush(lead_time),
            OrderStatus::Cancelled => {
                return Err(OrderServiceError::InvalidTransition {
                    from: order.status,
                    to: OrderStatus::Cancelled,
                })
            }
            OrderStatus::Preparing | OrderStatus::Delivered => false,
        };

        if !allowed {
            warn!(order_id = %order.id, status = ?order.status, "cancellation refused");
            return Err(OrderServiceError::CancellationWindowClosed {
                status: order.status,
                hours_until_delivery: lead_time.num_hours(),
            });
        }

        order.status = OrderStatus::Cancelled;
        self.repository.update(order.clone())?;
        info!(order_id = %order.id, "order cancelled");
        Ok(order)
    }

    pub fn update_status(
        &self,
        principal: &Principal,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderServiceError> {
        if !principal.is_admin() {
            return Err(OrderServiceError::Forbidden(
                "only admins can change order status",
            ));
        }

        let mut order = self.get(principal, id)?;
        if !order.status.can_transition_to(status) {
            return Err(OrderServiceError::InvalidTransition {
                from: order.status,
                to: status,
            });
        }

        order.status = status;
        self.repository.update(order.clone())?;
        info!(order_id = %order.id, status = status.label(), "order status updated");
        Ok(order)
    }

    pub fn analytics(
        &self,
        principal: &Principal,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> Result<AnalyticsReport, OrderServiceError> {
        if !principal.is_admin() {
            return Err(OrderServiceError::Forbidden("analytics are limited to admins"));
        }
        let orders = self.repository.list(None)?;
        Ok(AnalyticsReport::build(&orders, window_days, now))
    }

    pub fn teams_overview(
        &self,
        principal: &Principal,
    ) -> Result<Vec<TeamOverview>, OrderServiceError> {
        if !principal.is_admin() {
            return Err(OrderServiceError::Forbidden(
                "the teams overview is limited to admins",
            ));
        }
        let orders = self.repository.list(None)?;
        Ok(TeamOverview::build(&orders))
    }
}

fn validate_request(request: &OrderRequest, now: DateTime<Utc>) -> Result<(), OrderServiceError> {
    let required = [
        ("contact.name", &request.contact.name),
        ("contact.phone", &request.contact.phone),
        ("contact.email", &request.contact.email),
        ("delivery.location", &request.delivery.location),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(OrderServiceError::MissingField(*field));
    }

    if request.delivery.scheduled_at() < now {
        return Err(OrderServiceError::DeliveryInPast);
    }

    Ok(())
}

/// Error raised by the order service.
#[derive(Debug, thiserror::Error)]
pub enum OrderServiceError {
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("delivery must be scheduled in the future")]
    DeliveryInPast,
    #[error("menu template '{0}' does not exist")]
    UnknownTemplate(TemplateId),
    #[error("menu template '{0}' is not currently offered")]
    InactiveTemplate(TemplateId),
    #[error("menu item '{0}' does not exist")]
    UnknownMenuItem(MenuItemId),
    #[error("menu item '{0}' is not currently offered")]
    InactiveMenuItem(MenuItemId),
    #[error("menu catalog is unavailable")]
    CatalogUnavailable,
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("order '{0}' not found")]
    NotFound(OrderId),
    #[error(
        "{} orders can no longer be cancelled ({hours_until_delivery}h until delivery)",
        .status.label()
    )]
    CancellationWindowClosed {
        status: OrderStatus,
        hours_until_delivery: i64,
    },
    #[error("cannot move order from {} to {}", .from.label(), .to.label())]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
