//! Menu catalog, cart, order placement, and admin analytics for team catering.
//!
//! Every price shown to a team, whether in the cart preview, a template quote,
//! or a placed order, goes through [`pricing`]. Stored orders keep the amounts
//! computed at placement.

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod domain;
pub mod pricing;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use analytics::{AnalyticsReport, MonthlyRevenue, TeamOverview, TemplatePerformance};
pub use cart::{Cart, CartItem, CartSelection, CartSource};
pub use catalog::{CatalogError, MenuCatalog, MenuItemFilter};
pub use domain::{
    ContactDetails, DeliveryDetails, MenuItem, MenuItemId, MenuTemplate, Order, OrderId,
    OrderItem, OrderRequest, OrderStatus, PortionSize, Principal, SectionCategory, TeamId,
    TemplateId,
};
pub use pricing::{
    compute_pricing, PricingConstraint, PricingError, PricingInput, PricingResult, RushPolicy,
};
pub use repository::{OrderRepository, OrderSummaryView, RepositoryError};
pub use router::{order_router, principal_from_headers};
pub use service::{CartQuote, OrderQuote, OrderService, OrderServiceError};
