use super::domain::{MenuItem, MenuItemId, MenuTemplate, PortionSize, TemplateId};
use super::pricing::{
    checked_amount, price_subtotal, round_money, PricingConstraint, PricingError, PricingResult,
    RushPolicy,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a cart line refers to in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartSource {
    Bundle {
        template_id: TemplateId,
    },
    MenuItem {
        menu_item_id: MenuItemId,
        portion: PortionSize,
    },
}

impl CartSource {
    /// Lines with the same source merge, so a dish in two portion sizes is two lines.
    pub fn line_id(&self) -> String {
        match self {
            Self::Bundle { template_id } => format!("bundle:{template_id}"),
            Self::MenuItem {
                menu_item_id,
                portion,
            } => format!("item:{menu_item_id}:{}", portion.as_str()),
        }
    }
}

/// Client request for a cart line. Prices are always looked up server side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSelection {
    #[serde(flatten)]
    pub source: CartSource,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub item_id: String,
    #[serde(flatten)]
    pub source: CartSource,
    pub name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub servings: u32,
}

impl CartItem {
    /// A whole bundle: the per-person price times the headcount it serves.
    pub fn bundle(template: &MenuTemplate, quantity: u32) -> Result<Self, PricingError> {
        let servings = u32::try_from(template.default_people_count()).unwrap_or(u32::MAX);
        let unit_price =
            checked_amount(template.bundle_price.checked_mul(Decimal::from(servings)))?;
        let source = CartSource::Bundle {
            template_id: template.id.clone(),
        };

        Ok(Self {
            item_id: source.line_id(),
            source,
            name: template.name.clone(),
            category: template.cuisine_type.clone(),
            unit_price,
            quantity,
            servings,
        })
    }

    pub fn menu_item(item: &MenuItem, portion: PortionSize, quantity: u32) -> Self {
        let source = CartSource::MenuItem {
            menu_item_id: item.id.clone(),
            portion,
        };

        Self {
            item_id: source.line_id(),
            source,
            name: item.name.clone(),
            category: item.section_category.label().to_string(),
            unit_price: item.price_for(portion),
            quantity,
            servings: portion.servings(),
        }
    }

    pub fn line_total(&self) -> Result<Decimal, PricingError> {
        checked_amount(self.unit_price.checked_mul(Decimal::from(self.quantity))).map(round_money)
    }
}

/// Cart preview. Prices through the same rules as the order form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add(item);
        }
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.item_id == item.item_id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    /// A quantity of zero or less drops the line.
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove(item_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|item| item.item_id == item_id) {
            item.quantity = quantity;
        }
    }

    pub fn remove(&mut self, item_id: &str) {
        self.items.retain(|item| item.item_id != item_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Fails when the sum leaves the range `Decimal` can represent.
    pub fn subtotal(&self) -> Result<Decimal, PricingError> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| {
                checked_amount(acc.checked_add(item.line_total()?))
            })
            .map(round_money)
    }

    pub fn total_servings(&self) -> u64 {
        self.items.iter().fold(0u64, |acc, item| {
            acc.saturating_add(u64::from(item.servings) * u64::from(item.quantity))
        })
    }

    pub fn quote(
        &self,
        tax_rate: Decimal,
        delivery_at: Option<DateTime<Utc>>,
        reference_now: DateTime<Utc>,
        rush: &RushPolicy,
    ) -> Result<PricingResult, PricingError> {
        if let Some(item) = self.items.iter().find(|item| item.unit_price < Decimal::ZERO) {
            return Err(PricingError::InvalidInput(
                PricingConstraint::NegativeUnitPrice(item.unit_price),
            ));
        }

        price_subtotal(self.subtotal()?, tax_rate, delivery_at, reference_now, rush)
    }
}
