use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Headcount used when a template does not report how many it serves.
pub const FALLBACK_PEOPLE_COUNT: i64 = 25;

/// Fixed-price-per-person meal bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTemplate {
    pub id: TemplateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cuisine_type: String,
    pub bundle_price: Decimal,
    pub serves_count: u32,
    pub is_active: bool,
}

impl MenuTemplate {
    pub fn default_people_count(&self) -> i64 {
        if self.serves_count == 0 {
            FALLBACK_PEOPLE_COUNT
        } else {
            i64::from(self.serves_count)
        }
    }
}

/// Menu section an individual item is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionCategory {
    PremiumSignature,
    BaseProteins,
    BaseStarches,
    BaseSides,
    Breakfast,
}

impl SectionCategory {
    pub const ALL: [SectionCategory; 5] = [
        Self::PremiumSignature,
        Self::BaseProteins,
        Self::BaseStarches,
        Self::BaseSides,
        Self::Breakfast,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::PremiumSignature => "Premium/Signature",
            Self::BaseProteins => "Base Proteins",
            Self::BaseStarches => "Base Starches",
            Self::BaseSides => "Base Sides",
            Self::Breakfast => "Breakfast",
        }
    }
}

pub const HALF_PAN_SERVINGS: u32 = 12;
pub const FULL_PAN_SERVINGS: u32 = 24;

/// How an individual menu item is portioned when added to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortionSize {
    PerPerson,
    HalfPan,
    FullPan,
}

impl PortionSize {
    pub const fn servings(self) -> u32 {
        match self {
            Self::PerPerson => 1,
            Self::HalfPan => HALF_PAN_SERVINGS,
            Self::FullPan => FULL_PAN_SERVINGS,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerPerson => "per_person",
            Self::HalfPan => "half_pan",
            Self::FullPan => "full_pan",
        }
    }
}

/// A la carte dish priced per person, per half pan, and per full pan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub section_category: SectionCategory,
    pub price_per_person: Decimal,
    pub price_half_pan: Decimal,
    pub price_full_pan: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_per_serving: Option<u32>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    pub is_active: bool,
}

impl MenuItem {
    pub fn price_for(&self, portion: PortionSize) -> Decimal {
        match portion {
            PortionSize::PerPerson => self.price_per_person,
            PortionSize::HalfPan => self.price_half_pan,
            PortionSize::FullPan => self.price_full_pan,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.dietary_tags
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive match on name, description, or any dietary tag.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self
                .dietary_tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Authenticated actor, resolved by whatever sits in front of the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Principal {
    TeamStaff { team_id: TeamId },
    Admin,
}

impl Principal {
    pub fn team(team_id: impl Into<String>) -> Self {
        Self::TeamStaff {
            team_id: TeamId(team_id.into()),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn team_id(&self) -> Option<&TeamId> {
        match self {
            Self::TeamStaff { team_id } => Some(team_id),
            Self::Admin => None,
        }
    }

    pub fn can_view(&self, team_id: &TeamId) -> bool {
        match self {
            Self::Admin => true,
            Self::TeamStaff { team_id: own } => own == team_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending Review",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Confirmed => 1,
            Self::Preparing => 2,
            Self::Delivered => 3,
            Self::Cancelled => 4,
        }
    }

    /// Fulfilment only moves forward; any open order may be cancelled.
    pub const fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Cancelled => true,
            _ => next.rank() > self.rank(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl DeliveryDetails {
    /// Delivery instant in UTC; a missing time means the start of the day.
    pub fn scheduled_at(&self) -> DateTime<Utc> {
        let time = self.time.unwrap_or(NaiveTime::MIN);
        self.date.and_time(time).and_utc()
    }
}

/// Order form submitted by team staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub template_id: TemplateId,
    pub contact: ContactDetails,
    pub delivery: DeliveryDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_people_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub template_id: TemplateId,
    pub template_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Persisted order. Pricing fields are captured once at placement and are
/// authoritative afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub team_id: TeamId,
    pub status: OrderStatus,
    pub contact: ContactDetails,
    pub delivery: DeliveryDetails,
    pub estimated_people_count: i64,
    pub subtotal_amount: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub rush_surcharge: Decimal,
    pub total_amount: Decimal,
    pub is_rush_order: bool,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}
