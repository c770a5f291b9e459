mod menu_items;
mod parser;

pub use menu_items::MenuItemFilter;

use super::domain::{MenuItem, MenuItemId, MenuTemplate, TemplateId};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateTemplate(TemplateId),
    NegativePrice(TemplateId),
    DuplicateMenuItem(MenuItemId),
    NegativeMenuItemPrice(MenuItemId),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "failed to read menu catalog: {}", err),
            CatalogError::Csv(err) => write!(f, "invalid menu catalog CSV data: {}", err),
            CatalogError::DuplicateTemplate(id) => {
                write!(f, "menu template '{}' is listed more than once", id)
            }
            CatalogError::NegativePrice(id) => {
                write!(f, "menu template '{}' has a negative bundle price", id)
            }
            CatalogError::DuplicateMenuItem(id) => {
                write!(f, "menu item '{}' is listed more than once", id)
            }
            CatalogError::NegativeMenuItemPrice(id) => {
                write!(f, "menu item '{}' has a negative price", id)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Csv(err) => Some(err),
            CatalogError::DuplicateTemplate(_)
            | CatalogError::NegativePrice(_)
            | CatalogError::DuplicateMenuItem(_)
            | CatalogError::NegativeMenuItemPrice(_) => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Seeded bundles: (id suffix, name, cuisine, price in cents per person).
const STANDARD_BUNDLES: [(u8, &str, &str, i64); 11] = [
    (1, "BYO Med Bowl", "mediterranean", 4900),
    (2, "BYO Burrito Bowl", "mexican", 4000),
    (3, "BYO Asian Bowl", "asian", 4333),
    (4, "BYO Pasta Bowl", "italian", 3667),
    (5, "Taste of Miami", "latin", 4733),
    (6, "Little Italy", "italian", 5333),
    (7, "The Chophouse", "american", 6333),
    (8, "Chef Adam Experience", "signature", 7650),
    (9, "Breakfast Essentials", "breakfast", 3000),
    (10, "Breakfast Specials Go-To Brunch", "breakfast", 3667),
    (11, "Breakfast Menu (Specials)", "breakfast", 4000),
];

const STANDARD_SERVES: u32 = 60;

/// In-memory view of the bundle templates and a la carte items offered to teams.
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    templates: BTreeMap<TemplateId, MenuTemplate>,
    menu_items: BTreeMap<MenuItemId, MenuItem>,
}

impl MenuCatalog {
    pub fn standard() -> Self {
        let templates = STANDARD_BUNDLES
            .iter()
            .map(|(suffix, name, cuisine, cents)| {
                let id = TemplateId(format!("660e8400-e29b-41d4-a716-4466554400{suffix:02}"));
                let template = MenuTemplate {
                    id: id.clone(),
                    name: (*name).to_string(),
                    description: None,
                    cuisine_type: (*cuisine).to_string(),
                    bundle_price: Decimal::new(*cents, 2),
                    serves_count: STANDARD_SERVES,
                    is_active: true,
                };
                (id, template)
            })
            .collect();

        Self {
            templates,
            menu_items: BTreeMap::new(),
        }
        .with_standard_menu_items()
    }

    /// Adds the seeded a la carte items. Items already present are kept.
    pub fn with_standard_menu_items(mut self) -> Self {
        for item in menu_items::standard_menu_items() {
            self.menu_items.entry(item.id.clone()).or_insert(item);
        }
        self
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for template in parser::parse_templates(reader)? {
            catalog.insert(template)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, template: MenuTemplate) -> Result<(), CatalogError> {
        if template.bundle_price < Decimal::ZERO {
            return Err(CatalogError::NegativePrice(template.id));
        }
        if self.templates.contains_key(&template.id) {
            return Err(CatalogError::DuplicateTemplate(template.id));
        }
        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    pub fn get(&self, id: &TemplateId) -> Option<&MenuTemplate> {
        self.templates.get(id)
    }

    pub fn insert_menu_item(&mut self, item: MenuItem) -> Result<(), CatalogError> {
        let prices = [item.price_per_person, item.price_half_pan, item.price_full_pan];
        if prices.iter().any(|price| *price < Decimal::ZERO) {
            return Err(CatalogError::NegativeMenuItemPrice(item.id));
        }
        if self.menu_items.contains_key(&item.id) {
            return Err(CatalogError::DuplicateMenuItem(item.id));
        }
        self.menu_items.insert(item.id.clone(), item);
        Ok(())
    }

    pub fn menu_item(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.menu_items.get(id)
    }

    /// Active items passing the filter, grouped by section then ordered by name.
    pub fn menu_items(&self, filter: &MenuItemFilter) -> Vec<&MenuItem> {
        let mut items: Vec<_> = self
            .menu_items
            .values()
            .filter(|item| item.is_active && filter.matches(item))
            .collect();
        items.sort_by(|a, b| {
            a.section_category
                .cmp(&b.section_category)
                .then_with(|| a.name.cmp(&b.name))
        });
        items
    }

    pub fn menu_item_count(&self) -> usize {
        self.menu_items.len()
    }

    /// Every template, active or not, ordered by name.
    pub fn templates(&self) -> Vec<&MenuTemplate> {
        let mut templates: Vec<_> = self.templates.values().collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        templates
    }

    /// Returns the updated template, or `None` when the id is unknown.
    pub fn set_template_active(&mut self, id: &TemplateId, active: bool) -> Option<&MenuTemplate> {
        let template = self.templates.get_mut(id)?;
        template.is_active = active;
        Some(template)
    }

    /// Active templates ordered by name.
    pub fn active(&self) -> Vec<&MenuTemplate> {
        let mut active: Vec<_> = self
            .templates
            .values()
            .filter(|template| template.is_active)
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        active
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
