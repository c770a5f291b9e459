use super::super::domain::{
    MenuItem, MenuItemId, SectionCategory, FULL_PAN_SERVINGS, HALF_PAN_SERVINGS,
};
use rust_decimal::Decimal;

struct SeedItem {
    suffix: u8,
    name: &'static str,
    description: &'static str,
    category: SectionCategory,
    cents_per_person: i64,
    calories: u32,
    allergens: &'static [&'static str],
    dietary_tags: &'static [&'static str],
}

/// Search narrowing for the a la carte menu. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItemFilter {
    pub category: Option<SectionCategory>,
    pub dietary_tag: Option<String>,
    pub search: Option<String>,
}

impl MenuItemFilter {
    pub fn matches(&self, item: &MenuItem) -> bool {
        self.category
            .map_or(true, |category| item.section_category == category)
            && self
                .dietary_tag
                .as_deref()
                .map_or(true, |tag| item.has_tag(tag))
            && self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|needle| !needle.is_empty())
                .map_or(true, |needle| item.matches_text(needle))
    }
}

/// Seeded a la carte dishes. Pans hold 12 and 24 servings at the per-person rate.
const STANDARD_MENU_ITEMS: [SeedItem; 38] = [
    SeedItem {
        suffix: 1,
        name: "Adams Signature Sushi Boat",
        description: "Premium sushi selection crafted by Chef Adam",
        category: SectionCategory::PremiumSignature,
        cents_per_person: 3800,
        calories: 450,
        allergens: &["fish", "soy"],
        dietary_tags: &["premium", "signature"],
    },
    SeedItem {
        suffix: 2,
        name: "Wagyu Denvers",
        description: "Premium Wagyu beef Denver steaks",
        category: SectionCategory::PremiumSignature,
        cents_per_person: 4500,
        calories: 680,
        allergens: &[],
        dietary_tags: &["premium", "wagyu"],
    },
    SeedItem {
        suffix: 3,
        name: "Lobster Risotto",
        description: "Creamy lobster risotto with herbs",
        category: SectionCategory::PremiumSignature,
        cents_per_person: 4200,
        calories: 620,
        allergens: &["shellfish", "dairy"],
        dietary_tags: &["premium"],
    },
    SeedItem {
        suffix: 4,
        name: "Miso Glazed Chilean Sea Bass",
        description: "Pan-seared sea bass with miso glaze",
        category: SectionCategory::PremiumSignature,
        cents_per_person: 4800,
        calories: 580,
        allergens: &["fish", "soy"],
        dietary_tags: &["premium"],
    },
    SeedItem {
        suffix: 5,
        name: "Rosemary Dijon Lamb Chops",
        description: "Herb-crusted lamb chops with Dijon mustard",
        category: SectionCategory::PremiumSignature,
        cents_per_person: 4400,
        calories: 720,
        allergens: &[],
        dietary_tags: &["premium"],
    },
    SeedItem {
        suffix: 6,
        name: "Chicken Shawarma",
        description: "Middle Eastern spiced chicken shawarma",
        category: SectionCategory::BaseProteins,
        cents_per_person: 2200,
        calories: 485,
        allergens: &[],
        dietary_tags: &["halal"],
    },
    SeedItem {
        suffix: 7,
        name: "Asian Braised Salmon",
        description: "Teriyaki glazed salmon with Asian spices",
        category: SectionCategory::BaseProteins,
        cents_per_person: 2800,
        calories: 520,
        allergens: &["fish", "soy"],
        dietary_tags: &["omega-3"],
    },
    SeedItem {
        suffix: 8,
        name: "Pollo a la Plancha",
        description: "Grilled chicken with Latin spices",
        category: SectionCategory::BaseProteins,
        cents_per_person: 2400,
        calories: 445,
        allergens: &[],
        dietary_tags: &["grilled"],
    },
    SeedItem {
        suffix: 9,
        name: "Chimichurri Steak",
        description: "Grilled steak with chimichurri sauce",
        category: SectionCategory::BaseProteins,
        cents_per_person: 3200,
        calories: 625,
        allergens: &[],
        dietary_tags: &["grilled"],
    },
    SeedItem {
        suffix: 10,
        name: "Saffron Basmati Rice",
        description: "Aromatic saffron-infused basmati rice",
        category: SectionCategory::BaseStarches,
        cents_per_person: 1200,
        calories: 210,
        allergens: &[],
        dietary_tags: &["gluten-free"],
    },
    SeedItem {
        suffix: 11,
        name: "Jasmine Rice",
        description: "Fragrant jasmine rice",
        category: SectionCategory::BaseStarches,
        cents_per_person: 1000,
        calories: 205,
        allergens: &[],
        dietary_tags: &["gluten-free", "vegan"],
    },
    SeedItem {
        suffix: 12,
        name: "Fresh Baked Pita",
        description: "Warm Mediterranean pita bread",
        category: SectionCategory::BaseStarches,
        cents_per_person: 800,
        calories: 165,
        allergens: &["gluten"],
        dietary_tags: &["vegetarian"],
    },
    SeedItem {
        suffix: 13,
        name: "Alfredo Sauce",
        description: "Creamy alfredo pasta sauce",
        category: SectionCategory::BaseStarches,
        cents_per_person: 1400,
        calories: 185,
        allergens: &["dairy"],
        dietary_tags: &["vegetarian"],
    },
    SeedItem {
        suffix: 14,
        name: "Fresh Hummus",
        description: "Traditional Mediterranean hummus",
        category: SectionCategory::BaseSides,
        cents_per_person: 1400,
        calories: 155,
        allergens: &["sesame"],
        dietary_tags: &["vegan", "protein"],
    },
    SeedItem {
        suffix: 15,
        name: "Tahini Roasted Cauliflower",
        description: "Roasted cauliflower with tahini dressing",
        category: SectionCategory::BaseSides,
        cents_per_person: 1600,
        calories: 125,
        allergens: &["sesame"],
        dietary_tags: &["vegan"],
    },
    SeedItem {
        suffix: 16,
        name: "Charred Broccolini",
        description: "Perfectly charred broccolini with garlic",
        category: SectionCategory::BaseSides,
        cents_per_person: 1400,
        calories: 85,
        allergens: &[],
        dietary_tags: &["vegan"],
    },
    SeedItem {
        suffix: 17,
        name: "Roasted Sweet Plantains",
        description: "Caramelized sweet plantains",
        category: SectionCategory::BaseSides,
        cents_per_person: 1800,
        calories: 158,
        allergens: &[],
        dietary_tags: &["vegan"],
    },
    SeedItem {
        suffix: 18,
        name: "Almond na Tigela Acai Bowls",
        description: "Brazilian-style acai bowls with almonds",
        category: SectionCategory::Breakfast,
        cents_per_person: 2800,
        calories: 320,
        allergens: &["nuts"],
        dietary_tags: &["antioxidant", "superfood"],
    },
    SeedItem {
        suffix: 19,
        name: "Buttermilk Pancakes",
        description: "Fluffy buttermilk pancakes",
        category: SectionCategory::Breakfast,
        cents_per_person: 1400,
        calories: 285,
        allergens: &["gluten", "dairy", "eggs"],
        dietary_tags: &["breakfast-classic"],
    },
    SeedItem {
        suffix: 20,
        name: "Cajeta Churros",
        description: "Mexican churros with cajeta caramel",
        category: SectionCategory::Breakfast,
        cents_per_person: 1200,
        calories: 245,
        allergens: &["gluten", "dairy"],
        dietary_tags: &["dessert", "mexican"],
    },
    SeedItem {
        suffix: 21,
        name: "Grilled Chicken Breast",
        description: "Herb-seasoned grilled chicken breast",
        category: SectionCategory::BaseProteins,
        cents_per_person: 2000,
        calories: 350,
        allergens: &[],
        dietary_tags: &["lean", "protein"],
    },
    SeedItem {
        suffix: 22,
        name: "Blackened Fish Tacos",
        description: "Spiced fish with fresh slaw",
        category: SectionCategory::BaseProteins,
        cents_per_person: 2600,
        calories: 420,
        allergens: &["fish"],
        dietary_tags: &["mexican"],
    },
    SeedItem {
        suffix: 23,
        name: "BBQ Pulled Pork",
        description: "Slow-cooked BBQ pulled pork",
        category: SectionCategory::BaseProteins,
        cents_per_person: 2400,
        calories: 465,
        allergens: &[],
        dietary_tags: &["bbq"],
    },
    SeedItem {
        suffix: 24,
        name: "Vegetarian Black Bean Burger",
        description: "Plant-based protein burger",
        category: SectionCategory::BaseProteins,
        cents_per_person: 1800,
        calories: 285,
        allergens: &[],
        dietary_tags: &["vegetarian", "plant-based"],
    },
    SeedItem {
        suffix: 25,
        name: "Wild Rice Pilaf",
        description: "Nutty wild rice with herbs",
        category: SectionCategory::BaseStarches,
        cents_per_person: 1100,
        calories: 195,
        allergens: &[],
        dietary_tags: &["gluten-free", "whole-grain"],
    },
    SeedItem {
        suffix: 26,
        name: "Garlic Mashed Potatoes",
        description: "Creamy garlic mashed potatoes",
        category: SectionCategory::BaseStarches,
        cents_per_person: 900,
        calories: 220,
        allergens: &["dairy"],
        dietary_tags: &["comfort-food"],
    },
    SeedItem {
        suffix: 27,
        name: "Quinoa Tabbouleh",
        description: "Mediterranean quinoa salad",
        category: SectionCategory::BaseStarches,
        cents_per_person: 1300,
        calories: 185,
        allergens: &[],
        dietary_tags: &["gluten-free", "vegan"],
    },
    SeedItem {
        suffix: 28,
        name: "Cilantro Lime Rice",
        description: "Fresh cilantro and lime jasmine rice",
        category: SectionCategory::BaseStarches,
        cents_per_person: 1100,
        calories: 200,
        allergens: &[],
        dietary_tags: &["vegan", "fresh"],
    },
    SeedItem {
        suffix: 29,
        name: "Coconut Rice",
        description: "Fragrant coconut jasmine rice",
        category: SectionCategory::BaseStarches,
        cents_per_person: 1200,
        calories: 235,
        allergens: &[],
        dietary_tags: &["tropical", "vegan"],
    },
    SeedItem {
        suffix: 30,
        name: "Mediterranean Orzo",
        description: "Orzo pasta with Mediterranean herbs",
        category: SectionCategory::BaseStarches,
        cents_per_person: 1300,
        calories: 210,
        allergens: &["gluten"],
        dietary_tags: &["mediterranean"],
    },
    SeedItem {
        suffix: 31,
        name: "Artisan Bread Rolls",
        description: "Fresh baked artisan bread rolls",
        category: SectionCategory::BaseStarches,
        cents_per_person: 800,
        calories: 155,
        allergens: &["gluten"],
        dietary_tags: &["artisan"],
    },
    SeedItem {
        suffix: 32,
        name: "Herb Roasted Vegetables",
        description: "Seasonal roasted vegetables with herbs",
        category: SectionCategory::BaseSides,
        cents_per_person: 1500,
        calories: 110,
        allergens: &[],
        dietary_tags: &["vegan", "seasonal"],
    },
    SeedItem {
        suffix: 33,
        name: "Caesar Salad",
        description: "Classic Caesar salad with croutons",
        category: SectionCategory::BaseSides,
        cents_per_person: 1200,
        calories: 185,
        allergens: &["dairy", "anchovies"],
        dietary_tags: &["classic"],
    },
    SeedItem {
        suffix: 34,
        name: "Greek Salad",
        description: "Traditional Greek salad with feta",
        category: SectionCategory::BaseSides,
        cents_per_person: 1400,
        calories: 165,
        allergens: &["dairy"],
        dietary_tags: &["mediterranean"],
    },
    SeedItem {
        suffix: 35,
        name: "Grilled Asparagus",
        description: "Simply grilled asparagus spears",
        category: SectionCategory::BaseSides,
        cents_per_person: 1800,
        calories: 95,
        allergens: &[],
        dietary_tags: &["vegan", "spring"],
    },
    SeedItem {
        suffix: 36,
        name: "Sweet Potato Fries",
        description: "Crispy sweet potato fries",
        category: SectionCategory::BaseSides,
        cents_per_person: 1400,
        calories: 180,
        allergens: &[],
        dietary_tags: &["vegan"],
    },
    SeedItem {
        suffix: 37,
        name: "Grilled Vegetable Medley",
        description: "Seasonal grilled vegetables",
        category: SectionCategory::BaseSides,
        cents_per_person: 1500,
        calories: 105,
        allergens: &[],
        dietary_tags: &["vegan", "grilled"],
    },
    SeedItem {
        suffix: 38,
        name: "Truffle Mac and Cheese",
        description: "Gourmet mac and cheese with truffle oil",
        category: SectionCategory::PremiumSignature,
        cents_per_person: 2800,
        calories: 485,
        allergens: &["gluten", "dairy"],
        dietary_tags: &["premium", "truffle"],
    },
];

pub(super) fn standard_menu_items() -> impl Iterator<Item = MenuItem> {
    STANDARD_MENU_ITEMS.iter().map(|seed| {
        let per_person = Decimal::new(seed.cents_per_person, 2);
        MenuItem {
            id: MenuItemId(format!("770e8400-e29b-41d4-a716-4466554400{:02}", seed.suffix)),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            section_category: seed.category,
            price_per_person: per_person,
            price_half_pan: per_person * Decimal::from(HALF_PAN_SERVINGS),
            price_full_pan: per_person * Decimal::from(FULL_PAN_SERVINGS),
            calories_per_serving: Some(seed.calories),
            allergens: seed.allergens.iter().map(|value| value.to_string()).collect(),
            dietary_tags: seed.dietary_tags.iter().map(|value| value.to_string()).collect(),
            is_active: true,
        }
    })
}
