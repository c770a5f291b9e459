use super::super::domain::{MenuTemplate, TemplateId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::str::FromStr;

pub(crate) fn parse_templates<R: Read>(reader: R) -> Result<Vec<MenuTemplate>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut templates = Vec::new();

    for record in csv_reader.deserialize::<TemplateRow>() {
        let row = record?;
        templates.push(row.into_template());
    }

    Ok(templates)
}

#[derive(Debug, Deserialize)]
struct TemplateRow {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    cuisine_type: String,
    #[serde(deserialize_with = "decimal_from_str")]
    bundle_price: Decimal,
    serves_count: u32,
    #[serde(default, deserialize_with = "flexible_bool")]
    is_active: Option<bool>,
}

impl TemplateRow {
    fn into_template(self) -> MenuTemplate {
        MenuTemplate {
            id: TemplateId(self.id),
            name: self.name,
            description: self.description,
            cuisine_type: self.cuisine_type,
            bundle_price: self.bundle_price,
            serves_count: self.serves_count,
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn decimal_from_str<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    Decimal::from_str(&cleaned).map_err(|err| {
        serde::de::Error::custom(format!("invalid bundle_price '{raw}' ({err})"))
    })
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" => Ok(Some(true)),
            "false" | "f" | "no" | "n" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean for is_active, got '{other}'"
            ))),
        },
    }
}
