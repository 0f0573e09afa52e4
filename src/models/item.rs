use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::models::units::{MassUnit, UnitEntry};

/// How an item's price is denominated.
///
/// Amounts stay optional: the catalog keeps half-filled items around and the
/// engine reports what is missing.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceMode {
    /// A total price for a whole package.
    TotalPrice {
        total: Option<f64>,
        package_amount: Option<f64>,
        package_unit: Option<UnitEntry>,
    },
    /// A price per one unit of mass, with an optional known package size.
    UnitPrice {
        price: Option<f64>,
        unit: Option<UnitEntry>,
        package: Option<PackageSize>,
    },
    /// A mode tag this tool does not understand.
    Unrecognized(String),
}

impl PriceMode {
    pub fn total(total: f64, package_amount: f64, package_unit: MassUnit) -> Self {
        PriceMode::TotalPrice {
            total: Some(total),
            package_amount: Some(package_amount),
            package_unit: Some(package_unit.into()),
        }
    }

    pub fn per_unit(price: f64, unit: MassUnit) -> Self {
        PriceMode::UnitPrice {
            price: Some(price),
            unit: Some(unit.into()),
            package: None,
        }
    }

    pub fn per_unit_with_package(
        price: f64,
        unit: MassUnit,
        package_amount: f64,
        package_unit: MassUnit,
    ) -> Self {
        PriceMode::UnitPrice {
            price: Some(price),
            unit: Some(unit.into()),
            package: Some(PackageSize {
                amount: Some(package_amount),
                unit: Some(package_unit.into()),
            }),
        }
    }

    /// The headline price figure: the total, or the unit price.
    pub fn listed_price(&self) -> Option<f64> {
        match self {
            PriceMode::TotalPrice { total, .. } => *total,
            PriceMode::UnitPrice { price, .. } => *price,
            PriceMode::Unrecognized(_) => None,
        }
    }
}

/// Optional package size attached to a unit-priced item.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSize {
    pub amount: Option<f64>,
    pub unit: Option<UnitEntry>,
}

/// How an item's protein content is denominated.
#[derive(Debug, Clone, PartialEq)]
pub enum ProteinBasis {
    /// Grams of protein in 100 g of product.
    Per100g { grams_per_100g: Option<f64> },
    /// Grams of protein in one labeled serving.
    PerServing {
        serving_amount: Option<f64>,
        serving_unit: Option<UnitEntry>,
        protein_per_serving: Option<f64>,
    },
    /// A basis tag this tool does not understand.
    Unrecognized(String),
}

impl ProteinBasis {
    pub fn per_100g(grams_per_100g: f64) -> Self {
        ProteinBasis::Per100g {
            grams_per_100g: Some(grams_per_100g),
        }
    }

    pub fn per_serving(serving_amount: f64, serving_unit: MassUnit, protein: f64) -> Self {
        ProteinBasis::PerServing {
            serving_amount: Some(serving_amount),
            serving_unit: Some(serving_unit.into()),
            protein_per_serving: Some(protein),
        }
    }
}

/// A product in the catalog.
///
/// Persisted as the flat record the web front-ends write; see [`ItemRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub store: Option<String>,
    pub price: PriceMode,
    pub protein: ProteinBasis,
    pub favorite: bool,
    /// Quality rating, 1 to 10.
    pub quality: Option<u8>,
    pub notes: Option<String>,
    /// Fields this tool does not interpret, written back untouched.
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: PriceMode,
        protein: ProteinBasis,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: None,
            store: None,
            price,
            protein,
            favorite: false,
            quality: None,
            notes: None,
            extra: Map::new(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Name with brand in parentheses, for listings.
    pub fn display_name(&self) -> String {
        match self.brand.as_deref() {
            Some(brand) if !brand.is_empty() => format!("{} ({})", self.name, brand),
            _ => self.name.clone(),
        }
    }
}

const PRICE_TOTAL: &str = "priceTotal";
const PACKAGE_AMOUNT: &str = "packageAmount";
const PACKAGE_UNIT: &str = "packageUnit";
const UNIT_PRICE: &str = "unitPrice";
const UNIT_PRICE_UNIT: &str = "unitPriceUnit";
const PACKAGE_AMOUNT_OPTIONAL: &str = "packageAmountOptional";
const PACKAGE_UNIT_OPTIONAL: &str = "packageUnitOptional";
const PROTEIN_PER_100G: &str = "proteinPer100g";
const SERVING_SIZE_AMOUNT: &str = "servingSizeAmount";
const SERVING_SIZE_UNIT: &str = "servingSizeUnit";
const PROTEIN_PER_SERVING: &str = "proteinPerServing";

const TOTAL_PRICE_KEYS: [&str; 3] = [PRICE_TOTAL, PACKAGE_AMOUNT, PACKAGE_UNIT];
const UNIT_PRICE_KEYS: [&str; 4] = [
    UNIT_PRICE,
    UNIT_PRICE_UNIT,
    PACKAGE_AMOUNT_OPTIONAL,
    PACKAGE_UNIT_OPTIONAL,
];
const PER_100G_KEYS: [&str; 1] = [PROTEIN_PER_100G];
const PER_SERVING_KEYS: [&str; 3] = [SERVING_SIZE_AMOUNT, SERVING_SIZE_UNIT, PROTEIN_PER_SERVING];

/// The flat on-disk shape of an item.
///
/// Both price modes and both protein bases share one record, selected by the
/// `priceMode` and `proteinBasis` tags. Decoding is lenient about the empty
/// strings and numeric strings the HTML forms leave behind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_mode: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        serialize_with = "write_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_total: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        serialize_with = "write_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub package_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_unit", skip_serializing_if = "Option::is_none")]
    pub package_unit: Option<UnitEntry>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        serialize_with = "write_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_unit", skip_serializing_if = "Option::is_none")]
    pub unit_price_unit: Option<UnitEntry>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        serialize_with = "write_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub package_amount_optional: Option<f64>,
    #[serde(default, deserialize_with = "lenient_unit", skip_serializing_if = "Option::is_none")]
    pub package_unit_optional: Option<UnitEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_basis: Option<String>,
    #[serde(
        rename = "proteinPer100g",
        default,
        deserialize_with = "lenient_number",
        serialize_with = "write_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub protein_per_100g: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        serialize_with = "write_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub serving_size_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_unit", skip_serializing_if = "Option::is_none")]
    pub serving_size_unit: Option<UnitEntry>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        serialize_with = "write_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub protein_per_serving: Option<f64>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub favorite: bool,
    #[serde(default, deserialize_with = "lenient_rating", skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keep an inactive-variant value as an opaque extra field.
fn stash<T: Serialize>(extra: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        if let Ok(json) = serde_json::to_value(value) {
            extra.insert(key.to_string(), json);
        }
    }
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let mut extra = record.extra;

        let price = match record.price_mode.as_deref() {
            Some("totalPrice") => {
                stash(&mut extra, UNIT_PRICE, record.unit_price);
                stash(&mut extra, UNIT_PRICE_UNIT, record.unit_price_unit);
                stash(&mut extra, PACKAGE_AMOUNT_OPTIONAL, record.package_amount_optional);
                stash(&mut extra, PACKAGE_UNIT_OPTIONAL, record.package_unit_optional);
                PriceMode::TotalPrice {
                    total: record.price_total,
                    package_amount: record.package_amount,
                    package_unit: record.package_unit,
                }
            }
            Some("unitPrice") => {
                stash(&mut extra, PRICE_TOTAL, record.price_total);
                stash(&mut extra, PACKAGE_AMOUNT, record.package_amount);
                stash(&mut extra, PACKAGE_UNIT, record.package_unit);
                let package = if record.package_amount_optional.is_some()
                    || record.package_unit_optional.is_some()
                {
                    Some(PackageSize {
                        amount: record.package_amount_optional,
                        unit: record.package_unit_optional,
                    })
                } else {
                    None
                };
                PriceMode::UnitPrice {
                    price: record.unit_price,
                    unit: record.unit_price_unit,
                    package,
                }
            }
            other => {
                stash(&mut extra, PRICE_TOTAL, record.price_total);
                stash(&mut extra, PACKAGE_AMOUNT, record.package_amount);
                stash(&mut extra, PACKAGE_UNIT, record.package_unit);
                stash(&mut extra, UNIT_PRICE, record.unit_price);
                stash(&mut extra, UNIT_PRICE_UNIT, record.unit_price_unit);
                stash(&mut extra, PACKAGE_AMOUNT_OPTIONAL, record.package_amount_optional);
                stash(&mut extra, PACKAGE_UNIT_OPTIONAL, record.package_unit_optional);
                PriceMode::Unrecognized(other.unwrap_or_default().to_string())
            }
        };

        let protein = match record.protein_basis.as_deref() {
            Some("per100g") => {
                stash(&mut extra, SERVING_SIZE_AMOUNT, record.serving_size_amount);
                stash(&mut extra, SERVING_SIZE_UNIT, record.serving_size_unit);
                stash(&mut extra, PROTEIN_PER_SERVING, record.protein_per_serving);
                ProteinBasis::Per100g {
                    grams_per_100g: record.protein_per_100g,
                }
            }
            Some("perServing") => {
                stash(&mut extra, PROTEIN_PER_100G, record.protein_per_100g);
                ProteinBasis::PerServing {
                    serving_amount: record.serving_size_amount,
                    serving_unit: record.serving_size_unit,
                    protein_per_serving: record.protein_per_serving,
                }
            }
            other => {
                stash(&mut extra, PROTEIN_PER_100G, record.protein_per_100g);
                stash(&mut extra, SERVING_SIZE_AMOUNT, record.serving_size_amount);
                stash(&mut extra, SERVING_SIZE_UNIT, record.serving_size_unit);
                stash(&mut extra, PROTEIN_PER_SERVING, record.protein_per_serving);
                ProteinBasis::Unrecognized(other.unwrap_or_default().to_string())
            }
        };

        Item {
            id: record.id,
            name: record.name,
            brand: record.brand,
            store: record.store,
            price,
            protein,
            favorite: record.favorite,
            quality: record.quality,
            notes: record.notes,
            extra,
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        let mut record = ItemRecord {
            id: item.id,
            name: item.name,
            brand: item.brand,
            store: item.store,
            favorite: item.favorite,
            quality: item.quality,
            notes: item.notes,
            extra: item.extra,
            ..ItemRecord::default()
        };

        match item.price {
            PriceMode::TotalPrice {
                total,
                package_amount,
                package_unit,
            } => {
                record.price_mode = Some("totalPrice".to_string());
                record.price_total = total;
                record.package_amount = package_amount;
                record.package_unit = package_unit;
                for key in TOTAL_PRICE_KEYS {
                    record.extra.remove(key);
                }
            }
            PriceMode::UnitPrice {
                price,
                unit,
                package,
            } => {
                record.price_mode = Some("unitPrice".to_string());
                record.unit_price = price;
                record.unit_price_unit = unit;
                if let Some(package) = package {
                    record.package_amount_optional = package.amount;
                    record.package_unit_optional = package.unit;
                }
                for key in UNIT_PRICE_KEYS {
                    record.extra.remove(key);
                }
            }
            PriceMode::Unrecognized(tag) => {
                record.price_mode = (!tag.is_empty()).then_some(tag);
            }
        }

        match item.protein {
            ProteinBasis::Per100g { grams_per_100g } => {
                record.protein_basis = Some("per100g".to_string());
                record.protein_per_100g = grams_per_100g;
                for key in PER_100G_KEYS {
                    record.extra.remove(key);
                }
            }
            ProteinBasis::PerServing {
                serving_amount,
                serving_unit,
                protein_per_serving,
            } => {
                record.protein_basis = Some("perServing".to_string());
                record.serving_size_amount = serving_amount;
                record.serving_size_unit = serving_unit;
                record.protein_per_serving = protein_per_serving;
                for key in PER_SERVING_KEYS {
                    record.extra.remove(key);
                }
            }
            ProteinBasis::Unrecognized(tag) => {
                record.protein_basis = (!tag.is_empty()).then_some(tag);
            }
        }

        record
    }
}

/// Numbers, numeric strings, or blanks. Anything else becomes NaN so the
/// engine reports it as not a positive number.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.parse().unwrap_or(f64::NAN))
            }
        }
        Some(_) => Some(f64::NAN),
    })
}

/// Non-finite values are written as text so they load back as non-numeric
/// instead of as blanks.
fn write_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) if !v.is_finite() => serializer.serialize_str(&v.to_string()),
        _ => value.serialize(serializer),
    }
}

fn lenient_unit<'de, D>(deserializer: D) -> Result<Option<UnitEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => UnitEntry::parse(&s),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|q| q.is_finite() && *q >= 0.0 && *q <= u8::MAX as f64)
            .map(|q| q.round() as u8),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
