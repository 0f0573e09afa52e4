use std::cmp::Ordering;

use clap::ValueEnum;

use crate::models::{Item, Settings};
use crate::pricing::calculations::{derive, DerivedCost};

/// Column a catalog listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    /// Cost of the comparison target amount of protein.
    #[default]
    #[value(name = "target")]
    CostPerTarget,
    /// Cost of one gram of protein.
    #[value(name = "per-gram")]
    CostPerGram,
    /// Price of one gram of product.
    #[value(name = "effective")]
    PriceEffective,
    /// The listed total or unit price.
    Price,
    Name,
    Brand,
    Store,
    Quality,
}

impl SortKey {
    /// Column heading, e.g. "$/30g".
    pub fn label(self, settings: &Settings) -> String {
        let currency = &settings.currency_symbol;
        match self {
            SortKey::CostPerTarget => format!("{}/{}g", currency, settings.target_grams),
            SortKey::CostPerGram => format!("{}/g protein", currency),
            SortKey::PriceEffective => format!("{}/g product", currency),
            SortKey::Price => "Price".to_string(),
            SortKey::Name => "Name".to_string(),
            SortKey::Brand => "Brand".to_string(),
            SortKey::Store => "Store".to_string(),
            SortKey::Quality => "Quality".to_string(),
        }
    }

    /// Whether this key reads a figure from the cost engine.
    fn uses_engine(self) -> bool {
        matches!(
            self,
            SortKey::CostPerTarget | SortKey::CostPerGram | SortKey::PriceEffective
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Which items a listing shows.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Case-insensitive substring of name, brand or store.
    pub query: Option<String>,
    pub favorites_only: bool,
}

impl Filters {
    pub fn matches(&self, item: &Item) -> bool {
        if self.favorites_only && !item.favorite {
            return false;
        }

        let query = match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };

        [Some(&item.name), item.brand.as_ref(), item.store.as_ref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Items passing the filters, in catalog order.
pub fn filter_items<'a>(items: &'a [Item], filters: &Filters) -> Vec<&'a Item> {
    items.iter().filter(|item| filters.matches(item)).collect()
}

/// An item paired with its derived cost.
#[derive(Debug, Clone)]
pub struct RankedItem<'a> {
    pub item: &'a Item,
    pub cost: DerivedCost,
}

/// Compare two optional values, keeping `None` last in either direction.
fn missing_last<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => direction.apply(cmp(&a, &b)),
    }
}

fn text_key(value: Option<&String>) -> String {
    value.map(|v| v.to_lowercase()).unwrap_or_default()
}

fn compare(a: &RankedItem, b: &RankedItem, key: SortKey, direction: SortDirection) -> Ordering {
    if key.uses_engine() {
        // Invalid items sink regardless of direction.
        let metric = |r: &RankedItem| -> Option<f64> {
            if !r.cost.valid {
                return None;
            }
            match key {
                SortKey::CostPerTarget => r.cost.cost_per_target_grams,
                SortKey::CostPerGram => r.cost.cost_per_gram_protein,
                _ => r.cost.price_per_gram_product,
            }
        };
        return missing_last(metric(a), metric(b), direction, f64::total_cmp);
    }

    match key {
        SortKey::Price => missing_last(
            a.item.price.listed_price(),
            b.item.price.listed_price(),
            direction,
            f64::total_cmp,
        ),
        SortKey::Quality => missing_last(a.item.quality, b.item.quality, direction, u8::cmp),
        SortKey::Name => direction.apply(a.item.name.to_lowercase().cmp(&b.item.name.to_lowercase())),
        SortKey::Brand => direction.apply(
            text_key(a.item.brand.as_ref()).cmp(&text_key(b.item.brand.as_ref())),
        ),
        SortKey::Store => direction.apply(
            text_key(a.item.store.as_ref()).cmp(&text_key(b.item.store.as_ref())),
        ),
        _ => Ordering::Equal,
    }
}

/// Derive every item's cost and order them. The sort is stable.
pub fn rank_items<'a, I>(
    items: I,
    key: SortKey,
    direction: SortDirection,
    target_grams: f64,
) -> Vec<RankedItem<'a>>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut ranked: Vec<RankedItem<'a>> = items
        .into_iter()
        .map(|item| RankedItem {
            item,
            cost: derive(item, target_grams),
        })
        .collect();

    ranked.sort_by(|a, b| compare(a, b, key, direction));
    ranked
}
