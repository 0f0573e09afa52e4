use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::Item;

/// Currency symbol used until the user picks one.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Comparison target used until the user picks one.
pub const DEFAULT_TARGET_GRAMS: f64 = 30.0;

/// User preferences stored next to the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Grams of protein the headline cost is expressed for.
    #[serde(default = "default_target_grams", alias = "comparisonTarget")]
    pub target_grams: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_target_grams() -> f64 {
    DEFAULT_TARGET_GRAMS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            target_grams: default_target_grams(),
            extra: Map::new(),
        }
    }
}

/// Everything that gets persisted: the items and the settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogState {
    #[serde(default)]
    pub items: Vec<Item>,

    #[serde(default)]
    pub settings: Settings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_use_defaults() {
        let state: CatalogState = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert_eq!(state.settings, Settings::default());
        assert_eq!(state.settings.currency_symbol, "$");
        assert_eq!(state.settings.target_grams, 30.0);
    }

    #[test]
    fn test_comparison_target_alias() {
        let settings: Settings =
            serde_json::from_str(r#"{"currencySymbol": "€", "comparisonTarget": 25}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.target_grams, 25.0);
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["currencySymbol"], "$");
        assert_eq!(json["targetGrams"], 30.0);
    }
}
