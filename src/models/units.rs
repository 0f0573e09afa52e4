use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grams in one kilogram.
pub const GRAMS_PER_KG: f64 = 1000.0;

/// Grams in one avoirdupois ounce.
pub const GRAMS_PER_OZ: f64 = 28.3495;

/// Grams in one avoirdupois pound.
pub const GRAMS_PER_LB: f64 = 453.592;

/// A mass unit a price or a protein amount can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MassUnit {
    #[serde(rename = "g", alias = "gram", alias = "grams")]
    Gram,
    #[serde(rename = "kg", alias = "kilogram", alias = "kilograms")]
    Kilogram,
    #[serde(rename = "oz", alias = "ounce", alias = "ounces")]
    Ounce,
    #[serde(rename = "lb", alias = "pound", alias = "pounds", alias = "lbs")]
    Pound,
}

impl MassUnit {
    /// Every unit, in the order the prompts offer them.
    pub const ALL: [MassUnit; 4] = [
        MassUnit::Gram,
        MassUnit::Kilogram,
        MassUnit::Ounce,
        MassUnit::Pound,
    ];

    /// Grams in one of this unit.
    #[inline]
    pub fn grams_per_unit(self) -> f64 {
        match self {
            MassUnit::Gram => 1.0,
            MassUnit::Kilogram => GRAMS_PER_KG,
            MassUnit::Ounce => GRAMS_PER_OZ,
            MassUnit::Pound => GRAMS_PER_LB,
        }
    }

    /// Short symbol used in storage and display.
    pub fn symbol(self) -> &'static str {
        match self {
            MassUnit::Gram => "g",
            MassUnit::Kilogram => "kg",
            MassUnit::Ounce => "oz",
            MassUnit::Pound => "lb",
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for MassUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(MassUnit::Gram),
            "kg" | "kilogram" | "kilograms" => Ok(MassUnit::Kilogram),
            "oz" | "ounce" | "ounces" => Ok(MassUnit::Ounce),
            "lb" | "lbs" | "pound" | "pounds" => Ok(MassUnit::Pound),
            other => Err(other.to_string()),
        }
    }
}

/// A unit as it was stored on an item record.
///
/// Records written by older front-ends may carry unit strings this tool does
/// not know; those are kept verbatim so the engine can report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitEntry {
    Known(MassUnit),
    Unrecognized(String),
}

impl UnitEntry {
    /// The known unit, if this entry names one.
    pub fn known(&self) -> Option<MassUnit> {
        match self {
            UnitEntry::Known(unit) => Some(*unit),
            UnitEntry::Unrecognized(_) => None,
        }
    }

    /// Parse a raw unit string. Empty input means "no unit".
    pub fn parse(raw: &str) -> Option<UnitEntry> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.parse::<MassUnit>() {
            Ok(unit) => UnitEntry::Known(unit),
            Err(_) => UnitEntry::Unrecognized(trimmed.to_string()),
        })
    }
}

impl From<MassUnit> for UnitEntry {
    fn from(unit: MassUnit) -> Self {
        UnitEntry::Known(unit)
    }
}

impl fmt::Display for UnitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitEntry::Known(unit) => unit.fmt(f),
            UnitEntry::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grams_per_unit_table() {
        assert_eq!(MassUnit::Gram.grams_per_unit(), 1.0);
        assert_eq!(MassUnit::Kilogram.grams_per_unit(), 1000.0);
        assert_eq!(MassUnit::Ounce.grams_per_unit(), 28.3495);
        assert_eq!(MassUnit::Pound.grams_per_unit(), 453.592);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("LB".parse::<MassUnit>(), Ok(MassUnit::Pound));
        assert_eq!("ounces".parse::<MassUnit>(), Ok(MassUnit::Ounce));
        assert!("cup".parse::<MassUnit>().is_err());
    }

    #[test]
    fn test_unit_entry_parse() {
        assert_eq!(UnitEntry::parse(""), None);
        assert_eq!(UnitEntry::parse(" kg "), Some(UnitEntry::Known(MassUnit::Kilogram)));
        assert_eq!(
            UnitEntry::parse("cup"),
            Some(UnitEntry::Unrecognized("cup".to_string()))
        );
    }

    #[test]
    fn test_unit_entry_serde_keeps_unknown_strings() {
        let known: UnitEntry = serde_json::from_str("\"oz\"").unwrap();
        assert_eq!(known, UnitEntry::Known(MassUnit::Ounce));

        let unknown: UnitEntry = serde_json::from_str("\"stone\"").unwrap();
        assert_eq!(unknown, UnitEntry::Unrecognized("stone".to_string()));
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"stone\"");
    }
}
