use std::fmt;

use thiserror::Error;

use crate::models::{Item, PriceMode, ProteinBasis, UnitEntry};
use crate::pricing::constants::*;

/// Why a mass could not be normalized to grams.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("amount is missing")]
    MissingAmount,

    #[error("amount must be a positive number")]
    NonPositiveAmount,

    #[error("unit is missing")]
    MissingUnit,

    #[error("'{0}' is not a recognized mass unit")]
    UnrecognizedUnit(String),
}

/// An input field the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    TotalPrice,
    PackageAmount,
    PackageUnit,
    UnitPrice,
    UnitPriceUnit,
    OptionalPackageAmount,
    OptionalPackageUnit,
    ProteinPer100g,
    ServingSizeAmount,
    ServingSizeUnit,
    ProteinPerServing,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::TotalPrice => "Total price",
            Field::PackageAmount | Field::OptionalPackageAmount => "Package amount",
            Field::PackageUnit | Field::OptionalPackageUnit => "Package unit",
            Field::UnitPrice => "Unit price",
            Field::UnitPriceUnit => "Unit price unit",
            Field::ProteinPer100g => "Protein per 100g",
            Field::ServingSizeAmount => "Serving size amount",
            Field::ServingSizeUnit => "Serving size unit",
            Field::ProteinPerServing => "Protein per serving",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The first precondition an item failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcIssue {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("{0} must be positive")]
    NonPositive(Field),

    #[error("{0} '{1}' is not a recognized mass unit")]
    UnrecognizedUnit(Field, String),

    #[error("Serving size must convert to a positive amount in grams")]
    ServingNotConvertible,

    #[error("Invalid {0}")]
    InvalidVariant(&'static str),
}

impl CalcIssue {
    /// Attribute a unit conversion failure to the fields it came from.
    fn from_unit_error(err: UnitError, amount: Field, unit: Field) -> Self {
        match err {
            UnitError::MissingAmount => CalcIssue::MissingField(amount),
            UnitError::NonPositiveAmount => CalcIssue::NonPositive(amount),
            UnitError::MissingUnit => CalcIssue::MissingField(unit),
            UnitError::UnrecognizedUnit(raw) => CalcIssue::UnrecognizedUnit(unit, raw),
        }
    }
}

/// Advisory notes that do not make an item invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostWarning {
    /// The whole package holds less than a gram of protein.
    LowProteinContent,
}

impl fmt::Display for CostWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostWarning::LowProteinContent => f.write_str(LOW_PROTEIN_MESSAGE),
        }
    }
}

/// Normalized cost figures for one item.
///
/// Metrics are `None` rather than zero when they cannot be derived, so an
/// incomplete item never looks free.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedCost {
    pub valid: bool,
    pub issue: Option<CalcIssue>,
    pub cost_per_gram_protein: Option<f64>,
    pub cost_per_target_grams: Option<f64>,
    /// Price of one gram of product (not protein).
    pub price_per_gram_product: Option<f64>,
    pub grams_protein_per_gram_product: Option<f64>,
    /// Package mass, when the item states one.
    pub grams_total: Option<f64>,
    pub grams_protein_total: Option<f64>,
    pub warnings: Vec<CostWarning>,
}

impl DerivedCost {
    /// Human-readable description of the first failed precondition.
    pub fn reason(&self) -> Option<String> {
        self.issue.as_ref().map(ToString::to_string)
    }
}

/// Keep a value only if it is a positive number. NaN fails.
#[inline]
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Grams in one of the given unit.
pub fn grams_per_unit(unit: Option<&UnitEntry>) -> Result<f64, UnitError> {
    match unit {
        None => Err(UnitError::MissingUnit),
        Some(UnitEntry::Known(unit)) => Ok(unit.grams_per_unit()),
        Some(UnitEntry::Unrecognized(raw)) => Err(UnitError::UnrecognizedUnit(raw.clone())),
    }
}

/// Convert an amount in the given unit to grams.
///
/// Every conversion in the crate goes through here so all callers agree on
/// the constants.
pub fn convert_to_grams(amount: Option<f64>, unit: Option<&UnitEntry>) -> Result<f64, UnitError> {
    let amount = amount.ok_or(UnitError::MissingAmount)?;
    let amount = positive(Some(amount)).ok_or(UnitError::NonPositiveAmount)?;
    Ok(amount * grams_per_unit(unit)?)
}

/// Require a positive number in `field`.
fn require_positive(value: Option<f64>, field: Field) -> Result<f64, CalcIssue> {
    match value {
        None => Err(CalcIssue::MissingField(field)),
        Some(v) => positive(Some(v)).ok_or(CalcIssue::NonPositive(field)),
    }
}

/// Derive the cost metrics of an item for a protein target.
///
/// Never fails: an incomplete item comes back with `valid == false` and the
/// first failed precondition in `issue`. `target_grams` is taken as given.
pub fn derive(item: &Item, target_grams: f64) -> DerivedCost {
    let mut derived = DerivedCost::default();

    match resolve(item, target_grams, &mut derived) {
        Ok(()) => derived.valid = true,
        Err(issue) => {
            derived.valid = false;
            derived.issue = Some(issue);
            derived.cost_per_gram_protein = None;
            derived.cost_per_target_grams = None;
            derived.price_per_gram_product = None;
            derived.grams_protein_per_gram_product = None;
        }
    }

    derived
}

fn resolve(item: &Item, target_grams: f64, out: &mut DerivedCost) -> Result<(), CalcIssue> {
    // Step 1: package mass. Required for a total price, optional otherwise.
    out.grams_total = match &item.price {
        PriceMode::TotalPrice {
            package_amount,
            package_unit,
            ..
        } => Some(
            convert_to_grams(*package_amount, package_unit.as_ref()).map_err(|e| {
                CalcIssue::from_unit_error(e, Field::PackageAmount, Field::PackageUnit)
            })?,
        ),
        PriceMode::UnitPrice {
            package: Some(package),
            ..
        } => match (package.amount, package.unit.as_ref()) {
            (Some(amount), Some(unit)) => convert_to_grams(Some(amount), Some(unit)).ok(),
            _ => None,
        },
        PriceMode::UnitPrice { package: None, .. } => None,
        PriceMode::Unrecognized(_) => return Err(CalcIssue::InvalidVariant("price mode")),
    };

    // Step 2: protein per gram of product.
    let density = match &item.protein {
        ProteinBasis::Per100g { grams_per_100g } => {
            require_positive(*grams_per_100g, Field::ProteinPer100g)? / PROTEIN_BASIS_GRAMS
        }
        ProteinBasis::PerServing {
            serving_amount,
            serving_unit,
            protein_per_serving,
        } => {
            let serving_grams =
                convert_to_grams(*serving_amount, serving_unit.as_ref()).map_err(|e| match e {
                    UnitError::MissingAmount | UnitError::NonPositiveAmount => {
                        CalcIssue::ServingNotConvertible
                    }
                    other => {
                        CalcIssue::from_unit_error(other, Field::ServingSizeAmount, Field::ServingSizeUnit)
                    }
                })?;
            require_positive(*protein_per_serving, Field::ProteinPerServing)? / serving_grams
        }
        ProteinBasis::Unrecognized(_) => return Err(CalcIssue::InvalidVariant("protein basis")),
    };
    out.grams_protein_per_gram_product = Some(density);

    if let Some(grams_total) = out.grams_total {
        let protein_total = grams_total * density;
        out.grams_protein_total = Some(protein_total);
        if protein_total < LOW_PROTEIN_THRESHOLD_GRAMS {
            out.warnings.push(CostWarning::LowProteinContent);
        }
    }

    // Step 3: cost per gram of protein.
    let cost_per_gram = match &item.price {
        PriceMode::TotalPrice { total, .. } => {
            let total = require_positive(*total, Field::TotalPrice)?;
            // Both are set in this mode once steps 1 and 2 succeeded.
            let (Some(grams_total), Some(protein_total)) =
                (out.grams_total, out.grams_protein_total)
            else {
                return Err(CalcIssue::MissingField(Field::PackageAmount));
            };
            out.price_per_gram_product = Some(total / grams_total);
            total / protein_total
        }
        PriceMode::UnitPrice { price, unit, .. } => {
            let price = require_positive(*price, Field::UnitPrice)?;
            let grams_per = grams_per_unit(unit.as_ref()).map_err(|e| {
                CalcIssue::from_unit_error(e, Field::UnitPrice, Field::UnitPriceUnit)
            })?;
            let price_per_gram = price / grams_per;
            out.price_per_gram_product = Some(price_per_gram);
            price_per_gram / density
        }
        PriceMode::Unrecognized(_) => return Err(CalcIssue::InvalidVariant("price mode")),
    };

    // Step 4: scale to the comparison target.
    out.cost_per_gram_protein = Some(cost_per_gram);
    out.cost_per_target_grams = Some(cost_per_gram * target_grams);

    Ok(())
}
