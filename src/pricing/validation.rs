use std::fmt;

use crate::models::{Item, PriceMode, ProteinBasis, UnitEntry};
use crate::pricing::calculations::{positive, Field};

/// One problem with one field of an item being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// `None` for problems with a variant tag rather than a field.
    pub field: Option<Field>,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn check_number(errors: &mut Vec<FieldError>, value: Option<f64>, field: Field) {
    if positive(value).is_none() {
        errors.push(FieldError::new(
            field,
            format!("{} must be a positive number", field),
        ));
    }
}

fn check_unit(errors: &mut Vec<FieldError>, unit: Option<&UnitEntry>, field: Field) {
    match unit {
        None => errors.push(FieldError::new(field, format!("{} is required", field))),
        Some(UnitEntry::Unrecognized(raw)) => errors.push(FieldError::new(
            field,
            format!("{} '{}' is not a recognized mass unit", field, raw),
        )),
        Some(UnitEntry::Known(_)) => {}
    }
}

/// Check every field of an item the way the edit form does.
///
/// Unlike the cost engine this collects all problems, not just the first.
/// An empty result means the item can be saved.
pub fn validate_item(item: &Item) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if item.name.trim().is_empty() {
        errors.push(FieldError::new(Field::Name, "Name is required"));
    }

    match &item.price {
        PriceMode::TotalPrice {
            total,
            package_amount,
            package_unit,
        } => {
            check_number(&mut errors, *total, Field::TotalPrice);
            check_number(&mut errors, *package_amount, Field::PackageAmount);
            check_unit(&mut errors, package_unit.as_ref(), Field::PackageUnit);
        }
        PriceMode::UnitPrice {
            price,
            unit,
            package,
        } => {
            check_number(&mut errors, *price, Field::UnitPrice);
            check_unit(&mut errors, unit.as_ref(), Field::UnitPriceUnit);
            // Optional, but all or nothing.
            if let Some(package) = package {
                if package.amount.is_some() || package.unit.is_some() {
                    check_number(&mut errors, package.amount, Field::OptionalPackageAmount);
                    check_unit(&mut errors, package.unit.as_ref(), Field::OptionalPackageUnit);
                }
            }
        }
        PriceMode::Unrecognized(_) => errors.push(FieldError {
            field: None,
            message: "Invalid price mode".to_string(),
        }),
    }

    match &item.protein {
        ProteinBasis::Per100g { grams_per_100g } => {
            check_number(&mut errors, *grams_per_100g, Field::ProteinPer100g);
        }
        ProteinBasis::PerServing {
            serving_amount,
            serving_unit,
            protein_per_serving,
        } => {
            check_number(&mut errors, *serving_amount, Field::ServingSizeAmount);
            check_unit(&mut errors, serving_unit.as_ref(), Field::ServingSizeUnit);
            check_number(&mut errors, *protein_per_serving, Field::ProteinPerServing);
        }
        ProteinBasis::Unrecognized(_) => errors.push(FieldError {
            field: None,
            message: "Invalid protein basis".to_string(),
        }),
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MassUnit, PackageSize};

    #[test]
    fn test_valid_item_has_no_errors() {
        let item = Item::new(
            "1",
            "Whey",
            PriceMode::total(39.99, 5.0, MassUnit::Pound),
            ProteinBasis::per_serving(32.0, MassUnit::Gram, 25.0),
        );
        assert!(validate_item(&item).is_empty());
    }

    #[test]
    fn test_collects_every_error() {
        let item = Item::new(
            "1",
            "  ",
            PriceMode::TotalPrice {
                total: Some(-1.0),
                package_amount: None,
                package_unit: None,
            },
            ProteinBasis::Per100g {
                grams_per_100g: Some(0.0),
            },
        );

        let errors = validate_item(&item);
        let fields: Vec<Option<Field>> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                Some(Field::Name),
                Some(Field::TotalPrice),
                Some(Field::PackageAmount),
                Some(Field::PackageUnit),
                Some(Field::ProteinPer100g),
            ]
        );
        assert_eq!(errors[1].message, "Total price must be a positive number");
    }

    #[test]
    fn test_partial_optional_package() {
        let item = Item::new(
            "1",
            "Chicken",
            PriceMode::UnitPrice {
                price: Some(2.49),
                unit: Some(MassUnit::Pound.into()),
                package: Some(PackageSize {
                    amount: Some(3.0),
                    unit: None,
                }),
            },
            ProteinBasis::per_100g(31.0),
        );

        let errors = validate_item(&item);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Some(Field::OptionalPackageUnit));
        assert_eq!(errors[0].message, "Package unit is required");
    }
}
