use assert_float_eq::*;

use protein_price_rs::models::{
    Item, MassUnit, PackageSize, PriceMode, ProteinBasis, UnitEntry, GRAMS_PER_LB, GRAMS_PER_OZ,
};
use protein_price_rs::pricing::{
    convert_to_grams, derive, CalcIssue, CostWarning, Field, UnitError,
};

fn item(price: PriceMode, protein: ProteinBasis) -> Item {
    Item::new("test", "Test item", price, protein)
}

fn unit(u: MassUnit) -> Option<UnitEntry> {
    Some(u.into())
}

#[test]
fn test_unit_constants() {
    let expected = [
        (MassUnit::Gram, 1.0),
        (MassUnit::Kilogram, 1000.0),
        (MassUnit::Ounce, 28.3495),
        (MassUnit::Pound, 453.592),
    ];

    for (u, grams) in expected {
        let converted = convert_to_grams(Some(1.0), unit(u).as_ref()).unwrap();
        assert_float_absolute_eq!(converted, grams, 1e-9);
    }
}

#[test]
fn test_conversion_is_linear() {
    for u in MassUnit::ALL {
        let one = convert_to_grams(Some(1.0), unit(u).as_ref()).unwrap();
        for k in [0.25, 1.5, 3.0, 32.0, 1234.5] {
            let scaled = convert_to_grams(Some(k), unit(u).as_ref()).unwrap();
            assert!((scaled - k * one).abs() < 1e-9 * scaled.max(1.0));
        }
    }
}

#[test]
fn test_invalid_amounts_and_units() {
    let lb = unit(MassUnit::Pound);
    assert_eq!(convert_to_grams(None, lb.as_ref()), Err(UnitError::MissingAmount));
    assert_eq!(
        convert_to_grams(Some(0.0), lb.as_ref()),
        Err(UnitError::NonPositiveAmount)
    );
    assert_eq!(
        convert_to_grams(Some(-2.0), lb.as_ref()),
        Err(UnitError::NonPositiveAmount)
    );
    assert_eq!(
        convert_to_grams(Some(f64::NAN), lb.as_ref()),
        Err(UnitError::NonPositiveAmount)
    );

    let stone = UnitEntry::parse("stone");
    assert!(matches!(
        convert_to_grams(Some(1.0), stone.as_ref()),
        Err(UnitError::UnrecognizedUnit(_))
    ));
    assert_eq!(convert_to_grams(Some(1.0), None), Err(UnitError::MissingUnit));

    // A bad amount is reported even when the unit is bad too.
    assert_eq!(
        convert_to_grams(Some(0.0), stone.as_ref()),
        Err(UnitError::NonPositiveAmount)
    );
}

#[test]
fn test_total_price_per_100g() {
    let yogurt = item(
        PriceMode::total(5.49, 32.0, MassUnit::Ounce),
        ProteinBasis::per_100g(10.0),
    );
    let cost = derive(&yogurt, 30.0);

    assert!(cost.valid);
    assert!(cost.issue.is_none());
    assert_float_absolute_eq!(cost.grams_total.unwrap(), 32.0 * GRAMS_PER_OZ, 1e-9);
    assert_float_absolute_eq!(cost.grams_protein_total.unwrap(), 90.7184, 1e-3);
    assert_float_absolute_eq!(cost.cost_per_gram_protein.unwrap(), 0.06053, 1e-5);
    assert_float_absolute_eq!(cost.cost_per_target_grams.unwrap(), 1.816, 1e-3);
    assert!(cost.warnings.is_empty());
}

#[test]
fn test_unit_price_per_100g() {
    let chicken = item(
        PriceMode::per_unit(2.49, MassUnit::Pound),
        ProteinBasis::per_100g(31.0),
    );
    let cost = derive(&chicken, 30.0);

    assert!(cost.valid);
    assert_float_absolute_eq!(cost.price_per_gram_product.unwrap(), 0.005491, 1e-6);
    assert_float_absolute_eq!(cost.cost_per_gram_protein.unwrap(), 0.017712, 1e-6);
    assert_float_absolute_eq!(cost.cost_per_target_grams.unwrap(), 0.5314, 1e-4);

    // No package size, so no package totals.
    assert!(cost.grams_total.is_none());
    assert!(cost.grams_protein_total.is_none());
    assert!(cost.warnings.is_empty());
}

#[test]
fn test_total_price_per_serving() {
    let whey = item(
        PriceMode::total(39.99, 5.0, MassUnit::Pound),
        ProteinBasis::per_serving(32.0, MassUnit::Gram, 25.0),
    );
    let cost = derive(&whey, 30.0);

    assert!(cost.valid);
    assert_float_absolute_eq!(cost.grams_total.unwrap(), 5.0 * GRAMS_PER_LB, 1e-9);
    assert_float_absolute_eq!(cost.grams_protein_total.unwrap(), 1771.84, 1e-2);
    assert_float_absolute_eq!(cost.cost_per_gram_protein.unwrap(), 0.02258, 1e-5);
    assert_float_absolute_eq!(cost.cost_per_target_grams.unwrap(), 0.677, 1e-3);
    assert_float_absolute_eq!(cost.grams_protein_per_gram_product.unwrap(), 25.0 / 32.0, 1e-12);
}

#[test]
fn test_missing_fields_invalidate() {
    let cases = vec![
        (
            PriceMode::TotalPrice {
                total: None,
                package_amount: Some(32.0),
                package_unit: unit(MassUnit::Ounce),
            },
            ProteinBasis::per_100g(10.0),
            CalcIssue::MissingField(Field::TotalPrice),
        ),
        (
            PriceMode::TotalPrice {
                total: Some(5.49),
                package_amount: Some(32.0),
                package_unit: None,
            },
            ProteinBasis::per_100g(10.0),
            CalcIssue::MissingField(Field::PackageUnit),
        ),
        (
            PriceMode::UnitPrice {
                price: Some(2.49),
                unit: None,
                package: None,
            },
            ProteinBasis::per_100g(31.0),
            CalcIssue::MissingField(Field::UnitPriceUnit),
        ),
        (
            PriceMode::per_unit(2.49, MassUnit::Pound),
            ProteinBasis::Per100g {
                grams_per_100g: None,
            },
            CalcIssue::MissingField(Field::ProteinPer100g),
        ),
        (
            PriceMode::total(39.99, 5.0, MassUnit::Pound),
            ProteinBasis::PerServing {
                serving_amount: Some(32.0),
                serving_unit: unit(MassUnit::Gram),
                protein_per_serving: None,
            },
            CalcIssue::MissingField(Field::ProteinPerServing),
        ),
    ];

    for (price, protein, expected) in cases {
        let cost = derive(&item(price, protein), 30.0);
        assert!(!cost.valid);
        assert_eq!(cost.issue, Some(expected));
        assert!(cost.reason().is_some_and(|r| !r.is_empty()));
        assert!(cost.cost_per_gram_protein.is_none());
        assert!(cost.cost_per_target_grams.is_none());
    }
}

#[test]
fn test_zero_price_is_invalid_not_free() {
    let free = item(
        PriceMode::per_unit(0.0, MassUnit::Pound),
        ProteinBasis::per_100g(31.0),
    );
    let cost = derive(&free, 30.0);
    assert!(!cost.valid);
    assert_eq!(cost.issue, Some(CalcIssue::NonPositive(Field::UnitPrice)));
    assert!(cost.cost_per_target_grams.is_none());
}

#[test]
fn test_unrecognized_variant_is_invalid() {
    let odd = item(
        PriceMode::Unrecognized("bulk".to_string()),
        ProteinBasis::per_100g(31.0),
    );
    let cost = derive(&odd, 30.0);
    assert!(!cost.valid);
    assert!(matches!(cost.issue, Some(CalcIssue::InvalidVariant(_))));
}

#[test]
fn test_low_protein_warning() {
    // 10 g of product at 5 g/100 g: half a gram of protein.
    let tiny = item(
        PriceMode::total(1.0, 10.0, MassUnit::Gram),
        ProteinBasis::per_100g(5.0),
    );
    let cost = derive(&tiny, 30.0);
    assert!(cost.valid);
    assert_eq!(cost.warnings, vec![CostWarning::LowProteinContent]);
    assert!(cost.warnings[0].to_string().contains("low protein"));

    // Exactly one gram of protein is not low.
    let one_gram = item(
        PriceMode::total(1.0, 10.0, MassUnit::Gram),
        ProteinBasis::per_100g(10.0),
    );
    let cost = derive(&one_gram, 30.0);
    assert_eq!(cost.grams_protein_total, Some(1.0));
    assert!(cost.warnings.is_empty());

    // Unit price without a package never warns.
    let unpackaged = item(
        PriceMode::per_unit(1.0, MassUnit::Gram),
        ProteinBasis::per_100g(0.5),
    );
    assert!(derive(&unpackaged, 30.0).warnings.is_empty());

    // With a package it can.
    let packaged = item(
        PriceMode::UnitPrice {
            price: Some(1.0),
            unit: unit(MassUnit::Gram),
            package: Some(PackageSize {
                amount: Some(10.0),
                unit: unit(MassUnit::Gram),
            }),
        },
        ProteinBasis::per_100g(0.5),
    );
    assert_eq!(
        derive(&packaged, 30.0).warnings,
        vec![CostWarning::LowProteinContent]
    );
}

#[test]
fn test_derive_is_idempotent() {
    let whey = item(
        PriceMode::total(39.99, 5.0, MassUnit::Pound),
        ProteinBasis::per_serving(32.0, MassUnit::Gram, 25.0),
    );
    let first = derive(&whey, 30.0);
    let second = derive(&whey, 30.0);
    assert_eq!(first, second);
    assert_eq!(
        first.cost_per_gram_protein.map(f64::to_bits),
        second.cost_per_gram_protein.map(f64::to_bits)
    );
}

#[test]
fn test_target_scaling() {
    let chicken = item(
        PriceMode::per_unit(2.49, MassUnit::Pound),
        ProteinBasis::per_100g(31.0),
    );

    for target in [1.0, 25.0, 30.0, 42.5, 100.0] {
        let cost = derive(&chicken, target);
        let per_gram = cost.cost_per_gram_protein.unwrap();
        assert_float_relative_eq!(cost.cost_per_target_grams.unwrap(), per_gram * target, 1e-12);
    }
}
