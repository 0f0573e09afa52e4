use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{PpcError, Result};
use crate::models::{Item, MassUnit, PackageSize, PriceMode, ProteinBasis, UnitEntry};
use crate::pricing::validate_item;
use crate::state::Catalog;

/// Minimum similarity for a name to count as a fuzzy match.
const FUZZY_THRESHOLD: f64 = 0.7;

/// How many fuzzy candidates to offer at once.
const MAX_CANDIDATES: usize = 5;

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Items whose name resembles `query`, best match first.
pub fn fuzzy_matches<'a>(items: &'a [Item], query: &str) -> Vec<(&'a Item, f64)> {
    let query = query.trim().to_lowercase();
    let mut candidates: Vec<(&Item, f64)> = items
        .iter()
        .map(|item| (item, jaro_winkler(&item.name.to_lowercase(), &query)))
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Resolve what the user typed to an item id.
///
/// Tries an exact id, then an exact name (case-insensitive), then asks the
/// user to pick among fuzzy matches.
pub fn select_item(catalog: &Catalog, query: &str) -> Result<String> {
    if catalog.is_empty() {
        return Err(PpcError::EmptyCatalog);
    }

    let query = query.trim();
    if let Some(item) = catalog.get(query) {
        return Ok(item.id.clone());
    }
    if let Some(item) = catalog.find_by_name(query) {
        return Ok(item.id.clone());
    }

    let candidates = fuzzy_matches(catalog.items(), query);
    let not_found = || PpcError::ItemNotFound(query.to_string());

    match candidates.as_slice() {
        [] => Err(not_found()),
        [(item, _)] => {
            if prompt_yes_no(&format!("Did you mean '{}'?", item.display_name()), true)? {
                Ok(item.id.clone())
            } else {
                Err(not_found())
            }
        }
        _ => {
            let shown: Vec<&Item> = candidates
                .iter()
                .take(MAX_CANDIDATES)
                .map(|(item, _)| *item)
                .collect();

            let mut options: Vec<String> = shown.iter().map(|item| item.display_name()).collect();
            options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&options)
                .default(0)
                .interact()?;

            shown
                .get(selection)
                .map(|item| item.id.clone())
                .ok_or_else(not_found)
        }
    }
}

fn prompt_text(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if let Some(default) = default.filter(|d| !d.is_empty()) {
        input = input.default(default.to_string());
    }
    Ok(input.interact_text()?.trim().to_string())
}

fn prompt_optional_text(prompt: &str, default: Option<&str>) -> Result<Option<String>> {
    let text = prompt_text(prompt, default)?;
    Ok(if text.is_empty() { None } else { Some(text) })
}

fn prompt_amount(prompt: &str, default: Option<f64>) -> Result<f64> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }

    let raw = input
        .validate_with(|text: &String| -> std::result::Result<(), &str> {
            match text.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
                _ => Err("Enter a positive number"),
            }
        })
        .interact_text()?;

    raw.trim()
        .parse()
        .map_err(|_| PpcError::InvalidInput(format!("Invalid number: {}", raw)))
}

fn prompt_unit(prompt: &str, default: Option<&UnitEntry>) -> Result<MassUnit> {
    let options: Vec<&str> = MassUnit::ALL.iter().map(|u| u.symbol()).collect();
    let default_index = default
        .and_then(UnitEntry::known)
        .and_then(|unit| MassUnit::ALL.iter().position(|u| *u == unit))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&options)
        .default(default_index)
        .interact()?;

    Ok(MassUnit::ALL[selection])
}

fn prompt_quality(default: Option<u8>) -> Result<Option<u8>> {
    let mut input = Input::<String>::new()
        .with_prompt("Quality rating 1-10 (Enter to skip)")
        .allow_empty(true);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }

    let raw = input
        .validate_with(|text: &String| -> std::result::Result<(), &str> {
            let text = text.trim();
            if text.is_empty() {
                return Ok(());
            }
            match text.parse::<u8>() {
                Ok(1..=10) => Ok(()),
                _ => Err("Enter a whole number from 1 to 10"),
            }
        })
        .interact_text()?;

    Ok(raw.trim().parse().ok())
}

fn prompt_price(existing: Option<&PriceMode>) -> Result<PriceMode> {
    let modes = ["Total price for a package", "Price per unit of mass"];
    let default_mode = match existing {
        Some(PriceMode::UnitPrice { .. }) => 1,
        _ => 0,
    };
    let mode = Select::new()
        .with_prompt("How is it priced?")
        .items(&modes)
        .default(default_mode)
        .interact()?;

    if mode == 0 {
        let (total, amount, unit) = match existing {
            Some(PriceMode::TotalPrice {
                total,
                package_amount,
                package_unit,
            }) => (*total, *package_amount, package_unit.as_ref()),
            _ => (None, None, None),
        };
        let total = prompt_amount("Total price", total)?;
        let amount = prompt_amount("Package amount", amount)?;
        let unit = prompt_unit("Package unit", unit)?;
        return Ok(PriceMode::total(total, amount, unit));
    }

    let (price, unit, package) = match existing {
        Some(PriceMode::UnitPrice {
            price,
            unit,
            package,
        }) => (*price, unit.as_ref(), package.as_ref()),
        _ => (None, None, None),
    };
    let price = prompt_amount("Price per unit", price)?;
    let unit = prompt_unit("Priced per", unit)?;

    if !prompt_yes_no("Add the package size?", package.is_some())? {
        return Ok(PriceMode::per_unit(price, unit));
    }
    let amount = prompt_amount("Package amount", package.and_then(|p| p.amount))?;
    let package_unit = prompt_unit("Package unit", package.and_then(|p| p.unit.as_ref()))?;

    Ok(PriceMode::UnitPrice {
        price: Some(price),
        unit: Some(unit.into()),
        package: Some(PackageSize {
            amount: Some(amount),
            unit: Some(package_unit.into()),
        }),
    })
}

fn prompt_protein(existing: Option<&ProteinBasis>) -> Result<ProteinBasis> {
    let bases = ["Grams of protein per 100 g", "Grams of protein per serving"];
    let default_basis = match existing {
        Some(ProteinBasis::PerServing { .. }) => 1,
        _ => 0,
    };
    let basis = Select::new()
        .with_prompt("How is protein listed?")
        .items(&bases)
        .default(default_basis)
        .interact()?;

    if basis == 0 {
        let grams = match existing {
            Some(ProteinBasis::Per100g { grams_per_100g }) => *grams_per_100g,
            _ => None,
        };
        return Ok(ProteinBasis::per_100g(prompt_amount(
            "Protein per 100 g",
            grams,
        )?));
    }

    let (amount, unit, protein) = match existing {
        Some(ProteinBasis::PerServing {
            serving_amount,
            serving_unit,
            protein_per_serving,
        }) => (*serving_amount, serving_unit.as_ref(), *protein_per_serving),
        _ => (None, None, None),
    };
    let amount = prompt_amount("Serving size", amount)?;
    let unit = prompt_unit("Serving size unit", unit)?;
    let protein = prompt_amount("Protein per serving (g)", protein)?;

    Ok(ProteinBasis::per_serving(amount, unit, protein))
}

/// Walk the user through the item form.
///
/// With `existing`, every answer defaults to the current value and the id,
/// favorite flag and unknown fields are kept. Loops until the item validates
/// or the user gives up.
pub fn prompt_item(existing: Option<&Item>) -> Result<Item> {
    let mut draft = existing.cloned();

    loop {
        let current = draft.as_ref();

        let name = prompt_text("Name", current.map(|i| i.name.as_str()))?;
        let brand = prompt_optional_text("Brand", current.and_then(|i| i.brand.as_deref()))?;
        let store = prompt_optional_text("Store", current.and_then(|i| i.store.as_deref()))?;
        let price = prompt_price(current.map(|i| &i.price))?;
        let protein = prompt_protein(current.map(|i| &i.protein))?;
        let quality = prompt_quality(current.and_then(|i| i.quality))?;
        let notes = prompt_optional_text("Notes", current.and_then(|i| i.notes.as_deref()))?;

        let mut item = match current {
            Some(base) => base.clone(),
            None => Item::new(String::new(), String::new(), price.clone(), protein.clone()),
        };
        item.name = name;
        item.brand = brand;
        item.store = store;
        item.price = price;
        item.protein = protein;
        item.quality = quality;
        item.notes = notes;

        let errors = validate_item(&item);
        if errors.is_empty() {
            return Ok(item);
        }

        println!();
        for error in &errors {
            println!("  - {}", error);
        }
        if !prompt_yes_no("Fix these and try again?", true)? {
            return Err(PpcError::InvalidInput(
                "Item was not saved".to_string(),
            ));
        }
        draft = Some(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<Item> {
        ["Chicken breast", "Chicken thighs", "Whey isolate"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Item::new(
                    i.to_string(),
                    *name,
                    PriceMode::per_unit(2.0, MassUnit::Pound),
                    ProteinBasis::per_100g(20.0),
                )
            })
            .collect()
    }

    #[test]
    fn test_fuzzy_matches_best_first() {
        let items = items();
        let matches = fuzzy_matches(&items, "chiken brest");
        assert!(!matches.is_empty());
        assert_eq!(matches[0].0.name, "Chicken breast");
        assert!(matches.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_fuzzy_matches_rejects_unrelated() {
        let items = items();
        assert!(fuzzy_matches(&items, "zzzz").is_empty());
    }

    #[test]
    fn test_select_item_by_id_and_name() {
        use crate::models::CatalogState;

        let catalog = Catalog::new(CatalogState {
            items: items(),
            ..Default::default()
        });
        assert_eq!(select_item(&catalog, "2").unwrap(), "2");
        assert_eq!(select_item(&catalog, "whey ISOLATE").unwrap(), "2");
        assert!(matches!(
            select_item(&catalog, "qqqq"),
            Err(PpcError::ItemNotFound(_))
        ));
        assert!(matches!(
            select_item(&Catalog::default(), "x"),
            Err(PpcError::EmptyCatalog)
        ));
    }
}
