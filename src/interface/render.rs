use crate::models::{Item, PriceMode, ProteinBasis, Settings, UnitEntry};
use crate::pricing::{DerivedCost, RankedItem, SortKey};

/// Shown wherever a figure cannot be derived.
pub const PLACEHOLDER: &str = "—";

/// Format an optional number with a fixed number of decimals.
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Format an optional amount of money, e.g. "$1.82".
pub fn format_currency(value: Option<f64>, currency: &str, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}{:.*}", currency, decimals, v),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Protein per gram of product as a percentage, e.g. "31.0%".
pub fn format_protein_density(grams_per_gram: Option<f64>) -> String {
    match grams_per_gram {
        Some(v) if v.is_finite() => format!("{:.1}%", v * 100.0),
        _ => PLACEHOLDER.to_string(),
    }
}

fn amount_with_unit(amount: Option<f64>, unit: Option<&UnitEntry>) -> Option<String> {
    Some(format!("{} {}", amount?, unit?))
}

/// Short description of how the item is priced.
pub fn summarize_price(item: &Item, currency: &str) -> String {
    match &item.price {
        PriceMode::TotalPrice {
            total,
            package_amount,
            package_unit,
        } => match (total, amount_with_unit(*package_amount, package_unit.as_ref())) {
            (Some(total), Some(package)) => format!("{}{:.2} for {}", currency, total, package),
            _ => "Incomplete price".to_string(),
        },
        PriceMode::UnitPrice {
            price,
            unit,
            package,
        } => match (price, unit) {
            (Some(price), Some(unit)) => {
                let mut summary = format!("{}{:.2}/{}", currency, price, unit);
                if let Some(package) = package
                    .as_ref()
                    .and_then(|p| amount_with_unit(p.amount, p.unit.as_ref()))
                {
                    summary.push_str(&format!(" ({} pkg)", package));
                }
                summary
            }
            _ => "Incomplete price".to_string(),
        },
        PriceMode::Unrecognized(_) => "Unknown price mode".to_string(),
    }
}

/// Short description of the item's protein content.
pub fn summarize_protein(item: &Item) -> String {
    match &item.protein {
        ProteinBasis::Per100g {
            grams_per_100g: Some(grams),
        } => format!("{}g per 100g", grams),
        ProteinBasis::PerServing {
            serving_amount: Some(amount),
            serving_unit: Some(unit),
            protein_per_serving: Some(protein),
        } => format!("{}g per {}{} serving", protein, amount, unit),
        ProteinBasis::Unrecognized(_) => "Unknown protein basis".to_string(),
        _ => "Incomplete protein data".to_string(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Display a ranked listing as a table.
pub fn display_item_table(ranked: &[RankedItem], settings: &Settings, sort_key: SortKey) {
    if ranked.is_empty() {
        println!("No items to show.");
        return;
    }

    let currency = settings.currency_symbol.as_str();
    let target_label = SortKey::CostPerTarget.label(settings);
    let per_gram_label = format!("{}/g", currency);

    let name_width = ranked
        .iter()
        .map(|r| r.item.display_name().chars().count())
        .max()
        .unwrap_or(10)
        .clamp(10, 36);

    println!();
    println!(
        "=== Protein prices ({} items, sorted by {}) ===",
        ranked.len(),
        sort_key.label(settings)
    );
    println!();
    println!(
        "{:>3}  {:1} {:<name_w$}  {:<10}  {:<22}  {:>9}  {:>8}",
        "#",
        "",
        "Name",
        "Store",
        "Price",
        target_label,
        per_gram_label,
        name_w = name_width
    );

    for (i, entry) in ranked.iter().enumerate() {
        let item = entry.item;
        let cost = &entry.cost;
        let star = if item.favorite { "★" } else { "" };
        let store = item.store.as_deref().unwrap_or("");

        let mut tags = Vec::new();
        if let Some(reason) = cost.reason() {
            tags.push(format!("[{}]", reason));
        }
        for warning in &cost.warnings {
            tags.push(format!("[! {}]", warning));
        }
        let tags_str = if tags.is_empty() {
            String::new()
        } else {
            format!("  {}", tags.join(" "))
        };

        println!(
            "{:>3}. {:1} {:<name_w$}  {:<10}  {:<22}  {:>9}  {:>8}{}",
            i + 1,
            star,
            truncate(&item.display_name(), name_width),
            truncate(store, 10),
            truncate(&summarize_price(item, currency), 22),
            format_currency(cost.cost_per_target_grams, currency, 2),
            format_currency(cost.cost_per_gram_protein, currency, 4),
            tags_str,
            name_w = name_width
        );
    }

    let valid = ranked.iter().filter(|r| r.cost.valid).count();
    println!();
    println!("{} of {} items have complete pricing.", valid, ranked.len());
    println!();
}

/// Display one item with every derived figure.
pub fn display_item_details(item: &Item, cost: &DerivedCost, settings: &Settings) {
    let currency = settings.currency_symbol.as_str();

    println!();
    println!("=== {} ===", item.display_name());
    println!("  Id:        {}", item.id);
    if let Some(store) = &item.store {
        println!("  Store:     {}", store);
    }
    println!("  Favorite:  {}", if item.favorite { "yes" } else { "no" });
    if let Some(quality) = item.quality {
        println!("  Quality:   {}/10", quality);
    }
    println!("  Price:     {}", summarize_price(item, currency));
    println!("  Protein:   {}", summarize_protein(item));
    println!();
    println!(
        "  {:<22} {}",
        format!("Cost per {}g protein:", settings.target_grams),
        format_currency(cost.cost_per_target_grams, currency, 2)
    );
    println!(
        "  {:<22} {}",
        "Cost per g protein:",
        format_currency(cost.cost_per_gram_protein, currency, 4)
    );
    println!(
        "  {:<22} {}",
        "Price per g product:",
        format_currency(cost.price_per_gram_product, currency, 4)
    );
    println!(
        "  {:<22} {}",
        "Protein density:",
        format_protein_density(cost.grams_protein_per_gram_product)
    );
    println!(
        "  {:<22} {}",
        "Package mass (g):",
        format_number(cost.grams_total, 1)
    );
    println!(
        "  {:<22} {}",
        "Protein per pkg (g):",
        format_number(cost.grams_protein_total, 1)
    );

    if let Some(reason) = cost.reason() {
        println!();
        println!("  Incomplete: {}", reason);
    }
    for warning in &cost.warnings {
        println!("  Warning: {}", warning);
    }
    if let Some(notes) = item.notes.as_deref().filter(|n| !n.is_empty()) {
        println!();
        println!("  Notes: {}", notes);
    }
    println!();
}
