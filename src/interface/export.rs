use std::io;
use std::path::Path;

use crate::error::Result;
use crate::interface::render::{summarize_price, summarize_protein};
use crate::models::Settings;
use crate::pricing::RankedItem;

const HEADER: [&str; 14] = [
    "rank",
    "id",
    "name",
    "brand",
    "store",
    "favorite",
    "quality",
    "price",
    "protein",
    "cost_per_target",
    "cost_per_gram_protein",
    "price_per_gram_product",
    "grams_protein_total",
    "issue",
];

fn cell(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => String::new(),
    }
}

/// Write a ranked listing as CSV to any writer.
pub fn write_items_csv<W: io::Write>(
    writer: W,
    ranked: &[RankedItem],
    settings: &Settings,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for (i, entry) in ranked.iter().enumerate() {
        let item = entry.item;
        let cost = &entry.cost;
        let warnings: Vec<String> = cost.warnings.iter().map(ToString::to_string).collect();
        let issue = cost.reason().unwrap_or_else(|| warnings.join("; "));

        wtr.write_record([
            (i + 1).to_string(),
            item.id.clone(),
            item.name.clone(),
            item.brand.clone().unwrap_or_default(),
            item.store.clone().unwrap_or_default(),
            item.favorite.to_string(),
            item.quality.map(|q| q.to_string()).unwrap_or_default(),
            summarize_price(item, &settings.currency_symbol),
            summarize_protein(item),
            cell(cost.cost_per_target_grams, 4),
            cell(cost.cost_per_gram_protein, 6),
            cell(cost.price_per_gram_product, 6),
            cell(cost.grams_protein_total, 2),
            issue,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write a ranked listing to a CSV file.
pub fn write_csv(ranked: &[RankedItem], settings: &Settings, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_items_csv(file, ranked, settings)
}
