use clap::Parser;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use protein_price_rs::cli::{Cli, Command};
use protein_price_rs::error::{PpcError, Result};
use protein_price_rs::interface::{
    display_item_details, display_item_table, prompt_item, prompt_yes_no, select_item, write_csv,
};
use protein_price_rs::pricing::{
    derive, filter_items, rank_items, Filters, SortDirection, SortKey,
};
use protein_price_rs::state::{Catalog, FallbackStore, JsonFileStore};

const DEFAULT_LOG_FILTER: &str = "protein_price_rs=warn";

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    let mut store = FallbackStore::new(
        JsonFileStore::new(&cli.file),
        cli.fallback.as_ref().map(JsonFileStore::new),
    );
    let mut catalog = Catalog::new(store.load());
    if !store.is_online() {
        eprintln!("{}", offline_notice(&cli.file, cli.fallback.as_deref()));
    }
    debug!(items = catalog.len(), "catalog ready");

    let changed = match command {
        Command::List {
            sort,
            desc,
            query,
            favorites,
            target,
        } => {
            let filters = Filters {
                query,
                favorites_only: favorites,
            };
            cmd_list(&catalog, sort, desc, &filters, target)?;
            false
        }
        Command::Show { item } => {
            cmd_show(&catalog, &item)?;
            false
        }
        Command::Add => cmd_add(&mut catalog)?,
        Command::Edit { item } => cmd_edit(&mut catalog, &item)?,
        Command::Duplicate { item } => cmd_duplicate(&mut catalog, &item)?,
        Command::Remove { item, yes } => cmd_remove(&mut catalog, &item, yes)?,
        Command::Favorite { item } => cmd_favorite(&mut catalog, &item)?,
        Command::Target { grams } => cmd_target(&mut catalog, grams)?,
        Command::Currency { symbol } => {
            catalog.set_currency(&symbol)?;
            println!("Currency symbol set to {}", catalog.settings().currency_symbol);
            true
        }
        Command::Export { path, sort } => {
            cmd_export(&catalog, &path, sort)?;
            false
        }
        Command::ResetDemo { yes } => cmd_reset_demo(&mut catalog, yes)?,
    };

    if changed {
        if store.save(&catalog.to_state()) {
            info!(items = catalog.len(), "catalog saved");
        } else {
            eprintln!("Warning: changes could not be saved.");
        }
    }

    Ok(())
}

/// What the user is told when the catalog file cannot be used.
fn offline_notice(file: &Path, fallback: Option<&Path>) -> String {
    match fallback {
        Some(fallback) => format!(
            "Could not use {}; working from {}.",
            file.display(),
            fallback.display()
        ),
        None => format!(
            "Could not use {} and no --fallback was given; showing demo items, changes will not be saved.",
            file.display()
        ),
    }
}

/// List items, ranked and filtered.
fn cmd_list(
    catalog: &Catalog,
    sort: SortKey,
    desc: bool,
    filters: &Filters,
    target: Option<f64>,
) -> Result<()> {
    let mut settings = catalog.settings().clone();
    if let Some(target) = target {
        if target.is_nan() || target <= 0.0 {
            return Err(PpcError::InvalidInput(format!(
                "Target must be a positive number of grams, got {}",
                target
            )));
        }
        settings.target_grams = target;
    }

    let direction = if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };

    let visible = filter_items(catalog.items(), filters);
    if visible.is_empty() && !catalog.is_empty() {
        println!("No items match the current filters.");
        return Ok(());
    }

    let ranked = rank_items(visible, sort, direction, settings.target_grams);
    display_item_table(&ranked, &settings, sort);
    Ok(())
}

/// Show one item with all derived figures.
fn cmd_show(catalog: &Catalog, query: &str) -> Result<()> {
    let id = select_item(catalog, query)?;
    let item = catalog
        .get(&id)
        .ok_or_else(|| PpcError::ItemNotFound(id.clone()))?;
    let cost = derive(item, catalog.settings().target_grams);
    display_item_details(item, &cost, catalog.settings());
    Ok(())
}

/// Add an item through the interactive form.
fn cmd_add(catalog: &mut Catalog) -> Result<bool> {
    let item = prompt_item(None)?;
    let name = item.display_name();
    let id = catalog.add(item);
    println!("Added {} ({})", name, id);
    Ok(true)
}

/// Edit an item through the interactive form.
fn cmd_edit(catalog: &mut Catalog, query: &str) -> Result<bool> {
    let id = select_item(catalog, query)?;
    let existing = catalog
        .get(&id)
        .ok_or_else(|| PpcError::ItemNotFound(id.clone()))?;

    let updated = prompt_item(Some(existing))?;
    let name = updated.display_name();
    catalog.update(updated)?;
    println!("Updated {}", name);
    Ok(true)
}

fn cmd_duplicate(catalog: &mut Catalog, query: &str) -> Result<bool> {
    let id = select_item(catalog, query)?;
    let copy = catalog.duplicate(&id)?;
    println!("Created {} ({})", copy.display_name(), copy.id);
    Ok(true)
}

fn cmd_remove(catalog: &mut Catalog, query: &str, yes: bool) -> Result<bool> {
    let id = select_item(catalog, query)?;
    if !yes {
        let name = catalog
            .get(&id)
            .map(|item| item.display_name())
            .unwrap_or_else(|| id.clone());
        if !prompt_yes_no(&format!("Remove '{}'?", name), false)? {
            println!("Nothing removed.");
            return Ok(false);
        }
    }

    let removed = catalog.remove(&id)?;
    println!("Removed {}", removed.display_name());
    Ok(true)
}

fn cmd_favorite(catalog: &mut Catalog, query: &str) -> Result<bool> {
    let id = select_item(catalog, query)?;
    let favorite = catalog.toggle_favorite(&id)?;
    let name = catalog
        .get(&id)
        .map(|item| item.display_name())
        .unwrap_or(id);
    if favorite {
        println!("Marked {} as a favorite", name);
    } else {
        println!("Removed {} from favorites", name);
    }
    Ok(true)
}

/// Set the comparison target, or toggle it when no value is given.
fn cmd_target(catalog: &mut Catalog, grams: Option<f64>) -> Result<bool> {
    let target = match grams {
        Some(grams) => {
            catalog.set_target(grams)?;
            grams
        }
        None => catalog.toggle_target(),
    };
    println!("Comparing at {}g of protein", target);
    Ok(true)
}

/// Export the ranked catalog as CSV.
fn cmd_export(catalog: &Catalog, path: &Path, sort: SortKey) -> Result<()> {
    let settings = catalog.settings();
    let ranked = rank_items(
        catalog.items(),
        sort,
        SortDirection::Ascending,
        settings.target_grams,
    );
    write_csv(&ranked, settings, path)?;
    println!("Exported {} items to {}", ranked.len(), path.display());
    Ok(())
}

fn cmd_reset_demo(catalog: &mut Catalog, yes: bool) -> Result<bool> {
    if !yes && !catalog.is_empty() {
        let prompt = format!("Replace all {} items with the demo items?", catalog.len());
        if !prompt_yes_no(&prompt, false)? {
            println!("Catalog unchanged.");
            return Ok(false);
        }
    }

    catalog.reset_demo_items();
    println!("Catalog reset to {} demo items.", catalog.len());
    Ok(true)
}
