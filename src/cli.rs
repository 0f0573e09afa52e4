use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::pricing::SortKey;

/// protein_price: compare what protein really costs across products.
#[derive(Parser, Debug)]
#[command(name = "protein_price")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the catalog JSON file.
    #[arg(short, long, default_value = "protein_catalog.json")]
    pub file: PathBuf,

    /// Local catalog used when the main file cannot be read or written.
    #[arg(long)]
    pub fallback: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List items ranked by cost.
    List {
        /// Column to sort by.
        #[arg(short, long, value_enum, default_value_t = SortKey::default())]
        sort: SortKey,

        /// Sort in descending order.
        #[arg(long)]
        desc: bool,

        /// Only show items whose name, brand or store contains this text.
        #[arg(short, long)]
        query: Option<String>,

        /// Only show favorites.
        #[arg(long)]
        favorites: bool,

        /// Compare at this many grams of protein instead of the saved target.
        #[arg(short, long)]
        target: Option<f64>,
    },

    /// Show every derived figure for one item.
    Show {
        /// Item id or name.
        item: String,
    },

    /// Add an item interactively.
    Add,

    /// Edit an item interactively.
    Edit {
        /// Item id or name.
        item: String,
    },

    /// Copy an item under a new id.
    Duplicate {
        /// Item id or name.
        item: String,
    },

    /// Remove an item.
    Remove {
        /// Item id or name.
        item: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Toggle an item's favorite flag.
    Favorite {
        /// Item id or name.
        item: String,
    },

    /// Set the comparison target in grams, or toggle between 25 and 30.
    Target {
        grams: Option<f64>,
    },

    /// Set the currency symbol.
    Currency {
        symbol: String,
    },

    /// Export the ranked catalog to a CSV file.
    Export {
        path: PathBuf,

        /// Column to sort by.
        #[arg(short, long, value_enum, default_value_t = SortKey::default())]
        sort: SortKey,
    },

    /// Replace every item with the demo items.
    ResetDemo {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::List {
            sort: SortKey::default(),
            desc: false,
            query: None,
            favorites: false,
            target: None,
        }
    }
}
