pub mod export;
pub mod prompts;
pub mod render;

pub use export::{write_csv, write_items_csv};
pub use prompts::{fuzzy_matches, prompt_item, prompt_yes_no, select_item};
pub use render::{
    display_item_details, display_item_table, format_currency, format_number,
    format_protein_density, summarize_price, summarize_protein, PLACEHOLDER,
};
