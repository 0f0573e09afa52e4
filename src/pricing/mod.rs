pub mod calculations;
pub mod constants;
pub mod ranking;
pub mod validation;

pub use calculations::{
    convert_to_grams, derive, grams_per_unit, positive, CalcIssue, CostWarning, DerivedCost,
    Field, UnitError,
};
pub use constants::*;
pub use ranking::{filter_items, rank_items, Filters, RankedItem, SortDirection, SortKey};
pub use validation::{validate_item, FieldError};
