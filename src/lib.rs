pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod pricing;
pub mod state;

pub use error::{PpcError, Result};
pub use models::Item;
pub use pricing::{derive, DerivedCost};
