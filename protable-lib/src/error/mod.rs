//! Error types

mod config;
mod fetch;
mod field;
mod search;
mod validation;

pub use config::*;
pub use fetch::*;
pub use field::*;
pub use search::*;
pub use validation::*;
