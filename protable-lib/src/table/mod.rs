//! Table orchestration
//!
//! [`ProTable`] ties the column model, the search form and the fetch state
//! machine together, and tracks selection, pagination and toolbar state.

mod columns;
mod config;
mod pagination;
mod pro_table;
mod selection;
mod toolbar;

pub use columns::*;
pub use config::*;
pub use pagination::*;
pub use pro_table::*;
pub use selection::*;
pub use toolbar::*;
