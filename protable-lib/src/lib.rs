//! Headless data-table engine
//!
//! Column declarations drive cell formatting and search-form generation; a
//! debounced fetch state machine pages rows in from a [`fetch::DataSource`];
//! [`table::ProTable`] ties it together with selection, pagination and
//! toolbar state. Rendering is left to the host: everything here produces
//! descriptions such as [`render::Cell`] and [`search::SearchField`].

pub mod error;
pub mod fetch;
pub mod intl;
pub mod model;
pub mod render;
pub mod search;
pub mod table;
