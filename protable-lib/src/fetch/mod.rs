//! Data fetching
//!
//! [`FetchData`] owns the paged row state and talks to a [`DataSource`].
//! Triggers are coalesced by a [`Debouncer`].

mod debounce;
mod fetch_data;
mod options;
mod page;
mod source;

pub use debounce::*;
pub use fetch_data::*;
pub use options::*;
pub use page::*;
pub use source::*;
