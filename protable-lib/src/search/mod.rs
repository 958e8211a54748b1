//! Search-form derivation
//!
//! Builds search fields from the column model, tracks their values and the
//! collapse state, and normalizes submissions into query parameters.

mod config;
mod convert;
mod field;
mod form;
mod validate;

pub use config::*;
pub use convert::*;
pub use field::*;
pub use form::*;
pub use validate::*;
