//! Column model and row data

mod column;
mod column_spec;
mod path;
mod record;
mod status;
mod value;
mod value_enum;
mod value_type;

pub use column::*;
pub use column_spec::*;
pub use path::*;
pub use record::*;
pub use status::*;
pub use value::*;
pub use value_enum::*;
pub use value_type::*;
