//! Variable and brain schema for cog projects.
//!
//! - [`variables`]: kinds, per-kind defaults, the value union, categories
//! - [`predefined`]: system variables with fixed negative ids
//! - [`coerce`]: untyped JSON → value of a declared kind, never failing
//! - [`brain`]: project metadata properties
//! - [`definition`], [`normalize`], [`loader`]: persisted records and the
//!   plumbing that runs them through coercion
pub mod brain;
pub mod coerce;
pub mod definition;
pub mod error;
pub mod jq_exec;
pub mod loader;
pub mod normalize;
pub mod path_de;
pub mod predefined;
pub mod variables;

pub use coerce::convert_var_value_to_type;
pub use error::{Error, Result};
pub use variables::{is_variable_type, VarValue, VariableType, VarsMap};
