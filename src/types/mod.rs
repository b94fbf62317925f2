//! Static dialect configuration tables.

pub mod affinity;
pub mod operators;

pub use affinity::{storage_type, TYPE_AFFINITY};
pub use operators::{template_for, OPERATOR_TEMPLATES};
