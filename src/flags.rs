//! Command-line flag handling: the declared schema, the parsed flag bag, and
//! the alias-aware typed reader layered on top of it.

pub mod bag;
pub mod reader;
pub mod schema;
