pub mod helpers;
pub mod schema;
pub mod schema_impl;

pub use schema::{create_schema, Schema};
