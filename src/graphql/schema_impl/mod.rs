pub mod mutations;
pub mod queries;

pub use mutations::MutationRoot;
pub use queries::QueryRoot;
