use async_graphql::{EmptySubscription, Schema as GraphQLSchema};

use crate::{
    app_state::AppState,
    graphql::schema_impl::{MutationRoot, QueryRoot},
};

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(app_state)
        .finish()
}
