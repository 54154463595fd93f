use actix_web::{get, post, web, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{auth::MaybeAuthenticated, graphql::Schema};

/// The single GraphQL endpoint. Identity is resolved here, once per request,
/// and handed to resolvers through the request context; handlers downstream
/// never consult ambient state.
#[post("/graphql")]
pub async fn graphql(
    schema: web::Data<Schema>,
    auth: MaybeAuthenticated,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(claims) = auth.into_claims() {
        request = request.data(claims);
    }
    schema.execute(request).await.into()
}

#[get("/graphiql")]
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
