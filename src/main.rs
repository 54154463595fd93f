use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use academy_server::{
    app_state::AppState,
    auth::JwtService,
    config::Config,
    graphql::create_schema,
    handlers,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let state = AppState::new(config.clone())
        .await
        .expect("failed to initialize application state");

    state.outbox_worker.start().await;

    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
    let schema = create_schema(state.clone());

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    log::info!("Starting HTTP server on {}:{}", host, port);
    log::info!("GraphiQL playground: http://{}:{}/graphiql", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(handlers::health_check)
            .service(handlers::health_check_ready)
            .service(handlers::health_check_live)
            .service(handlers::graphql)
            .service(handlers::graphiql)
    })
    .bind((host, port))?
    .run()
    .await
}
