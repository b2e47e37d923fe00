use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use mongodb::{options::ClientOptions, Client};

use stampbid::config::Config;
use stampbid::controllers;
use stampbid::store::MongoStore;
use stampbid::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let mut client_options = ClientOptions::parse(&config.mongodb_uri)
        .await
        .expect("invalid MongoDB URI");
    client_options.app_name = Some("stampbid".to_string());
    let client = Client::with_options(client_options).expect("failed to build MongoDB client");
    let store = Arc::new(MongoStore::new(client.database(&config.database)));
    let state = web::Data::new(AppState::new(store));

    log::info!("listening on {}", config.bind_addr);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method();
        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(controllers::configure)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
