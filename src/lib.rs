use actix_web::dev::Server;
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{http, web, App, HttpServer};
use actix_cors::Cors;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub mod config;
pub mod db;
mod handlers;
pub mod models;
mod routes;
pub mod services;
pub mod telemetry;
pub mod utils;

use crate::config::database::DeviceSettings;
use crate::db::client::RemoteDb;
use crate::handlers::helpers::{json_error_handler, not_found, path_error_handler};
use crate::routes::init_routes;
use crate::services::ChatService;

pub fn run(
    listener: TcpListener,
    db: RemoteDb,
    chat_service: ChatService,
    device_settings: DeviceSettings,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let db_data = web::Data::new(db);
    let chat_service = web::Data::new(chat_service);
    let device_settings = web::Data::new(device_settings);

    let server = HttpServer::new(move || {
        // Browser dashboards and mobile clients call from arbitrary origins
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        let app = App::new()
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(cors)
            .wrap(TracingLogger::default())
            // Get a pointer copy and attach it to the application state
            .app_data(db_data.clone())
            .app_data(chat_service.clone())
            .app_data(device_settings.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .default_service(web::to(not_found));

        app.configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
