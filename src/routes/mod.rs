use actix_web::web;

pub mod backend_health;
pub mod chat;
pub mod devices;
pub mod health_metrics;
pub mod health_status;
pub mod index;
pub mod users;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index::index)
        .service(backend_health::backend_health);

    cfg.service(users::list_users)
        .service(users::create_user)
        .service(users::get_user);

    cfg.service(devices::list_devices)
        .service(devices::create_device)
        .service(devices::get_device_by_id)
        .service(devices::get_device);

    // Fixed segments are registered ahead of `/health-metrics/{metric_id}`
    cfg.service(health_metrics::list_health_metrics)
        .service(health_metrics::create_health_metric)
        .service(health_metrics::delete_invalid_health_metrics)
        .service(health_metrics::list_device_health_metrics)
        .service(health_metrics::get_health_metric)
        .service(health_status::get_health_status);

    cfg.service(chat::send_message)
        .service(chat::get_history);
}
