pub mod backend_health_handler;
pub mod chat_handler;
pub mod device_handler;
pub mod health_metric_handler;
pub mod health_status_handler;
pub mod helpers;
pub mod index_handler;
pub mod user_handler;
