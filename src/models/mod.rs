pub mod chat;
pub mod device;
pub mod health_metric;
pub mod health_status;
pub mod llm;
pub mod user;
