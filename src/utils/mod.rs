pub mod health_status;
pub mod text_fields;
pub mod timestamps;
