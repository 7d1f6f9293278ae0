pub mod chat;
pub mod client;
pub mod decode;
pub mod devices;
pub mod health_metrics;
pub mod schema;
pub mod users;

pub use client::{DbError, RemoteDb, SqlValue, Statement};
pub use decode::{decode, FromRow, ResultSet, Row};
