use actix_web::{get, Responder};

use crate::handlers::index_handler;

#[get("/")]
async fn index() -> impl Responder {
    index_handler::index().await
}
