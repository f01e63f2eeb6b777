use actix_web::web::{get, resource};
use actix_web::{HttpResponse, Resource, Responder};
use serde_json::json;

async fn process() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Box Label Generator API is running!" }))
}

/// `GET /` liveness check.
pub fn configure_routes() -> Resource {
    resource("/").route(get().to(process))
}
