use actix_web::{web, HttpResponse};

use mp_shared::HealthResponse;

use crate::state::AppState;

/// Handler for GET /health
///
/// Reports `degraded` with a 503 when the database does not answer.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = match &state.database {
        Some(pool) => match pool.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                log::warn!("Database health check failed: {}", e);
                false
            }
        },
        None => true,
    };

    let body = HealthResponse::new("mercado-api", env!("CARGO_PKG_VERSION"), database);
    if body.is_healthy() {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
