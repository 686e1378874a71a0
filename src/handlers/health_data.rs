//! GET/PATCH/DELETE /api/health-data/{id}

use tracing::error;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::models::{ErrorBody, HealthDataPatchRequest, HealthDataResponse};
use crate::store::{self, HealthDataPatch, Store};

pub async fn get_health_data_handler(id: Uuid, store: Store) -> Result<impl Reply, Rejection> {
    match store.get_health_data(id).await {
        Ok(health_data) => Ok(warp::reply::with_status(
            warp::reply::json(&HealthDataResponse { health_data }),
            StatusCode::OK,
        )),
        Err(e) => Ok(store_error_reply(e, "health data lookup failed")),
    }
}

/// Partial update: only the supplied fields change
pub async fn patch_health_data_handler(
    id: Uuid,
    request: HealthDataPatchRequest,
    store: Store,
) -> Result<impl Reply, Rejection> {
    let patch = HealthDataPatch {
        data_type: request.data_type,
        data: request.data,
    };

    match store.update_health_data(id, patch).await {
        Ok(health_data) => Ok(warp::reply::with_status(
            warp::reply::json(&HealthDataResponse { health_data }),
            StatusCode::OK,
        )),
        Err(e) => Ok(store_error_reply(e, "health data update failed")),
    }
}

pub async fn delete_health_data_handler(id: Uuid, store: Store) -> Result<impl Reply, Rejection> {
    match store.delete_health_data(id).await {
        Ok(()) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({})),
            StatusCode::OK,
        )),
        Err(e) => Ok(store_error_reply(e, "health data delete failed")),
    }
}

fn store_error_reply(
    e: store::Error,
    log_context: &str,
) -> warp::reply::WithStatus<warp::reply::Json> {
    if e.is_not_found() {
        return warp::reply::with_status(
            warp::reply::json(&ErrorBody::new("Health data not found")),
            StatusCode::NOT_FOUND,
        );
    }
    error!(error = %e, "{}", log_context);
    warp::reply::with_status(
        warp::reply::json(&ErrorBody::new("An error occurred")),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}
