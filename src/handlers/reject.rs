//! Rejection-to-response mapping

use std::convert::Infallible;

use tracing::error;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::{AuthStoreFailure, Unauthorized};
use crate::models::ErrorBody;

/// Convert filter rejections into the API's JSON error bodies
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if err.find::<Unauthorized>().is_some() {
        (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
    } else if let Some(failure) = err.find::<AuthStoreFailure>() {
        error!(error = %failure.0, "session resolution failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred".to_string(),
        )
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed".to_string(),
        )
    } else {
        error!(?err, "unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody::new(message)),
        status,
    ))
}
