//! Registration and login handlers

use tracing::{error, info};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth;
use crate::models::{LoginRequest, LoginResponse, MessageBody, RegisterRequest};
use crate::store::Store;

/// POST /api/auth/register
///
/// Validates the body, pre-checks the username, then creates the user with
/// its seeded assistant modes and provider slots in one transaction. A
/// concurrent registration slipping past the pre-check is caught by the
/// unique index and mapped to the same 409.
pub async fn register_handler(
    store: Store,
    request: RegisterRequest,
) -> Result<impl Reply, Rejection> {
    let (username, password) = match (request.username, request.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            return Ok(message_reply(
                StatusCode::BAD_REQUEST,
                "Username and password are required",
            ))
        }
    };

    match store.find_user_by_username(&username).await {
        Ok(Some(_)) => {
            return Ok(message_reply(
                StatusCode::CONFLICT,
                "Username already exists",
            ))
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "registration pre-check failed");
            return Ok(message_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred",
            ));
        }
    }

    let password_hash = match auth::hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "password hashing failed");
            return Ok(message_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred",
            ));
        }
    };

    match store.create_user_with_seeds(&username, &password_hash).await {
        Ok(user) => {
            info!(username = %user.username, "registered new user");
            Ok(message_reply(StatusCode::CREATED, "success"))
        }
        Err(e) if e.is_conflict() => Ok(message_reply(
            StatusCode::CONFLICT,
            "Username already exists",
        )),
        Err(e) => {
            error!(error = %e, "registration failed");
            Ok(message_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred",
            ))
        }
    }
}

/// POST /api/auth/login
///
/// Verifies the password and issues a session token, returned in the body
/// and as an HttpOnly cookie.
pub async fn login_handler(
    store: Store,
    request: LoginRequest,
) -> Result<warp::reply::Response, Rejection> {
    let user = match store.find_user_by_username(&request.username).await {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "login lookup failed");
            return Ok(message_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred",
            )
            .into_response());
        }
    };

    let user = match user {
        Some(user) if auth::verify_password(&request.password, &user.password_hash) => user,
        // same response for unknown user and wrong password
        _ => {
            return Ok(message_reply(
                StatusCode::UNAUTHORIZED,
                "Invalid username or password",
            )
            .into_response())
        }
    };

    match store.create_session(user.id).await {
        Ok(session) => {
            let reply = warp::reply::json(&LoginResponse {
                token: session.token,
            });
            let reply = warp::reply::with_header(
                reply,
                "set-cookie",
                format!("session={}; Path=/; HttpOnly", session.token),
            );
            Ok(reply.into_response())
        }
        Err(e) => {
            error!(error = %e, "session creation failed");
            Ok(message_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred",
            )
            .into_response())
        }
    }
}

fn message_reply(status: StatusCode, message: &str) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&MessageBody::new(message)), status)
}
