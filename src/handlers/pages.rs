//! Page-level route protection
//!
//! API routes enforce their own session checks; everything else is a page.
//! Unauthenticated page requests are redirected to the login page, which is
//! itself always served to avoid a redirect loop.

use uuid::Uuid;
use warp::http::StatusCode;
use warp::hyper::Body;
use warp::path::FullPath;
use warp::{Rejection, Reply};

use crate::store::Store;

const LOGIN_PAGE: &str = "<!doctype html>\n<title>healthchat — sign in</title>\n<h1>Sign in</h1>\n<p>POST /api/auth/login with {\"username\", \"password\"}.</p>\n";

const APP_SHELL: &str =
    "<!doctype html>\n<title>healthchat</title>\n<h1>healthchat</h1>\n<p>You are signed in.</p>\n";

/// GET /login — always reachable
pub async fn login_page_handler() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::html(LOGIN_PAGE))
}

/// Catch-all for page GETs: serve the shell with a valid session, redirect
/// to /login without one. API paths fall through to the API's own 404.
pub async fn page_gate_handler(
    path: FullPath,
    session_cookie: Option<String>,
    store: Store,
) -> Result<warp::reply::Response, Rejection> {
    if path.as_str().starts_with("/api") {
        return Err(warp::reject::not_found());
    }

    let authenticated = match session_cookie.and_then(|c| Uuid::parse_str(&c).ok()) {
        Some(token) => matches!(store.find_session(token).await, Ok(Some(_))),
        None => false,
    };

    if authenticated {
        return Ok(warp::reply::html(APP_SHELL).into_response());
    }

    let response = warp::http::Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header("location", "/login")
        .body(Body::empty());

    response.map_err(|_| warp::reject::not_found())
}
