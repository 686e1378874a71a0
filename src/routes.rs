//! Route definitions
//!
//! Everything under `/api` is JSON; the two page routes at the bottom give
//! unauthenticated browsers somewhere to land.

use std::convert::Infallible;
use std::sync::Arc;

use uuid::Uuid;
use warp::Filter;

use crate::auth::with_session;
use crate::config::DeploymentEnv;
use crate::handlers;
use crate::llm::ChatModel;
use crate::store::Store;

fn with_store(store: Store) -> impl Filter<Extract = (Store,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn with_model(
    model: Arc<dyn ChatModel>,
) -> impl Filter<Extract = (Arc<dyn ChatModel>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&model))
}

fn with_api_key(api_key: String) -> impl Filter<Extract = (String,), Error = Infallible> + Clone {
    warp::any().map(move || api_key.clone())
}

/// Build the complete filter tree
pub fn configure_routes(
    store: Store,
    model: Arc<dyn ChatModel>,
    api_key: String,
    deployment_env: DeploymentEnv,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let api = warp::path("api");

    // POST /api/auth/register
    let register = api
        .and(warp::path("auth"))
        .and(warp::path("register"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_store(store.clone()))
        .and(warp::body::json())
        .and_then(handlers::register_handler);

    // POST /api/auth/login
    let login = api
        .and(warp::path("auth"))
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_store(store.clone()))
        .and(warp::body::json())
        .and_then(handlers::login_handler);

    // GET /api/chat-rooms/{id}/messages
    let list_messages = api
        .and(warp::path("chat-rooms"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path("messages"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::list_messages_handler);

    // POST /api/chat-rooms/{id}/messages — the streaming exchange
    let send_message = api
        .and(warp::path("chat-rooms"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path("messages"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_session(store.clone()))
        .and(warp::body::json())
        .and(with_store(store.clone()))
        .and(with_model(model))
        .and(with_api_key(api_key))
        .and_then(handlers::send_message_handler);

    // POST /api/chat-rooms
    let create_room = api
        .and(warp::path("chat-rooms"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_session(store.clone()))
        .and(warp::body::json())
        .and(with_store(store.clone()))
        .and_then(handlers::create_chat_room_handler);

    // GET /api/chat-rooms
    let list_rooms = api
        .and(warp::path("chat-rooms"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_session(store.clone()))
        .and(with_store(store.clone()))
        .and_then(handlers::list_chat_rooms_handler);

    // GET /api/llm-providers
    let list_providers = api
        .and(warp::path("llm-providers"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_session(store.clone()))
        .and(with_store(store.clone()))
        .and(warp::any().map(move || deployment_env))
        .and_then(handlers::list_llm_providers_handler);

    // GET /api/health-data/{id}
    let get_health = api
        .and(warp::path("health-data"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::get_health_data_handler);

    // PATCH /api/health-data/{id}
    let patch_health = api
        .and(warp::path("health-data"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(warp::patch())
        .and(warp::body::json())
        .and(with_store(store.clone()))
        .and_then(handlers::patch_health_data_handler);

    // DELETE /api/health-data/{id}
    let delete_health = api
        .and(warp::path("health-data"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_store(store.clone()))
        .and_then(handlers::delete_health_data_handler);

    // GET /login — always reachable, never redirects
    let login_page = warp::path("login")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::login_page_handler);

    // every other page GET: shell when signed in, redirect otherwise
    let page_gate = warp::get()
        .and(warp::path::full())
        .and(warp::cookie::optional::<String>("session"))
        .and(with_store(store))
        .and_then(handlers::page_gate_handler);

    register
        .or(login)
        .or(list_messages)
        .or(send_message)
        .or(create_room)
        .or(list_rooms)
        .or(list_providers)
        .or(get_health)
        .or(patch_health)
        .or(delete_health)
        .or(login_page)
        .or(page_gate)
        .recover(handlers::handle_rejection)
}
