mod common;

use common::ScriptedModel;
use healthchat::config::DeploymentEnv;
use healthchat::routes::configure_routes;
use serde_json::{json, Value};
use testcontainers::clients::Cli;
use uuid::Uuid;

// Keeps _docker and _container alive for the duration of the test
macro_rules! setup_test {
    ($docker:ident, $container:ident, $store:ident) => {
        let $docker = Cli::default();
        let $container = $docker.run(common::create_postgres_container());

        let host_port = $container.get_host_port_ipv4(common::POSTGRES_PORT);
        let connection_string = common::build_connection_string("127.0.0.1", host_port);
        let $store = common::connect_store(&connection_string).await;
    };
}

fn local_routes(
    store: &healthchat::store::Store,
) -> impl warp::Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
    configure_routes(
        store.clone(),
        ScriptedModel::replying(&[]),
        "test-key".to_string(),
        DeploymentEnv::Local,
    )
}

// ============================================================================
// Chat rooms
// ============================================================================

#[tokio::test]
async fn test_create_chat_room_defaults() {
    setup_test!(_docker, _container, store);
    let (user, token) = common::register_and_sign_in(&store, "ada").await;
    let routes = local_routes(&store);

    let response = warp::test::request()
        .method("POST")
        .path("/api/chat-rooms")
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 201);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["chatRoom"]["name"], "New chat");
    assert_eq!(body["chatRoom"]["authorId"], user.id.to_string());
    // bound to one of the user's seeded modes
    assert!(body["chatRoom"]["assistantModeId"].is_string());
    assert!(body["chatRoom"]["llmProviderModelId"].is_null());
}

#[tokio::test]
async fn test_create_chat_room_unknown_mode_is_not_found() {
    setup_test!(_docker, _container, store);
    let (_user, token) = common::register_and_sign_in(&store, "ada").await;
    let routes = local_routes(&store);

    let response = warp::test::request()
        .method("POST")
        .path("/api/chat-rooms")
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({ "assistantModeId": Uuid::new_v4() }))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 404);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["error"], "Assistant mode not found");
}

#[tokio::test]
async fn test_list_chat_rooms_most_recent_activity_first() {
    setup_test!(_docker, _container, store);
    let (user, token) = common::register_and_sign_in(&store, "ada").await;
    let routes = local_routes(&store);

    let older = store.create_chat_room(user.id, "older", None).await.unwrap();
    let newer = store.create_chat_room(user.id, "newer", None).await.unwrap();

    let response = warp::test::request()
        .method("GET")
        .path("/api/chat-rooms")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    let rooms = body["chatRooms"].as_array().unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0]["id"], newer.id.to_string());
    assert_eq!(rooms[1]["id"], older.id.to_string());

    // activity in the older room moves it to the front
    store
        .begin_exchange(
            older.id,
            user.id,
            "bump",
            healthchat::store::MessageRole::User,
        )
        .await
        .unwrap();

    let response = warp::test::request()
        .method("GET")
        .path("/api/chat-rooms")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;

    let body: Value = serde_json::from_slice(response.body()).unwrap();
    let rooms = body["chatRooms"].as_array().unwrap();
    assert_eq!(rooms[0]["id"], older.id.to_string());
}

#[tokio::test]
async fn test_chat_rooms_require_session() {
    setup_test!(_docker, _container, store);
    let routes = local_routes(&store);

    for method in ["GET", "POST"] {
        let response = warp::test::request()
            .method(method)
            .path("/api/chat-rooms")
            .json(&json!({}))
            .reply(&routes)
            .await;

        assert_eq!(response.status(), 401, "method: {}", method);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "Unauthorized");
    }
}

// ============================================================================
// LLM providers
// ============================================================================

#[tokio::test]
async fn test_list_providers_local_includes_ollama() {
    setup_test!(_docker, _container, store);
    let (_user, token) = common::register_and_sign_in(&store, "ada").await;
    let routes = local_routes(&store);

    let response = warp::test::request()
        .method("GET")
        .path("/api/llm-providers")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    let providers = body["llmProviders"].as_array().unwrap();
    let ids: Vec<&str> = providers
        .iter()
        .map(|p| p["providerId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["google", "openai", "anthropic", "ollama"]);
}

#[tokio::test]
async fn test_list_providers_cloud_hides_ollama() {
    setup_test!(_docker, _container, store);
    let (_user, token) = common::register_and_sign_in(&store, "ada").await;
    let routes = configure_routes(
        store.clone(),
        ScriptedModel::replying(&[]),
        "test-key".to_string(),
        DeploymentEnv::Cloud,
    );

    let response = warp::test::request()
        .method("GET")
        .path("/api/llm-providers")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    let providers = body["llmProviders"].as_array().unwrap();
    let ids: Vec<&str> = providers
        .iter()
        .map(|p| p["providerId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["google", "openai", "anthropic"]);
}

#[tokio::test]
async fn test_list_providers_accepts_session_cookie() {
    setup_test!(_docker, _container, store);
    let (_user, token) = common::register_and_sign_in(&store, "ada").await;
    let routes = local_routes(&store);

    let response = warp::test::request()
        .method("GET")
        .path("/api/llm-providers")
        .header("cookie", format!("session={}", token))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
}

// ============================================================================
// Health data
// ============================================================================

#[tokio::test]
async fn test_health_data_get_patch_delete() {
    setup_test!(_docker, _container, store);
    let (user, _token) = common::register_and_sign_in(&store, "ada").await;
    let routes = local_routes(&store);

    let record = store
        .create_health_data(user.id, "sleep", &json!({ "hours": 7, "quality": "ok" }))
        .await
        .unwrap();

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/api/health-data/{}", record.id))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["healthData"]["type"], "sleep");
    assert_eq!(body["healthData"]["data"]["hours"], 7);

    // patching one field leaves the other untouched
    let response = warp::test::request()
        .method("PATCH")
        .path(&format!("/api/health-data/{}", record.id))
        .json(&json!({ "data": { "hours": 8 } }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["healthData"]["type"], "sleep");
    assert_eq!(body["healthData"]["data"]["hours"], 8);
    assert!(body["healthData"]["data"]["quality"].is_null());

    let response = warp::test::request()
        .method("PATCH")
        .path(&format!("/api/health-data/{}", record.id))
        .json(&json!({ "type": "rest" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["healthData"]["type"], "rest");
    assert_eq!(body["healthData"]["data"]["hours"], 8);

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/health-data/{}", record.id))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/api/health-data/{}", record.id))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 404);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["error"], "Health data not found");
}

#[tokio::test]
async fn test_health_data_unknown_id_is_not_found() {
    setup_test!(_docker, _container, store);
    let routes = local_routes(&store);
    let id = Uuid::new_v4();

    for (method, body) in [
        ("GET", None),
        ("PATCH", Some(json!({ "type": "sleep" }))),
        ("DELETE", None),
    ] {
        let mut request = warp::test::request()
            .method(method)
            .path(&format!("/api/health-data/{}", id));
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = request.reply(&routes).await;

        assert_eq!(response.status(), 404, "method: {}", method);
        let reply: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(reply["error"], "Health data not found");
    }
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_page_gate_redirects_unauthenticated_to_login() {
    setup_test!(_docker, _container, store);
    let routes = local_routes(&store);

    let response = warp::test::request()
        .method("GET")
        .path("/")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 303);
    assert_eq!(response.headers().get("location").unwrap(), "/login");
}

#[tokio::test]
async fn test_page_gate_serves_shell_with_session() {
    setup_test!(_docker, _container, store);
    let (_user, token) = common::register_and_sign_in(&store, "ada").await;
    let routes = local_routes(&store);

    let response = warp::test::request()
        .method("GET")
        .path("/chat")
        .header("cookie", format!("session={}", token))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
    assert!(std::str::from_utf8(response.body())
        .unwrap()
        .contains("signed in"));
}

#[tokio::test]
async fn test_login_page_always_served() {
    setup_test!(_docker, _container, store);
    let routes = local_routes(&store);

    let response = warp::test::request()
        .method("GET")
        .path("/login")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_unknown_api_path_is_json_not_found() {
    setup_test!(_docker, _container, store);
    let routes = local_routes(&store);

    let response = warp::test::request()
        .method("GET")
        .path("/api/does-not-exist")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 404);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert!(body.get("error").is_some());
}
