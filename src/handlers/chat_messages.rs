//! GET/POST /api/chat-rooms/{id}/messages — the chat exchange flow

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;
use warp::http::StatusCode;
use warp::hyper::Body;
use warp::{Rejection, Reply};

use crate::auth::AuthenticatedUser;
use crate::llm::{ChatModel, DEFAULT_MODEL};
use crate::models::{ChatMessageListResponse, ErrorBody, SendMessageRequest};
use crate::prompt;
use crate::relay::relay;
use crate::store::Store;

/// GET handler: full history, ascending by creation time. An unknown room
/// yields an empty list.
pub async fn list_messages_handler(room_id: Uuid, store: Store) -> Result<impl Reply, Rejection> {
    match store.list_chat_messages(room_id).await {
        Ok(chat_messages) => Ok(warp::reply::with_status(
            warp::reply::json(&ChatMessageListResponse { chat_messages }),
            StatusCode::OK,
        )),
        Err(e) => {
            error!(error = %e, %room_id, "failed to list chat messages");
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody::new("An error occurred")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// POST handler: commit the user message, assemble the prompt and stream
/// the assistant's reply back as newline-delimited JSON frames.
///
/// The append-and-read transaction runs before the response starts, so an
/// unknown room is still a plain 404; everything after that point reports
/// failures as an error frame on the already-open stream.
pub async fn send_message_handler(
    room_id: Uuid,
    user: AuthenticatedUser,
    request: SendMessageRequest,
    store: Store,
    model: Arc<dyn ChatModel>,
    api_key: String,
) -> Result<warp::reply::Response, Rejection> {
    let context = match store
        .begin_exchange(room_id, user.user_id, &request.content, request.role)
        .await
    {
        Ok(context) => context,
        Err(e) if e.is_not_found() => {
            return Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody::new("Chat room not found")),
                StatusCode::NOT_FOUND,
            )
            .into_response())
        }
        Err(e) => {
            error!(error = %e, %room_id, "append-and-read transaction failed");
            return Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody::new("An error occurred")),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response());
        }
    };

    // Fall back to the default model and remember the choice for the room's
    // subsequent turns.
    let model_id = match context.room.llm_provider_model_id.clone() {
        Some(model_id) => model_id,
        None => {
            if let Err(e) = store.set_room_model(room_id, DEFAULT_MODEL).await {
                warn!(error = %e, %room_id, "could not persist default model");
            }
            DEFAULT_MODEL.to_string()
        }
    };

    let transcript =
        prompt::build_transcript(&context.system_prompt, &context.health_data, &context.history);
    info!(%room_id, model = %model_id, turns = transcript.len(), "starting exchange");

    let upstream = {
        let model = Arc::clone(&model);
        async move { model.stream_chat(&api_key, &model_id, &transcript).await }
    };
    let finalize_store = store.clone();
    let body_stream = relay(upstream, move |full_reply| async move {
        finalize_store.finalize_exchange(room_id, &full_reply).await
    });

    let response = warp::http::Response::builder()
        .header("content-type", "text/event-stream")
        .header("cache-control", "no-cache")
        .header("connection", "keep-alive")
        .body(Body::wrap_stream(body_stream));

    match response {
        Ok(response) => Ok(response),
        Err(e) => {
            error!(error = %e, "failed to build streaming response");
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody::new("An error occurred")),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response())
        }
    }
}
