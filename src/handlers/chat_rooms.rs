//! POST/GET /api/chat-rooms

use tracing::error;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::AuthenticatedUser;
use crate::models::{ChatRoomListResponse, ChatRoomResponse, CreateChatRoomRequest, ErrorBody};
use crate::store::Store;

const DEFAULT_ROOM_NAME: &str = "New chat";

/// Create a room for the caller, bound to one of their assistant modes
pub async fn create_chat_room_handler(
    user: AuthenticatedUser,
    request: CreateChatRoomRequest,
    store: Store,
) -> Result<impl Reply, Rejection> {
    let name = request.name.unwrap_or_else(|| DEFAULT_ROOM_NAME.to_string());

    match store
        .create_chat_room(user.user_id, &name, request.assistant_mode_id)
        .await
    {
        Ok(chat_room) => Ok(warp::reply::with_status(
            warp::reply::json(&ChatRoomResponse { chat_room }),
            StatusCode::CREATED,
        )),
        Err(e) if e.is_not_found() => Ok(warp::reply::with_status(
            warp::reply::json(&ErrorBody::new("Assistant mode not found")),
            StatusCode::NOT_FOUND,
        )),
        Err(e) => {
            error!(error = %e, "chat room creation failed");
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody::new("An error occurred")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// List the caller's rooms, most recently active first
pub async fn list_chat_rooms_handler(
    user: AuthenticatedUser,
    store: Store,
) -> Result<impl Reply, Rejection> {
    match store.list_chat_rooms(user.user_id).await {
        Ok(chat_rooms) => Ok(warp::reply::with_status(
            warp::reply::json(&ChatRoomListResponse { chat_rooms }),
            StatusCode::OK,
        )),
        Err(e) => {
            error!(error = %e, "chat room listing failed");
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody::new("An error occurred")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
