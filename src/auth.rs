//! Session gate and password hashing
//!
//! Protected routes attach [`with_session`], which resolves the caller's
//! opaque session token (Bearer header or `session` cookie) against the
//! store before the handler runs. Missing or unknown tokens reject with
//! [`Unauthorized`] and cause no side effects.

use uuid::Uuid;
use warp::{Filter, Rejection};

use crate::store::Store;

/// The resolved caller, threaded into protected handlers
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Rejection raised when no valid session accompanies the request
#[derive(Debug)]
pub struct Unauthorized;

impl warp::reject::Reject for Unauthorized {}

/// Rejection wrapping unexpected store failures during session resolution
#[derive(Debug)]
pub struct AuthStoreFailure(pub String);

impl warp::reject::Reject for AuthStoreFailure {}

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Check a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Extract the session token from an Authorization header or cookie value
fn session_token(authorization: Option<&str>, cookie: Option<&str>) -> Option<Uuid> {
    let raw = authorization
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .or(cookie)?;

    Uuid::parse_str(raw).ok()
}

/// Filter yielding the authenticated caller, rejecting with 401 otherwise
pub fn with_session(
    store: Store,
) -> impl Filter<Extract = (AuthenticatedUser,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(warp::cookie::optional::<String>("session"))
        .and_then(move |authorization: Option<String>, cookie: Option<String>| {
            let store = store.clone();
            async move {
                let token = session_token(authorization.as_deref(), cookie.as_deref())
                    .ok_or_else(|| warp::reject::custom(Unauthorized))?;

                let session = store
                    .find_session(token)
                    .await
                    .map_err(|e| warp::reject::custom(AuthStoreFailure(e.to_string())))?
                    .ok_or_else(|| warp::reject::custom(Unauthorized))?;

                Ok::<_, Rejection>(AuthenticatedUser {
                    user_id: session.user_id,
                })
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_from_bearer_header() {
        let id = Uuid::new_v4();
        let header = format!("Bearer {}", id);
        assert_eq!(session_token(Some(&header), None), Some(id));
    }

    #[test]
    fn test_session_token_from_cookie() {
        let id = Uuid::new_v4();
        let cookie = id.to_string();
        assert_eq!(session_token(None, Some(&cookie)), Some(id));
    }

    #[test]
    fn test_session_token_header_wins_over_cookie() {
        let header_id = Uuid::new_v4();
        let cookie_id = Uuid::new_v4();
        let header = format!("Bearer {}", header_id);
        let cookie = cookie_id.to_string();
        assert_eq!(
            session_token(Some(&header), Some(&cookie)),
            Some(header_id)
        );
    }

    #[test]
    fn test_session_token_rejects_garbage() {
        assert_eq!(session_token(None, None), None);
        assert_eq!(session_token(Some("Basic abc"), None), None);
        assert_eq!(session_token(None, Some("not-a-uuid")), None);
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-hash"));
    }
}
