//! GET /api/llm-providers

use tracing::error;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::AuthenticatedUser;
use crate::config::DeploymentEnv;
use crate::models::{ErrorBody, LlmProviderListResponse};
use crate::store::{seed, LlmProvider, Store};

/// Drop providers that only make sense on a developer machine from hosted
/// deployments
pub fn visible_providers(providers: Vec<LlmProvider>, env: DeploymentEnv) -> Vec<LlmProvider> {
    providers
        .into_iter()
        .filter(|provider| {
            env != DeploymentEnv::Cloud || provider.provider_id != seed::LOCAL_ONLY_PROVIDER_ID
        })
        .collect()
}

/// List the caller's provider slots by stored rank, filtered for the
/// deployment environment
pub async fn list_llm_providers_handler(
    user: AuthenticatedUser,
    store: Store,
    env: DeploymentEnv,
) -> Result<impl Reply, Rejection> {
    match store.list_llm_providers(user.user_id).await {
        Ok(providers) => Ok(warp::reply::with_status(
            warp::reply::json(&LlmProviderListResponse {
                llm_providers: visible_providers(providers, env),
            }),
            StatusCode::OK,
        )),
        Err(e) => {
            error!(error = %e, "provider listing failed");
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody::new("An error occurred")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
