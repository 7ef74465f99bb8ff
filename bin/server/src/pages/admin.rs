//! Administration page.

use axum::{extract::State, http::Uri};
use std::sync::Arc;
use studio_authz::AccessRequest;
use tracing::info;

use crate::auth::{
    AccessRejection, AppState, CurrentIdentity, admit, middleware::request_path,
};

/// Serves the administration overview. Admins only.
pub async fn admin_page(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    uri: Uri,
) -> Result<String, AccessRejection> {
    let request = AccessRequest::administration(request_path(&uri));
    admit(&state, &identity, &request).await?;

    let users = state.store.user_count().await;
    let channels = state.store.channel_count().await;
    info!(user_id = ?identity.user_id(), users, channels, "served administration overview");

    Ok(format!("Administration\nUsers: {users}\nChannels: {channels}"))
}
