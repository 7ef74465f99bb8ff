//! Landing page.

use axum::{extract::State, http::Uri};
use std::sync::Arc;

use crate::auth::{
    AccessRejection, AppState, CurrentIdentity, middleware::request_path, require_policies,
};

/// Serves the landing page.
///
/// Open to anonymous visitors; signed-in users still pass the policy gate.
pub async fn home_page(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    uri: Uri,
) -> Result<&'static str, AccessRejection> {
    require_policies(&state, &identity, &request_path(&uri))?;
    Ok("Studio")
}
