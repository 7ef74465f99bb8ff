//! Channel page.

use axum::{
    extract::{Path, State},
    http::Uri,
};
use std::sync::Arc;
use studio_authz::{AccessRequest, Action};

use crate::auth::{
    AccessRejection, AppState, CurrentIdentity, admit, middleware::request_path,
};

/// Opens a channel in edit or view mode depending on the user's relationship.
///
/// The channel id is passed through unparsed; malformed ids answer exactly
/// like channels the user cannot see.
pub async fn channel_page(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(channel_id): Path<String>,
    uri: Uri,
) -> Result<String, AccessRejection> {
    let request = AccessRequest::channel(request_path(&uri), channel_id.as_str(), Action::View);
    let grant = admit(&state, &identity, &request).await?;

    let mode = if grant.can_write() { "edit" } else { "view" };
    Ok(format!("Channel {channel_id} ({mode})"))
}
