//! Router assembly.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::pages;

/// Builds the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::home_page))
        // Accounts
        .route("/accounts/", get(auth::login_page))
        .route("/accounts/logout", get(auth::logout))
        // Policy acceptance
        .route(
            "/policies/update",
            get(auth::policy_update_page).post(auth::acknowledge_policy),
        )
        // Invitations
        .route("/invitations/", get(auth::invitations_page))
        .route(
            "/invitations/{invitation_id}/accept",
            post(auth::accept_invitation),
        )
        .route(
            "/invitations/{invitation_id}/decline",
            post(auth::decline_invitation),
        )
        // Protected pages
        .route("/channels/{channel_id}", get(pages::channel_page))
        .route("/administration/", get(pages::admin_page))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
