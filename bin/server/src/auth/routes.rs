//! Account and policy acknowledgment routes.

use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use std::sync::Arc;
use studio_authz::POLICY_UPDATE_PATH;
use studio_platform_access::SessionId;
use time::Duration as TimeDuration;
use tracing::{debug, info};

use super::{
    AppState,
    middleware::{POLICY_NEXT_COOKIE, RequireUser, SESSION_COOKIE, found},
};
use crate::error::PolicyUpdateError;

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    next: Option<String>,
}

/// Form body for acknowledging a policy.
#[derive(Debug, Deserialize)]
pub struct AcknowledgeForm {
    policy: String,
}

/// Serves the login page.
///
/// Credentials are checked by the external identity provider; this page
/// only tells the visitor where they will land afterwards.
pub async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    match query.next.filter(|next| is_local_path(next)) {
        Some(next) => format!("Sign in to continue to {next}"),
        None => "Sign in".to_string(),
    }
}

/// Logs out the user by deleting their session.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        let session_id = SessionId::new(session_cookie.value().to_string());
        state.store.delete_session(&session_id).await;
    }

    let remove_session = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    (jar.add(remove_session), found("/"))
}

/// Lists the policies the signed-in user still has to acknowledge.
pub async fn policy_update_page(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
) -> impl IntoResponse {
    let outstanding = state.policies().outstanding(&user);
    if outstanding.is_empty() {
        return "All policies acknowledged".to_string();
    }

    let lines: Vec<String> = outstanding
        .iter()
        .map(|policy| format!("- {} ({})", policy.id(), policy.version()))
        .collect();
    format!(
        "Please review and accept the updated policies:\n{}\n",
        lines.join("\n")
    )
}

/// Records acknowledgment of one policy.
///
/// Once nothing is outstanding the user resumes at the destination that
/// triggered the policy gate, or `/` if none was recorded.
///
/// # Errors
///
/// Returns `UnknownPolicy` for ids outside the mandatory set.
pub async fn acknowledge_policy(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    jar: CookieJar,
    Form(form): Form<AcknowledgeForm>,
) -> Result<Response, PolicyUpdateError> {
    let policy = state
        .policies()
        .policy(&form.policy)
        .map_err(|report| {
            debug!(error = %report, "rejected acknowledgment");
            PolicyUpdateError::UnknownPolicy {
                policy_id: form.policy.clone(),
            }
        })?
        .clone();

    let user = state
        .store
        .update_user(user.id(), |u| u.acknowledge_policy(&policy))
        .await
        .map_err(|report| PolicyUpdateError::AccountMissing {
            details: report.to_string(),
        })?;

    info!(
        user_id = %user.id(),
        policy_id = %policy.id(),
        version = %policy.version(),
        "policy acknowledged"
    );

    if !state.policies().check_policies(&user).is_empty() {
        return Ok(found(POLICY_UPDATE_PATH));
    }

    let next = jar
        .get(POLICY_NEXT_COOKIE)
        .and_then(|cookie| urlencoding::decode(cookie.value()).ok())
        .map(|next| next.into_owned())
        .filter(|next| is_local_path(next))
        .unwrap_or_else(|| "/".to_string());

    let remove_next = Cookie::build((POLICY_NEXT_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    Ok((jar.add(remove_next), found(&next)).into_response())
}

/// Returns true for same-origin absolute paths.
///
/// Rejects protocol-relative (`//host`) and backslash forms so a stored
/// destination can never redirect off-site.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
