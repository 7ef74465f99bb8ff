//! Identity extractors and admission helpers for Axum.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, Uri, header, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use std::sync::Arc;
use studio_authz::{AccessRequest, Admission, Decision, Grant, POLICY_UPDATE_PATH, login_url};
use studio_platform_access::{Identity, SessionId, User};
use time::Duration as TimeDuration;
use tracing::debug;

use super::AppState;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Cookie holding the destination to resume at after policy acceptance.
pub const POLICY_NEXT_COOKIE: &str = "policy_next";

/// Builds a `302 Found` redirect.
///
/// `axum::response::Redirect` only produces 303, 307 and 308.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Returns the path and query of a request URI.
pub fn request_path(uri: &Uri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string())
}

/// Extractor for the identity making the request.
///
/// Never rejects: a missing, unknown or expired session yields
/// [`Identity::Anonymous`].
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(session_cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(CurrentIdentity(Identity::Anonymous));
        };

        let session_id = SessionId::new(session_cookie.value().to_string());
        match app_state.store.resolve_identity(&session_id).await {
            Ok(identity) => Ok(CurrentIdentity(identity)),
            Err(report) => {
                debug!(error = %report, "no usable session, treating request as anonymous");
                Ok(CurrentIdentity(Identity::Anonymous))
            }
        }
    }
}

/// Extractor for requiring a signed-in user.
///
/// Anonymous requests are redirected to login. The policy gate is not
/// applied, so this is only for the policy pages themselves.
pub struct RequireUser(pub User);

impl<S> FromRequestParts<S> for RequireUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AccessRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(CurrentIdentity(identity)) = CurrentIdentity::from_request_parts(parts, state).await;

        match identity {
            Identity::Authenticated(user) => Ok(RequireUser(user)),
            Identity::Anonymous => Err(AccessRejection::Login {
                next: request_path(&parts.uri),
            }),
        }
    }
}

/// Runs a protected request through the policy gate and the authorizer.
///
/// # Errors
///
/// Returns the rejection the dispatcher must answer with when the request
/// is not allowed.
pub async fn admit(
    state: &AppState,
    identity: &Identity,
    request: &AccessRequest,
) -> Result<Grant, AccessRejection> {
    match state.access.admit(identity, request).await {
        Admission::PolicyUpdateRequired { next, .. } => Err(AccessRejection::PolicyUpdate {
            next,
            secure_cookie: state.session_config.secure_cookies,
        }),
        Admission::Decided(Decision::Allowed(grant)) => Ok(grant),
        Admission::Decided(Decision::RedirectLogin { next }) => {
            Err(AccessRejection::Login { next })
        }
        Admission::Decided(Decision::NotFound) => Err(AccessRejection::NotFound),
        Admission::Decided(Decision::Forbidden) => Err(AccessRejection::Forbidden),
    }
}

/// Runs the policy gate alone, for pages without a resource check.
///
/// # Errors
///
/// Returns [`AccessRejection::PolicyUpdate`] when the signed-in user has
/// outstanding policies.
pub fn require_policies(
    state: &AppState,
    identity: &Identity,
    path: &str,
) -> Result<(), AccessRejection> {
    match state.access.gate(identity, path) {
        Some(Admission::PolicyUpdateRequired { next, .. }) => Err(AccessRejection::PolicyUpdate {
            next,
            secure_cookie: state.session_config.secure_cookies,
        }),
        _ => Ok(()),
    }
}

/// Rejection for protected requests.
#[derive(Debug)]
pub enum AccessRejection {
    /// Anonymous; redirect to login and resume at `next`.
    Login { next: String },
    /// Outstanding policies; redirect to the policy page and remember `next`.
    PolicyUpdate { next: String, secure_cookie: bool },
    /// No such channel, or no relationship to it.
    NotFound,
    /// Signed in without the required privilege.
    Forbidden,
}

impl IntoResponse for AccessRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Login { next } => found(&login_url(&next)),
            Self::PolicyUpdate {
                next,
                secure_cookie,
            } => {
                let cookie = Cookie::build((POLICY_NEXT_COOKIE, urlencoding::encode(&next).into_owned()))
                    .path("/")
                    .http_only(true)
                    .secure(secure_cookie)
                    .same_site(SameSite::Lax)
                    .max_age(TimeDuration::minutes(30));

                (CookieJar::new().add(cookie), found(POLICY_UPDATE_PATH)).into_response()
            }
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
        }
    }
}
