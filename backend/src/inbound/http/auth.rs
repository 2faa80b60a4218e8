//! Authentication helpers used by HTTP handlers.
//!
//! Every authenticated request goes through [`authenticate`], which also
//! announces the refreshed session so the reconciler can catch up on
//! identities whose tenant record is still missing.

use crate::domain::{Access, AdminGrant, Identity};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Require a signed-in identity and publish a session refresh.
pub async fn authenticate(session: &SessionContext, state: &HttpState) -> ApiResult<Identity> {
    let identity = session.require_identity()?;
    state.sessions.refresh(&identity).await;
    Ok(identity)
}

/// Authenticate and resolve the caller's effective role.
pub async fn authorize(session: &SessionContext, state: &HttpState) -> ApiResult<Access> {
    let identity = authenticate(session, state).await?;
    Ok(state.access.resolve(&identity).await)
}

/// Authenticate and require an admin role backed by the tenant record.
pub async fn require_admin(
    session: &SessionContext,
    state: &HttpState,
) -> ApiResult<(Access, AdminGrant)> {
    let identity = authenticate(session, state).await?;
    state.access.require_admin(&identity).await
}
