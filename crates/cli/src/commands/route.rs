//! Route guard evaluation.

use marchenet_storefront::{GuardState, RouteGuard, RouteTable, SessionState};

use super::Context;

/// Resolve the session, then report what the guard decides for `path`.
pub async fn check(ctx: &Context, path: &str) {
    let state = SessionState::new();
    let guard = RouteGuard::new(RouteTable::default(), state.clone());
    let access = guard.table().access_for(path);
    ctx.api.watch_session(&state);

    state.refresh(&ctx.resolver()).await;

    match guard.check(path) {
        GuardState::Authorized => tracing::info!("{path}: allowed ({access:?})"),
        GuardState::Redirect(target) => {
            tracing::info!("{path}: redirected to {target} ({access:?})");
        }
        GuardState::Loading => tracing::info!("{path}: session still loading"),
    }
}
