//! Navigation guard for protected routes.
//!
//! - No IO
//! - No panics
//! - Branches only on session state that is always well-defined

use serde::Serialize;

use forsee_auth::SessionState;

use crate::history::Location;

/// Path of the sign-in view every redirect lands on.
pub const LOGIN_PATH: &str = "/login";

/// Outcome of guarding one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Session not hydrated yet; show a neutral loading indicator only.
    Loading,
    /// Not signed in; go to sign-in and remember where we were.
    Redirect(Redirect),
    Render,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: String,
    pub from: String,
    /// Always true: the guarded page must not be reachable via back.
    pub replace: bool,
}

/// Decide whether `location` may render for `state`.
///
/// Public routes always render; protected ones go through the loading and
/// authentication checks in that order.
pub fn guard(state: &SessionState, location: &Location) -> GuardDecision {
    if !location.route().is_protected() {
        return GuardDecision::Render;
    }
    if state.is_loading {
        return GuardDecision::Loading;
    }
    if !state.is_authenticated() {
        tracing::debug!(from = %location.path, "guard redirect to sign-in");
        return GuardDecision::Redirect(Redirect {
            to: LOGIN_PATH.to_string(),
            from: location.path.clone(),
            replace: true,
        });
    }
    GuardDecision::Render
}

#[cfg(test)]
mod tests {
    use super::*;
    use forsee_auth::{Role, User};
    use proptest::prelude::*;

    fn signed_in(role: Option<Role>) -> SessionState {
        SessionState {
            user: Some(User::new("Ada", "ada@forsee.ai")),
            role,
            is_loading: false,
        }
    }

    #[test]
    fn loading_blocks_protected_routes_only() {
        let loading = SessionState::loading();
        assert_eq!(guard(&loading, &Location::new("/dashboard")), GuardDecision::Loading);
        assert_eq!(guard(&loading, &Location::new("/login")), GuardDecision::Render);
    }

    #[test]
    fn unauthenticated_dashboard_redirects_with_origin() {
        let decision = guard(&SessionState::signed_out(), &Location::new("/dashboard"));
        assert_eq!(
            decision,
            GuardDecision::Redirect(Redirect {
                to: "/login".into(),
                from: "/dashboard".into(),
                replace: true,
            })
        );
    }

    #[test]
    fn roleless_session_still_renders() {
        // The role gate overlays the page; the guard does not care about roles.
        assert_eq!(guard(&signed_in(None), &Location::new("/systems")), GuardDecision::Render);
        assert_eq!(
            guard(&signed_in(Some(Role::Viewer)), &Location::new("/pricing")),
            GuardDecision::Render
        );
    }

    fn any_path() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("/".to_string()),
            Just("/systems".to_string()),
            Just("/dashboard".to_string()),
            Just("/chatbot".to_string()),
            Just("/legal".to_string()),
            Just("/signup".to_string()),
            "[a-z-]{1,12}".prop_map(|s| format!("/{s}")),
            "[a-z-]{1,12}".prop_map(|s| format!("/system/{s}/prediction")),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a signed-out session renders exactly the public routes.
        #[test]
        fn signed_out_renders_iff_public(path in any_path()) {
            let location = Location::new(path);
            let decision = guard(&SessionState::signed_out(), &location);
            let protected = location.route().is_protected();
            prop_assert_eq!(decision == GuardDecision::Render, !protected);
        }

        /// Property: a signed-in session always renders.
        #[test]
        fn signed_in_always_renders(path in any_path()) {
            prop_assert_eq!(guard(&signed_in(None), &Location::new(path)), GuardDecision::Render);
        }
    }
}
