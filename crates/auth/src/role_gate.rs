//! Mandatory role selection for authenticated, roleless sessions.
//!
//! Visibility is a pure function of the session snapshot, so the gate needs
//! no lifecycle of its own: it reappears whenever a sign-in clears the role.
//! The only state it carries is the uncommitted choice.

use serde::Serialize;

use crate::roles::{Role, RoleOption};
use crate::session::{SessionState, SessionStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleGate {
    selected: Option<Role>,
}

/// What the gate shows when open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleGateView {
    pub greeting: String,
    pub options: Vec<RoleGateOption>,
    pub confirm_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleGateOption {
    #[serde(flatten)]
    pub option: RoleOption,
    pub is_selected: bool,
}

impl RoleGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open iff someone is signed in and no role is committed.
    pub fn is_visible(state: &SessionState) -> bool {
        state.is_authenticated() && state.role.is_none()
    }

    /// Record a local, uncommitted choice.
    pub fn select(&mut self, role: Role) {
        self.selected = Some(role);
    }

    pub fn selected(&self) -> Option<Role> {
        self.selected
    }

    pub fn can_confirm(&self) -> bool {
        self.selected.is_some()
    }

    /// Commit the local choice. Returns the committed role, or `None` when
    /// nothing was selected, the gate is closed, or the store refused it.
    pub fn confirm(&mut self, store: &SessionStore) -> Option<Role> {
        if !Self::is_visible(&store.snapshot()) {
            tracing::debug!("role gate closed; confirm ignored");
            self.selected = None;
            return None;
        }
        let role = self.selected.take()?;
        store.assign_role(Some(role));
        if store.role() != Some(role) {
            return None;
        }
        tracing::debug!(role = role.as_str(), "role gate confirmed");
        Some(role)
    }

    /// Render the gate for `state`, or `None` when it is hidden.
    pub fn view(&self, state: &SessionState) -> Option<RoleGateView> {
        if !Self::is_visible(state) {
            return None;
        }
        let name = state.user.as_ref().map(|u| u.name.as_str()).unwrap_or_default();
        Some(RoleGateView {
            greeting: format!("Welcome, {name}"),
            options: Role::ALL
                .iter()
                .map(|role| RoleGateOption {
                    option: role.option(),
                    is_selected: self.selected == Some(*role),
                })
                .collect(),
            confirm_enabled: self.can_confirm(),
        })
    }
}
