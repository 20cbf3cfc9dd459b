//! Signed-in principal record.

use serde::{Deserialize, Serialize};

use forsee_core::UserId;

/// Avatar assigned to every locally fabricated identity.
pub const DEFAULT_AVATAR: &str = "/avatar.png";

/// Identity of the signed-in principal.
///
/// Serialized in the durable record as `{"id","name","email","avatarUrl"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    /// Fabricate a fresh identity with a new id and the default avatar.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            avatar_url: Some(DEFAULT_AVATAR.to_string()),
        }
    }

    /// Display name derived from an email address: its local part.
    pub fn name_from_email(email: &str) -> &str {
        email.split_once('@').map_or(email, |(local, _)| local)
    }
}
