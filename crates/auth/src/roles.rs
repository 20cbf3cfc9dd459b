use core::str::FromStr;

use serde::{Deserialize, Serialize};

use forsee_core::DomainError;

/// Authorization tier chosen by the user after every sign-in.
///
/// Stored durably as its lowercase name (`admin`, `engineer`, `viewer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Engineer,
    Viewer,
}

impl Role {
    /// Every selectable role, in presentation order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Engineer, Role::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Engineer => "engineer",
            Role::Viewer => "viewer",
        }
    }

    /// Presentation data for the role-selection gate.
    pub fn option(&self) -> RoleOption {
        match self {
            Role::Admin => RoleOption {
                role: *self,
                title: "Admin",
                description: "Full platform control. Manage users, billing, and configurations.",
                features: &["User Management", "Billing & Plans", "All Core Features"],
            },
            Role::Engineer => RoleOption {
                role: *self,
                title: "Engineer",
                description: "Operational access. Manage models, assets, and simulations.",
                features: &["Model Training", "Asset Management", "Simulations"],
            },
            Role::Viewer => RoleOption {
                role: *self,
                title: "Viewer",
                description: "Read-only access. Monitor assets and view dashboards.",
                features: &["View Dashboards", "Monitor Assets", "Read-only Mode"],
            },
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "engineer" => Ok(Role::Engineer),
            "viewer" => Ok(Role::Viewer),
            other => Err(DomainError::unknown("role", other)),
        }
    }
}

/// A role card as presented by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleOption {
    pub role: Role,
    pub title: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
}
