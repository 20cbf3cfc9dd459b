//! Typed view models produced by [`crate::App::render`].

use std::collections::BTreeMap;

use serde::Serialize;

use forsee_auth::RoleGateView;
use forsee_prediction::{Device, OutputView, SystemProfile};

use crate::notice::Notice;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub href: String,
}

/// Main content for the current location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    /// Session still hydrating.
    Loading,
    Login {
        resume_to: String,
    },
    Signup,
    Legal,
    Home {
        greeting: String,
    },
    Catalog {
        systems: Vec<CatalogEntry>,
    },
    SystemInput {
        slug: String,
        profile: &'static SystemProfile,
        values: BTreeMap<String, String>,
    },
    Results {
        #[serde(flatten)]
        view: OutputView,
        disclosure: Option<&'static str>,
    },
    Dashboard {
        devices: Vec<Device>,
    },
    Chatbot,
    Pricing,
    NotFound {
        path: String,
    },
}

/// Everything a UI needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub path: String,
    pub screen: Screen,
    /// Present while the role gate covers the screen; the screen underneath
    /// stays mounted but inert.
    pub role_gate: Option<RoleGateView>,
    pub nav_visible: bool,
    pub notices: Vec<Notice>,
}
