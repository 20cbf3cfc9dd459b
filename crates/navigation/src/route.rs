//! Route table.

use serde::Serialize;

/// Pre-catalog asset pages that still resolve to the asset detail view.
pub const LEGACY_ASSET_ALIASES: [&str; 8] = [
    "wind-turbines",
    "power-transformers",
    "industrial-motors",
    "bridges",
    "servers",
    "icu-monitoring",
    "cnc-machines",
    "hvac-systems",
];

/// A resolved client-side route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Route {
    Home,
    Systems,
    SystemDetail { slug: String },
    SystemPrediction { slug: String },
    Dashboard,
    OutputPreview,
    Chatbot,
    Pricing,
    LegacyAsset { slug: &'static str },
    Login,
    Signup,
    Legal,
    NotFound { path: String },
}

impl Route {
    /// Resolve a path. Query strings and fragments are ignored, as is a
    /// trailing slash. Anything unmatched is `NotFound`.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .strip_prefix('/')
            .unwrap_or(trimmed)
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["systems"] => Route::Systems,
            ["system", slug] => Route::SystemDetail {
                slug: (*slug).to_string(),
            },
            ["system", slug, "prediction"] => Route::SystemPrediction {
                slug: (*slug).to_string(),
            },
            ["dashboard"] => Route::Dashboard,
            ["output-preview"] => Route::OutputPreview,
            ["chatbot"] => Route::Chatbot,
            ["pricing"] => Route::Pricing,
            ["login"] => Route::Login,
            ["signup"] => Route::Signup,
            ["legal"] => Route::Legal,
            [alias] => match LEGACY_ASSET_ALIASES.iter().find(|a| *a == alias) {
                Some(slug) => Route::LegacyAsset { slug: *slug },
                None => Route::NotFound {
                    path: path.to_string(),
                },
            },
            _ => Route::NotFound {
                path: path.to_string(),
            },
        }
    }

    /// Whether the navigation guard applies. Sign-in, sign-up and legal pages
    /// are always reachable; so is the not-found page.
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            Route::Login | Route::Signup | Route::Legal | Route::NotFound { .. }
        )
    }

    /// Routes on which the navigation bar is hidden.
    pub fn hides_nav(&self) -> bool {
        matches!(self, Route::Login | Route::Signup)
    }

    /// Asset slug for the detail and prediction views, legacy aliases included.
    pub fn asset_slug(&self) -> Option<&str> {
        match self {
            Route::SystemDetail { slug } | Route::SystemPrediction { slug } => Some(slug.as_str()),
            Route::LegacyAsset { slug } => Some(*slug),
            _ => None,
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Systems => "/systems".to_string(),
            Route::SystemDetail { slug } => format!("/system/{slug}"),
            Route::SystemPrediction { slug } => format!("/system/{slug}/prediction"),
            Route::Dashboard => "/dashboard".to_string(),
            Route::OutputPreview => "/output-preview".to_string(),
            Route::Chatbot => "/chatbot".to_string(),
            Route::Pricing => "/pricing".to_string(),
            Route::LegacyAsset { slug } => format!("/{slug}"),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Legal => "/legal".to_string(),
            Route::NotFound { path } => path.clone(),
        }
    }
}
