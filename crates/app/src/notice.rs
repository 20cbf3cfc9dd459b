//! Transient user-facing notifications (toasts).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            description: Some(description.into()),
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: Some(description.into()),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: None,
        }
    }
}
