//! In-memory navigation history.

use serde::Serialize;

use forsee_core::TransitionId;

use crate::route::Route;

/// One history entry.
///
/// `transition` names a handoff payload attached to the transition that
/// created this entry; `from` records the location a guard redirect
/// interrupted, so sign-in can resume there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub transition: Option<TransitionId>,
    pub from: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            transition: None,
            from: None,
        }
    }

    pub fn route(&self) -> Route {
        Route::parse(&self.path)
    }

    /// Where a successful sign-in on this entry should go next.
    pub fn resume_target(&self) -> &str {
        self.from.as_deref().unwrap_or("/")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Overwrite the current entry instead of pushing a new one.
    pub replace: bool,
    pub transition: Option<TransitionId>,
    pub from: Option<String>,
}

impl NavigateOptions {
    pub fn replace() -> Self {
        Self {
            replace: true,
            ..Self::default()
        }
    }

    pub fn with_transition(mut self, id: TransitionId) -> Self {
        self.transition = Some(id);
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Linear history stack with a cursor, browser style: pushing after going
/// back drops the forward entries.
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Vec<Location>,
    cursor: usize,
}

impl Navigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![Location::new(initial)],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn navigate(&mut self, path: impl Into<String>, options: NavigateOptions) -> &Location {
        let location = Location {
            path: path.into(),
            transition: options.transition,
            from: options.from,
        };
        tracing::debug!(path = %location.path, replace = options.replace, "navigate");

        if options.replace {
            self.entries[self.cursor] = location;
        } else {
            self.entries.truncate(self.cursor + 1);
            self.entries.push(location);
            self.cursor += 1;
        }
        self.current()
    }

    /// Step back one entry. Returns `false` at the start of history.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one entry. Returns `false` at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Simulate a reload: same path, transition-scoped state dropped.
    pub fn reload(&mut self) {
        let entry = &mut self.entries[self.cursor];
        entry.transition = None;
    }
}
