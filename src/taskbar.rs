//! Taskbar view of the window list and what a click on an entry does.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::window::{WindowId, WindowInstance};

/// What clicking the taskbar entry of the already-active window does.
///
/// Both policies restore and focus a minimized window and focus any other
/// window; they only differ for the window that is already in front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskbarClickPolicy {
    /// Clicking the active window just keeps it focused.
    #[default]
    FocusOnly,
    /// Clicking the active window minimizes it.
    ToggleMinimize,
}

impl TaskbarClickPolicy {
    pub fn resolve(self, minimized: bool, active: bool) -> TaskbarClick {
        if minimized {
            TaskbarClick::Restore
        } else if active && self == TaskbarClickPolicy::ToggleMinimize {
            TaskbarClick::Minimize
        } else {
            TaskbarClick::Focus
        }
    }
}

impl fmt::Display for TaskbarClickPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskbarClickPolicy::FocusOnly => f.write_str("focus-only"),
            TaskbarClickPolicy::ToggleMinimize => f.write_str("toggle-minimize"),
        }
    }
}

impl FromStr for TaskbarClickPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus-only" => Ok(TaskbarClickPolicy::FocusOnly),
            "toggle-minimize" => Ok(TaskbarClickPolicy::ToggleMinimize),
            other => Err(format!("unknown taskbar click policy `{other}`")),
        }
    }
}

/// Outcome of a taskbar click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarClick {
    /// Un-minimize, then bring to front.
    Restore,
    Minimize,
    Focus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub id: WindowId,
    pub title: String,
    pub minimized: bool,
    pub active: bool,
}

/// One entry per window in collection order, with the active one flagged.
pub fn entries(windows: &[WindowInstance], active: Option<WindowId>) -> Vec<TaskbarEntry> {
    windows
        .iter()
        .map(|w| TaskbarEntry {
            id: w.id,
            title: w.title.clone(),
            minimized: w.minimized,
            active: Some(w.id) == active,
        })
        .collect()
}
