//! Known applications and their default window titles.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppInfo {
    pub id: &'static str,
    pub title: &'static str,
}

pub const FALLBACK_TITLE: &str = "App";

pub const APPS: &[AppInfo] = &[
    AppInfo {
        id: "notes",
        title: "Notes",
    },
    AppInfo {
        id: "files",
        title: "Files",
    },
    AppInfo {
        id: "settings",
        title: "Settings",
    },
];

pub fn lookup(app_id: &str) -> Option<&'static AppInfo> {
    APPS.iter().find(|app| app.id == app_id)
}

/// Registered title, or [`FALLBACK_TITLE`] for unknown apps.
pub fn title_for(app_id: &str) -> &'static str {
    lookup(app_id).map_or(FALLBACK_TITLE, |app| app.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles() {
        assert_eq!(title_for("notes"), "Notes");
        assert_eq!(title_for("settings"), "Settings");
        assert_eq!(title_for("paint"), FALLBACK_TITLE);
    }
}
