use std::fmt;

use crate::layout::SnapEdge;

/// Window actions reachable from the keyboard. All of them target the
/// active window except [`Action::ShowDesktop`] and [`Action::CloseAll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CloseActive,
    MinimizeActive,
    MaximizeActive,
    SnapActive(SnapEdge),
    // Desktop-wide
    ShowDesktop,
    CloseAll,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::CloseActive => "Close window",
            Action::MinimizeActive => "Minimize window",
            Action::MaximizeActive => "Maximize / restore window",
            Action::SnapActive(SnapEdge::Left) => "Snap window left",
            Action::SnapActive(SnapEdge::Right) => "Snap window right",
            Action::SnapActive(SnapEdge::Top) => "Snap window top",
            Action::SnapActive(SnapEdge::Bottom) => "Snap window bottom",
            Action::ShowDesktop => "Show desktop",
            Action::CloseAll => "Close all windows",
        };
        write!(f, "{}", s)
    }
}
