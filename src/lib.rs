pub mod actions;
pub mod apps;
pub mod config;
pub mod constants;
pub mod jitter;
pub mod keybindings;
pub mod layout;
pub mod persist;
pub mod script;
pub mod taskbar;
pub mod tracing_sub;
pub mod window;

pub use layout::{Rect, SnapEdge, Viewport};
pub use window::{Snapshot, WindowId, WindowInstance, WindowManager, WindowManagerOptions};
