use std::fmt;

use serde::Serialize;

use super::collection::WindowCollection;
use super::memory::LayoutMemory;
use super::{WindowId, WindowInstance};
use crate::actions::Action;
use crate::apps;
use crate::constants::DEFAULT_JITTER_SPAN;
use crate::jitter::{JitterSource, SeededJitter};
use crate::layout::{
    HeaderDrag, Rect, ResizeDrag, ResizeEdge, SnapEdge, SnapZone, Viewport, snap_zone_at,
};
use crate::persist::{PersistError, PersistWriter, PersistedSession, SessionStore};
use crate::taskbar::{self, TaskbarClick, TaskbarClickPolicy, TaskbarEntry};

/// Behaviour knobs for a [`WindowManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowManagerOptions {
    /// Keep moved and resized windows inside the usable viewport.
    pub clamp_to_viewport: bool,
    pub taskbar_click: TaskbarClickPolicy,
    /// Jitter range in pixels for windows opened without a remembered layout.
    pub jitter_span: i32,
}

impl Default for WindowManagerOptions {
    fn default() -> Self {
        Self {
            clamp_to_viewport: true,
            taskbar_click: TaskbarClickPolicy::default(),
            jitter_span: DEFAULT_JITTER_SPAN,
        }
    }
}

/// Immutable view of the desktop handed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Windows in creation order.
    pub windows: Vec<WindowInstance>,
    pub active: Option<WindowId>,
}

impl Snapshot {
    pub fn active_window(&self) -> Option<&WindowInstance> {
        let id = self.active?;
        self.windows.iter().find(|w| w.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Local revision captured before a session load.
///
/// See [`WindowManager::apply_hydration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct HydrationTicket {
    revision: u64,
}

type Listener = Box<dyn FnMut(&Snapshot)>;

/// The desktop's window state and the only way to change it.
///
/// Every operation runs to completion on the caller's thread. Operations on
/// unknown ids are silent no-ops and return `false`; everything else
/// notifies subscribers once and, if a writer is attached, queues the
/// session for saving.
pub struct WindowManager {
    windows: WindowCollection,
    memory: LayoutMemory,
    viewport: Option<Viewport>,
    options: WindowManagerOptions,
    jitter: Box<dyn JitterSource>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    revision: u64,
    writer: Option<(PersistWriter, String)>,
    drag_header: Option<HeaderDrag>,
    drag_resize: Option<ResizeDrag>,
}

impl fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowManager")
            .field("windows", &self.windows)
            .field("memory", &self.memory)
            .field("viewport", &self.viewport)
            .field("options", &self.options)
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(WindowManagerOptions::default())
    }
}

impl WindowManager {
    pub fn new(options: WindowManagerOptions) -> Self {
        Self::with_jitter(options, SeededJitter::from_entropy())
    }

    pub fn with_jitter(options: WindowManagerOptions, jitter: impl JitterSource + 'static) -> Self {
        Self {
            windows: WindowCollection::new(),
            memory: LayoutMemory::new(),
            viewport: None,
            options,
            jitter: Box::new(jitter),
            listeners: Vec::new(),
            next_subscription: 1,
            revision: 0,
            writer: None,
            drag_header: None,
            drag_resize: None,
        }
    }

    pub fn options(&self) -> WindowManagerOptions {
        self.options
    }

    pub fn set_taskbar_policy(&mut self, policy: TaskbarClickPolicy) {
        self.options.taskbar_click = policy;
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Supplied by the host layer whenever the screen size is known or
    /// changes. Existing windows are not moved.
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        tracing::debug!(?viewport, "viewport updated");
        self.viewport = viewport;
    }

    fn clamp_viewport(&self) -> Option<Viewport> {
        self.viewport.filter(|_| self.options.clamp_to_viewport)
    }

    // Read accessors

    pub fn windows(&self) -> &[WindowInstance] {
        self.windows.windows()
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowInstance> {
        self.windows.get(id)
    }

    /// Front-most non-minimized window.
    pub fn active_window(&self) -> Option<&WindowInstance> {
        self.windows.active()
    }

    pub fn active_id(&self) -> Option<WindowId> {
        self.active_window().map(|w| w.id)
    }

    pub fn stacking_order(&self) -> Vec<WindowId> {
        self.windows.stacking_order()
    }

    pub fn layouts(&self) -> &LayoutMemory {
        &self.memory
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            windows: self.windows.windows().to_vec(),
            active: self.active_id(),
        }
    }

    pub fn effective_rect(&self, id: WindowId) -> Option<Rect> {
        self.windows
            .get(id)
            .map(|w| w.effective_rect(self.viewport))
    }

    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        taskbar::entries(self.windows.windows(), self.active_id())
    }

    /// The session as it would be persisted right now.
    pub fn session(&self) -> PersistedSession {
        PersistedSession {
            layouts: self.memory.get_all().clone(),
            windows: self.windows.windows().to_vec(),
        }
    }

    pub fn validate(&self) -> Result<(), super::InvariantViolation> {
        self.windows.validate()
    }

    // Subscribers

    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Queue every future change for saving under `session_key`.
    pub fn attach_writer(&mut self, writer: PersistWriter, session_key: impl Into<String>) {
        self.writer = Some((writer, session_key.into()));
    }

    pub fn detach_writer(&mut self) -> Option<PersistWriter> {
        self.writer.take().map(|(writer, _)| writer)
    }

    /// Wait for queued saves, if a writer is attached.
    pub fn flush(&self) {
        if let Some((writer, _)) = &self.writer {
            writer.flush();
        }
    }

    fn changed(&mut self) {
        self.revision += 1;
        if self.listeners.is_empty() && self.writer.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
        if let Some((writer, key)) = &self.writer {
            writer.submit(key, self.session());
        }
    }

    fn commit(&mut self, changed: bool) -> bool {
        if changed {
            self.changed();
        }
        changed
    }

    // Window operations

    /// Open a window for `app_id`. Always succeeds.
    pub fn open(&mut self, app_id: &str, title: &str) -> WindowId {
        let jitter = self.jitter.offset(self.options.jitter_span);
        let id = self
            .windows
            .open(app_id, title, &self.memory, self.viewport, jitter);
        self.changed();
        id
    }

    /// Open a window titled from the app registry.
    pub fn open_app(&mut self, app_id: &str) -> WindowId {
        self.open(app_id, apps::title_for(app_id))
    }

    pub fn close(&mut self, id: WindowId) -> bool {
        self.cancel_gesture_for(id);
        let changed = self.windows.close(id);
        self.commit(changed)
    }

    pub fn close_all(&mut self) -> bool {
        self.drag_header = None;
        self.drag_resize = None;
        let changed = self.windows.close_all();
        self.commit(changed)
    }

    pub fn minimize_toggle(&mut self, id: WindowId) -> bool {
        let changed = self.windows.minimize_toggle(id);
        self.commit(changed)
    }

    pub fn minimize_all(&mut self) -> bool {
        let changed = self.windows.minimize_all();
        self.commit(changed)
    }

    pub fn maximize_toggle(&mut self, id: WindowId) -> bool {
        let changed = self.windows.maximize_toggle(id, &mut self.memory);
        self.commit(changed)
    }

    pub fn focus(&mut self, id: WindowId) -> bool {
        let changed = self.windows.focus(id);
        self.commit(changed)
    }

    pub fn move_window(&mut self, id: WindowId, x: i32, y: i32) -> bool {
        let viewport = self.clamp_viewport();
        let changed = self.windows.move_to(id, x, y, &mut self.memory, viewport);
        self.commit(changed)
    }

    pub fn resize(&mut self, id: WindowId, width: i32, height: i32) -> bool {
        let viewport = self.clamp_viewport();
        let changed = self
            .windows
            .resize(id, width, height, &mut self.memory, viewport);
        self.commit(changed)
    }

    /// Fill half the usable screen. Needs a viewport; without one this does
    /// nothing.
    pub fn snap_to_edge(&mut self, id: WindowId, edge: SnapEdge) -> bool {
        let Some(viewport) = self.viewport else {
            tracing::debug!(window_id = %id, %edge, "no viewport; ignoring snap");
            return false;
        };
        let changed = self
            .windows
            .snap_to_edge(id, edge, viewport, &mut self.memory);
        self.commit(changed)
    }

    /// Run a keyboard action. Actions aimed at the active window do nothing
    /// when every window is minimized or closed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        tracing::debug!(%action, "dispatching action");
        match (action, self.active_id()) {
            (Action::ShowDesktop, _) => self.minimize_all(),
            (Action::CloseAll, _) => self.close_all(),
            (_, None) => false,
            (Action::CloseActive, Some(id)) => self.close(id),
            (Action::MinimizeActive, Some(id)) => self.minimize_toggle(id),
            (Action::MaximizeActive, Some(id)) => self.maximize_toggle(id),
            (Action::SnapActive(edge), Some(id)) => self.snap_to_edge(id, edge),
        }
    }

    /// Taskbar entry click, resolved through the configured policy.
    pub fn taskbar_click(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        let active = self.active_id() == Some(id);
        let click = self.options.taskbar_click.resolve(window.minimized, active);
        tracing::debug!(window_id = %id, ?click, "taskbar click");
        let changed = match click {
            TaskbarClick::Restore => {
                self.windows.minimize_toggle(id);
                self.windows.focus(id)
            }
            TaskbarClick::Minimize => self.windows.minimize_toggle(id),
            TaskbarClick::Focus => self.windows.focus(id),
        };
        self.commit(changed)
    }

    // Pointer gestures

    /// Start a title-bar drag. Focuses the window; maximized windows can't
    /// be dragged.
    pub fn begin_move(&mut self, id: WindowId, pointer_x: i32, pointer_y: i32) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        if window.maximized {
            return false;
        }
        self.drag_header = Some(HeaderDrag::new(id, window.rect(), pointer_x, pointer_y));
        self.drag_resize = None;
        self.focus(id)
    }

    pub fn drag_move(&mut self, pointer_x: i32, pointer_y: i32) -> bool {
        let Some(drag) = self.drag_header else {
            return false;
        };
        let (x, y) = drag.target(pointer_x, pointer_y);
        self.move_window(drag.id, x, y)
    }

    /// Snap zone the pointer is over during a drag, for preview overlays.
    pub fn drag_snap_zone(&self, pointer_x: i32, pointer_y: i32) -> Option<SnapZone> {
        self.drag_header?;
        snap_zone_at(pointer_x, pointer_y, self.viewport?)
    }

    /// Finish a title-bar drag. If the pointer ended in a snap zone the
    /// zone is applied and returned.
    pub fn end_move(&mut self, pointer_x: i32, pointer_y: i32) -> Option<SnapZone> {
        let drag = self.drag_header.take()?;
        let zone = self
            .viewport
            .and_then(|vp| snap_zone_at(pointer_x, pointer_y, vp));
        match zone {
            Some(SnapZone::Half(edge)) => {
                self.snap_to_edge(drag.id, edge);
            }
            Some(SnapZone::Maximize) => {
                if self.windows.get(drag.id).is_some_and(|w| !w.maximized) {
                    self.maximize_toggle(drag.id);
                }
            }
            None => {
                let (x, y) = drag.target(pointer_x, pointer_y);
                self.move_window(drag.id, x, y);
            }
        }
        zone
    }

    pub fn begin_resize(
        &mut self,
        id: WindowId,
        edge: ResizeEdge,
        pointer_x: i32,
        pointer_y: i32,
    ) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        if window.maximized {
            return false;
        }
        self.drag_resize = Some(ResizeDrag::new(
            id,
            edge,
            window.rect(),
            pointer_x,
            pointer_y,
        ));
        self.drag_header = None;
        self.focus(id)
    }

    pub fn drag_resize(&mut self, pointer_x: i32, pointer_y: i32) -> bool {
        let Some(drag) = self.drag_resize else {
            return false;
        };
        let rect = drag.target(pointer_x, pointer_y);
        let viewport = self.clamp_viewport();
        let changed = self
            .windows
            .place(drag.id, rect, &mut self.memory, viewport);
        self.commit(changed)
    }

    pub fn end_resize(&mut self) -> bool {
        self.drag_resize.take().is_some()
    }

    pub fn cancel_gesture(&mut self) {
        self.drag_header = None;
        self.drag_resize = None;
    }

    fn cancel_gesture_for(&mut self, id: WindowId) {
        if self.drag_header.is_some_and(|d| d.id == id) {
            self.drag_header = None;
        }
        if self.drag_resize.is_some_and(|d| d.id == id) {
            self.drag_resize = None;
        }
    }

    // Hydration

    /// Replace layouts and windows with a persisted session.
    pub fn hydrate(&mut self, session: PersistedSession) {
        self.cancel_gesture();
        tracing::debug!(
            windows = session.windows.len(),
            layouts = session.layouts.len(),
            "hydrating session"
        );
        self.memory.replace_all(session.layouts);
        self.windows.restore(session.windows);
        self.changed();
    }

    pub fn begin_hydration(&self) -> HydrationTicket {
        HydrationTicket {
            revision: self.revision,
        }
    }

    /// Apply `session` only if nothing changed locally since `ticket` was
    /// taken. Returns whether it was applied.
    pub fn apply_hydration(&mut self, ticket: HydrationTicket, session: PersistedSession) -> bool {
        if ticket.revision != self.revision {
            tracing::debug!(
                ticket = ticket.revision,
                current = self.revision,
                "local changes since load; discarding stored session"
            );
            return false;
        }
        self.hydrate(session);
        true
    }

    /// Load `key` from `store` and hydrate from it. `Ok(false)` means there
    /// was nothing stored.
    pub fn hydrate_from(
        &mut self,
        store: &dyn SessionStore,
        key: &str,
    ) -> Result<bool, PersistError> {
        let ticket = self.begin_hydration();
        match store.load(key)? {
            Some(session) => Ok(self.apply_hydration(ticket, session)),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::jitter::NoJitter;
    use crate::persist::MemoryStore;

    fn manager() -> WindowManager {
        WindowManager::with_jitter(WindowManagerOptions::default(), NoJitter)
    }

    fn desktop() -> WindowManager {
        let mut wm = manager();
        wm.set_viewport(Some(Viewport::new(1280, 800, 40)));
        wm
    }

    fn counter(wm: &mut WindowManager) -> Rc<RefCell<Vec<Snapshot>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        wm.subscribe(move |snap| sink.borrow_mut().push(snap.clone()));
        seen
    }

    #[test]
    fn layout_memory_survives_close_and_reopen() {
        let mut wm = desktop();
        let id = wm.open_app("notes");
        assert!(wm.move_window(id, 40, 60));
        assert!(wm.resize(id, 640, 480));
        assert!(wm.close(id));
        let id = wm.open_app("notes");
        let w = wm.window(id).unwrap();
        assert_eq!(w.rect(), Rect::new(40, 60, 640, 480));
        assert_eq!(w.title, "Notes");
    }

    #[test]
    fn maximize_round_trip_keeps_windowed_rect() {
        let mut wm = desktop();
        let id = wm.open_app("files");
        assert_eq!(wm.window(id).unwrap().rect(), Rect::new(100, 100, 500, 400));
        wm.maximize_toggle(id);
        assert!(wm.window(id).unwrap().maximized);
        assert_eq!(wm.effective_rect(id), Some(Rect::new(0, 0, 1280, 760)));
        wm.maximize_toggle(id);
        let w = wm.window(id).unwrap();
        assert!(!w.maximized);
        assert_eq!(wm.effective_rect(id), Some(Rect::new(100, 100, 500, 400)));
        assert_eq!(wm.layouts().get("files").map(|l| l.maximized), Some(false));
    }

    #[test]
    fn snap_left_then_right() {
        let mut wm = desktop();
        let id = wm.open_app("notes");
        wm.maximize_toggle(id);
        assert!(wm.snap_to_edge(id, SnapEdge::Left));
        let w = wm.window(id).unwrap();
        assert_eq!(w.rect(), Rect::new(0, 0, 640, 760));
        assert!(!w.maximized);

        wm.maximize_toggle(id);
        assert!(wm.snap_to_edge(id, SnapEdge::Right));
        let w = wm.window(id).unwrap();
        assert_eq!(w.rect(), Rect::new(640, 0, 640, 760));
        assert!(!w.maximized);
        assert_eq!(wm.layouts().get("notes").map(|l| l.maximized), Some(false));
    }

    #[test]
    fn snap_without_viewport_is_ignored() {
        let mut wm = manager();
        let id = wm.open_app("notes");
        let seen = counter(&mut wm);
        assert!(!wm.snap_to_edge(id, SnapEdge::Left));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn minimize_all_leaves_no_active_window() {
        let mut wm = desktop();
        wm.open_app("notes");
        wm.open_app("files");
        assert!(wm.minimize_all());
        assert_eq!(wm.active_window(), None);
        assert!(!wm.minimize_all());
    }

    #[test]
    fn minimize_all_with_one_already_minimized() {
        let mut wm = desktop();
        wm.open_app("notes");
        let files = wm.open_app("files");
        wm.open_app("settings");
        assert!(wm.minimize_toggle(files));
        assert!(wm.minimize_all());
        assert!(wm.windows().iter().all(|w| w.minimized));
        assert_eq!(wm.windows().len(), 3);
        assert_eq!(wm.active_window(), None);
    }

    #[test]
    fn ending_a_drag_where_it_stopped_sends_nothing_new() {
        let mut wm = desktop();
        let id = wm.open_app("notes");
        let seen = counter(&mut wm);
        assert!(wm.begin_move(id, 150, 110));
        assert!(wm.drag_move(250, 210));
        let after_drag = seen.borrow().len();
        assert_eq!(wm.end_move(250, 210), None);
        assert_eq!(seen.borrow().len(), after_drag);
        assert!(!wm.move_window(id, 200, 200));
    }

    #[test]
    fn subscribers_see_changes_but_not_no_ops() {
        let mut wm = desktop();
        let seen = counter(&mut wm);
        let id = wm.open_app("notes");
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].active, Some(id));
        wm.close(id);
        wm.close(id);
        wm.focus(id);
        assert_eq!(seen.borrow().len(), 2);
        assert!(seen.borrow()[1].windows.is_empty());
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut wm = manager();
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        let sub = wm.subscribe(move |_| *sink.borrow_mut() += 1);
        wm.open_app("notes");
        assert!(wm.unsubscribe(sub));
        assert!(!wm.unsubscribe(sub));
        wm.open_app("notes");
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn dispatch_targets_active_window() {
        let mut wm = desktop();
        let a = wm.open_app("notes");
        let b = wm.open_app("files");
        assert!(wm.dispatch(Action::MinimizeActive));
        assert!(wm.window(b).unwrap().minimized);
        assert_eq!(wm.active_id(), Some(a));
        assert!(wm.dispatch(Action::SnapActive(SnapEdge::Right)));
        assert_eq!(wm.window(a).unwrap().x, 640);
        assert!(wm.dispatch(Action::CloseActive));
        assert_eq!(wm.active_id(), None);
        assert!(!wm.dispatch(Action::MaximizeActive));
        assert!(wm.dispatch(Action::CloseAll));
        assert!(wm.windows().is_empty());
    }

    #[test]
    fn taskbar_click_follows_policy() {
        let mut wm = desktop();
        let a = wm.open_app("notes");
        let b = wm.open_app("files");
        assert!(wm.taskbar_click(b));
        assert!(!wm.window(b).unwrap().minimized);

        wm.set_taskbar_policy(TaskbarClickPolicy::ToggleMinimize);
        assert!(wm.taskbar_click(b));
        assert!(wm.window(b).unwrap().minimized);
        assert_eq!(wm.active_id(), Some(a));

        assert!(wm.taskbar_click(b));
        assert!(!wm.window(b).unwrap().minimized);
        assert_eq!(wm.active_id(), Some(b));
        assert!(!wm.taskbar_click(WindowId(42)));

        let entries = wm.taskbar_entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[1].active);
    }

    #[test]
    fn header_drag_moves_then_snaps() {
        let mut wm = desktop();
        let a = wm.open_app("notes");
        let b = wm.open_app("files");
        assert!(wm.begin_move(a, 150, 110));
        assert_eq!(wm.active_id(), Some(a));
        assert!(wm.drag_move(250, 210));
        assert_eq!(wm.window(a).unwrap().rect(), Rect::new(200, 200, 500, 400));
        assert_eq!(wm.end_move(250, 210), None);

        assert!(wm.begin_move(b, 150, 110));
        assert_eq!(wm.drag_snap_zone(10, 300), Some(SnapZone::Half(SnapEdge::Left)));
        assert_eq!(
            wm.end_move(10, 300),
            Some(SnapZone::Half(SnapEdge::Left))
        );
        assert_eq!(wm.window(b).unwrap().rect(), Rect::new(0, 0, 640, 760));
        assert!(!wm.drag_move(20, 20));
    }

    #[test]
    fn dropping_on_top_edge_maximizes() {
        let mut wm = desktop();
        let id = wm.open_app("notes");
        wm.begin_move(id, 300, 110);
        assert_eq!(wm.end_move(600, 5), Some(SnapZone::Maximize));
        assert!(wm.window(id).unwrap().maximized);
        assert!(!wm.begin_move(id, 600, 5));
    }

    #[test]
    fn resize_drag_respects_minimum() {
        let mut wm = desktop();
        let id = wm.open_app("notes");
        assert!(wm.begin_resize(id, ResizeEdge::Left, 100, 300));
        assert!(wm.drag_resize(400, 300));
        assert_eq!(wm.window(id).unwrap().rect(), Rect::new(300, 100, 300, 400));
        assert!(wm.end_resize());
        assert!(!wm.drag_resize(0, 0));
    }

    #[test]
    fn stale_hydration_is_discarded() {
        let mut remote = manager();
        remote.open_app("settings");
        let session = remote.session();

        let mut wm = manager();
        let ticket = wm.begin_hydration();
        wm.open_app("notes");
        assert!(!wm.apply_hydration(ticket, session.clone()));
        assert_eq!(wm.windows()[0].app_id, "notes");

        let ticket = wm.begin_hydration();
        assert!(wm.apply_hydration(ticket, session));
        assert_eq!(wm.windows().len(), 1);
        assert_eq!(wm.windows()[0].app_id, "settings");
        let next = wm.open_app("notes");
        assert!(next > wm.windows()[0].id);
    }

    #[test]
    fn writer_receives_every_change() {
        let store = MemoryStore::new();
        let mut wm = desktop();
        wm.attach_writer(PersistWriter::spawn(store.clone()), "alice");
        let id = wm.open_app("notes");
        wm.move_window(id, 40, 60);
        wm.flush();
        let saved = store.get("alice").unwrap();
        assert_eq!(saved, wm.session());
        assert_eq!(saved.layouts["notes"].x, 40);

        let mut restored = manager();
        assert!(restored.hydrate_from(&store, "alice").unwrap());
        assert_eq!(restored.windows(), wm.windows());
        assert!(!restored.hydrate_from(&store, "bob").unwrap());
    }

    #[test]
    fn clamping_can_be_disabled() {
        let options = WindowManagerOptions {
            clamp_to_viewport: false,
            ..WindowManagerOptions::default()
        };
        let mut wm = WindowManager::with_jitter(options, NoJitter);
        wm.set_viewport(Some(Viewport::new(1280, 800, 40)));
        let id = wm.open_app("notes");
        wm.move_window(id, -200, 2000);
        assert_eq!(wm.window(id).map(|w| (w.x, w.y)), Some((-200, 2000)));
    }
}
