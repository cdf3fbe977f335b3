//! Window Manager Module
//!
//! The authoritative desktop state machine: the set of open app windows,
//! their focus/z-order/minimise/maximise status, and the operations that
//! mutate them. Single-writer and synchronous; persistence happens after a
//! mutation returns, never inside it.

pub mod apps;
pub mod placement;
pub mod profiles;
pub mod session;

use tracing::debug;

use crate::config::WindowDefaultsConfig;
use crate::shared::{Position, Size};
use crate::wm::apps::{AppId, Persona, Theme};

/// Opaque window identifier, unique for the lifetime of a [`WindowManager`]
///
/// Allocated from a monotonic counter and never reused, so ids from a
/// previously applied layout can never collide with live windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// A single open application instance
///
/// The three status axes are independent: a window can be maximised and
/// minimised at the same time (minimising hides it from normal stacking
/// regardless of its maximised flag).
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub id: WindowId,
    pub app_id: AppId,
    /// Display label, derived from the app id at creation
    pub title: String,
    /// Top-left corner in desktop space; may leave the viewport during drags
    pub position: Position,
    pub size: Size,
    /// Stacking order; higher paints on top, unique among open windows
    pub z_index: i32,
    pub is_focused: bool,
    pub is_minimised: bool,
    /// When true the renderer fills the desktop area; position/size are
    /// retained so un-maximising restores them
    pub is_maximised: bool,
    /// Opaque routing hint for the external renderer
    pub route: Option<String>,
}

/// Initial geometry/state for a newly opened window
///
/// Produced by the app profile resolver ([`profiles::resolve_initial_window_state`])
/// or supplied directly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInit {
    pub position: Position,
    pub size: Size,
    pub is_maximised: bool,
}

/// Authoritative desktop state
///
/// Exposed read-only to the renderer; mutated only through [`WindowManager`]
/// operations.
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    /// Open windows in creation order
    pub windows: Vec<Window>,
    /// Invariant: references an existing, non-minimised window, or is None
    pub focused_window_id: Option<WindowId>,
    pub active_theme: Theme,
    pub persona: Persona,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            focused_window_id: None,
            active_theme: Theme::Daw,
            persona: Persona::Default,
        }
    }
}

impl DesktopState {
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn window_for_app(&self, app_id: AppId) -> Option<&Window> {
        self.windows.iter().find(|w| w.app_id == app_id)
    }

    /// Highest z-index among open windows, 0 when none are open
    pub fn max_z_index(&self) -> i32 {
        self.windows.iter().map(|w| w.z_index).max().unwrap_or(0)
    }
}

/// Subscription handle returned by [`WindowManager::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&DesktopState) + Send>;

/// Desktop window manager
///
/// Owns the window set exclusively; collaborators read state snapshots or
/// register subscribers, they never hold a mutable reference into it.
pub struct WindowManager {
    state: DesktopState,
    defaults: WindowDefaultsConfig,
    next_window_id: u64,
    next_subscription_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl WindowManager {
    /// Create a window manager with the given window-placement defaults
    pub fn new(defaults: WindowDefaultsConfig) -> Self {
        Self {
            state: DesktopState::default(),
            defaults,
            next_window_id: 1,
            next_subscription_id: 1,
            subscribers: Vec::new(),
        }
    }

    /// Current desktop state
    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    /// Mutate the desktop state directly and notify subscribers
    ///
    /// Bulk-update entry point used by layout application and the geometry
    /// helpers; the named operations below are preferred for single-window
    /// changes.
    pub fn set_state(&mut self, f: impl FnOnce(&mut DesktopState)) {
        f(&mut self.state);
        self.notify();
    }

    /// Register a callback invoked after every state mutation
    pub fn subscribe(&mut self, callback: impl Fn(&DesktopState) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber; no-op if the id is unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    fn notify(&self) {
        for (_, callback) in &self.subscribers {
            callback(&self.state);
        }
    }

    pub(crate) fn alloc_window_id(&mut self) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;
        id
    }

    /// Open an app window, or focus the existing one
    ///
    /// At most one window per app: if a window for `app_id` already exists
    /// this degrades to [`focus_window`](Self::focus_window). Without an
    /// explicit `init`, new windows stagger diagonally from the configured
    /// base so repeated opens don't perfectly overlap.
    pub fn open_app(
        &mut self,
        app_id: AppId,
        route: Option<String>,
        init: Option<WindowInit>,
    ) -> WindowId {
        if let Some(existing) = self.state.window_for_app(app_id) {
            let id = existing.id;
            debug!("open_app({}): window {} already open, focusing", app_id, id);
            self.focus_window(id);
            return id;
        }

        let id = self.alloc_window_id();
        let stagger = self.state.windows.len() as i32 * self.defaults.stagger_offset;
        let (position, size, is_maximised) = match init {
            Some(init) => (init.position, init.size, init.is_maximised),
            None => (
                Position::new(
                    self.defaults.stagger_base_x + stagger,
                    self.defaults.stagger_base_y + stagger,
                ),
                Size::new(self.defaults.default_width, self.defaults.default_height),
                false,
            ),
        };
        let z_index = self.state.max_z_index() + 1;

        for window in &mut self.state.windows {
            window.is_focused = false;
        }
        self.state.windows.push(Window {
            id,
            app_id,
            title: app_id.title().to_string(),
            position,
            size,
            z_index,
            is_focused: true,
            is_minimised: false,
            is_maximised,
            route,
        });
        self.state.focused_window_id = Some(id);

        debug!("Opened {} as window {} (z={})", app_id, id, z_index);
        self.notify();
        id
    }

    /// Close a window; no-op on unknown ids
    ///
    /// Closing the focused window leaves focus empty. Auto-focusing the next
    /// window is a UI policy, not this state machine's.
    pub fn close_window(&mut self, id: WindowId) {
        let before = self.state.windows.len();
        self.state.windows.retain(|w| w.id != id);
        if self.state.windows.len() == before {
            return;
        }
        if self.state.focused_window_id == Some(id) {
            self.state.focused_window_id = None;
        }
        debug!("Closed window {}", id);
        self.notify();
    }

    /// Focus a window, raising it above all others; no-op on unknown ids
    ///
    /// Focusing un-minimises.
    pub fn focus_window(&mut self, id: WindowId) {
        if self.state.window(id).is_none() {
            return;
        }
        let top = self.state.max_z_index() + 1;
        for window in &mut self.state.windows {
            if window.id == id {
                window.z_index = top;
                window.is_focused = true;
                window.is_minimised = false;
            } else {
                window.is_focused = false;
            }
        }
        self.state.focused_window_id = Some(id);

        debug!("Focused window {} (z={})", id, top);
        self.notify();
    }

    /// Minimise a window; no-op on unknown ids
    pub fn minimise_window(&mut self, id: WindowId) {
        let Some(window) = self.state.windows.iter_mut().find(|w| w.id == id) else {
            return;
        };
        window.is_minimised = true;
        window.is_focused = false;
        if self.state.focused_window_id == Some(id) {
            self.state.focused_window_id = None;
        }
        debug!("Minimised window {}", id);
        self.notify();
    }

    /// Toggle a window's maximised flag; no-op on unknown ids
    ///
    /// Position and size are untouched, so toggling back restores the prior
    /// floating geometry. Focus and z-order are unchanged.
    pub fn maximise_window(&mut self, id: WindowId) {
        let Some(window) = self.state.windows.iter_mut().find(|w| w.id == id) else {
            return;
        };
        window.is_maximised = !window.is_maximised;
        debug!("Window {} maximised={}", id, window.is_maximised);
        self.notify();
    }

    /// Overwrite a window's position; no-op on unknown ids
    ///
    /// No clamping here: drag paths run the position through
    /// [`placement::constrain_to_viewport`] before calling this.
    pub fn move_window(&mut self, id: WindowId, position: Position) {
        let Some(window) = self.state.windows.iter_mut().find(|w| w.id == id) else {
            return;
        };
        window.position = position;
        self.notify();
    }

    /// Overwrite a window's size; no-op on unknown ids
    pub fn resize_window(&mut self, id: WindowId, size: Size) {
        let Some(window) = self.state.windows.iter_mut().find(|w| w.id == id) else {
            return;
        };
        window.size = size;
        self.notify();
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(WindowDefaultsConfig::default())
    }
}
