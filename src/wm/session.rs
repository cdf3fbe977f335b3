//! Session Module
//!
//! Layout persistence: snapshotting the desktop into named, storable
//! layouts, applying them back, JSON export/import for backup and sharing,
//! the external layout store contract, and the debounced autosave used while
//! windows are being dragged around.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::shared::{Position, Size};
use crate::wm::apps::{AppId, Persona, Theme};
use crate::wm::{DesktopState, Window, WindowManager};

/// User/workspace identity every store call is scoped by
///
/// Opaque to this crate; the backend maps it to row-level scoping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreScope {
    pub user_id: String,
    pub workspace_id: String,
}

impl StoreScope {
    pub fn new(user_id: impl Into<String>, workspace_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            workspace_id: workspace_id.into(),
        }
    }
}

/// External store call failure (network, permission, disk)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data is corrupt: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Layout import failure
///
/// `Parse` means the text isn't JSON at all ("corrupt file");
/// `Validation` means well-formed JSON that isn't a layout ("invalid
/// layout"), naming the offending field.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout JSON is unparseable: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid layout: field `{field}`: {detail}")]
    Validation { field: &'static str, detail: String },
}

/// One window inside a stored layout, geometry flattened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutWindow {
    pub app_id: AppId,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub z_index: i32,
    pub is_minimised: bool,
    #[serde(default)]
    pub is_maximised: bool,
}

/// A named, complete snapshot of the desktop arrangement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub layout_name: String,
    pub windows: Vec<LayoutWindow>,
    pub theme: Theme,
    pub persona: Persona,
}

/// Listing entry for stored layouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub layout_name: String,
    pub theme: Theme,
    pub persona: Persona,
    pub window_count: usize,
}

/// Snapshot the desktop state into a named layout
///
/// Every window is carried in array order with its flags preserved;
/// minimised and maximised windows are not filtered out.
pub fn extract_layout(state: &DesktopState, layout_name: &str) -> Layout {
    Layout {
        layout_name: layout_name.to_string(),
        windows: state
            .windows
            .iter()
            .map(|w| LayoutWindow {
                app_id: w.app_id,
                x: w.position.x,
                y: w.position.y,
                width: w.size.width,
                height: w.size.height,
                z_index: w.z_index,
                is_minimised: w.is_minimised,
                is_maximised: w.is_maximised,
            })
            .collect(),
        theme: state.active_theme,
        persona: state.persona,
    }
}

impl WindowManager {
    /// Snapshot the current desktop into a named layout
    pub fn extract_layout(&self, layout_name: &str) -> Layout {
        extract_layout(self.state(), layout_name)
    }

    /// Replace the desktop with a stored layout
    ///
    /// Every layout window becomes a fresh window with a newly allocated id
    /// (stale ids from a previous session can never collide), the window at
    /// index 0 receives focus, and stored z-indices are applied verbatim.
    /// The layout's theme and persona overwrite the active ones.
    pub fn apply_layout(&mut self, layout: &Layout) {
        let ids: Vec<_> = layout.windows.iter().map(|_| self.alloc_window_id()).collect();

        self.set_state(|state| {
            state.windows = layout
                .windows
                .iter()
                .zip(&ids)
                .enumerate()
                .map(|(index, (w, &id))| Window {
                    id,
                    app_id: w.app_id,
                    title: w.app_id.title().to_string(),
                    position: Position::new(w.x, w.y),
                    size: Size::new(w.width, w.height),
                    z_index: w.z_index,
                    is_focused: index == 0,
                    is_minimised: w.is_minimised,
                    is_maximised: w.is_maximised,
                    route: None,
                })
                .collect();
            state.focused_window_id = ids.first().copied();
            state.active_theme = layout.theme;
            state.persona = layout.persona;
        });

        info!(
            "Applied layout '{}' ({} windows, theme={})",
            layout.layout_name,
            layout.windows.len(),
            layout.theme
        );
    }
}

/// Serialize a layout for backup/sharing
///
/// Adds an informational `exported_at` timestamp; import discards it.
pub fn export_layout_to_json(layout: &Layout) -> Result<String, LayoutError> {
    let mut value = serde_json::to_value(layout)?;
    value["exported_at"] = Value::String(chrono::Utc::now().to_rfc3339());
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Parse and validate exported layout text
///
/// Unrecognized extra fields are tolerated; only the layout fields are read.
pub fn import_layout_from_json(text: &str) -> Result<Layout, LayoutError> {
    let value: Value = serde_json::from_str(text)?;

    let Some(object) = value.as_object() else {
        return Err(LayoutError::Validation {
            field: "layout_name",
            detail: "expected a JSON object with layout fields".into(),
        });
    };

    for field in ["layout_name", "windows", "theme", "persona"] {
        if !object.contains_key(field) || object[field].is_null() {
            return Err(LayoutError::Validation {
                field,
                detail: "missing required field".into(),
            });
        }
    }

    let layout_name = match object["layout_name"].as_str() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(LayoutError::Validation {
                field: "layout_name",
                detail: "must be a non-empty string".into(),
            })
        }
    };

    let theme = object["theme"]
        .as_str()
        .and_then(Theme::from_wire)
        .ok_or_else(|| LayoutError::Validation {
            field: "theme",
            detail: format!("unknown theme {}", object["theme"]),
        })?;

    let persona = object["persona"]
        .as_str()
        .and_then(Persona::from_wire)
        .ok_or_else(|| LayoutError::Validation {
            field: "persona",
            detail: format!("unknown persona {}", object["persona"]),
        })?;

    let windows: Vec<LayoutWindow> = serde_json::from_value(object["windows"].clone())
        .map_err(|e| LayoutError::Validation {
            field: "windows",
            detail: e.to_string(),
        })?;

    Ok(Layout {
        layout_name,
        windows,
        theme,
        persona,
    })
}

/// External store for named layouts
///
/// All operations are scoped; `load` with no name resolves the layout named
/// `"default"`. Not-found is `None`, never an error.
#[async_trait]
pub trait LayoutStore: Send + Sync {
    async fn load(
        &self,
        scope: &StoreScope,
        name: Option<&str>,
    ) -> Result<Option<Layout>, StorageError>;

    /// Upsert by `layout_name` within the scope
    async fn save(&self, scope: &StoreScope, layout: &Layout) -> Result<(), StorageError>;

    async fn list(&self, scope: &StoreScope) -> Result<Vec<LayoutSummary>, StorageError>;

    async fn delete(&self, scope: &StoreScope, name: &str) -> Result<(), StorageError>;
}

/// In-memory layout store
#[derive(Default)]
pub struct MemoryLayoutStore {
    layouts: Mutex<HashMap<(StoreScope, String), Layout>>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LayoutStore for MemoryLayoutStore {
    async fn load(
        &self,
        scope: &StoreScope,
        name: Option<&str>,
    ) -> Result<Option<Layout>, StorageError> {
        let layouts = self.layouts.lock().unwrap_or_else(|e| e.into_inner());
        let name = name.unwrap_or("default");
        Ok(layouts.get(&(scope.clone(), name.to_string())).cloned())
    }

    async fn save(&self, scope: &StoreScope, layout: &Layout) -> Result<(), StorageError> {
        let mut layouts = self.layouts.lock().unwrap_or_else(|e| e.into_inner());
        layouts.insert(
            (scope.clone(), layout.layout_name.clone()),
            layout.clone(),
        );
        Ok(())
    }

    async fn list(&self, scope: &StoreScope) -> Result<Vec<LayoutSummary>, StorageError> {
        let layouts = self.layouts.lock().unwrap_or_else(|e| e.into_inner());
        let mut summaries: Vec<_> = layouts
            .iter()
            .filter(|((s, _), _)| s == scope)
            .map(|(_, layout)| LayoutSummary {
                layout_name: layout.layout_name.clone(),
                theme: layout.theme,
                persona: layout.persona,
                window_count: layout.windows.len(),
            })
            .collect();
        summaries.sort_by(|a, b| a.layout_name.cmp(&b.layout_name));
        Ok(summaries)
    }

    async fn delete(&self, scope: &StoreScope, name: &str) -> Result<(), StorageError> {
        let mut layouts = self.layouts.lock().unwrap_or_else(|e| e.into_inner());
        layouts.remove(&(scope.clone(), name.to_string()));
        Ok(())
    }
}

/// JSON-file-backed layout store
///
/// One file per scope under the data directory
/// (`~/.local/share/operator-os` on Linux). Keeps the crate usable without
/// a network store; the production backend implements [`LayoutStore`]
/// against Supabase.
pub struct FileLayoutStore {
    root: PathBuf,
}

impl FileLayoutStore {
    /// Store rooted at the platform data directory
    pub fn new() -> Result<Self, StorageError> {
        let root = dirs::data_dir()
            .ok_or_else(|| StorageError::Backend("no data directory available".into()))?
            .join("operator-os");
        Ok(Self { root })
    }

    /// Store rooted at an explicit directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn scope_path(&self, scope: &StoreScope) -> PathBuf {
        self.root
            .join(format!("layouts-{}-{}.json", scope.user_id, scope.workspace_id))
    }

    fn read_scope(&self, scope: &StoreScope) -> Result<HashMap<String, Layout>, StorageError> {
        let path = self.scope_path(scope);
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_scope(
        &self,
        scope: &StoreScope,
        layouts: &HashMap<String, Layout>,
    ) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.root)?;
        let content = serde_json::to_string_pretty(layouts)?;
        std::fs::write(self.scope_path(scope), content)?;
        Ok(())
    }
}

#[async_trait]
impl LayoutStore for FileLayoutStore {
    async fn load(
        &self,
        scope: &StoreScope,
        name: Option<&str>,
    ) -> Result<Option<Layout>, StorageError> {
        let layouts = self.read_scope(scope)?;
        Ok(layouts.get(name.unwrap_or("default")).cloned())
    }

    async fn save(&self, scope: &StoreScope, layout: &Layout) -> Result<(), StorageError> {
        let mut layouts = self.read_scope(scope)?;
        layouts.insert(layout.layout_name.clone(), layout.clone());
        self.write_scope(scope, &layouts)?;
        debug!("Saved layout '{}' to {:?}", layout.layout_name, self.scope_path(scope));
        Ok(())
    }

    async fn list(&self, scope: &StoreScope) -> Result<Vec<LayoutSummary>, StorageError> {
        let layouts = self.read_scope(scope)?;
        let mut summaries: Vec<_> = layouts
            .values()
            .map(|layout| LayoutSummary {
                layout_name: layout.layout_name.clone(),
                theme: layout.theme,
                persona: layout.persona,
                window_count: layout.windows.len(),
            })
            .collect();
        summaries.sort_by(|a, b| a.layout_name.cmp(&b.layout_name));
        Ok(summaries)
    }

    async fn delete(&self, scope: &StoreScope, name: &str) -> Result<(), StorageError> {
        let mut layouts = self.read_scope(scope)?;
        layouts.remove(name);
        self.write_scope(scope, &layouts)?;
        Ok(())
    }
}

/// Trailing-edge debounced layout autosave
///
/// Each [`request_save`](Self::request_save) cancels the previous pending
/// save and schedules a new one `delay` after the call, so a burst of
/// requests during a drag produces exactly one write with the state as it
/// stands when the delay elapses. Dropping the handle cancels pending work:
/// no writes dangle past disposal.
pub struct DebouncedLayoutSave {
    store: Arc<dyn LayoutStore>,
    scope: StoreScope,
    layout_name: String,
    delay: Duration,
    snapshot: Arc<dyn Fn() -> DesktopState + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedLayoutSave {
    pub fn new(
        store: Arc<dyn LayoutStore>,
        scope: StoreScope,
        layout_name: impl Into<String>,
        delay: Duration,
        snapshot: impl Fn() -> DesktopState + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            scope,
            layout_name: layout_name.into(),
            delay,
            snapshot: Arc::new(snapshot),
            pending: None,
        }
    }

    /// Schedule a save, replacing any still-pending one
    pub fn request_save(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let store = Arc::clone(&self.store);
        let scope = self.scope.clone();
        let layout_name = self.layout_name.clone();
        let snapshot = Arc::clone(&self.snapshot);
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let layout = extract_layout(&snapshot(), &layout_name);
            if let Err(e) = store.save(&scope, &layout).await {
                warn!("Layout autosave failed: {}", e);
            }
        }));
    }

    /// Cancel any pending save
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for DebouncedLayoutSave {
    fn drop(&mut self) {
        self.cancel();
    }
}
