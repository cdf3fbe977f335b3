//! App Profile Module
//!
//! Per-app launch preferences: how a window should appear when its app is
//! opened (maximized, floating, or restored to its last position), plus dock
//! pinning. Resolution is pure; the write-back after a window closes or
//! finishes a drag is a detached best-effort task that never blocks a window
//! operation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::shared::{Position, Size};
use crate::wm::apps::AppId;
use crate::wm::session::{StorageError, StoreScope};
use crate::wm::{Window, WindowInit};

/// Launch behavior for an app's window
///
/// Unrecognized stored values deserialize to `Floating`, so a garbage
/// launch mode fails safe to the caller's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    Maximized,
    Floating,
    LastState,
}

impl<'de> Deserialize<'de> for LaunchMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "maximized" => LaunchMode::Maximized,
            "last_state" => LaunchMode::LastState,
            // Fail safe: anything else behaves as floating
            _ => LaunchMode::Floating,
        })
    }
}

/// Last-known window geometry, only meaningful when both fields are present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileMetadata {
    pub last_position: Option<Position>,
    pub last_size: Option<Size>,
}

/// Stored per-app, per-workspace preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppProfile {
    pub app_id: AppId,
    pub launch_mode: LaunchMode,
    /// Dock visibility; carried and persisted here, enforced by the dock
    pub pinned: bool,
    #[serde(default)]
    pub metadata: ProfileMetadata,
}

impl AppProfile {
    /// Profile assumed when none is stored yet for an app
    pub fn missing(app_id: AppId) -> Self {
        Self {
            app_id,
            launch_mode: LaunchMode::LastState,
            pinned: false,
            metadata: ProfileMetadata::default(),
        }
    }
}

/// Compute a window's initial state from its stored profile
///
/// | launch mode                               | result                        |
/// |-------------------------------------------|-------------------------------|
/// | no profile                                | `requested` unchanged         |
/// | `maximized`                               | `requested`, maximised forced |
/// | `floating`                                | `requested` unchanged         |
/// | `last_state`, both stored values present  | stored position and size      |
/// | `last_state`, either stored value missing | `requested` unchanged         |
///
/// Never fails; partial `last_state` metadata is ignored rather than
/// substituted piecemeal.
pub fn resolve_initial_window_state(
    profile: Option<&AppProfile>,
    requested: WindowInit,
) -> WindowInit {
    let Some(profile) = profile else {
        return requested;
    };

    match profile.launch_mode {
        LaunchMode::Maximized => WindowInit {
            is_maximised: true,
            ..requested
        },
        LaunchMode::Floating => requested,
        LaunchMode::LastState => match (profile.metadata.last_position, profile.metadata.last_size)
        {
            (Some(position), Some(size)) => WindowInit {
                position,
                size,
                is_maximised: requested.is_maximised,
            },
            _ => requested,
        },
    }
}

/// External store for app profiles, keyed by app id within a scope
///
/// Backed by Supabase in production; the in-memory implementation backs
/// tests. Not-found is `None`, never an error.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(
        &self,
        scope: &StoreScope,
        app_id: AppId,
    ) -> Result<Option<AppProfile>, StorageError>;

    /// Upsert a profile by app id within the scope
    async fn save(&self, scope: &StoreScope, profile: AppProfile) -> Result<(), StorageError>;
}

/// In-memory profile store
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<(StoreScope, AppId), AppProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn load(
        &self,
        scope: &StoreScope,
        app_id: AppId,
    ) -> Result<Option<AppProfile>, StorageError> {
        let profiles = self.profiles.lock().unwrap_or_else(|e| e.into_inner());
        Ok(profiles.get(&(scope.clone(), app_id)).cloned())
    }

    async fn save(&self, scope: &StoreScope, profile: AppProfile) -> Result<(), StorageError> {
        let mut profiles = self.profiles.lock().unwrap_or_else(|e| e.into_inner());
        profiles.insert((scope.clone(), profile.app_id), profile);
        Ok(())
    }
}

/// Record a window's current geometry into its app profile, best-effort
///
/// Spawned detached: the window operation that triggered this has already
/// returned by the time the write is issued, and storage failures are
/// logged, never propagated. A missing profile is created with
/// `last_state`/unpinned defaults; a failed read aborts the write so a
/// stored launch mode is never clobbered blind.
pub fn persist_window_profile(
    store: Arc<dyn ProfileStore>,
    scope: StoreScope,
    window: &Window,
) -> JoinHandle<()> {
    let app_id = window.app_id;
    let position = window.position;
    let size = window.size;

    tokio::spawn(async move {
        let profile = match store.load(&scope, app_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => AppProfile::missing(app_id),
            Err(e) => {
                warn!("Skipping profile update for {}: read failed: {}", app_id, e);
                return;
            }
        };

        let updated = AppProfile {
            metadata: ProfileMetadata {
                last_position: Some(position),
                last_size: Some(size),
            },
            ..profile
        };

        match store.save(&scope, updated).await {
            Ok(()) => debug!("Recorded window geometry for {}", app_id),
            Err(e) => warn!("Failed to persist profile for {}: {}", app_id, e),
        }
    })
}
