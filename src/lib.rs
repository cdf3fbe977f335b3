//! OperatorOS Desktop Core
//!
//! A headless window manager for the OperatorOS desktop shell: the
//! authoritative set of open app windows (position, size, z-order, focus,
//! minimise/maximise state), per-app launch profiles, and named layout
//! persistence with JSON import/export.
//!
//! This crate owns the desktop *state*, not its pixels. An external renderer
//! paints window records; an external store (Supabase in production) persists
//! profiles and layouts through the traits in [`wm::profiles`] and
//! [`wm::session`].

pub mod config;
pub mod shared;
pub mod wm;

pub use config::DesktopConfig;
pub use shared::{Position, Size, Viewport};
pub use wm::apps::{AppId, Persona, Theme};
pub use wm::{DesktopState, Window, WindowId, WindowManager};
