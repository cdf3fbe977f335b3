//! App / Theme / Persona Enumerations
//!
//! The closed sets of known app kinds, visual skins, and workflow personas.
//! All three serialize as their lowercase wire names so stored layouts and
//! profiles match the established persistence format.

use serde::{Deserialize, Serialize};

/// Identifier of a known desktop application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppId {
    Dashboard,
    Intel,
    Pitch,
    Tracker,
    Studio,
    Community,
    Autopilot,
    Automations,
    Coach,
    Scenes,
    Mig,
    Anr,
    Settings,
    Terminal,
}

impl AppId {
    /// Wire name (lowercase), as stored in layouts and profiles
    pub fn as_str(&self) -> &'static str {
        match self {
            AppId::Dashboard => "dashboard",
            AppId::Intel => "intel",
            AppId::Pitch => "pitch",
            AppId::Tracker => "tracker",
            AppId::Studio => "studio",
            AppId::Community => "community",
            AppId::Autopilot => "autopilot",
            AppId::Automations => "automations",
            AppId::Coach => "coach",
            AppId::Scenes => "scenes",
            AppId::Mig => "mig",
            AppId::Anr => "anr",
            AppId::Settings => "settings",
            AppId::Terminal => "terminal",
        }
    }

    /// Window title derived from the app id (capitalized wire name)
    pub fn title(&self) -> &'static str {
        match self {
            AppId::Dashboard => "Dashboard",
            AppId::Intel => "Intel",
            AppId::Pitch => "Pitch",
            AppId::Tracker => "Tracker",
            AppId::Studio => "Studio",
            AppId::Community => "Community",
            AppId::Autopilot => "Autopilot",
            AppId::Automations => "Automations",
            AppId::Coach => "Coach",
            AppId::Scenes => "Scenes",
            AppId::Mig => "Mig",
            AppId::Anr => "Anr",
            AppId::Settings => "Settings",
            AppId::Terminal => "Terminal",
        }
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual skin applied to the desktop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Xp,
    Aqua,
    Daw,
    Ascii,
    Analogue,
}

impl Theme {
    /// Parse a wire name; `None` for anything outside the fixed set
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "xp" => Some(Theme::Xp),
            "aqua" => Some(Theme::Aqua),
            "daw" => Some(Theme::Daw),
            "ascii" => Some(Theme::Ascii),
            "analogue" => Some(Theme::Analogue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Xp => "xp",
            Theme::Aqua => "aqua",
            Theme::Daw => "daw",
            Theme::Ascii => "ascii",
            Theme::Analogue => "analogue",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow persona a layout is tagged with
///
/// Behaviorally opaque to this crate; carried as data on layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Default,
    Strategist,
    Producer,
    Campaign,
    Dev,
}

impl Persona {
    /// Parse a wire name; `None` for anything outside the fixed set
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "default" => Some(Persona::Default),
            "strategist" => Some(Persona::Strategist),
            "producer" => Some(Persona::Producer),
            "campaign" => Some(Persona::Campaign),
            "dev" => Some(Persona::Dev),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Default => "default",
            Persona::Strategist => "strategist",
            Persona::Producer => "producer",
            Persona::Campaign => "campaign",
            Persona::Dev => "dev",
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_id_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AppId::Intel).unwrap(), "\"intel\"");
        assert_eq!(
            serde_json::from_str::<AppId>("\"automations\"").unwrap(),
            AppId::Automations
        );
    }

    #[test]
    fn test_theme_wire_names_are_closed() {
        for name in ["xp", "aqua", "daw", "ascii", "analogue"] {
            assert!(Theme::from_wire(name).is_some());
        }
        assert!(Theme::from_wire("not-a-theme").is_none());
        assert!(Theme::from_wire("XP").is_none());
    }

    #[test]
    fn test_persona_wire_names_are_closed() {
        for name in ["default", "strategist", "producer", "campaign", "dev"] {
            assert!(Persona::from_wire(name).is_some());
        }
        assert!(Persona::from_wire("manager").is_none());
    }

    #[test]
    fn test_title_is_capitalized_wire_name() {
        assert_eq!(AppId::Intel.title(), "Intel");
        assert_eq!(AppId::Anr.title(), "Anr");
    }
}
