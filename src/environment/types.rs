use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

// Repository Types

#[derive(Default, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub last_login: DateTime<Utc>,
}

impl User {
    /// A fresh session for `email`. The display name is the local part of
    /// the address.
    pub fn new(email: &str) -> Self {
        let email = email.trim().to_string();
        let name = email
            .split_once('@')
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| email.clone());
        Self {
            id: email.to_lowercase(),
            name,
            email,
            last_login: Utc::now(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Display, EnumString, EnumIter)]
pub enum PaletteStyle {
    TonalSpot,
    Neutral,
    Vibrant,
    #[default]
    Expressive,
    Rainbow,
    FruitSalad,
    Monochrome,
    Fidelity,
    Content,
}

impl PaletteStyle {
    /// Unknown names fall back to the default style
    pub fn parse(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

/// User-facing theme settings. Stored as JSON, loaded during startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemePreferences {
    pub is_dark_mode: bool,
    pub use_dynamic_colors: bool,
    /// ARGB
    pub seed_color: u32,
    pub palette_style: String,
    /// 0.0 to 1.0
    pub contrast_level: f64,
}

impl Default for ThemePreferences {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            use_dynamic_colors: true,
            seed_color: 0xFFFFFFFF,
            palette_style: PaletteStyle::Expressive.to_string(),
            contrast_level: 0.0,
        }
    }
}

impl ThemePreferences {
    pub fn palette(&self) -> PaletteStyle {
        PaletteStyle::parse(&self.palette_style)
    }

    /// The seed color as `(alpha, red, green, blue)`
    pub fn argb(&self) -> (u8, u8, u8, u8) {
        let [a, r, g, b] = self.seed_color.to_be_bytes();
        (a, r, g, b)
    }
}

/// Timings of the startup pipeline, in milliseconds
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// The splash stays at least this long
    pub splash_minimum_ms: u64,
    pub configuration_ms: u64,
    pub sync_ms: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            splash_minimum_ms: 1500,
            configuration_ms: 300,
            sync_ms: 300,
        }
    }
}

impl StartupConfig {
    pub fn splash_minimum(&self) -> Duration {
        Duration::from_millis(self.splash_minimum_ms)
    }

    pub fn configuration(&self) -> Duration {
        Duration::from_millis(self.configuration_ms)
    }

    pub fn sync(&self) -> Duration {
        Duration::from_millis(self.sync_ms)
    }
}

/// A change that was made offline and still has to reach the server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingChange {
    pub id: String,
    pub created: DateTime<Utc>,
    pub payload: serde_json::Value,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Hash, Display, EnumIter)]
pub enum HomeTab {
    #[default]
    Home,
    Explore,
    Profile,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Route {
    Auth,
    Home,
}

impl Route {
    pub fn for_session(is_authenticated: bool) -> Self {
        if is_authenticated {
            Route::Home
        } else {
            Route::Auth
        }
    }
}
