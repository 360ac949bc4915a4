//! Theme definitions for the necklace views.
//!
//! A theme is a small palette; pattern views draw their lines and dots in
//! `color_high`. The terminal draws status text in `color_mid` and polygon
//! fills in `color_low`.

use serde::{Deserialize, Serialize};

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ThemeColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for ThemeColor {
    fn default() -> Self {
        Self::new(255, 255, 255)
    }
}

/// Complete palette for the pattern views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Stable identifier used in config and project files
    pub id: String,
    pub name: String,

    pub background: ThemeColor,
    pub color_high: ThemeColor,
    pub color_mid: ThemeColor,
    pub color_low: ThemeColor,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            id: "dark".to_string(),
            name: "Dark".to_string(),
            background: ThemeColor::new(0, 0, 0),
            color_high: ThemeColor::new(238, 238, 238),
            color_mid: ThemeColor::new(153, 153, 153),
            color_low: ThemeColor::new(68, 68, 68),
        }
    }

    /// Light theme for bright environments
    pub fn light() -> Self {
        Self {
            id: "light".to_string(),
            name: "Light".to_string(),
            background: ThemeColor::new(245, 245, 245),
            color_high: ThemeColor::new(30, 30, 30),
            color_mid: ThemeColor::new(120, 120, 120),
            color_low: ThemeColor::new(200, 200, 200),
        }
    }

    /// High contrast theme for accessibility
    pub fn high_contrast() -> Self {
        Self {
            id: "high_contrast".to_string(),
            name: "High Contrast".to_string(),
            background: ThemeColor::new(0, 0, 0),
            color_high: ThemeColor::new(255, 255, 0),
            color_mid: ThemeColor::new(255, 255, 255),
            color_low: ThemeColor::new(0, 200, 255),
        }
    }

    /// Get all built-in themes
    pub fn built_in_themes() -> Vec<Theme> {
        vec![Self::dark(), Self::light(), Self::high_contrast()]
    }

    pub fn by_id(id: &str) -> Option<Theme> {
        Self::built_in_themes().into_iter().find(|t| t.id == id)
    }

    /// The built-in theme following this one (wraps around).
    pub fn next(&self) -> Theme {
        let themes = Self::built_in_themes();
        let pos = themes.iter().position(|t| t.id == self.id).unwrap_or(0);
        themes[(pos + 1) % themes.len()].clone()
    }
}
