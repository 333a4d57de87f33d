// EDB - Ethereum Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Configuration system for the tracewalk front ends
//!
//! Manages the context window size and the color scheme of the terminal view.

use eyre::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracewalk_engine::DEFAULT_WINDOW_RADIUS;
use tracing::{debug, info, warn};

/// Name of the config file in the home directory
pub const CONFIG_FILE_NAME: &str = ".tracewalk.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What to show around the current step
    pub view: ViewConfig,
    /// Colors of the terminal view
    pub theme: ColorScheme,
}

/// View configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Number of opcodes shown on each side of the current one
    pub window_radius: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { window_radius: DEFAULT_WINDOW_RADIUS }
    }
}

/// Color scheme definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    /// Foreground of the current opcode
    pub selected_fg: String,
    /// Background of the current opcode
    pub selected_bg: String,
    /// Header row and category names
    pub header: String,
    /// Panel borders
    pub border: String,
    /// Help line
    pub help_text: String,
    /// "No memory data" and friends
    pub placeholder: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            selected_fg: "black".to_string(),
            selected_bg: "cyan".to_string(),
            header: "yellow".to_string(),
            border: "gray".to_string(),
            help_text: "dark_gray".to_string(),
            placeholder: "dark_gray".to_string(),
        }
    }
}

impl Config {
    /// Get the config file path (~/.tracewalk.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found, creating default at {:?}", config_path);
            let default_config = Self::default();
            default_config.save_to_path(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from_path(&config_path)
    }

    /// Load configuration from the default location without creating it
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_default_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, or use the defaults when it does not exist
    pub fn load_or_default_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        Self::load_from_path(path)
    }

    /// Load configuration from an explicit file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {path:?} as TOML"))?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Save configuration to an explicit file
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {path:?}"))?;

        debug!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Convert color string to ratatui Color
    pub fn parse_color(color_str: &str) -> Color {
        match color_str.to_lowercase().as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "light_gray" => Color::Gray,
            "dark_gray" => Color::DarkGray,
            "light_red" => Color::LightRed,
            "light_green" => Color::LightGreen,
            "light_yellow" => Color::LightYellow,
            "light_blue" => Color::LightBlue,
            "light_magenta" => Color::LightMagenta,
            "light_cyan" => Color::LightCyan,
            "white" => Color::White,
            _ => {
                warn!("Unknown color '{}', using default gray", color_str);
                Color::Gray
            }
        }
    }
}

impl ColorScheme {
    /// Get selected foreground color
    pub fn selected_fg(&self) -> Color {
        Config::parse_color(&self.selected_fg)
    }

    /// Get selected background color
    pub fn selected_bg(&self) -> Color {
        Config::parse_color(&self.selected_bg)
    }

    /// Get header color
    pub fn header(&self) -> Color {
        Config::parse_color(&self.header)
    }

    /// Get border color
    pub fn border(&self) -> Color {
        Config::parse_color(&self.border)
    }

    /// Get help text color
    pub fn help_text(&self) -> Color {
        Config::parse_color(&self.help_text)
    }

    /// Get placeholder color
    pub fn placeholder(&self) -> Color {
        Config::parse_color(&self.placeholder)
    }
}
