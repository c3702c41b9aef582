// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};

/// Which menu window the applet opens.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum WindowType {
    #[default]
    Classic,
    Dash,
    /// Dash on vertical panels, classic everywhere else.
    Automatic,
}

/// Placement of the action row inside the menu window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum HeaderPosition {
    /// Opposite the panel edge: bottom for top panels, top otherwise.
    #[default]
    Automatic,
    Top,
    Bottom,
}

#[derive(Debug, Clone, CosmicConfigEntry, PartialEq, Eq, Deserialize, Serialize)]
#[version = 1]
pub struct MenuAppletConfig {
    /// Button label. Empty selects the localized default.
    pub label_text: String,
    pub label_visible: bool,
    pub window_type: WindowType,
    /// Icon theme name. Empty selects `start-here`.
    pub icon_name: String,
    pub icon_symbolic: bool,
    pub header_position: HeaderPosition,
}

impl Default for MenuAppletConfig {
    fn default() -> Self {
        Self {
            label_text: String::new(),
            label_visible: true,
            window_type: WindowType::Classic,
            icon_name: String::new(),
            icon_symbolic: true,
            header_position: HeaderPosition::Automatic,
        }
    }
}

/// A single watched preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    LabelText,
    LabelVisible,
    WindowType,
    IconName,
    IconSymbolic,
    HeaderPosition,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        SettingKey::LabelText,
        SettingKey::LabelVisible,
        SettingKey::WindowType,
        SettingKey::IconName,
        SettingKey::IconSymbolic,
        SettingKey::HeaderPosition,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::LabelText => "label-text",
            SettingKey::LabelVisible => "label-visible",
            SettingKey::WindowType => "window-type",
            SettingKey::IconName => "icon-name",
            SettingKey::IconSymbolic => "icon-symbolic",
            SettingKey::HeaderPosition => "header-position",
        }
    }
}

impl MenuAppletConfig {
    /// Keys whose value differs between `self` and `other`, in declaration order.
    pub fn changed_keys(&self, other: &Self) -> Vec<SettingKey> {
        SettingKey::ALL
            .into_iter()
            .filter(|key| match key {
                SettingKey::LabelText => self.label_text != other.label_text,
                SettingKey::LabelVisible => self.label_visible != other.label_visible,
                SettingKey::WindowType => self.window_type != other.window_type,
                SettingKey::IconName => self.icon_name != other.icon_name,
                SettingKey::IconSymbolic => self.icon_symbolic != other.icon_symbolic,
                SettingKey::HeaderPosition => self.header_position != other.header_position,
            })
            .collect()
    }
}
