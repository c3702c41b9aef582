// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use cosmic::applet::cosmic_panel_config::PanelAnchor;

/// Direction in which the panel's popups open.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Left,
    Right,
    /// Popups open upwards, the panel sits on the bottom edge.
    #[default]
    Top,
    Bottom,
}

impl Orientation {
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Left | Orientation::Right)
    }
}

impl From<PanelAnchor> for Orientation {
    fn from(anchor: PanelAnchor) -> Self {
        match anchor {
            PanelAnchor::Left => Orientation::Right,
            PanelAnchor::Right => Orientation::Left,
            PanelAnchor::Top => Orientation::Bottom,
            PanelAnchor::Bottom => Orientation::Top,
        }
    }
}

/// Where the parent panel lies relative to the menu window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MenuPosition {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl MenuPosition {
    pub fn is_vertical(self) -> bool {
        matches!(self, MenuPosition::Left | MenuPosition::Right)
    }
}

impl From<Orientation> for MenuPosition {
    /// The menu opens away from the panel, so the panel is on the side
    /// the popups open from.
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Left => MenuPosition::Right,
            Orientation::Right => MenuPosition::Left,
            Orientation::Bottom => MenuPosition::Top,
            Orientation::Top => MenuPosition::Bottom,
        }
    }
}
