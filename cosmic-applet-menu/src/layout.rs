// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use crate::orientation::Orientation;

pub const DEFAULT_ICON: &str = "start-here";
const SYMBOLIC_SUFFIX: &str = "-symbolic";

const ICON_SIZES: [u16; 8] = [16, 24, 32, 48, 64, 96, 128, 256];
const ICON_MARGIN_END: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconAlign {
    Start,
    Center,
}

/// Arrangement of the icon and label inside the panel button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonLayout {
    pub label_visible: bool,
    pub icon_align: IconAlign,
    pub icon_margin_end: u16,
    pub vertical: bool,
}

impl Default for ButtonLayout {
    fn default() -> Self {
        adapt_layout(Orientation::default(), false)
    }
}

/// Vertical panels have no room for the label, so only the icon is shown,
/// centered. Horizontal panels honor the `label_visible` preference.
pub fn adapt_layout(orientation: Orientation, label_visible: bool) -> ButtonLayout {
    if orientation.is_vertical() {
        ButtonLayout {
            label_visible: false,
            icon_align: IconAlign::Center,
            icon_margin_end: 0,
            vertical: true,
        }
    } else {
        ButtonLayout {
            label_visible,
            icon_align: IconAlign::Start,
            icon_margin_end: ICON_MARGIN_END,
            vertical: false,
        }
    }
}

pub fn resolve_icon(icon_name: &str, symbolic: bool) -> String {
    let mut name = if icon_name.is_empty() {
        DEFAULT_ICON.to_owned()
    } else {
        icon_name.to_owned()
    };

    if symbolic {
        name.push_str(SYMBOLIC_SUFFIX);
    }

    name
}

/// Largest icon size that fits in the panel with a pixel of slack on each side.
pub fn icon_size_for_panel(panel_size: u32) -> u16 {
    let available = i64::from(panel_size) - 2;

    ICON_SIZES
        .iter()
        .copied()
        .take_while(|&size| i64::from(size) <= available)
        .last()
        .unwrap_or(ICON_SIZES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_layout_always_hides_label() {
        for orientation in [Orientation::Left, Orientation::Right] {
            for pref in [true, false] {
                let layout = adapt_layout(orientation, pref);
                assert!(!layout.label_visible);
                assert_eq!(layout.icon_align, IconAlign::Center);
                assert_eq!(layout.icon_margin_end, 0);
                assert!(layout.vertical);
            }
        }
    }

    #[test]
    fn horizontal_layout_follows_preference() {
        for orientation in [Orientation::Top, Orientation::Bottom] {
            for pref in [true, false] {
                let layout = adapt_layout(orientation, pref);
                assert_eq!(layout.label_visible, pref);
                assert_eq!(layout.icon_align, IconAlign::Start);
                assert_eq!(layout.icon_margin_end, 4);
                assert!(!layout.vertical);
            }
        }
    }

    #[test]
    fn icon_names() {
        assert_eq!(resolve_icon("", false), "start-here");
        assert_eq!(resolve_icon("", true), "start-here-symbolic");
        assert_eq!(resolve_icon("custom", true), "custom-symbolic");
        assert_eq!(resolve_icon("custom", false), "custom");
    }

    #[test]
    fn icon_sizes_snap_down_to_breakpoints() {
        assert_eq!(icon_size_for_panel(18), 16);
        assert_eq!(icon_size_for_panel(50), 48);
        assert_eq!(icon_size_for_panel(49), 32);
        assert_eq!(icon_size_for_panel(258), 256);
        assert_eq!(icon_size_for_panel(1024), 256);
    }

    #[test]
    fn tiny_panels_fall_back_to_smallest_icon() {
        assert_eq!(icon_size_for_panel(0), 16);
        assert_eq!(icon_size_for_panel(1), 16);
        assert_eq!(icon_size_for_panel(17), 16);
    }
}
