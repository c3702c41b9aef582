// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use cosmic::iced::window;
use cosmic_applets_config::menu::{HeaderPosition, MenuAppletConfig, WindowType};

use crate::{fl, orientation::MenuPosition, orientation::Orientation};

/// The concrete menu window variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Classic,
    Dash,
}

impl WindowKind {
    pub fn display_name(self) -> String {
        match self {
            WindowKind::Classic => fl!("classic"),
            WindowKind::Dash => fl!("dash"),
        }
    }
}

/// Resolve the preferred window type against the panel orientation.
pub fn select_kind(window_type: WindowType, orientation: Orientation) -> WindowKind {
    match window_type {
        WindowType::Classic => WindowKind::Classic,
        WindowType::Dash => WindowKind::Dash,
        WindowType::Automatic if orientation.is_vertical() => WindowKind::Dash,
        WindowType::Automatic => WindowKind::Classic,
    }
}

/// On-panel rectangle of the applet button, in surface coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl AnchorRect {
    /// Popups refuse zero-sized anchors.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.max(1),
            y: self.y.max(1),
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }
}

/// Operations the applet needs from a menu window.
pub trait MenuWindow {
    fn kind(&self) -> WindowKind;

    fn load_menus(&mut self);

    fn pump_settings(&mut self, config: &MenuAppletConfig);

    fn set_parent_position(&mut self, position: MenuPosition);

    /// Recompute placement relative to the applet before showing.
    fn update_screen_position(&mut self, anchor: AnchorRect);

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// Release everything held by the window. Only called once it is hidden.
    fn destroy(&mut self);
}

pub trait WindowFactory {
    type Window: MenuWindow;

    fn create(&mut self, kind: WindowKind) -> Self::Window;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    EditMenus,
}

impl MenuAction {
    pub fn label(self) -> String {
        match self {
            MenuAction::EditMenus => fl!("edit-menus"),
        }
    }
}

/// Size bounds handed to the popup positioner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupLimits {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

/// A menu window backed by an applet popup surface. Visible while it owns a
/// popup id.
#[derive(Debug)]
pub struct PopupMenuWindow {
    kind: WindowKind,
    popup: Option<window::Id>,
    position: MenuPosition,
    anchor: AnchorRect,
    limits: PopupLimits,
    header_position: HeaderPosition,
    actions: Vec<MenuAction>,
}

impl PopupMenuWindow {
    pub fn new(kind: WindowKind) -> Self {
        let position = MenuPosition::default();
        Self {
            kind,
            popup: None,
            position,
            anchor: AnchorRect::default(),
            limits: popup_limits(kind, position),
            header_position: HeaderPosition::default(),
            actions: Vec::new(),
        }
    }

    pub fn popup(&self) -> Option<window::Id> {
        self.popup
    }

    pub fn anchor(&self) -> AnchorRect {
        self.anchor
    }

    pub fn limits(&self) -> PopupLimits {
        self.limits
    }

    pub fn actions(&self) -> &[MenuAction] {
        &self.actions
    }

    /// Whether the action row goes above the title.
    pub fn header_at_top(&self) -> bool {
        match self.header_position {
            HeaderPosition::Top => true,
            HeaderPosition::Bottom => false,
            HeaderPosition::Automatic => self.position != MenuPosition::Top,
        }
    }
}

impl MenuWindow for PopupMenuWindow {
    fn kind(&self) -> WindowKind {
        self.kind
    }

    fn load_menus(&mut self) {
        self.actions = vec![MenuAction::EditMenus];
    }

    fn pump_settings(&mut self, config: &MenuAppletConfig) {
        self.header_position = config.header_position;
    }

    fn set_parent_position(&mut self, position: MenuPosition) {
        self.position = position;
        self.limits = popup_limits(self.kind, position);
    }

    fn update_screen_position(&mut self, anchor: AnchorRect) {
        self.anchor = anchor.clamped();
        self.limits = popup_limits(self.kind, self.position);
    }

    fn is_visible(&self) -> bool {
        self.popup.is_some()
    }

    fn set_visible(&mut self, visible: bool) {
        if !visible {
            self.popup = None;
        } else if self.popup.is_none() {
            self.popup = Some(window::Id::unique());
        }
    }

    fn destroy(&mut self) {
        self.popup = None;
        self.actions.clear();
    }
}

/// The classic menu is a fixed column next to the button. The dash spans
/// the output, so its bounds depend on which way the panel runs.
fn popup_limits(kind: WindowKind, position: MenuPosition) -> PopupLimits {
    match kind {
        WindowKind::Classic => PopupLimits {
            min_width: 200.,
            max_width: 320.,
            min_height: 10.,
            max_height: 640.,
        },
        WindowKind::Dash if position.is_vertical() => PopupLimits {
            min_width: 400.,
            max_width: 900.,
            min_height: 400.,
            max_height: 1080.,
        },
        WindowKind::Dash => PopupLimits {
            min_width: 600.,
            max_width: 1200.,
            min_height: 300.,
            max_height: 720.,
        },
    }
}

#[derive(Debug, Default)]
pub struct PopupFactory;

impl WindowFactory for PopupFactory {
    type Window = PopupMenuWindow;

    fn create(&mut self, kind: WindowKind) -> PopupMenuWindow {
        tracing::debug!(?kind, "Creating menu window");
        PopupMenuWindow::new(kind)
    }
}
