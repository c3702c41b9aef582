// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

//! Applet state: reacts to panel geometry, preference changes and clicks,
//! and owns the single menu window.

use cosmic::iced::mouse;
use cosmic_applets_config::menu::{MenuAppletConfig, SettingKey};

use crate::{
    fl,
    layout::{self, ButtonLayout},
    orientation::{MenuPosition, Orientation},
    window::{self, AnchorRect, MenuWindow, WindowFactory},
};

pub struct AppletController<F: WindowFactory> {
    factory: F,
    config: MenuAppletConfig,
    /// Unset until the panel reports an orientation.
    orientation: Option<Orientation>,
    panel_size: Option<u32>,
    window: Option<F::Window>,
    layout: ButtonLayout,
    icon_name: String,
    icon_size: u16,
    label: String,
    anchor: AnchorRect,
}

impl<F: WindowFactory> AppletController<F> {
    pub fn new(factory: F, config: MenuAppletConfig) -> Self {
        let mut controller = Self {
            factory,
            config,
            orientation: None,
            panel_size: None,
            window: None,
            layout: ButtonLayout::default(),
            icon_name: layout::resolve_icon("", true),
            icon_size: layout::icon_size_for_panel(0),
            label: String::new(),
            anchor: AnchorRect::default(),
        };

        controller.settings_changed(SettingKey::LabelText);
        controller.settings_changed(SettingKey::IconName);

        controller
    }

    pub fn is_ready(&self) -> bool {
        self.orientation.is_some()
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    pub fn panel_size(&self) -> Option<u32> {
        self.panel_size
    }

    pub fn layout(&self) -> ButtonLayout {
        self.layout
    }

    /// Button layout the current preferences give for `orientation`.
    pub fn layout_for(&self, orientation: Orientation) -> ButtonLayout {
        layout::adapt_layout(orientation, self.config.label_visible)
    }

    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    pub fn icon_size(&self) -> u16 {
        self.icon_size
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn window(&self) -> Option<&F::Window> {
        self.window.as_ref()
    }

    pub fn change_orient(&mut self, orientation: Orientation) {
        tracing::debug!(?orientation, "Panel orientation changed");
        self.orientation = Some(orientation);
        self.adapt_layout();

        if self.window.is_none() {
            self.create_window();
            return;
        }

        self.change_menu_orient();
    }

    pub fn change_size(&mut self, panel_size: u32) {
        self.panel_size = Some(panel_size);
        self.icon_size = layout::icon_size_for_panel(panel_size);
    }

    pub fn set_anchor_rect(&mut self, anchor: AnchorRect) {
        self.anchor = anchor;
    }

    /// Replace the config snapshot and react to every key that changed.
    pub fn update_config(&mut self, config: MenuAppletConfig) -> Vec<SettingKey> {
        let changed = self.config.changed_keys(&config);
        self.config = config;

        for key in &changed {
            self.settings_changed(*key);
        }

        changed
    }

    pub fn settings_changed(&mut self, key: SettingKey) {
        tracing::debug!(key = key.as_str(), "Setting changed");
        match key {
            SettingKey::LabelText => {
                self.label = if self.config.label_text.is_empty() {
                    fl!("menu")
                } else {
                    self.config.label_text.clone()
                };
            }
            SettingKey::LabelVisible => self.adapt_layout(),
            SettingKey::WindowType => {
                // the window is built once the panel reports an orientation
                if self.is_ready() {
                    self.teardown_window();
                    self.create_window();
                }
            }
            SettingKey::IconName | SettingKey::IconSymbolic => {
                self.icon_name =
                    layout::resolve_icon(&self.config.icon_name, self.config.icon_symbolic);
            }
            SettingKey::HeaderPosition => {
                if let Some(window) = self.window.as_mut() {
                    window.pump_settings(&self.config);
                }
            }
        }
    }

    /// Toggle the menu on a primary click. Returns the new visibility, or
    /// `None` when the click was not handled.
    pub fn toggle(&mut self, button: mouse::Button) -> Option<bool> {
        if button != mouse::Button::Left {
            return None;
        }

        let window = self.window.as_mut()?;
        let visible = !window.is_visible();
        if visible {
            window.update_screen_position(self.anchor);
        }
        window.set_visible(visible);

        Some(visible)
    }

    /// The compositor dismissed the menu on its own.
    pub fn window_closed(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.set_visible(false);
        }
    }

    pub fn dispose(&mut self) {
        self.teardown_window();
    }

    fn adapt_layout(&mut self) {
        self.layout = self.layout_for(self.orientation.unwrap_or_default());
    }

    fn create_window(&mut self) {
        let orientation = self.orientation.unwrap_or_default();
        let kind = window::select_kind(self.config.window_type, orientation);

        let mut window = self.factory.create(kind);
        window.load_menus();
        window.pump_settings(&self.config);
        self.window = Some(window);

        self.change_menu_orient();
    }

    fn teardown_window(&mut self) {
        if let Some(mut window) = self.window.take() {
            window.set_visible(false);
            window.destroy();
        }
    }

    fn change_menu_orient(&mut self) {
        let position = MenuPosition::from(self.orientation.unwrap_or_default());
        if let Some(window) = self.window.as_mut() {
            window.set_parent_position(position);
        }
    }
}

impl<F: WindowFactory> Drop for AppletController<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowKind;
    use cosmic_applets_config::menu::{HeaderPosition, WindowType};
    use std::{cell::RefCell, rc::Rc};

    #[derive(Debug, Default)]
    struct Journal {
        live: usize,
        events: Vec<String>,
    }

    struct FakeWindow {
        kind: WindowKind,
        visible: bool,
        journal: Rc<RefCell<Journal>>,
    }

    impl FakeWindow {
        fn log(&self, event: impl Into<String>) {
            self.journal.borrow_mut().events.push(event.into());
        }
    }

    impl MenuWindow for FakeWindow {
        fn kind(&self) -> WindowKind {
            self.kind
        }

        fn load_menus(&mut self) {
            self.log("load");
        }

        fn pump_settings(&mut self, _config: &MenuAppletConfig) {
            self.log("pump");
        }

        fn set_parent_position(&mut self, position: MenuPosition) {
            self.log(format!("position {position:?}"));
        }

        fn update_screen_position(&mut self, _anchor: AnchorRect) {
            self.log("screen");
        }

        fn is_visible(&self) -> bool {
            self.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
            self.log(if visible { "show" } else { "hide" });
        }

        fn destroy(&mut self) {
            self.log("destroy");
            self.journal.borrow_mut().live -= 1;
        }
    }

    #[derive(Default)]
    struct FakeFactory {
        journal: Rc<RefCell<Journal>>,
    }

    impl WindowFactory for FakeFactory {
        type Window = FakeWindow;

        fn create(&mut self, kind: WindowKind) -> FakeWindow {
            let mut journal = self.journal.borrow_mut();
            journal.live += 1;
            journal.events.push(format!("create {kind:?}"));
            FakeWindow {
                kind,
                visible: false,
                journal: self.journal.clone(),
            }
        }
    }

    fn controller(
        config: MenuAppletConfig,
    ) -> (AppletController<FakeFactory>, Rc<RefCell<Journal>>) {
        let factory = FakeFactory::default();
        let journal = factory.journal.clone();
        (AppletController::new(factory, config), journal)
    }

    fn take_events(journal: &Rc<RefCell<Journal>>) -> Vec<String> {
        std::mem::take(&mut journal.borrow_mut().events)
    }

    #[test]
    fn window_is_created_on_first_orientation() {
        let (mut applet, journal) = controller(MenuAppletConfig::default());
        assert!(!applet.is_ready());
        assert!(applet.window().is_none());

        applet.change_orient(Orientation::Top);

        assert!(applet.is_ready());
        assert_eq!(
            take_events(&journal),
            ["create Classic", "load", "pump", "position Bottom"]
        );

        applet.change_orient(Orientation::Left);
        assert_eq!(take_events(&journal), ["position Right"]);
        assert_eq!(journal.borrow().live, 1);
    }

    #[test]
    fn window_type_change_replaces_window() {
        let (mut applet, journal) = controller(MenuAppletConfig::default());
        applet.change_orient(Orientation::Bottom);
        applet.toggle(mouse::Button::Left);
        take_events(&journal);

        applet.update_config(MenuAppletConfig {
            window_type: WindowType::Dash,
            ..MenuAppletConfig::default()
        });

        assert_eq!(
            take_events(&journal),
            ["hide", "destroy", "create Dash", "load", "pump", "position Top"]
        );
        assert_eq!(journal.borrow().live, 1);
        assert_eq!(applet.window().map(MenuWindow::kind), Some(WindowKind::Dash));
    }

    #[test]
    fn repeated_window_type_changes_keep_one_window() {
        let (mut applet, journal) = controller(MenuAppletConfig::default());
        applet.change_orient(Orientation::Left);

        for window_type in [
            WindowType::Dash,
            WindowType::Automatic,
            WindowType::Classic,
            WindowType::Automatic,
        ] {
            applet.update_config(MenuAppletConfig {
                window_type,
                ..MenuAppletConfig::default()
            });
            assert_eq!(journal.borrow().live, 1);
        }

        // automatic on a vertical panel
        assert_eq!(applet.window().map(MenuWindow::kind), Some(WindowKind::Dash));
    }

    #[test]
    fn window_type_change_before_orientation_waits() {
        let (mut applet, journal) = controller(MenuAppletConfig::default());
        applet.update_config(MenuAppletConfig {
            window_type: WindowType::Dash,
            ..MenuAppletConfig::default()
        });
        assert_eq!(journal.borrow().live, 0);

        applet.change_orient(Orientation::Top);
        assert_eq!(applet.window().map(MenuWindow::kind), Some(WindowKind::Dash));
    }

    #[test]
    fn primary_click_toggles_menu() {
        let (mut applet, journal) = controller(MenuAppletConfig::default());
        applet.change_orient(Orientation::Top);
        take_events(&journal);

        assert_eq!(applet.toggle(mouse::Button::Left), Some(true));
        assert_eq!(take_events(&journal), ["screen", "show"]);

        assert_eq!(applet.toggle(mouse::Button::Left), Some(false));
        assert_eq!(take_events(&journal), ["hide"]);
    }

    #[test]
    fn other_buttons_are_ignored() {
        let (mut applet, journal) = controller(MenuAppletConfig::default());
        applet.change_orient(Orientation::Top);
        take_events(&journal);

        for button in [
            mouse::Button::Right,
            mouse::Button::Middle,
            mouse::Button::Other(8),
        ] {
            assert_eq!(applet.toggle(button), None);
        }
        assert!(take_events(&journal).is_empty());
        assert!(!applet.window().is_some_and(MenuWindow::is_visible));
    }

    #[test]
    fn label_falls_back_to_default() {
        let (mut applet, _) = controller(MenuAppletConfig::default());
        assert_eq!(applet.label(), "Menu");

        applet.update_config(MenuAppletConfig {
            label_text: "Start".into(),
            ..MenuAppletConfig::default()
        });
        assert_eq!(applet.label(), "Start");

        applet.update_config(MenuAppletConfig::default());
        assert_eq!(applet.label(), "Menu");
    }

    #[test]
    fn icon_follows_preferences() {
        let (mut applet, _) = controller(MenuAppletConfig::default());
        assert_eq!(applet.icon_name(), "start-here-symbolic");

        applet.update_config(MenuAppletConfig {
            icon_name: "distributor-logo".into(),
            icon_symbolic: false,
            ..MenuAppletConfig::default()
        });
        assert_eq!(applet.icon_name(), "distributor-logo");
    }

    #[test]
    fn label_visibility_is_overridden_on_vertical_panels() {
        let (mut applet, _) = controller(MenuAppletConfig::default());
        applet.change_orient(Orientation::Right);
        assert!(!applet.layout().label_visible);

        applet.update_config(MenuAppletConfig {
            label_visible: true,
            ..MenuAppletConfig::default()
        });
        assert!(!applet.layout().label_visible);

        applet.change_orient(Orientation::Bottom);
        assert!(applet.layout().label_visible);

        applet.update_config(MenuAppletConfig {
            label_visible: false,
            ..MenuAppletConfig::default()
        });
        assert!(!applet.layout().label_visible);
    }

    #[test]
    fn compositor_close_only_hides() {
        let (mut applet, journal) = controller(MenuAppletConfig::default());
        applet.window_closed();
        assert!(take_events(&journal).is_empty());

        applet.change_orient(Orientation::Top);
        applet.toggle(mouse::Button::Left);
        take_events(&journal);

        applet.window_closed();
        assert_eq!(take_events(&journal), ["hide"]);
        assert_eq!(journal.borrow().live, 1);

        assert_eq!(applet.toggle(mouse::Button::Left), Some(true));
        assert_eq!(take_events(&journal), ["screen", "show"]);
    }

    #[test]
    fn header_position_is_pumped_into_live_window() {
        let bottom = MenuAppletConfig {
            header_position: HeaderPosition::Bottom,
            ..MenuAppletConfig::default()
        };

        let (mut applet, journal) = controller(MenuAppletConfig::default());
        applet.update_config(bottom.clone());
        assert!(take_events(&journal).is_empty());

        applet.change_orient(Orientation::Top);
        take_events(&journal);

        applet.update_config(MenuAppletConfig::default());
        assert_eq!(take_events(&journal), ["pump"]);

        applet.update_config(bottom);
        assert_eq!(take_events(&journal), ["pump"]);
    }

    #[test]
    fn layout_for_uses_current_label_preference() {
        let (mut applet, _) = controller(MenuAppletConfig::default());
        applet.change_orient(Orientation::Top);

        assert!(!applet.layout_for(Orientation::Left).label_visible);
        assert!(applet.layout_for(Orientation::Bottom).label_visible);

        applet.update_config(MenuAppletConfig {
            label_visible: false,
            ..MenuAppletConfig::default()
        });
        assert!(!applet.layout_for(Orientation::Bottom).label_visible);
        assert_eq!(applet.layout_for(Orientation::Top), applet.layout());
    }

    #[test]
    fn panel_size_selects_icon_size() {
        let (mut applet, _) = controller(MenuAppletConfig::default());
        applet.change_size(50);
        assert_eq!(applet.icon_size(), 48);
        assert_eq!(applet.panel_size(), Some(50));
    }

    #[test]
    fn dispose_tears_down_window() {
        let (mut applet, journal) = controller(MenuAppletConfig::default());
        applet.change_orient(Orientation::Top);
        take_events(&journal);

        applet.dispose();
        assert_eq!(take_events(&journal), ["hide", "destroy"]);
        assert_eq!(journal.borrow().live, 0);

        drop(applet);
        assert!(take_events(&journal).is_empty());
    }
}
