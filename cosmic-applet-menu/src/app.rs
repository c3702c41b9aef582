// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use cosmic::{
    Element, Task, app,
    applet::{
        menu_button, padded_control,
        token::subscription::{TokenRequest, TokenUpdate, activation_token_subscription},
    },
    cctk::sctk::reexports::calloop,
    cosmic_theme::Spacing,
    iced::{
        Alignment, Length, Padding, Rectangle, Subscription, mouse,
        platform_specific::shell::wayland::commands::popup::{destroy_popup, get_popup},
        widget::{column, row},
        window,
    },
    iced_runtime::core::layout::Limits,
    iced_widget::{Column, mouse_area},
    theme,
    widget::{Id, autosize, button, container, divider, icon, rectangle_tracker::*, text},
};
use cosmic_applets_config::menu::MenuAppletConfig;
use cosmic_config::{Config, CosmicConfigEntry};
use std::sync::LazyLock;

use crate::{
    controller::AppletController,
    editor::{self, EditorLaunch},
    fl,
    layout::{self, ButtonLayout, IconAlign},
    notify,
    orientation::Orientation,
    window::{AnchorRect, MenuAction, MenuWindow, PopupFactory, PopupMenuWindow, WindowKind},
};

static AUTOSIZE_MAIN_ID: LazyLock<Id> = LazyLock::new(|| Id::new("autosize-main"));

pub fn run() -> cosmic::iced::Result {
    cosmic::applet::run::<MenuApplet>(())
}

struct MenuApplet {
    core: cosmic::app::Core,
    controller: AppletController<PopupFactory>,
    rectangle_tracker: Option<RectangleTracker<u32>>,
    token_tx: Option<calloop::channel::Sender<TokenRequest>>,
    pending_launch: Option<EditorLaunch>,
}

#[derive(Debug, Clone)]
enum Message {
    Press(mouse::Button),
    CloseRequested(window::Id),
    Rectangle(RectangleUpdate<u32>),
    ConfigChanged(MenuAppletConfig),
    Action(MenuAction),
    EditorFound(Option<EditorLaunch>),
    Token(TokenUpdate),
}

impl MenuApplet {
    /// Thickness of the panel in pixels.
    fn panel_size(&self) -> u32 {
        let (_, height) = self.core.applet.suggested_size(true);
        let (_, padding) = self.core.applet.suggested_padding(true);
        u32::from(height) + 2 * u32::from(padding)
    }

    /// Forward anchor and size changes reported by the panel.
    fn sync_panel(&mut self) {
        let orientation = Orientation::from(self.core.applet.anchor);
        if self.controller.orientation() != Some(orientation) {
            self.controller.change_orient(orientation);
        }

        let size = self.panel_size();
        if self.controller.panel_size() != Some(size) {
            self.controller.change_size(size);
        }
    }

    fn popup(&self) -> Option<window::Id> {
        self.controller.window().and_then(PopupMenuWindow::popup)
    }

    /// Bring the popup surface in line with the menu window's visibility.
    fn sync_popup(&self, previous: Option<window::Id>) -> app::Task<Message> {
        let current = self.popup();
        if previous == current {
            return Task::none();
        }

        let mut tasks = Vec::with_capacity(2);
        if let Some(id) = previous {
            tasks.push(destroy_popup(id));
        }
        if let (Some(id), Some(window)) = (current, self.controller.window()) {
            tasks.push(self.open_popup(id, window));
        }

        Task::batch(tasks)
    }

    fn open_popup(&self, id: window::Id, window: &PopupMenuWindow) -> app::Task<Message> {
        let Some(parent) = self.core.main_window_id() else {
            tracing::error!("Applet has no main window to anchor the menu to");
            return Task::none();
        };

        let mut popup_settings = self
            .core
            .applet
            .get_popup_settings(parent, id, None, None, None);

        let AnchorRect {
            x,
            y,
            width,
            height,
        } = window.anchor();
        popup_settings.positioner.anchor_rect = Rectangle::<i32> {
            x,
            y,
            width,
            height,
        };

        let limits = window.limits();
        popup_settings.positioner.size = None;
        popup_settings.positioner.size_limits = Limits::NONE
            .min_width(limits.min_width)
            .max_width(limits.max_width)
            .min_height(limits.min_height)
            .max_height(limits.max_height);

        get_popup(popup_settings)
    }

    fn edit_menus(&mut self, launch: Option<EditorLaunch>) {
        let Some(launch) = launch else {
            tokio::spawn(notify::notify_failure(
                fl!("editor-launch-failed"),
                fl!("editor-install-hint"),
            ));
            return;
        };

        let token_tx = self.token_tx.as_ref();
        let requested = editor::request_token(launch, |exec| {
            let tx = token_tx.ok_or_else(|| "Wayland tx is None".to_string())?;
            tx.send(TokenRequest {
                app_id: Self::APP_ID.to_string(),
                exec,
            })
            .map_err(|why| why.to_string())
        });

        match requested {
            Ok(launch) => self.pending_launch = Some(launch),
            Err(launch) => {
                tokio::spawn(editor::spawn(launch, None));
            }
        }
    }

    /// Layout for the panel as it is now. `view` can run before the next
    /// `update` forwards an anchor change to the controller.
    fn button_layout(&self) -> ButtonLayout {
        let orientation = Orientation::from(self.core.applet.anchor);
        if self.controller.orientation() == Some(orientation) {
            self.controller.layout()
        } else {
            self.controller.layout_for(orientation)
        }
    }

    fn icon_size(&self) -> u16 {
        let size = self.panel_size();
        if self.controller.panel_size() == Some(size) {
            self.controller.icon_size()
        } else {
            layout::icon_size_for_panel(size)
        }
    }

    fn button_content(&self) -> Element<'_, Message> {
        let layout = self.button_layout();

        let icon = container(
            icon::from_name(self.controller.icon_name())
                .size(self.icon_size())
                .icon(),
        )
        .padding(Padding {
            right: f32::from(layout.icon_margin_end),
            ..Padding::ZERO
        });

        let align = match layout.icon_align {
            IconAlign::Start => Alignment::Start,
            IconAlign::Center => Alignment::Center,
        };

        let content: Element<'_, Message> = if layout.vertical {
            column![icon].align_x(align).into()
        } else {
            let mut content = row![icon].align_y(Alignment::Center);
            if layout.label_visible {
                content = content.push(self.core.applet.text(self.controller.label().to_owned()));
            }
            content.into()
        };

        container(content).align_x(align).into()
    }
}

impl cosmic::Application for MenuApplet {
    type Message = Message;
    type Executor = cosmic::SingleThreadExecutor;
    type Flags = ();
    const APP_ID: &'static str = "com.system76.CosmicAppletMenu";

    fn init(core: app::Core, _flags: Self::Flags) -> (Self, app::Task<Self::Message>) {
        let config = match Config::new(Self::APP_ID, MenuAppletConfig::VERSION) {
            Ok(config) => MenuAppletConfig::get_entry(&config).unwrap_or_else(|(errs, config)| {
                for why in errs {
                    tracing::error!(%why, "Error loading menu applet config");
                }
                config
            }),
            Err(why) => {
                tracing::error!(%why, "Failed to open menu applet config");
                MenuAppletConfig::default()
            }
        };

        let mut applet = Self {
            core,
            controller: AppletController::new(PopupFactory, config),
            rectangle_tracker: None,
            token_tx: None,
            pending_launch: None,
        };

        // the panel already knows our anchor, apply it before the first frame
        applet.sync_panel();

        (applet, Task::none())
    }

    fn core(&self) -> &cosmic::app::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::app::Core {
        &mut self.core
    }

    fn style(&self) -> Option<cosmic::iced_runtime::Appearance> {
        Some(cosmic::applet::style())
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            rectangle_tracker_subscription(0).map(|e| Message::Rectangle(e.1)),
            activation_token_subscription(0).map(Message::Token),
            self.core
                .watch_config::<MenuAppletConfig>(Self::APP_ID)
                .map(|u| {
                    for why in u.errors {
                        tracing::error!(%why, "Error watching config");
                    }
                    Message::ConfigChanged(u.config)
                }),
        ])
    }

    fn update(&mut self, message: Self::Message) -> app::Task<Self::Message> {
        let previous = self.popup();
        self.sync_panel();

        match message {
            Message::Press(button) => {
                self.controller.toggle(button);
            }
            Message::CloseRequested(id) => {
                if previous == Some(id) {
                    self.controller.window_closed();
                }
                // the compositor already dropped the surface
                return Task::none();
            }
            Message::Rectangle(u) => match u {
                RectangleUpdate::Rectangle(r) => {
                    let Rectangle {
                        x,
                        y,
                        width,
                        height,
                    } = r.1;
                    self.controller.set_anchor_rect(AnchorRect {
                        x: x as i32,
                        y: y as i32,
                        width: width as i32,
                        height: height as i32,
                    });
                }
                RectangleUpdate::Init(tracker) => {
                    self.rectangle_tracker = Some(tracker);
                }
            },
            Message::ConfigChanged(config) => {
                let changed = self.controller.update_config(config);
                if !changed.is_empty() {
                    tracing::debug!(?changed, "Menu applet config updated");
                }
            }
            Message::Action(MenuAction::EditMenus) => {
                return Task::batch([
                    self.sync_popup(previous),
                    Task::perform(editor::locate(), |launch| {
                        cosmic::Action::App(Message::EditorFound(launch))
                    }),
                ]);
            }
            Message::EditorFound(launch) => {
                self.edit_menus(launch);
            }
            Message::Token(u) => match u {
                TokenUpdate::Init(tx) => {
                    self.token_tx = Some(tx);
                }
                TokenUpdate::Finished => {
                    self.token_tx = None;
                }
                TokenUpdate::ActivationToken { token, .. } => {
                    if let Some(launch) = self.pending_launch.take() {
                        tokio::spawn(editor::spawn(launch, token));
                    }
                }
            },
        }

        self.sync_popup(previous)
    }

    fn view(&self) -> Element<'_, Message> {
        let horizontal = !self.button_layout().vertical;
        let padding = self.core.applet.suggested_padding(true).0;

        let button = button::custom(self.button_content())
            .padding(if horizontal {
                [0, padding]
            } else {
                [padding, 0]
            })
            .on_press_down(Message::Press(mouse::Button::Left))
            .class(cosmic::theme::Button::AppletIcon);

        let button = mouse_area(button)
            .on_right_press(Message::Press(mouse::Button::Right))
            .on_middle_press(Message::Press(mouse::Button::Middle));

        autosize::autosize(
            if let Some(tracker) = self.rectangle_tracker.as_ref() {
                Element::from(tracker.container(0, button).ignore_bounds(true))
            } else {
                button.into()
            },
            AUTOSIZE_MAIN_ID.clone(),
        )
        .into()
    }

    fn view_window(&self, id: window::Id) -> Element<'_, Message> {
        let Spacing {
            space_xxs, space_s, ..
        } = theme::active().cosmic().spacing;

        let Some(window) = self.controller.window().filter(|w| w.popup() == Some(id)) else {
            return text("").into();
        };

        let title = padded_control(text::heading(format!(
            "{} · {}",
            self.controller.label(),
            window.kind().display_name()
        )));

        let actions = Column::with_children(window.actions().iter().map(|action| {
            menu_button(text::body(action.label()))
                .on_press(Message::Action(*action))
                .into()
        }));

        let separator = padded_control(divider::horizontal::default()).padding([space_xxs, space_s]);

        let content = if window.header_at_top() {
            column![actions, separator, title]
        } else {
            column![title, separator, actions]
        }
        .padding([8, 0]);

        let content = match window.kind() {
            WindowKind::Classic => container(content),
            WindowKind::Dash => container(content).width(Length::Fill).height(Length::Fill),
        };

        let limits = window.limits();
        self.core
            .applet
            .popup_container(content)
            .max_width(limits.max_width)
            .max_height(limits.max_height)
            .into()
    }

    fn on_close_requested(&self, id: window::Id) -> Option<Message> {
        Some(Message::CloseRequested(id))
    }
}
