// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use std::{collections::HashMap, time::Duration};
use zbus::{Connection, proxy, zvariant::Value};

const APP_NAME: &str = "COSMIC Menu";
const ERROR_ICON: &str = "dialog-error-symbolic";
const ERROR_TIMEOUT: Duration = Duration::from_millis(4000);

#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: &'static str,
    pub timeout: Duration,
}

impl Notification {
    pub fn error(title: String, body: String) -> Self {
        Self {
            title,
            body,
            icon: ERROR_ICON,
            timeout: ERROR_TIMEOUT,
        }
    }

    fn expire_timeout(&self) -> i32 {
        i32::try_from(self.timeout.as_millis()).unwrap_or(i32::MAX)
    }
}

pub async fn send(notification: &Notification) -> zbus::Result<u32> {
    let conn = Connection::session().await?;
    let proxy = NotificationsProxy::new(&conn).await?;

    proxy
        .notify(
            APP_NAME,
            0,
            notification.icon,
            &notification.title,
            &notification.body,
            &[],
            HashMap::new(),
            notification.expire_timeout(),
        )
        .await
}

/// Tell the user an action failed. Delivery errors are logged and the
/// message is mirrored to stderr.
pub async fn notify_failure(title: String, body: String) {
    let notification = Notification::error(title, body);

    if let Err(why) = send(&notification).await {
        tracing::warn!(%why, "Failed to send notification");
        eprintln!(
            "\tTitle: {}\n\tBody: {}",
            notification.title, notification.body
        );
    }
}
