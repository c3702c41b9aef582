// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

//! Locating and launching an external menu editor.

use freedesktop_desktop_entry::{DesktopEntry, get_languages_from_env};
use rustix::fs::{Access, access};
use std::{
    env,
    ffi::{OsStr, OsString},
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

struct MenuEditor {
    binary: &'static str,
    desktop_id: &'static str,
}

/// Searched in order; the first installed editor wins.
const EDITORS: [MenuEditor; 2] = [
    MenuEditor {
        binary: "menulibre",
        desktop_id: "menulibre",
    },
    MenuEditor {
        binary: "mozo",
        desktop_id: "mozo",
    },
];

/// What to run for a resolved editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorLaunch {
    pub app_id: Option<String>,
    pub exec: String,
    pub terminal: bool,
}

/// Launch details read from an installed desktop entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopLaunch {
    pub exec: String,
    pub terminal: bool,
}

/// Look up an installed editor off the UI thread. Walking `$PATH` and the
/// desktop entry directories touches the filesystem.
pub async fn locate() -> Option<EditorLaunch> {
    locate_with(env::var_os("PATH")?, find_desktop_entry).await
}

async fn locate_with(
    path: OsString,
    lookup: fn(&str) -> Option<DesktopLaunch>,
) -> Option<EditorLaunch> {
    match tokio::task::spawn_blocking(move || find_editor_with(&path, lookup)).await {
        Ok(launch) => launch,
        Err(why) => {
            tracing::error!(%why, "Menu editor lookup failed");
            None
        }
    }
}

fn find_editor_with<F>(path: &OsStr, lookup: F) -> Option<EditorLaunch>
where
    F: Fn(&str) -> Option<DesktopLaunch>,
{
    EDITORS.iter().find_map(|editor| {
        let program = find_program_in_path(editor.binary, path)?;

        let launch = match lookup(editor.desktop_id) {
            Some(desktop) => EditorLaunch {
                app_id: Some(editor.desktop_id.to_owned()),
                exec: desktop.exec,
                terminal: desktop.terminal,
            },
            None => EditorLaunch {
                app_id: None,
                exec: program.to_string_lossy().into_owned(),
                terminal: false,
            },
        };

        tracing::debug!(editor = editor.binary, ?launch, "Found menu editor");
        Some(launch)
    })
}

/// Search a `PATH`-style list for an executable file.
pub fn find_program_in_path(name: &str, path: &OsStr) -> Option<PathBuf> {
    env::split_paths(path)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, Access::EXEC_OK).is_ok()
}

fn find_desktop_entry(id: &str) -> Option<DesktopLaunch> {
    let filename = format!("{id}.desktop");
    let locales = get_languages_from_env();

    for mut path in freedesktop_desktop_entry::default_paths() {
        path.push(&filename);
        let Ok(bytes) = fs::read_to_string(&path) else {
            continue;
        };
        match DesktopEntry::from_str(&path, &bytes, Some(&locales)) {
            Ok(entry) => {
                let Some(exec) = entry.exec() else {
                    tracing::warn!(?path, "Desktop entry has no `Exec`");
                    continue;
                };
                return Some(DesktopLaunch {
                    exec: exec.to_owned(),
                    terminal: entry.terminal(),
                });
            }
            Err(why) => {
                tracing::warn!(?path, %why, "Failed to parse desktop entry");
            }
        }
    }

    None
}

/// Ask for an activation token before launching. When the request can't be
/// sent the launch is handed back so the caller can start it without one.
pub fn request_token<E: Display>(
    launch: EditorLaunch,
    request: impl FnOnce(String) -> Result<(), E>,
) -> Result<EditorLaunch, EditorLaunch> {
    match request(launch.exec.clone()) {
        Ok(()) => Ok(launch),
        Err(why) => {
            tracing::error!(%why, "Failed to request activation token");
            Err(launch)
        }
    }
}

/// Start the editor, forwarding the activation token when one was granted.
pub async fn spawn(launch: EditorLaunch, token: Option<String>) {
    let mut envs = Vec::new();
    if let Some(token) = token {
        envs.push(("XDG_ACTIVATION_TOKEN".to_string(), token.clone()));
        envs.push(("DESKTOP_STARTUP_ID".to_string(), token));
    }

    cosmic::desktop::spawn_desktop_exec(
        launch.exec,
        envs,
        launch.app_id.as_deref(),
        launch.terminal,
    )
    .await;
}
