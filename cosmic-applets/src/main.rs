// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> cosmic::iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let _ = tracing_log::LogTracer::init();

    let Some(applet) = std::env::args().next() else {
        return Ok(());
    };

    let cmd = applet.rsplit_once('/').map_or(applet.as_str(), |s| s.1);

    tracing::info!("Starting `{cmd}` with version {VERSION}");

    match cmd {
        "cosmic-applet-menu" => cosmic_applet_menu::run(),
        _ => {
            tracing::warn!("Unknown applet `{cmd}`");
            Ok(())
        }
    }
}
