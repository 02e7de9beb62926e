//! OT Policy Manager - desktop editor for overtime policy applications.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use ot_policy_manager as app;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::config::{AppConfig, ConfigLoadResult};
use app::store::PolicyStore;
use app::ui::App;

/// Desktop editor for overtime policy applications.
#[derive(Parser)]
#[command(name = "ot-policy-manager", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Path to config file
    #[arg(long, value_name = "PATH", conflicts_with = "dev")]
    config: Option<PathBuf>,

    /// Keep policies in the local store regardless of config
    #[arg(long)]
    local: bool,
}

/// Log to stdout and a daily file in the data directory.
fn init_logging() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(AppConfig::data_dir().join("logs"), "ot-policy-manager.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    guard
}

/// Load config, falling back to defaults. Returns the error to show on startup, if any.
fn load_config(path: &Path) -> (AppConfig, Option<String>) {
    match AppConfig::try_load(path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            (config, None)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, writing defaults");
            let config = AppConfig::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to write default config: {}", e);
            }
            (config, None)
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid: {}", e);
            (AppConfig::default(), Some(format!("{e}. Defaults are in use.")))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    tracing::info!("OT Policy Manager starting...");

    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        cli.config.clone().unwrap_or_else(AppConfig::default_path)
    };
    tracing::info!("Config path: {:?}", config_path);

    let (config, startup_error) = load_config(&config_path);

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let store = rt
        .block_on(PolicyStore::open(&config, cli.local))
        .context("Failed to open policy store")?;
    tracing::info!("Policy store: {}", store.backend_name());

    run_app(store, config, rt, startup_error)
}

/// Run the main application window.
fn run_app(
    store: PolicyStore,
    config: AppConfig,
    rt: tokio::runtime::Runtime,
    startup_error: Option<String>,
) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("OT Policy Manager")
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "OT Policy Manager",
        options,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            Ok(Box::new(App::new(store, config, rt, startup_error)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
