use std::sync::Arc;

use canvas_lord::{
    resolve_app_paths, AssetError, AssetManager, Assets, Color, LoopConfig, Scene, StartupError,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::assets::register_game_assets;
use super::scenes::{LevelScene, MenuScene};
use super::settings::{load_settings, settings_path, Settings, SettingsError};

pub(crate) const CANVAS_WIDTH: u32 = 480;
pub(crate) const CANVAS_HEIGHT: u32 = 270;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) assets: Arc<Assets>,
    pub(crate) root: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Paths(#[from] StartupError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Assets(#[from] AssetError),
}

/// Everything scenes need from startup, shared by every scene they push.
#[derive(Debug, Clone)]
pub(crate) struct GameContext {
    pub(crate) assets: Arc<Assets>,
    pub(crate) settings: Arc<Settings>,
}

#[cfg(test)]
impl GameContext {
    /// Every game asset registered against an empty directory, so each image
    /// loads as a placeholder.
    pub(crate) fn for_tests(settings: Settings) -> Self {
        let mut manager = AssetManager::new("missing-test-assets");
        register_game_assets(&mut manager).expect("game asset keys are valid");
        Self {
            assets: Arc::new(manager.load_assets()),
            settings: Arc::new(settings),
        }
    }
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Scrub Brawl Startup ===");

    let paths = resolve_app_paths()?;
    let settings = load_settings(&settings_path(&paths.root))?;

    let mut manager = AssetManager::new(&paths.assets_dir);
    register_game_assets(&mut manager)?;
    let assets = Arc::new(manager.load_assets());

    let context = GameContext {
        assets: Arc::clone(&assets),
        settings: Arc::new(settings),
    };
    let root: Box<dyn Scene> = if context.settings.auto_level {
        Box::new(LevelScene::new(context))
    } else {
        Box::new(MenuScene::new(context))
    };

    let config = LoopConfig {
        window_title: "Scrub Brawl".to_string(),
        window_width: CANVAS_WIDTH * 2,
        window_height: CANVAS_HEIGHT * 2,
        canvas_width: CANVAS_WIDTH,
        canvas_height: CANVAS_HEIGHT,
        background: Color::rgb(0x10, 0x10, 0x10),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        assets,
        root,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
