//! Scene lifecycle
//!
//! A scene owns a stage and moves through: created -> `on_created` awaited
//! -> updated once per frame -> `finish` awaited -> dropped. The
//! [`SceneManager`] holds at most one active scene and runs the fixed
//! loading -> level -> outcome sequence.

pub mod level;
pub mod loading;
pub mod manager;
pub mod outcome;

pub use level::LevelScene;
pub use loading::LoadingScene;
pub use manager::SceneManager;
pub use outcome::OutcomeScene;

use glam::Vec2;

use crate::assets::AssetManager;
use crate::audio::SoundEffect;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::sim::{Tick, TickInput};
use crate::stage::Stage;

/// Every scene the game can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Loading,
    Level,
    Win,
    GameOver,
}

/// One host frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    pub tick: Tick,
    pub input: TickInput,
    /// New viewport size, if the host was resized since the last frame
    pub resize: Option<(f32, f32)>,
}

/// Rendering and timing collaborator
#[allow(async_fn_in_trait)]
pub trait Host {
    /// Wait for the next frame; `None` once the host shuts down
    async fn next_frame(&mut self) -> Option<Frame>;

    /// Draw the stage
    fn present(&mut self, stage: &Stage);

    fn play_sound(&mut self, _effect: SoundEffect) {}

    /// Called after a scene became active
    fn scene_changed(&mut self, _kind: SceneKind) {}
}

/// A full-screen unit with its own setup and teardown
#[allow(async_fn_in_trait)]
pub trait Scene {
    fn kind(&self) -> SceneKind;

    fn stage(&self) -> &Stage;

    fn stage_mut(&mut self) -> &mut Stage;

    /// Load assets and build the scene
    async fn on_created<H: Host>(
        &mut self,
        host: &mut H,
        assets: &mut AssetManager,
    ) -> Result<(), GameError>;

    /// Advance one frame; returns the scene to switch to, if any
    fn update<H: Host>(&mut self, frame: &Frame, host: &mut H) -> Option<SceneKind>;

    /// Play the exit behaviour; resolves once it is complete
    async fn finish<H: Host>(&mut self, host: &mut H);

    fn on_resize(&mut self, width: f32, height: f32) {
        self.stage_mut().set_viewport(Vec2::new(width, height));
    }
}

/// Builds scenes by kind
pub trait SceneFactory {
    type Scene: Scene;

    fn create(&mut self, kind: SceneKind) -> Self::Scene;
}

/// The game's scenes
pub enum GameScene {
    Loading(LoadingScene),
    Level(LevelScene),
    Outcome(OutcomeScene),
}

impl Scene for GameScene {
    fn kind(&self) -> SceneKind {
        match self {
            GameScene::Loading(s) => s.kind(),
            GameScene::Level(s) => s.kind(),
            GameScene::Outcome(s) => s.kind(),
        }
    }

    fn stage(&self) -> &Stage {
        match self {
            GameScene::Loading(s) => s.stage(),
            GameScene::Level(s) => s.stage(),
            GameScene::Outcome(s) => s.stage(),
        }
    }

    fn stage_mut(&mut self) -> &mut Stage {
        match self {
            GameScene::Loading(s) => s.stage_mut(),
            GameScene::Level(s) => s.stage_mut(),
            GameScene::Outcome(s) => s.stage_mut(),
        }
    }

    async fn on_created<H: Host>(
        &mut self,
        host: &mut H,
        assets: &mut AssetManager,
    ) -> Result<(), GameError> {
        match self {
            GameScene::Loading(s) => s.on_created(host, assets).await,
            GameScene::Level(s) => s.on_created(host, assets).await,
            GameScene::Outcome(s) => s.on_created(host, assets).await,
        }
    }

    fn update<H: Host>(&mut self, frame: &Frame, host: &mut H) -> Option<SceneKind> {
        match self {
            GameScene::Loading(s) => s.update(frame, host),
            GameScene::Level(s) => s.update(frame, host),
            GameScene::Outcome(s) => s.update(frame, host),
        }
    }

    async fn finish<H: Host>(&mut self, host: &mut H) {
        match self {
            GameScene::Loading(s) => s.finish(host).await,
            GameScene::Level(s) => s.finish(host).await,
            GameScene::Outcome(s) => s.finish(host).await,
        }
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        match self {
            GameScene::Loading(s) => s.on_resize(width, height),
            GameScene::Level(s) => s.on_resize(width, height),
            GameScene::Outcome(s) => s.on_resize(width, height),
        }
    }
}

/// Factory for [`GameScene`]s sharing one configuration
#[derive(Debug, Clone, Default)]
pub struct Scenes {
    config: GameConfig,
}

impl Scenes {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }
}

impl SceneFactory for Scenes {
    type Scene = GameScene;

    fn create(&mut self, kind: SceneKind) -> GameScene {
        match kind {
            SceneKind::Loading => GameScene::Loading(LoadingScene::new(self.config.clone())),
            SceneKind::Level => GameScene::Level(LevelScene::new(self.config.clone())),
            SceneKind::Win | SceneKind::GameOver => {
                GameScene::Outcome(OutcomeScene::new(kind, self.config.clone()))
            }
        }
    }
}
