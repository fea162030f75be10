//! Win and game over screens

use glam::Vec2;

use super::{Frame, Host, Scene, SceneKind};
use crate::assets::font::measure;
use crate::assets::{AssetManager, UI_FONT};
use crate::config::GameConfig;
use crate::consts::TITLE_TEXT_SIZE;
use crate::error::GameError;
use crate::stage::{Node, Stage};

pub struct OutcomeScene {
    kind: SceneKind,
    config: GameConfig,
    stage: Stage,
}

impl OutcomeScene {
    pub fn new(kind: SceneKind, config: GameConfig) -> Self {
        Self {
            kind,
            config,
            stage: Stage::new(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self.kind {
            SceneKind::Win => "You Win!",
            _ => "Game Over :(",
        }
    }
}

impl Scene for OutcomeScene {
    fn kind(&self) -> SceneKind {
        self.kind
    }

    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    async fn on_created<H: Host>(
        &mut self,
        _host: &mut H,
        assets: &mut AssetManager,
    ) -> Result<(), GameError> {
        let text = self.message();
        let width = measure(assets.font(UI_FONT), text, TITLE_TEXT_SIZE);
        let root = self.stage.root();
        self.stage.spawn(
            root,
            Node::text(text, TITLE_TEXT_SIZE, self.config.colors.primary_text, width)
                .at(Vec2::new(0.0, -10.0)),
        );
        log::info!("{text}");
        Ok(())
    }

    fn update<H: Host>(&mut self, _frame: &Frame, _host: &mut H) -> Option<SceneKind> {
        None
    }

    async fn finish<H: Host>(&mut self, _host: &mut H) {}
}
