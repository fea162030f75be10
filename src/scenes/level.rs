//! The playable level

use super::{Frame, Host, Scene, SceneKind};
use crate::assets::{AssetKind, AssetManager, LoadRequest, SPRITE_SHEET};
use crate::audio::SoundEffect;
use crate::config::GameConfig;
use crate::consts::LEVEL_EXIT_MS;
use crate::error::GameError;
use crate::sim::{LevelSprites, LevelState, Outcome, TickInput, tick};
use crate::stage::Stage;

pub struct LevelScene {
    config: GameConfig,
    stage: Stage,
    level: Option<LevelState>,
    /// Set once the outcome transition has been requested
    exiting: bool,
}

impl LevelScene {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            stage: Stage::new(),
            level: None,
            exiting: false,
        }
    }

    pub fn level(&self) -> Option<&LevelState> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut LevelState> {
        self.level.as_mut()
    }

    fn simulate<H: Host>(&mut self, frame: &Frame, input: &TickInput, host: &mut H) {
        let Some(level) = &mut self.level else {
            return;
        };
        tick(level, &mut self.stage, input, &frame.tick);
        for event in level.drain_events() {
            host.play_sound(SoundEffect::for_event(event));
        }
    }
}

impl Scene for LevelScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Level
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
        let request = LoadRequest::new().with(AssetKind::Sprite, [SPRITE_SHEET]);
        assets.load(&request, |_| {}).await?;

        let sprites = LevelSprites::from_atlas(assets.atlas(SPRITE_SHEET)?)?;
        let root = self.stage.root();
        self.level = Some(LevelState::new(&self.config, sprites, &mut self.stage, root));
        log::info!("Level started");
        Ok(())
    }

    fn update<H: Host>(&mut self, frame: &Frame, host: &mut H) -> Option<SceneKind> {
        self.simulate(frame, &frame.input, host);

        if self.exiting {
            return None;
        }
        let outcome = self.level.as_ref()?.outcome()?;
        self.exiting = true;
        Some(match outcome {
            Outcome::Won => SceneKind::Win,
            Outcome::Lost => SceneKind::GameOver,
        })
    }

    /// Keep the level running without input for a moment before leaving
    async fn finish<H: Host>(&mut self, host: &mut H) {
        let mut elapsed = 0.0;
        while elapsed < LEVEL_EXIT_MS {
            let Some(frame) = host.next_frame().await else {
                break;
            };
            if let Some((width, height)) = frame.resize {
                self.on_resize(width, height);
            }
            elapsed += frame.tick.elapsed_ms;
            self.simulate(&frame, &TickInput::default(), host);
            host.present(&self.stage);
        }
        log::debug!("Level exit after {elapsed:.0} ms");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetManifest, MemorySource};
    use crate::platform::HeadlessHost;
    use glam::Vec2;

    fn created_scene(host: &mut HeadlessHost) -> LevelScene {
        let mut assets = AssetManager::new(AssetManifest::bundled(), MemorySource::bundled());
        let mut scene = LevelScene::new(GameConfig::default());
        pollster::block_on(scene.on_created(host, &mut assets)).unwrap();
        scene
    }

    #[test]
    fn test_requests_outcome_once() {
        let mut host = HeadlessHost::new(0);
        let mut scene = created_scene(&mut host);
        let level = scene.level_mut().unwrap();
        level.lost = true;

        let frame = Frame::default();
        assert_eq!(scene.update(&frame, &mut host), Some(SceneKind::GameOver));
        assert_eq!(scene.update(&frame, &mut host), None);
    }

    #[test]
    fn test_win_wins_over_loss() {
        let mut host = HeadlessHost::new(0);
        let mut scene = created_scene(&mut host);
        let level = scene.level_mut().unwrap();
        level.won = true;
        level.lost = true;
        assert_eq!(scene.update(&Frame::default(), &mut host), Some(SceneKind::Win));
    }

    #[test]
    fn test_finish_runs_for_exit_delay() {
        let mut host = HeadlessHost::new(1000).with_frame_ms(20.0);
        let mut scene = created_scene(&mut host);
        let formation = scene.level().unwrap().formation;
        let start = scene.stage().node(formation).position;

        pollster::block_on(scene.finish(&mut host));

        assert_eq!(host.frames(), 50);
        assert_eq!(host.presented(), 50);
        // Still simulating: the formation has stepped
        assert_ne!(scene.stage().node(formation).position, start);
    }

    #[test]
    fn test_fire_plays_sound() {
        let mut host = HeadlessHost::new(0);
        let mut scene = created_scene(&mut host);
        let frame = Frame {
            input: TickInput {
                fire: true,
                ..Default::default()
            },
            ..Default::default()
        };
        scene.update(&frame, &mut host);
        assert_eq!(host.sounds(), &[SoundEffect::Fire]);
    }
}
