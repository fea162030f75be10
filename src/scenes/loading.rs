//! Loading screen
//!
//! Shows a percentage and an animated "Loading ..." status while the level
//! assets load. Host frames keep arriving during the load, so the dots keep
//! moving and resizes still land.

use std::cell::Cell;
use std::future::{Future, poll_fn};
use std::pin::{Pin, pin};
use std::task::Poll;

use glam::Vec2;

use super::{Frame, Host, Scene, SceneKind};
use crate::assets::font::measure;
use crate::assets::{AssetKind, AssetManager, BitmapFont, LoadProgress, LoadRequest, SPRITE_SHEET, UI_FONT};
use crate::config::GameConfig;
use crate::consts::{STATUS_TEXT_SIZE, TITLE_TEXT_SIZE};
use crate::error::GameError;
use crate::stage::{Node, NodeId, Stage, Visual};
use crate::ui::DotsText;

pub struct LoadingScene {
    config: GameConfig,
    stage: Stage,
    font: Option<BitmapFont>,
    percent: Option<NodeId>,
    status: Option<DotsText>,
}

impl LoadingScene {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            stage: Stage::new(),
            font: None,
            percent: None,
            status: None,
        }
    }

    /// Assets the level needs
    pub fn request() -> LoadRequest {
        LoadRequest::new()
            .with(AssetKind::Sprite, [SPRITE_SHEET])
            .with(AssetKind::Font, [UI_FONT])
    }

    fn build(&mut self) {
        let color = self.config.colors.primary_text;
        let root = self.stage.root();
        let width = measure(self.font.as_ref(), "0%", TITLE_TEXT_SIZE);
        self.percent = Some(self.stage.spawn(
            root,
            Node::text("0%", TITLE_TEXT_SIZE, color, width).at(Vec2::new(0.0, -10.0)),
        ));

        let status = DotsText::new(
            &mut self.stage,
            root,
            "Loading",
            STATUS_TEXT_SIZE,
            color,
            self.font.clone(),
        );
        self.stage.set_position(status.root, Vec2::new(0.0, 30.0));
        self.status = Some(status);
    }

    fn on_progress(&mut self, progress: LoadProgress) {
        if let Some(percent) = self.percent {
            let text = format!("{}%", progress.percent);
            let width = measure(self.font.as_ref(), &text, TITLE_TEXT_SIZE);
            self.stage.set_text(percent, &text, width);
        }
        if let Some(status) = &mut self.status {
            status.set_text(&mut self.stage, &format!("Loading {}", progress.what));
        }
    }

    pub fn status(&self) -> Option<&DotsText> {
        self.status.as_ref()
    }

    /// Text of the percentage label
    pub fn percent_text(&self) -> Option<&str> {
        match &self.stage.node(self.percent?).visual {
            Visual::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

impl Scene for LoadingScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Loading
    }

    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    async fn on_created<H: Host>(
        &mut self,
        host: &mut H,
        assets: &mut AssetManager,
    ) -> Result<(), GameError> {
        self.font = assets.font(UI_FONT).cloned();
        self.build();
        host.present(&self.stage);

        let latest = Cell::new(None);
        let request = Self::request();
        let mut load = pin!(assets.load(&request, |progress: LoadProgress| {
            log::debug!("Loading {}: {}%", progress.what, progress.percent);
            latest.set(Some(progress));
        }));

        let mut host_running = true;
        let result = loop {
            if !host_running {
                break load.as_mut().await;
            }
            match first_ready(load.as_mut(), host.next_frame()).await {
                Either::Loaded(result) => break result,
                Either::Frame(Some(frame)) => {
                    if let Some(progress) = latest.take() {
                        self.on_progress(progress);
                    }
                    if let Some((width, height)) = frame.resize {
                        self.on_resize(width, height);
                    }
                    self.update(&frame, host);
                    host.present(&self.stage);
                }
                Either::Frame(None) => host_running = false,
            }
        };

        if let Some(progress) = latest.take() {
            self.on_progress(progress);
        }
        host.present(&self.stage);
        result?;
        Ok(())
    }

    fn update<H: Host>(&mut self, frame: &Frame, _host: &mut H) -> Option<SceneKind> {
        if let Some(status) = &mut self.status {
            status.tick(&mut self.stage, frame.tick.delta);
        }
        None
    }

    async fn finish<H: Host>(&mut self, _host: &mut H) {}
}

enum Either<L, F> {
    Loaded(L),
    Frame(F),
}

/// Poll the load, then the frame; resolves with whichever is ready first
///
/// The load is borrowed so it can be resumed after a frame wins.
async fn first_ready<L: Future, F: Future>(
    mut load: Pin<&mut L>,
    frame: F,
) -> Either<L::Output, F::Output> {
    let mut frame = pin!(frame);
    poll_fn(move |cx| {
        if let Poll::Ready(out) = load.as_mut().poll(cx) {
            return Poll::Ready(Either::Loaded(out));
        }
        frame.as_mut().poll(cx).map(Either::Frame)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::source::tests::SlowSource;
    use crate::assets::{AssetManifest, MemorySource};
    use crate::platform::HeadlessHost;

    #[test]
    fn test_loading_reports_progress() {
        let mut host = HeadlessHost::new(0);
        let mut assets = AssetManager::new(AssetManifest::bundled(), MemorySource::bundled());
        let mut scene = LoadingScene::new(GameConfig::default());

        pollster::block_on(scene.on_created(&mut host, &mut assets)).unwrap();

        assert_eq!(scene.percent_text(), Some("100%"));
        assert!(assets.atlas(SPRITE_SHEET).is_ok());
        assert!(assets.font(UI_FONT).is_some());
        // Everything was ready on the first poll: initial and final screens only
        assert_eq!(host.presented(), 2);
        assert_eq!(host.frames(), 0);
    }

    #[test]
    fn test_dots_advance_during_slow_load() {
        let mut host = HeadlessHost::new(1000);
        let mut assets = AssetManager::new(AssetManifest::bundled(), SlowSource::bundled(10));
        let mut scene = LoadingScene::new(GameConfig::default());

        pollster::block_on(scene.on_created(&mut host, &mut assets)).unwrap();

        // Two assets, ten pending polls each, one frame per pending poll
        assert_eq!(host.frames(), 20);
        assert_eq!(host.presented(), 22);
        // 20 frames at 4 dots per second
        assert_eq!(scene.status().map(DotsText::dots), Some(1));
        assert_eq!(scene.percent_text(), Some("100%"));
    }

    #[test]
    fn test_load_finishes_after_host_stops() {
        let mut host = HeadlessHost::new(5);
        let mut assets = AssetManager::new(AssetManifest::bundled(), SlowSource::bundled(10));
        let mut scene = LoadingScene::new(GameConfig::default());

        pollster::block_on(scene.on_created(&mut host, &mut assets)).unwrap();

        assert_eq!(host.frames(), 5);
        assert_eq!(scene.percent_text(), Some("100%"));
        assert!(assets.atlas(SPRITE_SHEET).is_ok());
    }

    #[test]
    fn test_resize_during_load_reaches_stage() {
        let mut host = HeadlessHost::new(1000).with_viewport(800.0, 600.0);
        let mut assets = AssetManager::new(AssetManifest::bundled(), SlowSource::bundled(2));
        let mut scene = LoadingScene::new(GameConfig::default());

        pollster::block_on(scene.on_created(&mut host, &mut assets)).unwrap();

        assert!(host.frames() > 0);
        assert_eq!(scene.stage().viewport(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_missing_asset_fails() {
        let mut host = HeadlessHost::new(0);
        let mut assets = AssetManager::new(AssetManifest::bundled(), MemorySource::new());
        let mut scene = LoadingScene::new(GameConfig::default());

        let result = pollster::block_on(scene.on_created(&mut host, &mut assets));
        assert!(matches!(result, Err(GameError::Asset(_))));
    }
}
