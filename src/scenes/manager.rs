//! Scene sequencing
//!
//! Holds at most one active scene. A switch awaits the current scene's
//! `finish`, drops it, then makes the next one active and awaits its
//! `on_created`. A failed `on_created` leaves no scene active.

use glam::Vec2;

use super::{Host, Scene, SceneFactory, SceneKind, Scenes};
use crate::assets::{AssetKind, AssetManager, LoadRequest, UI_FONT};
use crate::error::GameError;

pub struct SceneManager<H: Host, F: SceneFactory = Scenes> {
    host: H,
    assets: AssetManager,
    factory: F,
    current: Option<F::Scene>,
    /// Loaded by `start` before the first scene
    preload: LoadRequest,
    viewport: Option<(f32, f32)>,
}

impl<H: Host, F: SceneFactory> SceneManager<H, F> {
    pub fn new(host: H, assets: AssetManager, factory: F) -> Self {
        Self {
            host,
            assets,
            factory,
            current: None,
            preload: LoadRequest::new().with(AssetKind::Font, [UI_FONT]),
            viewport: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn assets(&self) -> &AssetManager {
        &self.assets
    }

    pub fn active(&self) -> Option<&F::Scene> {
        self.current.as_ref()
    }

    pub fn active_kind(&self) -> Option<SceneKind> {
        self.current.as_ref().map(Scene::kind)
    }

    /// Replace the active scene with a new scene of `kind`
    pub async fn switch_scene(&mut self, kind: SceneKind) -> Result<(), GameError> {
        if let Some(mut previous) = self.current.take() {
            previous.finish(&mut self.host).await;
            // Frames pulled inside the scene may have carried a resize
            self.remember_viewport(previous.stage().viewport());
            log::debug!("Scene {:?} finished", previous.kind());
        }

        let scene = self.current.insert(self.factory.create(kind));
        if let Some((width, height)) = self.viewport {
            scene.on_resize(width, height);
        }

        if let Err(e) = scene.on_created(&mut self.host, &mut self.assets).await {
            log::error!("Failed to create scene {kind:?}: {e}");
            self.current = None;
            return Err(e);
        }
        let size = scene.stage().viewport();
        self.remember_viewport(size);

        log::info!("Switched to scene {kind:?}");
        self.host.scene_changed(kind);
        Ok(())
    }

    fn remember_viewport(&mut self, size: Vec2) {
        if size.x > 0.0 && size.y > 0.0 {
            self.viewport = Some((size.x, size.y));
        }
    }

    /// Run the fixed sequence (loading, then level) and drive frames until the host stops
    pub async fn start(&mut self) -> Result<(), GameError> {
        if !self.preload.is_empty() {
            self.assets.load(&self.preload, |_| {}).await?;
        }
        self.switch_scene(SceneKind::Loading).await?;
        self.switch_scene(SceneKind::Level).await?;
        self.run().await
    }

    /// Update and present the active scene once per host frame
    pub async fn run(&mut self) -> Result<(), GameError> {
        while let Some(frame) = self.host.next_frame().await {
            if let Some((width, height)) = frame.resize {
                self.on_resize(width, height);
            }

            let Some(scene) = self.current.as_mut() else {
                break;
            };
            let next = scene.update(&frame, &mut self.host);
            self.host.present(scene.stage());

            if let Some(kind) = next {
                self.switch_scene(kind).await?;
            }
        }
        log::info!("Host stopped");
        Ok(())
    }

    /// Forward a viewport resize to the active scene
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = Some((width, height));
        if let Some(scene) = self.current.as_mut() {
            scene.on_resize(width, height);
        }
    }
}
