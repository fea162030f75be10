//! Pixel Invaders entry point
//!
//! In the browser the game runs on a canvas with keyboard controls. The
//! native binary plays a headless autopilot round and logs how it ended.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use pixel_invaders::assets::source::{BUNDLED_SPRITE_SHEET, join_url};
    use pixel_invaders::assets::{AssetManager, AssetManifest, FetchSource, SPRITE_SHEET, SpriteAtlas};
    use pixel_invaders::platform::WebHost;
    use pixel_invaders::scenes::Scenes;
    use pixel_invaders::{GameConfig, SceneManager, Settings};

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pixel Invaders starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let config = GameConfig::default();
        let settings = Settings::load();

        let mut host = WebHost::new(canvas, config.clone(), &settings).expect("Failed to set up canvas");

        // Sprite frames come from the bundled atlas; the image is fetched by the browser
        match SpriteAtlas::from_json(SPRITE_SHEET, BUNDLED_SPRITE_SHEET) {
            Ok(atlas) => {
                let url = join_url(&config.asset_root, &format!("sprites/{}", atlas.meta.image));
                if let Err(e) = host.presenter_mut().load_sheet(atlas, &url) {
                    log::warn!("Sprite sheet image unavailable: {:?}", e);
                }
            }
            Err(e) => log::warn!("Bundled sprite sheet unreadable: {}", e),
        }

        let assets = AssetManager::new(
            AssetManifest::bundled(),
            FetchSource::new(config.asset_root.clone()),
        );
        let mut manager = SceneManager::new(host, assets, Scenes::new(config));
        if let Err(e) = manager.start().await {
            log::error!("Game stopped: {}", e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pixel_invaders::assets::{AssetManager, AssetManifest, DirSource, MemorySource};
    use pixel_invaders::platform::HeadlessHost;
    use pixel_invaders::scenes::{SceneKind, Scenes};
    use pixel_invaders::sim::TickInput;
    use pixel_invaders::{GameConfig, SceneManager};

    env_logger::init();
    log::info!("Pixel Invaders (native) starting...");

    let config = GameConfig::default();
    let assets = match std::env::args().nth(1) {
        Some(dir) => {
            log::info!("Loading assets from {}", dir);
            let manifest_path = std::path::Path::new(&dir).join("manifest.json");
            let manifest = match std::fs::read_to_string(&manifest_path) {
                Ok(json) => AssetManifest::from_json(&json).unwrap_or_else(|e| {
                    log::warn!("Bad manifest {}: {}", manifest_path.display(), e);
                    AssetManifest::bundled()
                }),
                Err(_) => AssetManifest::bundled(),
            };
            AssetManager::new(manifest, DirSource::new(dir))
        }
        None => AssetManager::new(AssetManifest::bundled(), MemorySource::bundled()),
    };

    // Sweep across the playfield, firing every 12 frames
    let host = HeadlessHost::new(60 * 120)
        .with_input(|frame| {
            let phase = (frame + 50) / 100 % 2;
            TickInput {
                left: phase == 1,
                right: phase == 0,
                fire: frame % 12 == 0,
            }
        })
        .stop_after_outcome(30);

    let mut manager = SceneManager::new(host, assets, Scenes::new(config));
    if let Err(e) = pollster::block_on(manager.start()) {
        log::error!("Game stopped: {}", e);
        std::process::exit(1);
    }

    let host = manager.host();
    match host.scenes().last() {
        Some(SceneKind::Win) => log::info!("Autopilot won after {} frames", host.frames()),
        Some(SceneKind::GameOver) => log::info!("Autopilot lost after {} frames", host.frames()),
        _ => log::info!("No outcome after {} frames", host.frames()),
    }
    log::info!("Sounds played: {}", host.sounds().len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
