//! Pixel Invaders - a small Space Invaders clone
//!
//! Core modules:
//! - `stage`: Retained 2D scene graph (nodes, transforms, bounds)
//! - `sim`: Level simulation (formation, player, projectiles, collisions)
//! - `scenes`: Scene lifecycle and the fixed loading -> level -> outcome sequence
//! - `assets`: Asset manifest, loading with progress, sprite atlas and font metrics
//! - `renderer`: Draw list construction and the Canvas2D presenter
//! - `platform`: Browser and headless hosts

pub mod assets;
pub mod audio;
pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod scenes;
pub mod settings;
pub mod sim;
pub mod stage;
pub mod ui;

pub use config::GameConfig;
pub use error::{AssetError, GameError};
pub use scenes::{SceneKind, SceneManager};
pub use settings::Settings;
pub use stage::{NodeId, Stage};

/// Game tuning constants
///
/// Speeds are in world units per tick delta, where a delta of 1.0 is one
/// frame at 60 fps.
pub mod consts {
    use glam::Vec2;

    /// Length of one nominal frame
    pub const TARGET_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest delta a single tick may carry (a 10 fps frame)
    pub const MAX_TICK_DELTA: f32 = 6.0;

    /// Ticks between two formation steps
    pub const FORMATION_STEP_TICKS: f32 = 30.0;
    /// Formation displacement per step, cycled in order
    pub const FORMATION_PATTERN: [Vec2; 10] = [
        Vec2::new(-10.0, 0.0),
        Vec2::new(-10.0, 0.0),
        Vec2::new(0.0, 10.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(0.0, 10.0),
        Vec2::new(-10.0, 0.0),
        Vec2::new(-10.0, 0.0),
    ];
    pub const FORMATION_COLUMNS: usize = 10;
    pub const FORMATION_ROWS: usize = 2;
    pub const FORMATION_SPACING: Vec2 = Vec2::new(25.0, 20.0);
    /// Gap between the header band and the first enemy row
    pub const FORMATION_TOP_OFFSET: f32 = 30.0;
    /// Distance to the player's row below which the invasion succeeds
    pub const INVASION_MARGIN: f32 = 20.0;

    /// Gap between the footer band and the player
    pub const PLAYER_ROW_OFFSET: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 2.0;

    pub const PROJECTILE_SPEED: f32 = 5.0;
    pub const PROJECTILE_LIFETIME_MS: f64 = 5000.0;
    /// Projectiles spawn this far above the player
    pub const PROJECTILE_SPAWN_OFFSET: f32 = 10.0;

    /// Animation speeds in frames per tick
    pub const ENEMY_ANIMATION_SPEED: f32 = 0.2;
    pub const EXPLOSION_ANIMATION_SPEED: f32 = 0.1;
    /// Time one explosion frame stays on screen
    pub const EXPLOSION_FRAME_MS: f64 = 150.0;

    /// How long the level keeps running after its outcome is decided
    pub const LEVEL_EXIT_MS: f64 = 1000.0;

    pub const TITLE_TEXT_SIZE: f32 = 35.0;
    pub const STATUS_TEXT_SIZE: f32 = 15.0;
    /// Loading dots added per second
    pub const DOTS_PER_SECOND: f32 = 4.0;
    pub const MAX_DOTS: f32 = 4.0;
}
