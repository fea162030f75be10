//! Asset service
//!
//! - `manager`: manifest, load requests with progress, decoded asset cache
//! - `source`: where bytes come from (memory, disk, HTTP)
//! - `atlas`: sprite sheet geometry and animation clips
//! - `font`: bitmap font metrics

pub mod atlas;
pub mod font;
pub mod manager;
pub mod source;

pub use atlas::{SpriteAtlas, SpriteClip};
pub use font::BitmapFont;
pub use manager::{Asset, AssetKind, AssetManager, AssetManifest, LoadProgress, LoadRequest};
pub use source::{AssetSource, MemorySource};

#[cfg(not(target_arch = "wasm32"))]
pub use source::DirSource;
#[cfg(target_arch = "wasm32")]
pub use source::FetchSource;

/// Sprite sheet holding every level sprite
pub const SPRITE_SHEET: &str = "spaceinvaders";
/// Font used by all text
pub const UI_FONT: &str = "SimpleSmallPixel7";
