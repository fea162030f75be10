//! Asset manager
//!
//! One explicitly constructed instance per application. It knows the
//! manifest (id -> path per category), loads requested ids through an
//! [`AssetSource`], decodes them and keeps them for every later scene.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::atlas::SpriteAtlas;
use super::font::BitmapFont;
use super::source::{AssetSource, BUNDLED_MANIFEST};
use crate::error::AssetError;

/// Asset category, in load order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Image,
    Sprite,
    Font,
    Sound,
}

impl AssetKind {
    pub const LOAD_ORDER: [AssetKind; 4] = [
        AssetKind::Image,
        AssetKind::Sprite,
        AssetKind::Font,
        AssetKind::Sound,
    ];

    /// Label shown on the loading screen
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Image => "graphics",
            AssetKind::Sprite => "sprites",
            AssetKind::Font => "fonts",
            AssetKind::Sound => "audio",
        }
    }
}

/// Every asset the game may load, by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub images: BTreeMap<String, String>,
    pub sprites: BTreeMap<String, String>,
    pub fonts: BTreeMap<String, String>,
    pub sounds: BTreeMap<String, String>,
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        serde_json::from_str(json).map_err(|e| AssetError::Parse {
            id: "manifest".to_string(),
            reason: e.to_string(),
        })
    }

    /// Manifest of the assets compiled into the binary
    pub fn bundled() -> Self {
        // The bundled manifest is checked by tests; fall back to empty rather than panic
        Self::from_json(BUNDLED_MANIFEST).unwrap_or_default()
    }

    pub fn entries(&self, kind: AssetKind) -> &BTreeMap<String, String> {
        match kind {
            AssetKind::Image => &self.images,
            AssetKind::Sprite => &self.sprites,
            AssetKind::Font => &self.fonts,
            AssetKind::Sound => &self.sounds,
        }
    }

    fn entries_mut(&mut self, kind: AssetKind) -> &mut BTreeMap<String, String> {
        match kind {
            AssetKind::Image => &mut self.images,
            AssetKind::Sprite => &mut self.sprites,
            AssetKind::Font => &mut self.fonts,
            AssetKind::Sound => &mut self.sounds,
        }
    }

    pub fn insert(&mut self, kind: AssetKind, id: impl Into<String>, path: impl Into<String>) {
        self.entries_mut(kind).insert(id.into(), path.into());
    }

    pub fn path(&self, kind: AssetKind, id: &str) -> Option<&str> {
        self.entries(kind).get(id).map(String::as_str)
    }
}

/// A decoded asset
#[derive(Debug, Clone)]
pub enum Asset {
    Image(Vec<u8>),
    Atlas(SpriteAtlas),
    Font(BitmapFont),
    Sound(Vec<u8>),
}

/// Ids to load, grouped by category
///
/// A category that is present but empty still counts toward progress and
/// completes immediately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadRequest {
    categories: Vec<(AssetKind, Vec<String>)>,
}

impl LoadRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every asset in the manifest
    pub fn all(manifest: &AssetManifest) -> Self {
        AssetKind::LOAD_ORDER
            .iter()
            .fold(Self::new(), |request, &kind| {
                request.with(kind, manifest.entries(kind).keys().cloned())
            })
    }

    /// Request `ids` of `kind`, replacing any previous ids for that category
    pub fn with<I, S>(mut self, kind: AssetKind, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        self.categories.retain(|(k, _)| *k != kind);
        self.categories.push((kind, ids));
        self.categories.sort_by_key(|(k, _)| {
            AssetKind::LOAD_ORDER.iter().position(|o| o == k)
        });
        self
    }

    pub fn categories(&self) -> &[(AssetKind, Vec<String>)] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Progress report sent after each asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Whole percent across all requested categories (0..=100)
    pub percent: u32,
    /// Category label of the asset just handled
    pub what: &'static str,
}

/// Loads and caches assets named in a manifest
pub struct AssetManager {
    manifest: AssetManifest,
    source: Box<dyn AssetSource>,
    loaded: HashMap<(AssetKind, String), Asset>,
}

impl AssetManager {
    pub fn new(manifest: AssetManifest, source: impl AssetSource + 'static) -> Self {
        Self {
            manifest,
            source: Box::new(source),
            loaded: HashMap::new(),
        }
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Load every requested asset that is not already cached
    ///
    /// Categories load in [`AssetKind::LOAD_ORDER`]; the first failure aborts
    /// the whole request.
    pub async fn load<F>(&mut self, request: &LoadRequest, mut on_progress: F) -> Result<(), AssetError>
    where
        F: FnMut(LoadProgress),
    {
        let categories = request.categories();
        let mut done = vec![0.0f64; categories.len()];

        for (index, (kind, ids)) in categories.iter().enumerate() {
            let kind = *kind;
            if ids.is_empty() {
                done[index] = 1.0;
                on_progress(progress(&done, kind));
                continue;
            }

            for (n, id) in ids.iter().enumerate() {
                if !self.is_loaded(kind, id) {
                    let path = self
                        .manifest
                        .path(kind, id)
                        .ok_or_else(|| AssetError::Unknown { id: id.clone() })?
                        .to_string();
                    let bytes = self.source.fetch(&path).await?;
                    let asset = decode(kind, id, bytes)?;
                    log::debug!("Loaded {} `{}` from {}", kind.label(), id, path);
                    self.loaded.insert((kind, id.clone()), asset);
                }
                done[index] = (n + 1) as f64 / ids.len() as f64;
                on_progress(progress(&done, kind));
            }
        }

        Ok(())
    }

    pub fn is_loaded(&self, kind: AssetKind, id: &str) -> bool {
        self.loaded.contains_key(&(kind, id.to_string()))
    }

    pub fn get(&self, kind: AssetKind, id: &str) -> Option<&Asset> {
        self.loaded.get(&(kind, id.to_string()))
    }

    /// A loaded sprite atlas
    pub fn atlas(&self, id: &str) -> Result<&SpriteAtlas, AssetError> {
        match self.get(AssetKind::Sprite, id) {
            Some(Asset::Atlas(atlas)) => Ok(atlas),
            _ => Err(AssetError::NotLoaded { id: id.to_string() }),
        }
    }

    /// A loaded bitmap font, if any
    pub fn font(&self, id: &str) -> Option<&BitmapFont> {
        match self.get(AssetKind::Font, id) {
            Some(Asset::Font(font)) => Some(font),
            _ => None,
        }
    }
}

fn progress(done: &[f64], kind: AssetKind) -> LoadProgress {
    let mean = done.iter().sum::<f64>() / done.len() as f64;
    LoadProgress {
        percent: (mean * 100.0).floor() as u32,
        what: kind.label(),
    }
}

fn decode(kind: AssetKind, id: &str, bytes: Vec<u8>) -> Result<Asset, AssetError> {
    let text = |bytes: Vec<u8>| {
        String::from_utf8(bytes).map_err(|e| AssetError::Parse {
            id: id.to_string(),
            reason: e.to_string(),
        })
    };

    Ok(match kind {
        AssetKind::Image => Asset::Image(bytes),
        AssetKind::Sound => Asset::Sound(bytes),
        AssetKind::Sprite => Asset::Atlas(SpriteAtlas::from_json(id, &text(bytes)?)?),
        AssetKind::Font => Asset::Font(BitmapFont::parse(id, &text(bytes)?)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::source::MemorySource;
    use crate::assets::{SPRITE_SHEET, UI_FONT};

    fn manager_with(source: MemorySource, manifest: AssetManifest) -> AssetManager {
        AssetManager::new(manifest, source)
    }

    fn sound_manifest(n: usize) -> (AssetManifest, MemorySource) {
        let mut manifest = AssetManifest::default();
        let mut source = MemorySource::new();
        for i in 0..n {
            let path = format!("sounds/{i}.wav");
            manifest.insert(AssetKind::Sound, format!("s{i}"), path.clone());
            source.insert(&path, vec![i as u8]);
        }
        (manifest, source)
    }

    #[test]
    fn test_bundled_manifest_parses() {
        let manifest = AssetManifest::from_json(BUNDLED_MANIFEST).unwrap();
        assert!(manifest.path(AssetKind::Sprite, SPRITE_SHEET).is_some());
        assert!(manifest.path(AssetKind::Font, UI_FONT).is_some());
        assert_eq!(manifest, AssetManifest::bundled());
    }

    #[test]
    fn test_load_bundled_assets() {
        let mut assets = manager_with(MemorySource::bundled(), AssetManifest::bundled());
        let request = LoadRequest::all(assets.manifest());
        pollster::block_on(assets.load(&request, |_| {})).unwrap();

        let atlas = assets.atlas(SPRITE_SHEET).unwrap();
        assert!(atlas.clip("explosion").is_ok());
        assert!(assets.font(UI_FONT).is_some());
    }

    #[test]
    fn test_progress_across_categories() {
        let (mut manifest, mut source) = sound_manifest(2);
        manifest.insert(AssetKind::Image, "logo", "images/logo.png");
        source.insert("images/logo.png", vec![0u8; 4]);
        let mut assets = manager_with(source, manifest);

        let request = LoadRequest::new()
            .with(AssetKind::Sound, ["s0", "s1"])
            .with(AssetKind::Image, ["logo"])
            .with(AssetKind::Font, Vec::<String>::new());

        let mut reports = Vec::new();
        pollster::block_on(assets.load(&request, |p| reports.push(p))).unwrap();

        let percents: Vec<u32> = reports.iter().map(|p| p.percent).collect();
        let labels: Vec<&str> = reports.iter().map(|p| p.what).collect();
        assert_eq!(percents, vec![33, 66, 83, 100]);
        assert_eq!(labels, vec!["graphics", "fonts", "audio", "audio"]);
    }

    #[test]
    fn test_already_loaded_assets_are_not_fetched_again() {
        let (manifest, source) = sound_manifest(1);
        let mut assets = manager_with(source, manifest);
        let request = LoadRequest::new().with(AssetKind::Sound, ["s0"]);
        pollster::block_on(assets.load(&request, |_| {})).unwrap();

        // Swap in an empty source: a second load must be served from cache
        assets.source = Box::new(MemorySource::new());
        let mut last = None;
        pollster::block_on(assets.load(&request, |p| last = Some(p.percent))).unwrap();
        assert_eq!(last, Some(100));
    }

    #[test]
    fn test_unknown_id_fails() {
        let mut assets = manager_with(MemorySource::new(), AssetManifest::default());
        let request = LoadRequest::new().with(AssetKind::Sprite, ["ghost"]);
        let err = pollster::block_on(assets.load(&request, |_| {})).unwrap_err();
        assert!(matches!(err, AssetError::Unknown { ref id } if id == "ghost"));
    }

    #[test]
    fn test_fetch_failure_aborts_load() {
        let mut manifest = AssetManifest::default();
        manifest.insert(AssetKind::Sprite, "sheet", "sprites/sheet.json");
        let mut assets = manager_with(MemorySource::new(), manifest);
        let request = LoadRequest::new().with(AssetKind::Sprite, ["sheet"]);
        assert!(pollster::block_on(assets.load(&request, |_| {})).is_err());
        assert!(matches!(assets.atlas("sheet"), Err(AssetError::NotLoaded { .. })));
    }

    #[test]
    fn test_request_keeps_load_order() {
        let request = LoadRequest::new()
            .with(AssetKind::Sound, ["a"])
            .with(AssetKind::Sprite, ["b"])
            .with(AssetKind::Sprite, ["c"]);
        let kinds: Vec<AssetKind> = request.categories().iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, vec![AssetKind::Sprite, AssetKind::Sound]);
        assert_eq!(request.categories()[0].1, vec!["c".to_string()]);
    }
}
