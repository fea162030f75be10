//! Where asset bytes come from
//!
//! The manager only knows manifest paths. A source turns a path into bytes:
//! from memory (bundled assets, tests), from disk (native) or over HTTP
//! (browser).

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::error::AssetError;

/// Future returned by [`AssetSource::fetch`]
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, AssetError>> + 'a>>;

/// Backend that resolves manifest paths to bytes
pub trait AssetSource {
    fn fetch<'a>(&'a self, path: &'a str) -> FetchFuture<'a>;
}

/// Join a manifest path onto a base url or directory
pub fn join_url(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if root.is_empty() {
        path.to_string()
    } else {
        format!("{root}/{path}")
    }
}

pub const BUNDLED_MANIFEST: &str = include_str!("../../assets/manifest.json");
pub const BUNDLED_SPRITE_SHEET: &str = include_str!("../../assets/sprites/spaceinvaders.json");
const BUNDLED_FONT: &str = include_str!("../../assets/fonts/SimpleSmallPixel7.fnt");

/// In-memory files keyed by manifest path
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assets compiled into the binary
    pub fn bundled() -> Self {
        Self::new()
            .with("sprites/spaceinvaders.json", BUNDLED_SPRITE_SHEET)
            .with("fonts/SimpleSmallPixel7.fnt", BUNDLED_FONT)
    }

    pub fn with(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.to_string(), bytes.into());
    }
}

impl AssetSource for MemorySource {
    fn fetch<'a>(&'a self, path: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| AssetError::Fetch {
                    url: path.to_string(),
                    reason: "not found".to_string(),
                })
        })
    }
}

/// Files under a directory on disk
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct DirSource {
    root: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DirSource {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AssetSource for DirSource {
    fn fetch<'a>(&'a self, path: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let full = self.root.join(path.trim_start_matches('/'));
            log::debug!("Reading {}", full.display());
            Ok(std::fs::read(full)?)
        })
    }
}

/// HTTP fetch relative to a base url
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct FetchSource {
    root: String,
}

#[cfg(target_arch = "wasm32")]
impl FetchSource {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(target_arch = "wasm32")]
impl AssetSource for FetchSource {
    fn fetch<'a>(&'a self, path: &'a str) -> FetchFuture<'a> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        Box::pin(async move {
            let url = join_url(&self.root, path);
            let fail = |reason: String| AssetError::Fetch {
                url: url.clone(),
                reason,
            };

            let window = web_sys::window().ok_or_else(|| fail("no window".to_string()))?;
            let response: web_sys::Response = JsFuture::from(window.fetch_with_str(&url))
                .await
                .map_err(|e| fail(format!("{e:?}")))?
                .dyn_into()
                .map_err(|_| fail("not a Response".to_string()))?;

            if !response.ok() {
                return Err(fail(format!("HTTP {}", response.status())));
            }

            let buffer = response.array_buffer().map_err(|e| fail(format!("{e:?}")))?;
            let buffer = JsFuture::from(buffer)
                .await
                .map_err(|e| fail(format!("{e:?}")))?;
            Ok(js_sys::Uint8Array::new(&buffer).to_vec())
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;
    use std::task::Poll;

    use super::*;

    /// Bundled files that each take `polls` pending polls to arrive
    pub(crate) struct SlowSource {
        inner: MemorySource,
        polls: u32,
    }

    impl SlowSource {
        pub(crate) fn bundled(polls: u32) -> Self {
            Self {
                inner: MemorySource::bundled(),
                polls,
            }
        }
    }

    impl AssetSource for SlowSource {
        fn fetch<'a>(&'a self, path: &'a str) -> FetchFuture<'a> {
            let waited = Cell::new(0);
            Box::pin(async move {
                std::future::poll_fn(|cx| {
                    if waited.get() < self.polls {
                        waited.set(waited.get() + 1);
                        cx.waker().wake_by_ref();
                        Poll::Pending
                    } else {
                        Poll::Ready(())
                    }
                })
                .await;
                self.inner.fetch(path).await
            })
        }
    }

    #[test]
    fn test_slow_source_arrives_after_polls() {
        let source = SlowSource::bundled(3);
        let bytes = pollster::block_on(source.fetch("sprites/spaceinvaders.json")).unwrap();
        assert_eq!(bytes, BUNDLED_SPRITE_SHEET.as_bytes());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("assets", "sprites/a.json"), "assets/sprites/a.json");
        assert_eq!(join_url("/", "/sprites/a.json"), "sprites/a.json");
        assert_eq!(join_url("", "a.fnt"), "a.fnt");
        assert_eq!(join_url("https://cdn/x/", "a.fnt"), "https://cdn/x/a.fnt");
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new().with("a.txt", "hello");
        let bytes = pollster::block_on(source.fetch("a.txt")).unwrap();
        assert_eq!(bytes, b"hello");
        assert!(matches!(
            pollster::block_on(source.fetch("missing.txt")),
            Err(AssetError::Fetch { .. })
        ));
    }

    #[test]
    fn test_dir_source_reads_bundled_assets() {
        let source = DirSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
        let bytes = pollster::block_on(source.fetch("manifest.json")).unwrap();
        assert_eq!(bytes, BUNDLED_MANIFEST.as_bytes());
        assert!(matches!(
            pollster::block_on(source.fetch("nope.json")),
            Err(AssetError::Io(_))
        ));
    }
}
