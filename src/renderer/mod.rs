//! Rendering module
//!
//! The stage is flattened into a [`DrawList`] each frame; the Canvas2D
//! presenter paints it in the browser.

pub mod draw;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use draw::{DrawCommand, DrawList, css_color, stage_origin};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPresenter;
