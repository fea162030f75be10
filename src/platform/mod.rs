//! Platform abstraction layer
//!
//! Implementations of the scene [`Host`](crate::scenes::Host):
//! - `HeadlessHost`: fixed frames and scripted input (native demo, tests)
//! - `WebHost`: requestAnimationFrame, keyboard, resize, Canvas2D, Web Audio

pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessHost;

#[cfg(target_arch = "wasm32")]
pub use web::WebHost;
