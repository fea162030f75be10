//! Reusable text widgets built on the stage

pub mod dots;

pub use dots::DotsText;
