//! Level simulation
//!
//! All gameplay logic lives here:
//! - One `tick` per rendered frame, steps in a fixed order
//! - Entities are stage node handles plus a `finishing` flag
//! - Deferred removals run from the level's own timer queue
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{Rect, aabb_overlap};
pub use entity::{Entity, EntityKind, Exit};
pub use state::{GameEvent, LevelSprites, LevelState, Outcome};
pub use tick::{Tick, TickInput, tick};
pub use timers::{TimerAction, TimerQueue};
