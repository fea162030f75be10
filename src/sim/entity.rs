//! Level actors
//!
//! An entity is a handle to a stage node plus the `finishing` flag. Drawing
//! state lives in the stage; removal is either immediate or deferred until
//! an explosion animation has played.

use crate::assets::SpriteClip;
use crate::consts::{EXPLOSION_ANIMATION_SPEED, EXPLOSION_FRAME_MS};
use crate::sim::collision::Rect;
use crate::sim::timers::{TimerAction, TimerQueue};
use crate::stage::{NodeId, Stage, Visual};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
}

/// How an entity leaves the stage once finished
#[derive(Debug, Clone, PartialEq)]
pub enum Exit {
    /// Detach right away
    Immediate,
    /// Swap to an explosion clip and detach once it has played
    Explode { clip: SpriteClip, delay_ms: f64 },
}

impl Exit {
    /// Explosion exit lasting one pass over `clip`
    pub fn explode(clip: SpriteClip) -> Self {
        let delay_ms = clip.len() as f64 * EXPLOSION_FRAME_MS;
        Exit::Explode { clip, delay_ms }
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: EntityKind,
    pub node: NodeId,
    finishing: bool,
    exit: Exit,
}

impl Entity {
    pub fn new(kind: EntityKind, node: NodeId, exit: Exit) -> Self {
        Self {
            kind,
            node,
            finishing: false,
            exit,
        }
    }

    pub fn is_finishing(&self) -> bool {
        self.finishing
    }

    /// Current root-space bounds
    pub fn bounds(&self, stage: &Stage) -> Rect {
        stage.bounds(self.node)
    }

    /// Queue the entity for removal
    ///
    /// Only the first call has an effect; it returns whether this call did
    /// the finishing.
    pub fn finish(&mut self, stage: &mut Stage, timers: &mut TimerQueue, now_ms: f64) -> bool {
        if self.finishing {
            return false;
        }
        self.finishing = true;

        match &self.exit {
            Exit::Immediate => {
                stage.detach(self.node);
            }
            Exit::Explode { clip, delay_ms } => {
                let tint = match &stage.node(self.node).visual {
                    Visual::Sprite { tint, .. } => *tint,
                    _ => 0xffffff,
                };
                stage.set_visual(
                    self.node,
                    Visual::sprite(clip.clone(), EXPLOSION_ANIMATION_SPEED, tint),
                );
                timers.schedule(now_ms + delay_ms, TimerAction::Detach(self.node));
            }
        }

        log::debug!("{:?} {:?} finishing", self.kind, self.node);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Node;
    use glam::Vec2;
    use proptest::prelude::*;

    fn explosion() -> SpriteClip {
        SpriteClip::new(
            vec!["explosion_frame_01.png".into(), "explosion_frame_02.png".into()],
            Vec2::new(16.0, 12.0),
        )
    }

    fn enemy_clip() -> SpriteClip {
        SpriteClip::new(vec!["enemy_01_frame_01.png".into()], Vec2::new(16.0, 10.0))
    }

    fn spawn(stage: &mut Stage, kind: EntityKind) -> Entity {
        let root = stage.root();
        let node = stage.spawn(root, Node::sprite(enemy_clip(), 0.2, 0xffffff));
        let exit = match kind {
            EntityKind::Projectile => Exit::Immediate,
            _ => Exit::explode(explosion()),
        };
        Entity::new(kind, node, exit)
    }

    #[test]
    fn test_explosion_delay_is_frames_times_frame_time() {
        assert_eq!(
            Exit::explode(explosion()),
            Exit::Explode {
                clip: explosion(),
                delay_ms: 300.0
            }
        );
    }

    #[test]
    fn test_projectile_detaches_immediately() {
        let mut stage = Stage::new();
        let mut timers = TimerQueue::new();
        let mut bullet = spawn(&mut stage, EntityKind::Projectile);

        assert!(bullet.finish(&mut stage, &mut timers, 0.0));
        assert!(bullet.is_finishing());
        assert_eq!(stage.parent(bullet.node), None);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_enemy_explodes_then_detaches() {
        let mut stage = Stage::new();
        let mut timers = TimerQueue::new();
        let mut enemy = spawn(&mut stage, EntityKind::Enemy);

        assert!(enemy.finish(&mut stage, &mut timers, 1000.0));
        // Still attached while the explosion plays
        assert!(stage.is_attached(enemy.node));
        assert_eq!(
            stage.node(enemy.node).visual.current_frame(),
            Some("explosion_frame_01.png")
        );
        assert_eq!(stage.node(enemy.node).size, Vec2::new(16.0, 12.0));

        assert!(timers.take_due(1299.0).is_empty());
        assert_eq!(timers.take_due(1300.0), vec![TimerAction::Detach(enemy.node)]);
    }

    proptest! {
        #[test]
        fn prop_finish_is_idempotent(calls in 1usize..8, enemy in any::<bool>()) {
            let kind = if enemy { EntityKind::Enemy } else { EntityKind::Projectile };
            let mut stage = Stage::new();
            let mut timers = TimerQueue::new();
            let mut entity = spawn(&mut stage, kind);

            let first = entity.finish(&mut stage, &mut timers, 0.0);
            let visual = stage.node(entity.node).visual.clone();
            let parent = stage.parent(entity.node);
            let pending = timers.len();

            for _ in 1..calls {
                prop_assert!(!entity.finish(&mut stage, &mut timers, 0.0));
            }

            prop_assert!(first);
            prop_assert!(entity.is_finishing());
            prop_assert_eq!(&stage.node(entity.node).visual, &visual);
            prop_assert_eq!(stage.parent(entity.node), parent);
            prop_assert_eq!(timers.len(), pending);
        }
    }
}
