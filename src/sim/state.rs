//! Level state and layout
//!
//! Everything one playthrough needs: the player, the enemy formation, live
//! projectiles, the formation clock and the level's own timers.

use glam::Vec2;

use super::entity::{Entity, EntityKind, Exit};
use super::timers::{TimerAction, TimerQueue};
use crate::assets::{SpriteAtlas, SpriteClip};
use crate::config::GameConfig;
use crate::consts::*;
use crate::error::AssetError;
use crate::sim::collision::Rect;
use crate::stage::{Node, NodeId, Stage};

/// Something that happened during a tick, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ProjectileFired,
    EnemyDestroyed,
    PlayerDestroyed,
    Won,
    Lost,
}

/// How the level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Sprite clips the level draws with
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSprites {
    pub enemy: SpriteClip,
    pub player: SpriteClip,
    pub projectile: SpriteClip,
    pub explosion: SpriteClip,
}

impl LevelSprites {
    pub fn from_atlas(atlas: &SpriteAtlas) -> Result<Self, AssetError> {
        Ok(Self {
            enemy: atlas.clip("enemy_01")?,
            player: atlas.clip("cannon_frame_01.png")?,
            projectile: atlas.clip("bullet_frame_01.png")?,
            explosion: atlas.clip("explosion")?,
        })
    }
}

/// Complete state of one level
#[derive(Debug, Clone)]
pub struct LevelState {
    pub player: Entity,
    /// Live enemies in spawn order
    pub enemies: Vec<Entity>,
    /// Live projectiles in fire order
    pub projectiles: Vec<Entity>,
    /// Detached nodes of finished projectiles, reused by the next shots
    spare_projectiles: Vec<NodeId>,
    /// Container the enemies are positioned in
    pub formation: NodeId,
    /// Container every level node hangs from
    pub layer: NodeId,
    /// Next formation step to apply
    pub pattern_index: usize,
    /// Ticks accumulated toward the next formation step
    pub formation_ticks: f32,
    /// Wall-clock time since the level started
    pub clock_ms: f64,
    pub timers: TimerQueue,
    pub won: bool,
    pub lost: bool,
    /// Local y of the player's row edge the formation must not reach
    pub invasion_line: f32,
    sprites: LevelSprites,
    events: Vec<GameEvent>,
}

impl LevelState {
    /// Build the level layout under `parent`
    pub fn new(config: &GameConfig, sprites: LevelSprites, stage: &mut Stage, parent: NodeId) -> Self {
        let (left, top) = (config.left(), config.top());
        let band = config.band_height();
        let colors = &config.colors;

        stage.set_mask(Some(Rect::new(left, top, config.width, config.height)));

        let layer = stage.spawn(parent, Node::container());
        stage.spawn(
            layer,
            Node::rect(Vec2::new(config.width, config.height), colors.secondary_background)
                .at(Vec2::new(left, top)),
        );
        stage.spawn(
            layer,
            Node::rect(Vec2::new(config.width, band), colors.primary_background)
                .at(Vec2::new(left, top))
                .with_z(100),
        );
        stage.spawn(
            layer,
            Node::rect(Vec2::new(config.width, band), colors.primary_background)
                .at(Vec2::new(left, top + config.height - band))
                .with_z(100),
        );

        let formation_origin = Vec2::new(
            -((FORMATION_COLUMNS - 1) as f32) * FORMATION_SPACING.x / 2.0,
            top + band + FORMATION_TOP_OFFSET,
        );
        let formation = stage.spawn(layer, Node::container().at(formation_origin));

        let mut enemies = Vec::with_capacity(FORMATION_ROWS * FORMATION_COLUMNS);
        for row in 0..FORMATION_ROWS {
            for column in 0..FORMATION_COLUMNS {
                let position = Vec2::new(column as f32, row as f32) * FORMATION_SPACING;
                let node = stage.spawn(
                    formation,
                    Node::sprite(sprites.enemy.clone(), ENEMY_ANIMATION_SPEED, 0xffffff).at(position),
                );
                enemies.push(Entity::new(
                    EntityKind::Enemy,
                    node,
                    Exit::explode(sprites.explosion.clone()),
                ));
            }
        }

        let invasion_line = config.height / 2.0 - band;
        let player_node = stage.spawn(
            layer,
            Node::sprite(sprites.player.clone(), 0.0, 0xffffff)
                .at(Vec2::new(0.0, invasion_line - PLAYER_ROW_OFFSET)),
        );
        let player = Entity::new(
            EntityKind::Player,
            player_node,
            Exit::explode(sprites.explosion.clone()),
        );

        log::debug!("Level built with {} enemies", enemies.len());

        Self {
            player,
            enemies,
            projectiles: Vec::new(),
            spare_projectiles: Vec::new(),
            formation,
            layer,
            pattern_index: 0,
            formation_ticks: 0.0,
            clock_ms: 0.0,
            timers: TimerQueue::new(),
            won: false,
            lost: false,
            invasion_line,
            sprites,
            events: Vec::new(),
        }
    }

    /// Spawn a projectile just above the player; it self-destructs after its lifetime
    pub fn fire_projectile(&mut self, stage: &mut Stage) -> NodeId {
        let position = stage.node(self.player.node).position - Vec2::new(0.0, PROJECTILE_SPAWN_OFFSET);
        let node = match self.spare_projectiles.pop() {
            Some(node) => {
                stage.set_position(node, position);
                stage.add_child(self.layer, node);
                node
            }
            None => stage.spawn(
                self.layer,
                Node::sprite(self.sprites.projectile.clone(), 0.0, 0xffffff).at(position),
            ),
        };
        self.projectiles
            .push(Entity::new(EntityKind::Projectile, node, Exit::Immediate));
        self.timers
            .schedule(self.clock_ms + PROJECTILE_LIFETIME_MS, TimerAction::Expire(node));
        self.events.push(GameEvent::ProjectileFired);
        node
    }

    /// Run a due timer action
    pub(crate) fn apply_timer(&mut self, stage: &mut Stage, action: TimerAction) {
        match action {
            TimerAction::Detach(node) => {
                stage.detach(node);
            }
            TimerAction::Expire(node) => {
                let now = self.clock_ms;
                if let Some(projectile) = self.projectiles.iter_mut().find(|p| p.node == node) {
                    projectile.finish(stage, &mut self.timers, now);
                }
            }
        }
    }

    /// Drop finished projectiles and keep their nodes for later shots
    pub(crate) fn reclaim_projectiles(&mut self) {
        let (finished, live): (Vec<Entity>, Vec<Entity>) = std::mem::take(&mut self.projectiles)
            .into_iter()
            .partition(Entity::is_finishing);
        self.projectiles = live;
        for projectile in finished {
            // A reused node must not inherit the old lifetime
            self.timers.cancel(TimerAction::Expire(projectile.node));
            self.spare_projectiles.push(projectile.node);
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The decided outcome; a win takes precedence
    pub fn outcome(&self) -> Option<Outcome> {
        if self.won {
            Some(Outcome::Won)
        } else if self.lost {
            Some(Outcome::Lost)
        } else {
            None
        }
    }
}
