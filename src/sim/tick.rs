//! Per-frame level simulation
//!
//! One call to [`tick`] per rendered frame. The order of the steps is
//! fixed: movement, then collisions, then removal of finished entities,
//! then the outcome checks.

use glam::Vec2;

use super::collision::aabb_overlap;
use super::state::{GameEvent, LevelState};
use crate::consts::*;
use crate::stage::Stage;

/// Time covered by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Frame length in nominal 60 fps frames
    pub delta: f32,
    /// Wall-clock milliseconds since the previous frame
    pub elapsed_ms: f64,
}

impl Default for Tick {
    fn default() -> Self {
        Self {
            delta: 1.0,
            elapsed_ms: TARGET_FRAME_MS,
        }
    }
}

impl Tick {
    pub fn from_elapsed_ms(elapsed_ms: f64) -> Self {
        let elapsed_ms = elapsed_ms.max(0.0);
        Self {
            delta: ((elapsed_ms / TARGET_FRAME_MS) as f32).min(MAX_TICK_DELTA),
            elapsed_ms,
        }
    }
}

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Fire one projectile
    pub fire: bool,
}

/// Advance the level by one frame
pub fn tick(level: &mut LevelState, stage: &mut Stage, input: &TickInput, frame: &Tick) {
    let delta = frame.delta;
    level.clock_ms += frame.elapsed_ms;
    stage.animate(delta);

    for action in level.timers.take_due(level.clock_ms) {
        level.apply_timer(stage, action);
    }

    if input.fire {
        level.fire_projectile(stage);
    }

    // Formation
    level.formation_ticks += delta;
    if level.formation_ticks >= FORMATION_STEP_TICKS {
        let step = FORMATION_PATTERN[level.pattern_index];
        stage.translate(level.formation, step);
        level.pattern_index = (level.pattern_index + 1) % FORMATION_PATTERN.len();
        level.formation_ticks = 0.0;
    }

    for projectile in &level.projectiles {
        stage.translate(projectile.node, Vec2::new(0.0, -PROJECTILE_SPEED * delta));
    }

    if input.left {
        stage.translate(level.player.node, Vec2::new(-PLAYER_SPEED * delta, 0.0));
    }
    if input.right {
        stage.translate(level.player.node, Vec2::new(PLAYER_SPEED * delta, 0.0));
    }

    resolve_collisions(level, stage);

    level.reclaim_projectiles();
    level.enemies.retain(|e| !e.is_finishing());

    if level.enemies.is_empty() && !level.won {
        level.won = true;
        level.push_event(GameEvent::Won);
        log::info!("Formation destroyed");
    }

    if stage.parent(level.player.node).is_none() && !level.lost {
        level.lost = true;
        level.push_event(GameEvent::Lost);
        log::info!("Player destroyed");
    }
}

fn resolve_collisions(level: &mut LevelState, stage: &mut Stage) {
    let now = level.clock_ms;
    let mut destroyed = 0;

    // Already-finishing entities stay in play until the end of the tick
    for projectile in level.projectiles.iter_mut() {
        for enemy in level.enemies.iter_mut() {
            if aabb_overlap(&projectile.bounds(stage), &enemy.bounds(stage)) {
                projectile.finish(stage, &mut level.timers, now);
                if enemy.finish(stage, &mut level.timers, now) {
                    destroyed += 1;
                }
            }
        }
    }

    let formation_y = stage.node(level.formation).position.y;
    let mut player_hit = false;
    for enemy in &level.enemies {
        if aabb_overlap(&enemy.bounds(stage), &level.player.bounds(stage)) {
            player_hit = true;
        }
        let abs_y = formation_y + stage.node(enemy.node).position.y;
        if level.invasion_line - abs_y < INVASION_MARGIN {
            player_hit = true;
        }
    }

    for _ in 0..destroyed {
        level.push_event(GameEvent::EnemyDestroyed);
    }
    if player_hit && level.player.finish(stage, &mut level.timers, now) {
        level.push_event(GameEvent::PlayerDestroyed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Outcome;
    use crate::sim::state::tests::new_level;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn count(events: &[GameEvent], kind: GameEvent) -> usize {
        events.iter().filter(|&&e| e == kind).count()
    }

    #[test]
    fn test_pattern_net_displacement() {
        let net = FORMATION_PATTERN.iter().copied().sum::<Vec2>();
        assert_eq!(net, Vec2::new(0.0, 20.0));
    }

    #[test]
    fn test_formation_cycle_after_300_ticks() {
        let (mut level, mut stage) = new_level();
        let start = stage.node(level.formation).position;

        for n in 1..=300 {
            tick(&mut level, &mut stage, &idle(), &Tick::default());
            if n == 29 {
                assert_eq!(stage.node(level.formation).position, start);
            }
            if n == 30 {
                assert_eq!(stage.node(level.formation).position, start + Vec2::new(-10.0, 0.0));
            }
        }

        assert_eq!(level.pattern_index, 0);
        assert_eq!(stage.node(level.formation).position, start + Vec2::new(0.0, 20.0));
    }

    #[test]
    fn test_player_moves_without_clamp() {
        let (mut level, mut stage) = new_level();
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut level, &mut stage, &input, &Tick::default());
        }
        // Well past the right edge at 168
        assert_eq!(stage.node(level.player.node).position.x, 400.0);

        let both = TickInput {
            left: true,
            right: true,
            fire: false,
        };
        tick(&mut level, &mut stage, &both, &Tick::default());
        assert_eq!(stage.node(level.player.node).position.x, 400.0);
    }

    #[test]
    fn test_projectile_moves_up() {
        let (mut level, mut stage) = new_level();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut level, &mut stage, &fire, &Tick::default());
        let node = level.projectiles[0].node;
        // Spawned at 120, then moved in the same tick
        assert_eq!(stage.node(node).position, Vec2::new(0.0, 115.0));

        let double = Tick {
            delta: 2.0,
            elapsed_ms: 2.0 * TARGET_FRAME_MS,
        };
        tick(&mut level, &mut stage, &idle(), &double);
        assert_eq!(stage.node(node).position.y, 105.0);
    }

    #[test]
    fn test_projectile_hits_enemy() {
        let (mut level, mut stage) = new_level();
        let target = level.enemies[3].node;
        let bullet = level.fire_projectile(&mut stage);
        stage.set_position(bullet, stage.world_position(target));
        level.drain_events();

        tick(&mut level, &mut stage, &idle(), &Tick::default());

        assert_eq!(level.enemies.len(), 19);
        assert!(level.projectiles.is_empty());
        assert!(!stage.is_attached(bullet));
        // Exploding, not yet removed
        assert!(stage.is_attached(target));
        assert_eq!(level.drain_events(), vec![GameEvent::EnemyDestroyed]);

        // Explosion lasts 2 frames x 150 ms
        for _ in 0..17 {
            tick(&mut level, &mut stage, &idle(), &Tick::default());
        }
        assert!(stage.is_attached(target));
        for _ in 0..2 {
            tick(&mut level, &mut stage, &idle(), &Tick::default());
        }
        assert!(!stage.is_attached(target));
    }

    #[test]
    fn test_non_overlapping_pairs_unaffected() {
        let (mut level, mut stage) = new_level();
        // x = 0 runs between the two middle columns
        level.fire_projectile(&mut stage);
        tick(&mut level, &mut stage, &idle(), &Tick::default());
        assert_eq!(level.enemies.len(), 20);
        assert_eq!(level.projectiles.len(), 1);
        assert!(level.enemies.iter().all(|e| !e.is_finishing()));
    }

    #[test]
    fn test_one_projectile_finishes_two_enemies() {
        let (mut level, mut stage) = new_level();
        let (a, b) = (level.enemies[0].node, level.enemies[1].node);
        stage.set_position(b, stage.node(a).position);
        let bullet = level.fire_projectile(&mut stage);
        stage.set_position(bullet, stage.world_position(a));
        level.drain_events();

        tick(&mut level, &mut stage, &idle(), &Tick::default());

        assert_eq!(level.enemies.len(), 18);
        assert_eq!(count(&level.drain_events(), GameEvent::EnemyDestroyed), 2);
    }

    #[test]
    fn test_two_projectiles_on_one_enemy() {
        let (mut level, mut stage) = new_level();
        let target = level.enemies[0].node;
        let first = level.fire_projectile(&mut stage);
        let second = level.fire_projectile(&mut stage);
        stage.set_position(first, stage.world_position(target));
        stage.set_position(second, stage.world_position(target) + Vec2::new(0.0, 2.0));
        level.drain_events();

        tick(&mut level, &mut stage, &idle(), &Tick::default());

        assert!(level.projectiles.is_empty());
        assert!(!stage.is_attached(first));
        assert!(!stage.is_attached(second));
        assert_eq!(level.drain_events(), vec![GameEvent::EnemyDestroyed]);
    }

    #[test]
    fn test_win_fires_once() {
        let (mut level, mut stage) = new_level();
        for enemy in level.enemies.iter_mut() {
            enemy.finish(&mut stage, &mut level.timers, 0.0);
        }

        let mut events = Vec::new();
        for _ in 0..10 {
            tick(&mut level, &mut stage, &idle(), &Tick::default());
            events.extend(level.drain_events());
        }

        assert!(level.won);
        assert_eq!(count(&events, GameEvent::Won), 1);
        assert_eq!(level.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_invasion_loses_once() {
        let (mut level, mut stage) = new_level();
        // Second row reaches 150 - 15 = 135, inside the 20 unit margin
        stage.set_position(level.formation, Vec2::new(-112.5, 115.0));

        let mut events = Vec::new();
        for _ in 0..60 {
            tick(&mut level, &mut stage, &idle(), &Tick::default());
            events.extend(level.drain_events());
        }

        assert!(level.lost);
        assert!(!level.won);
        assert_eq!(count(&events, GameEvent::PlayerDestroyed), 1);
        assert_eq!(count(&events, GameEvent::Lost), 1);
        assert_eq!(stage.parent(level.player.node), None);
    }

    #[test]
    fn test_lost_waits_for_explosion() {
        let (mut level, mut stage) = new_level();
        // Park an enemy on the player
        let enemy = level.enemies[0].node;
        let player = stage.world_position(level.player.node);
        let formation = stage.node(level.formation).position;
        stage.set_position(enemy, player - formation);

        tick(&mut level, &mut stage, &idle(), &Tick::default());
        assert!(level.player.is_finishing());
        assert!(!level.lost);

        let late = Tick {
            delta: 1.0,
            elapsed_ms: 301.0,
        };
        tick(&mut level, &mut stage, &idle(), &late);
        assert!(level.lost);
    }

    #[test]
    fn test_projectile_expires_at_lifetime() {
        let (mut level, mut stage) = new_level();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let instant = Tick {
            delta: 0.0,
            elapsed_ms: 0.0,
        };
        tick(&mut level, &mut stage, &fire, &instant);
        let bullet = level.projectiles[0].node;

        let almost = Tick {
            delta: 0.0,
            elapsed_ms: PROJECTILE_LIFETIME_MS - 1.0,
        };
        tick(&mut level, &mut stage, &idle(), &almost);
        assert_eq!(level.projectiles.len(), 1);
        assert!(stage.is_attached(bullet));

        let rest = Tick {
            delta: 0.0,
            elapsed_ms: 1.0,
        };
        tick(&mut level, &mut stage, &idle(), &rest);
        assert!(level.projectiles.is_empty());
        assert!(!stage.is_attached(bullet));
    }

    #[test]
    fn test_projectile_nodes_are_reused() {
        let (mut level, mut stage) = new_level();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut level, &mut stage, &fire, &Tick::default());
        let first = level.projectiles[0].node;
        let nodes = stage.node_count();

        let expire = Tick {
            delta: 0.0,
            elapsed_ms: PROJECTILE_LIFETIME_MS,
        };
        tick(&mut level, &mut stage, &idle(), &expire);
        assert!(level.projectiles.is_empty());
        assert!(!stage.is_attached(first));

        let instant = Tick {
            delta: 0.0,
            elapsed_ms: 0.0,
        };
        tick(&mut level, &mut stage, &fire, &instant);
        assert_eq!(level.projectiles[0].node, first);
        assert!(stage.is_attached(first));
        assert_eq!(stage.node(first).position, Vec2::new(0.0, 120.0));
        assert_eq!(stage.node_count(), nodes);
    }

    #[test]
    fn test_reused_projectile_keeps_its_own_lifetime() {
        let (mut level, mut stage) = new_level();
        let target = level.enemies[3].node;
        // Fired at 0 ms, due to expire at 5000 ms
        let bullet = level.fire_projectile(&mut stage);
        stage.set_position(bullet, stage.world_position(target));
        tick(&mut level, &mut stage, &idle(), &Tick::default());
        assert!(level.projectiles.is_empty());

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let later = Tick {
            delta: 0.0,
            elapsed_ms: 4000.0,
        };
        tick(&mut level, &mut stage, &fire, &later);
        assert_eq!(level.projectiles[0].node, bullet);

        // Past the first shot's deadline, well before the second's
        let past_first = Tick {
            delta: 0.0,
            elapsed_ms: 1500.0,
        };
        tick(&mut level, &mut stage, &idle(), &past_first);
        assert_eq!(level.projectiles.len(), 1);
        assert!(stage.is_attached(bullet));
    }

    #[test]
    fn test_tick_from_elapsed() {
        let tick = Tick::from_elapsed_ms(TARGET_FRAME_MS * 2.0);
        assert!((tick.delta - 2.0).abs() < 1e-5);
        assert_eq!(Tick::from_elapsed_ms(10_000.0).delta, MAX_TICK_DELTA);
        assert_eq!(Tick::from_elapsed_ms(-5.0).delta, 0.0);
    }
}
