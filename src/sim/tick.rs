//! Per-frame simulation step
//!
//! [`tick`] advances the whole world by one bounded delta: it first applies
//! the collision events the evaluator reported since the previous frame,
//! then runs progression, motion, despawn/recycle and the scheduled spawn
//! and timer tasks. Timer-driven behavior (enemy spawner, blink, explosion
//! expiry, fire control) is evaluated against the simulation clock rather
//! than wall-clock callbacks, so there is exactly one timeline.

use glam::Vec2;

use super::collision::CollisionEvent;
use super::entity::EntityKind;
use super::state::{GamePhase, GameState};
use crate::config::GameConfig;
use crate::consts::BLINK_INTERVAL_SECS;
use crate::session::SoundSink;

/// What a tick wants the embedder to know.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Set exactly once per run, when the post-terminal delay expires;
    /// carries the final score.
    pub game_ended: Option<u32>,
}

/// Advance the game by `dt` seconds, resolving `events` first.
pub fn tick(
    state: &mut GameState,
    config: &GameConfig,
    dt: f32,
    events: &[CollisionEvent],
    sounds: &mut dyn SoundSink,
) -> TickReport {
    let was_terminal = state.phase.is_terminal();
    if !was_terminal {
        apply_events(state, config, events, sounds);
    }

    // Terminal phases freeze the world; only the end-report delay advances.
    if state.phase.is_terminal() {
        if !was_terminal {
            if let Some(player) = state.find_mut(state.player_id) {
                player.dragging = false;
            }
            log::info!("game over: phase={:?} score={}", state.phase, state.score);
            state.end_delay = Some(config.end_delay);
        }
        let mut report = TickReport::default();
        if let Some(remaining) = state.end_delay.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 && !state.end_reported {
                state.end_reported = true;
                report.game_ended = Some(state.score);
            }
        }
        return report;
    }

    state.time += dt;

    // Level progression and win check
    if state.score >= state.next_level_score {
        state.level += 1;
        state.next_level_score += config.level_step;
        log::info!("level up: level={} next at {}", state.level, state.next_level_score);
    }
    if state.level > config.max_level {
        state.phase = GamePhase::Won;
    }

    // Background scroll, wrapping modulo the image height
    state.background_offset =
        (state.background_offset + config.background_speed * dt) % config.background_height;

    fire_bullets(state, config);
    advance_entities(state, config, dt);
    run_enemy_spawner(state, config, dt);

    TickReport::default()
}

/// Fire-control: a dragged player shoots on a fixed cadence. A press
/// before the run starts arms the drag but fires nothing.
fn fire_bullets(state: &mut GameState, config: &GameConfig) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let dragging = state
        .find(state.player_id)
        .map(|p| p.dragging)
        .unwrap_or(false);
    if !dragging {
        return;
    }
    let ready = state
        .last_bullet_time
        .map(|t| state.time - t >= config.bullet_interval)
        .unwrap_or(true);
    if ready {
        state.last_bullet_time = Some(state.time);
        state.spawn_bullet(config);
    }
}

/// Motion, recycle/despawn and per-entity clocks for one delta.
fn advance_entities(state: &mut GameState, config: &GameConfig, dt: f32) {
    let field = Vec2::new(config.screen_width, config.screen_height);
    let mut recycles: Vec<u32> = Vec::new();

    for entity in &mut state.entities {
        entity.animate(dt);
        entity.update_blink(dt);
        match entity.kind {
            EntityKind::Enemy(_) => {
                entity.advance(dt);
                if entity.pos.y > field.y {
                    recycles.push(entity.id);
                }
            }
            EntityKind::Bullet => entity.advance(dt),
            EntityKind::Explosion => {
                if let Some(ttl) = entity.ttl.as_mut() {
                    *ttl -= dt;
                }
            }
            // The player moves only by drag input
            EntityKind::Player => {}
        }
    }

    // Enemies are a fixed pool of wrap-around movers: off the bottom means
    // a fresh run from a random spot above the visible area.
    for id in recycles {
        let x = state.random_enemy_x(config, config.enemy_size.x);
        if let Some(enemy) = state.find_mut(id) {
            enemy.pos = Vec2::new(x, -config.enemy_size.y);
        }
    }

    // Bullets leaving the top are gone for good; expired explosions too.
    state.entities.retain(|e| match e.kind {
        EntityKind::Bullet => e.pos.y >= 0.0,
        EntityKind::Explosion => e.ttl.map(|t| t > 0.0).unwrap_or(true),
        _ => true,
    });
}

/// Scheduled spawn task: every `spawn_interval / level` seconds, add an
/// enemy while the game is live and the pool is below its cap.
fn run_enemy_spawner(state: &mut GameState, config: &GameConfig, dt: f32) {
    let interval = config.spawn_interval / state.level.max(1) as f32;
    state.spawn_clock += dt;
    while state.spawn_clock >= interval {
        state.spawn_clock -= interval;
        if state.phase == GamePhase::Playing && state.enemy_count() < config.max_enemies {
            state.spawn_enemy(config);
        }
    }
}

/// Resolve the collision events drained from the evaluator. Events may be
/// stale (the entity set moved on since the scan); any event naming an
/// entity that no longer exists is dropped, which makes repeated reports
/// of the same overlap naturally one-shot.
fn apply_events(
    state: &mut GameState,
    config: &GameConfig,
    events: &[CollisionEvent],
    sounds: &mut dyn SoundSink,
) {
    for event in events {
        match *event {
            CollisionEvent::PlayerEnemy { player, enemy } => {
                resolve_player_enemy(state, config, player, enemy, sounds);
            }
            CollisionEvent::BulletEnemy { bullet, enemy } => {
                resolve_bullet_enemy(state, config, bullet, enemy, sounds);
            }
        }
        if state.phase.is_terminal() {
            break;
        }
    }
}

fn resolve_player_enemy(
    state: &mut GameState,
    config: &GameConfig,
    player: u32,
    enemy: u32,
    sounds: &mut dyn SoundSink,
) {
    // Inside the invincibility window the hit is ignored entirely
    let invincible = state
        .last_hit_time
        .map(|t| state.time - t <= config.invincibility)
        .unwrap_or(false);
    if invincible {
        return;
    }
    let Some(enemy_pos) = state.find(enemy).map(|e| e.pos) else {
        return; // stale report
    };
    if player != state.player_id || state.find(player).is_none() {
        return;
    }

    if let Some(p) = state.find_mut(player) {
        p.start_blinking(config.invincibility, BLINK_INTERVAL_SECS);
    }
    state.spawn_explosion(config, enemy_pos);
    sounds.play_explosion();
    state.player_hp -= 1;
    state.last_hit_time = Some(state.time);
    state.remove(enemy);
    log::info!("player hit, hp={}", state.player_hp);

    if state.player_hp <= 0 {
        state.phase = GamePhase::Lost;
    }
}

fn resolve_bullet_enemy(
    state: &mut GameState,
    config: &GameConfig,
    bullet: u32,
    enemy: u32,
    sounds: &mut dyn SoundSink,
) {
    // Both parties must still be live; first resolution consumes them, so
    // a second report from the same sweep can't double-count
    let Some(enemy_pos) = state.find(enemy).map(|e| e.pos) else {
        return;
    };
    if state.find(bullet).is_none() {
        return;
    }

    state.spawn_explosion(config, enemy_pos);
    sounds.play_explosion();
    state.score += config.score_per_kill;
    state.remove(bullet);
    state.remove(enemy);
}
