//! Per-frame simulation tick
//!
//! One synchronous pass in a fixed order: player, bullets, centipedes, spider,
//! level check. Each phase borrows `GameState` in turn. If a phase ends the
//! game, the remaining phases are skipped.

use rand::Rng;

use super::autopilot;
use super::centipede::{Centipede, StepOutcome, length_for_level, speed_for_level};
use super::field::density_for_level;
use super::grid::Direction;
use super::player::Player;
use super::projectile::{Bullet, BulletHit, find_hit};
use super::spider::Spider;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input state for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Held fire auto-repeats at the fire delay
    pub fire: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one frame (`dt_ms` already clamped by the host)
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let input = if input.idle_mode {
        autopilot::steer(state)
    } else {
        *input
    };

    state.time_ticks += 1;

    update_player(state, &input, dt_ms);
    update_bullets(state, dt_ms);
    update_centipedes(state, dt_ms);
    if !state.is_running() {
        return;
    }
    update_spider(state, dt_ms);
    if !state.is_running() {
        return;
    }
    check_level_clear(state);
}

fn update_player(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    let tuning = &state.tuning;
    state
        .player
        .steer(input.left, input.right, tuning.player_speed, dt_ms);
    if state
        .player
        .try_fire(input.fire, tuning.fire_delay_ms, dt_ms)
    {
        let bullet = Bullet::new(state.player.muzzle(), tuning.bullet_speed);
        state.bullets.push(bullet);
        state.push_event(GameEvent::Shot);
    }
}

/// Move bullets and resolve hits, newest bullet first. A bullet is consumed by
/// at most one target; spent bullets are compacted after the pass.
fn update_bullets(state: &mut GameState, dt_ms: f32) {
    for i in (0..state.bullets.len()).rev() {
        let bullet = &mut state.bullets[i];
        bullet.advance(dt_ms);
        if bullet.off_screen() {
            bullet.spent = true;
            continue;
        }
        let point = bullet.pos;

        match find_hit(point, &state.field, &state.centipedes) {
            Some(BulletHit::Mushroom(cell)) => {
                state.field.damage(cell);
                let destroyed = !state.field.is_blocking(cell);
                state.score += state.tuning.score.mushroom;
                state.push_event(GameEvent::MushroomHit { cell, destroyed });
            }
            Some(BulletHit::Segment { chain, index }) => {
                let head = index == 0;
                let cell = state.centipedes[chain].segments[index].cell;
                state.score += if head {
                    state.tuning.score.head
                } else {
                    state.tuning.score.body
                };
                split_chain(state, chain, index);
                state.push_event(GameEvent::SegmentHit { cell, head });
            }
            None => continue,
        }
        state.bullets[i].spent = true;
    }
    state.bullets.retain(|b| !b.spent);
}

/// Replace the hit segment with a mushroom and cut the chain in two. The head
/// part keeps the chain's slot; the tail part is appended as a new chain.
pub fn split_chain(state: &mut GameState, chain: usize, index: usize) {
    let tail_id = state.next_entity_id();
    let original = state.centipedes.remove(chain);
    let split = original.split(index, tail_id);

    state.field.add_mushroom(split.cell, MUSHROOM_MAX_HP);
    log::debug!(
        "Chain split at {:?}: head part {}, tail part {}",
        split.cell,
        split.head_part.as_ref().map_or(0, Centipede::len),
        split.tail_part.as_ref().map_or(0, Centipede::len),
    );

    if let Some(head_part) = split.head_part {
        state.centipedes.insert(chain, head_part);
    }
    if let Some(tail_part) = split.tail_part {
        state.centipedes.push(tail_part);
    }
}

fn update_centipedes(state: &mut GameState, dt_ms: f32) {
    for i in (0..state.centipedes.len()).rev() {
        let outcome = state.centipedes[i].advance(dt_ms, &state.field);
        if outcome == StepOutcome::ReachedPlayer {
            log::debug!("Centipede {} reached the player zone", state.centipedes[i].id);
            lose_life(state);
            break;
        }
    }
}

fn update_spider(state: &mut GameState, dt_ms: f32) {
    if state.spider.is_none() && state.rng.random::<f64>() < state.tuning.spider_spawn_chance {
        let spider = Spider::spawn(&mut state.rng, &state.tuning);
        log::debug!("Spider spawned at {:?}", spider.pos);
        state.spider = Some(spider);
    }

    let Some(spider) = state.spider.as_mut() else {
        return;
    };
    if !spider.update(dt_ms) {
        state.spider = None;
        return;
    }

    if let Some(i) = state.bullets.iter().rposition(|b| spider.is_shot_by(b.pos)) {
        state.bullets.remove(i);
        state.spider = None;
        state.score += state.tuning.score.spider;
        state.push_event(GameEvent::SpiderDestroyed);
        return;
    }

    // The spider survives touching the player
    if spider.touches(state.player.center(), state.tuning.spider_player_margin) {
        lose_life(state);
    }
}

fn check_level_clear(state: &mut GameState) {
    if !state.centipedes.is_empty() {
        return;
    }
    let level = state.level + 1;
    log::info!("Level {} cleared, advancing to {}", state.level, level);
    state.push_event(GameEvent::LevelUp { level });
    reset(state, level);
    state.score += state.tuning.score.level_clear;
}

/// Lose one life. At zero the run ends; otherwise the board is given some
/// breathing room (bullets cleared, player centered, centipedes pushed up).
pub fn lose_life(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.lives -= 1;
    state.push_event(GameEvent::LifeLost {
        lives_left: state.lives,
    });

    if state.lives <= 0 {
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver { score: state.score });
        log::info!("Game over: score {}, level {}", state.score, state.level);
        return;
    }

    state.bullets.clear();
    state.player.recenter();
    for chain in &mut state.centipedes {
        chain.nudge_up(LIFE_LOST_NUDGE_ROWS);
    }
    log::info!("Life lost, {} remaining", state.lives);
}

/// Rebuild the field and centipede for `level`. Score and lives are untouched.
pub fn reset(state: &mut GameState, level: u32) {
    state.level = level;
    state.bullets.clear();
    state.centipedes.clear();
    state.spider = None;

    let tuning = &state.tuning;
    let density = density_for_level(
        tuning.mushroom_density,
        tuning.mushroom_density_per_level,
        level,
    );
    let len = length_for_level(tuning.centipede_base_length, level);
    let speed = speed_for_level(tuning.centipede_base_speed, level);

    state.field.populate(density, &mut state.rng);
    spawn_centipede(state, len, speed);
}

/// Add a fresh chain on the top row heading in a random direction
pub fn spawn_centipede(state: &mut GameState, len: usize, speed: f32) {
    let dir = if state.rng.random_bool(0.5) {
        Direction::Right
    } else {
        Direction::Left
    };
    let id = state.next_entity_id();
    state.centipedes.push(Centipede::spawn(id, len, speed, dir, 0));
}

/// Start (or restart) a run from level 1
pub fn start_game(state: &mut GameState) {
    state.score = 0;
    state.lives = state.tuning.starting_lives;
    state.phase = GamePhase::Playing;
    state.time_ticks = 0;
    state.player = Player::default();
    reset(state, 1);
    state.push_event(GameEvent::GameStarted);
    log::info!("Game started (seed {})", state.seed);
}

/// Toggle between playing and paused. Has no effect after game over.
pub fn toggle_pause(state: &mut GameState) {
    match state.phase {
        GamePhase::Playing => {
            state.phase = GamePhase::Paused;
            state.push_event(GameEvent::Paused);
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Playing;
            state.push_event(GameEvent::Resumed);
        }
        GamePhase::GameOver => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 16.0;

    /// Empty board, no random spider
    fn quiet_state() -> GameState {
        let tuning = Tuning {
            spider_spawn_chance: 0.0,
            ..Default::default()
        };
        GameState::with_tuning(7, tuning)
    }

    /// A chain that will not move during a test, head at `head`
    fn parked_chain(state: &mut GameState, head: Cell, len: usize) -> usize {
        let id = state.next_entity_id();
        let mut chain = Centipede::spawn(id, len, 0.001, Direction::Right, head.y);
        for (i, seg) in chain.segments.iter_mut().enumerate() {
            seg.cell = Cell::new(head.x - i as i32, head.y);
        }
        state.centipedes.push(chain);
        state.centipedes.len() - 1
    }

    /// A bullet that will sit at `target` after one `DT` tick
    fn bullet_reaching(target: Vec2, speed: f32) -> Bullet {
        Bullet::new(target + Vec2::new(0.0, speed * DT / 1000.0), speed)
    }

    #[test]
    fn test_start_game_builds_level_one() {
        let mut state = GameState::new(12345);
        start_game(&mut state);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.centipedes.len(), 1);
        assert_eq!(state.centipedes[0].len(), 12);
        assert_eq!(state.centipedes[0].head().speed, 8.0);
        assert!(state.spider.is_none());
        assert_eq!(state.drain_events(), vec![GameEvent::GameStarted]);
    }

    #[test]
    fn test_paused_tick_changes_nothing() {
        let mut state = quiet_state();
        parked_chain(&mut state, Cell::new(10, 3), 3);
        toggle_pause(&mut state);
        assert!(!state.is_running());

        let input = TickInput {
            fire: true,
            right: true,
            ..Default::default()
        };
        let player = state.player.clone();
        tick(&mut state, &input, DT);
        assert_eq!(state.time_ticks, 0);
        assert!(state.bullets.is_empty());
        assert_eq!(state.player, player);

        toggle_pause(&mut state);
        assert!(state.is_running());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Paused, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_fire_spawns_bullet() {
        let mut state = quiet_state();
        parked_chain(&mut state, Cell::new(10, 3), 3);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.drain_events(), vec![GameEvent::Shot]);
    }

    #[test]
    fn test_bullet_destroys_weak_mushroom() {
        let mut state = quiet_state();
        parked_chain(&mut state, Cell::new(20, 0), 2);
        state.field.add_mushroom(Cell::new(5, 5), 1);
        let speed = state.tuning.bullet_speed;
        state.bullets.push(bullet_reaching(Vec2::new(65.0, 66.0), speed));

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, 1);
        assert!(state.field.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::MushroomHit {
                cell: Cell::new(5, 5),
                destroyed: true
            }]
        );
    }

    #[test]
    fn test_body_hit_splits_chain() {
        let mut state = quiet_state();
        // Segments at columns 14, 13, 12, 11, 10 on row 10
        parked_chain(&mut state, Cell::new(14, 10), 5);
        let speed = state.tuning.bullet_speed;
        state.bullets.push(bullet_reaching(Vec2::new(150.0, 126.0), speed));

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, 5);
        assert!(state.bullets.is_empty());
        assert_eq!(state.centipedes.len(), 2);
        assert_eq!(state.centipedes[0].len(), 2);
        assert_eq!(state.centipedes[1].len(), 2);
        assert!(state.centipedes.iter().all(Centipede::has_single_head));
        assert_eq!(state.field.len(), 1);
        assert_eq!(state.field.hp_at(Cell::new(12, 10)), Some(MUSHROOM_MAX_HP));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::SegmentHit {
                cell: Cell::new(12, 10),
                head: false
            }]
        );
    }

    #[test]
    fn test_head_hit_scores_more() {
        let mut state = quiet_state();
        parked_chain(&mut state, Cell::new(14, 10), 3);
        let speed = state.tuning.bullet_speed;
        state.bullets.push(bullet_reaching(Vec2::new(174.0, 126.0), speed));

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, 10);
        // Head part is empty, so the remaining body is the only chain
        assert_eq!(state.centipedes.len(), 1);
        assert_eq!(state.centipedes[0].len(), 2);
        assert_eq!(state.centipedes[0].head().cell, Cell::new(13, 10));
    }

    #[test]
    fn test_one_bullet_one_target() {
        let mut state = quiet_state();
        // Mushroom, segment and spider all under the same point
        parked_chain(&mut state, Cell::new(8, 8), 1);
        state.field.add_mushroom(Cell::new(8, 8), 3);
        state.spider = Some(Spider {
            pos: Vec2::new(102.0, 102.0),
            vel: Vec2::ZERO,
            radius: state.tuning.spider_radius,
            lifetime_ms: 5000.0,
        });
        let speed = state.tuning.bullet_speed;
        state.bullets.push(bullet_reaching(Vec2::new(102.0, 102.0), speed));

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, 1);
        assert_eq!(state.field.hp_at(Cell::new(8, 8)), Some(2));
        assert_eq!(state.centipedes[0].len(), 1);
        assert!(state.spider.is_some());
    }

    #[test]
    fn test_spider_shot_for_bonus() {
        let mut state = quiet_state();
        parked_chain(&mut state, Cell::new(20, 0), 2);
        state.spider = Some(Spider {
            pos: Vec2::new(100.0, 450.0),
            vel: Vec2::ZERO,
            radius: state.tuning.spider_radius,
            lifetime_ms: 5000.0,
        });
        let speed = state.tuning.bullet_speed;
        state.bullets.push(bullet_reaching(Vec2::new(100.0, 453.0), speed));

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, 100);
        assert!(state.spider.is_none());
        assert!(state.bullets.is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::SpiderDestroyed]);
    }

    #[test]
    fn test_spider_touching_player_costs_life() {
        let mut state = quiet_state();
        parked_chain(&mut state, Cell::new(20, 0), 2);
        let center = state.player.center();
        state.spider = Some(Spider {
            pos: center + Vec2::new(15.0, 0.0),
            vel: Vec2::ZERO,
            radius: state.tuning.spider_radius,
            lifetime_ms: 5000.0,
        });

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.lives, 2);
        assert!(state.spider.is_some());
    }

    #[test]
    fn test_expired_spider_is_removed() {
        let mut state = quiet_state();
        parked_chain(&mut state, Cell::new(20, 0), 2);
        let center = state.player.center();
        state.spider = Some(Spider {
            pos: center,
            vel: Vec2::ZERO,
            radius: state.tuning.spider_radius,
            lifetime_ms: 10.0,
        });

        tick(&mut state, &TickInput::default(), DT);

        assert!(state.spider.is_none());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_lose_life_gives_breathing_room() {
        let mut state = quiet_state();
        state.lives = 2;
        parked_chain(&mut state, Cell::new(10, 20), 2);
        parked_chain(&mut state, Cell::new(10, 1), 1);
        state.bullets.push(Bullet::new(Vec2::new(50.0, 50.0), 420.0));
        state.player.pos.x = 0.0;

        lose_life(&mut state);

        assert_eq!(state.lives, 1);
        assert!(state.is_running());
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.pos.x, Player::default().pos.x);
        assert_eq!(state.centipedes[0].segments[0].cell.y, 17);
        assert_eq!(state.centipedes[1].segments[0].cell.y, 0);
    }

    #[test]
    fn test_three_lives_then_game_over() {
        let mut state = quiet_state();
        for _ in 0..3 {
            lose_life(&mut state);
        }
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::GameOver { score: 0 })
        );

        // Terminal: further losses and pause toggles are ignored
        lose_life(&mut state);
        toggle_pause(&mut state);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().is_empty());

        start_game(&mut state);
        assert!(state.is_running());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_centipede_reaching_bottom_costs_life() {
        let mut state = quiet_state();
        let idx = parked_chain(&mut state, Cell::new(COLS - 1, PLAYER_ZONE_ROW - 1), 3);
        for seg in &mut state.centipedes[idx].segments {
            seg.speed = 10.0;
        }

        tick(&mut state, &TickInput::default(), 100.0);

        assert_eq!(state.lives, 2);
        // Pushed back up three rows from the player zone
        assert_eq!(state.centipedes[0].head().cell.y, PLAYER_ZONE_ROW - 3);
    }

    #[test]
    fn test_clearing_level_advances() {
        let mut state = quiet_state();
        state.score = 40;
        state.lives = 2;

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.level, 2);
        assert_eq!(state.score, 240);
        assert_eq!(state.lives, 2);
        assert_eq!(state.centipedes.len(), 1);
        assert_eq!(state.centipedes[0].len(), 14);
        assert_eq!(state.centipedes[0].head().speed, 9.0);
        assert_eq!(state.drain_events(), vec![GameEvent::LevelUp { level: 2 }]);
    }

    #[test]
    fn test_level_population_respects_band() {
        let mut state = GameState::new(99);
        start_game(&mut state);
        for (cell, _) in state.field.sorted() {
            assert!(cell.y >= FIELD_TOP_ROW && cell.y < ROWS - FIELD_BOTTOM_MARGIN);
        }
    }

    #[test]
    fn test_idle_mode_plays() {
        let mut state = GameState::new(5);
        start_game(&mut state);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(state.drain_events().contains(&GameEvent::Shot));
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and inputs stay identical
        let mut a = GameState::new(2024);
        let mut b = GameState::new(2024);
        start_game(&mut a);
        start_game(&mut b);

        let inputs = [
            TickInput {
                fire: true,
                left: true,
                ..Default::default()
            },
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
        ];
        for frame in 0..3000 {
            let input = inputs[frame % inputs.len()];
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.centipedes, b.centipedes);
        assert_eq!(a.field.sorted(), b.field.sorted());
        assert_eq!(a.spider, b.spider);
        assert_eq!(a.events, b.events);
    }

    proptest! {
        #[test]
        fn bullets_hit_at_most_one_target(
            x in 0.0f32..CANVAS_WIDTH,
            y in 0.0f32..CANVAS_HEIGHT - 60.0,
            shroom in (1i32..COLS - 1, 2i32..ROWS - 6),
            head in (5i32..COLS, 1i32..ROWS - 6),
        ) {
            let mut state = quiet_state();
            parked_chain(&mut state, Cell::new(head.0, head.1), 5);
            state.field.add_mushroom(Cell::new(shroom.0, shroom.1), 4);
            state.spider = Some(Spider {
                pos: Vec2::new(x, y),
                vel: Vec2::ZERO,
                radius: state.tuning.spider_radius,
                lifetime_ms: 5000.0,
            });
            let speed = state.tuning.bullet_speed;
            state.bullets.push(bullet_reaching(Vec2::new(x, y), speed));

            tick(&mut state, &TickInput::default(), DT);

            let hits = state
                .events
                .iter()
                .filter(|e| matches!(
                    e,
                    GameEvent::MushroomHit { .. }
                        | GameEvent::SegmentHit { .. }
                        | GameEvent::SpiderDestroyed
                ))
                .count();
            prop_assert_eq!(hits, 1);
            prop_assert!(state.bullets.is_empty());
            prop_assert!(state.centipedes.iter().all(Centipede::has_single_head));
        }
    }
}
