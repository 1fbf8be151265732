//! Fixed-step simulation tick
//!
//! One call advances the game exactly one logical frame. Within a live tick
//! the order is fixed: body physics against terrain, entity updates and
//! collisions, scenery bookkeeping and spawning, then the replay snapshot.

use glam::Vec2;
use rand::Rng;

use super::body::JumpKind;
use super::collision::Seabed;
use super::entity::{Contact, DeathCause, WorldContext};
use super::item::{Item, ItemKind, Reward};
use super::progress::{Achievement, RunStats, rank_for};
use super::replay::{ReplayBuffer, Snapshot};
use super::scheduler::ScheduledAction;
use super::spawn;
use super::state::{DeathReason, GameEvent, GameState, KelpForest, RapidCurrent, RunState, Zone};
use crate::consts::*;
use crate::is_finite_vec;
use crate::settings::Difficulty;

/// Begin a run with a chosen difficulty and starting depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRequest {
    pub difficulty: Difficulty,
    /// Metres to start at (non-zero starts deep)
    pub start_score: u32,
}

impl StartRequest {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            start_score: 0,
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump / advance (click, tap, space)
    pub action: bool,
    /// Pause toggle
    pub pause: bool,
    /// Struggle tap while caught in a net
    pub struggle: bool,
    /// Leave the game-over screen for the title screen
    pub restart: bool,
    /// Watch the replay (or end it early)
    pub replay: bool,
    /// Open/close the archetype gallery from the title screen
    pub gallery: bool,
    /// Flip invincible mode (pause menu only)
    pub toggle_invincible: bool,
    /// Start a run from the title or game-over screen
    pub start: Option<StartRequest>,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.run_state {
            RunState::Playing => {
                state.run_state = RunState::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            RunState::Paused => {
                state.run_state = RunState::Playing;
                state.events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    handle_input(state, input);

    // Paused freezes every clock
    if state.run_state == RunState::Paused {
        return;
    }
    state.tick_count += 1;
    run_deferred(state);

    match state.run_state {
        RunState::Playing | RunState::Caught { .. } => step_world(state),
        RunState::Bitten { .. } => advance_bitten(state),
        RunState::Replay { .. } => advance_replay(state),
        RunState::GameOver | RunState::Gallery => state.frame_count += 1,
        RunState::Start | RunState::Paused => {}
    }
}

fn handle_input(state: &mut GameState, input: &TickInput) {
    match state.run_state {
        RunState::Start => {
            if let Some(req) = input.start {
                state.start_run(req.difficulty, req.start_score);
            } else if input.action {
                state.start_run(Difficulty::Normal, 0);
            } else if input.gallery {
                state.run_state = RunState::Gallery;
            }
        }
        RunState::Gallery => {
            if input.gallery || input.action {
                state.run_state = RunState::Start;
            }
        }
        RunState::Playing => {
            if input.action {
                let kind = state.player.jump();
                state.events.push(GameEvent::Jump {
                    rhythm: kind == JumpKind::Rhythm,
                });
            }
        }
        RunState::Caught { .. } => {
            // A tap is a struggle whichever way it arrives
            if input.action || input.struggle {
                state.struggle();
            }
        }
        RunState::Paused => {
            if input.toggle_invincible {
                let on = !state.invincible_mode;
                state.set_invincible_mode(on);
                log::info!("Invincible mode {}", if on { "on" } else { "off" });
            }
            if input.action {
                state.run_state = RunState::Playing;
                state.events.push(GameEvent::Resumed);
            }
        }
        RunState::GameOver => {
            if input.replay {
                state.start_replay();
            } else if state.frame_count > RESTART_DELAY_TICKS {
                if let Some(req) = input.start {
                    state.start_run(req.difficulty, req.start_score);
                } else if input.restart || input.action {
                    state.reset_to_start();
                }
            }
        }
        RunState::Replay { .. } => {
            if input.replay || input.action {
                finish_replay(state);
            }
        }
        RunState::Bitten { .. } => {}
    }
}

/// Fire scheduled actions that have come due
fn run_deferred(state: &mut GameState) {
    for event in state.scheduler.take_due(state.tick_count) {
        match event.action {
            ScheduledAction::SpawnBoss => {
                let same_run = event.run_id == state.run_id;
                if same_run {
                    state.boss_warning = false;
                }
                if same_run && state.run_state == RunState::Playing && !state.enemies.boss_alive() {
                    spawn::spawn_boss(state);
                } else {
                    log::debug!("Boss spawn for run {} dropped", event.run_id);
                }
            }
        }
    }
}

fn advance_bitten(state: &mut GameState) {
    let RunState::Bitten { predator, elapsed } = state.run_state else {
        return;
    };
    let elapsed = elapsed + 1;
    state.run_state = RunState::Bitten { predator, elapsed };
    if let Some(pos) = state.enemies.get(predator).map(|e| e.pos) {
        state.player.pos = pos;
    }
    if elapsed > BITTEN_TICKS {
        state.game_over(None);
    }
}

fn advance_replay(state: &mut GameState) {
    let RunState::Replay { index } = state.run_state else {
        return;
    };
    let next = index + 1;
    if next >= state.replay.len() {
        finish_replay(state);
    } else {
        state.run_state = RunState::Replay { index: next };
    }
}

/// Leave playback for the game-over screen
fn finish_replay(state: &mut GameState) {
    state.run_state = RunState::GameOver;
    state.frame_count = 0;
    state.events.push(GameEvent::ReplayFinished);
}

/// One live tick (PLAYING or CAUGHT)
fn step_world(state: &mut GameState) {
    state.frame_count += 1;
    state.score += SCORE_PER_TICK;
    state.scroll_offset += state.scroll_speed;

    update_zone(state);
    check_boss_interval(state);
    check_level(state);
    update_currents(state);

    if !step_body(state) {
        return;
    }

    update_entities(state);
    if !state.run_state.is_simulating() {
        return;
    }
    update_items(state);
    update_scenery(state);

    spawn::spawn_hazards(state);
    spawn::spawn_background(state);
    spawn::spawn_scenery(state);
    spawn::spawn_effects(state);

    if ReplayBuffer::should_record(state.frame_count) {
        let snapshot = Snapshot::capture(state);
        state.replay.push(snapshot);
    }

    update_progress(state);
}

fn update_zone(state: &mut GameState) {
    let zone = Zone::for_score(state.score);
    if zone != state.zone {
        state.zone = zone;
        log::info!("Entered {} zone at {:.0}m", zone.as_str(), state.score);
        state.events.push(GameEvent::ZoneEntered(zone));
    }
}

/// Every boss interval: raise the warning and schedule the boss
fn check_boss_interval(state: &mut GameState) {
    if state.score - state.last_boss_distance < BOSS_INTERVAL {
        return;
    }
    state.last_boss_distance = state.score.floor();
    state.boss_warning = true;
    state
        .scheduler
        .schedule(state.tick_count + BOSS_WARNING_TICKS, state.run_id, ScheduledAction::SpawnBoss);
    log::info!("Boss warning at {:.0}m", state.score);
    state.events.push(GameEvent::BossWarning);
}

fn check_level(state: &mut GameState) {
    let current = (state.score / LEVEL_DISTANCE).floor() as u32;
    if current > state.level {
        state.level = current;
        state.scroll_speed += LEVEL_SPEED_STEP;
        if state.kelp.active {
            state.kelp.saved_scroll += LEVEL_SPEED_STEP;
        }
        state.events.push(GameEvent::LevelUp { level: current + 1 });
    }
}

/// Rapid current and kelp forest: start, expire and apply their forces
fn update_currents(state: &mut GameState) {
    state.rapid.timer += 1;
    state.kelp.timer += 1;
    let frame = state.frame_count;

    let interval = state.difficulty.rapid_current_interval();
    if !state.rapid.active && !state.kelp.active && state.rapid.timer > interval {
        if state.rng.random::<f32>() < RapidCurrent::START_CHANCE {
            let h = state.height;
            state.rapid.active = true;
            state.rapid.timer = 0;
            state.rapid.center_y = h * 0.2 + state.rng.random::<f32>() * h * 0.6;
            let pos = Vec2::new(state.width / 2.0, state.rapid.center_y);
            state.add_floating_text(pos, "Rapid current!", 0xFF4500);
            log::info!("Rapid current at y={:.0}", state.rapid.center_y);
            state.events.push(GameEvent::RapidCurrentStarted);
        }
    } else if state.rapid.active {
        if state.rapid.timer > RapidCurrent::DURATION {
            state.rapid.active = false;
            state.rapid.timer = 0;
        }
        state.rapid.body_inside =
            state.rapid.active && (state.player.pos.y - state.rapid.center_y).abs() < RapidCurrent::HALF_BAND;
        if state.rapid.body_inside {
            state.player.vel.x -= RapidCurrent::BODY_PUSH;
            if frame % 4 == 0 {
                state.events.push(GameEvent::RapidCurrentRumble { volume: 0.25 });
            }
        } else if state.rapid.active && frame % 20 == 0 {
            state.events.push(GameEvent::RapidCurrentRumble { volume: 0.05 });
        }
    }

    if !state.kelp.active && !state.rapid.active && state.kelp.timer > KelpForest::INTERVAL {
        if state.rng.random::<f32>() < KelpForest::START_CHANCE {
            state.kelp.active = true;
            state.kelp.timer = 0;
            state.kelp.saved_scroll = state.scroll_speed;
            let pos = Vec2::new(state.width / 2.0, state.height / 2.0);
            state.add_floating_text(pos, "Kelp forest", 0x2E8B57);
            log::info!("Kelp forest at {:.0}m", state.score);
            state.events.push(GameEvent::KelpForestStarted);
        }
    } else if state.kelp.active {
        if state.kelp.timer > KelpForest::DURATION {
            state.kelp.active = false;
            state.kelp.timer = 0;
            state.scroll_speed = state.kelp.saved_scroll;
        } else {
            state.player.vel.x *= KelpForest::BODY_DRAG;
            state.scroll_speed = (state.scroll_speed * KelpForest::SCROLL_DECAY).max(KelpForest::MIN_SCROLL);
        }
    }
}

/// Move (or restrain) the body. Returns false if the run ended.
fn step_body(state: &mut GameState) -> bool {
    if let RunState::Caught { net, .. } = state.run_state {
        match state.enemies.get(net).map(|e| (e.pos, e.marked_for_deletion)) {
            Some((pos, false)) => {
                state.player.pos = pos;
                state.player.angle = (state.rng.random::<f32>() - 0.5) * 0.8;
                state.player.bending = state.frame_count % 8 < 4;
            }
            // Net gone: let the body go
            _ => state.escape(),
        }
        if state.player.is_past_left_edge() {
            state.lives = 0;
            let reason = DeathReason::new(DeathCause::SweptAwayInNet, state.rapid.body_inside);
            state.game_over(Some(reason));
            return false;
        }
        return true;
    }

    let seabed = Seabed {
        height: state.height,
        scroll_offset: state.scroll_offset,
        terrain: &state.terrain,
    };
    state.player.update(state.width, &seabed);
    if state.player.is_past_left_edge() {
        state.lives = 0;
        let reason = DeathReason::new(DeathCause::SweptAway, state.rapid.body_inside);
        state.game_over(Some(reason));
        return false;
    }
    true
}

/// Update hazards, apply whale suction and current drift, cull, then collide
fn update_entities(state: &mut GameState) {
    {
        let ctx = WorldContext {
            scroll_speed: state.scroll_speed,
            width: state.width,
            height: state.height,
            score: state.score,
            player_pos: state.player.pos,
            seabed: Seabed {
                height: state.height,
                scroll_offset: state.scroll_offset,
                terrain: &state.terrain,
            },
        };
        state.enemies.update_all(&ctx, &mut state.rng);
    }

    state.enemies.apply_suction(&mut state.player);
    if state.rapid.active {
        state
            .enemies
            .apply_current_drift(state.rapid.center_y, RapidCurrent::HALF_BAND);
    }
    state.enemies.cull(state.width, state.height);

    if state.run_state != RunState::Playing {
        return;
    }
    for (id, contact) in state.enemies.collisions(&state.player) {
        if state.run_state != RunState::Playing {
            break;
        }
        match contact {
            Contact::Hit(cause) => {
                state.hit(cause);
            }
            Contact::Capture => {
                state.capture(id);
            }
            Contact::Bite => {
                state.bite(id);
            }
        }
    }
}

/// Floating-text colour for a pickup
fn popup_color(kind: &ItemKind) -> u32 {
    match kind {
        ItemKind::Plankton { .. } => 0x90EE90,
        ItemKind::Clownfish { .. } => 0xFF4500,
        ItemKind::GardenEel => 0xFFFFFF,
        _ => 0xFFD700,
    }
}

fn collect(state: &mut GameState, item: &Item) {
    state.items_collected += 1;
    let points = match item.reward() {
        Reward::Score(points) => points,
        Reward::Treasure(points) => {
            state.chests_collected += 1;
            points
        }
        Reward::LifeOrScore(points) => {
            if state.lives < MAX_LIVES {
                state.lives += 1;
                state.update_player_size();
                state.add_floating_text(item.pos, "1UP!", 0xFF69B4);
                state.events.push(GameEvent::ExtraLife { lives: state.lives });
                log::debug!("Friend joined, {} lives", state.lives);
                return;
            }
            points
        }
    };
    state.score += f64::from(points);
    state.add_floating_text(item.pos, format!("+{points}"), popup_color(&item.kind));
    state.events.push(GameEvent::Collected { points });
    log::debug!("Collected {points} at {:.0}m", state.score);
}

fn update_items(state: &mut GameState) {
    {
        let ctx = WorldContext {
            scroll_speed: state.scroll_speed,
            width: state.width,
            height: state.height,
            score: state.score,
            player_pos: state.player.pos,
            seabed: Seabed {
                height: state.height,
                scroll_offset: state.scroll_offset,
                terrain: &state.terrain,
            },
        };
        for item in &mut state.items {
            item.update(&ctx);
        }
    }
    state.items.retain(|i| is_finite_vec(i.pos) && !i.is_off_screen());

    let (collected, kept): (Vec<Item>, Vec<Item>) = std::mem::take(&mut state.items)
        .into_iter()
        .partition(|i| i.check_collision(&state.player));
    state.items = kept;
    for item in &collected {
        collect(state, item);
    }
}

/// Scroll and retire render-only scenery and rock formations
fn update_scenery(state: &mut GameState) {
    let speed = state.scroll_speed;

    for deco in &mut state.decorations {
        deco.update(speed);
    }
    state.decorations.retain(|d| !d.is_off_screen());

    for rock in &mut state.terrain {
        rock.scroll(speed);
    }
    state.terrain.retain(|t| !t.is_off_screen());

    for obj in &mut state.background {
        obj.update(speed);
    }
    state.background.retain(|b| !b.is_off_screen());

    // Streaks race ahead of the scroll
    for line in &mut state.stream_lines {
        line.update(speed + 10.0);
    }
    state.stream_lines.retain(|l| !l.is_off_screen());

    for bubble in &mut state.bubbles {
        bubble.update(speed);
    }
    state.bubbles.retain(|b| !b.is_dead());

    for text in &mut state.floating_texts {
        text.update();
    }
    state.floating_texts.retain(|t| !t.is_dead());
}

/// Achievements and rank
fn update_progress(state: &mut GameState) {
    let player_x = state.player.pos.x;
    let stats = RunStats {
        score: state.score,
        damage_taken: state.damage_taken,
        boss_passed: state.enemies.iter().any(|e| e.is_boss() && e.pos.x < player_x),
        chests_collected: state.chests_collected,
    };
    for achievement in Achievement::ALL {
        if !achievement.is_met(&stats) {
            continue;
        }
        if !state.unlocked_achievements.contains(&achievement) {
            state.unlocked_achievements.push(achievement);
            log::info!("Achievement unlocked: {}", achievement.title());
            state.events.push(GameEvent::AchievementUnlocked(achievement));
        }
        if !state.session_achievements.contains(&achievement) {
            state.session_achievements.push(achievement);
        }
    }

    let rank = rank_for(state.score, state.player.walk_timer);
    if rank != state.rank {
        state.rank = rank;
        state.events.push(GameEvent::RankUp(rank));
    }
}
