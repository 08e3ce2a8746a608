/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Clock + due alarm clears
///   2. Player motion (intent → clamp → advance → settle)
///   3. Pursuer motion (decide → advance), in id order
///   4. Capture: alarmed pursuers are eaten, any other contact loses
///   5. Power pellets: alarm everyone, queue their clears
///   6. Pellets: +10 each
///   7. Win check
///
/// Player and pursuer motion do not read each other, so 2 and 3 commute;
/// everything from 4 on sees the positions after both have moved.

use std::time::Duration;

use crate::domain::ai;
use crate::domain::entity::{CollectibleKind, Direction, ALARM_WINDOW, PELLET_SCORE, PLAYER_SPEED};
use crate::domain::motion;
use super::event::GameEvent;
use super::world::{LoopState, WorldState};

/// Everything the outside world feeds into one tick.
#[derive(Clone, Copy, Debug)]
pub struct TickInput {
    pub intent: Option<Direction>,
    pub dt: Duration,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: TickInput) -> Vec<GameEvent> {
    if world.phase != LoopState::Ongoing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;
    world.clock += input.dt;

    resolve_alarm_clears(world, &mut events);
    motion::move_player(&mut world.player, input.intent, PLAYER_SPEED, &world.maze.obstacles);
    resolve_pursuers(world);
    if resolve_captures(world, &mut events) { return events; }
    resolve_power_pellets(world, &mut events);
    resolve_pellets(world, &mut events);
    resolve_win(world, &mut events);

    events
}

impl WorldState {
    /// Step once and report the resulting loop state.
    #[allow(dead_code)]
    pub fn advance(&mut self, intent: Option<Direction>, dt: Duration) -> LoopState {
        step(self, TickInput { intent, dt });
        self.phase
    }
}

// ══════════════════════════════════════════════════════════════
// Timers
// ══════════════════════════════════════════════════════════════

fn resolve_alarm_clears(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    for clear in world.alarms.drain_due(world.clock) {
        // pursuers captured in the meantime are simply gone
        if let Some(p) = world.pursuer_mut(clear.pursuer) {
            if p.alarmed {
                p.alarmed = false;
                events.push(GameEvent::PursuerCalmed { id: p.id });
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_pursuers(world: &mut WorldState) {
    let walls = &world.maze.obstacles;
    for p in world.pursuers.iter_mut() {
        ai::steer(p, walls, &mut world.rng);
        p.body.advance();
    }
}

// ══════════════════════════════════════════════════════════════
// Contact
// ══════════════════════════════════════════════════════════════

/// Returns true if the player was caught (session lost).
fn resolve_captures(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    let player = world.player.body;
    let mut caught_by = None;

    world.pursuers.retain(|p| {
        if !p.body.touches(player.position, player.radius) { return true; }
        if p.alarmed {
            log::info!("pursuer {:?} captured at tick {}", p.id, world.tick);
            events.push(GameEvent::PursuerCaptured { id: p.id });
            return false;
        }
        caught_by.get_or_insert(p.id);
        true
    });

    match caught_by {
        Some(by) => {
            log::info!("player caught by {by:?} at tick {}, score {}", world.tick, world.score);
            world.phase = LoopState::Lost;
            events.push(GameEvent::PlayerCaught { by });
            true
        }
        None => false,
    }
}

/// Remove every collectible of `kind` the player touches; return their positions.
fn eat(world: &mut WorldState, kind: CollectibleKind) -> Vec<glam::Vec2> {
    let player = world.player.body;
    let mut eaten = Vec::new();
    world.collectibles.retain(|c| {
        let hit = c.kind == kind && player.touches(c.position, c.radius);
        if hit { eaten.push(c.position); }
        !hit
    });
    eaten
}

fn resolve_power_pellets(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    for at in eat(world, CollectibleKind::Power) {
        events.push(GameEvent::PowerPelletEaten { at });
        let fire_at = world.clock + ALARM_WINDOW;
        for p in world.pursuers.iter_mut() {
            p.alarmed = true;
            world.alarms.schedule(p.id, fire_at);
            events.push(GameEvent::PursuerAlarmed { id: p.id });
        }
        log::debug!("power pellet at {at:?}, {} pursuers alarmed until {fire_at:?}", world.pursuers.len());
    }
}

fn resolve_pellets(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    for at in eat(world, CollectibleKind::Pellet) {
        world.score += PELLET_SCORE;
        events.push(GameEvent::PelletEaten { at });
    }
}

fn resolve_win(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.pellets_remaining() == 0 {
        log::info!("maze cleared at tick {}, score {}", world.tick, world.score);
        world.phase = LoopState::Won;
        events.push(GameEvent::MazeCleared);
    }
}
