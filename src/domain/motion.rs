/// Agent motion controller.
///
/// Player velocity is derived from intent, one axis at a time:
///
///   1. Intent → single-axis candidate at PLAYER_SPEED
///   2. Candidate blocked by any wall → zero that axis, keep the other
///      Candidate clear              → commit candidate (other axis zeroed)
///   3. Sweep: committed velocity blocked by any wall → stop dead
///   4. Euler advance
///
/// Because a blocked turn keeps the current motion, holding a direction
/// before reaching an opening turns exactly when the opening lines up.
///
/// Pursuers never go through 1–3: their velocity comes from `ai` and they
/// share only the advance step.

use glam::Vec2;

use super::entity::{Body, Direction, Player};
use super::physics::{collides_any, Obstacle};

/// Steps 1–2. Returns false when the intent was blocked.
pub fn resolve_intent(body: &mut Body, intent: Option<Direction>, speed: f32, walls: &[Obstacle]) -> bool {
    let dir = match intent { Some(d) => d, None => return true };
    let candidate = dir.velocity(speed);
    if collides_any(&body.probe(candidate), walls) {
        match dir {
            Direction::Up | Direction::Down => body.velocity.y = 0.0,
            Direction::Left | Direction::Right => body.velocity.x = 0.0,
        }
        false
    } else {
        body.velocity = candidate;
        true
    }
}

/// Step 3. Returns true if the body was stopped.
pub fn clamp(body: &mut Body, walls: &[Obstacle]) -> bool {
    if body.velocity != Vec2::ZERO && collides_any(&body.probe(body.velocity), walls) {
        body.velocity = Vec2::ZERO;
        return true;
    }
    false
}

/// Post-advance check at the current position, no look-ahead.
/// Returns true if the body had to be stopped.
pub fn settle(body: &mut Body, walls: &[Obstacle]) -> bool {
    if collides_any(&body.probe(Vec2::ZERO), walls) {
        body.velocity = Vec2::ZERO;
        return true;
    }
    false
}

/// Full player update for one tick.
pub fn move_player(player: &mut Player, intent: Option<Direction>, speed: f32, walls: &[Obstacle]) {
    resolve_intent(&mut player.body, intent, speed, walls);
    if clamp(&mut player.body, walls) {
        log::trace!("player clamped at {:?}", player.body.position);
    }
    player.body.advance();
    player.update_facing();
    player.animate_mouth();
    if settle(&mut player.body, walls) {
        log::warn!("player inside a wall at {:?}", player.body.position);
    }
}
