/// Pursuer AI: junction detection by local wall probing.
///
/// No maze graph, no search. Each tick a pursuer asks the collision engine
/// which of the four directions it could NOT step into (`blocked`), and
/// compares that with what it recorded since its last turn:
///
///   - `blocked` longer than `recorded`  → adopt it (more walls around us)
///   - `blocked` != `recorded`           → a junction: walls opened up
///   - heading itself blocked            → a dead end or corner
///   - not moving at all                 → idle, pick something
///
/// At a junction the candidates are the sides that were walled before and
/// are open now, plus straight ahead. The way back is never a candidate
/// unless nothing else is open.

use glam::Vec2;
use rand::Rng;

use super::entity::{Body, Direction, Pursuer, PURSUER_SPEED};
use super::physics::{collides_any, Obstacle};

/// Directions the body cannot step into at `speed`, in `Direction::ALL` order.
pub fn blocked_directions(body: &Body, speed: f32, walls: &[Obstacle]) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|d| collides_any(&body.probe(d.velocity(speed)), walls))
        .collect()
}

/// Candidates at a junction: recorded minus currently blocked minus the way back.
pub fn pathways(recorded: &[Direction], blocked: &[Direction], heading: Option<Direction>) -> Vec<Direction> {
    let back = heading.map(Direction::reverse);
    let mut out = Vec::with_capacity(4);
    for &d in recorded {
        if blocked.contains(&d) || Some(d) == back || out.contains(&d) { continue; }
        out.push(d);
    }
    out
}

/// Direction when `pathways` came up empty: turn around if possible,
/// otherwise (never moved) anything open.
fn fallback<R: Rng + ?Sized>(heading: Option<Direction>, blocked: &[Direction], rng: &mut R) -> Option<Direction> {
    match heading {
        Some(h) => Some(h.reverse()).filter(|d| !blocked.contains(d)),
        None => {
            let open: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| !blocked.contains(d))
                .collect();
            if open.is_empty() { None } else { Some(open[rng.random_range(0..open.len())]) }
        }
    }
}

/// Outcome of one decision tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Decision {
    /// Not at a junction; velocity untouched.
    Keep,
    /// Junction resolved; the new heading may equal the old one.
    Turn(Direction),
    /// Nowhere to go.
    Stop,
}

/// Run one decision tick for `pursuer`, updating its velocity on a turn.
pub fn steer<R: Rng + ?Sized>(pursuer: &mut Pursuer, walls: &[Obstacle], rng: &mut R) -> Decision {
    let blocked = blocked_directions(&pursuer.body, PURSUER_SPEED, walls);
    if blocked.len() > pursuer.recorded.len() {
        pursuer.recorded = blocked.clone();
    }

    let heading = pursuer.heading();
    let heading_blocked = heading.map_or(true, |h| blocked.contains(&h));
    if blocked == pursuer.recorded && !heading_blocked {
        return Decision::Keep;
    }

    if let Some(h) = heading {
        pursuer.recorded.push(h);
    }
    let options = pathways(&pursuer.recorded, &blocked, heading);
    let choice = if options.is_empty() {
        fallback(heading, &blocked, rng)
    } else {
        Some(options[rng.random_range(0..options.len())])
    };

    log::debug!(
        "pursuer {:?} at {:?}: blocked={:?} recorded={:?} pathways={:?} -> {:?}",
        pursuer.id, pursuer.body.position, blocked, pursuer.recorded, options, choice,
    );

    pursuer.body.velocity = choice.map_or(Vec2::ZERO, |d| d.velocity(PURSUER_SPEED));
    pursuer.recorded.clear();
    choice.map_or(Decision::Stop, Decision::Turn)
}
