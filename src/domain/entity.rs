/// Entities: Body (shared circle shape), Player, Pursuer, Collectible.
/// All positions are continuous world units; one maze cell is CELL_SIZE wide.

use std::f32::consts::{FRAC_PI_2, PI};
use std::time::Duration;

use glam::Vec2;

use super::physics::Probe;

pub const CELL_SIZE: f32 = 40.0;
pub const AGENT_RADIUS: f32 = 15.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const PURSUER_SPEED: f32 = 2.0;
pub const PELLET_RADIUS: f32 = 3.0;
pub const POWER_PELLET_RADIUS: f32 = 8.0;
pub const PELLET_SCORE: u32 = 10;
/// How long a pursuer stays capturable after a power pellet.
pub const ALARM_WINDOW: Duration = Duration::from_millis(5000);

pub const MOUTH_MAX: f32 = 0.75;
const MOUTH_RATE: f32 = 0.12;

/// Center of a grid cell in world units.
pub fn cell_center(row: usize, col: usize) -> Vec2 {
    Vec2::new(
        col as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        row as f32 * CELL_SIZE + CELL_SIZE / 2.0,
    )
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Probe order used by the pursuer decision engine.
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Left, Direction::Up, Direction::Down];

    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Single-axis velocity of the given magnitude. Screen space: up is -y.
    pub fn velocity(self, speed: f32) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -speed),
            Direction::Down => Vec2::new(0.0, speed),
            Direction::Left => Vec2::new(-speed, 0.0),
            Direction::Right => Vec2::new(speed, 0.0),
        }
    }

    /// Travel direction from a velocity's signs, horizontal first.
    pub fn from_velocity(v: Vec2) -> Option<Direction> {
        if v.x > 0.0 { Some(Direction::Right) }
        else if v.x < 0.0 { Some(Direction::Left) }
        else if v.y < 0.0 { Some(Direction::Up) }
        else if v.y > 0.0 { Some(Direction::Down) }
        else { None }
    }
}

/// The circle every agent is: position, velocity, radius.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Body { position, velocity, radius: AGENT_RADIUS }
    }

    /// A throwaway probe of this body moving at `velocity`.
    pub fn probe(&self, velocity: Vec2) -> Probe {
        Probe { position: self.position, radius: self.radius, velocity }
    }

    /// Euler step: one tick, no sub-stepping.
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }

    pub fn touches(&self, point: Vec2, radius: f32) -> bool {
        self.position.distance(point) < self.radius + radius
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    /// Facing angle in radians: 0 right, π left, π/2 down, 3π/2 up.
    pub facing: f32,
    /// Mouth half-opening in radians, oscillates in [0, 0.75].
    pub mouth: f32,
    mouth_rate: f32,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Player {
            body: Body::new(position, Vec2::ZERO),
            facing: 0.0,
            mouth: MOUTH_MAX,
            mouth_rate: MOUTH_RATE,
        }
    }

    /// Snap facing to the current travel direction. At rest facing is kept.
    pub fn update_facing(&mut self) {
        let v = self.body.velocity;
        if v.x > 0.0 { self.facing = 0.0; }
        else if v.x < 0.0 { self.facing = PI; }
        else if v.y > 0.0 { self.facing = FRAC_PI_2; }
        else if v.y < 0.0 { self.facing = PI * 1.5; }
    }

    pub fn animate_mouth(&mut self) {
        if self.mouth < 0.0 || self.mouth > MOUTH_MAX { self.mouth_rate = -self.mouth_rate; }
        self.mouth += self.mouth_rate;
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PursuerId(pub u32);

/// Color identity of a pursuer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Hue {
    Red,
    Pink,
    // the stock maze spawns only two pursuers
    #[allow(dead_code)]
    Cyan,
    #[allow(dead_code)]
    Orange,
}

#[derive(Clone, Debug)]
pub struct Pursuer {
    pub id: PursuerId,
    pub hue: Hue,
    pub body: Body,
    /// Capturable by the player while set.
    pub alarmed: bool,
    /// Blocked directions recorded since the last decision, in probe order.
    pub recorded: Vec<Direction>,
}

impl Pursuer {
    pub fn new(id: PursuerId, hue: Hue, position: Vec2, heading: Option<Direction>) -> Self {
        let velocity = heading.map_or(Vec2::ZERO, |d| d.velocity(PURSUER_SPEED));
        Pursuer {
            id,
            hue,
            body: Body::new(position, velocity),
            alarmed: false,
            recorded: Vec::with_capacity(4),
        }
    }

    pub fn heading(&self) -> Option<Direction> {
        Direction::from_velocity(self.body.velocity)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CollectibleKind {
    Pellet,
    Power,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub position: Vec2,
    pub radius: f32,
}

impl Collectible {
    pub fn pellet(position: Vec2) -> Self {
        Collectible { kind: CollectibleKind::Pellet, position, radius: PELLET_RADIUS }
    }

    pub fn power(position: Vec2) -> Self {
        Collectible { kind: CollectibleKind::Power, position, radius: POWER_PELLET_RADIUS }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_is_an_involution() {
        for d in Direction::ALL {
            assert_eq!(d.reverse().reverse(), d);
            assert_ne!(d.reverse(), d);
        }
    }

    #[test]
    fn velocity_round_trips_through_direction() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_velocity(d.velocity(PURSUER_SPEED)), Some(d));
        }
        assert_eq!(Direction::from_velocity(Vec2::ZERO), None);
    }

    #[test]
    fn horizontal_wins_when_both_axes_move() {
        assert_eq!(Direction::from_velocity(Vec2::new(-1.0, 1.0)), Some(Direction::Left));
    }

    #[test]
    fn facing_snaps_to_travel_direction() {
        let mut p = Player::new(cell_center(1, 1));
        p.body.velocity = Direction::Left.velocity(PLAYER_SPEED);
        p.update_facing();
        assert_eq!(p.facing, PI);
        p.body.velocity = Direction::Down.velocity(PLAYER_SPEED);
        p.update_facing();
        assert_eq!(p.facing, FRAC_PI_2);
        p.body.velocity = Direction::Up.velocity(PLAYER_SPEED);
        p.update_facing();
        assert_eq!(p.facing, PI * 1.5);
        // at rest the last facing sticks
        p.body.velocity = Vec2::ZERO;
        p.update_facing();
        assert_eq!(p.facing, PI * 1.5);
    }

    #[test]
    fn mouth_oscillates_within_bounds() {
        let mut p = Player::new(Vec2::ZERO);
        let mut saw_closing = false;
        let mut saw_opening = false;
        let mut prev = p.mouth;
        for _ in 0..40 {
            p.animate_mouth();
            assert!(p.mouth > -0.2 && p.mouth < 0.95);
            if p.mouth < prev { saw_closing = true; } else { saw_opening = true; }
            prev = p.mouth;
        }
        assert!(saw_closing && saw_opening);
    }

    #[test]
    fn cell_center_is_half_a_cell_in() {
        assert_eq!(cell_center(0, 0), Vec2::new(20.0, 20.0));
        assert_eq!(cell_center(1, 6), Vec2::new(260.0, 60.0));
    }

    #[test]
    fn touches_uses_strict_radius_sum() {
        let b = Body::new(Vec2::ZERO, Vec2::ZERO);
        assert!(b.touches(Vec2::new(29.0, 0.0), AGENT_RADIUS));
        assert!(!b.touches(Vec2::new(30.0, 0.0), AGENT_RADIUS));
    }
}
