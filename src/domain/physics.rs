/// Circle-vs-wall collision.
///
/// A single predicate answers every movement question in the game:
/// "if this circle moved by `velocity` next tick, would it land inside
/// this wall?"  The wall rectangle is inflated by a padding chosen so an
/// agent of radius r slides through a one-cell corridor with exactly one
/// unit to spare on each side:
///
///   padding = CELL_SIZE / 2 - r - 1
///
/// Look-ahead, not overlap: callers test a candidate velocity and refuse
/// it before the agent ever penetrates a wall.

use glam::Vec2;

use super::entity::CELL_SIZE;
use super::tile::WallShape;

/// A hypothetical circle state. Built fresh per query, never aliased.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Probe {
    pub position: Vec2,
    pub radius: f32,
    pub velocity: Vec2,
}

/// A static wall: one maze cell, top-left anchored.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Obstacle {
    pub position: Vec2,
    pub size: f32,
    pub shape: WallShape,
    pub row: usize,
    pub col: usize,
}

impl Obstacle {
    pub fn at_cell(row: usize, col: usize, shape: WallShape) -> Self {
        Obstacle {
            position: Vec2::new(col as f32 * CELL_SIZE, row as f32 * CELL_SIZE),
            size: CELL_SIZE,
            shape,
            row,
            col,
        }
    }
}

pub fn padding_for(radius: f32) -> f32 {
    CELL_SIZE / 2.0 - radius - 1.0
}

/// Would `probe`, after one step at its velocity, fall inside the padded wall?
/// Bounds are inclusive on every side.
pub fn collides(probe: &Probe, wall: &Obstacle) -> bool {
    let pad = padding_for(probe.radius);
    let next = probe.position + probe.velocity;
    let r = probe.radius;
    next.y - r <= wall.position.y + wall.size + pad
        && next.x + r >= wall.position.x - pad
        && next.y + r >= wall.position.y - pad
        && next.x - r <= wall.position.x + wall.size + pad
}

pub fn collides_any(probe: &Probe, walls: &[Obstacle]) -> bool {
    walls.iter().any(|w| collides(probe, w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{cell_center, AGENT_RADIUS, PLAYER_SPEED};
    use proptest::prelude::*;

    fn probe(position: Vec2, velocity: Vec2) -> Probe {
        Probe { position, radius: AGENT_RADIUS, velocity }
    }

    fn wall(row: usize, col: usize) -> Obstacle {
        Obstacle::at_cell(row, col, WallShape::Block)
    }

    #[test]
    fn padding_leaves_one_unit_in_a_corridor() {
        assert_eq!(padding_for(AGENT_RADIUS), 4.0);
        // resting at a cell center next to a wall is clear
        let p = probe(cell_center(1, 1), Vec2::ZERO);
        assert!(!collides(&p, &wall(0, 1)));
        assert!(!collides(&p, &wall(1, 0)));
        assert!(!collides(&p, &wall(2, 1)));
    }

    #[test]
    fn moving_into_adjacent_wall_collides() {
        let p = probe(cell_center(1, 1), Vec2::new(0.0, -PLAYER_SPEED));
        assert!(collides(&p, &wall(0, 1)));
        let p = probe(cell_center(1, 1), Vec2::new(-1.0, 0.0));
        assert!(collides(&p, &wall(1, 0)));
    }

    #[test]
    fn moving_away_from_wall_is_clear() {
        let p = probe(cell_center(1, 1), Vec2::new(PLAYER_SPEED, 0.0));
        assert!(!collides(&p, &wall(1, 0)));
    }

    #[test]
    fn diagonal_neighbour_blocks_off_center_turns() {
        // wall above-right; the circle is 5 units short of the open cell above
        let p = probe(cell_center(1, 1) + Vec2::new(5.0, 0.0), Vec2::new(0.0, -PLAYER_SPEED));
        assert!(collides(&p, &wall(0, 2)));
        // exactly centered it fits past
        let p = probe(cell_center(1, 1), Vec2::new(0.0, -PLAYER_SPEED));
        assert!(!collides(&p, &wall(0, 2)));
    }

    #[test]
    fn collides_any_scans_all_walls() {
        let walls = [wall(5, 5), wall(0, 1)];
        let p = probe(cell_center(1, 1), Vec2::new(0.0, -PLAYER_SPEED));
        assert!(collides_any(&p, &walls));
        assert!(!collides_any(&p, &walls[..1]));
        assert!(!collides_any(&p, &[]));
    }

    proptest! {
        #[test]
        fn strictly_outside_on_one_axis_never_collides(
            x in -200.0f32..600.0, y in -200.0f32..600.0,
            vx in -10.0f32..10.0, vy in -10.0f32..10.0,
            radius in 1.0f32..19.0,
        ) {
            let w = wall(3, 3);
            let p = Probe { position: Vec2::new(x, y), radius, velocity: Vec2::new(vx, vy) };
            let pad = padding_for(radius);
            let next = p.position + p.velocity;
            let outside_x = next.x + radius < w.position.x - pad
                || next.x - radius > w.position.x + w.size + pad;
            let outside_y = next.y + radius < w.position.y - pad
                || next.y - radius > w.position.y + w.size + pad;
            if outside_x || outside_y {
                prop_assert!(!collides(&p, &w));
            } else {
                prop_assert!(collides(&p, &w));
            }
        }

        #[test]
        fn collides_is_pure(x in 0.0f32..400.0, y in 0.0f32..400.0) {
            let w = wall(2, 2);
            let p = probe(Vec2::new(x, y), Vec2::new(PLAYER_SPEED, 0.0));
            let before = p;
            let first = collides(&p, &w);
            prop_assert_eq!(first, collides(&p, &w));
            prop_assert_eq!(p, before);
        }
    }
}
