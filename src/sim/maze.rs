/// Maze model: the compiled-in layout and its parser.
///
/// ## Tile legend:
///   '-' '|'         = straight pipes      '1' '2' '3' '4' = corners (TL TR BR BL)
///   'b'             = block               '[' ']' '_' '^' = caps (L R B T)
///   '+'             = cross               '5' '6' '7' '8' = connectors (T R B L)
///   '.'             = pellet              'p'             = power pellet
///   ' '             = empty floor
///
/// Every other symbol produces nothing. That is deliberate for a trusted
/// layout, but a typo would silently open a hole in a wall, so each one is
/// reported at warn level.

use crate::domain::entity::{cell_center, Collectible, Direction, Hue};
use crate::domain::physics::Obstacle;
use crate::domain::tile::Tile;

/// The one and only playfield: 11 columns × 13 rows.
pub const LAYOUT: &[&str] = &[
    "1---------2",
    "|.........|",
    "|.b.[7].b.|",
    "|...._....|",
    "|.[]...[].|",
    "|....^....|",
    "|.b.[+].b.|",
    "|...._....|",
    "|.[]...[].|",
    "|....^....|",
    "|.b.[5].b.|",
    "|........p|",
    "4---------3",
];

/// Player start cell (row, col).
pub const PLAYER_SPAWN: (usize, usize) = (1, 1);

/// Pursuer start cells with their colors and initial headings.
pub const PURSUER_SPAWNS: &[((usize, usize), Hue, Direction)] = &[
    ((1, 6), Hue::Red, Direction::Right),
    ((3, 6), Hue::Pink, Direction::Right),
];

#[derive(Clone, Debug)]
pub struct Maze {
    pub rows: usize,
    pub cols: usize,
    pub obstacles: Vec<Obstacle>,
    /// Initial collectibles in row-major order. The world owns the live set.
    pub collectibles: Vec<Collectible>,
}

impl Maze {
    pub fn reference() -> Self {
        Maze::parse(LAYOUT)
    }

    /// Build obstacles and collectibles from symbol rows. Total: never fails.
    pub fn parse(rows: &[&str]) -> Self {
        let mut obstacles = Vec::new();
        let mut collectibles = Vec::new();
        let mut cols = 0;

        for (row, line) in rows.iter().enumerate() {
            let mut width = 0;
            for (col, ch) in line.chars().enumerate() {
                width = col + 1;
                match Tile::from_symbol(ch) {
                    Some(Tile::Wall(shape)) => obstacles.push(Obstacle::at_cell(row, col, shape)),
                    Some(Tile::Pellet) => collectibles.push(Collectible::pellet(cell_center(row, col))),
                    Some(Tile::PowerPellet) => collectibles.push(Collectible::power(cell_center(row, col))),
                    Some(Tile::Empty) => {}
                    None => log::warn!("maze: ignoring unknown symbol {ch:?} at row {row}, col {col}"),
                }
            }
            cols = cols.max(width);
        }

        log::debug!(
            "maze parsed: {}x{}, {} walls, {} collectibles",
            cols, rows.len(), obstacles.len(), collectibles.len(),
        );

        Maze { rows: rows.len(), cols, obstacles, collectibles }
    }
}
