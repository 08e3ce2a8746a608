/// Tile types and their properties.
/// Symbol decoding is centralized here so the maze loader stays a plain loop.

/// Wall segment variant. Only the renderer cares which one a wall is;
/// collision treats every wall as the same 40×40 box.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WallShape {
    Horizontal,
    Vertical,
    CornerTopLeft,
    CornerTopRight,
    CornerBottomRight,
    CornerBottomLeft,
    Block,
    CapLeft,          // opening on the right
    CapRight,         // opening on the left
    CapBottom,        // opening on the top
    CapTop,           // opening on the bottom
    Cross,
    ConnectorTop,     // joins left, right and up
    ConnectorRight,   // joins up, down and left
    ConnectorBottom,  // joins left, right and down
    ConnectorLeft,    // joins up, down and right
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    Wall(WallShape),
    Pellet,
    PowerPellet,
}

impl Tile {
    /// Decode one maze symbol. Unknown symbols return None.
    pub fn from_symbol(ch: char) -> Option<Tile> {
        let shape = match ch {
            '-' => WallShape::Horizontal,
            '|' => WallShape::Vertical,
            '1' => WallShape::CornerTopLeft,
            '2' => WallShape::CornerTopRight,
            '3' => WallShape::CornerBottomRight,
            '4' => WallShape::CornerBottomLeft,
            'b' => WallShape::Block,
            '[' => WallShape::CapLeft,
            ']' => WallShape::CapRight,
            '_' => WallShape::CapBottom,
            '^' => WallShape::CapTop,
            '+' => WallShape::Cross,
            '5' => WallShape::ConnectorTop,
            '6' => WallShape::ConnectorRight,
            '7' => WallShape::ConnectorBottom,
            '8' => WallShape::ConnectorLeft,
            '.' => return Some(Tile::Pellet),
            'p' => return Some(Tile::PowerPellet),
            ' ' => return Some(Tile::Empty),
            _ => return None,
        };
        Some(Tile::Wall(shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_wall_symbol_is_a_wall() {
        for ch in "-|1234b[]_^+5678".chars() {
            assert!(matches!(Tile::from_symbol(ch), Some(Tile::Wall(_))), "{ch} should be a wall");
        }
    }

    #[test]
    fn collectible_symbols() {
        assert_eq!(Tile::from_symbol('.'), Some(Tile::Pellet));
        assert_eq!(Tile::from_symbol('p'), Some(Tile::PowerPellet));
        assert_eq!(Tile::from_symbol(' '), Some(Tile::Empty));
    }

    #[test]
    fn unknown_symbol_decodes_to_nothing() {
        assert_eq!(Tile::from_symbol('?'), None);
        assert_eq!(Tile::from_symbol('P'), None);
    }

    #[test]
    fn shape_tags_are_distinct() {
        assert_eq!(Tile::from_symbol('['), Some(Tile::Wall(WallShape::CapLeft)));
        assert_eq!(Tile::from_symbol('7'), Some(Tile::Wall(WallShape::ConnectorBottom)));
        assert_ne!(Tile::from_symbol('1'), Tile::from_symbol('2'));
    }
}
