/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Agents move in continuous world units; each is drawn in the maze cell
/// that contains its center. One maze cell is two terminal columns.

use std::f32::consts::{FRAC_PI_2, PI};
use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use glam::Vec2;

use crate::domain::entity::{CollectibleKind, Hue, Player, CELL_SIZE, MOUTH_MAX};
use crate::domain::tile::WallShape;
use crate::sim::world::{LoopState, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell, also used for Clear, so the
    /// inter-row gap pixels match the cell color.
    const BASE_BG: Color = Color::Rgb { r: 10, g: 10, b: 18 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = if bg == Color::Reset { Self::BASE_BG } else { bg };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height { self.cells[y * self.width + x] } else { Cell::BLANK }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }
}

// ── Glyphs ──

const CELL_W: usize = 2;
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const WALL_FG: Color = Color::Rgb { r: 60, g: 90, b: 255 };
const PELLET_FG: Color = Color::Rgb { r: 255, g: 200, b: 150 };
const PLAYER_FG: Color = Color::Rgb { r: 255, g: 230, b: 0 };
const ALARMED_FG: Color = Color::Rgb { r: 60, g: 60, b: 255 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };

/// Two-column box-drawing glyph for each wall piece. The second column
/// continues the line to the right only where the piece connects rightwards.
fn wall_glyph(shape: WallShape) -> [char; 2] {
    match shape {
        WallShape::Horizontal => ['━', '━'],
        WallShape::Vertical => ['┃', ' '],
        WallShape::CornerTopLeft => ['┏', '━'],
        WallShape::CornerTopRight => ['┓', ' '],
        WallShape::CornerBottomRight => ['┛', ' '],
        WallShape::CornerBottomLeft => ['┗', '━'],
        WallShape::Block => ['▪', ' '],
        WallShape::CapLeft => ['╺', '━'],
        WallShape::CapRight => ['╸', ' '],
        WallShape::CapBottom => ['╹', ' '],
        WallShape::CapTop => ['╻', ' '],
        WallShape::Cross => ['╋', '━'],
        WallShape::ConnectorTop => ['┻', '━'],
        WallShape::ConnectorRight => ['┣', '━'],
        WallShape::ConnectorBottom => ['┳', '━'],
        WallShape::ConnectorLeft => ['┫', ' '],
    }
}

/// Mouth open past half → directional glyph; otherwise a closed disc.
fn player_glyph(player: &Player) -> char {
    if player.mouth < MOUTH_MAX / 2.0 { return '●'; }
    let f = player.facing;
    if (f - PI).abs() < 0.1 { 'ᗤ' }
    else if (f - FRAC_PI_2).abs() < 0.1 { 'ᗣ' }
    else if (f - PI * 1.5).abs() < 0.1 { 'ᗢ' }
    else { 'ᗧ' }
}

fn hue_color(hue: Hue) -> Color {
    match hue {
        Hue::Red => Color::Rgb { r: 255, g: 40, b: 40 },
        Hue::Pink => Color::Rgb { r: 255, g: 150, b: 200 },
        Hue::Cyan => Color::Rgb { r: 0, g: 230, b: 230 },
        Hue::Orange => Color::Rgb { r: 255, g: 170, b: 60 },
    }
}

/// Maze cell (row, col) containing a world point.
fn cell_of(p: Vec2) -> (usize, usize) {
    ((p.y / CELL_SIZE).max(0.0) as usize, (p.x / CELL_SIZE).max(0.0) as usize)
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<LoopState>,
    frame: u64,
    key_release: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            frame: 0,
            key_release: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.sync_size();
        Ok(())
    }

    /// Ask the terminal to report key releases. Returns whether it will.
    pub fn enable_key_release(&mut self) -> io::Result<bool> {
        if !terminal::supports_keyboard_enhancement().unwrap_or(false) { return Ok(false); }
        execute!(self.writer, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))?;
        self.key_release = true;
        Ok(true)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.key_release {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
            self.key_release = false;
        }
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState, paused: bool) -> io::Result<()> {
        self.frame += 1;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.sync_size();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // phase change → full repaint for a clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        self.compose_hud(world, paused);
        self.compose_maze(world);
        self.compose_help(world);
        match world.phase {
            LoopState::Won => self.compose_banner(world, "MAZE CLEARED", Color::Rgb { r: 80, g: 255, b: 120 }),
            LoopState::Lost => self.compose_banner(world, "CAUGHT", Color::Rgb { r: 255, g: 80, b: 80 }),
            LoopState::Ongoing if paused => self.compose_banner(world, "PAUSED", Color::Rgb { r: 255, g: 220, b: 50 }),
            LoopState::Ongoing => {}
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn sync_size(&mut self) {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // explicit base colors, never ResetColor (terminal default may differ)
        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) { continue; }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, w: &WorldState, paused: bool) {
        let alarmed = w.pursuers.iter().filter(|p| p.alarmed).count();
        let status = match w.phase {
            LoopState::Won => "CLEARED",
            LoopState::Lost => "CAUGHT",
            LoopState::Ongoing if paused => "PAUSED",
            LoopState::Ongoing if alarmed > 0 => "POWER!",
            LoopState::Ongoing => "",
        };
        let hud = format!(
            " Score:{:<6}  Pellets:{:<3}  Pursuers:{}  {} ",
            w.score, w.pellets_remaining(), w.pursuers.len(), status,
        );
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_maze(&mut self, w: &WorldState) {
        let origin = |row: usize, col: usize| (col * CELL_W, MAP_ROW + row);

        for o in &w.maze.obstacles {
            let (x, y) = origin(o.row, o.col);
            let [a, b] = wall_glyph(o.shape);
            self.front.set(x, y, Cell::new(a, WALL_FG, Color::Reset));
            self.front.set(x + 1, y, Cell::new(b, WALL_FG, Color::Reset));
        }

        // blink the power pellet
        let power_on = (self.frame / 15) % 2 == 0;
        for c in &w.collectibles {
            let (row, col) = cell_of(c.position);
            let (x, y) = origin(row, col);
            let ch = match c.kind {
                CollectibleKind::Pellet => '·',
                CollectibleKind::Power if power_on => '●',
                CollectibleKind::Power => ' ',
            };
            self.front.set(x, y, Cell::new(ch, PELLET_FG, Color::Reset));
        }

        for p in &w.pursuers {
            let (row, col) = cell_of(p.body.position);
            let (x, y) = origin(row, col);
            let fg = if p.alarmed { ALARMED_FG } else { hue_color(p.hue) };
            let ch = if p.alarmed { 'ᗣ' } else { 'ᗝ' };
            self.front.set(x, y, Cell::new(ch, fg, Color::Reset));
        }

        let (row, col) = cell_of(w.player.body.position);
        let (x, y) = origin(row, col);
        self.front.set(x, y, Cell::new(player_glyph(&w.player), PLAYER_FG, Color::Reset));
    }

    fn compose_help(&mut self, w: &WorldState) {
        let row = MAP_ROW + w.maze.rows + 1;
        let help = match w.phase {
            LoopState::Ongoing => " Arrows/WASD:Move  F1:Pause  Esc/Q:Quit",
            _ => " Enter/Start:Play again  Esc/Q:Quit",
        };
        self.front.put_str(0, row, help, Color::DarkGrey, Color::Reset);
    }

    fn compose_banner(&mut self, w: &WorldState, title: &str, fg: Color) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let row = MAP_ROW + w.maze.rows / 2;
        let width = w.maze.cols * CELL_W;
        let label = format!(" {title}  score {} ", w.score);
        let pad = width.saturating_sub(label.chars().count()) / 2;

        for x in 0..width {
            self.front.set(x, row, Cell::new(' ', fg, dim));
        }
        self.front.put_str(pad, row, &label, fg, dim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::cell_center;

    #[test]
    fn every_wall_shape_has_a_two_column_glyph() {
        use WallShape::*;
        let shapes = [
            Horizontal, Vertical, CornerTopLeft, CornerTopRight, CornerBottomRight, CornerBottomLeft,
            Block, CapLeft, CapRight, CapBottom, CapTop, Cross,
            ConnectorTop, ConnectorRight, ConnectorBottom, ConnectorLeft,
        ];
        for s in shapes {
            let [a, _] = wall_glyph(s);
            assert_ne!(a, ' ', "{s:?}");
        }
        assert_eq!(wall_glyph(Horizontal), ['━', '━']);
    }

    #[test]
    fn agents_map_to_the_cell_holding_their_center() {
        assert_eq!(cell_of(cell_center(3, 4)), (3, 4));
        assert_eq!(cell_of(Vec2::new(79.0, 41.0)), (1, 1));
        assert_eq!(cell_of(Vec2::new(-1.0, 5.0)), (0, 0));
    }

    #[test]
    fn player_glyph_follows_facing_and_mouth() {
        let mut p = Player::new(Vec2::ZERO);
        assert_eq!(player_glyph(&p), 'ᗧ');
        p.facing = PI;
        assert_eq!(player_glyph(&p), 'ᗤ');
        p.mouth = 0.1;
        assert_eq!(player_glyph(&p), '●');
    }

    #[test]
    fn each_hue_has_its_own_color() {
        let hues = [Hue::Red, Hue::Pink, Hue::Cyan, Hue::Orange];
        for (i, a) in hues.iter().enumerate() {
            assert_ne!(hue_color(*a), ALARMED_FG, "{a:?} looks alarmed");
            for b in &hues[i + 1..] {
                assert_ne!(hue_color(*a), hue_color(*b), "{a:?} and {b:?} share a color");
            }
        }
    }

    #[test]
    fn put_str_clips_at_the_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(2, 0, "abcdef", Color::White, Color::Reset);
        assert_eq!(fb.get(3, 0).ch, 'b');
        assert_eq!(fb.get(0, 0), Cell::BLANK);
    }
}
