/// WorldState: the complete snapshot of a running session.
///
/// One explicit context object replaces every piece of global game state:
/// the maze, the agents, the live collectibles, the score, the session
/// clock, the pending alarm clears and the RNG that drives pursuer turns.
/// It is built once per session, mutated only by `step`, and dropped when
/// the session ends (a restart builds a fresh one).
///
/// ## Ownership
///   - `maze`         : static walls. Never mutated after construction.
///   - `collectibles` : the live set; only ever shrinks.
///   - `pursuers`     : only ever shrinks; ids are stable and never reused.

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::domain::entity::{
    cell_center, Collectible, CollectibleKind, Direction, Hue, Player, Pursuer, PursuerId,
};
use super::maze::{Maze, PLAYER_SPAWN, PURSUER_SPAWNS};
use super::schedule::AlarmQueue;

/// Terminal-condition tracker. Once not `Ongoing`, stepping is a no-op.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoopState {
    Ongoing,
    Won,
    Lost,
}

pub struct WorldState {
    pub maze: Maze,
    pub player: Player,
    pub pursuers: Vec<Pursuer>,
    pub collectibles: Vec<Collectible>,

    pub score: u32,
    pub phase: LoopState,
    /// Simulated time since the session started.
    pub clock: Duration,
    pub tick: u64,

    pub alarms: AlarmQueue,
    pub rng: Pcg32,
    next_pursuer_id: u32,
}

impl WorldState {
    /// The reference session: fixed maze, player and two pursuers.
    pub fn new(seed: u64) -> Self {
        let mut world = WorldState::with_maze(Maze::reference(), seed);
        world.player = Player::new(cell_center(PLAYER_SPAWN.0, PLAYER_SPAWN.1));
        for &((row, col), hue, heading) in PURSUER_SPAWNS {
            world.spawn_pursuer(row, col, hue, Some(heading));
        }
        log::info!("new session, seed {seed}");
        world
    }

    /// A session on an arbitrary maze with no pursuers and the player at
    /// the maze origin cell. Callers place agents themselves.
    pub fn with_maze(maze: Maze, seed: u64) -> Self {
        let collectibles = maze.collectibles.clone();
        WorldState {
            maze,
            player: Player::new(cell_center(0, 0)),
            pursuers: Vec::new(),
            collectibles,
            score: 0,
            phase: LoopState::Ongoing,
            clock: Duration::ZERO,
            tick: 0,
            alarms: AlarmQueue::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_pursuer_id: 0,
        }
    }

    #[allow(dead_code)]
    pub fn place_player(&mut self, row: usize, col: usize) {
        self.player = Player::new(cell_center(row, col));
    }

    pub fn spawn_pursuer(&mut self, row: usize, col: usize, hue: Hue, heading: Option<Direction>) -> PursuerId {
        let id = PursuerId(self.next_pursuer_id);
        self.next_pursuer_id += 1;
        self.pursuers.push(Pursuer::new(id, hue, cell_center(row, col), heading));
        id
    }

    #[allow(dead_code)]
    pub fn pursuer(&self, id: PursuerId) -> Option<&Pursuer> {
        self.pursuers.iter().find(|p| p.id == id)
    }

    pub fn pursuer_mut(&mut self, id: PursuerId) -> Option<&mut Pursuer> {
        self.pursuers.iter_mut().find(|p| p.id == id)
    }

    pub fn pellets_remaining(&self) -> usize {
        self.collectibles.iter().filter(|c| c.kind == CollectibleKind::Pellet).count()
    }

    #[allow(dead_code)]
    pub fn power_pellets_remaining(&self) -> usize {
        self.collectibles.iter().filter(|c| c.kind == CollectibleKind::Power).count()
    }

    pub fn is_over(&self) -> bool {
        self.phase != LoopState::Ongoing
    }
}
