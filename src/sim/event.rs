/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and messages.

use glam::Vec2;

use crate::domain::entity::PursuerId;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    PelletEaten { at: Vec2 },
    PowerPelletEaten { at: Vec2 },
    PursuerAlarmed { id: PursuerId },
    PursuerCalmed { id: PursuerId },
    PursuerCaptured { id: PursuerId },
    PlayerCaught { by: PursuerId },
    MazeCleared,
}
