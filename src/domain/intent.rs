/// Player intent: the single direction currently being asked for.
///
/// Not a queue. The latest key-down wins and marks its key as the held one;
/// only releasing that same key clears the intent. Releasing any other key
/// is ignored, even if it maps to the same direction.
///
/// Generic over the key type so keyboard and gamepad sources can share one
/// tracker without the core knowing about either.

use super::entity::Direction;

#[derive(Clone, Copy, Debug)]
pub struct Intent<K> {
    held: Option<(K, Direction)>,
}

impl<K: Copy + PartialEq> Intent<K> {
    pub fn new() -> Self {
        Intent { held: None }
    }

    pub fn key_down(&mut self, key: K, dir: Direction) {
        self.held = Some((key, dir));
    }

    pub fn key_up(&mut self, key: K) {
        if matches!(self.held, Some((k, _)) if k == key) {
            self.held = None;
        }
    }

    pub fn current(&self) -> Option<Direction> {
        self.held.map(|(_, d)| d)
    }

    pub fn clear(&mut self) {
        self.held = None;
    }
}

impl<K: Copy + PartialEq> Default for Intent<K> {
    fn default() -> Self {
        Self::new()
    }
}
