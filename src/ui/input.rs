/// Keyboard tracker.
///
/// Turns the terminal's key stream into the press/release edges the
/// player `Intent` expects, plus one-shot session commands.
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Direction;
use crate::domain::intent::Intent;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Identity of whatever is holding the current direction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum InputKey {
    Keyboard(KeyCode),
    Pad(Direction),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Pause,
    Restart,
    Quit,
}

pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c' | 'C')) {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::F(1) => Some(Command::Pause),
        KeyCode::Enter => Some(Command::Restart),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,
    presses: Vec<KeyCode>,
    releases: Vec<KeyCode>,
    commands: Vec<Command>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            presses: Vec::with_capacity(8),
            releases: Vec::with_capacity(8),
            commands: Vec::with_capacity(4),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.begin_frame();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }
        self.expire(Instant::now());
    }

    /// Feed this frame's edges into `intent`: releases first, then presses,
    /// so a key swapped within one frame ends up held.
    pub fn apply(&self, intent: &mut Intent<InputKey>) {
        for &code in &self.releases {
            intent.key_up(InputKey::Keyboard(code));
        }
        for &code in &self.presses {
            if let Some(dir) = direction_for(code) {
                intent.key_down(InputKey::Keyboard(code), dir);
            }
        }
    }

    pub fn has_command(&self, cmd: Command) -> bool {
        self.commands.contains(&cmd)
    }

    // ── Internal ──

    fn begin_frame(&mut self) {
        self.presses.clear();
        self.releases.clear();
        self.commands.clear();
    }

    fn record(&mut self, key: KeyEvent, now: Instant) {
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                if self.last_active.remove(&key.code).is_some() {
                    self.releases.push(key.code);
                }
            }
            // not trusted without enhancement; the timeout handles it
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.last_active.insert(key.code, now).is_some();
                if !was_held {
                    self.presses.push(key.code);
                    if let Some(cmd) = command_for(&key) { self.commands.push(cmd); }
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        let releases = &mut self.releases;
        self.last_active.retain(|code, t| {
            let live = now.duration_since(*t) < HOLD_TIMEOUT;
            if !live { releases.push(*code); }
            live
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(direction_for(KeyCode::Left), Some(Direction::Left));
        assert_eq!(direction_for(KeyCode::Char('w')), Some(Direction::Up));
        assert_eq!(direction_for(KeyCode::Char('D')), Some(Direction::Right));
        assert_eq!(direction_for(KeyCode::Char('x')), None);
    }

    #[test]
    fn press_then_timeout_release() {
        let t0 = Instant::now();
        let mut input = InputState::new();
        let mut intent = Intent::new();

        input.begin_frame();
        input.record(press(KeyCode::Right), t0);
        input.expire(t0);
        input.apply(&mut intent);
        assert_eq!(intent.current(), Some(Direction::Right));

        input.begin_frame();
        input.expire(t0 + HOLD_TIMEOUT);
        input.apply(&mut intent);
        assert_eq!(intent.current(), None);
    }

    #[test]
    fn repeats_do_not_re_press() {
        let t0 = Instant::now();
        let mut input = InputState::new();
        input.begin_frame();
        input.record(press(KeyCode::Up), t0);
        input.begin_frame();
        input.record(press(KeyCode::Up), t0 + Duration::from_millis(50));
        assert!(input.presses.is_empty());
    }

    #[test]
    fn release_honoured_only_with_enhancement() {
        let t0 = Instant::now();
        let mut input = InputState::new();
        input.record(press(KeyCode::Left), t0);
        input.begin_frame();
        input.record(release(KeyCode::Left), t0);
        assert!(input.releases.is_empty());

        input.honor_release = true;
        input.record(release(KeyCode::Left), t0);
        assert_eq!(input.releases, vec![KeyCode::Left]);
    }

    #[test]
    fn releasing_an_older_key_keeps_the_newer_direction() {
        let t0 = Instant::now();
        let mut input = InputState::new();
        input.honor_release = true;
        let mut intent = Intent::new();

        input.record(press(KeyCode::Right), t0);
        input.record(press(KeyCode::Up), t0);
        input.apply(&mut intent);
        assert_eq!(intent.current(), Some(Direction::Up));

        input.begin_frame();
        input.record(release(KeyCode::Right), t0);
        input.apply(&mut intent);
        assert_eq!(intent.current(), Some(Direction::Up));
    }

    #[test]
    fn commands_fire_on_fresh_presses() {
        let t0 = Instant::now();
        let mut input = InputState::new();
        input.record(press(KeyCode::F(1)), t0);
        input.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), t0);
        assert_eq!(input.commands, vec![Command::Pause, Command::Quit]);
        assert!(!input.has_command(Command::Restart));
    }
}
