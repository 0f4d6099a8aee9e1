//! Keyboard-to-command mapping over non-blocking terminal events.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use maze_core::sim::InputSource;
use maze_core::{Command, Direction};

/// At most one command per tick; extra keystrokes stay queued in the
/// terminal buffer for later ticks.
pub struct KeyboardInput {
    served: bool,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self { served: false }
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> Option<Command> {
        if self.served {
            self.served = false;
            return None;
        }

        // A zero timeout keeps the frame cadence independent of typing.
        match event::poll(Duration::ZERO) {
            Ok(true) => {}
            _ => return None,
        }
        let Ok(Event::Key(key)) = event::read() else {
            return None;
        };
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let command = command_for_key(key.code)?;
        self.served = true;
        Some(command)
    }
}

pub fn command_for_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('w') | KeyCode::Up => Some(Command::Move(Direction::Up)),
        KeyCode::Char('s') | KeyCode::Down => Some(Command::Move(Direction::Down)),
        KeyCode::Char('a') | KeyCode::Left => Some(Command::Move(Direction::Left)),
        KeyCode::Char('d') | KeyCode::Right => Some(Command::Move(Direction::Right)),
        KeyCode::Char('p') => Some(Command::Save),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
