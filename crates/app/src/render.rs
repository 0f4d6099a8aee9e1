//! Draws one session snapshot per tick onto the alternate screen.

use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use maze_core::session::LevelSession;
use maze_core::sim::Renderer;
use maze_core::{Cell, Direction, GRID_HEIGHT, GRID_WIDTH, GameEvent, LoopState, Pos};

pub struct TerminalRenderer {
    stdout: Stdout,
    last_message: Option<String>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self { stdout: io::stdout(), last_message: None }
    }

    fn draw(
        &mut self,
        session: &LevelSession,
        state: LoopState,
        events: &[GameEvent],
    ) -> io::Result<()> {
        if let Some(event) = events.last() {
            self.last_message = Some(message_for(event));
        }

        for y in 0..GRID_HEIGHT as i32 {
            queue!(self.stdout, MoveTo(0, y as u16))?;
            for x in 0..GRID_WIDTH as i32 {
                let (glyph, color) = glyph_at(session, Pos { y, x });
                queue!(self.stdout, SetForegroundColor(color), Print(glyph))?;
            }
            queue!(self.stdout, Clear(ClearType::UntilNewLine))?;
        }
        queue!(self.stdout, ResetColor)?;

        let status = format!(
            "level {:>2}  score {:>4}  moves {:>4}  adversaries {}",
            session.player.level,
            session.player.score,
            session.player.moves,
            session.adversaries.len(),
        );
        queue!(
            self.stdout,
            MoveTo(0, GRID_HEIGHT as u16 + 1),
            Print(status),
            Clear(ClearType::UntilNewLine),
        )?;

        let message = match state {
            LoopState::GameOver => "you were caught",
            _ => self.last_message.as_deref().unwrap_or("wasd/arrows move, p saves, q quits"),
        };
        queue!(
            self.stdout,
            MoveTo(0, GRID_HEIGHT as u16 + 2),
            Print(message),
            Clear(ClearType::UntilNewLine),
        )?;

        self.stdout.flush()
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, session: &LevelSession, state: LoopState, events: &[GameEvent]) {
        // A failed draw is dropped; the next frame repaints everything.
        let _ = self.draw(session, state, events);
    }
}

/// Actors cover terrain: player over adversaries over the goal over cells.
fn glyph_at(session: &LevelSession, pos: Pos) -> (char, Color) {
    if session.player.pos == pos {
        return ('P', Color::Green);
    }
    if let Some(adversary) = session.adversaries.iter().find(|adversary| adversary.pos == pos) {
        return (facing_glyph(adversary.facing), Color::Red);
    }
    if session.goal.pos == pos {
        return ('E', Color::Cyan);
    }
    match session.grid.cell_at(pos) {
        Cell::Wall => ('\u{2588}', Color::DarkGrey),
        Cell::Item => ('*', Color::Yellow),
        Cell::Open => (' ', Color::Reset),
    }
}

/// `X` marks an adversary whose last step was blocked.
fn facing_glyph(facing: Option<Direction>) -> char {
    match facing {
        Some(Direction::Up) => '^',
        Some(Direction::Down) => 'v',
        Some(Direction::Left) => '<',
        Some(Direction::Right) => '>',
        None => 'X',
    }
}

fn message_for(event: &GameEvent) -> String {
    match event {
        GameEvent::ItemCollected { .. } => "picked up an item".to_string(),
        GameEvent::LevelComplete { level } => format!("level {level} cleared"),
        GameEvent::PlayerCaught { .. } => "caught by an adversary".to_string(),
        GameEvent::GameSaved => "game saved".to_string(),
        GameEvent::SaveFailed => "save failed, still playing".to_string(),
    }
}
