//! Blocking start menu shown before a run begins.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    NewGame,
    Continue,
    Exit,
}

pub fn choice_for_key(code: KeyCode) -> Option<MenuChoice> {
    match code {
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => Some(MenuChoice::NewGame),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(MenuChoice::Continue),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Expects raw mode to already be active.
pub fn run_menu(has_save: bool) -> Result<MenuChoice> {
    let mut stdout = io::stdout();
    queue!(
        stdout,
        Clear(ClearType::All),
        MoveTo(0, 0),
        Print("MAZE"),
        MoveTo(0, 2),
        Print("  [n] new game"),
        MoveTo(0, 3),
        Print(if has_save { "  [c] continue" } else { "  [c] continue (no save found)" }),
        MoveTo(0, 4),
        Print("  [q] quit"),
    )?;
    stdout.flush()?;

    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(choice) = choice_for_key(key.code) {
                return Ok(choice);
            }
        }
    }
}
