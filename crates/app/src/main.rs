use anyhow::{Context, Result};

use maze_app::input::KeyboardInput;
use maze_app::menu::{self, MenuChoice};
use maze_app::render::TerminalRenderer;
use maze_app::save_path::default_save_path;
use maze_app::seed;
use maze_app::terminal::TerminalGuard;
use maze_core::sim::SaveStore;
use maze_core::{Game, JsonSaveStore, LoopState, SimConfig, SimulationLoop};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let seed = seed::resolve_seed(&args, seed::entropy_seed())
        .map_err(|message| anyhow::anyhow!(message))?;

    let save_path = default_save_path()?;
    let mut store = JsonSaveStore::new(save_path);

    let Some(finished) = play(seed.value(), &mut store)? else {
        return Ok(());
    };

    let session = finished.session();
    if finished.state() == LoopState::GameOver {
        println!("caught on level {} after {} moves", session.player.level, session.player.moves);
    }
    println!(
        "seed {}  level {}  score {}",
        finished.seed(),
        session.player.level,
        session.player.score
    );
    Ok(())
}

/// Runs menu and game inside the terminal guard; `None` means the player
/// left from the menu.
fn play(seed: u64, store: &mut JsonSaveStore) -> Result<Option<Game>> {
    let saved_session = store.load().context("reading the save file")?;

    let _guard = TerminalGuard::enter()?;
    let game = match menu::run_menu(saved_session.is_some())? {
        MenuChoice::Exit => return Ok(None),
        MenuChoice::Continue => match saved_session {
            Some(session) => Game::from_session(seed, session),
            None => Game::new(seed),
        },
        MenuChoice::NewGame => Game::new(seed),
    };

    let mut renderer = TerminalRenderer::new();
    let mut input = KeyboardInput::new();
    let finished =
        SimulationLoop::new(SimConfig::default()).run(game, &mut renderer, &mut input, store);
    Ok(Some(finished))
}
