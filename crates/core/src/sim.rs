//! The concurrent simulation loop.
//!
//! Two activities share one `Game` behind a single mutex: the caller's
//! thread runs the outer tick (resolve, apply commands, render), and a
//! spawned thread advances adversaries on a fixed wall-clock cadence. The
//! adversary thread polls a monotonic clock at a short granularity and
//! observes a stop flag at every wake, so the loop can always join it
//! before returning ownership of the game to the caller. Rendering, input
//! polling, and save-file writes all happen outside the lock.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use crate::game::Game;
use crate::session::LevelSession;
use crate::types::{Command, GameEvent, LoopState};

/// Read-only view consumed once per outer tick. Must not mutate state.
pub trait Renderer {
    fn render(&mut self, session: &LevelSession, state: LoopState, events: &[GameEvent]);
}

/// Non-blocking command source; `None` is the frequent, expected answer.
pub trait InputSource {
    fn poll(&mut self) -> Option<Command>;
}

/// Session persistence. A missing save loads as `Ok(None)`; corrupt or
/// unreadable data is an error the caller reports without aborting play.
pub trait SaveStore {
    fn save(&mut self, session: &LevelSession) -> io::Result<()>;
    fn load(&mut self) -> io::Result<Option<LevelSession>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Wall-clock period between adversary updates.
    pub adversary_interval: Duration,
    /// Outer tick pacing, independent of the adversary cadence.
    pub frame_delay: Duration,
    /// How often the adversary thread checks the clock and the stop flag.
    pub poll_granularity: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            adversary_interval: Duration::from_millis(500),
            frame_delay: Duration::from_millis(50),
            poll_granularity: Duration::from_millis(10),
        }
    }
}

pub struct SimulationLoop {
    config: SimConfig,
}

impl SimulationLoop {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// Drive the game until it reaches `GameOver` or `Stopped`, then join
    /// the adversary thread and hand the game back. Persistence failures
    /// surface as `SaveFailed` events, never as panics or early returns.
    pub fn run<R, I, S>(&self, game: Game, renderer: &mut R, input: &mut I, store: &mut S) -> Game
    where
        R: Renderer,
        I: InputSource,
        S: SaveStore,
    {
        let game = Arc::new(Mutex::new(game));
        let stop = Arc::new(AtomicBool::new(false));
        let adversary_thread = self.spawn_adversary_thread(&game, &stop);

        loop {
            let mut commands = Vec::new();
            while let Some(command) = input.poll() {
                commands.push(command);
            }

            let (snapshot, state, mut events, wants_save) = {
                let mut game = lock(&game);
                game.resolve_tick();
                for command in commands {
                    game.apply_command(command);
                }
                (game.snapshot(), game.state(), game.drain_events(), game.take_save_request())
            };

            if wants_save {
                let saved = store.save(&snapshot).is_ok();
                let mut game = lock(&game);
                game.record_save_result(saved);
                events.extend(game.drain_events());
            }

            renderer.render(&snapshot, state, &events);

            if matches!(state, LoopState::GameOver | LoopState::Stopped) {
                break;
            }
            thread::sleep(self.config.frame_delay);
        }

        stop.store(true, Ordering::Relaxed);
        adversary_thread.join().expect("adversary thread panicked");

        Arc::into_inner(game)
            .expect("adversary thread exited, no other game owners")
            .into_inner()
            .expect("game mutex poisoned")
    }

    fn spawn_adversary_thread(
        &self,
        game: &Arc<Mutex<Game>>,
        stop: &Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        let game = Arc::clone(game);
        let stop = Arc::clone(stop);
        let interval = self.config.adversary_interval;
        let granularity = self.config.poll_granularity;

        thread::spawn(move || {
            let mut last_update = Instant::now();
            while !stop.load(Ordering::Relaxed) {
                if last_update.elapsed() >= interval {
                    lock(&game).advance_adversaries();
                    last_update = Instant::now();
                }
                thread::sleep(granularity);
            }
        })
    }
}

fn lock(game: &Arc<Mutex<Game>>) -> MutexGuard<'_, Game> {
    game.lock().expect("game mutex poisoned")
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::types::{Direction, START_POS};

    pub(crate) struct NullRenderer;

    impl Renderer for NullRenderer {
        fn render(&mut self, _: &LevelSession, _: LoopState, _: &[GameEvent]) {}
    }

    pub(crate) struct ScriptedInput {
        commands: VecDeque<Command>,
        gate: bool,
    }

    impl ScriptedInput {
        pub(crate) fn new(commands: impl IntoIterator<Item = Command>) -> Self {
            Self { commands: commands.into_iter().collect(), gate: false }
        }
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self) -> Option<Command> {
            // The loop drains until `None`; alternating keeps scripted runs
            // at exactly one command per tick.
            if self.gate {
                self.gate = false;
                return None;
            }
            self.gate = true;
            self.commands.pop_front()
        }
    }

    pub(crate) struct MemoryStore {
        pub(crate) saved: Option<LevelSession>,
        pub(crate) fail_saves: bool,
    }

    impl MemoryStore {
        pub(crate) fn empty() -> Self {
            Self { saved: None, fail_saves: false }
        }
    }

    impl SaveStore for MemoryStore {
        fn save(&mut self, session: &LevelSession) -> io::Result<()> {
            if self.fail_saves {
                return Err(io::Error::other("store rejects writes"));
            }
            self.saved = Some(session.clone());
            Ok(())
        }

        fn load(&mut self) -> io::Result<Option<LevelSession>> {
            Ok(self.saved.clone())
        }
    }

    /// Fast ticks, frozen adversaries: scripted command tests stay
    /// deterministic regardless of scheduling.
    fn script_config() -> SimConfig {
        SimConfig {
            adversary_interval: Duration::from_secs(3600),
            frame_delay: Duration::from_millis(1),
            poll_granularity: Duration::from_millis(1),
        }
    }

    #[test]
    fn quit_command_returns_a_stopped_game() {
        let game = Game::new(42);
        let mut input = ScriptedInput::new([Command::Quit]);
        let mut store = MemoryStore::empty();
        let finished = SimulationLoop::new(script_config()).run(
            game,
            &mut NullRenderer,
            &mut input,
            &mut store,
        );
        assert_eq!(finished.state(), LoopState::Stopped);
    }

    #[test]
    fn save_command_persists_the_current_session() {
        let game = Game::new(42);
        // Reachability guarantees the start cell opens right or down.
        let step = if game.session().grid.is_walkable(Direction::Right.apply(START_POS)) {
            Direction::Right
        } else {
            Direction::Down
        };
        let mut input = ScriptedInput::new([Command::Move(step), Command::Save, Command::Quit]);
        let mut store = MemoryStore::empty();
        let finished = SimulationLoop::new(script_config()).run(
            game,
            &mut NullRenderer,
            &mut input,
            &mut store,
        );

        let saved = store.saved.expect("session should have been saved");
        assert_eq!(saved.player.moves, 1);
        assert_eq!(finished.state(), LoopState::Stopped);
    }

    #[test]
    fn failed_save_keeps_the_game_running() {
        let game = Game::new(42);
        let mut input = ScriptedInput::new([Command::Save, Command::Quit]);
        let mut store = MemoryStore::empty();
        store.fail_saves = true;

        struct EventCollector(Vec<GameEvent>);
        impl Renderer for EventCollector {
            fn render(&mut self, _: &LevelSession, _: LoopState, events: &[GameEvent]) {
                self.0.extend_from_slice(events);
            }
        }

        let mut renderer = EventCollector(Vec::new());
        let finished =
            SimulationLoop::new(script_config()).run(game, &mut renderer, &mut input, &mut store);

        assert_eq!(finished.state(), LoopState::Stopped);
        assert!(renderer.0.contains(&GameEvent::SaveFailed));
        assert!(store.saved.is_none());
    }
}
