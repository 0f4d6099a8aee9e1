use std::mem;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::mazegen::{self, MazeGenerator};
use crate::session::{LevelSession, Player};
use crate::types::{Cell, Command, GameEvent, ITEM_SCORE, LoopState, Pos, START_POS};

/// Owner of one run's mutable state. All mutation goes through the methods
/// here; the simulation loop serializes access behind a single lock.
pub struct Game {
    seed: u64,
    generator: MazeGenerator,
    session: LevelSession,
    state: LoopState,
    pursuit_rng: ChaCha8Rng,
    events: Vec<GameEvent>,
    save_requested: bool,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        let generator = MazeGenerator::new(seed);
        let player = Player::new();
        let (grid, goal) = generator.generate(player.level);
        let adversaries = generator.spawn_adversaries(player.level, &grid);
        let session = LevelSession { grid, player, adversaries, goal };
        Self::with_session(seed, session)
    }

    /// Resume a restored session; the seed still drives future level
    /// generation and pursuit rolls.
    pub fn from_session(seed: u64, session: LevelSession) -> Self {
        Self::with_session(seed, session)
    }

    fn with_session(seed: u64, session: LevelSession) -> Self {
        Self {
            seed,
            generator: MazeGenerator::new(seed),
            session,
            state: LoopState::Running,
            pursuit_rng: ChaCha8Rng::seed_from_u64(mazegen::derive_level_seed(
                seed,
                0,
                mazegen::PURSUIT_STREAM,
            )),
            events: Vec::new(),
            save_requested: false,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn session(&self) -> &LevelSession {
        &self.session
    }

    pub fn snapshot(&self) -> LevelSession {
        self.session.clone()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Per-tick resolution, in fixed order: fatal collision, item pickup,
    /// goal reach. Runs only while the loop is live.
    pub fn resolve_tick(&mut self) {
        if self.state != LoopState::Running {
            return;
        }

        let player_pos = self.session.player.pos;
        if self.session.adversaries.iter().any(|adversary| adversary.pos == player_pos) {
            self.events.push(GameEvent::PlayerCaught { at: player_pos });
            self.state = LoopState::GameOver;
            return;
        }

        // A cell holds one item and flips to Open on pickup, so re-entering
        // the cell can never score twice.
        if self.session.grid.cell_at(player_pos) == Cell::Item {
            self.session.grid.set_cell(player_pos, Cell::Open);
            self.session.player.score += ITEM_SCORE;
            self.events.push(GameEvent::ItemCollected { at: player_pos });
        }

        if player_pos == self.session.goal.pos {
            self.complete_level();
        }
    }

    fn complete_level(&mut self) {
        self.state = LoopState::LevelTransition;
        self.events.push(GameEvent::LevelComplete { level: self.session.player.level });

        self.session.player.level += 1;
        self.session.player.pos = START_POS;
        self.session.player.moves = 0;

        let level = self.session.player.level;
        let (grid, goal) = self.generator.generate(level);
        self.session.adversaries = self.generator.spawn_adversaries(level, &grid);
        self.session.grid = grid;
        self.session.goal = goal;

        self.state = LoopState::Running;
    }

    pub fn apply_command(&mut self, command: Command) {
        if self.state != LoopState::Running {
            return;
        }
        match command {
            Command::Move(direction) => {
                self.session.player.step(direction, &self.session.grid);
            }
            Command::Save => self.save_requested = true,
            Command::Quit => self.state = LoopState::Stopped,
        }
    }

    /// The loop consumes the request and performs the actual write outside
    /// the shared lock.
    pub fn take_save_request(&mut self) -> bool {
        mem::take(&mut self.save_requested)
    }

    pub fn record_save_result(&mut self, saved: bool) {
        self.events.push(if saved { GameEvent::GameSaved } else { GameEvent::SaveFailed });
    }

    /// One pursuit update per adversary against the current player position.
    pub fn advance_adversaries(&mut self) {
        if self.state != LoopState::Running {
            return;
        }
        let player_pos = self.session.player.pos;
        let LevelSession { grid, adversaries, .. } = &mut self.session;
        for adversary in adversaries.iter_mut() {
            adversary.update(grid, player_pos, &mut self.pursuit_rng);
        }
    }

    pub fn fingerprint(&self) -> u64 {
        self.session.fingerprint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Adversary;
    use crate::types::Direction;

    #[test]
    fn new_game_starts_level_one_at_the_start_cell() {
        let game = Game::new(42);
        let session = game.session();
        assert_eq!(session.player.pos, START_POS);
        assert_eq!(session.player.level, 1);
        assert_eq!(session.player.score, 0);
        assert_eq!(game.state(), LoopState::Running);
        assert_eq!(session.adversaries.len(), 1);
    }

    #[test]
    fn same_seed_produces_identical_initial_sessions() {
        assert_eq!(Game::new(7).fingerprint(), Game::new(7).fingerprint());
        assert_ne!(Game::new(7).fingerprint(), Game::new(8).fingerprint());
    }

    #[test]
    fn collision_emits_caught_event_and_ends_the_game() {
        let mut game = Game::new(42);
        let player_pos = game.session().player.pos;
        game.session.adversaries = vec![Adversary::at(player_pos)];

        game.resolve_tick();
        assert_eq!(game.state(), LoopState::GameOver);
        assert_eq!(game.drain_events(), vec![GameEvent::PlayerCaught { at: player_pos }]);

        // Terminal state ignores further commands and ticks.
        game.apply_command(Command::Move(Direction::Down));
        game.resolve_tick();
        assert_eq!(game.state(), LoopState::GameOver);
    }

    #[test]
    fn item_pickup_scores_once_per_cell() {
        let mut game = Game::new(42);
        let pos = game.session().player.pos;
        game.session.grid.set_cell(pos, Cell::Item);

        game.resolve_tick();
        assert_eq!(game.session().player.score, ITEM_SCORE);
        assert_eq!(game.session().grid.cell_at(pos), Cell::Open);

        game.resolve_tick();
        assert_eq!(game.session().player.score, ITEM_SCORE, "pickup must be idempotent");
    }

    #[test]
    fn reaching_the_goal_rolls_a_fresh_reachable_level() {
        let mut game = Game::new(42);
        let goal_pos = game.session().goal.pos;
        game.session.player.pos = goal_pos;
        game.session.player.moves = 17;
        let old_grid = game.session().grid.clone();

        game.resolve_tick();

        let session = game.session();
        assert_eq!(session.player.level, 2);
        assert_eq!(session.player.pos, START_POS);
        assert_eq!(session.player.moves, 0);
        assert_eq!(game.state(), LoopState::Running);
        assert_ne!(session.grid, old_grid);
        assert!(crate::pathfinding::is_reachable(&session.grid, START_POS, session.goal.pos));
        for adversary in &session.adversaries {
            assert!(session.grid.is_walkable(adversary.pos), "spawn in wall on the new level");
        }
        assert_eq!(game.drain_events(), vec![GameEvent::LevelComplete { level: 1 }]);
    }

    #[test]
    fn goal_reach_keeps_score_but_resets_moves() {
        let mut game = Game::new(42);
        game.session.player.score = 30;
        game.session.player.pos = game.session().goal.pos;
        game.resolve_tick();
        assert_eq!(game.session().player.score, 30);
        assert_eq!(game.session().player.moves, 0);
    }

    #[test]
    fn quit_command_stops_the_game() {
        let mut game = Game::new(42);
        game.apply_command(Command::Quit);
        assert_eq!(game.state(), LoopState::Stopped);
    }

    #[test]
    fn save_request_is_taken_exactly_once() {
        let mut game = Game::new(42);
        assert!(!game.take_save_request());
        game.apply_command(Command::Save);
        assert!(game.take_save_request());
        assert!(!game.take_save_request());
    }

    #[test]
    fn adversary_advance_is_deterministic_for_a_seed() {
        let mut a = Game::new(1234);
        let mut b = Game::new(1234);
        for _ in 0..32 {
            a.advance_adversaries();
            b.advance_adversaries();
        }
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn level_transition_on_a_pickup_tick_scores_first() {
        let mut game = Game::new(42);
        let goal_pos = game.session().goal.pos;
        game.session.grid.set_cell(goal_pos, Cell::Item);
        game.session.player.pos = goal_pos;

        game.resolve_tick();
        assert_eq!(game.session().player.score, ITEM_SCORE);
        assert_eq!(game.session().player.level, 2);
        let events = game.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::ItemCollected { at: goal_pos }, GameEvent::LevelComplete { level: 1 }]
        );
    }
}
