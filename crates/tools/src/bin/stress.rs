//! Stress harness: drives the real simulation loop with random input at a
//! fast cadence and asserts session invariants on every rendered frame.

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use maze_core::sim::{InputSource, Renderer, SaveStore};
use maze_core::{
    Cell, Command, Direction, GRID_HEIGHT, GRID_WIDTH, Game, GameEvent, ITEM_SCORE,
    LevelSession, LoopState, MAX_ADVERSARIES, Pos, SimConfig, SimulationLoop,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Input polls before the harness sends quit.
    #[arg(short, long, default_value_t = 5000)]
    ticks: u32,
    /// Adversary update period in milliseconds.
    #[arg(long, default_value_t = 5)]
    adversary_interval_ms: u64,
    /// Outer tick delay in milliseconds.
    #[arg(long, default_value_t = 1)]
    frame_delay_ms: u64,
}

struct RandomInput {
    rng: ChaCha8Rng,
    polls_left: u32,
    quit_sent: bool,
}

impl InputSource for RandomInput {
    fn poll(&mut self) -> Option<Command> {
        if self.polls_left == 0 {
            if self.quit_sent {
                return None;
            }
            self.quit_sent = true;
            return Some(Command::Quit);
        }
        self.polls_left -= 1;
        match self.rng.next_u64() % 8 {
            0 => Some(Command::Move(Direction::Up)),
            1 => Some(Command::Move(Direction::Down)),
            2 => Some(Command::Move(Direction::Left)),
            3 => Some(Command::Move(Direction::Right)),
            4 => Some(Command::Save),
            _ => None,
        }
    }
}

struct InvariantRenderer {
    frames: u64,
    items_seen: u64,
    last_level: u32,
    last_moves: u32,
}

impl Renderer for InvariantRenderer {
    fn render(&mut self, session: &LevelSession, _: LoopState, events: &[GameEvent]) {
        for x in 0..GRID_WIDTH as i32 {
            assert_eq!(session.grid.cell_at(Pos { y: 0, x }), Cell::Wall, "top border broken");
            assert_eq!(
                session.grid.cell_at(Pos { y: GRID_HEIGHT as i32 - 1, x }),
                Cell::Wall,
                "bottom border broken"
            );
        }
        for y in 0..GRID_HEIGHT as i32 {
            assert_eq!(session.grid.cell_at(Pos { y, x: 0 }), Cell::Wall, "left border broken");
            assert_eq!(
                session.grid.cell_at(Pos { y, x: GRID_WIDTH as i32 - 1 }),
                Cell::Wall,
                "right border broken"
            );
        }

        assert!(session.grid.is_walkable(session.player.pos), "player inside a wall");
        assert!(session.adversaries.len() <= MAX_ADVERSARIES, "too many adversaries");
        for adversary in &session.adversaries {
            assert!(
                session.grid.is_walkable(adversary.pos),
                "adversary inside a wall at {:?}",
                adversary.pos
            );
        }
        assert_eq!(session.player.score % ITEM_SCORE, 0, "score not a multiple of item value");
        assert_eq!(session.grid.cell_at(session.goal.pos), Cell::Open, "goal cell not open");

        assert!(session.player.level >= self.last_level, "level went backwards");
        if session.player.level == self.last_level {
            assert!(session.player.moves >= self.last_moves, "move counter went backwards");
        }
        self.last_level = session.player.level;
        self.last_moves = session.player.moves;

        self.frames += 1;
        self.items_seen += events
            .iter()
            .filter(|event| matches!(event, GameEvent::ItemCollected { .. }))
            .count() as u64;
    }
}

struct MemoryStore {
    saved: Option<LevelSession>,
}

impl SaveStore for MemoryStore {
    fn save(&mut self, session: &LevelSession) -> io::Result<()> {
        self.saved = Some(session.clone());
        Ok(())
    }

    fn load(&mut self) -> io::Result<Option<LevelSession>> {
        Ok(self.saved.clone())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    println!("stress: seed {} for {} input polls", args.seed, args.ticks);

    let config = SimConfig {
        adversary_interval: Duration::from_millis(args.adversary_interval_ms),
        frame_delay: Duration::from_millis(args.frame_delay_ms),
        poll_granularity: Duration::from_millis(1),
    };

    let mut input = RandomInput {
        rng: ChaCha8Rng::seed_from_u64(args.seed),
        polls_left: args.ticks,
        quit_sent: false,
    };
    let mut renderer = InvariantRenderer { frames: 0, items_seen: 0, last_level: 1, last_moves: 0 };
    let mut store = MemoryStore { saved: None };

    let finished =
        SimulationLoop::new(config).run(Game::new(args.seed), &mut renderer, &mut input, &mut store);

    let session = finished.session();
    println!(
        "done: state {:?}, level {}, score {}, frames {}, items {}",
        finished.state(),
        session.player.level,
        session.player.score,
        renderer.frames,
        renderer.items_seen,
    );
    println!("fingerprint {:016x}", finished.fingerprint());
    if store.saved.is_some() {
        println!("a save request was serviced during the run");
    }
    Ok(())
}
