//! Rejection-sampling level generation with a goal-reachability guarantee.
//!
//! Layouts are drawn whole and re-drawn from scratch until a BFS from the
//! start cell reaches the goal; the grid is small enough that retrying is
//! cheaper than incremental repair. Item placement happens after that check
//! and is not re-verified, so an item can end up sealed behind walls even
//! though the goal never is.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::grid::Grid;
use crate::pathfinding;
use crate::session::{Adversary, Goal};
use crate::types::{Cell, GRID_HEIGHT, GRID_WIDTH, MAX_ADVERSARIES, Pos, START_POS};

const LAYOUT_STREAM: u64 = 1;
const ADVERSARY_STREAM: u64 = 2;
pub(crate) const PURSUIT_STREAM: u64 = 3;

/// Deterministic generator: equal `(run_seed, level)` inputs yield
/// byte-identical grids, goals, and adversary sets.
#[derive(Clone, Copy, Debug)]
pub struct MazeGenerator {
    run_seed: u64,
}

impl MazeGenerator {
    pub fn new(run_seed: u64) -> Self {
        Self { run_seed }
    }

    pub fn generate(&self, level: u32) -> (Grid, Goal) {
        let mut rng = level_rng(self.run_seed, level, LAYOUT_STREAM);
        let goal_pos = Pos { y: GRID_HEIGHT as i32 - 2, x: GRID_WIDTH as i32 - 2 };

        let grid = loop {
            let candidate = draw_layout(&mut rng, level, goal_pos);
            if pathfinding::is_reachable(&candidate, START_POS, goal_pos) {
                break candidate;
            }
        };

        let facing = pathfinding::first_step(&grid, START_POS, goal_pos);
        (grid, Goal { pos: goal_pos, facing })
    }

    /// More adversaries on deeper levels, capped at `MAX_ADVERSARIES`; spawns
    /// stay off the start, goal, and wall cells and away from the outer two
    /// rings. Rejected draws re-roll, as in `generate`; interior wall density
    /// caps at one in four, so a free cell always turns up.
    pub fn spawn_adversaries(&self, level: u32, grid: &Grid) -> Vec<Adversary> {
        let mut rng = level_rng(self.run_seed, level, ADVERSARY_STREAM);
        let goal_pos = Pos { y: GRID_HEIGHT as i32 - 2, x: GRID_WIDTH as i32 - 2 };
        let count = MAX_ADVERSARIES.min(1 + level as usize / 2);

        let mut adversaries = Vec::with_capacity(count);
        while adversaries.len() < count {
            let pos = Pos {
                y: 2 + (rng.next_u64() % (GRID_HEIGHT as u64 - 4)) as i32,
                x: 2 + (rng.next_u64() % (GRID_WIDTH as u64 - 4)) as i32,
            };
            if pos != START_POS && pos != goal_pos && grid.is_walkable(pos) {
                adversaries.push(Adversary::at(pos));
            }
        }
        adversaries
    }
}

fn draw_layout(rng: &mut ChaCha8Rng, level: u32, goal_pos: Pos) -> Grid {
    let mut grid = Grid::bordered();

    // Wall density falls as levels rise, floored at one cell in four.
    let wall_modulus = u64::from(10_u32.saturating_sub(level).max(4));
    for y in 1..(GRID_HEIGHT as i32 - 1) {
        for x in 1..(GRID_WIDTH as i32 - 1) {
            let pos = Pos { y, x };
            if pos != START_POS && rng.next_u64() % wall_modulus == 0 {
                grid.set_cell(pos, Cell::Wall);
            }
        }
    }
    grid.set_cell(goal_pos, Cell::Open);

    let mut remaining = item_count(level);
    while remaining > 0 {
        let pos = random_interior(rng);
        if pos != START_POS && pos != goal_pos && grid.cell_at(pos) == Cell::Open {
            grid.set_cell(pos, Cell::Item);
            remaining -= 1;
        }
    }

    grid
}

pub fn item_count(level: u32) -> usize {
    5.min(3 + level as usize)
}

fn random_interior(rng: &mut ChaCha8Rng) -> Pos {
    Pos {
        y: 1 + (rng.next_u64() % (GRID_HEIGHT as u64 - 2)) as i32,
        x: 1 + (rng.next_u64() % (GRID_WIDTH as u64 - 2)) as i32,
    }
}

fn level_rng(run_seed: u64, level: u32, stream: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_level_seed(run_seed, level, stream))
}

pub(crate) fn derive_level_seed(run_seed: u64, level: u32, stream: u64) -> u64 {
    let mut mixed = run_seed ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= u64::from(level).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= stream.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}
