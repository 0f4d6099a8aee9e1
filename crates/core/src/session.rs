//! Entity records and the per-level state bundle.
//! One plain record per entity kind; every call site knows statically
//! which kind it holds.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::grid::Grid;
use crate::types::{Cell, Direction, Pos, START_POS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Pos,
    pub facing: Option<Direction>,
    pub score: u32,
    pub moves: u32,
    pub level: u32,
}

impl Player {
    pub fn new() -> Self {
        Self { pos: START_POS, facing: None, score: 0, moves: 0, level: 1 }
    }

    /// Attempt one step. Rejected moves change nothing, including the move
    /// counter; rejection is not an error.
    pub fn step(&mut self, direction: Direction, grid: &Grid) -> bool {
        let target = direction.apply(self.pos);
        if !grid.is_walkable(target) {
            return false;
        }
        self.pos = target;
        self.facing = Some(direction);
        self.moves += 1;
        true
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Pursuer with no state beyond position and facing; its whole policy is
/// re-derived from the player position every update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adversary {
    pub pos: Pos,
    pub facing: Option<Direction>,
}

impl Adversary {
    pub fn at(pos: Pos) -> Self {
        Self { pos, facing: None }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub pos: Pos,
    /// First step of the shortest start-to-goal path, fixed at generation.
    pub facing: Option<Direction>,
}

/// Everything that lives and dies with one level. Created wholesale by the
/// generator, replaced wholesale on level transition, persisted as a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSession {
    pub grid: Grid,
    pub player: Player,
    pub adversaries: Vec<Adversary>,
    pub goal: Goal,
}

impl LevelSession {
    /// Stable byte encoding for fingerprinting; not a persistence format.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for cell in self.grid.cells() {
            bytes.push(match cell {
                Cell::Open => 0,
                Cell::Wall => 1,
                Cell::Item => 2,
            });
        }
        push_pos(&mut bytes, self.player.pos);
        bytes.push(facing_code(self.player.facing));
        bytes.extend(self.player.score.to_le_bytes());
        bytes.extend(self.player.moves.to_le_bytes());
        bytes.extend(self.player.level.to_le_bytes());

        bytes.extend((self.adversaries.len() as u32).to_le_bytes());
        for adversary in &self.adversaries {
            push_pos(&mut bytes, adversary.pos);
            bytes.push(facing_code(adversary.facing));
        }

        push_pos(&mut bytes, self.goal.pos);
        bytes.push(facing_code(self.goal.facing));
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn push_pos(bytes: &mut Vec<u8>, pos: Pos) {
    bytes.extend(pos.y.to_le_bytes());
    bytes.extend(pos.x.to_le_bytes());
}

fn facing_code(facing: Option<Direction>) -> u8 {
    match facing {
        None => 0,
        Some(Direction::Up) => 1,
        Some(Direction::Down) => 2,
        Some(Direction::Left) => 3,
        Some(Direction::Right) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    #[test]
    fn rejected_move_leaves_position_and_count_unchanged() {
        let grid = Grid::bordered();
        let mut player = Player::new();
        let moved = player.step(Direction::Up, &grid);
        assert!(!moved);
        assert_eq!(player.pos, START_POS);
        assert_eq!(player.moves, 0);
    }

    #[test]
    fn accepted_move_shifts_one_cell_and_counts_once() {
        let grid = Grid::bordered();
        let mut player = Player::new();
        let moved = player.step(Direction::Right, &grid);
        assert!(moved);
        assert_eq!(player.pos, Pos { y: 1, x: 2 });
        assert_eq!(player.moves, 1);
    }

    #[test]
    fn player_may_step_onto_item_cells() {
        let mut grid = Grid::bordered();
        grid.set_cell(Pos { y: 1, x: 2 }, Cell::Item);
        let mut player = Player::new();
        assert!(player.step(Direction::Right, &grid));
    }

    #[test]
    fn fingerprint_tracks_session_content() {
        let session = LevelSession {
            grid: Grid::bordered(),
            player: Player::new(),
            adversaries: vec![Adversary::at(Pos { y: 4, x: 4 })],
            goal: Goal { pos: Pos { y: 8, x: 8 }, facing: Some(Direction::Down) },
        };
        assert_eq!(session.fingerprint(), session.clone().fingerprint());

        let mut moved = session.clone();
        moved.player.pos = Pos { y: 1, x: 2 };
        assert_ne!(session.fingerprint(), moved.fingerprint());
    }
}
