use serde::{Deserialize, Serialize};

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 10;
pub const MAX_ADVERSARIES: usize = 3;
pub const ITEM_SCORE: u32 = 10;

/// The player always enters a level at the top-left interior cell.
pub const START_POS: Pos = Pos { y: 1, x: 1 };

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cell {
    Open,
    Wall,
    Item,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Canonical visitation order for search and random rolls.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    pub fn apply(self, pos: Pos) -> Pos {
        let (dy, dx) = self.delta();
        Pos { y: pos.y + dy, x: pos.x + dx }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Save,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    LevelTransition,
    GameOver,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    ItemCollected { at: Pos },
    LevelComplete { level: u32 },
    PlayerCaught { at: Pos },
    GameSaved,
    SaveFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_deltas_are_unit_steps_on_one_axis() {
        for direction in Direction::ALL {
            let (dy, dx) = direction.delta();
            assert_eq!(dy.abs() + dx.abs(), 1);
        }
    }

    #[test]
    fn apply_moves_one_cell_in_the_named_direction() {
        let origin = Pos { y: 4, x: 4 };
        assert_eq!(Direction::Up.apply(origin), Pos { y: 3, x: 4 });
        assert_eq!(Direction::Down.apply(origin), Pos { y: 5, x: 4 });
        assert_eq!(Direction::Left.apply(origin), Pos { y: 4, x: 3 });
        assert_eq!(Direction::Right.apply(origin), Pos { y: 4, x: 5 });
    }
}
