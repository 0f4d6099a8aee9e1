//! Per-tick adversary decision policy: mostly chase, sometimes wander.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use crate::grid::Grid;
use crate::session::Adversary;
use crate::types::{Direction, Pos};

const PURSUE_PERCENT: u64 = 60;

impl Adversary {
    /// One action per tick, no planning and no memory of prior intent.
    /// A blocked attempt still consumes the tick.
    pub fn update(&mut self, grid: &Grid, player_pos: Pos, rng: &mut ChaCha8Rng) {
        if rng.next_u64() % 100 < PURSUE_PERCENT {
            let dy = player_pos.y - self.pos.y;
            let dx = player_pos.x - self.pos.x;
            let vertical = if dy > 0 { Direction::Down } else { Direction::Up };
            let horizontal = if dx > 0 { Direction::Right } else { Direction::Left };
            let (primary, fallback) =
                if dy.abs() > dx.abs() { (vertical, horizontal) } else { (horizontal, vertical) };
            if !self.try_step(primary, grid) {
                self.try_step(fallback, grid);
            }
        } else {
            let direction = Direction::ALL[(rng.next_u64() % 4) as usize];
            self.try_step(direction, grid);
        }
    }

    fn try_step(&mut self, direction: Direction, grid: &Grid) -> bool {
        let target = direction.apply(self.pos);
        if grid.is_walkable(target) {
            self.pos = target;
            self.facing = Some(direction);
            return true;
        }
        self.facing = None;
        false
    }
}
