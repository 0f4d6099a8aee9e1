pub mod game;
pub mod grid;
pub mod mazegen;
pub mod pathfinding;
pub mod pursuit;
pub mod save_file;
pub mod session;
pub mod sim;
pub mod types;

pub use game::Game;
pub use grid::Grid;
pub use mazegen::MazeGenerator;
pub use save_file::JsonSaveStore;
pub use session::{Adversary, Goal, LevelSession, Player};
pub use sim::{InputSource, Renderer, SaveStore, SimConfig, SimulationLoop};
pub use types::*;
