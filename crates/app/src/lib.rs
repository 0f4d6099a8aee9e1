pub mod input;
pub mod menu;
pub mod render;
pub mod save_path;
pub mod seed;
pub mod terminal;
