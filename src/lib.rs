pub mod config;
pub mod game;
pub mod input;
pub mod render_system;
pub mod transform;
pub mod vertex;
