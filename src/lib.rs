pub mod core;
pub mod audio;
pub mod monster;
pub mod player;
pub mod spawning;
pub mod event_system;
pub mod systems;
pub mod management;
