pub mod haunt_systems;
pub mod player_systems;
